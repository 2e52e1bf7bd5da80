use super::{Sending, Transport};
use crate::base::neterror::NetError;
use crate::http::request::FormRequest;
use crate::http::response::HttpResponse;
use crate::socket::connectjob::ConnectJob;
use crate::socket::tls::TlsConfig;
use bytes::Bytes;
use http::header::{HeaderValue, HOST};
use http::Request;
use http_body_util::Empty;
use hyper::client::conn::http1;
use hyper_util::rt::TokioIo;
use std::sync::Arc;
use std::time::Duration;
use url::{Position, Url};

/// Network transport: one fresh HTTP/1.1 connection per request.
///
/// Connections are not pooled; each form call is a single blocking round
/// trip from the caller's point of view.
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    tls: Arc<TlsConfig>,
    timeout: Option<Duration>,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn builder() -> HttpTransportBuilder {
        HttpTransportBuilder::default()
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }
}

/// Builder for creating an [`HttpTransport`].
#[derive(Debug, Default)]
pub struct HttpTransportBuilder {
    tls_config: Option<TlsConfig>,
    timeout: Option<Duration>,
}

impl HttpTransportBuilder {
    /// Set TLS options for `https` URLs.
    pub fn tls_config(mut self, config: TlsConfig) -> Self {
        self.tls_config = Some(config);
        self
    }

    /// Bound each request, connect through body, by this duration.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn build(self) -> HttpTransport {
        HttpTransport {
            tls: Arc::new(self.tls_config.unwrap_or_default()),
            timeout: self.timeout,
        }
    }
}

impl Transport for HttpTransport {
    fn send(&self, request: FormRequest) -> Sending {
        let tls = self.tls.clone();
        let timeout = self.timeout;
        Box::pin(async move {
            match timeout {
                Some(limit) => tokio::time::timeout(limit, execute(&tls, request))
                    .await
                    .map_err(|_| NetError::TimedOut)?,
                None => execute(&tls, request).await,
            }
        })
    }
}

/// `Host` header value: host plus port when it is not the scheme default.
fn host_header(url: &Url) -> Result<HeaderValue, NetError> {
    let host = url.host_str().ok_or(NetError::InvalidUrl)?;
    let value = match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    };
    HeaderValue::from_str(&value).map_err(|_| NetError::InvalidUrl)
}

async fn execute(tls: &TlsConfig, request: FormRequest) -> Result<HttpResponse, NetError> {
    let url = Url::parse(&request.url).map_err(|_| NetError::InvalidUrl)?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(NetError::UnknownUrlScheme);
    }

    let mut headers = request.headers.to_header_map()?;
    if !headers.contains_key(HOST) {
        headers.insert(HOST, host_header(&url)?);
    }

    let socket = ConnectJob::connect(&url, tls).await?;
    let io = TokioIo::new(socket);
    let (mut sender, conn) = http1::handshake(io)
        .await
        .map_err(|_| NetError::ConnectionClosed)?;

    tokio::spawn(async move {
        if let Err(e) = conn.await {
            tracing::debug!(error = %e, "connection driver ended with error");
        }
    });

    let target = &url[Position::BeforePath..Position::AfterQuery];
    let mut req = Request::builder()
        .method(request.method.as_http())
        .uri(target)
        .body(Empty::<Bytes>::new())
        .map_err(|_| NetError::InvalidUrl)?;
    *req.headers_mut() = headers;

    tracing::debug!(method = %request.method, url = %url, "sending form request");
    let resp = sender.send_request(req).await.map_err(|e| {
        tracing::debug!(url = %url, error = %e, "request failed");
        NetError::ConnectionClosed
    })?;

    HttpResponse::from_hyper(resp, url.as_str()).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::formheaders::FormHeaders;
    use crate::http::request::FormMethod;

    #[test]
    fn test_host_header_default_port_omitted() {
        let url = Url::parse("https://intranet.example.com/Login.aspx").unwrap();
        assert_eq!(host_header(&url).unwrap(), "intranet.example.com");
    }

    #[test]
    fn test_host_header_explicit_port_kept() {
        let url = Url::parse("http://127.0.0.1:8080/Login.aspx").unwrap();
        assert_eq!(host_header(&url).unwrap(), "127.0.0.1:8080");
    }

    #[test]
    fn test_builder() {
        let transport = HttpTransport::builder()
            .timeout(Duration::from_secs(5))
            .tls_config(TlsConfig::insecure())
            .build();
        assert_eq!(transport.timeout(), Some(Duration::from_secs(5)));
        assert!(HttpTransport::new().timeout().is_none());
    }

    #[tokio::test]
    async fn test_invalid_url() {
        let req = FormRequest::new(FormMethod::Get, "not a url", FormHeaders::new());
        let err = HttpTransport::new().send(req).await.unwrap_err();
        assert_eq!(err, NetError::InvalidUrl);
    }

    #[tokio::test]
    async fn test_unknown_scheme() {
        let req = FormRequest::new(FormMethod::Get, "ftp://files.local/a", FormHeaders::new());
        let err = HttpTransport::new().send(req).await.unwrap_err();
        assert_eq!(err, NetError::UnknownUrlScheme);
    }

    #[tokio::test]
    async fn test_invalid_header_rejected_before_connect() {
        let mut headers = FormHeaders::new();
        headers.insert("Bad Name", "x");
        let req = FormRequest::new(FormMethod::Post, "http://127.0.0.1:9/", headers);
        let err = HttpTransport::new().send(req).await.unwrap_err();
        assert!(matches!(err, NetError::InvalidHeader { .. }));
    }
}
