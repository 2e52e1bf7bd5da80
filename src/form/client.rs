//! Stateful form client.
//!
//! # Example
//!
//! ```rust,ignore
//! use postback::StatefulFormClient;
//!
//! let mut client = StatefulFormClient::new();
//! client.get("http://intranet/Orders.aspx", None).await?;
//! // __VIEWSTATE / __EVENTVALIDATION from the page ride along on the postback.
//! let resp = client.post("http://intranet/Orders.aspx", None).await?;
//! ```

use crate::base::neterror::NetError;
use crate::form::scanner::{HiddenFieldScanner, ScanError};
use crate::form::state::{CarriedState, HeaderPrecedence};
use crate::http::formheaders::FormHeaders;
use crate::http::request::{FormMethod, FormRequest};
use crate::http::response::HttpResponse;
use crate::transport::{HttpTransport, Transport};
use std::path::{Path, PathBuf};

/// File name of the default cookie jar, placed in the system temp directory.
pub const DEFAULT_COOKIE_JAR_FILE: &str = "postback.cookiejar";

/// Default cookie jar path: `<temp dir>/postback.cookiejar`.
pub fn default_cookie_jar() -> PathBuf {
    std::env::temp_dir().join(DEFAULT_COOKIE_JAR_FILE)
}

/// HTTP client that carries WebForms postback state between calls.
///
/// After every completed request the response body is scanned and the
/// carried state is replaced by what was found, or cleared if nothing was.
/// POST and PUT requests send the carried state as headers; GET never does.
///
/// Calls take `&mut self`: one client is one postback session. Sessions
/// shared between tasks need external serialization, e.g. a
/// `tokio::sync::Mutex`, or one client each.
#[derive(Debug, Clone)]
pub struct StatefulFormClient<T = HttpTransport> {
    transport: T,
    cookie_jar: PathBuf,
    precedence: HeaderPrecedence,
    scanner: HiddenFieldScanner,
    state: CarriedState,
}

impl Default for StatefulFormClient<HttpTransport> {
    fn default() -> Self {
        Self::new()
    }
}

impl StatefulFormClient<HttpTransport> {
    /// Create a client with default settings.
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Create a client recording `path` as its cookie jar. The file is
    /// never opened.
    pub fn with_cookie_jar(path: impl Into<PathBuf>) -> Self {
        Self::builder().cookie_jar(path).build()
    }

    /// Create a new client builder.
    pub fn builder() -> StatefulFormClientBuilder {
        StatefulFormClientBuilder::default()
    }
}

impl<T: Transport> StatefulFormClient<T> {
    /// Create a client over a custom transport with default settings.
    pub fn with_transport(transport: T) -> Self {
        StatefulFormClientBuilder::default().build_with(transport)
    }

    pub fn cookie_jar(&self) -> &Path {
        &self.cookie_jar
    }

    pub fn header_precedence(&self) -> HeaderPrecedence {
        self.precedence
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// State left behind by the last completed request.
    pub fn state(&self) -> &CarriedState {
        &self.state
    }

    /// Replace the carried state, e.g. to resume a saved session.
    pub fn set_state(&mut self, state: CarriedState) {
        self.state = state;
    }

    /// Builder-style [`set_state`](Self::set_state).
    pub fn with_state(mut self, state: CarriedState) -> Self {
        self.state = state;
        self
    }

    /// Move the carried state out, leaving it empty.
    pub fn take_state(&mut self) -> CarriedState {
        std::mem::take(&mut self.state)
    }

    /// Issue a GET. Carried state is never sent.
    pub async fn get(
        &mut self,
        url: impl AsRef<str>,
        headers: Option<FormHeaders>,
    ) -> Result<HttpResponse, NetError> {
        self.request(FormMethod::Get, url, headers).await
    }

    /// Issue a POST carrying the current postback state.
    pub async fn post(
        &mut self,
        url: impl AsRef<str>,
        headers: Option<FormHeaders>,
    ) -> Result<HttpResponse, NetError> {
        self.request(FormMethod::Post, url, headers).await
    }

    /// Issue a PUT carrying the current postback state.
    pub async fn put(
        &mut self,
        url: impl AsRef<str>,
        headers: Option<FormHeaders>,
    ) -> Result<HttpResponse, NetError> {
        self.request(FormMethod::Put, url, headers).await
    }

    /// Run one request/scan cycle.
    ///
    /// Transport errors are returned unchanged and leave the carried state
    /// as it was. Once a response arrives, whatever its status, the state
    /// is reset and rebuilt from the body.
    pub async fn request(
        &mut self,
        method: FormMethod,
        url: impl AsRef<str>,
        headers: Option<FormHeaders>,
    ) -> Result<HttpResponse, NetError> {
        let url = url.as_ref();
        let mut headers = headers.unwrap_or_default();

        let injected = if method.carries_state() {
            self.state.inject_into(&mut headers, self.precedence)
        } else {
            0
        };
        tracing::debug!(
            method = %method,
            url = %url,
            injected,
            headers = headers.len(),
            "issuing form request"
        );

        let response = self
            .transport
            .send(FormRequest::new(method, url, headers))
            .await
            .map_err(|e| {
                tracing::debug!(url = %url, code = e.as_i32(), error = %e, "form request failed");
                e
            })?;

        self.state.clear();
        match self.scanner.scan_response(&response) {
            Ok(state) => {
                tracing::debug!(
                    url = %url,
                    status = %response.status(),
                    view_states = state.view_states().len(),
                    event_validation = state.event_validation().is_some(),
                    "captured postback state"
                );
                self.state = state;
            }
            Err(ScanError::NotText { content_type }) => {
                tracing::debug!(url = %url, content_type = ?content_type, "response body is not text; no postback state");
            }
        }

        Ok(response)
    }
}

/// Builder for creating a [`StatefulFormClient`].
#[derive(Debug, Default)]
pub struct StatefulFormClientBuilder {
    cookie_jar: Option<PathBuf>,
    precedence: HeaderPrecedence,
    scanner: Option<HiddenFieldScanner>,
    state: Option<CarriedState>,
}

impl StatefulFormClientBuilder {
    /// Set the cookie jar path (stored, never opened).
    pub fn cookie_jar(mut self, path: impl Into<PathBuf>) -> Self {
        self.cookie_jar = Some(path.into());
        self
    }

    /// Choose who wins a header name collision.
    pub fn header_precedence(mut self, precedence: HeaderPrecedence) -> Self {
        self.precedence = precedence;
        self
    }

    /// Set a custom hidden-field scanner.
    pub fn scanner(mut self, scanner: HiddenFieldScanner) -> Self {
        self.scanner = Some(scanner);
        self
    }

    /// Seed the carried state.
    pub fn state(mut self, state: CarriedState) -> Self {
        self.state = Some(state);
        self
    }

    /// Build the client over the network transport.
    pub fn build(self) -> StatefulFormClient<HttpTransport> {
        self.build_with(HttpTransport::new())
    }

    /// Build the client over the given transport.
    pub fn build_with<T: Transport>(self, transport: T) -> StatefulFormClient<T> {
        StatefulFormClient {
            transport,
            cookie_jar: self.cookie_jar.unwrap_or_else(default_cookie_jar),
            precedence: self.precedence,
            scanner: self.scanner.unwrap_or_default(),
            state: self.state.unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::Sending;
    use http::{HeaderMap, StatusCode};
    use std::sync::{Arc, Mutex};

    /// Replies with a fixed body and records every request.
    #[derive(Clone, Default)]
    struct ScriptedTransport {
        body: Arc<Mutex<Vec<u8>>>,
        fail: Arc<Mutex<Option<NetError>>>,
        sent: Arc<Mutex<Vec<FormRequest>>>,
    }

    impl ScriptedTransport {
        fn reply(&self, body: impl Into<Vec<u8>>) {
            *self.body.lock().unwrap() = body.into();
        }

        fn last(&self) -> FormRequest {
            self.sent.lock().unwrap().last().cloned().unwrap()
        }
    }

    impl Transport for ScriptedTransport {
        fn send(&self, request: FormRequest) -> Sending {
            self.sent.lock().unwrap().push(request);
            let result = match self.fail.lock().unwrap().clone() {
                Some(err) => Err(err),
                None => Ok(HttpResponse::new(
                    StatusCode::OK,
                    HeaderMap::new(),
                    self.body.lock().unwrap().clone(),
                )),
            };
            Box::pin(std::future::ready(result))
        }
    }

    fn seeded(views: &[&str], ev: Option<&str>) -> CarriedState {
        CarriedState::from_parts(
            views.iter().map(|v| v.to_string()).collect(),
            ev.map(str::to_string),
        )
    }

    #[test]
    fn test_default_cookie_jar() {
        let client = StatefulFormClient::new();
        assert_eq!(client.cookie_jar(), default_cookie_jar().as_path());
        assert!(client.cookie_jar().ends_with(DEFAULT_COOKIE_JAR_FILE));
    }

    #[test]
    fn test_custom_cookie_jar() {
        let client = StatefulFormClient::with_cookie_jar("/tmp/customjar");
        assert_eq!(client.cookie_jar(), Path::new("/tmp/customjar"));
    }

    #[test]
    fn test_state_empty_on_init() {
        let client = StatefulFormClient::with_transport(ScriptedTransport::default());
        assert!(client.state().view_states().is_empty());
        assert!(client.state().event_validation().is_none());
        assert_eq!(client.header_precedence(), HeaderPrecedence::Caller);
    }

    #[tokio::test]
    async fn test_state_replaced_not_appended() {
        let transport = ScriptedTransport::default();
        let mut client = StatefulFormClient::with_transport(transport.clone())
            .with_state(seeded(&["old1", "old2"], Some("oldtok")));

        transport.reply(r#"<input type="hidden" name="__VIEWSTATE" value="X"/>"#);
        client.get("http://anyurl", None).await.unwrap();

        assert_eq!(client.state().view_states(), &["X"]);
        assert!(client.state().event_validation().is_none());
    }

    #[tokio::test]
    async fn test_transport_error_leaves_state() {
        let transport = ScriptedTransport::default();
        *transport.fail.lock().unwrap() = Some(NetError::ConnectionClosed);
        let mut client = StatefulFormClient::with_transport(transport.clone())
            .with_state(seeded(&["A"], None));

        let err = client.post("http://anyurl", None).await.unwrap_err();

        assert_eq!(err, NetError::ConnectionClosed);
        assert_eq!(client.state().view_states(), &["A"]);
    }

    #[tokio::test]
    async fn test_take_and_set_state() {
        let transport = ScriptedTransport::default();
        let mut client = StatefulFormClient::with_transport(transport.clone());
        client.set_state(seeded(&["A"], Some("tok")));

        let saved = client.take_state();
        assert!(client.state().is_empty());

        client.post("http://anyurl", None).await.unwrap();
        assert!(transport.last().headers.is_empty());

        client.set_state(saved);
        client.post("http://anyurl", None).await.unwrap();
        assert_eq!(transport.last().headers.get("__VIEWSTATE"), Some("A"));
        assert_eq!(transport.last().headers.get("__EVENTVALIDATION"), Some("tok"));
    }
}
