use crate::base::context::IoResultExt;
use crate::base::neterror::NetError;
use crate::socket::stream::SocketType;
use crate::socket::tls::TlsConfig;
use tokio::net::TcpStream;
use url::Url;

/// Manages the connection process: DNS -> TCP -> SSL.
/// Roughly equivalent to net::ConnectJob.
pub struct ConnectJob;

impl ConnectJob {
    pub async fn connect(url: &Url, tls: &TlsConfig) -> Result<SocketType, NetError> {
        let host = url.host_str().ok_or(NetError::InvalidUrl)?;
        let port = url.port_or_known_default().ok_or(NetError::InvalidUrl)?;

        // 1. DNS Resolution
        let addr_str = format!("{}:{}", host, port);
        let addrs: Vec<_> = tokio::net::lookup_host(&addr_str)
            .await
            .dns_context(host)?
            .collect();
        tracing::debug!(host = %host, count = addrs.len(), "resolved form host");

        // 2. TCP Connect, first reachable address wins
        let mut last_err = None;
        let mut stream = None;
        for addr in addrs {
            match TcpStream::connect(addr).await {
                Ok(s) => {
                    stream = Some(s);
                    break;
                }
                Err(e) => {
                    tracing::debug!(addr = %addr, error = %e, "connect attempt failed");
                    last_err = Some(e);
                }
            }
        }
        let stream = match (stream, last_err) {
            (Some(s), _) => s,
            (None, Some(e)) => return Err::<SocketType, _>(e).connection_context(host, port),
            (None, None) => {
                return Err::<SocketType, _>(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "no addresses resolved",
                ))
                .dns_context(host)
            }
        };

        // 3. SSL Handshake (if https)
        if url.scheme() == "https" {
            let connector = tls.build_connector()?;
            let mut config = connector
                .configure()
                .map_err(|_| NetError::SslProtocolError)?;

            let sni = TlsConfig::should_set_sni(host);
            config.set_use_server_name_indication(sni);
            config.set_verify_hostname(tls.verify_peer && sni);

            let tls_stream = tokio_boring::connect(config, host, stream)
                .await
                .map_err(|e| {
                    tracing::debug!(host = %host, error = ?e, "TLS handshake failed");
                    NetError::SslHandshakeFailed {
                        host: host.to_string(),
                    }
                })?;

            Ok(SocketType::Ssl(tls_stream))
        } else {
            Ok(SocketType::Tcp(stream))
        }
    }
}
