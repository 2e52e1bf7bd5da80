//! Maps `io::Error` from the connect path onto `NetError`.
//!
//! `ConnectJob` resolves the form host and then dials each address. Errors
//! from either step lose the host once they leave the loop, so they are
//! tagged here on the way out.

use crate::base::neterror::NetError;
use std::io;

pub trait IoResultExt<T> {
    /// A failed dial to `host:port`. `NetError::is_connect` is true for the
    /// result.
    ///
    /// ```ignore
    /// let stream = TcpStream::connect(addr)
    ///     .await
    ///     .connection_context("erp.intranet", 443)?;
    /// // Connection to erp.intranet:443 failed: connection refused
    /// ```
    fn connection_context(self, host: &str, port: u16) -> Result<T, NetError>;

    /// A failed lookup of the form host, or a lookup that yielded nothing.
    fn dns_context(self, domain: &str) -> Result<T, NetError>;
}

impl<T> IoResultExt<T> for Result<T, io::Error> {
    fn connection_context(self, host: &str, port: u16) -> Result<T, NetError> {
        self.map_err(|e| NetError::connection_failed_to(host, port, e))
    }

    fn dns_context(self, domain: &str) -> Result<T, NetError> {
        self.map_err(|e| NetError::dns_failed(domain, e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Error, ErrorKind};

    #[test]
    fn test_refused_dial_is_connect_error() {
        let dial: Result<(), io::Error> =
            Err(Error::new(ErrorKind::ConnectionRefused, "refused"));
        let err = dial.connection_context("erp.intranet", 443).unwrap_err();

        assert!(err.is_connect());
        assert_eq!(
            err,
            NetError::ConnectionFailedTo {
                host: "erp.intranet".to_string(),
                port: 443,
                message: "refused".to_string(),
            }
        );
    }

    #[test]
    fn test_empty_lookup_names_host() {
        let lookup: Result<(), io::Error> =
            Err(Error::new(ErrorKind::NotFound, "no addresses resolved"));
        match lookup.dns_context("Login.intranet").unwrap_err() {
            NetError::NameNotResolvedFor { domain, message } => {
                assert_eq!(domain, "Login.intranet");
                assert_eq!(message, "no addresses resolved");
            }
            other => panic!("Expected NameNotResolvedFor, got {:?}", other),
        }
    }

    #[test]
    fn test_success_untouched() {
        let dial: Result<u16, io::Error> = Ok(8080);
        assert_eq!(dial.connection_context("erp.intranet", 8080).unwrap(), 8080);
    }
}
