use crate::base::neterror::NetError;
use boring::ssl::{SslConnector, SslMethod, SslVerifyMode, SslVersion};

/// Protocol versions accepted for `https` connections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TlsVersion {
    Tls12,
    Tls13,
}

impl TlsVersion {
    fn to_boring(self) -> SslVersion {
        match self {
            TlsVersion::Tls12 => SslVersion::TLS1_2,
            TlsVersion::Tls13 => SslVersion::TLS1_3,
        }
    }
}

/// TLS settings for `https` form endpoints.
///
/// Only HTTP/1.1 is spoken, so ALPN advertises `http/1.1` alone.
#[derive(Debug, Clone)]
pub struct TlsConfig {
    pub min_version: Option<TlsVersion>,
    pub max_version: Option<TlsVersion>,
    pub alpn_protos: Vec<String>,
    /// Verify the peer certificate chain and hostname.
    pub verify_peer: bool,
}

impl Default for TlsConfig {
    fn default() -> Self {
        Self {
            min_version: Some(TlsVersion::Tls12),
            max_version: Some(TlsVersion::Tls13),
            alpn_protos: vec!["http/1.1".to_string()],
            verify_peer: true,
        }
    }
}

impl TlsConfig {
    /// Configuration that skips certificate checks, for self-signed
    /// intranet servers.
    pub fn insecure() -> Self {
        Self {
            verify_peer: false,
            ..Self::default()
        }
    }

    /// ALPN protocol list in wire format (length-prefixed).
    pub fn alpn_wire(&self) -> Result<Vec<u8>, NetError> {
        let mut alpn_wire = Vec::new();
        for proto in &self.alpn_protos {
            let len = u8::try_from(proto.len()).map_err(|_| NetError::SslProtocolError)?;
            alpn_wire.push(len);
            alpn_wire.extend_from_slice(proto.as_bytes());
        }
        Ok(alpn_wire)
    }

    /// Build a BoringSSL connector from this configuration.
    pub fn build_connector(&self) -> Result<SslConnector, NetError> {
        let mut builder =
            SslConnector::builder(SslMethod::tls()).map_err(|_| NetError::SslProtocolError)?;

        builder
            .set_min_proto_version(self.min_version.map(TlsVersion::to_boring))
            .map_err(|_| NetError::SslProtocolError)?;
        builder
            .set_max_proto_version(self.max_version.map(TlsVersion::to_boring))
            .map_err(|_| NetError::SslProtocolError)?;

        if !self.alpn_protos.is_empty() {
            builder
                .set_alpn_protos(&self.alpn_wire()?)
                .map_err(|_| NetError::SslProtocolError)?;
        }

        if self.verify_peer {
            builder.set_verify(SslVerifyMode::PEER);
        } else {
            builder.set_verify(SslVerifyMode::NONE);
        }

        Ok(builder.build())
    }

    /// Check if SNI (Server Name Indication) should be set for this host.
    /// Per RFC 6066, SNI MUST NOT be set for raw IP addresses.
    pub fn should_set_sni(host: &str) -> bool {
        host.trim_start_matches('[')
            .trim_end_matches(']')
            .parse::<std::net::IpAddr>()
            .is_err()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alpn_wire_format() {
        let config = TlsConfig::default();
        assert_eq!(config.alpn_wire().unwrap(), b"\x08http/1.1".to_vec());
    }

    #[test]
    fn test_alpn_rejects_oversized_protocol() {
        let config = TlsConfig {
            alpn_protos: vec!["x".repeat(256)],
            ..TlsConfig::default()
        };
        assert_eq!(config.alpn_wire().unwrap_err(), NetError::SslProtocolError);
    }

    #[test]
    fn test_sni_skipped_for_ip_literals() {
        assert!(TlsConfig::should_set_sni("intranet.example.com"));
        assert!(!TlsConfig::should_set_sni("10.0.0.5"));
        assert!(!TlsConfig::should_set_sni("[::1]"));
    }

    #[test]
    fn test_insecure_disables_verification() {
        assert!(TlsConfig::default().verify_peer);
        assert!(!TlsConfig::insecure().verify_peer);
    }

    #[test]
    fn test_version_bounds() {
        let config = TlsConfig::default();
        assert!(config.min_version <= config.max_version);
        assert_eq!(config.min_version, Some(TlsVersion::Tls12));
    }

    #[test]
    fn test_build_connector() {
        assert!(TlsConfig::default().build_connector().is_ok());
    }
}
