//! Socket setup for the network transport:
//! - [`connectjob`]: DNS → TCP → TLS connection flow
//! - [`stream`]: the connected TCP or TLS socket
//! - [`tls`]: TLS configuration with BoringSSL

pub mod connectjob;
pub mod stream;
pub mod tls;
