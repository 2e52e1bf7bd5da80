//! # postback
//!
//! An HTTP client for ASP.NET WebForms pages that carries postback state
//! from one response to the next request.
//!
//! Every response body is scanned for hidden `__VIEWSTATE`,
//! `__VIEWSTATE<n>` and `__EVENTVALIDATION` inputs. The values found
//! replace the client's carried state and are sent as headers on the next
//! POST or PUT. GET requests never carry state.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use postback::StatefulFormClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), postback::NetError> {
//!     let mut client = StatefulFormClient::new();
//!     client.get("http://intranet/Report.aspx", None).await?;
//!     println!("view-states: {}", client.state().view_states().len());
//!
//!     let resp = client.post("http://intranet/Report.aspx", None).await?;
//!     println!("Status: {}", resp.status());
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! - [`base`] - Error definitions
//! - [`form`] - Carried state, hidden-field scanning, and the client
//! - [`http`] - Header mapping, request description, buffered response
//! - [`socket`] - TCP/TLS connection setup
//! - [`transport`] - The `Transport` seam and its HTTP/1.1 implementation

pub mod base;
pub mod form;
pub mod http;
pub mod socket;
pub mod transport;

pub use crate::base::neterror::NetError;
pub use crate::form::{
    CarriedState, HeaderPrecedence, HiddenFieldScanner, ScanError, StatefulFormClient,
    StatefulFormClientBuilder,
};
pub use crate::http::{FormHeaders, FormMethod, FormRequest, HttpResponse};
pub use crate::transport::{HttpTransport, Transport};
