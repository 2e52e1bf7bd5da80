//! WebForms postback handling.
//!
//! - [`state`]: the carried `__VIEWSTATE` / `__EVENTVALIDATION` values
//! - [`scanner`]: hidden-field extraction from response markup
//! - [`client`]: the request/scan cycle tying them to a transport

pub mod client;
pub mod scanner;
pub mod state;

pub use client::{StatefulFormClient, StatefulFormClientBuilder};
pub use scanner::{HiddenFieldScanner, ScanError};
pub use state::{CarriedState, HeaderPrecedence};
