//! Base types and error handling.
//!
//! - [`NetError`](neterror::NetError): transport error codes, modelled on Chromium's `net_error_list.h`
//! - [`IoResultExt`](context::IoResultExt): context helpers for IO failures

pub mod context;
pub mod neterror;
