//! HTTP transport abstraction.
//!
//! The form client never talks to sockets itself. It hands a finished
//! [`FormRequest`] to a [`Transport`] and gets back a buffered
//! [`HttpResponse`]. [`HttpTransport`] is the network implementation;
//! tests plug in recording doubles.

mod http1;

pub use http1::{HttpTransport, HttpTransportBuilder};

use crate::base::neterror::NetError;
use crate::http::request::FormRequest;
use crate::http::response::HttpResponse;
use std::{future::Future, pin::Pin, sync::Arc};

/// Alias for the `Future` type returned by a transport.
pub type Sending = Pin<Box<dyn Future<Output = Result<HttpResponse, NetError>> + Send>>;

/// Issues one HTTP round trip.
///
/// Implementations must not reinterpret failures: connection problems are
/// returned as `NetError`, while any response that arrived (including 4xx
/// and 5xx statuses) is returned as `Ok`.
pub trait Transport: Send + Sync {
    fn send(&self, request: FormRequest) -> Sending;
}

/// Blanket implementation for Arc-wrapped transports.
impl<T: Transport + ?Sized> Transport for Arc<T> {
    fn send(&self, request: FormRequest) -> Sending {
        (**self).send(request)
    }
}
