//! Request description handed to a [`Transport`](crate::transport::Transport).

use crate::http::formheaders::FormHeaders;
use http::Method;
use std::fmt;

/// The verbs a form client can issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormMethod {
    Get,
    Post,
    Put,
}

impl FormMethod {
    /// Whether carried postback state is attached to requests of this verb.
    pub fn carries_state(self) -> bool {
        matches!(self, FormMethod::Post | FormMethod::Put)
    }

    pub fn as_http(self) -> Method {
        match self {
            FormMethod::Get => Method::GET,
            FormMethod::Post => Method::POST,
            FormMethod::Put => Method::PUT,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FormMethod::Get => "GET",
            FormMethod::Post => "POST",
            FormMethod::Put => "PUT",
        }
    }
}

impl fmt::Display for FormMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<FormMethod> for Method {
    fn from(method: FormMethod) -> Self {
        method.as_http()
    }
}

/// One outgoing request: verb, URL as given by the caller, final headers.
///
/// The URL is not validated here; transports report `NetError::InvalidUrl`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormRequest {
    pub method: FormMethod,
    pub url: String,
    pub headers: FormHeaders,
}

impl FormRequest {
    pub fn new(method: FormMethod, url: impl Into<String>, headers: FormHeaders) -> Self {
        Self {
            method,
            url: url.into(),
            headers,
        }
    }
}
