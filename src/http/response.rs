//! HTTP Response with a fully buffered body.

use crate::base::neterror::NetError;
use crate::http::charset::decode_body;
use bytes::Bytes;
use http::header::CONTENT_TYPE;
use http::{HeaderMap, StatusCode, Version};
use hyper::body::Incoming;
use std::borrow::Cow;

/// HTTP Response returned to callers of the form client.
///
/// The body is read to the end by the transport, so it can be scanned for
/// hidden fields and still be handed back untouched.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    status: StatusCode,
    version: Version,
    headers: HeaderMap,
    body: Bytes,
    url: Option<String>,
}

impl HttpResponse {
    /// Build a response from parts. Used by transports that do not speak
    /// hyper, including test doubles.
    pub fn new(status: StatusCode, headers: HeaderMap, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            version: Version::HTTP_11,
            headers,
            body: body.into(),
            url: None,
        }
    }

    /// Create from hyper Response<Incoming>, collecting the whole body.
    pub async fn from_hyper(resp: http::Response<Incoming>, url: &str) -> Result<Self, NetError> {
        use http_body_util::BodyExt;

        let (parts, body) = resp.into_parts();
        let collected = body.collect().await.map_err(|e| {
            tracing::debug!(url = %url, error = %e, "failed to read response body");
            NetError::HttpBodyError
        })?;

        Ok(Self {
            status: parts.status,
            version: parts.version,
            headers: parts.headers,
            body: collected.to_bytes(),
            url: Some(url.to_string()),
        })
    }

    /// Attach the URL the response was fetched from.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Get the status code.
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Get the HTTP version.
    pub fn version(&self) -> Version {
        self.version
    }

    /// Get a reference to the headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn url(&self) -> Option<&str> {
        self.url.as_deref()
    }

    /// Raw body bytes.
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// The `Content-Type` header, if present and visible ASCII.
    pub fn content_type(&self) -> Option<&str> {
        self.headers.get(CONTENT_TYPE)?.to_str().ok()
    }

    /// Body decoded with the declared charset.
    ///
    /// Borrows when the body is already UTF-8. Binary bodies are
    /// `NetError::ContentDecodingFailed`.
    pub fn text(&self) -> Result<Cow<'_, str>, NetError> {
        decode_body(self.content_type(), &self.body).ok_or(NetError::ContentDecodingFailed)
    }

    /// Consume the response and return the body bytes.
    pub fn into_bytes(self) -> Bytes {
        self.body
    }

    /// Deserialize the body as JSON.
    #[cfg(feature = "json")]
    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, NetError> {
        serde_json::from_slice(&self.body).map_err(|_| NetError::JsonParseError)
    }

    /// Turn 4xx/5xx statuses into `NetError::HttpStatus`.
    pub fn error_for_status(self) -> Result<Self, NetError> {
        if self.status.is_client_error() || self.status.is_server_error() {
            Err(NetError::HttpStatus(self.status))
        } else {
            Ok(self)
        }
    }
}
