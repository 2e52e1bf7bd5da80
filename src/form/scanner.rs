//! Hidden form field scanning.
//!
//! Pulls `__VIEWSTATE*` and `__EVENTVALIDATION` hidden inputs out of an
//! HTML response body. The body is decoded with its declared charset and
//! HTML parsing is error-tolerant, so the only way a scan fails is a body
//! that is not text at all.

use crate::form::state::{CarriedState, EVENT_VALIDATION_FIELD};
use crate::http::charset::decode_body;
use crate::http::HttpResponse;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html};
use thiserror::Error;

static VIEW_STATE_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^__VIEWSTATE[0-9]*$").expect("view-state name pattern is valid"));

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum ScanError {
    #[error("response body is not text (content type {content_type:?})")]
    NotText { content_type: Option<String> },
}

/// A hidden `<input>` element, by name and value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HiddenInput {
    pub name: String,
    /// Empty when the element has no `value` attribute.
    pub value: String,
}

fn hidden_inputs(document: &Html) -> impl Iterator<Item = ElementRef<'_>> {
    document
        .root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
        .filter(|el| {
            let el = el.value();
            el.name() == "input"
                && el
                    .attr("type")
                    .is_some_and(|t| t.trim().eq_ignore_ascii_case("hidden"))
        })
}

fn to_hidden_input(el: ElementRef<'_>, name: &str) -> HiddenInput {
    HiddenInput {
        name: name.to_string(),
        value: el.value().attr("value").unwrap_or_default().to_string(),
    }
}

/// All hidden inputs whose `name` matches `pattern`, in document order.
pub fn find_all(document: &Html, pattern: &Regex) -> Vec<HiddenInput> {
    hidden_inputs(document)
        .filter_map(|el| {
            let name = el.value().attr("name")?;
            pattern.is_match(name).then(|| to_hidden_input(el, name))
        })
        .collect()
}

/// The first hidden input whose `name` is exactly `name`.
pub fn find_first(document: &Html, name: &str) -> Option<HiddenInput> {
    hidden_inputs(document)
        .find(|el| el.value().attr("name") == Some(name))
        .map(|el| to_hidden_input(el, name))
}

/// Extracts postback state from response bodies.
#[derive(Debug, Clone)]
pub struct HiddenFieldScanner {
    view_state_name: Regex,
}

impl Default for HiddenFieldScanner {
    fn default() -> Self {
        Self {
            view_state_name: VIEW_STATE_NAME.clone(),
        }
    }
}

impl HiddenFieldScanner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different naming pattern for view-state fields. The pattern is
    /// matched against the whole `name` attribute only if it is anchored.
    pub fn with_view_state_pattern(pattern: Regex) -> Self {
        Self {
            view_state_name: pattern,
        }
    }

    pub fn view_state_pattern(&self) -> &Regex {
        &self.view_state_name
    }

    /// Scan a response body served with `content_type`.
    ///
    /// Binary bodies (a non-text media type, or NUL bytes) are reported as
    /// [`ScanError::NotText`]. Anything else is decoded by its charset,
    /// falling back to windows-1252 when undeclared and not UTF-8.
    pub fn scan(&self, content_type: Option<&str>, body: &[u8]) -> Result<CarriedState, ScanError> {
        let text = decode_body(content_type, body).ok_or_else(|| ScanError::NotText {
            content_type: content_type.map(str::to_string),
        })?;
        Ok(self.scan_text(&text))
    }

    /// Scan a response using its `Content-Type` header.
    pub fn scan_response(&self, response: &HttpResponse) -> Result<CarriedState, ScanError> {
        self.scan(response.content_type(), response.body())
    }

    /// Scan markup text. Malformed markup yields whatever fields the
    /// parser recovered, possibly none.
    pub fn scan_text(&self, text: &str) -> CarriedState {
        let document = Html::parse_document(text);
        let mut state = CarriedState::new();

        for input in find_all(&document, &self.view_state_name) {
            tracing::trace!(field = %input.name, len = input.value.len(), "view-state field");
            state.push_view_state(input.value);
        }

        let event_validation = find_first(&document, EVENT_VALIDATION_FIELD).map(|i| i.value);
        state.set_event_validation(event_validation);
        state
    }
}
