//! Postback state carried from one response to the next request.

use crate::http::formheaders::FormHeaders;
use serde::{Deserialize, Serialize};

/// Name of the view-state hidden field (and header, when a single value is sent).
pub const VIEW_STATE_FIELD: &str = "__VIEWSTATE";

/// Name of the event-validation hidden field and header.
pub const EVENT_VALIDATION_FIELD: &str = "__EVENTVALIDATION";

/// Which side wins when a caller header and an injected postback header share
/// a name (ASCII case-insensitive).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum HeaderPrecedence {
    /// Caller headers are sent exactly as supplied; the colliding injected
    /// value is dropped.
    #[default]
    Caller,
    /// The carried value replaces the caller's value for that name.
    Carried,
}

/// View-state values and event-validation token scraped from the last
/// response.
///
/// Replaced wholesale after every completed request, never merged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarriedState {
    view_states: Vec<String>,
    event_validation: Option<String>,
}

impl CarriedState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_parts(view_states: Vec<String>, event_validation: Option<String>) -> Self {
        Self {
            view_states,
            event_validation,
        }
    }

    /// View-state values in document order.
    pub fn view_states(&self) -> &[String] {
        &self.view_states
    }

    pub fn event_validation(&self) -> Option<&str> {
        self.event_validation.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.view_states.is_empty() && self.event_validation.is_none()
    }

    pub fn push_view_state(&mut self, value: impl Into<String>) {
        self.view_states.push(value.into());
    }

    pub fn set_event_validation(&mut self, value: Option<String>) {
        self.event_validation = value;
    }

    pub fn clear(&mut self) {
        self.view_states.clear();
        self.event_validation = None;
    }

    /// Headers this state contributes to a POST or PUT.
    ///
    /// One view-state goes out as `__VIEWSTATE`; several go out as
    /// `__VIEWSTATE1..n` in carried order. An empty event-validation token
    /// is not sent.
    pub fn postback_headers(&self) -> FormHeaders {
        let mut headers = FormHeaders::new();
        match self.view_states.as_slice() {
            [] => {}
            [single] => headers.insert(VIEW_STATE_FIELD, single.as_str()),
            many => {
                for (idx, value) in many.iter().enumerate() {
                    headers.insert(format!("{}{}", VIEW_STATE_FIELD, idx + 1), value.as_str());
                }
            }
        }
        if let Some(token) = self.event_validation.as_deref().filter(|t| !t.is_empty()) {
            headers.insert(EVENT_VALIDATION_FIELD, token);
        }
        headers
    }

    /// Merge [`postback_headers`](Self::postback_headers) into `headers`.
    /// Returns how many injected headers made it into the map.
    pub fn inject_into(&self, headers: &mut FormHeaders, precedence: HeaderPrecedence) -> usize {
        let mut injected = 0;
        for (name, value) in self.postback_headers().iter() {
            match precedence {
                HeaderPrecedence::Caller => {
                    if headers.insert_if_absent(name, value) {
                        injected += 1;
                    } else {
                        tracing::trace!(header = name, "caller header shadows carried value");
                    }
                }
                HeaderPrecedence::Carried => {
                    headers.insert(name, value);
                    injected += 1;
                }
            }
        }
        injected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(views: &[&str], ev: Option<&str>) -> CarriedState {
        CarriedState::from_parts(
            views.iter().map(|v| v.to_string()).collect(),
            ev.map(str::to_string),
        )
    }

    #[test]
    fn test_new_is_empty() {
        let s = CarriedState::new();
        assert!(s.is_empty());
        assert!(s.view_states().is_empty());
        assert!(s.event_validation().is_none());
        assert!(s.postback_headers().is_empty());
    }

    #[test]
    fn test_single_view_state_unnumbered() {
        let headers = state(&["A"], None).postback_headers();
        assert_eq!(headers.len(), 1);
        assert_eq!(headers.get("__VIEWSTATE"), Some("A"));
        assert!(headers.get("__VIEWSTATE1").is_none());
    }

    #[test]
    fn test_multiple_view_states_numbered_from_one() {
        let headers = state(&["A", "B", "C"], None).postback_headers();
        let pairs: Vec<_> = headers.iter().collect();
        assert_eq!(
            pairs,
            vec![
                ("__VIEWSTATE1", "A"),
                ("__VIEWSTATE2", "B"),
                ("__VIEWSTATE3", "C")
            ]
        );
        assert!(headers.get("__VIEWSTATE").is_none());
    }

    #[test]
    fn test_event_validation_header() {
        let headers = state(&[], Some("tok")).postback_headers();
        assert_eq!(headers.iter().collect::<Vec<_>>(), vec![("__EVENTVALIDATION", "tok")]);
    }

    #[test]
    fn test_empty_event_validation_not_sent() {
        let headers = state(&[], Some("")).postback_headers();
        assert!(headers.is_empty());
    }

    #[test]
    fn test_caller_precedence_keeps_caller_value() {
        let mut headers = FormHeaders::new();
        headers.insert("__viewstate", "mine");
        headers.insert("Referer", "http://intranet/");

        let injected = state(&["carried"], Some("tok")).inject_into(&mut headers, HeaderPrecedence::Caller);

        assert_eq!(injected, 1);
        assert_eq!(headers.get("__VIEWSTATE"), Some("mine"));
        assert_eq!(headers.get("__EVENTVALIDATION"), Some("tok"));
        assert_eq!(headers.len(), 3);
    }

    #[test]
    fn test_carried_precedence_overrides() {
        let mut headers = FormHeaders::new();
        headers.insert("__EVENTVALIDATION", "mine");

        let injected = state(&[], Some("tok")).inject_into(&mut headers, HeaderPrecedence::Carried);

        assert_eq!(injected, 1);
        assert_eq!(headers.get("__EVENTVALIDATION"), Some("tok"));
        assert_eq!(headers.len(), 1);
    }

    #[test]
    fn test_clear() {
        let mut s = state(&["A", "B"], Some("tok"));
        s.clear();
        assert_eq!(s, CarriedState::new());
    }

    #[test]
    fn test_serde_snapshot() {
        let s = state(&["A", "B"], Some("tok"));
        let json = serde_json::to_string(&s).unwrap();
        assert_eq!(json, r#"{"view_states":["A","B"],"event_validation":"tok"}"#);
        let back: CarriedState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, s);
    }
}
