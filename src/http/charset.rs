//! Body decoding by declared charset.
//!
//! WebForms pages are often served as `windows-1252` or `iso-8859-1`, so a
//! body is decoded with the `Content-Type` charset before it is parsed.

use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8, WINDOWS_1252};
use std::borrow::Cow;

/// The `charset` parameter of a `Content-Type` value, unquoted.
pub fn charset_param(content_type: &str) -> Option<&str> {
    content_type.split(';').skip(1).find_map(|param| {
        let (name, value) = param.split_once('=')?;
        name.trim()
            .eq_ignore_ascii_case("charset")
            .then(|| value.trim().trim_matches('"'))
    })
}

/// Whether a media type carries text.
pub fn is_text_media_type(content_type: &str) -> bool {
    let essence = content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();

    essence.is_empty()
        || essence.starts_with("text/")
        || essence.ends_with("+xml")
        || matches!(
            essence.as_str(),
            "application/xml" | "application/json" | "application/javascript"
        )
}

/// Decode a response body to text.
///
/// Returns `None` for binary bodies: a non-text media type, or a NUL byte
/// in a body that is not UTF-16. Encoding is chosen by BOM, then the
/// declared charset, then UTF-8 if the bytes are valid, then windows-1252.
/// Malformed sequences are replaced rather than rejected.
pub fn decode_body<'a>(content_type: Option<&str>, body: &'a [u8]) -> Option<Cow<'a, str>> {
    if content_type.is_some_and(|ct| !is_text_media_type(ct)) {
        return None;
    }

    let declared = content_type
        .and_then(charset_param)
        .and_then(|label| Encoding::for_label(label.as_bytes()));
    let bom = Encoding::for_bom(body).map(|(encoding, _)| encoding);

    let wide = bom
        .or(declared)
        .is_some_and(|e| e == UTF_16LE || e == UTF_16BE);
    if !wide && body.contains(&0) {
        return None;
    }

    let encoding = match declared {
        Some(encoding) => encoding,
        None if std::str::from_utf8(body).is_ok() => UTF_8,
        None => WINDOWS_1252,
    };

    // BOM sniffing happens inside decode and overrides `encoding`.
    let (text, used, had_errors) = encoding.decode(body);
    if had_errors {
        tracing::trace!(encoding = used.name(), "replaced malformed sequences in body");
    }
    Some(text)
}
