//! Character set detection for fetched pages.
//!
//! The commission site serves windows-1251. Pages keep their raw bytes; text
//! is decoded only to build the parse tree.

use std::borrow::Cow;

use encoding_rs::{Encoding, UTF_8};

/// How many leading bytes are searched for a `<meta>` charset declaration.
const META_SCAN_BYTES: usize = 1024;

/// Value of the first `charset=` parameter in `text`, lowercased.
///
/// Works on a `Content-Type` header value as well as on the start of an HTML
/// document, where it finds both `<meta charset="...">` and
/// `<meta http-equiv="Content-Type" content="text/html; charset=...">`.
pub fn charset_param(text: &str) -> Option<String> {
    let lower = text.to_ascii_lowercase();
    let start = lower.find("charset")? + "charset".len();
    let rest = lower[start..].trim_start().strip_prefix('=')?;
    let label: String = rest
        .trim_start()
        .trim_start_matches(['"', '\''])
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | ':' | '.'))
        .collect();
    Some(label).filter(|label| !label.is_empty())
}

/// Encoding of an HTML body.
///
/// A byte-order mark wins, then the `declared` charset (from the response
/// headers), then a `<meta>` declaration near the start of the document.
/// Anything else is read as UTF-8.
pub fn detect_encoding(body: &[u8], declared: Option<&str>) -> &'static Encoding {
    if let Some((encoding, _)) = Encoding::for_bom(body) {
        return encoding;
    }
    if let Some(encoding) = declared.and_then(|label| Encoding::for_label(label.as_bytes())) {
        return encoding;
    }
    let head = String::from_utf8_lossy(&body[..body.len().min(META_SCAN_BYTES)]);
    charset_param(&head)
        .and_then(|label| Encoding::for_label(label.as_bytes()))
        .unwrap_or(UTF_8)
}

/// Decode an HTML body to text. Malformed sequences become U+FFFD.
pub fn decode_html<'a>(body: &'a [u8], declared: Option<&str>) -> Cow<'a, str> {
    let encoding = detect_encoding(body, declared);
    let (text, used, had_errors) = encoding.decode(body);
    if had_errors {
        log::debug!("{} body contained malformed sequences", used.name());
    }
    text
}
