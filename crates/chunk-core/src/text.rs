use std::borrow::Cow;

/// Returns `true` if `text` is exactly one line break (`"\n"`, `"\r\n"` or `"\r"`).
pub fn is_newline(text: &str) -> bool {
    matches!(text, "\n" | "\r\n" | "\r")
}

pub(crate) fn contains_line_break(text: &str) -> bool {
    text.contains(['\n', '\r'])
}

/// Normalize CRLF and lone CR to LF.
pub(crate) fn normalize_line_breaks(text: &str) -> Cow<'_, str> {
    if text.contains('\r') {
        Cow::Owned(text.replace("\r\n", "\n").replace('\r', "\n"))
    } else {
        Cow::Borrowed(text)
    }
}
