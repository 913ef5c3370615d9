//! Minimal HTML escaping for alert bodies

/// Escape the five HTML-significant characters
///
/// `&` is replaced first so entities produced by the later substitutions are not
/// escaped again. Applying this twice double-escapes; callers escape exactly once.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
