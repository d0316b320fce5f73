//! Input text normalization for the prediction models.

/// Normalize free-form user text before keyword matching: lowercase,
/// drop bracketed/tagged spans and URLs, break on punctuation, and
/// discard tokens containing digits. Mirrors the preprocessing the
/// models were built against.
pub fn clean_text(text: &str) -> String {
    let lowered = text.to_lowercase();
    let stripped = strip_spans(&strip_spans(&lowered, '[', ']'), '<', '>');

    let mut depunctuated = String::with_capacity(stripped.len());
    for token in stripped.split_whitespace() {
        if token.starts_with("http://") || token.starts_with("https://") || token.starts_with("www.")
        {
            continue;
        }
        for ch in token.chars() {
            if ch.is_ascii_punctuation() {
                depunctuated.push(' ');
            } else {
                depunctuated.push(ch);
            }
        }
        depunctuated.push(' ');
    }

    depunctuated
        .split_whitespace()
        .filter(|word| !word.chars().any(|ch| ch.is_ascii_digit()))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Remove closed `open..close` spans. Unclosed spans are left intact.
fn strip_spans(text: &str, open: char, close: char) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find(open) {
        match rest[start..].find(close) {
            Some(offset) => {
                out.push_str(&rest[..start]);
                rest = &rest[start + offset + close.len_utf8()..];
            }
            None => break,
        }
    }
    out.push_str(rest);
    out
}
