//! ASCII escaping and the escape-token tokenizer.
//!
//! Escaped form: every non-ASCII scalar becomes `\u{HEX}` and a literal
//! backslash becomes `\\`; all other ASCII passes through.  The tokenizer
//! splits that form back into [`EscapeSegment`]s: ASCII runs and one
//! [`EscapeToken`] per escaped scalar.

use std::fmt;

/// One non-ASCII character as the backend's escape primitive expects it:
/// `U` followed by at least four upper-case hex digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EscapeToken(pub u32);

impl fmt::Display for EscapeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "U{:04X}", self.0)
    }
}

/// A piece of tokenised text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EscapeSegment {
    /// A run of ASCII characters, typed as a whole string.
    Text(String),
    /// A single non-ASCII character.
    Token(EscapeToken),
}

/// Escapes `s` to pure ASCII.
pub fn ascii_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            c if c.is_ascii() => out.push(c),
            c => {
                out.push_str("\\u{");
                out.push_str(&format!("{:X}", u32::from(c)));
                out.push('}');
            }
        }
    }
    out
}

/// Escapes `s` and splits it into ASCII runs and escape tokens, in order.
///
/// ```
/// use robokit_core::unicode::{escape_segments, EscapeSegment, EscapeToken};
///
/// let segments = escape_segments("café");
/// assert_eq!(
///     segments,
///     vec![
///         EscapeSegment::Text("caf".into()),
///         EscapeSegment::Token(EscapeToken(0xE9)),
///     ]
/// );
/// ```
pub fn escape_segments(s: &str) -> Vec<EscapeSegment> {
    split_escaped(&ascii_escape(s))
}

/// Splits an escaped string on its escape markers.
///
/// Sequences that are not well-formed escapes are kept as literal text.
pub fn split_escaped(escaped: &str) -> Vec<EscapeSegment> {
    let mut segments = Vec::new();
    let mut text = String::new();
    let mut rest = escaped;

    while let Some(pos) = rest.find('\\') {
        text.push_str(&rest[..pos]);
        let tail = &rest[pos + 1..];

        if let Some(after) = tail.strip_prefix('\\') {
            text.push('\\');
            rest = after;
        } else if let Some((cp, after)) = parse_unicode_escape(tail) {
            if !text.is_empty() {
                segments.push(EscapeSegment::Text(std::mem::take(&mut text)));
            }
            segments.push(EscapeSegment::Token(EscapeToken(cp)));
            rest = after;
        } else {
            text.push('\\');
            rest = tail;
        }
    }
    text.push_str(rest);
    if !text.is_empty() {
        segments.push(EscapeSegment::Text(text));
    }
    segments
}

/// Parses `u{HEX}` at the start of `s`, returning the scalar and the remainder.
fn parse_unicode_escape(s: &str) -> Option<(u32, &str)> {
    let body = s.strip_prefix("u{")?;
    let end = body.find('}')?;
    let hex = &body[..end];
    if hex.is_empty() || hex.len() > 6 {
        return None;
    }
    let cp = u32::from_str_radix(hex, 16).ok()?;
    char::from_u32(cp)?;
    Some((cp, &body[end + 1..]))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
