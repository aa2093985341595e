//! Text handling for Unicode injection.
//!
//! Two injection strategies exist because the native backends differ in what
//! they accept:
//!
//! - [`TextStrategy::Escape`]: the backend types one escape token per
//!   non-ASCII character (`U00E9` for `é`) and plain strings for ASCII runs.
//!   The token stream comes from [`escape::escape_segments`].
//! - [`TextStrategy::Direct`]: the backend takes one code point at a time,
//!   read from a [`CodepointStream`].

pub mod codepoints;
pub mod escape;

pub use codepoints::{char_code_at, CodepointStream};
pub use escape::{ascii_escape, escape_segments, EscapeSegment, EscapeToken};

/// Pause after each escape token when the caller gives none, in milliseconds.
pub const DEFAULT_MICRO_DELAY_MS: f64 = 7.0;

/// How text reaches the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextStrategy {
    /// Tokenised escape sequences with a pause after each token.
    Escape,
    /// One direct injection per code point, unpaced.
    Direct,
}
