//! Scalar-value view of a string.

/// The Unicode scalar values of a string, indexed by scalar position.
///
/// Byte offsets never leak out: `get(1)` on `"é!"` is `'!'`, not the second
/// byte of `é`.
#[derive(Debug, Clone, Copy)]
pub struct CodepointStream<'a> {
    text: &'a str,
}

impl<'a> CodepointStream<'a> {
    pub fn new(text: &'a str) -> Self {
        Self { text }
    }

    /// Number of scalar values (not bytes).
    pub fn len(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// The `n`-th scalar value, if the string is that long.
    pub fn get(&self, n: usize) -> Option<u32> {
        self.text.chars().nth(n).map(u32::from)
    }

    pub fn iter(&self) -> impl Iterator<Item = u32> + 'a {
        self.text.chars().map(u32::from)
    }
}

/// The `n`-th scalar value of `s`, or `None` past the end.
pub fn char_code_at(s: &str, n: usize) -> Option<u32> {
    CodepointStream::new(s).get(n)
}
