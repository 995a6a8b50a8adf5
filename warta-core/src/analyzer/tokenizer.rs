//! Streaming word splitter.
//!
//! Splits normalized text into words without allocating. The stemmer runs
//! on one word at a time, and this is how it gets them.
//!
//! ## The Input Contract
//!
//! The tokenizer expects **pre-normalized** input:
//! - No leading or trailing whitespace
//! - No consecutive spaces between words
//!
//! Violations panic in debug builds.

use core::str;
use memchr::memchr_iter;

/// Streaming tokenizer - splits normalized text on single ASCII spaces.
///
/// Tokens are slices (`&str`) into the input, emitted with their word
/// position via a callback.
///
/// ```
/// use warta_core::analyzer::tokenizer::Tokenizer;
///
/// let mut words = Vec::new();
/// Tokenizer::new().tokenize("mobil listrik pertama", |text, _pos| words.push(text));
/// assert_eq!(words, ["mobil", "listrik", "pertama"]);
/// ```
#[derive(Debug, Copy, Clone, Default)]
pub struct Tokenizer;

impl Tokenizer {
    /// Creates a new tokenizer.
    #[inline]
    pub const fn new() -> Self {
        Self
    }

    /// Tokenizes normalized input and emits `(text, position)`.
    ///
    /// Position is `u32`. After emitting a token at position `u32::MAX`,
    /// further emissions stop.
    #[inline(always)]
    pub fn tokenize<'n, F>(&self, normalized: &'n str, mut emit: F)
    where
        F: FnMut(&'n str, u32),
    {
        let bytes = normalized.as_bytes();

        debug_assert!(
            bytes.first().is_none_or(|&b| b != b' '),
            "tokenizer: leading whitespace, normalizer contract violated"
        );
        debug_assert!(
            bytes.last().is_none_or(|&b| b != b' '),
            "tokenizer: trailing whitespace, normalizer contract violated"
        );
        debug_assert!(
            !normalized.contains("  "),
            "tokenizer: consecutive spaces, normalizer contract violated"
        );

        if bytes.is_empty() {
            return;
        }

        let mut start = 0usize;
        let mut pos = 0u32;

        for i in memchr_iter(b' ', bytes) {
            if start < i {
                // SAFETY: `normalized` is valid UTF-8 and we split only on ASCII
                // space (0x20), which is never a continuation byte.
                let text = unsafe { str::from_utf8_unchecked(&bytes[start..i]) };
                emit(text, pos);
                if pos == u32::MAX {
                    return;
                }
                pos += 1;
            }
            start = i + 1;
        }

        if start < bytes.len() {
            // SAFETY: `start` follows an ASCII space byte, see above.
            let text = unsafe { str::from_utf8_unchecked(&bytes[start..]) };
            emit(text, pos);
        }
    }

    /// Collects the tokens of `normalized` into a vector of slices.
    pub fn words<'n>(&self, normalized: &'n str) -> Vec<&'n str> {
        let mut out = Vec::new();
        self.tokenize(normalized, |text, _| out.push(text));
        out
    }
}
