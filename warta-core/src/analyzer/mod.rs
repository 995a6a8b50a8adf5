//! Text analysis pipeline.
//!
//! This module provides the text processing components:
//! - **Normalizer**: Lowercases and strips digits, punctuation and extra whitespace
//! - **Tokenizer**: Splits normalized text into words
//! - **Stemmer**: Reduces Indonesian words to their roots
//!
//! [`Preprocessor`] chains the normalizer and the stemmer; its output is what
//! the vectorizer sees.

pub mod normalizer;
pub mod stemmer;
pub mod tokenizer;

pub use normalizer::{NormalizerConfig, TextNormalizer};
pub use stemmer::{RootDictionary, Stemmer, StemmerConfig};
pub use tokenizer::Tokenizer;

/// Normalizer followed by the stemmer.
///
/// ```
/// use warta_core::analyzer::Preprocessor;
///
/// let mut pre = Preprocessor::default();
/// assert_eq!(pre.preprocess("Pembangunan 2024: Perekonomian!"), "bangun ekonomi");
/// ```
#[derive(Debug, Clone, Default)]
pub struct Preprocessor {
    normalizer: TextNormalizer,
    stemmer: Stemmer,
    norm_buf: String,
}

impl Preprocessor {
    pub fn new(normalizer: TextNormalizer, stemmer: Stemmer) -> Self {
        Self {
            normalizer,
            stemmer,
            norm_buf: String::new(),
        }
    }

    /// Runs the full normalization on `text`.
    pub fn preprocess(&mut self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        self.preprocess_into(text, &mut out);
        out
    }

    /// Like [`Preprocessor::preprocess`], writing into `out`.
    pub fn preprocess_into(&mut self, text: &str, out: &mut String) {
        self.normalizer.normalize_into(text, &mut self.norm_buf);
        self.stemmer.stem_into(&self.norm_buf, out);
    }

    pub fn normalizer(&self) -> &TextNormalizer {
        &self.normalizer
    }

    pub fn stemmer(&self) -> &Stemmer {
        &self.stemmer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headline() {
        let mut pre = Preprocessor::default();
        assert_eq!(
            pre.preprocess("Merek Mobil Nasional Malaysia Luncurkan Mobil Listrik Pertama"),
            "merek mobil nasional malaysia luncur mobil listrik pertama"
        );
    }

    #[test]
    fn digits_and_punctuation_only() {
        let mut pre = Preprocessor::default();
        assert_eq!(pre.preprocess("2024!!! ... 12,5%"), "");
        assert_eq!(pre.preprocess(""), "");
    }

    #[test]
    fn punctuation_glues_words() {
        // Hyphens are removed by the normalizer before the stemmer sees them.
        let mut pre = Preprocessor::default();
        assert_eq!(pre.preprocess("Mobil123!!  Listrik"), "mobil listrik");
        assert_eq!(pre.preprocess("kata-kata"), "katakata");
    }

    #[test]
    fn dash_between_words_keeps_them_apart() {
        let mut pre = Preprocessor::default();
        assert_eq!(pre.preprocess("Jakarta\u{2014}Presiden"), "jakarta presiden");
    }

    #[test]
    fn news_sentence() {
        let mut pre = Preprocessor::default();
        assert_eq!(
            pre.preprocess("Pemerintah Menaikkan Harga Tanah, Presiden Pergi"),
            "perintah naik harga tanah presiden pergi"
        );
    }

    #[test]
    fn reuses_buffers_across_calls() {
        let mut pre = Preprocessor::default();
        let mut out = String::new();
        pre.preprocess_into("Membaca buku", &mut out);
        assert_eq!(out, "baca buku");
        pre.preprocess_into("Bermain", &mut out);
        assert_eq!(out, "main");
    }
}
