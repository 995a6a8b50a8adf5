//! TF-IDF vectorizer with a fixed, pre-fitted vocabulary.
//!
//! Reproduces the transform side of a fitted word-level TF-IDF vectorizer:
//!
//! 1. optional lowercasing
//! 2. tokenization by the token pattern (first capture group if it has one)
//! 3. stop-word removal
//! 4. word n-grams joined by a single space
//! 5. term counts over the vocabulary; unknown terms are ignored
//! 6. `binary` clipping, `sublinear_tf` (`1 + ln tf`), idf weighting
//! 7. row normalization
//!
//! ```
//! use rustc_hash::FxHashMap;
//! use warta_core::model::TfidfVectorizer;
//!
//! let vocabulary: FxHashMap<String, u32> =
//!     [("mobil".to_owned(), 0), ("listrik".to_owned(), 1)].into_iter().collect();
//! let vectorizer = TfidfVectorizer::new(vocabulary, None).unwrap();
//!
//! let row = vectorizer.transform("mobil listrik mobil");
//! assert_eq!(row.dim(), 2);
//! assert!((row.norm_l2() - 1.0).abs() < 1e-12);
//! ```

use regex::Regex;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::Deserialize;
use warta_types::FeatureVector;

use crate::error::{InvalidArtifact, TransformError};

/// Word pattern of a default-configured vectorizer: two or more word characters.
pub const DEFAULT_TOKEN_PATTERN: &str = r"(?u)\b\w\w+\b";

/// Row normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Norm {
    L1,
    L2,
}

/// JSON export of a fitted TF-IDF vectorizer.
#[derive(Debug, Clone, Deserialize)]
pub struct VectorizerArtifact {
    /// Term to column index.
    pub vocabulary: FxHashMap<String, u32>,
    /// Output width. Defaults to the idf length, else the largest index + 1.
    #[serde(default)]
    pub n_features: Option<usize>,
    #[serde(default)]
    pub idf: Option<Vec<f64>>,
    #[serde(default = "default_ngram_range")]
    pub ngram_range: (usize, usize),
    /// `null` disables normalization.
    #[serde(default = "default_norm")]
    pub norm: Option<Norm>,
    #[serde(default)]
    pub sublinear_tf: bool,
    #[serde(default)]
    pub binary: bool,
    #[serde(default = "default_lowercase")]
    pub lowercase: bool,
    #[serde(default = "default_token_pattern")]
    pub token_pattern: String,
    #[serde(default)]
    pub stop_words: Option<Vec<String>>,
}

fn default_ngram_range() -> (usize, usize) {
    (1, 1)
}

fn default_norm() -> Option<Norm> {
    Some(Norm::L2)
}

fn default_lowercase() -> bool {
    true
}

fn default_token_pattern() -> String {
    DEFAULT_TOKEN_PATTERN.to_owned()
}

#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    vocabulary: FxHashMap<String, u32>,
    n_features: usize,
    idf: Option<Vec<f64>>,
    ngram_range: (usize, usize),
    norm: Option<Norm>,
    sublinear_tf: bool,
    binary: bool,
    lowercase: bool,
    token_pattern: Regex,
    /// Capture group holding the token: 0 for the whole match, or 1.
    token_group: usize,
    stop_words: FxHashSet<String>,
}

fn compile_token_pattern(pattern: &str) -> Result<(Regex, usize), TransformError> {
    let re = Regex::new(pattern)?;
    match re.captures_len() - 1 {
        0 => Ok((re, 0)),
        1 => Ok((re, 1)),
        n => Err(TransformError::CaptureGroups(n)),
    }
}

impl TfidfVectorizer {
    /// Creates a vectorizer with default settings: unigrams, lowercasing,
    /// the default token pattern, L2 normalization.
    ///
    /// Without `idf` the output is a normalized term-frequency row.
    pub fn new(vocabulary: FxHashMap<String, u32>, idf: Option<Vec<f64>>) -> Result<Self, TransformError> {
        let n_features = match &idf {
            Some(idf) => idf.len(),
            None => vocabulary.values().max().map_or(0, |&m| m as usize + 1),
        };
        let (token_pattern, token_group) = compile_token_pattern(DEFAULT_TOKEN_PATTERN)?;
        Ok(Self {
            vocabulary,
            n_features,
            idf,
            ngram_range: default_ngram_range(),
            norm: default_norm(),
            sublinear_tf: false,
            binary: false,
            lowercase: true,
            token_pattern,
            token_group,
            stop_words: FxHashSet::default(),
        })
    }

    pub fn with_token_pattern(mut self, pattern: &str) -> Result<Self, TransformError> {
        (self.token_pattern, self.token_group) = compile_token_pattern(pattern)?;
        Ok(self)
    }

    pub fn with_ngram_range(mut self, min_n: usize, max_n: usize) -> Self {
        self.ngram_range = (min_n, max_n);
        self
    }

    pub fn with_norm(mut self, norm: Option<Norm>) -> Self {
        self.norm = norm;
        self
    }

    pub fn with_sublinear_tf(mut self, enabled: bool) -> Self {
        self.sublinear_tf = enabled;
        self
    }

    pub fn with_binary(mut self, enabled: bool) -> Self {
        self.binary = enabled;
        self
    }

    pub fn with_lowercase(mut self, enabled: bool) -> Self {
        self.lowercase = enabled;
        self
    }

    pub fn with_stop_words<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.stop_words = words.into_iter().map(Into::into).collect();
        self
    }

    /// Width of the rows this vectorizer produces.
    #[inline]
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    #[inline]
    pub fn vocabulary_len(&self) -> usize {
        self.vocabulary.len()
    }

    fn tokens<'t>(&'t self, text: &'t str) -> impl Iterator<Item = &'t str> + 't {
        let group = self.token_group;
        self.token_pattern
            .captures_iter(text)
            .filter_map(move |caps| caps.get(group))
            .map(|m| m.as_str())
            .filter(move |t| !self.stop_words.contains(*t))
    }

    /// Transforms one document into a TF-IDF row.
    pub fn transform(&self, doc: &str) -> FeatureVector {
        let lowered;
        let text = if self.lowercase {
            lowered = doc.to_lowercase();
            lowered.as_str()
        } else {
            doc
        };

        let tokens: Vec<&str> = self.tokens(text).collect();
        let mut counts: FxHashMap<u32, f64> = FxHashMap::default();
        let mut gram = String::new();

        let (min_n, max_n) = self.ngram_range;
        for n in min_n.max(1)..=max_n.min(tokens.len()) {
            for window in tokens.windows(n) {
                let term = if n == 1 {
                    window[0]
                } else {
                    gram.clear();
                    for (k, t) in window.iter().enumerate() {
                        if k > 0 {
                            gram.push(' ');
                        }
                        gram.push_str(t);
                    }
                    gram.as_str()
                };
                if let Some(&col) = self.vocabulary.get(term) {
                    *counts.entry(col).or_insert(0.0) += 1.0;
                }
            }
        }

        let mut row = FeatureVector::from_unsorted(self.n_features, counts.into_iter().collect());

        if self.binary {
            row.map_in_place(|_, _| 1.0);
        }
        if self.sublinear_tf {
            row.map_in_place(|_, tf| 1.0 + tf.ln());
        }
        if let Some(idf) = &self.idf {
            row.map_in_place(|i, x| x * idf[i]);
        }
        let norm = match self.norm {
            Some(Norm::L1) => row.norm_l1(),
            Some(Norm::L2) => row.norm_l2(),
            None => 0.0,
        };
        if norm > 0.0 {
            row.scale(1.0 / norm);
        }

        tracing::trace!(tokens = tokens.len(), nnz = row.nnz(), "vectorized document");
        row
    }
}

impl TryFrom<VectorizerArtifact> for TfidfVectorizer {
    type Error = InvalidArtifact;

    fn try_from(a: VectorizerArtifact) -> Result<Self, Self::Error> {
        let (min_n, max_n) = a.ngram_range;
        if min_n == 0 || min_n > max_n {
            return Err(InvalidArtifact::new(format!(
                "invalid ngram_range ({min_n}, {max_n})"
            )));
        }

        let max_index = a.vocabulary.values().max().map(|&m| m as usize);
        let n_features = a
            .n_features
            .or_else(|| a.idf.as_ref().map(Vec::len))
            .or(max_index.map(|m| m + 1))
            .unwrap_or(0);

        if let Some(m) = max_index.filter(|&m| m >= n_features) {
            return Err(InvalidArtifact::new(format!(
                "vocabulary index {m} out of range (n_features: {n_features})"
            )));
        }
        if let Some(idf) = &a.idf {
            if idf.len() != n_features {
                return Err(InvalidArtifact::new(format!(
                    "idf has {} entries, expected {n_features}",
                    idf.len()
                )));
            }
        }

        let (token_pattern, token_group) = compile_token_pattern(&a.token_pattern)?;

        Ok(Self {
            vocabulary: a.vocabulary,
            n_features,
            idf: a.idf,
            ngram_range: a.ngram_range,
            norm: a.norm,
            sublinear_tf: a.sublinear_tf,
            binary: a.binary,
            lowercase: a.lowercase,
            token_pattern,
            token_group,
            stop_words: a.stop_words.unwrap_or_default().into_iter().collect(),
        })
    }
}
