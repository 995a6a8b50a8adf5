//! Indonesian stemmer.
//!
//! Reduces words to their root with the Nazief–Adriani confix-stripping
//! algorithm and its enhanced (ECS) prefix rules. A word is only ever
//! replaced by an entry of the [`RootDictionary`]; anything the rules cannot
//! reduce to a known root is left as it was.
//!
//! ```
//! use warta_core::analyzer::stemmer::Stemmer;
//!
//! let mut stemmer = Stemmer::default();
//! assert_eq!(stemmer.stem("Merek mobil meluncurkan mobil listrik"), "merek mobil luncur mobil listrik");
//! ```

mod affix;
mod context;
pub mod dictionary;
mod rules;

use std::path::PathBuf;

use rustc_hash::FxHashMap;
use serde::Deserialize;

use crate::analyzer::tokenizer::Tokenizer;
use crate::error::LoadError;
use context::Context;

pub use dictionary::RootDictionary;

/// Stemmer settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StemmerConfig {
    /// External root word list. Replaces the bundled list unless
    /// `extend_bundled` is set.
    pub dictionary: Option<PathBuf>,
    /// Merge the external list into the bundled one.
    pub extend_bundled: bool,
    /// Memoize per-word results.
    pub cache: bool,
}

impl Default for StemmerConfig {
    fn default() -> Self {
        Self {
            dictionary: None,
            extend_bundled: false,
            cache: true,
        }
    }
}

/// Text-level stemmer with an optional word cache.
///
/// Not `Sync`: [`Stemmer::stem`] updates the cache and takes `&mut self`.
#[derive(Debug, Clone)]
pub struct Stemmer {
    dictionary: RootDictionary,
    cache: Option<FxHashMap<String, String>>,
    clean_buf: String,
}

impl Default for Stemmer {
    fn default() -> Self {
        Self::new(RootDictionary::bundled())
    }
}

impl Stemmer {
    /// Creates a caching stemmer over `dictionary`.
    pub fn new(dictionary: RootDictionary) -> Self {
        Self {
            dictionary,
            cache: Some(FxHashMap::default()),
            clean_buf: String::with_capacity(256),
        }
    }

    /// Enables or disables the word cache.
    pub fn with_cache(mut self, enabled: bool) -> Self {
        self.cache = enabled.then(FxHashMap::default);
        self
    }

    /// Builds a stemmer from settings, reading the external dictionary if any.
    pub fn from_config(config: &StemmerConfig) -> Result<Self, LoadError> {
        let dictionary = match (&config.dictionary, config.extend_bundled) {
            (None, _) => RootDictionary::bundled(),
            (Some(path), false) => RootDictionary::from_file(path)?,
            (Some(path), true) => {
                let mut dict = RootDictionary::bundled();
                dict.extend_from_file(path)?;
                dict
            }
        };
        tracing::info!(root_words = dictionary.len(), "stemmer ready");
        Ok(Self::new(dictionary).with_cache(config.cache))
    }

    /// Returns the root dictionary.
    pub fn dictionary(&self) -> &RootDictionary {
        &self.dictionary
    }

    /// Stems every word of `text` and joins the roots with single spaces.
    ///
    /// Characters outside `[a-z0-9 -]` are treated as word separators.
    pub fn stem(&mut self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        self.stem_into(text, &mut out);
        out
    }

    /// Like [`Stemmer::stem`], writing into a caller-provided buffer.
    pub fn stem_into(&mut self, text: &str, out: &mut String) {
        out.clear();
        let mut clean = std::mem::take(&mut self.clean_buf);
        clean_text(text, &mut clean);

        Tokenizer::new().tokenize(&clean, |word, pos| {
            if pos > 0 {
                out.push(' ');
            }
            match self.cache.as_ref().and_then(|c| c.get(word)) {
                Some(root) => out.push_str(root),
                None => {
                    let root = self.stem_word(word);
                    out.push_str(&root);
                    if let Some(cache) = self.cache.as_mut() {
                        cache.insert(word.to_owned(), root);
                    }
                }
            }
        });

        self.clean_buf = clean;
    }

    /// Stems a single word, bypassing the cache.
    pub fn stem_word(&self, word: &str) -> String {
        if affix::is_plural(word) {
            self.stem_plural(word)
        } else {
            Context::new(&self.dictionary, word).stem()
        }
    }

    /// Number of cached words.
    pub fn cached_words(&self) -> usize {
        self.cache.as_ref().map_or(0, FxHashMap::len)
    }

    /// `kata-kata` → `kata`, `berbalas-balasan` → `balas`.
    fn stem_plural(&self, word: &str) -> String {
        let Some((head, tail)) = word.rsplit_once('-') else {
            return word.to_owned();
        };

        let (first, second) = match head.rsplit_once('-') {
            Some((a, b)) if affix::PLURAL_SUFFIXES.contains(&tail) => (a.to_owned(), format!("{b}-{tail}")),
            _ => (head.to_owned(), tail.to_owned()),
        };

        let root1 = Context::new(&self.dictionary, &first).stem();
        let mut root2 = Context::new(&self.dictionary, &second).stem();

        // meniru-nirukan: the second half lost its nasal prefix.
        if !self.dictionary.contains(&second) && root2 == second {
            let prefixed = format!("me{second}");
            root2 = Context::new(&self.dictionary, &prefixed).stem();
        }

        if root1 == root2 {
            root1
        } else {
            word.to_owned()
        }
    }
}

/// Keeps `[a-z0-9 -]`, turns everything else into spaces, collapses space
/// runs and trims both ends.
fn clean_text(text: &str, out: &mut String) {
    out.clear();
    let mut prev_space = true;
    for ch in text.chars() {
        let ch = ch.to_ascii_lowercase();
        if matches!(ch, 'a'..='z' | '0'..='9' | '-') {
            out.push(ch);
            prev_space = false;
        } else if !prev_space {
            out.push(' ');
            prev_space = true;
        }
    }
    if out.ends_with(' ') {
        out.pop();
    }
}
