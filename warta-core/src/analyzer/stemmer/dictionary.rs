//! Root word dictionary.

use std::fs;
use std::path::Path;

use rustc_hash::FxHashSet;

use crate::error::LoadError;

const BUNDLED: &str = include_str!("../../../data/kata-dasar.txt");

/// Set of Indonesian root words the stemmer accepts as final forms.
///
/// The source format is one word per line; blank lines and lines starting
/// with `#` are skipped, words are lowercased.
#[derive(Debug, Clone, Default)]
pub struct RootDictionary {
    words: FxHashSet<String>,
}

impl RootDictionary {
    /// The word list shipped with the crate.
    pub fn bundled() -> Self {
        let mut dict = Self::default();
        dict.extend_from_str(BUNDLED);
        dict
    }

    /// Builds a dictionary from an iterator of words.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut dict = Self::default();
        for w in words {
            dict.insert(w.as_ref());
        }
        dict
    }

    /// Reads a word list from disk.
    pub fn from_file(path: &Path) -> Result<Self, LoadError> {
        let mut dict = Self::default();
        dict.extend_from_file(path)?;
        Ok(dict)
    }

    /// Adds every word of the list at `path`.
    pub fn extend_from_file(&mut self, path: &Path) -> Result<(), LoadError> {
        let text = fs::read_to_string(path).map_err(|source| LoadError::Dictionary {
            path: path.to_path_buf(),
            source,
        })?;
        let before = self.len();
        self.extend_from_str(&text);
        tracing::debug!(
            path = %path.display(),
            added = self.len() - before,
            "loaded root words"
        );
        Ok(())
    }

    fn extend_from_str(&mut self, text: &str) {
        for line in text.lines() {
            let word = line.trim();
            if word.is_empty() || word.starts_with('#') {
                continue;
            }
            self.insert(word);
        }
    }

    /// Inserts one word.
    pub fn insert(&mut self, word: &str) {
        let word = word.trim();
        if !word.is_empty() {
            self.words.insert(word.to_lowercase());
        }
    }

    #[inline]
    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn bundled_has_common_roots() {
        let dict = RootDictionary::bundled();
        for word in [
            "mobil", "listrik", "makan", "ajar", "ekonomi", "baca", "naik", "sepeda", "pergi", "tanah",
            "politik", "presiden",
        ] {
            assert!(dict.contains(word), "{word} missing");
        }
        assert!(dict.len() > 3000);
        assert!(!dict.contains("# bundled indonesian root words, one per line."));
        assert!(!dict.contains(""));
    }

    #[test]
    fn from_words_lowercases() {
        let dict = RootDictionary::from_words(["Makan", " minum "]);
        assert!(dict.contains("makan"));
        assert!(dict.contains("minum"));
        assert_eq!(dict.len(), 2);
    }

    #[test]
    fn from_file_skips_comments_and_blanks() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# komentar\n\nbaca\n  tulis  \n").unwrap();

        let dict = RootDictionary::from_file(file.path()).unwrap();
        assert_eq!(dict.len(), 2);
        assert!(dict.contains("baca"));
        assert!(dict.contains("tulis"));
    }

    #[test]
    fn missing_file_is_dictionary_error() {
        let err = RootDictionary::from_file(Path::new("/nonexistent/kata-dasar.txt")).unwrap_err();
        assert!(matches!(err, LoadError::Dictionary { .. }));
    }

    #[test]
    fn extend_keeps_existing_words() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "sepeda").unwrap();

        let mut dict = RootDictionary::from_words(["mobil"]);
        dict.extend_from_file(file.path()).unwrap();
        assert!(dict.contains("mobil"));
        assert!(dict.contains("sepeda"));
    }
}
