//! Suffix and plain-prefix patterns.

use once_cell::sync::Lazy;
use regex::{Regex, RegexSet};

/// Words this short are never stemmed.
pub(crate) const MAX_SHORT_WORD_CHARS: usize = 3;

/// Suffixes a reduplicated word may carry after its last hyphen.
pub(crate) const PLURAL_SUFFIXES: [&str; 7] = ["ku", "mu", "nya", "lah", "kah", "tah", "pun"];

/// Inflectional particle: `-lah`, `-kah`, `-tah`, `-pun`.
pub(crate) static PARTICLE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"-*(lah|kah|tah|pun)$").expect("valid particle pattern"));

/// Inflectional possessive pronoun: `-ku`, `-mu`, `-nya`.
pub(crate) static POSSESSIVE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"-*(ku|mu|nya)$").expect("valid possessive pattern"));

/// Derivational suffix. The leftmost match wins, so `-isasi` beats `-i`.
pub(crate) static DERIVATIONAL_SUFFIX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(is|isme|isasi|i|kan|an)$").expect("valid derivational suffix pattern")
});

/// Plain prefixes removed without recoding.
pub(crate) static PLAIN_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(di|[ks]e)").expect("valid plain prefix pattern"));

/// Confixes for which the prefix is removed before the suffix.
static PRECEDENCE_ADJUSTMENT: Lazy<RegexSet> = Lazy::new(|| {
    RegexSet::new([
        r"^be(.*)lah$",
        r"^be(.*)an$",
        r"^me(.*)i$",
        r"^di(.*)i$",
        r"^pe(.*)i$",
        r"^ter(.*)i$",
    ])
    .expect("valid precedence patterns")
});

#[inline]
pub(crate) fn is_short_word(word: &str) -> bool {
    word.chars().count() <= MAX_SHORT_WORD_CHARS
}

#[inline]
pub(crate) fn prefix_first(word: &str) -> bool {
    PRECEDENCE_ADJUSTMENT.is_match(word)
}

/// Removes the first match of `pattern`, returning `None` when nothing changed.
pub(crate) fn strip(pattern: &Regex, word: &str) -> Option<String> {
    let m = pattern.find(word)?;
    if m.is_empty() {
        return None;
    }
    let mut out = String::with_capacity(word.len() - m.len());
    out.push_str(&word[..m.start()]);
    out.push_str(&word[m.end()..]);
    Some(out)
}

/// A reduplicated word contains a hyphen outside its trailing suffix.
pub(crate) fn is_plural(word: &str) -> bool {
    match word.rsplit_once('-') {
        Some((head, tail)) if PLURAL_SUFFIXES.contains(&tail) => head.contains('-'),
        Some(_) => true,
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn particle_and_possessive() {
        assert_eq!(strip(&PARTICLE, "bukanlah").as_deref(), Some("bukan"));
        assert_eq!(strip(&PARTICLE, "apa-kah").as_deref(), Some("apa"));
        assert_eq!(strip(&POSSESSIVE, "bukunya").as_deref(), Some("buku"));
        assert_eq!(strip(&POSSESSIVE, "rumahku").as_deref(), Some("rumah"));
        assert_eq!(strip(&POSSESSIVE, "makan"), None);
    }

    #[test]
    fn derivational_suffix_prefers_longest() {
        assert_eq!(strip(&DERIVATIONAL_SUFFIX, "luncurkan").as_deref(), Some("luncur"));
        assert_eq!(strip(&DERIVATIONAL_SUFFIX, "modernisasi").as_deref(), Some("modern"));
        assert_eq!(strip(&DERIVATIONAL_SUFFIX, "nasionalisme").as_deref(), Some("nasional"));
        assert_eq!(strip(&DERIVATIONAL_SUFFIX, "sukai").as_deref(), Some("suka"));
        assert_eq!(strip(&DERIVATIONAL_SUFFIX, "mobil"), None);
    }

    #[test]
    fn plain_prefix() {
        assert_eq!(strip(&PLAIN_PREFIX, "dimakan").as_deref(), Some("makan"));
        assert_eq!(strip(&PLAIN_PREFIX, "kedua").as_deref(), Some("dua"));
        assert_eq!(strip(&PLAIN_PREFIX, "sebuah").as_deref(), Some("buah"));
        assert_eq!(strip(&PLAIN_PREFIX, "makan"), None);
    }

    #[test]
    fn precedence_adjustment() {
        assert!(prefix_first("menyukai"));
        assert!(prefix_first("bersamaan"));
        assert!(prefix_first("terlalui"));
        assert!(!prefix_first("dimakan"));
        assert!(!prefix_first("perekonomian"));
    }

    #[test]
    fn short_words() {
        assert!(is_short_word("dia"));
        assert!(!is_short_word("buku"));
    }

    #[test]
    fn plural_detection() {
        assert!(is_plural("kata-kata"));
        assert!(is_plural("malaikat-malaikat-nya"));
        assert!(!is_plural("apa-kah"));
        assert!(!is_plural("mobil"));
    }
}
