//! Confix-stripping state machine for a single word.

use smallvec::SmallVec;

use super::affix::{self, DERIVATIONAL_SUFFIX, PARTICLE, PLAIN_PREFIX, POSSESSIVE};
use super::dictionary::RootDictionary;
use super::rules::{RuleGroup, DISAMBIGUATORS};

/// Rounds of prefix removal per attempt.
const PREFIX_ROUNDS: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AffixKind {
    Particle,
    Possessive,
    DerivationalSuffix,
    DerivationalPrefix,
}

#[derive(Debug, Clone)]
struct Removal {
    kind: AffixKind,
    /// Word before the removal.
    subject: String,
    /// Word after the removal.
    result: String,
}

impl Removal {
    fn removed_suffix(&self) -> Option<&str> {
        self.subject.strip_prefix(self.result.as_str())
    }
}

pub(crate) struct Context<'d> {
    dictionary: &'d RootDictionary,
    original: &'d str,
    current: String,
    removals: SmallVec<[Removal; 6]>,
}

impl<'d> Context<'d> {
    pub(crate) fn new(dictionary: &'d RootDictionary, word: &'d str) -> Self {
        Self {
            dictionary,
            original: word,
            current: word.to_owned(),
            removals: SmallVec::new(),
        }
    }

    /// Runs the full process and returns the root, or the original word
    /// when no dictionary root was reached.
    pub(crate) fn stem(mut self) -> String {
        self.run();
        if self.in_dictionary() {
            self.current
        } else {
            self.original.to_owned()
        }
    }

    #[inline]
    fn in_dictionary(&self) -> bool {
        self.dictionary.contains(&self.current)
    }

    fn run(&mut self) {
        if self.in_dictionary() || affix::is_short_word(&self.current) {
            return;
        }

        if affix::prefix_first(self.original) {
            self.remove_prefixes();
            if self.in_dictionary() {
                return;
            }
            self.remove_suffixes();
            if self.in_dictionary() {
                return;
            }
            self.current = self.original.to_owned();
            self.removals.clear();
        }

        self.remove_suffixes();
        if self.in_dictionary() {
            return;
        }

        self.remove_prefixes();
        if self.in_dictionary() {
            return;
        }

        self.restore_suffixes();
    }

    fn record(&mut self, kind: AffixKind, result: String) {
        tracing::trace!(?kind, from = %self.current, to = %result, "affix removed");
        let subject = std::mem::replace(&mut self.current, result.clone());
        self.removals.push(Removal {
            kind,
            subject,
            result,
        });
    }

    fn remove_suffixes(&mut self) {
        let steps = [
            (AffixKind::Particle, &*PARTICLE),
            (AffixKind::Possessive, &*POSSESSIVE),
            (AffixKind::DerivationalSuffix, &*DERIVATIONAL_SUFFIX),
        ];
        for (kind, pattern) in steps {
            if let Some(result) = affix::strip(pattern, &self.current) {
                self.record(kind, result);
            }
            if self.in_dictionary() {
                return;
            }
        }
    }

    fn remove_prefixes(&mut self) {
        for _ in 0..PREFIX_ROUNDS {
            self.remove_one_prefix();
            if self.in_dictionary() {
                return;
            }
        }
    }

    /// Tries the plain prefixes, then each rule group, stopping at the
    /// first one that removes something.
    fn remove_one_prefix(&mut self) {
        let before = self.removals.len();

        if let Some(result) = affix::strip(&PLAIN_PREFIX, &self.current) {
            self.record(AffixKind::DerivationalPrefix, result);
        }
        if self.in_dictionary() || self.removals.len() > before {
            return;
        }

        for group in DISAMBIGUATORS.iter() {
            self.disambiguate(group);
            if self.in_dictionary() || self.removals.len() > before {
                return;
            }
        }
    }

    fn disambiguate(&mut self, group: &RuleGroup) {
        let mut chosen = None;
        for rule in &group.rules {
            chosen = rule.apply(&self.current);
            if chosen.as_deref().is_some_and(|c| self.dictionary.contains(c)) {
                break;
            }
        }

        if let Some(result) = chosen {
            if result != self.current {
                tracing::trace!(rule = group.name, "prefix rule matched");
                self.record(AffixKind::DerivationalPrefix, result);
            }
        }
    }

    /// Puts removed suffixes back one at a time and retries prefix removal.
    fn restore_suffixes(&mut self) {
        if let Some(first) = self
            .removals
            .iter()
            .find(|r| r.kind == AffixKind::DerivationalPrefix)
        {
            self.current = first.subject.clone();
        }
        self.removals
            .retain(|r| r.kind != AffixKind::DerivationalPrefix);

        let removals = self.removals.clone();
        let current = self.current.clone();

        for removal in removals.iter().rev() {
            if removal.removed_suffix() == Some("kan") {
                self.current = format!("{}k", removal.result);
                self.remove_prefixes();
                if self.in_dictionary() {
                    return;
                }
                self.current = format!("{}kan", removal.result);
            } else {
                self.current = removal.subject.clone();
            }

            self.remove_prefixes();
            if self.in_dictionary() {
                return;
            }

            self.removals = removals.clone();
            self.current = current.clone();
        }
    }
}
