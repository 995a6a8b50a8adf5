//! Derivational prefix disambiguation rules.
//!
//! Each group covers one prefix shape (`ber-V`, `meny-V`, infix `-er-`, ...)
//! and lists its candidate readings in the order they are tried. A group
//! keeps the first candidate that is a dictionary root; if none is, it keeps
//! the last candidate produced.

use once_cell::sync::Lazy;
use regex::Regex;

#[derive(Debug, Clone, Copy)]
enum Guard {
    Always,
    /// The given capture group must not start with `er`.
    NotEr(usize),
}

#[derive(Debug)]
pub(crate) struct Rule {
    pattern: Regex,
    template: &'static str,
    guard: Guard,
}

impl Rule {
    fn new(pattern: &str, template: &'static str, guard: Guard) -> Self {
        Self {
            pattern: Regex::new(pattern).expect("valid disambiguation pattern"),
            template,
            guard,
        }
    }

    /// Returns the recoded root candidate, or `None` when the rule does not apply.
    pub(crate) fn apply(&self, word: &str) -> Option<String> {
        let caps = self.pattern.captures(word)?;
        if let Guard::NotEr(group) = self.guard {
            if caps.get(group).is_some_and(|m| m.as_str().starts_with("er")) {
                return None;
            }
        }
        let mut out = String::with_capacity(word.len());
        caps.expand(self.template, &mut out);
        Some(out)
    }
}

#[derive(Debug)]
pub(crate) struct RuleGroup {
    pub(crate) name: &'static str,
    pub(crate) rules: Vec<Rule>,
}

fn group(name: &'static str, specs: &[(&str, &'static str, Guard)]) -> RuleGroup {
    RuleGroup {
        name,
        rules: specs
            .iter()
            .map(|&(pattern, template, guard)| Rule::new(pattern, template, guard))
            .collect(),
    }
}

use Guard::{Always, NotEr};

/// All groups, in the order they are tried.
pub(crate) static DISAMBIGUATORS: Lazy<Vec<RuleGroup>> = Lazy::new(|| {
    vec![
        // ber-
        group("1", &[
            (r"^ber([aiueo].*)$", "${1}", Always),
            (r"^ber([aiueo].*)$", "r${1}", Always),
        ]),
        group("2", &[(r"^ber([bcdfghjklmnpqstvwxyz])([a-z])(.*)$", "${1}${2}${3}", NotEr(3))]),
        group("3", &[(r"^ber([bcdfghjklmnpqstvwxyz])([a-z])er([aiueo])(.*)$", "${1}${2}er${3}${4}", Always)]),
        group("4", &[(r"^belajar$", "ajar", Always)]),
        group("5", &[(r"^be([bcdfghjklmnpqstvwxyz])(er[bcdfghjklmnpqrstvwxyz])(.*)$", "${1}${2}${3}", Always)]),
        // ter-
        group("6", &[
            (r"^ter([aiueo].*)$", "${1}", Always),
            (r"^ter([aiueo].*)$", "r${1}", Always),
        ]),
        group("7", &[(r"^ter([bcdfghjklmnpqstvwxyz])er([aiueo].*)$", "${1}er${2}", Always)]),
        group("8", &[(r"^ter([bcdfghjklmnpqstvwxyz])(.*)$", "${1}${2}", NotEr(2))]),
        group("9", &[(r"^te([bcdfghjklmnpqstvwxyz])er([bcdfghjklmnpqrstvwxyz])(.*)$", "${1}er${2}${3}", Always)]),
        // me-
        group("10", &[(r"^me([lrwy])([aiueo])(.*)$", "${1}${2}${3}", Always)]),
        group("11", &[(r"^mem([bfv])(.*)$", "${1}${2}", Always)]),
        group("12", &[(r"^mempe(.*)$", "pe${1}", Always)]),
        group("13", &[
            (r"^mem([aiueo])(.*)$", "m${1}${2}", Always),
            (r"^mem([aiueo])(.*)$", "p${1}${2}", Always),
        ]),
        group("14", &[(r"^men([cdjstz])(.*)$", "${1}${2}", Always)]),
        group("15", &[
            (r"^men([aiueo])(.*)$", "n${1}${2}", Always),
            (r"^men([aiueo])(.*)$", "t${1}${2}", Always),
        ]),
        group("16", &[(r"^meng([ghqk])(.*)$", "${1}${2}", Always)]),
        group("17", &[
            (r"^meng([aiueo])(.*)$", "${1}${2}", Always),
            (r"^meng([aiueo])(.*)$", "k${1}${2}", Always),
            (r"^menge(.*)$", "${1}", Always),
            (r"^meng([aiueo])(.*)$", "ng${1}${2}", Always),
        ]),
        group("18", &[
            (r"^meny([aiueo])(.*)$", "ny${1}${2}", Always),
            (r"^meny([aiueo])(.*)$", "s${1}${2}", Always),
        ]),
        group("19", &[(r"^memp([abcdfghijklmopqrstuvwxyz])(.*)$", "p${1}${2}", Always)]),
        // pe-
        group("20", &[(r"^pe([wy])([aiueo])(.*)$", "${1}${2}${3}", Always)]),
        group("21", &[
            (r"^per([aiueo])(.*)$", "${1}${2}", Always),
            (r"^per([aiueo])(.*)$", "r${1}${2}", Always),
        ]),
        group("23", &[(r"^per([bcdfghjklmnpqstvwxyz])([a-z])(.*)$", "${1}${2}${3}", NotEr(3))]),
        group("24", &[(r"^per([bcdfghjklmnpqstvwxyz])([a-z])er([aiueo])(.*)$", "${1}${2}er${3}${4}", Always)]),
        group("25", &[(r"^pem([bfv])(.*)$", "${1}${2}", Always)]),
        group("26", &[
            (r"^pem([aiueo])(.*)$", "m${1}${2}", Always),
            (r"^pem([aiueo])(.*)$", "p${1}${2}", Always),
        ]),
        group("27", &[(r"^pen([cdjstz])(.*)$", "${1}${2}", Always)]),
        group("28", &[
            (r"^pen([aiueo])(.*)$", "n${1}${2}", Always),
            (r"^pen([aiueo])(.*)$", "t${1}${2}", Always),
        ]),
        group("29", &[(r"^peng([bcdfghjklmnpqrstvwxyz])(.*)$", "${1}${2}", Always)]),
        group("30", &[
            (r"^peng([aiueo])(.*)$", "${1}${2}", Always),
            (r"^peng([aiueo])(.*)$", "k${1}${2}", Always),
            (r"^penge(.*)$", "${1}", Always),
        ]),
        group("31", &[
            (r"^peny([aiueo])(.*)$", "s${1}${2}", Always),
            (r"^peny([aiueo])(.*)$", "ny${1}${2}", Always),
        ]),
        group("32", &[
            (r"^pelajar$", "ajar", Always),
            (r"^pe(l[aiueo])(.*)$", "${1}${2}", Always),
        ]),
        group("34", &[(r"^pe([bcdfghjkpqstvxz])(.*)$", "${1}${2}", NotEr(2))]),
        group("35", &[(r"^ter([bcdfghjkpqstvxz])(er[bcdfghjklmnpqrstvwxyz])(.*)$", "${1}${2}${3}", Always)]),
        group("36", &[(r"^pe([bcdfghjkpqstvxz])(er[bcdfghjklmnpqrstvwxyz])(.*)$", "${1}${2}${3}", Always)]),
        // infixes
        group("37", &[
            (r"^([bcdfghjklmnpqrstvwxyz])(er)([aiueo])(.*)$", "${1}${2}${3}${4}", Always),
            (r"^([bcdfghjklmnpqrstvwxyz])(er)([aiueo])(.*)$", "${1}${3}${4}", Always),
        ]),
        group("38", &[
            (r"^([bcdfghjklmnpqrstvwxyz])(el)([aiueo])(.*)$", "${1}${2}${3}${4}", Always),
            (r"^([bcdfghjklmnpqrstvwxyz])(el)([aiueo])(.*)$", "${1}${3}${4}", Always),
        ]),
        group("39", &[
            (r"^([bcdfghjklmnpqrstvwxyz])(em)([aiueo])(.*)$", "${1}${2}${3}${4}", Always),
            (r"^([bcdfghjklmnpqrstvwxyz])(em)([aiueo])(.*)$", "${1}${3}${4}", Always),
        ]),
        group("40", &[
            (r"^([bcdfghjklmnpqrstvwxyz])(in)([aiueo])(.*)$", "${1}${2}${3}${4}", Always),
            (r"^([bcdfghjklmnpqrstvwxyz])(in)([aiueo])(.*)$", "${1}${3}${4}", Always),
        ]),
        // pronoun prefixes
        group("41", &[(r"^kau(.*)$", "${1}", Always)]),
        group("42", &[(r"^ku(.*)$", "${1}", Always)]),
    ]
});
