use std::str;

/// Byte classes for the ASCII fast path.
#[derive(Clone, Copy, PartialEq, Eq)]
enum AsciiClass {
    Keep,
    Upper,
    Digit,
    Punct,
    Space,
}

const fn build_ascii_classes() -> [AsciiClass; 128] {
    let mut table = [AsciiClass::Keep; 128];
    let mut b = 0usize;
    while b < 128 {
        let byte = b as u8;
        table[b] = if byte.is_ascii_uppercase() {
            AsciiClass::Upper
        } else if byte.is_ascii_digit() {
            AsciiClass::Digit
        } else if byte.is_ascii_punctuation() {
            AsciiClass::Punct
        } else if matches!(byte, b' ' | b'\t' | b'\n' | b'\r' | 0x0b | 0x0c) {
            AsciiClass::Space
        } else {
            AsciiClass::Keep
        };
        b += 1;
    }
    table
}

static ASCII_CLASSES: [AsciiClass; 128] = build_ascii_classes();

/// Configuration options for text normalization.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Deserialize)]
#[serde(default)]
pub struct NormalizerConfig {
    /// When enabled, strips diacritical marks from Latin characters.
    /// For example, "café" becomes "cafe".
    pub strip_diacritics: bool,
}

/// Unicode text normalizer for the classification pipeline.
///
/// Performs, in this order:
/// - Converts all characters to lowercase (Unicode-aware)
/// - Removes decimal digits (ASCII and other Unicode numerics)
/// - Removes ASCII punctuation
/// - Turns non-ASCII punctuation (dashes, ellipses, curly quotes) into spaces
/// - Collapses whitespace runs into single spaces and trims both ends
///
/// Digits and ASCII punctuation leave no gap, so `"mobil-listrik"` becomes
/// `"mobillistrik"`, while `"Jakarta—Presiden"` becomes `"jakarta presiden"`.
///
/// # Examples
///
/// ```
/// use warta_core::analyzer::normalizer::TextNormalizer;
///
/// let normalizer = TextNormalizer::default();
/// assert_eq!(normalizer.normalize("Mobil123!!  Listrik"), "mobil listrik");
/// ```
#[derive(Debug, Clone, Default)]
pub struct TextNormalizer {
    config: NormalizerConfig,
}

impl TextNormalizer {
    /// Creates a new normalizer with the specified configuration.
    pub fn new(config: NormalizerConfig) -> Self {
        Self { config }
    }

    /// Normalizes text into an existing String buffer.
    ///
    /// Reuses the buffer's capacity if sufficient, growing only when necessary.
    /// Clears the buffer before writing.
    #[inline]
    pub fn normalize_into(&self, input: &str, out: &mut String) {
        out.clear();
        out.reserve(input.len());

        let strip = self.config.strip_diacritics;
        let bytes = input.as_bytes();
        let mut prev_space = true;
        let mut i = 0usize;

        while i < bytes.len() {
            let b = bytes[i];
            if b < 128 {
                match ASCII_CLASSES[b as usize] {
                    AsciiClass::Keep => {
                        out.push(b as char);
                        prev_space = false;
                    }
                    AsciiClass::Upper => {
                        out.push(b.to_ascii_lowercase() as char);
                        prev_space = false;
                    }
                    AsciiClass::Space => {
                        if !prev_space {
                            out.push(' ');
                            prev_space = true;
                        }
                    }
                    AsciiClass::Digit | AsciiClass::Punct => {}
                }
                i += 1;
                continue;
            }

            // Non-ASCII: `i` always sits on a char boundary here because
            // ASCII bytes never occur inside a multi-byte sequence.
            let Some(ch) = input[i..].chars().next() else {
                break;
            };
            i += ch.len_utf8();

            if ch.is_whitespace() || is_punctuation(ch) {
                if !prev_space {
                    out.push(' ');
                    prev_space = true;
                }
                continue;
            }
            if ch.is_numeric() {
                continue;
            }

            for lowered in ch.to_lowercase() {
                let folded = if strip { fold_latin1(lowered) } else { lowered };
                if folded == '\0' && strip {
                    continue;
                }
                out.push(folded);
                prev_space = false;
            }
        }

        if out.ends_with(' ') {
            out.pop();
        }
    }

    /// Normalizes text and returns a new String.
    #[inline]
    pub fn normalize(&self, input: &str) -> String {
        let mut out = String::with_capacity(input.len());
        self.normalize_into(input, &mut out);
        out
    }
}

/// Non-ASCII punctuation: Latin-1 marks, General Punctuation, CJK brackets.
/// These separate words instead of vanishing.
#[inline(always)]
fn is_punctuation(c: char) -> bool {
    matches!(
        c,
        '¡' | '§' | '«' | '¶' | '·' | '»' | '¿'
            | '\u{2010}'..='\u{2027}'
            | '\u{2030}'..='\u{205E}'
            | '\u{3001}'..='\u{3003}'
            | '\u{3008}'..='\u{3011}'
            | '\u{FF01}'..='\u{FF0F}'
    )
}

#[inline(always)]
fn fold_latin1(c: char) -> char {
    if ('\u{0300}'..='\u{036F}').contains(&c) {
        return '\0';
    }

    match c {
        'á' | 'à' | 'â' | 'ä' | 'ã' | 'å' | 'ā' | 'ă' | 'ą' => 'a',
        'ç' | 'ć' | 'č' | 'ĉ' | 'ċ' => 'c',
        'ð' | 'đ' => 'd',
        'é' | 'è' | 'ê' | 'ë' | 'ē' | 'ĕ' | 'ė' | 'ę' | 'ě' => 'e',
        'í' | 'ì' | 'î' | 'ï' | 'ī' | 'ĭ' | 'į' | 'ı' => 'i',
        'ñ' | 'ń' | 'ň' | 'ņ' => 'n',
        'ó' | 'ò' | 'ô' | 'ö' | 'õ' | 'ō' | 'ŏ' | 'ő' => 'o',
        'ú' | 'ù' | 'û' | 'ü' | 'ū' | 'ŭ' | 'ů' | 'ű' | 'ų' => 'u',
        'ý' | 'ÿ' => 'y',
        'ś' | 'š' | 'ş' => 's',
        'ź' | 'ž' | 'ż' => 'z',
        'ß' => 's',
        'ł' => 'l',
        'æ' => 'a',
        'œ' => 'o',
        _ => c,
    }
}
