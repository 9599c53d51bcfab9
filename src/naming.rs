//! Display-name normalization: the browse bucket letter and the `vod_en` slug.

use std::collections::HashMap;

/// Fallback bucket for names that do not start with a Latin letter.
pub const FALLBACK_LETTER: char = 'X';

const BUILTIN_ROMANIZATION: &[(char, &str)] = &[
    ('自', "zi"),
    ('己', "ji"),
    ('搞', "gao"),
    ('血', "xue"),
    ('谜', "mi"),
    ('拼', "pin"),
    ('图', "tu"),
    ('我', "wo"),
    ('推', "tui"),
];

/// Single uppercase ASCII letter used for alphabetical browsing, `X` when there is none.
pub fn bucket_letter(name: &str) -> char {
    name.trim()
        .chars()
        .next()
        .and_then(|c| c.to_uppercase().next())
        .filter(char::is_ascii_uppercase)
        .unwrap_or(FALLBACK_LETTER)
}

/// Turns a display name into a latin slug. Output is cosmetic and need not be unique.
pub trait Transliterator: Send + Sync {
    fn transliterate(&self, name: &str) -> String;
}

/// Lookup keyed on the first character of the name.
#[derive(Debug, Clone)]
pub struct TableTransliterator {
    table: HashMap<char, String>,
}

impl Default for TableTransliterator {
    fn default() -> Self {
        let table = BUILTIN_ROMANIZATION
            .iter()
            .map(|(c, roman)| (*c, roman.to_string()))
            .collect();
        Self { table }
    }
}

impl TableTransliterator {
    /// Builtin table extended (or overridden) by `extra`. Keys longer than one char use
    /// their first char; empty keys are skipped.
    pub fn with_entries<'a>(extra: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut t = Self::default();
        for (key, roman) in extra {
            if let Some(c) = key.chars().next() {
                t.table.insert(c, roman.trim().to_ascii_lowercase());
            }
        }
        t
    }

    /// Number of first-character entries.
    pub(crate) fn len(&self) -> usize {
        self.table.len()
    }
}

impl Transliterator for TableTransliterator {
    fn transliterate(&self, name: &str) -> String {
        let text = name.trim();
        let mut chars = text.chars();
        let Some(first) = chars.next() else {
            return String::new();
        };
        if let Some(roman) = self.table.get(&first) {
            return format!("{}{}", roman, strip_whitespace(chars.as_str()));
        }
        if first.is_ascii_alphabetic() {
            return strip_whitespace(&text.to_lowercase());
        }
        let sanitized: String = text
            .chars()
            .filter(char::is_ascii_alphanumeric)
            .map(|c| c.to_ascii_lowercase())
            .collect();
        format!("x{}", sanitized)
    }
}

fn strip_whitespace(s: &str) -> String {
    s.chars().filter(|c| !c.is_whitespace()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bucket_is_always_one_uppercase_ascii_letter() {
        let samples = [
            "", "   ", "alpha", "Zeta", "自己", "9 songs", "émile", "ßeta", "  omega", "🎬 film",
            "ıstanbul",
        ];
        for name in samples {
            let letter = bucket_letter(name);
            assert!(letter.is_ascii_uppercase(), "{name:?} -> {letter:?}");
        }
    }

    #[test]
    fn bucket_uppercases_latin_and_falls_back_otherwise() {
        assert_eq!(bucket_letter("avatar"), 'A');
        assert_eq!(bucket_letter("Matrix"), 'M');
        assert_eq!(bucket_letter("我的"), 'X');
        assert_eq!(bucket_letter("2046"), 'X');
        assert_eq!(bucket_letter(""), 'X');
        // dotless i upper-cases to ASCII 'I'
        assert_eq!(bucket_letter("ıs"), 'I');
    }

    #[test]
    fn table_hit_keeps_remainder_without_whitespace() {
        let t = TableTransliterator::default();
        assert_eq!(t.transliterate("自己 搞 定"), "zi己搞定");
        assert_eq!(t.transliterate("推 理"), "tui理");
    }

    #[test]
    fn latin_names_lowercase_without_whitespace() {
        let t = TableTransliterator::default();
        assert_eq!(t.transliterate("The Dark Knight"), "thedarkknight");
    }

    #[test]
    fn unknown_leading_char_gets_placeholder_slug() {
        let t = TableTransliterator::default();
        assert_eq!(t.transliterate("长安 2 Season"), "x2season");
        assert_eq!(t.transliterate("1917"), "x1917");
        assert_eq!(t.transliterate(""), "");
    }

    #[test]
    fn extra_entries_extend_and_override() {
        let t = TableTransliterator::with_entries([("长", "Chang"), ("自", "zii"), ("", "nope")]);
        assert_eq!(t.len(), BUILTIN_ROMANIZATION.len() + 1);
        assert_eq!(t.transliterate("长安"), "chang安");
        assert_eq!(t.transliterate("自"), "zii");
    }
}
