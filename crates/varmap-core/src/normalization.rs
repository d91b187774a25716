//! Label normalization for comparison
//!
//! - Unicode NFKD, combining marks dropped
//! - Case folded to lowercase
//! - Punctuation and whitespace runs collapsed to single spaces
//!   (decimal points inside numbers such as `1.5` survive, `+` is a token)
//! - Abbreviations expanded through an [`AbbreviationTable`]
//!
//! Normalization is total: any input, including empty or garbage strings,
//! produces a valid (possibly empty) [`NormalizedLabel`].

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

use crate::abbreviation::AbbreviationTable;

/// Comparable form of a label: the ordered canonical string plus its token set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NormalizedLabel {
    /// Tokens joined by single spaces, in label order
    pub canonical: String,
    /// Distinct tokens, order-irrelevant
    pub tokens: BTreeSet<String>,
}

impl NormalizedLabel {
    fn from_tokens(tokens: Vec<String>) -> Self {
        let canonical = tokens.join(" ");
        let tokens = tokens.into_iter().collect();
        Self { canonical, tokens }
    }

    /// True when the label normalized to nothing.
    pub fn is_empty(&self) -> bool {
        self.canonical.is_empty()
    }
}

/// Normalizer bound to one abbreviation table.
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    abbreviations: AbbreviationTable,
}

impl Normalizer {
    pub fn new(abbreviations: AbbreviationTable) -> Self {
        Self { abbreviations }
    }

    /// Normalizer that only folds case and punctuation.
    pub fn without_abbreviations() -> Self {
        Self::new(AbbreviationTable::empty())
    }

    pub fn abbreviations(&self) -> &AbbreviationTable {
        &self.abbreviations
    }

    pub fn normalize(&self, label: &str) -> NormalizedLabel {
        let tokens = self.abbreviations.expand(split_tokens(label));
        NormalizedLabel::from_tokens(tokens)
    }
}

/// Normalize a label with an explicit abbreviation table.
pub fn normalize(label: &str, abbreviations: &AbbreviationTable) -> NormalizedLabel {
    NormalizedLabel::from_tokens(abbreviations.expand(split_tokens(label)))
}

/// Case-fold a label and split it into tokens (no abbreviation expansion).
pub(crate) fn split_tokens(label: &str) -> Vec<String> {
    let folded: Vec<char> = label
        .nfkd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect();

    let mut tokens = Vec::new();
    let mut current = String::new();

    for (i, &c) in folded.iter().enumerate() {
        if c.is_alphanumeric() {
            current.push(c);
        } else if c == '.' && is_decimal_point(&folded, i) {
            current.push(c);
        } else {
            flush(&mut current, &mut tokens);
            if c == '+' {
                tokens.push("+".to_string());
            }
        }
    }
    flush(&mut current, &mut tokens);

    tokens
}

fn is_decimal_point(chars: &[char], i: usize) -> bool {
    i > 0
        && chars[i - 1].is_ascii_digit()
        && chars.get(i + 1).is_some_and(|c| c.is_ascii_digit())
}

fn flush(current: &mut String, tokens: &mut Vec<String>) {
    if !current.is_empty() {
        tokens.push(std::mem::take(current));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(label: &str) -> String {
        Normalizer::without_abbreviations().normalize(label).canonical
    }

    fn automotive(label: &str) -> String {
        Normalizer::default().normalize(label).canonical
    }

    #[test]
    fn test_case_and_whitespace() {
        assert_eq!(plain("N LINE  N10   1.5 TURBO MT"), "n line n10 1.5 turbo mt");
        assert_eq!(plain("  Asta\t(O) "), "asta o");
    }

    #[test]
    fn test_punctuation_runs_collapse() {
        assert_eq!(plain("XYZ_NOT_PRESENT"), "xyz not present");
        assert_eq!(plain("Zeta -- / Dual-Tone"), "zeta dual tone");
        assert_eq!(plain("1.2 l."), "1.2 l");
        assert_eq!(plain("v1..2"), "v1 2");
    }

    #[test]
    fn test_plus_is_a_token() {
        assert_eq!(plain("S+ AMT"), "s + amt");
        assert_eq!(automotive("S+ AMT"), "s plus amt");
    }

    #[test]
    fn test_diacritics_removed() {
        assert_eq!(plain("Édition Spéciale"), "edition speciale");
    }

    #[test]
    fn test_abbreviations_expanded() {
        assert_eq!(automotive("Zeta DT"), "zeta dual tone");
        assert_eq!(automotive("Asta (O)"), "asta opt");
        assert_eq!(automotive("CNG Duo"), "cng");
        assert_eq!(automotive("Smart Hy-CNG"), "smart cng");
        assert_eq!(automotive("Dark Edition AMT"), "dark amt");
    }

    #[test]
    fn test_empty_and_garbage() {
        let normalizer = Normalizer::default();
        let empty = normalizer.normalize("");
        assert!(empty.is_empty());
        assert!(empty.tokens.is_empty());
        assert!(normalizer.normalize("  --//()  ").is_empty());
    }

    #[test]
    fn test_token_set_is_order_free() {
        let normalizer = Normalizer::without_abbreviations();
        let a = normalizer.normalize("Turbo MT Smart");
        let b = normalizer.normalize("smart turbo mt");
        assert_eq!(a.tokens, b.tokens);
        assert_ne!(a.canonical, b.canonical);
    }

    #[test]
    fn test_free_function_matches_normalizer() {
        let table = AbbreviationTable::automotive();
        assert_eq!(
            normalize("Knight Edition DCT", &table),
            Normalizer::new(table.clone()).normalize("Knight Edition DCT")
        );
    }
}
