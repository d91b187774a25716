//! Abbreviation tables (shorthand → canonical tokens).
//!
//! Keys and expansions are stored in token form, after the same case folding
//! and punctuation handling the normalizer applies to labels. That makes
//! `"(O)"`, `"o"` and `" O "` the same key, and `"Hy-CNG"` the same as
//! `"hy cng"`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::normalization::split_tokens;

/// A mapping from abbreviation phrases to their canonical expansion.
///
/// Serializes as a flat `{ "abbreviation": "expansion" }` map so tables can
/// live in TOML or JSON files next to the data they describe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<String, String>", into = "BTreeMap<String, String>")]
pub struct AbbreviationTable {
    entries: BTreeMap<Vec<String>, Vec<String>>,
    longest_key: usize,
}

impl Default for AbbreviationTable {
    fn default() -> Self {
        Self::automotive()
    }
}

impl AbbreviationTable {
    /// Create an empty table (no expansion at all).
    pub fn empty() -> Self {
        Self {
            entries: BTreeMap::new(),
            longest_key: 0,
        }
    }

    /// The built-in table for automotive variant names.
    pub fn automotive() -> Self {
        let pairs = [
            ("dt", "dual tone"),
            ("o", "opt"),
            ("optional", "opt"),
            ("pro pack", "opt"),
            ("automated manual transmission", "amt"),
            ("auto manual", "amt"),
            ("manual", "mt"),
            ("automatic", "at"),
            ("dual clutch", "dct"),
            ("hy cng", "cng"),
            ("cng duo", "cng"),
            ("hy cng duo", "cng"),
            ("dual cng", "cng"),
            ("icng", "cng"),
            ("turbocharged", "turbo"),
            ("knight edition", "knight"),
            ("dark edition", "dark"),
            ("electric", "ev"),
            ("+", "plus"),
        ];

        let mut table = Self::empty();
        for (abbrev, expansion) in pairs {
            table.insert(abbrev, expansion);
        }
        table
    }

    /// Add (or replace) an abbreviation.
    ///
    /// Keys that normalize to nothing are ignored.
    pub fn insert(&mut self, abbrev: &str, expansion: &str) {
        let key = split_tokens(abbrev);
        if key.is_empty() {
            return;
        }
        self.longest_key = self.longest_key.max(key.len());
        self.entries.insert(key, split_tokens(expansion));
    }

    /// Remove an abbreviation, returning its expansion.
    pub fn remove(&mut self, abbrev: &str) -> Option<String> {
        let removed = self.entries.remove(&split_tokens(abbrev))?;
        self.longest_key = self.entries.keys().map(Vec::len).max().unwrap_or(0);
        Some(removed.join(" "))
    }

    /// Look up the expansion for an abbreviation.
    pub fn lookup(&self, abbrev: &str) -> Option<String> {
        self.entries
            .get(&split_tokens(abbrev))
            .map(|tokens| tokens.join(" "))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over `(abbreviation, expansion)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (String, String)> + '_ {
        self.entries
            .iter()
            .map(|(key, expansion)| (key.join(" "), expansion.join(" ")))
    }

    /// Replace abbreviations in a token sequence.
    ///
    /// Scans left to right, trying the longest phrase first at each
    /// position. Expanded tokens are never re-scanned.
    pub(crate) fn expand(&self, tokens: Vec<String>) -> Vec<String> {
        if self.entries.is_empty() {
            return tokens;
        }

        let mut expanded = Vec::with_capacity(tokens.len());
        let mut pos = 0;
        while pos < tokens.len() {
            let max_len = self.longest_key.min(tokens.len() - pos);
            let hit = (1..=max_len).rev().find_map(|len| {
                self.entries
                    .get(&tokens[pos..pos + len])
                    .map(|expansion| (len, expansion))
            });

            match hit {
                Some((len, expansion)) => {
                    expanded.extend(expansion.iter().cloned());
                    pos += len;
                }
                None => {
                    expanded.push(tokens[pos].clone());
                    pos += 1;
                }
            }
        }
        expanded
    }
}

impl From<BTreeMap<String, String>> for AbbreviationTable {
    fn from(map: BTreeMap<String, String>) -> Self {
        let mut table = Self::empty();
        for (abbrev, expansion) in &map {
            table.insert(abbrev, expansion);
        }
        table
    }
}

impl From<AbbreviationTable> for BTreeMap<String, String> {
    fn from(table: AbbreviationTable) -> Self {
        table.iter().collect()
    }
}

impl<'a> FromIterator<(&'a str, &'a str)> for AbbreviationTable {
    fn from_iter<I: IntoIterator<Item = (&'a str, &'a str)>>(iter: I) -> Self {
        let mut table = Self::empty();
        for (abbrev, expansion) in iter {
            table.insert(abbrev, expansion);
        }
        table
    }
}
