//! String collation for key sorts

use std::cmp::Ordering;

use deunicode::deunicode;
use serde::{Deserialize, Serialize};

/// How strings are ordered against each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Collation {
    /// Human ordering: accents and case are ignored on the first pass, then
    /// unaccented before accented, then lowercase before uppercase.
    #[default]
    Locale,
    /// Raw byte order.
    Binary,
}

impl Collation {
    /// Compares two strings under this collation.
    pub fn compare(self, a: &str, b: &str) -> Ordering {
        match self {
            Collation::Binary => a.cmp(b),
            Collation::Locale => locale_compare(a, b),
        }
    }
}

fn locale_compare(a: &str, b: &str) -> Ordering {
    fold(a)
        .cmp(&fold(b))
        .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
        .then_with(|| {
            a.chars()
                .map(char::is_uppercase)
                .cmp(b.chars().map(char::is_uppercase))
        })
        .then_with(|| a.cmp(b))
}

fn fold(s: &str) -> String {
    deunicode(s).to_lowercase()
}
