//! Alternate display formats for catalog numbers.
//!
//! Australian 1300/1800-style numbers are ten flat digits; the sites show
//! them space-grouped three different ways, plus a word alias ("1300 FLOWERS")
//! when the catalog carries one.

use std::sync::LazyLock;

use regex::Regex;

static GROUP_4_6: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{4})(\d{6})$").expect("valid pattern"));
static GROUP_4_3_3: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{4})(\d{3})(\d{3})$").expect("valid pattern"));
static GROUP_4_2_2_2: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{4})(\d{2})(\d{2})(\d{2})$").expect("valid pattern"));

/// Alternate renderings of one catalog number.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AltFormats {
    /// `1300 123456`
    pub spaced: String,

    /// `1300 123 456`
    pub triplets: String,

    /// `1300 12 34 56`
    pub pairs: String,

    /// Word alias when the catalog has one, otherwise the pair grouping.
    pub display: String,
}

impl AltFormats {
    /// Derive every format for a flat digit string. Inputs that do not
    /// match a pattern pass through unchanged.
    pub fn derive(number: &str, word: Option<&str>) -> Self {
        let pairs = GROUP_4_2_2_2.replace(number, "$1 $2 $3 $4").into_owned();
        let display = match word {
            Some(word) if !word.is_empty() => word.to_string(),
            _ => pairs.clone(),
        };

        Self {
            spaced: GROUP_4_6.replace(number, "$1 $2").into_owned(),
            triplets: GROUP_4_3_3.replace(number, "$1 $2 $3").into_owned(),
            pairs,
            display,
        }
    }
}
