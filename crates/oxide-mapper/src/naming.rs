//! Table name derivation.
//!
//! Table names default to the pluralized entity type name. The
//! pluralization service is pluggable through [`Pluralizer`]; the bundled
//! [`EnglishPluralizer`] handles the common English noun forms.

use convert_case::Case;

use crate::entity::TableMarkers;

/// A pluralization service.
pub trait Pluralizer: Send + Sync {
    /// Returns the plural form of `word`.
    fn pluralize(&self, word: &str) -> String;

    /// Returns true when `word` already reads as plural.
    fn is_plural(&self, word: &str) -> bool;
}

/// Irregular singular/plural pairs, lowercase.
const IRREGULAR: [(&str, &str); 9] = [
    ("person", "people"),
    ("child", "children"),
    ("man", "men"),
    ("woman", "women"),
    ("mouse", "mice"),
    ("goose", "geese"),
    ("tooth", "teeth"),
    ("foot", "feet"),
    ("ox", "oxen"),
];

/// Words with the same singular and plural form, lowercase.
const UNCOUNTABLE: [&str; 10] = [
    "equipment",
    "information",
    "rice",
    "money",
    "species",
    "series",
    "fish",
    "sheep",
    "deer",
    "news",
];

/// Singular words ending in `s`, lowercase.
const SINGULAR_S: [&str; 9] = [
    "alias", "atlas", "bias", "bus", "canvas", "gas", "lens", "plus", "campus",
];

/// Words ending in `f`/`fe` that take `ves`, lowercase.
const F_TO_VES: [&str; 12] = [
    "leaf", "loaf", "half", "self", "shelf", "thief", "wolf", "calf", "knife", "life", "wife",
    "elf",
];

/// Rule-based English pluralization.
///
/// Compound PascalCase names only inflect their last word
/// (`OrderLine` -> `OrderLines`, `SalesPerson` -> `SalesPeople`).
#[derive(Debug, Clone, Copy, Default)]
pub struct EnglishPluralizer;

impl EnglishPluralizer {
    /// Creates the pluralizer.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

/// Splits `word` before its last PascalCase word.
fn split_last_word(word: &str) -> (&str, &str) {
    let last = Case::Pascal.split(&word).last().map_or(0, |last| last.len());
    word.split_at(word.len() - last)
}

/// Drops the last `n` characters of `word`.
fn drop_last(word: &str, n: usize) -> &str {
    word.char_indices()
        .rev()
        .nth(n - 1)
        .map_or("", |(i, _)| &word[..i])
}

fn is_shouting(word: &str) -> bool {
    word.chars().count() > 1 && word.chars().all(|c| !c.is_lowercase())
}

/// Copies the casing of `original` onto the lowercase `replacement`.
fn match_case(original: &str, replacement: &str) -> String {
    if is_shouting(original) {
        return replacement.to_uppercase();
    }
    let mut chars = replacement.chars();
    match (original.chars().next(), chars.next()) {
        (Some(first), Some(head)) if first.is_uppercase() => {
            head.to_uppercase().chain(chars).collect()
        }
        _ => String::from(replacement),
    }
}

fn is_vowel(c: char) -> bool {
    matches!(c.to_ascii_lowercase(), 'a' | 'e' | 'i' | 'o' | 'u')
}

/// A single `z` after a vowel doubles: `quiz` -> `quizzes`.
fn ends_with_short_z(lower: &str) -> bool {
    let mut tail = lower.chars().rev();
    matches!((tail.next(), tail.next()), (Some('z'), Some(v)) if is_vowel(v))
}

fn pluralize_word(word: &str) -> String {
    let lower = word.to_lowercase();

    if UNCOUNTABLE.contains(&lower.as_str()) {
        return String::from(word);
    }
    if let Some((_, plural)) = IRREGULAR.iter().find(|(singular, _)| *singular == lower) {
        return match_case(word, plural);
    }

    let plural = if F_TO_VES.contains(&lower.as_str()) {
        let n = if lower.ends_with("fe") { 2 } else { 1 };
        format!("{}ves", drop_last(word, n))
    } else if lower.ends_with("is") {
        format!("{}es", drop_last(word, 2))
    } else if ends_with_short_z(&lower) {
        format!("{word}zes")
    } else if ["s", "x", "z", "ch", "sh"].iter().any(|s| lower.ends_with(s)) {
        format!("{word}es")
    } else if lower
        .strip_suffix('y')
        .and_then(|stem| stem.chars().last())
        .is_some_and(|c| !is_vowel(c))
    {
        format!("{}ies", drop_last(word, 1))
    } else {
        format!("{word}s")
    };

    if is_shouting(word) {
        plural.to_uppercase()
    } else {
        plural
    }
}

fn is_plural_word(word: &str) -> bool {
    let lower = word.to_lowercase();

    if UNCOUNTABLE.contains(&lower.as_str()) {
        return true;
    }
    if IRREGULAR.iter().any(|(_, plural)| *plural == lower) {
        return true;
    }
    if IRREGULAR.iter().any(|(singular, _)| *singular == lower)
        || SINGULAR_S.contains(&lower.as_str())
    {
        return false;
    }
    lower.ends_with('s') && !lower.ends_with("ss") && !lower.ends_with("us") && !lower.ends_with("is")
}

impl Pluralizer for EnglishPluralizer {
    fn pluralize(&self, word: &str) -> String {
        if word.is_empty() || self.is_plural(word) {
            return String::from(word);
        }
        let (head, last) = split_last_word(word);
        format!("{head}{}", pluralize_word(last))
    }

    fn is_plural(&self, word: &str) -> bool {
        let (_, last) = split_last_word(word);
        !last.is_empty() && is_plural_word(last)
    }
}

/// Derives the table name of an entity type.
///
/// A singular marker keeps the bare type name, else an explicit table alias
/// wins, else the type name is pluralized.
#[must_use]
pub fn table_name(type_name: &str, markers: &TableMarkers, pluralizer: &dyn Pluralizer) -> String {
    if markers.singular {
        return String::from(type_name);
    }
    if let Some(alias) = markers.alias.as_deref().filter(|alias| !alias.is_empty()) {
        return String::from(alias);
    }
    pluralizer.pluralize(type_name)
}
