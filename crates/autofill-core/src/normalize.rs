//! Key normalization for identity fields.
//!
//! Stored records carry keys derived from their raw fields at write time;
//! queries derive the same keys from user input at read time. Both sides
//! must use exactly these functions.
//!
//! All functions are pure, total and idempotent.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::defaults::PLACEHOLDER_NOT_AVAILABLE;

/// Arabic harakat, Quranic annotation marks, superscript alef and tatweel.
static ARABIC_MARKS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[\x{0610}-\x{061A}\x{064B}-\x{065F}\x{0670}\x{06D6}-\x{06ED}\x{0640}]")
        .expect("static regex")
});

/// Anything that is neither Arabic, an ASCII word character nor whitespace.
static NAME_NOISE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[^\x{0600}-\x{06FF}A-Za-z0-9_\s]").expect("static regex"));

static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("static regex"));

/// Canonical key for chassis numbers, engine numbers and bare plate numbers.
///
/// Trims, removes all whitespace, hyphens and underscores, then upper-cases.
///
/// ```
/// use autofill_core::normalize::normalize_key;
///
/// assert_eq!(normalize_key(" wvw-zzz 1k_z "), "WVWZZZ1KZ");
/// assert_eq!(normalize_key(""), "");
/// ```
pub fn normalize_key(value: &str) -> String {
    value
        .trim()
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-' && *c != '_')
        .collect::<String>()
        .to_uppercase()
}

/// Normalize one component of a plate key (region/country or plate number).
///
/// Only trims and upper-cases; inner spaces and hyphens are significant here.
pub fn normalize_plate_part(value: &str) -> String {
    value.trim().to_uppercase()
}

/// Canonical region-qualified plate key: `"<REGION>|<PLATE>"`.
///
/// ```
/// use autofill_core::normalize::normalize_plate_key;
///
/// assert_eq!(normalize_plate_key(" sy ", "123 45"), "SY|123 45");
/// ```
pub fn normalize_plate_key(region: &str, plate: &str) -> String {
    format!(
        "{}|{}",
        normalize_plate_part(region),
        normalize_plate_part(plate)
    )
}

/// Canonical comparison form of an owner name.
///
/// Removes diacritics and tatweel, folds alef/yaa/taa-marbuta variants,
/// turns any other symbol into a space and collapses whitespace.
///
/// ```
/// use autofill_core::normalize::normalize_owner_name;
///
/// assert_eq!(normalize_owner_name("  أَحْمَد   عليّ "), "احمد علي");
/// assert_eq!(normalize_owner_name("فاطمة"), "فاطمه");
/// ```
pub fn normalize_owner_name(name: &str) -> String {
    let stripped = ARABIC_MARKS.replace_all(name.trim(), "");
    let folded: String = stripped.chars().map(fold_arabic_letter).collect();
    let cleaned = NAME_NOISE.replace_all(&folded, " ");
    WHITESPACE_RUN
        .replace_all(&cleaned, " ")
        .trim()
        .to_string()
}

fn fold_arabic_letter(c: char) -> char {
    match c {
        // alef with hamza above/below, madda, wasla
        '\u{0622}' | '\u{0623}' | '\u{0625}' | '\u{0671}' => '\u{0627}',
        // alef maksura -> yaa
        '\u{0649}' => '\u{064A}',
        // taa marbuta -> haa
        '\u{0629}' => '\u{0647}',
        other => other,
    }
}

/// True for the "not available" placeholder, however it was spaced.
pub fn is_placeholder(value: &str) -> bool {
    let compact: String = value.chars().filter(|c| !c.is_whitespace()).collect();
    compact == PLACEHOLDER_NOT_AVAILABLE
}

/// Trim a raw input value, mapping blanks and placeholders to `None`.
pub fn clean_input(value: Option<&str>) -> Option<String> {
    let trimmed = value?.trim();
    if trimmed.is_empty() || is_placeholder(trimmed) {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_key_strips_separators() {
        assert_eq!(normalize_key("ABC-123"), "ABC123");
        assert_eq!(normalize_key("abc 123"), "ABC123");
        assert_eq!(normalize_key("a_b\tc-1 2\n3"), "ABC123");
    }

    #[test]
    fn test_normalize_key_empty_and_blank() {
        assert_eq!(normalize_key(""), "");
        assert_eq!(normalize_key("   "), "");
        assert_eq!(normalize_key("- _ -"), "");
    }

    #[test]
    fn test_normalize_key_keeps_arabic_digits_and_letters() {
        assert_eq!(normalize_key("١٢٣-أ ب"), "١٢٣أب");
    }

    #[test]
    fn test_plate_key_keeps_inner_spacing() {
        assert_eq!(normalize_plate_key("damascus", "12-345"), "DAMASCUS|12-345");
        assert_eq!(normalize_plate_key("  ", " 1 2 "), "|1 2");
    }

    #[test]
    fn test_plate_key_is_case_insensitive() {
        assert_eq!(
            normalize_plate_key("Sy", "ab 12"),
            normalize_plate_key("SY", "AB 12")
        );
    }

    #[test]
    fn test_owner_name_removes_diacritics_and_tatweel() {
        assert_eq!(normalize_owner_name("مُحَمَّد"), "محمد");
        assert_eq!(normalize_owner_name("محـــمد"), "محمد");
    }

    #[test]
    fn test_owner_name_folds_letter_variants() {
        assert_eq!(normalize_owner_name("إبراهيم"), "ابراهيم");
        assert_eq!(normalize_owner_name("آمنة"), "امنه");
        assert_eq!(normalize_owner_name("مصطفى"), "مصطفي");
    }

    #[test]
    fn test_owner_name_replaces_symbols_and_collapses_spaces() {
        assert_eq!(normalize_owner_name("أحمد.علي   (الابن)"), "احمد علي الابن");
        assert_eq!(normalize_owner_name("John  O'Neil"), "John O Neil");
    }

    #[test]
    fn test_owner_name_empty() {
        assert_eq!(normalize_owner_name(""), "");
        assert_eq!(normalize_owner_name(" ... "), "");
    }

    #[test]
    fn test_placeholder_variants() {
        assert!(is_placeholder("لايوجد"));
        assert!(is_placeholder("لا يوجد"));
        assert!(is_placeholder("  لا   يوجد "));
        assert!(!is_placeholder("يوجد"));
        assert!(!is_placeholder(""));
    }

    #[test]
    fn test_clean_input() {
        assert_eq!(clean_input(None), None);
        assert_eq!(clean_input(Some("   ")), None);
        assert_eq!(clean_input(Some("لا يوجد")), None);
        assert_eq!(clean_input(Some(" ABC-1 ")), Some("ABC-1".to_string()));
    }
}
