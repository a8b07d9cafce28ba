//! Label to slug transliteration

use regex::Regex;
use std::sync::OnceLock;

fn separator_regex() -> &'static Regex {
    static SEPARATOR: OnceLock<Regex> = OnceLock::new();
    SEPARATOR.get_or_init(|| Regex::new(r"[^a-z0-9]+").expect("Invalid separator regex"))
}

/// Derive a URL/DOM-safe value from a human-readable label.
///
/// Lowercases, spells out German umlauts and sharp s as ASCII digraphs,
/// collapses every run of other characters into a single `-` and trims
/// separators from both ends. May return an empty string for labels that
/// contain no ASCII letters or digits at all.
pub fn slugify(label: &str) -> String {
    let mut transliterated = String::with_capacity(label.len());
    for c in label.to_lowercase().chars() {
        match c {
            'ä' => transliterated.push_str("ae"),
            'ö' => transliterated.push_str("oe"),
            'ü' => transliterated.push_str("ue"),
            'ß' => transliterated.push_str("ss"),
            other => transliterated.push(other),
        }
    }

    separator_regex()
        .replace_all(&transliterated, "-")
        .trim_matches('-')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_umlauts_and_punctuation() {
        assert_eq!(slugify("Über Nacht!!"), "ueber-nacht");
        assert_eq!(slugify("Größe"), "groesse");
        assert_eq!(slugify("Äpfel & Öl"), "aepfel-oel");
    }

    #[test]
    fn test_separators_collapse_and_trim() {
        assert_eq!(slugify("Vue.js"), "vue-js");
        assert_eq!(slugify("  --C++ / Qt--  "), "c-qt");
        assert_eq!(slugify("CI/CD"), "ci-cd");
    }

    #[test]
    fn test_no_ascii_content() {
        assert_eq!(slugify("!!!"), "");
        assert_eq!(slugify("日本語"), "");
    }
}
