use isolang::Language;

use crate::errors::ConfigError;

/// Language utilities for target language codes
///
/// Target codes are BCP 47-like tags such as `ko`, `pt-BR` or `zh-TW`. Only the
/// primary subtag is checked against ISO 639-1 / ISO 639-3.

/// Split a tag into its primary subtag and the optional region/script part
fn split_tag(code: &str) -> (String, Option<String>) {
    let trimmed = code.trim();
    match trimmed.split_once(['-', '_']) {
        Some((primary, rest)) => (primary.to_lowercase(), Some(rest.to_string())),
        None => (trimmed.to_lowercase(), None),
    }
}

/// Resolve the ISO language of a tag's primary subtag
fn lookup(primary: &str) -> Option<Language> {
    match primary.len() {
        2 => Language::from_639_1(primary),
        3 => Language::from_639_3(primary),
        _ => None,
    }
}

/// Validate a target language code
pub fn validate_language_code(code: &str) -> Result<(), ConfigError> {
    let (primary, _) = split_tag(code);
    if lookup(&primary).is_some() {
        Ok(())
    } else {
        Err(ConfigError::InvalidLanguageCode(code.to_string()))
    }
}

/// Get the English name of a language tag, keeping the region part
///
/// Unknown codes fall back to the code itself so prompts stay usable.
pub fn get_language_name(code: &str) -> String {
    let (primary, rest) = split_tag(code);
    match (lookup(&primary), rest) {
        (Some(language), Some(rest)) => format!("{} ({})", language.to_name(), rest),
        (Some(language), None) => language.to_name().to_string(),
        (None, _) => code.trim().to_string(),
    }
}

/// Parse a space or comma separated list of codes, dropping duplicates
pub fn parse_language_list(codes: &str) -> Vec<String> {
    let mut seen = Vec::new();
    for code in codes.split([' ', ',']).map(str::trim).filter(|c| !c.is_empty()) {
        if !seen.iter().any(|s: &String| s == code) {
            seen.push(code.to_string());
        }
    }
    seen
}
