/*!
 * Staleness detection.
 *
 * A translation is current only when its embedded metadata records the
 * fingerprint of the source as it is now. Missing artifacts, unreadable
 * artifacts and missing or malformed metadata all count as outdated.
 */

use log::{debug, warn};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::fingerprint::fingerprint_file;
use super::layout::ProjectLayout;
use super::metadata::{self, TranslationMetadata};
use super::tasks::Category;

/// An existing artifact whose source changed since it was translated
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutdatedTranslation {
    pub source: PathBuf,
    pub translation: PathBuf,
    pub language_code: String,
    pub category: Category,
}

/// An artifact whose recorded confidence is below a threshold
#[derive(Debug, Clone, PartialEq)]
pub struct LowConfidenceTranslation {
    pub source: PathBuf,
    pub translation: PathBuf,
    pub category: Category,
    /// Recorded score, `None` when the artifact carries no score
    pub confidence: Option<f64>,
}

/// Read the metadata of an artifact, if any
pub fn read_metadata(translation: &Path) -> Option<TranslationMetadata> {
    match fs::read_to_string(translation) {
        Ok(body) => metadata::decode(&body),
        Err(e) => {
            debug!("Cannot read {}: {}", translation.display(), e);
            None
        }
    }
}

/// Whether the artifact no longer reflects the source
pub fn is_translation_outdated(source: &Path, translation: &Path) -> bool {
    if !translation.is_file() {
        return true;
    }
    let stored = match read_metadata(translation) {
        Some(stored) => stored,
        None => {
            debug!("No metadata in {}", translation.display());
            return true;
        }
    };
    match fingerprint_file(source) {
        Ok(current) => !stored.matches(&current),
        Err(e) => {
            warn!("Cannot fingerprint {}: {}", source.display(), e);
            true
        }
    }
}

/// Walk every artifact of the given text categories and collect the stale ones
///
/// Artifacts whose source is gone are skipped; orphan cleanup owns those.
/// Results follow language order, then directory-walk order.
pub fn find_outdated_translations(
    layout: &ProjectLayout,
    language_codes: &[String],
    categories: &[Category],
) -> Vec<OutdatedTranslation> {
    let mut outdated = Vec::new();

    for language_code in language_codes {
        for (source, translation, category) in artifacts(layout, language_code, categories) {
            if is_translation_outdated(&source, &translation) {
                debug!("Outdated translation: {}", translation.display());
                outdated.push(OutdatedTranslation {
                    source,
                    translation,
                    language_code: language_code.clone(),
                    category,
                });
            }
        }
    }
    outdated
}

/// Artifacts of one language whose recorded confidence is below `threshold`
///
/// Artifacts without a score are included too, since nothing vouches for them.
pub fn find_low_confidence_translations(
    layout: &ProjectLayout,
    language_code: &str,
    categories: &[Category],
    threshold: f64,
) -> Vec<LowConfidenceTranslation> {
    artifacts(layout, language_code, categories)
        .into_iter()
        .filter_map(|(source, translation, category)| {
            let confidence = read_metadata(&translation).and_then(|m| m.confidence);
            match confidence {
                Some(score) if score >= threshold => None,
                _ => Some(LowConfidenceTranslation {
                    source,
                    translation,
                    category,
                    confidence,
                }),
            }
        })
        .collect()
}

/// Whether the translation's blank-line layout diverges from the source
///
/// Each line is reduced to blank or not; the two sequences must match after the
/// metadata block and trailing blank lines are dropped.
pub fn has_line_break_mismatch(source: &str, translated: &str) -> bool {
    line_signature(source) != line_signature(&metadata::strip(translated))
}

fn line_signature(text: &str) -> Vec<bool> {
    let mut signature: Vec<bool> = text.lines().map(|line| line.trim().is_empty()).collect();
    while signature.last() == Some(&true) {
        signature.pop();
    }
    signature
}

/// (source, artifact, category) for every artifact of a language with a live source
fn artifacts(layout: &ProjectLayout, language_code: &str, categories: &[Category]) -> Vec<(PathBuf, PathBuf, Category)> {
    let language_dir = layout.language_dir(language_code);
    if !language_dir.is_dir() {
        return Vec::new();
    }

    let mut found = Vec::new();
    for entry in WalkDir::new(&language_dir).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Skipping unreadable entry: {}", e);
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let translation = entry.into_path();
        let category = match layout.category_of(&translation) {
            Some(category) if category.is_text() && categories.contains(&category) => category,
            _ => continue,
        };
        match layout.source_for_translation(language_code, &translation) {
            Some(source) if source.is_file() && !layout.is_excluded(&source) => {
                found.push((source, translation, category))
            }
            _ => debug!("No source for {}", translation.display()),
        }
    }
    found
}
