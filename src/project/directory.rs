/*!
 * Keeps the per-language trees in step with the source tree.
 *
 * Two jobs: removing translated artifacts whose source is gone, and mirroring
 * the source directory structure into every language tree. Both are best
 * effort: a failing entry is logged and skipped, and the counts reflect what
 * was actually done.
 */

use log::{debug, info, warn};
use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use crate::file_utils::FileManager;

use super::layout::ProjectLayout;
use super::tasks::{Category, CategorySet};

/// Outcome of a directory sync
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// Directories created across all language trees
    pub created: usize,
    /// Empty orphaned directories removed across all language trees
    pub removed: usize,
    /// One line per change
    pub details: Vec<String>,
}

impl SyncReport {
    pub fn is_noop(&self) -> bool {
        self.created == 0 && self.removed == 0
    }
}

/// Directory maintenance for one project and set of languages
#[derive(Debug, Clone)]
pub struct DirectoryManager {
    layout: ProjectLayout,
    language_codes: Vec<String>,
}

impl DirectoryManager {
    pub fn new(layout: ProjectLayout, language_codes: Vec<String>) -> Self {
        Self { layout, language_codes }
    }

    /// Remove artifacts with no current source
    ///
    /// Only artifacts of enabled categories are considered; a markdown-only run
    /// never touches notebooks or images.
    pub fn cleanup_orphaned_translations(&self, categories: CategorySet) -> usize {
        let mut removed = 0;

        if categories.markdown || categories.notebook {
            for language_code in &self.language_codes {
                removed += self.cleanup_language_tree(language_code, categories);
            }
        }
        if categories.images {
            removed += self.cleanup_translated_images();
        }

        if removed > 0 {
            info!("Removed {} orphaned translation(s)", removed);
        }
        removed
    }

    fn cleanup_language_tree(&self, language_code: &str, categories: CategorySet) -> usize {
        let language_dir = self.layout.language_dir(language_code);
        if !language_dir.is_dir() {
            return 0;
        }

        let mut removed = 0;
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
            let path = entry.path();
            match self.layout.category_of(path) {
                Some(category) if category.is_text() && categories.contains(category) => {}
                _ => continue,
            }

            let orphaned = match self.layout.source_for_translation(language_code, path) {
                Some(source) => !source.is_file() || self.layout.is_excluded(&source),
                None => false,
            };
            if orphaned && remove_file(path) {
                removed += 1;
            }
        }
        removed
    }

    fn cleanup_translated_images(&self) -> usize {
        let entries = match fs::read_dir(&self.layout.image_dir) {
            Ok(entries) => entries,
            Err(_) => return 0,
        };

        let expected: HashSet<String> = self
            .layout
            .discover_sources(&[Category::Image])
            .iter()
            .flat_map(|source| {
                self.language_codes.iter().map(move |language_code| {
                    FileManager::generate_translated_filename(&source.path, language_code, &self.layout.root_dir)
                })
            })
            .collect();

        let mut removed = 0;
        for entry in entries.filter_map(|e| e.ok()) {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().to_string();
            let ours = FileManager::translated_image_language(&name)
                .map(|language| self.language_codes.iter().any(|code| code == language))
                .unwrap_or(false);
            if ours && !expected.contains(&name) && remove_file(&path) {
                removed += 1;
            }
        }
        removed
    }

    /// Mirror the source directory structure into every language tree
    ///
    /// Directories holding text sources (and their ancestors) are created where
    /// missing. Mirrored directories that no longer correspond to a source
    /// directory are removed once empty, deepest first. Running it twice in a
    /// row reports no changes the second time.
    pub fn sync_directory_structure(&self) -> SyncReport {
        let expected = self.expected_directories();
        let mut report = SyncReport::default();

        for language_code in &self.language_codes {
            let language_dir = self.layout.language_dir(language_code);

            for relative in &expected {
                let target = FileManager::join_portable(&language_dir, relative);
                if target.is_dir() {
                    continue;
                }
                match fs::create_dir_all(&target) {
                    Ok(()) => {
                        report.created += 1;
                        report.details.push(format!("Created: {}", target.display()));
                    }
                    Err(e) => warn!("Failed to create {}: {}", target.display(), e),
                }
            }

            self.remove_stale_directories(&language_dir, &expected, &mut report);
        }

        if report.is_noop() {
            debug!("Directory structure already in sync");
        } else {
            info!(
                "Directory sync: {} created, {} removed",
                report.created, report.removed
            );
        }
        report
    }

    fn remove_stale_directories(&self, language_dir: &Path, expected: &BTreeSet<String>, report: &mut SyncReport) {
        if !language_dir.is_dir() {
            return;
        }

        let candidates: Vec<PathBuf> = WalkDir::new(language_dir)
            .min_depth(1)
            .contents_first(true)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_dir())
            .map(|e| e.into_path())
            .collect();

        for dir in candidates {
            let relative = match FileManager::portable_relative(&dir, language_dir) {
                Some(relative) => relative,
                None => continue,
            };
            if expected.contains(&relative) || !is_empty_dir(&dir) {
                continue;
            }
            match fs::remove_dir(&dir) {
                Ok(()) => {
                    report.removed += 1;
                    report.details.push(format!("Removed: {}", dir.display()));
                }
                Err(e) => warn!("Failed to remove {}: {}", dir.display(), e),
            }
        }
    }

    /// Relative directories (forward slashes) that hold text sources, with ancestors
    ///
    /// Sorted, so a parent is always visited before its children.
    fn expected_directories(&self) -> BTreeSet<String> {
        let mut expected = BTreeSet::new();
        for source in self.layout.discover_sources(&[Category::Markdown, Category::Notebook]) {
            let mut parts: Vec<&str> = source.relative_path.split('/').collect();
            parts.pop();
            while !parts.is_empty() {
                expected.insert(parts.join("/"));
                parts.pop();
            }
        }
        expected
    }
}

fn is_empty_dir(path: &Path) -> bool {
    fs::read_dir(path)
        .map(|mut entries| entries.next().is_none())
        .unwrap_or(false)
}

fn remove_file(path: &Path) -> bool {
    match fs::remove_file(path) {
        Ok(()) => {
            info!("Removed orphaned translation: {}", path.display());
            true
        }
        Err(e) => {
            warn!("Failed to remove {}: {}", path.display(), e);
            false
        }
    }
}
