/*!
 * Where things live on disk.
 *
 * `ProjectLayout` knows the source root, the per-language text trees, the flat
 * image directory and which parts of the source tree are excluded. Every other
 * component asks it for paths instead of joining them by hand.
 */

use log::warn;
use std::path::{Path, PathBuf};
use walkdir::{DirEntry, WalkDir};

use crate::app_config::Config;
use crate::file_utils::FileManager;

use super::tasks::{Category, SourceFile};

/// Paths and filters of one project
#[derive(Debug, Clone)]
pub struct ProjectLayout {
    /// Source tree
    pub root_dir: PathBuf,
    /// Parent of the `<lang>/` text trees
    pub translations_dir: PathBuf,
    /// Flat directory of translated images
    pub image_dir: PathBuf,
    /// Directory names skipped anywhere in the source tree
    pub excluded_dirs: Vec<String>,
    /// Markdown extensions, with leading dot
    pub markdown_extensions: Vec<String>,
    /// Notebook extensions, with leading dot
    pub notebook_extensions: Vec<String>,
    /// Image extensions, with leading dot
    pub image_extensions: Vec<String>,
}

impl ProjectLayout {
    /// Build a layout for `root_dir`; relative output directories are placed under it
    pub fn new(root_dir: impl Into<PathBuf>, config: &Config) -> Self {
        let root_dir = root_dir.into();
        Self {
            translations_dir: root_dir.join(&config.translations_dir),
            image_dir: root_dir.join(&config.image_dir),
            excluded_dirs: config.excluded_dirs.clone(),
            markdown_extensions: config.markdown_extensions.clone(),
            notebook_extensions: config.notebook_extensions.clone(),
            image_extensions: config.image_extensions.clone(),
            root_dir,
        }
    }

    /// Category of a file by extension
    pub fn category_of(&self, path: &Path) -> Option<Category> {
        if FileManager::has_extension(path, &self.markdown_extensions) {
            Some(Category::Markdown)
        } else if FileManager::has_extension(path, &self.notebook_extensions) {
            Some(Category::Notebook)
        } else if FileManager::has_extension(path, &self.image_extensions) {
            Some(Category::Image)
        } else {
            None
        }
    }

    /// Whether a path inside the root is outside the translatable source tree
    pub fn is_excluded(&self, path: &Path) -> bool {
        if path.starts_with(&self.translations_dir) || path.starts_with(&self.image_dir) {
            return true;
        }
        let relative = path.strip_prefix(&self.root_dir).unwrap_or(path);
        relative.components().any(|component| {
            let name = component.as_os_str().to_string_lossy();
            self.excluded_dirs.iter().any(|excluded| excluded == name.as_ref())
        })
    }

    /// Root of one language's text tree
    pub fn language_dir(&self, language_code: &str) -> PathBuf {
        self.translations_dir.join(language_code)
    }

    /// Destination of a text translation
    pub fn text_destination(&self, language_code: &str, relative_path: &str) -> PathBuf {
        FileManager::join_portable(&self.language_dir(language_code), relative_path)
    }

    /// Destination of an image translation
    pub fn image_destination(&self, source: &Path, language_code: &str) -> PathBuf {
        self.image_dir
            .join(FileManager::generate_translated_filename(source, language_code, &self.root_dir))
    }

    /// Source file mirrored by a text artifact, if the artifact sits in a language tree
    pub fn source_for_translation(&self, language_code: &str, translation: &Path) -> Option<PathBuf> {
        let relative = FileManager::portable_relative(translation, &self.language_dir(language_code))?;
        Some(FileManager::join_portable(&self.root_dir, &relative))
    }

    /// Walk the source tree once, returning files of the requested categories
    ///
    /// Entries are visited in file-name order so the result is stable for a
    /// given tree. Unreadable entries are logged and skipped.
    pub fn discover_sources(&self, categories: &[Category]) -> Vec<SourceFile> {
        let mut files = Vec::new();
        let walker = WalkDir::new(&self.root_dir)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| !self.skip_entry(entry));

        for entry in walker {
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
            let category = match self.category_of(path) {
                Some(category) if categories.contains(&category) => category,
                _ => continue,
            };
            if let Some(relative_path) = FileManager::portable_relative(path, &self.root_dir) {
                files.push(SourceFile {
                    path: path.to_path_buf(),
                    relative_path,
                    category,
                });
            }
        }
        files
    }

    fn skip_entry(&self, entry: &DirEntry) -> bool {
        entry.depth() > 0 && entry.file_type().is_dir() && self.is_excluded(entry.path())
    }
}
