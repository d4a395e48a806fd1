//! File and directory utilities

use log::{debug, warn};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Length of the path digest embedded in translated image names
const IMAGE_PATH_HASH_LEN: usize = 16;

/// File operations utility
pub struct FileManager;

impl FileManager {
    /// Lowercase extension with a leading dot, or an empty string
    pub fn extension_of<P: AsRef<Path>>(path: P) -> String {
        path.as_ref()
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
            .unwrap_or_default()
    }

    /// Whether a path ends with one of the given extensions (case-insensitive)
    pub fn has_extension<P: AsRef<Path>>(path: P, extensions: &[String]) -> bool {
        let ext = Self::extension_of(path);
        !ext.is_empty() && extensions.iter().any(|e| e.eq_ignore_ascii_case(&ext))
    }

    /// Language-aware file name for a translated image
    ///
    /// Images land flat in one directory, so the name carries a digest of the
    /// source path to keep `a/logo.png` and `b/logo.png` apart.
    pub fn generate_translated_filename<P1: AsRef<Path>, P2: AsRef<Path>>(
        image_path: P1,
        language_code: &str,
        root_dir: P2,
    ) -> String {
        let image_path = image_path.as_ref();
        let relative = image_path
            .strip_prefix(root_dir.as_ref())
            .unwrap_or(image_path);
        let relative = relative.to_string_lossy().replace('\\', "/");

        let mut hasher = Sha256::new();
        hasher.update(relative.as_bytes());
        let digest = format!("{:x}", hasher.finalize());

        let stem = image_path.file_stem().unwrap_or_default().to_string_lossy();
        format!(
            "{}.{}.{}{}",
            stem,
            &digest[..IMAGE_PATH_HASH_LEN],
            language_code,
            Self::extension_of(image_path)
        )
    }

    /// Language code of a file named by `generate_translated_filename`
    pub fn translated_image_language(file_name: &str) -> Option<&str> {
        let parts: Vec<&str> = file_name.rsplitn(4, '.').collect();
        if parts.len() != 4 {
            return None;
        }
        let (language, hash) = (parts[1], parts[2]);
        let hash_ok = hash.len() == IMAGE_PATH_HASH_LEN && hash.chars().all(|c| c.is_ascii_hexdigit());
        if hash_ok && !language.is_empty() {
            Some(language)
        } else {
            None
        }
    }

    /// Delete translated text files with the given extensions for one language
    pub fn delete_translated_files_by_language_code(
        language_code: &str,
        translations_dir: &Path,
        extensions: &[String],
    ) -> usize {
        let language_dir = translations_dir.join(language_code);
        if !language_dir.is_dir() {
            return 0;
        }

        let mut removed = 0;
        for entry in WalkDir::new(&language_dir).into_iter().filter_map(|e| e.ok()) {
            let path = entry.path();
            if !entry.file_type().is_file() || !Self::has_extension(path, extensions) {
                continue;
            }
            match fs::remove_file(path) {
                Ok(()) => {
                    debug!("Deleted translated file: {}", path.display());
                    removed += 1;
                }
                Err(e) => warn!("Failed to delete {}: {}", path.display(), e),
            }
        }
        removed
    }

    /// Delete translated images for one language from the flat image directory
    pub fn delete_translated_images_by_language_code(language_code: &str, image_dir: &Path) -> usize {
        let entries = match fs::read_dir(image_dir) {
            Ok(entries) => entries,
            Err(_) => return 0,
        };

        let mut removed = 0;
        for entry in entries.filter_map(|e| e.ok()) {
            let path = entry.path();
            let name = entry.file_name().to_string_lossy().to_string();
            if !path.is_file() || Self::translated_image_language(&name) != Some(language_code) {
                continue;
            }
            match fs::remove_file(&path) {
                Ok(()) => {
                    debug!("Deleted translated image: {}", path.display());
                    removed += 1;
                }
                Err(e) => warn!("Failed to delete {}: {}", path.display(), e),
            }
        }
        removed
    }

    /// Path relative to a base, rendered with forward slashes
    pub fn portable_relative(path: &Path, base: &Path) -> Option<String> {
        path.strip_prefix(base)
            .ok()
            .map(|rel| rel.to_string_lossy().replace('\\', "/"))
    }

    /// Join a forward-slash relative path onto a base
    pub fn join_portable(base: &Path, relative: &str) -> PathBuf {
        relative
            .split('/')
            .filter(|part| !part.is_empty())
            .fold(base.to_path_buf(), |acc, part| acc.join(part))
    }
}
