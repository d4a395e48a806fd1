/*!
 * Common test utilities for the doctran test suite
 */

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

use doctran::app_config::Config;
use doctran::project::{Fingerprint, ProjectLayout, TranslationManager, fingerprint, staleness};
use doctran::translation::mock::MockTranslator;

/// Route library logs through env_logger; set RUST_LOG to see them
pub fn init_test_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Creates a temporary directory for test files
pub fn create_temp_dir() -> Result<TempDir> {
    Ok(TempDir::new()?)
}

/// Creates a test file, and its parent directories, below `dir`
pub fn create_test_file(dir: &Path, relative: &str, content: &str) -> Result<PathBuf> {
    let file_path = dir.join(relative);
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&file_path, content)?;
    Ok(file_path)
}

/// Default configuration without request pacing
pub fn test_config() -> Config {
    Config {
        request_delay_ms: 0,
        ..Config::default()
    }
}

/// Manager over `root` using one mock for every category
pub fn create_manager(root: &Path, languages: &[&str], mock: &MockTranslator) -> TranslationManager {
    let layout = ProjectLayout::new(root, &test_config());
    let languages = languages.iter().map(|code| code.to_string()).collect();
    TranslationManager::new(layout, languages, Arc::new(mock.clone()))
        .with_notebook_translator(Arc::new(mock.clone()))
        .with_image_translator(Arc::new(mock.clone()))
}

/// Fingerprint recorded in an artifact
pub fn stored_fingerprint(artifact: &Path) -> Option<Fingerprint> {
    staleness::read_metadata(artifact).map(|metadata| metadata.fingerprint())
}

/// Fingerprint of a string, as the source would be fingerprinted
pub fn fingerprint_of(content: &str) -> Fingerprint {
    fingerprint(content.as_bytes())
}

/// A minimal notebook with one markdown and one code cell
pub fn sample_notebook(title: &str) -> String {
    serde_json::json!({
        "cells": [
            {"cell_type": "markdown", "metadata": {}, "source": [format!("# {}", title)]},
            {"cell_type": "code", "metadata": {}, "source": ["print(1)"], "outputs": [], "execution_count": null}
        ],
        "metadata": {},
        "nbformat": 4,
        "nbformat_minor": 5
    })
    .to_string()
}
