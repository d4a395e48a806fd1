/*!
 * Tests for file utility functions
 */

use anyhow::Result;
use std::path::Path;

use doctran::file_utils::FileManager;
use crate::common;

#[test]
fn test_has_extension_shouldIgnoreCase() {
    let extensions = vec![".md".to_string()];
    assert!(FileManager::has_extension("docs/README.MD", &extensions));
    assert!(!FileManager::has_extension("docs/README", &extensions));
    assert!(!FileManager::has_extension("docs/intro.ipynb", &extensions));
}

#[test]
fn test_generate_translated_filename_shouldBeStable() {
    let root = Path::new("/project");
    let first = FileManager::generate_translated_filename("/project/img/chart.png", "fr", root);
    let second = FileManager::generate_translated_filename("/project/img/chart.png", "fr", root);
    let other_language = FileManager::generate_translated_filename("/project/img/chart.png", "de", root);

    assert_eq!(first, second);
    assert_ne!(first, other_language);
    assert_eq!(FileManager::translated_image_language(&other_language), Some("de"));
}

#[test]
fn test_delete_translated_files_by_language_code_shouldOnlyTouchExtensions() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let translations = temp_dir.path().join("translations");
    common::create_test_file(&translations, "es/a.md", "a")?;
    common::create_test_file(&translations, "es/guide/b.md", "b")?;
    common::create_test_file(&translations, "es/intro.ipynb", "{}")?;
    common::create_test_file(&translations, "fr/a.md", "a")?;

    let removed = FileManager::delete_translated_files_by_language_code("es", &translations, &[".md".to_string()]);

    assert_eq!(removed, 2);
    assert!(translations.join("es/intro.ipynb").exists());
    assert!(translations.join("fr/a.md").exists());
    Ok(())
}

#[test]
fn test_delete_translated_images_by_language_code_shouldSkipOtherFiles() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path();
    let image_dir = root.join("translated_images");
    let es = FileManager::generate_translated_filename(root.join("logo.png"), "es", root);
    let fr = FileManager::generate_translated_filename(root.join("logo.png"), "fr", root);
    common::create_test_file(&image_dir, &es, "png")?;
    common::create_test_file(&image_dir, &fr, "png")?;
    common::create_test_file(&image_dir, "notes.es.txt", "keep")?;

    assert_eq!(FileManager::delete_translated_images_by_language_code("es", &image_dir), 1);
    assert!(image_dir.join(&fr).exists());
    assert!(image_dir.join("notes.es.txt").exists());
    Ok(())
}

#[test]
fn test_join_portable_shouldRoundTripRelativePaths() {
    let base = Path::new("/project");
    let joined = FileManager::join_portable(base, "docs/guide/a.md");
    assert_eq!(FileManager::portable_relative(&joined, base), Some("docs/guide/a.md".to_string()));
}
