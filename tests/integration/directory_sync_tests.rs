/*!
 * Integration tests for orphan cleanup and directory mirroring
 */

use anyhow::Result;
use std::fs;

use doctran::project::{CategorySet, DirectoryManager, ProjectLayout};
use doctran::translation::mock::MockTranslator;
use crate::common;

fn directories(root: &std::path::Path, languages: &[&str]) -> DirectoryManager {
    let layout = ProjectLayout::new(root, &common::test_config());
    DirectoryManager::new(layout, languages.iter().map(|l| l.to_string()).collect())
}

/// Deleting a source removes its artifacts only for enabled categories
#[tokio::test]
async fn test_cleanup_withDisabledImages_shouldKeepImageOrphans() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path();
    let doc = common::create_test_file(root, "a.md", "Hello")?;
    let logo = common::create_test_file(root, "logo.png", "png-bytes")?;

    let manager = common::create_manager(root, &["es"], &MockTranslator::working());
    manager.translate_project(true, true, false, false, false).await;
    let translated_doc = root.join("translations/es/a.md");
    let translated_logo = manager.layout().image_destination(&logo, "es");
    assert!(translated_doc.exists() && translated_logo.exists());

    fs::remove_file(&doc)?;
    fs::remove_file(&logo)?;
    manager.translate_project(false, true, false, false, false).await;
    assert!(!translated_doc.exists());
    assert!(translated_logo.exists());

    manager.translate_project(true, false, false, false, false).await;
    assert!(!translated_logo.exists());
    Ok(())
}

/// Orphans of languages that were not requested are left alone
#[test]
fn test_cleanup_shouldIgnoreOtherLanguages() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path();
    common::create_test_file(root, "translations/es/gone.md", "orphan")?;
    common::create_test_file(root, "translations/fr/gone.md", "orphan")?;

    let removed = directories(root, &["es"]).cleanup_orphaned_translations(CategorySet::all());

    assert_eq!(removed, 1);
    assert!(!root.join("translations/es/gone.md").exists());
    assert!(root.join("translations/fr/gone.md").exists());
    Ok(())
}

/// Sync mirrors source directories and is a no-op the second time
#[test]
fn test_sync_directory_structure_shouldMirrorThenSettle() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path();
    common::create_test_file(root, "guide/basics/intro.md", "Intro")?;
    common::create_test_file(root, "notebooks/lab.ipynb", &common::sample_notebook("Lab"))?;
    fs::create_dir_all(root.join("empty_dir"))?;

    let directories = directories(root, &["es", "ko"]);
    let first = directories.sync_directory_structure();
    assert!(first.created >= 4);
    for language in ["es", "ko"] {
        assert!(root.join("translations").join(language).join("guide/basics").is_dir());
        assert!(root.join("translations").join(language).join("notebooks").is_dir());
        assert!(!root.join("translations").join(language).join("empty_dir").exists());
    }

    let second = directories.sync_directory_structure();
    assert!(second.is_noop());
    Ok(())
}

/// A moved source directory leaves no empty mirror behind
#[tokio::test]
async fn test_translate_project_withMovedDirectory_shouldRemoveStaleMirror() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path();
    common::create_test_file(root, "old/deep/page.md", "Page")?;

    let mock = MockTranslator::working();
    let manager = common::create_manager(root, &["es"], &mock);
    manager.translate_project(false, true, false, false, false).await;
    assert!(root.join("translations/es/old/deep/page.md").exists());

    fs::create_dir_all(root.join("new"))?;
    fs::rename(root.join("old/deep"), root.join("new/deep"))?;
    fs::remove_dir(root.join("old"))?;

    let summary = manager.translate_project(false, true, false, false, false).await;
    assert_eq!(summary.modified, 1);
    assert!(!root.join("translations/es/old").exists());
    assert!(root.join("translations/es/new/deep/page.md").exists());
    Ok(())
}

/// Sync never deletes a mirrored directory that still holds files
#[test]
fn test_sync_directory_structure_shouldKeepNonEmptyDirectories() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path();
    common::create_test_file(root, "a.md", "Hello")?;
    common::create_test_file(root, "translations/es/notes/keep.txt", "user file")?;

    let report = directories(root, &["es"]).sync_directory_structure();

    assert_eq!(report.removed, 0);
    assert!(root.join("translations/es/notes/keep.txt").exists());
    Ok(())
}
