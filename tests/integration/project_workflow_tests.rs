/*!
 * Integration tests for whole-project translation runs
 */

use anyhow::Result;
use std::fs;

use doctran::project::{Category, metadata};
use doctran::translation::mock::MockTranslator;
use crate::common;

/// A single markdown file produces a single artifact carrying its fingerprint
#[tokio::test]
async fn test_translate_project_withSingleMarkdown_shouldWriteMirroredArtifact() -> Result<()> {
    common::init_test_logger();
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path();
    common::create_test_file(root, "docs/a.md", "Hello")?;

    let mock = MockTranslator::working();
    let manager = common::create_manager(root, &["es"], &mock).with_markdown_only(true);
    let summary = manager.translate_project(false, true, false, false, false).await;

    assert_eq!(summary.modified, 1);
    assert!(summary.is_clean());
    assert_eq!(mock.calls_for(Category::Markdown).len(), 1);

    let artifact = root.join("translations/es/docs/a.md");
    let body = fs::read_to_string(&artifact)?;
    assert!(metadata::strip(&body).starts_with("[es] Hello"));
    assert_eq!(common::stored_fingerprint(&artifact), Some(common::fingerprint_of("Hello")));
    Ok(())
}

/// A second run over an unchanged project does nothing
#[tokio::test]
async fn test_translate_project_runTwice_shouldBeIdempotent() -> Result<()> {
    common::init_test_logger();
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path();
    common::create_test_file(root, "README.md", "# Project\n\nIntro")?;
    common::create_test_file(root, "guide/setup.md", "Install it")?;
    common::create_test_file(root, "notebooks/intro.ipynb", &common::sample_notebook("Intro"))?;

    let mock = MockTranslator::working();
    let manager = common::create_manager(root, &["es", "fr"], &mock);

    let first = manager.translate_project(false, true, true, false, false).await;
    assert_eq!(first.modified, 6);
    assert!(first.is_clean());

    let second = manager.translate_project(false, true, true, false, false).await;
    assert_eq!(second.modified, 0);
    assert!(second.is_clean());
    assert_eq!(mock.call_count(), 6);
    assert!(manager.get_outdated_translations().is_empty());
    Ok(())
}

/// Every artifact records the fingerprint of its current source
#[tokio::test]
async fn test_translate_project_shouldConverge() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path();
    common::create_test_file(root, "a.md", "Alpha")?;
    common::create_test_file(root, "nested/deeper/b.md", "Beta\n\nGamma")?;
    let notebook = common::sample_notebook("Notes");
    common::create_test_file(root, "c.ipynb", &notebook)?;

    let manager = common::create_manager(root, &["ko"], &MockTranslator::working());
    manager.translate_project(false, true, true, false, false).await;

    let translations = root.join("translations/ko");
    assert_eq!(common::stored_fingerprint(&translations.join("a.md")), Some(common::fingerprint_of("Alpha")));
    assert_eq!(
        common::stored_fingerprint(&translations.join("nested/deeper/b.md")),
        Some(common::fingerprint_of("Beta\n\nGamma"))
    );
    assert_eq!(common::stored_fingerprint(&translations.join("c.ipynb")), Some(common::fingerprint_of(&notebook)));
    Ok(())
}

/// Editing a source makes exactly its artifact outdated, and the next run refreshes it
#[tokio::test]
async fn test_translate_project_withEditedSource_shouldRetranslateIt() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path();
    let source = common::create_test_file(root, "docs/a.md", "Hello")?;
    common::create_test_file(root, "docs/b.md", "Untouched")?;

    let mock = MockTranslator::working();
    let manager = common::create_manager(root, &["es"], &mock);
    manager.translate_project(false, true, false, false, false).await;

    fs::write(&source, "Hello world")?;
    let outdated = manager.get_outdated_translations();
    assert_eq!(outdated.len(), 1);
    assert_eq!(outdated[0].source, source);
    assert_eq!(outdated[0].language_code, "es");

    let summary = manager.translate_project(false, true, false, false, false).await;
    assert_eq!(summary.modified, 1);

    let artifact = root.join("translations/es/docs/a.md");
    assert_eq!(common::stored_fingerprint(&artifact), Some(common::fingerprint_of("Hello world")));
    assert!(fs::read_to_string(&artifact)?.contains("[es] Hello world"));
    assert!(manager.get_outdated_translations().is_empty());
    assert_eq!(mock.call_count(), 3);
    Ok(())
}

/// An artifact without metadata is treated as outdated
#[tokio::test]
async fn test_get_outdated_translations_withHandWrittenArtifact_shouldIncludeIt() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path();
    common::create_test_file(root, "a.md", "Hello")?;
    common::create_test_file(root, "translations/es/a.md", "Hola")?;

    let manager = common::create_manager(root, &["es"], &MockTranslator::working());
    assert_eq!(manager.get_outdated_translations().len(), 1);
    Ok(())
}

/// Update mode deletes existing artifacts and translates everything again
#[tokio::test]
async fn test_translate_project_withUpdate_shouldRegenerateEverything() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path();
    for name in ["a.md", "b.md", "c.md"] {
        common::create_test_file(root, name, name)?;
    }

    let mock = MockTranslator::working();
    let manager = common::create_manager(root, &["es"], &mock);
    manager.translate_project(false, true, false, false, false).await;
    assert_eq!(mock.call_count(), 3);

    let summary = manager.translate_project(false, true, false, true, false).await;
    assert_eq!(summary.modified, 3);
    assert_eq!(mock.call_count(), 6);
    for name in ["a.md", "b.md", "c.md"] {
        assert!(root.join("translations/es").join(name).exists());
    }
    Ok(())
}

/// Images are translated into the flat image directory under their mangled names
#[tokio::test]
async fn test_translate_project_withImages_shouldUseImageDirectory() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path();
    let logo = common::create_test_file(root, "img/logo.png", "png-bytes")?;

    let mock = MockTranslator::working();
    let manager = common::create_manager(root, &["es", "ja"], &mock);
    let summary = manager.translate_project(true, false, false, false, false).await;

    assert_eq!(summary.modified, 2);
    assert_eq!(mock.calls_for(Category::Image).len(), 2);
    for language in ["es", "ja"] {
        let destination = manager.layout().image_destination(&logo, language);
        assert!(destination.starts_with(root.join("translated_images")));
        assert!(destination.exists());
    }

    let again = manager.translate_project(true, false, false, false, false).await;
    assert_eq!(again.modified, 0);
    Ok(())
}

/// Markdown-only mode never runs the image stage
#[tokio::test]
async fn test_translate_project_withMarkdownOnly_shouldSkipImages() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path();
    common::create_test_file(root, "a.md", "Hello")?;
    common::create_test_file(root, "logo.png", "png-bytes")?;

    let mock = MockTranslator::working();
    let manager = common::create_manager(root, &["es"], &mock).with_markdown_only(true);
    manager.translate_project(true, true, false, false, false).await;

    assert!(mock.calls_for(Category::Image).is_empty());
    assert_eq!(mock.calls_for(Category::Markdown).len(), 1);
    Ok(())
}

/// Excluded directories and output trees are never treated as sources
#[tokio::test]
async fn test_translate_project_shouldIgnoreExcludedDirectories() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path();
    common::create_test_file(root, "a.md", "Hello")?;
    common::create_test_file(root, "node_modules/pkg/README.md", "vendored")?;

    let mock = MockTranslator::working();
    let manager = common::create_manager(root, &["es"], &mock);
    manager.translate_project(false, true, false, false, false).await;
    manager.translate_project(false, true, false, false, false).await;

    assert_eq!(mock.call_count(), 1);
    assert!(!root.join("translations/es/node_modules").exists());
    assert!(!root.join("translations/es/translations").exists());
    Ok(())
}
