/*!
 * Integration tests for per-item failure handling
 */

use anyhow::Result;
use std::time::Duration;

use doctran::project::Category;
use doctran::translation::mock::MockTranslator;
use crate::common;

/// One failing markdown file does not stop the others in a sequential batch
#[tokio::test]
async fn test_sequential_batch_withOneFailure_shouldTranslateTheRest() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path();
    for name in ["a.md", "b.md", "c.md"] {
        common::create_test_file(root, name, name)?;
    }

    let mock = MockTranslator::failing_for(&["b.md"]);
    let manager = common::create_manager(root, &["es"], &mock).with_request_delay(Duration::from_millis(1));
    let summary = manager.translate_all_markdown_files(false).await;

    assert_eq!(summary.modified, 2);
    assert_eq!(summary.errors.len(), 1);
    assert!(summary.errors[0].contains("b.md"));
    assert!(summary.errors[0].contains("(lang: es)"));
    assert!(root.join("translations/es/a.md").exists());
    assert!(!root.join("translations/es/b.md").exists());
    assert!(root.join("translations/es/c.md").exists());
    assert_eq!(mock.call_count(), 3);
    Ok(())
}

/// One failing image does not stop the others in a parallel batch
#[tokio::test]
async fn test_parallel_batch_withOneFailure_shouldAttributeExactly() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path();
    for name in ["a.png", "b.png", "c.png", "d.png"] {
        common::create_test_file(root, name, "png-bytes")?;
    }

    let mock = MockTranslator::failing_for(&["c.png"]);
    let manager = common::create_manager(root, &["es", "fr"], &mock).with_parallel_workers(3);
    let summary = manager.translate_all_image_files(false, true).await;

    assert_eq!(summary.modified, 6);
    assert_eq!(summary.errors.len(), 2);
    assert!(summary.errors.iter().all(|message| message.contains("c.png")));
    assert!(summary.errors.iter().any(|message| message.contains("(lang: es)")));
    assert!(summary.errors.iter().any(|message| message.contains("(lang: fr)")));
    assert_eq!(mock.calls_for(Category::Image).len(), 8);
    Ok(())
}

/// A failed item is picked up again by the next run
#[test]
fn test_rerun_afterFailure_shouldConverge() -> Result<()> {
    common::init_test_logger();
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path();
    common::create_test_file(root, "a.md", "Hello")?;

    let failing = common::create_manager(root, &["es"], &MockTranslator::failing());
    let first = tokio_test::block_on(failing.translate_project(false, true, false, false, false));
    assert_eq!(first.modified, 0);
    assert_eq!(first.errors.len(), 1);

    let working = MockTranslator::working();
    let second = tokio_test::block_on(
        common::create_manager(root, &["es"], &working).translate_project(false, true, false, false, false),
    );
    assert_eq!(second.modified, 1);
    assert!(second.is_clean());
    assert_eq!(
        common::stored_fingerprint(&root.join("translations/es/a.md")),
        Some(common::fingerprint_of("Hello"))
    );
    Ok(())
}

/// A backend answering with nothing is a failure, not an empty artifact
#[tokio::test]
async fn test_translate_project_withEmptyBackendAnswer_shouldRecordError() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path();
    common::create_test_file(root, "a.md", "Hello")?;

    let manager = common::create_manager(root, &["es"], &MockTranslator::empty());
    let summary = manager.translate_project(false, true, false, false, false).await;

    assert_eq!(summary.modified, 0);
    assert_eq!(summary.errors.len(), 1);
    assert!(!root.join("translations/es/a.md").exists());
    Ok(())
}
