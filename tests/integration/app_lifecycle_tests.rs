/*!
 * Integration tests for the application controller
 */

use anyhow::Result;
use std::sync::Arc;

use doctran::app_controller::{Controller, RunOptions};
use doctran::errors::ConfigError;
use doctran::project::{Category, CategorySet, ProgressReporter};
use doctran::translation::mock::MockTranslator;
use crate::common;

fn controller(mock: &MockTranslator, with_images: bool) -> Result<Controller> {
    let image: Option<Arc<dyn doctran::ImageTranslator>> = if with_images {
        Some(Arc::new(mock.clone()))
    } else {
        None
    };
    Ok(Controller::with_config(common::test_config())?
        .with_translators(Arc::new(mock.clone()), Some(Arc::new(mock.clone())), image)
        .with_progress(ProgressReporter::hidden()))
}

fn languages(codes: &[&str]) -> Vec<String> {
    codes.iter().map(|code| code.to_string()).collect()
}

/// Default categories include images only when an image backend exists
#[tokio::test]
async fn test_run_withDefaultCategories_shouldFollowAvailableBackends() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path();
    common::create_test_file(root, "a.md", "Hello")?;
    common::create_test_file(root, "intro.ipynb", &common::sample_notebook("Intro"))?;
    common::create_test_file(root, "logo.png", "png-bytes")?;

    let text_only = MockTranslator::working();
    let summary = controller(&text_only, false)?
        .run(RunOptions::new(root, languages(&["es"])))
        .await?;
    assert_eq!(summary.modified, 2);
    assert!(text_only.calls_for(Category::Image).is_empty());

    let everything = MockTranslator::working();
    let summary = controller(&everything, true)?
        .run(RunOptions::new(root, languages(&["es"])))
        .await?;
    assert_eq!(summary.modified, 1);
    assert_eq!(everything.calls_for(Category::Image).len(), 1);
    Ok(())
}

/// An explicit selection restricts the run to those categories
#[tokio::test]
async fn test_run_withNotebookOnly_shouldSkipMarkdown() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path();
    common::create_test_file(root, "a.md", "Hello")?;
    common::create_test_file(root, "intro.ipynb", &common::sample_notebook("Intro"))?;

    let mock = MockTranslator::working();
    let mut options = RunOptions::new(root, languages(&["fr"]));
    options.categories = CategorySet {
        notebook: true,
        ..CategorySet::default()
    };
    let summary = controller(&mock, false)?.run(options).await?;

    assert_eq!(summary.modified, 1);
    assert!(mock.calls_for(Category::Markdown).is_empty());
    assert!(root.join("translations/fr/intro.ipynb").exists());
    assert!(!root.join("translations/fr/a.md").exists());
    Ok(())
}

/// Fix mode retranslates artifacts scored below the threshold, per language
#[tokio::test]
async fn test_run_withFix_shouldRetranslateLowConfidence() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path();
    common::create_test_file(root, "a.md", "Hello")?;
    common::create_test_file(root, "b.md", "World")?;

    let weak = MockTranslator::working().with_confidence(Some(0.4));
    controller(&weak, false)?
        .run(RunOptions::new(root, languages(&["es", "ja"])))
        .await?;
    assert_eq!(weak.call_count(), 4);

    let strong = MockTranslator::working().with_confidence(Some(0.9));
    let mut fix = RunOptions::new(root, languages(&["es"]));
    fix.fix = true;
    fix.min_confidence = 0.5;
    let summary = controller(&strong, false)?.run(fix.clone()).await?;
    assert_eq!(summary.modified, 2);
    assert!(strong.calls().iter().all(|call| call.language_code == "es"));

    let again = controller(&strong, false)?.run(fix).await?;
    assert_eq!(again.modified, 0);
    assert_eq!(strong.call_count(), 2);
    Ok(())
}

/// Fix mode repairs markdown artifacts whose line layout broke
#[tokio::test]
async fn test_run_withFix_shouldRepairBrokenLayout() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path();
    common::create_test_file(root, "a.md", "One\n\nTwo\n\nThree")?;
    common::create_test_file(root, "translations/es/a.md", "Uno Dos Tres")?;

    let mock = MockTranslator::working();
    let mut fix = RunOptions::new(root, languages(&["es"]));
    fix.fix = true;
    let summary = controller(&mock, false)?.run(fix).await?;

    assert!(summary.modified >= 1);
    let body = std::fs::read_to_string(root.join("translations/es/a.md"))?;
    assert!(body.starts_with("[es] One\n\n[es] Two\n\n[es] Three"));
    Ok(())
}

/// Artifacts of empty sources are never queued again by fix mode
#[tokio::test]
async fn test_run_withFixOverEmptySources_shouldSettle() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path();
    common::create_test_file(root, "empty.md", "")?;
    common::create_test_file(root, "blank.ipynb", "")?;

    let unscored = MockTranslator::working().with_confidence(None);
    let summary = controller(&unscored, false)?
        .run(RunOptions::new(root, languages(&["es"])))
        .await?;
    assert_eq!(summary.modified, 2);

    let mut fix = RunOptions::new(root, languages(&["es"]));
    fix.fix = true;
    for _ in 0..2 {
        let fixed = controller(&unscored, false)?.run(fix.clone()).await?;
        assert_eq!(fixed.modified, 0);
        assert!(fixed.is_clean());
    }
    assert_eq!(unscored.call_count(), 0);
    Ok(())
}

/// An unknown language code is rejected before anything runs
#[tokio::test]
async fn test_run_withInvalidLanguage_shouldFailEarly() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let root = temp_dir.path();
    common::create_test_file(root, "a.md", "Hello")?;

    let mock = MockTranslator::working();
    let result = controller(&mock, false)?
        .run(RunOptions::new(root, languages(&["es", "xx"])))
        .await;

    let err = result.expect_err("invalid language should fail");
    assert!(matches!(
        err.downcast_ref::<ConfigError>(),
        Some(ConfigError::InvalidLanguageCode(_))
    ));
    assert_eq!(mock.call_count(), 0);
    Ok(())
}
