/*!
 * Mock translators for testing.
 *
 * One `MockTranslator` implements all three category traits and records every
 * call, so tests can assert on exactly which (file, language) pairs reached a
 * backend:
 * - `MockTranslator::working()` - Tags every line with the target language
 * - `MockTranslator::failing()` - Always fails with a provider error
 * - `MockTranslator::empty()` - Succeeds with nothing usable
 * - `MockTranslator::failing_for(&["b.md"])` - Fails only for matching files
 * - `MockTranslator::broken_layout_once()` - Merges lines on the first attempt per pair
 */

use async_trait::async_trait;
use parking_lot::Mutex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::errors::{ProviderError, TranslationError};
use crate::project::tasks::Category;

use super::{ImageTranslator, MarkdownTranslator, NotebookTranslator, TranslatedText};

/// Behavior mode for the mock translator
#[derive(Debug, Clone, PartialEq)]
pub enum MockBehavior {
    Working,
    Failing,
    Empty,
    /// Fails when the source file name matches one of these
    FailingFor(Vec<String>),
    /// First markdown call per (file, language) collapses all lines into one
    BrokenLayoutOnce,
}

/// One recorded backend call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockCall {
    pub source: PathBuf,
    pub language_code: String,
    pub category: Category,
}

/// Scripted translator for all categories
#[derive(Debug, Clone)]
pub struct MockTranslator {
    behavior: MockBehavior,
    confidence: Option<f64>,
    calls: Arc<Mutex<Vec<MockCall>>>,
}

impl MockTranslator {
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            confidence: Some(0.95),
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    pub fn empty() -> Self {
        Self::new(MockBehavior::Empty)
    }

    pub fn failing_for(file_names: &[&str]) -> Self {
        Self::new(MockBehavior::FailingFor(
            file_names.iter().map(|name| name.to_string()).collect(),
        ))
    }

    pub fn broken_layout_once() -> Self {
        Self::new(MockBehavior::BrokenLayoutOnce)
    }

    /// Confidence reported with every successful text translation
    pub fn with_confidence(mut self, confidence: Option<f64>) -> Self {
        self.confidence = confidence;
        self
    }

    /// Every call so far, in call order
    pub fn calls(&self) -> Vec<MockCall> {
        self.calls.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    /// Calls made for one category
    pub fn calls_for(&self, category: Category) -> Vec<MockCall> {
        self.calls
            .lock()
            .iter()
            .filter(|call| call.category == category)
            .cloned()
            .collect()
    }

    /// Translation the working mock produces for a document
    pub fn tag_lines(text: &str, language_code: &str) -> String {
        text.lines()
            .map(|line| {
                if line.trim().is_empty() {
                    line.to_string()
                } else {
                    format!("[{}] {}", language_code, line)
                }
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Record the call and return how many earlier calls hit the same pair
    fn record(&self, source: &Path, language_code: &str, category: Category) -> usize {
        let mut calls = self.calls.lock();
        let previous = calls
            .iter()
            .filter(|c| c.source == source && c.language_code == language_code)
            .count();
        calls.push(MockCall {
            source: source.to_path_buf(),
            language_code: language_code.to_string(),
            category,
        });
        previous
    }

    fn check_failure(&self, source: &Path) -> Result<(), TranslationError> {
        let fails = match &self.behavior {
            MockBehavior::Failing => true,
            MockBehavior::FailingFor(names) => {
                let file_name = source.file_name().map(|n| n.to_string_lossy().to_string()).unwrap_or_default();
                names.iter().any(|name| *name == file_name)
            }
            _ => false,
        };
        if fails {
            Err(TranslationError::Provider(ProviderError::ApiError {
                status_code: 500,
                message: format!("Simulated failure for {}", source.display()),
            }))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl MarkdownTranslator for MockTranslator {
    async fn translate_markdown(
        &self,
        document: &str,
        language_code: &str,
        source: &Path,
        _markdown_only: bool,
    ) -> Result<TranslatedText, TranslationError> {
        let previous = self.record(source, language_code, Category::Markdown);
        self.check_failure(source)?;

        let text = match self.behavior {
            MockBehavior::Empty => String::new(),
            MockBehavior::BrokenLayoutOnce if previous == 0 => {
                document.split_whitespace().collect::<Vec<_>>().join(" ")
            }
            _ => Self::tag_lines(document, language_code),
        };
        Ok(TranslatedText::new(text, self.confidence))
    }
}

#[async_trait]
impl NotebookTranslator for MockTranslator {
    async fn translate_notebook(
        &self,
        notebook_json: &str,
        language_code: &str,
        source: &Path,
        _markdown_only: bool,
    ) -> Result<TranslatedText, TranslationError> {
        self.record(source, language_code, Category::Notebook);
        self.check_failure(source)?;

        let text = match self.behavior {
            MockBehavior::Empty => String::new(),
            _ => notebook_json.to_string(),
        };
        Ok(TranslatedText::new(text, self.confidence))
    }
}

#[async_trait]
impl ImageTranslator for MockTranslator {
    async fn translate_image(
        &self,
        image: &Path,
        language_code: &str,
        destination: &Path,
        _fast_mode: bool,
    ) -> Result<PathBuf, TranslationError> {
        self.record(image, language_code, Category::Image);
        self.check_failure(image)?;

        if self.behavior != MockBehavior::Empty {
            if let Some(parent) = destination.parent() {
                fs::create_dir_all(parent).map_err(|e| TranslationError::io(parent, e))?;
            }
            fs::copy(image, destination).map_err(|e| TranslationError::io(destination, e))?;
        }
        Ok(destination.to_path_buf())
    }
}
