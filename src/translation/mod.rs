/*!
 * Category translators.
 *
 * The orchestrator talks to three backends through the traits below, one per
 * file category. Text backends return plain translated content; the
 * orchestrator owns metadata embedding and writing. The image backend writes
 * its own output because images are opaque to the core.
 *
 * - `markdown`: chat-completion markdown translator with chunking
 * - `notebook`: notebook translator built on a markdown translator
 * - `prompts`: system prompt templates
 * - `quality`: structural confidence scoring
 * - `mock`: scripted translators for tests
 */

use async_trait::async_trait;
use std::fmt::Debug;
use std::path::{Path, PathBuf};

use crate::errors::TranslationError;

/// Translated text plus the backend's confidence in it
#[derive(Debug, Clone, PartialEq)]
pub struct TranslatedText {
    pub text: String,
    /// Score in [0, 1], `None` when the backend does not score
    pub confidence: Option<f64>,
}

impl TranslatedText {
    pub fn new(text: impl Into<String>, confidence: Option<f64>) -> Self {
        Self { text: text.into(), confidence }
    }
}

/// Translates one markdown document
#[async_trait]
pub trait MarkdownTranslator: Send + Sync + Debug {
    /// `source` is for logging and attribution only; the content is `document`.
    /// With `markdown_only`, image references are left exactly as written.
    async fn translate_markdown(
        &self,
        document: &str,
        language_code: &str,
        source: &Path,
        markdown_only: bool,
    ) -> Result<TranslatedText, TranslationError>;
}

/// Translates one notebook, given as its JSON text
#[async_trait]
pub trait NotebookTranslator: Send + Sync + Debug {
    async fn translate_notebook(
        &self,
        notebook_json: &str,
        language_code: &str,
        source: &Path,
        markdown_only: bool,
    ) -> Result<TranslatedText, TranslationError>;
}

/// Translates the text inside one image and writes the result to `destination`
#[async_trait]
pub trait ImageTranslator: Send + Sync + Debug {
    async fn translate_image(
        &self,
        image: &Path,
        language_code: &str,
        destination: &Path,
        fast_mode: bool,
    ) -> Result<PathBuf, TranslationError>;
}

pub use self::markdown::{LlmMarkdownTranslator, split_markdown};
pub use self::notebook::CellNotebookTranslator;
pub use self::prompts::PromptTemplate;
pub use self::quality::{QualityScore, score_translation};

pub mod markdown;
pub mod mock;
pub mod notebook;
pub mod prompts;
pub mod quality;
