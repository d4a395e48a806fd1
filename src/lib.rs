/*!
 * # doctran - translation orchestration for documentation projects
 *
 * Keeps translated copies of a documentation tree (markdown files, Jupyter
 * notebooks and images) in sync with their sources across many languages.
 *
 * ## Features
 *
 * - Per-language mirrors of the source tree under a translations directory
 * - Content fingerprints embedded in every artifact, so edited sources are
 *   detected and retranslated on the next run
 * - Orphan cleanup when sources are deleted or moved
 * - Bounded parallelism for images, paced sequential requests for text
 * - Fix mode for artifacts with a broken layout or a low confidence score
 * - OpenAI-compatible chat completion backend for markdown and notebooks
 *
 * ## Architecture
 *
 * - `app_config`: Configuration management
 * - `project`: Orchestration over the whole project:
 *   - `project::manager`: The orchestrator (`TranslationManager`)
 *   - `project::directory`: Directory synchronization and orphan cleanup
 *   - `project::staleness`: Outdated translation detection
 *   - `project::executor`: Batch execution
 * - `translation`: Category translator traits and their implementations
 * - `providers`: Chat completion clients
 * - `file_utils`: File system operations
 * - `language_utils`: ISO language code utilities
 * - `app_controller`: Main application controller
 * - `errors`: Custom error types for the application
 */

#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

pub mod app_config;
pub mod app_controller;
pub mod errors;
pub mod file_utils;
pub mod language_utils;
pub mod project;
pub mod providers;
pub mod translation;

pub use app_config::Config;
pub use errors::{ConfigError, ProviderError, TranslationError};
pub use language_utils::get_language_name;
pub use project::{ProjectLayout, TranslationManager, TranslationSummary};
pub use translation::{ImageTranslator, MarkdownTranslator, NotebookTranslator, TranslatedText};
