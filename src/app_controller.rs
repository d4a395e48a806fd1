//! Application controller for project translation

use anyhow::{Context, Result};
use log::{debug, error, info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::app_config::Config;
use crate::errors::ConfigError;
use crate::language_utils;
use crate::project::{CategorySet, ProgressReporter, ProjectLayout, TranslationManager, TranslationSummary};
use crate::providers::openai::OpenAI;
use crate::translation::markdown::LlmMarkdownTranslator;
use crate::translation::notebook::CellNotebookTranslator;
use crate::translation::{ImageTranslator, MarkdownTranslator, NotebookTranslator};

/// Default threshold below which fix mode retranslates an artifact
pub const DEFAULT_MIN_CONFIDENCE: f64 = 0.7;

/// What one invocation should do
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Project root holding the sources
    pub root_dir: PathBuf,
    /// Target languages, already expanded
    pub language_codes: Vec<String>,
    /// Requested categories; all false means "the defaults"
    pub categories: CategorySet,
    pub update: bool,
    pub fast_mode: bool,
    /// Retranslate low confidence artifacts instead of a normal run
    pub fix: bool,
    pub min_confidence: f64,
}

impl RunOptions {
    pub fn new(root_dir: impl Into<PathBuf>, language_codes: Vec<String>) -> Self {
        Self {
            root_dir: root_dir.into(),
            language_codes,
            categories: CategorySet::default(),
            update: false,
            fast_mode: false,
            fix: false,
            min_confidence: DEFAULT_MIN_CONFIDENCE,
        }
    }
}

/// Main application controller for project translation
#[derive(Debug)]
pub struct Controller {
    config: Config,
    progress: ProgressReporter,
    markdown: Option<Arc<dyn MarkdownTranslator>>,
    notebook: Option<Arc<dyn NotebookTranslator>>,
    image: Option<Arc<dyn ImageTranslator>>,
}

impl Controller {
    /// Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self> {
        config.validate().context("Configuration validation failed")?;
        Ok(Self {
            config,
            progress: ProgressReporter::new(),
            markdown: None,
            notebook: None,
            image: None,
        })
    }

    /// Use these backends instead of the ones built from the configuration
    pub fn with_translators(
        mut self,
        markdown: Arc<dyn MarkdownTranslator>,
        notebook: Option<Arc<dyn NotebookTranslator>>,
        image: Option<Arc<dyn ImageTranslator>>,
    ) -> Self {
        self.markdown = Some(markdown);
        self.notebook = notebook;
        self.image = image;
        self
    }

    pub fn with_progress(mut self, progress: ProgressReporter) -> Self {
        self.progress = progress;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Whether images can be translated at all
    pub fn has_image_backend(&self) -> bool {
        self.image.is_some()
    }

    /// Categories to run: the explicit selection, or the defaults when nothing was selected
    ///
    /// Images are dropped with a warning when no image backend is available.
    pub fn resolve_categories(&self, requested: CategorySet) -> CategorySet {
        let mut categories = if requested == CategorySet::default() {
            CategorySet {
                markdown: true,
                notebook: true,
                images: self.has_image_backend(),
            }
        } else {
            requested
        };

        if categories.images && !self.has_image_backend() {
            warn!("No image translation backend is configured: image translation will be disabled.");
            categories.images = false;
        }
        categories
    }

    /// Run translate or fix mode and return the combined summary
    pub async fn run(&self, options: RunOptions) -> Result<TranslationSummary> {
        let start_time = Instant::now();
        let root_dir = Self::validate_root_dir(&options.root_dir)?;

        if options.language_codes.is_empty() {
            return Err(ConfigError::NoLanguages.into());
        }
        for code in &options.language_codes {
            language_utils::validate_language_code(code)?;
        }

        let categories = self.resolve_categories(options.categories);
        info!("Translation mode: {}", Self::describe(categories));

        let manager = self.build_manager(&root_dir, &options, categories)?;

        let summary = if options.fix {
            self.run_fix(&manager, &options, categories).await
        } else {
            manager
                .translate_project(
                    categories.images,
                    categories.markdown,
                    categories.notebook,
                    options.update,
                    options.fast_mode,
                )
                .await
        };

        Self::report(&summary);
        info!(
            "Project translation completed for languages: {} in {}",
            options.language_codes.join(" "),
            Self::format_duration(start_time.elapsed())
        );
        Ok(summary)
    }

    fn validate_root_dir(root_dir: &Path) -> Result<PathBuf, ConfigError> {
        if !root_dir.is_dir() {
            return Err(ConfigError::InvalidRootDirectory(root_dir.to_path_buf()));
        }
        root_dir
            .canonicalize()
            .map_err(|_| ConfigError::InvalidRootDirectory(root_dir.to_path_buf()))
    }

    fn build_manager(&self, root_dir: &Path, options: &RunOptions, categories: CategorySet) -> Result<TranslationManager> {
        let (markdown, notebook) = match &self.markdown {
            Some(markdown) => (markdown.clone(), self.notebook.clone()),
            None => {
                if categories.markdown || categories.notebook {
                    self.config.validate_credentials()?;
                }
                let provider = OpenAI::from_config(&self.config.llm);
                let markdown: Arc<dyn MarkdownTranslator> =
                    Arc::new(LlmMarkdownTranslator::new(provider, self.config.llm.clone()));
                let notebook: Arc<dyn NotebookTranslator> = Arc::new(CellNotebookTranslator::new(markdown.clone()));
                (markdown, Some(notebook))
            }
        };

        let layout = ProjectLayout::new(root_dir, &self.config);
        debug!(
            "Translations in {}, images in {}",
            layout.translations_dir.display(),
            layout.image_dir.display()
        );

        let mut manager = TranslationManager::new(layout, options.language_codes.clone(), markdown)
            .with_markdown_only(categories.markdown && !categories.images)
            .with_parallel_workers(self.config.parallel_workers)
            .with_request_delay(Duration::from_millis(self.config.request_delay_ms))
            .with_progress(self.progress.clone());
        if let Some(notebook) = notebook {
            manager = manager.with_notebook_translator(notebook);
        }
        if let Some(image) = &self.image {
            manager = manager.with_image_translator(image.clone());
        }
        Ok(manager)
    }

    async fn run_fix(&self, manager: &TranslationManager, options: &RunOptions, categories: CategorySet) -> TranslationSummary {
        info!("Fixing translations with confidence below {}...", options.min_confidence);
        if categories.images && !categories.markdown && !categories.notebook {
            warn!("Fix mode only applies to markdown files and notebooks, not images.");
        }

        let mut summary = TranslationSummary::default();
        if categories.markdown {
            summary.merge(manager.check_and_retry_translations().await);
        }
        for language_code in &options.language_codes {
            info!("Processing language: {}", language_code);
            let fixed = manager
                .retranslate_low_confidence_files(language_code, options.min_confidence, categories)
                .await;
            if fixed.modified == 0 && fixed.errors.is_empty() {
                info!(
                    "No files with confidence below {} needed retranslation for {}",
                    options.min_confidence, language_code
                );
            }
            summary.merge(fixed);
        }
        summary
    }

    fn describe(categories: CategorySet) -> String {
        let names: Vec<&str> = categories.enabled().iter().map(|category| category.label()).collect();
        if names.is_empty() {
            "no files to translate".to_string()
        } else {
            names.join(", ")
        }
    }

    fn report(summary: &TranslationSummary) {
        info!("Total files modified: {}", summary.modified);
        if !summary.errors.is_empty() {
            warn!("Total errors: {}", summary.errors.len());
            for message in &summary.errors {
                error!("{}", message);
            }
        }
    }

    /// Duration as a human-readable string
    fn format_duration(duration: Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }
}
