/*!
 * Translation orchestration for a whole project.
 *
 * `TranslationManager` owns the per-item translate-and-write step for every
 * category and the batch operations built on it. A run of `translate_project`
 * goes through fixed stages:
 *
 * 1. remove orphaned artifacts of the enabled categories
 * 2. mirror the source directory structure
 * 3. retranslate stale text artifacts
 * 4. translate missing markdown, then notebooks, then images
 *
 * Per-item failures become error strings in the returned summary; nothing
 * short of a panic stops a run. Text batches run one item at a time with a
 * pause between requests, image batches run with bounded parallelism.
 */

use log::{debug, error, info, warn};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::errors::TranslationError;
use crate::file_utils::FileManager;
use crate::translation::{ImageTranslator, MarkdownTranslator, NotebookTranslator};

use super::directory::DirectoryManager;
use super::executor::{ExecutionMode, TaskExecutor};
use super::fingerprint::fingerprint;
use super::layout::ProjectLayout;
use super::metadata::{self, TranslationMetadata};
use super::progress::ProgressReporter;
use super::staleness::{self, OutdatedTranslation};
use super::tasks::{Category, CategorySet, SourceFile, TaskGenerator, WorkItem};

/// Score recorded when a source had nothing to translate
const NOTHING_TO_TRANSLATE: f64 = 1.0;

/// Outcome of a batch or a whole run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslationSummary {
    /// Artifacts written
    pub modified: usize,
    /// One message per failed item, naming file and language
    pub errors: Vec<String>,
}

impl TranslationSummary {
    pub fn merge(&mut self, other: TranslationSummary) {
        self.modified += other.modified;
        self.errors.extend(other.errors);
    }

    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Orchestrates translation of one project into a set of languages
#[derive(Debug)]
pub struct TranslationManager {
    layout: ProjectLayout,
    language_codes: Vec<String>,
    markdown_translator: Arc<dyn MarkdownTranslator>,
    notebook_translator: Option<Arc<dyn NotebookTranslator>>,
    image_translator: Option<Arc<dyn ImageTranslator>>,
    markdown_only: bool,
    parallel_workers: usize,
    request_delay: Duration,
    progress: ProgressReporter,
    directories: DirectoryManager,
}

impl TranslationManager {
    /// Manager with only a markdown backend, no pacing and hidden progress
    pub fn new(layout: ProjectLayout, language_codes: Vec<String>, markdown_translator: Arc<dyn MarkdownTranslator>) -> Self {
        let directories = DirectoryManager::new(layout.clone(), language_codes.clone());
        Self {
            layout,
            language_codes,
            markdown_translator,
            notebook_translator: None,
            image_translator: None,
            markdown_only: false,
            parallel_workers: 5,
            request_delay: Duration::ZERO,
            progress: ProgressReporter::hidden(),
            directories,
        }
    }

    pub fn with_notebook_translator(mut self, translator: Arc<dyn NotebookTranslator>) -> Self {
        self.notebook_translator = Some(translator);
        self
    }

    pub fn with_image_translator(mut self, translator: Arc<dyn ImageTranslator>) -> Self {
        self.image_translator = Some(translator);
        self
    }

    /// Leave images alone entirely: no image stage, image links untouched
    pub fn with_markdown_only(mut self, markdown_only: bool) -> Self {
        self.markdown_only = markdown_only;
        self
    }

    pub fn with_parallel_workers(mut self, workers: usize) -> Self {
        self.parallel_workers = workers.max(1);
        self
    }

    /// Pause between consecutive text translation requests
    pub fn with_request_delay(mut self, delay: Duration) -> Self {
        self.request_delay = delay;
        self
    }

    pub fn with_progress(mut self, progress: ProgressReporter) -> Self {
        self.progress = progress;
        self
    }

    pub fn layout(&self) -> &ProjectLayout {
        &self.layout
    }

    fn sequential(&self) -> TaskExecutor {
        TaskExecutor::new(ExecutionMode::Sequential).with_pacing(self.request_delay)
    }

    fn parallel(&self) -> TaskExecutor {
        TaskExecutor::new(ExecutionMode::Parallel { workers: self.parallel_workers })
    }

    fn generator(&self) -> TaskGenerator<'_> {
        TaskGenerator::new(&self.layout, &self.language_codes)
    }

    /// Work item for an explicit (file, language) pair
    fn work_item(&self, file_path: &Path, language_code: &str, category: Category) -> Result<WorkItem, TranslationError> {
        let relative_path = FileManager::portable_relative(file_path, &self.layout.root_dir)
            .ok_or_else(|| TranslationError::UnreadableSource(file_path.to_path_buf()))?;
        let source = SourceFile {
            path: file_path.to_path_buf(),
            relative_path,
            category,
        };
        let destination = self.generator().destination(&source, language_code);
        Ok(WorkItem {
            source,
            language_code: language_code.to_string(),
            destination,
        })
    }

    /// Read a text source, returning its content and fingerprint-bearing metadata
    fn read_source(&self, item: &WorkItem) -> Result<(String, TranslationMetadata), TranslationError> {
        let path = &item.source.path;
        let bytes = fs::read(path).map_err(|e| TranslationError::io(path, e))?;
        let meta = TranslationMetadata::new(&fingerprint(&bytes), &item.language_code, &item.source.relative_path);
        let document = String::from_utf8(bytes).map_err(|_| TranslationError::UnreadableSource(path.clone()))?;
        Ok((document, meta))
    }

    fn write_artifact(destination: &Path, content: &str) -> Result<(), TranslationError> {
        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent).map_err(|e| TranslationError::io(parent, e))?;
        }
        fs::write(destination, content).map_err(|e| TranslationError::io(destination, e))
    }

    /// Translate one markdown file into one language and write the artifact
    pub async fn translate_markdown(&self, file_path: &Path, language_code: &str) -> Result<PathBuf, TranslationError> {
        let item = self.work_item(file_path, language_code, Category::Markdown)?;
        self.translate_markdown_item(&item).await
    }

    /// Translate one notebook into one language and write the artifact
    pub async fn translate_notebook(&self, file_path: &Path, language_code: &str) -> Result<PathBuf, TranslationError> {
        let item = self.work_item(file_path, language_code, Category::Notebook)?;
        self.translate_notebook_item(&item).await
    }

    /// Translate one image into one language
    pub async fn translate_image(&self, image_path: &Path, language_code: &str, fast_mode: bool) -> Result<PathBuf, TranslationError> {
        let item = self.work_item(image_path, language_code, Category::Image)?;
        self.translate_image_item(&item, fast_mode).await
    }

    async fn translate_item(&self, item: &WorkItem, fast_mode: bool) -> Result<PathBuf, TranslationError> {
        match item.source.category {
            Category::Markdown => self.translate_markdown_item(item).await,
            Category::Notebook => self.translate_notebook_item(item).await,
            Category::Image => self.translate_image_item(item, fast_mode).await,
        }
    }

    async fn translate_markdown_item(&self, item: &WorkItem) -> Result<PathBuf, TranslationError> {
        let (document, meta) = self.read_source(item)?;
        let source = &item.source.path;

        if document.trim().is_empty() {
            debug!("Empty document {}, writing metadata only", source.display());
            Self::write_artifact(&item.destination, &metadata::embed("", &meta.with_confidence(Some(NOTHING_TO_TRANSLATE))))?;
            return Ok(item.destination.clone());
        }

        let translator = &self.markdown_translator;
        let mut translated = translator
            .translate_markdown(&document, &item.language_code, source, self.markdown_only)
            .await?;
        if translated.text.trim().is_empty() {
            return Err(TranslationError::EmptyResult(source.clone()));
        }

        if staleness::has_line_break_mismatch(&document, &translated.text) {
            warn!("Line structure of {} ({}) differs from the source. Retrying...", source.display(), item.language_code);
            translated = translator
                .translate_markdown(&document, &item.language_code, source, self.markdown_only)
                .await?;
            if translated.text.trim().is_empty() {
                return Err(TranslationError::EmptyResult(source.clone()));
            }
        }

        let content = metadata::embed(&translated.text, &meta.with_confidence(translated.confidence));
        Self::write_artifact(&item.destination, &content)?;
        info!(
            "Translated {} to {} and saved to {}",
            source.display(),
            item.language_code,
            item.destination.display()
        );
        Ok(item.destination.clone())
    }

    async fn translate_notebook_item(&self, item: &WorkItem) -> Result<PathBuf, TranslationError> {
        let translator = self
            .notebook_translator
            .as_ref()
            .ok_or_else(|| TranslationError::BackendUnavailable(Category::Notebook.to_string()))?;
        let (document, meta) = self.read_source(item)?;
        let source = &item.source.path;

        if document.trim().is_empty() {
            debug!("Empty notebook {}, writing metadata only", source.display());
            Self::write_artifact(&item.destination, &metadata::embed("", &meta.with_confidence(Some(NOTHING_TO_TRANSLATE))))?;
            return Ok(item.destination.clone());
        }

        let translated = translator
            .translate_notebook(&document, &item.language_code, source, self.markdown_only)
            .await?;
        if translated.text.trim().is_empty() {
            return Err(TranslationError::EmptyResult(source.clone()));
        }

        let content = metadata::embed_notebook(&translated.text, &meta.with_confidence(translated.confidence))
            .map_err(|e| TranslationError::InvalidNotebook {
                path: source.clone(),
                message: e.to_string(),
            })?;
        Self::write_artifact(&item.destination, &content)?;
        info!(
            "Translated {} to {} and saved to {}",
            source.display(),
            item.language_code,
            item.destination.display()
        );
        Ok(item.destination.clone())
    }

    async fn translate_image_item(&self, item: &WorkItem, fast_mode: bool) -> Result<PathBuf, TranslationError> {
        let translator = self
            .image_translator
            .as_ref()
            .ok_or_else(|| TranslationError::BackendUnavailable(Category::Image.to_string()))?;
        let source = &item.source.path;
        if !source.is_file() {
            return Err(TranslationError::UnreadableSource(source.clone()));
        }
        fs::create_dir_all(&self.layout.image_dir).map_err(|e| TranslationError::io(&self.layout.image_dir, e))?;

        let written = translator
            .translate_image(source, &item.language_code, &item.destination, fast_mode)
            .await?;
        if !written.is_file() {
            return Err(TranslationError::EmptyResult(source.clone()));
        }
        info!(
            "Translated image {} to {} and saved to {}",
            source.display(),
            item.language_code,
            written.display()
        );
        Ok(written)
    }

    /// Execute a batch and fold the per-item results into a summary
    async fn run_batch(&self, items: Vec<WorkItem>, executor: TaskExecutor, label: &str, fast_mode: bool) -> TranslationSummary {
        if items.is_empty() {
            debug!("{}: nothing to do", label);
            return TranslationSummary::default();
        }

        let bar = self.progress.bar(items.len(), label);
        let results = executor
            .run(items, &bar, |item| async move {
                let result = self.translate_item(&item, fast_mode).await;
                (item, result)
            })
            .await;
        bar.finish_and_clear();

        let mut summary = TranslationSummary::default();
        for (item, result) in results {
            match result {
                Ok(_) => summary.modified += 1,
                Err(e) => {
                    let message = format!("{}: {}", item.failure_message(), e);
                    error!("{}", message);
                    summary.errors.push(message);
                }
            }
        }
        summary
    }

    /// Translate every markdown file still missing a translation
    ///
    /// With `update`, existing markdown translations of the requested languages
    /// are deleted first so everything is translated again.
    pub async fn translate_all_markdown_files(&self, update: bool) -> TranslationSummary {
        if update {
            for language_code in &self.language_codes {
                let removed = FileManager::delete_translated_files_by_language_code(
                    language_code,
                    &self.layout.translations_dir,
                    &self.layout.markdown_extensions,
                );
                info!("Deleted {} markdown translation(s) for {}", removed, language_code);
            }
        }
        let items = self.generator().generate(Category::Markdown, update);
        self.run_batch(items, self.sequential(), "Translating markdown files", false).await
    }

    /// Translate every notebook still missing a translation
    pub async fn translate_all_notebook_files(&self, update: bool) -> TranslationSummary {
        if self.notebook_translator.is_none() {
            info!("No notebook translator configured, skipping notebooks");
            return TranslationSummary::default();
        }
        if update {
            for language_code in &self.language_codes {
                let removed = FileManager::delete_translated_files_by_language_code(
                    language_code,
                    &self.layout.translations_dir,
                    &self.layout.notebook_extensions,
                );
                info!("Deleted {} notebook translation(s) for {}", removed, language_code);
            }
        }
        let items = self.generator().generate(Category::Notebook, update);
        self.run_batch(items, self.sequential(), "Translating notebooks", false).await
    }

    /// Translate every image still missing a translation, with bounded parallelism
    pub async fn translate_all_image_files(&self, update: bool, fast_mode: bool) -> TranslationSummary {
        if self.image_translator.is_none() {
            info!("No image translator configured, skipping images");
            return TranslationSummary::default();
        }
        if update {
            for language_code in &self.language_codes {
                let removed = FileManager::delete_translated_images_by_language_code(language_code, &self.layout.image_dir);
                info!("Deleted {} translated image(s) for {}", removed, language_code);
            }
        }
        let items = self.generator().generate(Category::Image, update);
        self.run_batch(items, self.parallel(), "Translating images", fast_mode).await
    }

    /// Text categories this manager can translate
    fn available_text_categories(&self) -> Vec<Category> {
        let mut categories = vec![Category::Markdown];
        if self.notebook_translator.is_some() {
            categories.push(Category::Notebook);
        }
        categories
    }

    /// Existing text artifacts whose source changed since translation
    pub fn get_outdated_translations(&self) -> Vec<OutdatedTranslation> {
        self.get_outdated_translations_for(&self.available_text_categories())
    }

    /// Same as `get_outdated_translations`, limited to some categories
    pub fn get_outdated_translations_for(&self, categories: &[Category]) -> Vec<OutdatedTranslation> {
        staleness::find_outdated_translations(&self.layout, &self.language_codes, categories)
    }

    /// Retranslate outdated pairs one at a time
    pub async fn retranslate_outdated_files(&self, outdated: Vec<OutdatedTranslation>) -> TranslationSummary {
        let mut items = Vec::with_capacity(outdated.len());
        for pair in outdated {
            match self.work_item(&pair.source, &pair.language_code, pair.category) {
                Ok(item) => items.push(item),
                Err(e) => warn!("Skipping {}: {}", pair.translation.display(), e),
            }
        }
        if !items.is_empty() {
            info!("Retranslating {} outdated file(s)", items.len());
        }
        self.run_batch(items, self.sequential(), "Retranslating outdated files", false).await
    }

    /// Retranslate markdown artifacts that are missing or whose line layout diverges from the source
    pub async fn check_and_retry_translations(&self) -> TranslationSummary {
        let sources = self.layout.discover_sources(&[Category::Markdown]);
        let mut checked = 0;
        let mut items = Vec::new();

        for source in &sources {
            let original = match fs::read_to_string(&source.path) {
                Ok(original) => original,
                Err(e) => {
                    warn!("Cannot read {}: {}", source.path.display(), e);
                    continue;
                }
            };
            for language_code in &self.language_codes {
                checked += 1;
                let destination = self.layout.text_destination(language_code, &source.relative_path);
                let needs_work = match fs::read_to_string(&destination) {
                    Ok(translated) => {
                        let mismatch = staleness::has_line_break_mismatch(&original, &translated);
                        if mismatch {
                            warn!("Detected formatting issue in {}", destination.display());
                        }
                        mismatch
                    }
                    Err(_) => {
                        warn!("Translated file does not exist: {}", destination.display());
                        true
                    }
                };
                if needs_work {
                    items.push(WorkItem {
                        source: source.clone(),
                        language_code: language_code.clone(),
                        destination,
                    });
                }
            }
        }

        info!("Checked {} translation(s), {} need work", checked, items.len());
        self.run_batch(items, self.sequential(), "Retrying translations", false).await
    }

    /// Retranslate artifacts of one language whose recorded confidence is below `min_confidence`
    pub async fn retranslate_low_confidence_files(
        &self,
        language_code: &str,
        min_confidence: f64,
        categories: CategorySet,
    ) -> TranslationSummary {
        let wanted: Vec<Category> = self
            .available_text_categories()
            .into_iter()
            .filter(|category| categories.contains(*category))
            .collect();
        let found = staleness::find_low_confidence_translations(&self.layout, language_code, &wanted, min_confidence);

        let mut items = Vec::with_capacity(found.len());
        for entry in found {
            debug!(
                "Low confidence ({:?}) for {}",
                entry.confidence,
                entry.translation.display()
            );
            match self.work_item(&entry.source, language_code, entry.category) {
                Ok(item) => items.push(item),
                Err(e) => warn!("Skipping {}: {}", entry.translation.display(), e),
            }
        }
        info!(
            "Found {} translation(s) below confidence {:.2} for {}",
            items.len(),
            min_confidence,
            language_code
        );
        self.run_batch(items, self.sequential(), "Fixing low confidence translations", false).await
    }

    /// Run every stage for the enabled categories and return the combined summary
    pub async fn translate_project(
        &self,
        images: bool,
        markdown: bool,
        notebook: bool,
        update: bool,
        fast_mode: bool,
    ) -> TranslationSummary {
        let categories = CategorySet { markdown, notebook, images };
        let mut summary = TranslationSummary::default();

        let stage = self.progress.stage("Cleaning up orphaned translations");
        let removed = self.directories.cleanup_orphaned_translations(categories);
        stage.finish_and_clear();
        debug!("Orphan cleanup removed {} file(s)", removed);

        let stage = self.progress.stage("Synchronizing directory structure");
        let report = self.directories.sync_directory_structure();
        stage.finish_and_clear();
        for detail in &report.details {
            debug!("{}", detail);
        }

        if (markdown || notebook) && !update {
            let enabled: Vec<Category> = self
                .available_text_categories()
                .into_iter()
                .filter(|category| categories.contains(*category))
                .collect();
            let outdated = self.get_outdated_translations_for(&enabled);
            if outdated.is_empty() {
                debug!("No outdated translations");
            } else {
                summary.merge(self.retranslate_outdated_files(outdated).await);
            }
        }

        if markdown {
            summary.merge(self.translate_all_markdown_files(update).await);
        }
        if notebook {
            summary.merge(self.translate_all_notebook_files(update).await);
        }
        if images && !self.markdown_only {
            summary.merge(self.translate_all_image_files(update, fast_mode).await);
        }

        info!(
            "Translation finished: {} file(s) modified, {} error(s)",
            summary.modified,
            summary.errors.len()
        );
        summary
    }
}
