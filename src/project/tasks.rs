/*!
 * Work item generation.
 *
 * A batch is the cross-product of a category's source files and the target
 * languages, minus pairs whose destination already exists (unless updating).
 * Work items are plain values; they carry their own identity, so error
 * attribution never depends on a second list staying in sync.
 */

use log::{debug, info};
use std::collections::HashSet;
use std::fmt;
use std::path::PathBuf;

use super::layout::ProjectLayout;

/// Kind of translatable file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Markdown,
    Notebook,
    Image,
}

impl Category {
    /// Every category, in pipeline order
    pub const ALL: [Category; 3] = [Category::Markdown, Category::Notebook, Category::Image];

    /// Human readable name used in logs and error strings
    pub fn label(&self) -> &'static str {
        match self {
            Category::Markdown => "markdown",
            Category::Notebook => "notebook",
            Category::Image => "image",
        }
    }

    /// Whether artifacts live in the per-language text trees
    pub fn is_text(&self) -> bool {
        !matches!(self, Category::Image)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Categories enabled for one run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CategorySet {
    pub markdown: bool,
    pub notebook: bool,
    pub images: bool,
}

impl CategorySet {
    /// Every category enabled
    pub fn all() -> Self {
        Self { markdown: true, notebook: true, images: true }
    }

    /// Whether a category is part of this run
    pub fn contains(&self, category: Category) -> bool {
        match category {
            Category::Markdown => self.markdown,
            Category::Notebook => self.notebook,
            Category::Image => self.images,
        }
    }

    /// Enabled categories, in pipeline order
    pub fn enabled(&self) -> Vec<Category> {
        Category::ALL.iter().copied().filter(|c| self.contains(*c)).collect()
    }

    /// Enabled categories whose artifacts are text files
    pub fn text_categories(&self) -> Vec<Category> {
        self.enabled().into_iter().filter(Category::is_text).collect()
    }
}

/// A translatable file found in the source tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Absolute path
    pub path: PathBuf,
    /// Path relative to the project root, forward slashes
    pub relative_path: String,
    /// Category derived from the extension
    pub category: Category,
}

/// One (source file, target language) translation obligation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkItem {
    pub source: SourceFile,
    pub language_code: String,
    /// Where the artifact is written
    pub destination: PathBuf,
}

impl WorkItem {
    /// Error string reported when this item fails
    pub fn failure_message(&self) -> String {
        format!(
            "Failed to translate {} file: {} (lang: {})",
            self.source.category,
            self.source.path.display(),
            self.language_code
        )
    }
}

/// Builds the work items of a batch
pub struct TaskGenerator<'a> {
    layout: &'a ProjectLayout,
    language_codes: &'a [String],
}

impl<'a> TaskGenerator<'a> {
    pub fn new(layout: &'a ProjectLayout, language_codes: &'a [String]) -> Self {
        Self { layout, language_codes }
    }

    /// Destination of a source file for one language
    pub fn destination(&self, source: &SourceFile, language_code: &str) -> PathBuf {
        match source.category {
            Category::Image => self.layout.image_destination(&source.path, language_code),
            Category::Markdown | Category::Notebook => {
                self.layout.text_destination(language_code, &source.relative_path)
            }
        }
    }

    /// Generate the items of one category
    ///
    /// With `update` the caller has already purged the category's artifacts, so
    /// the existence check is skipped and every pair produces an item.
    pub fn generate(&self, category: Category, update: bool) -> Vec<WorkItem> {
        let sources = self.layout.discover_sources(&[category]);
        self.generate_for(sources, update)
    }

    /// Generate items for an explicit list of sources
    pub fn generate_for(&self, sources: Vec<SourceFile>, update: bool) -> Vec<WorkItem> {
        let mut items = Vec::new();
        let mut seen: HashSet<PathBuf> = HashSet::new();

        for source in sources {
            for language_code in self.language_codes {
                let destination = self.destination(&source, language_code);

                if !update && destination.exists() {
                    debug!("Skipping already translated {} file: {}", source.category, destination.display());
                    continue;
                }
                if !seen.insert(destination.clone()) {
                    continue;
                }

                info!("Queued {} for language: {}", source.relative_path, language_code);
                items.push(WorkItem {
                    source: source.clone(),
                    language_code: language_code.clone(),
                    destination,
                });
            }
        }
        items
    }
}
