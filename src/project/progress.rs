/*!
 * Progress reporting handle.
 *
 * The orchestrator never draws to the terminal directly; it asks this handle for
 * progress bars. A hidden reporter hands out bars that render nothing, which is
 * what tests and non-interactive callers use.
 */

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::fmt;

/// Factory for progress bars, passed explicitly into the orchestrator
#[derive(Clone, Default)]
pub struct ProgressReporter {
    multi: Option<MultiProgress>,
}

impl ProgressReporter {
    /// Reporter drawing to the terminal
    pub fn new() -> Self {
        Self { multi: Some(MultiProgress::new()) }
    }

    /// Reporter that draws nothing
    pub fn hidden() -> Self {
        Self { multi: None }
    }

    /// Whether bars are drawn
    pub fn is_visible(&self) -> bool {
        self.multi.is_some()
    }

    /// A counting bar for a batch of `len` items
    pub fn bar(&self, len: usize, message: &str) -> ProgressBar {
        let bar = match &self.multi {
            Some(multi) => multi.add(ProgressBar::new(len as u64)),
            None => return ProgressBar::hidden(),
        };
        let style = ProgressStyle::default_bar()
            .template("{spinner:.green} {msg} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {eta}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} {msg} [{bar:40}] {pos}/{len}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        bar.set_style(style.progress_chars("█▓▒░"));
        bar.set_message(message.to_string());
        bar
    }

    /// A single-step bar for a pipeline stage
    pub fn stage(&self, message: &str) -> ProgressBar {
        self.bar(1, message)
    }
}

impl fmt::Debug for ProgressReporter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProgressReporter")
            .field("visible", &self.is_visible())
            .finish()
    }
}
