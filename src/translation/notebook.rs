/*!
 * Notebook translation.
 *
 * Only markdown cells are translated, each through a markdown translator.
 * Code cells, outputs and notebook metadata pass through untouched.
 */

use async_trait::async_trait;
use log::debug;
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;

use crate::errors::TranslationError;

use super::{MarkdownTranslator, NotebookTranslator, TranslatedText};

/// Notebook translator delegating markdown cells to a markdown translator
#[derive(Debug, Clone)]
pub struct CellNotebookTranslator {
    markdown: Arc<dyn MarkdownTranslator>,
}

impl CellNotebookTranslator {
    pub fn new(markdown: Arc<dyn MarkdownTranslator>) -> Self {
        Self { markdown }
    }
}

/// Text of a cell whose `source` is either a string or a list of lines
fn cell_source(cell: &Value) -> String {
    match cell.get("source") {
        Some(Value::String(text)) => text.clone(),
        Some(Value::Array(lines)) => lines.iter().filter_map(Value::as_str).collect(),
        _ => String::new(),
    }
}

/// Lines in notebook form: every line but the last keeps its newline
fn source_lines(text: &str) -> Value {
    Value::Array(
        text.split_inclusive('\n')
            .map(|line| Value::String(line.to_string()))
            .collect(),
    )
}

#[async_trait]
impl NotebookTranslator for CellNotebookTranslator {
    async fn translate_notebook(
        &self,
        notebook_json: &str,
        language_code: &str,
        source: &Path,
        markdown_only: bool,
    ) -> Result<TranslatedText, TranslationError> {
        let invalid = |message: String| TranslationError::InvalidNotebook {
            path: source.to_path_buf(),
            message,
        };

        let mut notebook: Value = serde_json::from_str(notebook_json).map_err(|e| invalid(e.to_string()))?;
        let cells = notebook
            .get_mut("cells")
            .and_then(Value::as_array_mut)
            .ok_or_else(|| invalid("missing cells array".to_string()))?;

        let mut lowest: Option<f64> = None;
        let mut translated_cells = 0;
        for cell in cells.iter_mut() {
            if cell.get("cell_type").and_then(Value::as_str) != Some("markdown") {
                continue;
            }
            let text = cell_source(cell);
            if text.trim().is_empty() {
                continue;
            }

            let translated = self
                .markdown
                .translate_markdown(&text, language_code, source, markdown_only)
                .await?;
            if translated.text.trim().is_empty() {
                return Err(TranslationError::EmptyResult(source.to_path_buf()));
            }
            if let Some(score) = translated.confidence {
                lowest = Some(lowest.map_or(score, |current| current.min(score)));
            }
            cell["source"] = source_lines(&translated.text);
            translated_cells += 1;
        }

        debug!("Translated {} markdown cell(s) in {}", translated_cells, source.display());
        let rendered = serde_json::to_string_pretty(&notebook).map_err(|e| invalid(e.to_string()))?;
        // No cell reached the backend, so there is nothing to doubt
        let confidence = if translated_cells == 0 { Some(1.0) } else { lowest };
        Ok(TranslatedText::new(rendered, confidence))
    }
}
