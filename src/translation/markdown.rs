/*!
 * Markdown translation through a chat completion provider.
 *
 * Documents are cut into chunks at blank lines, never inside a fenced code
 * block, and each chunk is sent as its own prompt. Blank lines around a chunk
 * are kept aside and restored verbatim, so the model cannot disturb the
 * document's paragraph layout at chunk boundaries.
 */

use async_trait::async_trait;
use log::{debug, info, warn};
use std::path::Path;
use std::time::Instant;

use crate::app_config::LlmConfig;
use crate::errors::TranslationError;
use crate::providers::Provider;
use crate::providers::openai::{ChatRequest, ChatResponse};

use super::prompts::{PromptTemplate, build_chunk_request};
use super::quality::score_translation;
use super::{MarkdownTranslator, TranslatedText};

/// Split markdown into chunks of roughly `max_chars`
///
/// Cuts only after a blank line outside fenced code. A single block longer
/// than `max_chars` becomes its own oversized chunk. Joining the chunks with
/// `\n` gives back the document's lines.
pub fn split_markdown(text: &str, max_chars: usize) -> Vec<String> {
    let mut chunks = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    let mut block: Vec<&str> = Vec::new();
    let mut in_fence = false;

    for line in text.lines() {
        let trimmed = line.trim_start();
        if trimmed.starts_with("```") || trimmed.starts_with("~~~") {
            in_fence = !in_fence;
        }
        block.push(line);

        if !in_fence && line.trim().is_empty() {
            push_block(&mut block, &mut current, &mut chunks, max_chars);
        }
    }
    if !block.is_empty() {
        push_block(&mut block, &mut current, &mut chunks, max_chars);
    }
    if !current.is_empty() {
        chunks.push(current.join("\n"));
    }
    chunks
}

fn lines_size(lines: &[&str]) -> usize {
    lines.iter().map(|l| l.len() + 1).sum()
}

fn push_block<'a>(block: &mut Vec<&'a str>, current: &mut Vec<&'a str>, chunks: &mut Vec<String>, max_chars: usize) {
    if !current.is_empty() && lines_size(current) + lines_size(block) > max_chars {
        chunks.push(current.join("\n"));
        current.clear();
    }
    current.append(block);
}

/// Split a chunk into (leading blank lines, content, trailing blank lines)
fn trim_blank_lines(chunk: &str) -> (usize, String, usize) {
    let lines: Vec<&str> = chunk.split('\n').collect();
    let leading = lines.iter().take_while(|l| l.trim().is_empty()).count();
    if leading == lines.len() {
        return (leading, String::new(), 0);
    }
    let trailing = lines.iter().rev().take_while(|l| l.trim().is_empty()).count();
    (leading, lines[leading..lines.len() - trailing].join("\n"), trailing)
}

/// Remove a code fence the model wrapped around its whole answer
fn unwrap_fenced_answer(answer: &str) -> &str {
    let trimmed = answer.trim();
    if trimmed.len() < 6 || !trimmed.starts_with("```") || !trimmed.ends_with("```") {
        return answer;
    }
    let inner = &trimmed[3..trimmed.len() - 3];
    match inner.split_once('\n') {
        Some((info, body)) if matches!(info.trim(), "" | "markdown" | "md") => body.trim_end_matches('\n'),
        _ => answer,
    }
}

/// Markdown translator backed by a chat completion provider
#[derive(Debug)]
pub struct LlmMarkdownTranslator<P> {
    provider: P,
    settings: LlmConfig,
    template: PromptTemplate,
}

impl<P> LlmMarkdownTranslator<P>
where
    P: Provider<Request = ChatRequest, Response = ChatResponse>,
{
    pub fn new(provider: P, settings: LlmConfig) -> Self {
        Self {
            provider,
            settings,
            template: PromptTemplate::default(),
        }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    async fn translate_chunk(
        &self,
        chunk: &str,
        language_code: &str,
        markdown_only: bool,
        source: &Path,
        index: usize,
        total: usize,
    ) -> Result<String, TranslationError> {
        let (leading, content, trailing) = trim_blank_lines(chunk);
        if content.trim().is_empty() {
            return Ok(chunk.to_string());
        }

        debug!("Running translation prompt {}/{} for {}", index + 1, total, source.display());
        let started = Instant::now();
        let request = build_chunk_request(&self.template, &self.settings, &content, language_code, markdown_only);
        let response = self.provider.complete(request).await?;
        let answer = P::extract_text(&response);
        debug!(
            "Prompt {}/{} completed in {:.2}s",
            index + 1,
            total,
            started.elapsed().as_secs_f64()
        );

        let answer = if content.trim_start().starts_with("```") {
            answer.as_str()
        } else {
            unwrap_fenced_answer(&answer)
        };
        let answer = answer.trim_matches('\n');
        if answer.trim().is_empty() {
            warn!("Empty answer for chunk {}/{} of {}", index + 1, total, source.display());
            return Err(TranslationError::EmptyResult(source.to_path_buf()));
        }

        let mut rebuilt = "\n".repeat(leading);
        rebuilt.push_str(answer);
        rebuilt.push_str(&"\n".repeat(trailing));
        Ok(rebuilt)
    }
}

#[async_trait]
impl<P> MarkdownTranslator for LlmMarkdownTranslator<P>
where
    P: Provider<Request = ChatRequest, Response = ChatResponse>,
{
    async fn translate_markdown(
        &self,
        document: &str,
        language_code: &str,
        source: &Path,
        markdown_only: bool,
    ) -> Result<TranslatedText, TranslationError> {
        let chunks = split_markdown(document, self.settings.max_chars_per_chunk.max(1));
        let total = chunks.len();
        info!("Translating {} to {} in {} chunk(s)", source.display(), language_code, total);

        let mut translated = Vec::with_capacity(total);
        for (index, chunk) in chunks.iter().enumerate() {
            translated.push(
                self.translate_chunk(chunk, language_code, markdown_only, source, index, total)
                    .await?,
            );
        }

        let text = translated.join("\n");
        if text.trim().is_empty() {
            return Err(TranslationError::EmptyResult(source.to_path_buf()));
        }

        let quality = score_translation(document, &text);
        debug!("{}: {}", source.display(), quality.summary());
        Ok(TranslatedText::new(text, Some(quality.overall)))
    }
}
