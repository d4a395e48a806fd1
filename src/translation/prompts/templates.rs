/*!
 * Prompt templates for documentation translation.
 */

use crate::app_config::LlmConfig;
use crate::language_utils;
use crate::providers::openai::ChatRequest;

/// System prompt template with `{target_language}` and `{language_code}` placeholders.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    template: String,
}

impl PromptTemplate {
    /// The default system prompt for markdown translation.
    pub const MARKDOWN_TRANSLATOR: &'static str = r#"You are a professional translator of technical documentation. Translate the markdown sent by the user into {target_language} ({language_code}).

## Structure
- Keep every line break and every blank line exactly where it is in the input
- Keep headings, lists, tables, block quotes and emphasis markers unchanged
- Do not translate fenced code blocks, inline code, URLs or HTML tags
- Keep link targets unchanged; translate only the visible link text

## Output
- Return only the translated markdown
- Do not wrap the answer in a code fence and do not add commentary"#;

    /// Extra rule when images are left untranslated
    pub const KEEP_IMAGES: &'static str =
        "- Leave image references, including their alt text, exactly as written";

    /// Extra rule when images are translated too
    pub const TRANSLATE_IMAGE_ALT: &'static str =
        "- Translate image alt text but keep image paths unchanged";

    pub fn new(template: &str) -> Self {
        Self {
            template: template.to_string(),
        }
    }

    pub fn markdown_translator() -> Self {
        Self::new(Self::MARKDOWN_TRANSLATOR)
    }

    /// Render the template for a target language.
    pub fn render(&self, language_code: &str, markdown_only: bool) -> String {
        let image_rule = if markdown_only {
            Self::KEEP_IMAGES
        } else {
            Self::TRANSLATE_IMAGE_ALT
        };
        let rendered = self
            .template
            .replace("{target_language}", &language_utils::get_language_name(language_code))
            .replace("{language_code}", language_code);
        format!("{}\n{}", rendered, image_rule)
    }
}

impl Default for PromptTemplate {
    fn default() -> Self {
        Self::markdown_translator()
    }
}

/// Build the chat request translating one chunk
pub fn build_chunk_request(
    template: &PromptTemplate,
    settings: &LlmConfig,
    chunk: &str,
    language_code: &str,
    markdown_only: bool,
) -> ChatRequest {
    ChatRequest::new(settings.model.clone())
        .add_message("system", template.render(language_code, markdown_only))
        .add_message("user", chunk)
        .temperature(settings.temperature)
        .top_p(settings.top_p)
        .max_tokens(settings.max_tokens)
}
