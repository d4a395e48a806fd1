/*!
 * Prompt construction for markdown translation.
 *
 * The system prompt carries every instruction; the user message is the raw
 * markdown chunk, so the model's answer maps one-to-one onto the chunk.
 */

pub mod templates;

pub use templates::{PromptTemplate, build_chunk_request};
