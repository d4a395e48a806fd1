/*!
 * Translation metadata embedded in translated artifacts.
 *
 * Every translated text file carries one HTML comment block:
 *
 * ```text
 * <!-- translation-metadata
 * {"schema_version":1,"source_fingerprint":"…","language_code":"es",…}
 * -->
 * ```
 *
 * Notebooks keep the same record under `metadata.translation_metadata` of the
 * notebook JSON. Older artifacts may carry a `CO_OP_TRANSLATOR_METADATA:` block
 * or a `translation-metadata` block keyed by `file_hash`; both still decode, with
 * `schema_version` 0.
 *
 * Decoding never fails: anything unreadable is simply "no metadata".
 */

use chrono::Utc;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::fingerprint::Fingerprint;

/// Current version of the metadata record
pub const SCHEMA_VERSION: u32 = 1;

/// Marker opening the canonical block
pub const METADATA_MARKER: &str = "translation-metadata";

/// Key of the record inside a notebook's top-level metadata
pub const NOTEBOOK_METADATA_KEY: &str = "translation_metadata";

static BLOCK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)<!--\s*(?:translation-metadata|CO_OP_TRANSLATOR_METADATA:)\s*(.*?)\s*-->")
        .expect("metadata block pattern is valid")
});

/// Record written next to every translation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranslationMetadata {
    /// Version of this record layout
    pub schema_version: u32,

    /// Fingerprint of the source content the translation was made from
    pub source_fingerprint: String,

    /// Target language code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language_code: Option<String>,

    /// Source path relative to the project root, with forward slashes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_path: Option<String>,

    /// RFC 3339 timestamp of the translation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub translated_at: Option<String>,

    /// Translator-reported confidence in [0, 1]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

impl TranslationMetadata {
    /// Create a record for a translation made now
    pub fn new(source_fingerprint: &Fingerprint, language_code: &str, source_path: &str) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            source_fingerprint: source_fingerprint.as_str().to_string(),
            language_code: Some(language_code.to_string()),
            source_path: Some(source_path.to_string()),
            translated_at: Some(Utc::now().to_rfc3339()),
            confidence: None,
        }
    }

    /// Attach a confidence score
    pub fn with_confidence(mut self, confidence: Option<f64>) -> Self {
        self.confidence = confidence.map(|c| c.clamp(0.0, 1.0));
        self
    }

    /// Stored fingerprint as a comparable value
    pub fn fingerprint(&self) -> Fingerprint {
        Fingerprint::from_hex(self.source_fingerprint.as_str())
    }

    /// Whether the stored fingerprint matches the given one
    pub fn matches(&self, current: &Fingerprint) -> bool {
        &self.fingerprint() == current
    }

    /// Build a record from any of the known JSON layouts
    fn from_value(value: &Value) -> Option<Self> {
        let object = value.as_object()?;
        let fingerprint = ["source_fingerprint", "original_hash", "file_hash"]
            .iter()
            .find_map(|key| object.get(*key).and_then(Value::as_str))
            .filter(|hash| !hash.trim().is_empty())?;

        let text = |key: &str| object.get(key).and_then(Value::as_str).map(str::to_string);

        Some(Self {
            schema_version: object
                .get("schema_version")
                .and_then(Value::as_u64)
                .map(|v| v as u32)
                .unwrap_or(0),
            source_fingerprint: Fingerprint::from_hex(fingerprint).as_str().to_string(),
            language_code: text("language_code"),
            source_path: text("source_path").or_else(|| text("source_file")),
            translated_at: text("translated_at").or_else(|| text("translation_date")),
            confidence: object.get("confidence").and_then(Value::as_f64),
        })
    }
}

/// Render the comment block for a record
pub fn encode(metadata: &TranslationMetadata) -> String {
    // serde_json cannot fail on this plain struct
    let json = serde_json::to_string(metadata).unwrap_or_default();
    format!("<!-- {}\n{}\n-->", METADATA_MARKER, json)
}

/// Record held by one matched block, if its JSON is a known layout
fn parse_block(caps: &regex::Captures<'_>) -> Option<TranslationMetadata> {
    let inner = caps.get(1)?.as_str();
    let value: Value = serde_json::from_str(inner).ok()?;
    TranslationMetadata::from_value(&value)
}

/// Extract the record from an artifact body
///
/// The last readable block wins, so a marker quoted earlier in the document
/// does not shadow the real one appended at the end.
pub fn decode(body: &str) -> Option<TranslationMetadata> {
    let from_blocks = BLOCK_RE.captures_iter(body).filter_map(|caps| parse_block(&caps)).last();

    from_blocks.or_else(|| decode_notebook(body))
}

/// Byte offset where a readable block closing the body starts
fn trailing_block_start(body: &str) -> Option<usize> {
    let caps = BLOCK_RE.captures_iter(body).last()?;
    let block = caps.get(0)?;
    if !body[block.end()..].trim().is_empty() {
        return None;
    }
    parse_block(&caps).map(|_| block.start())
}

/// Read the record from a notebook's top-level metadata
fn decode_notebook(body: &str) -> Option<TranslationMetadata> {
    if !body.trim_start().starts_with('{') {
        return None;
    }
    let notebook: Value = serde_json::from_str(body).ok()?;
    let record = notebook.get("metadata")?.get(NOTEBOOK_METADATA_KEY)?;
    TranslationMetadata::from_value(record)
}

/// Remove the metadata block closing a body
///
/// Markers quoted inside the document itself are content and stay.
pub fn strip(body: &str) -> String {
    let end = trailing_block_start(body).unwrap_or(body.len());
    body[..end].trim_end().to_string()
}

/// Replace any existing block with a fresh one at the end of the body
pub fn embed(body: &str, metadata: &TranslationMetadata) -> String {
    let content = strip(body);
    if content.is_empty() {
        format!("{}\n", encode(metadata))
    } else {
        format!("{}\n\n{}\n", content, encode(metadata))
    }
}

/// Store the record inside a notebook's top-level metadata
pub fn embed_notebook(notebook_json: &str, metadata: &TranslationMetadata) -> Result<String, serde_json::Error> {
    let mut notebook: Value = serde_json::from_str(notebook_json)?;
    let record = serde_json::to_value(metadata)?;

    if let Some(root) = notebook.as_object_mut() {
        let entry = root
            .entry("metadata")
            .or_insert_with(|| Value::Object(Default::default()));
        if !entry.is_object() {
            *entry = Value::Object(Default::default());
        }
        if let Some(meta) = entry.as_object_mut() {
            meta.insert(NOTEBOOK_METADATA_KEY.to_string(), record);
        }
    }

    let mut rendered = serde_json::to_string_pretty(&notebook)?;
    rendered.push('\n');
    Ok(rendered)
}
