use bytes::Bytes;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::extraction::english::read_english_levels;
use crate::extraction::form_text::locate_form;
use crate::extraction::prompts::build_extraction_prompt;
use crate::forms::template::{self, ENGLISH_LEVEL_KEY};
use crate::llm_client::{LlmClient, LlmError};

/// Failures surfaced to the person who uploaded the CV.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("Formulaire de recrutement introuvable. Le PDF doit contenir le questionnaire.")]
    FormNotFound,

    #[error("Ollama service is not running. Please check Docker Compose.")]
    LlmUnavailable,

    #[error("Erreur lors de l'extraction des données: {0}")]
    Failed(String),
}

impl From<LlmError> for ExtractionError {
    fn from(e: LlmError) -> Self {
        if e.is_unreachable() {
            ExtractionError::LlmUnavailable
        } else {
            ExtractionError::Failed(e.to_string())
        }
    }
}

/// Text of the whole PDF. Parsing is CPU-bound, so it runs off the runtime.
pub async fn pdf_text(bytes: Bytes) -> Result<String, ExtractionError> {
    tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
        .await
        .map_err(|e| ExtractionError::Failed(format!("PDF parser crashed: {e}")))?
        .map_err(|e| ExtractionError::Failed(format!("Unreadable PDF: {e}")))
}

/// Keeps what the model actually filled in; everything else becomes `-`.
/// The English grid always comes from the layout reader.
pub fn normalize_fields(
    extracted: &Map<String, Value>,
    english: Map<String, Value>,
) -> Map<String, Value> {
    let mut result = Map::new();
    for field in template::text_fields() {
        let value = match extracted.get(field) {
            Some(Value::String(s)) if !s.trim().is_empty() => Value::String(s.clone()),
            Some(Value::Number(n)) => Value::String(n.to_string()),
            _ => Value::String("-".to_string()),
        };
        result.insert(field.to_string(), value);
    }
    result.insert(ENGLISH_LEVEL_KEY.to_string(), Value::Object(english));
    result
}

/// Locates the questionnaire in `pdf_text` and extracts its fields.
pub async fn extract_profile(
    llm: &LlmClient,
    pdf_text: &str,
) -> Result<Map<String, Value>, ExtractionError> {
    let Some(form_text) = locate_form(pdf_text) else {
        warn!("Recruitment form not found in PDF ({} chars)", pdf_text.len());
        return Err(ExtractionError::FormNotFound);
    };
    let english = read_english_levels(form_text);
    debug!("English levels read from layout: {english:?}");

    info!("Calling {} on {} chars of form text", llm.model(), form_text.len());
    let extracted: Map<String, Value> = llm.call_json(&build_extraction_prompt(form_text)).await?;
    Ok(normalize_fields(&extracted, english))
}
