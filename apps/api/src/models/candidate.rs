use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

/// Profile keys holding the candidate's identity, as written by the forms.
pub const LAST_NAME_KEY: &str = "Nom";
pub const FIRST_NAME_KEY: &str = "Prénom";
/// Older records and the archive form use the unaccented spelling.
pub const FIRST_NAME_ALT_KEY: &str = "Prenom";
pub const BIRTH_DATE_KEY: &str = "Date de naissance";

/// A candidate record as stored and as returned to clients.
///
/// Free-form form answers live in `profile` and are flattened into the JSON
/// document next to the managed fields, mirroring the document shape the
/// frontend was built against.
#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(rename = "_id")]
    pub id: Uuid,
    #[serde(flatten)]
    pub profile: Json<Map<String, Value>>,
    pub status: String,
    pub hiring_status: String,
    pub form_status: String,
    pub form_token: Option<String>,
    pub eval_status: String,
    pub eval_token: Option<String>,
    pub eval_answers: Option<Value>,
    pub eval_correction: Option<Value>,
    pub eval_score: Option<i32>,
    pub eval_pdf_path: Option<String>,
    pub eval_submitted_at: Option<DateTime<Utc>>,
    pub eval_corrected_at: Option<DateTime<Utc>>,
    #[serde(rename = "originalCvMinioPath")]
    pub original_cv_path: Option<String>,
    pub qualified_form_path: Option<String>,
    pub form_submitted_at: Option<DateTime<Utc>>,
    pub rapport_stage_path: Option<String>,
    pub qualified: bool,
    #[serde(rename = "qualifiedDate")]
    pub qualified_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Candidate {
    /// Non-empty trimmed string value of a profile field.
    pub fn profile_str(&self, key: &str) -> Option<&str> {
        self.profile
            .get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    pub fn last_name(&self) -> Option<&str> {
        self.profile_str(LAST_NAME_KEY)
    }

    pub fn first_name(&self) -> Option<&str> {
        self.profile_str(FIRST_NAME_KEY)
            .or_else(|| self.profile_str(FIRST_NAME_ALT_KEY))
    }

    /// "Prénom Nom" for document headers; missing parts are dropped.
    pub fn display_name(&self) -> String {
        [self.first_name(), self.last_name()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// "Nom_Prénom" for file names, with placeholders for missing parts.
    pub fn file_stem(&self) -> String {
        format!(
            "{}_{}",
            self.last_name().unwrap_or("Unknown"),
            self.first_name().unwrap_or("Candidate")
        )
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::candidate;
    use serde_json::json;

    #[test]
    fn test_serializes_as_flat_document() {
        let c = candidate(json!({ "Nom": "Alami", "Prénom": "Sara", "service": "Achats" }));
        let doc = serde_json::to_value(&c).unwrap();
        assert_eq!(doc["_id"], json!(c.id.to_string()));
        assert_eq!(doc["Nom"], "Alami");
        assert_eq!(doc["service"], "Achats");
        assert_eq!(doc["hiringStatus"], "Attente validation client");
        assert!(doc.get("originalCvMinioPath").is_some());
        assert!(doc.get("profile").is_none());
    }

    #[test]
    fn test_names_fall_back_to_placeholders() {
        let c = candidate(json!({ "Nom": "  " }));
        assert_eq!(c.file_stem(), "Unknown_Candidate");
        assert_eq!(c.display_name(), "");
    }

    #[test]
    fn test_first_name_accepts_unaccented_key() {
        let c = candidate(json!({ "Nom": "Drissi", "Prenom": "Omar" }));
        assert_eq!(c.display_name(), "Omar Drissi");
        assert_eq!(c.file_stem(), "Drissi_Omar");
    }
}
