use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::candidates::tokens::generate_token;
use crate::errors::AppError;
use crate::models::{CandidateStatus, EvalStatus, FormStatus, HiringStatus};

/// Keys the generic update may never write. Tokens and evaluation results
/// have dedicated operations; timestamps are server-managed.
pub const RESERVED_KEYS: &[&str] = &[
    "_id",
    "id",
    "formToken",
    "evalToken",
    "evalAnswers",
    "evalCorrection",
    "evalScore",
    "evalPdfPath",
    "evalSubmittedAt",
    "evalCorrectedAt",
    "qualifiedFormPath",
    "rapportStagePath",
    "qualified",
    "qualifiedDate",
    "createdAt",
    "updatedAt",
];

/// Body of `PUT /api/candidates/:id`.
///
/// Known fields are typed; anything else lands in `profile` and is merged
/// into the stored profile.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidatePatch {
    pub status: Option<CandidateStatus>,
    pub hiring_status: Option<HiringStatus>,
    pub form_status: Option<FormStatus>,
    pub eval_status: Option<EvalStatus>,
    #[serde(rename = "originalCvMinioPath")]
    pub original_cv_path: Option<String>,
    pub form_submitted_at: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub profile: Map<String, Value>,
}

impl CandidatePatch {
    /// Validates a raw JSON body. Unknown status strings and non-object
    /// bodies are rejected with 400.
    pub fn from_value(body: Value) -> Result<Self, AppError> {
        if !body.is_object() {
            return Err(AppError::Validation(
                "Request body must be a JSON object".to_string(),
            ));
        }
        let mut patch: CandidatePatch = serde_json::from_value(body)
            .map_err(|e| AppError::Validation(format!("Invalid update: {e}")))?;
        strip_reserved(&mut patch.profile);
        Ok(patch)
    }

    /// Token offered when this patch opens the form. The row keeps any token
    /// it already has.
    pub fn form_token_offer(&self) -> Option<String> {
        (self.form_status == Some(FormStatus::Active)).then(generate_token)
    }

    /// Same as [`form_token_offer`](Self::form_token_offer) for the evaluation link.
    pub fn eval_token_offer(&self) -> Option<String> {
        (self.eval_status == Some(EvalStatus::Active)).then(generate_token)
    }
}

/// Removes server-managed keys from a free-form profile map.
pub fn strip_reserved(profile: &mut Map<String, Value>) {
    for key in RESERVED_KEYS {
        profile.remove(*key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_typed_fields_are_parsed_and_rest_goes_to_profile() {
        let patch = CandidatePatch::from_value(json!({
            "hiringStatus": "Embaucé",
            "formStatus": "active",
            "commentaire": "Très bon profil",
            "Nom": "Alami",
        }))
        .unwrap();
        assert_eq!(patch.hiring_status, Some(HiringStatus::Hired));
        assert_eq!(patch.form_status, Some(FormStatus::Active));
        assert_eq!(patch.profile.len(), 2);
        assert_eq!(patch.profile["commentaire"], "Très bon profil");
        assert!(!patch.profile.contains_key("hiringStatus"));
    }

    #[test]
    fn test_reserved_keys_are_dropped() {
        let patch = CandidatePatch::from_value(json!({
            "_id": "abc",
            "evalToken": "forged",
            "evalScore": 47,
            "service": "Achats",
        }))
        .unwrap();
        assert_eq!(patch.profile.len(), 1);
        assert!(patch.profile.contains_key("service"));
    }

    #[test]
    fn test_unknown_status_is_a_validation_error() {
        let err = CandidatePatch::from_value(json!({ "status": "peut-être" })).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[test]
    fn test_null_fields_are_ignored() {
        let patch = CandidatePatch::from_value(json!({
            "status": null,
            "originalCvMinioPath": null,
        }))
        .unwrap();
        assert!(patch.status.is_none());
        assert!(patch.original_cv_path.is_none());
    }

    #[test]
    fn test_tokens_offered_only_when_opening() {
        let opening = CandidatePatch::from_value(json!({
            "formStatus": "active",
            "evalStatus": "active",
        }))
        .unwrap();
        assert_eq!(opening.form_token_offer().map(|t| t.len()), Some(32));
        assert_eq!(opening.eval_token_offer().map(|t| t.len()), Some(32));

        let closing = CandidatePatch::from_value(json!({
            "formStatus": "submitted",
            "evalStatus": "corrected",
        }))
        .unwrap();
        assert!(closing.form_token_offer().is_none());
        assert!(closing.eval_token_offer().is_none());

        let untouched = CandidatePatch::from_value(json!({ "Nom": "Alami" })).unwrap();
        assert!(untouched.form_token_offer().is_none());
        assert!(untouched.eval_token_offer().is_none());
    }

    #[test]
    fn test_non_object_body_is_rejected() {
        assert!(CandidatePatch::from_value(json!(["status"])).is_err());
    }
}
