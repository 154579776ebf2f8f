use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, FromRow)]
pub struct LedgerEntryRow {
    pub id: Uuid,
    pub ledger: String,
    pub data: Json<Map<String, Value>>,
    pub recorded_at: DateTime<Utc>,
}

impl LedgerEntryRow {
    /// Flat JSON document: `_id`, the stored fields, and the ledger's own
    /// timestamp field name (`createdAt`, `refusedAt`, ...).
    pub fn to_document(&self, timestamp_field: &str) -> Value {
        let mut doc = self.data.0.clone();
        doc.insert("_id".to_string(), Value::String(self.id.to_string()));
        doc.insert(
            timestamp_field.to_string(),
            Value::String(self.recorded_at.to_rfc3339()),
        );
        Value::Object(doc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_to_document_uses_ledger_timestamp_field() {
        let row = LedgerEntryRow {
            id: Uuid::new_v4(),
            ledger: "refused".to_string(),
            data: Json(json!({ "Nom": "Fassi" }).as_object().cloned().unwrap()),
            recorded_at: Utc::now(),
        };
        let doc = row.to_document("refusedAt");
        assert_eq!(doc["Nom"], "Fassi");
        assert_eq!(doc["_id"], json!(row.id.to_string()));
        assert!(doc.get("refusedAt").is_some());
        assert!(doc.get("createdAt").is_none());
    }
}
