//! Per-candidate export of every stored document as one ZIP file.

pub mod archive;
pub mod handlers;

use bytes::Bytes;
use tracing::warn;

use crate::models::Candidate;
use crate::storage::{
    parse_location, ObjectLocation, Storage, CV_BUCKET, FORM2_BUCKET, FORM3_BUCKET, RAPPORT_BUCKET,
};

/// Profile keys older records used for the CV before `originalCvMinioPath`.
const LEGACY_CV_KEYS: [&str; 3] = ["cvPath", "cvUrl", "cvFileName"];

/// A stored object and the name it gets inside the archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleEntry {
    pub location: ObjectLocation,
    pub file_name: String,
}

fn cv_reference(candidate: &Candidate) -> Option<&str> {
    candidate
        .original_cv_path
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .or_else(|| LEGACY_CV_KEYS.iter().find_map(|k| candidate.profile_str(k)))
}

/// Documents referenced by the candidate, in archive order: CV, recruitment
/// form, corrected evaluation, internship report.
pub fn collect_documents(candidate: &Candidate) -> Vec<BundleEntry> {
    let stem = candidate.file_stem();
    let mut entries = Vec::new();

    if let Some(location) = cv_reference(candidate).and_then(|v| parse_location(v, CV_BUCKET)) {
        let ext = location.extension().unwrap_or(".pdf").to_string();
        entries.push(BundleEntry {
            file_name: format!("{stem}_CV_Original{ext}"),
            location,
        });
    }

    if let Some(location) = candidate
        .qualified_form_path
        .as_deref()
        .and_then(|v| parse_location(v, FORM2_BUCKET))
    {
        entries.push(BundleEntry {
            location,
            file_name: format!("{stem}_Questionnaire_Recrutement.pdf"),
        });
    }

    if let Some(location) = candidate
        .eval_pdf_path
        .as_deref()
        .and_then(|v| parse_location(v, FORM3_BUCKET))
    {
        entries.push(BundleEntry {
            location,
            file_name: format!("{stem}_Evaluation_Corrigee.pdf"),
        });
    }

    if let Some(location) = candidate
        .rapport_stage_path
        .as_deref()
        .and_then(|v| parse_location(v, RAPPORT_BUCKET))
    {
        let ext = location.extension().unwrap_or(".pdf").to_string();
        entries.push(BundleEntry {
            file_name: format!("{stem}_Rapport_Stage{ext}"),
            location,
        });
    }

    entries
}

/// Downloads each entry, skipping objects that are missing or unreadable.
/// Returns (archive name, content) pairs in entry order.
pub async fn fetch_documents(storage: &Storage, entries: Vec<BundleEntry>) -> Vec<(String, Bytes)> {
    let mut files = Vec::with_capacity(entries.len());
    for entry in entries {
        let ObjectLocation { bucket, key } = &entry.location;
        match storage.fetch_with_variants(&entry.location).await {
            Ok(Some(bytes)) => files.push((entry.file_name, bytes)),
            Ok(None) => warn!("Skipping missing file {bucket}/{key}"),
            Err(e) => warn!("Skipping unreadable file {bucket}/{key}: {e:#}"),
        }
    }
    files
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use anyhow::{bail, Result};
    use async_trait::async_trait;
    use serde_json::json;

    use crate::models::candidate::fixtures::candidate;
    use crate::storage::memory::MemoryStore;
    use crate::storage::ObjectStore;

    /// Refuses every request for the `uploads` bucket, like S3 answering
    /// `NoSuchBucket` or `AccessDenied`.
    #[derive(Default)]
    struct RestrictedStore {
        inner: MemoryStore,
    }

    #[async_trait]
    impl ObjectStore for RestrictedStore {
        async fn ensure_bucket(&self, bucket: &str) -> Result<()> {
            self.inner.ensure_bucket(bucket).await
        }

        async fn put(&self, bucket: &str, key: &str, body: Bytes, content_type: &str) -> Result<()> {
            self.inner.put(bucket, key, body, content_type).await
        }

        async fn get(&self, bucket: &str, key: &str) -> Result<Option<Bytes>> {
            if bucket == "uploads" {
                bail!("AccessDenied: {bucket}/{key}");
            }
            self.inner.get(bucket, key).await
        }
    }

    #[test]
    fn test_collects_every_document_with_candidate_names() {
        let mut c = candidate(json!({ "Nom": "Alami", "Prénom": "Sara" }));
        c.original_cv_path = Some("http://localhost:9000/cv-bucket/1700-cv%20sara.pdf".to_string());
        c.qualified_form_path = Some("http://localhost:9000/form2-bucket/form-Alami_Sara-1.pdf".to_string());
        c.eval_pdf_path = Some("eval-Alami-2.pdf".to_string());
        c.rapport_stage_path = Some("http://localhost:9000/rapport-bucket/rapport-x-3.docx".to_string());

        let entries = collect_documents(&c);
        let names: Vec<_> = entries.iter().map(|e| e.file_name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "Alami_Sara_CV_Original.pdf",
                "Alami_Sara_Questionnaire_Recrutement.pdf",
                "Alami_Sara_Evaluation_Corrigee.pdf",
                "Alami_Sara_Rapport_Stage.docx",
            ]
        );
        assert_eq!(entries[0].location, ObjectLocation::new("cv-bucket", "1700-cv%20sara.pdf"));
        assert_eq!(entries[2].location.bucket, "form3-bucket");
    }

    #[test]
    fn test_legacy_cv_key_and_default_names() {
        let c = candidate(json!({ "cvUrl": "1700-cv" }));
        let entries = collect_documents(&c);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].file_name, "Unknown_Candidate_CV_Original.pdf");
        assert_eq!(entries[0].location, ObjectLocation::new(CV_BUCKET, "1700-cv"));
    }

    #[test]
    fn test_no_references_means_no_documents() {
        let mut c = candidate(json!({}));
        c.original_cv_path = Some("  ".to_string());
        assert!(collect_documents(&c).is_empty());
    }

    #[tokio::test]
    async fn test_fetch_skips_unreadable_and_missing_objects() {
        let store = Arc::new(RestrictedStore::default());
        store
            .put(FORM3_BUCKET, "eval-Alami-2.pdf", Bytes::from_static(b"%PDF"), "application/pdf")
            .await
            .unwrap();
        let storage = Storage::new(store, "http://localhost:9000");

        let mut c = candidate(json!({ "Nom": "Alami", "Prénom": "Sara" }));
        c.original_cv_path = Some("http://host/uploads/x.pdf".to_string());
        c.qualified_form_path = Some("form-missing.pdf".to_string());
        c.eval_pdf_path = Some("eval-Alami-2.pdf".to_string());

        let files = fetch_documents(&storage, collect_documents(&c)).await;
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].0, "Alami_Sara_Evaluation_Corrigee.pdf");
        assert_eq!(files[0].1, Bytes::from_static(b"%PDF"));
    }

    #[tokio::test]
    async fn test_fetch_with_only_unreadable_objects_is_empty() {
        let storage = Storage::new(Arc::new(RestrictedStore::default()), "http://localhost:9000");
        let mut c = candidate(json!({}));
        c.rapport_stage_path = Some("http://host/uploads/r.docx".to_string());
        assert!(fetch_documents(&storage, collect_documents(&c)).await.is_empty());
    }
}
