//! Multipart file intake shared by the upload routes.

use axum::extract::Multipart;
use bytes::Bytes;

use crate::errors::AppError;

pub const PDF_MIME: &str = "application/pdf";
pub const DOC_MIME: &str = "application/msword";
pub const DOCX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

pub const PDF_ONLY: &[&str] = &[PDF_MIME];
pub const PDF_OR_WORD: &[&str] = &[PDF_MIME, DOC_MIME, DOCX_MIME];

pub const CV_MAX_BYTES: usize = 10 * 1024 * 1024;
pub const DOCUMENT_MAX_BYTES: usize = 20 * 1024 * 1024;

/// Request bodies carry multipart framing on top of the file itself.
pub const fn body_limit(file_limit: usize) -> usize {
    file_limit + 1024 * 1024
}

#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

impl UploadedFile {
    /// Extension of the original file name including the dot, if any.
    pub fn extension(&self) -> Option<&str> {
        let dot = self.file_name.rfind('.')?;
        let ext = &self.file_name[dot..];
        (ext.len() > 1 && !ext.contains('/')).then_some(ext)
    }
}

/// Upload rules for one multipart field.
#[derive(Debug, Clone, Copy)]
pub struct FileRule {
    pub field: &'static str,
    pub allowed: &'static [&'static str],
    pub max_bytes: usize,
}

impl FileRule {
    pub const fn new(field: &'static str, allowed: &'static [&'static str], max_bytes: usize) -> Self {
        Self {
            field,
            allowed,
            max_bytes,
        }
    }

    fn check(&self, content_type: &str, size: usize) -> Result<(), AppError> {
        if !self.allowed.contains(&content_type) {
            let message = if self.allowed == PDF_ONLY {
                "Only PDF files are allowed".to_string()
            } else {
                "Only PDF, DOC, and DOCX files are allowed.".to_string()
            };
            return Err(AppError::UnsupportedMedia(message));
        }
        if size > self.max_bytes {
            return Err(AppError::PayloadTooLarge(format!(
                "File exceeds the {} MB limit",
                self.max_bytes / (1024 * 1024)
            )));
        }
        Ok(())
    }
}

/// Reads the first file sent under `rule.field`, skipping other parts.
/// Returns `Ok(None)` when the field is absent.
pub async fn read_file(
    multipart: &mut Multipart,
    rule: FileRule,
) -> Result<Option<UploadedFile>, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Malformed multipart body: {e}")))?
    {
        if field.name() != Some(rule.field) {
            continue;
        }
        let file_name = field.file_name().unwrap_or("upload").to_string();
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("Failed to read upload: {e}")))?;
        rule.check(&content_type, bytes.len())?;
        return Ok(Some(UploadedFile {
            file_name,
            content_type,
            bytes,
        }));
    }
    Ok(None)
}

/// Like [`read_file`] but a missing file is a 400 with `missing_message`.
pub async fn require_file(
    multipart: &mut Multipart,
    rule: FileRule,
    missing_message: &str,
) -> Result<UploadedFile, AppError> {
    read_file(multipart, rule)
        .await?
        .ok_or_else(|| AppError::Validation(missing_message.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str) -> UploadedFile {
        UploadedFile {
            file_name: name.to_string(),
            content_type: PDF_MIME.to_string(),
            bytes: Bytes::new(),
        }
    }

    #[test]
    fn test_extension() {
        assert_eq!(file("rapport final.docx").extension(), Some(".docx"));
        assert_eq!(file("cv.PDF").extension(), Some(".PDF"));
        assert_eq!(file("noext").extension(), None);
        assert_eq!(file("trailing.").extension(), None);
    }

    #[test]
    fn test_rule_rejects_wrong_mime() {
        let rule = FileRule::new("cv", PDF_ONLY, CV_MAX_BYTES);
        assert!(matches!(
            rule.check("image/png", 10),
            Err(AppError::UnsupportedMedia(_))
        ));
        assert!(rule.check(PDF_MIME, 10).is_ok());
    }

    #[test]
    fn test_rule_rejects_oversized_file() {
        let rule = FileRule::new("rapportStage", PDF_OR_WORD, DOCUMENT_MAX_BYTES);
        assert!(rule.check(DOCX_MIME, DOCUMENT_MAX_BYTES).is_ok());
        assert!(matches!(
            rule.check(DOCX_MIME, DOCUMENT_MAX_BYTES + 1),
            Err(AppError::PayloadTooLarge(_))
        ));
    }

    #[test]
    fn test_body_limit_adds_headroom() {
        assert!(body_limit(CV_MAX_BYTES) > CV_MAX_BYTES);
    }
}
