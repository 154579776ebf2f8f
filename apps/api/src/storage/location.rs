use reqwest::Url;
use serde::Serialize;

/// A bucket/key pair resolved from whatever a candidate record stored:
/// a full public URL, a bare key, or an already-encoded key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObjectLocation {
    pub bucket: String,
    pub key: String,
}

impl ObjectLocation {
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
        }
    }

    /// Key spellings to try, in order, without repeats: as stored,
    /// URL-encoded when it contains a space, URL-decoded when it contains `%`.
    pub fn key_variants(&self) -> Vec<String> {
        let mut variants = vec![self.key.clone()];
        if self.key.contains(' ') {
            variants.push(urlencoding::encode(&self.key).into_owned());
        }
        if self.key.contains('%') {
            if let Ok(decoded) = urlencoding::decode(&self.key) {
                variants.push(decoded.into_owned());
            }
        }
        let mut seen = std::collections::HashSet::new();
        variants.retain(|v| !v.is_empty() && seen.insert(v.clone()));
        variants
    }

    /// File extension of the key including the dot, if any.
    pub fn extension(&self) -> Option<&str> {
        let name = self.key.rsplit('/').next().unwrap_or(&self.key);
        name.rfind('.')
            .filter(|&idx| idx > 0)
            .map(|idx| &name[idx..])
    }
}

/// Resolves a stored document reference into a bucket and key.
///
/// URLs with at least two path segments name their own bucket; a single
/// segment or a non-URL value lands in `default_bucket`.
pub fn parse_location(value: &str, default_bucket: &str) -> Option<ObjectLocation> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if value.starts_with("http") {
        if let Ok(url) = Url::parse(value) {
            let parts: Vec<&str> = url
                .path()
                .split('/')
                .filter(|p| !p.is_empty())
                .collect();
            match parts.as_slice() {
                [] => {}
                [only] => return Some(ObjectLocation::new(default_bucket, *only)),
                [bucket, rest @ ..] => {
                    return Some(ObjectLocation::new(*bucket, rest.join("/")));
                }
            }
        }
    }

    Some(ObjectLocation::new(default_bucket, value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_url() {
        let loc = parse_location(
            "http://localhost:9000/form2-bucket/form-Alami_Sara-1700.pdf",
            "cv-bucket",
        )
        .unwrap();
        assert_eq!(loc, ObjectLocation::new("form2-bucket", "form-Alami_Sara-1700.pdf"));
    }

    #[test]
    fn test_parse_url_with_nested_key() {
        let loc = parse_location("https://cdn.example.com/cv-bucket/2024/01/cv.pdf", "x").unwrap();
        assert_eq!(loc.bucket, "cv-bucket");
        assert_eq!(loc.key, "2024/01/cv.pdf");
    }

    #[test]
    fn test_parse_url_single_segment_uses_default_bucket() {
        let loc = parse_location("http://minio:9000/cv.pdf", "cv-bucket").unwrap();
        assert_eq!(loc, ObjectLocation::new("cv-bucket", "cv.pdf"));
    }

    #[test]
    fn test_parse_bare_key() {
        let loc = parse_location("1700-cv.pdf", "cv-bucket").unwrap();
        assert_eq!(loc, ObjectLocation::new("cv-bucket", "1700-cv.pdf"));
    }

    #[test]
    fn test_parse_empty_is_none() {
        assert!(parse_location("   ", "cv-bucket").is_none());
    }

    #[test]
    fn test_key_variants_space_and_percent() {
        let spaced = ObjectLocation::new("b", "mon cv.pdf");
        assert_eq!(spaced.key_variants(), vec!["mon cv.pdf", "mon%20cv.pdf"]);

        let encoded = ObjectLocation::new("b", "mon%20cv.pdf");
        assert_eq!(encoded.key_variants(), vec!["mon%20cv.pdf", "mon cv.pdf"]);

        let plain = ObjectLocation::new("b", "cv.pdf");
        assert_eq!(plain.key_variants(), vec!["cv.pdf"]);
    }

    #[test]
    fn test_extension() {
        assert_eq!(ObjectLocation::new("b", "dir/rapport.docx").extension(), Some(".docx"));
        assert_eq!(ObjectLocation::new("b", "noext").extension(), None);
        assert_eq!(ObjectLocation::new("b", ".hidden").extension(), None);
    }
}
