pub mod handlers;
pub mod patch;
pub mod repository;
pub mod tokens;

use uuid::Uuid;

use crate::errors::AppError;

/// Parses an id path segment; malformed ids are a 400, not a 404.
pub fn parse_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw.trim()).map_err(|_| AppError::invalid_id())
}

pub fn not_found() -> AppError {
    AppError::NotFound("Candidate not found".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id() {
        let id = Uuid::new_v4();
        assert_eq!(parse_id(&id.to_string()).unwrap(), id);
        assert!(matches!(parse_id("65f0c0ffee"), Err(AppError::Validation(_))));
    }
}
