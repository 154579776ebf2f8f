//! Admin sessions: opaque bearer tokens mapped to usernames in Redis.

use axum::http::{header, HeaderMap};
use redis::AsyncCommands;

use crate::candidates::tokens::generate_token;
use crate::errors::AppError;

#[derive(Clone)]
pub struct SessionStore {
    client: redis::Client,
    ttl_secs: u64,
}

impl SessionStore {
    pub fn new(client: redis::Client, ttl_secs: u64) -> Self {
        Self { client, ttl_secs }
    }

    fn key(token: &str) -> String {
        format!("session:{token}")
    }

    /// Opens a session and returns its token.
    pub async fn create(&self, username: &str) -> Result<String, AppError> {
        let token = generate_token();
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        conn.set_ex::<_, _, ()>(Self::key(&token), username, self.ttl_secs)
            .await?;
        Ok(token)
    }

    pub async fn username(&self, token: &str) -> Result<Option<String>, AppError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        Ok(conn.get(Self::key(token)).await?)
    }

    pub async fn revoke(&self, token: &str) -> Result<(), AppError> {
        let mut conn = self.client.get_multiplexed_async_connection().await?;
        conn.del::<_, ()>(Self::key(token)).await?;
        Ok(())
    }
}

/// Token from an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn test_bearer_token() {
        let mut headers = HeaderMap::new();
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer abc123"));
        assert_eq!(bearer_token(&headers), Some("abc123"));

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Basic abc123"));
        assert_eq!(bearer_token(&headers), None);

        headers.insert(header::AUTHORIZATION, HeaderValue::from_static("Bearer "));
        assert_eq!(bearer_token(&headers), None);
    }

    #[test]
    fn test_session_key() {
        assert_eq!(SessionStore::key("t"), "session:t");
    }
}
