//! Thin REST client for the users endpoints.

use tracing::debug;

use super::{UserPublic, UserUpdate, UsersPage};

/// Failures from the users API. Transport problems keep the reqwest
/// error; a non-2xx response carries the status and whatever message
/// the body held.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("users api request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("users api returned {status}: {message}")]
    Status { status: u16, message: String },
}

/// Client for the account-management endpoints, rooted at one base URL.
#[derive(Debug, Clone)]
pub struct UsersApi {
    http: reqwest::Client,
    base: String,
}

impl UsersApi {
    pub fn new(http: reqwest::Client, base: impl Into<String>) -> Self {
        let base = base.into();
        Self {
            http,
            base: base.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    /// `GET /users`, returning one page of accounts.
    pub async fn list_users(&self, skip: usize, limit: usize) -> Result<UsersPage, ApiError> {
        debug!("listing users skip={} limit={}", skip, limit);
        let response = self
            .http
            .get(self.url("/users"))
            .query(&[("skip", skip), ("limit", limit)])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(status_error(response).await);
        }
        Ok(response.json().await?)
    }

    /// `PATCH /users/{id}` with the partial update the edit form built.
    pub async fn update_user(&self, id: &str, update: &UserUpdate) -> Result<UserPublic, ApiError> {
        debug!("updating user {}", id);
        let response = self
            .http
            .patch(self.url(&format!("/users/{id}")))
            .json(update)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(status_error(response).await);
        }
        Ok(response.json().await?)
    }

    /// `DELETE /users/{id}`.
    pub async fn delete_user(&self, id: &str) -> Result<(), ApiError> {
        debug!("deleting user {}", id);
        let response = self
            .http
            .delete(self.url(&format!("/users/{id}")))
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(status_error(response).await);
        }
        Ok(())
    }
}

async fn status_error(response: reqwest::Response) -> ApiError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    ApiError::Status {
        status,
        message: extract_detail(&body).unwrap_or(body),
    }
}

/// The API wraps error messages as `{"detail": "..."}`; pull that out
/// when present so the status line stays readable.
fn extract_detail(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("detail")
        .and_then(|detail| detail.as_str())
        .map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_loses_its_trailing_slash() {
        let api = UsersApi::new(reqwest::Client::new(), "https://api.example.com/v1/");
        assert_eq!(api.url("/users"), "https://api.example.com/v1/users");
    }

    #[test]
    fn detail_messages_are_unwrapped() {
        assert_eq!(
            extract_detail(r#"{"detail": "The user with this email already exists in the system"}"#)
                .as_deref(),
            Some("The user with this email already exists in the system")
        );
        assert_eq!(extract_detail("plain text body"), None);
        assert_eq!(extract_detail(r#"{"detail": {"nested": true}}"#), None);
    }
}
