use async_trait::async_trait;
use serde_json::Value;

use crate::error::{AppError, Result};

/// A response from the storefront backend, whatever its status
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    pub status: u16,
    /// Parsed JSON body, `Value::Null` when the body is empty or not JSON
    pub body: Value,
    /// Body as received
    pub raw: String,
}

impl ApiResponse {
    pub fn new(status: u16, body: Value) -> Self {
        let raw = if body.is_null() {
            String::new()
        } else {
            body.to_string()
        };
        Self { status, body, raw }
    }

    /// Build from the raw body text; non-JSON text leaves `body` as `Null`
    pub fn from_text(status: u16, raw: String) -> Self {
        let body = if raw.trim().is_empty() {
            Value::Null
        } else {
            serde_json::from_str(&raw).unwrap_or(Value::Null)
        };
        Self { status, body, raw }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Turn a non-2xx status, a 2xx carrying `"success": false`, or a
    /// non-empty body that is not JSON into an error
    pub fn into_success(self, path: &str) -> Result<Value> {
        if !self.is_success() {
            return Err(AppError::Status {
                path: path.to_string(),
                status: self.status,
            });
        }

        if self.body.is_null() && !self.raw.trim().is_empty() {
            if let Err(e) = serde_json::from_str::<Value>(&self.raw) {
                tracing::warn!("{} returned {} with a non-JSON body", path, self.status);
                return Err(AppError::JsonParse(e));
            }
        }

        if self.body.get("success").and_then(Value::as_bool) == Some(false) {
            let message = self
                .body
                .get("message")
                .or_else(|| self.body.get("error"))
                .and_then(Value::as_str)
                .unwrap_or("request was not successful")
                .to_string();
            return Err(AppError::Rejected(message));
        }

        Ok(self.body)
    }
}

/// Transport to the storefront REST API.
/// Transport failures are errors; HTTP error statuses are not, so callers can
/// classify them.
#[async_trait]
pub trait StorefrontApi: Send + Sync {
    /// Base URL requests are resolved against
    fn base_url(&self) -> &str;

    async fn get(&self, path: &str) -> Result<ApiResponse>;

    async fn put(&self, path: &str, body: &Value) -> Result<ApiResponse>;

    async fn post(&self, path: &str, body: &Value) -> Result<ApiResponse>;
}
