use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;

use crate::client::{ApiResponse, StorefrontApi};
use crate::error::{AppError, Result};

/// Canned outcome for one method + path
#[derive(Clone)]
pub enum Canned {
    Respond(ApiResponse),
    Unreachable,
    Panic,
}

/// In-memory storefront that records every request it receives
#[derive(Default)]
pub struct MockApi {
    routes: HashMap<(String, String), Canned>,
    requests: Mutex<Vec<(String, String, Option<Value>)>>,
}

impl MockApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(mut self, method: &str, path: &str, status: u16, body: Value) -> Self {
        self.routes.insert(
            (method.to_string(), path.to_string()),
            Canned::Respond(ApiResponse::new(status, body)),
        );
        self
    }

    pub fn on_text(mut self, method: &str, path: &str, status: u16, raw: &str) -> Self {
        self.routes.insert(
            (method.to_string(), path.to_string()),
            Canned::Respond(ApiResponse::from_text(status, raw.to_string())),
        );
        self
    }

    pub fn unreachable(mut self, method: &str, path: &str) -> Self {
        self.routes
            .insert((method.to_string(), path.to_string()), Canned::Unreachable);
        self
    }

    pub fn panicking(mut self, method: &str, path: &str) -> Self {
        self.routes
            .insert((method.to_string(), path.to_string()), Canned::Panic);
        self
    }

    pub fn sent(&self) -> Vec<(String, String, Option<Value>)> {
        self.requests.lock().unwrap().clone()
    }

    fn handle(&self, method: &str, path: &str, body: Option<&Value>) -> Result<ApiResponse> {
        self.requests
            .lock()
            .unwrap()
            .push((method.to_string(), path.to_string(), body.cloned()));

        match self.routes.get(&(method.to_string(), path.to_string())) {
            Some(Canned::Respond(response)) => Ok(response.clone()),
            Some(Canned::Unreachable) => Err(AppError::Internal(format!(
                "connection refused: {} {}",
                method, path
            ))),
            Some(Canned::Panic) => panic!("probe blew up on {} {}", method, path),
            None => Ok(ApiResponse::new(404, Value::Null)),
        }
    }
}

#[async_trait]
impl StorefrontApi for MockApi {
    fn base_url(&self) -> &str {
        "http://mock.storefront"
    }

    async fn get(&self, path: &str) -> Result<ApiResponse> {
        self.handle("GET", path, None)
    }

    async fn put(&self, path: &str, body: &Value) -> Result<ApiResponse> {
        self.handle("PUT", path, Some(body))
    }

    async fn post(&self, path: &str, body: &Value) -> Result<ApiResponse> {
        self.handle("POST", path, Some(body))
    }
}
