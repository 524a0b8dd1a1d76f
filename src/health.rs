//! System health probes against the storefront.
//!
//! Each probe runs as its own task and only decides its own field. The
//! combined result is built once all three have settled. If a probe task
//! itself dies, the whole result fails closed: every field is set to its
//! worst state, including fields whose probes succeeded.

use chrono::Utc;
use serde_json::Value;
use std::sync::Arc;

use crate::client::{ApiResponse, StorefrontApi};
use crate::error::Result;
use crate::models::{BackendStatus, DatabaseStatus, GatewayStatus, SystemHealth};

pub const BACKEND_PROBE_PATH: &str = "/api/health";
pub const DATABASE_PROBE_PATH: &str = "/api/orders";
pub const GATEWAY_PROBE_PATH: &str = "/api/paypal/config";

pub struct HealthProber {
    api: Arc<dyn StorefrontApi>,
}

impl HealthProber {
    pub fn new(api: Arc<dyn StorefrontApi>) -> Self {
        Self { api }
    }

    /// Run all three probes concurrently and assemble the result
    pub async fn check_all(&self) -> SystemHealth {
        let backend = tokio::spawn(probe_backend(self.api.clone()));
        let database = tokio::spawn(probe_database(self.api.clone()));
        let paypal = tokio::spawn(probe_gateway(self.api.clone()));

        let (backend, database, paypal) = tokio::join!(backend, database, paypal);
        let now = Utc::now();

        match (backend, database, paypal) {
            (Ok(backend), Ok(database), Ok(paypal)) => {
                tracing::info!(
                    "Health check: backend={:?} database={:?} paypal={:?}",
                    backend,
                    database,
                    paypal
                );
                SystemHealth {
                    backend,
                    database,
                    paypal,
                    last_check: Some(now),
                }
            }
            (backend, database, paypal) => {
                for e in [backend.err(), database.err(), paypal.err()]
                    .into_iter()
                    .flatten()
                {
                    tracing::error!("Health probe task failed: {}", e);
                }
                SystemHealth::failed(now)
            }
        }
    }
}

async fn probe_backend(api: Arc<dyn StorefrontApi>) -> BackendStatus {
    classify_backend(&api.get(BACKEND_PROBE_PATH).await)
}

async fn probe_database(api: Arc<dyn StorefrontApi>) -> DatabaseStatus {
    classify_database(&api.get(DATABASE_PROBE_PATH).await)
}

async fn probe_gateway(api: Arc<dyn StorefrontApi>) -> GatewayStatus {
    classify_gateway(&api.get(GATEWAY_PROBE_PATH).await)
}

fn log_failure(path: &str, outcome: &Result<ApiResponse>) {
    match outcome {
        Ok(response) if !response.is_success() => {
            tracing::warn!("Probe {} returned {}", path, response.status)
        }
        Err(e) => tracing::warn!("Probe {} failed: {}", path, e),
        _ => {}
    }
}

pub fn classify_backend(outcome: &Result<ApiResponse>) -> BackendStatus {
    match outcome {
        Ok(response) if response.is_success() => BackendStatus::Online,
        _ => {
            log_failure(BACKEND_PROBE_PATH, outcome);
            BackendStatus::Offline
        }
    }
}

pub fn classify_database(outcome: &Result<ApiResponse>) -> DatabaseStatus {
    match outcome {
        Ok(response) if response.is_success() => DatabaseStatus::Connected,
        _ => {
            log_failure(DATABASE_PROBE_PATH, outcome);
            DatabaseStatus::Disconnected
        }
    }
}

pub fn classify_gateway(outcome: &Result<ApiResponse>) -> GatewayStatus {
    match outcome {
        Ok(response) if response.is_success() => {
            if gateway_configured(&response.body) {
                GatewayStatus::Configured
            } else {
                GatewayStatus::NotConfigured
            }
        }
        _ => {
            log_failure(GATEWAY_PROBE_PATH, outcome);
            GatewayStatus::Error
        }
    }
}

/// `configured: true` or a non-empty client id, at top level or under `data`
fn gateway_configured(body: &Value) -> bool {
    let check = |v: &Value| {
        v.get("configured").and_then(Value::as_bool) == Some(true)
            || ["clientId", "client_id"].iter().any(|key| {
                v.get(*key)
                    .and_then(Value::as_str)
                    .is_some_and(|id| !id.trim().is_empty())
            })
    };
    check(body) || body.get("data").is_some_and(check)
}
