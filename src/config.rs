use std::env;
use std::path::Path;

use crate::error::{AppError, Result};

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Base URL of the storefront backend, without a trailing slash
    pub api_base_url: String,
    /// Bearer token attached to storefront API calls
    pub api_token: Option<String>,
    pub payments_path: String,
    pub request_timeout_secs: u64,
    pub connect_timeout_secs: u64,
    pub health_check_on_startup: bool,
    pub health_cron: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let api_token = env::var("ADMIN_API_TOKEN")
            .ok()
            .filter(|t| !t.trim().is_empty())
            .or_else(|| {
                env::var("ADMIN_TOKEN_FILE")
                    .ok()
                    .and_then(|path| match read_token_file(Path::new(&path)) {
                        Ok(token) => token,
                        Err(e) => {
                            tracing::warn!("Ignoring token file {}: {}", path, e);
                            None
                        }
                    })
            });

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),

            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8090),

            api_base_url: env::var("STOREFRONT_API_URL")
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or_else(|_| "http://localhost:5000".to_string()),

            api_token,

            payments_path: env::var("PAYMENTS_PATH")
                .unwrap_or_else(|_| "/api/payments".to_string()),

            request_timeout_secs: env::var("REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),

            connect_timeout_secs: env::var("CONNECT_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5),

            health_check_on_startup: env::var("HEALTH_CHECK_ON_STARTUP")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(true),

            health_cron: env::var("HEALTH_CRON").unwrap_or_else(|_| "0 */5 * * * *".to_string()), // every 5 minutes
        }
    }
}

/// Read a persisted token. An empty file means "no token".
pub fn read_token_file(path: &Path) -> Result<Option<String>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| AppError::Config(format!("cannot read {}: {}", path.display(), e)))?;
    let token = content.trim();
    Ok((!token.is_empty()).then(|| token.to_string()))
}
