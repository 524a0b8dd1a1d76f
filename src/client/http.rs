use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

use crate::client::{ApiResponse, StorefrontApi};
use crate::config::Config;
use crate::error::{AppError, Result};

/// reqwest-backed storefront client.
/// Carries the base URL and bearer token so nothing reads them from globals.
pub struct HttpStorefrontApi {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl HttpStorefrontApi {
    pub fn new(
        base_url: impl Into<String>,
        token: Option<String>,
        connect_timeout: Duration,
        request_timeout: Duration,
    ) -> Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(connect_timeout)
            .timeout(request_timeout)
            .build()?;

        let base_url = base_url.into().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(AppError::Config("storefront API URL is empty".to_string()));
        }

        Ok(Self {
            client,
            base_url,
            token,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(
            config.api_base_url.clone(),
            config.api_token.clone(),
            Duration::from_secs(config.connect_timeout_secs),
            Duration::from_secs(config.request_timeout_secs),
        )
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<ApiResponse> {
        let request = match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        };

        let response = request.send().await?;
        let status = response.status().as_u16();
        let text = response.text().await?;

        Ok(ApiResponse::from_text(status, text))
    }
}

#[async_trait]
impl StorefrontApi for HttpStorefrontApi {
    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get(&self, path: &str) -> Result<ApiResponse> {
        tracing::debug!("GET {}", path);
        self.send(self.client.get(self.url(path))).await
    }

    async fn put(&self, path: &str, body: &Value) -> Result<ApiResponse> {
        tracing::debug!("PUT {}", path);
        self.send(self.client.put(self.url(path)).json(body)).await
    }

    async fn post(&self, path: &str, body: &Value) -> Result<ApiResponse> {
        tracing::debug!("POST {}", path);
        self.send(self.client.post(self.url(path)).json(body)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        http::{header::AUTHORIZATION, HeaderMap},
        routing::get,
        Json, Router,
    };
    use serde_json::json;

    fn client(base: &str) -> HttpStorefrontApi {
        HttpStorefrontApi::new(base, None, Duration::from_secs(1), Duration::from_secs(1)).unwrap()
    }

    fn client_with_token(base: &str, token: Option<&str>) -> HttpStorefrontApi {
        HttpStorefrontApi::new(
            base,
            token.map(str::to_string),
            Duration::from_secs(2),
            Duration::from_secs(5),
        )
        .unwrap()
    }

    /// Local storefront that echoes the Authorization header and serves a login page
    async fn spawn_storefront() -> String {
        async fn echo_auth(headers: HeaderMap) -> Json<Value> {
            let auth = headers
                .get(AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string);
            Json(json!({ "authorization": auth }))
        }

        async fn login_page() -> &'static str {
            "<html>login</html>"
        }

        let app = Router::new()
            .route("/echo", get(echo_auth).put(echo_auth))
            .route("/api/payments", get(login_page));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        format!("http://{}", addr)
    }

    #[tokio::test]
    async fn test_bearer_token_is_attached() {
        let base = spawn_storefront().await;
        let api = client_with_token(&base, Some("tok"));

        let response = api.get("/echo").await.unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(response.body["authorization"], "Bearer tok");

        let response = api.put("/echo", &json!({ "phone": "1" })).await.unwrap();
        assert_eq!(response.body["authorization"], "Bearer tok");
    }

    #[tokio::test]
    async fn test_no_token_sends_no_authorization_header() {
        let base = spawn_storefront().await;
        let api = client_with_token(&base, None);

        let response = api.get("/echo").await.unwrap();
        assert_eq!(response.status, 200);
        assert!(response.body["authorization"].is_null());
    }

    #[tokio::test]
    async fn test_html_payments_page_is_not_an_empty_listing() {
        let base = spawn_storefront().await;
        let api = client_with_token(&base, Some("tok"));

        let result = crate::client::fetch_payments(&api, "/api/payments").await;
        assert!(matches!(result, Err(AppError::JsonParse(_))));
    }

    #[test]
    fn test_url_joins_without_double_slash() {
        let api = client("http://localhost:5000/");
        assert_eq!(api.base_url(), "http://localhost:5000");
        assert_eq!(api.url("/site-settings"), "http://localhost:5000/site-settings");
        assert_eq!(api.url("api/health"), "http://localhost:5000/api/health");
    }

    #[test]
    fn test_empty_base_url_is_config_error() {
        let result = HttpStorefrontApi::new("", None, Duration::from_secs(1), Duration::from_secs(1));
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_request_error() {
        // Port 9 (discard) is closed on loopback in test environments
        let api = client("http://127.0.0.1:9");
        let result = api.get("/api/health").await;
        assert!(matches!(result, Err(AppError::Request(_))));
    }
}
