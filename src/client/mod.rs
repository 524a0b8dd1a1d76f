mod api;
mod http;
#[cfg(test)]
pub(crate) mod mock;

pub use api::{ApiResponse, StorefrontApi};
pub use http::HttpStorefrontApi;

use serde_json::Value;

use crate::error::Result;
use crate::models::{PaymentListing, PaymentRecord};

/// Fetch the payment listing and decode it into records.
/// No assumptions are made about ordering or pagination.
pub async fn fetch_payments(api: &dyn StorefrontApi, path: &str) -> Result<Vec<PaymentRecord>> {
    let body = api.get(path).await?.into_success(path)?;

    if body == Value::Null {
        return Ok(Vec::new());
    }

    let listing: PaymentListing = serde_json::from_value(body)?;
    let records = listing.into_records();
    tracing::info!("Fetched {} payment records from {}", records.len(), path);
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::mock::MockApi;
    use super::*;
    use crate::error::AppError;
    use serde_json::json;

    #[tokio::test]
    async fn test_fetch_payments_wrapped() {
        let api = MockApi::new().on(
            "GET",
            "/api/payments",
            200,
            json!({
                "payments": [
                    {"id": "p1", "createdAt": "2024-01-01T10:00:00Z", "amount": 25.0, "status": "completed", "paymentMethod": "visa"}
                ]
            }),
        );

        let records = fetch_payments(&api, "/api/payments").await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, "p1");
    }

    #[tokio::test]
    async fn test_fetch_payments_html_body_is_an_error() {
        let api = MockApi::new().on_text("GET", "/api/payments", 200, "<html>login</html>");

        let result = fetch_payments(&api, "/api/payments").await;
        assert!(matches!(result, Err(AppError::JsonParse(_))));
    }

    #[tokio::test]
    async fn test_fetch_payments_empty_body_is_empty() {
        let api = MockApi::new().on_text("GET", "/api/payments", 200, "");

        let records = fetch_payments(&api, "/api/payments").await.unwrap();
        assert!(records.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_payments_error_status() {
        let api = MockApi::new().on("GET", "/api/payments", 401, json!({"error": "unauthorized"}));

        let result = fetch_payments(&api, "/api/payments").await;
        assert!(matches!(result, Err(AppError::Status { status: 401, .. })));
    }

    #[tokio::test]
    async fn test_fetch_payments_malformed_record() {
        let api = MockApi::new().on(
            "GET",
            "/api/payments",
            200,
            json!([{"id": "p1", "createdAt": "not a date", "amount": 1, "status": "completed", "paymentMethod": "visa"}]),
        );

        let result = fetch_payments(&api, "/api/payments").await;
        assert!(matches!(result, Err(AppError::JsonParse(_))));
    }
}
