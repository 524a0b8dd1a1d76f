use axum::{
    extract::{Query, State},
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::models::{
    EmailSettings, HealthResponse, PaymentReport, SiteSettings, SystemHealth, TestEmailRequest,
};
use crate::report::DateFilter;
use crate::service::DashboardService;

/// Shared application state
pub struct AppState {
    pub service: DashboardService,
}

/// Query parameters for the payment report
#[derive(Debug, Deserialize)]
pub struct ReportQuery {
    /// today, week, month, quarter, year or all (default: month)
    pub period: Option<String>,
    /// Custom range start (YYYY-MM-DD), requires `to`
    pub from: Option<String>,
    /// Custom range end (YYYY-MM-DD), requires `from`
    pub to: Option<String>,
}

impl ReportQuery {
    fn filter(&self) -> Result<DateFilter> {
        match (&self.from, &self.to) {
            (Some(from), Some(to)) => DateFilter::range(parse_date(from)?, parse_date(to)?),
            (None, None) => DateFilter::parse(
                self.period
                    .as_deref()
                    .filter(|p| !p.trim().is_empty())
                    .unwrap_or("month"),
            ),
            _ => Err(AppError::InvalidDate(
                "Both from and to are required for a custom range".to_string(),
            )),
        }
    }
}

/// GET /
/// Returns basic API info
pub async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "name": "Storefront Admin API",
        "description": "Admin dashboard backend: payment reports, store settings and system health",
        "endpoints": {
            "/reports/payments": "Payment report (period=today|week|month|quarter|year|all, or from/to)",
            "/settings": "Contact settings (GET, PUT)",
            "/settings/email": "Email settings (GET, PUT)",
            "/settings/email/test": "Send a test email (POST)",
            "/system/health": "Last system health check",
            "/system/health/check": "Run the system health check now (POST)",
            "/health": "Health check"
        }
    }))
}

/// GET /health
/// Liveness of this service
pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        storefront_api: state.service.storefront_url().to_string(),
    })
}

/// GET /reports/payments
pub async fn payment_report(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ReportQuery>,
) -> Result<Json<PaymentReport>> {
    let filter = query.filter()?;
    tracing::debug!("Building payment report for {}", filter.label());

    let report = state.service.payment_report(&filter).await?;
    Ok(Json(report))
}

/// GET /settings
pub async fn get_site_settings(State(state): State<Arc<AppState>>) -> Result<Json<SiteSettings>> {
    Ok(Json(state.service.site_settings().await?))
}

/// PUT /settings
pub async fn put_site_settings(
    State(state): State<Arc<AppState>>,
    Json(settings): Json<SiteSettings>,
) -> Result<Json<serde_json::Value>> {
    state.service.save_site_settings(&settings).await?;

    Ok(Json(serde_json::json!({
        "status": "ok",
        "message": "Settings saved"
    })))
}

/// GET /settings/email
pub async fn get_email_settings(
    State(state): State<Arc<AppState>>,
) -> Result<Json<EmailSettings>> {
    Ok(Json(state.service.email_settings().await?))
}

/// PUT /settings/email
pub async fn put_email_settings(
    State(state): State<Arc<AppState>>,
    Json(settings): Json<EmailSettings>,
) -> Result<Json<serde_json::Value>> {
    state.service.save_email_settings(&settings).await?;

    Ok(Json(serde_json::json!({
        "status": "ok",
        "message": "Email settings saved"
    })))
}

/// POST /settings/email/test
pub async fn send_test_email(
    State(state): State<Arc<AppState>>,
    Json(request): Json<TestEmailRequest>,
) -> Result<Json<serde_json::Value>> {
    let message = state.service.send_test_email(&request.to).await?;

    Ok(Json(serde_json::json!({
        "status": "ok",
        "message": message
    })))
}

/// GET /system/health
pub async fn system_health(State(state): State<Arc<AppState>>) -> Json<SystemHealth> {
    Json(state.service.latest_health().await)
}

/// POST /system/health/check
pub async fn run_health_check(State(state): State<Arc<AppState>>) -> Json<SystemHealth> {
    Json(state.service.refresh_health().await)
}

/// Parse date from string, supporting multiple formats
fn parse_date(s: &str) -> Result<NaiveDate> {
    // Try ISO format first (YYYY-MM-DD)
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(date);
    }

    // Try compact format (YYYYMMDD)
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y%m%d") {
        return Ok(date);
    }

    Err(AppError::InvalidDate(format!(
        "Invalid date format: {}. Use YYYY-MM-DD",
        s
    )))
}
