use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::handlers::{
    get_email_settings, get_site_settings, health_check, payment_report, put_email_settings,
    put_site_settings, root, run_health_check, send_test_email, system_health, AppState,
};

/// Create the API router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        // Reports
        .route("/reports/payments", get(payment_report))
        // Settings forms
        .route("/settings", get(get_site_settings).put(put_site_settings))
        .route(
            "/settings/email",
            get(get_email_settings).put(put_email_settings),
        )
        .route("/settings/email/test", post(send_test_email))
        // System health
        .route("/system/health", get(system_health))
        .route("/system/health/check", post(run_health_check))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
