use std::sync::Arc;
use tokio::net::TcpListener;
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use storefront_admin::{
    api::{self, AppState},
    Config, DashboardService, HttpStorefrontApi,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "storefront_admin=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env();
    tracing::info!("Starting Storefront Admin API");
    tracing::info!("Storefront API: {}", config.api_base_url);
    if config.api_token.is_none() {
        tracing::warn!("No admin API token configured, authenticated calls will be rejected");
    }

    // Storefront client carries the base URL and credentials
    let client = HttpStorefrontApi::from_config(&config)?;
    let service = DashboardService::new(Arc::new(client), config.payments_path.clone());

    // Create shared state
    let state = Arc::new(AppState { service });

    // Initial health check (runs in background so server starts immediately)
    if config.health_check_on_startup {
        let check_state = state.clone();
        tokio::spawn(async move {
            tracing::info!("Running initial health check in background...");
            let health = check_state.service.refresh_health().await;
            tracing::info!(
                "Initial health check completed: backend={:?} database={:?} paypal={:?}",
                health.backend,
                health.database,
                health.paypal
            );
        });
    }

    // Setup scheduled health checks
    let scheduler = JobScheduler::new().await?;

    let check_state = state.clone();
    let cron_expr = config.health_cron.clone();

    let job = Job::new_async(cron_expr.as_str(), move |_uuid, _lock| {
        let state = check_state.clone();
        Box::pin(async move {
            tracing::debug!("Running scheduled health check...");
            state.service.refresh_health().await;
        })
    })?;

    scheduler.add(job).await?;
    scheduler.start().await?;
    tracing::info!("Scheduler started with cron: {}", config.health_cron);

    // Create router
    let app = api::create_router(state);

    // Start server
    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
