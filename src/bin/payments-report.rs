use anyhow::Result;
use chrono::Local;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use storefront_admin::{build_report, client, dump, Config, DateFilter, HttpStorefrontApi};

/// Print a payment report as JSON.
///
/// Usage: payments-report [PERIOD] [EXPORT_FILE]
/// PERIOD defaults to REPORT_PERIOD or "month". Without an export file
/// (argument or PAYMENTS_FILE), payments are fetched from the storefront API.
#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so stdout stays valid JSON
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "storefront_admin=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut args = std::env::args().skip(1);

    let period = args
        .next()
        .or_else(|| std::env::var("REPORT_PERIOD").ok())
        .unwrap_or_else(|| "month".to_string());
    let filter = DateFilter::parse(&period)?;

    let export_path = args
        .next()
        .or_else(|| std::env::var("PAYMENTS_FILE").ok())
        .map(PathBuf::from);

    let records = match export_path {
        Some(path) => dump::parse_payments_file(&path)?,
        None => {
            let config = Config::from_env();
            tracing::info!("Fetching payments from {}", config.api_base_url);
            let api = HttpStorefrontApi::from_config(&config)?;
            client::fetch_payments(&api, &config.payments_path).await?
        }
    };

    let today = Local::now().date_naive();
    let report = build_report(&records, &filter, today, &Local);

    tracing::info!(
        "Report {}: {} transactions over {} days",
        report.filter,
        report.summary.total_transactions,
        report.daily.len()
    );

    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
