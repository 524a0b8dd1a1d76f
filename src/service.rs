use chrono::Local;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::client::{self, StorefrontApi};
use crate::error::Result;
use crate::health::HealthProber;
use crate::models::{EmailSettings, PaymentReport, SiteSettings, SystemHealth};
use crate::report::{self, DateFilter};
use crate::settings::SettingsController;

/// Service behind the admin dashboard
/// Composes the storefront client with reports, settings and health checks
pub struct DashboardService {
    api: Arc<dyn StorefrontApi>,
    payments_path: String,
    settings: SettingsController,
    prober: HealthProber,
    /// Result of the most recently started health check that has settled
    health: RwLock<CachedHealth>,
    /// Start order of health checks
    health_runs: AtomicU64,
}

struct CachedHealth {
    run: u64,
    health: SystemHealth,
}

impl DashboardService {
    pub fn new(api: Arc<dyn StorefrontApi>, payments_path: String) -> Self {
        Self {
            settings: SettingsController::new(api.clone()),
            prober: HealthProber::new(api.clone()),
            api,
            payments_path,
            health: RwLock::new(CachedHealth {
                run: 0,
                health: SystemHealth::checking(),
            }),
            health_runs: AtomicU64::new(0),
        }
    }

    pub fn storefront_url(&self) -> &str {
        self.api.base_url()
    }

    /// Fetch payments and build a report for the filter, in local time
    pub async fn payment_report(&self, filter: &DateFilter) -> Result<PaymentReport> {
        let records = client::fetch_payments(self.api.as_ref(), &self.payments_path).await?;
        let today = Local::now().date_naive();
        Ok(report::build_report(&records, filter, today, &Local))
    }

    pub async fn site_settings(&self) -> Result<SiteSettings> {
        self.settings.load_site_settings().await
    }

    pub async fn save_site_settings(&self, settings: &SiteSettings) -> Result<()> {
        self.settings.save_site_settings(settings).await
    }

    pub async fn email_settings(&self) -> Result<EmailSettings> {
        self.settings.load_email_settings().await
    }

    pub async fn save_email_settings(&self, settings: &EmailSettings) -> Result<()> {
        self.settings.save_email_settings(settings).await
    }

    pub async fn send_test_email(&self, to: &str) -> Result<String> {
        self.settings.send_test_email(to).await
    }

    /// Run the probes and remember the outcome.
    /// A check that settles after a later-started one does not replace its result.
    pub async fn refresh_health(&self) -> SystemHealth {
        let run = self.health_runs.fetch_add(1, Ordering::SeqCst) + 1;
        let health = self.prober.check_all().await;
        self.store_health(run, health.clone()).await;
        health
    }

    async fn store_health(&self, run: u64, health: SystemHealth) -> bool {
        let mut cached = self.health.write().await;
        if run < cached.run {
            tracing::debug!(
                "Discarding health check #{}, #{} already stored",
                run,
                cached.run
            );
            return false;
        }
        *cached = CachedHealth { run, health };
        true
    }

    /// Last known health, all `checking` until the first check settles
    pub async fn latest_health(&self) -> SystemHealth {
        self.health.read().await.health.clone()
    }
}
