pub mod api;
pub mod client;
pub mod config;
pub mod dump;
pub mod error;
pub mod health;
pub mod models;
pub mod report;
pub mod service;
pub mod settings;

pub use client::{HttpStorefrontApi, StorefrontApi};
pub use config::Config;
pub use error::{AppError, Result};
pub use health::HealthProber;
pub use report::{aggregate, aggregate_in, build_report, DateFilter};
pub use service::DashboardService;
pub use settings::SettingsController;
