use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Lifecycle status of a payment as reported by the storefront
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Completed,
    Pending,
    Failed,
    Refunded,
    PartiallyRefunded,
    Cancelled,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentFees {
    #[serde(default)]
    pub total_fees: f64,
}

/// A single payment record fetched from the storefront
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRecord {
    #[serde(alias = "_id")]
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub amount: f64,
    pub status: PaymentStatus,
    pub payment_method: String,
    #[serde(default)]
    pub refunded_amount: f64,
    #[serde(default)]
    pub fees: PaymentFees,
}

/// Payment listings come back either bare or wrapped in an envelope
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum PaymentListing {
    Bare(Vec<PaymentRecord>),
    Wrapped {
        #[serde(alias = "data")]
        payments: Vec<PaymentRecord>,
    },
}

impl PaymentListing {
    pub fn into_records(self) -> Vec<PaymentRecord> {
        match self {
            PaymentListing::Bare(records) => records,
            PaymentListing::Wrapped { payments } => payments,
        }
    }
}

/// Per-day aggregate for the revenue chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyBucket {
    pub date: NaiveDate,
    pub total_amount: f64,
    pub total_transactions: u64,
    pub success_rate: f64,
    pub average_amount: f64,
    pub refunded_amount: f64,
    pub fees: f64,
}

/// Per-payment-method aggregate for the breakdown chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodBucket {
    pub method: String,
    pub count: u64,
    pub amount: f64,
    pub percentage: f64,
    pub color: String,
}

/// Headline numbers over the filtered records
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSummary {
    pub total_amount: f64,
    pub total_transactions: u64,
    pub completed: u64,
    pub pending: u64,
    pub failed: u64,
    pub refunded: u64,
    pub refunded_amount: f64,
    pub total_fees: f64,
    pub net_amount: f64,
    pub success_rate: f64,
    pub average_amount: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Aggregation {
    pub daily: Vec<DailyBucket>,
    pub methods: Vec<MethodBucket>,
}

/// Response format for the payment report endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentReport {
    pub filter: String,
    pub summary: PaymentSummary,
    pub daily: Vec<DailyBucket>,
    pub methods: Vec<MethodBucket>,
}

/// Contact and social settings shown on the storefront
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteSettings {
    pub phone: String,
    pub email: String,
    pub address: String,
    pub business_hours: String,
    pub whatsapp: String,
    pub instagram: String,
    pub facebook: String,
    pub tiktok: String,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            phone: "+1 (555) 010-2030".to_string(),
            email: "hello@beautystore.com".to_string(),
            address: "123 Rose Avenue, Suite 4, Los Angeles, CA".to_string(),
            business_hours: "Mon-Sat 9:00-19:00".to_string(),
            whatsapp: "+15550102030".to_string(),
            instagram: "https://instagram.com/beautystore".to_string(),
            facebook: "https://facebook.com/beautystore".to_string(),
            tiktok: "https://tiktok.com/@beautystore".to_string(),
        }
    }
}

/// Contact settings as received from the server; any field may be absent
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteSettingsPatch {
    pub phone: Option<String>,
    pub email: Option<String>,
    pub address: Option<String>,
    pub business_hours: Option<String>,
    pub whatsapp: Option<String>,
    pub instagram: Option<String>,
    pub facebook: Option<String>,
    pub tiktok: Option<String>,
}

impl SiteSettingsPatch {
    /// Overlay the present, non-empty fields onto `base`.
    pub fn merge_onto(self, base: SiteSettings) -> SiteSettings {
        SiteSettings {
            phone: pick(self.phone, base.phone),
            email: pick(self.email, base.email),
            address: pick(self.address, base.address),
            business_hours: pick(self.business_hours, base.business_hours),
            whatsapp: pick(self.whatsapp, base.whatsapp),
            instagram: pick(self.instagram, base.instagram),
            facebook: pick(self.facebook, base.facebook),
            tiktok: pick(self.tiktok, base.tiktok),
        }
    }
}

/// SMTP and notification settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailSettings {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_user: String,
    pub smtp_password: String,
    pub smtp_secure: bool,
    pub from_name: String,
    pub from_email: String,
    pub admin_email: String,
    pub notifications_enabled: bool,
}

impl Default for EmailSettings {
    fn default() -> Self {
        Self {
            smtp_host: "smtp.gmail.com".to_string(),
            smtp_port: 587,
            smtp_user: String::new(),
            smtp_password: String::new(),
            smtp_secure: false,
            from_name: "Beauty Store".to_string(),
            from_email: String::new(),
            admin_email: String::new(),
            notifications_enabled: true,
        }
    }
}

impl EmailSettings {
    /// Names of required fields that are blank, in form order
    pub fn missing_required_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.smtp_host.trim().is_empty() {
            missing.push("smtpHost");
        }
        if self.smtp_user.trim().is_empty() {
            missing.push("smtpUser");
        }
        if self.from_email.trim().is_empty() {
            missing.push("fromEmail");
        }
        missing
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailSettingsPatch {
    pub smtp_host: Option<String>,
    #[serde(default, deserialize_with = "lenient_port")]
    pub smtp_port: Option<u16>,
    pub smtp_user: Option<String>,
    pub smtp_password: Option<String>,
    pub smtp_secure: Option<bool>,
    pub from_name: Option<String>,
    pub from_email: Option<String>,
    pub admin_email: Option<String>,
    pub notifications_enabled: Option<bool>,
}

impl EmailSettingsPatch {
    pub fn merge_onto(self, base: EmailSettings) -> EmailSettings {
        EmailSettings {
            smtp_host: pick(self.smtp_host, base.smtp_host),
            smtp_port: self.smtp_port.unwrap_or(base.smtp_port),
            smtp_user: pick(self.smtp_user, base.smtp_user),
            smtp_password: pick(self.smtp_password, base.smtp_password),
            smtp_secure: self.smtp_secure.unwrap_or(base.smtp_secure),
            from_name: pick(self.from_name, base.from_name),
            from_email: pick(self.from_email, base.from_email),
            admin_email: pick(self.admin_email, base.admin_email),
            notifications_enabled: self
                .notifications_enabled
                .unwrap_or(base.notifications_enabled),
        }
    }
}

fn pick(value: Option<String>, fallback: String) -> String {
    value.filter(|v| !v.trim().is_empty()).unwrap_or(fallback)
}

/// Ports arrive as numbers or numeric strings depending on who saved them last
fn lenient_port<'de, D>(deserializer: D) -> std::result::Result<Option<u16>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n.as_u64().and_then(|n| u16::try_from(n).ok()),
        Some(serde_json::Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TestEmailRequest {
    pub to: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackendStatus {
    Checking,
    Online,
    Offline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatabaseStatus {
    Checking,
    Connected,
    Disconnected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GatewayStatus {
    Checking,
    Configured,
    NotConfigured,
    Error,
}

/// Health of the storefront as seen from the admin dashboard
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemHealth {
    pub backend: BackendStatus,
    pub database: DatabaseStatus,
    pub paypal: GatewayStatus,
    pub last_check: Option<DateTime<Utc>>,
}

impl SystemHealth {
    /// State before any probe has settled
    pub fn checking() -> Self {
        Self {
            backend: BackendStatus::Checking,
            database: DatabaseStatus::Checking,
            paypal: GatewayStatus::Checking,
            last_check: None,
        }
    }

    /// Every probe at its worst state
    pub fn failed(at: DateTime<Utc>) -> Self {
        Self {
            backend: BackendStatus::Offline,
            database: DatabaseStatus::Disconnected,
            paypal: GatewayStatus::Error,
            last_check: Some(at),
        }
    }
}

/// Service info for the liveness endpoint
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub storefront_api: String,
}
