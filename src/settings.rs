//! Contact and email settings, loaded and saved as whole snapshots.
//!
//! Saves always send the full object. Two forms editing different parts of
//! the same remote document will overwrite each other, last writer wins.

use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::client::StorefrontApi;
use crate::error::{AppError, Result};
use crate::models::{EmailSettings, EmailSettingsPatch, SiteSettings, SiteSettingsPatch};

pub const SITE_SETTINGS_PATH: &str = "/site-settings";
pub const EMAIL_SETTINGS_PATH: &str = "/site-settings/email";
pub const TEST_EMAIL_PATH: &str = "/site-settings/email/test";

pub struct SettingsController {
    api: Arc<dyn StorefrontApi>,
}

impl SettingsController {
    pub fn new(api: Arc<dyn StorefrontApi>) -> Self {
        Self { api }
    }

    /// Load contact settings, filling every absent field with its default
    pub async fn load_site_settings(&self) -> Result<SiteSettings> {
        let patch: SiteSettingsPatch = self.fetch_patch(SITE_SETTINGS_PATH).await?;
        Ok(patch.merge_onto(SiteSettings::default()))
    }

    pub async fn save_site_settings(&self, settings: &SiteSettings) -> Result<()> {
        let body = serde_json::to_value(settings)?;
        self.api
            .put(SITE_SETTINGS_PATH, &body)
            .await?
            .into_success(SITE_SETTINGS_PATH)?;

        tracing::info!("Saved site settings");
        Ok(())
    }

    pub async fn load_email_settings(&self) -> Result<EmailSettings> {
        let patch: EmailSettingsPatch = self.fetch_patch(EMAIL_SETTINGS_PATH).await?;
        Ok(patch.merge_onto(EmailSettings::default()))
    }

    /// Save email settings. Blank required fields fail before any request is made.
    pub async fn save_email_settings(&self, settings: &EmailSettings) -> Result<()> {
        let missing = settings.missing_required_fields();
        if !missing.is_empty() {
            return Err(AppError::Validation(format!(
                "missing required fields: {}",
                missing.join(", ")
            )));
        }

        let body = serde_json::to_value(settings)?;
        self.api
            .put(EMAIL_SETTINGS_PATH, &body)
            .await?
            .into_success(EMAIL_SETTINGS_PATH)?;

        tracing::info!("Saved email settings (host {})", settings.smtp_host);
        Ok(())
    }

    /// Ask the storefront to send a test email with its stored SMTP settings
    pub async fn send_test_email(&self, to: &str) -> Result<String> {
        let to = to.trim();
        if to.is_empty() || !to.contains('@') {
            return Err(AppError::Validation(format!(
                "invalid recipient address: {:?}",
                to
            )));
        }

        let body = self
            .api
            .post(TEST_EMAIL_PATH, &json!({ "to": to }))
            .await?
            .into_success(TEST_EMAIL_PATH)?;

        let message = body
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("Test email sent")
            .to_string();

        tracing::info!("Test email sent to {}", to);
        Ok(message)
    }

    async fn fetch_patch<P: DeserializeOwned + Default>(&self, path: &str) -> Result<P> {
        let body = self.api.get(path).await?.into_success(path)?;

        match unwrap_envelope(body) {
            Value::Null => {
                tracing::warn!("{} returned no settings, using defaults", path);
                Ok(P::default())
            }
            settings => Ok(serde_json::from_value(settings)?),
        }
    }
}

/// Settings may come back as `{ "data": {...} }` or `{ "settings": {...} }`
fn unwrap_envelope(body: Value) -> Value {
    match body {
        Value::Object(mut map) => {
            for key in ["data", "settings"] {
                if map.get(key).is_some_and(Value::is_object) {
                    if let Some(inner) = map.remove(key) {
                        return inner;
                    }
                }
            }
            Value::Object(map)
        }
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::mock::MockApi;
    use tokio_test::{assert_err, assert_ok};

    fn controller(api: MockApi) -> (Arc<MockApi>, SettingsController) {
        let api = Arc::new(api);
        (api.clone(), SettingsController::new(api))
    }

    #[tokio::test]
    async fn test_load_site_settings_missing_phone_uses_default() {
        let (_, settings) = controller(MockApi::new().on(
            "GET",
            SITE_SETTINGS_PATH,
            200,
            json!({ "email": "care@beautystore.com", "instagram": "https://instagram.com/glow" }),
        ));

        let loaded = settings.load_site_settings().await.unwrap();

        assert_eq!(loaded.phone, SiteSettings::default().phone);
        assert!(!loaded.phone.is_empty());
        assert_eq!(loaded.email, "care@beautystore.com");
        assert_eq!(loaded.instagram, "https://instagram.com/glow");
    }

    #[tokio::test]
    async fn test_load_site_settings_unwraps_data_envelope() {
        let (_, settings) = controller(MockApi::new().on(
            "GET",
            SITE_SETTINGS_PATH,
            200,
            json!({ "success": true, "data": { "phone": "+44 20 7946 0000" } }),
        ));

        let loaded = settings.load_site_settings().await.unwrap();
        assert_eq!(loaded.phone, "+44 20 7946 0000");
    }

    #[tokio::test]
    async fn test_load_site_settings_empty_body_is_all_defaults() {
        let (_, settings) = controller(MockApi::new().on("GET", SITE_SETTINGS_PATH, 200, Value::Null));

        let loaded = settings.load_site_settings().await.unwrap();
        assert_eq!(loaded, SiteSettings::default());
    }

    #[tokio::test]
    async fn test_load_site_settings_server_error() {
        let (_, settings) = controller(MockApi::new().on("GET", SITE_SETTINGS_PATH, 500, Value::Null));

        let result = settings.load_site_settings().await;
        assert!(matches!(result, Err(AppError::Status { status: 500, .. })));
    }

    #[tokio::test]
    async fn test_save_site_settings_sends_full_snapshot() {
        let (api, settings) = controller(MockApi::new().on("PUT", SITE_SETTINGS_PATH, 200, json!({ "success": true })));

        let snapshot = SiteSettings {
            phone: "+1 555 999 0000".to_string(),
            ..SiteSettings::default()
        };
        assert_ok!(settings.save_site_settings(&snapshot).await);

        let sent = api.sent();
        assert_eq!(sent.len(), 1);
        let (method, path, body) = &sent[0];
        assert_eq!(method, "PUT");
        assert_eq!(path, SITE_SETTINGS_PATH);
        let body = body.as_ref().unwrap();
        assert_eq!(body["phone"], "+1 555 999 0000");
        // Untouched fields travel too
        assert_eq!(body["tiktok"], SiteSettings::default().tiktok);
        assert_eq!(body.as_object().unwrap().len(), 8);
    }

    #[tokio::test]
    async fn test_save_site_settings_rejected() {
        let (_, settings) = controller(MockApi::new().on(
            "PUT",
            SITE_SETTINGS_PATH,
            200,
            json!({ "success": false, "message": "Not authorized" }),
        ));

        let result = settings.save_site_settings(&SiteSettings::default()).await;
        assert!(matches!(result, Err(AppError::Rejected(_))));
    }

    #[tokio::test]
    async fn test_load_email_settings_merges_defaults() {
        let (_, settings) = controller(MockApi::new().on(
            "GET",
            EMAIL_SETTINGS_PATH,
            200,
            json!({ "settings": { "smtpUser": "shop@gmail.com", "smtpPort": 465 } }),
        ));

        let loaded = settings.load_email_settings().await.unwrap();
        assert_eq!(loaded.smtp_user, "shop@gmail.com");
        assert_eq!(loaded.smtp_port, 465);
        assert_eq!(loaded.smtp_host, "smtp.gmail.com");
        assert!(loaded.notifications_enabled);
    }

    #[tokio::test]
    async fn test_save_email_settings_validates_before_writing() {
        let (api, settings) = controller(MockApi::new().on("PUT", EMAIL_SETTINGS_PATH, 200, json!({})));

        let result = settings.save_email_settings(&EmailSettings::default()).await;

        match result {
            Err(AppError::Validation(msg)) => {
                assert!(msg.contains("smtpUser"));
                assert!(msg.contains("fromEmail"));
                assert!(!msg.contains("smtpHost"));
            }
            other => panic!("expected validation error, got {:?}", other),
        }
        assert!(api.sent().is_empty());
    }

    #[tokio::test]
    async fn test_save_email_settings_writes_when_complete() {
        let (api, settings) = controller(MockApi::new().on("PUT", EMAIL_SETTINGS_PATH, 200, json!({})));

        let snapshot = EmailSettings {
            smtp_user: "shop@gmail.com".to_string(),
            smtp_password: "app-password".to_string(),
            from_email: "orders@beautystore.com".to_string(),
            ..EmailSettings::default()
        };
        assert_ok!(settings.save_email_settings(&snapshot).await);

        let sent = api.sent();
        assert_eq!(sent[0].2.as_ref().unwrap()["smtpPassword"], "app-password");
    }

    #[tokio::test]
    async fn test_send_test_email() {
        let (api, settings) = controller(MockApi::new().on(
            "POST",
            TEST_EMAIL_PATH,
            200,
            json!({ "success": true, "message": "Email delivered" }),
        ));

        let message = settings.send_test_email(" admin@beautystore.com ").await.unwrap();

        assert_eq!(message, "Email delivered");
        assert_eq!(
            api.sent()[0].2,
            Some(json!({ "to": "admin@beautystore.com" }))
        );
    }

    #[tokio::test]
    async fn test_send_test_email_rejects_bad_address() {
        let (api, settings) = controller(MockApi::new());

        assert_err!(settings.send_test_email("not-an-address").await);
        assert_err!(settings.send_test_email("").await);
        assert!(api.sent().is_empty());
    }

    #[test]
    fn test_unwrap_envelope_leaves_flat_objects() {
        let flat = json!({ "phone": "1", "data": "not an object" });
        assert_eq!(unwrap_envelope(flat.clone()), flat);
    }
}
