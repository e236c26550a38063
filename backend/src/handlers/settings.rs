//! Application settings handler
//!
//! Settings are assembled from configuration; nothing here is persisted.

use axum::{extract::State, Json};
use serde::Serialize;
use uuid::Uuid;

use crate::AppState;

/// Application settings document
#[derive(Serialize)]
pub struct AppSettings {
    pub app_name: String,
    pub version: String,
    pub features: FeatureFlags,
    pub preferences: Preferences,
    pub notifications: NotificationDefaults,
}

/// Capabilities of this build
#[derive(Serialize)]
pub struct FeatureFlags {
    pub barcode_scanning: bool,
    pub low_stock_alerts: bool,
    pub multi_location: bool,
    pub reports: bool,
}

#[derive(Serialize)]
pub struct Preferences {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_location_id: Option<Uuid>,
    pub currency: String,
    pub timezone: String,
    pub date_format: String,
}

#[derive(Serialize)]
pub struct NotificationDefaults {
    pub email_alerts: bool,
    pub push_notifications: bool,
    pub low_stock_threshold: i64,
}

/// Get the application settings
pub async fn get_settings(State(state): State<AppState>) -> Json<AppSettings> {
    let config = &state.config;

    Json(AppSettings {
        app_name: "StockMaster Pro".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        features: FeatureFlags {
            barcode_scanning: true,
            low_stock_alerts: true,
            multi_location: true,
            reports: true,
        },
        preferences: Preferences {
            default_location_id: config.app.default_location_id,
            currency: config.app.currency.clone(),
            timezone: config.app.timezone.clone(),
            date_format: config.app.date_format.clone(),
        },
        notifications: NotificationDefaults {
            email_alerts: config.notifications.email_alerts,
            push_notifications: config.notifications.push_notifications,
            low_stock_threshold: config.notifications.low_stock_threshold,
        },
    })
}
