//! Push notifications
//!
//! Turns push payloads into notifications and notification clicks into
//! window-open commands. Independent of the caching logic.

use axum::body::Bytes;
use serde::{Deserialize, Serialize};
use tracing::debug;

const DEFAULT_TITLE: &str = "Job Board";
const DEFAULT_BODY: &str = "You have a new notification";
const DEFAULT_ICON: &str = "/icons/icon-192x192.png";
const DEFAULT_BADGE: &str = "/icons/badge-72x72.png";

/// Optional fields a push message may carry.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PushPayload {
    pub title: Option<String>,
    pub body: Option<String>,
    pub icon: Option<String>,
    pub url: Option<String>,
    pub tag: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationAction {
    pub action: String,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationData {
    pub url: String,
}

/// Notification to show to the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub title: String,
    pub body: String,
    pub icon: String,
    pub badge: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    pub data: NotificationData,
    pub actions: Vec<NotificationAction>,
}

/// A click on a shown notification.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NotificationClick {
    /// Action button pressed; `None` for a click on the body
    #[serde(default)]
    pub action: Option<String>,
    /// Target URL carried in the notification data
    #[serde(default)]
    pub url: Option<String>,
}

impl PushPayload {
    /// Reads a push body: JSON object, else plain text used as the body,
    /// else defaults.
    pub fn parse(data: Option<&Bytes>) -> Self {
        let Some(data) = data.filter(|d| !d.is_empty()) else {
            return Self::default();
        };

        match serde_json::from_slice::<PushPayload>(data) {
            Ok(payload) => payload,
            Err(_) => {
                debug!("push payload is not JSON, using it as text");
                Self {
                    body: Some(String::from_utf8_lossy(data).into_owned()),
                    ..Self::default()
                }
            }
        }
    }
}

impl Notification {
    pub fn from_payload(payload: PushPayload) -> Self {
        Self {
            title: payload.title.unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            body: payload.body.unwrap_or_else(|| DEFAULT_BODY.to_string()),
            icon: payload.icon.unwrap_or_else(|| DEFAULT_ICON.to_string()),
            badge: DEFAULT_BADGE.to_string(),
            tag: payload.tag,
            data: NotificationData {
                url: payload.url.unwrap_or_else(|| "/".to_string()),
            },
            actions: vec![
                NotificationAction {
                    action: "view".to_string(),
                    title: "View".to_string(),
                },
                NotificationAction {
                    action: "dismiss".to_string(),
                    title: "Dismiss".to_string(),
                },
            ],
        }
    }
}

/// URL to open for a click, or `None` when the click only dismisses.
pub fn click_target(click: &NotificationClick) -> Option<String> {
    match click.action.as_deref() {
        Some("dismiss") => None,
        _ => Some(click.url.clone().unwrap_or_else(|| "/".to_string())),
    }
}
