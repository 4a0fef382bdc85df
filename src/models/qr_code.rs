use mongodb::bson::oid::ObjectId;
use nanoid::nanoid;
use serde::{Deserialize, Serialize};

use crate::models::customization::Customization;
use crate::payload::QrKind;

pub const SHORT_ID_LEN: usize = 8;

fn default_true() -> bool {
    true
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct QrCodeRecord {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub short_id: String, // Token embedded in the redirect link
    pub user_id: String,  // Owner, as issued by the identity provider
    pub kind: QrKind,
    pub content: String, // Encoded payload at save time
    pub destination_url: Option<String>,
    #[serde(default)]
    pub customization: Customization,
    pub name: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default = "default_true")]
    pub is_dynamic: bool,
    #[serde(default)]
    pub total_scans: i64,
    #[serde(default)]
    pub unique_scans: i64,
    pub last_scan_at: Option<i64>,
    pub created_at: i64, // Timestamps in milliseconds
    pub updated_at: i64,
}

impl QrCodeRecord {
    pub fn new(
        user_id: String,
        kind: QrKind,
        content: String,
        customization: Customization,
        name: Option<String>,
        destination_url: Option<String>,
    ) -> Self {
        let now = chrono::Utc::now().timestamp_millis();
        let destination_url = destination_url
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| content.clone());

        Self {
            id: None,
            short_id: nanoid!(SHORT_ID_LEN),
            user_id,
            kind,
            content,
            destination_url: Some(destination_url),
            customization,
            name: name.filter(|name| !name.trim().is_empty()),
            is_active: true,
            is_dynamic: true,
            total_scans: 0,
            unique_scans: 0,
            last_scan_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Where a scan should land: the destination URL, else the raw content.
    pub fn destination(&self) -> Option<&str> {
        self.destination_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .or_else(|| Some(self.content.as_str()).filter(|c| !c.trim().is_empty()))
    }

    /// Text to put in the printed code. Dynamic codes point at the redirect route.
    pub fn encoded_target(&self, public_base_url: &str) -> String {
        if self.is_dynamic {
            format!(
                "{}/r/{}",
                public_base_url.trim_end_matches('/'),
                self.short_id
            )
        } else {
            self.content.clone()
        }
    }
}

/// Partial update of a saved code; `None` leaves the field untouched.
#[derive(Debug, Clone, Default)]
pub struct QrCodeUpdate {
    pub name: Option<String>,
    pub destination_url: Option<String>,
    pub customization: Option<Customization>,
    pub is_active: Option<bool>,
}

impl QrCodeUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.destination_url.is_none()
            && self.customization.is_none()
            && self.is_active.is_none()
    }

    pub fn apply(&self, record: &mut QrCodeRecord) {
        if let Some(name) = &self.name {
            record.name = Some(name.clone());
        }
        if let Some(destination_url) = &self.destination_url {
            record.destination_url = Some(destination_url.clone());
        }
        if let Some(customization) = &self.customization {
            record.customization = customization.clone();
        }
        if let Some(is_active) = self.is_active {
            record.is_active = is_active;
        }
        record.updated_at = chrono::Utc::now().timestamp_millis();
    }
}
