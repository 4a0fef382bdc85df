use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::customization::Customization;
use crate::models::qr_code::QrCodeRecord;
use crate::payload::{QrKind, QrRequest};
use crate::render::{ExportFormat, ExportVariant};

#[derive(Serialize)]
pub struct PreviewResponse {
    pub kind: QrKind,
    pub ready: bool,
    pub payload: Option<String>,
}

#[derive(Deserialize, Validate)]
pub struct GenerateImageRequest {
    pub request: QrRequest,
    #[serde(default)]
    #[validate(nested)]
    pub customization: Customization,
}

#[derive(Deserialize, Default)]
pub struct ImageParams {
    pub format: Option<ExportFormat>,
    pub variant: Option<ExportVariant>,
    pub size: Option<u32>,
}

#[derive(Deserialize, Validate)]
pub struct CreateQrRequest {
    pub kind: QrKind,
    #[validate(length(min = 1, message = "Content must not be empty"))]
    pub content: String,
    #[serde(default)]
    #[validate(nested)]
    pub customization: Customization,
    pub name: Option<String>,
    pub destination_url: Option<String>,
    /// Saved codes redirect through `/r/<short_id>` unless this is `false`.
    pub is_dynamic: Option<bool>,
}

#[derive(Deserialize, Validate)]
pub struct UpdateQrRequest {
    pub name: Option<String>,
    pub destination_url: Option<String>,
    #[validate(nested)]
    pub customization: Option<Customization>,
    pub is_active: Option<bool>,
}

#[derive(Serialize)]
pub struct QrCodeResponse {
    pub id: String,
    pub short_id: String,
    pub kind: QrKind,
    pub content: String,
    pub destination_url: Option<String>,
    pub customization: Customization,
    pub name: Option<String>,
    pub is_active: bool,
    pub is_dynamic: bool,
    pub total_scans: i64,
    pub unique_scans: i64,
    pub last_scan_at: Option<i64>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<QrCodeRecord> for QrCodeResponse {
    fn from(record: QrCodeRecord) -> Self {
        Self {
            id: record.id.map(|id| id.to_hex()).unwrap_or_default(),
            short_id: record.short_id,
            kind: record.kind,
            content: record.content,
            destination_url: record.destination_url,
            customization: record.customization,
            name: record.name,
            is_active: record.is_active,
            is_dynamic: record.is_dynamic,
            total_scans: record.total_scans,
            unique_scans: record.unique_scans,
            last_scan_at: record.last_scan_at,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}
