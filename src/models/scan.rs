use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::tracking::user_agent::{Browser, ClientFingerprint, DeviceType, Os};

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ScanRecord {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<ObjectId>,
    pub qr_code_id: ObjectId,       // Code that was scanned
    pub ip_hash: String,            // Salted hash of the client address
    pub device_type: DeviceType,
    pub os: Os,
    pub browser: Browser,
    pub user_agent: Option<String>,
    pub referrer: Option<String>,
    pub scanned_at: i64,            // Milliseconds
}

impl ScanRecord {
    pub fn new(
        qr_code_id: ObjectId,
        ip_hash: String,
        user_agent: Option<String>,
        referrer: Option<String>,
    ) -> Self {
        let fingerprint = ClientFingerprint::from_user_agent(user_agent.as_deref().unwrap_or(""));

        Self {
            id: None,
            qr_code_id,
            ip_hash,
            device_type: fingerprint.device_type,
            os: fingerprint.os,
            browser: fingerprint.browser,
            user_agent,
            referrer,
            scanned_at: chrono::Utc::now().timestamp_millis(),
        }
    }
}
