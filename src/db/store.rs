use anyhow::Result;
use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;

use crate::models::qr_code::{QrCodeRecord, QrCodeUpdate};
use crate::models::scan::ScanRecord;

/// Persistence for saved codes and their scans.
///
/// Everything keyed by a user only ever sees that user's rows. The one
/// exception is [`QrStore::find_active_by_short_id`], the public lookup the
/// redirect route relies on.
#[async_trait]
pub trait QrStore: Send + Sync + 'static {
    /// Active code with this short id, regardless of owner.
    async fn find_active_by_short_id(&self, short_id: &str) -> Result<Option<QrCodeRecord>>;

    /// Newest first.
    async fn list_for_user(&self, user_id: &str) -> Result<Vec<QrCodeRecord>>;

    async fn find_for_user(&self, user_id: &str, id: &ObjectId) -> Result<Option<QrCodeRecord>>;

    /// Returns the record with its assigned id.
    async fn insert(&self, record: QrCodeRecord) -> Result<QrCodeRecord>;

    async fn update_for_user(
        &self,
        user_id: &str,
        id: &ObjectId,
        update: &QrCodeUpdate,
    ) -> Result<Option<QrCodeRecord>>;

    /// `true` when something was deleted.
    async fn delete_for_user(&self, user_id: &str, id: &ObjectId) -> Result<bool>;

    /// Store the scan and bump the code's counters. A scan counts as unique
    /// when its ip hash has not been seen for that code before; concurrent
    /// scans from one ip hash still count once.
    async fn record_scan(&self, scan: ScanRecord) -> Result<()>;

    async fn ping(&self) -> Result<()>;
}
