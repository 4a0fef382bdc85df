use anyhow::{Result, bail};
use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use tokio::sync::RwLock;

use crate::db::store::QrStore;
use crate::models::qr_code::{QrCodeRecord, QrCodeUpdate};
use crate::models::scan::ScanRecord;

/// Store backed by plain vectors, for tests.
#[derive(Default)]
pub struct MemoryStore {
    qr_codes: RwLock<Vec<QrCodeRecord>>,
    scans: RwLock<Vec<ScanRecord>>,
    fail_lookups: bool,
    fail_scans: bool,
}

impl MemoryStore {
    /// Every public lookup errors.
    pub fn failing_lookups() -> Self {
        Self {
            fail_lookups: true,
            ..Default::default()
        }
    }

    /// Every scan insert errors.
    pub fn failing_scans() -> Self {
        Self {
            fail_scans: true,
            ..Default::default()
        }
    }

    pub async fn scans(&self) -> Vec<ScanRecord> {
        self.scans.read().await.clone()
    }

    pub async fn get(&self, id: &ObjectId) -> Option<QrCodeRecord> {
        self.qr_codes
            .read()
            .await
            .iter()
            .find(|record| record.id.as_ref() == Some(id))
            .cloned()
    }
}

fn owned_by(record: &QrCodeRecord, user_id: &str, id: &ObjectId) -> bool {
    record.user_id == user_id && record.id.as_ref() == Some(id)
}

#[async_trait]
impl QrStore for MemoryStore {
    async fn find_active_by_short_id(&self, short_id: &str) -> Result<Option<QrCodeRecord>> {
        if self.fail_lookups {
            bail!("lookup unavailable");
        }
        Ok(self
            .qr_codes
            .read()
            .await
            .iter()
            .find(|record| record.short_id == short_id && record.is_active)
            .cloned())
    }

    async fn list_for_user(&self, user_id: &str) -> Result<Vec<QrCodeRecord>> {
        let mut records: Vec<_> = self
            .qr_codes
            .read()
            .await
            .iter()
            .filter(|record| record.user_id == user_id)
            .cloned()
            .collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(records)
    }

    async fn find_for_user(&self, user_id: &str, id: &ObjectId) -> Result<Option<QrCodeRecord>> {
        Ok(self
            .qr_codes
            .read()
            .await
            .iter()
            .find(|record| owned_by(record, user_id, id))
            .cloned())
    }

    async fn insert(&self, mut record: QrCodeRecord) -> Result<QrCodeRecord> {
        let mut qr_codes = self.qr_codes.write().await;
        if qr_codes.iter().any(|existing| existing.short_id == record.short_id) {
            bail!("duplicate short_id {}", record.short_id);
        }
        record.id = Some(ObjectId::new());
        qr_codes.push(record.clone());
        Ok(record)
    }

    async fn update_for_user(
        &self,
        user_id: &str,
        id: &ObjectId,
        update: &QrCodeUpdate,
    ) -> Result<Option<QrCodeRecord>> {
        let mut qr_codes = self.qr_codes.write().await;
        Ok(qr_codes
            .iter_mut()
            .find(|record| owned_by(record, user_id, id))
            .map(|record| {
                update.apply(record);
                record.clone()
            }))
    }

    async fn delete_for_user(&self, user_id: &str, id: &ObjectId) -> Result<bool> {
        let mut qr_codes = self.qr_codes.write().await;
        let before = qr_codes.len();
        qr_codes.retain(|record| !owned_by(record, user_id, id));
        Ok(qr_codes.len() < before)
    }

    async fn record_scan(&self, scan: ScanRecord) -> Result<()> {
        if self.fail_scans {
            bail!("scan insert rejected");
        }
        let mut scans = self.scans.write().await;
        let seen = scans
            .iter()
            .any(|s| s.qr_code_id == scan.qr_code_id && s.ip_hash == scan.ip_hash);

        let mut qr_codes = self.qr_codes.write().await;
        if let Some(record) = qr_codes
            .iter_mut()
            .find(|record| record.id == Some(scan.qr_code_id))
        {
            record.total_scans += 1;
            if !seen {
                record.unique_scans += 1;
            }
            record.last_scan_at = Some(scan.scanned_at);
        }
        scans.push(scan);
        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::customization::Customization;
    use crate::payload::QrKind;
    use futures_util::future::join;

    #[actix_web::test]
    async fn concurrent_first_scans_count_one_unique_visitor() {
        let store = MemoryStore::default();
        let record = QrCodeRecord::new(
            "user-1".into(),
            QrKind::Url,
            "example.com".into(),
            Customization::default(),
            None,
            None,
        );
        let id = store.insert(record).await.unwrap().id.unwrap();

        let scan = || ScanRecord::new(id, "same-visitor".into(), None, None);
        let (first, second) = join(store.record_scan(scan()), store.record_scan(scan())).await;
        first.unwrap();
        second.unwrap();

        let record = store.get(&id).await.unwrap();
        assert_eq!(record.total_scans, 2);
        assert_eq!(record.unique_scans, 1);
    }
}
