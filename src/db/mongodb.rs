use anyhow::{Context, Result};
use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::bson::{Document, doc, oid::ObjectId, to_bson};
use mongodb::error::{Error as MongoError, ErrorKind, WriteFailure};
use mongodb::options::{IndexOptions, ReturnDocument};
use mongodb::{Client, Collection, Database, IndexModel};

use crate::db::store::QrStore;
use crate::models::qr_code::{QrCodeRecord, QrCodeUpdate};
use crate::models::scan::ScanRecord;

pub struct MongoStore {
    db: Database,
    qr_codes: Collection<QrCodeRecord>,
    scans: Collection<ScanRecord>,
    // One document per (qr_code_id, ip_hash); its creation marks a unique scan
    visitors: Collection<Document>,
}

/// Connect, check the server answers, and make sure the indexes exist.
pub async fn get_database(uri: &str, database_name: &str) -> Result<MongoStore> {
    let client = Client::with_uri_str(uri)
        .await
        .context("Failed to create MongoDB client")?;
    let db = client.database(database_name);
    db.run_command(doc! { "ping": 1 })
        .await
        .context("MongoDB did not answer ping")?;

    let store = MongoStore {
        qr_codes: db.collection("qr_codes"),
        scans: db.collection("scans"),
        visitors: db.collection("visitors"),
        db,
    };
    store.ensure_indexes().await?;
    log::info!("Connected to MongoDB database {}", database_name);
    Ok(store)
}

impl MongoStore {
    async fn ensure_indexes(&self) -> Result<()> {
        let short_id = IndexModel::builder()
            .keys(doc! { "short_id": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        self.qr_codes
            .create_index(short_id)
            .await
            .context("Failed to create short_id index")?;

        let owner = IndexModel::builder()
            .keys(doc! { "user_id": 1, "created_at": -1 })
            .build();
        self.qr_codes
            .create_index(owner)
            .await
            .context("Failed to create user_id index")?;

        let scan_owner = IndexModel::builder()
            .keys(doc! { "qr_code_id": 1, "scanned_at": -1 })
            .build();
        self.scans
            .create_index(scan_owner)
            .await
            .context("Failed to create scans index")?;

        let visitor = IndexModel::builder()
            .keys(doc! { "qr_code_id": 1, "ip_hash": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        self.visitors
            .create_index(visitor)
            .await
            .context("Failed to create visitors index")?;
        Ok(())
    }

    /// `true` the first time this ip hash scans this code.
    async fn first_visit(&self, scan: &ScanRecord) -> Result<bool> {
        let result = self
            .visitors
            .update_one(
                doc! { "qr_code_id": scan.qr_code_id, "ip_hash": &scan.ip_hash },
                doc! { "$setOnInsert": { "first_scan_at": scan.scanned_at } },
            )
            .upsert(true)
            .await;

        match result {
            Ok(result) => Ok(result.upserted_id.is_some()),
            // A concurrent scan from the same visitor won the insert
            Err(e) if is_duplicate_key(&e) => Ok(false),
            Err(e) => Err(e).context("Failed to record visitor"),
        }
    }
}

fn is_duplicate_key(error: &MongoError) -> bool {
    matches!(
        error.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(write_error)) if write_error.code == 11000
    )
}

fn update_document(update: &QrCodeUpdate) -> Result<Document> {
    let mut set = doc! { "updated_at": chrono::Utc::now().timestamp_millis() };
    if let Some(name) = &update.name {
        set.insert("name", name);
    }
    if let Some(destination_url) = &update.destination_url {
        set.insert("destination_url", destination_url);
    }
    if let Some(customization) = &update.customization {
        set.insert(
            "customization",
            to_bson(customization).context("Failed to serialize customization")?,
        );
    }
    if let Some(is_active) = update.is_active {
        set.insert("is_active", is_active);
    }
    Ok(doc! { "$set": set })
}

#[async_trait]
impl QrStore for MongoStore {
    async fn find_active_by_short_id(&self, short_id: &str) -> Result<Option<QrCodeRecord>> {
        self.qr_codes
            .find_one(doc! { "short_id": short_id, "is_active": true })
            .await
            .context("Database error")
    }

    async fn list_for_user(&self, user_id: &str) -> Result<Vec<QrCodeRecord>> {
        self.qr_codes
            .find(doc! { "user_id": user_id })
            .sort(doc! { "created_at": -1 })
            .await
            .context("Database error")?
            .try_collect()
            .await
            .context("Database error")
    }

    async fn find_for_user(&self, user_id: &str, id: &ObjectId) -> Result<Option<QrCodeRecord>> {
        self.qr_codes
            .find_one(doc! { "_id": *id, "user_id": user_id })
            .await
            .context("Database error")
    }

    async fn insert(&self, mut record: QrCodeRecord) -> Result<QrCodeRecord> {
        let result = self
            .qr_codes
            .insert_one(&record)
            .await
            .context("Failed to save QR code")?;
        record.id = result.inserted_id.as_object_id();
        Ok(record)
    }

    async fn update_for_user(
        &self,
        user_id: &str,
        id: &ObjectId,
        update: &QrCodeUpdate,
    ) -> Result<Option<QrCodeRecord>> {
        self.qr_codes
            .find_one_and_update(doc! { "_id": *id, "user_id": user_id }, update_document(update)?)
            .return_document(ReturnDocument::After)
            .await
            .context("Failed to update QR code")
    }

    async fn delete_for_user(&self, user_id: &str, id: &ObjectId) -> Result<bool> {
        let result = self
            .qr_codes
            .delete_one(doc! { "_id": *id, "user_id": user_id })
            .await
            .context("Failed to delete QR code")?;
        Ok(result.deleted_count > 0)
    }

    async fn record_scan(&self, scan: ScanRecord) -> Result<()> {
        let unique: i64 = if self.first_visit(&scan).await? { 1 } else { 0 };

        self.scans
            .insert_one(&scan)
            .await
            .context("Failed to insert scan")?;

        self.qr_codes
            .update_one(
                doc! { "_id": scan.qr_code_id },
                doc! {
                    "$inc": { "total_scans": 1_i64, "unique_scans": unique },
                    "$set": { "last_scan_at": scan.scanned_at },
                },
            )
            .await
            .context("Failed to update scan counters")?;
        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        self.db
            .run_command(doc! { "ping": 1 })
            .await
            .context("Database connection failed")?;
        Ok(())
    }
}
