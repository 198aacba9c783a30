//! Scan-backed `MessageStore` over PostgreSQL.
//!
//! Durable counterpart of the in-memory scan store: rows live in the same
//! `messages` table as the indexed store and survive restarts, but nearby
//! queries use no spatial prefilter at all. Every row inside the retention
//! window is loaded and run through the exact haversine filter, so query
//! cost is O(rows-in-window). Writes purge rows past the window, keeping
//! the scanned set bounded. `find_by_id` may still see an aged-out row that
//! no write has purged yet; `query_nearby` never returns one.

use async_trait::async_trait;
use chrono::Duration;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;

use crate::domain::message::{MessageId, MessageRecord, NewMessage};
use crate::domain::ports::{DeleteOutcome, MessageStore, MessageStoreError, NearbyQuery};
use crate::domain::user::UserId;

use super::diesel_helpers::{
    delete_message, find_message, insert_message, map_diesel_error, map_pool_error,
    row_to_message_record,
};
use super::models::MessageRow;
use super::pool::DbPool;
use super::schema::messages;

/// Scan-style implementation of the message store port on PostgreSQL.
#[derive(Clone)]
pub struct DieselScanStore {
    pool: DbPool,
    retention: Duration,
}

impl DieselScanStore {
    /// Create a store with the default 24 hour retention window.
    pub fn new(pool: DbPool) -> Self {
        Self::with_retention(pool, Duration::hours(24))
    }

    /// Create a store with an explicit retention window.
    pub fn with_retention(pool: DbPool, retention: Duration) -> Self {
        Self { pool, retention }
    }

    /// Retention window applied to scans and purges.
    pub fn retention(&self) -> Duration {
        self.retention
    }
}

#[async_trait]
impl MessageStore for DieselScanStore {
    async fn create(&self, message: NewMessage) -> Result<MessageRecord, MessageStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let horizon = chrono::Utc::now() - self.retention;
        let purged = diesel::delete(messages::table.filter(messages::created_at.lt(horizon)))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        if purged > 0 {
            debug!(purged, "purged rows past the retention window");
        }
        drop(conn);

        insert_message(&self.pool, message).await
    }

    async fn find_by_id(
        &self,
        id: &MessageId,
    ) -> Result<Option<MessageRecord>, MessageStoreError> {
        find_message(&self.pool, id).await
    }

    async fn delete(
        &self,
        id: &MessageId,
        requester: &UserId,
    ) -> Result<DeleteOutcome, MessageStoreError> {
        delete_message(&self.pool, id, requester).await
    }

    async fn query_nearby(
        &self,
        query: NearbyQuery,
    ) -> Result<Vec<MessageRecord>, MessageStoreError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        // Never hand out rows past retention even when the caller's age
        // window is wider; they are scheduled for the next purge.
        let window = query.max_age.min(self.retention);
        let cutoff = chrono::Utc::now() - window;

        let rows: Vec<MessageRow> = messages::table
            .select(MessageRow::as_select())
            .filter(messages::created_at.ge(cutoff))
            .order((messages::created_at.desc(), messages::id.desc()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        // Rows arrive newest first; the exact distance filter preserves that
        // order while deciding membership.
        let mut matches = Vec::with_capacity(rows.len());
        for row in rows {
            let record = row_to_message_record(row)?;
            if record.location().distance_meters(&query.center) <= query.radius_meters {
                matches.push(record);
            }
        }
        Ok(matches)
    }
}
