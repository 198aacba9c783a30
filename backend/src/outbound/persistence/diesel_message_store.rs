//! Index-backed `MessageStore` over PostgreSQL using Diesel ORM.
//!
//! Nearby queries run in two stages: a bounding-box prefilter over the
//! composite `(latitude, longitude)` index narrows the candidate set in SQL,
//! then the exact haversine distance check runs in Rust over the candidates.
//! The prefilter only ever widens the set, so the distance check decides the
//! final result.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::geo::{LongitudeSpan, proximity_bounds};
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

/// Diesel-backed implementation of the message store port.
#[derive(Clone)]
pub struct DieselMessageStore {
    pool: DbPool,
}

impl DieselMessageStore {
    /// Create a new store with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MessageStore for DieselMessageStore {
    async fn create(&self, message: NewMessage) -> Result<MessageRecord, MessageStoreError> {
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

        let bounds = proximity_bounds(&query.center, query.radius_meters);
        let cutoff = chrono::Utc::now() - query.max_age;

        let mut candidates = messages::table
            .select(MessageRow::as_select())
            .into_boxed();
        candidates = candidates
            .filter(messages::created_at.ge(cutoff))
            .filter(messages::latitude.between(bounds.min_latitude(), bounds.max_latitude()));
        if let LongitudeSpan::Range { min, max } = bounds.longitude() {
            candidates = candidates.filter(messages::longitude.between(min, max));
        }

        let rows: Vec<MessageRow> = candidates
            .order((messages::created_at.desc(), messages::id.desc()))
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        // Rows arrive newest first; the exact distance filter preserves that
        // order while discarding bounding-box false positives.
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
