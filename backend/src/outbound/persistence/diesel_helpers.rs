//! Shared Diesel plumbing for the PostgreSQL-backed stores.
//!
//! Both stores keep rows in the `messages` table and differ only in how they
//! answer nearby queries, so row creation, lookup by id, ownership-checked
//! delete, and error mapping live here.

use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::debug;
use uuid::Uuid;

use crate::domain::geo::GeoPoint;
use crate::domain::message::{
    MessageContent, MessageId, MessageRecord, MessageRecordDraft, NewMessage,
};
use crate::domain::ports::{DeleteOutcome, MessageStoreError};
use crate::domain::user::{DisplayName, UserId};

use super::models::{MessageRow, NewMessageRow};
use super::pool::{DbPool, PoolError};
use super::schema::messages;

/// Map pool errors to store connection errors.
pub(super) fn map_pool_error(error: PoolError) -> MessageStoreError {
    let message = match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    };
    MessageStoreError::connection(message)
}

/// Map Diesel errors to store errors.
pub(super) fn map_diesel_error(error: diesel::result::Error) -> MessageStoreError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        other => debug!(
            error_type = %std::any::type_name_of_val(other),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            MessageStoreError::connection("database connection error")
        }
        DieselError::NotFound => MessageStoreError::query("record not found"),
        _ => MessageStoreError::query("database error"),
    }
}

/// Convert a database row into a validated domain record.
pub(super) fn row_to_message_record(row: MessageRow) -> Result<MessageRecord, MessageStoreError> {
    let MessageRow {
        id,
        author_id,
        author_display_name,
        content,
        latitude,
        longitude,
        created_at,
    } = row;

    let author_display_name = DisplayName::new(&author_display_name)
        .map_err(|err| MessageStoreError::query(format!("decode author_display_name: {err}")))?;
    let content = MessageContent::new(&content)
        .map_err(|err| MessageStoreError::query(format!("decode content: {err}")))?;
    let location = GeoPoint::new(latitude, longitude)
        .map_err(|err| MessageStoreError::query(format!("decode location: {err}")))?;

    Ok(MessageRecord::new(MessageRecordDraft {
        id: MessageId::from_uuid(id),
        author_id: UserId::from_uuid(author_id),
        author_display_name,
        content,
        location,
        created_at,
    }))
}

/// Insert a new row, assigning a fresh id and creation timestamp.
pub(super) async fn insert_message(
    pool: &DbPool,
    message: NewMessage,
) -> Result<MessageRecord, MessageStoreError> {
    let mut conn = pool.get().await.map_err(map_pool_error)?;

    let id = MessageId::random();
    // Timestamptz keeps microseconds; truncate so the returned record
    // compares equal to later reads of the same row.
    let now = chrono::Utc::now();
    let created_at =
        now - chrono::Duration::nanoseconds(i64::from(now.timestamp_subsec_nanos() % 1_000));
    let row = NewMessageRow {
        id: *id.as_uuid(),
        author_id: *message.author_id.as_uuid(),
        author_display_name: message.author_display_name.as_str(),
        content: message.content.as_str(),
        latitude: message.location.latitude(),
        longitude: message.location.longitude(),
        created_at,
    };

    diesel::insert_into(messages::table)
        .values(&row)
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;

    Ok(MessageRecord::new(MessageRecordDraft {
        id,
        author_id: message.author_id,
        author_display_name: message.author_display_name,
        content: message.content,
        location: message.location,
        created_at,
    }))
}

/// Fetch a row by id.
pub(super) async fn find_message(
    pool: &DbPool,
    id: &MessageId,
) -> Result<Option<MessageRecord>, MessageStoreError> {
    let mut conn = pool.get().await.map_err(map_pool_error)?;

    let row = messages::table
        .filter(messages::id.eq(id.as_uuid()))
        .select(MessageRow::as_select())
        .first::<MessageRow>(&mut conn)
        .await
        .optional()
        .map_err(map_diesel_error)?;

    row.map(row_to_message_record).transpose()
}

/// Delete a row if `requester` owns it.
pub(super) async fn delete_message(
    pool: &DbPool,
    id: &MessageId,
    requester: &UserId,
) -> Result<DeleteOutcome, MessageStoreError> {
    let mut conn = pool.get().await.map_err(map_pool_error)?;

    // Conditional delete: the ownership check and the removal are one
    // statement, so a concurrent delete cannot slip between them.
    let deleted = diesel::delete(
        messages::table
            .filter(messages::id.eq(id.as_uuid()))
            .filter(messages::author_id.eq(requester.as_uuid())),
    )
    .execute(&mut conn)
    .await
    .map_err(map_diesel_error)?;

    if deleted > 0 {
        return Ok(DeleteOutcome::Deleted);
    }

    // Nothing matched both conditions; probe for the record to tell a
    // missing message apart from someone else's.
    let exists = messages::table
        .filter(messages::id.eq(id.as_uuid()))
        .select(messages::id)
        .first::<Uuid>(&mut conn)
        .await
        .optional()
        .map_err(map_diesel_error)?;

    Ok(if exists.is_some() {
        DeleteOutcome::NotOwner
    } else {
        DeleteOutcome::NotFound
    })
}

#[cfg(test)]
mod tests {
    //! Error mapping and row conversion coverage; queries against a live
    //! database run in the integration tests.

    use chrono::Utc;
    use rstest::{fixture, rstest};

    use super::*;

    #[fixture]
    fn valid_row() -> MessageRow {
        MessageRow {
            id: Uuid::new_v4(),
            author_id: Uuid::new_v4(),
            author_display_name: "Ada".to_owned(),
            content: "hello out there".to_owned(),
            latitude: 52.52,
            longitude: 13.405,
            created_at: Utc::now(),
        }
    }

    #[rstest]
    fn pool_error_maps_to_connection_error() {
        let store_err = map_pool_error(PoolError::checkout("connection refused"));

        assert!(matches!(store_err, MessageStoreError::Connection { .. }));
        assert!(store_err.to_string().contains("connection refused"));
    }

    #[rstest]
    fn diesel_not_found_maps_to_query_error() {
        let store_err = map_diesel_error(diesel::result::Error::NotFound);

        assert!(matches!(store_err, MessageStoreError::Query { .. }));
        assert!(store_err.to_string().contains("record not found"));
    }

    #[rstest]
    fn row_conversion_round_trips_a_valid_row(valid_row: MessageRow) {
        let expected_id = valid_row.id;
        let record = row_to_message_record(valid_row).expect("valid row converts");

        assert_eq!(record.id().as_uuid(), &expected_id);
        assert_eq!(record.content().as_str(), "hello out there");
        assert_eq!(record.location().latitude(), 52.52);
    }

    #[rstest]
    fn row_conversion_rejects_out_of_range_coordinates(mut valid_row: MessageRow) {
        valid_row.latitude = 95.0;

        let error = row_to_message_record(valid_row).expect_err("invalid latitude fails");
        assert!(matches!(error, MessageStoreError::Query { .. }));
        assert!(error.to_string().contains("decode location"));
    }

    #[rstest]
    fn row_conversion_rejects_over_long_content(mut valid_row: MessageRow) {
        valid_row.content = "x".repeat(501);

        let error = row_to_message_record(valid_row).expect_err("oversized content fails");
        assert!(matches!(error, MessageStoreError::Query { .. }));
        assert!(error.to_string().contains("decode content"));
    }
}
