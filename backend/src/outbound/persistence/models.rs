//! Diesel row structs for the `messages` table.
//!
//! Internal to the persistence layer; the adapter converts rows through the
//! validated domain constructors before anything leaves this module.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::messages;

/// Row struct for reading from the messages table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = messages)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct MessageRow {
    pub id: Uuid,
    pub author_id: Uuid,
    pub author_display_name: String,
    pub content: String,
    pub latitude: f64,
    pub longitude: f64,
    pub created_at: DateTime<Utc>,
}

/// Insertable struct for creating message records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = messages)]
pub(crate) struct NewMessageRow<'a> {
    pub id: Uuid,
    pub author_id: Uuid,
    pub author_display_name: &'a str,
    pub content: &'a str,
    pub latitude: f64,
    pub longitude: f64,
    pub created_at: DateTime<Utc>,
}
