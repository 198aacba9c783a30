//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the database migrations exactly; Diesel uses
//! them for compile-time query validation and type-safe SQL generation. When
//! a migration changes the schema, regenerate this file with
//! `diesel print-schema` or update it by hand.

diesel::table! {
    /// Location-tagged messages.
    ///
    /// Nearby queries prefilter on the composite `(latitude, longitude)`
    /// index before the exact distance check runs in the adapter.
    messages (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Author's user identifier.
        author_id -> Uuid,
        /// Author display name captured at post time.
        author_display_name -> Text,
        /// Message body, trimmed, at most 500 characters.
        content -> Text,
        /// Latitude in decimal degrees, [-90, 90].
        latitude -> Float8,
        /// Longitude in decimal degrees, [-180, 180].
        longitude -> Float8,
        /// Record creation timestamp.
        created_at -> Timestamptz,
    }
}
