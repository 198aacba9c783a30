//! Shared helpers and the store contract suite.
//!
//! Each integration test binary compiles its own copy of this module, so not
//! every helper is used by every binary.
#![allow(dead_code)]

use chrono::Duration;
use geonote::domain::ports::{DeleteOutcome, MessageStore, NearbyQuery};
use geonote::domain::{DisplayName, GeoPoint, MessageContent, NewMessage, UserId};

/// Default query center used by the scenarios (Berlin, Alexanderplatz).
pub const CENTER: (f64, f64) = (52.52, 13.405);

/// Roughly 50 m north of [`CENTER`]; one degree of latitude is ~111.32 km.
pub const NEAR: (f64, f64) = (52.520_45, 13.405);

/// Roughly 500 m north of [`CENTER`].
pub const FAR: (f64, f64) = (52.524_5, 13.405);

/// Build a validated message for the given author and position.
pub fn new_message(content: &str, position: (f64, f64), author: UserId) -> NewMessage {
    NewMessage {
        content: MessageContent::new(content).expect("valid content"),
        location: GeoPoint::new(position.0, position.1).expect("valid point"),
        author_id: author,
        author_display_name: DisplayName::new("Contract Tester").expect("valid name"),
    }
}

/// A 100 m query around the given position with a 24 h age window.
pub fn nearby(position: (f64, f64)) -> NearbyQuery {
    NearbyQuery {
        center: GeoPoint::new(position.0, position.1).expect("valid point"),
        radius_meters: 100.0,
        max_age: Duration::hours(24),
    }
}

/// Behavioral contract every `MessageStore` backend must satisfy.
///
/// The harness for each backend calls these against a fresh store. Ordering
/// scenarios insert with a short pause so creation timestamps differ.
pub mod contract {
    use super::*;

    async fn settle() {
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }

    /// A created record comes back from a query centered on it.
    pub async fn create_then_nearby_finds_it<S: MessageStore>(store: &S) {
        let author = UserId::random();
        let created = store
            .create(new_message("right here", CENTER, author))
            .await
            .expect("create succeeds");

        let found = store
            .query_nearby(nearby(CENTER))
            .await
            .expect("query succeeds");
        assert_eq!(found, vec![created]);
    }

    /// Records outside the radius never appear, even when the bounding-box
    /// prefilter would admit them.
    pub async fn nearby_excludes_records_outside_the_radius<S: MessageStore>(store: &S) {
        let author = UserId::random();
        store
            .create(new_message("too far away", FAR, author))
            .await
            .expect("create succeeds");

        let found = store
            .query_nearby(nearby(CENTER))
            .await
            .expect("query succeeds");
        assert!(found.is_empty(), "expected no matches, got {found:?}");
    }

    /// Two records in range and one out: only the near pair comes back,
    /// newest first.
    pub async fn nearby_returns_near_records_newest_first<S: MessageStore>(store: &S) {
        let author = UserId::random();
        let first = store
            .create(new_message("posted first", CENTER, author))
            .await
            .expect("create succeeds");
        settle().await;
        store
            .create(new_message("out of range", FAR, author))
            .await
            .expect("create succeeds");
        settle().await;
        let second = store
            .create(new_message("posted second", NEAR, author))
            .await
            .expect("create succeeds");

        let found = store
            .query_nearby(nearby(CENTER))
            .await
            .expect("query succeeds");
        assert_eq!(found, vec![second, first]);
    }

    /// Delete refuses a non-owner, removes for the owner, and reports a
    /// missing record afterwards.
    pub async fn delete_enforces_ownership<S: MessageStore>(store: &S) {
        let owner = UserId::random();
        let stranger = UserId::random();
        let created = store
            .create(new_message("mine alone", CENTER, owner))
            .await
            .expect("create succeeds");

        let refused = store
            .delete(&created.id(), &stranger)
            .await
            .expect("delete call succeeds");
        assert_eq!(refused, DeleteOutcome::NotOwner);
        assert!(
            store
                .find_by_id(&created.id())
                .await
                .expect("lookup succeeds")
                .is_some(),
            "refused delete must not remove the record"
        );

        let deleted = store
            .delete(&created.id(), &owner)
            .await
            .expect("delete call succeeds");
        assert_eq!(deleted, DeleteOutcome::Deleted);

        let repeat = store
            .delete(&created.id(), &owner)
            .await
            .expect("delete call succeeds");
        assert_eq!(repeat, DeleteOutcome::NotFound);
    }

    /// A deleted record stops appearing in query results.
    pub async fn deleted_records_leave_query_results<S: MessageStore>(store: &S) {
        let author = UserId::random();
        let created = store
            .create(new_message("short lived", CENTER, author))
            .await
            .expect("create succeeds");

        store
            .delete(&created.id(), &author)
            .await
            .expect("delete call succeeds");

        let found = store
            .query_nearby(nearby(CENTER))
            .await
            .expect("query succeeds");
        assert!(!found.contains(&created));
    }
}
