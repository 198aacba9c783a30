//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Two store implementations share one `messages` table via `diesel-async`
//! with `bb8` connection pooling: the indexed store prefilters candidates
//! with the composite position index, the scan store reads the whole
//! retention window and lets the exact distance filter decide. The adapters
//! are thin translation layers: Diesel row structs and schema definitions
//! stay internal and every row passes through the validated domain
//! constructors on the way out. Database errors map onto the store's error
//! type.

mod diesel_helpers;
mod diesel_message_store;
mod diesel_scan_store;
mod models;
mod pool;
pub(crate) mod schema;

pub use diesel_message_store::DieselMessageStore;
pub use diesel_scan_store::DieselScanStore;
pub use pool::{DbPool, PoolConfig, PoolError};
