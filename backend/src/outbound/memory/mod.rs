//! In-process storage adapters.

mod scan_store;

pub use scan_store::MemoryScanStore;
