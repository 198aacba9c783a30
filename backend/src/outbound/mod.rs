//! Outbound adapters: concrete implementations of the storage ports.

pub mod memory;
pub mod persistence;
