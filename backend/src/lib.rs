//! Proximity message store backend.
//!
//! Authenticated users post short location-tagged notes and read the ones
//! created near them within a retention window. The crate is organised
//! hexagonally: `domain` holds the entities, ports, and the message service;
//! `inbound` adapts HTTP onto the driving ports; `outbound` implements the
//! store port over an in-process scan map or PostgreSQL; `server` wires the
//! pieces together.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod outbound;
pub mod server;

pub use doc::ApiDoc;
