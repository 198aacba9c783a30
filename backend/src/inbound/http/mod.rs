//! HTTP inbound adapter exposing REST endpoints.

pub mod auth;
pub mod error;
pub mod health;
pub mod messages;
pub mod state;
pub mod validation;

pub use crate::domain::ApiResult;
