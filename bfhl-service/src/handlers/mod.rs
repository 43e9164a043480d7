//! HTTP handlers for the BFHL service.

pub mod bfhl;
pub mod health;
pub mod metrics;
