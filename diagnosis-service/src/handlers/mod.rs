//! HTTP handlers for the diagnosis service.

pub mod diagnose;
pub mod health;
pub mod metrics;
