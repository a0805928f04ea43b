//! Infrastructure Layer
//!
//! Contains implementations for external services including:
//! - MongoDB connection, indexes and aggregation pipelines
//! - Repository implementations of the domain traits
//! - Prometheus metrics

pub mod database;
pub mod metrics;
pub mod repositories;
