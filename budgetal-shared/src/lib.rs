//! # Budgetal Shared Library
//!
//! This crate contains the domain core of the Budgetal API: annual budget
//! provisioning, monthly spending statistics, and the persistence and
//! authentication plumbing they sit on.
//!
//! ## Module Organization
//!
//! - `budget`: Year validation, budget provisioning, item edits, statistics aggregation
//! - `store`: Storage capability traits with Postgres and in-memory backends
//! - `models`: Database row models and their queries
//! - `auth`: JWT tokens and request authentication
//! - `db`: Connection pooling and migrations

pub mod auth;
pub mod budget;
pub mod db;
pub mod models;
pub mod store;

/// Current version of the Budgetal shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
