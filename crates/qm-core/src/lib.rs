//! Scoring, catalog-schema, and aggregation engine for quality-management
//! evaluations.
//!
//! The library is purely computational: callers supply catalog schema
//! documents, submitted answer sets, and historical scored submissions;
//! the library produces scorecards and aggregate report structures. All
//! I/O (HTTP, persistence) lives in the service crate on top.

pub mod cache;
pub mod catalog;
pub mod config;
pub mod error;
pub mod importer;
pub mod reporting;
pub mod scoring;
pub mod store;
pub mod submission;
pub mod telemetry;
