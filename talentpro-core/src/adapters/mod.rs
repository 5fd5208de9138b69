//! Adapter implementations
//!
//! Adapters implement the port traits with concrete technologies:
//! - DuckDB for the TalentStore port
//! - An in-memory store for previews and tests
//! - Demo data generation for demo mode

pub mod demo;
pub mod duckdb;
pub mod memory;
