//! WILDCAT — fantasy league lineup-lock and wager-adjusted scoring service
//!
//! Library crate exposing all modules for use by integration tests
//! and the binary entry point.

pub mod config;
pub mod types;
pub mod scoring;
pub mod league;
pub mod store;
pub mod realtime;
pub mod server;
