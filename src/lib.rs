//! End-of-day market-data snapshot recorder.
//!
//! Ingests periodic snapshot deliveries (exchange lists, symbol lists, daily
//! and intraday price bars) from an import directory tree, detects new or
//! changed files by (size, digest) fingerprint, and reconciles their parsed
//! rows into a SQLite store via natural-key upsert. Re-running over unchanged
//! input writes nothing.

#![deny(missing_docs)]

pub mod alert;
pub mod config;
pub mod convert;
pub mod db;
pub mod discovery;
pub mod eod_file;
pub mod error;
pub mod fingerprint;
pub mod models;
pub mod parse;
pub mod reconcile;
pub mod records;
#[allow(missing_docs)]
pub mod schema;
