//! Diesel models mapping to the database schema.
//!
//! These types mirror the tables defined in the embedded migrations and in
//! [`crate::schema`] for use with Diesel's Queryable/Insertable APIs:
//! - [`crate::schema::file_stat`] — one row per logical delivered file (size + digest)
//! - [`crate::schema::load_log`] — one row per staged file version awaiting parse
//! - [`crate::schema::load_log_summary`] — per-run discovery totals
//! - [`crate::schema::exchange`], [`crate::schema::instrument`] — reference data
//! - [`crate::schema::price_session`], [`crate::schema::price_intraday`] — OHLCV bars
//!
//! Prices are stored as integers scaled by 1000 (see [`crate::convert`]), dates
//! and timestamps as ISO-8601 text, matching SQLite's dynamic typing.

use crate::schema::*;
use diesel::prelude::*;

/// A row in [`crate::schema::run_log`]: one per recorder invocation.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable)]
#[diesel(table_name = run_log, check_for_backend(diesel::sqlite::Sqlite))]
pub struct RunLog {
    /// Database primary key; used as the run id on every other table.
    pub id: i32,
    /// Run start timestamp in RFC3339 UTC.
    pub started_at: String,
    /// Invoked command (e.g., "run", "migrate").
    pub command: String,
}

/// Insertable form of [`RunLog`].
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = run_log)]
pub struct NewRunLog<'a> {
    /// Run start timestamp in RFC3339 UTC.
    pub started_at: &'a str,
    /// Invoked command.
    pub command: &'a str,
}

/// A row in [`crate::schema::application_log`]: one log/alert event.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable)]
#[diesel(table_name = application_log, check_for_backend(diesel::sqlite::Sqlite))]
pub struct ApplicationLog {
    /// Database primary key.
    pub id: i32,
    /// Run that emitted the event.
    pub run_id: i32,
    /// Event timestamp in RFC3339 UTC.
    pub time_stamp: String,
    /// Subsystem the event originated from (e.g., "discovery", "parse_price").
    pub facility: String,
    /// Severity, syslog-style: 0 = emergency .. 7 = debug.
    pub level: i32,
    /// Free-form event message.
    pub event: String,
}

/// Insertable form of [`ApplicationLog`].
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = application_log)]
pub struct NewApplicationLog<'a> {
    /// Run that emitted the event.
    pub run_id: i32,
    /// Event timestamp in RFC3339 UTC.
    pub time_stamp: &'a str,
    /// Originating subsystem.
    pub facility: &'a str,
    /// Severity level 0–7.
    pub level: i32,
    /// Free-form event message.
    pub event: &'a str,
}

/// A row in [`crate::schema::file_stat`]: the last known fingerprint of one
/// logical delivered file. Created on first sighting, rewritten in place when
/// size or digest changes, never deleted.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable)]
#[diesel(table_name = file_stat, check_for_backend(diesel::sqlite::Sqlite))]
pub struct FileStat {
    /// Database primary key.
    pub id: i32,
    /// Run that first saw the file.
    pub creation_run_id: i32,
    /// Run that last rewrote size/digest; 0 until the first change.
    pub update_run_id: i32,
    /// Delivery path with everything up to and including `ASCII/` stripped. Unique.
    pub normalized_name: String,
    /// File size in bytes at the last sighting.
    pub file_size: i64,
    /// Hex SHA-256 over the full file content at the last sighting.
    pub content_hash: String,
}

/// Insertable form of [`FileStat`].
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = file_stat)]
pub struct NewFileStat<'a> {
    /// Run that first saw the file.
    pub creation_run_id: i32,
    /// Normalized delivery path.
    pub normalized_name: &'a str,
    /// File size in bytes.
    pub file_size: i64,
    /// Hex SHA-256 content digest.
    pub content_hash: &'a str,
}

/// A row in [`crate::schema::load_log`]: one staged file version awaiting (or
/// finished with) category-specific parsing. Terminal once `complete_flag` is set.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable)]
#[diesel(table_name = load_log, check_for_backend(diesel::sqlite::Sqlite))]
pub struct LoadLog {
    /// Database primary key.
    pub id: i32,
    /// Run whose discovery staged this entry.
    pub creation_run_id: i32,
    /// Run whose dispatcher wrote the outcome; 0 while pending.
    pub update_run_id: i32,
    /// Exchange tag from the path prefix table; "unknown" when unmatched.
    pub exchange: String,
    /// File category: "exchange_list", "name_list", or "price".
    pub category: String,
    /// Normalized delivery path.
    pub normalized_name: String,
    /// Rows inserted by the parser.
    pub fresh_pop: i32,
    /// Rows updated in place.
    pub update_pop: i32,
    /// Rows identical to the stored row (no-op).
    pub duplicate_pop: i32,
    /// Rows that failed to parse (header rows included).
    pub fail_pop: i32,
    /// Placeholder instruments auto-created while loading prices.
    pub stub_pop: i32,
    /// Total rows seen in the file.
    pub total_pop: i32,
    /// True once the parser finished successfully; false while pending or failed.
    pub complete_flag: bool,
    /// Parser elapsed time in milliseconds.
    pub duration_ms: i64,
}

/// Insertable form of [`LoadLog`]; counters start at their schema defaults.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = load_log)]
pub struct NewLoadLog<'a> {
    /// Run whose discovery staged this entry.
    pub creation_run_id: i32,
    /// Exchange tag from the path prefix table.
    pub exchange: &'a str,
    /// File category string.
    pub category: &'a str,
    /// Normalized delivery path.
    pub normalized_name: &'a str,
}

/// A row in [`crate::schema::load_log_summary`]: aggregate discovery counters,
/// written once at the end of the walk and never mutated.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable)]
#[diesel(table_name = load_log_summary, check_for_backend(diesel::sqlite::Sqlite))]
pub struct LoadLogSummary {
    /// Database primary key.
    pub id: i32,
    /// Run the summary belongs to.
    pub run_id: i32,
    /// Directories visited, import root included.
    pub directory_pop: i32,
    /// Regular files seen.
    pub total_file_pop: i32,
    /// Files staged as new.
    pub fresh_file_pop: i32,
    /// Files staged as changed.
    pub update_file_pop: i32,
    /// Total discovery duration in milliseconds.
    pub duration_ms: i64,
}

/// Insertable form of [`LoadLogSummary`].
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = load_log_summary)]
pub struct NewLoadLogSummary {
    /// Run the summary belongs to.
    pub run_id: i32,
    /// Directories visited.
    pub directory_pop: i32,
    /// Regular files seen.
    pub total_file_pop: i32,
    /// Files staged as new.
    pub fresh_file_pop: i32,
    /// Files staged as changed.
    pub update_file_pop: i32,
    /// Total discovery duration in milliseconds.
    pub duration_ms: i64,
}

/// A row in [`crate::schema::exchange`]: reference data keyed by exchange code.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable)]
#[diesel(table_name = exchange, check_for_backend(diesel::sqlite::Sqlite))]
pub struct Exchange {
    /// Database primary key.
    pub id: i32,
    /// Run that created the row.
    pub creation_run_id: i32,
    /// Run that last rewrote the display name; 0 until then.
    pub update_run_id: i32,
    /// Short exchange code (e.g., "NYSE"). Unique.
    pub symbol: String,
    /// Display name (e.g., "New York Stock Exchange").
    pub name: String,
}

/// Insertable form of [`Exchange`].
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = exchange)]
pub struct NewExchange<'a> {
    /// Run that created the row.
    pub creation_run_id: i32,
    /// Short exchange code.
    pub symbol: &'a str,
    /// Display name.
    pub name: &'a str,
}

/// A row in [`crate::schema::instrument`]: one listed symbol on an exchange.
///
/// Option-specific fields default to sentinels (far-future expiration, zero
/// strike, not-a-put) when the feed does not provide them. Placeholder rows
/// created by the price loader carry the literal name "stub". At most one
/// active row exists per (symbol, exchange).
#[derive(Debug, Clone, Queryable, Identifiable, Selectable)]
#[diesel(table_name = instrument, check_for_backend(diesel::sqlite::Sqlite))]
pub struct Instrument {
    /// Database primary key.
    pub id: i32,
    /// Run that created the row.
    pub creation_run_id: i32,
    /// Run that last rewrote mutable fields; 0 until then.
    pub update_run_id: i32,
    /// FK to [`Exchange::id`].
    pub exchange_id: i32,
    /// Ticker symbol as delivered.
    pub symbol: String,
    /// Display name, or "stub" for placeholder rows.
    pub name: String,
    /// False once the instrument is retired; rows are never physically deleted.
    pub active_flag: bool,
    /// True for put options.
    pub put_call_flag: bool,
    /// Root symbol id for option chains; 0 when not applicable.
    pub root_symbol_id: i64,
    /// Option expiration date (ISO-8601); sentinel 2056-01-01 when not applicable.
    pub expiration: String,
    /// Option strike in milli-units; 0 when not applicable.
    pub strike: i64,
}

/// Insertable form of [`Instrument`].
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = instrument)]
pub struct NewInstrument<'a> {
    /// Run that created the row.
    pub creation_run_id: i32,
    /// FK to [`Exchange::id`].
    pub exchange_id: i32,
    /// Ticker symbol.
    pub symbol: &'a str,
    /// Display name.
    pub name: &'a str,
    /// Active flag, true for freshly delivered rows.
    pub active_flag: bool,
    /// Put/call flag.
    pub put_call_flag: bool,
    /// Root symbol id.
    pub root_symbol_id: i64,
    /// Option expiration date (ISO-8601).
    pub expiration: &'a str,
    /// Option strike in milli-units.
    pub strike: i64,
}

/// A row in [`crate::schema::price_session`]: one daily OHLCV bar.
/// Unique per (instrument, quote date).
#[derive(Debug, Clone, Queryable, Identifiable, Selectable)]
#[diesel(table_name = price_session, check_for_backend(diesel::sqlite::Sqlite))]
pub struct PriceSession {
    /// Database primary key.
    pub id: i32,
    /// Run that created the row.
    pub creation_run_id: i32,
    /// Run that last rewrote the bar; 0 until then.
    pub update_run_id: i32,
    /// FK to [`Instrument::id`].
    pub instrument_id: i32,
    /// Session date as "YYYY-MM-DD".
    pub quote_date: String,
    /// Open price × 1000.
    pub open_price: i64,
    /// High price × 1000.
    pub high_price: i64,
    /// Low price × 1000.
    pub low_price: i64,
    /// Close price × 1000.
    pub close_price: i64,
    /// Session volume.
    pub volume: i64,
    /// Open interest; 0 when the feed omits it.
    pub open_interest: i64,
}

/// Insertable form of [`PriceSession`].
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = price_session)]
pub struct NewPriceSession<'a> {
    /// Run that created the row.
    pub creation_run_id: i32,
    /// FK to [`Instrument::id`].
    pub instrument_id: i32,
    /// Session date as "YYYY-MM-DD".
    pub quote_date: &'a str,
    /// Open price × 1000.
    pub open_price: i64,
    /// High price × 1000.
    pub high_price: i64,
    /// Low price × 1000.
    pub low_price: i64,
    /// Close price × 1000.
    pub close_price: i64,
    /// Session volume.
    pub volume: i64,
    /// Open interest.
    pub open_interest: i64,
}

/// A row in [`crate::schema::price_intraday`]: one intraday OHLCV bar.
/// Structurally identical to [`PriceSession`] but keyed by bar timestamp.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable)]
#[diesel(table_name = price_intraday, check_for_backend(diesel::sqlite::Sqlite))]
pub struct PriceIntraday {
    /// Database primary key.
    pub id: i32,
    /// Run that created the row.
    pub creation_run_id: i32,
    /// Run that last rewrote the bar; 0 until then.
    pub update_run_id: i32,
    /// FK to [`Instrument::id`].
    pub instrument_id: i32,
    /// Bar timestamp as "YYYY-MM-DDTHH:MM:SS".
    pub bar_time: String,
    /// Open price × 1000.
    pub open_price: i64,
    /// High price × 1000.
    pub high_price: i64,
    /// Low price × 1000.
    pub low_price: i64,
    /// Close price × 1000.
    pub close_price: i64,
    /// Bar volume.
    pub volume: i64,
    /// Open interest; 0 when the feed omits it.
    pub open_interest: i64,
}

/// Insertable form of [`PriceIntraday`].
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = price_intraday)]
pub struct NewPriceIntraday<'a> {
    /// Run that created the row.
    pub creation_run_id: i32,
    /// FK to [`Instrument::id`].
    pub instrument_id: i32,
    /// Bar timestamp as "YYYY-MM-DDTHH:MM:SS".
    pub bar_time: &'a str,
    /// Open price × 1000.
    pub open_price: i64,
    /// High price × 1000.
    pub high_price: i64,
    /// Low price × 1000.
    pub low_price: i64,
    /// Close price × 1000.
    pub close_price: i64,
    /// Bar volume.
    pub volume: i64,
    /// Open interest.
    pub open_interest: i64,
}
