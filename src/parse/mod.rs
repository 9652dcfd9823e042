//! Parse dispatch: drain `load_log` for files awaiting service.
//!
//! Categories run in dependency order — exchange lists, then name lists, then
//! prices — because name resolution depends on exchange rows existing and
//! price loading depends on both. Within a category, entries are serviced in
//! normalized-path order for determinism.
//!
//! Each file parses inside its own immediate transaction; a file-level failure
//! rolls that file back, is logged, and leaves the entry incomplete
//! (`complete_flag = false`). The run then proceeds to the next entry.

mod exchange;
mod name;
mod price;
mod xml_list;

use std::path::Path;
use std::time::Instant;

use diesel::prelude::*;
use diesel::{QueryResult, SqliteConnection};

use crate::alert::AlertLog;
use crate::eod_file::{EodFile, FileCategory, UNKNOWN_EXCHANGE};
use crate::error::{FileFailure, RecorderError};
use crate::models::{Exchange, LoadLog};
use crate::reconcile::RowTally;
use crate::records;
use crate::schema::load_log;

const FACILITY: &str = "parser";

/// Drain pending `load_log` entries in category order, recording per-entry
/// counters, elapsed time, and completion on each.
pub fn run_parsers(
    conn: &mut SqliteConnection,
    alert: &AlertLog,
    run_id: i32,
    import_dir: &Path,
) -> Result<(), RecorderError> {
    alert.write(conn, FACILITY, 6, "start")?;

    for category in FileCategory::dispatch_order() {
        service_category(conn, alert, run_id, import_dir, category)?;
    }

    alert.write(conn, FACILITY, 6, "stop")?;
    Ok(())
}

fn service_category(
    conn: &mut SqliteConnection,
    alert: &AlertLog,
    run_id: i32,
    import_dir: &Path,
    category: FileCategory,
) -> Result<(), RecorderError> {
    let pending: Vec<LoadLog> = load_log::table
        .filter(
            load_log::complete_flag
                .eq(false)
                .and(load_log::category.eq(category.as_str())),
        )
        .order(load_log::normalized_name.asc())
        .select(LoadLog::as_select())
        .load(conn)?;

    for entry in pending {
        let eod = EodFile::from_normalized(import_dir, &entry.normalized_name);
        let started = Instant::now();

        let result = conn.immediate_transaction::<_, FileFailure, _>(|conn| match category {
            FileCategory::ExchangeList => exchange::parse_exchange_file(conn, alert, run_id, &eod),
            FileCategory::NameList => name::parse_name_file(conn, alert, run_id, &eod),
            FileCategory::Price => price::parse_price_file(conn, alert, run_id, &eod),
        });

        let duration_ms = started.elapsed().as_millis() as i64;
        match result {
            Ok(tally) => {
                write_outcome(conn, run_id, entry.id, &tally, true, duration_ms)?;
            }
            Err(failure) => {
                alert.write(
                    conn,
                    FACILITY,
                    4,
                    &format!("parse failed for {}: {failure}", entry.normalized_name),
                )?;
                write_outcome(conn, run_id, entry.id, &RowTally::default(), false, duration_ms)?;
            }
        }
    }

    Ok(())
}

/// Write the parser outcome back to the `load_log` entry. A failed file always
/// leaves `complete_flag` false so it stays visible as pending work.
fn write_outcome(
    conn: &mut SqliteConnection,
    run_id: i32,
    entry_id: i32,
    tally: &RowTally,
    complete: bool,
    duration_ms: i64,
) -> QueryResult<usize> {
    diesel::update(load_log::table.find(entry_id))
        .set((
            load_log::update_run_id.eq(run_id),
            load_log::fresh_pop.eq(tally.fresh),
            load_log::update_pop.eq(tally.updated),
            load_log::duplicate_pop.eq(tally.duplicate),
            load_log::fail_pop.eq(tally.failed),
            load_log::stub_pop.eq(tally.stub),
            load_log::total_pop.eq(tally.total),
            load_log::complete_flag.eq(complete),
            load_log::duration_ms.eq(duration_ms),
        ))
        .execute(conn)
}

/// Resolve the file's classified exchange to a stored row. Unknown-tagged
/// files are rejected whole-file before any row parsing; so are files whose
/// exchange has not been loaded yet.
fn resolve_exchange(conn: &mut SqliteConnection, eod: &EodFile) -> Result<Exchange, FileFailure> {
    let tag = eod.exchange_tag();
    if tag == UNKNOWN_EXCHANGE {
        return Err(FileFailure::UnknownExchange(eod.normalized_name.clone()));
    }

    records::find_exchange(conn, tag)?.ok_or_else(|| FileFailure::ExchangeNotLoaded {
        tag: tag.to_string(),
        file: eod.normalized_name.clone(),
    })
}
