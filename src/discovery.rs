//! Import-tree discovery: find fresh files to reload.
//!
//! A fresh file is either unknown or has a changed size/content digest. The
//! walk fingerprints every regular file, compares against `file_stat`, and
//! stages new or changed files in `load_log` for the dispatcher. One
//! `load_log_summary` row records the walk's totals; it is written even when
//! individual files were skipped due to read errors.

use std::path::Path;
use std::time::Instant;

use diesel::prelude::*;
use diesel::{RunQueryDsl, SqliteConnection};
use walkdir::WalkDir;

use crate::alert::AlertLog;
use crate::eod_file::EodFile;
use crate::error::RecorderError;
use crate::fingerprint::{Fingerprint, fingerprint_file};
use crate::models::{FileStat, NewFileStat, NewLoadLog, NewLoadLogSummary};
use crate::schema::{file_stat, load_log, load_log_summary};

const FACILITY: &str = "discovery";

/// Counters accumulated over one discovery walk.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DiscoveryStats {
    /// Directories visited, import root included.
    pub directories: i32,
    /// Regular files seen.
    pub total_files: i32,
    /// Files staged as new.
    pub fresh_files: i32,
    /// Files staged as changed.
    pub updated_files: i32,
}

/// Walk the import tree, stage fresh/changed files, and write the run summary.
///
/// Fatal outcomes ([`RecorderError::MissingImportRoot`],
/// [`RecorderError::UnmarkedPath`]) abort before any summary is written; they
/// are the explicit "never ran" failure path, not a partial summary.
pub fn run_discovery(
    conn: &mut SqliteConnection,
    alert: &AlertLog,
    run_id: i32,
    import_dir: &Path,
) -> Result<DiscoveryStats, RecorderError> {
    if !import_dir.is_dir() {
        return Err(RecorderError::MissingImportRoot(
            import_dir.display().to_string(),
        ));
    }

    let started = Instant::now();
    alert.write(conn, FACILITY, 6, "start")?;

    let stats = conn.immediate_transaction::<_, RecorderError, _>(|conn| {
        let mut stats = DiscoveryStats::default();

        for entry in WalkDir::new(import_dir) {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    alert.write(conn, FACILITY, 4, &format!("unreadable entry skipped: {e}"))?;
                    continue;
                }
            };

            if entry.file_type().is_dir() {
                stats.directories += 1;
                continue;
            }
            if !entry.file_type().is_file() {
                continue;
            }

            stats.total_files += 1;

            // Zero-length files are treated as not yet fully delivered.
            match entry.metadata() {
                Ok(meta) if meta.len() == 0 => {
                    tracing::info!("skipping empty file: {}", entry.path().display());
                    continue;
                }
                Ok(_) => {}
                Err(e) => {
                    alert.write(
                        conn,
                        FACILITY,
                        4,
                        &format!("stat failed, skipping {}: {e}", entry.path().display()),
                    )?;
                    continue;
                }
            }

            let eod = EodFile::new(entry.path())?;

            let fp = match fingerprint_file(&eod.full_path) {
                Ok(fp) => fp,
                Err(e) => {
                    // Race with concurrent delivery: skip, do not abort the walk.
                    alert.write(
                        conn,
                        FACILITY,
                        4,
                        &format!("fingerprint failed, skipping {}: {e}", eod.normalized_name),
                    )?;
                    continue;
                }
            };

            process_file(conn, run_id, &eod, &fp, &mut stats)?;
        }

        Ok(stats)
    })?;

    let duration_ms = started.elapsed().as_millis() as i64;
    diesel::insert_into(load_log_summary::table)
        .values(&NewLoadLogSummary {
            run_id,
            directory_pop: stats.directories,
            total_file_pop: stats.total_files,
            fresh_file_pop: stats.fresh_files,
            update_file_pop: stats.updated_files,
            duration_ms,
        })
        .execute(conn)?;

    alert.write(conn, FACILITY, 6, "stop")?;

    Ok(stats)
}

/// Test one file for new/updated status against its stored fingerprint.
fn process_file(
    conn: &mut SqliteConnection,
    run_id: i32,
    eod: &EodFile,
    fp: &Fingerprint,
    stats: &mut DiscoveryStats,
) -> Result<(), RecorderError> {
    let selected: Option<FileStat> = file_stat::table
        .filter(file_stat::normalized_name.eq(&eod.normalized_name))
        .select(FileStat::as_select())
        .first(conn)
        .optional()?;

    match selected {
        None => {
            diesel::insert_into(file_stat::table)
                .values(&NewFileStat {
                    creation_run_id: run_id,
                    normalized_name: &eod.normalized_name,
                    file_size: fp.size,
                    content_hash: &fp.digest,
                })
                .execute(conn)?;
            stage_load_log(conn, run_id, eod)?;
            stats.fresh_files += 1;
        }
        Some(stored) if stored.file_size != fp.size || stored.content_hash != fp.digest => {
            // Rewrite in place with the freshly computed size and digest.
            diesel::update(file_stat::table.find(stored.id))
                .set((
                    file_stat::update_run_id.eq(run_id),
                    file_stat::file_size.eq(fp.size),
                    file_stat::content_hash.eq(&fp.digest),
                ))
                .execute(conn)?;
            stage_load_log(conn, run_id, eod)?;
            stats.updated_files += 1;
        }
        Some(_) => {}
    }

    Ok(())
}

fn stage_load_log(
    conn: &mut SqliteConnection,
    run_id: i32,
    eod: &EodFile,
) -> Result<(), RecorderError> {
    diesel::insert_into(load_log::table)
        .values(&NewLoadLog {
            creation_run_id: run_id,
            exchange: eod.exchange_tag(),
            category: eod.category().as_str(),
            normalized_name: &eod.normalized_name,
        })
        .execute(conn)?;
    Ok(())
}
