//! Name-list parser: instruments for one exchange.
//!
//! The whole file fails immediately when its classified exchange has no row
//! yet — every instrument must belong to a known exchange. The feed carries no
//! option attributes, so those stay at their sentinels.

use diesel::SqliteConnection;

use crate::alert::AlertLog;
use crate::eod_file::EodFile;
use crate::error::FileFailure;
use crate::parse::{resolve_exchange, xml_list};
use crate::reconcile::{RowTally, reconcile};
use crate::records::InstrumentRecord;

const FACILITY: &str = "parse_name";

pub(crate) fn parse_name_file(
    conn: &mut SqliteConnection,
    alert: &AlertLog,
    run_id: i32,
    eod: &EodFile,
) -> Result<RowTally, FileFailure> {
    alert.write(conn, FACILITY, 6, &format!("start:{}", eod.normalized_name))?;

    let exchange = resolve_exchange(conn, eod)?;

    let text =
        std::fs::read_to_string(&eod.full_path).map_err(|source| FileFailure::Unreadable {
            path: eod.normalized_name.clone(),
            source,
        })?;

    let rows = xml_list::read_code_name_rows(&text, b"SYMBOL").map_err(|e| {
        FileFailure::MalformedDocument {
            path: eod.normalized_name.clone(),
            detail: e.to_string(),
        }
    })?;

    let mut tally = RowTally::default();
    for row in rows {
        tally.total += 1;
        let ordinal = tally.total;

        let (code, name) = match row {
            Ok(pair) => pair,
            Err(e) => {
                tally.failed += 1;
                alert.write(
                    conn,
                    FACILITY,
                    4,
                    &format!("row {ordinal} rejected in {}: {e}", eod.normalized_name),
                )?;
                continue;
            }
        };

        let candidate = InstrumentRecord::new(exchange.id, code, name);
        if let Err(e) = reconcile(conn, run_id, &candidate, &mut tally) {
            tally.failed += 1;
            alert.write(
                conn,
                FACILITY,
                4,
                &format!(
                    "row {ordinal} failed in {}: {e}, contents:{}",
                    eod.normalized_name, candidate.symbol
                ),
            )?;
        }
    }

    alert.write(conn, FACILITY, 6, &format!("stop:{}", eod.normalized_name))?;
    Ok(tally)
}
