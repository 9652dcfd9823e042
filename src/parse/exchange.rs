//! Exchange-list parser: `(code, display name)` pairs with no foreign
//! dependency.

use diesel::SqliteConnection;

use crate::alert::AlertLog;
use crate::eod_file::{EodFile, UNKNOWN_EXCHANGE};
use crate::error::FileFailure;
use crate::parse::xml_list;
use crate::reconcile::{RowTally, reconcile};
use crate::records::ExchangeRecord;

const FACILITY: &str = "parse_exchange";

pub(crate) fn parse_exchange_file(
    conn: &mut SqliteConnection,
    alert: &AlertLog,
    run_id: i32,
    eod: &EodFile,
) -> Result<RowTally, FileFailure> {
    if eod.exchange_tag() == UNKNOWN_EXCHANGE {
        return Err(FileFailure::UnknownExchange(eod.normalized_name.clone()));
    }

    alert.write(conn, FACILITY, 6, &format!("start:{}", eod.normalized_name))?;

    let text =
        std::fs::read_to_string(&eod.full_path).map_err(|source| FileFailure::Unreadable {
            path: eod.normalized_name.clone(),
            source,
        })?;

    let rows = xml_list::read_code_name_rows(&text, b"EXCHANGE").map_err(|e| {
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

        let candidate = ExchangeRecord { symbol: code, name };
        if let Err(e) = reconcile(conn, run_id, &candidate, &mut tally) {
            tally.failed += 1;
            alert.write(
                conn,
                FACILITY,
                4,
                &format!(
                    "row {ordinal} failed in {}: {e}, contents:{candidate:?}",
                    eod.normalized_name
                ),
            )?;
        }
    }

    alert.write(conn, FACILITY, 6, &format!("stop:{}", eod.normalized_name))?;
    Ok(tally)
}
