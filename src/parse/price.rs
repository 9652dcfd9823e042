//! Price-file parser: comma-delimited OHLCV rows.
//!
//! Row layout: `symbol,date,open,high,low,close,volume[,openInterest]`.
//! A leading `Symbol` header is counted as a row failure and silently
//! discarded; a row with the wrong field count is counted and logged like any
//! other row failure. When a row references a symbol the name-list feed has
//! not delivered yet, a placeholder instrument is created rather than
//! dropping the price data.

use std::fs::File;
use std::io::{BufRead, BufReader};

use anyhow::{Context, bail};
use diesel::{QueryResult, SqliteConnection};

use crate::alert::AlertLog;
use crate::convert;
use crate::eod_file::EodFile;
use crate::error::FileFailure;
use crate::parse::resolve_exchange;
use crate::reconcile::{RowTally, reconcile};
use crate::records::{
    IntradayBarRecord, SessionBarRecord, find_active_instrument, insert_placeholder_instrument,
};

const FACILITY: &str = "parse_price";

/// One parsed price row; `stamp` is already formatted for storage.
#[derive(Debug)]
struct BarFields {
    symbol: String,
    stamp: String,
    open: i64,
    high: i64,
    low: i64,
    close: i64,
    volume: i64,
    open_interest: i64,
}

/// Parse one raw line. `Ok(None)` means the header row, counted as a failure
/// by the caller but not logged. `Err` carries a diagnostic for rows with a
/// wrong field count or unparseable fields.
fn parse_row(raw: &str, intraday: bool) -> anyhow::Result<Option<BarFields>> {
    if raw.starts_with("Symbol") {
        return Ok(None);
    }

    let fields: Vec<&str> = raw.trim().split(',').collect();
    if !(7..=8).contains(&fields.len()) {
        bail!("wrong field count: {}", fields.len());
    }

    let stamp = if intraday {
        convert::parse_bar_timestamp(fields[1])?
            .format("%Y-%m-%dT%H:%M:%S")
            .to_string()
    } else {
        convert::parse_session_date(fields[1])?.to_string()
    };

    let volume: i64 = fields[6]
        .trim()
        .parse()
        .with_context(|| format!("non-numeric volume: {}", fields[6]))?;
    let open_interest: i64 = if fields.len() > 7 {
        fields[7]
            .trim()
            .parse()
            .with_context(|| format!("non-numeric open interest: {}", fields[7]))?
    } else {
        0
    };

    Ok(Some(BarFields {
        symbol: fields[0].trim().to_string(),
        stamp,
        open: convert::price_to_milli(fields[2])?,
        high: convert::price_to_milli(fields[3])?,
        low: convert::price_to_milli(fields[4])?,
        close: convert::price_to_milli(fields[5])?,
        volume,
        open_interest,
    }))
}

/// Resolve the instrument (creating a placeholder if needed) and reconcile the
/// bar into the session or intraday table.
fn load_bar(
    conn: &mut SqliteConnection,
    run_id: i32,
    exchange_id: i32,
    intraday: bool,
    bar: &BarFields,
    tally: &mut RowTally,
) -> QueryResult<()> {
    let instrument = match find_active_instrument(conn, &bar.symbol, exchange_id)? {
        Some(instrument) => instrument,
        None => {
            let stub = insert_placeholder_instrument(conn, run_id, exchange_id, &bar.symbol)?;
            tally.stub += 1;
            stub
        }
    };

    if intraday {
        let candidate = IntradayBarRecord {
            instrument_id: instrument.id,
            bar_time: bar.stamp.clone(),
            open_price: bar.open,
            high_price: bar.high,
            low_price: bar.low,
            close_price: bar.close,
            volume: bar.volume,
            open_interest: bar.open_interest,
        };
        reconcile(conn, run_id, &candidate, tally)?;
    } else {
        let candidate = SessionBarRecord {
            instrument_id: instrument.id,
            quote_date: bar.stamp.clone(),
            open_price: bar.open,
            high_price: bar.high,
            low_price: bar.low,
            close_price: bar.close,
            volume: bar.volume,
            open_interest: bar.open_interest,
        };
        reconcile(conn, run_id, &candidate, tally)?;
    }

    Ok(())
}

pub(crate) fn parse_price_file(
    conn: &mut SqliteConnection,
    alert: &AlertLog,
    run_id: i32,
    eod: &EodFile,
) -> Result<RowTally, FileFailure> {
    alert.write(conn, FACILITY, 6, &format!("start:{}", eod.normalized_name))?;

    let exchange = resolve_exchange(conn, eod)?;
    let intraday = eod.is_intraday();

    let file = File::open(&eod.full_path).map_err(|source| FileFailure::Unreadable {
        path: eod.normalized_name.clone(),
        source,
    })?;

    let mut tally = RowTally::default();
    for (ndx, line) in BufReader::new(file).lines().enumerate() {
        // 1-based, so operators can find the line in the file.
        let ordinal = ndx + 1;
        let line = line.map_err(|source| FileFailure::Unreadable {
            path: eod.normalized_name.clone(),
            source,
        })?;
        if line.trim().is_empty() {
            continue;
        }

        tally.total += 1;

        match parse_row(&line, intraday) {
            Ok(None) => tally.failed += 1,
            Err(e) => {
                tally.failed += 1;
                alert.write(
                    conn,
                    FACILITY,
                    4,
                    &format!(
                        "row {ordinal} rejected in {}: {e}, contents:{line}",
                        eod.normalized_name
                    ),
                )?;
            }
            Ok(Some(bar)) => {
                if let Err(e) = load_bar(conn, run_id, exchange.id, intraday, &bar, &mut tally) {
                    tally.failed += 1;
                    alert.write(
                        conn,
                        FACILITY,
                        4,
                        &format!(
                            "row {ordinal} failed in {}: {e}, contents:{line}",
                            eod.normalized_name
                        ),
                    )?;
                }
            }
        }
    }

    alert.write(conn, FACILITY, 6, &format!("stop:{}", eod.normalized_name))?;
    Ok(tally)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_row_is_discarded() {
        let parsed = parse_row("Symbol,Date,Open,High,Low,Close,Volume", false).unwrap();
        assert!(parsed.is_none());
    }

    #[test]
    fn wrong_field_count_is_an_error() {
        assert!(parse_row("AAPL,20180212,158.5", false).is_err());
        assert!(parse_row("A,B,C,D,E,F,G,H,I", false).is_err());
    }

    #[test]
    fn session_row_parses() {
        let bar = parse_row("AAPL,20180212,158.5,163.89,157.51,162.71,60808300", false)
            .unwrap()
            .unwrap();
        assert_eq!(bar.symbol, "AAPL");
        assert_eq!(bar.stamp, "2018-02-12");
        assert_eq!(bar.open, 158500);
        assert_eq!(bar.close, 162710);
        assert_eq!(bar.volume, 60808300);
        assert_eq!(bar.open_interest, 0);
    }

    #[test]
    fn open_interest_field_is_optional() {
        let bar = parse_row("ES,20180212,2650.5,2670,2640.25,2656,1200,345000", false)
            .unwrap()
            .unwrap();
        assert_eq!(bar.open_interest, 345000);
    }

    #[test]
    fn intraday_row_parses_with_timestamp() {
        let bar = parse_row("AAPL,27-Apr-2018 09:20,162,162.5,161.9,162.2,52000", true)
            .unwrap()
            .unwrap();
        assert_eq!(bar.stamp, "2018-04-27T09:20:00");
    }

    #[test]
    fn bad_numeric_field_is_an_error() {
        assert!(parse_row("AAPL,20180212,abc,163.89,157.51,162.71,60808300", false).is_err());
        assert!(parse_row("AAPL,20180212,158.5,163.89,157.51,162.71,lots", false).is_err());
    }
}
