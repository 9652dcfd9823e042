//! Pinned date/time and price conversions.
//!
//! Accepted date formats are fixed rather than locale-dependent: six-digit
//! `yymmdd`, eight-digit `yyyymmdd`, `dd-Mon-yyyy`, and (for intraday bars)
//! `dd-Mon-yyyy hh:mm`. Anything else fails explicitly.
//!
//! Prices travel as decimal text and are stored as integers scaled by 1000,
//! parsed digit-wise so no binary floating point is involved; equality on the
//! scaled integers is exact.

use anyhow::{Context, bail};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

fn all_digits(raw: &str) -> bool {
    !raw.is_empty() && raw.bytes().all(|b| b.is_ascii_digit())
}

/// Parse a session date: `yymmdd` (2000-based), `yyyymmdd`, or `dd-Mon-yyyy`.
pub fn parse_session_date(raw: &str) -> anyhow::Result<NaiveDate> {
    let trimmed = raw.trim();

    if trimmed.len() == 6 && all_digits(trimmed) {
        let yy: i32 = trimmed[..2].parse()?;
        let mm: u32 = trimmed[2..4].parse()?;
        let dd: u32 = trimmed[4..].parse()?;
        return NaiveDate::from_ymd_opt(2000 + yy, mm, dd)
            .with_context(|| format!("invalid date: {trimmed}"));
    }

    if trimmed.len() == 8 && all_digits(trimmed) {
        let yyyy: i32 = trimmed[..4].parse()?;
        let mm: u32 = trimmed[4..6].parse()?;
        let dd: u32 = trimmed[6..].parse()?;
        return NaiveDate::from_ymd_opt(yyyy, mm, dd)
            .with_context(|| format!("invalid date: {trimmed}"));
    }

    NaiveDate::parse_from_str(trimmed, "%d-%b-%Y")
        .with_context(|| format!("unsupported date format: {trimmed}"))
}

/// Parse an intraday bar timestamp: `dd-Mon-yyyy hh:mm`, or any session date
/// (taken as midnight).
pub fn parse_bar_timestamp(raw: &str) -> anyhow::Result<NaiveDateTime> {
    let trimmed = raw.trim();

    if trimmed.contains(' ') {
        return NaiveDateTime::parse_from_str(trimmed, "%d-%b-%Y %H:%M")
            .with_context(|| format!("unsupported timestamp format: {trimmed}"));
    }

    Ok(parse_session_date(trimmed)?.and_time(NaiveTime::MIN))
}

/// Scale decimal price text to integer milli-units, e.g. `"50.09"` -> `50090`.
///
/// More than three fractional digits is an explicit failure rather than a
/// silent truncation.
pub fn price_to_milli(raw: &str) -> anyhow::Result<i64> {
    let trimmed = raw.trim();
    let (negative, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed),
    };

    let (whole, frac) = match digits.split_once('.') {
        Some((w, f)) => (w, f),
        None => (digits, ""),
    };

    if whole.is_empty() && frac.is_empty() {
        bail!("empty price field: {raw:?}");
    }
    if !whole.is_empty() && !all_digits(whole) {
        bail!("non-numeric price: {raw:?}");
    }
    if !frac.is_empty() && !all_digits(frac) {
        bail!("non-numeric price: {raw:?}");
    }
    if frac.len() > 3 {
        bail!("more than three fractional digits: {raw:?}");
    }

    let whole_v: i64 = if whole.is_empty() {
        0
    } else {
        whole.parse().with_context(|| format!("price overflow: {raw:?}"))?
    };
    let mut frac_v: i64 = if frac.is_empty() { 0 } else { frac.parse()? };
    for _ in frac.len()..3 {
        frac_v *= 10;
    }

    let magnitude = whole_v
        .checked_mul(1000)
        .and_then(|v| v.checked_add(frac_v))
        .with_context(|| format!("price overflow: {raw:?}"))?;

    Ok(if negative { -magnitude } else { magnitude })
}

/// Format milli-units back to decimal text, trimming trailing zeros, e.g.
/// `50090` -> `"50.09"` and `50000` -> `"50"`.
pub fn milli_to_price(value: i64) -> String {
    let sign = if value < 0 { "-" } else { "" };
    let magnitude = value.abs();
    let whole = magnitude / 1000;
    let frac = magnitude % 1000;

    if frac == 0 {
        return format!("{sign}{whole}");
    }

    let mut text = format!("{frac:03}");
    while text.ends_with('0') {
        text.pop();
    }
    format!("{sign}{whole}.{text}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn six_digit_dates_are_2000_based() {
        assert_eq!(
            parse_session_date("151016").unwrap(),
            NaiveDate::from_ymd_opt(2015, 10, 16).unwrap()
        );
    }

    #[test]
    fn eight_digit_dates() {
        assert_eq!(
            parse_session_date("20180212").unwrap(),
            NaiveDate::from_ymd_opt(2018, 2, 12).unwrap()
        );
    }

    #[test]
    fn day_month_year_dates() {
        assert_eq!(
            parse_session_date("27-Apr-2018").unwrap(),
            NaiveDate::from_ymd_opt(2018, 4, 27).unwrap()
        );
    }

    #[test]
    fn other_formats_fail_explicitly() {
        assert!(parse_session_date("2018/02/12").is_err());
        assert!(parse_session_date("20181350").is_err());
        assert!(parse_session_date("").is_err());
    }

    #[test]
    fn bar_timestamps() {
        let ts = parse_bar_timestamp("27-Apr-2018 09:20").unwrap();
        assert_eq!(ts.to_string(), "2018-04-27 09:20:00");

        let midnight = parse_bar_timestamp("20180212").unwrap();
        assert_eq!(midnight.to_string(), "2018-02-12 00:00:00");
    }

    #[test]
    fn price_scaling_round_trip() {
        assert_eq!(price_to_milli("50.09").unwrap(), 50090);
        assert_eq!(milli_to_price(50090), "50.09");

        assert_eq!(price_to_milli("158.5").unwrap(), 158500);
        assert_eq!(price_to_milli("0.001").unwrap(), 1);
        assert_eq!(price_to_milli("162").unwrap(), 162000);
        assert_eq!(milli_to_price(162000), "162");
    }

    #[test]
    fn bad_prices_fail() {
        assert!(price_to_milli("").is_err());
        assert!(price_to_milli("12.3456").is_err());
        assert!(price_to_milli("12a.5").is_err());
        assert!(price_to_milli(".").is_err());
    }

    proptest! {
        #[test]
        fn round_trip_is_exact(whole in 0i64..1_000_000, frac in 0i64..1000) {
            let milli = whole * 1000 + frac;
            let text = milli_to_price(milli);
            prop_assert_eq!(price_to_milli(&text).unwrap(), milli);
        }
    }
}
