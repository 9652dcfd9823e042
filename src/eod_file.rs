//! Identity of one delivered file.
//!
//! A delivered path becomes a logical identity by stripping everything up to
//! and including the `ASCII/` marker segment; the remainder (the normalized
//! name) is the unique key in `file_stat` and `load_log`. The leading path
//! segment of the normalized name classifies the exchange, the bare file name
//! classifies the category, and the segment depth distinguishes intraday from
//! session price files.

use std::path::{Path, PathBuf};

use crate::error::RecorderError;

/// Marker segment separating delivery plumbing from the logical file tree.
pub const PATH_MARKER: &str = "ASCII/";

/// Exchange tag used when no prefix matches.
pub const UNKNOWN_EXCHANGE: &str = "unknown";

// Order matters: TSXV must be tested before TSX.
const EXCHANGE_PREFIXES: &[&str] = &[
    "AMEX", "ASX", "BSE", "CBOT", "CFE", "CME", "COMEX", "EUREX", "FOREX", "HKEX", "INDEX", "KCBT",
    "LIFFE", "LSE", "MGEX", "NASDAQ", "NSE", "NYBOT", "NYMEX", "NYSE", "NZX", "OTCBB", "SGX",
    "TSXV", "TSX", "USMF", "WCE",
];

/// Category of a delivered file, decided by its bare file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileCategory {
    /// `ExchangeList.xml` — exchange reference data.
    ExchangeList,
    /// `SymbolList.xml` — instrument reference data.
    NameList,
    /// Everything else — comma-delimited OHLCV bars.
    Price,
}

impl FileCategory {
    /// Stable string stored in the `load_log.category` column.
    pub fn as_str(self) -> &'static str {
        match self {
            FileCategory::ExchangeList => "exchange_list",
            FileCategory::NameList => "name_list",
            FileCategory::Price => "price",
        }
    }

    /// Dispatch order: exchanges before names before prices, since name
    /// resolution depends on exchange rows existing.
    pub fn dispatch_order() -> [FileCategory; 3] {
        [
            FileCategory::ExchangeList,
            FileCategory::NameList,
            FileCategory::Price,
        ]
    }

    fn classify(file_name: &str) -> Self {
        match file_name {
            "ExchangeList.xml" => FileCategory::ExchangeList,
            "SymbolList.xml" => FileCategory::NameList,
            _ => FileCategory::Price,
        }
    }
}

/// One delivered file: physical path plus its normalized logical identity.
#[derive(Debug, Clone)]
pub struct EodFile {
    /// Physical path used to open the file.
    pub full_path: PathBuf,
    /// Path with everything up to and including `ASCII/` stripped.
    pub normalized_name: String,
    /// Bare file name, last segment of the normalized name.
    pub file_name: String,
}

impl EodFile {
    /// Build an identity from a raw delivered path.
    ///
    /// Fails with [`RecorderError::UnmarkedPath`] when the path lacks the
    /// `ASCII/` marker — a delivery error that must not be silently skipped.
    pub fn new(raw: &Path) -> Result<Self, RecorderError> {
        let text = raw.to_string_lossy();
        let ndx = text
            .find(PATH_MARKER)
            .ok_or_else(|| RecorderError::UnmarkedPath(text.to_string()))?;
        let normalized_name = text[ndx + PATH_MARKER.len()..].to_string();
        let file_name = normalized_name
            .rsplit('/')
            .next()
            .unwrap_or(normalized_name.as_str())
            .to_string();

        Ok(Self {
            full_path: raw.to_path_buf(),
            normalized_name,
            file_name,
        })
    }

    /// Rebuild an identity from a staged normalized name; the physical path is
    /// `<import_dir>/ASCII/<normalized>`.
    pub fn from_normalized(import_dir: &Path, normalized_name: &str) -> Self {
        let file_name = normalized_name
            .rsplit('/')
            .next()
            .unwrap_or(normalized_name)
            .to_string();

        Self {
            full_path: import_dir.join("ASCII").join(normalized_name),
            normalized_name: normalized_name.to_string(),
            file_name,
        }
    }

    /// Exchange tag from the fixed, case-sensitive prefix table; files whose
    /// leading segment matches nothing get [`UNKNOWN_EXCHANGE`] so they can
    /// still be staged for triage.
    pub fn exchange_tag(&self) -> &'static str {
        EXCHANGE_PREFIXES
            .iter()
            .find(|prefix| self.normalized_name.starts_with(*prefix))
            .copied()
            .unwrap_or(UNKNOWN_EXCHANGE)
    }

    /// File category decided by the bare file name.
    pub fn category(&self) -> FileCategory {
        FileCategory::classify(&self.file_name)
    }

    /// True for intraday bar files, which sit one directory level deeper than
    /// session files. Structural, not content-based.
    pub fn is_intraday(&self) -> bool {
        self.normalized_name.split('/').count() == 3
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marker_is_stripped() {
        let f = EodFile::new(Path::new("/var/eod/import/ASCII/NYSE/NYSE_20180212.txt")).unwrap();
        assert_eq!(f.normalized_name, "NYSE/NYSE_20180212.txt");
        assert_eq!(f.file_name, "NYSE_20180212.txt");
    }

    #[test]
    fn missing_marker_is_fatal() {
        let err = EodFile::new(Path::new("/var/eod/import/NYSE/NYSE_20180212.txt")).unwrap_err();
        assert!(matches!(err, RecorderError::UnmarkedPath(_)));
    }

    #[test]
    fn exchange_prefixes_are_case_sensitive() {
        let f = EodFile::new(Path::new("ASCII/NYSE/NYSE_20180212.txt")).unwrap();
        assert_eq!(f.exchange_tag(), "NYSE");

        let f = EodFile::new(Path::new("ASCII/nyse/nyse_20180212.txt")).unwrap();
        assert_eq!(f.exchange_tag(), UNKNOWN_EXCHANGE);
    }

    #[test]
    fn tsxv_wins_over_tsx() {
        let f = EodFile::new(Path::new("ASCII/TSXV/TSXV_20180212.txt")).unwrap();
        assert_eq!(f.exchange_tag(), "TSXV");

        let f = EodFile::new(Path::new("ASCII/TSX/TSX_20180212.txt")).unwrap();
        assert_eq!(f.exchange_tag(), "TSX");
    }

    #[test]
    fn intraday_sits_one_level_deeper() {
        let session = EodFile::new(Path::new("ASCII/NYSE/NYSE_20180212.txt")).unwrap();
        assert!(!session.is_intraday());

        let intraday = EodFile::new(Path::new("ASCII/NYSE/5min/NYSE_20180212.txt")).unwrap();
        assert!(intraday.is_intraday());
    }

    #[test]
    fn categories_follow_file_name() {
        let f = EodFile::new(Path::new("ASCII/NYSE/names/ExchangeList.xml")).unwrap();
        assert_eq!(f.category(), FileCategory::ExchangeList);

        let f = EodFile::new(Path::new("ASCII/NYSE/names/SymbolList.xml")).unwrap();
        assert_eq!(f.category(), FileCategory::NameList);

        let f = EodFile::new(Path::new("ASCII/NYSE/NYSE_20180212.txt")).unwrap();
        assert_eq!(f.category(), FileCategory::Price);
    }

    #[test]
    fn reconstruction_round_trips() {
        let f = EodFile::from_normalized(Path::new("/var/eod/import"), "NYSE/NYSE_20180212.txt");
        assert_eq!(
            f.full_path,
            Path::new("/var/eod/import/ASCII/NYSE/NYSE_20180212.txt")
        );
        assert_eq!(f.exchange_tag(), "NYSE");
    }
}
