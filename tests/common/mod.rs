#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use diesel::QueryableByName;
use diesel::prelude::*;
use diesel::sql_types::BigInt;
use tempfile::TempDir;

use eod_recorder::alert::{AlertLog, Notifier};
use eod_recorder::db::{connection, migrate};
use eod_recorder::records;

pub struct TestDb {
    _dir: TempDir, // keep alive for the life of the test
    pub path: String,
}

pub fn setup_db() -> (TestDb, SqliteConnection) {
    let dir = TempDir::new().expect("tempdir");
    let mut p = PathBuf::from(dir.path());
    p.push("test.db");
    let path = p.to_string_lossy().to_string();

    migrate::run_sqlite(&path).expect("migrations");

    let conn = connection::connect_sqlite(&path).expect("connect");
    (TestDb { _dir: dir, path }, conn)
}

/// Import tree rooted at `<tmpdir>/import`; deliveries go under `import/ASCII/`.
pub struct ImportTree {
    _dir: TempDir,
    pub root: PathBuf,
}

pub fn setup_import_tree() -> ImportTree {
    let dir = TempDir::new().expect("tempdir");
    let root = dir.path().join("import");
    fs::create_dir_all(root.join("ASCII")).expect("mkdir ASCII");
    ImportTree { _dir: dir, root }
}

impl ImportTree {
    /// Write one delivered file under the ASCII subtree, creating parents.
    pub fn deliver(&self, normalized: &str, contents: &str) -> PathBuf {
        let path = self.root.join("ASCII").join(normalized);
        fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
        fs::write(&path, contents).expect("write");
        path
    }
}

#[derive(QueryableByName)]
struct CountRow {
    #[diesel(sql_type = BigInt)]
    n: i64,
}

pub fn count(conn: &mut SqliteConnection, table: &str) -> i64 {
    let row: CountRow = diesel::sql_query(format!("SELECT COUNT(*) AS n FROM {table}"))
        .get_result(conn)
        .unwrap();
    row.n
}

pub fn count_where(conn: &mut SqliteConnection, table: &str, predicate: &str) -> i64 {
    let row: CountRow =
        diesel::sql_query(format!("SELECT COUNT(*) AS n FROM {table} WHERE {predicate}"))
            .get_result(conn)
            .unwrap();
    row.n
}

/// Notifier that drops everything; integration tests assert on table contents,
/// not on deliveries.
struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&self, _facility: &str, _level: i32, _message: &str) {}
}

/// Start a run and build its alert facade with notification disabled.
pub fn start_run(conn: &mut SqliteConnection) -> (i32, AlertLog) {
    let run_id = records::insert_run(conn, "test").expect("run_log insert");
    let alert = AlertLog::new(run_id, 0, Box::new(NullNotifier));
    (run_id, alert)
}

/// Convenience: discovery followed by the parser dispatch, like one CLI run.
pub fn full_run(conn: &mut SqliteConnection, import_dir: &Path) {
    let (run_id, alert) = start_run(conn);
    eod_recorder::discovery::run_discovery(conn, &alert, run_id, import_dir).expect("discovery");
    eod_recorder::parse::run_parsers(conn, &alert, run_id, import_dir).expect("parsers");
}
