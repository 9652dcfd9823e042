mod common;
use common::{count, count_where, setup_db, setup_import_tree, start_run};

use std::path::Path;

use eod_recorder::discovery::run_discovery;
use eod_recorder::error::RecorderError;

#[test]
fn fresh_files_are_staged_and_reruns_are_silent() {
    let (_db, mut conn) = setup_db();
    let tree = setup_import_tree();
    tree.deliver("NYSE/ExchangeList.xml", "<ArrayOfEXCHANGE/>");
    tree.deliver("NYSE/NYSE_20180212.txt", "AAPL,20180212,1,2,0.5,1.5,100\n");

    let (run_id, alert) = start_run(&mut conn);
    let stats = run_discovery(&mut conn, &alert, run_id, &tree.root).expect("walk");
    assert_eq!(stats.total_files, 2);
    assert_eq!(stats.fresh_files, 2);
    assert_eq!(stats.updated_files, 0);
    assert_eq!(count(&mut conn, "file_stat"), 2);
    assert_eq!(count(&mut conn, "load_log"), 2);
    assert_eq!(count(&mut conn, "load_log_summary"), 1);

    // Unchanged tree: nothing staged, but the summary row is still written.
    let (run2, alert2) = start_run(&mut conn);
    let stats2 = run_discovery(&mut conn, &alert2, run2, &tree.root).expect("rewalk");
    assert_eq!(stats2.total_files, 2);
    assert_eq!(stats2.fresh_files, 0);
    assert_eq!(stats2.updated_files, 0);
    assert_eq!(count(&mut conn, "file_stat"), 2);
    assert_eq!(count(&mut conn, "load_log"), 2);
    assert_eq!(count(&mut conn, "load_log_summary"), 2);
}

#[test]
fn changed_size_stages_an_update() {
    let (_db, mut conn) = setup_db();
    let tree = setup_import_tree();
    tree.deliver("NYSE/NYSE_20180212.txt", "AAPL,20180212,1,2,0.5,1.5,100\n");

    let (run_id, alert) = start_run(&mut conn);
    run_discovery(&mut conn, &alert, run_id, &tree.root).expect("walk");

    tree.deliver(
        "NYSE/NYSE_20180212.txt",
        "AAPL,20180212,1,2,0.5,1.5,100\nMSFT,20180212,3,4,2.5,3.5,200\n",
    );

    let (run2, alert2) = start_run(&mut conn);
    let stats = run_discovery(&mut conn, &alert2, run2, &tree.root).expect("rewalk");
    assert_eq!(stats.fresh_files, 0);
    assert_eq!(stats.updated_files, 1);

    // Same file_stat row, rewritten in place; one more staged entry.
    assert_eq!(count(&mut conn, "file_stat"), 1);
    assert_eq!(
        count_where(&mut conn, "file_stat", &format!("update_run_id = {run2}")),
        1
    );
    assert_eq!(count(&mut conn, "load_log"), 2);
}

#[test]
fn changed_content_at_same_size_stages_an_update() {
    let (_db, mut conn) = setup_db();
    let tree = setup_import_tree();
    tree.deliver("NYSE/NYSE_20180212.txt", "AAPL,20180212,1,2,0.5,1.5,100\n");

    let (run_id, alert) = start_run(&mut conn);
    run_discovery(&mut conn, &alert, run_id, &tree.root).expect("walk");

    // Same byte length, different digest.
    tree.deliver("NYSE/NYSE_20180212.txt", "AAPL,20180212,1,2,0.5,1.5,101\n");

    let (run2, alert2) = start_run(&mut conn);
    let stats = run_discovery(&mut conn, &alert2, run2, &tree.root).expect("rewalk");
    assert_eq!(stats.updated_files, 1);
}

#[test]
fn zero_length_files_are_skipped() {
    let (_db, mut conn) = setup_db();
    let tree = setup_import_tree();
    tree.deliver("NYSE/NYSE_20180212.txt", "");

    let (run_id, alert) = start_run(&mut conn);
    let stats = run_discovery(&mut conn, &alert, run_id, &tree.root).expect("walk");
    assert_eq!(stats.total_files, 1);
    assert_eq!(stats.fresh_files, 0);
    assert_eq!(count(&mut conn, "file_stat"), 0);
    assert_eq!(count(&mut conn, "load_log"), 0);
}

#[test]
fn missing_import_root_is_fatal() {
    let (_db, mut conn) = setup_db();
    let (run_id, alert) = start_run(&mut conn);

    let err = run_discovery(&mut conn, &alert, run_id, Path::new("/no/such/root")).unwrap_err();
    assert!(matches!(err, RecorderError::MissingImportRoot(_)));
    assert_eq!(count(&mut conn, "load_log_summary"), 0);
}

#[test]
fn fatal_failure_still_emits_a_final_alert() {
    let (_db, mut conn) = setup_db();
    let (run_id, alert) = start_run(&mut conn);

    let err = run_discovery(&mut conn, &alert, run_id, Path::new("/no/such/root")).unwrap_err();
    alert
        .write_fatal(&mut conn, "loader", &format!("discovery failed: {err}"))
        .unwrap();

    // The failure lands as a warning and the run still closes with a stop
    // marker, even though the walk never started.
    assert_eq!(
        count_where(
            &mut conn,
            "application_log",
            "level = 4 AND event LIKE '%missing import directory%'",
        ),
        1
    );
    assert_eq!(
        count_where(&mut conn, "application_log", "level = 6 AND event = 'stop'"),
        1
    );
}

#[test]
fn unmarked_path_aborts_and_rolls_back_the_walk() {
    let (_db, mut conn) = setup_db();
    let tree = setup_import_tree();
    tree.deliver("NYSE/NYSE_20180212.txt", "AAPL,20180212,1,2,0.5,1.5,100\n");
    // Stray file outside the ASCII subtree.
    std::fs::write(tree.root.join("stray.txt"), "junk").unwrap();

    let (run_id, alert) = start_run(&mut conn);
    let err = run_discovery(&mut conn, &alert, run_id, &tree.root).unwrap_err();
    assert!(matches!(err, RecorderError::UnmarkedPath(_)));

    // The whole walk rolled back: nothing staged, no summary.
    assert_eq!(count(&mut conn, "file_stat"), 0);
    assert_eq!(count(&mut conn, "load_log"), 0);
    assert_eq!(count(&mut conn, "load_log_summary"), 0);
}
