//! Initialization failures.

use crate::common::{TestContext, HOSTS_CSV};
use cf_enrichment::{AddContextualData, ContextualDataConfig};
use cf_error::{CfError, ImportError, InitError, ScannerError, SelectorError};
use cf_selector::SelectorConfig;
use cf_traits::LogParser;
use cf_types::InstallPaths;

#[test]
fn test_missing_database_file() {
    let mut stage = AddContextualData::new(InstallPaths::default());
    stage.set_selector("host1").unwrap();

    let err = stage.initialize().unwrap_err();
    assert!(matches!(err, InitError::MissingDatabaseFile));
    assert_eq!(err.kind(), "missing_database_file");
}

#[test]
fn test_unknown_file_type() {
    let ctx = TestContext::new();
    ctx.write("hosts.txt", HOSTS_CSV);

    let mut stage = ctx.stage("hosts.txt");
    let err = stage.initialize().unwrap_err();

    assert_eq!(err.kind(), "unknown_file_type");
    assert!(!stage.context_db().is_loaded());
}

#[test]
fn test_relative_path_resolved_against_sysconfdir() {
    let ctx = TestContext::new();
    ctx.write("hosts.csv", HOSTS_CSV);

    let mut elsewhere = AddContextualData::new(InstallPaths::new(ctx.dir.path().join("missing")));
    elsewhere.set_filename("hosts.csv");
    let err = elsewhere.initialize().unwrap_err();
    match err {
        InitError::FileOpen { path, .. } => assert!(path.ends_with("missing/hosts.csv")),
        other => panic!("unexpected error: {other}"),
    }

    let mut stage = ctx.stage("hosts.csv");
    stage.initialize().unwrap();
    assert!(stage.context_db().contains("host1"));
}

#[test]
fn test_malformed_csv_leaves_database_unloaded() {
    let ctx = TestContext::new();
    ctx.write("bad.csv", "host1,owner,alice\nhost2,owner,bob,extra\n");

    let mut stage = ctx.stage("bad.csv");
    let err = stage.initialize().unwrap_err();

    match err {
        InitError::Parse {
            filename,
            source: ImportError::Scan(scan),
        } => {
            assert!(filename.ends_with("bad.csv"));
            assert_eq!(scan.line(), Some(2));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(!stage.context_db().is_loaded());
    assert!(!stage.context_db().contains("host1"));
    assert!(!stage.is_initialized());
}

#[test]
fn test_malformed_ndjson() {
    let ctx = TestContext::new();
    ctx.write(
        "bad.ndjson",
        "{\"selector\":\"a\",\"name\":\"n\",\"value\":\"v\"}\n{\"selector\":\"b\"}\n",
    );

    let mut stage = ctx.stage("bad.ndjson");
    let err = stage.initialize().unwrap_err();

    assert!(matches!(
        err,
        InitError::Parse {
            source: ImportError::Scan(ScannerError::Json { line: 2, .. }),
            ..
        }
    ));
}

#[test]
fn test_failed_init_can_be_retried_after_fix() {
    let ctx = TestContext::new();
    let mut stage = ctx.stage("hosts.csv");

    assert!(matches!(stage.initialize(), Err(InitError::FileOpen { .. })));

    ctx.write("hosts.csv", HOSTS_CSV);
    stage.initialize().unwrap();
    assert!(stage.is_initialized());
}

#[test]
fn test_bad_selectors_rejected_at_configuration() {
    let ctx = TestContext::new();
    let mut stage = ctx.stage("hosts.csv");

    assert_eq!(stage.set_selector(""), Err(SelectorError::Empty));
    assert!(matches!(
        stage.set_selector_template("record.host +"),
        Err(SelectorError::Compilation(_))
    ));

    let config = ContextualDataConfig::new("hosts.csv")
        .with_selector(SelectorConfig::template("   "));
    assert!(matches!(
        AddContextualData::from_config(&config, ctx.paths()),
        Err(CfError::Selector(SelectorError::Empty))
    ));
}

#[test]
fn test_log_parser_init_wraps_error() {
    let mut stage = AddContextualData::new(InstallPaths::default());
    let err = LogParser::init(&mut stage).unwrap_err();

    assert!(matches!(err, CfError::Init(InitError::MissingDatabaseFile)));
}
