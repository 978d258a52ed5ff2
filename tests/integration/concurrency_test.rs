//! Sharing and concurrency of cloned stages.

use crate::common::{generate_hosts_ndjson, message, TestContext, HOSTS_CSV};
use cf_enrichment::{AddContextualData, StatsSnapshot};
use cf_traits::LogParser;
use cf_types::{LogMessage, PathOptions};
use std::fs;
use std::thread;

fn events(count: usize) -> Vec<LogMessage> {
    (0..count)
        .map(|i| {
            let host = format!("host{}", i % 250);
            let seq = i.to_string();
            message(&[("host", host.as_str()), ("seq", seq.as_str())])
        })
        .collect()
}

#[test]
fn test_clones_share_one_load() {
    let ctx = TestContext::new();
    let path = ctx.write("hosts.csv", HOSTS_CSV);

    let mut stage = ctx.stage("hosts.csv");
    stage.set_selector_template("record.host").unwrap();
    stage.initialize().unwrap();

    // Later initializations must not touch the file again.
    fs::remove_file(path).unwrap();

    let mut clones: Vec<AddContextualData> = (0..4).map(|_| stage.clone()).collect();
    for clone in &mut clones {
        clone.initialize().unwrap();
        assert!(clone.context_db().ptr_eq(stage.context_db()));
    }
    assert_eq!(stage.context_db().ref_count(), 5);

    clones.truncate(1);
    assert_eq!(stage.context_db().ref_count(), 2);

    drop(stage);
    assert_eq!(clones[0].context_db().ref_count(), 1);

    let msg = crate::common::enrich(&mut clones[0], &[("host", "host1")]);
    assert_eq!(msg.get_str("owner"), Some("alice"));
}

#[test]
fn test_reinitialize_does_not_reload() {
    let ctx = TestContext::new();
    ctx.write("hosts.csv", HOSTS_CSV);

    let mut stage = ctx.stage("hosts.csv");
    stage.initialize().unwrap();
    let before = stage.context_db().ordered_selectors().to_vec();

    ctx.write("hosts.csv", "host9,owner,zoe\n");
    stage.initialize().unwrap();

    assert_eq!(stage.context_db().ordered_selectors(), before.as_slice());
    assert!(!stage.context_db().contains("host9"));
}

#[test]
fn test_independent_loads_are_identical() {
    let ctx = TestContext::new();
    ctx.write(
        "hosts.csv",
        "host2,owner,bob\nhost1,owner,alice\nhost2,rack,r7\nhost3,owner,carol\nhost1,owner,alina\n",
    );

    let mut first = ctx.stage("hosts.csv");
    let mut second = ctx.stage("hosts.csv");
    first.initialize().unwrap();
    second.initialize().unwrap();

    let a = first.context_db();
    let b = second.context_db();
    assert!(!a.ptr_eq(b));
    assert_eq!(a.ordered_selectors(), &["host2", "host1", "host3"]);
    assert_eq!(a.ordered_selectors(), b.ordered_selectors());

    for selector in a.ordered_selectors() {
        assert_eq!(a.records(selector), b.records(selector), "selector {selector}");
    }

    let owners: Vec<&[u8]> = a.records("host1").iter().map(|r| r.value().as_ref()).collect();
    assert_eq!(owners, vec![&b"alice"[..], &b"alina"[..]]);
}

#[test]
fn test_parallel_clones_match_sequential() {
    let ctx = TestContext::new();
    ctx.write("racks.ndjson", generate_hosts_ndjson(200));

    let mut stage = ctx.stage("racks.ndjson");
    stage.set_selector_template("record.host").unwrap();
    stage.set_prefix("ctx.");
    stage.initialize().unwrap();

    let mut expected = events(1000);
    let mut sequential = stage.clone();
    sequential.initialize().unwrap();
    for msg in &mut expected {
        sequential.process(msg, &PathOptions::default());
    }

    let mut actual = events(1000);
    let mut total = StatsSnapshot::default();
    thread::scope(|s| {
        let handles: Vec<_> = actual
            .chunks_mut(128)
            .map(|chunk| {
                let mut worker = stage.clone();
                s.spawn(move || {
                    worker.initialize().unwrap();
                    for msg in chunk {
                        worker.process(msg, &PathOptions::default());
                    }
                    worker.stats().snapshot()
                })
            })
            .collect();

        for handle in handles {
            total += handle.join().unwrap();
        }
    });

    assert_eq!(actual, expected);
    assert_eq!(total.processed, 1000);
    assert_eq!(total.enriched, 800);
    assert_eq!(total.unmatched, 200);
    assert_eq!(stage.context_db().ref_count(), 2);
}

#[test]
fn test_boxed_parsers_across_threads() {
    let ctx = TestContext::new();
    ctx.write("hosts.csv", HOSTS_CSV);

    let mut stage = ctx.stage("hosts.csv");
    stage.set_selector_template("record.host").unwrap();
    stage.set_default_selector("unknown");
    LogParser::init(&mut stage).unwrap();

    let workers: Vec<Box<dyn LogParser>> = (0..3).map(|_| stage.clone_parser()).collect();

    let results: Vec<Option<String>> = thread::scope(|s| {
        let handles: Vec<_> = workers
            .into_iter()
            .zip(["host1", "host2", "nowhere"])
            .map(|(mut worker, host)| {
                s.spawn(move || {
                    worker.init().unwrap();
                    let mut msg = message(&[("host", host)]);
                    assert!(worker.process(&mut msg, &PathOptions::default()));
                    msg.get_str("datacenter").map(str::to_string)
                })
            })
            .collect();

        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(
        results,
        vec![
            Some("dc1".to_string()),
            Some("dc2".to_string()),
            Some("unassigned".to_string()),
        ]
    );
}

#[test]
fn test_concurrent_first_load() {
    let ctx = TestContext::new();
    ctx.write("hosts.csv", HOSTS_CSV);

    let stage = ctx.stage("hosts.csv");

    thread::scope(|s| {
        for _ in 0..4 {
            let mut worker = stage.clone();
            s.spawn(move || {
                worker.initialize().unwrap();
                assert!(worker.context_db().contains("host2"));
            });
        }
    });

    assert!(stage.context_db().is_loaded());
    assert_eq!(stage.context_db().len(), 5);
}
