//! End-to-end enrichment scenarios.

use crate::common::{enrich, generate_hosts_ndjson, TestContext, HOSTS_CSV};
use bytes::Bytes;
use cf_enrichment::{AddContextualData, ContextualDataConfig};
use cf_selector::SelectorConfig;
use cf_types::{LogMessage, PathOptions};

#[test]
fn test_host_scenario() {
    let ctx = TestContext::new();
    ctx.write("hosts.csv", HOSTS_CSV);

    let mut stage = ctx.stage("hosts.csv");
    stage.set_selector_template("record.host").unwrap();
    stage.initialize().unwrap();

    let first = enrich(&mut stage, &[("host", "host1"), ("msg", "login")]);
    assert_eq!(first.get_str("datacenter"), Some("dc1"));
    assert_eq!(first.get_str("owner"), Some("alice"));
    assert_eq!(first.get_str("msg"), Some("login"));

    let second = enrich(&mut stage, &[("host", "host2")]);
    assert_eq!(second.get_str("datacenter"), Some("dc2"));
    assert_eq!(second.get_str("owner"), Some("bob"));

    let other = enrich(&mut stage, &[("host", "host3")]);
    assert_eq!(other.len(), 1);

    let stats = stage.stats().snapshot();
    assert_eq!(stats.processed, 3);
    assert_eq!(stats.enriched, 2);
    assert_eq!(stats.unmatched, 1);
    assert_eq!(stats.fields_injected, 4);
}

#[test]
fn test_fallback_is_deterministic() {
    let ctx = TestContext::new();
    ctx.write("hosts.csv", HOSTS_CSV);

    let mut stage = ctx.stage("hosts.csv");
    stage.set_selector_template("record.host").unwrap();
    stage.set_default_selector("unknown");
    stage.initialize().unwrap();

    for host in ["host7", "", "HOST1"] {
        let msg = enrich(&mut stage, &[("host", host)]);
        assert_eq!(msg.get_str("datacenter"), Some("unassigned"), "host {host:?}");
        assert!(!msg.contains("owner"));
    }

    // A matching selector never falls back.
    let msg = enrich(&mut stage, &[("host", "host2")]);
    assert_eq!(msg.get_str("datacenter"), Some("dc2"));
    assert_eq!(stage.stats().default_hits(), 3);
}

#[test]
fn test_default_selector_without_records_is_noop() {
    let ctx = TestContext::new();
    ctx.write("hosts.csv", HOSTS_CSV);

    let mut stage = ctx.stage("hosts.csv");
    stage.set_selector_template("record.host").unwrap();
    stage.set_default_selector("missing");
    stage.initialize().unwrap();

    let msg = enrich(&mut stage, &[("host", "host9")]);
    assert_eq!(msg.len(), 1);
}

#[test]
fn test_last_record_wins() {
    let ctx = TestContext::new();
    ctx.write(
        "dup.csv",
        "S,field,first\nT,field,other\nS,field,second\nS,extra,x\n",
    );

    let mut stage = ctx.stage("dup.csv");
    stage.set_selector("S").unwrap();
    stage.initialize().unwrap();

    let msg = enrich(&mut stage, &[("field", "original")]);
    assert_eq!(msg.get_str("field"), Some("second"));
    assert_eq!(msg.get_str("extra"), Some("x"));
}

#[test]
fn test_prefix_on_every_field() {
    let ctx = TestContext::new();
    ctx.write("hosts.csv", HOSTS_CSV);

    let mut stage = ctx.stage("hosts.csv");
    stage.set_selector_template("record.host").unwrap();
    stage.set_prefix("meta.");
    stage.initialize().unwrap();

    let msg = enrich(&mut stage, &[("host", "host1")]);
    let names: Vec<&str> = msg.fields().map(|(name, _)| name).collect();
    assert_eq!(names, vec!["host", "meta.datacenter", "meta.owner"]);
}

#[test]
fn test_template_with_builtins() {
    let ctx = TestContext::new();
    ctx.write("hosts.csv", HOSTS_CSV);

    let mut stage = ctx.stage("hosts.csv");
    stage
        .set_selector_template(r#"to_lowercase(split_part(record.fqdn, ".", 0))"#)
        .unwrap();
    stage.initialize().unwrap();

    let msg = enrich(&mut stage, &[("fqdn", "HOST2.example.com")]);
    assert_eq!(msg.get_str("owner"), Some("bob"));
}

#[test]
fn test_ignore_case_lookup() {
    let ctx = TestContext::new();
    ctx.write("hosts.csv", "Host1,owner,alice\n");

    let config = ContextualDataConfig::new("hosts.csv")
        .with_selector(SelectorConfig::template("record.host"))
        .with_ignore_case(true);
    let mut stage = AddContextualData::from_config(&config, ctx.paths()).unwrap();
    stage.initialize().unwrap();

    for host in ["host1", "HOST1", "Host1"] {
        let msg = enrich(&mut stage, &[("host", host)]);
        assert_eq!(msg.get_str("owner"), Some("alice"));
    }
    assert_eq!(stage.context_db().ordered_selectors(), &["Host1"]);
}

#[test]
fn test_binary_values_survive() {
    let ctx = TestContext::new();
    ctx.write("bin.csv", b"S,raw,\"\x00\xff\x00\"\n");

    let mut stage = ctx.stage("bin.csv");
    stage.set_selector("S").unwrap();
    stage.initialize().unwrap();

    let msg = enrich(&mut stage, &[]);
    assert_eq!(msg.get_value("raw"), Some(&Bytes::from_static(b"\x00\xff\x00")));
}

#[test]
fn test_ndjson_database() {
    let ctx = TestContext::new();
    ctx.write("racks.jsonl", generate_hosts_ndjson(100));

    let mut stage = ctx.stage("racks.jsonl");
    stage.set_selector_template("record.host").unwrap();
    stage.initialize().unwrap();

    assert_eq!(stage.context_db().len(), 100);
    let msg = enrich(&mut stage, &[("host", "host42")]);
    assert_eq!(msg.get_str("rack"), Some("42"));
}

#[test]
fn test_json_event_round_trip() {
    let ctx = TestContext::new();
    ctx.write("hosts.csv", HOSTS_CSV);

    let mut stage = ctx.stage("hosts.csv");
    stage.set_selector_template("record.host").unwrap();
    stage.initialize().unwrap();

    let mut msg = LogMessage::from_json_str(r#"{"host":"host1","pid":42}"#).unwrap();
    stage.process(&mut msg, &PathOptions::default());

    let json = msg.to_json_value();
    assert_eq!(json["owner"], "alice");
    assert_eq!(json["pid"], "42");
}
