//! Integration tests for the generator core
//!
//! These tests drive a policy through the full preparation pipeline the way
//! a platform renderer would: construct a generator (running the keyword
//! gate), then normalize ICMP types, fix high ports, and fit term names
//! before emission. One policy is prepared for multiple platforms to verify
//! that per-platform fix-ups never leak into the shared term objects.

use std::borrow::Cow;

use aclforge::normalize::{self, IcmpMatch};
use aclforge::{Error, Filter, Generator, Header, Platform, Policy, PortRange, Term};

fn init_tracing() {
    // ignore the error when a second test initializes the subscriber
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

/// Builds a small dual-platform edge policy used across the tests.
fn edge_policy() -> Policy {
    let mut allow_web = Term::new("allow-web");
    allow_web.protocol = vec!["tcp".to_string()];
    allow_web.destination_port = vec![PortRange::single(80), PortRange::single(443)];
    allow_web.action = vec!["accept".to_string()];

    let mut return_traffic = Term::new("allow-established-replies");
    return_traffic.protocol = vec!["tcp".to_string(), "udp".to_string()];
    return_traffic.option = vec!["established".to_string()];
    return_traffic.destination_port = vec![PortRange::new(1023, 1030)];
    return_traffic.action = vec!["accept".to_string()];

    let mut ping = Term::new("allow-ping");
    ping.protocol = vec!["icmp".to_string()];
    ping.icmp_type = vec!["echo-request".to_string(), "echo-reply".to_string()];
    ping.action = vec!["accept".to_string()];

    let mut juniper_only = Term::new("juniper-counted");
    juniper_only.platform = vec!["juniper".to_string()];
    juniper_only
        .extra
        .insert("counter".to_string(), "web-hits".to_string());
    juniper_only.action = vec!["accept".to_string()];

    Policy::new(vec![Filter {
        header: Header::new(
            "edge-inbound",
            vec!["cisco".to_string(), "juniper".to_string()],
        ),
        terms: vec![allow_web, return_traffic, ping, juniper_only],
    }])
}

#[test]
fn test_same_policy_builds_for_both_platforms() {
    init_tracing();
    let cisco = Generator::new(edge_policy(), Platform::new("cisco"));
    assert!(cisco.is_ok());

    let juniper = Generator::new(
        edge_policy(),
        Platform::new("juniper").with_optional_keywords(["counter"]),
    );
    assert!(juniper.is_ok());
}

#[test]
fn test_platform_gated_term_only_validated_where_active() {
    init_tracing();
    // "juniper-counted" uses the counter keyword: cisco does not support it,
    // but the term's allow-list keeps it off cisco entirely
    assert!(Generator::new(edge_policy(), Platform::new("cisco")).is_ok());

    // a plain juniper descriptor without the optional keyword must refuse it
    let err = Generator::new(edge_policy(), Platform::new("juniper")).unwrap_err();
    match err {
        Error::UnsupportedFilter { reason, term, .. } => {
            assert_eq!(term, "juniper-counted");
            assert!(reason.contains("counter"));
        }
        other => panic!("expected UnsupportedFilter, got {other:?}"),
    }
}

#[test]
fn test_render_pass_for_two_platforms_shares_terms() {
    init_tracing();
    let policy = edge_policy();
    let stateless = Generator::new(policy.clone(), Platform::new("cisco")).unwrap();
    let stateful = Generator::new(
        policy,
        Platform::new("srx")
            .with_optional_keywords(["counter"])
            .with_all_protocols_stateful(true),
    )
    .unwrap();

    let term = &stateless.policy().filters[0].terms[1]; // allow-established-replies
    let fixed = stateless.fix_high_ports(term, "inet").unwrap();
    assert_eq!(fixed.destination_port, vec![PortRange::new(1023, 65535)]);

    // the shared term object still carries the authored ports, so the
    // stateful platform sees the original, unfixed list
    let term = &stateful.policy().filters[0].terms[1];
    let fixed = stateful.fix_high_ports(term, "inet").unwrap();
    assert!(matches!(fixed, Cow::Owned(_)));
    assert_eq!(term.destination_port, vec![PortRange::new(1023, 1030)]);
}

#[test]
fn test_full_term_preparation_flow() {
    init_tracing();
    let generator = Generator::new(edge_policy(), Platform::new("cisco")).unwrap();
    let ping = generator.policy().filters[0].terms[2].clone();

    let icmp = normalize::normalize_icmp_types(
        &ping.icmp_type,
        &ping.protocol,
        &"inet".into(),
        &ping.name,
    )
    .unwrap();
    assert_eq!(icmp, IcmpMatch::Types(vec![0, 8]));

    let fixed = generator.fix_high_ports(&ping, "inet").unwrap();
    assert!(matches!(fixed, Cow::Borrowed(_)));

    let name = generator.fix_term_length(&fixed.name, true, false).unwrap();
    assert_eq!(name, "allow-ping");
}

#[test]
fn test_ping_term_rejected_for_inet6() {
    init_tracing();
    let generator = Generator::new(edge_policy(), Platform::new("cisco")).unwrap();
    let ping = &generator.policy().filters[0].terms[2];

    let err = normalize::normalize_icmp_types(
        &ping.icmp_type,
        &ping.protocol,
        &"inet6".into(),
        &ping.name,
    )
    .unwrap_err();
    assert!(matches!(err, Error::MismatchIcmpInet { .. }));
}

#[test]
fn test_long_term_name_fitted_per_platform_limit() {
    init_tracing();
    let mut term = Term::new("global-internet-customer-service-router-established-replies-filter");
    term.protocol = vec!["tcp".to_string()];
    term.action = vec!["accept".to_string()];
    let policy = Policy::new(vec![Filter {
        header: Header::new("edge", vec!["tight".to_string()]),
        terms: vec![term],
    }]);

    let generator = Generator::new(
        policy,
        Platform::new("tight").with_term_max_length(40),
    )
    .unwrap();
    let name = &generator.policy().filters[0].terms[0].name;

    let fitted = generator.fix_term_length(name, true, true).unwrap();
    assert!(fitted.len() <= 40);
    // abbreviation alone got it under the limit, no truncation artifacts
    assert!(fitted.contains("GBL"));

    // with both strategies disabled the same name is a hard error
    let err = generator.fix_term_length(name, false, false).unwrap_err();
    assert!(matches!(err, Error::TermNameTooLong { .. }));
}

#[test]
fn test_policy_fixture_from_json() {
    init_tracing();
    let fixture = r#"{
        "filters": [{
            "header": { "name": "edge-inbound", "platforms": ["cisco"] },
            "terms": [{
                "name": "allow-dns",
                "protocol": ["udp"],
                "destination_address": ["10.0.0.0/8"],
                "destination_port": [{ "start": 53, "end": 53 }],
                "action": ["accept"]
            }]
        }]
    }"#;
    let policy: Policy = serde_json::from_str(fixture).unwrap();

    let generator = Generator::new(policy, Platform::new("cisco")).unwrap();
    let term = &generator.policy().filters[0].terms[0];
    assert_eq!(term.name, "allow-dns");
    assert_eq!(term.destination_port, vec![PortRange::single(53)]);

    let fixed = generator.fix_high_ports(term, "inet").unwrap();
    assert!(matches!(fixed, Cow::Borrowed(_)));
}

#[test]
fn test_duplicate_term_names_fail_construction() {
    init_tracing();
    let policy = Policy::new(vec![Filter {
        header: Header::new("edge", vec!["cisco".to_string()]),
        terms: vec![Term::new("dup"), Term::new("dup")],
    }]);

    let err = Generator::new(policy, Platform::new("cisco")).unwrap_err();
    assert_eq!(
        err,
        Error::DuplicateTermName {
            term: "dup".to_string(),
            filter: "edge".to_string(),
        }
    );
}
