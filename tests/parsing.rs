//! End-to-end tests against the public API: parsing from streams and
//! files, serde round trips, and path queries over the parsed tree.

use blockconf::{parse, parse_file, parse_str, Argument, Directives, ParseError};

const CLUSTER: &str = "node {\n    role \"one\"\n    role \"two\"\n}\nnode {\n    role \"three\"\n}\n";

#[test]
fn parse_reads_from_any_stream() {
    let bytes: &[u8] = b"listen 0.0.0.0:8080 reuseport\n";
    let config = parse(bytes).unwrap();

    assert_eq!(config.len(), 1);
    assert_eq!(config[0].name, "listen");
    assert_eq!(
        config[0].arguments,
        vec![Argument::from("0.0.0.0:8080"), Argument::from("reuseport")]
    );
}

#[test]
fn parse_file_round_trip() {
    let mut path = std::env::temp_dir();
    path.push(format!("blockconf-test-{}.conf", std::process::id()));
    std::fs::write(&path, CLUSTER).unwrap();

    let from_file = parse_file(&path);
    std::fs::remove_file(&path).unwrap();

    assert_eq!(from_file.unwrap(), parse_str(CLUSTER).unwrap());
}

#[test]
fn multibyte_arguments_survive_the_pipeline() {
    let config = parse_str("greeting \"grüß götter\" übermorgen\n").unwrap();

    assert_eq!(config[0].arguments[0], "grüß götter");
    assert_eq!(config[0].arguments[1], "übermorgen");
}

#[test]
fn serde_round_trip_preserves_the_tree() {
    let config = parse_str(CLUSTER).unwrap();

    let json = serde_json::to_string(&config).unwrap();
    let back: Directives = serde_json::from_str(&json).unwrap();

    assert_eq!(back, config);
}

#[test]
fn all_matches_unions_across_repeated_blocks() {
    let config = parse_str(CLUSTER).unwrap();

    let roles = config.all_matches(&["node", "role"]);
    let values: Vec<&str> = roles.iter().map(|d| &*d.arguments[0]).collect();
    assert_eq!(values, ["one", "two", "three"]);
}

#[test]
fn first_match_descends_via_first_occurrence() {
    let config = parse_str(CLUSTER).unwrap();

    let role = config.first_match(&["node", "role"]).unwrap();
    assert_eq!(role.arguments[0], "one");

    assert!(config.first_match(&[]).is_none());
    assert!(config.first_match(&["node", "zone"]).is_none());
}

#[test]
fn structural_errors_abort_without_a_tree() {
    let err = parse_str("node {\n    role \"one\"\n").unwrap_err();
    assert!(matches!(err, ParseError::MissingClosingBrace));

    let err = parse_str("} node\n").unwrap_err();
    assert!(matches!(err, ParseError::Unexpected { .. }));
}

#[test]
fn comments_and_blank_lines_are_ignored() {
    let config = parse_str(
        "# cluster layout\n\nnode { # primary\n    role \"one\"\n}\n# trailing\n",
    )
    .unwrap();

    assert_eq!(config.len(), 1);
    assert_eq!(config[0].subdirectives.len(), 1);
}
