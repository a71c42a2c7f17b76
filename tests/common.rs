//! Common test utilities for building workflow documents and graphs.
use weft::prelude::*;

/// The two-step document from the builder's smoke-test fixture:
/// `trigger -> a -> b`.
#[allow(dead_code)]
pub fn two_step_yaml() -> &'static str {
    r#"
steps:
  - name: a
    command: bash
    script: "echo hi"
  - name: b
    depends: a
    command: bash
    script: "echo bye"
"#
}

/// A step gated by a precondition on its dependency edge:
/// `trigger -> a -> condition -> b`.
#[allow(dead_code)]
pub fn precondition_yaml() -> &'static str {
    r#"
steps:
  - name: a
    command: bash
    script: "date"
  - name: b
    depends: a
    command: bash
    script: "echo weekday"
    preconditions:
      - condition: "$WEEKDAY"
        expected: "Mon"
"#
}

/// Builds `trigger -> first -> second` through the builder session, with both
/// actions fully configured.
#[allow(dead_code)]
pub fn session_with_chain() -> (BuilderSession, NodeId, NodeId) {
    let mut session = BuilderSession::new();

    session.begin_connection("trigger", None).unwrap();
    session
        .release_on_canvas(Position::new(400.0, 200.0))
        .unwrap();
    let first = session.choose_node_type(NodeType::Action).unwrap();
    let config = session.action_config_mut(&first).unwrap();
    config.name = "first".to_string();
    config.script = Some("echo first".to_string());

    session.begin_connection(&first, None).unwrap();
    session
        .release_on_canvas(Position::new(400.0, 350.0))
        .unwrap();
    let second = session.choose_node_type(NodeType::Action).unwrap();
    let config = session.action_config_mut(&second).unwrap();
    config.name = "second".to_string();
    config.script = Some("echo second".to_string());

    (session, first, second)
}

/// Parses exported YAML back into a generic value for assertions.
#[allow(dead_code)]
pub fn parse_yaml(yaml: &str) -> serde_yaml::Value {
    serde_yaml::from_str(yaml).expect("exported YAML must re-parse")
}

/// Finds a step mapping by name in a parsed document.
#[allow(dead_code)]
pub fn find_step<'a>(doc: &'a serde_yaml::Value, name: &str) -> &'a serde_yaml::Value {
    doc["steps"]
        .as_sequence()
        .expect("document must have steps")
        .iter()
        .find(|s| s["name"].as_str() == Some(name))
        .unwrap_or_else(|| panic!("step '{name}' not found"))
}
