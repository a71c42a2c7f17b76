//! Tests for the builder session's connection state machine and the graph's
//! structural invariants.
mod common;
use common::*;
use weft::prelude::*;

#[test]
fn fresh_session_has_a_single_trigger() {
    let session = BuilderSession::new();
    assert_eq!(session.graph().nodes.len(), 1);
    assert!(session.graph().trigger().is_some());
    assert_eq!(session.state(), &ConnectionState::Idle);
}

#[test]
fn drag_to_canvas_creates_node_edge_and_dependency() {
    let (session, first, second) = session_with_chain();
    let graph = session.graph();

    assert!(graph.contains_edge("trigger", &first));
    assert!(graph.contains_edge(&first, &second));
    assert_eq!(session.state(), &ConnectionState::Idle);

    // The trigger is never recorded as a dependency; an action source is.
    let NodeKind::Action(config) = &graph.node(&first).unwrap().kind else {
        panic!("expected action");
    };
    assert!(config.depends_on.is_empty());
    let NodeKind::Action(config) = &graph.node(&second).unwrap().kind else {
        panic!("expected action");
    };
    assert_eq!(config.depends_on, vec![first.clone()]);
}

#[test]
fn new_node_lands_at_the_drop_position() {
    let mut session = BuilderSession::new();
    session.begin_connection("trigger", None).unwrap();
    session
        .release_on_canvas(Position::new(123.0, 456.0))
        .unwrap();
    let id = session.choose_node_type(NodeType::Action).unwrap();
    let node = session.graph().node(&id).unwrap();
    assert_eq!(node.position, Position::new(123.0, 456.0));
}

#[test]
fn moving_the_indicator_is_cosmetic() {
    let mut session = BuilderSession::new();
    session.begin_connection("trigger", None).unwrap();
    session.move_drop_indicator(Position::new(10.0, 20.0));
    let ConnectionState::Connecting { indicator, .. } = session.state() else {
        panic!("expected Connecting");
    };
    assert_eq!(*indicator, Position::new(10.0, 20.0));
    assert_eq!(session.graph().nodes.len(), 1);
    assert!(session.graph().edges.is_empty());
}

#[test]
fn cancel_discards_the_pending_connection() {
    let mut session = BuilderSession::new();
    session.begin_connection("trigger", None).unwrap();
    session.release_on_canvas(Position::default()).unwrap();
    session.cancel_choice();
    assert_eq!(session.state(), &ConnectionState::Idle);
    assert_eq!(session.graph().nodes.len(), 1);
    assert!(session.graph().edges.is_empty());
}

#[test]
fn chooser_excludes_condition_for_condition_sources() {
    let (mut session, first, _) = session_with_chain();
    session.begin_connection(&first, None).unwrap();
    session.release_on_canvas(Position::default()).unwrap();
    let condition = session.choose_node_type(NodeType::Condition).unwrap();

    session.begin_connection(&condition, None).unwrap();
    session.release_on_canvas(Position::default()).unwrap();
    assert_eq!(
        session.available_node_types(),
        vec![NodeType::Action, NodeType::SubDag]
    );

    // Selecting Condition anyway is rejected and leaves no orphan node.
    let node_count = session.graph().nodes.len();
    let result = session.choose_node_type(NodeType::Condition);
    assert!(matches!(result, Err(GraphError::ConditionToCondition { .. })));
    assert_eq!(session.graph().nodes.len(), node_count);
    assert_eq!(session.state(), &ConnectionState::Idle);
}

#[test]
fn condition_nodes_reject_a_second_incoming_edge() {
    let (mut session, first, second) = session_with_chain();
    session.begin_connection(&first, None).unwrap();
    session.release_on_canvas(Position::default()).unwrap();
    let condition = session.choose_node_type(NodeType::Condition).unwrap();

    session.begin_connection(&second, None).unwrap();
    let result = session.connect_to(&condition);
    assert!(matches!(result, Err(GraphError::ConditionFanIn { .. })));
    assert_eq!(session.state(), &ConnectionState::Idle);
}

#[test]
fn edges_into_the_trigger_are_rejected() {
    let (mut session, first, _) = session_with_chain();
    session.begin_connection(&first, None).unwrap();
    let result = session.connect_to("trigger");
    assert!(matches!(result, Err(GraphError::EdgeIntoTrigger { .. })));
}

#[test]
fn rejected_edges_name_both_endpoints() {
    let (mut session, first, second) = session_with_chain();
    let duplicate = session.add_edge(&first, &second, None).unwrap_err();
    let message = duplicate.to_string();
    assert!(message.contains(&first));
    assert!(message.contains(&second));

    session.begin_connection(&first, None).unwrap();
    let into_trigger = session.connect_to("trigger").unwrap_err();
    assert!(into_trigger.to_string().contains(&first));

    let missing = session.remove_edge(&second, &first).unwrap_err();
    let message = missing.to_string();
    assert!(message.contains(&second));
    assert!(message.contains(&first));
}

#[test]
fn sub_workflow_nodes_join_the_chain_like_actions() {
    let (mut session, first, _) = session_with_chain();
    assert!(session.available_node_types().contains(&NodeType::SubDag));

    session.begin_connection(&first, None).unwrap();
    session.release_on_canvas(Position::default()).unwrap();
    let sub_dag = session.choose_node_type(NodeType::SubDag).unwrap();

    let config = session.sub_dag_config_mut(&sub_dag).unwrap();
    assert!(!config.is_configured());
    config.name = "nightly".into();
    config.run = "etl".into();
    assert_eq!(config.depends_on, vec![first.clone()]);

    assert!(matches!(
        session.sub_dag_config_mut(&first),
        Err(GraphError::KindMismatch { .. })
    ));

    // Removing the edge drops the recorded dependency again.
    session.remove_edge(&first, &sub_dag).unwrap();
    let NodeKind::SubDag(config) = &session.graph().node(&sub_dag).unwrap().kind else {
        panic!("expected subdag");
    };
    assert!(config.depends_on.is_empty());
}

#[test]
fn duplicate_and_self_edges_are_rejected() {
    let (mut session, first, second) = session_with_chain();
    assert!(matches!(
        session.add_edge(&first, &second, None),
        Err(GraphError::DuplicateEdge { .. })
    ));
    assert!(matches!(
        session.add_edge(&first, &first, None),
        Err(GraphError::SelfLoop { .. })
    ));
}

#[test]
fn removing_an_edge_cleans_up_the_dependency() {
    let (mut session, first, second) = session_with_chain();
    session.remove_edge(&first, &second).unwrap();
    assert!(!session.graph().contains_edge(&first, &second));
    let NodeKind::Action(config) = &session.graph().node(&second).unwrap().kind else {
        panic!("expected action");
    };
    assert!(config.depends_on.is_empty());

    assert!(matches!(
        session.remove_edge(&first, &second),
        Err(GraphError::EdgeNotFound { .. })
    ));
}

#[test]
fn removing_a_condition_edge_drops_its_gate() {
    let (mut session, first, second) = session_with_chain();
    session.remove_edge(&first, &second).unwrap();

    session.begin_connection(&first, None).unwrap();
    session.release_on_canvas(Position::default()).unwrap();
    let condition = session.choose_node_type(NodeType::Condition).unwrap();
    session.add_edge(&condition, &second, None).unwrap();
    session
        .condition_config_mut(&condition)
        .unwrap()
        .next_nodes
        .insert(
            second.clone(),
            Precondition::new("$WEEKDAY", Some("Mon")),
        );

    session.remove_edge(&condition, &second).unwrap();
    let graph = session.graph();
    let NodeKind::Condition(config) = &graph.node(&condition).unwrap().kind else {
        panic!("expected condition");
    };
    assert!(config.next_nodes.is_empty());
}

#[test]
fn typed_accessors_reject_the_wrong_kind() {
    let (mut session, first, _) = session_with_chain();
    assert!(matches!(
        session.condition_config_mut(&first),
        Err(GraphError::KindMismatch { .. })
    ));
    assert!(matches!(
        session.action_config_mut("trigger"),
        Err(GraphError::KindMismatch { .. })
    ));
    assert!(matches!(
        session.action_config_mut("ghost"),
        Err(GraphError::NodeNotFound { .. })
    ));
    assert!(session.trigger_config_mut("trigger").is_ok());
}

#[test]
fn operations_outside_their_state_are_rejected() {
    let mut session = BuilderSession::new();
    assert!(matches!(
        session.connect_to("trigger"),
        Err(GraphError::InvalidState { .. })
    ));
    assert!(matches!(
        session.release_on_canvas(Position::default()),
        Err(GraphError::InvalidState { .. })
    ));
    assert!(matches!(
        session.choose_node_type(NodeType::Action),
        Err(GraphError::InvalidState { .. })
    ));

    session.begin_connection("trigger", None).unwrap();
    assert!(matches!(
        session.begin_connection("trigger", None),
        Err(GraphError::InvalidState { .. })
    ));
}

#[test]
fn session_over_an_imported_graph_keeps_ids_unique() {
    let imported = import_workflow(two_step_yaml()).expect("import failed");
    let mut session = BuilderSession::from_graph(imported.graph);
    session.begin_connection("step-2", None).unwrap();
    session.release_on_canvas(Position::default()).unwrap();
    let id = session.choose_node_type(NodeType::Action).unwrap();
    assert!(session.graph().node(&id).is_some());
    assert_ne!(id, "step-1");
    assert_ne!(id, "step-2");

    let graph = session.into_graph();
    assert_eq!(graph.nodes.len(), 4);
}
