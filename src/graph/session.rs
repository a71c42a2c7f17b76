use serde::{Deserialize, Serialize};

use crate::error::GraphError;
use crate::graph::{
    ActionConfig, ConditionConfig, GraphEdge, GraphNode, NodeId, NodeKind, NodeType, Position,
    SubDagConfig, TriggerConfig, WorkflowGraph,
};

/// State of the drag-and-connect interaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ConnectionState {
    Idle,
    /// A drag started from `source`'s output port; `indicator` is the current
    /// cosmetic drop-indicator position.
    Connecting {
        source: NodeId,
        source_handle: Option<String>,
        indicator: Position,
    },
    /// The drag was released over empty canvas; a node-type choice is pending.
    PendingChoice {
        source: NodeId,
        source_handle: Option<String>,
        drop_position: Position,
    },
}

/// One editing session of the visual workflow builder.
///
/// The session owns the graph exclusively and mutates it synchronously in
/// response to interaction events. A fresh session starts with a single
/// trigger node; hydrating from YAML goes through
/// [`crate::codec::import_workflow`] and [`BuilderSession::from_graph`].
#[derive(Debug, Clone)]
pub struct BuilderSession {
    graph: WorkflowGraph,
    state: ConnectionState,
    next_seq: u64,
}

impl Default for BuilderSession {
    fn default() -> Self {
        Self::new()
    }
}

impl BuilderSession {
    /// Creates a session over a fresh graph containing only a trigger node.
    pub fn new() -> Self {
        let mut graph = WorkflowGraph::new();
        graph.add_node(GraphNode::new(
            "trigger",
            Position::new(crate::codec::layout::BASE_X, crate::codec::layout::BASE_Y),
            NodeKind::Trigger(TriggerConfig::default()),
        ));
        Self {
            graph,
            state: ConnectionState::Idle,
            next_seq: 1,
        }
    }

    /// Wraps an existing graph, typically one produced by the importer.
    pub fn from_graph(graph: WorkflowGraph) -> Self {
        let next_seq = graph.nodes.len() as u64 + 1;
        Self {
            graph,
            state: ConnectionState::Idle,
            next_seq,
        }
    }

    pub fn graph(&self) -> &WorkflowGraph {
        &self.graph
    }

    pub fn into_graph(self) -> WorkflowGraph {
        self.graph
    }

    pub fn state(&self) -> &ConnectionState {
        &self.state
    }

    /// Drag-start from a node's output port: `Idle` -> `Connecting`.
    pub fn begin_connection(
        &mut self,
        source: &str,
        source_handle: Option<&str>,
    ) -> Result<(), GraphError> {
        if self.state != ConnectionState::Idle {
            return Err(GraphError::InvalidState {
                operation: "begin_connection",
            });
        }
        let node = self
            .graph
            .node(source)
            .ok_or_else(|| GraphError::NodeNotFound {
                node_id: source.to_string(),
            })?;
        self.state = ConnectionState::Connecting {
            source: node.id.clone(),
            source_handle: source_handle.map(str::to_string),
            indicator: node.position,
        };
        Ok(())
    }

    /// Pointer movement while connecting. Only moves the drop indicator;
    /// a no-op in any other state.
    pub fn move_drop_indicator(&mut self, position: Position) {
        if let ConnectionState::Connecting { indicator, .. } = &mut self.state {
            *indicator = position;
        }
    }

    /// Release over an existing node's input port: creates the edge and
    /// returns to `Idle`. The connection attempt is consumed even on failure.
    pub fn connect_to(&mut self, target: &str) -> Result<(), GraphError> {
        let ConnectionState::Connecting {
            source,
            source_handle,
            ..
        } = std::mem::replace(&mut self.state, ConnectionState::Idle)
        else {
            return Err(GraphError::InvalidState {
                operation: "connect_to",
            });
        };
        self.link(&source, target, source_handle)
    }

    /// Release over empty canvas: `Connecting` -> `PendingChoice`.
    pub fn release_on_canvas(&mut self, position: Position) -> Result<(), GraphError> {
        let ConnectionState::Connecting {
            source,
            source_handle,
            ..
        } = std::mem::replace(&mut self.state, ConnectionState::Idle)
        else {
            return Err(GraphError::InvalidState {
                operation: "release_on_canvas",
            });
        };
        self.state = ConnectionState::PendingChoice {
            source,
            source_handle,
            drop_position: position,
        };
        Ok(())
    }

    /// Node types offered by the chooser for the pending connection. A
    /// condition source excludes the Condition option, so a
    /// condition-to-condition edge can never be selected.
    pub fn available_node_types(&self) -> Vec<NodeType> {
        let from_condition = match &self.state {
            ConnectionState::PendingChoice { source, .. }
            | ConnectionState::Connecting { source, .. } => self
                .graph
                .node(source)
                .is_some_and(GraphNode::is_condition),
            ConnectionState::Idle => false,
        };
        if from_condition {
            vec![NodeType::Action, NodeType::SubDag]
        } else {
            vec![NodeType::Action, NodeType::Condition, NodeType::SubDag]
        }
    }

    /// Chooser selection: instantiates a defaulted node of the chosen type at
    /// the drop position, connects it, records the dependency (unless the
    /// source is the trigger node) and returns to `Idle`.
    pub fn choose_node_type(&mut self, node_type: NodeType) -> Result<NodeId, GraphError> {
        let ConnectionState::PendingChoice {
            source,
            source_handle,
            drop_position,
        } = std::mem::replace(&mut self.state, ConnectionState::Idle)
        else {
            return Err(GraphError::InvalidState {
                operation: "choose_node_type",
            });
        };

        let kind = match node_type {
            NodeType::Action => NodeKind::Action(ActionConfig::default()),
            NodeType::Condition => NodeKind::Condition(ConditionConfig::default()),
            NodeType::SubDag => NodeKind::SubDag(SubDagConfig::default()),
            // The chooser never offers a second trigger.
            NodeType::Trigger => {
                return Err(GraphError::KindMismatch {
                    node_id: source,
                    expected: "action, condition, or subdag",
                });
            }
        };

        let id = self.fresh_id(node_type);
        self.graph
            .add_node(GraphNode::new(id.clone(), drop_position, kind));
        if let Err(err) = self.link(&source, &id, source_handle) {
            self.graph.nodes.retain(|n| n.id != id);
            return Err(err);
        }
        Ok(id)
    }

    /// Cancel the chooser: the pending connection is discarded.
    pub fn cancel_choice(&mut self) {
        self.state = ConnectionState::Idle;
    }

    /// Direct edge creation, as used by the canvas library's connect callback.
    pub fn add_edge(
        &mut self,
        source: &str,
        target: &str,
        source_handle: Option<&str>,
    ) -> Result<(), GraphError> {
        self.link(source, target, source_handle.map(str::to_string))
    }

    pub fn remove_edge(&mut self, source: &str, target: &str) -> Result<(), GraphError> {
        self.graph.remove_edge(source, target)
    }

    /// Typed access to a trigger node's configuration.
    pub fn trigger_config_mut(&mut self, node_id: &str) -> Result<&mut TriggerConfig, GraphError> {
        match &mut self.require_node_mut(node_id)?.kind {
            NodeKind::Trigger(config) => Ok(config),
            _ => Err(GraphError::KindMismatch {
                node_id: node_id.to_string(),
                expected: "trigger",
            }),
        }
    }

    /// Typed access to an action node's configuration.
    pub fn action_config_mut(&mut self, node_id: &str) -> Result<&mut ActionConfig, GraphError> {
        match &mut self.require_node_mut(node_id)?.kind {
            NodeKind::Action(config) => Ok(config),
            _ => Err(GraphError::KindMismatch {
                node_id: node_id.to_string(),
                expected: "action",
            }),
        }
    }

    /// Typed access to a condition node's configuration.
    pub fn condition_config_mut(
        &mut self,
        node_id: &str,
    ) -> Result<&mut ConditionConfig, GraphError> {
        match &mut self.require_node_mut(node_id)?.kind {
            NodeKind::Condition(config) => Ok(config),
            _ => Err(GraphError::KindMismatch {
                node_id: node_id.to_string(),
                expected: "condition",
            }),
        }
    }

    /// Typed access to a sub-workflow node's configuration.
    pub fn sub_dag_config_mut(&mut self, node_id: &str) -> Result<&mut SubDagConfig, GraphError> {
        match &mut self.require_node_mut(node_id)?.kind {
            NodeKind::SubDag(config) => Ok(config),
            _ => Err(GraphError::KindMismatch {
                node_id: node_id.to_string(),
                expected: "subdag",
            }),
        }
    }

    /// Creates the edge and keeps the target's semantic bookkeeping in sync:
    /// a step target records its source as a dependency by node id, except
    /// when the source is the trigger or a condition node (conditions carry
    /// the dependency through their own source at export time).
    fn link(
        &mut self,
        source: &str,
        target: &str,
        source_handle: Option<String>,
    ) -> Result<(), GraphError> {
        let mut edge = GraphEdge::between(source, target);
        edge.source_handle = source_handle;
        self.graph.add_edge(edge)?;

        let source_records_dependency = self
            .graph
            .node(source)
            .is_some_and(|n| !n.is_trigger() && !n.is_condition());
        if source_records_dependency
            && let Some(node) = self.graph.node_mut(target)
            && let Some(depends_on) = node.kind.depends_on_mut()
            && !depends_on.iter().any(|id| id == source)
        {
            depends_on.push(source.to_string());
        }
        Ok(())
    }

    fn require_node_mut(&mut self, node_id: &str) -> Result<&mut GraphNode, GraphError> {
        self.graph
            .node_mut(node_id)
            .ok_or_else(|| GraphError::NodeNotFound {
                node_id: node_id.to_string(),
            })
    }

    fn fresh_id(&mut self, node_type: NodeType) -> NodeId {
        loop {
            let id = format!("{}-{}", node_type.as_str(), self.next_seq);
            self.next_seq += 1;
            if self.graph.node(&id).is_none() {
                return id;
            }
        }
    }
}
