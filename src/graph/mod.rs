pub mod edge;
pub mod node;
pub mod session;

pub use edge::*;
pub use node::*;
pub use session::*;

use serde::{Deserialize, Serialize};

use crate::error::GraphError;

/// The in-memory workflow graph owned by one builder session.
///
/// Structural invariants are enforced at mutation time: exactly one trigger
/// entry point (created by the session), no duplicate or self-looping edges,
/// no edges into the trigger, at most one incoming edge per condition node,
/// and no condition-to-condition edges.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkflowGraph {
    pub nodes: Vec<GraphNode>,
    pub edges: Vec<GraphEdge>,
}

impl WorkflowGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn node(&self, node_id: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.id == node_id)
    }

    pub fn node_mut(&mut self, node_id: &str) -> Option<&mut GraphNode> {
        self.nodes.iter_mut().find(|n| n.id == node_id)
    }

    pub fn trigger(&self) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.is_trigger())
    }

    pub fn edges_from<'a>(&'a self, node_id: &'a str) -> impl Iterator<Item = &'a GraphEdge> {
        self.edges.iter().filter(move |e| e.source == node_id)
    }

    pub fn edges_into<'a>(&'a self, node_id: &'a str) -> impl Iterator<Item = &'a GraphEdge> {
        self.edges.iter().filter(move |e| e.target == node_id)
    }

    pub fn contains_edge(&self, source: &str, target: &str) -> bool {
        self.edges
            .iter()
            .any(|e| e.source == source && e.target == target)
    }

    pub fn add_node(&mut self, node: GraphNode) {
        self.nodes.push(node);
    }

    /// Adds an edge after checking the graph's structural invariants.
    pub fn add_edge(&mut self, edge: GraphEdge) -> Result<(), GraphError> {
        if edge.source == edge.target {
            return Err(GraphError::SelfLoop {
                node_id: edge.source,
            });
        }
        let source = self
            .node(&edge.source)
            .ok_or_else(|| GraphError::NodeNotFound {
                node_id: edge.source.clone(),
            })?;
        let target = self
            .node(&edge.target)
            .ok_or_else(|| GraphError::NodeNotFound {
                node_id: edge.target.clone(),
            })?;
        if target.is_trigger() {
            return Err(GraphError::EdgeIntoTrigger { from: edge.source });
        }
        if source.is_condition() && target.is_condition() {
            return Err(GraphError::ConditionToCondition {
                from: edge.source,
                to: edge.target,
            });
        }
        if target.is_condition() && self.edges_into(&edge.target).next().is_some() {
            return Err(GraphError::ConditionFanIn {
                condition_id: edge.target,
            });
        }
        if self.contains_edge(&edge.source, &edge.target) {
            return Err(GraphError::DuplicateEdge {
                from: edge.source,
                to: edge.target,
            });
        }
        self.edges.push(edge);
        Ok(())
    }

    /// Removes an edge and the semantic bookkeeping attached to it: the
    /// target's dependency entry for an action or sub-workflow node, or the
    /// condition mapping for an outgoing condition edge.
    pub fn remove_edge(&mut self, source: &str, target: &str) -> Result<(), GraphError> {
        let index = self
            .edges
            .iter()
            .position(|e| e.source == source && e.target == target)
            .ok_or_else(|| GraphError::EdgeNotFound {
                from: source.to_string(),
                to: target.to_string(),
            })?;
        self.edges.remove(index);

        if let Some(node) = self.node_mut(target)
            && let Some(depends_on) = node.kind.depends_on_mut()
        {
            depends_on.retain(|id| id != source);
        }
        if let Some(node) = self.node_mut(source)
            && let NodeKind::Condition(config) = &mut node.kind
        {
            config.next_nodes.remove(target);
        }
        Ok(())
    }
}
