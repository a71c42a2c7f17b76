use serde::{Deserialize, Serialize};

use crate::graph::NodeId;

/// A directed connection between two nodes.
///
/// `source_handle` tags which outgoing port the edge leaves from, for node
/// types that expose more than one; it has no meaning for the codec itself
/// and is carried through for the canvas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphEdge {
    pub source: NodeId,
    pub target: NodeId,
    pub source_handle: Option<String>,
}

impl GraphEdge {
    pub fn between(source: impl Into<NodeId>, target: impl Into<NodeId>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            source_handle: None,
        }
    }
}
