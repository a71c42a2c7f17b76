use ahash::AHashMap;
use serde::{Deserialize, Serialize};

use crate::model::{ContinueOn, MailOn, Precondition, RetryPolicy, ScriptKind};

/// Identifier of a node within one builder session. Unique per graph.
pub type NodeId = String;

/// 2-D canvas position. Presentation only; never affects execution order.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Lightweight discriminant used by the node-type chooser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeType {
    Trigger,
    Action,
    Condition,
    SubDag,
}

impl NodeType {
    pub fn as_str(&self) -> &'static str {
        match self {
            NodeType::Trigger => "trigger",
            NodeType::Action => "action",
            NodeType::Condition => "condition",
            NodeType::SubDag => "subdag",
        }
    }
}

/// Configuration carried by the single entry-point node of every graph.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TriggerConfig {
    /// Cron expression; empty means unconfigured (webhook-style trigger).
    pub schedule: String,
}

/// Configuration of one action node on the canvas.
///
/// Unlike [`crate::model::Step`], `depends_on` holds node *ids*: the builder
/// records connections by id and names are only resolved at export time.
/// Preconditions are not stored here; on the canvas they live on the
/// condition nodes spliced into this node's incoming edges.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ActionConfig {
    pub name: String,
    pub description: Option<String>,
    pub script_kind: ScriptKind,
    pub script: Option<String>,
    pub interpreter_ref: Option<String>,
    pub output: Option<String>,
    pub depends_on: Vec<NodeId>,
    pub retry_policy: Option<RetryPolicy>,
    pub continue_on: ContinueOn,
    pub mail_on: MailOn,
}

impl ActionConfig {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// An action is minimally configured once it has a name and either an
    /// inline script body or an interpreter file reference.
    pub fn is_configured(&self) -> bool {
        let has_body = self.script.as_deref().is_some_and(|s| !s.trim().is_empty())
            || self
                .interpreter_ref
                .as_deref()
                .is_some_and(|s| !s.trim().is_empty());
        !self.name.trim().is_empty() && has_body
    }

    pub fn push_dependency(&mut self, node_id: impl Into<NodeId>) {
        let node_id = node_id.into();
        if !self.depends_on.contains(&node_id) {
            self.depends_on.push(node_id);
        }
    }
}

/// Configuration of a condition node.
///
/// `next_nodes` maps each outgoing edge target to the precondition that gates
/// it. Keys must be actual edge targets of this node.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ConditionConfig {
    pub name: String,
    pub next_nodes: AHashMap<NodeId, Precondition>,
}

impl ConditionConfig {
    pub fn is_configured(&self) -> bool {
        !self.name.trim().is_empty()
            && self
                .next_nodes
                .values()
                .any(|p| !p.condition.trim().is_empty())
    }
}

/// Configuration of a sub-workflow node: the step runs another workflow
/// instead of a command.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SubDagConfig {
    pub name: String,
    /// Name of the workflow to run.
    pub run: String,
    /// Parameter string passed to the sub-workflow.
    pub params: String,
    pub depends_on: Vec<NodeId>,
}

impl SubDagConfig {
    /// A sub-workflow node is configured once it has a name and a target
    /// workflow to run.
    pub fn is_configured(&self) -> bool {
        !self.name.trim().is_empty() && !self.run.trim().is_empty()
    }

    pub fn push_dependency(&mut self, node_id: impl Into<NodeId>) {
        let node_id = node_id.into();
        if !self.depends_on.contains(&node_id) {
            self.depends_on.push(node_id);
        }
    }
}

/// Per-kind node configuration. Mutation goes through the typed accessors on
/// the builder session rather than dynamic field paths.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum NodeKind {
    Trigger(TriggerConfig),
    Action(ActionConfig),
    Condition(ConditionConfig),
    SubDag(SubDagConfig),
}

impl NodeKind {
    pub fn node_type(&self) -> NodeType {
        match self {
            NodeKind::Trigger(_) => NodeType::Trigger,
            NodeKind::Action(_) => NodeType::Action,
            NodeKind::Condition(_) => NodeType::Condition,
            NodeKind::SubDag(_) => NodeType::SubDag,
        }
    }

    /// Dependency list of an action or sub-workflow node.
    pub(crate) fn depends_on_mut(&mut self) -> Option<&mut Vec<NodeId>> {
        match self {
            NodeKind::Action(config) => Some(&mut config.depends_on),
            NodeKind::SubDag(config) => Some(&mut config.depends_on),
            _ => None,
        }
    }
}

/// One node of the visual workflow graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    pub id: NodeId,
    pub position: Position,
    pub kind: NodeKind,
}

impl GraphNode {
    pub fn new(id: impl Into<NodeId>, position: Position, kind: NodeKind) -> Self {
        Self {
            id: id.into(),
            position,
            kind,
        }
    }

    pub fn node_type(&self) -> NodeType {
        self.kind.node_type()
    }

    pub fn is_trigger(&self) -> bool {
        matches!(self.kind, NodeKind::Trigger(_))
    }

    pub fn is_condition(&self) -> bool {
        matches!(self.kind, NodeKind::Condition(_))
    }

    /// Human-readable label for error reporting: the configured name when one
    /// exists, otherwise the node type and id.
    pub fn label(&self) -> String {
        let name = match &self.kind {
            NodeKind::Trigger(_) => "",
            NodeKind::Action(config) => config.name.trim(),
            NodeKind::Condition(config) => config.name.trim(),
            NodeKind::SubDag(config) => config.name.trim(),
        };
        if name.is_empty() {
            format!("unnamed {} ({})", self.node_type().as_str(), self.id)
        } else {
            name.to_string()
        }
    }
}
