//! Prelude module for convenient imports
//!
//! Re-exports the types and functions most callers need: the codec entry
//! points, the graph and builder-session types, the step/metadata model and
//! the error taxonomy.

// Codec entry points
pub use crate::codec::{ImportedWorkflow, assign_layout, export_workflow, import_workflow};

// Graph model and builder session
pub use crate::graph::{
    ActionConfig, BuilderSession, ConditionConfig, ConnectionState, GraphEdge, GraphNode, NodeId,
    NodeKind, NodeType, Position, SubDagConfig, TriggerConfig, WorkflowGraph,
};

// Step and workflow metadata model
pub use crate::model::{
    ContinueOn, EnvVar, MailOn, Param, Precondition, RetryPolicy, ScriptKind, Step,
    WorkflowMetadata,
};

// Error types
pub use crate::error::{ExportError, GraphError, ImportWarning, ParseError};

// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;
