use thiserror::Error;

/// Errors that can occur while importing a YAML workflow document.
#[derive(Error, Debug, Clone)]
pub enum ParseError {
    #[error("Workflow document is empty")]
    EmptyDocument,

    #[error("Failed to parse workflow YAML: {0}")]
    Yaml(String),

    #[error("Workflow document has no 'steps' section")]
    MissingSteps,
}

/// Errors that can occur while exporting a graph to YAML.
#[derive(Error, Debug, Clone)]
pub enum ExportError {
    #[error("Workflow contains unconfigured nodes: {}", labels.join(", "))]
    UnconfiguredNodes { labels: Vec<String> },

    #[error("Workflow dependency cycle detected: {}", names.join(" -> "))]
    CyclicDependency { names: Vec<String> },

    #[error("Failed to serialize workflow YAML: {0}")]
    Serialize(String),
}

/// Errors raised by graph mutation operations in the builder session.
#[derive(Error, Debug, Clone)]
pub enum GraphError {
    #[error("Node '{node_id}' not found in the graph")]
    NodeNotFound { node_id: String },

    #[error("Node '{node_id}' is not a {expected} node")]
    KindMismatch {
        node_id: String,
        expected: &'static str,
    },

    // Endpoint fields are named `from`/`to`; a field named `source` would be
    // picked up by thiserror as the error's cause.
    #[error("Edge '{from}' -> '{to}' not found in the graph")]
    EdgeNotFound { from: String, to: String },

    #[error("Edge '{from}' -> '{to}' already exists")]
    DuplicateEdge { from: String, to: String },

    #[error("Node '{node_id}' cannot be connected to itself")]
    SelfLoop { node_id: String },

    #[error("Edge from '{from}' would target the trigger node")]
    EdgeIntoTrigger { from: String },

    #[error("Condition node '{condition_id}' already has an incoming connection")]
    ConditionFanIn { condition_id: String },

    #[error("Condition node '{from}' cannot feed condition node '{to}'")]
    ConditionToCondition { from: String, to: String },

    #[error("Operation '{operation}' is not valid in the current connection state")]
    InvalidState { operation: &'static str },
}

/// Non-fatal findings surfaced by the importer alongside the graph.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ImportWarning {
    #[error("Step '{step}' depends on '{depends_on}', which does not exist; connection dropped")]
    DanglingDependency { step: String, depends_on: String },

    #[error("Step name '{name}' appears more than once; dependencies resolve to the last one")]
    DuplicateStepName { name: String },
}
