//! # Weft - Workflow Graph / YAML Codec
//!
//! **Weft** converts between the two representations a visual workflow
//! builder works with: a graph of typed nodes (trigger, action, condition,
//! sub-workflow) connected by directed edges, and a linear YAML document of
//! named steps with dependencies, preconditions, sub-workflow calls and
//! retry/continuation/mail policies.
//!
//! ## Core Workflow
//!
//! 1.  **Import**: [`codec::import_workflow`] parses a YAML workflow document
//!     into a [`graph::WorkflowGraph`] plus [`model::WorkflowMetadata`],
//!     synthesizing condition nodes from step preconditions and assigning a
//!     layered layout.
//! 2.  **Edit**: a [`graph::BuilderSession`] owns the graph and applies user
//!     interactions through the drag-and-connect state machine, with typed
//!     access to each node kind's configuration.
//! 3.  **Export**: [`codec::export_workflow`] validates every node, resolves
//!     dependency names, reattaches preconditions carried by condition nodes
//!     and serializes back to the YAML schema.
//!
//! Positions on the graph are purely cosmetic; execution order is defined by
//! step dependencies alone. Nothing in this crate schedules or executes
//! anything - it is the data boundary between an editor and a backend
//! scheduler.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use weft::prelude::*;
//!
//! fn main() -> Result<()> {
//!     let yaml = std::fs::read_to_string("workflow.yaml")?;
//!
//!     // Hydrate the canvas from an existing document.
//!     let imported = import_workflow(&yaml)?;
//!     for warning in &imported.warnings {
//!         eprintln!("warning: {warning}");
//!     }
//!
//!     // Edit the graph through a builder session.
//!     let mut session = BuilderSession::from_graph(imported.graph);
//!     session.begin_connection("trigger", None)?;
//!     session.release_on_canvas(Position::new(400.0, 300.0))?;
//!     let new_node = session.choose_node_type(NodeType::Action)?;
//!     let config = session.action_config_mut(&new_node)?;
//!     config.name = "notify".to_string();
//!     config.script = Some("echo done".to_string());
//!
//!     // Serialize the result back to YAML.
//!     let exported = export_workflow(session.graph(), &imported.metadata)?;
//!     println!("{exported}");
//!     Ok(())
//! }
//! ```

pub mod codec;
pub mod error;
pub mod graph;
pub mod model;
pub mod prelude;
