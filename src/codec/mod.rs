pub mod export;
pub mod import;
pub mod layout;
pub(crate) mod schema;

pub use export::export_workflow;
pub use import::{ImportedWorkflow, import_workflow};
pub use layout::assign_layout;
