pub mod metadata;
pub mod step;

pub use metadata::*;
pub use step::*;
