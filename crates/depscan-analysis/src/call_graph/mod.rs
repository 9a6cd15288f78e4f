//! Call-graph resolver: links method definitions across files by name.

pub mod cycles;
pub mod table;
pub mod types;

pub use table::MethodTable;
pub use types::{CallGraphStats, DefinitionConflict, IngestReport, MethodDefinition};
