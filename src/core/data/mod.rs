//! Core data types shared by every pipeline stage.
//!
//! ## Module Structure
//!
//! - `source`: Source code location types (SourceContext, SourceLocation)
//! - `line_index`: Byte offset to line/column mapping
//! - `changes`: Candidate, Replacement and per-file change records

pub mod changes;
pub mod line_index;
pub mod source;

pub use changes::{
    AppliedRepair, Candidate, FileChangeRecord, RepairAction, RepairPass, Replacement,
};
pub use line_index::LineIndex;
pub use source::{SourceContext, SourceLocation, Span};
