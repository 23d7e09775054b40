//! Core rewrite engine.
//!
//! ## Pipeline
//!
//! ```text
//! file_scanner → scanner → resolver → rewriter → imports → repair
//!                                                              ↓
//!                                                  FileChangeRecord → report
//! ```
//!
//! ## Module Structure
//!
//! - `context`: Run context (merged config, file list, dictionaries)
//! - `file_scanner`: Source file discovery
//! - `scanner`: String literal lexer and skip rules
//! - `dictionary`: ARB loading
//! - `resolver`: Text to key matching
//! - `rewriter`: Lookup expressions and atomic writes
//! - `imports`: Localizations import insertion
//! - `structure`: Bracket outline used by the repair passes
//! - `repair`: Syntax repair passes
//! - `pipeline`: Per-file orchestration
//! - `backup`: Copies of originals and restore

pub mod backup;
pub mod context;
pub mod dart;
pub mod data;
pub mod dictionary;
pub mod file_scanner;
pub mod imports;
pub mod pipeline;
pub mod repair;
pub mod resolver;
pub mod rewriter;
pub mod scanner;
pub mod structure;

pub use context::RunContext;
pub use dictionary::Dictionary;
pub use pipeline::{FileOutcome, Localizer};
