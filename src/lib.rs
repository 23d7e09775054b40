//! l10nify - automated localization for Flutter projects
//!
//! l10nify finds hardcoded user-facing strings in Dart sources, matches them
//! against the values of the project's template ARB file and rewrites them
//! into `AppLocalizations.of(context)?.key ?? 'text'` lookups. Rewrites that
//! break constant expressions or run outside a widget are repaired or
//! reverted, and every run leaves a change log plus a JSON audit report.
//!
//! ## Module Structure
//!
//! - `cli`: Command-line interface layer (commands, output)
//! - `config`: Configuration file loading and parsing
//! - `core`: Scanning, key resolution, rewriting and repair
//! - `issues`: Review item definitions and reporting
//! - `logging`: Diagnostic logging setup
//! - `report`: Change log and audit report generation
//! - `utils`: Shared utility functions

pub mod cli;
pub mod config;
pub mod core;
pub mod issues;
pub mod logging;
pub mod report;
pub mod utils;
