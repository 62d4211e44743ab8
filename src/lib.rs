//! DFO: Data Format Obfuscator
//!
//! Rewrites structured data files (JSON, XML, YAML) into a visually similar
//! but obfuscated form: field names are scrambled, dates change layout, and
//! the output can be written in a different format than the input.

pub mod cli;
pub mod core;
pub mod document;
pub mod transform;
