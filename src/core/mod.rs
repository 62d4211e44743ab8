//! Core module - errors, configuration, directives and the run pipeline

pub mod config;
pub mod directive;
pub mod error;
pub mod pipeline;

pub use config::{Config, Settings};
pub use directive::TransformDirective;
pub use error::{ErrorKind, ObfuscateError, Result};
pub use pipeline::{obfuscate_document, resolve_output_format, Job, Summary};
