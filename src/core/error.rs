//! Error types for the obfuscation pipeline

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

use crate::document::SyntaxError;

/// The three failure classes a run can end in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing, unreadable or malformed input
    Input,
    /// Unsupported or unwritable output
    OutputFormat,
    /// Bad invocation or configuration
    Argument,
}

#[derive(Debug, Error, Diagnostic)]
pub enum ObfuscateError {
    #[error("Input file not found: {}", path.display())]
    #[diagnostic(code(dfo::input::not_found))]
    InputNotFound { path: PathBuf },

    #[error("Failed to read input '{}'", path.display())]
    #[diagnostic(code(dfo::input::read))]
    InputRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unsupported input file type '{}'", path.display())]
    #[diagnostic(
        code(dfo::input::unsupported),
        help("Supported inputs are .json, .xml, .yaml and .yml; use --from to force a format")
    )]
    UnsupportedInput { path: PathBuf },

    #[error(transparent)]
    #[diagnostic(transparent)]
    InputSyntax(#[from] SyntaxError),

    #[error("Unsupported output format '{value}'")]
    #[diagnostic(code(dfo::output::unsupported))]
    UnsupportedOutput {
        value: String,
        #[help]
        help: Option<String>,
    },

    #[error("Failed to serialize {format} output: {message}")]
    #[diagnostic(code(dfo::output::serialize))]
    Serialize { format: String, message: String },

    #[error("Failed to write output '{}'", path.display())]
    #[diagnostic(code(dfo::output::write))]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{message}")]
    #[diagnostic(code(dfo::argument::invalid))]
    Argument {
        message: String,
        #[help]
        help: Option<String>,
    },

    #[error("Invalid config file '{}': {message}", path.display())]
    #[diagnostic(code(dfo::argument::config))]
    Config { path: PathBuf, message: String },
}

impl ObfuscateError {
    /// Classify this error into one of the user-facing kinds
    pub fn kind(&self) -> ErrorKind {
        match self {
            ObfuscateError::InputNotFound { .. }
            | ObfuscateError::InputRead { .. }
            | ObfuscateError::UnsupportedInput { .. }
            | ObfuscateError::InputSyntax(_) => ErrorKind::Input,
            ObfuscateError::UnsupportedOutput { .. }
            | ObfuscateError::Serialize { .. }
            | ObfuscateError::OutputWrite { .. } => ErrorKind::OutputFormat,
            ObfuscateError::Argument { .. } | ObfuscateError::Config { .. } => {
                ErrorKind::Argument
            }
        }
    }

    pub fn argument(message: impl Into<String>) -> Self {
        ObfuscateError::Argument {
            message: message.into(),
            help: None,
        }
    }
}

pub type Result<T> = std::result::Result<T, ObfuscateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_classification() {
        let missing = ObfuscateError::InputNotFound {
            path: PathBuf::from("x.json"),
        };
        assert_eq!(missing.kind(), ErrorKind::Input);

        let output = ObfuscateError::UnsupportedOutput {
            value: "csv".into(),
            help: None,
        };
        assert_eq!(output.kind(), ErrorKind::OutputFormat);

        assert_eq!(ObfuscateError::argument("bad").kind(), ErrorKind::Argument);
    }

    #[test]
    fn test_messages() {
        let err = ObfuscateError::InputNotFound {
            path: PathBuf::from("missing.json"),
        };
        assert_eq!(err.to_string(), "Input file not found: missing.json");

        let err = ObfuscateError::UnsupportedOutput {
            value: "toml".into(),
            help: None,
        };
        assert_eq!(err.to_string(), "Unsupported output format 'toml'");
    }
}
