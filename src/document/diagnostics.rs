//! Parse error diagnostics with source snippets

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

use super::Format;

/// Syntax error in an input document, pointing at the offending location
#[derive(Debug, Error, Diagnostic)]
#[error("{format} syntax error: {message}")]
#[diagnostic(code(dfo::input::syntax))]
pub struct SyntaxError {
    #[source_code]
    src: NamedSource<String>,

    #[label("error here")]
    span: SourceSpan,

    #[help]
    help: Option<String>,

    format: Format,

    /// The underlying parser message
    message: String,
}

impl SyntaxError {
    /// Create a syntax error from a serde_json error
    pub fn from_json_error(err: &serde_json::Error, source: &str, filename: &str) -> Self {
        Self::at_location(
            Format::Json,
            err.to_string(),
            source,
            filename,
            err.line().max(1),
            err.column().max(1),
        )
    }

    /// Create a syntax error from a serde_yml error
    pub fn from_yaml_error(err: &serde_yml::Error, source: &str, filename: &str) -> Self {
        let (line, column) = err
            .location()
            .map(|loc| (loc.line(), loc.column()))
            .unwrap_or((1, 1));

        Self::at_location(Format::Yaml, err.to_string(), source, filename, line, column)
    }

    /// Create a syntax error at a 1-based line/column
    pub fn at_location(
        format: Format,
        message: impl Into<String>,
        source: &str,
        filename: &str,
        line: usize,
        column: usize,
    ) -> Self {
        let offset = line_col_to_offset(source, line, column);
        Self::at_offset(format, message, source, filename, offset)
    }

    /// Create a syntax error at a byte offset
    pub fn at_offset(
        format: Format,
        message: impl Into<String>,
        source: &str,
        filename: &str,
        offset: usize,
    ) -> Self {
        let message = message.into();
        let offset = clamp_to_char_boundary(source, offset);
        let help = generate_help(format, &message);

        Self {
            src: NamedSource::new(filename, source.to_string()),
            span: SourceSpan::from(offset..offset.saturating_add(1).min(source.len().max(offset))),
            help,
            format,
            message,
        }
    }

    pub fn format(&self) -> Format {
        self.format
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Byte offset of the reported location
    pub fn offset(&self) -> usize {
        self.span.offset()
    }
}

/// Convert line/column to byte offset
fn line_col_to_offset(source: &str, line: usize, column: usize) -> usize {
    let mut current_line = 1;
    let mut line_start = 0;

    if line > 1 {
        for (i, ch) in source.char_indices() {
            if ch == '\n' {
                current_line += 1;
                if current_line == line {
                    line_start = i + 1;
                    break;
                }
            }
        }
        if current_line < line {
            // Past the last line; point at the end of input
            return source.len().saturating_sub(1);
        }
    }

    let rest = &source[line_start..];
    let mut col = 1;
    for (j, c) in rest.char_indices() {
        if col == column || c == '\n' {
            return line_start + j;
        }
        col += 1;
    }

    source.len().saturating_sub(1).max(line_start.min(source.len()))
}

fn clamp_to_char_boundary(source: &str, mut offset: usize) -> usize {
    offset = offset.min(source.len());
    while offset > 0 && !source.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}

/// Generate helpful suggestions based on error message
fn generate_help(format: Format, message: &str) -> Option<String> {
    let msg_lower = message.to_lowercase();

    match format {
        Format::Json => {
            if msg_lower.contains("trailing comma") {
                return Some("JSON does not allow a comma after the last item.".to_string());
            }
            if msg_lower.contains("key must be a string") {
                return Some("Object keys must be double-quoted: {\"key\": 1}".to_string());
            }
            if msg_lower.contains("eof while parsing") {
                return Some("The document ends early - check for a missing '}' or ']'.".to_string());
            }
            if msg_lower.contains("expected `,` or") {
                return Some("Separate items with commas: [item1, item2, item3]".to_string());
            }
        }
        Format::Yaml => {
            if msg_lower.contains("tab") {
                return Some(
                    "YAML requires spaces for indentation, not tabs. Replace tabs with spaces."
                        .to_string(),
                );
            }
            if msg_lower.contains("duplicate key") {
                return Some(
                    "Each key can only appear once. Remove or rename the duplicate key.".to_string(),
                );
            }
            if msg_lower.contains("mapping values are not allowed") {
                return Some(
                    "You may be missing a space after ':' or have incorrect indentation."
                        .to_string(),
                );
            }
        }
        Format::Xml => {
            if msg_lower.contains("mismatch") || msg_lower.contains("expected `</") {
                return Some("Every opening tag needs a matching closing tag.".to_string());
            }
            if msg_lower.contains("unexpected eof") || msg_lower.contains("unclosed") {
                return Some("The document ends before all elements are closed.".to_string());
            }
            if msg_lower.contains("root") {
                return Some("An XML document needs exactly one root element.".to_string());
            }
        }
    }

    None
}
