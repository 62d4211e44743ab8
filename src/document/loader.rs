//! Document loading
//!
//! Reads an input file (or stdin for `-`) and parses it into a
//! [`Document`]. The format comes from an explicit override, then the file
//! extension, then a sniff of the content.

use std::fs;
use std::io::{self, Read};
use std::path::Path;
use tracing::debug;

use super::{xml, Document, Format, Node, SyntaxError};
use crate::core::error::{ObfuscateError, Result};

/// Path that stands for stdin/stdout
pub const STDIO_PATH: &str = "-";

pub fn is_stdio(path: &Path) -> bool {
    path.as_os_str() == STDIO_PATH
}

/// Load and parse a document
///
/// Returns the document together with the format it was parsed as.
pub fn load_document(path: &Path, format: Option<Format>) -> Result<(Document, Format)> {
    let content = read_input(path)?;

    let format = match format {
        Some(f) => f,
        None if is_stdio(path) => Format::sniff(&content),
        None => match Format::from_path(path) {
            Some(f) => f,
            None if path.extension().is_none() => Format::sniff(&content),
            None => {
                return Err(ObfuscateError::UnsupportedInput {
                    path: path.to_path_buf(),
                })
            }
        },
    };
    debug!(path = %path.display(), %format, bytes = content.len(), "loaded input");

    let name = if is_stdio(path) {
        "<stdin>".to_string()
    } else {
        path.display().to_string()
    };
    let doc = parse_document(&content, format, &name)?;
    Ok((doc, format))
}

/// Parse document text in a known format
pub fn parse_document(content: &str, format: Format, filename: &str) -> Result<Document> {
    let content = content.trim_start_matches('\u{feff}');
    let doc = match format {
        Format::Json => serde_json::from_str::<Node>(content)
            .map(Document::new)
            .map_err(|e| SyntaxError::from_json_error(&e, content, filename))?,
        Format::Yaml => serde_yml::from_str::<Node>(content)
            .map(Document::new)
            .map_err(|e| SyntaxError::from_yaml_error(&e, content, filename))?,
        Format::Xml => xml::parse(content, filename)?,
    };
    Ok(doc)
}

fn read_input(path: &Path) -> Result<String> {
    if is_stdio(path) {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .map_err(|source| ObfuscateError::InputRead {
                path: path.to_path_buf(),
                source,
            })?;
        return Ok(buf);
    }

    if !path.exists() {
        return Err(ObfuscateError::InputNotFound {
            path: path.to_path_buf(),
        });
    }

    fs::read_to_string(path).map_err(|source| ObfuscateError::InputRead {
        path: path.to_path_buf(),
        source,
    })
}
