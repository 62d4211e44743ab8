//! Document serialization and output

use serde::Serialize;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

use super::loader::is_stdio;
use super::xml::{self, XmlOptions};
use super::{Document, Format};
use crate::core::error::{ObfuscateError, Result};

/// Rendering options shared by all output formats
#[derive(Debug, Clone)]
pub struct WriteOptions {
    /// Indent width for JSON and XML
    pub indent: usize,
    pub root_element: String,
    pub item_element: String,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            indent: 4,
            root_element: "root".to_string(),
            item_element: "item".to_string(),
        }
    }
}

/// Render a document in the given format
pub fn render_document(doc: &Document, format: Format, options: &WriteOptions) -> Result<String> {
    let serialize_err = |message: String| ObfuscateError::Serialize {
        format: format.to_string(),
        message,
    };

    match format {
        Format::Json => {
            let indent = " ".repeat(options.indent);
            let formatter = serde_json::ser::PrettyFormatter::with_indent(indent.as_bytes());
            let mut buf = Vec::new();
            let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
            doc.root
                .serialize(&mut ser)
                .map_err(|e| serialize_err(e.to_string()))?;
            let mut out = String::from_utf8(buf).map_err(|e| serialize_err(e.to_string()))?;
            out.push('\n');
            Ok(out)
        }
        Format::Yaml => serde_yml::to_string(&doc.root).map_err(|e| serialize_err(e.to_string())),
        Format::Xml => {
            let xml_options = XmlOptions {
                indent: options.indent,
                root_element: options.root_element.clone(),
                item_element: options.item_element.clone(),
            };
            xml::render(doc, &xml_options).map_err(serialize_err)
        }
    }
}

/// Write rendered output to a file, or stdout for `-`
///
/// Files are written to a sibling temporary file first and then renamed
/// into place, so a failed run never leaves a truncated output behind.
pub fn write_output(path: &Path, content: &str) -> Result<()> {
    let write_err = |source: io::Error| ObfuscateError::OutputWrite {
        path: path.to_path_buf(),
        source,
    };

    if is_stdio(path) {
        let stdout = io::stdout();
        let mut lock = stdout.lock();
        lock.write_all(content.as_bytes()).map_err(write_err)?;
        return lock.flush().map_err(write_err);
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        if !parent.is_dir() {
            return Err(write_err(io::Error::new(
                io::ErrorKind::NotFound,
                format!("directory '{}' does not exist", parent.display()),
            )));
        }
    }

    let tmp = temp_path(path);
    fs::write(&tmp, content).map_err(write_err)?;
    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(write_err(e));
    }

    debug!(path = %path.display(), bytes = content.len(), "wrote output");
    Ok(())
}

fn temp_path(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "output".to_string());
    path.with_file_name(format!(".{}.dfo-tmp", name))
}
