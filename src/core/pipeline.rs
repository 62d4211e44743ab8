//! The load -> transform -> serialize pipeline

use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::core::config::Settings;
use crate::core::directive::TransformDirective;
use crate::core::error::{ObfuscateError, Result};
use crate::document::loader::is_stdio;
use crate::document::{load_document, render_document, write_output, Document, Format};
use crate::transform::{Obfuscator, TransformOptions, TransformStats};

/// One obfuscation run
#[derive(Debug, Clone)]
pub struct Job {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Input format override; detected when `None`
    pub input_format: Option<Format>,
    pub directive: TransformDirective,
    pub settings: Settings,
}

/// What a finished run did
#[derive(Debug, Clone)]
pub struct Summary {
    pub input_format: Format,
    pub output_format: Format,
    pub output: PathBuf,
    pub seed: u64,
    pub stats: TransformStats,
}

impl Job {
    /// Run the job end to end
    pub fn run(&self) -> Result<Summary> {
        self.check_paths()?;

        let (doc, input_format) = load_document(&self.input, self.input_format)?;
        if let Some(expected) = self.directive.expected_input() {
            if expected != input_format {
                warn!(
                    directive = %self.directive,
                    input = %input_format,
                    "directive expects {} input",
                    expected
                );
            }
        }

        let output_format = resolve_output_format(self.directive, &self.output, input_format)?;
        let (content, seed, stats) =
            obfuscate_document(doc, output_format, self.directive, &self.settings)?;
        write_output(&self.output, &content)?;

        info!(
            input = %self.input.display(),
            output = %self.output.display(),
            from = %input_format,
            to = %output_format,
            "obfuscation complete"
        );

        Ok(Summary {
            input_format,
            output_format,
            output: self.output.clone(),
            seed,
            stats,
        })
    }

    fn check_paths(&self) -> Result<()> {
        if is_stdio(&self.input) || is_stdio(&self.output) {
            return Ok(());
        }
        let same = match (self.input.canonicalize(), self.output.canonicalize()) {
            (Ok(a), Ok(b)) => a == b,
            _ => self.input == self.output,
        };
        if same {
            return Err(ObfuscateError::Argument {
                message: format!(
                    "Input and output are the same file: {}",
                    self.input.display()
                ),
                help: Some("Write the obfuscated copy to a different path".into()),
            });
        }
        Ok(())
    }
}

/// Transform a parsed document and render it in the target format
///
/// Returns the rendered text, the seed that was used, and the transform
/// counters.
pub fn obfuscate_document(
    doc: Document,
    output_format: Format,
    directive: TransformDirective,
    settings: &Settings,
) -> Result<(String, u64, TransformStats)> {
    let options = TransformOptions {
        rename_fields: directive.rename_fields(),
        reformat_dates: directive.reformat_dates(),
        reformat_numbers: directive.reformat_numbers(),
        name_style: settings.name_style,
        date_formats: settings.date_formats.clone(),
        root_element: settings.write.root_element.clone(),
    };

    let mut obfuscator = Obfuscator::new(options, settings.seed)?;
    let transformed = obfuscator.transform(doc);
    let content = render_document(&transformed, output_format, &settings.write)?;

    Ok((content, obfuscator.seed(), obfuscator.stats()))
}

/// Pick the output format: directive, then `-o` extension, then input format
pub fn resolve_output_format(
    directive: TransformDirective,
    output: &Path,
    input_format: Format,
) -> Result<Format> {
    let from_extension = if is_stdio(output) {
        None
    } else {
        match output.extension().and_then(|e| e.to_str()) {
            None => None,
            Some(ext) => match Format::from_extension(ext) {
                Some(format) => Some(format),
                None if directive.target().is_some() => None,
                None => {
                    return Err(ObfuscateError::UnsupportedOutput {
                        value: ext.to_string(),
                        help: Some(format!(
                            "Use a .json, .xml, .yaml or .yml output path, or pick a target with -t ({})",
                            TransformDirective::accepted_values().join(", ")
                        )),
                    })
                }
            },
        }
    };

    let format = match directive.target() {
        Some(target) => {
            if let Some(ext_format) = from_extension.filter(|f| *f != target) {
                warn!(
                    "writing {} to '{}' despite its .{} extension",
                    target,
                    output.display(),
                    ext_format
                );
            }
            target
        }
        None => from_extension.unwrap_or(input_format),
    };
    debug!(%format, "resolved output format");
    Ok(format)
}
