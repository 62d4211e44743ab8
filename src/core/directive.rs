//! Transform directives selected with `-t`

use std::fmt;
use std::str::FromStr;

use crate::core::error::ObfuscateError;
use crate::document::Format;

/// What a run does: which passes run and which format it targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransformDirective {
    /// Rename fields and reformat dates; target inferred from `-o`
    #[default]
    Standard,
    /// JSON in, XML out
    JsonToXml,
    /// XML in, JSON out
    XmlToJson,
    /// Only reformat dates; keys are kept
    DateObfuscation,
    /// Only rename fields
    FieldObfuscation,
    /// Rename fields, reformat dates and numbers
    Full,
    /// Standard passes with an explicit target format
    To(Format),
}

impl TransformDirective {
    /// Values accepted on the command line
    pub fn accepted_values() -> &'static [&'static str] {
        &[
            "json_to_xml",
            "xml_to_json",
            "date_obfuscation",
            "field_obfuscation",
            "full",
            "json",
            "xml",
            "yaml",
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TransformDirective::Standard => "standard",
            TransformDirective::JsonToXml => "json_to_xml",
            TransformDirective::XmlToJson => "xml_to_json",
            TransformDirective::DateObfuscation => "date_obfuscation",
            TransformDirective::FieldObfuscation => "field_obfuscation",
            TransformDirective::Full => "full",
            TransformDirective::To(format) => format.as_str(),
        }
    }

    /// Output format forced by this directive, if any
    pub fn target(&self) -> Option<Format> {
        match self {
            TransformDirective::JsonToXml => Some(Format::Xml),
            TransformDirective::XmlToJson => Some(Format::Json),
            TransformDirective::To(format) => Some(*format),
            _ => None,
        }
    }

    /// Input format this directive is meant for, if any
    pub fn expected_input(&self) -> Option<Format> {
        match self {
            TransformDirective::JsonToXml => Some(Format::Json),
            TransformDirective::XmlToJson => Some(Format::Xml),
            _ => None,
        }
    }

    pub fn rename_fields(&self) -> bool {
        !matches!(self, TransformDirective::DateObfuscation)
    }

    pub fn reformat_dates(&self) -> bool {
        !matches!(self, TransformDirective::FieldObfuscation)
    }

    pub fn reformat_numbers(&self) -> bool {
        matches!(self, TransformDirective::Full)
    }
}

impl fmt::Display for TransformDirective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransformDirective {
    type Err = ObfuscateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        match normalized.as_str() {
            "json_to_xml" => Ok(TransformDirective::JsonToXml),
            "xml_to_json" => Ok(TransformDirective::XmlToJson),
            "date_obfuscation" => Ok(TransformDirective::DateObfuscation),
            "field_obfuscation" => Ok(TransformDirective::FieldObfuscation),
            "full" => Ok(TransformDirective::Full),
            other => match Format::from_extension(other) {
                // Only the canonical names, not extension aliases like "yml"
                Some(format) if format.as_str() == other => Ok(TransformDirective::To(format)),
                _ => Err(ObfuscateError::UnsupportedOutput {
                    value: s.to_string(),
                    help: Some(format!(
                        "Accepted -t values: {}",
                        Self::accepted_values().join(", ")
                    )),
                }),
            },
        }
    }
}
