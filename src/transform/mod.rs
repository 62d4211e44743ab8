//! Obfuscation transformer
//!
//! Walks a [`Document`] and rewrites it: field keys are renamed through a
//! [`FieldNameMapping`], dates are moved into another layout, and numbers
//! optionally get an alternate rendering. The tree shape never changes.
//!
//! All randomness comes from a single seeded [`StdRng`], so a run is fully
//! reproducible from its seed.

pub mod dates;
pub mod names;
pub mod numbers;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::debug;

use crate::core::error::{ObfuscateError, Result};
use crate::document::{Document, Node, Scalar};

pub use dates::DateReformatter;
pub use names::{FieldNameMapping, NameStyle};

/// Template for the generated list item element name
const ITEM_TEMPLATE: &str = "item";

/// Which passes run and how
#[derive(Debug, Clone)]
pub struct TransformOptions {
    pub rename_fields: bool,
    pub reformat_dates: bool,
    pub reformat_numbers: bool,
    pub name_style: NameStyle,
    /// Output pool for date reformatting
    pub date_formats: Vec<String>,
    /// XML wrapper element used when the source has no root name
    pub root_element: String,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            rename_fields: true,
            reformat_dates: true,
            reformat_numbers: false,
            name_style: NameStyle::default(),
            date_formats: dates::DEFAULT_OUTPUT_FORMATS
                .iter()
                .map(|f| f.to_string())
                .collect(),
            root_element: "root".to_string(),
        }
    }
}

/// Counters collected during a transform
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TransformStats {
    /// Map entries whose key was replaced
    pub fields_renamed: usize,
    pub dates_reformatted: usize,
    pub numbers_reformatted: usize,
}

pub struct Obfuscator {
    options: TransformOptions,
    seed: u64,
    rng: StdRng,
    names: FieldNameMapping,
    dates: DateReformatter,
    stats: TransformStats,
}

impl Obfuscator {
    /// Create an obfuscator; without a seed one is drawn at random
    pub fn new(options: TransformOptions, seed: Option<u64>) -> Result<Self> {
        let dates = DateReformatter::new(options.date_formats.clone()).map_err(|message| {
            ObfuscateError::Argument {
                message,
                help: Some("date_formats takes chrono strftime patterns like \"%d/%m/%Y\"".into()),
            }
        })?;
        let seed = seed.unwrap_or_else(rand::random);
        debug!(seed, "initialized obfuscator");

        Ok(Self {
            names: FieldNameMapping::new(options.name_style),
            options,
            seed,
            rng: StdRng::seed_from_u64(seed),
            dates,
            stats: TransformStats::default(),
        })
    }

    /// The seed driving this run
    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn stats(&self) -> TransformStats {
        self.stats
    }

    /// The field name mapping built so far
    pub fn mapping(&self) -> &FieldNameMapping {
        &self.names
    }

    /// Transform a document
    pub fn transform(&mut self, doc: Document) -> Document {
        let Document {
            root,
            root_name,
            item_name,
        } = doc;

        if self.options.rename_fields {
            self.names.reserve(root.keys());
            if let Some(name) = &root_name {
                self.names.reserve([name.clone()]);
            }
        }

        let root_name = match root_name {
            Some(name) if self.options.rename_fields => {
                Some(self.names.obfuscate(&name, &mut self.rng))
            }
            None if self.options.rename_fields => Some(self.wrapper_name()),
            other => other,
        };

        let root = self.transform_node(root);

        let item_name = if self.options.rename_fields {
            Some(self.names.fresh(ITEM_TEMPLATE, &mut self.rng))
        } else {
            item_name
        };

        debug!(
            fields = self.stats.fields_renamed,
            distinct = self.names.len(),
            dates = self.stats.dates_reformatted,
            numbers = self.stats.numbers_reformatted,
            "transform complete"
        );

        Document {
            root,
            root_name,
            item_name,
        }
    }

    /// Wrapper element name for sources without one, never an original key
    fn wrapper_name(&mut self) -> String {
        let element = self.options.root_element.clone();
        if self.names.is_taken(&element) {
            self.names.fresh(&element, &mut self.rng)
        } else {
            self.names.reserve([element.clone()]);
            element
        }
    }

    fn transform_node(&mut self, node: Node) -> Node {
        match node {
            Node::Map(entries) => {
                let mut out = Vec::with_capacity(entries.len());
                for (key, value) in entries {
                    let key = if self.options.rename_fields {
                        self.stats.fields_renamed += 1;
                        self.names.obfuscate(&key, &mut self.rng)
                    } else {
                        key
                    };
                    out.push((key, self.transform_node(value)));
                }
                Node::Map(out)
            }
            Node::List(items) => {
                Node::List(items.into_iter().map(|item| self.transform_node(item)).collect())
            }
            Node::Scalar(scalar) => Node::Scalar(self.transform_scalar(scalar)),
        }
    }

    fn transform_scalar(&mut self, scalar: Scalar) -> Scalar {
        match scalar {
            Scalar::String(s) => {
                if self.options.reformat_dates {
                    if let Some(out) = self.dates.reformat(&s, &mut self.rng) {
                        self.stats.dates_reformatted += 1;
                        return Scalar::String(out);
                    }
                }
                if self.options.reformat_numbers {
                    if let Some(out) = numbers::reformat_numeric_str(&s, &mut self.rng) {
                        self.stats.numbers_reformatted += 1;
                        return Scalar::String(out);
                    }
                }
                Scalar::String(s)
            }
            Scalar::Number(n) if self.options.reformat_numbers => {
                match numbers::reformat_number(&n, &mut self.rng) {
                    Some(out) => {
                        self.stats.numbers_reformatted += 1;
                        Scalar::String(out)
                    }
                    None => Scalar::Number(n),
                }
            }
            other => other,
        }
    }
}
