//! Pseudo-name generation for field keys
//!
//! A [`FieldNameMapping`] hands out one replacement per original name and
//! remembers it, so a key renamed in one place is renamed the same way
//! everywhere in the document. Generated names are always valid XML names
//! and never collide with each other or with any reserved original name.

use rand::Rng;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};

/// How replacement names are generated
#[derive(clap::ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NameStyle {
    /// Random characters with the same length and character classes
    #[default]
    Shape,
    /// Dictionary words
    Words,
}

/// Attempts per length before a shape name grows by one character
const ATTEMPTS_PER_LENGTH: usize = 8;

/// Plain words before numeric suffixes kick in
const PLAIN_WORD_ATTEMPTS: usize = 16;

const WORDS: &[&str] = &[
    "anchor", "amber", "arrow", "atlas", "badge", "basin", "beacon", "birch", "blossom", "border",
    "branch", "bridge", "bucket", "cabin", "canvas", "canyon", "carbon", "castle", "cedar",
    "channel", "cherry", "circle", "citrus", "clover", "comet", "copper", "coral", "cotton",
    "crystal", "delta", "desert", "dune", "echo", "ember", "falcon", "feather", "fern", "field",
    "flint", "forest", "fossil", "galaxy", "garden", "glacier", "granite", "harbor", "hazel",
    "horizon", "island", "ivory", "jasmine", "juniper", "kernel", "lagoon", "lantern", "lemon",
    "lichen", "linen", "maple", "marble", "meadow", "mesa", "meteor", "mirror", "monsoon",
    "mosaic", "needle", "nectar", "oasis", "ocean", "olive", "onyx", "orbit", "orchid", "paddle",
    "pebble", "pepper", "pillar", "pine", "planet", "plaza", "prairie", "quartz", "quill",
    "rain", "raven", "reef", "ridge", "river", "saddle", "salt", "sapphire", "shadow", "signal",
    "silver", "sparrow", "spruce", "summit", "thistle", "thunder", "timber", "topaz", "tundra",
    "valley", "velvet", "violet", "walnut", "willow", "window", "zenith",
];

/// Consistent original-to-pseudo name mapping for one document
#[derive(Debug, Default)]
pub struct FieldNameMapping {
    style: NameStyle,
    forward: HashMap<String, String>,
    /// Names that must never be produced: originals and already issued names
    taken: HashSet<String>,
}

impl FieldNameMapping {
    pub fn new(style: NameStyle) -> Self {
        Self {
            style,
            ..Default::default()
        }
    }

    /// Mark names that generated names must never equal
    pub fn reserve<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.taken.extend(names.into_iter().map(Into::into));
    }

    /// Get (or create) the pseudo-name for an original name
    pub fn obfuscate<R: Rng + ?Sized>(&mut self, original: &str, rng: &mut R) -> String {
        if let Some(name) = self.forward.get(original) {
            return name.clone();
        }
        self.taken.insert(original.to_string());
        let name = self.generate(original, rng);
        self.forward.insert(original.to_string(), name.clone());
        name
    }

    /// Generate a name not tied to any original, shaped like `template`
    pub fn fresh<R: Rng + ?Sized>(&mut self, template: &str, rng: &mut R) -> String {
        self.generate(template, rng)
    }

    /// Look up an existing mapping
    /// Whether a name is an original key or already generated
    pub fn is_taken(&self, name: &str) -> bool {
        self.taken.contains(name)
    }

    pub fn get(&self, original: &str) -> Option<&str> {
        self.forward.get(original).map(String::as_str)
    }

    /// Number of distinct original names mapped so far
    pub fn len(&self) -> usize {
        self.forward.len()
    }

    pub fn is_empty(&self) -> bool {
        self.forward.is_empty()
    }

    fn generate<R: Rng + ?Sized>(&mut self, template: &str, rng: &mut R) -> String {
        let mut attempt = 0;
        loop {
            let candidate = match self.style {
                NameStyle::Shape => shape_name(template, attempt / ATTEMPTS_PER_LENGTH, rng),
                NameStyle::Words => word_name(template, attempt, rng),
            };
            if is_acceptable(&candidate) && !self.taken.contains(&candidate) {
                self.taken.insert(candidate.clone());
                return candidate;
            }
            attempt += 1;
        }
    }
}

fn random_lower<R: Rng + ?Sized>(rng: &mut R) -> char {
    char::from(b'a' + rng.random_range(0..26u8))
}

fn random_upper<R: Rng + ?Sized>(rng: &mut R) -> char {
    char::from(b'A' + rng.random_range(0..26u8))
}

fn random_digit<R: Rng + ?Sized>(rng: &mut R) -> char {
    char::from(b'0' + rng.random_range(0..10u8))
}

/// Random name following the template's length and per-position classes
///
/// `extra` appends that many lowercase letters.
fn shape_name<R: Rng + ?Sized>(template: &str, extra: usize, rng: &mut R) -> String {
    let mut chars: Vec<char> = template.chars().collect();
    if chars.is_empty() {
        chars.push('a');
    }

    let mut out = String::with_capacity(chars.len() + extra);
    for (i, c) in chars.iter().enumerate() {
        let first = i == 0;
        let generated = if c.is_ascii_uppercase() {
            random_upper(rng)
        } else if c.is_ascii_digit() {
            if first {
                random_lower(rng)
            } else {
                random_digit(rng)
            }
        } else if c.is_alphabetic() {
            random_lower(rng)
        } else if *c == '_' {
            '_'
        } else if matches!(c, '-' | '.') {
            if first {
                random_lower(rng)
            } else {
                *c
            }
        } else {
            '_'
        };
        out.push(generated);
    }
    for _ in 0..extra {
        out.push(random_lower(rng));
    }
    out
}

/// Dictionary word, capitalized like the template, with a numeric suffix
/// once plain words keep colliding
fn word_name<R: Rng + ?Sized>(template: &str, attempt: usize, rng: &mut R) -> String {
    let word = WORDS[rng.random_range(0..WORDS.len())];
    let mut name = if template.chars().next().is_some_and(|c| c.is_uppercase()) {
        let mut chars = word.chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    } else {
        word.to_string()
    };
    if attempt >= PLAIN_WORD_ATTEMPTS {
        name.push_str(&rng.random_range(2..100 + attempt).to_string());
    }
    name
}

fn is_acceptable(name: &str) -> bool {
    match name.chars().next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    !name.to_ascii_lowercase().starts_with("xml")
}
