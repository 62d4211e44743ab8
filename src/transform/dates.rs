//! Date and date-time reformatting
//!
//! Recognizes a handful of common calendar layouts and ISO 8601 /
//! RFC 3339 timestamps, and rewrites them into a different layout picked
//! from an output pool.

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use rand::Rng;
use std::fmt::{Display, Write};

/// Date layouts recognized in input values
pub const RECOGNIZED_DATE_FORMATS: &[&str] =
    &["%Y-%m-%d", "%m/%d/%Y", "%d.%m.%Y", "%Y/%m/%d", "%d-%b-%Y"];

/// Default output pool
pub const DEFAULT_OUTPUT_FORMATS: &[&str] = &["%m/%d/%Y", "%d.%m.%Y", "%Y/%m/%d", "%d-%b-%Y"];

/// Date-time layouts recognized in input values (RFC 3339 is handled separately)
const RECOGNIZED_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
];

/// Time suffix appended to the chosen date layout for date-times
const TIME_SUFFIX: &str = " %H:%M:%S";

/// A recognized temporal value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Recognized {
    /// A plain date and the layout it was written in
    Date(NaiveDate, &'static str),
    DateTime(NaiveDateTime),
}

/// Check that a strftime pattern is usable for formatting
pub fn validate_format(pattern: &str) -> Result<(), String> {
    if pattern.trim().is_empty() {
        return Err("date format must not be empty".to_string());
    }
    if StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error)) {
        return Err(format!("'{}' is not a valid date format", pattern));
    }
    // Patterns can parse fine yet ask for fields a value lacks (%H on a date, %z anywhere)
    let date_ok = render(NaiveDate::default().format(pattern)).is_some();
    let datetime_ok =
        render(NaiveDateTime::default().format(&format!("{}{}", pattern, TIME_SUFFIX))).is_some();
    if !(date_ok && datetime_ok) {
        return Err(format!(
            "'{}' uses fields a plain date does not have (time of day or time zone)",
            pattern
        ));
    }
    Ok(())
}

/// Format into a string, or `None` when the layout cannot be rendered
fn render(formatted: impl Display) -> Option<String> {
    let mut out = String::new();
    write!(out, "{}", formatted).ok()?;
    Some(out)
}

/// Rewrites recognized dates using a pool of output layouts
#[derive(Debug, Clone)]
pub struct DateReformatter {
    pool: Vec<String>,
}

impl Default for DateReformatter {
    fn default() -> Self {
        Self {
            pool: DEFAULT_OUTPUT_FORMATS.iter().map(|f| f.to_string()).collect(),
        }
    }
}

impl DateReformatter {
    /// Create a reformatter with a custom output pool
    pub fn new(pool: Vec<String>) -> Result<Self, String> {
        if pool.is_empty() {
            return Err("at least one output date format is required".to_string());
        }
        for pattern in &pool {
            validate_format(pattern)?;
        }
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &[String] {
        &self.pool
    }

    /// Reformat a value if it is a recognized date
    ///
    /// Returns `None` for anything that is not a date, leaving it untouched.
    pub fn reformat<R: Rng + ?Sized>(&self, value: &str, rng: &mut R) -> Option<String> {
        let out = match recognize(value.trim())? {
            Recognized::Date(date, source_layout) => {
                let candidates: Vec<&String> =
                    self.pool.iter().filter(|f| f.as_str() != source_layout).collect();
                let layout = if candidates.is_empty() {
                    &self.pool[rng.random_range(0..self.pool.len())]
                } else {
                    candidates[rng.random_range(0..candidates.len())]
                };
                render(date.format(layout))?
            }
            Recognized::DateTime(dt) => {
                let layout = &self.pool[rng.random_range(0..self.pool.len())];
                render(dt.format(&format!("{}{}", layout, TIME_SUFFIX)))?
            }
        };
        (out != value).then_some(out)
    }
}

fn recognize(value: &str) -> Option<Recognized> {
    // Cheap guard: every recognized layout starts with a digit and is short
    if value.len() < 8 || value.len() > 40 || !value.starts_with(|c: char| c.is_ascii_digit()) {
        return None;
    }

    for layout in RECOGNIZED_DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, layout) {
            return Some(Recognized::Date(date, *layout));
        }
    }

    for layout in RECOGNIZED_DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, layout) {
            return Some(Recognized::DateTime(dt));
        }
    }

    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| Recognized::DateTime(dt.naive_local()))
}
