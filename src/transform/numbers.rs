//! Number reformatting
//!
//! Produces alternate renderings of numeric values: digit grouping for
//! large integers, and a different precision or scientific notation for
//! fractional values. Results are always strings.

use rand::Rng;

use crate::document::Number;

/// Separators used for digit grouping
const GROUP_SEPARATORS: &[char] = &[',', ' ', '.', '\''];

/// Smallest magnitude that gets grouped
const GROUPING_THRESHOLD: u64 = 1000;

/// Reformat a numeric scalar
///
/// Returns `None` when the number has no plausible alternate rendering
/// (small integers, non-finite floats).
pub fn reformat_number<R: Rng + ?Sized>(number: &Number, rng: &mut R) -> Option<String> {
    match *number {
        Number::Int(n) => group_integer(n < 0, n.unsigned_abs(), rng),
        Number::UInt(n) => group_integer(false, n, rng),
        Number::Float(f) => reformat_float(f, rng),
    }
}

/// Reformat a string that holds a plain decimal number
///
/// Strings with leading zeros (codes, identifiers) are left alone.
pub fn reformat_numeric_str<R: Rng + ?Sized>(value: &str, rng: &mut R) -> Option<String> {
    let digits = value.strip_prefix('-').unwrap_or(value);
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return None;
    }
    if digits.len() > 1 && digits.starts_with('0') && !digits.starts_with("0.") {
        return None;
    }

    let number = match digits.matches('.').count() {
        0 => match value.parse::<i64>() {
            Ok(n) => Number::Int(n),
            Err(_) => return None,
        },
        1 if !digits.starts_with('.') && !digits.ends_with('.') => {
            Number::Float(value.parse::<f64>().ok()?)
        }
        _ => return None,
    };

    reformat_number(&number, rng).filter(|out| out != value)
}

fn group_integer<R: Rng + ?Sized>(negative: bool, magnitude: u64, rng: &mut R) -> Option<String> {
    if magnitude < GROUPING_THRESHOLD {
        return None;
    }
    let separator = GROUP_SEPARATORS[rng.random_range(0..GROUP_SEPARATORS.len())];

    let digits = magnitude.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if negative {
        grouped.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(separator);
        }
        grouped.push(c);
    }
    Some(grouped)
}

fn reformat_float<R: Rng + ?Sized>(value: f64, rng: &mut R) -> Option<String> {
    if !value.is_finite() {
        return None;
    }
    let original = value.to_string();

    // Five options: scientific notation or 1-4 decimals
    for _ in 0..5 {
        let choice = rng.random_range(0..5usize);
        let out = if choice == 0 {
            format!("{:e}", value)
        } else {
            format!("{:.*}", choice, value)
        };
        if out != original {
            return Some(out);
        }
    }
    Some(format!("{:e}", value)).filter(|out| *out != original)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(3)
    }

    fn strip_separators(s: &str) -> String {
        s.chars().filter(|c| !GROUP_SEPARATORS.contains(c)).collect()
    }

    #[test]
    fn test_small_integers_unchanged() {
        let mut rng = rng();
        assert_eq!(reformat_number(&Number::Int(999), &mut rng), None);
        assert_eq!(reformat_number(&Number::Int(-12), &mut rng), None);
        assert_eq!(reformat_number(&Number::UInt(0), &mut rng), None);
    }

    #[test]
    fn test_large_integers_grouped() {
        let mut rng = rng();
        for _ in 0..20 {
            let out = reformat_number(&Number::Int(-1234567), &mut rng).unwrap();
            assert_eq!(out.chars().count(), 10, "{}", out);
            assert_eq!(strip_separators(&out), "-1234567");
            let sep = out.chars().nth(2).unwrap();
            assert!(GROUP_SEPARATORS.contains(&sep));
            assert_eq!(out.chars().nth(6), Some(sep));
        }
    }

    #[test]
    fn test_float_changes_rendering() {
        let mut rng = rng();
        for _ in 0..20 {
            let out = reformat_number(&Number::Float(12.5), &mut rng).unwrap();
            assert_ne!(out, "12.5");
            let parsed: f64 = out.parse().unwrap();
            assert!((parsed - 12.5).abs() < 0.1, "{}", out);
        }
        assert_eq!(reformat_number(&Number::Float(f64::NAN), &mut rng), None);
    }

    #[test]
    fn test_numeric_strings() {
        let mut rng = rng();
        assert!(reformat_numeric_str("250000", &mut rng).is_some());
        assert!(reformat_numeric_str("3.25", &mut rng).is_some());
        assert_eq!(reformat_numeric_str("01234", &mut rng), None);
        assert_eq!(reformat_numeric_str("12", &mut rng), None);
        assert_eq!(reformat_numeric_str("1.2.3", &mut rng), None);
        assert_eq!(reformat_numeric_str("abc", &mut rng), None);
        assert_eq!(reformat_numeric_str("-", &mut rng), None);
    }
}
