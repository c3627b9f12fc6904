use crate::error::{RecipeError, Result};

/// Split an ingredient quantity into its numeric part and the rest.
///
/// Digits are collected wherever they appear, along with at most one `.`
/// once a digit run has started; the remaining characters are returned
/// trimmed. Returns `None` when there is no number, or when a `/` or a
/// second `.` follows the digits (fractions and version-like strings are
/// left alone).
pub fn extract_digits(quantity: &str) -> Option<(String, String)> {
    let mut number = String::new();
    let mut rest = String::new();
    let mut seen_dot = false;

    for c in quantity.chars() {
        let started = !number.is_empty();
        match c {
            '0'..='9' => number.push(c),
            '.' if started && !seen_dot => {
                seen_dot = true;
                number.push(c);
            }
            '/' | '.' if started => return None,
            _ => rest.push(c),
        }
    }

    if number.is_empty() {
        return None;
    }
    Some((number, rest.trim().to_string()))
}

/// Scale an ingredient quantity by a multiplier.
///
/// `"5 Tablespoons" x "2.0"` becomes `"10 Tablespoons"`. Quantities with no
/// usable number come back as `"{quantity} x {multiplier}"`.
pub fn apply_multiplier(quantity: &str, multiplier: &str) -> String {
    let unscaled = || format!("{quantity} x {multiplier}");

    let Some((number, rest)) = extract_digits(quantity) else {
        return unscaled();
    };
    let (Ok(n), Ok(m)) = (number.parse::<f64>(), multiplier.trim().parse::<f64>()) else {
        return unscaled();
    };
    let scaled = n * m;
    if !scaled.is_finite() {
        return unscaled();
    }

    let number = format_number(scaled);
    if rest.is_empty() {
        number
    } else {
        format!("{number} {rest}")
    }
}

/// Validate a user-entered multiplier: a finite number greater than zero.
pub fn parse_multiplier(multiplier: &str) -> Result<f64> {
    match multiplier.trim().parse::<f64>() {
        Ok(m) if m.is_finite() && m > 0.0 => Ok(m),
        _ => Err(RecipeError::InvalidMultiplier(multiplier.to_string())),
    }
}

/// Recipe title as shown during a scaled walkthrough, e.g. `"Lasagna x 2"`.
pub fn display_title(title: &str, multiplier: Option<&str>) -> String {
    match multiplier {
        Some(m) => format!("{title} x {m}"),
        None => title.to_string(),
    }
}

fn format_number(value: f64) -> String {
    // Whole results drop the decimal point: 10, not 10.0.
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}
