//! kWh extraction from free-form model output.
//!
//! The default strategy is deliberately naive: every ASCII digit and `.` in the
//! text is concatenated and parsed. Several numbers in one response therefore
//! run together ("10.5 kWh over 3 months" → 10.53), and two decimal points make
//! the parse fail. Any failure degrades to `0.0`; callers never see an error.
//!
//! `ExtractionMode::FirstMatch` takes the first number token instead. It is
//! opt-in and changes results for multi-number responses.

use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionMode {
    /// Concatenate all digits and periods, then parse.
    #[default]
    Concatenate,
    /// First `digits[.digits]` (or `.digits`) token in the text.
    FirstMatch,
}

impl FromStr for ExtractionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "concatenate" => Ok(ExtractionMode::Concatenate),
            "first_match" => Ok(ExtractionMode::FirstMatch),
            other => Err(format!(
                "unknown extraction mode '{other}' (expected 'concatenate' or 'first_match')"
            )),
        }
    }
}

impl ExtractionMode {
    pub fn extract(&self, text: &str) -> f64 {
        match self {
            ExtractionMode::Concatenate => extract_number(text),
            ExtractionMode::FirstMatch => first_number(text),
        }
    }
}

/// Concatenates every ASCII digit and `.` in `text` and parses the result.
/// Returns `0.0` when the concatenation is empty, not a valid float, or too
/// long to be finite.
pub fn extract_number(text: &str) -> f64 {
    let digits: String = text
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    digits
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Parses the first number token in `text`, or `0.0` if there is none.
pub fn first_number(text: &str) -> f64 {
    static NUMBER: OnceLock<Regex> = OnceLock::new();
    let re = NUMBER.get_or_init(|| {
        Regex::new(r"\d+(?:\.\d+)?|\.\d+").expect("number pattern is a valid regex")
    });
    re.find(text)
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}
