//! Data Sanitization
//!
//! Input cleaning for data that crosses the crate boundary.
//!
//! Functions:
//! - Operand token parsing for outline path data
//! - Accuracy and sensitivity clamping

use crate::types::{MAX_SENSITIVITY, MIN_SENSITIVITY};

/// Split operand text on whitespace and commas and keep the finite numbers.
///
/// Malformed tokens (`"1O"`, `"Z"`, `"3-4"`, `"inf"`) are dropped silently.
pub fn parse_operands(text: &str) -> Vec<f64> {
    text.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|token| !token.is_empty())
        .filter_map(|token| token.parse::<f64>().ok())
        .filter(|value| value.is_finite())
        .collect()
}

/// Clamp an accuracy value into [0, 100]; NaN becomes 0
pub fn sanitize_accuracy(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 100.0)
    }
}

/// Clamp a sensitivity setting into [1, 10]
pub fn clamp_sensitivity(value: u8) -> u8 {
    value.clamp(MIN_SENSITIVITY, MAX_SENSITIVITY)
}
