// ⌨️ Input Parsing - text from form fields into typed values
//
// Front-ends collect raw strings. Amounts must be plain digit runs; new PINs
// must be exactly 4 digits.

use crate::error::{AtmError, AtmResult};
use crate::pin::is_valid_pin;

// ============================================================================
// AMOUNT VALIDATION
// ============================================================================

/// Turns an amount field into a number
///
/// Implement this to accept other formats (decimals, thousands separators)
/// without touching the teller.
pub trait AmountValidator {
    fn validate_amount(&self, amount: &str) -> AtmResult<f64>;
}

/// Accepts only non-empty runs of ASCII digits
#[derive(Debug, Clone, Copy, Default)]
pub struct DigitsOnly;

impl AmountValidator for DigitsOnly {
    fn validate_amount(&self, amount: &str) -> AtmResult<f64> {
        let trimmed = amount.trim();

        if trimmed.is_empty() || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(AtmError::InvalidAmountInput);
        }

        let value: f64 = trimmed.parse().map_err(|_| AtmError::InvalidAmountInput)?;
        if !value.is_finite() {
            return Err(AtmError::InvalidAmountInput);
        }

        Ok(value)
    }
}

/// Parse an amount field with the default digits-only rule
pub fn parse_amount(text: &str) -> AtmResult<f64> {
    DigitsOnly.validate_amount(text)
}

/// Check a new PIN typed into the change-PIN dialog
pub fn parse_new_pin(text: &str) -> AtmResult<&str> {
    if is_valid_pin(text) {
        Ok(text)
    } else {
        Err(AtmError::InvalidNewPin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("50", 50.0)]
    #[case("0", 0.0)]
    #[case("007", 7.0)]
    #[case(" 120 ", 120.0)]
    fn test_parse_amount_accepts_digits(#[case] text: &str, #[case] expected: f64) {
        assert_eq!(parse_amount(text), Ok(expected));
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("12.5")]
    #[case("-5")]
    #[case("+5")]
    #[case("1e3")]
    #[case("abc")]
    #[case("1 000")]
    fn test_parse_amount_rejects_non_digits(#[case] text: &str) {
        assert_eq!(parse_amount(text), Err(AtmError::InvalidAmountInput));
    }

    #[test]
    fn test_parse_amount_rejects_overflow() {
        let huge = "9".repeat(400);
        assert_eq!(parse_amount(&huge), Err(AtmError::InvalidAmountInput));
    }

    #[test]
    fn test_parse_new_pin() {
        assert_eq!(parse_new_pin("4321"), Ok("4321"));
        assert_eq!(parse_new_pin("432"), Err(AtmError::InvalidNewPin));
        assert_eq!(parse_new_pin("43210"), Err(AtmError::InvalidNewPin));
        assert_eq!(parse_new_pin("43x1"), Err(AtmError::InvalidNewPin));
    }
}
