//! Money amounts stored as `NUMERIC(12, 2)`

use rust_decimal::Decimal;

use crate::{Error, Result};

pub const AMOUNT_DECIMAL_PLACES: u32 = 2;
pub const AMOUNT_INTEGER_DIGITS: u32 = 10;

/// Reject amounts the column cannot hold, naming `field` in the message.
///
/// Trailing zeros do not count against the scale (`85000.000` is fine).
pub fn check_amount(field: &str, amount: Decimal) -> Result<()> {
    if amount.is_sign_negative() {
        return Err(Error::Validation(format!("{}: must not be negative", field)));
    }
    if amount.normalize().scale() > AMOUNT_DECIMAL_PLACES {
        return Err(Error::Validation(format!(
            "{}: at most {} decimal places are allowed",
            field, AMOUNT_DECIMAL_PLACES
        )));
    }
    if amount.trunc() >= Decimal::from(10_i64.pow(AMOUNT_INTEGER_DIGITS)) {
        return Err(Error::Validation(format!(
            "{}: at most {} digits are allowed before the decimal point",
            field, AMOUNT_INTEGER_DIGITS
        )));
    }
    Ok(())
}
