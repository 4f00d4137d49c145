use crate::error::CoreError;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;

/// Decimal places of the options venue's native price and strike units.
pub const PLATFORM_PRECISION: u32 = 6;

/// Converts a human-readable amount (e.g. a strike of `150.5`) into native units.
///
/// Amounts with more precision than the platform supports are rejected rather
/// than rounded, so a strike never silently matches a neighbouring slot.
pub fn to_native(amount: Decimal) -> Result<u64, CoreError> {
    if amount.is_sign_negative() {
        return Err(CoreError::InvalidInput(
            "amount".to_string(),
            format!("{amount} is negative"),
        ));
    }
    let overflow =
        || CoreError::InvalidInput("amount".to_string(), format!("{amount} overflows u64"));
    let scaled = amount
        .checked_mul(Decimal::from(10u64.pow(PLATFORM_PRECISION)))
        .ok_or_else(overflow)?;
    if scaled.fract() != Decimal::ZERO {
        return Err(CoreError::InvalidInput(
            "amount".to_string(),
            format!("{amount} has more than {PLATFORM_PRECISION} decimal places"),
        ));
    }
    scaled.to_u64().ok_or_else(overflow)
}

pub fn from_native(native: u64) -> Decimal {
    Decimal::from_i128_with_scale(native as i128, PLATFORM_PRECISION).normalize()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn converts_to_six_decimal_native_units() {
        assert_eq!(to_native(dec!(150)).unwrap(), 150_000_000);
        assert_eq!(to_native(dec!(0.000001)).unwrap(), 1);
        assert_eq!(from_native(150_500_000), dec!(150.5));
    }

    #[test]
    fn rejects_excess_precision_and_negatives() {
        assert!(to_native(dec!(1.0000001)).is_err());
        assert!(to_native(dec!(-1)).is_err());
    }

    #[test]
    fn oversized_amounts_are_errors_not_panics() {
        let huge = Decimal::from_scientific("1e23").unwrap();
        for amount in [Decimal::MAX, huge, dec!(18446744073709.551616)] {
            match to_native(amount) {
                Err(CoreError::InvalidInput(field, reason)) => {
                    assert_eq!(field, "amount");
                    assert!(reason.contains("overflows"), "unexpected reason: {reason}");
                }
                other => panic!("expected an overflow error for {amount}, got {other:?}"),
            }
        }
    }
}
