use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Ratios and rates expressed as decimals (0.5 = 50%). Never as percentages.
pub type Rate = Decimal;

/// Scale used for rates and prorata ratios.
pub const CALCULATION_SCALE: u32 = 20;

/// Scale of every stored monetary result.
pub const RETURNED_SCALE: u32 = 2;

/// Round half-up to the monetary output scale.
pub fn round_returned(value: Decimal) -> Money {
    let mut rounded =
        value.round_dp_with_strategy(RETURNED_SCALE, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(RETURNED_SCALE);
    rounded
}

/// Round half-up to the internal calculation scale.
pub fn round_calculation(value: Decimal) -> Rate {
    value.round_dp_with_strategy(CALCULATION_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: format!(
                "rust_decimal_128bit (calc scale {CALCULATION_SCALE}, returned scale {RETURNED_SCALE})"
            ),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_round_returned_is_half_up() {
        assert_eq!(round_returned(dec!(0.125)), dec!(0.13));
        assert_eq!(round_returned(dec!(0.124)), dec!(0.12));
        assert_eq!(round_returned(dec!(-0.125)), dec!(-0.13));
        assert_eq!(round_returned(dec!(1000)).to_string(), "1000.00");
    }

    #[test]
    fn test_round_calculation_keeps_twenty_places() {
        let third = Decimal::ONE / dec!(3);
        let rounded = round_calculation(third);
        assert_eq!(rounded.scale(), CALCULATION_SCALE);
        assert_eq!(rounded, dec!(0.33333333333333333333));
    }
}
