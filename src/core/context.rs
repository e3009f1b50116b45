use rust_decimal::{Decimal, RoundingStrategy};

/// Default number of decimal places for reported monetary figures
pub const DEFAULT_PRECISION: u32 = 2;

/// Precision and rounding mode applied at every quantize point
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalcContext {
    pub precision: u32,
    pub rounding: RoundingStrategy,
}

impl CalcContext {
    /// Round-half-up (ties away from zero) at the given number of places
    pub fn new(precision: u32) -> Self {
        CalcContext {
            precision,
            rounding: RoundingStrategy::MidpointAwayFromZero,
        }
    }

    /// Quantize a value to the context precision
    pub fn quantize(&self, value: Decimal) -> Decimal {
        value.round_dp_with_strategy(self.precision, self.rounding)
    }
}

impl Default for CalcContext {
    fn default() -> Self {
        CalcContext::new(DEFAULT_PRECISION)
    }
}
