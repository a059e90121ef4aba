use crate::error::AmountConversionError;
use rust_decimal::{Decimal, prelude::ToPrimitive};
use settleup_domain::Money;

const MAX_CURRENCY_SCALE: u32 = 18;

/// Describes the currency a group keeps its books in.
///
/// This is the only place decimal amounts are turned into integer minor
/// units and back; everything past it works on `Money`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CurrencyContext {
    /// Number of decimal places of the minor unit (2 for cents, 0 for yen).
    scale: u32,
    /// Printed before display amounts, may be empty.
    symbol: String,
}

impl CurrencyContext {
    pub fn new(scale: u32, symbol: &str) -> Result<Self, AmountConversionError> {
        validate_scale(scale)?;
        Ok(Self {
            scale,
            symbol: symbol.to_owned(),
        })
    }

    pub fn cents() -> Self {
        Self {
            scale: 2,
            symbol: String::new(),
        }
    }

    pub fn scale(&self) -> u32 {
        self.scale
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    /// Converts a display amount into minor units without rounding.
    pub fn to_minor_units(&self, amount: Decimal) -> Result<i64, AmountConversionError> {
        let factor = Decimal::from_i128_with_scale(10_i128.pow(self.scale), 0);
        let units = amount
            .checked_mul(factor)
            .ok_or(AmountConversionError::OutOfRange)?;
        if units.fract() != Decimal::ZERO {
            return Err(AmountConversionError::NonIntegral);
        }
        units.to_i64().ok_or(AmountConversionError::OutOfRange)
    }

    pub fn to_decimal(&self, amount: Money) -> Decimal {
        Decimal::new(amount.amount(), self.scale)
    }

    pub fn display(&self, amount: Money) -> String {
        let value = self.to_decimal(amount);
        if value.is_sign_negative() && !value.is_zero() {
            format!("-{}{}", self.symbol, value.abs())
        } else {
            format!("{}{value}", self.symbol)
        }
    }
}

impl Default for CurrencyContext {
    fn default() -> Self {
        Self::cents()
    }
}

fn validate_scale(scale: u32) -> Result<(), AmountConversionError> {
    if scale > MAX_CURRENCY_SCALE {
        return Err(AmountConversionError::UnsupportedScale {
            scale,
            max_supported: MAX_CURRENCY_SCALE,
        });
    }
    Ok(())
}
