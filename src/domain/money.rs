//! Monetary types for price, volume and fraction representation.

use rust_decimal::Decimal;

/// Price in quote currency per unit of base currency.
pub type Price = Decimal;

/// Currency amount.
pub type Volume = Decimal;

/// Dimensionless ratio such as a fee rate or fill progress.
pub type Fraction = Decimal;

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn price_times_volume_is_exact() {
        let price: Price = dec!(0.05123);
        let volume: Volume = dec!(3.2);
        let fee: Fraction = dec!(0.001);

        assert_eq!(price * volume, dec!(0.163936));
        assert_eq!(volume * fee, dec!(0.0032));
    }
}
