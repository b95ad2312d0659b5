use super::*;

use core::convert::TryInto;
use core::ops::Mul;

/// Fixed-point ratio in basis points, `10000` being 100%.
///
/// Used both as a rate (commission, at most 100%) and as a multiplier
/// (minimum bid increment, at least 100%).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, SchemaType)]
pub struct BasisPoints(u64);

impl BasisPoints {
    pub const fn from_bps(bps: u64) -> Self {
        Self(bps)
    }

    pub fn from_percent(percent: u64) -> Self {
        Self(percent * 100)
    }

    pub fn bps(&self) -> u64 {
        self.0
    }

    /// Whether this value is usable as a rate, i.e. at most 100%.
    pub fn is_rate(&self) -> bool {
        self.0 <= BPS_DENOMINATOR
    }

    /// Strict comparison `amount > of * self`, without rounding.
    pub fn is_exceeded_by(&self, amount: Amount, of: Amount) -> bool {
        amount.micro_ccd as u128 * BPS_DENOMINATOR as u128 > of.micro_ccd as u128 * self.0 as u128
    }
}

/// Rounds down.
impl Mul<Amount> for BasisPoints {
    type Output = Amount;

    fn mul(self, rhs: Amount) -> Self::Output {
        Amount::from_micro_ccd(
            (rhs.micro_ccd as u128 * self.0 as u128 / BPS_DENOMINATOR as u128)
                .try_into()
                .unwrap_or(u64::MAX),
        )
    }
}

#[concordium_cfg_test]
mod tests {
    use super::*;

    #[concordium_test]
    fn test_mul_rounds_down() {
        let rate = BasisPoints::from_bps(200);
        claim_eq!(rate * Amount::from_micro_ccd(100), Amount::from_micro_ccd(2));
        claim_eq!(rate * Amount::from_micro_ccd(149), Amount::from_micro_ccd(2));
        claim_eq!(rate * Amount::from_micro_ccd(49), Amount::zero());
    }

    #[concordium_test]
    fn test_increment_is_strict() {
        let increment = BasisPoints::from_bps(10_500);
        let leader = Amount::from_micro_ccd(100);

        claim!(!increment.is_exceeded_by(Amount::from_micro_ccd(104), leader));
        claim!(!increment.is_exceeded_by(Amount::from_micro_ccd(105), leader));
        claim!(increment.is_exceeded_by(Amount::from_micro_ccd(106), leader));
        claim!(increment.is_exceeded_by(Amount::from_micro_ccd(1), Amount::zero()));
    }

    #[concordium_test]
    fn test_no_overflow_on_large_amounts() {
        let increment = BasisPoints::from_bps(10_500);
        let max = Amount::from_micro_ccd(u64::MAX);

        claim!(!increment.is_exceeded_by(max, max));
        claim_eq!(BasisPoints::from_percent(100) * max, max);
    }

    #[concordium_test]
    fn test_is_rate() {
        claim!(BasisPoints::from_bps(10_000).is_rate());
        claim!(!BasisPoints::from_bps(10_001).is_rate());
    }
}
