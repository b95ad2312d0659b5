use super::*;

/// Deduct `floor(amount * rate / 10000)` from `amount`.
///
/// `rate` must be a valid rate, so the commission never exceeds `amount`.
pub fn calc_shares(amount: Amount, rate: BasisPoints) -> Shares {
    let commission = rate * amount;
    Shares {
        commission,
        payout: Amount::from_micro_ccd(amount.micro_ccd.saturating_sub(commission.micro_ccd)),
    }
}

#[concordium_cfg_test]
mod tests {
    use super::*;

    #[concordium_test]
    fn test_shares() {
        let expected_shares = Shares {
            commission: Amount::from_micro_ccd(2),
            payout: Amount::from_micro_ccd(98),
        };

        let actual_shares = calc_shares(Amount::from_micro_ccd(100), BasisPoints::from_bps(200));

        claim_eq!(expected_shares, actual_shares);
    }

    #[concordium_test]
    fn test_shares_sum_to_amount() {
        let amount = Amount::from_micro_ccd(12_345);
        let shares = calc_shares(amount, BasisPoints::from_bps(333));

        claim_eq!(shares.commission, Amount::from_micro_ccd(411));
        claim_eq!(shares.commission + shares.payout, amount);
    }

    #[concordium_test]
    fn test_zero_and_full_rate() {
        let amount = Amount::from_ccd(7);

        let none = calc_shares(amount, BasisPoints::from_bps(0));
        claim_eq!(none.commission, Amount::zero());
        claim_eq!(none.payout, amount);

        let all = calc_shares(amount, BasisPoints::from_percent(100));
        claim_eq!(all.commission, amount);
        claim_eq!(all.payout, Amount::zero());
    }
}
