use commons::{calc_shares, BasisPoints, CustomContractError, MAX_PRIZE_LENGTH};
use concordium_std::*;

use crate::external::{AuctionView, InitParams, LeaderView};

/// An admitted bid. Never changes once recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, SchemaType)]
pub struct Bid {
    pub amount: Amount,
    pub bidder: AccountAddress,
}

/// A transfer settlement has to issue. On failure it is deferred to
/// the pending payouts of `account`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Payout {
    pub account: AccountAddress,
    pub amount: Amount,
}

/// Outcome of a settlement. All deposits are already cleared, the payouts MUST
/// be transferred or deferred.
#[must_use]
pub struct Settlement {
    pub winner: Option<AccountAddress>,
    pub winning_amount: Amount,
    /// Payouts in the order they have to be issued. Zero amounts are left out.
    pub payouts: Vec<Payout>,
}

impl Settlement {
    fn push(&mut self, account: AccountAddress, amount: Amount) {
        if amount > Amount::zero() {
            self.payouts.push(Payout { account, amount });
        }
    }
}

/// The contract state.
#[derive(Serial, DeserialWithState)]
#[concordium(state_parameter = "S")]
pub struct State<S: HasStateApi> {
    /// Auction creator. Can not bid, settles the auction.
    owner: AccountAddress,
    prize: String,
    start_time: Timestamp,
    /// Moves forward on late bids.
    end_time: Timestamp,
    extension_window: Duration,
    min_increment: BasisPoints,
    commission: BasisPoints,
    commission_applies_to_winner: bool,
    commission_beneficiary: AccountAddress,
    settled: bool,
    highest_bid: Option<Bid>,
    /// Every admitted bid in admission order.
    history: Vec<Bid>,
    /// Value held for every bidder: sum of their bids minus refunds.
    deposits: StateMap<AccountAddress, Amount, S>,
    /// Individual bid amounts per bidder in admission order.
    bids_by_bidder: StateMap<AccountAddress, Vec<Amount>, S>,
    /// Settlement payouts whose transfer failed, claimable with `withdraw`.
    pending_payouts: StateMap<AccountAddress, Amount, S>,
}

impl<S: HasStateApi> State<S> {
    /// Create an auction without bids, open from `slot_time` till `params.end_time`.
    pub fn new(
        state_builder: &mut StateBuilder<S>,
        owner: AccountAddress,
        params: InitParams,
        slot_time: Timestamp,
    ) -> Result<Self, CustomContractError> {
        ensure!(
            params.prize.len() <= MAX_PRIZE_LENGTH,
            CustomContractError::InvalidParameters
        );
        ensure!(
            params.end_time > slot_time,
            CustomContractError::InvalidParameters
        );
        // A multiplier under 100% would let a lower bid take the lead
        ensure!(
            params.min_increment >= BasisPoints::from_percent(100),
            CustomContractError::InvalidParameters
        );
        ensure!(
            params.commission.is_rate(),
            CustomContractError::InvalidParameters
        );

        Ok(Self {
            owner,
            prize: params.prize,
            start_time: slot_time,
            end_time: params.end_time,
            extension_window: params.extension_window,
            min_increment: params.min_increment,
            commission: params.commission,
            commission_applies_to_winner: params.commission_applies_to_winner,
            commission_beneficiary: params.commission_beneficiary.unwrap_or(owner),
            settled: false,
            highest_bid: None,
            history: Vec::new(),
            deposits: state_builder.new_map(),
            bids_by_bidder: state_builder.new_map(),
            pending_payouts: state_builder.new_map(),
        })
    }

    pub fn is_open(&self, slot_time: Timestamp) -> bool {
        slot_time < self.end_time
    }

    /// Admit a bid backed by `amount`, which the caller already transferred.
    ///
    /// Returns the new auction end if the bid extended it.
    pub fn bid(
        &mut self,
        bidder: AccountAddress,
        amount: Amount,
        slot_time: Timestamp,
    ) -> Result<Option<Timestamp>, CustomContractError> {
        ensure!(self.is_open(slot_time), CustomContractError::AuctionClosed);
        ensure!(amount > Amount::zero(), CustomContractError::ZeroBid);
        ensure!(
            self.min_increment
                .is_exceeded_by(amount, self.leader().amount),
            CustomContractError::InsufficientIncrement
        );
        ensure_ne!(bidder, self.owner, CustomContractError::OwnerCannotBid);

        self.bids_by_bidder
            .entry(bidder)
            .or_insert_with(Vec::new)
            .push(amount);
        *self.deposits.entry(bidder).or_insert_with(Amount::zero) += amount;

        let bid = Bid { amount, bidder };
        self.highest_bid = Some(bid);
        self.history.push(bid);

        let remaining = self
            .end_time
            .duration_since(slot_time)
            .unwrap_or_else(|| Duration::from_millis(0));
        if remaining < self.extension_window {
            // Added to the current end, so repeated late bids compound
            self.end_time = Timestamp::from_timestamp_millis(
                self.end_time
                    .timestamp_millis()
                    .saturating_add(self.extension_window.millis()),
            );
            Ok(Some(self.end_time))
        } else {
            Ok(None)
        }
    }

    /// Reset the deposit of `account` to its latest bid.
    ///
    /// Returns the excess that MUST be transferred back to `account`.
    pub fn refund(
        &mut self,
        account: AccountAddress,
        slot_time: Timestamp,
    ) -> Result<Amount, CustomContractError> {
        ensure!(self.is_open(slot_time), CustomContractError::AuctionClosed);

        // A single bid has no excess
        let last_bid = self
            .bids_by_bidder
            .get(&account)
            .and_then(|bids| {
                if bids.len() > 1 {
                    bids.last().copied()
                } else {
                    None
                }
            })
            .ok_or(CustomContractError::NothingToRefund)?;

        let excess = self
            .deposit_of(&account)
            .micro_ccd
            .saturating_sub(last_bid.micro_ccd);
        ensure!(excess > 0, CustomContractError::NothingToRefund);

        self.deposits.insert(account, last_bid);

        Ok(Amount::from_micro_ccd(excess))
    }

    /// Close the auction for good and clear every deposit.
    ///
    /// Payouts are ordered: owner proceeds (and the commission on them if it
    /// applies to the winner), the winner's deposit above the winning bid, then
    /// commission and refund for every other bidder in order of their first bid.
    pub fn settle(
        &mut self,
        sender: &Address,
        slot_time: Timestamp,
    ) -> Result<Settlement, CustomContractError> {
        ensure!(
            sender.matches_account(&self.owner),
            CustomContractError::Unauthorized
        );
        ensure!(
            !self.is_open(slot_time),
            CustomContractError::AuctionStillActive
        );
        ensure!(!self.settled, CustomContractError::AlreadySettled);

        self.settled = true;

        let mut settlement = Settlement {
            winner: self.highest_bid.map(|bid| bid.bidder),
            winning_amount: self.leader().amount,
            payouts: Vec::new(),
        };

        if let Some(winner) = settlement.winner {
            if self.commission_applies_to_winner {
                let shares = calc_shares(settlement.winning_amount, self.commission);
                settlement.push(self.owner, shares.payout);
                settlement.push(self.commission_beneficiary, shares.commission);
            } else {
                settlement.push(self.owner, settlement.winning_amount);
            }

            let held = self.deposit_of(&winner);
            self.deposits.insert(winner, Amount::zero());
            settlement.push(
                winner,
                Amount::from_micro_ccd(
                    held.micro_ccd
                        .saturating_sub(settlement.winning_amount.micro_ccd),
                ),
            );
        }

        // Deposits are zeroed on the first occurrence, repeated bidders are skipped
        for bid in self.history.iter() {
            let deposit = self
                .deposits
                .get(&bid.bidder)
                .map(|deposit| *deposit)
                .unwrap_or_else(Amount::zero);
            if deposit == Amount::zero() {
                continue;
            }
            self.deposits.insert(bid.bidder, Amount::zero());

            let shares = calc_shares(deposit, self.commission);
            settlement.push(self.commission_beneficiary, shares.commission);
            settlement.push(bid.bidder, shares.payout);
        }

        Ok(settlement)
    }

    /// Park a payout that could not be transferred.
    pub fn defer_payout(&mut self, account: AccountAddress, amount: Amount) {
        *self
            .pending_payouts
            .entry(account)
            .or_insert_with(Amount::zero) += amount;
    }

    /// Clear the pending payout of `account`, returning the amount that MUST
    /// be transferred to it.
    pub fn take_pending_payout(
        &mut self,
        account: &AccountAddress,
    ) -> Result<Amount, CustomContractError> {
        let amount = self.pending_payout_of(account);
        ensure!(
            amount > Amount::zero(),
            CustomContractError::NothingToWithdraw
        );
        self.pending_payouts.remove(account);
        Ok(amount)
    }

    pub fn leader(&self) -> LeaderView {
        match self.highest_bid {
            Some(bid) => LeaderView {
                bidder: Some(bid.bidder),
                amount: bid.amount,
            },
            None => LeaderView {
                bidder: None,
                amount: Amount::zero(),
            },
        }
    }

    pub fn history(&self) -> &Vec<Bid> {
        &self.history
    }

    pub fn deposit_of(&self, account: &AccountAddress) -> Amount {
        self.deposits
            .get(account)
            .map(|deposit| *deposit)
            .unwrap_or_else(Amount::zero)
    }

    pub fn bids_of(&self, account: &AccountAddress) -> Vec<Amount> {
        self.bids_by_bidder
            .get(account)
            .map(|bids| bids.to_vec())
            .unwrap_or_default()
    }

    pub fn pending_payout_of(&self, account: &AccountAddress) -> Amount {
        self.pending_payouts
            .get(account)
            .map(|amount| *amount)
            .unwrap_or_else(Amount::zero)
    }

    pub fn prize(&self) -> &String {
        &self.prize
    }

    pub fn end_time(&self) -> Timestamp {
        self.end_time
    }

    pub fn commission(&self) -> BasisPoints {
        self.commission
    }

    pub fn is_settled(&self) -> bool {
        self.settled
    }

    pub fn view(&self) -> AuctionView {
        AuctionView {
            owner: self.owner,
            prize: self.prize.clone(),
            start_time: self.start_time,
            end_time: self.end_time,
            extension_window: self.extension_window,
            min_increment: self.min_increment,
            commission: self.commission,
            commission_applies_to_winner: self.commission_applies_to_winner,
            commission_beneficiary: self.commission_beneficiary,
            settled: self.settled,
            leader: self.leader(),
        }
    }
}

#[concordium_cfg_test]
mod tests {
    use super::*;
    use test_infrastructure::*;

    const OWNER: AccountAddress = AccountAddress([0; 32]);
    const ALICE: AccountAddress = AccountAddress([1; 32]);
    const BOB: AccountAddress = AccountAddress([2; 32]);
    const CAROL: AccountAddress = AccountAddress([3; 32]);

    const START: u64 = 1_000;
    const MINUTE: u64 = 60_000;
    const END: u64 = START + 60 * MINUTE;

    fn micro(amount: u64) -> Amount {
        Amount::from_micro_ccd(amount)
    }

    fn at(millis: u64) -> Timestamp {
        Timestamp::from_timestamp_millis(millis)
    }

    fn params() -> InitParams {
        InitParams {
            prize: String::from("Vintage guitar"),
            end_time: at(END),
            extension_window: Duration::from_minutes(10),
            min_increment: BasisPoints::from_bps(10_500),
            commission: BasisPoints::from_bps(200),
            commission_applies_to_winner: false,
            commission_beneficiary: None,
        }
    }

    fn new_state(params: InitParams) -> State<TestStateApi> {
        let mut state_builder = TestStateBuilder::new();
        State::new(&mut state_builder, OWNER, params, at(START))
            .expect_report("Failed to create state")
    }

    fn total_deposits(state: &State<TestStateApi>) -> u64 {
        state
            .deposits
            .iter()
            .fold(0, |acc, (_, deposit)| acc + deposit.micro_ccd)
    }

    #[concordium_test]
    fn test_new_rejects_invalid_params() {
        let mut state_builder = TestStateBuilder::new();

        let mut p = params();
        p.end_time = at(START);
        claim!(State::new(&mut state_builder, OWNER, p, at(START)).is_err());

        let mut p = params();
        p.min_increment = BasisPoints::from_bps(9_999);
        claim!(State::new(&mut state_builder, OWNER, p, at(START)).is_err());

        let mut p = params();
        p.commission = BasisPoints::from_bps(10_001);
        claim!(State::new(&mut state_builder, OWNER, p, at(START)).is_err());

        let mut p = params();
        p.prize = "x".repeat(MAX_PRIZE_LENGTH + 1);
        claim!(State::new(&mut state_builder, OWNER, p, at(START)).is_err());
    }

    #[concordium_test]
    fn test_bid_preconditions_in_order() {
        let mut state = new_state(params());

        // Closed auction is reported before anything else
        claim_eq!(
            state.bid(OWNER, Amount::zero(), at(END)),
            Err(CustomContractError::AuctionClosed)
        );
        claim_eq!(
            state.bid(OWNER, Amount::zero(), at(START)),
            Err(CustomContractError::ZeroBid)
        );

        claim_eq!(state.bid(ALICE, micro(100), at(START)), Ok(None));

        claim_eq!(
            state.bid(OWNER, micro(105), at(START)),
            Err(CustomContractError::InsufficientIncrement)
        );
        claim_eq!(
            state.bid(OWNER, micro(1_000), at(START)),
            Err(CustomContractError::OwnerCannotBid)
        );

        // Nothing was recorded by the rejected bids
        claim_eq!(state.history().len(), 1);
        claim_eq!(state.bids_of(&OWNER), Vec::<Amount>::new());
    }

    #[concordium_test]
    fn test_increment_boundary() {
        let mut state = new_state(params());
        claim_eq!(state.bid(ALICE, micro(100), at(START)), Ok(None));

        claim_eq!(
            state.bid(BOB, micro(104), at(START)),
            Err(CustomContractError::InsufficientIncrement)
        );
        claim_eq!(
            state.bid(BOB, micro(105), at(START)),
            Err(CustomContractError::InsufficientIncrement)
        );
        claim_eq!(state.bid(BOB, micro(106), at(START)), Ok(None));

        claim_eq!(
            state.leader(),
            LeaderView {
                bidder: Some(BOB),
                amount: micro(106),
            }
        );
    }

    #[concordium_test]
    fn test_highest_bid_tracks_maximum_and_deposits_add_up() {
        let mut state = new_state(params());
        let bids = [
            (ALICE, 10),
            (BOB, 20),
            (ALICE, 30),
            (CAROL, 40),
            (BOB, 50),
            (ALICE, 60),
        ];

        let mut deposited = 0;
        for (bidder, amount) in bids.iter() {
            let previous = state.leader().amount;
            claim_eq!(state.bid(*bidder, micro(*amount), at(START)), Ok(None));
            deposited += amount;

            claim!(state.leader().amount >= previous);
            claim_eq!(state.leader().amount, micro(*amount));
            claim_eq!(total_deposits(&state), deposited);
        }

        claim_eq!(state.deposit_of(&ALICE), micro(100));
        claim_eq!(state.deposit_of(&BOB), micro(70));
        claim_eq!(state.deposit_of(&CAROL), micro(40));
        claim_eq!(state.bids_of(&ALICE), vec![micro(10), micro(30), micro(60)]);

        let history: Vec<(AccountAddress, u64)> = state
            .history()
            .iter()
            .map(|bid| (bid.bidder, bid.amount.micro_ccd))
            .collect();
        claim_eq!(history, bids.to_vec());
    }

    #[concordium_test]
    fn test_late_bid_extends_deadline() {
        let mut state = new_state(params());

        // Exactly ten minutes left is not late
        claim_eq!(state.bid(ALICE, micro(100), at(END - 10 * MINUTE)), Ok(None));
        claim_eq!(state.end_time(), at(END));

        claim_eq!(
            state.bid(BOB, micro(200), at(END - 10 * MINUTE + 1)),
            Ok(Some(at(END + 10 * MINUTE)))
        );
        claim_eq!(state.end_time(), at(END + 10 * MINUTE));
    }

    #[concordium_test]
    fn test_last_second_bids_compound_deadline() {
        let mut state = new_state(params());
        let mut amount = 100;

        // Each bid lands a millisecond before the current end
        for round in 1..=20 {
            let now = state.end_time().timestamp_millis() - 1;
            claim_eq!(
                state.bid(if round % 2 == 0 { ALICE } else { BOB }, micro(amount), at(now)),
                Ok(Some(at(END + round * 10 * MINUTE)))
            );
            amount *= 2;
        }

        claim_eq!(state.end_time(), at(END + 200 * MINUTE));
    }

    #[concordium_test]
    fn test_refund_excess_over_latest_bid() {
        let mut state = new_state(params());
        claim_eq!(state.bid(ALICE, micro(10), at(START)), Ok(None));

        // A single bid has nothing in excess
        claim_eq!(
            state.refund(ALICE, at(START)),
            Err(CustomContractError::NothingToRefund)
        );

        claim_eq!(state.bid(ALICE, micro(20), at(START)), Ok(None));
        claim_eq!(state.bid(ALICE, micro(30), at(START)), Ok(None));
        claim_eq!(state.deposit_of(&ALICE), micro(60));

        claim_eq!(state.refund(ALICE, at(START)), Ok(micro(30)));
        claim_eq!(state.deposit_of(&ALICE), micro(30));
        claim_eq!(state.bids_of(&ALICE), vec![micro(10), micro(20), micro(30)]);

        // Collapsed to the latest bid, a second call has nothing left
        claim_eq!(
            state.refund(ALICE, at(START)),
            Err(CustomContractError::NothingToRefund)
        );

        // A further bid is refunded against the new latest bid
        claim_eq!(state.bid(ALICE, micro(40), at(START)), Ok(None));
        claim_eq!(state.refund(ALICE, at(START)), Ok(micro(30)));
        claim_eq!(state.deposit_of(&ALICE), micro(40));
        claim_eq!(total_deposits(&state), 40);
    }

    #[concordium_test]
    fn test_refund_rules() {
        let mut state = new_state(params());

        claim_eq!(
            state.refund(CAROL, at(START)),
            Err(CustomContractError::NothingToRefund)
        );

        claim_eq!(state.bid(ALICE, micro(10), at(START)), Ok(None));
        claim_eq!(state.bid(ALICE, micro(20), at(START)), Ok(None));
        claim_eq!(
            state.refund(ALICE, at(END)),
            Err(CustomContractError::AuctionClosed)
        );
        claim_eq!(state.deposit_of(&ALICE), micro(30));
    }

    #[concordium_test]
    fn test_settle_preconditions() {
        let mut state = new_state(params());
        claim_eq!(state.bid(ALICE, micro(100), at(START)), Ok(None));

        claim!(matches!(
            state.settle(&Address::Account(ALICE), at(END)),
            Err(CustomContractError::Unauthorized)
        ));
        claim!(matches!(
            state.settle(&Address::Account(OWNER), at(END - 1)),
            Err(CustomContractError::AuctionStillActive)
        ));
        claim!(!state.is_settled());

        claim!(state.settle(&Address::Account(OWNER), at(END)).is_ok());
        claim!(state.is_settled());
        claim!(matches!(
            state.settle(&Address::Account(OWNER), at(END + 1)),
            Err(CustomContractError::AlreadySettled)
        ));
    }

    #[concordium_test]
    fn test_settle_pays_winner_amount_and_refunds_losers() {
        let mut state = new_state(params());
        claim_eq!(state.bid(ALICE, micro(100), at(START)), Ok(None));
        claim_eq!(
            state.bid(BOB, micro(104), at(START)),
            Err(CustomContractError::InsufficientIncrement)
        );
        claim_eq!(state.bid(BOB, micro(106), at(START)), Ok(None));

        let settlement = state
            .settle(&Address::Account(OWNER), at(END))
            .expect_report("Settlement should pass");

        claim_eq!(settlement.winner, Some(BOB));
        claim_eq!(settlement.winning_amount, micro(106));
        claim_eq!(
            settlement.payouts,
            vec![
                Payout {
                    account: OWNER,
                    amount: micro(106)
                },
                Payout {
                    account: OWNER,
                    amount: micro(2)
                },
                Payout {
                    account: ALICE,
                    amount: micro(98)
                },
            ]
        );
        claim_eq!(total_deposits(&state), 0);
    }

    #[concordium_test]
    fn test_settle_processes_repeated_bidders_once() {
        let mut state = new_state(params());
        claim_eq!(state.bid(ALICE, micro(100), at(START)), Ok(None));
        claim_eq!(state.bid(BOB, micro(200), at(START)), Ok(None));
        claim_eq!(state.bid(ALICE, micro(300), at(START)), Ok(None));
        claim_eq!(state.bid(CAROL, micro(400), at(START)), Ok(None));
        claim_eq!(state.bid(BOB, micro(500), at(START)), Ok(None));

        let settlement = state
            .settle(&Address::Account(OWNER), at(END))
            .expect_report("Settlement should pass");

        // Bob wins with 500 and gets his first 200 back without commission
        claim_eq!(
            settlement.payouts,
            vec![
                Payout {
                    account: OWNER,
                    amount: micro(500)
                },
                Payout {
                    account: BOB,
                    amount: micro(200)
                },
                Payout {
                    account: OWNER,
                    amount: micro(8)
                },
                Payout {
                    account: ALICE,
                    amount: micro(392)
                },
                Payout {
                    account: OWNER,
                    amount: micro(8)
                },
                Payout {
                    account: CAROL,
                    amount: micro(392)
                },
            ]
        );
        let paid: u64 = settlement
            .payouts
            .iter()
            .map(|payout| payout.amount.micro_ccd)
            .sum();
        claim_eq!(paid, 1_500);
        claim_eq!(total_deposits(&state), 0);
    }

    #[concordium_test]
    fn test_settle_with_commission_on_winner() {
        let mut p = params();
        p.commission_applies_to_winner = true;
        p.commission_beneficiary = Some(CAROL);
        let mut state = new_state(p);
        claim_eq!(state.bid(ALICE, micro(100), at(START)), Ok(None));
        claim_eq!(state.bid(BOB, micro(1_000), at(START)), Ok(None));

        let settlement = state
            .settle(&Address::Account(OWNER), at(END))
            .expect_report("Settlement should pass");

        claim_eq!(
            settlement.payouts,
            vec![
                Payout {
                    account: OWNER,
                    amount: micro(980)
                },
                Payout {
                    account: CAROL,
                    amount: micro(20)
                },
                Payout {
                    account: CAROL,
                    amount: micro(2)
                },
                Payout {
                    account: ALICE,
                    amount: micro(98)
                },
            ]
        );
    }

    #[concordium_test]
    fn test_settle_without_bids() {
        let mut state = new_state(params());

        let settlement = state
            .settle(&Address::Account(OWNER), at(END))
            .expect_report("Settlement should pass");

        claim_eq!(settlement.winner, None);
        claim_eq!(settlement.winning_amount, Amount::zero());
        claim!(settlement.payouts.is_empty());
    }

    #[concordium_test]
    fn test_pending_payouts() {
        let mut state = new_state(params());

        claim_eq!(
            state.take_pending_payout(&ALICE),
            Err(CustomContractError::NothingToWithdraw)
        );

        state.defer_payout(ALICE, micro(98));
        state.defer_payout(ALICE, micro(2));
        claim_eq!(state.pending_payout_of(&ALICE), micro(100));

        claim_eq!(state.take_pending_payout(&ALICE), Ok(micro(100)));
        claim_eq!(state.pending_payout_of(&ALICE), Amount::zero());
        claim_eq!(
            state.take_pending_payout(&ALICE),
            Err(CustomContractError::NothingToWithdraw)
        );
    }
}
