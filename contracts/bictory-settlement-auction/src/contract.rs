use commons::{BasisPoints, ContractResult, CustomContractError};
use concordium_std::*;

use crate::events::AuctionEvents;
use crate::external::*;
use crate::state::{Bid, Payout, State};

/// Initialize the auction. The invoker becomes the owner, the auction is open
/// from now till `end_time`.
///
/// It rejects if:
/// - Fails to parse `InitParams` parameters.
/// - Parameters are out of range.
#[init(contract = "BictorySettlementAuction", parameter = "InitParams")]
fn contract_init<S: HasStateApi>(
    ctx: &impl HasInitContext,
    state_builder: &mut StateBuilder<S>,
) -> InitResult<State<S>> {
    let params = InitParams::deserial(&mut ctx.parameter_cursor())?;
    let state = State::new(
        state_builder,
        ctx.init_origin(),
        params,
        ctx.metadata().slot_time(),
    )?;
    Ok(state)
}

/// Bid the sent amount.
///
/// It rejects if:
/// - Sender is a contract.
/// - Auction has ended.
/// - Amount is zero or does not exceed the highest bid by the minimum increment.
/// - Sender is the auction owner.
/// - Fails to log `NewBid` or `DeadlineExtended` event.
#[receive(
    mutable,
    payable,
    contract = "BictorySettlementAuction",
    name = "bid",
    enable_logger
)]
fn contract_bid<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    amount: Amount,
    logger: &mut impl HasLogger,
) -> ContractResult<()> {
    let bidder = sender_account(ctx)?;

    let extended = host
        .state_mut()
        .bid(bidder, amount, ctx.metadata().slot_time())?;

    logger.log(&AuctionEvents::new_bid(&bidder, amount))?;
    if let Some(end_time) = extended {
        logger.log(&AuctionEvents::deadline_extended(end_time))?;
    }

    Ok(())
}

/// Return everything the sender deposited above its latest bid.
///
/// It rejects if:
/// - Sender is a contract.
/// - Auction has ended.
/// - Sender has bid at most once, or already reclaimed everything above its latest bid.
/// - Fails to log `PartialRefund` event.
/// - Transfer to the sender fails.
#[receive(
    mutable,
    contract = "BictorySettlementAuction",
    name = "refund",
    enable_logger
)]
fn contract_refund<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    logger: &mut impl HasLogger,
) -> ContractResult<()> {
    let account = sender_account(ctx)?;

    // Deposit is reset before the transfer
    let excess = host
        .state_mut()
        .refund(account, ctx.metadata().slot_time())?;

    logger.log(&AuctionEvents::partial_refund(&account, excess))?;
    host.invoke_transfer(&account, excess)?;

    Ok(())
}

/// Settle the auction: pay the winning bid to the owner, return all other
/// deposits minus commission and pay the commission to the beneficiary.
///
/// Failing transfers do not stop settlement. Their amounts are kept as pending
/// payouts that the receivers can claim with `withdraw`.
///
/// It rejects if:
/// - Sender is not the owner.
/// - Auction has not ended yet.
/// - Auction was already settled.
/// - Fails to log `AuctionEnded` event.
#[receive(
    mutable,
    contract = "BictorySettlementAuction",
    name = "settle",
    enable_logger
)]
fn contract_settle<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    logger: &mut impl HasLogger,
) -> ContractResult<()> {
    let settlement = host
        .state_mut()
        .settle(&ctx.sender(), ctx.metadata().slot_time())?;

    for payout in settlement.payouts.iter() {
        if pay_or_defer(host, payout) {
            logger.log(&AuctionEvents::payout_deferred(
                &payout.account,
                payout.amount,
            ))?;
        }
    }

    logger.log(&AuctionEvents::auction_ended(
        settlement.winner,
        settlement.winning_amount,
        host.state().prize(),
    ))?;

    Ok(())
}

/// Claim the payout that failed to transfer during settlement.
///
/// It rejects if:
/// - Sender is a contract.
/// - Sender has no pending payout.
/// - Fails to log `Withdrawal` event.
/// - Transfer to the sender fails.
#[receive(
    mutable,
    contract = "BictorySettlementAuction",
    name = "withdraw",
    enable_logger
)]
fn contract_withdraw<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    logger: &mut impl HasLogger,
) -> ContractResult<()> {
    let account = sender_account(ctx)?;

    let amount = host.state_mut().take_pending_payout(&account)?;

    logger.log(&AuctionEvents::withdrawal(&account, amount))?;
    host.invoke_transfer(&account, amount)?;

    Ok(())
}

/// View function that returns the auction configuration, status and leader.
#[receive(
    contract = "BictorySettlementAuction",
    name = "view",
    return_value = "AuctionView"
)]
fn contract_view<S: HasStateApi>(
    _ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ContractResult<AuctionView> {
    Ok(host.state().view())
}

#[receive(
    contract = "BictorySettlementAuction",
    name = "currentLeader",
    return_value = "LeaderView"
)]
fn contract_current_leader<S: HasStateApi>(
    _ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ContractResult<LeaderView> {
    Ok(host.state().leader())
}

/// Every admitted bid in admission order.
#[receive(
    contract = "BictorySettlementAuction",
    name = "history",
    return_value = "Vec<Bid>"
)]
fn contract_history<S: HasStateApi>(
    _ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ContractResult<Vec<Bid>> {
    Ok(host.state().history().clone())
}

#[receive(
    contract = "BictorySettlementAuction",
    name = "depositOf",
    parameter = "AccountAddress",
    return_value = "Amount"
)]
fn contract_deposit_of<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ContractResult<Amount> {
    let account: AccountAddress = ctx.parameter_cursor().get()?;
    Ok(host.state().deposit_of(&account))
}

#[receive(
    contract = "BictorySettlementAuction",
    name = "bidsOf",
    parameter = "AccountAddress",
    return_value = "Vec<Amount>"
)]
fn contract_bids_of<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ContractResult<Vec<Amount>> {
    let account: AccountAddress = ctx.parameter_cursor().get()?;
    Ok(host.state().bids_of(&account))
}

#[receive(
    contract = "BictorySettlementAuction",
    name = "pendingPayoutOf",
    parameter = "AccountAddress",
    return_value = "Amount"
)]
fn contract_pending_payout_of<S: HasStateApi>(
    ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ContractResult<Amount> {
    let account: AccountAddress = ctx.parameter_cursor().get()?;
    Ok(host.state().pending_payout_of(&account))
}

#[receive(
    contract = "BictorySettlementAuction",
    name = "prize",
    return_value = "String"
)]
fn contract_prize<S: HasStateApi>(
    _ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ContractResult<String> {
    Ok(host.state().prize().clone())
}

#[receive(
    contract = "BictorySettlementAuction",
    name = "endTime",
    return_value = "Timestamp"
)]
fn contract_end_time<S: HasStateApi>(
    _ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ContractResult<Timestamp> {
    Ok(host.state().end_time())
}

#[receive(
    contract = "BictorySettlementAuction",
    name = "commission",
    return_value = "BasisPoints"
)]
fn contract_commission<S: HasStateApi>(
    _ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ContractResult<BasisPoints> {
    Ok(host.state().commission())
}

#[receive(
    contract = "BictorySettlementAuction",
    name = "isSettled",
    return_value = "bool"
)]
fn contract_is_settled<S: HasStateApi>(
    _ctx: &impl HasReceiveContext,
    host: &impl HasHost<State<S>, StateApiType = S>,
) -> ContractResult<bool> {
    Ok(host.state().is_settled())
}

fn sender_account(ctx: &impl HasReceiveContext) -> ContractResult<AccountAddress> {
    match ctx.sender() {
        Address::Account(account) => Ok(account),
        Address::Contract(_) => bail!(CustomContractError::OnlyAccountAddress),
    }
}

// Transfer the payout, or keep it as pending payout if the transfer fails.
// Returns whether the payout was deferred.
fn pay_or_defer<S: HasStateApi>(
    host: &mut impl HasHost<State<S>, StateApiType = S>,
    payout: &Payout,
) -> bool {
    if host.invoke_transfer(&payout.account, payout.amount).is_ok() {
        return false;
    }
    host.state_mut().defer_payout(payout.account, payout.amount);
    true
}

#[concordium_cfg_test]
mod tests {
    use super::*;
    use test_infrastructure::*;

    const OWNER: AccountAddress = AccountAddress([0; 32]);
    const ALICE: AccountAddress = AccountAddress([1; 32]);
    const BOB: AccountAddress = AccountAddress([2; 32]);
    const CAROL: AccountAddress = AccountAddress([3; 32]);
    const DAVE: AccountAddress = AccountAddress([4; 32]);

    const OTHER_CONTRACT: ContractAddress = ContractAddress {
        index: 7,
        subindex: 0,
    };

    const PRIZE: &str = "Signed first edition";
    const START: u64 = 1_000;
    const MINUTE: u64 = 60_000;
    const END: u64 = START + 24 * 60 * MINUTE;

    fn micro(amount: u64) -> Amount {
        Amount::from_micro_ccd(amount)
    }

    fn at(millis: u64) -> Timestamp {
        Timestamp::from_timestamp_millis(millis)
    }

    fn init_params() -> InitParams {
        InitParams {
            prize: String::from(PRIZE),
            end_time: at(END),
            extension_window: Duration::from_minutes(10),
            min_increment: BasisPoints::from_bps(10_500),
            commission: BasisPoints::from_bps(200),
            commission_applies_to_winner: false,
            commission_beneficiary: None,
        }
    }

    fn new_host_with(params: InitParams) -> TestHost<State<TestStateApi>> {
        let bytes = to_bytes(&params);
        let mut ctx = TestInitContext::empty();
        ctx.set_init_origin(OWNER)
            .set_parameter(&bytes)
            .set_metadata_slot_time(at(START));
        let mut state_builder = TestStateBuilder::new();

        let state = contract_init(&ctx, &mut state_builder)
            .expect_report("Failed during init_BictorySettlementAuction");

        TestHost::new(state, state_builder)
    }

    fn default_host() -> TestHost<State<TestStateApi>> {
        new_host_with(init_params())
    }

    fn new_ctx<'a>(sender: AccountAddress, slot_time: u64) -> TestReceiveContext<'a> {
        let mut ctx = TestReceiveContext::empty();
        ctx.set_sender(Address::Account(sender))
            .set_owner(OWNER)
            .set_metadata_slot_time(at(slot_time));
        ctx
    }

    fn place_bid(
        host: &mut TestHost<State<TestStateApi>>,
        logger: &mut TestLogger,
        bidder: AccountAddress,
        amount: u64,
        slot_time: u64,
    ) -> ContractResult<()> {
        let ctx = new_ctx(bidder, slot_time);
        contract_bid(&ctx, host, micro(amount), logger)
    }

    #[concordium_test]
    fn test_init() {
        let host = default_host();

        claim_eq!(
            host.state().view(),
            AuctionView {
                owner: OWNER,
                prize: String::from(PRIZE),
                start_time: at(START),
                end_time: at(END),
                extension_window: Duration::from_minutes(10),
                min_increment: BasisPoints::from_bps(10_500),
                commission: BasisPoints::from_bps(200),
                commission_applies_to_winner: false,
                commission_beneficiary: OWNER,
                settled: false,
                leader: LeaderView {
                    bidder: None,
                    amount: Amount::zero(),
                },
            }
        );
    }

    #[concordium_test]
    fn test_init_rejects_end_in_the_past() {
        let mut params = init_params();
        params.end_time = at(START - 1);
        let bytes = to_bytes(&params);
        let mut ctx = TestInitContext::empty();
        ctx.set_init_origin(OWNER)
            .set_parameter(&bytes)
            .set_metadata_slot_time(at(START));
        let mut state_builder = TestStateBuilder::new();

        let result = contract_init(&ctx, &mut state_builder);

        claim!(result.is_err());
    }

    /// Scenario:
    /// 0. Auction with 10 minute extension, +5% increment and 2% commission.
    /// 1. Alice bids 100, she leads.
    /// 2. Bob bids 104, rejected as it is not above 105.
    /// 3. Bob bids 106, he leads.
    /// 4. The owner settles after the end: the owner gets 106 plus 2 commission
    ///    from Alice, Alice gets 98 back, Bob gets nothing.
    /// 5. Settling again fails.
    #[concordium_test]
    fn test_bid_and_settle() {
        let mut host = default_host();
        let mut logger = TestLogger::init();

        claim_eq!(place_bid(&mut host, &mut logger, ALICE, 100, START), Ok(()));
        claim_eq!(
            host.state().leader(),
            LeaderView {
                bidder: Some(ALICE),
                amount: micro(100),
            }
        );

        claim_eq!(
            place_bid(&mut host, &mut logger, BOB, 104, START),
            Err(CustomContractError::InsufficientIncrement)
        );
        claim_eq!(place_bid(&mut host, &mut logger, BOB, 106, START), Ok(()));

        let ctx = new_ctx(OWNER, END);
        host.set_self_balance(micro(206));
        claim_eq!(contract_settle(&ctx, &mut host, &mut logger), Ok(()));

        claim_eq!(
            host.get_transfers(),
            vec![(OWNER, micro(106)), (OWNER, micro(2)), (ALICE, micro(98))]
        );
        claim!(host.state().is_settled());
        claim_eq!(host.state().deposit_of(&ALICE), Amount::zero());

        let prize = String::from(PRIZE);
        claim_eq!(
            logger.logs,
            vec![
                to_bytes(&AuctionEvents::new_bid(&ALICE, micro(100))),
                to_bytes(&AuctionEvents::new_bid(&BOB, micro(106))),
                to_bytes(&AuctionEvents::auction_ended(Some(BOB), micro(106), &prize)),
            ]
        );

        claim_eq!(
            contract_settle(&ctx, &mut host, &mut logger),
            Err(CustomContractError::AlreadySettled)
        );
        claim_eq!(
            place_bid(&mut host, &mut logger, CAROL, 1_000, END),
            Err(CustomContractError::AuctionClosed)
        );
    }

    #[concordium_test]
    fn test_settle_commission_on_winner() {
        let mut params = init_params();
        params.commission_applies_to_winner = true;
        let mut host = new_host_with(params);
        let mut logger = TestLogger::init();

        claim_eq!(place_bid(&mut host, &mut logger, ALICE, 100, START), Ok(()));
        claim_eq!(place_bid(&mut host, &mut logger, BOB, 500, START), Ok(()));

        host.set_self_balance(micro(600));
        let ctx = new_ctx(OWNER, END);
        claim_eq!(contract_settle(&ctx, &mut host, &mut logger), Ok(()));

        claim_eq!(
            host.get_transfers(),
            vec![
                (OWNER, micro(490)),
                (OWNER, micro(10)),
                (OWNER, micro(2)),
                (ALICE, micro(98))
            ]
        );
    }

    #[concordium_test]
    fn test_settle_rejections() {
        let mut host = default_host();
        let mut logger = TestLogger::init();
        claim_eq!(place_bid(&mut host, &mut logger, ALICE, 100, START), Ok(()));

        let ctx = new_ctx(ALICE, END);
        claim_eq!(
            contract_settle(&ctx, &mut host, &mut logger),
            Err(CustomContractError::Unauthorized)
        );

        let ctx = new_ctx(OWNER, END - 1);
        claim_eq!(
            contract_settle(&ctx, &mut host, &mut logger),
            Err(CustomContractError::AuctionStillActive)
        );

        claim!(!host.state().is_settled());
        claim!(host.get_transfers().is_empty());
    }

    #[concordium_test]
    fn test_settle_without_bids() {
        let mut host = default_host();
        let mut logger = TestLogger::init();

        let ctx = new_ctx(OWNER, END);
        claim_eq!(contract_settle(&ctx, &mut host, &mut logger), Ok(()));

        let prize = String::from(PRIZE);
        claim!(host.get_transfers().is_empty());
        claim_eq!(
            logger.logs,
            vec![to_bytes(&AuctionEvents::auction_ended(
                None,
                Amount::zero(),
                &prize
            ))]
        );
    }

    #[concordium_test]
    fn test_bid_only_from_accounts() {
        let mut host = default_host();
        let mut logger = TestLogger::init();

        let mut ctx = TestReceiveContext::empty();
        ctx.set_sender(Address::Contract(OTHER_CONTRACT))
            .set_owner(OWNER)
            .set_metadata_slot_time(at(START));

        claim_eq!(
            contract_bid(&ctx, &mut host, micro(100), &mut logger),
            Err(CustomContractError::OnlyAccountAddress)
        );
        claim!(logger.logs.is_empty());
    }

    #[concordium_test]
    fn test_owner_cannot_bid() {
        let mut host = default_host();
        let mut logger = TestLogger::init();

        claim_eq!(
            place_bid(&mut host, &mut logger, OWNER, 1_000_000, START),
            Err(CustomContractError::OwnerCannotBid)
        );
        claim_eq!(
            place_bid(&mut host, &mut logger, ALICE, 0, START),
            Err(CustomContractError::ZeroBid)
        );
        claim!(host.state().history().is_empty());
    }

    #[concordium_test]
    fn test_late_bid_logs_extension() {
        let mut host = default_host();
        let mut logger = TestLogger::init();

        claim_eq!(
            place_bid(&mut host, &mut logger, ALICE, 100, END - MINUTE),
            Ok(())
        );
        claim_eq!(host.state().end_time(), at(END + 10 * MINUTE));

        // The original end has passed, but the auction is still open
        // 9 minutes left, so the end moves again from the extended deadline
        claim_eq!(place_bid(&mut host, &mut logger, BOB, 200, END + MINUTE), Ok(()));
        claim_eq!(host.state().end_time(), at(END + 20 * MINUTE));

        // 15 minutes left, no extension
        claim_eq!(
            place_bid(&mut host, &mut logger, CAROL, 300, END + 5 * MINUTE),
            Ok(())
        );
        claim_eq!(host.state().end_time(), at(END + 20 * MINUTE));

        claim_eq!(
            logger.logs,
            vec![
                to_bytes(&AuctionEvents::new_bid(&ALICE, micro(100))),
                to_bytes(&AuctionEvents::deadline_extended(at(END + 10 * MINUTE))),
                to_bytes(&AuctionEvents::new_bid(&BOB, micro(200))),
                to_bytes(&AuctionEvents::deadline_extended(at(END + 20 * MINUTE))),
                to_bytes(&AuctionEvents::new_bid(&CAROL, micro(300))),
            ]
        );

        let ctx = new_ctx(OWNER, END + MINUTE);
        claim_eq!(
            contract_settle(&ctx, &mut host, &mut logger),
            Err(CustomContractError::AuctionStillActive)
        );
    }

    #[concordium_test]
    fn test_partial_refund() {
        let mut host = default_host();
        let mut logger = TestLogger::init();

        claim_eq!(place_bid(&mut host, &mut logger, ALICE, 10, START), Ok(()));

        let ctx = new_ctx(ALICE, START);
        claim_eq!(
            contract_refund(&ctx, &mut host, &mut logger),
            Err(CustomContractError::NothingToRefund)
        );

        claim_eq!(place_bid(&mut host, &mut logger, ALICE, 20, START), Ok(()));
        claim_eq!(place_bid(&mut host, &mut logger, ALICE, 30, START), Ok(()));

        host.set_self_balance(micro(60));
        claim_eq!(contract_refund(&ctx, &mut host, &mut logger), Ok(()));

        claim_eq!(host.get_transfers(), vec![(ALICE, micro(30))]);
        claim_eq!(host.state().deposit_of(&ALICE), micro(30));
        claim_eq!(
            logger.logs.last(),
            Some(&to_bytes(&AuctionEvents::partial_refund(&ALICE, micro(30))))
        );

        let ctx = new_ctx(ALICE, END);
        claim_eq!(
            contract_refund(&ctx, &mut host, &mut logger),
            Err(CustomContractError::AuctionClosed)
        );
    }

    #[concordium_test]
    fn test_partial_refund_transfer_failure() {
        let mut host = default_host();
        let mut logger = TestLogger::init();

        claim_eq!(place_bid(&mut host, &mut logger, ALICE, 10, START), Ok(()));
        claim_eq!(place_bid(&mut host, &mut logger, ALICE, 20, START), Ok(()));

        host.set_self_balance(micro(30));
        host.make_account_missing(ALICE);

        let ctx = new_ctx(ALICE, START);
        claim_eq!(
            contract_refund(&ctx, &mut host, &mut logger),
            Err(CustomContractError::TransferFailed)
        );
        claim!(host.get_transfers().is_empty());
    }

    #[concordium_test]
    fn test_failing_recipient_does_not_block_settlement() {
        let mut host = default_host();
        let mut logger = TestLogger::init();

        claim_eq!(place_bid(&mut host, &mut logger, ALICE, 100, START), Ok(()));
        claim_eq!(place_bid(&mut host, &mut logger, BOB, 200, START), Ok(()));
        claim_eq!(place_bid(&mut host, &mut logger, CAROL, 300, START), Ok(()));
        claim_eq!(place_bid(&mut host, &mut logger, DAVE, 400, START), Ok(()));

        host.set_self_balance(micro(1_000));
        host.make_account_missing(BOB);

        let ctx = new_ctx(OWNER, END);
        claim_eq!(contract_settle(&ctx, &mut host, &mut logger), Ok(()));

        claim_eq!(
            host.get_transfers(),
            vec![
                (OWNER, micro(400)),
                (OWNER, micro(2)),
                (ALICE, micro(98)),
                (OWNER, micro(4)),
                (OWNER, micro(6)),
                (CAROL, micro(294)),
            ]
        );
        claim_eq!(host.state().pending_payout_of(&BOB), micro(196));
        claim_eq!(host.state().pending_payout_of(&ALICE), Amount::zero());
        claim!(host.state().is_settled());

        let prize = String::from(PRIZE);
        let logs = &logger.logs[logger.logs.len() - 2..];
        claim_eq!(
            logs,
            &[
                to_bytes(&AuctionEvents::payout_deferred(&BOB, micro(196))),
                to_bytes(&AuctionEvents::auction_ended(Some(DAVE), micro(400), &prize)),
            ][..]
        );

        // Bob's account is still missing, the claim fails as a whole
        let ctx = new_ctx(BOB, END);
        claim_eq!(
            contract_withdraw(&ctx, &mut host, &mut logger),
            Err(CustomContractError::TransferFailed)
        );
    }

    #[concordium_test]
    fn test_every_deferred_payout_is_logged() {
        let mut host = default_host();
        let mut logger = TestLogger::init();

        claim_eq!(place_bid(&mut host, &mut logger, ALICE, 100, START), Ok(()));
        claim_eq!(place_bid(&mut host, &mut logger, BOB, 200, START), Ok(()));
        claim_eq!(place_bid(&mut host, &mut logger, CAROL, 300, START), Ok(()));
        claim_eq!(place_bid(&mut host, &mut logger, DAVE, 400, START), Ok(()));

        host.set_self_balance(micro(1_000));
        for account in [OWNER, ALICE, BOB, CAROL].iter() {
            host.make_account_missing(*account);
        }
        logger.logs.clear();

        let ctx = new_ctx(OWNER, END);
        claim_eq!(contract_settle(&ctx, &mut host, &mut logger), Ok(()));

        claim!(host.get_transfers().is_empty());
        claim_eq!(host.state().pending_payout_of(&OWNER), micro(412));
        claim_eq!(host.state().pending_payout_of(&ALICE), micro(98));
        claim_eq!(host.state().pending_payout_of(&BOB), micro(196));
        claim_eq!(host.state().pending_payout_of(&CAROL), micro(294));

        let prize = String::from(PRIZE);
        claim_eq!(
            logger.logs,
            vec![
                to_bytes(&AuctionEvents::payout_deferred(&OWNER, micro(400))),
                to_bytes(&AuctionEvents::payout_deferred(&OWNER, micro(2))),
                to_bytes(&AuctionEvents::payout_deferred(&ALICE, micro(98))),
                to_bytes(&AuctionEvents::payout_deferred(&OWNER, micro(4))),
                to_bytes(&AuctionEvents::payout_deferred(&BOB, micro(196))),
                to_bytes(&AuctionEvents::payout_deferred(&OWNER, micro(6))),
                to_bytes(&AuctionEvents::payout_deferred(&CAROL, micro(294))),
                to_bytes(&AuctionEvents::auction_ended(Some(DAVE), micro(400), &prize)),
            ]
        );
    }

    #[concordium_test]
    fn test_withdraw_pending_payout() {
        let mut host = default_host();
        let mut logger = TestLogger::init();

        let ctx = new_ctx(ALICE, END);
        claim_eq!(
            contract_withdraw(&ctx, &mut host, &mut logger),
            Err(CustomContractError::NothingToWithdraw)
        );

        host.state_mut().defer_payout(ALICE, micro(98));
        host.set_self_balance(micro(98));

        claim_eq!(contract_withdraw(&ctx, &mut host, &mut logger), Ok(()));
        claim_eq!(host.get_transfers(), vec![(ALICE, micro(98))]);
        claim_eq!(host.state().pending_payout_of(&ALICE), Amount::zero());
        claim_eq!(
            logger.logs,
            vec![to_bytes(&AuctionEvents::withdrawal(&ALICE, micro(98)))]
        );

        claim_eq!(
            contract_withdraw(&ctx, &mut host, &mut logger),
            Err(CustomContractError::NothingToWithdraw)
        );
    }

    #[concordium_test]
    fn test_views() {
        let mut host = default_host();
        let mut logger = TestLogger::init();

        claim_eq!(place_bid(&mut host, &mut logger, ALICE, 100, START), Ok(()));
        claim_eq!(place_bid(&mut host, &mut logger, BOB, 200, START), Ok(()));
        claim_eq!(place_bid(&mut host, &mut logger, ALICE, 300, START), Ok(()));

        let ctx = TestReceiveContext::empty();
        claim_eq!(
            contract_current_leader(&ctx, &host),
            Ok(LeaderView {
                bidder: Some(ALICE),
                amount: micro(300),
            })
        );
        claim_eq!(
            contract_history(&ctx, &host),
            Ok(vec![
                Bid {
                    amount: micro(100),
                    bidder: ALICE
                },
                Bid {
                    amount: micro(200),
                    bidder: BOB
                },
                Bid {
                    amount: micro(300),
                    bidder: ALICE
                },
            ])
        );
        claim_eq!(contract_prize(&ctx, &host), Ok(String::from(PRIZE)));
        claim_eq!(contract_end_time(&ctx, &host), Ok(at(END)));
        claim_eq!(
            contract_commission(&ctx, &host),
            Ok(BasisPoints::from_bps(200))
        );
        claim_eq!(contract_is_settled(&ctx, &host), Ok(false));

        let bytes = to_bytes(&ALICE);
        let mut ctx = TestReceiveContext::empty();
        ctx.set_parameter(&bytes);
        claim_eq!(contract_deposit_of(&ctx, &host), Ok(micro(400)));
        claim_eq!(
            contract_bids_of(&ctx, &host),
            Ok(vec![micro(100), micro(300)])
        );
        claim_eq!(contract_pending_payout_of(&ctx, &host), Ok(Amount::zero()));

        let bytes = to_bytes(&CAROL);
        let mut ctx = TestReceiveContext::empty();
        ctx.set_parameter(&bytes);
        claim_eq!(contract_deposit_of(&ctx, &host), Ok(Amount::zero()));
        claim_eq!(contract_bids_of(&ctx, &host), Ok(Vec::new()));
    }
}
