use commons::{
    AUCTION_ENDED_TAG, DEADLINE_EXTENDED_TAG, NEW_BID_TAG, PARTIAL_REFUND_TAG,
    PAYOUT_DEFERRED_TAG, WITHDRAWAL_TAG,
};
use concordium_std::*;

/// Bid event data.
#[derive(Debug, Serial)]
pub struct NewBidEvent<'a> {
    /// Bidder account address.
    pub bidder: &'a AccountAddress,
    /// Bid amount.
    pub amount: Amount,
}

/// Deadline extension event data.
#[derive(Debug, Serial)]
pub struct DeadlineExtendedEvent {
    /// New auction end.
    pub end_time: Timestamp,
}

/// Value movement to a single account: partial refunds, deferred payouts
/// and withdrawals of deferred payouts.
#[derive(Debug, Serial)]
pub struct PayoutEvent<'a> {
    pub account: &'a AccountAddress,
    pub amount: Amount,
}

/// Auction settlement event data.
#[derive(Debug, Serial)]
pub struct AuctionEndedEvent<'a> {
    /// Address of the auction winner, if anybody bid.
    pub winner: Option<AccountAddress>,
    /// Winning bid.
    pub amount: Amount,
    /// Prize label.
    pub prize: &'a String,
}

/// Tagged Custom event to be serialized for the event log.
#[derive(Debug)]
pub enum AuctionEvents<'a> {
    NewBid(NewBidEvent<'a>),
    DeadlineExtended(DeadlineExtendedEvent),
    PartialRefund(PayoutEvent<'a>),
    PayoutDeferred(PayoutEvent<'a>),
    Withdrawal(PayoutEvent<'a>),
    AuctionEnded(AuctionEndedEvent<'a>),
}

impl<'a> AuctionEvents<'a> {
    pub fn new_bid(bidder: &'a AccountAddress, amount: Amount) -> Self {
        Self::NewBid(NewBidEvent { bidder, amount })
    }

    pub fn deadline_extended(end_time: Timestamp) -> Self {
        Self::DeadlineExtended(DeadlineExtendedEvent { end_time })
    }

    pub fn partial_refund(account: &'a AccountAddress, amount: Amount) -> Self {
        Self::PartialRefund(PayoutEvent { account, amount })
    }

    pub fn payout_deferred(account: &'a AccountAddress, amount: Amount) -> Self {
        Self::PayoutDeferred(PayoutEvent { account, amount })
    }

    pub fn withdrawal(account: &'a AccountAddress, amount: Amount) -> Self {
        Self::Withdrawal(PayoutEvent { account, amount })
    }

    pub fn auction_ended(winner: Option<AccountAddress>, amount: Amount, prize: &'a String) -> Self {
        Self::AuctionEnded(AuctionEndedEvent {
            winner,
            amount,
            prize,
        })
    }
}

impl<'a> Serial for AuctionEvents<'a> {
    fn serial<W: Write>(&self, out: &mut W) -> Result<(), W::Err> {
        match self {
            AuctionEvents::NewBid(event) => {
                out.write_u8(NEW_BID_TAG)?;
                event.serial(out)
            }
            AuctionEvents::DeadlineExtended(event) => {
                out.write_u8(DEADLINE_EXTENDED_TAG)?;
                event.serial(out)
            }
            AuctionEvents::PartialRefund(event) => {
                out.write_u8(PARTIAL_REFUND_TAG)?;
                event.serial(out)
            }
            AuctionEvents::PayoutDeferred(event) => {
                out.write_u8(PAYOUT_DEFERRED_TAG)?;
                event.serial(out)
            }
            AuctionEvents::Withdrawal(event) => {
                out.write_u8(WITHDRAWAL_TAG)?;
                event.serial(out)
            }
            AuctionEvents::AuctionEnded(event) => {
                out.write_u8(AUCTION_ENDED_TAG)?;
                event.serial(out)
            }
        }
    }
}
