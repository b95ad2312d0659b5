/// Tag for the NewBid event.
pub const NEW_BID_TAG: u8 = u8::MAX;

/// Tag for the DeadlineExtended event.
pub const DEADLINE_EXTENDED_TAG: u8 = u8::MAX - 1;

/// Tag for the PartialRefund event.
pub const PARTIAL_REFUND_TAG: u8 = u8::MAX - 2;

/// Tag for the PayoutDeferred event.
pub const PAYOUT_DEFERRED_TAG: u8 = u8::MAX - 3;

/// Tag for the Withdrawal event.
pub const WITHDRAWAL_TAG: u8 = u8::MAX - 4;

/// Tag for the AuctionEnded event.
pub const AUCTION_ENDED_TAG: u8 = u8::MAX - 5;

/// Basis points making up 100%.
pub const BPS_DENOMINATOR: u64 = 10_000;

/// Longest prize label in bytes. Keeps the `AuctionEnded` event under the
/// 512 byte log entry limit, so settlement can always log it.
pub const MAX_PRIZE_LENGTH: usize = 256;
