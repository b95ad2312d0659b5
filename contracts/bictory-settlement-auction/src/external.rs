use commons::BasisPoints;
use concordium_std::*;

#[derive(Debug, Clone, SchemaType, Serialize)]
pub struct InitParams {
    /// Prize label, at most `MAX_PRIZE_LENGTH` bytes.
    pub prize: String,
    /// Initial auction end. Bids are accepted strictly before it.
    pub end_time: Timestamp,
    /// A bid arriving with less than this left pushes the end back by the same duration.
    pub extension_window: Duration,
    /// Multiplier a new bid must exceed the highest bid by, e.g. 10500 for +5%.
    pub min_increment: BasisPoints,
    /// Commission kept from every refunded deposit.
    pub commission: BasisPoints,
    /// Whether the winning bid is also subject to commission.
    pub commission_applies_to_winner: bool,
    /// Commission receiver. Defaults to the auction owner.
    pub commission_beneficiary: Option<AccountAddress>,
}

/// Current highest bid. `bidder` is `None` until the first bid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, SchemaType, Serialize)]
pub struct LeaderView {
    pub bidder: Option<AccountAddress>,
    pub amount: Amount,
}

/// Everything except the per-account maps and the bid history.
#[derive(Debug, Clone, PartialEq, Eq, SchemaType, Serialize)]
pub struct AuctionView {
    pub owner: AccountAddress,
    pub prize: String,
    pub start_time: Timestamp,
    pub end_time: Timestamp,
    pub extension_window: Duration,
    pub min_increment: BasisPoints,
    pub commission: BasisPoints,
    pub commission_applies_to_winner: bool,
    pub commission_beneficiary: AccountAddress,
    pub settled: bool,
    pub leader: LeaderView,
}
