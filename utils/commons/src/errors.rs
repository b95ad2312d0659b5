use super::*;

/// The custom errors the contract can produce.
#[derive(Serialize, Debug, PartialEq, Eq, Reject, SchemaType)]
pub enum CustomContractError {
    /// Failed parsing the parameter (Error code: -1).
    #[from(ParseError)]
    ParseParams,
    /// Failed logging: Log is full (Error code: -2).
    LogFull,
    /// Failed logging: Log is malformed (Error code: -3).
    LogMalformed,
    /// Bid or refund attempted at or after the auction end (Error code: -4).
    AuctionClosed,
    /// Settlement attempted before the auction end (Error code: -5).
    AuctionStillActive,
    /// Auction was already settled (Error code: -6).
    AlreadySettled,
    /// Bid carries no amount (Error code: -7).
    ZeroBid,
    /// Bid does not exceed the highest bid by the minimum increment
    /// (Error code: -8).
    InsufficientIncrement,
    /// Auction owner is not allowed to bid (Error code: -9).
    OwnerCannotBid,
    /// Caller has no deposit in excess of the latest bid (Error code: -10).
    NothingToRefund,
    /// Only the auction owner can call this function (Error code: -11).
    Unauthorized,
    /// Failed to invoke a transfer (Error code: -12).
    TransferFailed,
    /// Only account addresses can bid or claim funds (Error code: -13).
    OnlyAccountAddress,
    /// Init parameters are out of range (Error code: -14).
    InvalidParameters,
    /// Caller has no pending payout (Error code: -15).
    NothingToWithdraw,
}

/// Mapping the logging errors to CustomContractError.
impl From<LogError> for CustomContractError {
    fn from(le: LogError) -> Self {
        match le {
            LogError::Full => Self::LogFull,
            LogError::Malformed => Self::LogMalformed,
        }
    }
}

/// Mapping errors related to transfers to CustomContractError.
impl From<TransferError> for CustomContractError {
    fn from(_te: TransferError) -> Self {
        Self::TransferFailed
    }
}
