//! A single English auction with deposit accounting and commissioned
//! settlement.
//!
//! # Description
//! Accounts bid by sending CCD to `bid`. Every bid must exceed the current
//! highest bid by a configured multiplier and is kept by the contract in full,
//! so an account that bids several times holds the sum of its bids. While the
//! auction is open an account can reclaim everything above its latest bid
//! with `refund`. Bids landing shortly before the deadline push it back.
//!
//! After the deadline the owner calls `settle` once: the owner receives the
//! winning bid, every other bidder gets their deposit back minus commission,
//! and the commission goes to the beneficiary (the owner by default).
//! Transfers that fail during settlement are parked and can be claimed later
//! with `withdraw`.
#![cfg_attr(not(feature = "std"), no_std)]

mod contract;
mod events;
mod external;
mod state;
