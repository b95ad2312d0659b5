//! It exposes all common structs, types and calculations shared by the
//! auction contracts.
#![cfg_attr(not(feature = "std"), no_std)]
pub use crate::{calculations::*, constants::*, errors::*, structs::*, types::*};
use concordium_std::*;

mod calculations;
mod constants;
mod errors;
mod structs;
mod types;
