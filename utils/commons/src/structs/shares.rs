use super::*;

/// Split of a settled deposit between the commission beneficiary and the
/// account the deposit is paid out to.
#[derive(SchemaType, Serialize, Eq, PartialEq, Clone, Copy, Debug)]
pub struct Shares {
    pub commission: Amount,
    pub payout: Amount,
}
