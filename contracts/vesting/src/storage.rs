use soroban_sdk::{contracttype, Address};

/// Release schedule. Vesting advances in whole periods only; nothing accrues
/// between period boundaries.
#[contracttype]
#[derive(Clone, Debug)]
pub struct Schedule {
    pub cliff: u64,
    pub duration: u64,
    pub period: u64,
}

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Initialized,
    Admin,
    Token,
    Schedule,
    Shares(Address),
    TotalShares,
    Released(Address),
    TotalReleased,
    RefundOpen,
    Paused,
}
