use soroban_sdk::{contracttype, Address};

// 7 decimals
pub const SCALE: i128 = 10_000_000;

/// Snapshot weighting. The three weights are SCALE-scaled fractions and must
/// sum to exactly one unit.
#[contracttype]
#[derive(Clone, Debug)]
pub struct Weights {
    /// Weight of the staked-balance share.
    pub alpha: i128,
    /// Weight of the duration-weighted share.
    pub beta: i128,
    /// Weight of the pending-reward share.
    pub theta: i128,
}

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Initialized,
    Admin,
    Staking,
    Weights,
    /// Addresses covered by the current snapshot.
    Members,
    Alloc(Address),
    TakenAt,
}
