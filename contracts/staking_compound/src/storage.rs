use soroban_sdk::{contracttype, Address};

/// Sweep chunk size used until the admin tunes it.
pub const DEFAULT_ITERATION_LIMIT: u32 = 10;

#[contracttype]
#[derive(Clone, Debug)]
pub struct StakeRecord {
    /// Principal currently staked.
    pub staked: i128,
    /// Reward accrued but not yet paid out or compounded.
    pub pending: i128,
    /// Timestamp the linear accrual was last settled at.
    pub accrued_at: u64,
    /// First-stake timestamp; 0 while nothing is staked.
    pub staked_since: u64,
}

/// Resumable state of the compounding sweep. `next_index` wraps to 0 and
/// `last_sweep_at` advances only once a full pass over the roster completes.
#[contracttype]
#[derive(Clone, Debug)]
pub struct SweepCursor {
    pub ready: bool,
    pub next_index: u32,
    /// Accrual instant the armed epoch settles up to.
    pub epoch_at: u64,
    /// Pool size frozen when the epoch was armed; every chunk computes
    /// rewards against this so the drain is order-independent.
    pub total_staked_at: i128,
    pub last_sweep_at: u64,
}

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Initialized,
    Admin,
    Token,
    RewardBank,
    RewardRate,
    IterationLimit,
    TotalStaked,
    Stake(Address),
    Roster,
    Cursor,
}
