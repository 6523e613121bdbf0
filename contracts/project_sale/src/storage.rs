use soroban_sdk::{contracttype, Address};

// 7 decimals
pub const SCALE: i128 = 10_000_000;
pub const BASIS_POINTS: i128 = 10_000;
/// Deposit fee, charged on top of the deposited amount.
pub const FEE_BPS: i128 = 500;

/// The sale timeline. Each phase is a half-open window [start, end), and the
/// eight instants must form a monotonic, non-overlapping chain.
#[contracttype]
#[derive(Clone, Debug)]
pub struct SaleTimes {
    pub register_start: u64,
    pub register_end: u64,
    pub staking_round_start: u64,
    pub staking_round_end: u64,
    pub public_round_start: u64,
    pub public_round_end: u64,
    pub vesting_start: u64,
    pub vesting_end: u64,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct SaleProviders {
    pub kyc: Address,
    pub allocation: Address,
}

/// Everything about the sale that is fixed at initialization.
#[contracttype]
#[derive(Clone, Debug)]
pub struct SaleConfig {
    /// Credit voucher token, spent into `credit_reserve` on staking-round
    /// deposits.
    pub credit_token: Address,
    pub credit_reserve: Address,
    /// Stable asset deposits are made in.
    pub usd_token: Address,
    /// Token being sold, escrowed into the vesting contract at finalization.
    pub project_token: Address,
    /// Price per project token, SCALE-fixed-point in the stable asset.
    pub project_token_price: i128,
    pub project_token_amount: i128,
    /// Hard ceiling on combined deposits; must equal amount × price.
    pub total_sale_value_cap: i128,
    pub sale_claim: Address,
    pub fee_claim: Address,
    pub vesting: Address,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct Participant {
    pub registered: bool,
    pub deposited: i128,
}

/// Phase derived from `now` against `SaleTimes`; never stored.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum SalePhase {
    PreRegister = 0,
    Register = 1,
    PreStaking = 2,
    StakingRound = 3,
    PrePublic = 4,
    PublicRound = 5,
    PreVesting = 6,
    Vesting = 7,
    Ended = 8,
}

#[contracttype]
#[derive(Clone)]
pub enum DataKey {
    Initialized,
    Admin,
    Times,
    Providers,
    Config,
    PublicSaleCap,
    Finalized,
    TotalDeposited,
    Participant(Address),
    Depositors,
}
