use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    // Initialization (1-9)
    /// Contract already initialized
    AlreadyInitialized = 1,
    /// Contract not initialized
    NotInitialized = 2,

    // Authorization (10-19)
    /// Caller is not the admin
    Unauthorized = 10,

    // Amounts & balances (20-29)
    /// Amount must be positive
    ZeroAmount = 20,
    /// Withdraw exceeds staked balance
    InsufficientStake = 21,
    /// No reward accrued yet
    NotDuePayment = 22,
    /// Arithmetic overflow
    Overflow = 23,

    // Sweep (30-39)
    /// A compounding pass is already armed and not yet drained
    SweepInProgress = 30,
    /// No armed pass, or the roster is empty
    NothingToProcess = 31,

    // Admin parameters (40-49)
    /// Parameter must be positive
    InvalidCapacity = 40,
}
