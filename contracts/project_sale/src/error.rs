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

    // Phase gating (20-29)
    /// The relevant window has not opened yet
    PhaseNotStarted = 20,
    /// The relevant window is over
    PhaseEnded = 21,
    /// The public round has not finished yet
    PhaseNotEnded = 22,
    /// Caller already registered
    AlreadyRegistered = 23,

    // Deposit gating (30-39)
    /// Caller is not on the KYC whitelist
    NotWhitelisted = 30,
    /// Caller is not registered, or no round is open
    NotAllowedToDeposit = 31,
    /// Amount exceeds the caller's depositable headroom
    ExceedsDepositable = 32,
    /// Amount must be positive
    ZeroAmount = 33,

    // Configuration (40-49)
    /// Sale times are not a monotonic, non-overlapping chain
    InvalidTimeOrdering = 40,
    /// Cap or amount is not positive, or amount × price != cap
    InvalidCapacity = 41,
    /// Sale is finalized; administration is frozen
    AlreadyFinalized = 42,
    /// Arithmetic overflow
    Overflow = 43,
}
