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
    /// Cliff in the past, zero duration, or period not in (0, duration]
    InvalidSchedule = 3,

    // Authorization (10-19)
    /// Caller is not the admin
    Unauthorized = 10,

    // Shares (20-29)
    /// Shares must be positive
    ZeroShares = 20,
    /// Account holds no shares
    NoShares = 21,

    // Claims & refunds (30-39)
    /// Nothing claimable yet
    NotDuePayment = 30,
    /// Refund window is closed
    RefundClosed = 31,
    /// Claims are paused
    Paused = 32,
    /// Arithmetic overflow
    Overflow = 33,
}
