use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    /// Contract already initialized
    AlreadyInitialized = 1,
    /// Contract not initialized
    NotInitialized = 2,
    /// Caller is not the admin
    Unauthorized = 10,
    /// Account and amount lists differ in length
    LengthMismatch = 20,
    /// Granted amount must be positive
    ZeroAmount = 21,
}
