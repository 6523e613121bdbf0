use crate::storage::SaleTimes;
use soroban_sdk::{contracttype, Address};

#[contracttype]
#[derive(Clone, Debug)]
pub struct RegisteredEvent {
    pub account: Address,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct DepositedEvent {
    pub account: Address,
    pub amount: i128,
    pub fee: i128,
    pub credit_spent: i128,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct SaleFinalizedEvent {
    pub total_deposited: i128,
    pub depositors: u32,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct TimesUpdatedEvent {
    pub times: SaleTimes,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct PublicCapUpdatedEvent {
    pub cap: i128,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct DepositorRefundedEvent {
    pub account: Address,
    pub amount: i128,
}
