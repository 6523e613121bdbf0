use soroban_sdk::{contracttype, Address};

#[contracttype]
#[derive(Clone, Debug)]
pub struct SharesChangedEvent {
    pub account: Address,
    pub shares: i128,
    pub total_shares: i128,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct ClaimedEvent {
    pub account: Address,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct RefundedEvent {
    pub account: Address,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct RefundToggledEvent {
    pub open: bool,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct PauseToggledEvent {
    pub paused: bool,
}
