use soroban_sdk::{contracttype, Address};

#[contracttype]
#[derive(Clone, Debug)]
pub struct GrantedEvent {
    pub account: Address,
    pub amount: i128,
}
