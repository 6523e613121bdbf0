use soroban_sdk::{contracttype, Address};

#[contracttype]
#[derive(Clone, Debug)]
pub struct StakedEvent {
    pub account: Address,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct WithdrawnEvent {
    pub account: Address,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct RewardClaimedEvent {
    pub account: Address,
    pub amount: i128,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct CompoundArmedEvent {
    pub epoch_at: u64,
    pub total_staked: i128,
    pub roster_len: u32,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct SweepChunkEvent {
    pub from_index: u32,
    pub processed: u32,
    pub compounded: i128,
    pub completed: bool,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct RewardRateUpdatedEvent {
    pub rate: i128,
}

#[contracttype]
#[derive(Clone, Debug)]
pub struct IterationLimitUpdatedEvent {
    pub limit: u32,
}
