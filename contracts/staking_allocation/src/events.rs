use soroban_sdk::contracttype;

#[contracttype]
#[derive(Clone, Debug)]
pub struct SnapshotEvent {
    pub members: u32,
    pub taken_at: u64,
}
