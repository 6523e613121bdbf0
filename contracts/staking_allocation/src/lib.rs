#![no_std]

mod error;
mod events;
mod storage;
mod weights;

#[cfg(test)]
mod test;

pub use error::Error;
use events::SnapshotEvent;
use storage::DataKey;
use weights::{share_of, weighted_allocation};

pub use storage::{Weights, SCALE};

use soroban_sdk::{contract, contractimpl, vec, Address, Env, Symbol, Vec};

/// Allocation provider frozen from staking state. `take_snapshot` reads the
/// reward ledger once for a supplied candidate list and stores each address's
/// weighted share; `allocation_of` serves the frozen numbers until the next
/// snapshot replaces them wholesale.
#[contract]
pub struct StakingAllocationProvider;

#[contractimpl]
impl StakingAllocationProvider {
    /// # Errors
    /// - `AlreadyInitialized`: Contract already initialized
    /// - `InvalidWeightSum`: alpha + beta + theta != SCALE, or a weight is
    ///   negative
    pub fn initialize(
        env: Env,
        admin: Address,
        staking: Address,
        alpha: i128,
        beta: i128,
        theta: i128,
    ) -> Result<(), Error> {
        if env.storage().instance().has(&DataKey::Initialized) {
            return Err(Error::AlreadyInitialized);
        }

        admin.require_auth();

        if alpha < 0 || beta < 0 || theta < 0 {
            return Err(Error::InvalidWeightSum);
        }
        let sum = alpha
            .checked_add(beta)
            .and_then(|s| s.checked_add(theta))
            .ok_or(Error::InvalidWeightSum)?;
        if sum != SCALE {
            return Err(Error::InvalidWeightSum);
        }

        env.storage().instance().set(&DataKey::Initialized, &true);
        env.storage().instance().set(&DataKey::Admin, &admin);
        env.storage().instance().set(&DataKey::Staking, &staking);
        env.storage().instance().set(
            &DataKey::Weights,
            &Weights { alpha, beta, theta },
        );

        Ok(())
    }

    /// Recompute the snapshot over `candidates`, replacing the previous one
    /// entirely. Shares:
    /// - staked share: candidate stake over the ledger's total stake
    /// - duration share: stake × tenure over the candidates' combined
    ///   stake × tenure
    /// - extra share: pending reward over the candidates' combined pending
    ///   reward
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `Overflow`: Arithmetic overflow while aggregating
    pub fn take_snapshot(env: Env, candidates: Vec<Address>) -> Result<(), Error> {
        let admin: Address = env
            .storage()
            .instance()
            .get(&DataKey::Admin)
            .ok_or(Error::NotInitialized)?;
        admin.require_auth();

        let staking: Address = env
            .storage()
            .instance()
            .get(&DataKey::Staking)
            .ok_or(Error::NotInitialized)?;
        let weights: Weights = env
            .storage()
            .instance()
            .get(&DataKey::Weights)
            .ok_or(Error::NotInitialized)?;

        let now = env.ledger().timestamp();
        let total_staked: i128 = env.invoke_contract(
            &staking,
            &Symbol::new(&env, "total_staked"),
            vec![&env],
        );

        let mut staked_amounts: Vec<i128> = Vec::new(&env);
        let mut weighted_tenures: Vec<i128> = Vec::new(&env);
        let mut extras: Vec<i128> = Vec::new(&env);
        let mut tenure_sum: i128 = 0;
        let mut extra_sum: i128 = 0;

        for account in candidates.iter() {
            let staked: i128 = env.invoke_contract(
                &staking,
                &Symbol::new(&env, "staked_of"),
                vec![&env, account.to_val()],
            );
            let since: u64 = env.invoke_contract(
                &staking,
                &Symbol::new(&env, "staked_since_of"),
                vec![&env, account.to_val()],
            );
            let pending: i128 = env.invoke_contract(
                &staking,
                &Symbol::new(&env, "pending_reward_of"),
                vec![&env, account.to_val()],
            );

            let tenure = if since > 0 { now.saturating_sub(since) } else { 0 };
            let weighted_tenure = staked
                .checked_mul(tenure as i128)
                .ok_or(Error::Overflow)?;

            tenure_sum = tenure_sum
                .checked_add(weighted_tenure)
                .ok_or(Error::Overflow)?;
            extra_sum = extra_sum.checked_add(pending).ok_or(Error::Overflow)?;

            staked_amounts.push_back(staked);
            weighted_tenures.push_back(weighted_tenure);
            extras.push_back(pending);
        }

        // Drop the previous snapshot before writing the new one.
        let previous: Vec<Address> = env
            .storage()
            .instance()
            .get(&DataKey::Members)
            .unwrap_or(Vec::new(&env));
        for account in previous.iter() {
            env.storage().instance().remove(&DataKey::Alloc(account));
        }

        for (i, account) in candidates.iter().enumerate() {
            let i = i as u32;
            let staked_share =
                share_of(staked_amounts.get(i).unwrap_or(0), total_staked)
                    .ok_or(Error::Overflow)?;
            let duration_share =
                share_of(weighted_tenures.get(i).unwrap_or(0), tenure_sum)
                    .ok_or(Error::Overflow)?;
            let extra_share = share_of(extras.get(i).unwrap_or(0), extra_sum)
                .ok_or(Error::Overflow)?;

            let allocation =
                weighted_allocation(&weights, staked_share, duration_share, extra_share)
                    .ok_or(Error::Overflow)?;
            env.storage()
                .instance()
                .set(&DataKey::Alloc(account), &allocation);
        }

        env.storage().instance().set(&DataKey::Members, &candidates);
        env.storage().instance().set(&DataKey::TakenAt, &now);

        env.events().publish(
            (Symbol::new(&env, "snapshot"),),
            SnapshotEvent {
                members: candidates.len(),
                taken_at: now,
            },
        );

        Ok(())
    }

    pub fn allocation_of(env: Env, account: Address) -> i128 {
        env.storage()
            .instance()
            .get(&DataKey::Alloc(account))
            .unwrap_or(0)
    }

    pub fn snapshot_members(env: Env) -> Vec<Address> {
        env.storage()
            .instance()
            .get(&DataKey::Members)
            .unwrap_or(Vec::new(&env))
    }

    pub fn snapshot_taken_at(env: Env) -> u64 {
        env.storage().instance().get(&DataKey::TakenAt).unwrap_or(0)
    }

    pub fn weights(env: Env) -> Result<Weights, Error> {
        env.storage()
            .instance()
            .get(&DataKey::Weights)
            .ok_or(Error::NotInitialized)
    }
}
