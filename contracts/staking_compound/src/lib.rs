#![no_std]

mod error;
mod events;
mod rewards;
mod storage;

#[cfg(test)]
mod test;

pub use error::Error;
use events::*;
use rewards::accrued_reward;
use storage::{DataKey, DEFAULT_ITERATION_LIMIT};

pub use storage::{StakeRecord, SweepCursor};

use soroban_sdk::{contract, contractimpl, token, Address, Env, Symbol, Vec};

#[contract]
pub struct StakingCompound;

#[contractimpl]
impl StakingCompound {
    // ============================================
    // INITIALIZATION & ADMIN
    // ============================================

    /// Initialize the staking ledger
    ///
    /// Rewards are paid from `reward_bank`, which must keep the contract
    /// authorized to move its tokens.
    ///
    /// # Errors
    /// - `AlreadyInitialized`: Contract already initialized
    pub fn initialize(
        env: Env,
        admin: Address,
        token: Address,
        reward_bank: Address,
        reward_rate: i128,
    ) -> Result<(), Error> {
        if env.storage().instance().has(&DataKey::Initialized) {
            return Err(Error::AlreadyInitialized);
        }

        admin.require_auth();

        if reward_rate < 0 {
            return Err(Error::InvalidCapacity);
        }

        env.storage().instance().set(&DataKey::Initialized, &true);
        env.storage().instance().set(&DataKey::Admin, &admin);
        env.storage().instance().set(&DataKey::Token, &token);
        env.storage().instance().set(&DataKey::RewardBank, &reward_bank);
        env.storage().instance().set(&DataKey::RewardRate, &reward_rate);
        env.storage()
            .instance()
            .set(&DataKey::IterationLimit, &DEFAULT_ITERATION_LIMIT);
        env.storage().instance().set(&DataKey::TotalStaked, &0i128);
        env.storage()
            .instance()
            .set(&DataKey::Roster, &Vec::<Address>::new(&env));
        env.storage().instance().set(
            &DataKey::Cursor,
            &SweepCursor {
                ready: false,
                next_index: 0,
                epoch_at: 0,
                total_staked_at: 0,
                last_sweep_at: 0,
            },
        );

        Ok(())
    }

    /// Change the reward rate; applies to accrual windows settled from now on,
    /// never retroactively.
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `InvalidCapacity`: Rate is negative
    pub fn update_reward_rate(env: Env, rate: i128) -> Result<(), Error> {
        let admin: Address = env
            .storage()
            .instance()
            .get(&DataKey::Admin)
            .ok_or(Error::NotInitialized)?;
        admin.require_auth();

        if rate < 0 {
            return Err(Error::InvalidCapacity);
        }

        env.storage().instance().set(&DataKey::RewardRate, &rate);

        env.events().publish(
            (Symbol::new(&env, "reward_rate_updated"),),
            RewardRateUpdatedEvent { rate },
        );

        Ok(())
    }

    /// Tune how many roster entries a single `perform_upkeep` call processes.
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `InvalidCapacity`: Limit is zero
    pub fn update_iteration_limit(env: Env, limit: u32) -> Result<(), Error> {
        let admin: Address = env
            .storage()
            .instance()
            .get(&DataKey::Admin)
            .ok_or(Error::NotInitialized)?;
        admin.require_auth();

        if limit == 0 {
            return Err(Error::InvalidCapacity);
        }

        env.storage().instance().set(&DataKey::IterationLimit, &limit);

        env.events().publish(
            (Symbol::new(&env, "iteration_limit_updated"),),
            IterationLimitUpdatedEvent { limit },
        );

        Ok(())
    }

    // ============================================
    // STAKING
    // ============================================

    /// Stake tokens
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `ZeroAmount`: Amount must be positive
    pub fn stake(env: Env, caller: Address, amount: i128) -> Result<(), Error> {
        if !env.storage().instance().has(&DataKey::Initialized) {
            return Err(Error::NotInitialized);
        }

        if amount <= 0 {
            return Err(Error::ZeroAmount);
        }

        caller.require_auth();

        let now = env.ledger().timestamp();
        let known = env
            .storage()
            .instance()
            .has(&DataKey::Stake(caller.clone()));
        let mut record = Self::load_record(&env, &caller);
        Self::settle(&env, &mut record, now)?;

        if record.staked == 0 {
            record.staked_since = now;
        }
        record.staked = record.staked.checked_add(amount).ok_or(Error::Overflow)?;
        env.storage()
            .instance()
            .set(&DataKey::Stake(caller.clone()), &record);

        let total: i128 = env
            .storage()
            .instance()
            .get(&DataKey::TotalStaked)
            .unwrap_or(0);
        let new_total = total.checked_add(amount).ok_or(Error::Overflow)?;
        env.storage().instance().set(&DataKey::TotalStaked, &new_total);

        if !known {
            let mut roster: Vec<Address> = env
                .storage()
                .instance()
                .get(&DataKey::Roster)
                .unwrap_or(Vec::new(&env));
            roster.push_back(caller.clone());
            env.storage().instance().set(&DataKey::Roster, &roster);
        }

        let token: Address = env
            .storage()
            .instance()
            .get(&DataKey::Token)
            .ok_or(Error::NotInitialized)?;
        let token_client = token::Client::new(&env, &token);
        token_client.transfer(&caller, &env.current_contract_address(), &amount);

        env.events().publish(
            (Symbol::new(&env, "staked"), caller.clone()),
            StakedEvent {
                account: caller,
                amount,
            },
        );

        Ok(())
    }

    /// Withdraw staked principal
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `ZeroAmount`: Amount must be positive
    /// - `InsufficientStake`: Amount exceeds the staked balance
    pub fn withdraw(env: Env, caller: Address, amount: i128) -> Result<(), Error> {
        if !env.storage().instance().has(&DataKey::Initialized) {
            return Err(Error::NotInitialized);
        }

        if amount <= 0 {
            return Err(Error::ZeroAmount);
        }

        caller.require_auth();

        let now = env.ledger().timestamp();
        let mut record = Self::load_record(&env, &caller);
        if record.staked < amount {
            return Err(Error::InsufficientStake);
        }

        Self::settle(&env, &mut record, now)?;
        record.staked -= amount;
        if record.staked == 0 {
            record.staked_since = 0;
        }
        env.storage()
            .instance()
            .set(&DataKey::Stake(caller.clone()), &record);

        let total: i128 = env
            .storage()
            .instance()
            .get(&DataKey::TotalStaked)
            .unwrap_or(0);
        env.storage()
            .instance()
            .set(&DataKey::TotalStaked, &(total - amount));

        let token: Address = env
            .storage()
            .instance()
            .get(&DataKey::Token)
            .ok_or(Error::NotInitialized)?;
        let token_client = token::Client::new(&env, &token);
        token_client.transfer(&env.current_contract_address(), &caller, &amount);

        env.events().publish(
            (Symbol::new(&env, "withdrawn"), caller.clone()),
            WithdrawnEvent {
                account: caller,
                amount,
            },
        );

        Ok(())
    }

    /// Pay out the caller's accrued reward from the reward bank and reset the
    /// accrual window.
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `NotDuePayment`: Nothing accrued yet
    pub fn claim_reward(env: Env, caller: Address) -> Result<i128, Error> {
        if !env.storage().instance().has(&DataKey::Initialized) {
            return Err(Error::NotInitialized);
        }

        caller.require_auth();

        let now = env.ledger().timestamp();
        let mut record = Self::load_record(&env, &caller);
        Self::settle(&env, &mut record, now)?;

        let payout = record.pending;
        if payout == 0 {
            return Err(Error::NotDuePayment);
        }

        record.pending = 0;
        env.storage()
            .instance()
            .set(&DataKey::Stake(caller.clone()), &record);

        let token: Address = env
            .storage()
            .instance()
            .get(&DataKey::Token)
            .ok_or(Error::NotInitialized)?;
        let bank: Address = env
            .storage()
            .instance()
            .get(&DataKey::RewardBank)
            .ok_or(Error::NotInitialized)?;
        let token_client = token::Client::new(&env, &token);
        token_client.transfer(&bank, &caller, &payout);

        env.events().publish(
            (Symbol::new(&env, "reward_claimed"), caller.clone()),
            RewardClaimedEvent {
                account: caller,
                amount: payout,
            },
        );

        Ok(payout)
    }

    // ============================================
    // COMPOUNDING SWEEP
    // ============================================

    /// Arm a compounding epoch. Freezes the accrual instant and pool size the
    /// sweep settles against; moves no funds itself. Anyone may call.
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `SweepInProgress`: The previous pass has not finished draining
    /// - `NothingToProcess`: Roster is empty
    pub fn auto_compound(env: Env) -> Result<(), Error> {
        if !env.storage().instance().has(&DataKey::Initialized) {
            return Err(Error::NotInitialized);
        }

        let mut cursor: SweepCursor = env
            .storage()
            .instance()
            .get(&DataKey::Cursor)
            .ok_or(Error::NotInitialized)?;
        if cursor.ready {
            return Err(Error::SweepInProgress);
        }

        let roster: Vec<Address> = env
            .storage()
            .instance()
            .get(&DataKey::Roster)
            .unwrap_or(Vec::new(&env));
        if roster.is_empty() {
            return Err(Error::NothingToProcess);
        }

        let total: i128 = env
            .storage()
            .instance()
            .get(&DataKey::TotalStaked)
            .unwrap_or(0);
        let now = env.ledger().timestamp();

        cursor.ready = true;
        cursor.next_index = 0;
        cursor.epoch_at = now;
        cursor.total_staked_at = total;
        env.storage().instance().set(&DataKey::Cursor, &cursor);

        env.events().publish(
            (Symbol::new(&env, "compound_armed"),),
            CompoundArmedEvent {
                epoch_at: now,
                total_staked: total,
                roster_len: roster.len(),
            },
        );

        Ok(())
    }

    /// True while an armed sweep still has roster entries left to process.
    pub fn check_upkeep(env: Env) -> bool {
        env.storage()
            .instance()
            .get::<DataKey, SweepCursor>(&DataKey::Cursor)
            .map(|c| c.ready)
            .unwrap_or(false)
    }

    /// Process at most `iteration_limit` roster entries of the armed sweep,
    /// re-investing each entry's reward into its principal. Call repeatedly
    /// until `check_upkeep` reports false; one call need not drain the roster.
    ///
    /// Returns the number of entries processed.
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `NothingToProcess`: No sweep is armed
    pub fn perform_upkeep(env: Env) -> Result<u32, Error> {
        if !env.storage().instance().has(&DataKey::Initialized) {
            return Err(Error::NotInitialized);
        }

        let mut cursor: SweepCursor = env
            .storage()
            .instance()
            .get(&DataKey::Cursor)
            .ok_or(Error::NotInitialized)?;
        if !cursor.ready {
            return Err(Error::NothingToProcess);
        }

        let roster: Vec<Address> = env
            .storage()
            .instance()
            .get(&DataKey::Roster)
            .unwrap_or(Vec::new(&env));
        let limit: u32 = env
            .storage()
            .instance()
            .get(&DataKey::IterationLimit)
            .unwrap_or(DEFAULT_ITERATION_LIMIT);
        let rate: i128 = env
            .storage()
            .instance()
            .get(&DataKey::RewardRate)
            .unwrap_or(0);
        let mut total: i128 = env
            .storage()
            .instance()
            .get(&DataKey::TotalStaked)
            .unwrap_or(0);

        let start = cursor.next_index;
        let end = start.saturating_add(limit).min(roster.len());
        let mut compounded: i128 = 0;

        for i in start..end {
            let account = match roster.get(i) {
                Some(a) => a,
                None => break,
            };
            let mut record = Self::load_record(&env, &account);

            // Entries that settled after the epoch was armed accrue nothing
            // extra for this pass; their pending still compounds.
            let elapsed = cursor.epoch_at.saturating_sub(record.accrued_at);
            let accrued = accrued_reward(record.staked, elapsed, rate, cursor.total_staked_at)
                .ok_or(Error::Overflow)?;
            let reward = record.pending.checked_add(accrued).ok_or(Error::Overflow)?;

            if reward > 0 {
                if record.staked == 0 {
                    record.staked_since = cursor.epoch_at;
                }
                record.staked = record.staked.checked_add(reward).ok_or(Error::Overflow)?;
                record.pending = 0;
                total = total.checked_add(reward).ok_or(Error::Overflow)?;
                compounded = compounded.checked_add(reward).ok_or(Error::Overflow)?;
            }
            if record.accrued_at < cursor.epoch_at {
                record.accrued_at = cursor.epoch_at;
            }
            env.storage()
                .instance()
                .set(&DataKey::Stake(account), &record);
        }

        let completed = end >= roster.len();
        cursor.next_index = if completed { 0 } else { end };
        if completed {
            cursor.ready = false;
            cursor.last_sweep_at = cursor.epoch_at;
        }
        env.storage().instance().set(&DataKey::Cursor, &cursor);
        env.storage().instance().set(&DataKey::TotalStaked, &total);

        if compounded > 0 {
            let token: Address = env
                .storage()
                .instance()
                .get(&DataKey::Token)
                .ok_or(Error::NotInitialized)?;
            let bank: Address = env
                .storage()
                .instance()
                .get(&DataKey::RewardBank)
                .ok_or(Error::NotInitialized)?;
            let token_client = token::Client::new(&env, &token);
            token_client.transfer(&bank, &env.current_contract_address(), &compounded);
        }

        env.events().publish(
            (Symbol::new(&env, "sweep_chunk"),),
            SweepChunkEvent {
                from_index: start,
                processed: end - start,
                compounded,
                completed,
            },
        );

        Ok(end - start)
    }

    // ============================================
    // VIEW FUNCTIONS
    // ============================================

    pub fn staked_of(env: Env, account: Address) -> i128 {
        Self::load_record(&env, &account).staked
    }

    /// Reward the account could claim right now.
    pub fn pending_reward_of(env: Env, account: Address) -> i128 {
        let record = Self::load_record(&env, &account);
        let now = env.ledger().timestamp();
        let total: i128 = env
            .storage()
            .instance()
            .get(&DataKey::TotalStaked)
            .unwrap_or(0);
        let rate: i128 = env
            .storage()
            .instance()
            .get(&DataKey::RewardRate)
            .unwrap_or(0);

        let elapsed = now.saturating_sub(record.accrued_at);
        let accrued = accrued_reward(record.staked, elapsed, rate, total).unwrap_or(0);
        record.pending.saturating_add(accrued)
    }

    pub fn staked_since_of(env: Env, account: Address) -> u64 {
        Self::load_record(&env, &account).staked_since
    }

    pub fn total_staked(env: Env) -> i128 {
        env.storage()
            .instance()
            .get(&DataKey::TotalStaked)
            .unwrap_or(0)
    }

    pub fn reward_rate(env: Env) -> i128 {
        env.storage()
            .instance()
            .get(&DataKey::RewardRate)
            .unwrap_or(0)
    }

    pub fn iteration_limit(env: Env) -> u32 {
        env.storage()
            .instance()
            .get(&DataKey::IterationLimit)
            .unwrap_or(DEFAULT_ITERATION_LIMIT)
    }

    pub fn roster_len(env: Env) -> u32 {
        env.storage()
            .instance()
            .get::<DataKey, Vec<Address>>(&DataKey::Roster)
            .map(|r| r.len())
            .unwrap_or(0)
    }

    pub fn sweep_cursor(env: Env) -> Option<SweepCursor> {
        env.storage().instance().get(&DataKey::Cursor)
    }

    // ============================================
    // INTERNAL HELPERS
    // ============================================

    fn load_record(env: &Env, account: &Address) -> StakeRecord {
        env.storage()
            .instance()
            .get(&DataKey::Stake(account.clone()))
            .unwrap_or(StakeRecord {
                staked: 0,
                pending: 0,
                accrued_at: 0,
                staked_since: 0,
            })
    }

    /// Fold the accrual since `accrued_at` into `pending` so the linear
    /// formula's basis can change without losing earned reward.
    fn settle(env: &Env, record: &mut StakeRecord, now: u64) -> Result<(), Error> {
        if record.staked > 0 && now > record.accrued_at {
            let total: i128 = env
                .storage()
                .instance()
                .get(&DataKey::TotalStaked)
                .unwrap_or(0);
            let rate: i128 = env
                .storage()
                .instance()
                .get(&DataKey::RewardRate)
                .unwrap_or(0);
            let accrued = accrued_reward(record.staked, now - record.accrued_at, rate, total)
                .ok_or(Error::Overflow)?;
            record.pending = record.pending.checked_add(accrued).ok_or(Error::Overflow)?;
        }
        record.accrued_at = now;
        Ok(())
    }
}
