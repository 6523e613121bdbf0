#![no_std]

mod error;


pub use error::Error;

use soroban_sdk::{contract, contractimpl, contracttype, vec, Address, Env, Symbol};

#[contracttype]
#[derive(Clone)]
enum DataKey {
    Initialized,
    Credit,
    Direct,
    Staking,
    TotalCap,
}

/// Composes the three allocation providers additively under a hard ceiling.
/// The proxy owns no provider state; it only reads through their common
/// `allocation_of` interface.
#[contract]
pub struct AllocationProxy;

#[contractimpl]
impl AllocationProxy {
    /// # Errors
    /// - `AlreadyInitialized`: Contract already initialized
    /// - `InvalidCapacity`: Cap must be positive
    pub fn initialize(
        env: Env,
        credit_provider: Address,
        direct_provider: Address,
        staking_provider: Address,
        total_cap: i128,
    ) -> Result<(), Error> {
        if env.storage().instance().has(&DataKey::Initialized) {
            return Err(Error::AlreadyInitialized);
        }

        if total_cap <= 0 {
            return Err(Error::InvalidCapacity);
        }

        env.storage().instance().set(&DataKey::Initialized, &true);
        env.storage().instance().set(&DataKey::Credit, &credit_provider);
        env.storage().instance().set(&DataKey::Direct, &direct_provider);
        env.storage()
            .instance()
            .set(&DataKey::Staking, &staking_provider);
        env.storage().instance().set(&DataKey::TotalCap, &total_cap);

        Ok(())
    }

    /// Sum of the three providers' allocations, clamped to the total cap.
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `Overflow`: Provider sum overflows
    pub fn allocation_of(env: Env, account: Address) -> Result<i128, Error> {
        let credit: Address = env
            .storage()
            .instance()
            .get(&DataKey::Credit)
            .ok_or(Error::NotInitialized)?;
        let direct: Address = env
            .storage()
            .instance()
            .get(&DataKey::Direct)
            .ok_or(Error::NotInitialized)?;
        let staking: Address = env
            .storage()
            .instance()
            .get(&DataKey::Staking)
            .ok_or(Error::NotInitialized)?;
        let cap: i128 = env
            .storage()
            .instance()
            .get(&DataKey::TotalCap)
            .ok_or(Error::NotInitialized)?;

        let mut sum: i128 = 0;
        for provider in [credit, direct, staking] {
            let allocation: i128 = env.invoke_contract(
                &provider,
                &Symbol::new(&env, "allocation_of"),
                vec![&env, account.to_val()],
            );
            sum = sum.checked_add(allocation).ok_or(Error::Overflow)?;
        }

        Ok(sum.min(cap))
    }

    pub fn total_cap(env: Env) -> Result<i128, Error> {
        env.storage()
            .instance()
            .get(&DataKey::TotalCap)
            .ok_or(Error::NotInitialized)
    }

    pub fn providers(env: Env) -> Result<(Address, Address, Address), Error> {
        let credit = env
            .storage()
            .instance()
            .get(&DataKey::Credit)
            .ok_or(Error::NotInitialized)?;
        let direct = env
            .storage()
            .instance()
            .get(&DataKey::Direct)
            .ok_or(Error::NotInitialized)?;
        let staking = env
            .storage()
            .instance()
            .get(&DataKey::Staking)
            .ok_or(Error::NotInitialized)?;
        Ok((credit, direct, staking))
    }
}
