#![no_std]

mod error;
mod events;

pub use error::Error;
use events::GrantedEvent;

use soroban_sdk::{contract, contractimpl, contracttype, Address, Env, Symbol, Vec};

#[contracttype]
#[derive(Clone)]
enum DataKey {
    Initialized,
    Admin,
    Grant(Address),
}

/// Allocation provider fed by explicit admin grants. An address never granted
/// anything has allocation zero.
#[contract]
pub struct DirectAllocationProvider;

#[contractimpl]
impl DirectAllocationProvider {
    /// # Errors
    /// - `AlreadyInitialized`: Contract already initialized
    pub fn initialize(env: Env, admin: Address) -> Result<(), Error> {
        if env.storage().instance().has(&DataKey::Initialized) {
            return Err(Error::AlreadyInitialized);
        }

        admin.require_auth();

        env.storage().instance().set(&DataKey::Initialized, &true);
        env.storage().instance().set(&DataKey::Admin, &admin);

        Ok(())
    }

    /// Grant allocations in batch; a repeated account overwrites its previous
    /// grant.
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `LengthMismatch`: Account and amount lists differ in length
    /// - `ZeroAmount`: A granted amount is not positive
    pub fn grant_batch(
        env: Env,
        accounts: Vec<Address>,
        amounts: Vec<i128>,
    ) -> Result<(), Error> {
        let admin: Address = env
            .storage()
            .instance()
            .get(&DataKey::Admin)
            .ok_or(Error::NotInitialized)?;
        admin.require_auth();

        if accounts.len() != amounts.len() {
            return Err(Error::LengthMismatch);
        }

        // Validate the whole batch before writing anything.
        for amount in amounts.iter() {
            if amount <= 0 {
                return Err(Error::ZeroAmount);
            }
        }

        for (account, amount) in accounts.iter().zip(amounts.iter()) {
            env.storage()
                .instance()
                .set(&DataKey::Grant(account.clone()), &amount);

            env.events().publish(
                (Symbol::new(&env, "granted"), account.clone()),
                GrantedEvent { account, amount },
            );
        }

        Ok(())
    }

    pub fn allocation_of(env: Env, account: Address) -> i128 {
        env.storage()
            .instance()
            .get(&DataKey::Grant(account))
            .unwrap_or(0)
    }
}
