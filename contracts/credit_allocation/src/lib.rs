#![no_std]

mod error;

pub use error::Error;

use soroban_sdk::{contract, contractimpl, contracttype, token, Address, Env};

#[contracttype]
#[derive(Clone)]
enum DataKey {
    Initialized,
    Token,
}

/// Allocation provider backed by a live credit-token balance read. Holding a
/// credit token IS the allocation; nothing is snapshotted here.
#[contract]
pub struct CreditAllocationProvider;

#[contractimpl]
impl CreditAllocationProvider {
    /// # Errors
    /// - `AlreadyInitialized`: Contract already initialized
    pub fn initialize(env: Env, credit_token: Address) -> Result<(), Error> {
        if env.storage().instance().has(&DataKey::Initialized) {
            return Err(Error::AlreadyInitialized);
        }

        env.storage().instance().set(&DataKey::Initialized, &true);
        env.storage().instance().set(&DataKey::Token, &credit_token);

        Ok(())
    }

    pub fn allocation_of(env: Env, account: Address) -> i128 {
        let credit_token: Address = match env.storage().instance().get(&DataKey::Token) {
            Some(t) => t,
            None => return 0,
        };
        token::Client::new(&env, &credit_token).balance(&account)
    }

    pub fn credit_token(env: Env) -> Result<Address, Error> {
        env.storage()
            .instance()
            .get(&DataKey::Token)
            .ok_or(Error::NotInitialized)
    }
}
