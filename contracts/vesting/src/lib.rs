#![no_std]

mod error;
mod events;
mod release;
mod storage;


pub use error::Error;
use events::*;
use release::{claimable, vested_amount};
use storage::DataKey;

pub use storage::Schedule;

use soroban_sdk::{contract, contractimpl, token, Address, Env, Symbol};

/// Share-weighted step-function release of a funded token pool. Shares are
/// assigned by the admin (the sale contract, once wired); holders draw down
/// their vested portion with `claim`, and the admin can reclaim a holder's
/// unreleased remainder while the refund window is open.
#[contract]
pub struct Vesting;

#[contractimpl]
impl Vesting {
    // ============================================
    // INITIALIZATION & ADMIN
    // ============================================

    /// # Errors
    /// - `AlreadyInitialized`: Contract already initialized
    /// - `InvalidSchedule`: Cliff in the past, zero duration, or period not
    ///   in (0, duration]
    pub fn initialize(
        env: Env,
        admin: Address,
        token: Address,
        cliff: u64,
        duration: u64,
        period: u64,
    ) -> Result<(), Error> {
        if env.storage().instance().has(&DataKey::Initialized) {
            return Err(Error::AlreadyInitialized);
        }

        admin.require_auth();

        if cliff < env.ledger().timestamp() {
            return Err(Error::InvalidSchedule);
        }
        if duration == 0 || period == 0 || period > duration {
            return Err(Error::InvalidSchedule);
        }

        env.storage().instance().set(&DataKey::Initialized, &true);
        env.storage().instance().set(&DataKey::Admin, &admin);
        env.storage().instance().set(&DataKey::Token, &token);
        env.storage().instance().set(
            &DataKey::Schedule,
            &Schedule {
                cliff,
                duration,
                period,
            },
        );
        env.storage().instance().set(&DataKey::TotalShares, &0i128);
        env.storage().instance().set(&DataKey::TotalReleased, &0i128);
        env.storage().instance().set(&DataKey::RefundOpen, &false);
        env.storage().instance().set(&DataKey::Paused, &false);

        Ok(())
    }

    /// Pause claims (administrative operations stay available)
    pub fn pause(env: Env) -> Result<(), Error> {
        let admin = Self::read_admin(&env)?;
        admin.require_auth();

        env.storage().instance().set(&DataKey::Paused, &true);
        env.events().publish(
            (Symbol::new(&env, "pause_toggled"),),
            PauseToggledEvent { paused: true },
        );
        Ok(())
    }

    pub fn unpause(env: Env) -> Result<(), Error> {
        let admin = Self::read_admin(&env)?;
        admin.require_auth();

        env.storage().instance().set(&DataKey::Paused, &false);
        env.events().publish(
            (Symbol::new(&env, "pause_toggled"),),
            PauseToggledEvent { paused: false },
        );
        Ok(())
    }

    pub fn allow_refund(env: Env) -> Result<(), Error> {
        let admin = Self::read_admin(&env)?;
        admin.require_auth();

        env.storage().instance().set(&DataKey::RefundOpen, &true);
        env.events().publish(
            (Symbol::new(&env, "refund_toggled"),),
            RefundToggledEvent { open: true },
        );
        Ok(())
    }

    pub fn disallow_refund(env: Env) -> Result<(), Error> {
        let admin = Self::read_admin(&env)?;
        admin.require_auth();

        env.storage().instance().set(&DataKey::RefundOpen, &false);
        env.events().publish(
            (Symbol::new(&env, "refund_toggled"),),
            RefundToggledEvent { open: false },
        );
        Ok(())
    }

    // ============================================
    // SHARE REGISTRY
    // ============================================

    /// Add shares to an account
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `ZeroShares`: Amount must be positive
    pub fn add_shares(env: Env, account: Address, amount: i128) -> Result<(), Error> {
        let admin = Self::read_admin(&env)?;
        admin.require_auth();

        if amount <= 0 {
            return Err(Error::ZeroShares);
        }

        let current: i128 = env
            .storage()
            .instance()
            .get(&DataKey::Shares(account.clone()))
            .unwrap_or(0);
        let updated = current.checked_add(amount).ok_or(Error::Overflow)?;
        env.storage()
            .instance()
            .set(&DataKey::Shares(account.clone()), &updated);

        let total: i128 = env
            .storage()
            .instance()
            .get(&DataKey::TotalShares)
            .unwrap_or(0);
        let total = total.checked_add(amount).ok_or(Error::Overflow)?;
        env.storage().instance().set(&DataKey::TotalShares, &total);

        env.events().publish(
            (Symbol::new(&env, "shares_changed"), account.clone()),
            SharesChangedEvent {
                account,
                shares: updated,
                total_shares: total,
            },
        );

        Ok(())
    }

    /// Overwrite an account's shares
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `ZeroShares`: Amount must be positive
    pub fn set_shares(env: Env, account: Address, amount: i128) -> Result<(), Error> {
        let admin = Self::read_admin(&env)?;
        admin.require_auth();

        if amount <= 0 {
            return Err(Error::ZeroShares);
        }

        let current: i128 = env
            .storage()
            .instance()
            .get(&DataKey::Shares(account.clone()))
            .unwrap_or(0);
        env.storage()
            .instance()
            .set(&DataKey::Shares(account.clone()), &amount);

        let total: i128 = env
            .storage()
            .instance()
            .get(&DataKey::TotalShares)
            .unwrap_or(0);
        let total = total
            .checked_sub(current)
            .and_then(|t| t.checked_add(amount))
            .ok_or(Error::Overflow)?;
        env.storage().instance().set(&DataKey::TotalShares, &total);

        env.events().publish(
            (Symbol::new(&env, "shares_changed"), account.clone()),
            SharesChangedEvent {
                account,
                shares: amount,
                total_shares: total,
            },
        );

        Ok(())
    }

    /// Zero an account's shares
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    pub fn remove_shares(env: Env, account: Address) -> Result<(), Error> {
        let admin = Self::read_admin(&env)?;
        admin.require_auth();

        let current: i128 = env
            .storage()
            .instance()
            .get(&DataKey::Shares(account.clone()))
            .unwrap_or(0);
        env.storage()
            .instance()
            .remove(&DataKey::Shares(account.clone()));

        let total: i128 = env
            .storage()
            .instance()
            .get(&DataKey::TotalShares)
            .unwrap_or(0);
        let total = total - current;
        env.storage().instance().set(&DataKey::TotalShares, &total);

        env.events().publish(
            (Symbol::new(&env, "shares_changed"), account.clone()),
            SharesChangedEvent {
                account,
                shares: 0,
                total_shares: total,
            },
        );

        Ok(())
    }

    // ============================================
    // RELEASE
    // ============================================

    /// Amount the account could claim right now.
    pub fn claimable_of(env: Env, account: Address) -> i128 {
        let shares: i128 = env
            .storage()
            .instance()
            .get(&DataKey::Shares(account.clone()))
            .unwrap_or(0);
        let total_shares: i128 = env
            .storage()
            .instance()
            .get(&DataKey::TotalShares)
            .unwrap_or(0);
        let released: i128 = env
            .storage()
            .instance()
            .get(&DataKey::Released(account))
            .unwrap_or(0);

        let schedule: storage::Schedule = match env.storage().instance().get(&DataKey::Schedule) {
            Some(s) => s,
            None => return 0,
        };
        let funded = match Self::total_funded(&env) {
            Ok(f) => f,
            Err(_) => return 0,
        };

        let vested = vested_amount(funded, &schedule, env.ledger().timestamp()).unwrap_or(0);
        claimable(shares, total_shares, vested, released).unwrap_or(0)
    }

    /// Pay out the caller's vested, unreleased portion.
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `Paused`: Claims are paused
    /// - `NoShares`: Caller holds no shares
    /// - `NotDuePayment`: Nothing claimable yet
    pub fn claim(env: Env, caller: Address) -> Result<i128, Error> {
        if !env.storage().instance().has(&DataKey::Initialized) {
            return Err(Error::NotInitialized);
        }

        caller.require_auth();

        let paused: bool = env
            .storage()
            .instance()
            .get(&DataKey::Paused)
            .unwrap_or(false);
        if paused {
            return Err(Error::Paused);
        }

        let shares: i128 = env
            .storage()
            .instance()
            .get(&DataKey::Shares(caller.clone()))
            .unwrap_or(0);
        if shares == 0 {
            return Err(Error::NoShares);
        }

        let due = Self::claimable_of(env.clone(), caller.clone());
        if due == 0 {
            return Err(Error::NotDuePayment);
        }

        let released: i128 = env
            .storage()
            .instance()
            .get(&DataKey::Released(caller.clone()))
            .unwrap_or(0);
        env.storage()
            .instance()
            .set(&DataKey::Released(caller.clone()), &(released + due));

        let total_released: i128 = env
            .storage()
            .instance()
            .get(&DataKey::TotalReleased)
            .unwrap_or(0);
        env.storage()
            .instance()
            .set(&DataKey::TotalReleased, &(total_released + due));

        let token: Address = env
            .storage()
            .instance()
            .get(&DataKey::Token)
            .ok_or(Error::NotInitialized)?;
        token::Client::new(&env, &token).transfer(
            &env.current_contract_address(),
            &caller,
            &due,
        );

        env.events().publish(
            (Symbol::new(&env, "claimed"), caller.clone()),
            ClaimedEvent {
                account: caller,
                amount: due,
            },
        );

        Ok(due)
    }

    /// Reclaim an account's unreleased remainder to the admin and excise the
    /// account from the pool. Remaining holders' claimables are unaffected.
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `RefundClosed`: Refund window is not open
    /// - `NoShares`: Account holds no shares (including repeated refunds)
    pub fn refund_user(env: Env, account: Address) -> Result<i128, Error> {
        let admin = Self::read_admin(&env)?;
        admin.require_auth();

        let open: bool = env
            .storage()
            .instance()
            .get(&DataKey::RefundOpen)
            .unwrap_or(false);
        if !open {
            return Err(Error::RefundClosed);
        }

        let shares: i128 = env
            .storage()
            .instance()
            .get(&DataKey::Shares(account.clone()))
            .unwrap_or(0);
        if shares == 0 {
            return Err(Error::NoShares);
        }

        let total_shares: i128 = env
            .storage()
            .instance()
            .get(&DataKey::TotalShares)
            .unwrap_or(0);
        let released: i128 = env
            .storage()
            .instance()
            .get(&DataKey::Released(account.clone()))
            .unwrap_or(0);
        let funded = Self::total_funded(&env)?;

        // Full-schedule entitlement, not just the vested-to-date portion.
        let entitlement = shares
            .checked_mul(funded)
            .and_then(|e| e.checked_div(total_shares))
            .ok_or(Error::Overflow)?;
        let refund = (entitlement - released).max(0);

        // Excise the account: shrinking shares, released and the pool by the
        // account's own numbers leaves every other holder's claimable intact.
        env.storage()
            .instance()
            .remove(&DataKey::Shares(account.clone()));
        env.storage()
            .instance()
            .remove(&DataKey::Released(account.clone()));
        env.storage()
            .instance()
            .set(&DataKey::TotalShares, &(total_shares - shares));
        let total_released: i128 = env
            .storage()
            .instance()
            .get(&DataKey::TotalReleased)
            .unwrap_or(0);
        env.storage()
            .instance()
            .set(&DataKey::TotalReleased, &(total_released - released));

        if refund > 0 {
            let token: Address = env
                .storage()
                .instance()
                .get(&DataKey::Token)
                .ok_or(Error::NotInitialized)?;
            token::Client::new(&env, &token).transfer(
                &env.current_contract_address(),
                &admin,
                &refund,
            );
        }

        env.events().publish(
            (Symbol::new(&env, "refunded"), account.clone()),
            RefundedEvent {
                account,
                amount: refund,
            },
        );

        Ok(refund)
    }

    // ============================================
    // VIEW FUNCTIONS
    // ============================================

    pub fn shares_of(env: Env, account: Address) -> i128 {
        env.storage()
            .instance()
            .get(&DataKey::Shares(account))
            .unwrap_or(0)
    }

    pub fn total_shares(env: Env) -> i128 {
        env.storage()
            .instance()
            .get(&DataKey::TotalShares)
            .unwrap_or(0)
    }

    pub fn released_of(env: Env, account: Address) -> i128 {
        env.storage()
            .instance()
            .get(&DataKey::Released(account))
            .unwrap_or(0)
    }

    pub fn total_released(env: Env) -> i128 {
        env.storage()
            .instance()
            .get(&DataKey::TotalReleased)
            .unwrap_or(0)
    }

    pub fn schedule(env: Env) -> Result<Schedule, Error> {
        env.storage()
            .instance()
            .get(&DataKey::Schedule)
            .ok_or(Error::NotInitialized)
    }

    pub fn refund_open(env: Env) -> bool {
        env.storage()
            .instance()
            .get(&DataKey::RefundOpen)
            .unwrap_or(false)
    }

    pub fn is_paused(env: Env) -> bool {
        env.storage()
            .instance()
            .get(&DataKey::Paused)
            .unwrap_or(false)
    }

    pub fn vesting_token(env: Env) -> Result<Address, Error> {
        env.storage()
            .instance()
            .get(&DataKey::Token)
            .ok_or(Error::NotInitialized)
    }

    // ============================================
    // INTERNAL HELPERS
    // ============================================

    fn read_admin(env: &Env) -> Result<Address, Error> {
        env.storage()
            .instance()
            .get(&DataKey::Admin)
            .ok_or(Error::NotInitialized)
    }

    /// Pool size the schedule releases against: what is still here plus what
    /// already left through claims.
    fn total_funded(env: &Env) -> Result<i128, Error> {
        let token: Address = env
            .storage()
            .instance()
            .get(&DataKey::Token)
            .ok_or(Error::NotInitialized)?;
        let balance = token::Client::new(env, &token).balance(&env.current_contract_address());
        let total_released: i128 = env
            .storage()
            .instance()
            .get(&DataKey::TotalReleased)
            .unwrap_or(0);
        balance.checked_add(total_released).ok_or(Error::Overflow)
    }
}
