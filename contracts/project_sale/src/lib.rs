#![no_std]

mod error;
mod events;
mod schedule;
mod storage;


pub use error::Error;
use events::*;
use schedule::{phase_at, validate_times};
use storage::DataKey;

pub use storage::{
    Participant, SaleConfig, SalePhase, SaleProviders, SaleTimes, BASIS_POINTS, FEE_BPS, SCALE,
};

use soroban_sdk::{contract, contractimpl, token, vec, Address, Env, IntoVal, Symbol, Vec};

/// Orchestrates the sale: registration, allocation-gated deposit rounds with
/// fee taking, and finalization into the vesting contract. The KYC oracle and
/// the allocation proxy are injected at initialization and queried through
/// their call interfaces; the vesting contract is owned by this one.
#[contract]
pub struct ProjectSale;

#[contractimpl]
impl ProjectSale {
    // ============================================
    // INITIALIZATION & ADMIN
    // ============================================

    /// # Errors
    /// - `AlreadyInitialized`: Contract already initialized
    /// - `InvalidTimeOrdering`: Times are not a monotonic chain
    /// - `InvalidCapacity`: Non-positive price/amount/cap, or
    ///   amount × price != cap
    pub fn initialize(
        env: Env,
        admin: Address,
        times: SaleTimes,
        providers: SaleProviders,
        config: SaleConfig,
    ) -> Result<(), Error> {
        if env.storage().instance().has(&DataKey::Initialized) {
            return Err(Error::AlreadyInitialized);
        }

        admin.require_auth();

        if !validate_times(&times) {
            return Err(Error::InvalidTimeOrdering);
        }
        if config.project_token_price <= 0
            || config.project_token_amount <= 0
            || config.total_sale_value_cap <= 0
        {
            return Err(Error::InvalidCapacity);
        }
        // The cap must be exactly the stable-asset value of the escrowed
        // project tokens, or shares and funds drift apart at finalization.
        let sale_value = config
            .project_token_amount
            .checked_mul(config.project_token_price)
            .and_then(|v| v.checked_div(SCALE))
            .ok_or(Error::Overflow)?;
        if sale_value != config.total_sale_value_cap {
            return Err(Error::InvalidCapacity);
        }

        env.storage().instance().set(&DataKey::Initialized, &true);
        env.storage().instance().set(&DataKey::Admin, &admin);
        env.storage().instance().set(&DataKey::Times, &times);
        env.storage().instance().set(&DataKey::Providers, &providers);
        env.storage().instance().set(&DataKey::Config, &config);
        env.storage().instance().set(&DataKey::Finalized, &false);
        env.storage().instance().set(&DataKey::TotalDeposited, &0i128);
        env.storage()
            .instance()
            .set(&DataKey::Depositors, &Vec::<Address>::new(&env));

        Ok(())
    }

    /// Replace the sale timeline. Frozen once the sale is finalized.
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `AlreadyFinalized`: Sale is finalized
    /// - `InvalidTimeOrdering`: Times are not a monotonic chain
    pub fn update_times(env: Env, times: SaleTimes) -> Result<(), Error> {
        let admin = Self::read_admin(&env)?;
        admin.require_auth();

        if Self::read_finalized(&env) {
            return Err(Error::AlreadyFinalized);
        }
        if !validate_times(&times) {
            return Err(Error::InvalidTimeOrdering);
        }

        env.storage().instance().set(&DataKey::Times, &times);

        env.events().publish(
            (Symbol::new(&env, "times_updated"),),
            TimesUpdatedEvent { times },
        );

        Ok(())
    }

    /// Set the flat per-address cap for the public round. Every registrant
    /// gets the same cap; allocations play no role there.
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `AlreadyFinalized`: Sale is finalized
    /// - `InvalidCapacity`: Cap is not positive
    pub fn set_public_sale_cap(env: Env, cap: i128) -> Result<(), Error> {
        let admin = Self::read_admin(&env)?;
        admin.require_auth();

        if Self::read_finalized(&env) {
            return Err(Error::AlreadyFinalized);
        }
        if cap <= 0 {
            return Err(Error::InvalidCapacity);
        }

        env.storage().instance().set(&DataKey::PublicSaleCap, &cap);

        env.events().publish(
            (Symbol::new(&env, "public_cap_updated"),),
            PublicCapUpdatedEvent { cap },
        );

        Ok(())
    }

    // ============================================
    // REGISTRATION
    // ============================================

    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `PhaseNotStarted`: Registration has not opened
    /// - `PhaseEnded`: Registration is over
    /// - `AlreadyRegistered`: Caller already registered
    pub fn register(env: Env, caller: Address) -> Result<(), Error> {
        if !env.storage().instance().has(&DataKey::Initialized) {
            return Err(Error::NotInitialized);
        }

        caller.require_auth();

        let times = Self::read_times(&env)?;
        let now = env.ledger().timestamp();
        if now < times.register_start {
            return Err(Error::PhaseNotStarted);
        }
        if now >= times.register_end {
            return Err(Error::PhaseEnded);
        }

        let mut participant = Self::load_participant(&env, &caller);
        if participant.registered {
            return Err(Error::AlreadyRegistered);
        }
        participant.registered = true;
        env.storage()
            .instance()
            .set(&DataKey::Participant(caller.clone()), &participant);

        env.events().publish(
            (Symbol::new(&env, "registered"), caller.clone()),
            RegisteredEvent { account: caller },
        );

        Ok(())
    }

    // ============================================
    // DEPOSITS
    // ============================================

    /// How much the account could deposit right now. Zero outside the two
    /// rounds, and zero in the public round until a cap is configured.
    pub fn depositable_of(env: Env, account: Address) -> i128 {
        let times = match Self::read_times(&env) {
            Ok(t) => t,
            Err(_) => return 0,
        };
        let participant = Self::load_participant(&env, &account);
        if !participant.registered {
            return 0;
        }

        let headroom = match phase_at(&times, env.ledger().timestamp()) {
            SalePhase::StakingRound => {
                if !Self::is_whitelisted(&env, &account) {
                    return 0;
                }
                Self::allocation_of(&env, &account) - participant.deposited
            }
            SalePhase::PublicRound => {
                let cap: i128 = env
                    .storage()
                    .instance()
                    .get(&DataKey::PublicSaleCap)
                    .unwrap_or(0);
                cap - participant.deposited
            }
            _ => return 0,
        };

        headroom.max(0).min(Self::cap_remaining(&env))
    }

    /// Deposit the stable asset. The fee is pulled on top of `amount`, and a
    /// staking-round deposit spends the caller's credit tokens into the
    /// credit reserve.
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `ZeroAmount`: Amount must be positive
    /// - `NotAllowedToDeposit`: No round is open, or caller is unregistered
    /// - `NotWhitelisted`: Staking round and caller fails KYC
    /// - `ExceedsDepositable`: Amount exceeds the caller's headroom
    pub fn deposit(env: Env, caller: Address, amount: i128) -> Result<(), Error> {
        if !env.storage().instance().has(&DataKey::Initialized) {
            return Err(Error::NotInitialized);
        }

        if amount <= 0 {
            return Err(Error::ZeroAmount);
        }

        caller.require_auth();

        let times = Self::read_times(&env)?;
        let phase = phase_at(&times, env.ledger().timestamp());
        if phase != SalePhase::StakingRound && phase != SalePhase::PublicRound {
            return Err(Error::NotAllowedToDeposit);
        }

        let mut participant = Self::load_participant(&env, &caller);
        if !participant.registered {
            return Err(Error::NotAllowedToDeposit);
        }
        if phase == SalePhase::StakingRound && !Self::is_whitelisted(&env, &caller) {
            return Err(Error::NotWhitelisted);
        }
        if amount > Self::depositable_of(env.clone(), caller.clone()) {
            return Err(Error::ExceedsDepositable);
        }

        // Bookkeeping lands before any transfer leaves the contract's hands.
        let first_deposit = participant.deposited == 0;
        participant.deposited = participant
            .deposited
            .checked_add(amount)
            .ok_or(Error::Overflow)?;
        env.storage()
            .instance()
            .set(&DataKey::Participant(caller.clone()), &participant);

        let total: i128 = env
            .storage()
            .instance()
            .get(&DataKey::TotalDeposited)
            .unwrap_or(0);
        env.storage()
            .instance()
            .set(&DataKey::TotalDeposited, &(total + amount));

        if first_deposit {
            let mut depositors: Vec<Address> = env
                .storage()
                .instance()
                .get(&DataKey::Depositors)
                .unwrap_or(Vec::new(&env));
            depositors.push_back(caller.clone());
            env.storage().instance().set(&DataKey::Depositors, &depositors);
        }

        let config = Self::read_config(&env)?;
        let fee = amount
            .checked_mul(FEE_BPS)
            .and_then(|f| f.checked_div(BASIS_POINTS))
            .ok_or(Error::Overflow)?;

        let usd = token::Client::new(&env, &config.usd_token);
        usd.transfer(&caller, &config.sale_claim, &amount);
        if fee > 0 {
            usd.transfer(&caller, &config.fee_claim, &fee);
        }

        // Staking-round deposits consume the credit backing the allocation.
        let mut credit_spent = 0i128;
        if phase == SalePhase::StakingRound {
            let credit = token::Client::new(&env, &config.credit_token);
            credit_spent = credit.balance(&caller).min(amount);
            if credit_spent > 0 {
                credit.transfer(&caller, &config.credit_reserve, &credit_spent);
            }
        }

        env.events().publish(
            (Symbol::new(&env, "deposited"), caller.clone()),
            DepositedEvent {
                account: caller,
                amount,
                fee,
                credit_spent,
            },
        );

        Ok(())
    }

    // ============================================
    // FINALIZATION
    // ============================================

    /// One-way transition after the public round: escrows the full project
    /// token amount into the vesting contract, assigns every depositor shares
    /// equal to their accepted contribution, and freezes administration.
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    /// - `AlreadyFinalized`: Sale is finalized
    /// - `PhaseNotEnded`: Public round still running
    pub fn finalize_sale(env: Env) -> Result<(), Error> {
        let admin = Self::read_admin(&env)?;
        admin.require_auth();

        if Self::read_finalized(&env) {
            return Err(Error::AlreadyFinalized);
        }

        let times = Self::read_times(&env)?;
        if env.ledger().timestamp() < times.public_round_end {
            return Err(Error::PhaseNotEnded);
        }

        env.storage().instance().set(&DataKey::Finalized, &true);

        let config = Self::read_config(&env)?;
        token::Client::new(&env, &config.project_token).transfer(
            &admin,
            &config.vesting,
            &config.project_token_amount,
        );

        let depositors: Vec<Address> = env
            .storage()
            .instance()
            .get(&DataKey::Depositors)
            .unwrap_or(Vec::new(&env));
        for account in depositors.iter() {
            let participant = Self::load_participant(&env, &account);
            if participant.deposited > 0 {
                env.invoke_contract::<()>(
                    &config.vesting,
                    &Symbol::new(&env, "add_shares"),
                    vec![
                        &env,
                        account.to_val(),
                        participant.deposited.into_val(&env),
                    ],
                );
            }
        }

        let total: i128 = env
            .storage()
            .instance()
            .get(&DataKey::TotalDeposited)
            .unwrap_or(0);
        env.events().publish(
            (Symbol::new(&env, "sale_finalized"),),
            SaleFinalizedEvent {
                total_deposited: total,
                depositors: depositors.len(),
            },
        );

        Ok(())
    }

    // ============================================
    // VESTING ADMINISTRATION (PASSTHROUGH)
    // ============================================

    // The sale contract is the vesting contract's admin, so the operator
    // drives refunds and pausing through these guarded commands.

    pub fn open_refund(env: Env) -> Result<(), Error> {
        Self::vesting_command(&env, "allow_refund")
    }

    pub fn close_refund(env: Env) -> Result<(), Error> {
        Self::vesting_command(&env, "disallow_refund")
    }

    pub fn pause_claims(env: Env) -> Result<(), Error> {
        Self::vesting_command(&env, "pause")
    }

    pub fn unpause_claims(env: Env) -> Result<(), Error> {
        Self::vesting_command(&env, "unpause")
    }

    /// Reclaim a depositor's unreleased vesting remainder. The vesting
    /// contract pays its admin (this contract), which forwards the tokens to
    /// the sale admin.
    ///
    /// # Errors
    /// - `NotInitialized`: Contract not initialized
    pub fn refund_depositor(env: Env, account: Address) -> Result<i128, Error> {
        let admin = Self::read_admin(&env)?;
        admin.require_auth();

        let config = Self::read_config(&env)?;
        let refunded: i128 = env.invoke_contract(
            &config.vesting,
            &Symbol::new(&env, "refund_user"),
            vec![&env, account.to_val()],
        );

        if refunded > 0 {
            token::Client::new(&env, &config.project_token).transfer(
                &env.current_contract_address(),
                &admin,
                &refunded,
            );
        }

        env.events().publish(
            (Symbol::new(&env, "depositor_refunded"), account.clone()),
            DepositorRefundedEvent {
                account,
                amount: refunded,
            },
        );

        Ok(refunded)
    }

    // ============================================
    // VIEW FUNCTIONS
    // ============================================

    pub fn status(env: Env) -> Result<SalePhase, Error> {
        let times = Self::read_times(&env)?;
        Ok(phase_at(&times, env.ledger().timestamp()))
    }

    pub fn times(env: Env) -> Result<SaleTimes, Error> {
        Self::read_times(&env)
    }

    pub fn providers(env: Env) -> Result<SaleProviders, Error> {
        env.storage()
            .instance()
            .get(&DataKey::Providers)
            .ok_or(Error::NotInitialized)
    }

    pub fn participant_of(env: Env, account: Address) -> Participant {
        Self::load_participant(&env, &account)
    }

    pub fn total_deposited(env: Env) -> i128 {
        env.storage()
            .instance()
            .get(&DataKey::TotalDeposited)
            .unwrap_or(0)
    }

    pub fn public_sale_cap(env: Env) -> i128 {
        env.storage()
            .instance()
            .get(&DataKey::PublicSaleCap)
            .unwrap_or(0)
    }

    pub fn is_finalized(env: Env) -> bool {
        Self::read_finalized(&env)
    }

    pub fn vesting_contract(env: Env) -> Result<Address, Error> {
        Ok(Self::read_config(&env)?.vesting)
    }

    pub fn depositor_count(env: Env) -> u32 {
        env.storage()
            .instance()
            .get::<DataKey, Vec<Address>>(&DataKey::Depositors)
            .map(|d| d.len())
            .unwrap_or(0)
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

    fn read_times(env: &Env) -> Result<SaleTimes, Error> {
        env.storage()
            .instance()
            .get(&DataKey::Times)
            .ok_or(Error::NotInitialized)
    }

    fn read_config(env: &Env) -> Result<SaleConfig, Error> {
        env.storage()
            .instance()
            .get(&DataKey::Config)
            .ok_or(Error::NotInitialized)
    }

    fn read_finalized(env: &Env) -> bool {
        env.storage()
            .instance()
            .get(&DataKey::Finalized)
            .unwrap_or(false)
    }

    fn load_participant(env: &Env, account: &Address) -> Participant {
        env.storage()
            .instance()
            .get(&DataKey::Participant(account.clone()))
            .unwrap_or(Participant {
                registered: false,
                deposited: 0,
            })
    }

    fn cap_remaining(env: &Env) -> i128 {
        let cap = match Self::read_config(env) {
            Ok(c) => c.total_sale_value_cap,
            Err(_) => return 0,
        };
        let total: i128 = env
            .storage()
            .instance()
            .get(&DataKey::TotalDeposited)
            .unwrap_or(0);
        (cap - total).max(0)
    }

    fn is_whitelisted(env: &Env, account: &Address) -> bool {
        let providers: SaleProviders = match env.storage().instance().get(&DataKey::Providers) {
            Some(p) => p,
            None => return false,
        };
        env.invoke_contract(
            &providers.kyc,
            &Symbol::new(env, "is_whitelisted"),
            vec![env, account.to_val()],
        )
    }

    fn allocation_of(env: &Env, account: &Address) -> i128 {
        let providers: SaleProviders = match env.storage().instance().get(&DataKey::Providers) {
            Some(p) => p,
            None => return 0,
        };
        env.invoke_contract(
            &providers.allocation,
            &Symbol::new(env, "allocation_of"),
            vec![env, account.to_val()],
        )
    }

    fn vesting_command(env: &Env, command: &str) -> Result<(), Error> {
        let admin = Self::read_admin(env)?;
        admin.require_auth();

        let config = Self::read_config(env)?;
        env.invoke_contract::<()>(&config.vesting, &Symbol::new(env, command), vec![env]);
        Ok(())
    }
}
