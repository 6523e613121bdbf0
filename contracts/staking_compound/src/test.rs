#![cfg(test)]

use crate::error::Error;
use crate::{StakingCompound, StakingCompoundClient};

use soroban_sdk::testutils::{Address as _, Ledger};
use soroban_sdk::{token, Address, Env};

struct Setup {
    env: Env,
    client_id: Address,
    token: Address,
    admin: Address,
    bank: Address,
}

fn setup(reward_rate: i128) -> Setup {
    let env = Env::default();
    env.mock_all_auths_allowing_non_root_auth();
    env.ledger().with_mut(|li| li.timestamp = 1_000);

    let admin = Address::generate(&env);
    let bank = Address::generate(&env);
    let token_admin = Address::generate(&env);

    let token_contract = env.register_stellar_asset_contract_v2(token_admin.clone());
    let token = token_contract.address();

    // Bank holds the emission budget.
    token::StellarAssetClient::new(&env, &token).mint(&bank, &1_000_000_000);

    let client_id = env.register_contract(None, StakingCompound);
    let client = StakingCompoundClient::new(&env, &client_id);
    client.initialize(&admin, &token, &bank, &reward_rate);

    Setup {
        env,
        client_id,
        token,
        admin,
        bank,
    }
}

fn fund(s: &Setup, account: &Address, amount: i128) {
    token::StellarAssetClient::new(&s.env, &s.token).mint(account, &amount);
}

#[test]
fn test_initialize_once() {
    let s = setup(10_000);
    let client = StakingCompoundClient::new(&s.env, &s.client_id);

    let result = client.try_initialize(&s.admin, &s.token, &s.bank, &10_000);
    assert_eq!(result, Err(Ok(Error::AlreadyInitialized)));
}

#[test]
fn test_stake_moves_tokens_and_records_balance() {
    let s = setup(10_000);
    let client = StakingCompoundClient::new(&s.env, &s.client_id);
    let token_client = token::Client::new(&s.env, &s.token);

    let staker = Address::generate(&s.env);
    fund(&s, &staker, 100);

    client.stake(&staker, &100);

    assert_eq!(token_client.balance(&staker), 0);
    assert_eq!(token_client.balance(&s.client_id), 100);
    assert_eq!(client.staked_of(&staker), 100);
    assert_eq!(client.total_staked(), 100);
    assert_eq!(client.staked_since_of(&staker), 1_000);
}

#[test]
fn test_stake_rejects_zero_amount() {
    let s = setup(10_000);
    let client = StakingCompoundClient::new(&s.env, &s.client_id);

    let staker = Address::generate(&s.env);
    assert_eq!(client.try_stake(&staker, &0), Err(Ok(Error::ZeroAmount)));
}

#[test]
fn test_withdraw_returns_tokens() {
    let s = setup(10_000);
    let client = StakingCompoundClient::new(&s.env, &s.client_id);
    let token_client = token::Client::new(&s.env, &s.token);

    let staker = Address::generate(&s.env);
    fund(&s, &staker, 100);

    client.stake(&staker, &100);
    client.withdraw(&staker, &100);

    assert_eq!(token_client.balance(&staker), 100);
    assert_eq!(client.staked_of(&staker), 0);
    assert_eq!(client.total_staked(), 0);
    // Tenure resets on full exit.
    assert_eq!(client.staked_since_of(&staker), 0);
}

#[test]
fn test_withdraw_rejects_underflow() {
    let s = setup(10_000);
    let client = StakingCompoundClient::new(&s.env, &s.client_id);

    let staker = Address::generate(&s.env);
    fund(&s, &staker, 100);
    client.stake(&staker, &100);

    assert_eq!(
        client.try_withdraw(&staker, &101),
        Err(Ok(Error::InsufficientStake))
    );
}

#[test]
fn test_claim_pays_linear_pool_share() {
    let s = setup(10_000);
    let client = StakingCompoundClient::new(&s.env, &s.client_id);
    let token_client = token::Client::new(&s.env, &s.token);

    let staker = Address::generate(&s.env);
    fund(&s, &staker, 100);
    client.stake(&staker, &100);

    assert_eq!(client.try_claim_reward(&staker), Err(Ok(Error::NotDuePayment)));

    s.env.ledger().with_mut(|li| li.timestamp += 1_000);

    // Sole staker: 100 × 1000 × 10000 / 100
    let expected = 100i128 * 1_000 * 10_000 / 100;
    assert_eq!(client.pending_reward_of(&staker), expected);
    assert_eq!(client.claim_reward(&staker), expected);
    assert_eq!(token_client.balance(&staker), expected);

    // Accrual window was reset.
    assert_eq!(client.try_claim_reward(&staker), Err(Ok(Error::NotDuePayment)));
}

#[test]
fn test_claim_splits_by_pool_share() {
    let s = setup(9_000);
    let client = StakingCompoundClient::new(&s.env, &s.client_id);

    let a = Address::generate(&s.env);
    let b = Address::generate(&s.env);
    fund(&s, &a, 100);
    fund(&s, &b, 300);
    client.stake(&a, &100);
    client.stake(&b, &300);

    s.env.ledger().with_mut(|li| li.timestamp += 500);

    assert_eq!(client.pending_reward_of(&a), 100 * 500 * 9_000 / 400);
    assert_eq!(client.pending_reward_of(&b), 300 * 500 * 9_000 / 400);
}

#[test]
fn test_update_reward_rate() {
    let s = setup(10_000);
    let client = StakingCompoundClient::new(&s.env, &s.client_id);

    client.update_reward_rate(&1_000);
    assert_eq!(client.reward_rate(), 1_000);

    assert_eq!(
        client.try_update_reward_rate(&-1),
        Err(Ok(Error::InvalidCapacity))
    );
}

#[test]
fn test_update_iteration_limit_rejects_zero() {
    let s = setup(10_000);
    let client = StakingCompoundClient::new(&s.env, &s.client_id);

    assert_eq!(
        client.try_update_iteration_limit(&0),
        Err(Ok(Error::InvalidCapacity))
    );
    client.update_iteration_limit(&3);
    assert_eq!(client.iteration_limit(), 3);
}

#[test]
fn test_auto_compound_requires_stakers() {
    let s = setup(10_000);
    let client = StakingCompoundClient::new(&s.env, &s.client_id);

    assert_eq!(
        client.try_auto_compound(),
        Err(Ok(Error::NothingToProcess))
    );
}

#[test]
fn test_sweep_drains_in_bounded_chunks_and_conserves() {
    let s = setup(9_000);
    let client = StakingCompoundClient::new(&s.env, &s.client_id);
    let token_client = token::Client::new(&s.env, &s.token);

    // Chunk size 2 over a roster of 5 forces a multi-call drain.
    client.update_iteration_limit(&2);

    let mut stakers = soroban_sdk::vec![&s.env];
    for _ in 0..5 {
        let staker = Address::generate(&s.env);
        fund(&s, &staker, 60);
        client.stake(&staker, &60);
        stakers.push_back(staker);
    }
    assert_eq!(client.total_staked(), 300);

    s.env.ledger().with_mut(|li| li.timestamp += 1_000);

    // Every staker earned 60 × 1000 × 9000 / 300.
    let per_staker = 60i128 * 1_000 * 9_000 / 300;
    let bank_before = token_client.balance(&s.bank);

    client.auto_compound();
    assert_eq!(client.try_auto_compound(), Err(Ok(Error::SweepInProgress)));

    let mut calls = 0;
    while client.check_upkeep() {
        let processed = client.perform_upkeep();
        assert!(processed <= 2);
        calls += 1;
    }
    assert_eq!(calls, 3);
    assert_eq!(
        client.try_perform_upkeep(),
        Err(Ok(Error::NothingToProcess))
    );

    // Conservation: principal grew by exactly the accrued rewards, all of it
    // pulled from the bank.
    let mut sum = 0i128;
    for staker in stakers.iter() {
        assert_eq!(client.staked_of(&staker), 60 + per_staker);
        // Compounding consumed the accrual window.
        assert_eq!(client.pending_reward_of(&staker), 0);
        sum += client.staked_of(&staker);
    }
    assert_eq!(client.total_staked(), sum);
    assert_eq!(client.total_staked(), 300 + 5 * per_staker);
    assert_eq!(token_client.balance(&s.bank), bank_before - 5 * per_staker);
    assert_eq!(token_client.balance(&s.client_id), 300 + 5 * per_staker);

    // The ledger is ready for the next epoch.
    s.env.ledger().with_mut(|li| li.timestamp += 10);
    client.auto_compound();
    assert!(client.check_upkeep());
}

#[test]
fn test_sweep_chunks_settle_against_armed_epoch() {
    let s = setup(12_000);
    let client = StakingCompoundClient::new(&s.env, &s.client_id);

    client.update_iteration_limit(&1);

    let a = Address::generate(&s.env);
    let b = Address::generate(&s.env);
    fund(&s, &a, 100);
    fund(&s, &b, 100);
    client.stake(&a, &100);
    client.stake(&b, &100);

    s.env.ledger().with_mut(|li| li.timestamp += 600);
    client.auto_compound();

    // Time passing between chunks must not change what each entry receives.
    client.perform_upkeep();
    s.env.ledger().with_mut(|li| li.timestamp += 500);
    client.perform_upkeep();
    assert!(!client.check_upkeep());

    let per_staker = 100i128 * 600 * 12_000 / 200;
    assert_eq!(client.staked_of(&a), 100 + per_staker);
    assert_eq!(client.staked_of(&b), 100 + per_staker);
}
