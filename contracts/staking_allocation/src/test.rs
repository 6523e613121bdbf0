#![cfg(test)]

use crate::error::Error;
use crate::{StakingAllocationProvider, StakingAllocationProviderClient, SCALE};

use staking_compound::{StakingCompound, StakingCompoundClient};

use soroban_sdk::testutils::{Address as _, Ledger};
use soroban_sdk::{token, vec, Address, Env};

struct Setup {
    env: Env,
    admin: Address,
    staking_id: Address,
    token: Address,
}

fn setup() -> Setup {
    let env = Env::default();
    env.mock_all_auths();
    env.ledger().with_mut(|li| li.timestamp = 1_000);

    let admin = Address::generate(&env);
    let bank = Address::generate(&env);
    let token_admin = Address::generate(&env);
    let token_contract = env.register_stellar_asset_contract_v2(token_admin);
    let token = token_contract.address();
    token::StellarAssetClient::new(&env, &token).mint(&bank, &1_000_000_000);

    let staking_id = env.register_contract(None, StakingCompound);
    StakingCompoundClient::new(&env, &staking_id).initialize(&admin, &token, &bank, &10_000);

    Setup {
        env,
        admin,
        staking_id,
        token,
    }
}

fn mint_and_stake(s: &Setup, account: &Address, amount: i128) {
    token::StellarAssetClient::new(&s.env, &s.token).mint(account, &amount);
    StakingCompoundClient::new(&s.env, &s.staking_id).stake(account, &amount);
}

fn provider(
    s: &Setup,
    alpha: i128,
    beta: i128,
    theta: i128,
) -> StakingAllocationProviderClient<'static> {
    let id = s.env.register_contract(None, StakingAllocationProvider);
    let client = StakingAllocationProviderClient::new(&s.env, &id);
    client.initialize(&s.admin, &s.staking_id, &alpha, &beta, &theta);
    client
}

#[test]
fn test_rejects_weights_not_summing_to_unit() {
    let s = setup();
    let id = s.env.register_contract(None, StakingAllocationProvider);
    let client = StakingAllocationProviderClient::new(&s.env, &id);

    assert_eq!(
        client.try_initialize(&s.admin, &s.staking_id, &100, &100, &100),
        Err(Ok(Error::InvalidWeightSum))
    );
    assert_eq!(
        client.try_initialize(&s.admin, &s.staking_id, &SCALE, &SCALE, &(-SCALE)),
        Err(Ok(Error::InvalidWeightSum))
    );

    client.initialize(
        &s.admin,
        &s.staking_id,
        &(7 * SCALE / 10),
        &(3 * SCALE / 10),
        &0,
    );
}

#[test]
fn test_staked_share_snapshot() {
    let s = setup();
    let client = provider(&s, SCALE, 0, 0);

    let a = Address::generate(&s.env);
    let b = Address::generate(&s.env);
    mint_and_stake(&s, &a, 100);
    mint_and_stake(&s, &b, 300);

    client.take_snapshot(&vec![&s.env, a.clone(), b.clone()]);

    assert_eq!(client.allocation_of(&a), SCALE / 4);
    assert_eq!(client.allocation_of(&b), 3 * SCALE / 4);
    assert_eq!(client.snapshot_taken_at(), 1_000);
}

#[test]
fn test_non_staker_gets_zero() {
    let s = setup();
    let client = provider(&s, SCALE, 0, 0);

    let a = Address::generate(&s.env);
    let outsider = Address::generate(&s.env);
    mint_and_stake(&s, &a, 100);

    client.take_snapshot(&vec![&s.env, a.clone(), outsider.clone()]);

    assert_eq!(client.allocation_of(&a), SCALE);
    assert_eq!(client.allocation_of(&outsider), 0);
}

#[test]
fn test_snapshot_replaces_previous_wholesale() {
    let s = setup();
    let client = provider(&s, SCALE, 0, 0);

    let a = Address::generate(&s.env);
    let b = Address::generate(&s.env);
    mint_and_stake(&s, &a, 100);
    mint_and_stake(&s, &b, 100);

    client.take_snapshot(&vec![&s.env, a.clone(), b.clone()]);
    assert_eq!(client.allocation_of(&a), SCALE / 2);

    // A drops to zero, not left at its stale value.
    client.take_snapshot(&vec![&s.env, b.clone()]);
    assert_eq!(client.allocation_of(&a), 0);
    assert_eq!(client.allocation_of(&b), SCALE);
}

#[test]
fn test_duration_weighted_share() {
    let s = setup();
    let client = provider(&s, 0, SCALE, 0);

    let a = Address::generate(&s.env);
    let b = Address::generate(&s.env);
    mint_and_stake(&s, &a, 100);

    s.env.ledger().with_mut(|li| li.timestamp = 1_400);
    mint_and_stake(&s, &b, 100);

    s.env.ledger().with_mut(|li| li.timestamp = 2_000);
    client.take_snapshot(&vec![&s.env, a.clone(), b.clone()]);

    // Tenures 1000 s and 600 s over equal stakes.
    assert_eq!(client.allocation_of(&a), SCALE * 1_000 / 1_600);
    assert_eq!(client.allocation_of(&b), SCALE * 600 / 1_600);
}

#[test]
fn test_pending_reward_share() {
    let s = setup();
    let client = provider(&s, 0, 0, SCALE);

    let a = Address::generate(&s.env);
    let b = Address::generate(&s.env);
    mint_and_stake(&s, &a, 100);
    mint_and_stake(&s, &b, 300);

    s.env.ledger().with_mut(|li| li.timestamp = 2_000);
    client.take_snapshot(&vec![&s.env, a.clone(), b.clone()]);

    // Pending rewards accrue in proportion to stake here, so the extra term
    // mirrors the staked split.
    assert_eq!(client.allocation_of(&a), SCALE / 4);
    assert_eq!(client.allocation_of(&b), 3 * SCALE / 4);
}
