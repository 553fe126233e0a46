extern crate std;

use common::reentrancy;
use soroban_sdk::{
    testutils::{Address as _, Ledger as _},
    Address, BytesN,
};

use crate::test::{mint_stake, setup, token_balance};
use crate::ContractError;

// ── Pause ────────────────────────────────────────────────────────────────────

#[test]
fn test_pause_halts_staking_only() {
    let (env, client, owner, stake_token, reward_token) = setup(10);

    let staker = Address::generate(&env);
    mint_stake(&env, &stake_token, &staker, 2_000);
    client.stake(&staker, &1_000);

    env.ledger().set_timestamp(100);
    client.pause(&owner);
    assert!(client.is_paused());

    match client.try_stake(&staker, &500) {
        Err(Ok(e)) => assert_eq!(e, ContractError::Paused),
        _ => unreachable!("Expected Paused error"),
    }

    // Reads, exits and claims stay available.
    assert_eq!(client.earned(&staker), 1_000);
    client.withdraw(&staker, &400);
    assert_eq!(client.claim_rewards(&staker), 1_000);
    assert_eq!(token_balance(&env, &reward_token, &staker), 1_000);
    client.set_reward_rate(&owner, &20);

    client.unpause(&owner);
    assert!(!client.is_paused());
    client.stake(&staker, &500);
    assert_eq!(client.get_staked(&staker), 1_100);
}

#[test]
fn test_pause_by_non_owner_fails() {
    let (env, client, _owner, _stake_token, _) = setup(10);

    let intruder = Address::generate(&env);
    match client.try_pause(&intruder) {
        Err(Ok(e)) => assert_eq!(e, ContractError::Unauthorized),
        _ => unreachable!("Expected Unauthorized error"),
    }
    assert!(!client.is_paused());
}

#[test]
fn test_unpause_by_non_owner_fails() {
    let (env, client, owner, _stake_token, _) = setup(10);

    client.pause(&owner);
    let intruder = Address::generate(&env);
    match client.try_unpause(&intruder) {
        Err(Ok(e)) => assert_eq!(e, ContractError::Unauthorized),
        _ => unreachable!("Expected Unauthorized error"),
    }
    assert!(client.is_paused());
}

#[test]
fn test_repeated_pause_is_harmless() {
    let (_env, client, owner, _stake_token, _) = setup(10);

    client.pause(&owner);
    client.pause(&owner);
    assert!(client.is_paused());
    client.unpause(&owner);
    client.unpause(&owner);
    assert!(!client.is_paused());
}

// ── Re-entrancy ──────────────────────────────────────────────────────────────

#[test]
fn test_reentrant_call_is_rejected() {
    let (env, client, owner, stake_token, _) = setup(10);

    let staker = Address::generate(&env);
    mint_stake(&env, &stake_token, &staker, 1_000);

    // Simulate a call arriving while another mutating call holds the lock.
    env.as_contract(&client.address, || {
        assert!(reentrancy::enter(&env));
    });

    match client.try_stake(&staker, &1_000) {
        Err(Ok(e)) => assert_eq!(e, ContractError::Reentrant),
        _ => unreachable!("Expected Reentrant error"),
    }
    match client.try_claim_rewards(&staker) {
        Err(Ok(e)) => assert_eq!(e, ContractError::Reentrant),
        _ => unreachable!("Expected Reentrant error"),
    }
    match client.try_set_reward_rate(&owner, &1) {
        Err(Ok(e)) => assert_eq!(e, ContractError::Reentrant),
        _ => unreachable!("Expected Reentrant error"),
    }
    assert_eq!(client.get_total_staked(), 0);
    assert_eq!(client.get_reward_rate(), 10);

    env.as_contract(&client.address, || reentrancy::exit(&env));
    client.stake(&staker, &1_000);
    assert_eq!(client.get_total_staked(), 1_000);
}

#[test]
fn test_lock_released_after_failed_call() {
    let (env, client, _owner, stake_token, _) = setup(10);

    let staker = Address::generate(&env);
    mint_stake(&env, &stake_token, &staker, 1_000);

    assert!(client.try_stake(&staker, &0).is_err());
    assert!(client.try_withdraw(&staker, &5).is_err());
    env.as_contract(&client.address, || {
        assert!(!reentrancy::is_locked(&env));
    });

    client.stake(&staker, &1_000);
    env.as_contract(&client.address, || {
        assert!(!reentrancy::is_locked(&env));
    });
}

#[test]
fn test_paused_check_precedes_lock() {
    let (env, client, owner, stake_token, _) = setup(10);

    let staker = Address::generate(&env);
    mint_stake(&env, &stake_token, &staker, 1_000);
    client.pause(&owner);
    env.as_contract(&client.address, || {
        assert!(reentrancy::enter(&env));
    });

    match client.try_stake(&staker, &1_000) {
        Err(Ok(e)) => assert_eq!(e, ContractError::Paused),
        _ => unreachable!("Expected Paused error"),
    }
}

// ── Ownership ────────────────────────────────────────────────────────────────

#[test]
fn test_two_step_owner_transfer() {
    let (env, client, owner, _stake_token, _) = setup(10);

    let successor = Address::generate(&env);
    client.propose_owner(&owner, &successor);
    assert_eq!(client.get_pending_owner(), Some(successor.clone()));
    assert_eq!(client.get_owner(), owner);

    client.accept_owner(&successor);
    assert_eq!(client.get_owner(), successor);
    assert_eq!(client.get_pending_owner(), None);

    // The previous owner has lost access; the successor has it.
    match client.try_set_reward_rate(&owner, &1) {
        Err(Ok(e)) => assert_eq!(e, ContractError::Unauthorized),
        _ => unreachable!("Expected Unauthorized error"),
    }
    client.set_reward_rate(&successor, &1);
    assert_eq!(client.get_reward_rate(), 1);
}

#[test]
fn test_accept_by_wrong_candidate_fails() {
    let (env, client, owner, _stake_token, _) = setup(10);

    let successor = Address::generate(&env);
    let intruder = Address::generate(&env);
    client.propose_owner(&owner, &successor);

    match client.try_accept_owner(&intruder) {
        Err(Ok(e)) => assert_eq!(e, ContractError::Unauthorized),
        _ => unreachable!("Expected Unauthorized error"),
    }
    assert_eq!(client.get_owner(), owner);
}

#[test]
fn test_propose_by_non_owner_fails() {
    let (env, client, _owner, _stake_token, _) = setup(10);

    let intruder = Address::generate(&env);
    match client.try_propose_owner(&intruder, &intruder) {
        Err(Ok(e)) => assert_eq!(e, ContractError::Unauthorized),
        _ => unreachable!("Expected Unauthorized error"),
    }
    assert_eq!(client.get_pending_owner(), None);
}

#[test]
fn test_cancel_owner_transfer() {
    let (env, client, owner, _stake_token, _) = setup(10);

    match client.try_cancel_owner_transfer(&owner) {
        Err(Ok(e)) => assert_eq!(e, ContractError::InvalidInput),
        _ => unreachable!("Expected InvalidInput error"),
    }

    let successor = Address::generate(&env);
    client.propose_owner(&owner, &successor);
    client.cancel_owner_transfer(&owner);
    assert_eq!(client.get_pending_owner(), None);

    match client.try_accept_owner(&successor) {
        Err(Ok(e)) => assert_eq!(e, ContractError::Unauthorized),
        _ => unreachable!("Expected Unauthorized error"),
    }
}

// ── Upgrade authorisation ────────────────────────────────────────────────────

#[test]
fn test_upgrade_by_non_owner_fails() {
    let (env, client, _owner, _stake_token, _) = setup(10);

    let intruder = Address::generate(&env);
    let hash = BytesN::from_array(&env, &[7u8; 32]);
    match client.try_upgrade(&intruder, &hash) {
        Err(Ok(e)) => assert_eq!(e, ContractError::Unauthorized),
        _ => unreachable!("Expected Unauthorized error"),
    }
}
