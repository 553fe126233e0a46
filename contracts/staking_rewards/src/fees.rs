//! Early-withdrawal fee policy, introduced with schema version 2.
//!
//! A withdrawal made while the account's lock window is still open pays
//! `amount × bps / 10 000` to the fee collector. Rounding is always down, so
//! any remainder stays with the withdrawing participant.

use soroban_sdk::{contracttype, symbol_short, Address, Env, Symbol};

use crate::{ledger, migration, ContractError};

const FEE_CONFIG: Symbol = symbol_short!("FEE_CFG");

/// Upper bound on the fee rate: 10 %.
pub const MAX_FEE_BPS: u32 = 1_000;
pub const BPS_DENOMINATOR: i128 = 10_000;

/// Fields appended by the version-2 schema. Stored under their own key so
/// no version-1 value changes shape.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct FeeConfig {
    /// Seconds after a stake during which withdrawal is charged.
    pub lock_duration: u64,
    pub early_withdrawal_fee_bps: u32,
    pub fee_collector: Address,
}

pub fn load(env: &Env) -> Option<FeeConfig> {
    env.storage().instance().get(&FEE_CONFIG)
}

pub fn require(env: &Env) -> Result<FeeConfig, ContractError> {
    load(env).ok_or(ContractError::SchemaVersionMismatch)
}

pub fn save(env: &Env, config: &FeeConfig) {
    env.storage().instance().set(&FEE_CONFIG, config);
}

pub fn validate_fee_bps(fee_bps: u32) -> Result<(), ContractError> {
    if fee_bps > MAX_FEE_BPS {
        return Err(ContractError::FeeTooHigh);
    }
    Ok(())
}

/// The collector must be a principal other than the ledger itself.
pub fn validate_collector(env: &Env, collector: &Address) -> Result<(), ContractError> {
    if *collector == env.current_contract_address() {
        return Err(ContractError::InvalidInput);
    }
    Ok(())
}

/// `max(0, stake_timestamp + lock_duration - now)`.
pub fn lock_time_remaining(stake_timestamp: u64, lock_duration: u64, now: u64) -> u64 {
    stake_timestamp
        .saturating_add(lock_duration)
        .saturating_sub(now)
}

/// `floor(amount × fee_bps / 10 000)`, computed without forming the full
/// product so it cannot overflow for any `amount`.
pub fn early_withdrawal_fee(amount: i128, fee_bps: u32) -> i128 {
    if amount <= 0 || fee_bps == 0 {
        return 0;
    }
    let bps = fee_bps as i128;
    (amount / BPS_DENOMINATOR) * bps + (amount % BPS_DENOMINATOR) * bps / BPS_DENOMINATOR
}

/// Remaining lock time for `account` at `now`; zero before the fee schema.
pub fn remaining_for(env: &Env, account: &Address, now: u64) -> u64 {
    if !migration::is_at_least(env, 2) {
        return 0;
    }
    match (load(env), ledger::stake_timestamp(env, account)) {
        (Some(config), Some(staked_at)) => {
            lock_time_remaining(staked_at, config.lock_duration, now)
        }
        _ => 0,
    }
}

/// Fee owed on withdrawing `amount` from `account` at `now`, together with
/// the collector it goes to. `None` when nothing is charged.
pub fn assess(env: &Env, account: &Address, amount: i128, now: u64) -> Option<(i128, Address)> {
    if !migration::is_at_least(env, 2) {
        return None;
    }
    let config = load(env)?;
    if config.early_withdrawal_fee_bps == 0 {
        return None;
    }
    let staked_at = ledger::stake_timestamp(env, account)?;
    let remaining = lock_time_remaining(staked_at, config.lock_duration, now);
    if remaining == 0 {
        return None;
    }
    let fee = early_withdrawal_fee(amount, config.early_withdrawal_fee_bps);
    if fee <= 0 {
        return None;
    }
    Some((fee, config.fee_collector))
}
