//! Versioned initialisation of the ledger schema.
//!
//! Every schema version has exactly one migration, looked up by its target
//! version. A migration runs only when the stored version is its immediate
//! predecessor, validates its own fields before writing any of them, and
//! only ever adds storage entries.

use common::versioning;
use soroban_sdk::{log, Address, Env};

use crate::{
    events,
    fees::{self, FeeConfig},
    ledger::{self, LedgerConfig, LedgerState},
    ContractError,
};

/// Highest schema version this code knows how to reach.
pub const LATEST_SCHEMA_VERSION: u32 = 2;

/// A pending schema step and the fields it introduces.
pub enum Migration {
    /// `Uninitialized → 1`: owner, asset pair and initial emission rate.
    Base {
        owner: Address,
        config: LedgerConfig,
        reward_rate: i128,
    },
    /// `1 → 2`: early-withdrawal fee policy.
    FeePolicy(FeeConfig),
}

impl Migration {
    pub fn target_version(&self) -> u32 {
        match self {
            Migration::Base { .. } => 1,
            Migration::FeePolicy(_) => 2,
        }
    }
}

pub fn current_version(env: &Env) -> u32 {
    versioning::current(env)
}

pub fn is_at_least(env: &Env, version: u32) -> bool {
    current_version(env) >= version
}

pub fn require_initialized(env: &Env) -> Result<(), ContractError> {
    if current_version(env) == versioning::UNINITIALIZED {
        return Err(ContractError::NotInitialized);
    }
    Ok(())
}

pub fn require_at_least(env: &Env, version: u32) -> Result<(), ContractError> {
    if !is_at_least(env, version) {
        return Err(ContractError::SchemaVersionMismatch);
    }
    Ok(())
}

/// Refuse a migration to `target` unless the ledger sits exactly at
/// `target - 1` and this code knows `target`.
pub fn check_order(env: &Env, target: u32) -> Result<(), ContractError> {
    if target <= LATEST_SCHEMA_VERSION && versioning::can_advance_to(env, target) {
        return Ok(());
    }
    log!(
        env,
        "migration refused: stored version, requested version",
        current_version(env),
        target
    );
    if target == 1 {
        Err(ContractError::AlreadyInitialized)
    } else {
        Err(ContractError::SchemaVersionMismatch)
    }
}

/// Run `migration` and move the version tag one step forward.
pub fn apply(env: &Env, migration: Migration) -> Result<(), ContractError> {
    let target = migration.target_version();
    check_order(env, target)?;
    let from = current_version(env);

    match migration {
        Migration::Base {
            owner,
            config,
            reward_rate,
        } => init_base(env, owner, config, reward_rate)?,
        Migration::FeePolicy(config) => init_fee_policy(env, config)?,
    }

    if !versioning::advance_to(env, target) {
        return Err(ContractError::SchemaVersionMismatch);
    }
    ledger::extend_instance_ttl(env);
    events::publish_migrated(env, from, target);
    Ok(())
}

fn init_base(
    env: &Env,
    owner: Address,
    config: LedgerConfig,
    reward_rate: i128,
) -> Result<(), ContractError> {
    if reward_rate < 0 {
        return Err(ContractError::InvalidInput);
    }
    if config.stake_token == config.reward_token {
        return Err(ContractError::TokensIdentical);
    }
    let this = env.current_contract_address();
    if config.stake_token == this || config.reward_token == this || owner == this {
        return Err(ContractError::InvalidInput);
    }

    let now = env.ledger().timestamp();
    common::ownable::set_owner(env, &owner);
    ledger::save_config(env, &config);
    ledger::save_state(
        env,
        &LedgerState {
            total_staked: 0,
            reward_rate,
            last_update_time: now,
            reward_per_token_stored: 0,
        },
    );

    events::publish_initialized(
        env,
        owner,
        config.stake_token,
        config.reward_token,
        reward_rate,
    );
    Ok(())
}

fn init_fee_policy(env: &Env, config: FeeConfig) -> Result<(), ContractError> {
    fees::validate_fee_bps(config.early_withdrawal_fee_bps)?;
    fees::validate_collector(env, &config.fee_collector)?;

    fees::save(env, &config);
    Ok(())
}
