use soroban_sdk::{contracttype, symbol_short, Address, Env, Symbol};

use crate::{rewards, ContractError};

// ── Storage keys ─────────────────────────────────────────────────────────────

const LEDGER: Symbol = symbol_short!("LEDGER");
const CONFIG: Symbol = symbol_short!("CONFIG");

// Per-account persistent storage uses tuple keys:  (prefix, address)
const ACCOUNT: Symbol = symbol_short!("ACCOUNT");
const STAKE_TIME: Symbol = symbol_short!("STK_TIME");

const TTL_THRESHOLD: u32 = 5_184_000;
const TTL_EXTEND_TO: u32 = 10_368_000;

// ── Types ────────────────────────────────────────────────────────────────────

/// Pool-wide aggregate. Written back as one value after every mutation so
/// `total_staked` and the accumulator never drift apart.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LedgerState {
    pub total_staked: i128,
    /// Reward units emitted per second across all stakers.
    pub reward_rate: i128,
    pub last_update_time: u64,
    /// Cumulative reward per staked unit, scaled by [`rewards::SCALE`].
    pub reward_per_token_stored: i128,
}

/// Asset addresses fixed at base initialisation.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct LedgerConfig {
    pub stake_token: Address,
    pub reward_token: Address,
}

/// One participant's position. Created lazily; a zero balance is a valid
/// terminal state and the entry is never removed.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AccountState {
    pub balance: i128,
    pub reward_per_token_paid: i128,
    pub accrued_reward: i128,
}

impl AccountState {
    pub fn empty() -> Self {
        AccountState {
            balance: 0,
            reward_per_token_paid: 0,
            accrued_reward: 0,
        }
    }
}

// ── Storage access ───────────────────────────────────────────────────────────

pub fn extend_instance_ttl(env: &Env) {
    env.storage()
        .instance()
        .extend_ttl(TTL_THRESHOLD, TTL_EXTEND_TO);
}

pub fn try_load_state(env: &Env) -> Option<LedgerState> {
    env.storage().instance().get(&LEDGER)
}

pub fn load_state(env: &Env) -> Result<LedgerState, ContractError> {
    try_load_state(env).ok_or(ContractError::NotInitialized)
}

pub fn save_state(env: &Env, state: &LedgerState) {
    env.storage().instance().set(&LEDGER, state);
    extend_instance_ttl(env);
}

pub fn load_config(env: &Env) -> Result<LedgerConfig, ContractError> {
    env.storage()
        .instance()
        .get(&CONFIG)
        .ok_or(ContractError::NotInitialized)
}

pub fn save_config(env: &Env, config: &LedgerConfig) {
    env.storage().instance().set(&CONFIG, config);
}

pub fn load_account(env: &Env, account: &Address) -> AccountState {
    env.storage()
        .persistent()
        .get(&(ACCOUNT, account.clone()))
        .unwrap_or_else(AccountState::empty)
}

pub fn save_account(env: &Env, account: &Address, state: &AccountState) {
    let key = (ACCOUNT, account.clone());
    env.storage().persistent().set(&key, state);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

/// Last time the account's stake was (re-)established under the fee schema.
/// `None` for accounts that have not staked since the fee schema went live.
pub fn stake_timestamp(env: &Env, account: &Address) -> Option<u64> {
    env.storage()
        .persistent()
        .get(&(STAKE_TIME, account.clone()))
}

pub fn set_stake_timestamp(env: &Env, account: &Address, timestamp: u64) {
    let key = (STAKE_TIME, account.clone());
    env.storage().persistent().set(&key, &timestamp);
    env.storage()
        .persistent()
        .extend_ttl(&key, TTL_THRESHOLD, TTL_EXTEND_TO);
}

// ── Accrual ──────────────────────────────────────────────────────────────────

/// Accumulator value as of `now`, without writing anything.
pub fn reward_per_token_at(env: &Env, state: &LedgerState, now: u64) -> i128 {
    rewards::compute_reward_per_token(
        env,
        state.reward_per_token_stored,
        state.reward_rate,
        now.saturating_sub(state.last_update_time),
        state.total_staked,
    )
}

/// Flush the global accumulator up to `now`.
///
/// `last_update_time` moves to `now` even with nothing staked so the idle
/// interval is never counted later.
pub fn refresh(env: &Env, state: &mut LedgerState, now: u64) {
    state.reward_per_token_stored = reward_per_token_at(env, state, now);
    if now > state.last_update_time {
        state.last_update_time = now;
    }
}

/// Settle an account against the (already refreshed) accumulator.
pub fn checkpoint(env: &Env, state: &LedgerState, account: &mut AccountState) {
    account.accrued_reward = rewards::earned(
        env,
        account.balance,
        state.reward_per_token_stored,
        account.reward_per_token_paid,
        account.accrued_reward,
    );
    account.reward_per_token_paid = state.reward_per_token_stored;
}

/// What `checkpoint` would credit the account if it ran at `now`.
pub fn pending_rewards(env: &Env, state: &LedgerState, account: &AccountState, now: u64) -> i128 {
    rewards::earned(
        env,
        account.balance,
        reward_per_token_at(env, state, now),
        account.reward_per_token_paid,
        account.accrued_reward,
    )
}
