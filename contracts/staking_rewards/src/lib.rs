#![no_std]

pub mod access;
pub mod assets;
pub mod events;
pub mod fees;
pub mod ledger;
pub mod migration;
pub mod rewards;

use common::{ownable, pausable};
use soroban_sdk::{contract, contractimpl, contracttype, Address, BytesN, Env, Vec};

use fees::FeeConfig;
use ledger::{AccountState, LedgerConfig};
use migration::Migration;

// ── Contract errors ──────────────────────────────────────────────────────────

#[soroban_sdk::contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[repr(u32)]
pub enum ContractError {
    NotInitialized = 1,
    AlreadyInitialized = 2,
    Unauthorized = 3,
    InvalidInput = 4,
    InsufficientBalance = 5,
    TokensIdentical = 6,
    FeeTooHigh = 7,
    InvalidBatch = 8,
    Paused = 9,
    Reentrant = 10,
    TransferFailed = 11,
    SchemaVersionMismatch = 12,
    ArithmeticOverflow = 13,
}

// ── Public-facing types (re-exported for test consumers) ─────────────────────

/// Snapshot of a position returned by `get_staker_info`.
#[contracttype]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StakerInfo {
    pub staked: i128,
    pub pending_rewards: i128,
    pub lock_time_remaining: u64,
}

// ── Contract ─────────────────────────────────────────────────────────────────

#[contract]
pub struct StakingRewards;

#[contractimpl]
impl StakingRewards {
    // ── Schema initialisation ───────────────────────────────────────────────

    /// Bootstrap the base (version 1) schema. Runs exactly once.
    ///
    /// * `stake_token`  – SEP-41 token participants stake.
    /// * `reward_token` – SEP-41 token paid out as rewards.
    /// * `reward_rate`  – reward units emitted **per second** across all stakers.
    pub fn initialize(
        env: Env,
        owner: Address,
        stake_token: Address,
        reward_token: Address,
        reward_rate: i128,
    ) -> Result<(), ContractError> {
        owner.require_auth();
        migration::apply(
            &env,
            Migration::Base {
                owner,
                config: LedgerConfig {
                    stake_token,
                    reward_token,
                },
                reward_rate,
            },
        )
    }

    /// Move the schema from version 1 to version 2, adding the
    /// early-withdrawal fee policy. Owner only, runs exactly once, and only
    /// after `initialize`.
    pub fn initialize_v2(
        env: Env,
        caller: Address,
        lock_duration: u64,
        early_withdrawal_fee_bps: u32,
        fee_collector: Address,
    ) -> Result<(), ContractError> {
        access::non_reentrant(&env, || {
            migration::check_order(&env, 2)?;
            access::require_owner(&env, &caller)?;
            migration::apply(
                &env,
                Migration::FeePolicy(FeeConfig {
                    lock_duration,
                    early_withdrawal_fee_bps,
                    fee_collector,
                }),
            )
        })
    }

    // ── Staking ─────────────────────────────────────────────────────────────

    /// Deposit `amount` stake tokens.
    ///
    /// The accumulator is flushed and the staker checkpointed first so the
    /// new tokens never earn retroactively.
    pub fn stake(env: Env, staker: Address, amount: i128) -> Result<(), ContractError> {
        migration::require_initialized(&env)?;
        access::require_not_paused(&env)?;
        access::non_reentrant(&env, || {
            staker.require_auth();
            if amount <= 0 {
                return Err(ContractError::InvalidInput);
            }

            let now = env.ledger().timestamp();
            let config = ledger::load_config(&env)?;
            let mut state = ledger::load_state(&env)?;
            ledger::refresh(&env, &mut state, now);
            let mut account = ledger::load_account(&env, &staker);
            ledger::checkpoint(&env, &state, &mut account);

            account.balance = account
                .balance
                .checked_add(amount)
                .ok_or(ContractError::ArithmeticOverflow)?;
            state.total_staked = state
                .total_staked
                .checked_add(amount)
                .ok_or(ContractError::ArithmeticOverflow)?;

            assets::transfer_in(&env, &config.stake_token, &staker, amount)?;

            ledger::save_account(&env, &staker, &account);
            if migration::is_at_least(&env, 2) {
                ledger::set_stake_timestamp(&env, &staker, now);
            }
            ledger::save_state(&env, &state);

            events::publish_staked(&env, staker.clone(), amount, state.total_staked);
            Ok(())
        })
    }

    /// Remove `amount` from the caller's position and pay it out.
    ///
    /// Under the fee schema a withdrawal inside the lock window sends
    /// `amount × bps / 10 000` to the fee collector and the rest to the
    /// staker. Not haltable: funds can leave while the ledger is paused.
    pub fn withdraw(env: Env, staker: Address, amount: i128) -> Result<(), ContractError> {
        migration::require_initialized(&env)?;
        access::non_reentrant(&env, || {
            staker.require_auth();
            if amount <= 0 {
                return Err(ContractError::InvalidInput);
            }

            let now = env.ledger().timestamp();
            let config = ledger::load_config(&env)?;
            let mut state = ledger::load_state(&env)?;
            ledger::refresh(&env, &mut state, now);
            let mut account = ledger::load_account(&env, &staker);
            ledger::checkpoint(&env, &state, &mut account);

            if account.balance < amount {
                return Err(ContractError::InsufficientBalance);
            }
            account.balance -= amount;
            state.total_staked = state
                .total_staked
                .checked_sub(amount)
                .ok_or(ContractError::ArithmeticOverflow)?;

            // Effects before interactions.
            ledger::save_account(&env, &staker, &account);
            ledger::save_state(&env, &state);

            let mut fee = 0i128;
            if let Some((charged, collector)) = fees::assess(&env, &staker, amount, now) {
                fee = charged;
                assets::transfer_out(&env, &config.stake_token, &collector, fee)?;
                events::publish_fee_collected(&env, staker.clone(), collector, fee);
            }

            let payout = amount - fee;
            if payout > 0 {
                assets::transfer_out(&env, &config.stake_token, &staker, payout)?;
            }

            events::publish_withdrawn(&env, staker.clone(), amount, fee);
            Ok(())
        })
    }

    // ── Rewards ─────────────────────────────────────────────────────────────

    /// Pay out everything `staker` has accrued and return the amount.
    ///
    /// Returns `Ok(0)` when nothing is owed. The contract must hold enough
    /// reward tokens (funded by the owner).
    pub fn claim_rewards(env: Env, staker: Address) -> Result<i128, ContractError> {
        migration::require_initialized(&env)?;
        access::non_reentrant(&env, || {
            staker.require_auth();

            let now = env.ledger().timestamp();
            let config = ledger::load_config(&env)?;
            let mut state = ledger::load_state(&env)?;
            ledger::refresh(&env, &mut state, now);
            let mut account = ledger::load_account(&env, &staker);
            ledger::checkpoint(&env, &state, &mut account);

            let reward = account.accrued_reward;
            if reward > 0 {
                account.accrued_reward = 0;
            }
            ledger::save_account(&env, &staker, &account);
            ledger::save_state(&env, &state);

            if reward <= 0 {
                return Ok(0);
            }

            assets::transfer_out(&env, &config.reward_token, &staker, reward)?;
            events::publish_reward_paid(&env, staker.clone(), reward);
            Ok(reward)
        })
    }

    // ── Batch staking (schema 2) ────────────────────────────────────────────

    /// Credit stakes to many recipients at once, funded by the owner in a
    /// single transfer. The whole batch is validated before anything is
    /// written; any bad pair rejects the entire call.
    pub fn batch_stake(
        env: Env,
        caller: Address,
        recipients: Vec<Address>,
        amounts: Vec<i128>,
    ) -> Result<(), ContractError> {
        migration::require_initialized(&env)?;
        access::require_not_paused(&env)?;
        access::non_reentrant(&env, || {
            access::require_owner(&env, &caller)?;
            migration::require_at_least(&env, 2)?;

            if recipients.is_empty() || recipients.len() != amounts.len() {
                return Err(ContractError::InvalidBatch);
            }
            let this = env.current_contract_address();
            let mut total: i128 = 0;
            for (recipient, amount) in recipients.iter().zip(amounts.iter()) {
                if amount <= 0 || recipient == this {
                    return Err(ContractError::InvalidInput);
                }
                total = total
                    .checked_add(amount)
                    .ok_or(ContractError::ArithmeticOverflow)?;
            }

            let now = env.ledger().timestamp();
            let config = ledger::load_config(&env)?;
            let mut state = ledger::load_state(&env)?;
            ledger::refresh(&env, &mut state, now);

            for (recipient, amount) in recipients.iter().zip(amounts.iter()) {
                let mut account = ledger::load_account(&env, &recipient);
                ledger::checkpoint(&env, &state, &mut account);
                account.balance = account
                    .balance
                    .checked_add(amount)
                    .ok_or(ContractError::ArithmeticOverflow)?;
                state.total_staked = state
                    .total_staked
                    .checked_add(amount)
                    .ok_or(ContractError::ArithmeticOverflow)?;

                ledger::save_account(&env, &recipient, &account);
                ledger::set_stake_timestamp(&env, &recipient, now);
                events::publish_staked(&env, recipient, amount, state.total_staked);
            }

            assets::transfer_in(&env, &config.stake_token, &caller, total)?;
            ledger::save_state(&env, &state);
            Ok(())
        })
    }

    // ── View functions ───────────────────────────────────────────────────────

    /// Accumulator value as of the current ledger timestamp.
    pub fn reward_per_token(env: Env) -> i128 {
        match ledger::try_load_state(&env) {
            Some(state) => ledger::reward_per_token_at(&env, &state, env.ledger().timestamp()),
            None => 0,
        }
    }

    /// Real-time rewards owed to `account`, without mutating state.
    pub fn earned(env: Env, account: Address) -> i128 {
        match ledger::try_load_state(&env) {
            Some(state) => {
                let position = ledger::load_account(&env, &account);
                ledger::pending_rewards(&env, &state, &position, env.ledger().timestamp())
            }
            None => 0,
        }
    }

    pub fn get_staked(env: Env, account: Address) -> i128 {
        ledger::load_account(&env, &account).balance
    }

    /// Raw stored position, as of its last checkpoint.
    pub fn get_account(env: Env, account: Address) -> AccountState {
        ledger::load_account(&env, &account)
    }

    /// Return the combined position for `account` in one call.
    pub fn get_staker_info(env: Env, account: Address) -> StakerInfo {
        let now = env.ledger().timestamp();
        let position = ledger::load_account(&env, &account);
        let pending_rewards = match ledger::try_load_state(&env) {
            Some(state) => ledger::pending_rewards(&env, &state, &position, now),
            None => 0,
        };
        StakerInfo {
            staked: position.balance,
            pending_rewards,
            lock_time_remaining: fees::remaining_for(&env, &account, now),
        }
    }

    pub fn get_total_staked(env: Env) -> i128 {
        ledger::try_load_state(&env).map_or(0, |s| s.total_staked)
    }

    /// Current emission rate (reward units per second).
    pub fn get_reward_rate(env: Env) -> i128 {
        ledger::try_load_state(&env).map_or(0, |s| s.reward_rate)
    }

    pub fn get_last_update_time(env: Env) -> u64 {
        ledger::try_load_state(&env).map_or(0, |s| s.last_update_time)
    }

    pub fn get_config(env: Env) -> Result<LedgerConfig, ContractError> {
        ledger::load_config(&env)
    }

    /// Seconds until `account` can withdraw without a fee. Always 0 before
    /// the fee schema is active.
    pub fn lock_time_remaining(env: Env, account: Address) -> u64 {
        fees::remaining_for(&env, &account, env.ledger().timestamp())
    }

    pub fn get_fee_config(env: Env) -> Option<FeeConfig> {
        fees::load(&env)
    }

    pub fn get_schema_version(env: Env) -> u32 {
        migration::current_version(&env)
    }

    pub fn is_initialized(env: Env) -> bool {
        migration::require_initialized(&env).is_ok()
    }

    pub fn is_paused(env: Env) -> bool {
        pausable::is_paused(&env)
    }

    pub fn get_owner(env: Env) -> Result<Address, ContractError> {
        ownable::get_owner(&env).ok_or(ContractError::NotInitialized)
    }

    pub fn get_pending_owner(env: Env) -> Option<Address> {
        ownable::get_pending_owner(&env)
    }

    // ── Owner functions ──────────────────────────────────────────────────────

    /// Update the emission rate.
    ///
    /// The accumulator is flushed at the old rate *before* the change, so
    /// no staker gains or loses retroactively.
    pub fn set_reward_rate(env: Env, caller: Address, new_rate: i128) -> Result<(), ContractError> {
        migration::require_initialized(&env)?;
        access::non_reentrant(&env, || {
            access::require_owner(&env, &caller)?;
            if new_rate < 0 {
                return Err(ContractError::InvalidInput);
            }

            let mut state = ledger::load_state(&env)?;
            ledger::refresh(&env, &mut state, env.ledger().timestamp());
            state.reward_rate = new_rate;
            ledger::save_state(&env, &state);

            events::publish_reward_rate_set(&env, new_rate);
            Ok(())
        })
    }

    /// Update the lock window. Applies to existing stakes too, measured from
    /// their recorded stake time.
    pub fn set_lock_duration(
        env: Env,
        caller: Address,
        new_duration: u64,
    ) -> Result<(), ContractError> {
        migration::require_initialized(&env)?;
        access::non_reentrant(&env, || {
            access::require_owner(&env, &caller)?;
            let mut config = fees::require(&env)?;

            config.lock_duration = new_duration;
            fees::save(&env, &config);

            events::publish_lock_duration_set(&env, new_duration);
            Ok(())
        })
    }

    /// Update the early-withdrawal fee, capped at 1 000 bps (10 %).
    pub fn set_early_withdrawal_fee(
        env: Env,
        caller: Address,
        new_fee_bps: u32,
    ) -> Result<(), ContractError> {
        migration::require_initialized(&env)?;
        access::non_reentrant(&env, || {
            access::require_owner(&env, &caller)?;
            let mut config = fees::require(&env)?;
            fees::validate_fee_bps(new_fee_bps)?;

            config.early_withdrawal_fee_bps = new_fee_bps;
            fees::save(&env, &config);

            events::publish_fee_set(&env, new_fee_bps);
            Ok(())
        })
    }

    pub fn set_fee_collector(
        env: Env,
        caller: Address,
        collector: Address,
    ) -> Result<(), ContractError> {
        migration::require_initialized(&env)?;
        access::non_reentrant(&env, || {
            access::require_owner(&env, &caller)?;
            let mut config = fees::require(&env)?;
            fees::validate_collector(&env, &collector)?;

            config.fee_collector = collector.clone();
            fees::save(&env, &config);

            events::publish_fee_collector_set(&env, collector);
            Ok(())
        })
    }

    /// Engage the circuit breaker. Halts `stake` and `batch_stake` only.
    pub fn pause(env: Env, caller: Address) -> Result<(), ContractError> {
        migration::require_initialized(&env)?;
        access::non_reentrant(&env, || {
            access::require_owner(&env, &caller)?;
            if pausable::set_paused(&env, true) {
                events::publish_paused(&env, caller.clone());
            }
            Ok(())
        })
    }

    pub fn unpause(env: Env, caller: Address) -> Result<(), ContractError> {
        migration::require_initialized(&env)?;
        access::non_reentrant(&env, || {
            access::require_owner(&env, &caller)?;
            if pausable::set_paused(&env, false) {
                events::publish_unpaused(&env, caller.clone());
            }
            Ok(())
        })
    }

    /// Replace the contract code. Stored state is left as is; new code that
    /// adds fields must ship a migration to run afterwards.
    pub fn upgrade(
        env: Env,
        caller: Address,
        new_wasm_hash: BytesN<32>,
    ) -> Result<(), ContractError> {
        migration::require_initialized(&env)?;
        access::non_reentrant(&env, || {
            access::require_owner(&env, &caller)?;
            env.deployer()
                .update_current_contract_wasm(new_wasm_hash.clone());
            events::publish_upgraded(&env, new_wasm_hash.clone());
            Ok(())
        })
    }

    // ── Ownership transfer (two-step) ───────────────────────────────────────

    /// Propose a new owner. The candidate must call `accept_owner`.
    pub fn propose_owner(
        env: Env,
        caller: Address,
        new_owner: Address,
    ) -> Result<(), ContractError> {
        migration::require_initialized(&env)?;
        access::non_reentrant(&env, || {
            access::require_owner(&env, &caller)?;
            if !ownable::propose_owner(&env, &caller, &new_owner) {
                return Err(ContractError::Unauthorized);
            }
            events::publish_owner_transfer_proposed(&env, caller.clone(), new_owner.clone());
            Ok(())
        })
    }

    /// Accept a pending ownership transfer. Only the proposed owner can call this.
    pub fn accept_owner(env: Env, new_owner: Address) -> Result<(), ContractError> {
        migration::require_initialized(&env)?;
        access::non_reentrant(&env, || {
            new_owner.require_auth();
            let old_owner =
                ownable::accept_owner(&env, &new_owner).ok_or(ContractError::Unauthorized)?;
            events::publish_owner_transfer_accepted(&env, old_owner, new_owner.clone());
            Ok(())
        })
    }

    /// Cancel a pending ownership transfer.
    pub fn cancel_owner_transfer(env: Env, caller: Address) -> Result<(), ContractError> {
        migration::require_initialized(&env)?;
        access::non_reentrant(&env, || {
            access::require_owner(&env, &caller)?;
            let pending =
                ownable::cancel_transfer(&env, &caller).ok_or(ContractError::InvalidInput)?;
            events::publish_owner_transfer_cancelled(&env, caller.clone(), pending);
            Ok(())
        })
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────


#[cfg(test)]
mod test_access;
