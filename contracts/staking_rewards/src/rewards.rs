//! Reward accumulator math.
//!
//! Pure functions over ledger fields. Products are widened to 256 bits so a
//! large rate, a long idle period or a large balance cannot wrap; only the
//! final narrowing back to `i128` can fail.

use soroban_sdk::{panic_with_error, Env, I256};

use crate::ContractError;

/// Fixed-point scale of the reward-per-token accumulator (18 decimals).
pub const SCALE: i128 = 1_000_000_000_000_000_000;

fn narrow(env: &Env, value: &I256) -> i128 {
    match value.to_i128() {
        Some(v) => v,
        None => panic_with_error!(env, ContractError::ArithmeticOverflow),
    }
}

/// Advance the accumulator by `elapsed` seconds of emission at `reward_rate`
/// shared across `total_staked`.
///
/// Nothing is added while `total_staked` is zero: that interval has nobody
/// to pay and is dropped, not deferred.
pub fn compute_reward_per_token(
    env: &Env,
    stored: i128,
    reward_rate: i128,
    elapsed: u64,
    total_staked: i128,
) -> i128 {
    if total_staked <= 0 || elapsed == 0 || reward_rate <= 0 {
        return stored;
    }

    let increment = I256::from_i128(env, elapsed as i128)
        .mul(&I256::from_i128(env, reward_rate))
        .mul(&I256::from_i128(env, SCALE))
        .div(&I256::from_i128(env, total_staked));

    narrow(env, &I256::from_i128(env, stored).add(&increment))
}

/// Rewards owed to a position: the unpaid accumulator delta applied to its
/// balance, plus whatever was already accrued at the last checkpoint.
pub fn earned(
    env: &Env,
    staked: i128,
    current_rpt: i128,
    paid_rpt: i128,
    accrued: i128,
) -> i128 {
    let delta = current_rpt.saturating_sub(paid_rpt);
    if staked <= 0 || delta <= 0 {
        return accrued;
    }

    let pending = I256::from_i128(env, staked)
        .mul(&I256::from_i128(env, delta))
        .div(&I256::from_i128(env, SCALE));

    narrow(env, &pending.add(&I256::from_i128(env, accrued)))
}
