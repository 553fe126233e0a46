//! Guards wrapped around every mutating entry point.
//!
//! Entry points compose them in a fixed order:
//!
//! 1. [`require_not_paused`]: haltable operations only (`stake`, `batch_stake`);
//! 2. [`non_reentrant`]: wraps the rest of the call;
//! 3. [`require_owner`]: administrative operations, inside the lock.

use common::{ownable, pausable, reentrancy};
use soroban_sdk::{log, Address, Env};

use crate::ContractError;

/// Guard: revert while the circuit breaker is engaged.
pub fn require_not_paused(env: &Env) -> Result<(), ContractError> {
    if pausable::is_paused(env) {
        log!(env, "rejected: ledger is paused");
        return Err(ContractError::Paused);
    }
    Ok(())
}

/// Guard: authenticate `caller` and revert unless it is the recorded owner.
pub fn require_owner(env: &Env, caller: &Address) -> Result<(), ContractError> {
    caller.require_auth();
    if !ownable::is_owner(env, caller) {
        log!(env, "rejected: caller is not the owner", caller.clone());
        return Err(ContractError::Unauthorized);
    }
    Ok(())
}

/// Run `f` holding the single-entry lock. A nested mutating call made while
/// `f` runs fails with `Reentrant`.
pub fn non_reentrant<T>(
    env: &Env,
    f: impl FnOnce() -> Result<T, ContractError>,
) -> Result<T, ContractError> {
    reentrancy::guarded(env, ContractError::Reentrant, f)
}
