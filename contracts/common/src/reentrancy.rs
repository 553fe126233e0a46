//! Single-entry lock for mutating entry points.
//!
//! The flag lives in instance storage for the duration of one guarded call.
//! A call that panics is rolled back by the host together with the flag, so
//! only `Ok`/`Err` returns need an explicit release.

use soroban_sdk::{symbol_short, Env, Symbol};

const LOCK: Symbol = symbol_short!("REENTRY");

pub fn is_locked(env: &Env) -> bool {
    env.storage().instance().get(&LOCK).unwrap_or(false)
}

/// Takes the lock. Returns `false` if it is already held.
pub fn enter(env: &Env) -> bool {
    if is_locked(env) {
        return false;
    }
    env.storage().instance().set(&LOCK, &true);
    true
}

pub fn exit(env: &Env) {
    env.storage().instance().remove(&LOCK);
}

/// Runs `f` while holding the lock and releases it on every return path.
///
/// Returns `Err(busy)` without running `f` if the lock is already held.
pub fn guarded<T, E>(env: &Env, busy: E, f: impl FnOnce() -> Result<T, E>) -> Result<T, E> {
    if !enter(env) {
        return Err(busy);
    }
    let result = f();
    exit(env);
    result
}
