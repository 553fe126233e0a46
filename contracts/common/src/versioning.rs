//! Schema version tag for append-only contract storage.
//!
//! Version `0` means uninitialised. Each migration moves the tag forward by
//! exactly one; skipping, repeating and going backwards are all refused.

use soroban_sdk::{symbol_short, Env, Symbol};

const SCHEMA: Symbol = symbol_short!("SCHEMA");

pub const UNINITIALIZED: u32 = 0;

pub fn current(env: &Env) -> u32 {
    env.storage().instance().get(&SCHEMA).unwrap_or(UNINITIALIZED)
}

/// Returns `true` if a migration to `target` may run now, i.e. the stored
/// version is exactly `target - 1`.
pub fn can_advance_to(env: &Env, target: u32) -> bool {
    target > UNINITIALIZED && current(env) == target - 1
}

/// Moves the tag to `target`. Returns `false` and leaves the tag untouched
/// unless `can_advance_to(target)` holds.
pub fn advance_to(env: &Env, target: u32) -> bool {
    if !can_advance_to(env, target) {
        return false;
    }
    env.storage().instance().set(&SCHEMA, &target);
    true
}
