use soroban_sdk::{symbol_short, Address, Env, Symbol};

// ── Storage Keys ─────────────────────────────────────────────────────────────

const OWNER: Symbol = symbol_short!("OWNER");
const PENDING_OWNER: Symbol = symbol_short!("PEND_OWN");

// ── Core Functions ───────────────────────────────────────────────────────────

/// Records `owner` as the single principal allowed through owner-gated
/// entry points. Only callable internally; callers must verify
/// authorization beforehand.
pub fn set_owner(env: &Env, owner: &Address) {
    env.storage().instance().set(&OWNER, owner);
}

/// Returns the recorded owner, if any.
pub fn get_owner(env: &Env) -> Option<Address> {
    env.storage().instance().get(&OWNER)
}

/// Returns `true` only if an owner is recorded and `caller` matches it exactly.
pub fn is_owner(env: &Env, caller: &Address) -> bool {
    match get_owner(env) {
        Some(owner) => owner == *caller,
        None => false,
    }
}

// ── Two-step hand-over ───────────────────────────────────────────────────────

/// Stores `candidate` as the pending owner.
///
/// Returns `false` without touching storage if `caller` is not the owner.
pub fn propose_owner(env: &Env, caller: &Address, candidate: &Address) -> bool {
    if !is_owner(env, caller) {
        return false;
    }
    env.storage().instance().set(&PENDING_OWNER, candidate);
    true
}

pub fn get_pending_owner(env: &Env) -> Option<Address> {
    env.storage().instance().get(&PENDING_OWNER)
}

/// Completes the hand-over if `candidate` is the pending owner.
///
/// Returns the previous owner on success.
pub fn accept_owner(env: &Env, candidate: &Address) -> Option<Address> {
    let pending = get_pending_owner(env)?;
    if pending != *candidate {
        return None;
    }
    let previous = get_owner(env)?;
    set_owner(env, candidate);
    env.storage().instance().remove(&PENDING_OWNER);
    Some(previous)
}

/// Drops the pending hand-over. Returns the cancelled candidate, or `None`
/// if `caller` is not the owner or nothing was pending.
pub fn cancel_transfer(env: &Env, caller: &Address) -> Option<Address> {
    if !is_owner(env, caller) {
        return None;
    }
    let pending = get_pending_owner(env)?;
    env.storage().instance().remove(&PENDING_OWNER);
    Some(pending)
}
