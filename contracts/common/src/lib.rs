//! Shared guard primitives for the staking contract suite.
//!
//! This crate provides storage-backed building blocks that contracts compose
//! around their mutating entry points:
//! - [`ownable`]: the recorded owner and a two-step hand-over.
//! - [`pausable`]: a circuit-breaker flag.
//! - [`reentrancy`]: a single-entry lock.
//! - [`versioning`]: a strictly sequential schema version tag.
//!
//! Helpers report through `bool`/`Option` and leave the error vocabulary to
//! the calling contract.

#![no_std]

pub mod ownable;
pub mod pausable;
pub mod reentrancy;
pub mod versioning;
