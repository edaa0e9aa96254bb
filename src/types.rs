//! Core wire and identifier types shared across the consensus core.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A content hash: block hash, balance-list hash, or bootstrap tip hash.
pub type Hash256 = [u8; 32];

/// Zero hash — the delete sentinel for `hash_overrides`.
pub const ZERO_HASH: Hash256 = [0u8; 32];

/// Identifies a peer/validator casting a vote. Opaque to this core beyond
/// equality and hashing — a node address, public key fingerprint, etc.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VoterId(pub String);

impl std::fmt::Display for VoterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A vote for a specific block at a specific height.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockVote {
    pub height: u64,
    pub hash: Hash256,
    pub timestamp: i64,
}

/// Snapshot of the per-height threshold overrides, keyed by height.
pub type ThresholdOverrides = HashMap<u64, u8>;

/// Snapshot of the per-height forced-hash overrides, keyed by height.
pub type HashOverrides = HashMap<u64, Hash256>;
