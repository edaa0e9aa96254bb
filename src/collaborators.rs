//! Trait boundaries for the external collaborators this core delegates to:
//! persistence, balance computation, vote storage, network transport,
//! membership, and wall-clock time all live outside this core. Concrete
//! implementations are the node binary's job; `crate::testing` provides
//! in-memory doubles.
//!
//! Each collaborator is injected as an `Arc<dyn Trait>` field on whatever
//! struct assembles this core, so swapping an implementation never touches
//! the decision logic that calls it.

use crate::block::Block;
use crate::error::CoreError;
use crate::types::Hash256;
use async_trait::async_trait;

/// The authoritative, persisted, already-agreed chain.
#[async_trait]
pub trait FrozenChain: Send + Sync {
    /// The highest block height already committed to the canonical chain.
    fn frozen_edge_height(&self) -> u64;

    /// Commits `block` as the new frozen tip. Implementations update
    /// `frozen_edge_height()` before returning.
    async fn freeze(&self, block: Block) -> Result<(), CoreError>;

    /// Whether the validator set is still mesh-membership-derived rather
    /// than cycle-schedule-derived.
    fn in_genesis_cycle(&self) -> bool;

    /// The divisor used outside the genesis cycle when translating vote
    /// counts into percentages.
    fn current_cycle_length(&self) -> u64;

    /// A lenient upper bound on plausible block heights. `lenient = true` is
    /// the only mode this core uses.
    fn open_edge_height(&self, lenient: bool) -> u64;
}

/// Recomputes a balance list for a candidate block.
#[async_trait]
pub trait BalanceEngine: Send + Sync {
    /// Returns the hash of the recomputed balance list, or `None` if it
    /// could not be computed (treated as rejection).
    async fn compute_balance_list_hash(&self, block: &Block) -> Option<Hash256>;
}

/// Stores peer block votes. Externally synchronized —
/// this core never locks around calls into it.
pub trait VoteRegistry: Send + Sync {
    /// The currently-leading hash at `height` and its vote count, if any
    /// votes exist.
    fn leading_hash(&self, height: u64) -> Option<(Hash256, u32)>;

    /// This node's own previously-registered vote at `height`, if any.
    fn local_vote(&self, height: u64) -> Option<Hash256>;

    /// Registers a vote from `voter` (including this node, after a local
    /// vote change).
    fn register_vote(&self, voter: crate::types::VoterId, vote: crate::types::BlockVote);

    /// All heights with at least one recorded vote.
    fn heights(&self) -> Vec<u64>;

    /// All distinct hashes voted for at `height`.
    fn hashes_for(&self, height: u64) -> Vec<Hash256>;
}

/// Broadcasts votes and fetches blocks from peers.
#[async_trait]
pub trait MeshTransport: Send + Sync {
    async fn broadcast_vote(&self, vote: crate::types::BlockVote);

    /// Fetches the block `(height, hash)` from a random peer. `None` if the
    /// peer has no such block or the request failed — both are silently
    /// absorbed by this core.
    async fn fetch_block(&self, height: u64, hash: Hash256) -> Option<Block>;
}

/// Reports mesh membership size for genesis-cycle voting.
pub trait NodeRegistry: Send + Sync {
    fn mesh_size(&self) -> u64;
}

/// Wall-clock time, injected so tests can control `now` deterministically.
pub trait Clock: Send + Sync {
    fn now_ms(&self) -> i64;
}

/// `Clock` backed by the real system clock.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        use std::time::{SystemTime, UNIX_EPOCH};
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as i64
    }
}
