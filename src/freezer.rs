//! `Freezer` — detects a stable super-majority and promotes a block to
//! frozen, then reclaims pool memory.

use crate::candidate_pool::CandidatePool;
use crate::collaborators::{FrozenChain, NodeRegistry, VoteRegistry};
use crate::constants::DEFAULT_FREEZE_THRESHOLD_PERCENT;
use std::sync::Arc;
use std::time::Duration;

/// Outcome of a single `tick()` call, useful for tests and metrics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FreezeOutcome {
    /// No candidates at `frozen_edge_height + 1`, or no leader.
    NoLeader,
    /// The leading hash did not clear the threshold on the first check.
    BelowThreshold,
    /// The leader flickered between the pre- and post-dwell checks, or the
    /// leading block was not present in the pool at recheck time.
    Flickered,
    /// A block was frozen; the pool was purged up to the new edge.
    Frozen { height: u64 },
}

pub struct Freezer {
    pool: Arc<CandidatePool>,
    frozen_chain: Arc<dyn FrozenChain>,
    vote_registry: Arc<dyn VoteRegistry>,
    node_registry: Arc<dyn NodeRegistry>,
    dwell: Duration,
}

impl Freezer {
    pub fn new(
        pool: Arc<CandidatePool>,
        frozen_chain: Arc<dyn FrozenChain>,
        vote_registry: Arc<dyn VoteRegistry>,
        node_registry: Arc<dyn NodeRegistry>,
    ) -> Self {
        Self {
            pool,
            frozen_chain,
            vote_registry,
            node_registry,
            dwell: Duration::from_millis(crate::constants::FREEZE_DWELL_MS),
        }
    }

    /// Overrides the dwell duration — tests use this to avoid sleeping the
    /// full 500ms; the dwell is a cooperative yield, not a wall-clock
    /// requirement on the *caller's* side.
    pub fn with_dwell(mut self, dwell: Duration) -> Self {
        self.dwell = dwell;
        self
    }

    fn voting_pool_size(&self) -> u64 {
        if self.frozen_chain.in_genesis_cycle() {
            self.node_registry.mesh_size()
        } else {
            self.frozen_chain.current_cycle_length()
        }
    }

    fn threshold(&self, h: u64, pool_size: u64) -> u64 {
        match self.pool.threshold_override(h) {
            Some(percent) => pool_size * percent as u64 / 100,
            None => pool_size * DEFAULT_FREEZE_THRESHOLD_PERCENT as u64 / 100,
        }
    }

    /// Runs one freezing pass for `frozen_edge_height + 1`.
    pub async fn tick(&self) -> FreezeOutcome {
        let h = self.frozen_chain.frozen_edge_height() + 1;
        let pool_size = self.voting_pool_size();
        let threshold = self.threshold(h, pool_size);

        let Some((leader_hash, votes)) = self.vote_registry.leading_hash(h) else {
            return FreezeOutcome::NoLeader;
        };
        if votes as u64 <= threshold {
            return FreezeOutcome::BelowThreshold;
        }

        // No pool lock is held across this sleep — nothing above takes one.
        tokio::time::sleep(self.dwell).await;

        let Some((leader_hash_after, votes_after)) = self.vote_registry.leading_hash(h) else {
            return FreezeOutcome::Flickered;
        };
        if votes_after as u64 <= threshold || leader_hash_after != leader_hash {
            return FreezeOutcome::Flickered;
        }

        let Some(block) = self.pool.get(h, leader_hash_after) else {
            return FreezeOutcome::Flickered;
        };

        if let Err(err) = self.frozen_chain.freeze(block).await {
            tracing::warn!(height = h, error = %err, "freeze failed");
            return FreezeOutcome::Flickered;
        }

        let new_edge = self.frozen_chain.frozen_edge_height();
        if new_edge >= h {
            self.pool.purge_at_or_below(new_edge);
            self.pool.purge_overrides_at_or_below(new_edge);
            tracing::info!(height = h, new_edge, "froze block and reclaimed pool");
            FreezeOutcome::Frozen { height: h }
        } else {
            FreezeOutcome::Flickered
        }
    }
}
