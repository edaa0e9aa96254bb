//! `ConsensusCore` wires the six components together and exposes the
//! operator control surface: a single owning value holding `Arc`s to every
//! collaborator and component, handed to whatever drives the periodic tick.

use crate::admission::Admission;
use crate::bootstrap_tally::BootstrapTally;
use crate::candidate_pool::CandidatePool;
use crate::collaborators::{BalanceEngine, Clock, FrozenChain, MeshTransport, NodeRegistry, VoteRegistry};
use crate::freezer::{FreezeOutcome, Freezer};
use crate::missing_block_fetcher::MissingBlockFetcher;
use crate::types::{Hash256, HashOverrides, ThresholdOverrides, VoterId};
use crate::vote_decider::VoteDecider;
use std::sync::Arc;

/// Owns the candidate pool and the components built on top of it. Built once
/// per node and shared (behind an `Arc`) with whatever task drives ticks.
pub struct ConsensusCore {
    pool: Arc<CandidatePool>,
    admission: Arc<Admission>,
    vote_decider: VoteDecider,
    freezer: Freezer,
    missing_block_fetcher: MissingBlockFetcher,
    pub bootstrap_tally: BootstrapTally,
}

impl ConsensusCore {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        frozen_chain: Arc<dyn FrozenChain>,
        balance_engine: Arc<dyn BalanceEngine>,
        vote_registry: Arc<dyn VoteRegistry>,
        transport: Arc<dyn MeshTransport>,
        node_registry: Arc<dyn NodeRegistry>,
        clock: Arc<dyn Clock>,
        local_voter: VoterId,
    ) -> Self {
        let pool = Arc::new(CandidatePool::new());
        let admission = Arc::new(Admission::new(pool.clone(), frozen_chain.clone(), balance_engine));
        let vote_decider = VoteDecider::new(
            pool.clone(),
            frozen_chain.clone(),
            vote_registry.clone(),
            node_registry.clone(),
            transport.clone(),
            clock,
            local_voter,
        );
        let freezer = Freezer::new(pool.clone(), frozen_chain.clone(), vote_registry.clone(), node_registry);
        let missing_block_fetcher =
            MissingBlockFetcher::new(pool.clone(), frozen_chain, vote_registry, transport, admission.clone());

        Self {
            pool,
            admission,
            vote_decider,
            freezer,
            missing_block_fetcher,
            bootstrap_tally: BootstrapTally::new(),
        }
    }

    pub fn admission(&self) -> &Admission {
        &self.admission
    }

    /// Runs one vote-decision pass for the current unfrozen height.
    pub async fn tick_vote(&self) {
        self.vote_decider.tick().await;
    }

    /// Runs one freeze attempt for the current unfrozen height.
    pub async fn tick_freeze(&self) -> FreezeOutcome {
        self.freezer.tick().await
    }

    /// Sweeps for blocks this node has votes for but has never seen.
    pub async fn sweep_missing_blocks(&self) {
        self.missing_block_fetcher.sweep().await;
    }

    /// Fetches a single targeted block.
    pub async fn fetch_block(&self, height: u64, hash: Hash256) {
        self.missing_block_fetcher.fetch(height, hash).await;
    }

    // Operator control surface.

    pub fn set_threshold_override(&self, height: u64, percent: u8) {
        self.pool.set_threshold_override(height, percent);
    }

    pub fn set_hash_override(&self, height: u64, hash: Hash256) {
        self.pool.set_hash_override(height, hash);
    }

    pub fn get_threshold_overrides(&self) -> ThresholdOverrides {
        self.pool.get_threshold_overrides()
    }

    pub fn get_hash_overrides(&self) -> HashOverrides {
        self.pool.get_hash_overrides()
    }

    /// Clears the candidate pool for debugging or resync. Overrides are left
    /// untouched — they are operator state, not pool state.
    pub fn purge(&self) {
        self.pool.clear();
    }
}
