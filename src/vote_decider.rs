//! `VoteDecider` — computes and, on change, broadcasts this node's vote
//! for `frozen_edge_height + 1`.

use crate::block::Block;
use crate::candidate_pool::CandidatePool;
use crate::collaborators::{Clock, FrozenChain, MeshTransport, NodeRegistry, VoteRegistry};
use crate::constants::CONSENSUS_FOLLOW_FALLBACK_MS;
use crate::types::{BlockVote, Hash256, VoterId};
use std::sync::Arc;

pub struct VoteDecider {
    pool: Arc<CandidatePool>,
    frozen_chain: Arc<dyn FrozenChain>,
    vote_registry: Arc<dyn VoteRegistry>,
    node_registry: Arc<dyn NodeRegistry>,
    transport: Arc<dyn MeshTransport>,
    clock: Arc<dyn Clock>,
    local_voter: VoterId,
}

impl VoteDecider {
    pub fn new(
        pool: Arc<CandidatePool>,
        frozen_chain: Arc<dyn FrozenChain>,
        vote_registry: Arc<dyn VoteRegistry>,
        node_registry: Arc<dyn NodeRegistry>,
        transport: Arc<dyn MeshTransport>,
        clock: Arc<dyn Clock>,
        local_voter: VoterId,
    ) -> Self {
        Self {
            pool,
            frozen_chain,
            vote_registry,
            node_registry,
            transport,
            clock,
            local_voter,
        }
    }

    fn voting_pool_size(&self) -> u64 {
        if self.frozen_chain.in_genesis_cycle() {
            self.node_registry.mesh_size()
        } else {
            self.frozen_chain.current_cycle_length()
        }
    }

    /// The override → consensus-follow → self-choice decision chain, with no
    /// side effects — unit-testable without a transport.
    fn decide_vote(&self, h: u64, now: i64) -> Option<Hash256> {
        if let Some(forced) = self.pool.hash_override(h) {
            return Some(forced);
        }

        if let Some((leader_hash, votes)) = self.vote_registry.leading_hash(h) {
            if let Some(leader_block) = self.pool.get(h, leader_hash) {
                let pool_size = self.voting_pool_size();
                let has_majority = votes as u64 > pool_size / 2
                    && leader_block.minimum_vote_timestamp <= now;
                let fallback_expired =
                    leader_block.minimum_vote_timestamp < now - CONSENSUS_FOLLOW_FALLBACK_MS;
                if has_majority || fallback_expired {
                    return Some(leader_hash);
                }
            }
        }

        let candidates = self.pool.blocks_at(h);
        let frozen_edge_height = self.frozen_chain.frozen_edge_height();
        let best = candidates
            .iter()
            .min_by_key(|block: &&Block| block.chain_score(frozen_edge_height));
        best.filter(|block| block.minimum_vote_timestamp <= now)
            .map(|block| block.hash)
    }

    /// Runs one tick: decides a vote for `frozen_edge_height + 1` and, if it
    /// differs from the locally-registered vote, broadcasts and registers
    /// it. No-op if there are no candidates at that height.
    pub async fn tick(&self) {
        let h = self.frozen_chain.frozen_edge_height() + 1;
        if self.pool.blocks_at(h).is_empty() {
            return;
        }

        let now = self.clock.now_ms();
        let Some(new_vote_hash) = self.decide_vote(h, now) else {
            return;
        };

        if self.vote_registry.local_vote(h) == Some(new_vote_hash) {
            return;
        }

        let vote = BlockVote {
            height: h,
            hash: new_vote_hash,
            timestamp: now,
        };
        self.transport.broadcast_vote(vote.clone()).await;
        self.vote_registry
            .register_vote(self.local_voter.clone(), vote);
        tracing::debug!(height = h, hash = %hex::encode(new_vote_hash), "vote changed");
    }
}
