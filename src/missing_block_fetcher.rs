//! `MissingBlockFetcher` — pulls blocks this node has votes for but has
//! never seen, re-admitting them through the normal admission path.

use crate::admission::Admission;
use crate::collaborators::{FrozenChain, MeshTransport, VoteRegistry};
use crate::candidate_pool::CandidatePool;
use crate::types::Hash256;
use futures::future::join_all;
use std::sync::Arc;

pub struct MissingBlockFetcher {
    pool: Arc<CandidatePool>,
    frozen_chain: Arc<dyn FrozenChain>,
    vote_registry: Arc<dyn VoteRegistry>,
    transport: Arc<dyn MeshTransport>,
    admission: Arc<Admission>,
}

impl MissingBlockFetcher {
    pub fn new(
        pool: Arc<CandidatePool>,
        frozen_chain: Arc<dyn FrozenChain>,
        vote_registry: Arc<dyn VoteRegistry>,
        transport: Arc<dyn MeshTransport>,
        admission: Arc<Admission>,
    ) -> Self {
        Self {
            pool,
            frozen_chain,
            vote_registry,
            transport,
            admission,
        }
    }

    /// Fetches `(height, hash)` from a peer and, if returned, feeds it back
    /// through admission. Silently drops a response whose hash doesn't match
    /// what was asked for.
    pub async fn fetch(&self, height: u64, hash: Hash256) {
        let Some(block) = self.transport.fetch_block(height, hash).await else {
            return;
        };
        if block.height != height || block.hash != hash {
            tracing::warn!(height, hash = %hex::encode(hash), "dropping mismatched fetch response");
            return;
        }
        self.admission.admit(block, None).await;
    }

    /// Scans every voted-on height/hash pair past the frozen edge and not
    /// already present in the pool, and fetches them concurrently. Heights
    /// at or below the frozen edge are skipped — `VoteRegistry` is an
    /// externally-lifecycled collaborator this core doesn't purge, so it may
    /// still carry votes for heights already frozen.
    pub async fn sweep(&self) {
        let frozen_edge_height = self.frozen_chain.frozen_edge_height();
        let mut targets = Vec::new();
        for height in self.vote_registry.heights() {
            if height <= frozen_edge_height {
                continue;
            }
            for hash in self.vote_registry.hashes_for(height) {
                if self.pool.get(height, hash).is_none() {
                    targets.push((height, hash));
                }
            }
        }

        if targets.is_empty() {
            return;
        }
        tracing::debug!(count = targets.len(), "sweeping for missing blocks");
        join_all(targets.into_iter().map(|(height, hash)| self.fetch(height, hash))).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::test_support::signed_block;
    use crate::testing::{FixedBalanceEngine, InMemoryFrozenChain, InMemoryMeshTransport, InMemoryVoteRegistry};
    use crate::types::{BlockVote, VoterId};

    #[tokio::test]
    async fn sweep_fetches_voted_but_unseen_blocks() {
        let pool = Arc::new(CandidatePool::new());
        let frozen_chain = Arc::new(InMemoryFrozenChain::new(100));
        let balance_engine = Arc::new(FixedBalanceEngine::always_matching());
        let admission = Arc::new(Admission::new(pool.clone(), frozen_chain.clone(), balance_engine));

        let vote_registry = Arc::new(InMemoryVoteRegistry::new(VoterId("local".to_string())));
        let hash = [3u8; 32];
        vote_registry.register_vote(
            VoterId("peer".to_string()),
            BlockVote {
                height: 101,
                hash,
                timestamp: 0,
            },
        );

        let transport = Arc::new(InMemoryMeshTransport::default());
        transport
            .blocks
            .lock()
            .insert((101, hash), signed_block(101, hash, [9u8; 32]));

        let fetcher = MissingBlockFetcher::new(pool.clone(), frozen_chain, vote_registry, transport, admission);
        fetcher.sweep().await;

        assert!(pool.get(101, hash).is_some());
    }

    #[tokio::test]
    async fn sweep_skips_heights_at_or_below_frozen_edge() {
        let pool = Arc::new(CandidatePool::new());
        let frozen_chain = Arc::new(InMemoryFrozenChain::new(101));
        let balance_engine = Arc::new(FixedBalanceEngine::always_matching());
        let admission = Arc::new(Admission::new(pool.clone(), frozen_chain.clone(), balance_engine));

        let vote_registry = Arc::new(InMemoryVoteRegistry::new(VoterId("local".to_string())));
        let hash = [3u8; 32];
        vote_registry.register_vote(
            VoterId("peer".to_string()),
            BlockVote {
                height: 101,
                hash,
                timestamp: 0,
            },
        );

        let transport = Arc::new(InMemoryMeshTransport::default());
        transport
            .blocks
            .lock()
            .insert((101, hash), signed_block(101, hash, [9u8; 32]));

        let fetcher = MissingBlockFetcher::new(pool.clone(), frozen_chain, vote_registry, transport, admission);
        fetcher.sweep().await;

        // height 101 is already frozen, so it must never have been fetched.
        assert!(pool.get(101, hash).is_none());
    }

    #[tokio::test]
    async fn sweep_skips_heights_already_in_pool() {
        let pool = Arc::new(CandidatePool::new());
        let frozen_chain = Arc::new(InMemoryFrozenChain::new(100));
        let balance_engine = Arc::new(FixedBalanceEngine::always_matching());
        let admission = Arc::new(Admission::new(pool.clone(), frozen_chain.clone(), balance_engine));

        let hash = [3u8; 32];
        pool.register(101, hash, signed_block(101, hash, [9u8; 32]), false, 100);

        let vote_registry = Arc::new(InMemoryVoteRegistry::new(VoterId("local".to_string())));
        vote_registry.register_vote(
            VoterId("peer".to_string()),
            BlockVote {
                height: 101,
                hash,
                timestamp: 0,
            },
        );

        let transport = Arc::new(InMemoryMeshTransport::default());
        let fetcher = MissingBlockFetcher::new(pool, frozen_chain, vote_registry, transport.clone(), admission);
        fetcher.sweep().await;

        // No fetch should have been attempted since the block is already
        // present; the transport's backing map was never consulted for it.
        assert!(transport.blocks.lock().is_empty());
    }

    #[tokio::test]
    async fn fetch_drops_mismatched_response() {
        let pool = Arc::new(CandidatePool::new());
        let frozen_chain = Arc::new(InMemoryFrozenChain::new(100));
        let balance_engine = Arc::new(FixedBalanceEngine::always_matching());
        let admission = Arc::new(Admission::new(pool.clone(), frozen_chain.clone(), balance_engine));
        let vote_registry = Arc::new(InMemoryVoteRegistry::new(VoterId("local".to_string())));

        let requested_hash = [3u8; 32];
        let wrong_hash = [4u8; 32];
        let transport = Arc::new(InMemoryMeshTransport::default());
        transport
            .blocks
            .lock()
            .insert((101, requested_hash), signed_block(101, wrong_hash, [9u8; 32]));

        let fetcher = MissingBlockFetcher::new(pool.clone(), frozen_chain, vote_registry, transport, admission);
        fetcher.fetch(101, requested_hash).await;

        assert!(pool.get(101, requested_hash).is_none());
        assert!(pool.get(101, wrong_hash).is_none());
    }

    #[tokio::test]
    async fn fetch_absorbs_peer_miss_silently() {
        let pool = Arc::new(CandidatePool::new());
        let frozen_chain = Arc::new(InMemoryFrozenChain::new(100));
        let balance_engine = Arc::new(FixedBalanceEngine::always_matching());
        let admission = Arc::new(Admission::new(pool.clone(), frozen_chain.clone(), balance_engine));
        let vote_registry = Arc::new(InMemoryVoteRegistry::new(VoterId("local".to_string())));
        let transport = Arc::new(InMemoryMeshTransport::default());

        let fetcher = MissingBlockFetcher::new(pool.clone(), frozen_chain, vote_registry, transport, admission);
        fetcher.fetch(101, [9u8; 32]).await;
        assert!(pool.get(101, [9u8; 32]).is_none());
    }
}
