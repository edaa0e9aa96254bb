//! In-memory collaborator test doubles — plain structs implementing the
//! real traits over `Mutex`-guarded state, no mocking framework.

use crate::block::Block;
use crate::collaborators::{BalanceEngine, Clock, FrozenChain, MeshTransport, NodeRegistry, VoteRegistry};
use crate::error::CoreError;
use crate::types::{BlockVote, Hash256, VoterId};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;

pub struct InMemoryFrozenChain {
    frozen_edge_height: Mutex<u64>,
    in_genesis_cycle: Mutex<bool>,
    cycle_length: Mutex<u64>,
    open_edge_height: Mutex<u64>,
    pub frozen: Mutex<Vec<Block>>,
}

impl InMemoryFrozenChain {
    pub fn new(frozen_edge_height: u64) -> Self {
        Self {
            frozen_edge_height: Mutex::new(frozen_edge_height),
            in_genesis_cycle: Mutex::new(false),
            cycle_length: Mutex::new(8),
            open_edge_height: Mutex::new(u64::MAX),
            frozen: Mutex::new(Vec::new()),
        }
    }

    pub fn set_in_genesis_cycle(&self, value: bool) {
        *self.in_genesis_cycle.lock() = value;
    }

    pub fn set_cycle_length(&self, value: u64) {
        *self.cycle_length.lock() = value;
    }

    pub fn set_open_edge_height(&self, value: u64) {
        *self.open_edge_height.lock() = value;
    }

    pub fn set_frozen_edge_height(&self, value: u64) {
        *self.frozen_edge_height.lock() = value;
    }
}

#[async_trait]
impl FrozenChain for InMemoryFrozenChain {
    fn frozen_edge_height(&self) -> u64 {
        *self.frozen_edge_height.lock()
    }

    async fn freeze(&self, block: Block) -> Result<(), CoreError> {
        let mut edge = self.frozen_edge_height.lock();
        *edge = block.height;
        self.frozen.lock().push(block);
        Ok(())
    }

    fn in_genesis_cycle(&self) -> bool {
        *self.in_genesis_cycle.lock()
    }

    fn current_cycle_length(&self) -> u64 {
        *self.cycle_length.lock()
    }

    fn open_edge_height(&self, _lenient: bool) -> u64 {
        *self.open_edge_height.lock()
    }
}

pub struct FixedBalanceEngine {
    hash: Option<Hash256>,
}

impl FixedBalanceEngine {
    /// Always returns the block's own `balance_list_hash` (i.e. admission
    /// always passes the balance check).
    pub fn always_matching() -> Self {
        Self { hash: None }
    }

    /// Always returns a fixed hash, regardless of the block.
    pub fn fixed(hash: Hash256) -> Self {
        Self { hash: Some(hash) }
    }
}

#[async_trait]
impl BalanceEngine for FixedBalanceEngine {
    async fn compute_balance_list_hash(&self, block: &Block) -> Option<Hash256> {
        Some(self.hash.unwrap_or(block.balance_list_hash))
    }
}

pub struct InMemoryVoteRegistry {
    votes: Mutex<HashMap<u64, HashMap<VoterId, Hash256>>>,
    local_voter: VoterId,
}

impl InMemoryVoteRegistry {
    pub fn new(local_voter: VoterId) -> Self {
        Self {
            votes: Mutex::new(HashMap::new()),
            local_voter,
        }
    }

    pub fn seed_votes(&self, height: u64, hash: Hash256, count: u32) {
        let mut votes = self.votes.lock();
        let at_height = votes.entry(height).or_default();
        for i in 0..count {
            at_height.insert(VoterId(format!("seed-{i}")), hash);
        }
    }
}

impl VoteRegistry for InMemoryVoteRegistry {
    fn leading_hash(&self, height: u64) -> Option<(Hash256, u32)> {
        let votes = self.votes.lock();
        let at_height = votes.get(&height)?;
        let mut counts: HashMap<Hash256, u32> = HashMap::new();
        for hash in at_height.values() {
            *counts.entry(*hash).or_insert(0) += 1;
        }
        counts.into_iter().max_by_key(|(_, count)| *count)
    }

    fn local_vote(&self, height: u64) -> Option<Hash256> {
        self.votes
            .lock()
            .get(&height)
            .and_then(|m| m.get(&self.local_voter))
            .copied()
    }

    fn register_vote(&self, voter: VoterId, vote: BlockVote) {
        self.votes
            .lock()
            .entry(vote.height)
            .or_default()
            .insert(voter, vote.hash);
    }

    fn heights(&self) -> Vec<u64> {
        self.votes.lock().keys().copied().collect()
    }

    fn hashes_for(&self, height: u64) -> Vec<Hash256> {
        self.votes
            .lock()
            .get(&height)
            .map(|m| m.values().copied().collect())
            .unwrap_or_default()
    }
}

#[derive(Default)]
pub struct InMemoryMeshTransport {
    pub broadcasts: Mutex<Vec<BlockVote>>,
    pub blocks: Mutex<HashMap<(u64, Hash256), Block>>,
}

#[async_trait]
impl MeshTransport for InMemoryMeshTransport {
    async fn broadcast_vote(&self, vote: BlockVote) {
        self.broadcasts.lock().push(vote);
    }

    async fn fetch_block(&self, height: u64, hash: Hash256) -> Option<Block> {
        self.blocks.lock().get(&(height, hash)).cloned()
    }
}

pub struct FixedNodeRegistry(pub u64);

impl NodeRegistry for FixedNodeRegistry {
    fn mesh_size(&self) -> u64 {
        self.0
    }
}

pub struct FixedClock(pub Mutex<i64>);

impl FixedClock {
    pub fn new(now_ms: i64) -> Self {
        Self(Mutex::new(now_ms))
    }

    pub fn set(&self, now_ms: i64) {
        *self.0.lock() = now_ms;
    }

    pub fn advance(&self, delta_ms: i64) {
        *self.0.lock() += delta_ms;
    }
}

impl Clock for FixedClock {
    fn now_ms(&self) -> i64 {
        *self.0.lock()
    }
}
