//! `CandidatePool` — stores admitted blocks indexed by `(height, hash)`
//! and enforces the per-height cap.

use crate::block::Block;
use crate::constants::{MAX_BLOCKS_PER_HEIGHT, MAX_THRESHOLD_PERCENT, MIN_THRESHOLD_PERCENT};
use crate::types::{Hash256, HashOverrides, ThresholdOverrides, ZERO_HASH};
use parking_lot::Mutex;
use std::collections::HashMap;

#[derive(Default)]
struct PoolState {
    unfrozen_blocks: HashMap<u64, HashMap<Hash256, Block>>,
    threshold_overrides: HashMap<u64, u8>,
    hash_overrides: HashMap<u64, Hash256>,
}

/// The unfrozen-block store. All public operations are mutually exclusive
/// critical sections guarded by a single lock — never held across an
/// `.await` point by any caller in this crate.
pub struct CandidatePool {
    state: Mutex<PoolState>,
}

impl Default for CandidatePool {
    fn default() -> Self {
        Self::new()
    }
}

impl CandidatePool {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(PoolState::default()),
        }
    }

    /// Inserts `block` at `(height, hash)`. If this would push the height
    /// over [`MAX_BLOCKS_PER_HEIGHT`] (and the node is not in the genesis
    /// cycle), evicts the single worst-scored block among the new block and
    /// the existing ones — ties keep the newcomer.
    pub fn register(&self, height: u64, hash: Hash256, block: Block, in_genesis_cycle: bool, frozen_edge_height: u64) {
        let mut state = self.state.lock();
        let at_height = state.unfrozen_blocks.entry(height).or_default();
        at_height.insert(hash, block);

        if in_genesis_cycle || at_height.len() <= MAX_BLOCKS_PER_HEIGHT {
            return;
        }

        // Seed the incumbent "worst" with the newcomer, so a strictly higher
        // score is required to displace it.
        let newcomer_score = at_height[&hash].chain_score(frozen_edge_height);
        let mut worst_hash = hash;
        let mut worst_score = newcomer_score;
        for (candidate_hash, candidate_block) in at_height.iter() {
            let score = candidate_block.chain_score(frozen_edge_height);
            if score > worst_score {
                worst_score = score;
                worst_hash = *candidate_hash;
            }
        }
        at_height.remove(&worst_hash);
    }

    pub fn get(&self, height: u64, hash: Hash256) -> Option<Block> {
        self.state
            .lock()
            .unfrozen_blocks
            .get(&height)
            .and_then(|m| m.get(&hash))
            .cloned()
    }

    /// Snapshot of the set of heights currently holding at least one block.
    pub fn heights(&self) -> Vec<u64> {
        self.state.lock().unfrozen_blocks.keys().copied().collect()
    }

    pub fn count(&self, height: u64) -> u32 {
        self.state
            .lock()
            .unfrozen_blocks
            .get(&height)
            .map(|m| m.len() as u32)
            .unwrap_or(0)
    }

    /// Snapshot of every block at `height`.
    pub fn blocks_at(&self, height: u64) -> Vec<Block> {
        self.state
            .lock()
            .unfrozen_blocks
            .get(&height)
            .map(|m| m.values().cloned().collect())
            .unwrap_or_default()
    }

    /// Snapshot of every block across every height.
    pub fn all(&self) -> Vec<Block> {
        self.state
            .lock()
            .unfrozen_blocks
            .values()
            .flat_map(|m| m.values().cloned())
            .collect()
    }

    /// Drops every entry with `height <= h`. Invoked synchronously with a
    /// freeze.
    pub fn purge_at_or_below(&self, h: u64) {
        self.state.lock().unfrozen_blocks.retain(|height, _| *height > h);
    }

    pub fn clear(&self) {
        let mut state = self.state.lock();
        state.unfrozen_blocks.clear();
    }

    /// `percent == 0` removes the override; `percent >= 100` is silently
    /// ignored.
    pub fn set_threshold_override(&self, height: u64, percent: u8) {
        let mut state = self.state.lock();
        if percent == 0 {
            state.threshold_overrides.remove(&height);
        } else if (MIN_THRESHOLD_PERCENT..=MAX_THRESHOLD_PERCENT).contains(&percent) {
            state.threshold_overrides.insert(height, percent);
        } else {
            tracing::warn!(height, percent, "ignoring out-of-range threshold override");
        }
    }

    pub fn threshold_override(&self, height: u64) -> Option<u8> {
        self.state.lock().threshold_overrides.get(&height).copied()
    }

    pub fn get_threshold_overrides(&self) -> ThresholdOverrides {
        self.state.lock().threshold_overrides.clone()
    }

    /// An all-zero hash removes the override.
    pub fn set_hash_override(&self, height: u64, hash: Hash256) {
        let mut state = self.state.lock();
        if hash == ZERO_HASH {
            state.hash_overrides.remove(&height);
        } else {
            state.hash_overrides.insert(height, hash);
        }
    }

    pub fn hash_override(&self, height: u64) -> Option<Hash256> {
        self.state.lock().hash_overrides.get(&height).copied()
    }

    pub fn get_hash_overrides(&self) -> HashOverrides {
        self.state.lock().hash_overrides.clone()
    }

    /// Drops overrides at or below `h`, called as part of freeze reclaim.
    pub fn purge_overrides_at_or_below(&self, h: u64) {
        let mut state = self.state.lock();
        state.threshold_overrides.retain(|height, _| *height > h);
        state.hash_overrides.retain(|height, _| *height > h);
    }
}
