//! `BootstrapTally` — tallies peer `(tip_hash, tip_height)` votes cast
//! during startup sync. One instance per bootstrap attempt, with its
//! own lock independent of `CandidatePool`'s.

use crate::types::{Hash256, VoterId};
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};

#[derive(Default)]
struct TallyState {
    voters: HashSet<VoterId>,
    counts: HashMap<(Hash256, u64), u32>,
}

pub struct BootstrapTally {
    state: Mutex<TallyState>,
}

impl Default for BootstrapTally {
    fn default() -> Self {
        Self::new()
    }
}

impl BootstrapTally {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(TallyState::default()),
        }
    }

    /// Records a vote from `voter` for `(hash, start_height)`. A voter's
    /// first vote is binding — later votes from the same identifier are
    /// ignored, so a peer cannot skew the tally by re-voting as it learns
    /// more about the network.
    pub fn vote(&self, voter: VoterId, hash: Hash256, start_height: u64) {
        let mut state = self.state.lock();
        if !state.voters.insert(voter) {
            return;
        }
        *state.counts.entry((hash, start_height)).or_insert(0) += 1;
    }

    pub fn total_votes(&self) -> u32 {
        self.state.lock().counts.values().sum()
    }

    /// The entry with the highest count. Ties are broken deterministically
    /// by sorting on `(hash, start_height)` and taking the last, rather than
    /// depending on hash-map iteration order.
    pub fn winner(&self) -> Option<(Hash256, u64, u32)> {
        let state = self.state.lock();
        let mut entries: Vec<_> = state.counts.iter().collect();
        entries.sort_by_key(|(key, _)| **key);
        entries
            .into_iter()
            .max_by_key(|(key, count)| (**count, **key))
            .map(|((hash, start_height), count)| (*hash, *start_height, *count))
    }
}
