//! `Admission` — validates and registers a newly observed block.

use crate::block::Block;
use crate::candidate_pool::CandidatePool;
use crate::collaborators::{BalanceEngine, FrozenChain};
use std::sync::Arc;

/// Why `admit` rejected a block — recorded into an optional diagnostic-sink
/// out-parameter. Never surfaced as an error; these are expected under flood.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdmissionRejection {
    HeightAtOrBelowFrozenEdge,
    HeightBeyondOpenEdge,
    InvalidSignature,
    DuplicateHash,
    VerificationIntervalViolation,
    BalanceListMismatch,
}

/// Minimum spacing (ms) between predecessor and block verification
/// timestamps. Protocol-wide; exposed so a node can wire it from shared
/// configuration.
pub const MIN_VERIFICATION_INTERVAL_MS: i64 = 0;

pub struct Admission {
    pool: Arc<CandidatePool>,
    frozen_chain: Arc<dyn FrozenChain>,
    balance_engine: Arc<dyn BalanceEngine>,
    min_verification_interval_ms: i64,
}

impl Admission {
    pub fn new(
        pool: Arc<CandidatePool>,
        frozen_chain: Arc<dyn FrozenChain>,
        balance_engine: Arc<dyn BalanceEngine>,
    ) -> Self {
        Self {
            pool,
            frozen_chain,
            balance_engine,
            min_verification_interval_ms: MIN_VERIFICATION_INTERVAL_MS,
        }
    }

    pub fn with_min_verification_interval_ms(mut self, interval_ms: i64) -> Self {
        self.min_verification_interval_ms = interval_ms;
        self
    }

    /// Validates and, on success, registers `block`. Returns `true` iff
    /// admitted. Rejections are recorded into `diagnostics` if provided, but
    /// never propagated as errors.
    pub async fn admit(&self, block: Block, mut diagnostics: Option<&mut Vec<AdmissionRejection>>) -> bool {
        let mut reject = |reason: AdmissionRejection| {
            if let Some(sink) = diagnostics.as_deref_mut() {
                sink.push(reason.clone());
            }
            tracing::trace!(?reason, height = block.height, "admission rejected block");
        };

        let frozen_edge_height = self.frozen_chain.frozen_edge_height();
        if block.height <= frozen_edge_height {
            reject(AdmissionRejection::HeightAtOrBelowFrozenEdge);
            return false;
        }

        if block.height > self.frozen_chain.open_edge_height(true) {
            reject(AdmissionRejection::HeightBeyondOpenEdge);
            return false;
        }

        if !block.signature_is_valid() {
            reject(AdmissionRejection::InvalidSignature);
            return false;
        }

        if self.pool.get(block.height, block.hash).is_some() {
            reject(AdmissionRejection::DuplicateHash);
            return false;
        }

        // Predecessor interval check is skipped entirely when the
        // predecessor is unknown — leniency, not an oversight to "fix".
        if let Some(previous) = self.pool.get(block.height.saturating_sub(1), block.previous_hash) {
            if previous.verification_timestamp
                > block.verification_timestamp - self.min_verification_interval_ms
            {
                reject(AdmissionRejection::VerificationIntervalViolation);
                return false;
            }
        }

        match self.balance_engine.compute_balance_list_hash(&block).await {
            Some(hash) if hash == block.balance_list_hash => {}
            _ => {
                reject(AdmissionRejection::BalanceListMismatch);
                return false;
            }
        }

        let in_genesis_cycle = self.frozen_chain.in_genesis_cycle();
        self.pool
            .register(block.height, block.hash, block, in_genesis_cycle, frozen_edge_height);
        true
    }
}
