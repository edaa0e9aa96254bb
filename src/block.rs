//! The `Block` type. Immutable once constructed; opaque to the rest of
//! this core beyond the fields and methods it exposes here.

use crate::types::Hash256;
use ed25519_dalek::{Signature, Verifier, VerifyingKey};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// A candidate block proposed by a peer for a height past the frozen edge.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Block {
    pub height: u64,
    pub hash: Hash256,
    pub previous_hash: Hash256,
    /// Wall-clock moment the verifier claims to have produced this block.
    pub verification_timestamp: i64,
    /// Earliest moment any honest verifier may cast a vote for this block.
    pub minimum_vote_timestamp: i64,
    pub balance_list_hash: Hash256,
    /// The bytes the signature commits to (implementation detail: in a real
    /// node this is the block's canonical encoding minus the signature).
    pub signed_content: Vec<u8>,
    pub signature: [u8; 64],
    pub signer_public_key: [u8; 32],
}

impl Block {
    /// Verifies the block's ed25519 signature over `signed_content`.
    ///
    /// Parses key and signature bytes and verifies; any malformed encoding
    /// is treated as invalid rather than propagated as an error — malformed
    /// peer input is never an error in this core.
    pub fn signature_is_valid(&self) -> bool {
        let Ok(public_key) = VerifyingKey::from_bytes(&self.signer_public_key) else {
            return false;
        };
        let signature = Signature::from_bytes(&self.signature);
        public_key.verify(&self.signed_content, &signature).is_ok()
    }

    /// A deterministic preference order over competing blocks at the same
    /// height — lower is preferred.
    ///
    /// Combines the block's age relative to `frozen_edge_height` with a
    /// hash-derived pseudo-random component to get a stable ordering out of
    /// content hashes alone. Chain-score semantics beyond "deterministic,
    /// lower preferred" are an external protocol concern this core does not
    /// need to know about.
    pub fn chain_score(&self, frozen_edge_height: u64) -> i64 {
        let age = self.height.saturating_sub(frozen_edge_height) as i64;
        let mut hasher = Sha256::new();
        hasher.update(self.hash);
        hasher.update(frozen_edge_height.to_le_bytes());
        let digest = hasher.finalize();
        let entropy = u32::from_le_bytes([digest[0], digest[1], digest[2], digest[3]]) as i64;
        age * 1_000_000 + entropy
    }
}
