//! Wire payload shapes for missing-block recovery. `BlockVote` lives in
//! [`crate::types`] since it doubles as internal vote-registry currency.

use crate::block::Block;
use crate::types::Hash256;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MissingBlockRequest {
    pub height: u64,
    pub hash: Hash256,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MissingBlockResponse {
    pub block: Option<Block>,
}
