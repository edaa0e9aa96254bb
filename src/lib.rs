//! Unfrozen-block consensus core: admission, voting, freezing, and
//! bootstrap-sync tally for candidate blocks past the frozen chain edge.
//!
//! This crate owns only the pool of not-yet-frozen blocks and the decision
//! logic around it. Persistence, balance computation, networking, mesh
//! membership, and wall-clock time are injected via the traits in
//! [`collaborators`]; a node binary supplies concrete implementations and
//! drives [`core::ConsensusCore`]'s tick methods on a schedule.

pub mod admission;
pub mod block;
pub mod bootstrap_tally;
pub mod candidate_pool;
pub mod collaborators;
pub mod constants;
pub mod core;
pub mod error;
pub mod freezer;
pub mod missing_block_fetcher;
pub mod types;
pub mod vote_decider;
pub mod wire;

#[cfg(test)]
pub mod testing;

pub use block::Block;
pub use core::ConsensusCore;
pub use error::CoreError;
