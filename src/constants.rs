//! Protocol constants for the unfrozen-block consensus core.

/// Maximum blocks retained per height outside the genesis cycle.
pub const MAX_BLOCKS_PER_HEIGHT: usize = 500;

/// Default freezing threshold when no `threshold_overrides` entry exists, as
/// a percent in `[1, 99]`.
pub const DEFAULT_FREEZE_THRESHOLD_PERCENT: u8 = 75;

/// `VoteDecider`'s ten-second fallback delay: a candidate's
/// `minimum_vote_timestamp` may win without majority once it is this old.
pub const CONSENSUS_FOLLOW_FALLBACK_MS: i64 = 10_000;

/// `Freezer`'s dwell between the pre- and post-sleep leader re-check.
pub const FREEZE_DWELL_MS: u64 = 500;

/// Lower/upper bounds accepted by `set_threshold_override`. Values
/// outside `[1, 99]` are silently ignored, except `0` which means "remove".
pub const MIN_THRESHOLD_PERCENT: u8 = 1;
pub const MAX_THRESHOLD_PERCENT: u8 = 99;
