use thiserror::Error;

/// Errors surfaced by collaborator calls. Rejections that are normal in
/// adversarial operation (bad signatures, stale heights, duplicates...) are
/// never represented here — `Admission::admit` just returns `false`.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("frozen chain collaborator error: {0}")]
    FrozenChain(String),

    #[error("balance engine could not compute a balance list: {0}")]
    BalanceEngine(String),

    #[error("mesh transport error: {0}")]
    MeshTransport(String),
}
