use thiserror::Error;

/// Errors that can surface to the user of the crate.
///
/// Rejected moves and ticks are not errors; see [`crate::game::MoveOutcome`]
/// and [`crate::game::TickOutcome`].
#[derive(Debug, Error)]
pub enum MazeError {
    #[error("unknown difficulty `{0}` (expected easy, medium or hard)")]
    UnknownDifficulty(String),
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),
}
