use thiserror::Error;

/// Validation failures raised before any rating arithmetic runs.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RatingError {
    #[error("Unknown character '{0}'")]
    UnknownCharacter(String),

    #[error("Player '{0}' appears more than once")]
    DuplicateParticipant(String),

    #[error("At least {min} participants are required, got {actual}")]
    InsufficientParticipants { min: usize, actual: usize },

    #[error("At most {max} participants are allowed, got {actual}")]
    TooManyParticipants { max: usize, actual: usize },

    #[error("Invalid winner '{0}', expected 'p1' or 'p2'")]
    InvalidWinner(String),

    #[error("Player name must not be empty")]
    EmptyPlayerName,

    /// Only produced while ordering a log for replay, where it is recovered
    /// by assigning a synthetic position.
    #[error("Unparseable timestamp '{0}'")]
    UnparseableTimestamp(String),

    #[error("Player '{0}' not found")]
    MissingPlayer(String)
}
