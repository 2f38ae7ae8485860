use thiserror::Error;

/// Errors that can occur while playing or searching a game
#[derive(Error, Debug)]
pub enum ArenaError {
    #[error("Invalid move: {0}")]
    InvalidMove(String),

    #[error("The game is still running")]
    GameNotFinished,

    #[error("Unsupported game variant: {0} (available: chess, tic_tac_toe, connect4)")]
    UnsupportedGame(String),

    #[error("No legal moves available")]
    NoLegalMoves,

    #[error("Engine communication failed: {0}")]
    EngineCommunication(String),

    #[error("Invalid position: {0}")]
    InvalidPosition(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Convenience Result type for arena operations
pub type Result<T> = std::result::Result<T, ArenaError>;
