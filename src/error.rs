use thiserror::Error;

#[derive(Error, Debug)]
pub enum GtoError {
    #[error("Invalid rank: {0}")]
    InvalidRank(char),

    #[error("Invalid suit: {0}")]
    InvalidSuit(char),

    #[error("Invalid card notation: {0}")]
    InvalidCardNotation(String),

    #[error("Invalid board notation: {0}")]
    InvalidBoardNotation(String),

    #[error("Invalid hand notation: {0}")]
    InvalidHandNotation(String),

    #[error("Need at least {need} cards, got {got}")]
    NotEnoughCards { need: usize, got: usize },

    #[error("Cannot deal {requested} cards, only {available} remaining")]
    NotEnoughDeck { requested: usize, available: usize },

    #[error("Hand must be exactly 2 cards")]
    InvalidHandSize,

    #[error("Duplicate card: {0}")]
    DuplicateCard(String),

    #[error("Unknown position: {0}")]
    UnknownPosition(String),

    #[error("Table must seat 2 to 6 players, got {0}")]
    InvalidPlayerCount(usize),

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

pub type GtoResult<T> = Result<T, GtoError>;
