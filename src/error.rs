use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Coordinates outside the grid")]
    OutOfBounds,
    #[error("Mine count out of range for the grid size")]
    InvalidConfig,
    #[error("Minefield already placed")]
    AlreadyPlaced,
}

pub type Result<T> = core::result::Result<T, GameError>;
