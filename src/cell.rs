use serde::{Deserialize, Serialize};

/// Player-visible state of one board cell.
///
/// Flags exist only on unrevealed cells; a revealed cell always carries its
/// adjacent-mine count. Mines are not stored here, the minefield keeps them.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum CellState {
    Hidden,
    Revealed(u8),
    Flagged,
}

impl CellState {
    pub const fn is_unrevealed(self) -> bool {
        matches!(self, Self::Hidden | Self::Flagged)
    }

    pub const fn is_flagged(self) -> bool {
        matches!(self, Self::Flagged)
    }

    /// Adjacent-mine count, for revealed cells only.
    pub const fn adjacent_mines(self) -> Option<u8> {
        match self {
            Self::Revealed(count) => Some(count),
            Self::Hidden | Self::Flagged => None,
        }
    }
}

impl Default for CellState {
    fn default() -> Self {
        Self::Hidden
    }
}
