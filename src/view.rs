use serde::{Deserialize, Serialize};

use crate::*;

/// Render-ready snapshot of a game.
///
/// Mine positions appear only once the game is over. A mid-game snapshot
/// carries nothing beyond what the player could already see, so it is safe
/// to hand to untrusted presentation code.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoardView {
    pub size: Coord2,
    pub mine_count: CellCount,
    pub state: GameState,
    pub cells: Grid<CellState>,
    pub triggered_mine: Option<Coord2>,
    pub mines: Option<Grid<bool>>,
}

impl BoardView {
    pub fn from_game(game: &Game) -> Self {
        let mines = if game.state().is_final() {
            game.minefield().map(|field| field.mask().clone())
        } else {
            None
        };

        Self {
            size: game.size(),
            mine_count: game.total_mines(),
            state: game.state(),
            cells: game.board().clone(),
            triggered_mine: game.triggered_mine(),
            mines,
        }
    }

    pub fn cell(&self, coords: Coord2) -> Result<CellState> {
        self.cells.get(coords)
    }
}
