use alloc::vec::Vec;
use core::num::Saturating;
use serde::{Deserialize, Serialize};

use crate::*;

/// Valid transitions:
///
/// - `NotStarted` -> `InProgress` on the first effective reveal
/// - `InProgress` -> `Won` | `Lost`
/// - `Won` | `Lost` -> `NotStarted` via reset
///
/// A first reveal that ends the game passes through `InProgress` within the
/// same call.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum GameState {
    NotStarted,
    InProgress,
    Won,
    Lost,
}

impl GameState {
    pub const fn is_initial(self) -> bool {
        matches!(self, Self::NotStarted)
    }

    pub const fn is_final(self) -> bool {
        matches!(self, Self::Won | Self::Lost)
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::NotStarted
    }
}

/// Outcome of a chord command.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum ChordOutcome {
    /// The cell is not a revealed number with a matching flag count.
    Unsatisfied,
    Applied(RevealReport),
}

impl ChordOutcome {
    pub fn has_update(&self) -> bool {
        match self {
            Self::Unsatisfied => false,
            Self::Applied(report) => report.has_update(),
        }
    }
}

/// A full game from configuration to win or loss.
///
/// Mines are not placed at construction. The first effective reveal runs the
/// placer with its own coordinates as the safe cell, so the opening move can
/// never lose. Commands on a finished game report no change instead of
/// erroring, which keeps replayed or queued inputs harmless.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Game {
    config: GameConfig,
    seed: u64,
    minefield: Option<Minefield>,
    board: Grid<CellState>,
    revealed_count: Saturating<CellCount>,
    flagged_count: Saturating<CellCount>,
    state: GameState,
    triggered_mine: Option<Coord2>,
}

impl Game {
    pub fn new(config: GameConfig, seed: u64) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            seed,
            minefield: None,
            board: Grid::new(config.size),
            revealed_count: Saturating(0),
            flagged_count: Saturating(0),
            state: Default::default(),
            triggered_mine: None,
        })
    }

    /// Starts a game over a prepared layout. First-move safety is then up to
    /// whoever prepared it.
    pub fn from_minefield(minefield: Minefield) -> Self {
        let config = minefield.config();
        Self {
            config,
            seed: 0,
            minefield: Some(minefield),
            board: Grid::new(config.size),
            revealed_count: Saturating(0),
            flagged_count: Saturating(0),
            state: Default::default(),
            triggered_mine: None,
        }
    }

    /// Installs a prepared layout into a game whose mines are not down yet.
    pub fn attach_minefield(&mut self, minefield: Minefield) -> Result<()> {
        if self.minefield.is_some() {
            return Err(GameError::AlreadyPlaced);
        }
        if minefield.config() != self.config {
            return Err(GameError::InvalidConfig);
        }
        self.minefield = Some(minefield);
        Ok(())
    }

    /// Starts over with a new configuration and seed. On error the running
    /// game is left untouched.
    pub fn reset(&mut self, config: GameConfig, seed: u64) -> Result<()> {
        *self = Self::new(config, seed)?;
        log::debug!("Game reset, size: {:?}, mines: {}", config.size, config.mines);
        Ok(())
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_final()
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn size(&self) -> Coord2 {
        self.config.size
    }

    pub fn total_mines(&self) -> CellCount {
        self.config.mines
    }

    /// Mine count minus flag count. Negative when the player overflags.
    pub fn mines_left(&self) -> isize {
        (self.config.mines as isize) - (self.flagged_count.0 as isize)
    }

    pub fn revealed_count(&self) -> CellCount {
        self.revealed_count.0
    }

    pub fn triggered_mine(&self) -> Option<Coord2> {
        self.triggered_mine
    }

    pub fn contains(&self, coords: Coord2) -> bool {
        self.board.contains(coords)
    }

    pub fn cell_at(&self, coords: Coord2) -> Result<CellState> {
        self.board.get(coords)
    }

    pub fn can_chord_at(&self, coords: Coord2) -> bool {
        if self.state.is_final() {
            return false;
        }

        match self.board.get(coords) {
            Ok(CellState::Revealed(count)) if count > 0 => {
                count == flagged_neighbor_count(&self.board, coords)
            }
            _ => false,
        }
    }

    pub(crate) fn board(&self) -> &Grid<CellState> {
        &self.board
    }

    pub(crate) fn minefield(&self) -> Option<&Minefield> {
        self.minefield.as_ref()
    }

    /// Reveals a cell, placing mines first when this is the opening move.
    ///
    /// Revealing a flagged or already revealed cell is a no-op and does not
    /// trigger placement, so a misclick before the real opening move cannot
    /// burn the safe cell.
    pub fn reveal(&mut self, coords: Coord2) -> Result<RevealReport> {
        let coords = self.board.validate_coords(coords)?;

        if self.state.is_final() || self.board[coords] != CellState::Hidden {
            return Ok(RevealReport::no_change());
        }

        let minefield = match self.minefield.take() {
            Some(field) => field,
            None => {
                log::debug!("Placing mines, safe cell: {:?}", coords);
                RandomMinePlacer::new(self.seed).place(self.config, coords)?
            }
        };

        let mut engine = RevealEngine::new(&minefield, &mut self.board);
        let outcome = engine.cascade(coords);
        let (opened, mine_hit) = engine.into_parts();
        self.minefield = Some(minefield);

        Ok(self.finish_pass(outcome, opened, mine_hit))
    }

    /// Toggles the flag on an unrevealed cell. Allowed before the first
    /// reveal, since marking suspicions early costs nothing.
    pub fn toggle_flag(&mut self, coords: Coord2) -> Result<FlagOutcome> {
        use CellState::*;

        let coords = self.board.validate_coords(coords)?;

        if self.state.is_final() {
            return Ok(FlagOutcome::NoChange);
        }

        Ok(match self.board[coords] {
            Hidden => {
                self.board[coords] = Flagged;
                self.flagged_count += 1;
                FlagOutcome::Flagged
            }
            Flagged => {
                self.board[coords] = Hidden;
                self.flagged_count -= 1;
                FlagOutcome::Unflagged
            }
            Revealed(_) => FlagOutcome::NoChange,
        })
    }

    /// Opens all unflagged neighbors of a revealed number whose flag count
    /// matches it exactly, with the same win and loss handling as `reveal`.
    pub fn chord(&mut self, coords: Coord2) -> Result<ChordOutcome> {
        let coords = self.board.validate_coords(coords)?;

        if self.state.is_final() {
            return Ok(ChordOutcome::Unsatisfied);
        }

        let Some(minefield) = self.minefield.take() else {
            return Ok(ChordOutcome::Unsatisfied);
        };

        let mut engine = RevealEngine::new(&minefield, &mut self.board);
        let chorded = engine.chord(coords);
        let (opened, mine_hit) = engine.into_parts();
        self.minefield = Some(minefield);

        Ok(match chorded {
            None => ChordOutcome::Unsatisfied,
            Some(outcome) => ChordOutcome::Applied(self.finish_pass(outcome, opened, mine_hit)),
        })
    }

    /// Flags every unrevealed neighbor of a revealed number when exactly that
    /// many unrevealed neighbors remain.
    pub fn chord_flag(&mut self, coords: Coord2) -> Result<FlagOutcome> {
        use CellState::*;

        let coords = self.board.validate_coords(coords)?;

        if self.state.is_final() {
            return Ok(FlagOutcome::NoChange);
        }

        let Revealed(count) = self.board[coords] else {
            return Ok(FlagOutcome::NoChange);
        };

        if count != self.count_unrevealed_neighbors(coords) {
            return Ok(FlagOutcome::NoChange);
        }

        let mut updated = false;
        for pos in self.board.neighbors(coords) {
            if matches!(self.board[pos], Hidden) {
                self.board[pos] = Flagged;
                self.flagged_count += 1;
                updated = true;
            }
        }

        Ok(if updated {
            FlagOutcome::Flagged
        } else {
            FlagOutcome::NoChange
        })
    }

    fn finish_pass(
        &mut self,
        outcome: RevealOutcome,
        opened: Vec<(Coord2, u8)>,
        mine_hit: Option<Coord2>,
    ) -> RevealReport {
        self.revealed_count += opened.len() as CellCount;
        if outcome.has_update() {
            self.mark_started();
        }

        let outcome = match outcome {
            RevealOutcome::HitMine => {
                self.triggered_mine = mine_hit;
                self.end_game(false);
                RevealOutcome::HitMine
            }
            RevealOutcome::Revealed
                if self.revealed_count == Saturating(self.config.safe_cells()) =>
            {
                self.end_game(true);
                RevealOutcome::Won
            }
            other => other,
        };

        RevealReport {
            outcome,
            opened,
            mine_hit,
        }
    }

    fn count_unrevealed_neighbors(&self, coords: Coord2) -> u8 {
        self.board
            .neighbor_cells(coords)
            .filter(|&(_, cell)| cell.is_unrevealed())
            .count()
            .try_into()
            .unwrap()
    }

    fn mark_started(&mut self) {
        if self.state.is_initial() {
            log::debug!("Game started");
            self.state = GameState::InProgress;
        }
    }

    fn end_game(&mut self, won: bool) {
        if self.state.is_final() {
            return;
        }

        self.state = if won { GameState::Won } else { GameState::Lost };
        if won {
            self.triggered_mine = None;
        }
        log::debug!("Game ended, state: {:?}", self.state);
    }
}
