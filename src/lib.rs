#![no_std]

extern crate alloc;

use core::ops::{BitOr, Index};
use serde::{Deserialize, Serialize};

pub use cell::*;
pub use error::*;
pub use game::*;
pub use grid::*;
pub use placer::*;
pub use reveal::*;
pub use view::*;

mod cell;
mod error;
mod game;
mod grid;
mod placer;
mod reveal;
mod view;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    pub size: Coord2,
    pub mines: CellCount,
}

impl GameConfig {
    pub const fn new_unchecked(size: Coord2, mines: CellCount) -> Self {
        Self { size, mines }
    }

    /// Clamps each axis into `1..=Coord::MAX` and rejects mine counts that
    /// leave no safe cell. Zero mines is a valid, if dull, game.
    pub fn new((size_x, size_y): Coord2, mines: CellCount) -> Result<Self> {
        let size_x = size_x.clamp(1, Coord::MAX);
        let size_y = size_y.clamp(1, Coord::MAX);
        let config = Self::new_unchecked((size_x, size_y), mines);
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.size.0 == 0 || self.size.1 == 0 || self.mines >= self.total_cells() {
            return Err(GameError::InvalidConfig);
        }
        Ok(())
    }

    pub const fn total_cells(&self) -> CellCount {
        mult(self.size.0, self.size.1)
    }

    pub const fn safe_cells(&self) -> CellCount {
        self.total_cells().saturating_sub(self.mines)
    }
}

/// Mine layout for one game. Built once, by a placer or from explicit
/// coordinates, and never mutated afterwards.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Minefield {
    mine_mask: Grid<bool>,
    mine_count: CellCount,
}

impl Minefield {
    pub fn from_mine_mask(mine_mask: Grid<bool>) -> Result<Self> {
        let mine_count = mine_mask
            .iter()
            .filter(|&&is_mine| is_mine)
            .count()
            .try_into()
            .unwrap();
        let field = Self {
            mine_mask,
            mine_count,
        };
        field.config().validate()?;
        Ok(field)
    }

    pub fn from_mine_coords(size: Coord2, mine_coords: &[Coord2]) -> Result<Self> {
        let mut mine_mask: Grid<bool> = Grid::new(size);

        for &coords in mine_coords {
            let coords = mine_mask.validate_coords(coords)?;
            mine_mask[coords] = true;
        }

        Self::from_mine_mask(mine_mask)
    }

    pub fn config(&self) -> GameConfig {
        GameConfig {
            size: self.size(),
            mines: self.mine_count,
        }
    }

    pub fn size(&self) -> Coord2 {
        self.mine_mask.size()
    }

    pub fn total_cells(&self) -> CellCount {
        self.mine_mask.total_cells()
    }

    pub fn safe_cell_count(&self) -> CellCount {
        self.total_cells() - self.mine_count
    }

    pub fn mine_count(&self) -> CellCount {
        self.mine_count
    }

    pub fn contains_mine(&self, coords: Coord2) -> bool {
        self[coords]
    }

    pub fn adjacent_mine_count(&self, coords: Coord2) -> u8 {
        self.mine_mask
            .neighbors(coords)
            .filter(|&pos| self[pos])
            .count()
            .try_into()
            .unwrap()
    }

    pub(crate) fn mask(&self) -> &Grid<bool> {
        &self.mine_mask
    }
}

impl Index<Coord2> for Minefield {
    type Output = bool;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.mine_mask[coords]
    }
}

/// Outcome of a flag command.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum FlagOutcome {
    NoChange,
    Flagged,
    Unflagged,
}

impl FlagOutcome {
    pub const fn has_update(self) -> bool {
        match self {
            Self::NoChange => false,
            Self::Flagged => true,
            Self::Unflagged => true,
        }
    }
}

/// Game-level outcome of a reveal pass.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum RevealOutcome {
    NoChange,
    Revealed,
    HitMine,
    Won,
}

impl RevealOutcome {
    pub const fn has_update(self) -> bool {
        use RevealOutcome::*;
        match self {
            NoChange => false,
            Revealed => true,
            HitMine => true,
            Won => true,
        }
    }
}

/// Merging two outcomes keeps the decisive one: a hit mine trumps a win,
/// which trumps an ordinary reveal.
impl BitOr for RevealOutcome {
    type Output = RevealOutcome;

    fn bitor(self, rhs: Self) -> Self::Output {
        use RevealOutcome::*;
        match (self, rhs) {
            (HitMine, _) => HitMine,
            (_, HitMine) => HitMine,
            (Won, _) => Won,
            (_, Won) => Won,
            (Revealed, _) => Revealed,
            (_, Revealed) => Revealed,
            (NoChange, NoChange) => NoChange,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_rejects_too_many_mines() {
        assert_eq!(GameConfig::new((3, 3), 9), Err(GameError::InvalidConfig));
        assert_eq!(GameConfig::new((1, 1), 1), Err(GameError::InvalidConfig));
        assert!(GameConfig::new((3, 3), 8).is_ok());
        assert!(GameConfig::new((1, 1), 0).is_ok());
    }

    #[test]
    fn config_clamps_degenerate_sizes() {
        let config = GameConfig::new((0, 5), 3).unwrap();
        assert_eq!(config.size, (1, 5));
        assert_eq!(config.total_cells(), 5);
        assert_eq!(config.safe_cells(), 2);
    }

    #[test]
    fn minefield_rejects_out_of_bounds_mines() {
        let result = Minefield::from_mine_coords((3, 3), &[(1, 1), (3, 0)]);
        assert_eq!(result, Err(GameError::OutOfBounds));
    }

    #[test]
    fn minefield_rejects_fully_mined_grid() {
        let mut mine_mask: Grid<bool> = Grid::new((2, 2));
        for x in 0..2 {
            for y in 0..2 {
                mine_mask[(x, y)] = true;
            }
        }
        assert_eq!(
            Minefield::from_mine_mask(mine_mask),
            Err(GameError::InvalidConfig)
        );
    }

    #[test]
    fn minefield_counts_duplicate_coords_once() {
        let field = Minefield::from_mine_coords((3, 3), &[(0, 0), (0, 0), (2, 2)]).unwrap();
        assert_eq!(field.mine_count(), 2);
        assert_eq!(field.safe_cell_count(), 7);
    }

    #[test]
    fn adjacent_mine_counts_are_exact() {
        let field = Minefield::from_mine_coords((3, 3), &[(0, 0), (1, 1), (2, 2)]).unwrap();
        assert_eq!(field.adjacent_mine_count((0, 0)), 1);
        assert_eq!(field.adjacent_mine_count((1, 0)), 2);
        assert_eq!(field.adjacent_mine_count((2, 0)), 1);
        assert_eq!(field.adjacent_mine_count((1, 1)), 2);
        assert_eq!(field.adjacent_mine_count((2, 1)), 2);
        assert_eq!(field.adjacent_mine_count((2, 2)), 1);
    }

    #[test]
    fn outcome_merge_keeps_the_decisive_result() {
        use RevealOutcome::*;
        assert_eq!(HitMine | Won, HitMine);
        assert_eq!(Won | Revealed, Won);
        assert_eq!(Revealed | NoChange, Revealed);
        assert_eq!(NoChange | NoChange, NoChange);
        assert_eq!(NoChange | HitMine, HitMine);
    }
}
