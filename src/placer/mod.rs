use crate::*;
pub use random::*;

mod random;

/// Builds the minefield for one game, keeping the first-revealed cell safe.
pub trait MinePlacer {
    fn place(self, config: GameConfig, safe: Coord2) -> Result<Minefield>;
}
