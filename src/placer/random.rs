use super::*;

/// Uniform random placement over every cell except the safe one.
///
/// Each mine draws an index among the remaining free cells, so the layout is
/// unbiased regardless of density and never needs a retry loop.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RandomMinePlacer {
    seed: u64,
}

impl RandomMinePlacer {
    pub const fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl MinePlacer for RandomMinePlacer {
    fn place(self, config: GameConfig, safe: Coord2) -> Result<Minefield> {
        use rand::prelude::*;

        config.validate()?;
        let mut mine_mask: Grid<bool> = Grid::new(config.size);
        let safe = mine_mask.validate_coords(safe)?;

        // mark the safe cell occupied so no draw can land on it, undone below
        mine_mask[safe] = true;
        let mut free_cells = config.total_cells() - 1;
        let mut mines_placed: CellCount = 0;

        let mut rng = SmallRng::seed_from_u64(self.seed);
        {
            let cells = mine_mask.as_slice_mut().expect("layout should be standard");
            while mines_placed < config.mines {
                if free_cells == 0 {
                    break;
                }
                let mut place: CellCount = rng.random_range(0..free_cells);
                for (i, cell) in cells.iter_mut().enumerate() {
                    let i = i as CellCount;
                    if *cell {
                        place += 1;
                    }
                    if i == place {
                        *cell = true;
                        mines_placed += 1;
                        free_cells -= 1;
                        break;
                    }
                }
            }
        }

        mine_mask[safe] = false;

        let field = Minefield::from_mine_mask(mine_mask)?;
        // double check mine count
        if field.mine_count() != config.mines {
            log::warn!(
                "Placed mine count mismatch, actual: {}, requested: {}",
                field.mine_count(),
                config.mines
            );
        }
        Ok(field)
    }
}
