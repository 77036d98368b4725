use core::ops::{Index, IndexMut};

use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::{GameError, Result};

/// Single coordinate axis used for board width, height, and positions.
pub type Coord = u8;

/// Count type used for mine counts and total-cell counts.
pub type CellCount = u16;

/// Two-dimensional coordinates `(x, y)`.
pub type Coord2 = (Coord, Coord);

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.0.into(), self.1.into()]
    }
}

pub const fn mult(a: Coord, b: Coord) -> CellCount {
    let a = a as CellCount;
    let b = b as CellCount;
    a.saturating_mul(b)
}

/// Dense rectangular grid addressed by `(x, y)` coordinates.
///
/// Axis lengths are capped by `Coord`, so every cell index fits a `CellCount`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Grid<T> {
    cells: Array2<T>,
}

impl<T> Grid<T> {
    pub fn new(size: Coord2) -> Self
    where
        T: Default,
    {
        Self {
            cells: Array2::default(size.to_nd_index()),
        }
    }

    pub fn size(&self) -> Coord2 {
        let dim = self.cells.dim();
        (dim.0.try_into().unwrap(), dim.1.try_into().unwrap())
    }

    pub fn total_cells(&self) -> CellCount {
        self.cells.len().try_into().unwrap()
    }

    pub fn contains(&self, coords: Coord2) -> bool {
        let size = self.size();
        coords.0 < size.0 && coords.1 < size.1
    }

    /// Passes `coords` through unchanged when in bounds.
    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        if self.contains(coords) {
            Ok(coords)
        } else {
            Err(GameError::OutOfBounds)
        }
    }

    /// Checked cell read, for callers that cannot guarantee bounds.
    pub fn get(&self, coords: Coord2) -> Result<T>
    where
        T: Copy,
    {
        self.validate_coords(coords)?;
        Ok(self[coords])
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.cells.iter()
    }

    /// Iterates the up-to-8 in-bounds neighbors of `coords`, nearest row first.
    pub fn neighbors(&self, coords: Coord2) -> NeighborIter {
        NeighborIter::new(coords, self.size())
    }

    pub fn neighbor_cells(&self, coords: Coord2) -> impl Iterator<Item = (Coord2, T)>
    where
        T: Copy,
    {
        self.neighbors(coords)
            .map(|index| (index, self[index]))
    }

    pub(crate) fn as_slice_mut(&mut self) -> Option<&mut [T]> {
        self.cells.as_slice_mut()
    }
}

impl<T> Index<Coord2> for Grid<T> {
    type Output = T;

    fn index(&self, coords: Coord2) -> &T {
        &self.cells[coords.to_nd_index()]
    }
}

impl<T> IndexMut<Coord2> for Grid<T> {
    fn index_mut(&mut self, coords: Coord2) -> &mut T {
        &mut self.cells[coords.to_nd_index()]
    }
}

const DISPLACEMENTS: [(isize, isize); 8] = [
    (-1, -1),
    (0, -1),
    (1, -1),
    (-1, 0),
    (1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

/// Applies `delta` to `coords`, returning a value only when it remains in bounds.
fn apply_delta(coords: Coord2, delta: (isize, isize), bounds: Coord2) -> Option<Coord2> {
    let (x, y) = coords;
    let (dx, dy) = delta;
    let (max_x, max_y) = bounds;

    let next_x = x.checked_add_signed(dx.try_into().ok()?)?;
    if next_x >= max_x {
        return None;
    }

    let next_y = y.checked_add_signed(dy.try_into().ok()?)?;
    if next_y >= max_y {
        return None;
    }

    Some((next_x, next_y))
}

#[derive(Debug)]
pub struct NeighborIter {
    center: Coord2,
    bounds: Coord2,
    index: u8,
}

impl NeighborIter {
    fn new(center: Coord2, bounds: Coord2) -> Self {
        Self {
            center,
            bounds,
            index: 0,
        }
    }
}

impl Iterator for NeighborIter {
    type Item = Coord2;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if usize::from(self.index) >= DISPLACEMENTS.len() {
                return None;
            }

            let next_item =
                apply_delta(self.center, DISPLACEMENTS[self.index as usize], self.bounds);
            self.index += 1;

            if next_item.is_some() {
                return next_item;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::collections::BTreeSet;
    use alloc::vec::Vec;

    use super::*;

    #[test]
    fn center_cell_has_eight_neighbors() {
        let grid: Grid<u8> = Grid::new((3, 3));
        let neighbors: Vec<Coord2> = grid.neighbors((1, 1)).collect();
        assert_eq!(neighbors.len(), 8);
        assert!(!neighbors.contains(&(1, 1)));
    }

    #[test]
    fn corner_cell_has_three_neighbors() {
        let grid: Grid<u8> = Grid::new((3, 3));
        let neighbors: BTreeSet<Coord2> = grid.neighbors((0, 0)).collect();
        assert_eq!(neighbors, BTreeSet::from([(1, 0), (0, 1), (1, 1)]));
    }

    #[test]
    fn edge_cell_has_five_neighbors() {
        let grid: Grid<u8> = Grid::new((3, 3));
        let neighbors: BTreeSet<Coord2> = grid.neighbors((1, 0)).collect();
        assert_eq!(
            neighbors,
            BTreeSet::from([(0, 0), (2, 0), (0, 1), (1, 1), (2, 1)])
        );
    }

    #[test]
    fn thin_strip_does_not_wrap_around() {
        let grid: Grid<u8> = Grid::new((1, 3));
        let neighbors: BTreeSet<Coord2> = grid.neighbors((0, 1)).collect();
        assert_eq!(neighbors, BTreeSet::from([(0, 0), (0, 2)]));
    }

    #[test]
    fn neighbors_are_unique() {
        let grid: Grid<u8> = Grid::new((5, 4));
        for x in 0..5 {
            for y in 0..4 {
                let all: Vec<Coord2> = grid.neighbors((x, y)).collect();
                let unique: BTreeSet<Coord2> = all.iter().copied().collect();
                assert_eq!(all.len(), unique.len());
            }
        }
    }

    #[test]
    fn get_rejects_out_of_bounds() {
        let mut grid: Grid<u8> = Grid::new((2, 2));
        grid[(1, 1)] = 7;
        assert_eq!(grid.get((1, 1)), Ok(7));
        assert_eq!(grid.get((2, 0)), Err(GameError::OutOfBounds));
        assert_eq!(grid.get((0, 2)), Err(GameError::OutOfBounds));
        assert!(grid.contains((0, 0)));
        assert!(!grid.contains((2, 2)));
    }

    #[test]
    fn total_cells_matches_dimensions() {
        let grid: Grid<bool> = Grid::new((4, 3));
        assert_eq!(grid.size(), (4, 3));
        assert_eq!(grid.total_cells(), 12);
        assert_eq!(mult(255, 255), 65025);
    }
}
