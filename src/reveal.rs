use alloc::collections::{BTreeSet, VecDeque};
use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

use crate::*;

/// Everything one reveal or chord pass changed, for the caller to render.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RevealReport {
    pub outcome: RevealOutcome,
    /// Newly opened coordinates with their adjacent-mine counts, in the order
    /// they were opened.
    pub opened: Vec<(Coord2, u8)>,
    /// First mine the pass uncovered, when it uncovered one.
    pub mine_hit: Option<Coord2>,
}

impl RevealReport {
    pub(crate) fn no_change() -> Self {
        Self {
            outcome: RevealOutcome::NoChange,
            opened: Vec::new(),
            mine_hit: None,
        }
    }

    pub fn has_update(&self) -> bool {
        self.outcome.has_update()
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
enum SingleReveal {
    Skipped,
    Opened(u8),
    HitMine,
}

/// One reveal pass over a board.
///
/// The visited set spans the whole pass, so a chord fanning into overlapping
/// zero regions never requeues a cell it already processed.
pub(crate) struct RevealEngine<'a> {
    minefield: &'a Minefield,
    board: &'a mut Grid<CellState>,
    visited: BTreeSet<Coord2>,
    opened: Vec<(Coord2, u8)>,
    mine_hit: Option<Coord2>,
}

impl<'a> RevealEngine<'a> {
    pub(crate) fn new(minefield: &'a Minefield, board: &'a mut Grid<CellState>) -> Self {
        Self {
            minefield,
            board,
            visited: BTreeSet::new(),
            opened: Vec::new(),
            mine_hit: None,
        }
    }

    /// Reveals `coords` and floods outward while the adjacent-mine count
    /// stays zero. Flagged cells are never opened, which also stops the
    /// flood from passing through them.
    pub(crate) fn cascade(&mut self, coords: Coord2) -> RevealOutcome {
        self.visited.insert(coords);
        match self.reveal_single(coords) {
            SingleReveal::Skipped => RevealOutcome::NoChange,
            SingleReveal::HitMine => RevealOutcome::HitMine,
            SingleReveal::Opened(0) => {
                self.flood_from(coords);
                RevealOutcome::Revealed
            }
            SingleReveal::Opened(_) => RevealOutcome::Revealed,
        }
    }

    /// Opens every unflagged hidden neighbor of a revealed cell whose flag
    /// count matches its number, cascading as usual. `None` when the cell is
    /// not chordable.
    pub(crate) fn chord(&mut self, coords: Coord2) -> Option<RevealOutcome> {
        let CellState::Revealed(count) = self.board[coords] else {
            return None;
        };

        if count == 0 || count != flagged_neighbor_count(self.board, coords) {
            return None;
        }

        Some(
            self.board
                .neighbors(coords)
                .map(|neighbor_coords| self.cascade(neighbor_coords))
                .reduce(core::ops::BitOr::bitor)
                .unwrap_or(RevealOutcome::NoChange),
        )
    }

    pub(crate) fn into_parts(self) -> (Vec<(Coord2, u8)>, Option<Coord2>) {
        (self.opened, self.mine_hit)
    }

    fn reveal_single(&mut self, coords: Coord2) -> SingleReveal {
        if self.board[coords] != CellState::Hidden {
            return SingleReveal::Skipped;
        }

        if self.minefield.contains_mine(coords) {
            log::debug!("Mine hit at {:?}", coords);
            self.mine_hit.get_or_insert(coords);
            return SingleReveal::HitMine;
        }

        let adjacent_mines = self.minefield.adjacent_mine_count(coords);
        self.board[coords] = CellState::Revealed(adjacent_mines);
        self.opened.push((coords, adjacent_mines));
        SingleReveal::Opened(adjacent_mines)
    }

    fn flood_from(&mut self, start: Coord2) {
        let mut to_visit: VecDeque<Coord2> = self
            .board
            .neighbors(start)
            .filter(|&pos| self.board[pos] == CellState::Hidden)
            .collect();
        log::trace!(
            "Flood fill from {:?} starts with {} neighbors",
            start,
            to_visit.len()
        );

        while let Some(visit_coords) = to_visit.pop_front() {
            if !self.visited.insert(visit_coords) {
                continue;
            }

            let SingleReveal::Opened(adjacent_mines) = self.reveal_single(visit_coords) else {
                continue;
            };

            if adjacent_mines == 0 {
                to_visit.extend(
                    self.board
                        .neighbors(visit_coords)
                        .filter(|&pos| self.board[pos] == CellState::Hidden)
                        .filter(|pos| !self.visited.contains(pos)),
                );
            }
        }
    }
}

pub(crate) fn flagged_neighbor_count(board: &Grid<CellState>, coords: Coord2) -> u8 {
    board
        .neighbor_cells(coords)
        .filter(|&(_, cell)| cell.is_flagged())
        .count()
        .try_into()
        .unwrap()
}
