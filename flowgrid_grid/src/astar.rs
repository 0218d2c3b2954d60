// Copyright 2026 the Flowgrid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A* search over the weighted grid.
//!
//! The search is standard A* with three domain twists:
//!
//! - the neighbourhood is 4-connected, so every step costs the *destination*
//!   cell's weight (all hops are unit length);
//! - a turn penalty is charged when a step changes direction relative to the
//!   step that reached the current cell;
//! - the open set tolerates stale entries: a reopened cell is pushed again
//!   and outdated pops are skipped, which avoids a decrease-key heap.

use alloc::collections::BinaryHeap;
use alloc::vec::Vec;
use core::cmp::Ordering;

use crate::grid::{NO_PARENT, NodeState, PathGrid};
use crate::types::{AstarConfig, CellCoord, Direction};

/// Open-set entry ordered as a min-heap on the f-score.
///
/// Ties are broken on the cell index so the pop order does not depend on heap
/// internals, keeping search results reproducible.
#[derive(Copy, Clone, Debug)]
struct OpenEntry {
    f: f64,
    g: f64,
    index: usize,
}

impl PartialEq for OpenEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OpenEntry {}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed: `BinaryHeap` is a max-heap, we want the smallest f first.
        other
            .f
            .total_cmp(&self.f)
            .then_with(|| other.index.cmp(&self.index))
    }
}

impl PathGrid {
    /// Find an orthogonal path from `from` to `to`, inclusive of both ends.
    ///
    /// Returns an empty path when either end is off-grid or impassable, or
    /// when the goal is unreachable. Never panics.
    ///
    /// The search state is reset on entry, so callers may interleave weight
    /// updates and searches freely.
    pub fn find_path(
        &mut self,
        from: CellCoord,
        to: CellCoord,
        config: &AstarConfig,
    ) -> Vec<CellCoord> {
        if !self.in_bounds(from) || !self.in_bounds(to) {
            return Vec::new();
        }
        if !self.weight(from).is_finite() || !self.weight(to).is_finite() {
            return Vec::new();
        }
        self.reset();

        let start = self.index_of(from);
        let goal = self.index_of(to);

        let mut open: BinaryHeap<OpenEntry> = BinaryHeap::new();
        self.cells[start].g = 0.0;
        self.cells[start].state = NodeState::WillVisit;
        open.push(OpenEntry {
            f: self.heuristic(from, to, config),
            g: 0.0,
            index: start,
        });

        while let Some(entry) = open.pop() {
            {
                let cell = &self.cells[entry.index];
                if cell.state == NodeState::Visited || entry.g > cell.g {
                    // Stale entry left behind by a reopen.
                    continue;
                }
            }
            self.cells[entry.index].state = NodeState::Visited;
            if entry.index == goal {
                return self.reconstruct(goal);
            }

            let current = self.coord_of(entry.index);
            let g_current = self.cells[entry.index].g;
            let came_from = self.cells[entry.index].came_from;

            for dir in Direction::ALL {
                let next = current.step(dir);
                if !self.in_bounds(next) {
                    continue;
                }
                let next_index = self.index_of(next);
                let next_weight = self.cells[next_index].weight;
                if !next_weight.is_finite() || self.cells[next_index].state == NodeState::Visited {
                    continue;
                }

                let mut tentative = g_current + next_weight;
                if let Some(came) = came_from
                    && came != dir
                {
                    tentative += config.turn_penalty;
                }

                let f = tentative + self.heuristic(next, to, config);
                let next_cell = &mut self.cells[next_index];
                if next_cell.state == NodeState::NotVisited || tentative < next_cell.g {
                    next_cell.g = tentative;
                    next_cell.parent = entry.index as u32;
                    next_cell.came_from = Some(dir);
                    next_cell.state = NodeState::WillVisit;
                    open.push(OpenEntry {
                        f,
                        g: tentative,
                        index: next_index,
                    });
                }
            }
        }

        Vec::new()
    }

    #[inline]
    fn heuristic(&self, from: CellCoord, to: CellCoord, config: &AstarConfig) -> f64 {
        from.manhattan(to) as f64 * config.heuristic_weight
    }

    fn reconstruct(&self, goal: usize) -> Vec<CellCoord> {
        let mut path = Vec::new();
        let mut index = goal;
        loop {
            path.push(self.coord_of(index));
            let parent = self.cells[index].parent;
            if parent == NO_PARENT {
                break;
            }
            index = parent as usize;
        }
        path.reverse();
        path
    }
}
