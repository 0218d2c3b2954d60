// Copyright 2026 the Flowgrid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Flowgrid Grid: a dense weighted raster grid with turn-penalised A*.
//!
//! This crate is the path-search substrate of the Flowgrid layout engine.
//!
//! - Holds a `width x height` grid of scalar weights; `f64::INFINITY` marks a
//!   cell impassable.
//! - Answers orthogonal shortest-path queries with A* over the 4-connected
//!   neighbourhood, charging the destination cell's weight per step plus a
//!   configurable penalty whenever the path changes direction.
//! - Keeps all per-search state inside the grid so repeated searches reuse the
//!   allocation; [`PathGrid::reset`] restores it without reallocating.
//!
//! Callers mutate weights between searches to model occupancy: the Flowgrid
//! simulator paints box interiors and margins as impassable, ports as cheap,
//! and previously routed paths as weight `2` so later links prefer reusing an
//! existing corridor over carving a fresh one.
//!
//! An unreachable goal is not an error: [`PathGrid::find_path`] returns an
//! empty path and the caller tries its next candidate.
//!
//! # Example
//!
//! ```rust
//! use flowgrid_grid::{AstarConfig, CellCoord, PathGrid};
//!
//! let mut grid = PathGrid::new(8, 8);
//! // Wall off a column, leaving a gap at the bottom.
//! for y in 0..7 {
//!     grid.set_weight(CellCoord::new(4, y), f64::INFINITY);
//! }
//! let path = grid.find_path(
//!     CellCoord::new(1, 1),
//!     CellCoord::new(6, 1),
//!     &AstarConfig::default(),
//! );
//! assert_eq!(path.first(), Some(&CellCoord::new(1, 1)));
//! assert_eq!(path.last(), Some(&CellCoord::new(6, 1)));
//! // The wall forces the path down through the gap and back up.
//! assert!(path.len() > 6);
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod astar;
mod grid;
mod types;

pub use grid::PathGrid;
pub use types::{AstarConfig, CellCoord, Direction};
