// Copyright 2026 the Flowgrid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Flowgrid Sim: the system simulator.
//!
//! Takes a hydrated [`flowgrid_model::SystemGraph`] and produces a fully
//! laid-out, addressable tile grid:
//!
//! - world coordinates, sizes, ports, and titles for every sub-system;
//! - a raster grid where every cell holds an ordered stack of
//!   [`SimObject`]s (boxes with nine directional variants, ports, margins,
//!   title glyphs, link segments);
//! - turn-minimising orthogonal routes for every link, found by A* over a
//!   weighted copy of the grid ([`flowgrid_grid`]).
//!
//! The pipeline is strictly sequential and deterministic: link order decides
//! which link claims cheap terrain first, and identical input produces
//! byte-identical output.
//!
//! # Example
//!
//! ```rust
//! use flowgrid_sim::Simulator;
//!
//! let mut loaded = flowgrid_model::load_yaml(
//!     r#"
//! title: Shop
//! systems:
//!   - id: gateway
//!     position: { x: 0, y: 0 }
//!   - id: db
//!     position: { x: 20, y: 0 }
//! links:
//!   - a: gateway
//!     b: db
//! "#,
//! )
//! .expect("well-formed document");
//! let sim = Simulator::compute(&mut loaded.graph);
//! let route = sim.route("gateway", "db").expect("link routes");
//! assert!(route.len() > 1);
//! ```

mod consts;
mod layout;
mod object;
mod raster;
mod route;
mod simulator;

pub use consts::{
    BOUNDARY_MARGIN, MAX_SYSTEM_HEIGHT, MAX_SYSTEM_WIDTH, PADDING_WHITE_BOX, SYSTEM_MARGIN,
    TITLE_CHARS_PER_SQUARE,
};
pub use flowgrid_grid::AstarConfig;
pub use layout::{Boundaries, WorldBounds};
pub use object::{BoxVariant, LinkVariant, SimObject, SystemFlags};
pub use raster::TileGrid;
pub use simulator::Simulator;
