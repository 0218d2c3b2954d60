// Copyright 2026 the Flowgrid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rasterisation: painting systems onto the tile grid and the path grid.
//!
//! Every drawn system contributes, in order: its margin ring, its box
//! interior, its ports, and its title (padding ring, then glyph tiles).
//! Painting goes to two places at once: the object stacks consumers read,
//! and the A* weights the router searches.

use flowgrid_grid::{CellCoord, PathGrid};
use flowgrid_model::{Point, SystemGraph, SystemId};
use smallvec::SmallVec;

use crate::consts::TITLE_CHARS_PER_SQUARE;
use crate::layout::{Layout, SystemLayout};
use crate::object::{BoxVariant, SimObject};

/// The addressable output grid: a stack of [`SimObject`]s per cell, the
/// bottom-most entry drawn first.
pub struct TileGrid {
    width: usize,
    height: usize,
    cells: Vec<SmallVec<[SimObject; 4]>>,
}

impl core::fmt::Debug for TileGrid {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let occupied = self.cells.iter().filter(|c| !c.is_empty()).count();
        f.debug_struct("TileGrid")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("occupied_cells", &occupied)
            .finish_non_exhaustive()
    }
}

impl TileGrid {
    pub(crate) fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![SmallVec::new(); width * height],
        }
    }

    /// Grid width in cells.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Grid height in cells.
    pub fn height(&self) -> usize {
        self.height
    }

    fn index(&self, x: i64, y: i64) -> Option<usize> {
        (x >= 0 && y >= 0 && (x as u64) < self.width as u64 && (y as u64) < self.height as u64)
            .then(|| y as usize * self.width + x as usize)
    }

    /// The object stack at a grid cell, bottom-most first. Out-of-bounds
    /// cells read as empty.
    pub fn stack(&self, x: i64, y: i64) -> &[SimObject] {
        match self.index(x, y) {
            Some(i) => &self.cells[i],
            None => &[],
        }
    }

    /// The top-most object at a grid cell.
    pub fn top(&self, x: i64, y: i64) -> Option<&SimObject> {
        self.stack(x, y).last()
    }

    /// Push onto a cell's stack. Out-of-bounds pushes are dropped.
    pub(crate) fn push(&mut self, x: i64, y: i64, object: SimObject) {
        if let Some(i) = self.index(x, y) {
            self.cells[i].push(object);
        }
    }
}

/// Paint every drawn system, in depth-first document order so children stack
/// above their containers.
pub(crate) fn rasterise(
    graph: &SystemGraph,
    layout: &Layout,
    tiles: &mut TileGrid,
    paths: &mut PathGrid,
) {
    for id in graph.subsystems() {
        let system = layout.of(id);
        if !system.drawn() {
            continue;
        }
        paint_system(id, system, layout, tiles, paths);
    }
    tracing::debug!(
        width = tiles.width(),
        height = tiles.height(),
        "rasterised system boxes"
    );
}

fn paint_system(
    id: SystemId,
    system: &SystemLayout,
    layout: &Layout,
    tiles: &mut TileGrid,
    paths: &mut PathGrid,
) {
    let origin = layout.boundaries.to_grid(system.world);
    let (w, h) = (system.size.width, system.size.height);
    let blackbox = system.blackbox();

    // Margin ring, one cell outside the perimeter.
    for x in -1..=w {
        for y in [-1, h] {
            let (gx, gy) = (origin.x + x, origin.y + y);
            tiles.push(gx, gy, SimObject::SystemMargin { system: id });
            paths.set_weight(CellCoord::new(gx, gy), f64::INFINITY);
        }
    }
    for y in 0..h {
        for x in [-1, w] {
            let (gx, gy) = (origin.x + x, origin.y + y);
            tiles.push(gx, gy, SimObject::SystemMargin { system: id });
            paths.set_weight(CellCoord::new(gx, gy), f64::INFINITY);
        }
    }

    // Box interior. White boxes stay walkable so link paths can tunnel
    // through them between ports.
    for y in 0..h {
        for x in 0..w {
            let (gx, gy) = (origin.x + x, origin.y + y);
            tiles.push(
                gx,
                gy,
                SimObject::System {
                    system: id,
                    variant: box_variant(x, y, w, h),
                    blackbox,
                },
            );
            let weight = if blackbox { f64::INFINITY } else { 1.0 };
            paths.set_weight(CellCoord::new(gx, gy), weight);
        }
    }

    // Ports punch walkable holes into the margin ring.
    for port in &system.ports {
        let grid = layout.boundaries.to_grid(*port);
        tiles.push(grid.x, grid.y, SimObject::Port { system: id });
        paths.set_weight(CellCoord::new(grid.x, grid.y), 1.0);
    }

    paint_title(id, system, layout, tiles, paths);
}

fn box_variant(x: i64, y: i64, w: i64, h: i64) -> BoxVariant {
    if y == 0 {
        if x == 0 {
            BoxVariant::TopLeft
        } else if x == w - 1 {
            BoxVariant::TopRight
        } else {
            BoxVariant::Top
        }
    } else if y == h - 1 {
        if x == 0 {
            BoxVariant::BottomLeft
        } else if x == w - 1 {
            BoxVariant::BottomRight
        } else {
            BoxVariant::Bottom
        }
    } else if x == 0 {
        BoxVariant::Left
    } else if x == w - 1 {
        BoxVariant::Right
    } else {
        BoxVariant::Center
    }
}

fn paint_title(
    id: SystemId,
    system: &SystemLayout,
    layout: &Layout,
    tiles: &mut TileGrid,
    paths: &mut PathGrid,
) {
    let title = &system.title;
    if title.lines.iter().all(String::is_empty) {
        return;
    }
    let origin = layout.boundaries.to_grid(system.world);
    let anchor = layout.boundaries.to_grid(title.world);
    let inside_box = |x: i64, y: i64| {
        x >= origin.x
            && x < origin.x + system.size.width
            && y >= origin.y
            && y < origin.y + system.size.height
    };

    // Padding ring around the title rect, clamped to the box so it can never
    // clobber port cells out in the margin ring.
    let (tw, th) = (title.size.width, title.size.height);
    for x in -1..=tw {
        for y in -1..=th {
            let on_ring = x == -1 || x == tw || y == -1 || y == th;
            let (gx, gy) = (anchor.x + x, anchor.y + y);
            if on_ring && inside_box(gx, gy) {
                tiles.push(gx, gy, SimObject::SystemTitlePadding { system: id });
                paths.set_weight(CellCoord::new(gx, gy), f64::INFINITY);
            }
        }
    }

    // Glyph tiles, a fixed number of characters per square.
    for (row, line) in title.lines.iter().enumerate() {
        let chars: Vec<char> = line.chars().collect();
        for (col, chunk) in chars.chunks(TITLE_CHARS_PER_SQUARE).enumerate() {
            let (gx, gy) = (anchor.x + col as i64, anchor.y + row as i64);
            if !inside_box(gx, gy) {
                continue;
            }
            tiles.push(
                gx,
                gy,
                SimObject::SystemTitle {
                    system: id,
                    text: chunk.iter().collect(),
                },
            );
            paths.set_weight(CellCoord::new(gx, gy), f64::INFINITY);
        }
    }
}

/// Project a world point through the layout boundaries.
pub(crate) fn to_cell(layout: &Layout, world: Point) -> CellCoord {
    let grid = layout.boundaries.to_grid(world);
    CellCoord::new(grid.x, grid.y)
}
