// Copyright 2026 the Flowgrid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared integer geometry for world and grid space.

use serde::{Deserialize, Serialize};

/// An integer 2D coordinate.
///
/// World coordinates are unbounded and signed; the simulator later projects
/// them into non-negative grid coordinates with a translation offset.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Point {
    /// Horizontal coordinate, growing rightwards.
    pub x: i64,
    /// Vertical coordinate, growing downwards.
    pub y: i64,
}

impl Point {
    /// Create a point from its coordinates.
    #[inline(always)]
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }

    /// Component-wise sum.
    #[inline]
    pub const fn offset(self, dx: i64, dy: i64) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }
}

/// An integer box size in tiles.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Size {
    /// Width in tiles.
    pub width: i64,
    /// Height in tiles.
    pub height: i64,
}

impl Size {
    /// Create a size from width and height.
    #[inline(always)]
    pub const fn new(width: i64, height: i64) -> Self {
        Self { width, height }
    }
}
