// Copyright 2026 the Flowgrid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layout constants. These are part of the output contract: consumers rely on
//! them to interpret the grid, so changing any of them is a breaking change.

/// Maximum width of the root system in tiles.
pub const MAX_SYSTEM_WIDTH: i64 = 64;

/// Maximum height of the root system in tiles.
pub const MAX_SYSTEM_HEIGHT: i64 = 64;

/// Thickness of the impassable margin ring around every box.
pub const SYSTEM_MARGIN: i64 = 1;

/// Interior padding between a container's edge and its children.
pub const PADDING_WHITE_BOX: i64 = 2;

/// Characters of title text carried by one glyph tile.
pub const TITLE_CHARS_PER_SQUARE: usize = 2;

/// How far the boundaries rectangle is inflated on each side.
pub const BOUNDARY_MARGIN: i64 = SYSTEM_MARGIN * 5;
