// Copyright 2026 the Flowgrid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The objects the simulator paints onto grid cells.
//!
//! Every cell of the raster grid holds an ordered stack of these; the
//! bottom-most entry is drawn first. Readers pattern-match on the kind.

use flowgrid_model::SystemId;

bitflags::bitflags! {
    /// Display flags computed for a system during simulation.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct SystemFlags: u8 {
        /// The system asked for its descendants to be suppressed.
        const HIDE_SYSTEMS = 0b0000_0001;
        /// Some ancestor set [`SystemFlags::HIDE_SYSTEMS`]; this system is
        /// not drawn at all.
        const HIDDEN = 0b0000_0010;
        /// Drawn as an opaque box that link paths cannot tunnel through.
        const BLACKBOX = 0b0000_0100;
    }
}

/// Which part of a box a [`SimObject::System`] tile represents.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BoxVariant {
    /// Top-left corner.
    TopLeft,
    /// Top edge.
    Top,
    /// Top-right corner.
    TopRight,
    /// Left edge.
    Left,
    /// Interior.
    Center,
    /// Right edge.
    Right,
    /// Bottom-left corner.
    BottomLeft,
    /// Bottom edge.
    Bottom,
    /// Bottom-right corner.
    BottomRight,
}

/// Which way a [`SimObject::Link`] tile runs through its cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum LinkVariant {
    /// Straight east-west segment.
    Horizontal,
    /// Straight north-south segment.
    Vertical,
    /// Elbow joining the bottom and right sides.
    BottomToRight,
    /// Elbow joining the bottom and left sides.
    BottomToLeft,
    /// Elbow joining the top and right sides.
    TopToRight,
    /// Elbow joining the top and left sides.
    TopToLeft,
}

/// One entry in a grid cell's object stack.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SimObject {
    /// Part of a system box.
    System {
        /// Owning system.
        system: SystemId,
        /// Which part of the box this tile is.
        variant: BoxVariant,
        /// Whether the box is drawn opaque.
        blackbox: bool,
    },
    /// A connection port on a box perimeter.
    Port {
        /// Owning system.
        system: SystemId,
    },
    /// Part of a routed link path.
    Link {
        /// Index into the graph's link list.
        link: usize,
        /// How the path runs through this cell.
        variant: LinkVariant,
    },
    /// Part of the impassable ring around a box.
    SystemMargin {
        /// Owning system.
        system: SystemId,
    },
    /// A slice of a system's title text.
    SystemTitle {
        /// Owning system.
        system: SystemId,
        /// Up to [`TITLE_CHARS_PER_SQUARE`](crate::consts::TITLE_CHARS_PER_SQUARE)
        /// characters of the title.
        text: String,
    },
    /// Part of the impassable ring around a title.
    SystemTitlePadding {
        /// Owning system.
        system: SystemId,
    },
}

impl SimObject {
    /// The system this object belongs to, if any.
    pub fn system(&self) -> Option<SystemId> {
        match self {
            Self::System { system, .. }
            | Self::Port { system }
            | Self::SystemMargin { system }
            | Self::SystemTitle { system, .. }
            | Self::SystemTitlePadding { system } => Some(*system),
            Self::Link { .. } => None,
        }
    }

    /// The link this object belongs to, if any.
    pub fn link(&self) -> Option<usize> {
        match self {
            Self::Link { link, .. } => Some(*link),
            _ => None,
        }
    }

    /// Whether this is a port tile.
    pub fn is_port(&self) -> bool {
        matches!(self, Self::Port { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors_discriminate_kinds() {
        let port = SimObject::Port {
            system: SystemId::ROOT,
        };
        assert!(port.is_port());
        assert_eq!(port.system(), Some(SystemId::ROOT));
        assert_eq!(port.link(), None);

        let link = SimObject::Link {
            link: 3,
            variant: LinkVariant::Horizontal,
        };
        assert!(!link.is_port());
        assert_eq!(link.system(), None);
        assert_eq!(link.link(), Some(3));
    }
}
