// Copyright 2026 the Flowgrid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! World-space layout: visibility, positions, sizes, ports, titles, and the
//! bounding rectangle that maps world coordinates onto the raster grid.

use flowgrid_model::{Point, Size, SystemGraph, SystemId};

use crate::consts::{
    BOUNDARY_MARGIN, MAX_SYSTEM_HEIGHT, MAX_SYSTEM_WIDTH, PADDING_WHITE_BOX, SYSTEM_MARGIN,
    TITLE_CHARS_PER_SQUARE,
};
use crate::object::SystemFlags;

/// Offset of a title from its box origin.
const TITLE_ANCHOR: Point = Point::new(1, 1);

/// A rectangle in world coordinates; `max` is exclusive.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct WorldBounds {
    /// Top-left corner.
    pub min: Point,
    /// Bottom-right corner (exclusive).
    pub max: Point,
}

/// The rasterised area: the visible bounds inflated by the boundary margin,
/// plus the translation that maps world coordinates into grid coordinates.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Boundaries {
    /// Top-left corner in world coordinates.
    pub min: Point,
    /// Bottom-right corner in world coordinates (exclusive).
    pub max: Point,
    /// Added to a world coordinate to obtain its grid coordinate.
    pub translate: Point,
}

impl Boundaries {
    /// Grid width in cells.
    pub fn width(&self) -> i64 {
        self.max.x - self.min.x
    }

    /// Grid height in cells.
    pub fn height(&self) -> i64 {
        self.max.y - self.min.y
    }

    /// Project a world coordinate into grid space.
    #[inline]
    pub fn to_grid(&self, world: Point) -> Point {
        world.offset(self.translate.x, self.translate.y)
    }
}

#[derive(Clone, Debug, Default)]
pub(crate) struct TitleLayout {
    /// Title text split into lines.
    pub(crate) lines: Vec<String>,
    /// World position of the first glyph tile.
    pub(crate) world: Point,
    /// Extent in tiles.
    pub(crate) size: Size,
}

#[derive(Clone, Debug, Default)]
pub(crate) struct SystemLayout {
    pub(crate) flags: SystemFlags,
    pub(crate) world: Point,
    pub(crate) size: Size,
    /// Port coordinates in world space, in deterministic declaration order.
    pub(crate) ports: Vec<Point>,
    pub(crate) title: TitleLayout,
    pub(crate) link_count: usize,
}

impl SystemLayout {
    pub(crate) fn drawn(&self) -> bool {
        !self.flags.contains(SystemFlags::HIDDEN)
    }

    pub(crate) fn blackbox(&self) -> bool {
        self.flags.contains(SystemFlags::BLACKBOX)
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Layout {
    systems: Vec<SystemLayout>,
    pub(crate) visible: WorldBounds,
    pub(crate) boundaries: Boundaries,
}

impl Layout {
    pub(crate) fn of(&self, id: SystemId) -> &SystemLayout {
        &self.systems[id.as_usize()]
    }
}

/// Run every pure-layout stage of the pipeline: flags, titles, world
/// positions, sizes, ports, and boundaries. Rasterisation and routing build
/// on the result.
pub(crate) fn compute_layout(graph: &SystemGraph) -> Layout {
    let mut systems: Vec<SystemLayout> = vec![SystemLayout::default(); graph.len()];

    compute_flags(graph, &mut systems, graph.root(), false);
    compute_titles(graph, &mut systems);
    compute_world(graph, &mut systems, graph.root(), Point::default());
    compute_link_counts(graph, &mut systems);
    compute_sizes(graph, &mut systems, graph.root());
    compute_ports(graph, &mut systems);
    anchor_titles(&mut systems);

    let visible = visible_bounds(graph, &systems);
    let min = visible.min.offset(-BOUNDARY_MARGIN, -BOUNDARY_MARGIN);
    let width = (visible.max.x - visible.min.x + 2 * BOUNDARY_MARGIN)
        .min(MAX_SYSTEM_WIDTH + 10 * SYSTEM_MARGIN);
    let height = (visible.max.y - visible.min.y + 2 * BOUNDARY_MARGIN)
        .min(MAX_SYSTEM_HEIGHT + 10 * SYSTEM_MARGIN);
    let boundaries = Boundaries {
        min,
        max: min.offset(width, height),
        translate: Point::new(-min.x, -min.y),
    };

    Layout {
        systems,
        visible,
        boundaries,
    }
}

fn compute_flags(
    graph: &SystemGraph,
    systems: &mut [SystemLayout],
    id: SystemId,
    ancestor_hides: bool,
) {
    let node = graph.node(id);
    let mut flags = SystemFlags::empty();
    if node.hide_systems {
        flags |= SystemFlags::HIDE_SYSTEMS;
    }
    if ancestor_hides {
        flags |= SystemFlags::HIDDEN;
    }
    if ancestor_hides || node.hide_systems || node.children.is_empty() {
        flags |= SystemFlags::BLACKBOX;
    }
    systems[id.as_usize()].flags = flags;

    let hides_below = ancestor_hides || node.hide_systems;
    for &child in graph.children_of(id) {
        compute_flags(graph, systems, child, hides_below);
    }
}

/// Every system id, root first, in arena order.
fn all_ids(graph: &SystemGraph) -> impl Iterator<Item = SystemId> + '_ {
    core::iter::once(graph.root()).chain(graph.subsystems())
}

fn compute_titles(graph: &SystemGraph, systems: &mut [SystemLayout]) {
    for id in all_ids(graph) {
        let text = graph.display_title(id);
        let lines: Vec<String> = text.split('\n').map(str::to_owned).collect();
        let width = lines
            .iter()
            .map(|line| line.chars().count().div_ceil(TITLE_CHARS_PER_SQUARE))
            .max()
            .unwrap_or(0) as i64;
        let height = lines.len() as i64;
        systems[id.as_usize()].title = TitleLayout {
            lines,
            world: Point::default(),
            size: Size::new(width, height),
        };
    }
}

/// Interior offset applied to a container's children: horizontal padding plus
/// the vertical strip occupied by the container's own title.
fn padding_offset(systems: &[SystemLayout], parent: SystemId) -> Point {
    let title = &systems[parent.as_usize()].title;
    Point::new(
        PADDING_WHITE_BOX,
        PADDING_WHITE_BOX + TITLE_ANCHOR.y + title.size.height - 1,
    )
}

fn compute_world(graph: &SystemGraph, systems: &mut [SystemLayout], id: SystemId, world: Point) {
    systems[id.as_usize()].world = world;
    let offset = padding_offset(systems, id);
    for &child in graph.children_of(id) {
        let declared = graph.node(child).position;
        let child_world = Point::new(
            world.x + declared.x + offset.x,
            world.y + declared.y + offset.y,
        );
        compute_world(graph, systems, child, child_world);
    }
}

fn compute_link_counts(graph: &SystemGraph, systems: &mut [SystemLayout]) {
    for id in graph.subsystems() {
        systems[id.as_usize()].link_count = graph
            .links
            .iter()
            .filter(|link| {
                [link.a.target, link.b.target]
                    .into_iter()
                    .flatten()
                    .any(|target| graph.is_within(target, id))
            })
            .count();
    }
}

/// The box size a link count dictates: `3x3` up to four links, then one
/// extra column per odd link beyond four.
fn size_from_link_count(link_count: usize) -> Size {
    if link_count <= 4 {
        Size::new(3, 3)
    } else {
        Size::new(3 + ((link_count - 4) % 2) as i64, 3)
    }
}

fn compute_sizes(graph: &SystemGraph, systems: &mut [SystemLayout], id: SystemId) {
    for &child in graph.children_of(id) {
        compute_sizes(graph, systems, child);
    }
    if id == graph.root() {
        return;
    }

    let layout = &systems[id.as_usize()];
    let link_size = size_from_link_count(layout.link_count);
    let size = if layout.blackbox() {
        link_size
    } else {
        // A container must enclose its children and its own title strip.
        let world = layout.world;
        let mut extent = Point::default();
        for &child in graph.children_of(id) {
            let child_layout = &systems[child.as_usize()];
            extent.x = extent.x.max(child_layout.world.x + child_layout.size.width - world.x);
            extent.y = extent.y.max(child_layout.world.y + child_layout.size.height - world.y);
        }
        let title_floor = layout.title.size.width + 2 * TITLE_ANCHOR.x;
        Size::new(
            (extent.x + PADDING_WHITE_BOX)
                .max(link_size.width)
                .max(title_floor),
            (extent.y + PADDING_WHITE_BOX).max(link_size.height),
        )
    };
    systems[id.as_usize()].size = Size::new(
        size.width.min(MAX_SYSTEM_WIDTH),
        size.height.min(MAX_SYSTEM_HEIGHT),
    );
}

fn compute_ports(graph: &SystemGraph, systems: &mut [SystemLayout]) {
    for id in graph.subsystems() {
        let layout = &systems[id.as_usize()];
        let (w, h) = (layout.size.width, layout.size.height);
        let world = layout.world;
        let mut ports = Vec::new();
        if layout.link_count <= 4 {
            // One port per edge, at the mid-edge cell.
            ports.push(world.offset(w / 2, -1));
            ports.push(world.offset(w, h / 2));
            ports.push(world.offset(w / 2, h));
            ports.push(world.offset(-1, h / 2));
        } else {
            // Left and right mid-edge, then a top/bottom pair per odd column.
            ports.push(world.offset(-1, h / 2));
            ports.push(world.offset(w, h / 2));
            let mut x = 1;
            while x <= w - 1 {
                ports.push(world.offset(x, -1));
                ports.push(world.offset(x, h));
                x += 2;
            }
        }
        systems[id.as_usize()].ports = ports;
    }
}

fn anchor_titles(systems: &mut [SystemLayout]) {
    for layout in systems.iter_mut() {
        layout.title.world = layout.world.offset(TITLE_ANCHOR.x, TITLE_ANCHOR.y);
    }
}

fn visible_bounds(graph: &SystemGraph, systems: &[SystemLayout]) -> WorldBounds {
    let mut bounds: Option<WorldBounds> = None;
    for id in graph.subsystems() {
        let layout = &systems[id.as_usize()];
        if !layout.drawn() {
            continue;
        }
        let min = layout.world;
        let max = layout.world.offset(layout.size.width, layout.size.height);
        bounds = Some(match bounds {
            None => WorldBounds { min, max },
            Some(b) => WorldBounds {
                min: Point::new(b.min.x.min(min.x), b.min.y.min(min.y)),
                max: Point::new(b.max.x.max(max.x), b.max.y.max(max.y)),
            },
        });
    }
    bounds.unwrap_or_default()
}
