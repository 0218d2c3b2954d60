// Copyright 2026 the Flowgrid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Link routing over the rasterised grid.
//!
//! Links are routed in document order; earlier links claim cheap terrain and
//! later links pay the reuse weight on painted cells, which is what makes
//! shared corridors emerge. Before each search, the ports of every system
//! unrelated to the link are temporarily blocked so a path cannot tunnel
//! through a container it has no business entering.

use hashbrown::{HashMap, HashSet};

use flowgrid_grid::{AstarConfig, CellCoord, PathGrid};
use flowgrid_model::{Point, SystemGraph, SystemId};

use crate::layout::Layout;
use crate::object::{LinkVariant, SimObject};
use crate::raster::{TileGrid, to_cell};

/// Weight painted onto routed cells: walkable for later links, but twice the
/// price of fresh terrain.
const PATH_WEIGHT: f64 = 2.0;

/// Routes keyed by source and destination canonical id.
pub(crate) type RouteTable = HashMap<String, HashMap<String, Vec<Point>>>;

/// Route every resolvable link and return the route table.
pub(crate) fn route_links(
    graph: &SystemGraph,
    layout: &Layout,
    tiles: &mut TileGrid,
    paths: &mut PathGrid,
    config: &AstarConfig,
) -> RouteTable {
    let mut routes = RouteTable::new();
    for link in &graph.links {
        let (Some(a), Some(b)) = (link.a.target, link.b.target) else {
            continue;
        };
        if a == b || !layout.of(a).drawn() || !layout.of(b).drawn() {
            continue;
        }
        route_one(graph, layout, link.index, a, b, tiles, paths, config, &mut routes);
    }
    routes
}

fn route_one(
    graph: &SystemGraph,
    layout: &Layout,
    link_index: usize,
    a: SystemId,
    b: SystemId,
    tiles: &mut TileGrid,
    paths: &mut PathGrid,
    config: &AstarConfig,
    routes: &mut RouteTable,
) {
    // The allowance set: the endpoints and every ancestor of either. Paths
    // may enter those containers' ports and no others.
    let mut allowed: HashSet<SystemId> = HashSet::new();
    allowed.insert(a);
    allowed.insert(b);
    allowed.extend(graph.ancestors(a));
    allowed.extend(graph.ancestors(b));

    let mut blocked: Vec<(CellCoord, f64)> = Vec::new();
    for id in graph.subsystems() {
        if allowed.contains(&id) || !layout.of(id).drawn() {
            continue;
        }
        for port in &layout.of(id).ports {
            let cell = to_cell(layout, *port);
            blocked.push((cell, paths.weight(cell)));
            paths.set_weight(cell, f64::INFINITY);
        }
    }

    // Candidate port pairs: both ends still open (a port stays open until a
    // routed path paints a link tile over it), nearest pairs first. Distance
    // ties break on port coordinates (row before column, `a` before `b`) and
    // finally on the ports' declaration indices.
    let ports_a = open_ports(layout, tiles, a);
    let ports_b = open_ports(layout, tiles, b);
    let mut candidates: Vec<(CellCoord, CellCoord, usize, usize)> = Vec::new();
    for &(index_a, pa) in &ports_a {
        for &(index_b, pb) in &ports_b {
            candidates.push((pa, pb, index_a, index_b));
        }
    }
    candidates.sort_by_key(|&(pa, pb, index_a, index_b)| {
        let (dx, dy) = (pa.x - pb.x, pa.y - pb.y);
        (dx * dx + dy * dy, pa.y, pa.x, pb.y, pb.x, index_a, index_b)
    });

    let mut routed = false;
    for &(pa, pb, _, _) in &candidates {
        let path = paths.find_path(pa, pb, config);
        if path.is_empty() {
            continue;
        }
        paint_path(layout, link_index, a, b, &path, tiles, paths);

        let from = graph.node(a).canonical_id.clone();
        let to = graph.node(b).canonical_id.clone();
        let forward: Vec<Point> = path.iter().map(|c| Point::new(c.x, c.y)).collect();
        let mut backward = forward.clone();
        backward.reverse();
        routes
            .entry(from.clone())
            .or_default()
            .insert(to.clone(), forward);
        routes.entry(to).or_default().insert(from, backward);
        routed = true;
        break;
    }

    if !routed {
        tracing::warn!(
            link = link_index,
            from = %graph.node(a).canonical_id,
            to = %graph.node(b).canonical_id,
            "link could not be routed; it contributes no tiles"
        );
    }
    for (cell, weight) in blocked {
        paths.set_weight(cell, weight);
    }
}

/// The ports of a system whose cell still has a port on top of its stack,
/// paired with their index in the system's port list.
fn open_ports(layout: &Layout, tiles: &TileGrid, id: SystemId) -> Vec<(usize, CellCoord)> {
    layout
        .of(id)
        .ports
        .iter()
        .enumerate()
        .map(|(index, port)| (index, to_cell(layout, *port)))
        .filter(|(_, cell)| tiles.top(cell.x, cell.y).is_some_and(SimObject::is_port))
        .collect()
}

fn paint_path(
    layout: &Layout,
    link_index: usize,
    a: SystemId,
    b: SystemId,
    path: &[CellCoord],
    tiles: &mut TileGrid,
    paths: &mut PathGrid,
) {
    let last = path.len() - 1;
    for (i, &cell) in path.iter().enumerate() {
        let prev = if i == 0 {
            outward_of(layout, a, cell)
        } else {
            path[i - 1]
        };
        let next = if i == last {
            outward_of(layout, b, cell)
        } else {
            path[i + 1]
        };
        tiles.push(
            cell.x,
            cell.y,
            SimObject::Link {
                link: link_index,
                variant: classify(prev, cell, next),
            },
        );
        paths.set_weight(cell, PATH_WEIGHT);
    }
}

/// The virtual cell one step outward from the box a port belongs to. Used to
/// give path endpoints a predecessor/successor for direction classification.
fn outward_of(layout: &Layout, system: SystemId, port: CellCoord) -> CellCoord {
    let record = layout.of(system);
    let origin = layout.boundaries.to_grid(record.world);
    if port.y < origin.y {
        CellCoord::new(port.x, port.y - 1)
    } else if port.y >= origin.y + record.size.height {
        CellCoord::new(port.x, port.y + 1)
    } else if port.x < origin.x {
        CellCoord::new(port.x - 1, port.y)
    } else {
        CellCoord::new(port.x + 1, port.y)
    }
}

#[derive(Copy, Clone, PartialEq, Eq)]
enum Side {
    Top,
    Bottom,
    Left,
    Right,
}

fn side_of(neighbour: CellCoord, cell: CellCoord) -> Side {
    if neighbour.y < cell.y {
        Side::Top
    } else if neighbour.y > cell.y {
        Side::Bottom
    } else if neighbour.x > cell.x {
        Side::Right
    } else {
        Side::Left
    }
}

/// Classify how a path runs through `cell` from the sides its neighbours
/// sit on.
fn classify(prev: CellCoord, cell: CellCoord, next: CellCoord) -> LinkVariant {
    use Side::{Bottom, Left, Right, Top};
    match (side_of(prev, cell), side_of(next, cell)) {
        (Top, Bottom) | (Bottom, Top) | (Top, Top) | (Bottom, Bottom) => LinkVariant::Vertical,
        (Left, Right) | (Right, Left) | (Left, Left) | (Right, Right) => LinkVariant::Horizontal,
        (Bottom, Right) | (Right, Bottom) => LinkVariant::BottomToRight,
        (Bottom, Left) | (Left, Bottom) => LinkVariant::BottomToLeft,
        (Top, Right) | (Right, Top) => LinkVariant::TopToRight,
        (Top, Left) | (Left, Top) => LinkVariant::TopToLeft,
    }
}
