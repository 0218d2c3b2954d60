// Copyright 2026 the Flowgrid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pipeline orchestration and the query surface consumers use.

use flowgrid_grid::{AstarConfig, PathGrid};
use flowgrid_model::{Point, SystemGraph, SystemId};

use crate::layout::{Boundaries, Layout, WorldBounds, compute_layout};
use crate::object::SimObject;
use crate::raster::{TileGrid, rasterise};
use crate::route::{RouteTable, route_links};

/// The computed simulation: the addressable tile grid, its boundaries, and
/// the route table.
///
/// [`Simulator::compute`] runs the whole pipeline in one synchronous pass:
/// layout, rasterisation, link routing, and finally a sync-back of the
/// computed geometry (absolute position, size, ports) onto the graph nodes.
/// The result is immutable; the same input produces byte-identical output.
#[derive(Debug)]
pub struct Simulator {
    tiles: TileGrid,
    boundaries: Boundaries,
    visible: WorldBounds,
    routes: RouteTable,
}

impl Simulator {
    /// Run the pipeline with default routing configuration.
    pub fn compute(graph: &mut SystemGraph) -> Self {
        Self::compute_with(graph, &AstarConfig::default())
    }

    /// Run the pipeline with explicit A* tuning.
    pub fn compute_with(graph: &mut SystemGraph, config: &AstarConfig) -> Self {
        let layout = compute_layout(graph);
        let width = layout.boundaries.width().max(0) as usize;
        let height = layout.boundaries.height().max(0) as usize;

        let mut tiles = TileGrid::new(width, height);
        let mut paths = PathGrid::new(width, height);
        rasterise(graph, &layout, &mut tiles, &mut paths);
        let routes = route_links(graph, &layout, &mut tiles, &mut paths, config);
        sync_back(graph, &layout);

        tracing::debug!(
            width,
            height,
            routed = routes.len(),
            "simulation complete"
        );
        Self {
            tiles,
            boundaries: layout.boundaries,
            visible: layout.visible,
            routes,
        }
    }

    /// The rasterised grid; `grid.stack(x, y)` is the cell's object stack,
    /// bottom-most drawn first.
    pub fn layout(&self) -> &TileGrid {
        &self.tiles
    }

    /// The rasterised area and the world-to-grid translation.
    pub fn boundaries(&self) -> Boundaries {
        self.boundaries
    }

    /// The tight bounding rectangle of all drawn boxes, in world coordinates.
    pub fn visible_world_boundaries(&self) -> WorldBounds {
        self.visible
    }

    /// The object stack at a world coordinate.
    pub fn objects_at(&self, world_x: i64, world_y: i64) -> &[SimObject] {
        let grid = self.boundaries.to_grid(Point::new(world_x, world_y));
        self.tiles.stack(grid.x, grid.y)
    }

    /// The topmost system at a world coordinate. Margin cells do not count;
    /// they sit outside the box they belong to.
    pub fn subsystem_at(&self, world_x: i64, world_y: i64) -> Option<SystemId> {
        self.objects_at(world_x, world_y)
            .iter()
            .rev()
            .find_map(|object| match object {
                SimObject::SystemMargin { .. } => None,
                other => other.system(),
            })
    }

    /// The topmost link at a world coordinate.
    pub fn link_at(&self, world_x: i64, world_y: i64) -> Option<usize> {
        self.objects_at(world_x, world_y)
            .iter()
            .rev()
            .find_map(SimObject::link)
    }

    /// The routed path between two systems, in grid coordinates.
    ///
    /// Routes exist in both directions: `route(b, a)` is `route(a, b)`
    /// reversed.
    pub fn route(&self, from: &str, to: &str) -> Option<&[Point]> {
        self.routes.get(from)?.get(to).map(Vec::as_slice)
    }
}

/// Push the computed geometry back onto the graph so external consumers
/// observe absolute positions, sizes, and ports.
fn sync_back(graph: &mut SystemGraph, layout: &Layout) {
    for id in graph.subsystems() {
        let record = layout.of(id);
        let node = graph.node_mut(id);
        node.position = record.world;
        node.size = record.size;
        node.ports = record.ports.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flowgrid_model::{LinkSpec, Size, SubsystemSpec, SystemSpec, load};

    fn positioned(id: &str, x: i64, y: i64) -> SubsystemSpec {
        SubsystemSpec {
            id: id.into(),
            position: Some(Point::new(x, y)),
            ..Default::default()
        }
    }

    fn link(a: &str, b: &str) -> LinkSpec {
        LinkSpec {
            a: a.into(),
            b: b.into(),
        }
    }

    fn two_boxes_spec() -> SystemSpec {
        SystemSpec {
            title: "Root".into(),
            systems: vec![positioned("a", 0, 0), positioned("b", 20, 0)],
            links: vec![link("a", "b")],
            ..Default::default()
        }
    }

    #[test]
    fn unobstructed_siblings_route_straight() {
        let mut loaded = load(two_boxes_spec());
        let sim = Simulator::compute(&mut loaded.graph);

        let route = sim.route("a", "b").expect("link must route");
        // Nearest ports face each other across empty terrain: the path is
        // Manhattan-optimal and straight.
        let first = route.first().expect("route has cells");
        let last = route.last().expect("route has cells");
        let manhattan = (first.x - last.x).abs() + (first.y - last.y).abs();
        assert_eq!(route.len() as i64, manhattan + 1);
        let mut elbows = 0;
        for window in route.windows(3) {
            let d1 = (window[1].x - window[0].x, window[1].y - window[0].y);
            let d2 = (window[2].x - window[1].x, window[2].y - window[1].y);
            if d1 != d2 {
                elbows += 1;
            }
        }
        assert!(elbows <= 1, "straight-line siblings need at most one elbow");
    }

    #[test]
    fn routes_are_recorded_in_both_directions() {
        let mut loaded = load(two_boxes_spec());
        let sim = Simulator::compute(&mut loaded.graph);
        let forward = sim.route("a", "b").expect("forward route");
        let backward = sim.route("b", "a").expect("backward route");
        let mut reversed = forward.to_vec();
        reversed.reverse();
        assert_eq!(reversed, backward);
    }

    #[test]
    fn computation_is_deterministic() {
        let mut first = load(two_boxes_spec());
        let mut second = load(two_boxes_spec());
        let sim1 = Simulator::compute(&mut first.graph);
        let sim2 = Simulator::compute(&mut second.graph);
        assert_eq!(sim1.route("a", "b"), sim2.route("a", "b"));
        assert_eq!(sim1.boundaries(), sim2.boundaries());
    }

    #[test]
    fn link_tiles_are_painted_along_the_route() {
        let mut loaded = load(two_boxes_spec());
        let sim = Simulator::compute(&mut loaded.graph);
        let route = sim.route("a", "b").expect("route exists").to_vec();
        for cell in &route {
            let top = sim.layout().top(cell.x, cell.y).expect("cell painted");
            assert!(matches!(top, SimObject::Link { link: 0, .. }));
        }
    }

    #[test]
    fn five_links_resize_the_hub_and_sync_back() {
        let systems = vec![
            positioned("foo", 1, 1),
            positioned("n1", 20, 0),
            positioned("n2", 20, 10),
            positioned("n3", 20, 20),
            positioned("n4", 20, 30),
            positioned("n5", 20, 40),
        ];
        let links = (1..=5)
            .map(|i| link("foo", &format!("n{i}")))
            .collect();
        let mut loaded = load(SystemSpec {
            title: "Root".into(),
            systems,
            links,
            ..Default::default()
        });
        let _sim = Simulator::compute(&mut loaded.graph);

        let foo = loaded.graph.resolve("foo").expect("resolves");
        let node = loaded.graph.node(foo);
        assert_eq!(node.size, Size::new(4, 3));
        assert_eq!(node.ports.len(), 6, "left + right + two top/bottom pairs");
        // Sync-back rewrote the position to the absolute world coordinate:
        // declared (1, 1) plus the root's padding offset (2, 3).
        assert_eq!(node.position, Point::new(3, 4));
    }

    #[test]
    fn each_link_claims_its_own_port() {
        let mut loaded = load(SystemSpec {
            title: "Root".into(),
            systems: vec![
                positioned("hub", 20, 20),
                positioned("east", 40, 20),
                positioned("west", 0, 20),
            ],
            links: vec![link("hub", "east"), link("hub", "west")],
            ..Default::default()
        });
        let sim = Simulator::compute(&mut loaded.graph);
        let to_east = sim.route("hub", "east").expect("routes");
        let to_west = sim.route("hub", "west").expect("routes");
        assert_ne!(
            to_east.first(),
            to_west.first(),
            "a painted port is closed to later links"
        );
    }

    #[test]
    fn links_into_hidden_subtrees_are_silently_skipped() {
        let mut loaded = load(SystemSpec {
            title: "Root".into(),
            systems: vec![
                positioned("a", 0, 0),
                SubsystemSpec {
                    id: "vault".into(),
                    position: Some(Point::new(20, 0)),
                    hide_systems: true,
                    systems: vec![SubsystemSpec {
                        id: "secret".into(),
                        ..Default::default()
                    }],
                    ..Default::default()
                },
            ],
            links: vec![link("a", "vault.secret")],
            ..Default::default()
        });
        let sim = Simulator::compute(&mut loaded.graph);
        assert!(sim.route("a", "vault.secret").is_none());
    }

    #[test]
    fn paths_tunnel_into_white_containers_through_ports() {
        let mut loaded = load(SystemSpec {
            title: "Root".into(),
            systems: vec![
                positioned("x", 0, 0),
                SubsystemSpec {
                    id: "outer".into(),
                    position: Some(Point::new(14, 0)),
                    systems: vec![positioned("inner", 0, 0)],
                    ..Default::default()
                },
            ],
            links: vec![link("x", "outer.inner")],
            ..Default::default()
        });
        let sim = Simulator::compute(&mut loaded.graph);
        let outer = loaded.graph.resolve("outer").expect("resolves");
        let route = sim.route("x", "outer.inner").expect("tunnel route exists");

        // Some routed cell lies inside the container's box.
        let translate = sim.boundaries().translate;
        let outer_node = loaded.graph.node(outer);
        let inside = route.iter().any(|cell| {
            let world = Point::new(cell.x - translate.x, cell.y - translate.y);
            world.x >= outer_node.position.x
                && world.x < outer_node.position.x + outer_node.size.width
                && world.y >= outer_node.position.y
                && world.y < outer_node.position.y + outer_node.size.height
        });
        assert!(inside, "the route must pass through the container");
    }

    #[test]
    fn unrelated_ports_are_never_crossed() {
        // A bystander sits directly between the endpoints; the route may go
        // around its margin but must not pass through its ports.
        let mut loaded = load(SystemSpec {
            title: "Root".into(),
            systems: vec![
                positioned("a", 0, 0),
                positioned("bystander", 10, 0),
                positioned("b", 20, 0),
            ],
            links: vec![link("a", "b")],
            ..Default::default()
        });
        let sim = Simulator::compute(&mut loaded.graph);
        let bystander = loaded.graph.resolve("bystander").expect("resolves");
        let route = sim.route("a", "b").expect("route exists");
        let translate = sim.boundaries().translate;
        for port in &loaded.graph.node(bystander).ports {
            let cell = Point::new(port.x + translate.x, port.y + translate.y);
            assert!(
                !route.contains(&cell),
                "blocked bystander ports must stay clear"
            );
        }
    }

    #[test]
    fn world_queries_hit_boxes_and_links() {
        let mut loaded = load(two_boxes_spec());
        let sim = Simulator::compute(&mut loaded.graph);
        let a = loaded.graph.resolve("a").expect("resolves");
        let node = loaded.graph.node(a);

        // Centre of box `a`.
        let centre = (node.position.x + 1, node.position.y + 1);
        assert_eq!(sim.subsystem_at(centre.0, centre.1), Some(a));
        assert!(!sim.objects_at(centre.0, centre.1).is_empty());

        // A mid-route cell reports the link.
        let route = sim.route("a", "b").expect("route exists");
        let mid = route[route.len() / 2];
        let translate = sim.boundaries().translate;
        assert_eq!(sim.link_at(mid.x - translate.x, mid.y - translate.y), Some(0));

        // Far outside everything.
        assert_eq!(sim.subsystem_at(-1000, -1000), None);
        assert_eq!(sim.link_at(-1000, -1000), None);
    }

    #[test]
    fn empty_documents_simulate_to_an_empty_grid() {
        let mut loaded = load(SystemSpec {
            title: "Nothing".into(),
            ..Default::default()
        });
        let sim = Simulator::compute(&mut loaded.graph);
        assert_eq!(sim.visible_world_boundaries(), WorldBounds::default());
        assert!(sim.route("a", "b").is_none());
    }

    #[test]
    fn visible_boundaries_wrap_all_drawn_boxes() {
        let mut loaded = load(two_boxes_spec());
        let sim = Simulator::compute(&mut loaded.graph);
        let visible = sim.visible_world_boundaries();
        for name in ["a", "b"] {
            let id = loaded.graph.resolve(name).expect("resolves");
            let node = loaded.graph.node(id);
            assert!(node.position.x >= visible.min.x);
            assert!(node.position.y >= visible.min.y);
            assert!(node.position.x + node.size.width <= visible.max.x);
            assert!(node.position.y + node.size.height <= visible.max.y);
        }
        // The rasterised area is the visible area plus the boundary margin.
        let bounds = sim.boundaries();
        assert_eq!(bounds.min, visible.min.offset(-5, -5));
    }
}
