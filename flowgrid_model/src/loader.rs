// Copyright 2026 the Flowgrid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hydration of a raw specification into the runtime graph.
//!
//! Loading runs four ordered passes: subsystem enhancement (indices, parents,
//! canonical ids), link enhancement (endpoint resolution), flow enhancement
//! (keyframe normalisation and link-path discovery), and default positioning.
//! Loading never fails on semantic problems; unresolved references surface in
//! the returned error list and the graph is returned regardless.

use std::collections::VecDeque;

use hashbrown::HashMap;

use crate::error::{LoadError, ValidationError};
use crate::graph::{Endpoint, Flow, FlowStep, Link, SystemGraph, SystemId, SystemNode};
use crate::spec::{SubsystemSpec, SystemSpec};
use crate::types::{Point, Size};
use crate::validate::validate;

/// Horizontal spacing applied between auto-placed siblings.
const DEFAULT_POSITION_GAP: i64 = 10;

/// Result of hydrating a specification: the graph plus every semantic issue
/// the validator found.
#[derive(Clone, Debug)]
pub struct Loaded {
    /// The hydrated runtime graph.
    pub graph: SystemGraph,
    /// Semantic problems, empty for a clean document.
    pub errors: Vec<ValidationError>,
}

/// Hydrate and validate a parsed specification.
pub fn load(spec: SystemSpec) -> Loaded {
    let mut graph = SystemGraph::default();
    let root = graph.push_node(SystemNode {
        id: String::new(),
        canonical_id: String::new(),
        index: 0,
        parent: None,
        children: Vec::new(),
        position: Point::default(),
        size: Size::default(),
        ports: Vec::new(),
        title: Some(spec.title),
        hide_systems: false,
    });
    graph.by_canonical_id.insert(String::new(), root);

    // Pass 1: subsystem enhancement.
    let mut declared = vec![true];
    enhance_subsystems(&mut graph, root, spec.systems, &mut declared);

    // Pass 2: link enhancement.
    for (index, link) in spec.links.into_iter().enumerate() {
        let a = resolve_endpoint(&graph, link.a);
        let b = resolve_endpoint(&graph, link.b);
        graph.links.push(Link { index, a, b });
    }

    // Pass 3: flow enhancement.
    let adjacency = link_adjacency(&graph);
    for flow in spec.flows {
        let mut keyframes: Vec<i64> = flow.steps.iter().map(|s| s.keyframe).collect();
        keyframes.sort_unstable();
        keyframes.dedup();

        let steps = flow
            .steps
            .into_iter()
            .map(|step| {
                #[allow(
                    clippy::cast_possible_truncation,
                    reason = "Ranks are bounded by the step count."
                )]
                let keyframe = keyframes.binary_search(&step.keyframe).unwrap_or_default() as u32;
                let from = resolve_endpoint(&graph, step.from);
                let to = resolve_endpoint(&graph, step.to);
                let links = match (from.target, to.target) {
                    (Some(f), Some(t)) => link_path(&adjacency, f, t),
                    _ => Vec::new(),
                };
                FlowStep {
                    keyframe,
                    from,
                    to,
                    links,
                }
            })
            .collect();
        graph.flows.push(Flow { steps });
    }

    // Pass 4: default positioning.
    assign_default_positions(&mut graph, root, &declared);

    let errors = validate(&graph);
    tracing::debug!(
        systems = graph.len() - 1,
        links = graph.links.len(),
        flows = graph.flows.len(),
        errors = errors.len(),
        "hydrated specification tree"
    );
    Loaded { graph, errors }
}

/// Parse a YAML document and hydrate it.
pub fn load_yaml(text: &str) -> Result<Loaded, LoadError> {
    let spec: SystemSpec = serde_yaml::from_str(text)?;
    Ok(load(spec))
}

/// Parse a JSON document and hydrate it.
pub fn load_json(text: &str) -> Result<Loaded, LoadError> {
    let spec: SystemSpec = serde_json::from_str(text)?;
    Ok(load(spec))
}

fn enhance_subsystems(
    graph: &mut SystemGraph,
    parent: SystemId,
    specs: Vec<SubsystemSpec>,
    declared: &mut Vec<bool>,
) {
    for (index, sub) in specs.into_iter().enumerate() {
        let canonical_id = {
            let parent_canonical = graph.node(parent).canonical_id.as_str();
            join_path([parent_canonical, sub.id.as_str()])
        };
        let id = graph.push_node(SystemNode {
            id: sub.id,
            canonical_id: canonical_id.clone(),
            index,
            parent: Some(parent),
            children: Vec::new(),
            position: sub.position.unwrap_or_default(),
            size: Size::default(),
            ports: Vec::new(),
            title: sub.title,
            hide_systems: sub.hide_systems,
        });
        declared.push(sub.position.is_some());
        graph.node_mut(parent).children.push(id);
        // First declaration wins on a canonical-id collision.
        graph.by_canonical_id.entry(canonical_id).or_insert(id);
        enhance_subsystems(graph, id, sub.systems, declared);
    }
}

/// Join dotted-path components, filtering empty ones.
fn join_path<'a>(components: impl IntoIterator<Item = &'a str>) -> String {
    let mut out = String::new();
    for component in components.into_iter().filter(|c| !c.is_empty()) {
        if !out.is_empty() {
            out.push('.');
        }
        out.push_str(component);
    }
    out
}

/// Resolve a dotted path by descending the child lists, matching each
/// component against a child id. Any component that fails to match (an empty
/// one included) leaves the endpoint unresolved.
fn resolve_endpoint(graph: &SystemGraph, raw: String) -> Endpoint {
    let mut current = SystemId::ROOT;
    for component in raw.split('.') {
        match graph
            .children_of(current)
            .iter()
            .copied()
            .find(|&child| graph.node(child).id == component)
        {
            Some(child) => current = child,
            None => {
                return Endpoint { raw, target: None };
            }
        }
    }
    Endpoint {
        raw,
        target: Some(current),
    }
}

type LinkAdjacency = HashMap<SystemId, Vec<(SystemId, usize)>>;

/// The undirected link graph: for every doubly-resolved link, both endpoints
/// learn about each other. Neighbour lists are in link document order.
fn link_adjacency(graph: &SystemGraph) -> LinkAdjacency {
    let mut adjacency: LinkAdjacency = HashMap::new();
    for link in &graph.links {
        if let (Some(a), Some(b)) = (link.a.target, link.b.target) {
            adjacency.entry(a).or_default().push((b, link.index));
            adjacency.entry(b).or_default().push((a, link.index));
        }
    }
    adjacency
}

/// Breadth-first search from `from` to `to`, translated back into the links
/// joining each pair of adjacent systems on the discovered node path.
fn link_path(adjacency: &LinkAdjacency, from: SystemId, to: SystemId) -> Vec<usize> {
    if from == to {
        return Vec::new();
    }
    let mut breadcrumbs: HashMap<SystemId, (SystemId, usize)> = HashMap::new();
    let mut queue: VecDeque<SystemId> = VecDeque::new();
    queue.push_back(from);

    while let Some(current) = queue.pop_front() {
        let Some(neighbours) = adjacency.get(&current) else {
            continue;
        };
        for &(next, link_index) in neighbours {
            if next == from || breadcrumbs.contains_key(&next) {
                continue;
            }
            breadcrumbs.insert(next, (current, link_index));
            if next == to {
                let mut links = Vec::new();
                let mut cursor = to;
                while cursor != from {
                    let (previous, link) = breadcrumbs[&cursor];
                    links.push(link);
                    cursor = previous;
                }
                links.reverse();
                return links;
            }
            queue.push_back(next);
        }
    }
    Vec::new()
}

fn assign_default_positions(graph: &mut SystemGraph, id: SystemId, declared: &[bool]) {
    let children: Vec<SystemId> = graph.children_of(id).to_vec();
    let mut far_right = 0_i64;
    for child in children {
        if !declared[child.idx()] {
            graph.node_mut(child).position = Point::new(far_right + DEFAULT_POSITION_GAP, 0);
        }
        far_right = far_right.max(graph.node(child).position.x);
        assign_default_positions(graph, child, declared);
    }
}
