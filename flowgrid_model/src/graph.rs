// Copyright 2026 the Flowgrid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The hydrated runtime graph.
//!
//! Systems live in an arena indexed by [`SystemId`]; parent and link endpoint
//! references are indices, which sidesteps reference cycles while keeping
//! traversal O(1). The graph is built in one pass by the loader and is
//! read-only afterwards, except for the simulator syncing computed geometry
//! back onto the nodes.

use hashbrown::HashMap;

use crate::types::{Point, Size};

/// Identifier of a system in the arena. The root is always [`SystemId::ROOT`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SystemId(pub(crate) u32);

impl SystemId {
    /// The root system.
    pub const ROOT: Self = Self(0);

    /// The arena slot behind this id, usable to index caller-side tables
    /// that run parallel to the graph's nodes.
    #[inline]
    pub const fn as_usize(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub(crate) const fn idx(self) -> usize {
        self.0 as usize
    }
}

/// One system in the runtime tree.
#[derive(Clone, Debug)]
pub struct SystemNode {
    /// Local identifier (empty for the root).
    pub id: String,
    /// Dot-joined path from the root, the system's global identity.
    /// Empty for the root itself.
    pub canonical_id: String,
    /// Position in the parent's child list.
    pub index: usize,
    /// Containing system; `None` for the root.
    pub parent: Option<SystemId>,
    /// Child systems in document order.
    pub children: Vec<SystemId>,
    /// World position. Relative to the parent as declared/defaulted by the
    /// loader; overwritten with the absolute position by the simulator's
    /// sync-back.
    pub position: Point,
    /// Box size in tiles, computed by the simulator.
    pub size: Size,
    /// Port coordinates on the box perimeter, computed by the simulator.
    pub ports: Vec<Point>,
    /// Display title, if declared.
    pub title: Option<String>,
    /// Draw opaque and suppress descendants.
    pub hide_systems: bool,
}

/// One end of a link: the raw dotted path and, when resolution succeeded,
/// the target system.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Endpoint {
    /// The dotted path as written in the document.
    pub raw: String,
    /// The resolved system, if the path resolved.
    pub target: Option<SystemId>,
}

/// A link between two systems.
#[derive(Clone, Debug)]
pub struct Link {
    /// Position in the document's link list.
    pub index: usize,
    /// First endpoint.
    pub a: Endpoint,
    /// Second endpoint.
    pub b: Endpoint,
}

/// One step of a flow after normalisation.
#[derive(Clone, Debug)]
pub struct FlowStep {
    /// Dense keyframe rank (`0..k`).
    pub keyframe: u32,
    /// Source endpoint.
    pub from: Endpoint,
    /// Destination endpoint.
    pub to: Endpoint,
    /// Indices into the graph's link list forming the discovered route,
    /// empty when the endpoints are unresolved or disconnected.
    pub links: Vec<usize>,
}

/// A flow: an ordered list of steps with dense keyframes.
#[derive(Clone, Debug, Default)]
pub struct Flow {
    /// Steps in document order.
    pub steps: Vec<FlowStep>,
}

impl Flow {
    /// Number of distinct keyframes after normalisation.
    pub fn keyframe_count(&self) -> u32 {
        self.steps
            .iter()
            .map(|s| s.keyframe + 1)
            .max()
            .unwrap_or(0)
    }

    /// The steps active at `keyframe`, in document order.
    pub fn steps_at(&self, keyframe: u32) -> impl Iterator<Item = &FlowStep> {
        self.steps.iter().filter(move |s| s.keyframe == keyframe)
    }
}

/// The hydrated runtime tree plus its links and flows.
#[derive(Clone, Debug, Default)]
pub struct SystemGraph {
    pub(crate) nodes: Vec<SystemNode>,
    /// Links in document order.
    pub links: Vec<Link>,
    /// Flows in document order.
    pub flows: Vec<Flow>,
    pub(crate) by_canonical_id: HashMap<String, SystemId>,
}

impl SystemGraph {
    /// The root system.
    #[inline]
    pub fn root(&self) -> SystemId {
        SystemId::ROOT
    }

    /// Number of systems, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the graph holds no systems at all (never true once loaded).
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Access a system by id.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not produced by this graph.
    pub fn node(&self, id: SystemId) -> &SystemNode {
        &self.nodes[id.idx()]
    }

    /// Mutable access for geometry sync-back.
    pub fn node_mut(&mut self, id: SystemId) -> &mut SystemNode {
        &mut self.nodes[id.idx()]
    }

    /// Resolve a canonical id to its system.
    pub fn resolve(&self, canonical_id: &str) -> Option<SystemId> {
        self.by_canonical_id.get(canonical_id).copied()
    }

    /// The children of a system, in document order.
    pub fn children_of(&self, id: SystemId) -> &[SystemId] {
        &self.node(id).children
    }

    /// The parent of a system, `None` for the root.
    pub fn parent_of(&self, id: SystemId) -> Option<SystemId> {
        self.node(id).parent
    }

    /// Whether a system has no children.
    pub fn is_leaf(&self, id: SystemId) -> bool {
        self.node(id).children.is_empty()
    }

    /// Strict ancestors of `id`, nearest first, ending at the root.
    pub fn ancestors(&self, id: SystemId) -> impl Iterator<Item = SystemId> + '_ {
        core::iter::successors(self.parent_of(id), |current| self.parent_of(*current))
    }

    /// Whether `id` equals `of` or sits anywhere beneath it.
    pub fn is_within(&self, id: SystemId, of: SystemId) -> bool {
        id == of || self.ancestors(id).any(|a| a == of)
    }

    /// All non-root systems in depth-first document order.
    pub fn subsystems(&self) -> Vec<SystemId> {
        let mut out = Vec::with_capacity(self.nodes.len().saturating_sub(1));
        self.collect_subtree(SystemId::ROOT, &mut out);
        out
    }

    fn collect_subtree(&self, id: SystemId, out: &mut Vec<SystemId>) {
        for &child in self.children_of(id) {
            out.push(child);
            self.collect_subtree(child, out);
        }
    }

    /// The title shown for a system: its declared title, or its id.
    pub fn display_title(&self, id: SystemId) -> &str {
        let node = self.node(id);
        node.title.as_deref().unwrap_or(&node.id)
    }

    pub(crate) fn push_node(&mut self, node: SystemNode) -> SystemId {
        debug_assert!(
            self.nodes.len() < u32::MAX as usize,
            "system arena exceeds u32 indices"
        );
        #[allow(
            clippy::cast_possible_truncation,
            reason = "SystemId uses 32-bit indices by design."
        )]
        let id = SystemId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }
}
