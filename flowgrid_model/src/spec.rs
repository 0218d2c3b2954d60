// Copyright 2026 the Flowgrid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Raw specification document types.
//!
//! These mirror the `dataflows.io/system.json` document shape one to one and
//! carry no derived state. Structural validation (types, required keys) is the
//! deserializer's job; referential validation happens after hydration.

use serde::{Deserialize, Serialize};

use crate::types::Point;

/// A complete specification document: the root system plus its links and
/// flows.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SystemSpec {
    /// Schema version the document was authored against.
    #[serde(default)]
    pub specification_version: String,
    /// Title of the root system.
    pub title: String,
    /// Top-level sub-systems.
    #[serde(default)]
    pub systems: Vec<SubsystemSpec>,
    /// Links between sub-systems anywhere in the tree.
    #[serde(default)]
    pub links: Vec<LinkSpec>,
    /// Animated data flows over the links.
    #[serde(default)]
    pub flows: Vec<FlowSpec>,
}

/// One sub-system box, possibly containing further sub-systems.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubsystemSpec {
    /// Identifier, locally unique among siblings (`[a-zA-Z0-9_-]+`).
    pub id: String,
    /// Declared position relative to the parent. Defaulted when absent.
    #[serde(default)]
    pub position: Option<Point>,
    /// Display title; may contain `\n` for multi-line titles.
    #[serde(default)]
    pub title: Option<String>,
    /// Draw this system opaque and suppress its descendants.
    #[serde(default)]
    pub hide_systems: bool,
    /// Nested sub-systems.
    #[serde(default)]
    pub systems: Vec<SubsystemSpec>,
}

/// A link between two sub-systems, addressed by dotted path from the root
/// (e.g. `gateway.frontend`).
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkSpec {
    /// First endpoint path.
    pub a: String,
    /// Second endpoint path.
    pub b: String,
}

/// An animated flow: an ordered list of steps grouped into keyframes.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowSpec {
    /// The flow's steps in document order.
    #[serde(default)]
    pub steps: Vec<FlowStepSpec>,
}

/// One step of a flow: data travelling from one sub-system to another.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowStepSpec {
    /// Author-assigned keyframe; normalised to a dense rank during loading.
    pub keyframe: i64,
    /// Source dotted path.
    pub from: String,
    /// Destination dotted path.
    pub to: String,
}
