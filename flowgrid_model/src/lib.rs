// Copyright 2026 the Flowgrid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Flowgrid Model: specification loading and validation.
//!
//! This crate turns a declarative architecture description (a tree of named
//! boxes plus links and animated flows) into a runtime graph the simulator
//! can lay out.
//!
//! - Raw document types ([`SystemSpec`] and friends) mirror the JSON/YAML
//!   input one to one and deserialize with serde.
//! - [`load`] hydrates a document into a [`SystemGraph`]: an arena of systems
//!   with stable indices, canonical dotted-path ids, resolved link endpoints,
//!   normalised flow keyframes, and defaulted positions.
//! - Referential problems (a link naming a system that does not exist, a
//!   duplicated edge) never abort loading; they come back as
//!   [`ValidationError`] values next to the graph.
//!
//! # Example
//!
//! ```rust
//! let loaded = flowgrid_model::load_yaml(
//!     r#"
//! title: Shop
//! systems:
//!   - id: gateway
//!   - id: db
//! links:
//!   - a: gateway
//!     b: db
//! "#,
//! )
//! .expect("well-formed document");
//! assert!(loaded.errors.is_empty());
//! let gateway = loaded.graph.resolve("gateway").unwrap();
//! assert_eq!(loaded.graph.node(gateway).canonical_id, "gateway");
//! ```

mod error;
mod graph;
mod loader;
mod spec;
mod types;
mod validate;

pub use error::{ErrorMessage, LoadError, ValidationError};
pub use graph::{Endpoint, Flow, FlowStep, Link, SystemGraph, SystemId, SystemNode};
pub use loader::{Loaded, load, load_json, load_yaml};
pub use spec::{FlowSpec, FlowStepSpec, LinkSpec, SubsystemSpec, SystemSpec};
pub use types::{Point, Size};
pub use validate::validate;
