// Copyright 2026 the Flowgrid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Referential checks over the hydrated graph.
//!
//! Validation runs after hydration and reports problems as data; it never
//! rejects a document. Per-link checks come first in link order, then a
//! duplicates pass flags every member of a family of links joining the same
//! unordered pair of systems.

use hashbrown::HashMap;

use crate::error::{ErrorMessage, ValidationError};
use crate::graph::{Endpoint, SystemGraph};

/// Check every link of the graph and return the issues found.
pub fn validate(graph: &SystemGraph) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    for link in &graph.links {
        // Self-reference makes the remaining per-link checks moot.
        let same = match (link.a.target, link.b.target) {
            (Some(a), Some(b)) => a == b,
            _ => link.a.raw == link.b.raw,
        };
        if same {
            errors.push(ValidationError::new(
                ErrorMessage::SelfReference,
                format!("/links/{}", link.index),
            ));
            continue;
        }

        for (endpoint, side) in [(&link.a, "a"), (&link.b, "b")] {
            let message = match endpoint.target {
                None => Some(ErrorMessage::Missing),
                // Linking to a container whose children are visible is
                // ambiguous; the children are the real endpoints.
                Some(target) if !graph.is_leaf(target) => Some(ErrorMessage::Inaccurate),
                Some(_) => None,
            };
            if let Some(message) = message {
                errors.push(ValidationError::new(
                    message,
                    format!("/links/{}/{side}", link.index),
                ));
            }
        }
    }

    // Duplicates: `(a, b)` and `(b, a)` are the same unordered edge. Count
    // first, then walk the links again so errors come out in document order.
    let mut families: HashMap<(String, String), usize> = HashMap::new();
    for link in &graph.links {
        *families.entry(edge_key(graph, link)).or_default() += 1;
    }
    for link in &graph.links {
        if families[&edge_key(graph, link)] > 1 {
            errors.push(ValidationError::new(
                ErrorMessage::Duplicate,
                format!("/links/{}", link.index),
            ));
        }
    }

    errors
}

/// Canonical unordered key for a link: resolved canonical ids when available,
/// raw paths otherwise.
fn edge_key(graph: &SystemGraph, link: &crate::graph::Link) -> (String, String) {
    let name = |endpoint: &Endpoint| match endpoint.target {
        Some(target) => graph.node(target).canonical_id.clone(),
        None => endpoint.raw.clone(),
    };
    let a = name(&link.a);
    let b = name(&link.b);
    if a <= b { (a, b) } else { (b, a) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::load;
    use crate::spec::{LinkSpec, SubsystemSpec, SystemSpec};

    fn subsystem(id: &str) -> SubsystemSpec {
        SubsystemSpec {
            id: id.into(),
            ..Default::default()
        }
    }

    fn link(a: &str, b: &str) -> LinkSpec {
        LinkSpec {
            a: a.into(),
            b: b.into(),
        }
    }

    fn check(spec: SystemSpec) -> Vec<(ErrorMessage, String)> {
        load(spec)
            .errors
            .into_iter()
            .map(|e| (e.message, e.path))
            .collect()
    }

    #[test]
    fn both_directions_of_an_edge_are_duplicates() {
        let errors = check(SystemSpec {
            title: "Root".into(),
            systems: vec![subsystem("foo"), subsystem("bar")],
            links: vec![link("foo", "bar"), link("bar", "foo")],
            ..Default::default()
        });
        assert_eq!(
            errors,
            [
                (ErrorMessage::Duplicate, "/links/0".to_owned()),
                (ErrorMessage::Duplicate, "/links/1".to_owned()),
            ]
        );
    }

    #[test]
    fn self_reference_is_reported_once() {
        let errors = check(SystemSpec {
            title: "Root".into(),
            systems: vec![subsystem("foo")],
            links: vec![link("foo", "foo")],
            ..Default::default()
        });
        assert_eq!(
            errors,
            [(ErrorMessage::SelfReference, "/links/0".to_owned())]
        );
    }

    #[test]
    fn linking_a_container_with_children_is_inaccurate() {
        let errors = check(SystemSpec {
            title: "Root".into(),
            systems: vec![
                SubsystemSpec {
                    id: "foo".into(),
                    systems: vec![subsystem("bar")],
                    ..Default::default()
                },
                subsystem("bar"),
            ],
            links: vec![link("foo", "bar")],
            ..Default::default()
        });
        assert_eq!(errors, [(ErrorMessage::Inaccurate, "/links/0/a".to_owned())]);
    }

    #[test]
    fn unresolved_endpoints_are_missing() {
        let errors = check(SystemSpec {
            title: "Root".into(),
            systems: vec![subsystem("foo")],
            links: vec![link("ghost", "phantom")],
            ..Default::default()
        });
        assert_eq!(
            errors,
            [
                (ErrorMessage::Missing, "/links/0/a".to_owned()),
                (ErrorMessage::Missing, "/links/0/b".to_owned()),
            ]
        );
    }

    #[test]
    fn clean_documents_validate_clean() {
        let errors = check(SystemSpec {
            title: "Root".into(),
            systems: vec![subsystem("foo"), subsystem("bar"), subsystem("baz")],
            links: vec![link("foo", "bar"), link("bar", "baz")],
            ..Default::default()
        });
        assert!(errors.is_empty());
    }

    #[test]
    fn duplicates_match_on_raw_paths_when_unresolved() {
        // Both links join `db` and the unresolved path `ghost`; the edge key
        // falls back to the raw spelling for the missing end.
        let errors = check(SystemSpec {
            title: "Root".into(),
            systems: vec![subsystem("db")],
            links: vec![link("ghost", "db"), link("db", "ghost")],
            ..Default::default()
        });
        assert_eq!(
            errors,
            [
                (ErrorMessage::Missing, "/links/0/a".to_owned()),
                (ErrorMessage::Missing, "/links/1/b".to_owned()),
                (ErrorMessage::Duplicate, "/links/0".to_owned()),
                (ErrorMessage::Duplicate, "/links/1".to_owned()),
            ]
        );
    }
}
