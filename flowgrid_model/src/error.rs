// Copyright 2026 the Flowgrid Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Structural load errors and semantic validation issues.
//!
//! The two are deliberately different shapes: a malformed document is an
//! `Err` from the parsing front door, while referential problems inside a
//! well-formed document are plain data returned alongside the hydrated graph
//! and never abort loading.

use core::fmt;

use serde::Serialize;
use thiserror::Error;

/// A document that could not be parsed at all.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The YAML front door rejected the document.
    #[error("malformed YAML document: {0}")]
    Yaml(#[from] serde_yaml::Error),
    /// The JSON front door rejected the document.
    #[error("malformed JSON document: {0}")]
    Json(#[from] serde_json::Error),
}

/// One semantic problem found in a well-formed document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    /// What went wrong.
    pub message: ErrorMessage,
    /// JSON-pointer style location, e.g. `/links/0` or `/links/2/a`.
    pub path: String,
}

impl ValidationError {
    pub(crate) fn new(message: ErrorMessage, path: String) -> Self {
        Self { message, path }
    }
}

/// The stable set of semantic error kinds.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ErrorMessage {
    /// A link endpoint path does not resolve to any sub-system.
    Missing,
    /// A link endpoint resolved to a container that still has children.
    Inaccurate,
    /// Both endpoints of a link name the same sub-system.
    SelfReference,
    /// Two links connect the same unordered pair of sub-systems.
    Duplicate,
}

impl ErrorMessage {
    /// The wire spelling of this kind.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Missing => "missing",
            Self::Inaccurate => "inaccurate",
            Self::SelfReference => "self-reference",
            Self::Duplicate => "duplicate",
        }
    }
}

impl fmt::Display for ErrorMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_spelling_is_stable() {
        assert_eq!(ErrorMessage::Missing.to_string(), "missing");
        assert_eq!(ErrorMessage::Inaccurate.to_string(), "inaccurate");
        assert_eq!(ErrorMessage::SelfReference.to_string(), "self-reference");
        assert_eq!(ErrorMessage::Duplicate.to_string(), "duplicate");
    }

    #[test]
    fn serializes_kebab_case() {
        let err = ValidationError::new(ErrorMessage::SelfReference, "/links/0".into());
        let json = serde_json::to_string(&err).expect("serializes");
        assert_eq!(json, r#"{"message":"self-reference","path":"/links/0"}"#);
    }
}
