// src/graph/error.rs
use thiserror::Error;

use crate::graph::view::VertexId;

/// Structural problems detected when a pipeline is assembled.
/// These are reported before any graph access happens.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("pipeline has no steps")]
    Empty,
    #[error("a start step must be the first step of the pipeline, and may not appear again")]
    StartNotFirst,
    #[error("invalid range [{low}, {high}): low must not exceed high")]
    InvalidRange { low: usize, high: usize },
    #[error("union step has no branches")]
    EmptyUnion,
    #[error("union branch has no steps")]
    EmptyBranch,
    #[error("start steps are not allowed inside a union branch")]
    StartInBranch,
    #[error("range steps are not allowed inside a union branch")]
    RangeInBranch,
}

/// Failures raised by the graph view collaborator.
///
/// The engine propagates these unchanged — no retries, no partial recovery.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    #[error("vertex {0} not found in graph view")]
    VertexNotFound(VertexId),
    #[error("graph backend failure: {0}")]
    Backend(String),
}

/// Anything a traversal can surface to the caller.
///
/// Empty matches, dead-end paths and missing properties are never errors;
/// only malformed pipelines and collaborator failures reach this type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TraversalError {
    #[error(transparent)]
    Build(#[from] BuildError),
    #[error(transparent)]
    Graph(#[from] GraphError),
}
