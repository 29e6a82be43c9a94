// src/graph/view.rs
use std::fmt;
use serde::{Serialize, Deserialize};

use crate::datatypes::values::Value;
use crate::graph::error::GraphError;
use crate::graph::predicates::Predicate;

/// Opaque vertex identifier, unique within one graph view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VertexId(pub u64);

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// Read-only accessor over a labeled property multigraph.
///
/// This is the storage collaborator's contract. The view must present a
/// stable snapshot for the whole lifetime of a traversal (the equivalent of
/// a snapshot-isolated read transaction); the engine holds it as a shared
/// borrow and never mutates through it.
///
/// All methods are fallible so storage-backed implementations can surface
/// connectivity loss. The in-memory [`PropertyGraph`](crate::graph::schema::PropertyGraph)
/// only fails on unknown vertex ids.
pub trait GraphView {
    /// Vertices whose label matches and whose property `key` satisfies
    /// `predicate`, in the view's stable enumeration order. An unknown
    /// label yields an empty set, not an error.
    fn vertices_by_label_and_property(
        &self,
        label: &str,
        key: &str,
        predicate: &Predicate,
    ) -> Result<Vec<VertexId>, GraphError>;

    /// Targets of outgoing edges labeled `edge_label`, in the view's stable
    /// edge order. Parallel edges each contribute one entry.
    fn out_neighbors(&self, vertex: VertexId, edge_label: &str) -> Result<Vec<VertexId>, GraphError>;

    /// The value of property `key` on `vertex`, or `None` if unset.
    fn property(&self, vertex: VertexId, key: &str) -> Result<Option<Value>, GraphError>;

    /// The label of `vertex`.
    fn label(&self, vertex: VertexId) -> Result<String, GraphError>;
}
