// src/graph/schema.rs
use petgraph::graph::NodeIndex;
use petgraph::stable_graph::StableDiGraph;
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::datatypes::values::Value;
use crate::graph::error::GraphError;
use crate::graph::predicates::{self, Predicate};
use crate::graph::view::{GraphView, VertexId};

/// Data stored on a vertex: its label plus a free-form property map.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VertexData {
    pub label: String,
    pub properties: HashMap<String, Value>,
}

impl VertexData {
    pub fn new(label: String, properties: HashMap<String, Value>) -> Self {
        VertexData { label, properties }
    }
}

/// Data stored on an edge. Edges are directed and carry only a label;
/// multiple same-labeled edges between the same endpoints are allowed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EdgeData {
    pub label: String,
}

impl EdgeData {
    pub fn new(label: String) -> Self {
        EdgeData { label }
    }
}

pub type Graph = StableDiGraph<VertexData, EdgeData>;

// ============================================================================
// In-memory graph view
// ============================================================================

/// In-memory labeled property multigraph implementing [`GraphView`].
///
/// This is the reference view used by embedding applications and tests; a
/// storage-backed collaborator can substitute its own `GraphView` without
/// touching the engine. The write API exists to build graphs up front —
/// once a traversal holds the view, only the read contract is used.
#[derive(Debug, Default, Clone)]
pub struct PropertyGraph {
    graph: Graph,
    /// Per-label vertex lists in insertion order — the stable enumeration
    /// order behind `vertices_by_label_and_property`.
    type_indices: HashMap<String, Vec<NodeIndex>>,
}

impl PropertyGraph {
    pub fn new() -> Self {
        PropertyGraph::default()
    }

    /// Add a vertex with the given label and properties, returning its id.
    pub fn add_vertex(
        &mut self,
        label: impl Into<String>,
        properties: HashMap<String, Value>,
    ) -> VertexId {
        let label = label.into();
        let idx = self
            .graph
            .add_node(VertexData::new(label.clone(), properties));
        self.type_indices.entry(label).or_default().push(idx);
        VertexId(idx.index() as u64)
    }

    /// Add a directed edge labeled `label` from `source` to `target`.
    /// Parallel edges with the same label are permitted.
    pub fn add_edge(
        &mut self,
        label: impl Into<String>,
        source: VertexId,
        target: VertexId,
    ) -> Result<(), GraphError> {
        let src = self.index_of(source)?;
        let dst = self.index_of(target)?;
        self.graph.add_edge(src, dst, EdgeData::new(label.into()));
        Ok(())
    }

    pub fn vertex_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    fn index_of(&self, vertex: VertexId) -> Result<NodeIndex, GraphError> {
        let idx = NodeIndex::new(vertex.0 as usize);
        if self.graph.contains_node(idx) {
            Ok(idx)
        } else {
            Err(GraphError::VertexNotFound(vertex))
        }
    }

    fn vertex_data(&self, vertex: VertexId) -> Result<&VertexData, GraphError> {
        self.graph
            .node_weight(NodeIndex::new(vertex.0 as usize))
            .ok_or(GraphError::VertexNotFound(vertex))
    }
}

impl GraphView for PropertyGraph {
    fn vertices_by_label_and_property(
        &self,
        label: &str,
        key: &str,
        predicate: &Predicate,
    ) -> Result<Vec<VertexId>, GraphError> {
        // Unknown label is a normal empty result
        let Some(indices) = self.type_indices.get(label) else {
            return Ok(Vec::new());
        };
        let mut matches = Vec::new();
        for &idx in indices {
            if let Some(data) = self.graph.node_weight(idx) {
                if predicates::evaluate(data.properties.get(key), predicate) {
                    matches.push(VertexId(idx.index() as u64));
                }
            }
        }
        Ok(matches)
    }

    fn out_neighbors(&self, vertex: VertexId, edge_label: &str) -> Result<Vec<VertexId>, GraphError> {
        let idx = self.index_of(vertex)?;
        let mut targets: Vec<VertexId> = self
            .graph
            .edges_directed(idx, Direction::Outgoing)
            .filter(|edge| edge.weight().label == edge_label)
            .map(|edge| VertexId(edge.target().index() as u64))
            .collect();
        // petgraph walks adjacency lists most-recent-first; present edges
        // in insertion order
        targets.reverse();
        Ok(targets)
    }

    fn property(&self, vertex: VertexId, key: &str) -> Result<Option<Value>, GraphError> {
        Ok(self.vertex_data(vertex)?.properties.get(key).cloned())
    }

    fn label(&self, vertex: VertexId) -> Result<String, GraphError> {
        Ok(self.vertex_data(vertex)?.label.clone())
    }
}
