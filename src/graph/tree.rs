// src/graph/tree.rs
use std::collections::HashMap;
use std::fmt;

use crate::datatypes::values::Value;
use crate::graph::engine::Traverser;
use crate::graph::error::TraversalError;
use crate::graph::view::GraphView;

// ============================================================================
// TreeNode
// ============================================================================

/// Insertion-ordered mapping from display key to child node.
///
/// Backed by an entry vector plus a key→slot map, so children keep their
/// first-insertion order and repeat insertions of a key land on the existing
/// child without reordering it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TreeNode {
    entries: Vec<(Value, TreeNode)>,
    index: HashMap<Value, usize>,
}

impl TreeNode {
    pub fn new() -> Self {
        TreeNode::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The child under `key`, if present.
    pub fn child(&self, key: &Value) -> Option<&TreeNode> {
        self.index.get(key).map(|&slot| &self.entries[slot].1)
    }

    /// Child keys in first-insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(key, _)| key)
    }

    /// (key, child) pairs in first-insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&Value, &TreeNode)> {
        self.entries.iter().map(|(key, child)| (key, child))
    }

    /// Descend into the child under `key`, creating it on first encounter.
    /// Existing keys keep their slot.
    pub(crate) fn child_or_insert(&mut self, key: Value) -> &mut TreeNode {
        let slot = match self.index.get(&key) {
            Some(&slot) => slot,
            None => {
                let slot = self.entries.len();
                self.index.insert(key.clone(), slot);
                self.entries.push((key, TreeNode::new()));
                slot
            }
        };
        &mut self.entries[slot].1
    }

    /// Nested JSON object view, preserving child order.
    pub fn to_json(&self) -> serde_json::Value {
        let mut map = serde_json::Map::new();
        for (key, child) in &self.entries {
            map.insert(key.to_string(), child.to_json());
        }
        serde_json::Value::Object(map)
    }
}

/// Renders the nested `{key={..}, key={}}` form, matching the textual map
/// representation the result tree is compared against in tests.
impl fmt::Display for TreeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (key, child)) in self.entries.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}={}", key, child)?;
        }
        write!(f, "}}")
    }
}

// ============================================================================
// TreeCollector
// ============================================================================

/// Folds a traverser sequence into one deduplicated, order-preserving tree.
///
/// Each traverser's path is walked from the element after the start vertex
/// to the end; at each depth the vertex's display property selects (or
/// creates) the child to descend into. Paths that converge on the same
/// display value at the same depth merge into one node — the merge key is
/// the property value, never vertex identity.
pub struct TreeCollector<'g, G: GraphView> {
    graph: &'g G,
    display_key: String,
}

impl<'g, G: GraphView> TreeCollector<'g, G> {
    pub fn new(graph: &'g G, display_key: impl Into<String>) -> Self {
        TreeCollector {
            graph,
            display_key: display_key.into(),
        }
    }

    /// Consume `traversers` and build the tree. The first collaborator
    /// error aborts collection; empty input yields an empty root.
    pub fn collect<I>(&self, traversers: I) -> Result<TreeNode, TraversalError>
    where
        I: IntoIterator<Item = Result<Traverser, TraversalError>>,
    {
        let mut root = TreeNode::new();
        for item in traversers {
            let traverser = item?;
            let mut node = &mut root;
            // The start vertex is not part of the tree; its matched
            // descendants are
            for &vertex in traverser.path().iter().skip(1) {
                match self.graph.property(vertex, &self.display_key)? {
                    Some(display) => node = node.child_or_insert(display),
                    // No display value — this path contributes nothing deeper
                    None => break,
                }
            }
        }
        Ok(root)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::pipeline::{Branch, Traversal};
    use crate::graph::predicates::Predicate;
    use crate::graph::schema::PropertyGraph;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn named(name: &str) -> HashMap<String, Value> {
        let mut m = HashMap::new();
        m.insert("name".to_string(), Value::from(name));
        m
    }

    /// Database → {Schema1, Schema2}, Schema1 → {Table1, Table2}.
    fn mini_catalog() -> PropertyGraph {
        let mut g = PropertyGraph::new();
        let db = g.add_vertex("Database", named("Test DB"));
        let s1 = g.add_vertex("Schema", named("Test Schema1"));
        let s2 = g.add_vertex("Schema", named("Test Schema2"));
        let t1 = g.add_vertex("Table", named("Table1"));
        let t2 = g.add_vertex("Table", named("Table2"));
        g.add_edge("has_Schema", db, s1).unwrap();
        g.add_edge("has_Schema", db, s2).unwrap();
        g.add_edge("has_Table", s1, t1).unwrap();
        g.add_edge("has_Table", s1, t2).unwrap();
        g
    }

    // ========================================================================
    // TreeNode mechanics
    // ========================================================================

    #[test]
    fn test_children_keep_first_insertion_order() {
        let mut node = TreeNode::new();
        node.child_or_insert(Value::from("b"));
        node.child_or_insert(Value::from("a"));
        node.child_or_insert(Value::from("c"));
        // Re-inserting an existing key must not move it
        node.child_or_insert(Value::from("a"));

        let keys: Vec<String> = node.keys().map(|k| k.to_string()).collect();
        assert_eq!(keys, vec!["b", "a", "c"]);
    }

    #[test]
    fn test_display_renders_nested_maps() {
        let mut root = TreeNode::new();
        let t1 = root.child_or_insert(Value::from("Table1"));
        t1.child_or_insert(Value::from("Column1"));
        t1.child_or_insert(Value::from("Column2"));
        root.child_or_insert(Value::from("Table3"));

        assert_eq!(
            root.to_string(),
            "{Table1={Column1={}, Column2={}}, Table3={}}"
        );
        assert_eq!(TreeNode::new().to_string(), "{}");
    }

    #[test]
    fn test_to_json_preserves_order() {
        let mut root = TreeNode::new();
        root.child_or_insert(Value::from("z"));
        root.child_or_insert(Value::from("a"));

        assert_eq!(root.to_json().to_string(), r#"{"z":{},"a":{}}"#);
    }

    // ========================================================================
    // Collection
    // ========================================================================

    #[test]
    fn test_overlapping_branches_merge_into_one_node() {
        let g = mini_catalog();
        // Two branches both resolve to Table1: one excludes Table2, the
        // other names Table1 directly
        let pipeline = Traversal::start("Database", "name", Predicate::eq("Test DB"))
            .union([
                Branch::new()
                    .out("has_Schema")
                    .has("name", Predicate::eq("Test Schema1"))
                    .out("has_Table")
                    .has("name", Predicate::without(["Table2"])),
                Branch::new()
                    .out("has_Schema")
                    .has("name", Predicate::eq("Test Schema1"))
                    .out("has_Table")
                    .has("name", Predicate::within(["Table1"])),
            ])
            .compile()
            .unwrap();

        let tree = pipeline.tree(&g, "name").unwrap();
        assert_eq!(tree.to_string(), "{Test Schema1={Table1={}}}");

        let schema = tree.child(&Value::from("Test Schema1")).unwrap();
        assert_eq!(schema.len(), 1);
        assert!(schema.child(&Value::from("Table2")).is_none());
    }

    #[test]
    fn test_empty_stream_collects_to_empty_root() {
        let g = mini_catalog();
        let pipeline = Traversal::start("Database", "name", Predicate::eq("Nope"))
            .out("has_Schema")
            .compile()
            .unwrap();
        let tree = pipeline.tree(&g, "name").unwrap();
        assert!(tree.is_empty());
        assert_eq!(tree.to_string(), "{}");
    }

    #[test]
    fn test_recollection_is_idempotent() {
        let g = mini_catalog();
        let pipeline = Traversal::start("Database", "name", Predicate::eq("Test DB"))
            .out("has_Schema")
            .out("has_Table")
            .compile()
            .unwrap();

        let first = pipeline.tree(&g, "name").unwrap();
        let second = pipeline.tree(&g, "name").unwrap();
        assert_eq!(first, second);
        assert_eq!(first.to_string(), second.to_string());
    }

    #[test]
    fn test_vertex_without_display_key_truncates_its_path() {
        let mut g = PropertyGraph::new();
        let db = g.add_vertex("Database", named("Test DB"));
        let anon = g.add_vertex("Schema", HashMap::new());
        let t = g.add_vertex("Table", named("Table1"));
        g.add_edge("has_Schema", db, anon).unwrap();
        g.add_edge("has_Table", anon, t).unwrap();

        let pipeline = Traversal::start("Database", "name", Predicate::eq("Test DB"))
            .out("has_Schema")
            .out("has_Table")
            .compile()
            .unwrap();
        // The unnamed schema ends that path's contribution silently
        let tree = pipeline.tree(&g, "name").unwrap();
        assert!(tree.is_empty());
    }

    #[test]
    fn test_collection_order_follows_arrival_order() {
        let g = mini_catalog();
        let pipeline = Traversal::start("Database", "name", Predicate::eq("Test DB"))
            .out("has_Schema")
            .compile()
            .unwrap();
        let tree = pipeline.tree(&g, "name").unwrap();
        let keys: Vec<String> = tree.keys().map(|k| k.to_string()).collect();
        assert_eq!(keys, vec!["Test Schema1", "Test Schema2"]);
    }
}
