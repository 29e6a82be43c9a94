// src/lib.rs
//! A lazy traversal engine for labeled property multigraphs.
//!
//! A traversal is built with [`Traversal`], compiled into a validated
//! [`Pipeline`], executed against any [`GraphView`] as a pull-based stream
//! of path-bearing [`Traverser`]s, and optionally folded by [`TreeCollector`]
//! into an insertion-ordered [`TreeNode`] keyed by a display property.
//!
//! ```
//! use gremlite::{PropertyGraph, Predicate, Traversal, Branch, Value};
//! use std::collections::HashMap;
//!
//! let mut g = PropertyGraph::new();
//! let name = |n: &str| HashMap::from([("name".to_string(), Value::from(n))]);
//! let db = g.add_vertex("Database", name("Test DB"));
//! let schema = g.add_vertex("Schema", name("Test Schema1"));
//! let table = g.add_vertex("Table", name("Table1"));
//! g.add_edge("has_Schema", db, schema).unwrap();
//! g.add_edge("has_Table", schema, table).unwrap();
//!
//! let tree = Traversal::start("Database", "name", Predicate::eq("Test DB"))
//!     .out("has_Schema")
//!     .union([
//!         Branch::new().out("has_Table").has("name", Predicate::without(["Table2"])),
//!         Branch::new().out("has_Table").has("name", Predicate::within(["Table1"])),
//!     ])
//!     .range(0, 100)
//!     .compile()
//!     .unwrap()
//!     .tree(&g, "name")
//!     .unwrap();
//!
//! assert_eq!(tree.to_string(), "{Test Schema1={Table1={}}}");
//! ```

pub mod datatypes;
pub mod graph;

pub use datatypes::values::Value;
pub use graph::engine::{TraversalEngine, Traverser, TraverserStream};
pub use graph::error::{BuildError, GraphError, TraversalError};
pub use graph::pipeline::{Branch, Pipeline, Step, Traversal};
pub use graph::predicates::Predicate;
pub use graph::schema::{EdgeData, PropertyGraph, VertexData};
pub use graph::tree::{TreeCollector, TreeNode};
pub use graph::view::{GraphView, VertexId};
