// src/graph/pipeline.rs
// Step algebra and pipeline compilation. Purely structural — nothing in this
// module touches a graph view.

use crate::graph::engine::{TraversalEngine, TraverserStream};
use crate::graph::error::{BuildError, TraversalError};
use crate::graph::predicates::Predicate;
use crate::graph::tree::{TreeCollector, TreeNode};
use crate::graph::view::GraphView;

// ============================================================================
// Steps
// ============================================================================

/// One step of a compiled pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// Seed traversers from every vertex with this label whose property
    /// `key` satisfies `predicate`.
    Start {
        label: String,
        key: String,
        predicate: Predicate,
    },
    /// Expand each traverser along every matching outgoing edge.
    Out { edge_label: String },
    /// Keep a traverser only if its current vertex's property matches.
    Filter { key: String, predicate: Predicate },
    /// Feed each traverser through every branch; outputs concatenate
    /// branch-major in declaration order. Duplicates are expected here —
    /// they merge later, at tree collection.
    Union { branches: Vec<Branch> },
    /// Emit only traversers whose 0-based position falls in `[low, high)`.
    Range { low: usize, high: usize },
}

/// A union sub-pipeline: a chain of Out/Filter/Union steps applied from an
/// arriving traverser's current position. Built like Gremlin's anonymous
/// traversals; Start and Range steps are rejected at compile time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Branch {
    steps: Vec<Step>,
}

impl Branch {
    pub fn new() -> Self {
        Branch::default()
    }

    /// Build a branch from pre-assembled steps. Validated (no Start/Range,
    /// non-empty) when the owning pipeline is compiled.
    pub fn from_steps(steps: Vec<Step>) -> Self {
        Branch { steps }
    }

    pub fn out(mut self, edge_label: impl Into<String>) -> Self {
        self.steps.push(Step::Out {
            edge_label: edge_label.into(),
        });
        self
    }

    pub fn has(mut self, key: impl Into<String>, predicate: Predicate) -> Self {
        self.steps.push(Step::Filter {
            key: key.into(),
            predicate,
        });
        self
    }

    pub fn union(mut self, branches: impl IntoIterator<Item = Branch>) -> Self {
        self.steps.push(Step::Union {
            branches: branches.into_iter().collect(),
        });
        self
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Chained builder for a traversal expression.
///
/// ```
/// use gremlite::{Traversal, Branch, Predicate};
///
/// let pipeline = Traversal::start("Database", "name", Predicate::eq("Test DB"))
///     .union([
///         Branch::new().out("has_Schema").has("name", Predicate::eq("Test Schema1")),
///         Branch::new().out("has_Schema").has("name", Predicate::neq("Test Schema1")),
///     ])
///     .out("has_Table")
///     .range(0, 100)
///     .compile()
///     .unwrap();
/// assert_eq!(pipeline.steps().len(), 4);
/// ```
#[derive(Debug, Clone)]
pub struct Traversal {
    steps: Vec<Step>,
}

impl Traversal {
    /// Begin a traversal at every `label` vertex whose property `key`
    /// satisfies `predicate`.
    pub fn start(label: impl Into<String>, key: impl Into<String>, predicate: Predicate) -> Self {
        Traversal {
            steps: vec![Step::Start {
                label: label.into(),
                key: key.into(),
                predicate,
            }],
        }
    }

    pub fn out(mut self, edge_label: impl Into<String>) -> Self {
        self.steps.push(Step::Out {
            edge_label: edge_label.into(),
        });
        self
    }

    pub fn has(mut self, key: impl Into<String>, predicate: Predicate) -> Self {
        self.steps.push(Step::Filter {
            key: key.into(),
            predicate,
        });
        self
    }

    pub fn union(mut self, branches: impl IntoIterator<Item = Branch>) -> Self {
        self.steps.push(Step::Union {
            branches: branches.into_iter().collect(),
        });
        self
    }

    pub fn range(mut self, low: usize, high: usize) -> Self {
        self.steps.push(Step::Range { low, high });
        self
    }

    /// Validate the accumulated steps into an executable [`Pipeline`].
    pub fn compile(self) -> Result<Pipeline, BuildError> {
        Pipeline::new(self.steps)
    }
}

// ============================================================================
// Pipeline
// ============================================================================

/// A validated, ordered sequence of traversal steps.
#[derive(Debug, Clone, PartialEq)]
pub struct Pipeline {
    steps: Vec<Step>,
}

impl Pipeline {
    /// Validate raw steps into a pipeline. Structural only: the first (and
    /// only the first) step must be `Start`, ranges need `low <= high`, and
    /// union branches must be non-empty chains of Out/Filter/Union.
    pub fn new(steps: Vec<Step>) -> Result<Self, BuildError> {
        if steps.is_empty() {
            return Err(BuildError::Empty);
        }
        for (position, step) in steps.iter().enumerate() {
            if position == 0 {
                if !matches!(step, Step::Start { .. }) {
                    return Err(BuildError::StartNotFirst);
                }
                continue;
            }
            match step {
                Step::Start { .. } => return Err(BuildError::StartNotFirst),
                Step::Range { low, high } if low > high => {
                    return Err(BuildError::InvalidRange {
                        low: *low,
                        high: *high,
                    })
                }
                Step::Union { branches } => validate_union(branches)?,
                _ => {}
            }
        }
        Ok(Pipeline { steps })
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Execute against `graph`, returning the lazy traverser sequence.
    pub fn traversers<'a, G: GraphView>(&'a self, graph: &'a G) -> TraverserStream<'a> {
        TraversalEngine::new(graph).execute(self)
    }

    /// Execute against `graph` and fold the matched paths into a tree keyed
    /// by each vertex's `display_key` property.
    pub fn tree<G: GraphView>(&self, graph: &G, display_key: &str) -> Result<TreeNode, TraversalError> {
        TreeCollector::new(graph, display_key).collect(self.traversers(graph))
    }
}

fn validate_union(branches: &[Branch]) -> Result<(), BuildError> {
    if branches.is_empty() {
        return Err(BuildError::EmptyUnion);
    }
    for branch in branches {
        if branch.steps.is_empty() {
            return Err(BuildError::EmptyBranch);
        }
        for step in &branch.steps {
            match step {
                Step::Start { .. } => return Err(BuildError::StartInBranch),
                Step::Range { .. } => return Err(BuildError::RangeInBranch),
                Step::Union { branches } => validate_union(branches)?,
                _ => {}
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn eq(v: &str) -> Predicate {
        Predicate::eq(v)
    }

    #[test]
    fn test_compile_chained_pipeline() {
        let pipeline = Traversal::start("Cluster", "name", eq("c"))
            .out("has_Service")
            .has("name", eq("s"))
            .union([Branch::new().out("has_Schema")])
            .range(0, 10)
            .compile()
            .unwrap();
        assert_eq!(pipeline.steps().len(), 5);
        assert!(matches!(pipeline.steps()[0], Step::Start { .. }));
        assert!(matches!(pipeline.steps()[4], Step::Range { low: 0, high: 10 }));
    }

    #[test]
    fn test_empty_pipeline_rejected() {
        assert_eq!(Pipeline::new(Vec::new()).unwrap_err(), BuildError::Empty);
    }

    #[test]
    fn test_pipeline_must_begin_with_start() {
        let err = Pipeline::new(vec![Step::Out {
            edge_label: "has_Service".to_string(),
        }])
        .unwrap_err();
        assert_eq!(err, BuildError::StartNotFirst);
    }

    #[test]
    fn test_second_start_rejected() {
        let start = Step::Start {
            label: "Cluster".to_string(),
            key: "name".to_string(),
            predicate: eq("c"),
        };
        let err = Pipeline::new(vec![start.clone(), start]).unwrap_err();
        assert_eq!(err, BuildError::StartNotFirst);
    }

    #[test]
    fn test_inverted_range_rejected() {
        let err = Traversal::start("Cluster", "name", eq("c"))
            .range(5, 2)
            .compile()
            .unwrap_err();
        assert_eq!(err, BuildError::InvalidRange { low: 5, high: 2 });
    }

    #[test]
    fn test_empty_range_is_allowed() {
        // [k, k) is a legal (empty) window, not a construction error
        assert!(Traversal::start("Cluster", "name", eq("c"))
            .range(3, 3)
            .compile()
            .is_ok());
    }

    #[test]
    fn test_union_without_branches_rejected() {
        let err = Traversal::start("Cluster", "name", eq("c"))
            .union(Vec::new())
            .compile()
            .unwrap_err();
        assert_eq!(err, BuildError::EmptyUnion);
    }

    #[test]
    fn test_empty_branch_rejected() {
        let err = Traversal::start("Cluster", "name", eq("c"))
            .union([Branch::new()])
            .compile()
            .unwrap_err();
        assert_eq!(err, BuildError::EmptyBranch);
    }

    #[test]
    fn test_start_inside_branch_rejected() {
        let branch = Branch::from_steps(vec![Step::Start {
            label: "Cluster".to_string(),
            key: "name".to_string(),
            predicate: eq("c"),
        }]);
        let err = Traversal::start("Cluster", "name", eq("c"))
            .union([branch])
            .compile()
            .unwrap_err();
        assert_eq!(err, BuildError::StartInBranch);
    }

    #[test]
    fn test_range_inside_branch_rejected() {
        let branch = Branch::from_steps(vec![
            Step::Out {
                edge_label: "has_Schema".to_string(),
            },
            Step::Range { low: 0, high: 1 },
        ]);
        let err = Traversal::start("Cluster", "name", eq("c"))
            .union([branch])
            .compile()
            .unwrap_err();
        assert_eq!(err, BuildError::RangeInBranch);
    }

    #[test]
    fn test_nested_union_is_validated() {
        let bad_inner = Branch::from_steps(vec![Step::Range { low: 0, high: 1 }]);
        let err = Traversal::start("Cluster", "name", eq("c"))
            .union([Branch::new().out("has_Schema").union([bad_inner])])
            .compile()
            .unwrap_err();
        assert_eq!(err, BuildError::RangeInBranch);

        let ok = Traversal::start("Cluster", "name", eq("c"))
            .union([Branch::new()
                .out("has_Schema")
                .union([Branch::new().out("has_Table")])])
            .compile();
        assert!(ok.is_ok());
    }
}
