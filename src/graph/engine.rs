// src/graph/engine.rs
// Pull-based pipeline execution. Each step wraps the previous step's lazy
// output, so the whole pipeline is one composed iterator and consumers may
// stop pulling at any point.

use tracing::{debug, trace};

use crate::graph::error::{BuildError, TraversalError};
use crate::graph::pipeline::{Pipeline, Step};
use crate::graph::predicates::{self, Predicate};
use crate::graph::view::{GraphView, VertexId};

/// An in-flight path through the graph.
///
/// Immutable value object: steps never mutate a traverser in place, they
/// produce extended copies. The path is never empty; its last element is the
/// traverser's current position.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Traverser {
    path: Vec<VertexId>,
}

impl Traverser {
    pub(crate) fn seed(start: VertexId) -> Self {
        Traverser { path: vec![start] }
    }

    /// The full visited path, start vertex first.
    pub fn path(&self) -> &[VertexId] {
        &self.path
    }

    /// The traverser's current position.
    pub fn current(&self) -> VertexId {
        // path is never empty: seeded with one vertex and only ever extended
        self.path[self.path.len() - 1]
    }

    pub(crate) fn extended(&self, next: VertexId) -> Traverser {
        let mut path = Vec::with_capacity(self.path.len() + 1);
        path.extend_from_slice(&self.path);
        path.push(next);
        Traverser { path }
    }
}

/// The lazy output of a pipeline execution.
pub type TraverserStream<'a> = Box<dyn Iterator<Item = Result<Traverser, TraversalError>> + 'a>;

/// Executes compiled pipelines against a borrowed [`GraphView`].
///
/// Strictly single-threaded and synchronous; the view must stay a stable
/// snapshot until the returned stream is dropped.
pub struct TraversalEngine<'g, G: GraphView> {
    graph: &'g G,
}

impl<'g, G: GraphView> TraversalEngine<'g, G> {
    pub fn new(graph: &'g G) -> Self {
        TraversalEngine { graph }
    }

    /// Compose the pipeline into one lazy traverser stream.
    ///
    /// No graph access happens until the first pull — seeding included.
    /// Collaborator failures surface as `Err` items; empty matches, missing
    /// properties and dead-end paths are silent.
    pub fn execute<'a>(&self, pipeline: &'a Pipeline) -> TraverserStream<'a>
    where
        'g: 'a,
    {
        let graph = self.graph;
        debug!(steps = pipeline.steps().len(), "executing traversal pipeline");

        let mut stream: TraverserStream<'a> = match pipeline.steps().first() {
            Some(Step::Start { label, key, predicate }) => seed_stream(graph, label, key, predicate),
            // Pipeline validation guarantees a leading start step; a
            // hand-rolled step list that bypassed it fails here
            _ => Box::new(std::iter::once(Err(BuildError::StartNotFirst.into()))),
        };
        for step in pipeline.steps().iter().skip(1) {
            stream = apply_step(graph, stream, step);
        }
        stream
    }
}

/// Deferred seeding: the view is first queried when the consumer pulls.
fn seed_stream<'a, G: GraphView>(
    graph: &'a G,
    label: &'a str,
    key: &'a str,
    predicate: &'a Predicate,
) -> TraverserStream<'a> {
    Box::new(std::iter::once(()).flat_map(move |_| -> TraverserStream<'a> {
        match graph.vertices_by_label_and_property(label, key, predicate) {
            Ok(ids) => {
                debug!(label, seeds = ids.len(), "seeded traversers");
                Box::new(ids.into_iter().map(|id| Ok(Traverser::seed(id))))
            }
            Err(e) => Box::new(std::iter::once(Err(e.into()))),
        }
    }))
}

fn apply_step<'a, G: GraphView>(
    graph: &'a G,
    input: TraverserStream<'a>,
    step: &'a Step,
) -> TraverserStream<'a> {
    match step {
        Step::Start { .. } => {
            // Unreachable through a validated pipeline
            Box::new(std::iter::once(Err(BuildError::StartNotFirst.into())))
        }
        Step::Out { edge_label } => Box::new(input.flat_map(move |res| -> TraverserStream<'a> {
            match res {
                Ok(traverser) => match graph.out_neighbors(traverser.current(), edge_label) {
                    // Zero matching edges is normal path death, not an error
                    Ok(neighbors) => Box::new(
                        neighbors
                            .into_iter()
                            .map(move |neighbor| Ok(traverser.extended(neighbor))),
                    ),
                    Err(e) => Box::new(std::iter::once(Err(e.into()))),
                },
                Err(e) => Box::new(std::iter::once(Err(e))),
            }
        })),
        Step::Filter { key, predicate } => Box::new(input.filter_map(move |res| match res {
            Ok(traverser) => match graph.property(traverser.current(), key) {
                Ok(value) => {
                    // Missing property is a silent non-match
                    predicates::evaluate(value.as_ref(), predicate).then_some(Ok(traverser))
                }
                Err(e) => Some(Err(e.into())),
            },
            Err(e) => Some(Err(e)),
        })),
        Step::Union { branches } => {
            // Branch-major output order requires every branch to see every
            // arrival, so arrivals are buffered once (on first pull); branch
            // expansion itself stays lazy.
            let mut upstream = Some(input);
            Box::new(std::iter::once(()).flat_map(move |_| -> TraverserStream<'a> {
                let Some(upstream) = upstream.take() else {
                    return Box::new(std::iter::empty());
                };
                match upstream.collect::<Result<Vec<_>, _>>() {
                    // An upstream failure is emitted once, not once per branch
                    Err(e) => Box::new(std::iter::once(Err(e))),
                    Ok(arrivals) => {
                        trace!(
                            arrivals = arrivals.len(),
                            branches = branches.len(),
                            "union buffered arrivals"
                        );
                        Box::new(branches.iter().flat_map(move |branch| {
                            branch_stream(graph, arrivals.clone(), branch.steps())
                        }))
                    }
                }
            }))
        }
        Step::Range { low, high } => Box::new(RangeBound {
            inner: input,
            low: *low,
            high: *high,
            seen: 0,
            done: *low >= *high,
        }),
    }
}

/// Apply a union branch's step chain to the buffered arrival set.
///
/// The whole set flows through the chain as one stream, in arrival order, so
/// a union nested inside the branch buffers every arrival before replaying
/// its own branches — each union's output stays branch-major across all
/// traversers reaching it, not grouped per upstream arrival.
fn branch_stream<'a, G: GraphView>(
    graph: &'a G,
    arrivals: Vec<Traverser>,
    steps: &'a [Step],
) -> TraverserStream<'a> {
    let mut stream: TraverserStream<'a> = Box::new(arrivals.into_iter().map(Ok));
    for step in steps {
        stream = apply_step(graph, stream, step);
    }
    stream
}

/// Emits traversers whose position falls in `[low, high)` and stops pulling
/// upstream as soon as `high` positions have been counted. Errors pass
/// through without consuming a position.
struct RangeBound<'a> {
    inner: TraverserStream<'a>,
    low: usize,
    high: usize,
    seen: usize,
    done: bool,
}

impl<'a> Iterator for RangeBound<'a> {
    type Item = Result<Traverser, TraversalError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.done || self.seen >= self.high {
                self.done = true;
                return None;
            }
            match self.inner.next() {
                None => {
                    self.done = true;
                    return None;
                }
                Some(Err(e)) => return Some(Err(e)),
                Some(Ok(traverser)) => {
                    let position = self.seen;
                    self.seen += 1;
                    if position >= self.low {
                        return Some(Ok(traverser));
                    }
                }
            }
        }
    }
}
