//! Context vectors and predecessor-chain enumeration
//!
//! A context is the concatenated average colors of the vertices met while
//! walking predecessor edges away from a position. Every vertex with two
//! predecessors splits the walk, so one position yields a set of chains.

use crate::io::configuration::COMPONENTS_PER_STEP;
use crate::spatial::graph::{Digraph, VertexId};

/// Concatenated predecessor observations used as an index key
///
/// Equality is exact, component by component, on the bit pattern.
#[derive(Clone, Debug, Default)]
pub struct ContextVector(Vec<f64>);

impl ContextVector {
    /// Wrap raw components
    pub const fn new(components: Vec<f64>) -> Self {
        Self(components)
    }

    /// Number of predecessor steps folded into this context
    pub fn arity(&self) -> usize {
        self.0.len() / COMPONENTS_PER_STEP
    }

    /// Raw components
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// The first `arity` steps of this context
    #[must_use]
    pub fn prefix(&self, arity: usize) -> Self {
        let end = (arity * COMPONENTS_PER_STEP).min(self.0.len());
        Self(self.0.get(..end).unwrap_or_default().to_vec())
    }

    /// Owned components
    pub fn into_inner(self) -> Vec<f64> {
        self.0
    }
}

impl PartialEq for ContextVector {
    fn eq(&self, other: &Self) -> bool {
        self.0.len() == other.0.len()
            && self
                .0
                .iter()
                .zip(&other.0)
                .all(|(a, b)| a.to_bits() == b.to_bits())
    }
}

impl Eq for ContextVector {}

/// Which chains to report while walking predecessors
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChainMode {
    /// Every prefix of every chain, from the empty context upwards
    AllPrefixes,
    /// Only chains that cannot be extended any further
    LongestOnly,
}

/// Enumerate the contexts of `origin` up to `max_length` steps
///
/// `observe` returns the color a predecessor contributes, or `None` when the
/// vertex cannot take part (not yet generated, no tile). A `None` ends the
/// chain at that edge. The origin itself never contributes.
pub fn enumerate_contexts<F>(
    graph: &Digraph,
    origin: VertexId,
    max_length: usize,
    mode: ChainMode,
    mut observe: F,
) -> Vec<ContextVector>
where
    F: FnMut(VertexId) -> Option<[f64; 3]>,
{
    let mut contexts = Vec::new();
    let mut stack = vec![(origin, Vec::new())];

    while let Some((vertex, components)) = stack.pop() {
        let length = components.len() / COMPONENTS_PER_STEP;
        let mut extended = false;

        if length < max_length {
            let predecessors: Vec<VertexId> = graph.predecessors(vertex).collect();
            // Reverse so the first predecessor is expanded first
            for predecessor in predecessors.into_iter().rev() {
                if let Some(color) = observe(predecessor) {
                    let mut next = Vec::with_capacity(components.len() + COMPONENTS_PER_STEP);
                    next.extend_from_slice(&components);
                    next.extend_from_slice(&color);
                    stack.push((predecessor, next));
                    extended = true;
                }
            }
        }

        if mode == ChainMode::AllPrefixes || !extended {
            contexts.push(ContextVector(components));
        }
    }

    contexts
}
