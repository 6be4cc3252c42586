//! Generation order for dependency graph vertices
//!
//! Always hands out the ungenerated vertex with the fewest ungenerated
//! predecessors, lowest handle first on ties. On the raster grid this is a
//! row-major scan; on other graphs it still terminates, it just may release a
//! vertex before all of its predecessors are done.

use crate::io::error::{Result, SynthesisError};
use crate::spatial::graph::{Digraph, VertexId};
use std::collections::BTreeSet;

/// Priority queue keyed by pending predecessor count
#[derive(Clone, Debug)]
pub struct PriorityScheduler {
    pending: Vec<usize>,
    queue: BTreeSet<(usize, VertexId)>,
}

impl PriorityScheduler {
    /// Queue every ungenerated vertex of `graph`
    pub fn new(graph: &Digraph) -> Self {
        let mut pending = vec![0; graph.vertex_count()];
        let mut queue = BTreeSet::new();

        for vertex in graph.vertices() {
            if graph.is_generated(vertex) {
                continue;
            }
            let count = graph
                .predecessors(vertex)
                .filter(|&predecessor| !graph.is_generated(predecessor))
                .count();
            if let Some(slot) = pending.get_mut(vertex.index()) {
                *slot = count;
            }
            queue.insert((count, vertex));
        }

        Self { pending, queue }
    }

    /// Take the next vertex to generate, `None` once all are handed out
    pub fn next_vertex(&mut self) -> Option<VertexId> {
        self.queue.pop_first().map(|(_, vertex)| vertex)
    }

    /// Mark `vertex` generated and release its successors
    ///
    /// # Errors
    ///
    /// Returns an error if the vertex is not part of the graph
    pub fn complete(&mut self, graph: &mut Digraph, vertex: VertexId) -> Result<()> {
        if graph.is_generated(vertex) {
            return Ok(());
        }
        graph.mark_generated(vertex)?;

        // A vertex completed without being taken from the queue leaves it here
        let own_count = self
            .pending
            .get(vertex.index())
            .copied()
            .ok_or(SynthesisError::MissingVertex {
                vertex: vertex.index(),
            })?;
        self.queue.remove(&(own_count, vertex));

        for successor in graph.successors(vertex) {
            let Some(count) = self.pending.get_mut(successor.index()) else {
                continue;
            };
            if self.queue.remove(&(*count, successor)) {
                *count = count.saturating_sub(1);
                self.queue.insert((*count, successor));
            }
        }

        Ok(())
    }

    /// Ungenerated predecessors of `vertex` still outstanding
    pub fn pending(&self, vertex: VertexId) -> Option<usize> {
        self.pending.get(vertex.index()).copied()
    }

    /// Vertices not yet handed out
    pub fn remaining(&self) -> usize {
        self.queue.len()
    }

    /// Whether every vertex has been handed out
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
