//! Directed dependency graph over raster positions
//!
//! Vertices are identified by arena handles rather than by coordinate, so two
//! vertices at the same position stay distinct.

use crate::io::error::{Result, SynthesisError, invalid_parameter};
use bitvec::prelude::*;
use std::collections::BTreeSet;

/// Handle to a vertex inside one [`Digraph`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VertexId(usize);

impl VertexId {
    /// Arena slot of this vertex
    pub const fn index(self) -> usize {
        self.0
    }
}

#[derive(Clone, Debug)]
struct Vertex {
    position: [usize; 2],
    predecessors: BTreeSet<VertexId>,
    successors: BTreeSet<VertexId>,
}

/// Arena-backed directed graph with per-vertex generation flags
#[derive(Clone, Debug, Default)]
pub struct Digraph {
    vertices: Vec<Vertex>,
    generated: BitVec,
    edge_count: usize,
}

impl Digraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the dependency graph for a `width x height` raster
    ///
    /// Vertices are allocated in row-major order, so the vertex at `(x, y)`
    /// has index `y * width + x`. Each position depends on its left and top
    /// neighbours only, which keeps the graph acyclic.
    ///
    /// # Errors
    ///
    /// Returns an error if either dimension is zero
    pub fn grid(width: usize, height: usize) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(invalid_parameter(
                "dimensions",
                &format!("{width}x{height}"),
                &"raster must contain at least one position",
            ));
        }

        let mut graph = Self::new();
        for y in 0..height {
            for x in 0..width {
                graph.add_vertex([x, y]);
            }
        }

        for y in 0..height {
            for x in 0..width {
                let here = VertexId(y * width + x);
                if x > 0 {
                    graph.draw_edge(VertexId(y * width + x - 1), here)?;
                }
                if y > 0 {
                    graph.draw_edge(VertexId((y - 1) * width + x), here)?;
                }
            }
        }

        Ok(graph)
    }

    /// Add a fresh, ungenerated vertex at `position` (x, y)
    pub fn add_vertex(&mut self, position: [usize; 2]) -> VertexId {
        let id = VertexId(self.vertices.len());
        self.vertices.push(Vertex {
            position,
            predecessors: BTreeSet::new(),
            successors: BTreeSet::new(),
        });
        self.generated.push(false);
        id
    }

    /// Whether `id` belongs to this graph
    pub fn contains_vertex(&self, id: VertexId) -> bool {
        id.0 < self.vertices.len()
    }

    /// Record that `from` must be generated before `to`
    ///
    /// Drawing an existing edge again is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if either endpoint is absent or both are the same vertex
    pub fn draw_edge(&mut self, from: VertexId, to: VertexId) -> Result<()> {
        self.check_endpoints(from, to)?;

        let inserted = self
            .vertices
            .get_mut(from.0)
            .is_some_and(|vertex| vertex.successors.insert(to));
        if let Some(vertex) = self.vertices.get_mut(to.0) {
            vertex.predecessors.insert(from);
        }
        if inserted {
            self.edge_count += 1;
        }
        Ok(())
    }

    /// Remove the edge `from -> to`, returning whether it existed
    ///
    /// # Errors
    ///
    /// Returns an error if either endpoint is absent
    pub fn erase_edge(&mut self, from: VertexId, to: VertexId) -> Result<bool> {
        self.check_endpoints(from, to)?;

        let removed = self
            .vertices
            .get_mut(from.0)
            .is_some_and(|vertex| vertex.successors.remove(&to));
        if let Some(vertex) = self.vertices.get_mut(to.0) {
            vertex.predecessors.remove(&from);
        }
        if removed {
            self.edge_count -= 1;
        }
        Ok(removed)
    }

    /// Vertices with an edge into `id`, in handle order
    pub fn predecessors(&self, id: VertexId) -> impl Iterator<Item = VertexId> + '_ {
        self.vertices
            .get(id.0)
            .into_iter()
            .flat_map(|vertex| vertex.predecessors.iter().copied())
    }

    /// Vertices with an edge out of `id`, in handle order
    pub fn successors(&self, id: VertexId) -> impl Iterator<Item = VertexId> + '_ {
        self.vertices
            .get(id.0)
            .into_iter()
            .flat_map(|vertex| vertex.successors.iter().copied())
    }

    /// Number of predecessors of `id`
    pub fn in_degree(&self, id: VertexId) -> usize {
        self.vertices
            .get(id.0)
            .map_or(0, |vertex| vertex.predecessors.len())
    }

    /// Number of successors of `id`
    pub fn out_degree(&self, id: VertexId) -> usize {
        self.vertices
            .get(id.0)
            .map_or(0, |vertex| vertex.successors.len())
    }

    /// Raster position (x, y) of `id`
    pub fn position(&self, id: VertexId) -> Option<[usize; 2]> {
        self.vertices.get(id.0).map(|vertex| vertex.position)
    }

    /// Whether `id` has been generated
    pub fn is_generated(&self, id: VertexId) -> bool {
        self.generated.get(id.0).as_deref() == Some(&true)
    }

    /// Flag `id` as generated; the flag never resets
    ///
    /// # Errors
    ///
    /// Returns an error if the vertex is absent
    pub fn mark_generated(&mut self, id: VertexId) -> Result<()> {
        if !self.contains_vertex(id) {
            return Err(SynthesisError::MissingVertex { vertex: id.0 });
        }
        self.generated.set(id.0, true);
        Ok(())
    }

    /// Every vertex handle, in allocation order
    pub fn vertices(&self) -> impl Iterator<Item = VertexId> + '_ {
        (0..self.vertices.len()).map(VertexId)
    }

    /// Number of vertices
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of edges
    pub const fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Whether the graph contains no directed cycle
    pub fn is_acyclic(&self) -> bool {
        let mut remaining: Vec<usize> = self
            .vertices
            .iter()
            .map(|vertex| vertex.predecessors.len())
            .collect();
        let mut ready: Vec<VertexId> = self
            .vertices()
            .filter(|&id| self.in_degree(id) == 0)
            .collect();
        let mut visited = 0;

        while let Some(id) = ready.pop() {
            visited += 1;
            for successor in self.successors(id) {
                if let Some(count) = remaining.get_mut(successor.0) {
                    *count -= 1;
                    if *count == 0 {
                        ready.push(successor);
                    }
                }
            }
        }

        visited == self.vertices.len()
    }

    fn check_endpoints(&self, from: VertexId, to: VertexId) -> Result<()> {
        for id in [from, to] {
            if !self.contains_vertex(id) {
                return Err(SynthesisError::MissingVertex { vertex: id.0 });
            }
        }
        if from == to {
            return Err(SynthesisError::SelfLoop { vertex: from.0 });
        }
        Ok(())
    }
}
