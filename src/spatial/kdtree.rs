//! K-dimensional binary search tree keyed by context vectors
//!
//! Nodes live in a flat arena and link to their children by index. The tree
//! is never rebalanced, so its shape follows insertion order and depth is
//! linear in the worst case. All traversals are iterative.

use crate::io::error::{Result, SynthesisError, invalid_parameter};
use bitvec::prelude::*;
use num_traits::Float;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
struct KdNode<V, C> {
    key: Vec<C>,
    value: V,
    left: Option<usize>,
    right: Option<usize>,
}

/// Map from fixed-length coordinate vectors to values
///
/// Node at depth `d` splits on dimension `d mod k`: strictly smaller
/// coordinates go left, everything else goes right.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct KdMap<V, C = f64> {
    k: usize,
    nodes: Vec<KdNode<V, C>>,
}

impl<V, C: Float> KdMap<V, C> {
    /// Create an empty map over `k`-component keys
    pub const fn new(k: usize) -> Self {
        Self {
            k,
            nodes: Vec::new(),
        }
    }

    /// Key dimensionality
    pub const fn dimensions(&self) -> usize {
        self.k
    }

    /// Number of stored entries
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the map holds no entries
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Insert a value under a key not yet present
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The key length differs from the map dimensionality
    /// - The key contains a NaN component
    /// - A node already exists at exactly this key
    pub fn insert(&mut self, key: Vec<C>, value: V) -> Result<()> {
        self.check_dimensions(&key)?;
        if key.iter().any(|c| c.is_nan()) {
            return Err(invalid_parameter(
                "key",
                &format!("{:?}", to_f64_vec(&key)),
                &"context components must not be NaN",
            ));
        }

        let new_index = self.nodes.len();
        let mut current = 0;
        let mut depth = 0;

        if !self.nodes.is_empty() {
            loop {
                let Some(node) = self.nodes.get_mut(current) else {
                    break;
                };
                if same_key(&node.key, &key) {
                    return Err(SynthesisError::OccupiedKey {
                        key: to_f64_vec(&key),
                    });
                }

                let slot = if goes_left(&key, &node.key, split_dimension(depth, self.k)) {
                    &mut node.left
                } else {
                    &mut node.right
                };

                match *slot {
                    Some(child) => {
                        current = child;
                        depth += 1;
                    }
                    None => {
                        *slot = Some(new_index);
                        break;
                    }
                }
            }
        }

        self.nodes.push(KdNode {
            key,
            value,
            left: None,
            right: None,
        });
        Ok(())
    }

    /// Exact-match lookup; components compare bit for bit
    ///
    /// # Errors
    ///
    /// Returns an error if the key length differs from the map dimensionality
    pub fn get(&self, key: &[C]) -> Result<Option<&V>> {
        self.check_dimensions(key)?;
        Ok(self
            .locate(key)
            .and_then(|index| self.nodes.get(index))
            .map(|node| &node.value))
    }

    /// Exact-match lookup returning a mutable value
    ///
    /// # Errors
    ///
    /// Returns an error if the key length differs from the map dimensionality
    pub fn get_mut(&mut self, key: &[C]) -> Result<Option<&mut V>> {
        self.check_dimensions(key)?;
        Ok(self
            .locate(key)
            .and_then(|index| self.nodes.get_mut(index))
            .map(|node| &mut node.value))
    }

    /// All values whose key lies within Euclidean `radius` of `center`
    ///
    /// Both children are visited whenever the splitting plane is within
    /// `radius` of the query.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The center length differs from the map dimensionality
    /// - The radius is negative or not finite
    pub fn range_search(&self, center: &[C], radius: C) -> Result<Vec<&V>> {
        self.check_dimensions(center)?;
        if !radius.is_finite() || radius < C::zero() {
            return Err(invalid_parameter(
                "radius",
                &radius.to_f64().unwrap_or(f64::NAN),
                &"search radius must be finite and non-negative",
            ));
        }

        let mut found = Vec::new();
        if self.nodes.is_empty() {
            return Ok(found);
        }

        let radius_squared = radius * radius;
        let mut stack = vec![(0_usize, 0_usize)];

        while let Some((index, depth)) = stack.pop() {
            let Some(node) = self.nodes.get(index) else {
                continue;
            };

            if squared_distance(center, &node.key) <= radius_squared {
                found.push(&node.value);
            }

            let dimension = split_dimension(depth, self.k);
            let (Some(&query), Some(&split)) = (center.get(dimension), node.key.get(dimension))
            else {
                continue;
            };

            if let Some(right) = node.right {
                if query + radius >= split {
                    stack.push((right, depth + 1));
                }
            }
            if let Some(left) = node.left {
                if query - radius <= split {
                    stack.push((left, depth + 1));
                }
            }
        }

        Ok(found)
    }

    /// Iterate over every stored `(key, value)` pair in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&[C], &V)> + '_ {
        self.nodes
            .iter()
            .map(|node| (node.key.as_slice(), &node.value))
    }

    /// Deepest root-to-leaf path length, in nodes
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = Vec::new();
        if !self.nodes.is_empty() {
            stack.push((0_usize, 1_usize));
        }
        while let Some((index, depth)) = stack.pop() {
            deepest = deepest.max(depth);
            if let Some(node) = self.nodes.get(index) {
                stack.extend(node.left.map(|child| (child, depth + 1)));
                stack.extend(node.right.map(|child| (child, depth + 1)));
            }
        }
        deepest
    }

    /// Check the node links of a map that did not come from [`KdMap::insert`]
    ///
    /// Every key must have `k` non-NaN components and every node must be
    /// reachable from the root through exactly one child link.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The map has zero dimensions
    /// - A key has the wrong length or a NaN component
    /// - A child link points outside the arena, back into the tree, or
    ///   leaves nodes unreachable
    pub fn check_structure(&self) -> Result<()> {
        if self.k == 0 {
            return Err(invalid_parameter(
                "dimensions",
                &self.k,
                &"index keys need at least one component",
            ));
        }
        for node in &self.nodes {
            self.check_dimensions(&node.key)?;
            if node.key.iter().any(|c| c.is_nan()) {
                return Err(invalid_parameter(
                    "key",
                    &format!("{:?}", to_f64_vec(&node.key)),
                    &"context components must not be NaN",
                ));
            }
        }

        let mut reached = bitvec![0; self.nodes.len()];
        let mut stack: Vec<usize> = if self.nodes.is_empty() { Vec::new() } else { vec![0] };
        while let Some(index) = stack.pop() {
            let Some(node) = self.nodes.get(index) else {
                return Err(invalid_parameter(
                    "child",
                    &index,
                    &format!("link points past the {} stored nodes", self.nodes.len()),
                ));
            };
            if reached.replace(index, true) {
                return Err(invalid_parameter(
                    "child",
                    &index,
                    &"node is linked more than once",
                ));
            }
            stack.extend(node.left);
            stack.extend(node.right);
        }

        let unreached = reached.count_zeros();
        if unreached > 0 {
            return Err(invalid_parameter(
                "nodes",
                &unreached,
                &"nodes are not reachable from the root",
            ));
        }
        Ok(())
    }

    fn locate(&self, key: &[C]) -> Option<usize> {
        let mut current = (!self.nodes.is_empty()).then_some(0)?;
        let mut depth = 0;

        loop {
            let node = self.nodes.get(current)?;
            if same_key(&node.key, key) {
                return Some(current);
            }

            current = if goes_left(key, &node.key, split_dimension(depth, self.k)) {
                node.left?
            } else {
                node.right?
            };
            depth += 1;
        }
    }

    fn check_dimensions(&self, key: &[C]) -> Result<()> {
        if key.len() == self.k {
            Ok(())
        } else {
            Err(SynthesisError::DimensionMismatch {
                expected: self.k,
                actual: key.len(),
            })
        }
    }
}

// Zero-dimensional maps split on nothing
const fn split_dimension(depth: usize, k: usize) -> usize {
    match depth.checked_rem(k) {
        Some(dimension) => dimension,
        None => 0,
    }
}

// Exact identity of the bit patterns, so -0.0 and 0.0 are different keys
fn same_key<C: Float>(a: &[C], b: &[C]) -> bool {
    a.len() == b.len()
        && a
            .iter()
            .zip(b)
            .all(|(x, y)| x.integer_decode() == y.integer_decode())
}

fn goes_left<C: Float>(key: &[C], node_key: &[C], dimension: usize) -> bool {
    match (key.get(dimension), node_key.get(dimension)) {
        (Some(a), Some(b)) => a < b,
        _ => false,
    }
}

fn squared_distance<C: Float>(a: &[C], b: &[C]) -> C {
    a.iter().zip(b).fold(C::zero(), |acc, (&x, &y)| {
        let delta = x - y;
        delta.mul_add(delta, acc)
    })
}

fn to_f64_vec<C: Float>(key: &[C]) -> Vec<f64> {
    key.iter().map(|c| c.to_f64().unwrap_or(f64::NAN)).collect()
}
