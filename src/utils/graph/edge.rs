//! Edge value type for directed graphs.
//!
//! This module provides the [`Edge`] type, a directed edge between two graph nodes.
//! Edges are plain values with structural equality on `(from, to)`: two edges with the
//! same endpoints are the same edge, which is what lets [`DirectedGraph`](super::DirectedGraph)
//! collapse parallel edges between an ordered pair of nodes.

use std::fmt;

use crate::utils::graph::GraphNode;

/// A directed edge from one graph node to another.
///
/// `Edge` is a value object rather than an owned reference into a graph: it can be
/// copied freely, hashed, and compared, and stays meaningful after the graph that
/// produced it has been modified.
///
/// # Examples
///
/// ```rust
/// use cfgflow::utils::graph::Edge;
///
/// let a = Edge::new(1, 2);
/// let b = Edge::new(1, 2);
/// assert_eq!(a, b);
/// assert!(!a.is_self_loop());
/// assert_eq!(a.reversed(), Edge::new(2, 1));
/// ```
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Edge<N> {
    /// The source node of the edge
    pub from: N,
    /// The target node of the edge
    pub to: N,
}

impl<N: GraphNode> Edge<N> {
    /// Creates a new edge from `from` to `to`.
    #[must_use]
    #[inline]
    pub const fn new(from: N, to: N) -> Self {
        Edge { from, to }
    }

    /// Returns `true` if the edge starts and ends at the same node.
    #[must_use]
    #[inline]
    pub fn is_self_loop(&self) -> bool {
        self.from == self.to
    }

    /// Returns the same edge with its direction flipped.
    #[must_use]
    #[inline]
    pub const fn reversed(self) -> Self {
        Edge {
            from: self.to,
            to: self.from,
        }
    }
}

impl<N: fmt::Debug> fmt::Debug for Edge<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Edge({:?} -> {:?})", self.from, self.to)
    }
}

impl<N: fmt::Display> fmt::Display for Edge<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.from, self.to)
    }
}

impl<N: GraphNode> From<(N, N)> for Edge<N> {
    #[inline]
    fn from((from, to): (N, N)) -> Self {
        Edge { from, to }
    }
}
