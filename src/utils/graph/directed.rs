//! Generic directed graph keyed by node values.
//!
//! [`DirectedGraph`] stores a node set, a set of [`Edge`] values and two adjacency
//! indices (outgoing and incoming) keyed by node. All collections preserve insertion
//! order, so traversals over a graph built in a fixed order are reproducible.

use indexmap::{IndexMap, IndexSet};

use crate::utils::graph::{Edge, GraphNode};

/// A directed graph over an opaque node type.
///
/// # Invariants
///
/// - Every edge's endpoints are members of the node set.
/// - The adjacency indices always agree with the edge set: `outgoing(n)` holds exactly
///   the edges with `from == n`, `incoming(n)` exactly those with `to == n`.
/// - Parallel edges collapse: adding an edge that already exists is a no-op.
/// - Removing a node removes every edge incident to it.
///
/// # Complexity
///
/// Adding nodes and edges is amortized O(1). Removing a node or an edge is O(1) in the
/// node and edge sets and O(degree) in the adjacency lists, which keep their order.
///
/// # Examples
///
/// ```rust
/// use cfgflow::utils::graph::DirectedGraph;
///
/// let mut graph: DirectedGraph<&str> = DirectedGraph::new();
/// graph.add_edge("a", "b");
/// graph.add_edge("a", "c");
/// graph.add_edge("a", "b"); // collapses
///
/// assert_eq!(graph.node_count(), 3);
/// assert_eq!(graph.edge_count(), 2);
/// assert_eq!(graph.successors("a").collect::<Vec<_>>(), vec!["b", "c"]);
/// ```
#[derive(Debug, Clone)]
pub struct DirectedGraph<N: GraphNode> {
    /// All nodes of the graph
    nodes: IndexSet<N>,
    /// All edges of the graph
    edges: IndexSet<Edge<N>>,
    /// Edges leaving each node
    outgoing: IndexMap<N, IndexSet<Edge<N>>>,
    /// Edges entering each node
    incoming: IndexMap<N, IndexSet<Edge<N>>>,
}

impl<N: GraphNode> Default for DirectedGraph<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: GraphNode> DirectedGraph<N> {
    /// Creates a new empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: IndexSet::new(),
            edges: IndexSet::new(),
            outgoing: IndexMap::new(),
            incoming: IndexMap::new(),
        }
    }

    /// Creates a new graph with pre-allocated capacity.
    #[must_use]
    pub fn with_capacity(node_capacity: usize, edge_capacity: usize) -> Self {
        Self {
            nodes: IndexSet::with_capacity(node_capacity),
            edges: IndexSet::with_capacity(edge_capacity),
            outgoing: IndexMap::with_capacity(node_capacity),
            incoming: IndexMap::with_capacity(node_capacity),
        }
    }

    /// Adds a node to the graph.
    ///
    /// # Returns
    ///
    /// `true` if the node was not present before.
    pub fn add_node(&mut self, node: N) -> bool {
        if !self.nodes.insert(node) {
            return false;
        }
        self.outgoing.insert(node, IndexSet::new());
        self.incoming.insert(node, IndexSet::new());
        true
    }

    /// Removes a node and every edge incident to it.
    ///
    /// # Returns
    ///
    /// `true` if the node was present.
    pub fn remove_node(&mut self, node: N) -> bool {
        if !self.nodes.swap_remove(&node) {
            return false;
        }

        let outgoing = self.outgoing.swap_remove(&node).unwrap_or_default();
        let incoming = self.incoming.swap_remove(&node).unwrap_or_default();

        for edge in outgoing {
            self.edges.swap_remove(&edge);
            if let Some(edges) = self.incoming.get_mut(&edge.to) {
                edges.shift_remove(&edge);
            }
        }
        for edge in incoming {
            self.edges.swap_remove(&edge);
            if let Some(edges) = self.outgoing.get_mut(&edge.from) {
                edges.shift_remove(&edge);
            }
        }
        true
    }

    /// Returns `true` if the node is part of the graph.
    #[must_use]
    pub fn contains_node(&self, node: N) -> bool {
        self.nodes.contains(&node)
    }

    /// Adds a directed edge, inserting missing endpoints as nodes.
    ///
    /// # Returns
    ///
    /// `true` if the edge is new, `false` if it already existed.
    pub fn add_edge(&mut self, from: N, to: N) -> bool {
        let edge = Edge::new(from, to);
        if self.edges.contains(&edge) {
            return false;
        }

        self.add_node(from);
        self.add_node(to);
        self.edges.insert(edge);
        if let Some(edges) = self.outgoing.get_mut(&from) {
            edges.insert(edge);
        }
        if let Some(edges) = self.incoming.get_mut(&to) {
            edges.insert(edge);
        }
        true
    }

    /// Removes a directed edge.
    ///
    /// # Returns
    ///
    /// `true` if the edge existed.
    pub fn remove_edge(&mut self, from: N, to: N) -> bool {
        let edge = Edge::new(from, to);
        if !self.edges.swap_remove(&edge) {
            return false;
        }
        if let Some(edges) = self.outgoing.get_mut(&from) {
            edges.shift_remove(&edge);
        }
        if let Some(edges) = self.incoming.get_mut(&to) {
            edges.shift_remove(&edge);
        }
        true
    }

    /// Returns `true` if the edge `from -> to` exists.
    #[must_use]
    pub fn contains_edge(&self, from: N, to: N) -> bool {
        self.edges.contains(&Edge::new(from, to))
    }

    /// Returns the number of nodes.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the number of edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Returns `true` if the graph has no nodes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterates over all nodes.
    pub fn nodes(&self) -> impl Iterator<Item = N> + '_ {
        self.nodes.iter().copied()
    }

    /// Iterates over all edges.
    pub fn edges(&self) -> impl Iterator<Item = Edge<N>> + '_ {
        self.edges.iter().copied()
    }

    /// Iterates over the edges leaving `node`, in insertion order.
    ///
    /// Yields nothing for nodes that are not part of the graph.
    pub fn outgoing(&self, node: N) -> impl Iterator<Item = Edge<N>> + '_ {
        self.outgoing.get(&node).into_iter().flatten().copied()
    }

    /// Iterates over the edges entering `node`, in insertion order.
    ///
    /// Yields nothing for nodes that are not part of the graph.
    pub fn incoming(&self, node: N) -> impl Iterator<Item = Edge<N>> + '_ {
        self.incoming.get(&node).into_iter().flatten().copied()
    }

    /// Iterates over the direct successors of `node`.
    pub fn successors(&self, node: N) -> impl Iterator<Item = N> + '_ {
        self.outgoing(node).map(|edge| edge.to)
    }

    /// Iterates over the direct predecessors of `node`.
    pub fn predecessors(&self, node: N) -> impl Iterator<Item = N> + '_ {
        self.incoming(node).map(|edge| edge.from)
    }

    /// Returns the number of edges leaving `node`.
    #[must_use]
    pub fn out_degree(&self, node: N) -> usize {
        self.outgoing.get(&node).map_or(0, IndexSet::len)
    }

    /// Returns the number of edges entering `node`.
    #[must_use]
    pub fn in_degree(&self, node: N) -> usize {
        self.incoming.get(&node).map_or(0, IndexSet::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn degree_sums<N: GraphNode>(graph: &DirectedGraph<N>) -> (usize, usize) {
        let out: usize = graph.nodes().map(|n| graph.out_degree(n)).sum();
        let inc: usize = graph.nodes().map(|n| graph.in_degree(n)).sum();
        (out, inc)
    }

    fn assert_consistent<N: GraphNode>(graph: &DirectedGraph<N>) {
        let (out, inc) = degree_sums(graph);
        assert_eq!(out, graph.edge_count());
        assert_eq!(inc, graph.edge_count());

        for node in graph.nodes() {
            assert!(graph.outgoing(node).all(|e| e.from == node));
            assert!(graph.incoming(node).all(|e| e.to == node));
        }
        for edge in graph.edges() {
            assert!(graph.contains_node(edge.from));
            assert!(graph.contains_node(edge.to));
        }
    }

    fn create_diamond_graph() -> DirectedGraph<&'static str> {
        let mut graph = DirectedGraph::new();
        graph.add_edge("A", "B");
        graph.add_edge("A", "C");
        graph.add_edge("B", "D");
        graph.add_edge("C", "D");
        graph
    }

    #[test]
    fn test_empty_graph() {
        let graph: DirectedGraph<u32> = DirectedGraph::new();
        assert!(graph.is_empty());
        assert_eq!(graph.node_count(), 0);
        assert_eq!(graph.edge_count(), 0);
        assert_eq!(graph.successors(1).count(), 0);
        assert_consistent(&graph);
    }

    #[test]
    fn test_add_node_idempotent() {
        let mut graph: DirectedGraph<u32> = DirectedGraph::new();
        assert!(graph.add_node(1));
        assert!(!graph.add_node(1));
        assert_eq!(graph.node_count(), 1);
    }

    #[test]
    fn test_add_edge_inserts_endpoints() {
        let mut graph: DirectedGraph<u32> = DirectedGraph::new();
        assert!(graph.add_edge(1, 2));
        assert!(graph.contains_node(1));
        assert!(graph.contains_node(2));
        assert_consistent(&graph);
    }

    #[test]
    fn test_duplicate_edge_collapses() {
        let mut graph = create_diamond_graph();
        let before = graph.edge_count();
        assert!(!graph.add_edge("A", "B"));
        assert_eq!(graph.edge_count(), before);
        assert_eq!(graph.out_degree("A"), 2);
        assert_consistent(&graph);
    }

    #[test]
    fn test_successors_in_insertion_order() {
        let graph = create_diamond_graph();
        assert_eq!(graph.successors("A").collect::<Vec<_>>(), vec!["B", "C"]);
        assert_eq!(graph.predecessors("D").collect::<Vec<_>>(), vec!["B", "C"]);
    }

    #[test]
    fn test_remove_edge() {
        let mut graph = create_diamond_graph();
        assert!(graph.remove_edge("A", "B"));
        assert!(!graph.remove_edge("A", "B"));
        assert!(!graph.contains_edge("A", "B"));
        assert_eq!(graph.in_degree("B"), 0);
        assert_consistent(&graph);
    }

    #[test]
    fn test_remove_node_removes_incident_edges() {
        let mut graph = create_diamond_graph();
        assert!(graph.remove_node("B"));
        assert!(!graph.contains_node("B"));
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.successors("A").collect::<Vec<_>>(), vec!["C"]);
        assert_eq!(graph.predecessors("D").collect::<Vec<_>>(), vec!["C"]);
        assert_consistent(&graph);
    }

    #[test]
    fn test_self_loop() {
        let mut graph: DirectedGraph<u32> = DirectedGraph::new();
        graph.add_edge(1, 1);
        assert_eq!(graph.out_degree(1), 1);
        assert_eq!(graph.in_degree(1), 1);
        assert!(graph.remove_node(1));
        assert_eq!(graph.edge_count(), 0);
        assert_consistent(&graph);
    }

    #[test]
    fn test_clone_is_independent() {
        let graph = create_diamond_graph();
        let mut copy = graph.clone();
        copy.remove_node("D");
        assert_eq!(graph.node_count(), 4);
        assert_eq!(copy.node_count(), 3);
        assert_consistent(&graph);
        assert_consistent(&copy);
    }

    #[test]
    fn test_degree_sums_after_mixed_updates() {
        let mut graph: DirectedGraph<u32> = DirectedGraph::new();
        for i in 0..20 {
            graph.add_edge(i, (i * 7) % 20);
            graph.add_edge(i, (i + 1) % 20);
        }
        for i in (0..20).step_by(3) {
            graph.remove_node(i);
        }
        graph.remove_edge(1, 2);
        assert_consistent(&graph);
    }
}
