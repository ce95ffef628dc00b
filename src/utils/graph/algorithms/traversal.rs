//! Graph traversal algorithms.
//!
//! This module provides depth-first traversals for directed graphs. These are
//! the building blocks for data-flow iteration order, reachability pruning and the
//! forward/back edge distinction used by structured control-flow recovery.
//!
//! # Algorithms
//!
//! - [`dfs`] - Iterative depth-first search (pre-order)
//! - [`postorder`] - Depth-first search with post-order visitation
//! - [`reverse_postorder`] - Reverse post-order (useful for forward data flow)
//! - [`rpo_numbering`] - Reverse post-order position of every reachable node
//!
//! # Iteration vs Collection
//!
//! [`dfs`] returns an iterator for lazy evaluation, avoiding unnecessary allocations
//! when only partial traversal is needed. The postorder family returns collected
//! vectors since the order requires full traversal anyway.
//!
//! All traversals visit successors in the graph's adjacency order, so results are
//! deterministic for a graph built in a fixed order.

use std::collections::{HashMap, HashSet};

use crate::utils::graph::{DirectedGraph, GraphNode};

/// Depth-first search iterator over graph nodes.
///
/// This iterator performs an iterative (non-recursive) depth-first traversal
/// starting from a given node. It visits each reachable node exactly once
/// in pre-order (visiting a node before its descendants).
pub struct DfsIterator<'g, N: GraphNode> {
    graph: &'g DirectedGraph<N>,
    stack: Vec<N>,
    visited: HashSet<N>,
}

impl<'g, N: GraphNode> DfsIterator<'g, N> {
    fn new(graph: &'g DirectedGraph<N>, start: N) -> Self {
        let mut visited = HashSet::new();
        let mut stack = Vec::new();
        if graph.contains_node(start) {
            visited.insert(start);
            stack.push(start);
        }

        DfsIterator {
            graph,
            stack,
            visited,
        }
    }
}

impl<N: GraphNode> Iterator for DfsIterator<'_, N> {
    type Item = N;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;

        // Push unvisited successors onto the stack in reverse order
        // so that they are visited in the original order
        let successors: Vec<N> = self.graph.successors(node).collect();
        for &succ in successors.iter().rev() {
            if self.visited.insert(succ) {
                self.stack.push(succ);
            }
        }

        Some(node)
    }
}

/// Returns a depth-first search iterator starting from the given node.
///
/// Nodes not reachable from `start` are not visited. A start node that is not part
/// of the graph yields an empty traversal.
///
/// # Complexity
///
/// - Time: O(V + E)
/// - Space: O(V) for the visited set and stack
///
/// # Examples
///
/// ```rust
/// use cfgflow::utils::graph::{algorithms::dfs, DirectedGraph};
///
/// let mut graph: DirectedGraph<char> = DirectedGraph::new();
/// graph.add_edge('A', 'B');
/// graph.add_edge('A', 'C');
/// graph.add_node('D');
///
/// let visited: Vec<char> = dfs(&graph, 'A').collect();
/// assert_eq!(visited, vec!['A', 'B', 'C']);
/// ```
pub fn dfs<N: GraphNode>(graph: &DirectedGraph<N>, start: N) -> DfsIterator<'_, N> {
    DfsIterator::new(graph, start)
}

/// Computes the postorder traversal of nodes reachable from the start.
///
/// In postorder, a node is visited after all its descendants have been visited.
///
/// # Complexity
///
/// - Time: O(V + E)
/// - Space: O(V)
///
/// # Examples
///
/// ```rust
/// use cfgflow::utils::graph::{algorithms::postorder, DirectedGraph};
///
/// let mut graph: DirectedGraph<&str> = DirectedGraph::new();
/// graph.add_edge("A", "B");
/// graph.add_edge("B", "C");
///
/// assert_eq!(postorder(&graph, "A"), vec!["C", "B", "A"]);
/// ```
#[allow(clippy::items_after_statements)]
pub fn postorder<N: GraphNode>(graph: &DirectedGraph<N>, start: N) -> Vec<N> {
    if !graph.contains_node(start) {
        return Vec::new();
    }

    let mut visited = HashSet::with_capacity(graph.node_count());
    let mut result = Vec::with_capacity(graph.node_count());

    // Iterative postorder using explicit stack with state
    #[derive(Clone, Copy)]
    enum State {
        Enter,
        Exit,
    }

    let mut stack = vec![(start, State::Enter)];

    while let Some((node, state)) = stack.pop() {
        match state {
            State::Enter => {
                if !visited.insert(node) {
                    continue;
                }

                // Push exit state for this node (will be processed after children)
                stack.push((node, State::Exit));

                // Push children in reverse order so they're processed in order
                let successors: Vec<N> = graph.successors(node).collect();
                for &succ in successors.iter().rev() {
                    if !visited.contains(&succ) {
                        stack.push((succ, State::Enter));
                    }
                }
            }
            State::Exit => {
                result.push(node);
            }
        }
    }

    result
}

/// Computes the reverse postorder traversal of nodes reachable from the start.
///
/// Reverse postorder (RPO) places a node before any of its successors, ignoring
/// back edges. This is the preferred iteration order for forward data flow analysis.
///
/// # Examples
///
/// ```rust
/// use cfgflow::utils::graph::{algorithms::reverse_postorder, DirectedGraph};
///
/// let mut graph: DirectedGraph<&str> = DirectedGraph::new();
/// graph.add_edge("A", "B");
/// graph.add_edge("B", "C");
///
/// assert_eq!(reverse_postorder(&graph, "A"), vec!["A", "B", "C"]);
/// ```
pub fn reverse_postorder<N: GraphNode>(graph: &DirectedGraph<N>, start: N) -> Vec<N> {
    let mut result = postorder(graph, start);
    result.reverse();
    result
}

/// Assigns every node reachable from `start` its position in reverse postorder.
///
/// An edge `u -> v` between reachable nodes is a forward edge when
/// `rpo[u] < rpo[v]` and a back edge (self-loops included) otherwise.
/// Unreachable nodes have no entry in the returned map.
///
/// # Examples
///
/// ```rust
/// use cfgflow::utils::graph::{algorithms::rpo_numbering, DirectedGraph};
///
/// let mut graph: DirectedGraph<u32> = DirectedGraph::new();
/// graph.add_edge(0, 1);
/// graph.add_edge(1, 0);
///
/// let rpo = rpo_numbering(&graph, 0);
/// assert!(rpo[&0] < rpo[&1]);
/// ```
pub fn rpo_numbering<N: GraphNode>(graph: &DirectedGraph<N>, start: N) -> HashMap<N, usize> {
    reverse_postorder(graph, start)
        .into_iter()
        .enumerate()
        .map(|(position, node)| (node, position))
        .collect()
}
