//! Generic directed graph infrastructure.
//!
//! This module provides the graph abstraction shared by the control flow graph, the
//! dominator tree and the reducibility check:
//!
//! - [`DirectedGraph`] - A directed graph keyed by node values with O(1) amortized updates
//! - [`Edge`] - A directed edge as a plain `(from, to)` value
//! - [`GraphNode`] - The bound every node type satisfies
//! - [`algorithms`] - Traversals (DFS, postorder, reverse postorder, RPO numbering)
//!
//! # Examples
//!
//! ```rust
//! use cfgflow::utils::graph::{algorithms, DirectedGraph};
//!
//! let mut graph: DirectedGraph<u32> = DirectedGraph::new();
//! graph.add_edge(0, 1);
//! graph.add_edge(1, 2);
//!
//! assert_eq!(algorithms::reverse_postorder(&graph, 0), vec![0, 1, 2]);
//! ```

pub mod algorithms;
mod directed;
mod edge;
mod node;

pub use directed::DirectedGraph;
pub use edge::Edge;
pub use node::GraphNode;
