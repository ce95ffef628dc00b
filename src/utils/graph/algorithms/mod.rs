//! Graph algorithms for program analysis.
//!
//! This module provides the traversal orders used throughout control flow analysis.
//!
//! # Available Algorithms
//!
//! - [`dfs`] - Depth-first search traversal
//! - [`postorder`] - Postorder traversal (backward data flow order)
//! - [`reverse_postorder`] - Reverse postorder traversal (forward data flow order)
//! - [`rpo_numbering`] - Reverse postorder positions, for forward/back edge classification
//!
//! | Algorithm | Time Complexity | Use Case |
//! |-----------|-----------------|----------|
//! | DFS | O(V + E) | Reachability |
//! | Postorder / RPO | O(V + E) | Data flow iteration order, edge classification |
//!
//! # Examples
//!
//! ```rust
//! use cfgflow::utils::graph::{algorithms, DirectedGraph};
//!
//! let mut graph: DirectedGraph<&str> = DirectedGraph::new();
//! graph.add_edge("a", "b");
//! graph.add_edge("b", "c");
//!
//! let order: Vec<&str> = algorithms::dfs(&graph, "a").collect();
//! assert_eq!(order, vec!["a", "b", "c"]);
//! ```

mod traversal;

pub use traversal::{dfs, postorder, reverse_postorder, rpo_numbering, DfsIterator};
