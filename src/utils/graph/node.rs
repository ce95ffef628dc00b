//! Node requirements for directed graphs.
//!
//! Graphs in this crate are keyed directly by their node values instead of by an
//! internal index. A node type only has to be a small, copyable handle with value
//! equality and hashing: basic-block handles, CFG sentinels, or plain integers in tests.

use std::{fmt::Debug, hash::Hash};

/// Marker trait for types usable as nodes of a [`DirectedGraph`](super::DirectedGraph).
///
/// It is implemented automatically for every `Copy + Eq + Hash + Debug` type.
/// Node identity is value identity, so mutable per-node data must live outside the
/// node value (for example in an arena indexed by the handle).
///
/// # Examples
///
/// ```rust
/// use cfgflow::utils::graph::GraphNode;
///
/// fn accepts<N: GraphNode>(_node: N) {}
/// accepts(42usize);
/// accepts("label");
/// ```
pub trait GraphNode: Copy + Eq + Hash + Debug {}

impl<T> GraphNode for T where T: Copy + Eq + Hash + Debug {}
