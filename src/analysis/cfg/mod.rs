//! Control Flow Graph (CFG) construction.
//!
//! This module wires the basic blocks of one function into a graph with synthetic
//! entry and exit nodes.
//!
//! # Architecture
//!
//! The CFG builds upon the generic [`crate::utils::graph::DirectedGraph`] infrastructure.
//! Blocks live in an arena owned by the [`ControlFlowGraph`]; the graph itself only
//! stores [`CfgNode`] handles, so fact maps and derived trees key off stable identities.
//!
//! # Key Components
//!
//! - [`ControlFlowGraph`] - The CFG, owning the function's blocks
//! - [`CfgNode`] - Graph node type: `Entry`, `Exit` or a block handle
//!
//! # Edge Rules
//!
//! - **Jump**: one edge to the target block, no fallthrough
//! - **Conditional jump**: one edge to the target block (the true branch) and one
//!   fallthrough edge to the next block (the false branch)
//! - **No exit**: one fallthrough edge to the next block, or to `Exit` after the last
//!
//! # Lazy Computation
//!
//! The reverse postorder from `Entry` is computed on first access and cached, using
//! [`std::sync::OnceLock`] for thread-safe initialization.
//!
//! # Examples
//!
//! ```rust
//! use cfgflow::{analysis::ControlFlowGraph, ir::{BasicBlock, Statement, Value}};
//!
//! let body = vec![
//!     Statement::label("L1"),
//!     Statement::define("i", 1),
//!     Statement::jnz(Value::var("i"), "L1"),
//! ];
//! let cfg = ControlFlowGraph::new(BasicBlock::from_statement_list(&body))?;
//!
//! for node in cfg.reverse_postorder() {
//!     println!("{node}");
//! }
//! # Ok::<(), cfgflow::Error>(())
//! ```

mod graph;
mod node;

pub use graph::ControlFlowGraph;
pub use node::CfgNode;
