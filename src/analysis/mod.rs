//! Program analysis over the function IR.
//!
//! This module provides the analyses needed to turn a flat statement list into
//! structured control flow. It builds upon the generic graph infrastructure in
//! [`crate::utils::graph`].
//!
//! # Architecture
//!
//! - [`cfg`] - Control flow graph with synthetic `Entry`/`Exit` nodes
//! - [`dataflow`] - Generic iterative data flow engine plus liveness and reaching
//!   definitions
//! - [`dominance`] - Dominator sets, dominator tree and dominance frontiers
//! - [`Reducible`] - T1/T2 reducibility check
//!
//! # Usage
//!
//! ```rust
//! use cfgflow::analysis::{ControlFlowGraph, DomTree, Dominators, Reducible};
//! use cfgflow::ir::{BasicBlock, Statement, Value};
//!
//! let body = vec![
//!     Statement::jz(Value::var("c"), "L1"),
//!     Statement::define("a", 1),
//!     Statement::label("L1"),
//!     Statement::ret(Some(Value::var("a"))),
//! ];
//! let cfg = ControlFlowGraph::new(BasicBlock::from_statement_list(&body))?;
//!
//! let tree = DomTree::new(&cfg, &Dominators::compute(&cfg)?)?;
//! assert!(tree.dominates(cfg.entry(), cfg.exit()));
//! assert!(Reducible::new(&cfg).run());
//! # Ok::<(), cfgflow::Error>(())
//! ```

pub mod cfg;
pub mod dataflow;
pub mod dominance;
mod reducible;

pub use cfg::{CfgNode, ControlFlowGraph};
pub use dominance::{DomFrontiers, DomTree, Dominators};
pub use reducible::Reducible;
