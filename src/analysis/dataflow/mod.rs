//! Data flow analysis framework over control flow graphs.
//!
//! This module provides a generic framework for computing properties that
//! propagate along control flow edges. It supports both forward and backward
//! analyses over finite fact sets.
//!
//! # Architecture
//!
//! The framework is built around four core abstractions:
//!
//! - **Facts**: [`CfgFacts`] bundles per-node [`FactSet`]s under a [`FactKind`]
//! - **Lattice**: set meets and the standard `gen ∪ (in − kill)` transfer in [`lattice`]
//! - **Analysis**: [`DataFlowAnalysis`] specifies boundary values, gen/kill seeds and the meet
//! - **Solver**: [`DataFlowSolver`] sweeps the graph until a fixpoint is reached
//!
//! # Analyses Provided
//!
//! - [`LiveVariables`]: Determines which variables are live at each block boundary
//! - [`ReachingDefinitions`]: Tracks which definitions may reach each block
//! - [`Dominators`](crate::analysis::Dominators): Dominator sets, in the dominance module
//!
//! # Example
//!
//! ```rust
//! use cfgflow::analysis::{dataflow::{DataFlowSolver, FactKind, LiveVariables}, ControlFlowGraph};
//! use cfgflow::ir::{BasicBlock, Statement, Value};
//!
//! let body = vec![
//!     Statement::jz(Value::var("c"), "L1"),
//!     Statement::define("x", 1),
//!     Statement::label("L1"),
//!     Statement::ret(Some(Value::var("x"))),
//! ];
//! let cfg = ControlFlowGraph::new(BasicBlock::from_statement_list(&body))?;
//! let facts = DataFlowSolver::new(LiveVariables).solve(&cfg)?;
//!
//! for node in cfg.reverse_postorder() {
//!     println!("{node}: live-in {:?}", facts.get(FactKind::In, *node));
//! }
//! # Ok::<(), cfgflow::Error>(())
//! ```
//!
//! # Thread Safety
//!
//! All types in this module are `Send` and `Sync`.

mod facts;
mod framework;
pub mod lattice;
mod liveness;
mod reaching;
mod solver;

pub use facts::{CfgFacts, FactKind, FactSet};
pub use framework::{DataFlowAnalysis, Direction, GenKill};
pub use liveness::LiveVariables;
pub use reaching::{Definition, ReachingDefinitions};
pub use solver::DataFlowSolver;
