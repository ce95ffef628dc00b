//! Dominance analyses.
//!
//! - [`Dominators`] - dominator sets, a forward instance of the data flow engine
//! - [`DomTree`] - the immediate-dominator tree derived from those sets
//! - [`DomFrontiers`] - dominance frontiers, the φ-placement input for SSA construction
//!
//! # Examples
//!
//! ```rust
//! use cfgflow::analysis::{dataflow::FactKind, ControlFlowGraph, DomFrontiers, DomTree, Dominators};
//! use cfgflow::ir::{BasicBlock, Statement, Value};
//!
//! let body = vec![
//!     Statement::label("L1"),
//!     Statement::define("i", 1),
//!     Statement::jnz(Value::var("i"), "L1"),
//! ];
//! let cfg = ControlFlowGraph::new(BasicBlock::from_statement_list(&body))?;
//!
//! let dominators = Dominators::compute(&cfg)?;
//! let tree = DomTree::new(&cfg, &dominators)?;
//! let frontiers = DomFrontiers::new(&cfg, &tree).run();
//!
//! for node in cfg.reverse_postorder() {
//!     println!("{node}: idom {:?}, df {:?}",
//!         tree.immediate_dominator(*node),
//!         frontiers.get(FactKind::Frontier, *node));
//! }
//! # Ok::<(), cfgflow::Error>(())
//! ```

mod dominators;
mod frontiers;
mod tree;

pub use dominators::Dominators;
pub use frontiers::DomFrontiers;
pub use tree::{DomTree, DominatorIterator};
