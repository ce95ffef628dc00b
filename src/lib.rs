// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![deny(unsafe_code)]

//! # cfgflow
//!
//! Control flow analysis and structured control recovery for a small three-address IR.
//!
//! Given the flat statement list of one function, `cfgflow` partitions it into basic
//! blocks, builds a control flow graph with synthetic `Entry`/`Exit` nodes, runs
//! set-based data flow analyses over it (dominators, liveness, reaching definitions),
//! derives the dominator tree and dominance frontiers, checks reducibility and finally
//! translates the graph into nested straight-line, `if`/`else` and `loop` blocks that
//! a stack-machine emitter can lower directly.
//!
//! ## Features
//!
//! - **Arena-based CFG** - blocks are addressed by [`ir::BlockId`] handles, never by content
//! - **Generic data flow engine** - forward and backward analyses over one solver
//! - **Dominance** - dominator sets, immediate-dominator tree and frontiers
//! - **Structured recovery** - dominator-tree driven relooper with reducibility check
//! - **Batch compilation** - independent functions compiled on the rayon pool
//!
//! ## Quick Start
//!
//! ```rust
//! use cfgflow::prelude::*;
//!
//! let body = vec![
//!     Statement::jz(Value::var("c"), "L1"),
//!     Statement::define("a", 1),
//!     Statement::jump("L2"),
//!     Statement::label("L1"),
//!     Statement::define("a", 2),
//!     Statement::label("L2"),
//!     Statement::ret(Some(Value::var("a"))),
//! ];
//!
//! let compiled = FunctionPipeline::new(AnalysisConfig::default()).run("select", &body)?;
//! println!("{}", compiled.structured);
//! # Ok::<(), cfgflow::Error>(())
//! ```
//!
//! ### Step by step
//!
//! ```rust
//! use cfgflow::analysis::{ControlFlowGraph, DomFrontiers, DomTree, Dominators};
//! use cfgflow::ir::{BasicBlock, Statement, Value};
//! use cfgflow::relooper::Relooper;
//!
//! let body = vec![
//!     Statement::label("L1"),
//!     Statement::jz(Value::var("i"), "L2"),
//!     Statement::jump("L1"),
//!     Statement::label("L2"),
//! ];
//!
//! let cfg = ControlFlowGraph::new(BasicBlock::from_statement_list(&body))?;
//! let dominators = Dominators::compute(&cfg)?;
//! let tree = DomTree::new(&cfg, &dominators)?;
//! let frontiers = DomFrontiers::new(&cfg, &tree).run();
//! let structured = Relooper::new(&cfg, &tree).run()?;
//!
//! assert!(structured.get(structured.root()).is_some());
//! # let _ = frontiers;
//! # Ok::<(), cfgflow::Error>(())
//! ```
//!
//! ## Logging
//!
//! Passes report through [`tracing`]: `debug` for pass summaries, `trace` for per-node
//! steps and `warn` when [`compile_functions`] rejects a function. The library never
//! installs a subscriber.

#[macro_use]
pub(crate) mod error;

/// Shared functionality which is used in unit-tests
#[cfg(test)]
pub(crate) mod test;

/// Convenient re-exports of the most commonly used types.
///
/// # Example
///
/// ```rust
/// use cfgflow::prelude::*;
///
/// let cfg = ControlFlowGraph::new(BasicBlock::from_statement_list(&[Statement::ret(None)]))?;
/// assert_eq!(cfg.block_count(), 1);
/// # Ok::<(), cfgflow::Error>(())
/// ```
pub mod prelude;

/// Control flow graph, data flow engine, dominance and reducibility.
pub mod analysis;

/// Configuration of the analysis pipeline.
pub mod config;

/// Function IR: statements, values and basic blocks.
///
/// # Key Types
///
/// - [`ir::Statement`] - One statement of a function body
/// - [`ir::BasicBlock`] - A straight-line run of statements with entry label and exit jump
/// - [`ir::BlockId`] - Arena handle of a basic block
pub mod ir;

/// Per-function pipeline and batch compilation.
pub mod pipeline;

/// Structured control flow recovery.
pub mod relooper;

/// Graph primitives and DOT output shared by the analyses.
pub mod utils;

/// `cfgflow` Result type
///
/// A type alias for [`std::result::Result<T, Error>`] where the error type is always [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// `cfgflow` Error type
///
/// # Examples
///
/// ```rust
/// use cfgflow::{analysis::ControlFlowGraph, ir::{BasicBlock, Statement}, Error};
///
/// let blocks = BasicBlock::from_statement_list(&[Statement::jump("missing")]);
/// match ControlFlowGraph::new(blocks) {
///     Err(Error::UndefinedLabel { label, .. }) => assert_eq!(label, "missing"),
///     other => panic!("unexpected: {other:?}"),
/// }
/// ```
pub use error::Error;

/// Analysis configuration, see [`config::AnalysisConfig`].
pub use config::AnalysisConfig;

/// Batch entry point, see [`pipeline::compile_functions`].
pub use pipeline::compile_functions;
