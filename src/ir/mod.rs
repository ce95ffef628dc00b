//! The statement-level intermediate representation consumed by the analyses.
//!
//! A function body arrives as a flat list of [`Statement`]s. The block builder slices it
//! into [`BasicBlock`]s, which the [`ControlFlowGraph`](crate::analysis::ControlFlowGraph)
//! then wires together.
//!
//! # Examples
//!
//! ```rust
//! use cfgflow::ir::{BasicBlock, Statement, Value};
//!
//! let body = vec![
//!     Statement::label("L1"),
//!     Statement::define("i", 1),
//!     Statement::jnz(Value::var("i"), "L1"),
//! ];
//!
//! let blocks = BasicBlock::from_statement_list(&body);
//! assert_eq!(blocks.len(), 1);
//! ```

mod block;
mod statement;

pub use block::{BasicBlock, BlockId, ExitJump};
pub use statement::{BinaryOp, Expression, JumpTest, Statement, UnaryOp, Value, Variable};
