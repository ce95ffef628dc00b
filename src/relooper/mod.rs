//! Structured control flow recovery.
//!
//! Turns a reducible [`ControlFlowGraph`](crate::analysis::ControlFlowGraph) and its
//! [`DomTree`](crate::analysis::DomTree) into a [`StructuredTree`] of nested
//! straight-line, `if`/`else` and `loop` blocks. A stack-machine emitter lowers an
//! `If` block to `if`/`else`/`end` on the block's exit condition, and a `Loop` block
//! to an exit-checking `block` wrapped around a `loop` that tests the same condition
//! before the first iteration and again at the tail.
//!
//! # Key Components
//!
//! - [`NodeClass`] - Join/If/Loop classification by reverse postorder edge direction
//! - [`Relooper`] - The dominator-tree walk that places each node
//! - [`StructuredTree`] / [`ControlBlock`] - The resulting arena of control blocks

mod block;
mod classify;
mod translate;

pub use block::{ControlBlock, ControlId, ControlKind, StructuredTree};
pub use classify::{classify, NodeClass};
pub use translate::Relooper;
