//! Shared utilities: the generic graph infrastructure and DOT rendering helpers.

mod dot;
pub mod graph;

pub use dot::{escape_dot, DotWriter};
