//! Shared fixtures for unit tests
//!
//! Each fixture returns the statement list of a small function whose block layout the
//! tests rely on. The layouts are listed next to each fixture.

use crate::{
    analysis::ControlFlowGraph,
    ir::{BasicBlock, BinaryOp, Expression, Statement, Value},
};

// Helper function to partition statements and build their CFG
pub fn cfg_from(stmts: &[Statement]) -> ControlFlowGraph {
    ControlFlowGraph::new(BasicBlock::from_statement_list(stmts)).unwrap()
}

// Helper function to build `$name = $name - 1`
fn decrement(name: &str) -> Statement {
    Statement::define(
        name,
        Expression::binary(BinaryOp::Sub, Value::var(name), 1),
    )
}

/// `if` with both arms.
///
/// ```text
/// bb0: jz $c L1          -> bb2 (true), bb1
/// bb1: $a = 1; jmp L2    -> bb3
/// bb2: L1: $a = 2        -> bb3
/// bb3: L2:               -> exit
/// ```
pub fn if_else_statements() -> Vec<Statement> {
    vec![
        Statement::jz(Value::var("c"), "L1"),
        Statement::define("a", 1),
        Statement::jump("L2"),
        Statement::label("L1"),
        Statement::define("a", 2),
        Statement::label("L2"),
    ]
}

/// Pre-tested loop.
///
/// ```text
/// bb0: L1: jz $i L2          -> bb2 (true), bb1
/// bb1: $i = $i - 1; jmp L1   -> bb0
/// bb2: L2: ret               -> exit
/// ```
pub fn while_loop_statements() -> Vec<Statement> {
    vec![
        Statement::label("L1"),
        Statement::jz(Value::var("i"), "L2"),
        decrement("i"),
        Statement::jump("L1"),
        Statement::label("L2"),
        Statement::ret(None),
    ]
}

/// Diamond whose arms define the variable the join returns.
///
/// ```text
/// bb0: jz $c L1          -> bb2 (true), bb1
/// bb1: $x = 1; jmp L2    -> bb3
/// bb2: L1: $x = 2        -> bb3
/// bb3: L2: ret $x        -> exit
/// ```
pub fn diamond_liveness_statements() -> Vec<Statement> {
    vec![
        Statement::jz(Value::var("c"), "L1"),
        Statement::define("x", 1),
        Statement::jump("L2"),
        Statement::label("L1"),
        Statement::define("x", 2),
        Statement::label("L2"),
        Statement::ret(Some(Value::var("x"))),
    ]
}

/// Loop nested in a loop.
///
/// ```text
/// bb0: $i = 0                     -> bb1
/// bb1: L1: jz $i L4               -> bb6 (true), bb2
/// bb2: $j = 0                     -> bb3
/// bb3: L2: jz $j L3               -> bb5 (true), bb4
/// bb4: $j = $j - 1; jmp L2        -> bb3
/// bb5: L3: $i = $i - 1; jmp L1    -> bb1
/// bb6: L4: ret $i                 -> exit
/// ```
pub fn nested_loop_statements() -> Vec<Statement> {
    vec![
        Statement::define("i", 0),
        Statement::label("L1"),
        Statement::jz(Value::var("i"), "L4"),
        Statement::define("j", 0),
        Statement::label("L2"),
        Statement::jz(Value::var("j"), "L3"),
        decrement("j"),
        Statement::jump("L2"),
        Statement::label("L3"),
        decrement("i"),
        Statement::jump("L1"),
        Statement::label("L4"),
        Statement::ret(Some(Value::var("i"))),
    ]
}

/// Cycle with two entries, the smallest irreducible shape.
///
/// ```text
/// bb0: jz $c L2          -> bb2 (true), bb1
/// bb1: L1: $a = 1        -> bb2
/// bb2: L2: jnz $a L1     -> bb1 (true), bb3
/// bb3: ret               -> exit
/// ```
pub fn irreducible_statements() -> Vec<Statement> {
    vec![
        Statement::jz(Value::var("c"), "L2"),
        Statement::label("L1"),
        Statement::define("a", 1),
        Statement::label("L2"),
        Statement::jnz(Value::var("a"), "L1"),
        Statement::ret(None),
    ]
}
