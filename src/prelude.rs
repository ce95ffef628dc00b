//! # cfgflow Prelude
//!
//! This module provides a convenient prelude for the most commonly used types and traits
//! from the cfgflow library. Import this module to get quick access to the essential
//! types for building and analysing function CFGs.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all cfgflow operations
pub use crate::Error;

/// The result type used throughout cfgflow
pub use crate::Result;

/// Configuration for the analysis pipeline
pub use crate::AnalysisConfig;

// ================================================================================================
// Main Entry Points
// ================================================================================================

/// Per-function pipeline and its output
pub use crate::pipeline::{compile_functions, CompiledFunction, Function, FunctionPipeline};

// ================================================================================================
// IR
// ================================================================================================

/// Statements, operands and expressions
pub use crate::ir::{BinaryOp, Expression, JumpTest, Statement, UnaryOp, Value, Variable};

/// Basic blocks and their handles
pub use crate::ir::{BasicBlock, BlockId, ExitJump};

// ================================================================================================
// Analysis
// ================================================================================================

/// Control flow graph and its node type
pub use crate::analysis::{CfgNode, ControlFlowGraph};

/// Dominance analyses and the reducibility check
pub use crate::analysis::{DomFrontiers, DomTree, Dominators, Reducible};

/// Data flow engine and its instances
pub use crate::analysis::dataflow::{
    CfgFacts, DataFlowAnalysis, DataFlowSolver, Definition, Direction, FactKind, FactSet,
    GenKill, LiveVariables, ReachingDefinitions,
};

// ================================================================================================
// Structured Control Flow
// ================================================================================================

/// Relooper and its output
pub use crate::relooper::{ControlBlock, ControlId, ControlKind, NodeClass, Relooper, StructuredTree};
