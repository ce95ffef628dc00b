use thiserror::Error;

use crate::analysis::CfgNode;

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// Every error aborts the compilation of the function that produced it. None of them are
/// recoverable inside the pipeline, and none are silently swallowed: callers that drive many
/// functions (see [`crate::compile_functions`]) receive one result per function.
///
/// # Error Categories
///
/// ## IR Consistency Errors
/// - [`Error::UndefinedLabel`] - A jump names a label that the function never defines
/// - [`Error::DuplicateLabel`] - A label is defined more than once in a function
/// - [`Error::MissingDominator`] - A reachable node did not resolve an immediate dominator
/// - [`Error::MissingCondition`] - A branching block has no conditional exit to test
/// - [`Error::Malformed`] - Internal structures disagree with each other
///
/// ## Precondition Violations
/// - [`Error::Irreducible`] - Structured translation was requested for an irreducible CFG
///
/// ## Analysis Errors
/// - [`Error::IterationLimit`] - A data-flow analysis did not reach a fixpoint in time
///
/// # Examples
///
/// ```rust
/// use cfgflow::{Error, ir::{BasicBlock, Statement}, analysis::ControlFlowGraph};
///
/// let stmts = vec![Statement::jump("nowhere")];
/// let blocks = BasicBlock::from_statement_list(&stmts);
///
/// match ControlFlowGraph::new(blocks) {
///     Err(Error::UndefinedLabel { label, .. }) => assert_eq!(label, "nowhere"),
///     _ => unreachable!(),
/// }
/// ```
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Internal structures are inconsistent with each other.
    ///
    /// This error includes the source location where the inconsistency was detected
    /// for debugging purposes.
    ///
    /// # Fields
    ///
    /// * `message` - Detailed description of what was malformed
    /// * `file` - Source file where the error was detected
    /// * `line` - Source line where the error was detected
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// A jump or conditional jump targets a label that does not exist in the function.
    #[error("Jump in {block} targets undefined label '{label}'")]
    UndefinedLabel {
        /// The label that could not be resolved
        label: String,
        /// The block whose exit jump names the label
        block: CfgNode,
    },

    /// A label is defined by more than one block of the same function.
    #[error("Label '{label}' is defined more than once")]
    DuplicateLabel {
        /// The label defined twice
        label: String,
    },

    /// A node reachable from entry has no immediate dominator.
    ///
    /// This indicates that the dominance facts handed to the dominator tree do not
    /// belong to the control flow graph, i.e. the CFG is malformed.
    #[error("Node {node} has no immediate dominator")]
    MissingDominator {
        /// The node that failed to resolve
        node: CfgNode,
    },

    /// A block classified as a branch does not end in a conditional jump.
    #[error("Node {node} branches but has no conditional exit")]
    MissingCondition {
        /// The offending node
        node: CfgNode,
    },

    /// The control flow graph is irreducible and cannot be structured.
    ///
    /// Node splitting is not supported, so irreducible input is rejected. The associated
    /// value is the number of nodes left after T1/T2 collapsing.
    #[error("Control flow graph is irreducible ({remaining} nodes remain after collapsing)")]
    Irreducible {
        /// Node count of the collapsed graph
        remaining: usize,
    },

    /// A data-flow analysis exceeded the configured sweep limit.
    ///
    /// Monotone analyses over finite lattices always converge. Hitting this limit means
    /// the transfer or meet function of the analysis is not monotone.
    #[error("Data-flow analysis did not converge within {0} sweeps")]
    IterationLimit(usize),
}
