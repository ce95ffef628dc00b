//! Basic blocks and the statement-list partitioner.
//!
//! A [`BasicBlock`] is a maximal straight-line run of statements. Its entry label and
//! closing jump are kept as metadata rather than in the interior statement list, which
//! is what the CFG builder resolves edges from.
//!
//! # Partitioning Rules
//!
//! [`BasicBlock::from_statement_list`] scans the statements once:
//!
//! - a label starts a new block, closing the current one unless it is still empty and
//!   has no entry label of its own
//! - a jump or conditional jump closes the current block and becomes its exit
//! - every other statement (returns and calls included) is appended to the interior
//! - a trailing block without a closing jump is still emitted
//!
//! Block ids are assigned sequentially from 0 in emission order.

use std::fmt;

use tracing::debug;

use crate::ir::statement::{JumpTest, Statement, Value};

/// A strongly-typed handle for a basic block.
///
/// Handles are positions in the block arena owned by a
/// [`ControlFlowGraph`](crate::analysis::ControlFlowGraph). Graph adjacency and every
/// fact map key off the handle, never off block content, so mutating a block (the CFG
/// builder sets [`BasicBlock::true_branch`]) cannot invalidate them.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BlockId(pub(crate) usize);

impl BlockId {
    /// Creates a handle from a raw arena index.
    #[must_use]
    #[inline]
    pub const fn new(index: usize) -> Self {
        BlockId(index)
    }

    /// Returns the raw arena index.
    #[must_use]
    #[inline]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Debug for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "bb{}", self.0)
    }
}

impl fmt::Display for BlockId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "bb{}", self.0)
    }
}

/// The jump that closes a basic block.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ExitJump {
    /// Unconditional jump; the block has a single successor.
    Jump(String),
    /// Conditional jump; the block falls through when the test fails.
    Conditional {
        /// Zero / non-zero test
        test: JumpTest,
        /// The tested value
        condition: Value,
        /// Label taken when the test holds
        target: String,
    },
}

impl ExitJump {
    /// Returns the label this jump targets.
    #[must_use]
    pub fn target(&self) -> &str {
        match self {
            ExitJump::Jump(target) | ExitJump::Conditional { target, .. } => target,
        }
    }

    /// Returns `true` for conditional exits.
    #[must_use]
    pub fn is_conditional(&self) -> bool {
        matches!(self, ExitJump::Conditional { .. })
    }

    /// Returns the tested value of a conditional exit.
    #[must_use]
    pub fn condition(&self) -> Option<&Value> {
        match self {
            ExitJump::Jump(_) => None,
            ExitJump::Conditional { condition, .. } => Some(condition),
        }
    }

    /// Reconstructs the statement this exit was taken from.
    #[must_use]
    pub fn to_statement(&self) -> Statement {
        match self {
            ExitJump::Jump(target) => Statement::Jump(target.clone()),
            ExitJump::Conditional {
                test,
                condition,
                target,
            } => Statement::ConditionalJump {
                test: *test,
                condition: condition.clone(),
                target: target.clone(),
            },
        }
    }
}

/// A basic block of IR statements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BasicBlock {
    /// Arena handle, equal to the block's position in emission order
    pub id: BlockId,
    /// Label that begins the block, if any
    pub entry: Option<String>,
    /// Jump that ends the block, if any
    pub exit: Option<ExitJump>,
    /// Interior statements, excluding the entry label and the exit jump
    pub statements: Vec<Statement>,
    /// Set by the CFG builder when this block is the taken target of a conditional jump
    pub true_branch: bool,
}

impl BasicBlock {
    /// Creates an empty block with the given id.
    #[must_use]
    pub fn new(id: BlockId) -> Self {
        BasicBlock {
            id,
            entry: None,
            exit: None,
            statements: Vec::new(),
            true_branch: false,
        }
    }

    /// Partitions a function body into basic blocks.
    ///
    /// Never fails: any statement shape is accepted, and unresolved jump targets are
    /// reported later by [`ControlFlowGraph::new`](crate::analysis::ControlFlowGraph::new).
    /// Returns no blocks only for an empty statement list.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use cfgflow::ir::{BasicBlock, Statement, Value};
    ///
    /// let stmts = vec![
    ///     Statement::jz(Value::var("c"), "L1"),
    ///     Statement::define("a", 1),
    ///     Statement::label("L1"),
    ///     Statement::ret(Some(Value::var("a"))),
    /// ];
    ///
    /// let blocks = BasicBlock::from_statement_list(&stmts);
    /// assert_eq!(blocks.len(), 2);
    /// assert!(blocks[0].is_conditional());
    /// assert_eq!(blocks[1].entry.as_deref(), Some("L1"));
    /// ```
    #[must_use]
    pub fn from_statement_list(stmts: &[Statement]) -> Vec<BasicBlock> {
        let mut blocks = Vec::new();
        let mut current = BasicBlock::new(BlockId(0));

        for stmt in stmts {
            match stmt {
                Statement::Label(name) => {
                    if !current.is_empty() {
                        Self::close(&mut blocks, &mut current, None);
                    }
                    current.entry = Some(name.clone());
                }
                Statement::Jump(target) => {
                    Self::close(&mut blocks, &mut current, Some(ExitJump::Jump(target.clone())));
                }
                Statement::ConditionalJump {
                    test,
                    condition,
                    target,
                } => {
                    let exit = ExitJump::Conditional {
                        test: *test,
                        condition: condition.clone(),
                        target: target.clone(),
                    };
                    Self::close(&mut blocks, &mut current, Some(exit));
                }
                Statement::Definition { .. } | Statement::Return(_) | Statement::VoidCall { .. } => {
                    current.statements.push(stmt.clone());
                }
            }
        }

        if !current.is_empty() {
            Self::close(&mut blocks, &mut current, None);
        }

        debug!(
            statements = stmts.len(),
            blocks = blocks.len(),
            "partitioned statement list"
        );
        blocks
    }

    fn close(blocks: &mut Vec<BasicBlock>, current: &mut BasicBlock, exit: Option<ExitJump>) {
        let next = BasicBlock::new(BlockId(blocks.len() + 1));
        let mut block = std::mem::replace(current, next);
        block.exit = exit;
        blocks.push(block);
    }

    /// Returns `true` when the block has no entry label, no exit and no statements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entry.is_none() && self.exit.is_none() && self.statements.is_empty()
    }

    /// Returns `true` when the block ends in a conditional jump.
    #[must_use]
    pub fn is_conditional(&self) -> bool {
        self.exit.as_ref().is_some_and(ExitJump::is_conditional)
    }

    /// Returns `true` when control can continue into the next block in sequence.
    #[must_use]
    pub fn falls_through(&self) -> bool {
        !matches!(self.exit, Some(ExitJump::Jump(_)))
    }

    /// Returns the block's full text: entry label, interior statements and exit jump.
    #[must_use]
    pub fn lines(&self) -> Vec<String> {
        let mut lines = Vec::with_capacity(self.statements.len() + 2);
        if let Some(label) = &self.entry {
            lines.push(format!("{label}:"));
        }
        lines.extend(self.statements.iter().map(ToString::to_string));
        if let Some(exit) = &self.exit {
            lines.push(exit.to_statement().to_string());
        }
        lines
    }
}

impl fmt::Display for BasicBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}:", self.id)?;
        for line in self.lines() {
            writeln!(f, "    {line}")?;
        }
        Ok(())
    }
}
