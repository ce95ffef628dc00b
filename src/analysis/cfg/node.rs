//! Graph node type of the control flow graph.

use std::fmt;

use crate::ir::BlockId;

/// A node of a [`ControlFlowGraph`](super::ControlFlowGraph).
///
/// Besides one node per basic block, every CFG carries the synthetic [`CfgNode::Entry`]
/// and [`CfgNode::Exit`] sentinels, present even for an empty function body.
///
/// Nodes are plain handles: they compare and hash by identity, and can be used as keys
/// in fact maps, dominator trees and the Relooper's classification tables.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CfgNode {
    /// Synthetic function entry
    Entry,
    /// A basic block in the graph's arena
    Block(BlockId),
    /// Synthetic function exit
    Exit,
}

impl CfgNode {
    /// Returns `true` for the entry sentinel.
    #[must_use]
    pub const fn is_entry(self) -> bool {
        matches!(self, CfgNode::Entry)
    }

    /// Returns `true` for the exit sentinel.
    #[must_use]
    pub const fn is_exit(self) -> bool {
        matches!(self, CfgNode::Exit)
    }

    /// Returns the block handle for real blocks, `None` for the sentinels.
    #[must_use]
    pub const fn block(self) -> Option<BlockId> {
        match self {
            CfgNode::Block(id) => Some(id),
            CfgNode::Entry | CfgNode::Exit => None,
        }
    }
}

impl From<BlockId> for CfgNode {
    fn from(id: BlockId) -> Self {
        CfgNode::Block(id)
    }
}

impl fmt::Debug for CfgNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl fmt::Display for CfgNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CfgNode::Entry => write!(f, "entry"),
            CfgNode::Block(id) => write!(f, "{id}"),
            CfgNode::Exit => write!(f, "exit"),
        }
    }
}
