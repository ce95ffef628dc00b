//! Structured control blocks produced by the relooper.
//!
//! A [`StructuredTree`] is an arena of [`ControlBlock`]s addressed by [`ControlId`].
//! Each block wraps one CFG node and has up to three kinds of child slots:
//!
//! - `next` - the block that runs after this one (and after its nested branches)
//! - `If { true_branch, false_branch }` - the two arms of a conditional
//! - `Loop { inner }` - the loop body
//!
//! Every block is referenced by at most one slot, so the arena forms a tree.

use std::fmt;

use strum::{AsRefStr, Display};

use crate::{analysis::CfgNode, utils::DotWriter};

/// Handle of a [`ControlBlock`] inside its [`StructuredTree`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub struct ControlId(usize);

impl ControlId {
    /// Returns the arena position of the block.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// The structured construct a control block lowers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum ControlKind {
    /// Straight-line code
    Plain,
    /// Two-way conditional on the block's exit condition
    If {
        /// Arm taken when the block's conditional jump fires
        true_branch: Option<ControlId>,
        /// Arm taken otherwise
        false_branch: Option<ControlId>,
    },
    /// Loop whose header is this block
    Loop {
        /// Loop body
        inner: Option<ControlId>,
    },
}

/// One structured block wrapping a CFG node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ControlBlock {
    /// The wrapped CFG node
    pub node: CfgNode,
    /// Construct and nested children
    pub kind: ControlKind,
    /// Block that runs after this one
    pub next: Option<ControlId>,
}

impl ControlBlock {
    /// Creates a block without children.
    #[must_use]
    pub fn new(node: CfgNode, kind: ControlKind) -> Self {
        ControlBlock {
            node,
            kind,
            next: None,
        }
    }

    /// Returns `true` for `If` blocks.
    #[must_use]
    pub fn is_if(&self) -> bool {
        matches!(self.kind, ControlKind::If { .. })
    }

    /// Returns `true` for `Loop` blocks.
    #[must_use]
    pub fn is_loop(&self) -> bool {
        matches!(self.kind, ControlKind::Loop { .. })
    }
}

/// Tree of structured control blocks for one function.
///
/// # Examples
///
/// ```rust
/// use cfgflow::analysis::{ControlFlowGraph, DomTree, Dominators};
/// use cfgflow::ir::{BasicBlock, Statement, Value};
/// use cfgflow::relooper::Relooper;
///
/// let body = vec![
///     Statement::jz(Value::var("c"), "L1"),
///     Statement::define("a", 1),
///     Statement::jump("L2"),
///     Statement::label("L1"),
///     Statement::define("a", 2),
///     Statement::label("L2"),
/// ];
/// let cfg = ControlFlowGraph::new(BasicBlock::from_statement_list(&body))?;
/// let tree = DomTree::new(&cfg, &Dominators::compute(&cfg)?)?;
/// let structured = Relooper::new(&cfg, &tree).run()?;
///
/// assert_eq!(
///     structured.to_string(),
///     "entry\nif bb0\n  then\n    bb2\n  else\n    bb1\nend\nbb3\nexit\n"
/// );
/// # Ok::<(), cfgflow::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructuredTree {
    blocks: Vec<ControlBlock>,
    root: ControlId,
}

impl StructuredTree {
    pub(crate) fn new() -> Self {
        StructuredTree {
            blocks: Vec::new(),
            root: ControlId(0),
        }
    }

    pub(crate) fn push(&mut self, block: ControlBlock) -> ControlId {
        self.blocks.push(block);
        ControlId(self.blocks.len() - 1)
    }

    pub(crate) fn get_mut(&mut self, id: ControlId) -> Option<&mut ControlBlock> {
        self.blocks.get_mut(id.0)
    }

    pub(crate) fn set_root(&mut self, root: ControlId) {
        self.root = root;
    }

    /// Returns the last block of the `next` chain starting at `id`.
    pub(crate) fn chain_tail(&self, id: ControlId) -> ControlId {
        self.iter_chain(id).last().map_or(id, |(tail, _)| tail)
    }

    /// Returns the block wrapping `Entry`.
    #[must_use]
    pub const fn root(&self) -> ControlId {
        self.root
    }

    /// Returns a block by handle.
    #[must_use]
    pub fn get(&self, id: ControlId) -> Option<&ControlBlock> {
        self.blocks.get(id.0)
    }

    /// Returns the block wrapping `node`, if any.
    #[must_use]
    pub fn find(&self, node: CfgNode) -> Option<(ControlId, &ControlBlock)> {
        self.iter().find(|(_, block)| block.node == node)
    }

    /// Returns the number of blocks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Returns `true` if the tree has no blocks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Iterates over all blocks in arena order.
    pub fn iter(&self) -> impl Iterator<Item = (ControlId, &ControlBlock)> + '_ {
        self.blocks
            .iter()
            .enumerate()
            .map(|(index, block)| (ControlId(index), block))
    }

    /// Iterates over `start` and the blocks reached by following `next`.
    pub fn iter_chain(
        &self,
        start: ControlId,
    ) -> impl Iterator<Item = (ControlId, &ControlBlock)> + '_ {
        let mut current = Some(start);
        std::iter::from_fn(move || {
            let id = current?;
            let block = self.get(id)?;
            current = block.next;
            Some((id, block))
        })
    }

    /// Generates a DOT format representation of the tree.
    ///
    /// Child slots become labelled edges: `next`, `then`, `else` and `body`.
    #[must_use]
    pub fn to_dot(&self, title: Option<&str>) -> String {
        let mut dot = DotWriter::new("Structured", title);

        for (id, block) in self.iter() {
            dot.node(
                &format!("c{}", id.0),
                &[format!("{} {}", block.kind, block.node)],
            );
        }
        for (id, block) in self.iter() {
            let from = format!("c{}", id.0);
            let mut slots = Vec::with_capacity(3);
            match block.kind {
                ControlKind::Plain => {}
                ControlKind::If {
                    true_branch,
                    false_branch,
                } => {
                    slots.push((true_branch, "then"));
                    slots.push((false_branch, "else"));
                }
                ControlKind::Loop { inner } => slots.push((inner, "body")),
            }
            slots.push((block.next, "next"));

            for (child, label) in slots {
                if let Some(child) = child {
                    dot.edge(&from, &format!("c{}", child.0), Some(label));
                }
            }
        }

        dot.finish()
    }
}

enum Line {
    Block(ControlId, usize),
    Marker(&'static str, usize),
}

impl fmt::Display for StructuredTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return Ok(());
        }

        let mut stack = vec![Line::Block(self.root, 0)];
        while let Some(line) = stack.pop() {
            let (id, depth) = match line {
                Line::Marker(text, depth) => {
                    writeln!(f, "{:indent$}{text}", "", indent = depth * 2)?;
                    continue;
                }
                Line::Block(id, depth) => (id, depth),
            };
            let Some(block) = self.get(id) else {
                continue;
            };

            // Pushed in reverse so they pop in reading order
            if let Some(next) = block.next {
                stack.push(Line::Block(next, depth));
            }
            match block.kind {
                ControlKind::Plain => {
                    writeln!(f, "{:indent$}{}", "", block.node, indent = depth * 2)?;
                }
                ControlKind::If {
                    true_branch,
                    false_branch,
                } => {
                    writeln!(f, "{:indent$}if {}", "", block.node, indent = depth * 2)?;
                    stack.push(Line::Marker("end", depth));
                    if let Some(arm) = false_branch {
                        stack.push(Line::Block(arm, depth + 2));
                        stack.push(Line::Marker("else", depth + 1));
                    }
                    if let Some(arm) = true_branch {
                        stack.push(Line::Block(arm, depth + 2));
                        stack.push(Line::Marker("then", depth + 1));
                    }
                }
                ControlKind::Loop { inner } => {
                    writeln!(f, "{:indent$}loop {}", "", block.node, indent = depth * 2)?;
                    stack.push(Line::Marker("end", depth));
                    if let Some(body) = inner {
                        stack.push(Line::Block(body, depth + 1));
                    }
                }
            }
        }
        Ok(())
    }
}
