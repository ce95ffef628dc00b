//! Dominator-tree driven translation into structured control blocks.
//!
//! Adapted from Ramsey, "Beyond Relooper" (ICFP 2022). Every CFG node becomes one
//! [`ControlBlock`] whose kind follows its classification (Loop over If over plain).
//! The node's children in the dominator tree are attached in reverse postorder:
//!
//! 1. If-block, child is a join: chained after the if/else merges
//! 2. If-block, child is the conditional jump's target: true branch
//! 3. If-block, any other child: false branch
//! 4. Loop-block: the child goes into the loop body when it dominates a back edge
//!    source into the header, otherwise it is chained after the loop
//! 5. Plain block: chained after the last attached block
//!
//! "Chained after" always appends at the tail of the last attached block's `next`
//! chain, so no subtree is dropped.

use std::collections::HashMap;

use tracing::{debug, trace};

use crate::{
    analysis::{CfgNode, ControlFlowGraph, DomTree, Reducible},
    relooper::{
        block::{ControlBlock, ControlId, ControlKind, StructuredTree},
        classify::{classify, NodeClass},
    },
    Error, Result,
};

/// Structured control recovery for a reducible CFG.
///
/// # Examples
///
/// ```rust
/// use cfgflow::analysis::{ControlFlowGraph, DomTree, Dominators};
/// use cfgflow::ir::{BasicBlock, Statement, Value};
/// use cfgflow::relooper::Relooper;
///
/// let body = vec![
///     Statement::label("L1"),
///     Statement::jz(Value::var("i"), "L2"),
///     Statement::define("i", 0),
///     Statement::jump("L1"),
///     Statement::label("L2"),
///     Statement::ret(None),
/// ];
/// let cfg = ControlFlowGraph::new(BasicBlock::from_statement_list(&body))?;
/// let tree = DomTree::new(&cfg, &Dominators::compute(&cfg)?)?;
/// let structured = Relooper::new(&cfg, &tree).run()?;
///
/// assert_eq!(structured.to_string(), "entry\nloop bb0\n  bb1\nend\nbb2\nexit\n");
/// # Ok::<(), cfgflow::Error>(())
/// ```
pub struct Relooper<'a> {
    cfg: &'a ControlFlowGraph,
    tree: &'a DomTree,
    classes: HashMap<CfgNode, NodeClass>,
}

impl<'a> Relooper<'a> {
    /// Classifies the nodes of `cfg` for translation along `tree`.
    #[must_use]
    pub fn new(cfg: &'a ControlFlowGraph, tree: &'a DomTree) -> Self {
        Relooper {
            cfg,
            tree,
            classes: classify(cfg),
        }
    }

    /// Returns the classification of every reachable node.
    #[must_use]
    pub fn classify(&self) -> &HashMap<CfgNode, NodeClass> {
        &self.classes
    }

    /// Returns the reverse postorder numbering the classification is based on.
    #[must_use]
    pub fn rpo(&self) -> &HashMap<CfgNode, usize> {
        self.cfg.rpo_numbering()
    }

    /// Translates the CFG into a tree of structured control blocks rooted at `Entry`.
    ///
    /// # Errors
    ///
    /// - [`Error::Irreducible`] if the CFG does not collapse to a single node
    /// - [`Error::MissingCondition`] if a branching node has no conditional exit
    /// - [`Error::Malformed`] if the dominator tree does not match the CFG
    pub fn run(&self) -> Result<StructuredTree> {
        let remaining = Reducible::new(self.cfg).collapse();
        if remaining != 1 {
            return Err(Error::Irreducible { remaining });
        }

        let mut structured = StructuredTree::new();
        let mut built: HashMap<CfgNode, ControlId> = HashMap::with_capacity(self.tree.len());

        // Post-order over the dominator tree: children are built before their parent
        let mut stack = vec![(self.tree.root(), false)];
        while let Some((node, expanded)) = stack.pop() {
            if expanded {
                let id = self.translate(node, &mut structured, &built)?;
                built.insert(node, id);
                continue;
            }
            stack.push((node, true));
            for child in self.tree.children(node) {
                stack.push((child, false));
            }
        }

        let root = built
            .get(&self.tree.root())
            .copied()
            .ok_or_else(|| malformed_error!("No control block was built for the entry node"))?;
        structured.set_root(root);

        debug!(blocks = structured.len(), "structured control flow recovered");
        Ok(structured)
    }

    fn class_of(&self, node: CfgNode) -> NodeClass {
        self.classes.get(&node).copied().unwrap_or_default()
    }

    fn rpo_of(&self, node: CfgNode) -> usize {
        self.cfg.rpo_index(node).unwrap_or(usize::MAX)
    }

    /// Builds the control block of `node` and attaches its already built children.
    fn translate(
        &self,
        node: CfgNode,
        structured: &mut StructuredTree,
        built: &HashMap<CfgNode, ControlId>,
    ) -> Result<ControlId> {
        let class = self.class_of(node);
        let kind = if class.contains(NodeClass::LOOP) {
            ControlKind::Loop { inner: None }
        } else if class.contains(NodeClass::IF) {
            if self.cfg.condition(node).is_none() {
                return Err(Error::MissingCondition { node });
            }
            ControlKind::If {
                true_branch: None,
                false_branch: None,
            }
        } else {
            ControlKind::Plain
        };
        let current = structured.push(ControlBlock::new(node, kind));

        let mut children: Vec<CfgNode> = self.tree.children(node).collect();
        children.sort_by_key(|child| self.rpo_of(*child));

        let true_target = self.cfg.true_successor(node);
        let mut last = current;

        for child in children {
            let Some(&child_id) = built.get(&child) else {
                return Err(malformed_error!(
                    "Dominator tree child {} of {} was not translated",
                    child,
                    node
                ));
            };

            match kind {
                ControlKind::If { .. } if self.class_of(child).contains(NodeClass::JOIN) => {
                    trace!(%node, %child, "join after conditional");
                    Self::chain(structured, last, child_id);
                    last = child_id;
                }
                ControlKind::If { .. } => {
                    let taken = true_target == Some(child);
                    trace!(%node, %child, taken, "conditional arm");
                    Self::attach_arm(structured, current, child_id, taken);
                }
                ControlKind::Loop { .. } if self.is_loop_body(node, child) => {
                    trace!(%node, %child, "loop body");
                    Self::attach_body(structured, current, child_id);
                }
                ControlKind::Loop { .. } | ControlKind::Plain => {
                    Self::chain(structured, last, child_id);
                    last = child_id;
                }
            }
        }

        Ok(current)
    }

    /// Returns `true` if `child` dominates the source of a back edge into `header`.
    fn is_loop_body(&self, header: CfgNode, child: CfgNode) -> bool {
        let position = self.rpo_of(header);
        self.cfg
            .predecessors(header)
            .filter(|pred| self.cfg.rpo_index(*pred).is_some_and(|p| p >= position))
            .any(|source| self.tree.dominates(child, source))
    }

    /// Appends `child` at the tail of the `next` chain starting at `last`.
    fn chain(structured: &mut StructuredTree, last: ControlId, child: ControlId) {
        let tail = structured.chain_tail(last);
        if let Some(block) = structured.get_mut(tail) {
            block.next = Some(child);
        }
    }

    /// Places `child` in an empty slot, or chains it after the slot's occupant.
    fn fill_slot(
        structured: &mut StructuredTree,
        slot: Option<ControlId>,
        child: ControlId,
    ) -> Option<ControlId> {
        match slot {
            None => Some(child),
            Some(occupant) => {
                Self::chain(structured, occupant, child);
                Some(occupant)
            }
        }
    }

    fn attach_arm(
        structured: &mut StructuredTree,
        current: ControlId,
        child: ControlId,
        taken: bool,
    ) {
        let Some(ControlKind::If {
            true_branch,
            false_branch,
        }) = structured.get(current).map(|block| block.kind)
        else {
            return;
        };

        let kind = if taken {
            ControlKind::If {
                true_branch: Self::fill_slot(structured, true_branch, child),
                false_branch,
            }
        } else {
            ControlKind::If {
                true_branch,
                false_branch: Self::fill_slot(structured, false_branch, child),
            }
        };
        if let Some(block) = structured.get_mut(current) {
            block.kind = kind;
        }
    }

    fn attach_body(structured: &mut StructuredTree, current: ControlId, child: ControlId) {
        let Some(ControlKind::Loop { inner }) = structured.get(current).map(|block| block.kind)
        else {
            return;
        };

        let inner = Self::fill_slot(structured, inner, child);
        if let Some(block) = structured.get_mut(current) {
            block.kind = ControlKind::Loop { inner };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        analysis::Dominators,
        ir::{BlockId, Statement, Value},
        test::{
            cfg_from, if_else_statements, irreducible_statements, nested_loop_statements,
            while_loop_statements,
        },
    };

    fn bb(index: usize) -> CfgNode {
        CfgNode::Block(BlockId::new(index))
    }

    fn reloop(stmts: &[Statement]) -> Result<StructuredTree> {
        let cfg = cfg_from(stmts);
        let tree = DomTree::new(&cfg, &Dominators::compute(&cfg)?)?;
        Relooper::new(&cfg, &tree).run()
    }

    fn block_of(structured: &StructuredTree, node: CfgNode) -> &ControlBlock {
        structured.find(node).map(|(_, block)| block).unwrap()
    }

    fn node_of(structured: &StructuredTree, id: Option<ControlId>) -> Option<CfgNode> {
        id.and_then(|id| structured.get(id)).map(|block| block.node)
    }

    #[test]
    fn test_if_else_structure() {
        let structured = reloop(&if_else_statements()).unwrap();

        let root = structured.get(structured.root()).unwrap();
        assert_eq!(root.node, CfgNode::Entry);
        assert_eq!(node_of(&structured, root.next), Some(bb(0)));

        let branch = block_of(&structured, bb(0));
        let ControlKind::If {
            true_branch,
            false_branch,
        } = branch.kind
        else {
            panic!("expected an if block, got {:?}", branch.kind);
        };
        assert_eq!(node_of(&structured, true_branch), Some(bb(2)));
        assert_eq!(node_of(&structured, false_branch), Some(bb(1)));
        assert_eq!(node_of(&structured, branch.next), Some(bb(3)));

        let join = block_of(&structured, bb(3));
        assert_eq!(join.kind, ControlKind::Plain);
        assert_eq!(node_of(&structured, join.next), Some(CfgNode::Exit));
    }

    #[test]
    fn test_loop_structure() {
        let structured = reloop(&while_loop_statements()).unwrap();

        let header = block_of(&structured, bb(0));
        let ControlKind::Loop { inner } = header.kind else {
            panic!("expected a loop block, got {:?}", header.kind);
        };
        assert_eq!(node_of(&structured, inner), Some(bb(1)));
        assert_eq!(node_of(&structured, header.next), Some(bb(2)));
        assert_eq!(
            structured.to_string(),
            "entry\nloop bb0\n  bb1\nend\nbb2\nexit\n"
        );
    }

    #[test]
    fn test_nested_loops() {
        let structured = reloop(&nested_loop_statements()).unwrap();

        let outer = block_of(&structured, bb(1));
        let inner_header = block_of(&structured, bb(3));
        assert!(outer.is_loop());
        assert!(inner_header.is_loop());
        assert_eq!(node_of(&structured, outer.next), Some(bb(6)));
        assert_eq!(node_of(&structured, inner_header.next), Some(bb(5)));

        // Every reachable node appears exactly once
        assert_eq!(structured.len(), 9);
    }

    #[test]
    fn test_if_without_else_chains_join() {
        let structured = reloop(&[
            Statement::jz(Value::var("c"), "L1"),
            Statement::define("a", 1),
            Statement::label("L1"),
            Statement::ret(Some(Value::var("a"))),
        ])
        .unwrap();

        let branch = block_of(&structured, bb(0));
        assert_eq!(
            branch.kind,
            ControlKind::If {
                true_branch: None,
                false_branch: structured.find(bb(1)).map(|(id, _)| id),
            }
        );
        assert_eq!(node_of(&structured, branch.next), Some(bb(2)));
    }

    #[test]
    fn test_straight_line_is_one_chain() {
        let structured = reloop(&[Statement::define("a", 1), Statement::ret(None)]).unwrap();
        let chain: Vec<CfgNode> = structured
            .iter_chain(structured.root())
            .map(|(_, block)| block.node)
            .collect();

        assert_eq!(chain, vec![CfgNode::Entry, bb(0), CfgNode::Exit]);
    }

    #[test]
    fn test_irreducible_input_is_rejected() {
        assert_eq!(
            reloop(&irreducible_statements()).unwrap_err(),
            Error::Irreducible { remaining: 3 }
        );
    }

    #[test]
    fn test_accessors_expose_classification() {
        let cfg = cfg_from(&if_else_statements());
        let tree = DomTree::new(&cfg, &Dominators::compute(&cfg).unwrap()).unwrap();
        let relooper = Relooper::new(&cfg, &tree);

        assert_eq!(relooper.classify()[&bb(3)], NodeClass::JOIN);
        assert_eq!(relooper.rpo()[&CfgNode::Entry], 0);
    }
}
