//! Dominance frontiers (Cytron, Ferrante, Rosen, Wegman and Zadeck).
//!
//! The dominance frontier of `b` is the set of nodes `n` such that `b` dominates a
//! predecessor of `n` but does not strictly dominate `n` itself. These are the
//! places where SSA construction has to insert φ-functions for values defined in `b`.

use std::collections::HashMap;

use crate::analysis::{
    dataflow::{CfgFacts, FactKind, FactSet},
    dominance::DomTree,
    CfgNode, ControlFlowGraph,
};

/// Dominance frontier computation over a CFG and its dominator tree.
///
/// # Algorithm
///
/// For every join node `j` (two or more reachable predecessors) and every such
/// predecessor `p`, walk up the dominator tree from `p` and add `j` to the frontier
/// of each visited node, stopping at `idom(j)`.
///
/// # Examples
///
/// ```rust
/// use cfgflow::analysis::{CfgNode, ControlFlowGraph, DomFrontiers, DomTree, Dominators};
/// use cfgflow::ir::{BasicBlock, BlockId, Statement, Value};
///
/// let body = vec![
///     Statement::jz(Value::var("c"), "L1"),
///     Statement::define("a", 1),
///     Statement::label("L1"),
/// ];
/// let cfg = ControlFlowGraph::new(BasicBlock::from_statement_list(&body))?;
/// let tree = DomTree::new(&cfg, &Dominators::compute(&cfg)?)?;
/// let frontiers = DomFrontiers::new(&cfg, &tree).run();
///
/// let arm = CfgNode::Block(BlockId::new(1));
/// let join = CfgNode::Block(BlockId::new(2));
/// assert!(frontiers.get(cfgflow::analysis::dataflow::FactKind::Frontier, arm).contains(&join));
/// # Ok::<(), cfgflow::Error>(())
/// ```
pub struct DomFrontiers<'a> {
    cfg: &'a ControlFlowGraph,
    tree: &'a DomTree,
}

impl<'a> DomFrontiers<'a> {
    /// Prepares the computation for `cfg` and its dominator tree.
    #[must_use]
    pub fn new(cfg: &'a ControlFlowGraph, tree: &'a DomTree) -> Self {
        DomFrontiers { cfg, tree }
    }

    /// Computes the frontier of every node in the dominator tree, under
    /// [`FactKind::Frontier`] (`df`).
    #[must_use]
    pub fn run(&self) -> CfgFacts<CfgNode> {
        let mut frontiers: HashMap<CfgNode, FactSet<CfgNode>> = self
            .cfg
            .reverse_postorder()
            .iter()
            .map(|node| (*node, FactSet::new()))
            .collect();

        for &join in self.cfg.reverse_postorder() {
            let preds: Vec<CfgNode> = self
                .cfg
                .predecessors(join)
                .filter(|p| self.tree.contains(*p))
                .collect();
            if preds.len() < 2 {
                continue;
            }

            let stop = self.tree.immediate_dominator(join);
            for pred in preds {
                let mut runner = Some(pred);
                while let Some(node) = runner {
                    if Some(node) == stop {
                        break;
                    }
                    frontiers.entry(node).or_default().insert(join);
                    runner = self.tree.immediate_dominator(node);
                }
            }
        }

        let mut facts = CfgFacts::new();
        facts.insert_all(FactKind::Frontier, frontiers);
        facts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        analysis::Dominators,
        ir::BlockId,
        test::{cfg_from, if_else_statements, nested_loop_statements, while_loop_statements},
    };

    fn bb(index: usize) -> CfgNode {
        CfgNode::Block(BlockId::new(index))
    }

    fn frontiers_for(cfg: &ControlFlowGraph) -> (DomTree, CfgFacts<CfgNode>) {
        let tree = DomTree::new(cfg, &Dominators::compute(cfg).unwrap()).unwrap();
        let df = DomFrontiers::new(cfg, &tree).run();
        (tree, df)
    }

    #[test]
    fn test_if_else_frontiers() {
        let cfg = cfg_from(&if_else_statements());
        let (_, df) = frontiers_for(&cfg);

        assert_eq!(df.get(FactKind::Frontier, bb(1)), &FactSet::from([bb(3)]));
        assert_eq!(df.get(FactKind::Frontier, bb(2)), &FactSet::from([bb(3)]));
        assert!(df.get(FactKind::Frontier, bb(0)).is_empty());
        assert!(df.get(FactKind::Frontier, bb(3)).is_empty());
    }

    #[test]
    fn test_loop_header_in_own_frontier() {
        let cfg = cfg_from(&while_loop_statements());
        let (_, df) = frontiers_for(&cfg);

        assert!(df.get(FactKind::Frontier, bb(1)).contains(&bb(0)));
        assert!(df.get(FactKind::Frontier, bb(0)).contains(&bb(0)));
    }

    #[test]
    fn test_frontier_containment() {
        for stmts in [if_else_statements(), while_loop_statements(), nested_loop_statements()] {
            let cfg = cfg_from(&stmts);
            let (tree, df) = frontiers_for(&cfg);

            for &b in cfg.reverse_postorder() {
                for &n in df.get(FactKind::Frontier, b) {
                    assert!(!tree.strictly_dominates(b, n), "{b} strictly dominates {n}");
                    assert!(
                        cfg.predecessors(n).any(|p| tree.dominates(b, p)),
                        "{b} dominates no predecessor of {n}"
                    );
                }
            }
        }
    }
}
