//! Dominator sets as a forward data flow analysis.
//!
//! A node `d` **dominates** a node `n` if every path from `Entry` to `n` passes
//! through `d`. Every node dominates itself.
//!
//! # Equations
//!
//! - boundary: `OUT[Entry] = {Entry}`
//! - initial: every other node starts with the full node set
//! - `IN[n]` = ∩{OUT[p] | p is a predecessor of n}, the empty set without predecessors
//! - `OUT[n]` = IN[n] ∪ {n}

use crate::{
    analysis::{
        dataflow::{lattice, CfgFacts, DataFlowAnalysis, DataFlowSolver, Direction, FactSet, GenKill},
        CfgNode, ControlFlowGraph,
    },
    AnalysisConfig, Result,
};

/// Dominator analysis.
///
/// The `out` set of a node holds all of its dominators, the node itself included.
///
/// # Examples
///
/// ```rust
/// use cfgflow::{analysis::{CfgNode, ControlFlowGraph, Dominators}, ir::{BasicBlock, Statement}};
///
/// let body = vec![Statement::define("a", 1)];
/// let cfg = ControlFlowGraph::new(BasicBlock::from_statement_list(&body))?;
/// let facts = Dominators::compute(&cfg)?;
///
/// assert!(facts.out_set(CfgNode::Exit).contains(&CfgNode::Entry));
/// # Ok::<(), cfgflow::Error>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Dominators;

impl Dominators {
    /// Computes the dominator sets of every node with the default sweep budget.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::IterationLimit`] if the solver runs out of sweeps.
    pub fn compute(cfg: &ControlFlowGraph) -> Result<CfgFacts<CfgNode>> {
        DataFlowSolver::new(Dominators).solve(cfg)
    }

    /// Computes the dominator sets of every node, bounded by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::IterationLimit`] if the solver runs out of sweeps.
    pub fn compute_with_config(
        cfg: &ControlFlowGraph,
        config: &AnalysisConfig,
    ) -> Result<CfgFacts<CfgNode>> {
        DataFlowSolver::with_config(Dominators, config).solve(cfg)
    }
}

impl DataFlowAnalysis for Dominators {
    type Fact = CfgNode;
    const DIRECTION: Direction = Direction::Forward;

    fn boundary(&self, _cfg: &ControlFlowGraph) -> FactSet<CfgNode> {
        FactSet::from([CfgNode::Entry])
    }

    fn initial(&self, cfg: &ControlFlowGraph) -> FactSet<CfgNode> {
        cfg.node_set()
    }

    fn init_sets(&self, _cfg: &ControlFlowGraph, node: CfgNode) -> GenKill<CfgNode> {
        GenKill::new(FactSet::from([node]), FactSet::new())
    }

    fn meet(
        &self,
        _cfg: &ControlFlowGraph,
        _node: CfgNode,
        neighbours: &[&FactSet<CfgNode>],
    ) -> FactSet<CfgNode> {
        lattice::intersection(neighbours)
    }

    fn transfer(
        &self,
        _cfg: &ControlFlowGraph,
        _node: CfgNode,
        input: &FactSet<CfgNode>,
        effect: &GenKill<CfgNode>,
    ) -> FactSet<CfgNode> {
        input.union(&effect.generated).copied().collect()
    }
}
