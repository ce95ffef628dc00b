//! Round-robin iterative data flow solver.
//!
//! This module provides the solver that computes fixpoints for data flow
//! analyses by sweeping every node until nothing changes.
//!
//! # Algorithm
//!
//! 1. Seed gen/kill sets for every node
//! 2. Install the boundary value in both `in` and `out` of the boundary node
//!    (`Entry` forward, `Exit` backward) and the initial value everywhere else
//! 3. Sweep all non-boundary nodes, reachable ones first in reverse postorder
//!    (forward) or postorder (backward), then the unreachable ones in node order:
//!    a. Meet the neighbours' facts into the node's input; a reachable node only
//!       meets over reachable neighbours
//!    b. Apply the transfer function to get the node's output
//! 4. Stop after a sweep in which no node's output changed
//!
//! # Complexity
//!
//! For most analyses on reducible CFGs, the visiting order makes the solver
//! converge in a handful of sweeps. In general the sweep count is bounded by the
//! lattice height times the node count; [`AnalysisConfig::max_sweeps`] caps it.

use std::collections::HashMap;

use tracing::{debug, trace};

use crate::{
    analysis::{
        dataflow::{
            facts::{CfgFacts, FactKind, FactSet},
            framework::{DataFlowAnalysis, Direction, GenKill},
        },
        CfgNode, ControlFlowGraph,
    },
    AnalysisConfig, Error, Result,
};

/// Iterative data flow solver.
///
/// This solver computes fixpoints for set-based data flow analyses. It supports
/// both forward and backward analyses.
///
/// # Usage
///
/// ```rust
/// use cfgflow::analysis::{dataflow::{DataFlowSolver, LiveVariables}, ControlFlowGraph};
/// use cfgflow::ir::{BasicBlock, Statement, Value};
///
/// let body = vec![Statement::define("a", 1), Statement::ret(Some(Value::var("a")))];
/// let cfg = ControlFlowGraph::new(BasicBlock::from_statement_list(&body))?;
///
/// let mut solver = DataFlowSolver::new(LiveVariables);
/// let facts = solver.solve(&cfg)?;
///
/// assert!(facts.in_set(cfg.entry()).is_empty());
/// assert!(solver.sweeps() >= 1);
/// # Ok::<(), cfgflow::Error>(())
/// ```
pub struct DataFlowSolver<A: DataFlowAnalysis> {
    /// The analysis being solved.
    analysis: A,
    /// Sweep budget.
    max_sweeps: usize,
    /// Number of sweeps performed by the last run.
    sweeps: usize,
}

impl<A: DataFlowAnalysis> DataFlowSolver<A> {
    /// Creates a new solver for the given analysis with the default sweep budget.
    #[must_use]
    pub fn new(analysis: A) -> Self {
        Self::with_config(analysis, &AnalysisConfig::default())
    }

    /// Creates a new solver taking its sweep budget from `config`.
    #[must_use]
    pub fn with_config(analysis: A, config: &AnalysisConfig) -> Self {
        Self {
            analysis,
            max_sweeps: config.max_sweeps,
            sweeps: 0,
        }
    }

    /// Returns the number of sweeps the last run needed, including the final one that
    /// confirmed the fixpoint.
    #[must_use]
    pub const fn sweeps(&self) -> usize {
        self.sweeps
    }

    /// Returns the analysis driven by this solver.
    #[must_use]
    pub fn analysis(&self) -> &A {
        &self.analysis
    }

    /// Solves the data flow analysis to a fixpoint.
    ///
    /// Returns the `gen`, `kill`, `in` and `out` sets of every node.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IterationLimit`] if no fixpoint is reached within the sweep
    /// budget.
    pub fn solve(&mut self, cfg: &ControlFlowGraph) -> Result<CfgFacts<A::Fact>> {
        let boundary_node = A::DIRECTION.boundary_node();
        let order = Self::visit_order(cfg, boundary_node);

        let mut effects: HashMap<CfgNode, GenKill<A::Fact>> =
            HashMap::with_capacity(cfg.node_count());
        for node in cfg.nodes() {
            effects.insert(node, self.analysis.init_sets(cfg, node));
        }

        let boundary = self.analysis.boundary(cfg);
        let initial = self.analysis.initial(cfg);
        let mut in_sets: HashMap<CfgNode, FactSet<A::Fact>> =
            HashMap::with_capacity(cfg.node_count());
        let mut out_sets: HashMap<CfgNode, FactSet<A::Fact>> =
            HashMap::with_capacity(cfg.node_count());
        for node in cfg.nodes() {
            let seed = if node == boundary_node {
                &boundary
            } else {
                &initial
            };
            in_sets.insert(node, seed.clone());
            out_sets.insert(node, seed.clone());
        }

        self.sweeps = 0;
        loop {
            if self.sweeps == self.max_sweeps {
                return Err(Error::IterationLimit(self.max_sweeps));
            }
            self.sweeps += 1;

            let changed = match A::DIRECTION {
                Direction::Forward => {
                    self.sweep(cfg, &order, &effects, &mut in_sets, &mut out_sets)
                }
                Direction::Backward => {
                    self.sweep(cfg, &order, &effects, &mut out_sets, &mut in_sets)
                }
            };
            if !changed {
                break;
            }
        }

        debug!(
            analysis = std::any::type_name::<A>(),
            sweeps = self.sweeps,
            nodes = cfg.node_count(),
            "data flow fixpoint reached"
        );

        let mut gen_sets = HashMap::with_capacity(effects.len());
        let mut kill_sets = HashMap::with_capacity(effects.len());
        for (node, effect) in effects {
            gen_sets.insert(node, effect.generated);
            kill_sets.insert(node, effect.killed);
        }

        let mut facts = CfgFacts::new();
        facts.insert_all(FactKind::Gen, gen_sets);
        facts.insert_all(FactKind::Kill, kill_sets);
        facts.insert_all(FactKind::In, in_sets);
        facts.insert_all(FactKind::Out, out_sets);
        Ok(facts)
    }

    /// Every non-boundary node: reachable ones in flow order, then the rest.
    fn visit_order(cfg: &ControlFlowGraph, boundary_node: CfgNode) -> Vec<CfgNode> {
        let mut order = match A::DIRECTION {
            Direction::Forward => cfg.reverse_postorder().to_vec(),
            Direction::Backward => cfg.postorder(),
        };
        order.extend(cfg.unreachable_nodes());
        order.retain(|node| *node != boundary_node);
        order
    }

    /// One pass over `order`. `inputs` are the sets the meet writes, `outputs` the sets
    /// the transfer writes; neighbours are read from `outputs`.
    ///
    /// Returns `true` if any output changed.
    fn sweep(
        &self,
        cfg: &ControlFlowGraph,
        order: &[CfgNode],
        effects: &HashMap<CfgNode, GenKill<A::Fact>>,
        inputs: &mut HashMap<CfgNode, FactSet<A::Fact>>,
        outputs: &mut HashMap<CfgNode, FactSet<A::Fact>>,
    ) -> bool {
        let mut changed = false;

        for &node in order {
            let reachable = cfg.is_reachable(node);
            let neighbours: Vec<CfgNode> = match A::DIRECTION {
                Direction::Forward => cfg.predecessors(node).collect(),
                Direction::Backward => cfg.successors(node).collect(),
            };
            // Dead code does not feed facts into live code
            let neighbour_sets: Vec<&FactSet<A::Fact>> = neighbours
                .iter()
                .filter(|n| !reachable || cfg.is_reachable(**n))
                .filter_map(|n| outputs.get(n))
                .collect();

            let input = self.analysis.meet(cfg, node, &neighbour_sets);
            let effect = match effects.get(&node) {
                Some(effect) => effect,
                None => continue,
            };
            let output = self.analysis.transfer(cfg, node, &input, effect);

            if outputs.get(&node) != Some(&output) {
                trace!(%node, size = output.len(), "data flow output changed");
                outputs.insert(node, output);
                changed = true;
            }
            inputs.insert(node, input);
        }

        changed
    }
}
