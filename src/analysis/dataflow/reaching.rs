//! Reaching definitions analysis.
//!
//! Reaching definitions computes, for each program point, which variable
//! definitions may reach that point without being killed by an intervening
//! definition of the same variable.
//!
//! This analysis is useful for:
//! - Computing def-use chains
//! - Detecting dead definitions
//! - Finding variables that may be read before any definition
//!
//! # Algorithm
//!
//! For each block B:
//! - `GEN[B]` = the last definition of each variable defined in B
//! - `KILL[B]` = every other definition of those variables, anywhere in the function
//! - `IN[B]` = ∪{OUT[P] | P is a predecessor of B}
//! - `OUT[B]` = GEN[B] ∪ (IN[B] - KILL[B])

use std::{collections::HashMap, fmt};

use crate::{
    analysis::{
        dataflow::{
            facts::FactSet,
            framework::{DataFlowAnalysis, Direction, GenKill},
            lattice,
        },
        CfgNode, ControlFlowGraph,
    },
    ir::Variable,
};

/// One definition site: the `index`-th interior statement of `node`, defining `variable`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Definition {
    /// Block holding the definition
    pub node: CfgNode,
    /// Position among the block's interior statements
    pub index: usize,
    /// The defined variable
    pub variable: Variable,
}

impl fmt::Display for Definition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}:{}", self.variable, self.node, self.index)
    }
}

/// Reaching definitions analysis.
///
/// Computes which variable definitions may reach each block. The definition sites of
/// the whole function are collected once, when the analysis is created.
///
/// # Example
///
/// ```rust
/// use cfgflow::analysis::{dataflow::{DataFlowSolver, ReachingDefinitions}, ControlFlowGraph};
/// use cfgflow::ir::{BasicBlock, Statement, Value};
///
/// let body = vec![
///     Statement::define("a", 1),
///     Statement::label("L1"),
///     Statement::ret(Some(Value::var("a"))),
/// ];
/// let cfg = ControlFlowGraph::new(BasicBlock::from_statement_list(&body))?;
/// let facts = DataFlowSolver::new(ReachingDefinitions::new(&cfg)).solve(&cfg)?;
///
/// assert_eq!(facts.in_set(cfg.exit()).len(), 1);
/// # Ok::<(), cfgflow::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct ReachingDefinitions {
    /// Every definition site, grouped by variable.
    sites: HashMap<Variable, Vec<Definition>>,
}

impl ReachingDefinitions {
    /// Collects the definition sites of `cfg`.
    #[must_use]
    pub fn new(cfg: &ControlFlowGraph) -> Self {
        let mut sites: HashMap<Variable, Vec<Definition>> = HashMap::new();

        for block in cfg.blocks() {
            for (index, stmt) in block.statements.iter().enumerate() {
                if let Some(variable) = stmt.defined_variable() {
                    sites.entry(variable.clone()).or_default().push(Definition {
                        node: CfgNode::Block(block.id),
                        index,
                        variable: variable.clone(),
                    });
                }
            }
        }

        ReachingDefinitions { sites }
    }

    /// Returns every definition site of `variable`.
    #[must_use]
    pub fn definitions_of(&self, variable: &Variable) -> &[Definition] {
        self.sites.get(variable).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Returns the total number of definition sites.
    #[must_use]
    pub fn definition_count(&self) -> usize {
        self.sites.values().map(Vec::len).sum()
    }
}

impl DataFlowAnalysis for ReachingDefinitions {
    type Fact = Definition;
    const DIRECTION: Direction = Direction::Forward;

    fn boundary(&self, _cfg: &ControlFlowGraph) -> FactSet<Definition> {
        FactSet::new()
    }

    fn initial(&self, _cfg: &ControlFlowGraph) -> FactSet<Definition> {
        FactSet::new()
    }

    fn init_sets(&self, cfg: &ControlFlowGraph, node: CfgNode) -> GenKill<Definition> {
        let Some(block) = cfg.node_block(node) else {
            return GenKill::empty();
        };

        // Later definitions in the block shadow earlier ones
        let mut last: HashMap<&Variable, usize> = HashMap::new();
        for (index, stmt) in block.statements.iter().enumerate() {
            if let Some(variable) = stmt.defined_variable() {
                last.insert(variable, index);
            }
        }

        let mut effect = GenKill::empty();
        for (variable, index) in last {
            for site in self.definitions_of(variable) {
                if site.node == node && site.index == index {
                    effect.generated.insert(site.clone());
                } else {
                    effect.killed.insert(site.clone());
                }
            }
        }
        effect
    }

    fn meet(
        &self,
        _cfg: &ControlFlowGraph,
        _node: CfgNode,
        neighbours: &[&FactSet<Definition>],
    ) -> FactSet<Definition> {
        lattice::union(neighbours)
    }
}
