//! Data flow analysis framework trait and direction.
//!
//! This module defines the core abstraction for data flow analyses. Any
//! specific analysis (dominators, reaching definitions, liveness) implements
//! the [`DataFlowAnalysis`] trait to work with the solver.

use std::hash::Hash;

use crate::analysis::{
    dataflow::{facts::FactSet, lattice},
    CfgNode, ControlFlowGraph,
};

/// Direction of data flow analysis.
///
/// The direction determines how information propagates through the CFG,
/// where the boundary value is installed, and whose facts the meet combines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Information flows forward, from entry to exit.
    ///
    /// The boundary value sits at `Entry`, and `in[n]` is the meet of the
    /// `out` sets of `n`'s predecessors.
    ///
    /// Examples: dominators, reaching definitions.
    Forward,

    /// Information flows backward, from exit to entry.
    ///
    /// The boundary value sits at `Exit`, and `out[n]` is the meet of the
    /// `in` sets of `n`'s successors.
    ///
    /// Examples: live variables.
    Backward,
}

impl Direction {
    /// Returns the node that receives the boundary value.
    #[must_use]
    pub const fn boundary_node(self) -> CfgNode {
        match self {
            Direction::Forward => CfgNode::Entry,
            Direction::Backward => CfgNode::Exit,
        }
    }
}

/// The local effect of one node: facts it generates and facts it kills.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenKill<T: Eq + Hash> {
    /// Facts the node makes true
    pub generated: FactSet<T>,
    /// Facts the node makes false
    pub killed: FactSet<T>,
}

impl<T: Eq + Hash> GenKill<T> {
    /// Creates a node effect from its gen and kill sets.
    #[must_use]
    pub fn new(generated: FactSet<T>, killed: FactSet<T>) -> Self {
        GenKill { generated, killed }
    }

    /// A node that neither generates nor kills anything.
    #[must_use]
    pub fn empty() -> Self {
        GenKill {
            generated: FactSet::new(),
            killed: FactSet::new(),
        }
    }
}

impl<T: Eq + Hash> Default for GenKill<T> {
    fn default() -> Self {
        Self::empty()
    }
}

/// A set-based data flow analysis over a [`ControlFlowGraph`].
///
/// This trait defines the interface for a data flow analysis. Implementations
/// seed the per-node gen/kill sets and choose a meet operation; the solver
/// handles iteration to a fixpoint.
///
/// # Direction
///
/// The `DIRECTION` constant specifies whether this is a forward or backward
/// analysis. The solver uses this to determine iteration order and which
/// neighbours feed the meet.
///
/// # Transfer Functions
///
/// For forward analyses: `out[n] = transfer(n, in[n])`
/// For backward analyses: `in[n] = transfer(n, out[n])`
///
/// The default transfer function is `gen[n] ∪ (input − kill[n])`.
///
/// # Termination
///
/// The solver stops once a sweep changes no node's output. This is guaranteed for
/// monotone transfer and meet functions over a finite fact universe. The solver also
/// enforces [`AnalysisConfig::max_sweeps`](crate::AnalysisConfig::max_sweeps), so an
/// analysis violating monotonicity fails with an error instead of spinning.
///
/// # Example
///
/// ```rust
/// use cfgflow::analysis::{
///     dataflow::{lattice, DataFlowAnalysis, Direction, FactSet, GenKill},
///     CfgNode, ControlFlowGraph,
/// };
///
/// /// Collects every node lying on some path from entry.
/// struct Visited;
///
/// impl DataFlowAnalysis for Visited {
///     type Fact = CfgNode;
///     const DIRECTION: Direction = Direction::Forward;
///
///     fn boundary(&self, _cfg: &ControlFlowGraph) -> FactSet<CfgNode> {
///         FactSet::from([CfgNode::Entry])
///     }
///
///     fn initial(&self, _cfg: &ControlFlowGraph) -> FactSet<CfgNode> {
///         FactSet::new()
///     }
///
///     fn init_sets(&self, _cfg: &ControlFlowGraph, node: CfgNode) -> GenKill<CfgNode> {
///         GenKill::new(FactSet::from([node]), FactSet::new())
///     }
///
///     fn meet(
///         &self,
///         _cfg: &ControlFlowGraph,
///         _node: CfgNode,
///         neighbours: &[&FactSet<CfgNode>],
///     ) -> FactSet<CfgNode> {
///         lattice::union(neighbours)
///     }
/// }
/// ```
pub trait DataFlowAnalysis {
    /// The element type of the fact sets.
    type Fact: Clone + Eq + Hash;

    /// The direction of this analysis.
    const DIRECTION: Direction;

    /// Returns the fact set installed at the boundary node.
    ///
    /// For forward analyses this is `Entry`, for backward analyses `Exit`. The boundary
    /// node holds this value in both its `in` and `out` sets and is never re-evaluated.
    fn boundary(&self, cfg: &ControlFlowGraph) -> FactSet<Self::Fact>;

    /// Returns the fact set every other node starts from.
    fn initial(&self, cfg: &ControlFlowGraph) -> FactSet<Self::Fact>;

    /// Seeds the gen and kill sets of a node.
    ///
    /// Called once per node, sentinels included, before iteration starts.
    fn init_sets(&self, cfg: &ControlFlowGraph, node: CfgNode) -> GenKill<Self::Fact>;

    /// Combines the facts flowing into a node.
    ///
    /// `neighbours` holds the `out` sets of the predecessors (forward) or the `in` sets
    /// of the successors (backward), in adjacency order. It is empty for nodes without
    /// such neighbours.
    fn meet(
        &self,
        cfg: &ControlFlowGraph,
        node: CfgNode,
        neighbours: &[&FactSet<Self::Fact>],
    ) -> FactSet<Self::Fact>;

    /// Computes a node's output from its input and local effect.
    fn transfer(
        &self,
        _cfg: &ControlFlowGraph,
        _node: CfgNode,
        input: &FactSet<Self::Fact>,
        effect: &GenKill<Self::Fact>,
    ) -> FactSet<Self::Fact> {
        lattice::gen_kill(input, &effect.generated, &effect.killed)
    }
}
