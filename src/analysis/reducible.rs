//! Reducibility check by T1/T2 interval collapsing.
//!
//! A CFG is reducible when every cycle has a single entry node, which is what
//! structured control flow (`if`/`loop` nesting) can express. The check repeatedly
//! applies two transformations to a working copy of the graph:
//!
//! - **T1** removes a self-loop `n -> n`
//! - **T2** merges a node with exactly one predecessor into that predecessor
//!
//! The graph is reducible iff this converges to a single node.

use tracing::{debug, trace};

use crate::{
    analysis::{CfgNode, ControlFlowGraph},
    utils::graph::DirectedGraph,
};

/// Reducibility check over a copy of a CFG's graph.
///
/// Nodes unreachable from `Entry` are dropped from the working copy first. The
/// caller's CFG is never modified.
///
/// # Examples
///
/// ```rust
/// use cfgflow::analysis::{ControlFlowGraph, Reducible};
/// use cfgflow::ir::{BasicBlock, Statement, Value};
///
/// let body = vec![
///     Statement::label("L1"),
///     Statement::define("i", 1),
///     Statement::jnz(Value::var("i"), "L1"),
/// ];
/// let cfg = ControlFlowGraph::new(BasicBlock::from_statement_list(&body))?;
/// assert!(Reducible::new(&cfg).run());
/// # Ok::<(), cfgflow::Error>(())
/// ```
pub struct Reducible {
    graph: DirectedGraph<CfgNode>,
}

impl Reducible {
    /// Copies the reachable part of `cfg` for collapsing.
    #[must_use]
    pub fn new(cfg: &ControlFlowGraph) -> Self {
        let mut graph = cfg.graph().clone();
        for node in cfg.unreachable_nodes() {
            graph.remove_node(node);
        }
        Reducible { graph }
    }

    /// Returns `true` if the CFG is reducible.
    #[must_use]
    pub fn run(self) -> bool {
        self.collapse() == 1
    }

    /// Collapses the graph as far as T1 and T2 allow and returns the number of nodes
    /// left. A reducible graph collapses to the single `Entry` node.
    #[must_use]
    pub fn collapse(mut self) -> usize {
        let mut rounds = 0usize;
        loop {
            rounds += 1;
            let removed_loops = self.apply_t1();
            let merged = self.apply_t2();
            if !removed_loops && !merged {
                break;
            }
        }

        let remaining = self.graph.node_count();
        debug!(rounds, remaining, "reducibility collapse finished");
        remaining
    }

    fn apply_t1(&mut self) -> bool {
        let looping: Vec<CfgNode> = self
            .graph
            .nodes()
            .filter(|n| self.graph.contains_edge(*n, *n))
            .collect();
        for node in &looping {
            trace!(%node, "T1: removing self-loop");
            self.graph.remove_edge(*node, *node);
        }
        !looping.is_empty()
    }

    fn apply_t2(&mut self) -> bool {
        let mut merged = false;
        let candidates: Vec<CfgNode> = self.graph.nodes().collect();

        for node in candidates {
            if !self.graph.contains_node(node) || self.graph.in_degree(node) != 1 {
                continue;
            }
            let Some(pred) = self.graph.predecessors(node).next() else {
                continue;
            };
            if pred == node {
                continue;
            }

            trace!(%node, into = %pred, "T2: merging into sole predecessor");
            let successors: Vec<CfgNode> = self.graph.successors(node).collect();
            self.graph.remove_node(node);
            for succ in successors {
                self.graph.add_edge(pred, succ);
            }
            merged = true;
        }

        merged
    }
}
