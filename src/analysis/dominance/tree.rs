//! Immediate-dominator tree derived from dominator sets.
//!
//! The **immediate dominator** of `n` (idom(n)) is the unique node that strictly
//! dominates `n` but does not strictly dominate any other dominator of `n`.
//! Making each node's immediate dominator its parent forms the dominator tree, rooted
//! at `Entry`.
//!
//! # Algorithm
//!
//! For every reachable node, the immediate dominator is the strict dominator closest
//! to the node along predecessor edges. Every other strict dominator `d` reaches the
//! node only through idom(n), so a breadth-first walk over predecessors meets idom(n)
//! strictly before any other strict dominator. The walk uses an explicit queue, so
//! deeply nested control flow cannot exhaust the call stack.
//!
//! This is O(V × E) in the worst case, which is fine at function scale.
//! TODO: switch to Cooper-Harvey-Kennedy for very large functions.

use std::collections::{HashMap, HashSet, VecDeque};

use tracing::debug;

use crate::{
    analysis::{dataflow::CfgFacts, CfgNode, ControlFlowGraph},
    utils::{graph::DirectedGraph, DotWriter},
    Error, Result,
};

/// Dominator tree of the reachable part of a CFG.
///
/// An edge `idom -> n` exists iff `idom` is the immediate dominator of `n`. Every
/// node except the root has exactly one incoming edge. Nodes unreachable from
/// `Entry` have no meaningful dominators and are not part of the tree.
///
/// # Examples
///
/// ```rust
/// use cfgflow::{analysis::{CfgNode, ControlFlowGraph, DomTree, Dominators}, ir::{BasicBlock, Statement}};
///
/// let body = vec![Statement::define("a", 1)];
/// let cfg = ControlFlowGraph::new(BasicBlock::from_statement_list(&body))?;
/// let tree = DomTree::new(&cfg, &Dominators::compute(&cfg)?)?;
///
/// let block = cfg.successors(CfgNode::Entry).next().unwrap();
/// assert_eq!(tree.immediate_dominator(block), Some(CfgNode::Entry));
/// assert_eq!(tree.immediate_dominator(CfgNode::Exit), Some(block));
/// assert!(tree.dominates(CfgNode::Entry, CfgNode::Exit));
/// # Ok::<(), cfgflow::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct DomTree {
    /// Tree edges `idom -> n`
    graph: DirectedGraph<CfgNode>,
    /// Immediate dominator of every non-root node
    idom: HashMap<CfgNode, CfgNode>,
}

impl DomTree {
    /// Derives the dominator tree from dominator sets.
    ///
    /// # Arguments
    ///
    /// * `cfg` - The graph the facts were computed on
    /// * `facts` - Dominator sets under `out`, as produced by
    ///   [`Dominators`](super::Dominators)
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingDominator`] if a reachable node other than `Entry` has no
    /// strict dominator reachable along its predecessors.
    pub fn new(cfg: &ControlFlowGraph, facts: &CfgFacts<CfgNode>) -> Result<Self> {
        let order = cfg.reverse_postorder();
        let mut graph = DirectedGraph::with_capacity(order.len(), order.len());
        let mut idom = HashMap::with_capacity(order.len());

        graph.add_node(CfgNode::Entry);
        for &node in order {
            if node == CfgNode::Entry {
                continue;
            }

            let parent = Self::nearest_strict_dominator(cfg, facts, node)
                .ok_or(Error::MissingDominator { node })?;
            graph.add_edge(parent, node);
            idom.insert(node, parent);
        }

        debug!(nodes = graph.node_count(), "built dominator tree");
        Ok(DomTree { graph, idom })
    }

    fn nearest_strict_dominator(
        cfg: &ControlFlowGraph,
        facts: &CfgFacts<CfgNode>,
        node: CfgNode,
    ) -> Option<CfgNode> {
        let dominators = facts.out_set(node);
        let mut visited = HashSet::from([node]);
        let mut queue: VecDeque<CfgNode> = VecDeque::new();

        for pred in cfg.predecessors(node) {
            if cfg.is_reachable(pred) && visited.insert(pred) {
                queue.push_back(pred);
            }
        }

        while let Some(current) = queue.pop_front() {
            if dominators.contains(&current) {
                return Some(current);
            }
            for pred in cfg.predecessors(current) {
                if cfg.is_reachable(pred) && visited.insert(pred) {
                    queue.push_back(pred);
                }
            }
        }
        None
    }

    /// Returns the root of the tree, always `Entry`.
    #[must_use]
    pub const fn root(&self) -> CfgNode {
        CfgNode::Entry
    }

    /// Returns `true` if `node` is part of the tree.
    #[must_use]
    pub fn contains(&self, node: CfgNode) -> bool {
        self.graph.contains_node(node)
    }

    /// Returns the number of nodes in the tree.
    #[must_use]
    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    /// Returns `true` if the tree holds only its root.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.graph.node_count() <= 1
    }

    /// Returns the immediate dominator of a node, or `None` for the root and for
    /// nodes outside the tree.
    #[must_use]
    pub fn immediate_dominator(&self, node: CfgNode) -> Option<CfgNode> {
        self.idom.get(&node).copied()
    }

    /// Returns the nodes immediately dominated by `node`, in reverse postorder.
    pub fn children(&self, node: CfgNode) -> impl Iterator<Item = CfgNode> + '_ {
        self.graph.successors(node)
    }

    /// Checks if node `a` dominates node `b`.
    ///
    /// A node dominates itself. The root dominates every node in the tree.
    ///
    /// # Complexity
    ///
    /// O(depth) where depth is the depth of `b` in the dominator tree.
    #[must_use]
    pub fn dominates(&self, a: CfgNode, b: CfgNode) -> bool {
        self.contains(b) && self.dominators(b).any(|d| d == a)
    }

    /// Checks if node `a` strictly dominates node `b`.
    #[must_use]
    pub fn strictly_dominates(&self, a: CfgNode, b: CfgNode) -> bool {
        a != b && self.dominates(a, b)
    }

    /// Returns an iterator over all dominators of a node, from the node itself up to
    /// (and including) the root. Yields nothing for nodes outside the tree.
    pub fn dominators(&self, node: CfgNode) -> DominatorIterator<'_> {
        DominatorIterator {
            tree: self,
            current: self.contains(node).then_some(node),
        }
    }

    /// Returns the depth of a node in the tree; the root has depth 0.
    #[must_use]
    pub fn depth(&self, node: CfgNode) -> Option<usize> {
        self.contains(node).then(|| self.dominators(node).count() - 1)
    }

    /// Returns the tree as a directed graph with edges `idom -> n`.
    #[must_use]
    pub fn graph(&self) -> &DirectedGraph<CfgNode> {
        &self.graph
    }

    /// Generates a DOT format representation of the dominator tree.
    #[must_use]
    pub fn to_dot(&self, title: Option<&str>) -> String {
        let mut dot = DotWriter::new("DomTree", title);
        for node in self.graph.nodes() {
            dot.node(&node.to_string(), &[node.to_string()]);
        }
        for edge in self.graph.edges() {
            dot.edge(&edge.from.to_string(), &edge.to.to_string(), None);
        }
        dot.finish()
    }
}

/// Iterator over dominators of a node, from the node up to the root.
pub struct DominatorIterator<'a> {
    tree: &'a DomTree,
    current: Option<CfgNode>,
}

impl Iterator for DominatorIterator<'_> {
    type Item = CfgNode;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.current?;
        self.current = self.tree.immediate_dominator(current);
        Some(current)
    }
}
