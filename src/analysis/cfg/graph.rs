//! Control Flow Graph implementation.
//!
//! This module provides the main [`ControlFlowGraph`] structure that owns a function's
//! basic blocks and wires them together with synthetic entry and exit nodes.

use std::{
    collections::{HashMap, HashSet},
    sync::OnceLock,
};

use tracing::debug;

use crate::{
    analysis::cfg::CfgNode,
    ir::{BasicBlock, BlockId, Value},
    utils::{
        graph::{algorithms, DirectedGraph},
        DotWriter,
    },
    Error, Result,
};

/// Reverse postorder of the reachable nodes, computed once per graph.
#[derive(Debug, Clone)]
struct Traversal {
    order: Vec<CfgNode>,
    numbering: HashMap<CfgNode, usize>,
}

/// A control flow graph over the basic blocks of one function.
///
/// The CFG owns its blocks in an arena indexed by [`BlockId`] and keeps the control
/// flow itself in a [`DirectedGraph`] over [`CfgNode`] handles. [`CfgNode::Entry`] and
/// [`CfgNode::Exit`] are always present, even for an empty function body.
///
/// # Construction
///
/// Blocks come from [`BasicBlock::from_statement_list`] and are wired in a single pass:
///
/// 1. every block becomes a node, and entry labels are indexed
/// 2. a block with an exit jump gets an edge to the block carrying the target label;
///    the target of a conditional jump is marked as a true branch
/// 3. a block without an exit, or with a conditional exit, gets a fallthrough edge to
///    the next block in sequence (or to `Exit` after the last block)
/// 4. `Entry` is connected to the first block, or directly to `Exit` if there is none
///
/// A conditional block therefore has exactly two outgoing edges, one to the jump target
/// and one fallthrough, unless both name the same block.
///
/// # Cloning
///
/// `Clone` produces a structurally independent copy: blocks, graph and cached
/// traversals are all owned values. [`Reducible`](crate::analysis::Reducible) relies on
/// this to collapse a working copy without touching the caller's graph.
///
/// # Examples
///
/// ```rust
/// use cfgflow::{analysis::{CfgNode, ControlFlowGraph}, ir::{BasicBlock, Statement, Value}};
///
/// let stmts = vec![
///     Statement::jz(Value::var("c"), "L1"),
///     Statement::define("a", 1),
///     Statement::label("L1"),
/// ];
/// let cfg = ControlFlowGraph::new(BasicBlock::from_statement_list(&stmts))?;
///
/// assert_eq!(cfg.block_count(), 2);
/// assert_eq!(cfg.successors(cfg.entry()).collect::<Vec<_>>().len(), 1);
/// assert!(cfg.predecessors(CfgNode::Exit).count() > 0);
/// # Ok::<(), cfgflow::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct ControlFlowGraph {
    /// Block arena; position `i` holds the block with id `i`.
    blocks: Vec<BasicBlock>,
    /// Control flow between blocks and the two sentinels.
    graph: DirectedGraph<CfgNode>,
    /// Resolved target of every conditional exit.
    true_targets: HashMap<BlockId, BlockId>,
    /// Lazily computed reverse postorder from `Entry`.
    traversal: OnceLock<Traversal>,
}

impl ControlFlowGraph {
    /// Builds the control flow graph for a function's blocks.
    ///
    /// # Arguments
    ///
    /// * `blocks` - Blocks in statement order, as produced by
    ///   [`BasicBlock::from_statement_list`]
    ///
    /// # Errors
    ///
    /// - [`Error::UndefinedLabel`] if a jump names a label no block defines
    /// - [`Error::DuplicateLabel`] if two blocks carry the same entry label
    /// - [`Error::Malformed`] if block ids do not match their positions
    pub fn new(mut blocks: Vec<BasicBlock>) -> Result<Self> {
        let block_count = blocks.len();
        let mut graph = DirectedGraph::with_capacity(block_count + 2, block_count * 2 + 1);
        let mut labels: HashMap<String, BlockId> = HashMap::with_capacity(block_count);

        graph.add_node(CfgNode::Entry);
        for (index, block) in blocks.iter().enumerate() {
            if block.id.index() != index {
                return Err(malformed_error!(
                    "block {} found at position {}",
                    block.id,
                    index
                ));
            }

            graph.add_node(CfgNode::Block(block.id));
            if let Some(label) = &block.entry {
                if labels.insert(label.clone(), block.id).is_some() {
                    return Err(Error::DuplicateLabel {
                        label: label.clone(),
                    });
                }
            }
        }
        graph.add_node(CfgNode::Exit);

        let mut true_targets = HashMap::new();
        for index in 0..block_count {
            let node = CfgNode::Block(BlockId(index));

            if let Some(exit) = &blocks[index].exit {
                let target = *labels
                    .get(exit.target())
                    .ok_or_else(|| Error::UndefinedLabel {
                        label: exit.target().to_string(),
                        block: node,
                    })?;

                graph.add_edge(node, CfgNode::Block(target));
                if exit.is_conditional() {
                    true_targets.insert(BlockId(index), target);
                }
            }

            if blocks[index].falls_through() {
                let next = if index + 1 < block_count {
                    CfgNode::Block(BlockId(index + 1))
                } else {
                    CfgNode::Exit
                };
                graph.add_edge(node, next);
            }
        }

        for target in true_targets.values() {
            blocks[target.index()].true_branch = true;
        }

        let first = if block_count > 0 {
            CfgNode::Block(BlockId(0))
        } else {
            CfgNode::Exit
        };
        graph.add_edge(CfgNode::Entry, first);

        debug!(
            blocks = block_count,
            edges = graph.edge_count(),
            "built control flow graph"
        );

        Ok(ControlFlowGraph {
            blocks,
            graph,
            true_targets,
            traversal: OnceLock::new(),
        })
    }

    /// Returns the entry sentinel.
    #[must_use]
    pub const fn entry(&self) -> CfgNode {
        CfgNode::Entry
    }

    /// Returns the exit sentinel.
    #[must_use]
    pub const fn exit(&self) -> CfgNode {
        CfgNode::Exit
    }

    /// Returns the block with the given handle.
    #[must_use]
    pub fn block(&self, id: BlockId) -> Option<&BasicBlock> {
        self.blocks.get(id.index())
    }

    /// Returns the basic block behind a node, `None` for the sentinels.
    #[must_use]
    pub fn node_block(&self, node: CfgNode) -> Option<&BasicBlock> {
        node.block().and_then(|id| self.block(id))
    }

    /// Returns all blocks in statement order.
    #[must_use]
    pub fn blocks(&self) -> &[BasicBlock] {
        &self.blocks
    }

    /// Returns the number of basic blocks, excluding the sentinels.
    #[must_use]
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Returns the number of graph nodes, including the sentinels.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Iterates over all nodes: `Entry`, the blocks in order, then `Exit`.
    pub fn nodes(&self) -> impl Iterator<Item = CfgNode> + '_ {
        self.graph.nodes()
    }

    /// Iterates over the successors of a node.
    pub fn successors(&self, node: CfgNode) -> impl Iterator<Item = CfgNode> + '_ {
        self.graph.successors(node)
    }

    /// Iterates over the predecessors of a node.
    pub fn predecessors(&self, node: CfgNode) -> impl Iterator<Item = CfgNode> + '_ {
        self.graph.predecessors(node)
    }

    /// Returns the underlying directed graph.
    #[must_use]
    pub fn graph(&self) -> &DirectedGraph<CfgNode> {
        &self.graph
    }

    /// Returns the block a node's conditional exit jumps to when its test holds.
    ///
    /// `None` for the sentinels and for blocks without a conditional exit.
    #[must_use]
    pub fn true_successor(&self, node: CfgNode) -> Option<CfgNode> {
        let id = node.block()?;
        self.true_targets.get(&id).copied().map(CfgNode::Block)
    }

    /// Returns the value tested by a node's conditional exit.
    #[must_use]
    pub fn condition(&self, node: CfgNode) -> Option<&Value> {
        self.node_block(node)?.exit.as_ref()?.condition()
    }

    fn traversal(&self) -> &Traversal {
        self.traversal.get_or_init(|| {
            let order = algorithms::reverse_postorder(&self.graph, CfgNode::Entry);
            let numbering = order
                .iter()
                .enumerate()
                .map(|(position, node)| (*node, position))
                .collect();
            Traversal { order, numbering }
        })
    }

    /// Returns the nodes reachable from `Entry` in reverse postorder.
    ///
    /// This is the iteration order for forward data flow analyses.
    #[must_use]
    pub fn reverse_postorder(&self) -> &[CfgNode] {
        &self.traversal().order
    }

    /// Returns the nodes reachable from `Entry` in postorder.
    ///
    /// This is the iteration order for backward data flow analyses.
    #[must_use]
    pub fn postorder(&self) -> Vec<CfgNode> {
        self.reverse_postorder().iter().rev().copied().collect()
    }

    /// Returns the reverse postorder position of a node, `None` if it is unreachable.
    #[must_use]
    pub fn rpo_index(&self, node: CfgNode) -> Option<usize> {
        self.traversal().numbering.get(&node).copied()
    }

    /// Returns the reverse postorder position of every reachable node.
    #[must_use]
    pub fn rpo_numbering(&self) -> &HashMap<CfgNode, usize> {
        &self.traversal().numbering
    }

    /// Returns `true` if some path leads from `Entry` to `node`.
    #[must_use]
    pub fn is_reachable(&self, node: CfgNode) -> bool {
        self.traversal().numbering.contains_key(&node)
    }

    /// Returns the nodes no path from `Entry` reaches, in node order.
    #[must_use]
    pub fn unreachable_nodes(&self) -> Vec<CfgNode> {
        self.nodes().filter(|n| !self.is_reachable(*n)).collect()
    }

    /// Returns the set of all nodes.
    #[must_use]
    pub fn node_set(&self) -> HashSet<CfgNode> {
        self.nodes().collect()
    }

    /// Generates a DOT format representation of the control flow graph.
    ///
    /// Edges leaving a conditional block are labelled `true` (jump taken) and `false`
    /// (fallthrough).
    ///
    /// # Arguments
    ///
    /// * `title` - Optional title for the graph
    #[must_use]
    pub fn to_dot(&self, title: Option<&str>) -> String {
        let mut dot = DotWriter::new("CFG", title);

        for node in self.nodes() {
            let mut lines = vec![node.to_string()];
            if let Some(block) = self.node_block(node) {
                lines.extend(block.lines());
            }
            dot.node(&node.to_string(), &lines);
        }

        for edge in self.graph.edges() {
            let label = match self.true_successor(edge.from) {
                Some(target) if target == edge.to => Some("true"),
                Some(_) => Some("false"),
                None => None,
            };
            dot.edge(&edge.from.to_string(), &edge.to.to_string(), label);
        }

        dot.finish()
    }
}

#[cfg(test)]
mod tests {
    use crate::{
        analysis::{CfgNode, ControlFlowGraph},
        ir::{BasicBlock, BlockId, Statement, Value},
        test::{cfg_from, if_else_statements, while_loop_statements},
        Error,
    };

    fn bb(index: usize) -> CfgNode {
        CfgNode::Block(BlockId::new(index))
    }

    #[test]
    fn test_cfg_empty_body() {
        let cfg = ControlFlowGraph::new(Vec::new()).unwrap();

        assert_eq!(cfg.block_count(), 0);
        assert_eq!(cfg.node_count(), 2);
        assert!(cfg.graph().contains_edge(CfgNode::Entry, CfgNode::Exit));
        assert_eq!(cfg.reverse_postorder(), &[CfgNode::Entry, CfgNode::Exit]);
    }

    #[test]
    fn test_cfg_straight_line() {
        let cfg = cfg_from(&[Statement::define("a", 1), Statement::ret(None)]);

        assert_eq!(cfg.block_count(), 1);
        assert_eq!(cfg.successors(CfgNode::Entry).collect::<Vec<_>>(), vec![bb(0)]);
        assert_eq!(cfg.successors(bb(0)).collect::<Vec<_>>(), vec![CfgNode::Exit]);
    }

    #[test]
    fn test_cfg_if_else_edges() {
        let cfg = cfg_from(&if_else_statements());

        assert_eq!(cfg.block_count(), 4);
        assert_eq!(
            cfg.successors(bb(0)).collect::<Vec<_>>(),
            vec![bb(2), bb(1)]
        );
        assert_eq!(cfg.successors(bb(1)).collect::<Vec<_>>(), vec![bb(3)]);
        assert_eq!(cfg.successors(bb(2)).collect::<Vec<_>>(), vec![bb(3)]);
        assert_eq!(cfg.successors(bb(3)).collect::<Vec<_>>(), vec![CfgNode::Exit]);
        assert_eq!(cfg.predecessors(bb(3)).count(), 2);
    }

    #[test]
    fn test_cfg_conditional_fan_out() {
        let cfg = cfg_from(&if_else_statements());

        for block in cfg.blocks() {
            if !block.is_conditional() {
                continue;
            }
            let node = CfgNode::Block(block.id);
            let successors: Vec<CfgNode> = cfg.successors(node).collect();
            assert_eq!(successors.len(), 2);

            let taken = cfg.true_successor(node).unwrap();
            assert!(successors.contains(&taken));
            assert!(cfg.node_block(taken).unwrap().true_branch);

            let fallthrough = successors.iter().find(|s| **s != taken).unwrap();
            assert!(!cfg.node_block(*fallthrough).unwrap().true_branch);
        }
    }

    #[test]
    fn test_cfg_every_node_connected() {
        let cfg = cfg_from(&while_loop_statements());

        for node in cfg.nodes() {
            if node != CfgNode::Entry {
                assert!(cfg.predecessors(node).count() >= 1, "{node} has no predecessor");
            }
            if node != CfgNode::Exit {
                assert!(cfg.successors(node).count() >= 1, "{node} has no successor");
            }
        }
    }

    #[test]
    fn test_cfg_loop_back_edge() {
        let cfg = cfg_from(&while_loop_statements());

        // bb1 jumps back to the loop header
        assert!(cfg.graph().contains_edge(bb(1), bb(0)));
        assert!(cfg.rpo_index(bb(1)).unwrap() > cfg.rpo_index(bb(0)).unwrap());
    }

    #[test]
    fn test_cfg_undefined_label() {
        let blocks = BasicBlock::from_statement_list(&[
            Statement::define("a", 1),
            Statement::jump("missing"),
        ]);

        assert_eq!(
            ControlFlowGraph::new(blocks).unwrap_err(),
            Error::UndefinedLabel {
                label: "missing".to_string(),
                block: bb(0),
            }
        );
    }

    #[test]
    fn test_cfg_duplicate_label() {
        let blocks = BasicBlock::from_statement_list(&[
            Statement::label("L1"),
            Statement::define("a", 1),
            Statement::label("L1"),
        ]);

        assert!(matches!(
            ControlFlowGraph::new(blocks),
            Err(Error::DuplicateLabel { label }) if label == "L1"
        ));
    }

    #[test]
    fn test_cfg_misnumbered_blocks() {
        let mut blocks = BasicBlock::from_statement_list(&[
            Statement::label("L1"),
            Statement::label("L2"),
        ]);
        blocks.swap(0, 1);

        assert!(matches!(
            ControlFlowGraph::new(blocks),
            Err(Error::Malformed { .. })
        ));
    }

    #[test]
    fn test_cfg_unreachable_block() {
        let cfg = cfg_from(&[
            Statement::jump("L1"),
            Statement::define("dead", 0),
            Statement::label("L1"),
            Statement::ret(None),
        ]);

        assert!(!cfg.is_reachable(bb(1)));
        assert_eq!(cfg.unreachable_nodes(), vec![bb(1)]);
        assert!(cfg.is_reachable(CfgNode::Exit));
    }

    #[test]
    fn test_cfg_clone_is_independent() {
        let cfg = cfg_from(&if_else_statements());
        let mut copy = cfg.clone();

        assert_eq!(copy.node_count(), cfg.node_count());
        copy.graph.remove_node(bb(3));

        assert!(cfg.graph().contains_node(bb(3)));
        assert_eq!(cfg.predecessors(CfgNode::Exit).count(), 1);
        assert_eq!(copy.predecessors(CfgNode::Exit).count(), 0);
    }

    #[test]
    fn test_cfg_condition_lookup() {
        let cfg = cfg_from(&if_else_statements());
        assert_eq!(cfg.condition(bb(0)), Some(&Value::var("c")));
        assert_eq!(cfg.condition(bb(1)), None);
        assert_eq!(cfg.condition(CfgNode::Entry), None);
    }

    #[test]
    fn test_cfg_to_dot() {
        let cfg = cfg_from(&if_else_statements());
        let dot = cfg.to_dot(Some("main"));

        assert!(dot.starts_with("digraph CFG {"));
        assert!(dot.contains("entry -> bb0;"));
        assert!(dot.contains("bb0 -> bb2 [label=\"true\"];"));
        assert!(dot.contains("bb0 -> bb1 [label=\"false\"];"));
        assert!(dot.contains("jz $c L1"));
    }
}
