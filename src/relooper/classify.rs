//! Node classification by reverse postorder edge direction.

use std::collections::HashMap;

use bitflags::bitflags;

use crate::analysis::{CfgNode, ControlFlowGraph};

bitflags! {
    /// Structural roles of a CFG node. A node may carry several at once.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct NodeClass : u8 {
        /// Two or more forward incoming edges (`rpo(from) < rpo(to)`)
        const JOIN = 0x01;
        /// Two or more outgoing edges
        const IF = 0x02;
        /// At least one back incoming edge (`rpo(from) >= rpo(to)`), self-loops included
        const LOOP = 0x04;
    }
}

/// Classifies every node reachable from `Entry`.
///
/// Edges from unreachable nodes are ignored; unreachable nodes get no entry.
#[must_use]
pub fn classify(cfg: &ControlFlowGraph) -> HashMap<CfgNode, NodeClass> {
    let rpo = cfg.rpo_numbering();
    let mut classes = HashMap::with_capacity(rpo.len());

    for &node in cfg.reverse_postorder() {
        let position = rpo[&node];
        let mut class = NodeClass::empty();
        let mut forward = 0usize;

        for pred in cfg.predecessors(node) {
            match rpo.get(&pred) {
                Some(&from) if from < position => forward += 1,
                Some(_) => class |= NodeClass::LOOP,
                None => {}
            }
        }
        if forward >= 2 {
            class |= NodeClass::JOIN;
        }
        if cfg.successors(node).count() >= 2 {
            class |= NodeClass::IF;
        }

        classes.insert(node, class);
    }

    classes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        ir::{BlockId, Statement},
        test::{cfg_from, if_else_statements, while_loop_statements},
    };

    fn bb(index: usize) -> CfgNode {
        CfgNode::Block(BlockId::new(index))
    }

    #[test]
    fn test_if_else_classes() {
        let cfg = cfg_from(&if_else_statements());
        let classes = classify(&cfg);

        assert_eq!(classes[&CfgNode::Entry], NodeClass::empty());
        assert_eq!(classes[&bb(0)], NodeClass::IF);
        assert_eq!(classes[&bb(1)], NodeClass::empty());
        assert_eq!(classes[&bb(3)], NodeClass::JOIN);
        assert_eq!(classes[&CfgNode::Exit], NodeClass::empty());
    }

    #[test]
    fn test_loop_header_is_loop_and_if() {
        let cfg = cfg_from(&while_loop_statements());
        let classes = classify(&cfg);

        assert_eq!(classes[&bb(0)], NodeClass::LOOP | NodeClass::IF);
        assert!(!classes[&bb(0)].contains(NodeClass::JOIN));
    }

    #[test]
    fn test_self_loop_is_loop() {
        let cfg = cfg_from(&[
            Statement::label("L1"),
            Statement::define("i", 1),
            Statement::jnz(crate::ir::Value::var("i"), "L1"),
        ]);
        let classes = classify(&cfg);

        assert!(classes[&bb(0)].contains(NodeClass::LOOP));
        assert!(classes[&bb(0)].contains(NodeClass::IF));
    }

    #[test]
    fn test_unreachable_nodes_are_not_classified() {
        let cfg = cfg_from(&[
            Statement::jump("L1"),
            Statement::define("dead", 0),
            Statement::label("L1"),
        ]);
        let classes = classify(&cfg);

        assert!(!classes.contains_key(&bb(1)));
        // The dead block's edge does not make L1 a join
        assert_eq!(classes[&bb(2)], NodeClass::empty());
    }
}
