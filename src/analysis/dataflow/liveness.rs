//! Live variable analysis.
//!
//! A variable is *live* at a program point if there exists a path from that
//! point to a use of the variable that doesn't pass through a definition of
//! the variable.
//!
//! # Uses
//!
//! Live variable analysis is essential for:
//! - **Dead code elimination**: If a definition's result is never live, it's dead
//! - **Register allocation**: Variables live at the same time need different registers
//! - **Local slot reuse**: Stack-machine emitters can share locals with disjoint lifetimes
//!
//! # Algorithm
//!
//! This is a backward data flow analysis:
//!
//! - `USE[B]` = variables used in B before any definition in B
//! - `DEF[B]` = variables defined in B
//! - `OUT[B]` = ∪{IN[S] | S is a successor of B}
//! - `IN[B]` = USE[B] ∪ (OUT[B] - DEF[B])
//!
//! The condition tested by a block's conditional exit is a use at the very end of the
//! block, after every interior statement.

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

/// Live variable analysis.
///
/// Facts are [`Variable`]s. `gen` holds the upward-exposed uses of a block, `kill`
/// its definitions.
///
/// # Example
///
/// ```rust
/// use cfgflow::analysis::{dataflow::{DataFlowSolver, LiveVariables}, ControlFlowGraph};
/// use cfgflow::ir::{BasicBlock, Statement, Value, Variable};
///
/// let body = vec![
///     Statement::define("a", Value::var("b")),
///     Statement::ret(Some(Value::var("a"))),
/// ];
/// let cfg = ControlFlowGraph::new(BasicBlock::from_statement_list(&body))?;
/// let facts = DataFlowSolver::new(LiveVariables).solve(&cfg)?;
///
/// let first = cfg.successors(cfg.entry()).next().unwrap();
/// assert!(facts.in_set(first).contains(&Variable::new("b")));
/// assert!(!facts.in_set(first).contains(&Variable::new("a")));
/// # Ok::<(), cfgflow::Error>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct LiveVariables;

impl DataFlowAnalysis for LiveVariables {
    type Fact = Variable;
    const DIRECTION: Direction = Direction::Backward;

    fn boundary(&self, _cfg: &ControlFlowGraph) -> FactSet<Variable> {
        FactSet::new()
    }

    fn initial(&self, _cfg: &ControlFlowGraph) -> FactSet<Variable> {
        FactSet::new()
    }

    fn init_sets(&self, cfg: &ControlFlowGraph, node: CfgNode) -> GenKill<Variable> {
        fn note_use(effect: &mut GenKill<Variable>, var: &Variable) {
            if !effect.killed.contains(var) {
                effect.generated.insert(var.clone());
            }
        }

        let Some(block) = cfg.node_block(node) else {
            return GenKill::empty();
        };

        let mut effect = GenKill::empty();
        for stmt in &block.statements {
            for var in stmt.used_variables() {
                note_use(&mut effect, var);
            }
            if let Some(var) = stmt.defined_variable() {
                effect.killed.insert(var.clone());
            }
        }
        if let Some(var) = block
            .exit
            .as_ref()
            .and_then(|exit| exit.condition())
            .and_then(|value| value.as_variable())
        {
            note_use(&mut effect, var);
        }

        effect
    }

    fn meet(
        &self,
        _cfg: &ControlFlowGraph,
        _node: CfgNode,
        neighbours: &[&FactSet<Variable>],
    ) -> FactSet<Variable> {
        lattice::union(neighbours)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        analysis::dataflow::DataFlowSolver,
        ir::{BinaryOp, BlockId, Expression, Statement, Value},
        test::{cfg_from, diamond_liveness_statements},
    };

    fn bb(index: usize) -> CfgNode {
        CfgNode::Block(BlockId::new(index))
    }

    fn var(name: &str) -> Variable {
        Variable::new(name)
    }

    #[test]
    fn test_use_before_def_is_generated() {
        let cfg = cfg_from(&[
            Statement::define("a", Expression::binary(BinaryOp::Add, Value::var("a"), 1)),
            Statement::define("b", Value::var("a")),
            Statement::define("c", Value::var("d")),
        ]);
        let effect = LiveVariables.init_sets(&cfg, bb(0));

        assert_eq!(effect.generated, FactSet::from([var("a"), var("d")]));
        assert_eq!(effect.killed, FactSet::from([var("a"), var("b"), var("c")]));
    }

    #[test]
    fn test_condition_is_a_use() {
        let cfg = cfg_from(&[
            Statement::define("c", 0),
            Statement::jz(Value::var("c"), "L1"),
            Statement::label("L1"),
            Statement::jnz(Value::var("k"), "L1"),
        ]);

        assert!(LiveVariables.init_sets(&cfg, bb(0)).generated.is_empty());
        assert_eq!(
            LiveVariables.init_sets(&cfg, bb(1)).generated,
            FactSet::from([var("k")])
        );
    }

    #[test]
    fn test_diamond_fixed_point() {
        // bb0: jz $c L1 / bb1: $x = 1, jmp L2 / bb2: L1: $x = 2 / bb3: L2: ret $x
        let cfg = cfg_from(&diamond_liveness_statements());
        let facts = DataFlowSolver::new(LiveVariables).solve(&cfg).unwrap();

        let x = var("x");
        assert!(facts.in_set(bb(3)).contains(&x));
        assert!(facts.out_set(bb(1)).contains(&x));
        assert!(facts.out_set(bb(2)).contains(&x));
        assert!(!facts.in_set(bb(1)).contains(&x));
        assert!(!facts.in_set(bb(2)).contains(&x));
        assert!(!facts.in_set(bb(0)).contains(&x));
        assert!(facts.in_set(bb(0)).contains(&var("c")));
    }

    #[test]
    fn test_loop_keeps_counter_live() {
        // L1: jz $i L2 / $i = $i - 1, jmp L1 / L2: ret
        let cfg = cfg_from(&crate::test::while_loop_statements());
        let facts = DataFlowSolver::new(LiveVariables).solve(&cfg).unwrap();

        assert!(facts.in_set(bb(0)).contains(&var("i")));
        assert!(facts.out_set(bb(1)).contains(&var("i")));
        assert!(facts.in_set(bb(2)).is_empty());
    }
}
