//! End-to-end tests for the analysis pipeline.
//!
//! These tests drive the crate through its public API only:
//! 1. Partition statements into basic blocks
//! 2. Build the control flow graph
//! 3. Compute dominators, the dominator tree and dominance frontiers
//! 4. Run liveness and reaching definitions
//! 5. Recover structured control flow

use std::collections::HashSet;

use cfgflow::{
    analysis::{
        dataflow::{DataFlowSolver, FactKind, FactSet, LiveVariables, ReachingDefinitions},
        CfgNode, ControlFlowGraph, DomFrontiers, DomTree, Dominators, Reducible,
    },
    compile_functions,
    ir::{BasicBlock, BinaryOp, BlockId, Expression, Statement, Value, Variable},
    pipeline::{Function, FunctionPipeline},
    relooper::{ControlKind, NodeClass, Relooper},
    AnalysisConfig, Error, Result,
};

fn bb(index: usize) -> CfgNode {
    CfgNode::Block(BlockId::new(index))
}

fn build_cfg(stmts: &[Statement]) -> Result<ControlFlowGraph> {
    ControlFlowGraph::new(BasicBlock::from_statement_list(stmts))
}

/// `$s = 0; $i = 10; while $i { $s = $s + $i; $i = $i - 1 } ret $s`
fn sum_loop() -> Vec<Statement> {
    vec![
        Statement::define("s", 0),
        Statement::define("i", 10),
        Statement::label("head"),
        Statement::jz(Value::var("i"), "done"),
        Statement::define(
            "s",
            Expression::binary(BinaryOp::Add, Value::var("s"), Value::var("i")),
        ),
        Statement::define("i", Expression::binary(BinaryOp::Sub, Value::var("i"), 1)),
        Statement::jump("head"),
        Statement::label("done"),
        Statement::ret(Some(Value::var("s"))),
    ]
}

/// Diamond that picks one of two values.
fn select() -> Vec<Statement> {
    vec![
        Statement::jz(Value::var("c"), "else"),
        Statement::define("x", 1),
        Statement::jump("end"),
        Statement::label("else"),
        Statement::define("x", 2),
        Statement::label("end"),
        Statement::call("print", vec![Value::var("x")]),
        Statement::ret(Some(Value::var("x"))),
    ]
}

#[test]
fn graph_degree_sums_match_edge_count() -> Result<()> {
    for stmts in [sum_loop(), select()] {
        let cfg = build_cfg(&stmts)?;
        let graph = cfg.graph();

        let out_sum: usize = graph.nodes().map(|n| graph.out_degree(n)).sum();
        let in_sum: usize = graph.nodes().map(|n| graph.in_degree(n)).sum();
        assert_eq!(out_sum, graph.edge_count());
        assert_eq!(in_sum, graph.edge_count());

        for edge in graph.edges() {
            assert!(graph.contains_node(edge.from));
            assert!(graph.contains_node(edge.to));
        }
    }
    Ok(())
}

#[test]
fn blocks_keep_only_interior_statements() -> Result<()> {
    let cfg = build_cfg(&sum_loop())?;

    // bb0: s, i | bb1: head: jz | bb2: body; jmp head | bb3: done: ret
    assert_eq!(cfg.block_count(), 4);
    let header = cfg.block(BlockId::new(1)).expect("header block");
    assert_eq!(header.entry.as_deref(), Some("head"));
    assert!(header.statements.is_empty());
    assert!(header.is_conditional());

    let interior: usize = cfg.blocks().iter().map(|b| b.statements.len()).sum();
    assert_eq!(interior, 5);
    Ok(())
}

#[test]
fn conditional_block_fans_out() -> Result<()> {
    let cfg = build_cfg(&select())?;

    let successors: HashSet<CfgNode> = cfg.successors(bb(0)).collect();
    assert_eq!(successors, HashSet::from([bb(1), bb(2)]));
    assert_eq!(cfg.true_successor(bb(0)), Some(bb(2)));
    assert!(cfg.block(BlockId::new(2)).is_some_and(|b| b.true_branch));
    Ok(())
}

#[test]
fn dominance_holds_on_loop() -> Result<()> {
    let cfg = build_cfg(&sum_loop())?;
    let dominators = Dominators::compute(&cfg)?;
    let tree = DomTree::new(&cfg, &dominators)?;

    for &node in cfg.reverse_postorder() {
        assert!(tree.dominates(CfgNode::Entry, node));
        assert!(dominators.out_set(node).contains(&node));
    }
    assert_eq!(tree.immediate_dominator(bb(2)), Some(bb(1)));
    assert_eq!(tree.immediate_dominator(bb(3)), Some(bb(1)));
    assert_eq!(tree.immediate_dominator(CfgNode::Exit), Some(bb(3)));
    Ok(())
}

#[test]
fn frontiers_place_phis_at_merge_points() -> Result<()> {
    let cfg = build_cfg(&select())?;
    let tree = DomTree::new(&cfg, &Dominators::compute(&cfg)?)?;
    let frontiers = DomFrontiers::new(&cfg, &tree).run();

    // $x is defined in bb1 and bb2; both frontiers name the join
    assert_eq!(frontiers.get(FactKind::Frontier, bb(1)), &FactSet::from([bb(3)]));
    assert_eq!(frontiers.get(FactKind::Frontier, bb(2)), &FactSet::from([bb(3)]));
    assert!(frontiers.get(FactKind::Frontier, CfgNode::Entry).is_empty());
    Ok(())
}

#[test]
fn liveness_tracks_loop_carried_values() -> Result<()> {
    let cfg = build_cfg(&sum_loop())?;
    let live = DataFlowSolver::new(LiveVariables).solve(&cfg)?;

    let s = Variable::new("s");
    let i = Variable::new("i");
    assert_eq!(live.in_set(bb(1)), &FactSet::from([s.clone(), i.clone()]));
    assert!(live.in_set(bb(0)).is_empty());
    assert_eq!(live.in_set(bb(3)), &FactSet::from([s]));
    assert!(live.out_set(CfgNode::Exit).is_empty());
    Ok(())
}

#[test]
fn reaching_definitions_merge_at_loop_header() -> Result<()> {
    let cfg = build_cfg(&sum_loop())?;
    let analysis = ReachingDefinitions::new(&cfg);
    let i = Variable::new("i");
    let sites = analysis.definitions_of(&i).to_vec();
    let facts = DataFlowSolver::new(analysis).solve(&cfg)?;

    // The initial `$i = 10` and the decrement both reach the header
    assert_eq!(sites.len(), 2);
    for site in &sites {
        assert!(facts.in_set(bb(1)).contains(site), "{site} should reach the header");
    }
    Ok(())
}

#[test]
fn relooper_recovers_loop_and_if() -> Result<()> {
    let cfg = build_cfg(&sum_loop())?;
    let tree = DomTree::new(&cfg, &Dominators::compute(&cfg)?)?;
    let relooper = Relooper::new(&cfg, &tree);

    assert!(relooper.classify()[&bb(1)].contains(NodeClass::LOOP | NodeClass::IF));
    let structured = relooper.run()?;
    assert_eq!(
        structured.to_string(),
        "entry\nbb0\nloop bb1\n  bb2\nend\nbb3\nexit\n"
    );

    let cfg = build_cfg(&select())?;
    let tree = DomTree::new(&cfg, &Dominators::compute(&cfg)?)?;
    let structured = Relooper::new(&cfg, &tree).run()?;
    let (_, branch) = structured.find(bb(0)).expect("branch block");
    assert!(matches!(branch.kind, ControlKind::If { .. }));
    Ok(())
}

#[test]
fn irreducible_graph_is_rejected() -> Result<()> {
    let stmts = vec![
        Statement::jz(Value::var("c"), "b"),
        Statement::label("a"),
        Statement::define("x", 1),
        Statement::label("b"),
        Statement::jnz(Value::var("x"), "a"),
        Statement::ret(None),
    ];
    let cfg = build_cfg(&stmts)?;
    assert!(!Reducible::new(&cfg).run());

    let tree = DomTree::new(&cfg, &Dominators::compute(&cfg)?)?;
    assert!(matches!(
        Relooper::new(&cfg, &tree).run(),
        Err(Error::Irreducible { .. })
    ));
    Ok(())
}

#[test]
fn label_errors_are_reported() {
    let undefined = build_cfg(&[Statement::jz(Value::var("c"), "nowhere")]);
    assert!(matches!(undefined, Err(Error::UndefinedLabel { ref label, .. }) if label == "nowhere"));

    let duplicate = build_cfg(&[
        Statement::label("L1"),
        Statement::define("a", 1),
        Statement::label("L1"),
    ]);
    assert!(matches!(duplicate, Err(Error::DuplicateLabel { ref label }) if label == "L1"));
}

#[test]
fn empty_function_compiles() -> Result<()> {
    let compiled = FunctionPipeline::default().run("empty", &[])?;

    assert_eq!(compiled.cfg.block_count(), 0);
    assert!(compiled.cfg.successors(CfgNode::Entry).eq([CfgNode::Exit]));
    assert_eq!(compiled.structured.to_string(), "entry\nexit\n");
    Ok(())
}

#[test]
fn batch_compilation_matches_sequential() {
    let functions: Vec<Function> = (0..16)
        .map(|n| {
            let body = if n % 2 == 0 { sum_loop() } else { select() };
            Function::new(format!("f{n}"), body)
        })
        .collect();

    let parallel = compile_functions(&functions, &AnalysisConfig::default());
    let sequential = compile_functions(&functions, &AnalysisConfig::strict());

    assert_eq!(parallel.len(), functions.len());
    for (p, s) in parallel.iter().zip(&sequential) {
        let (p, s) = (p.as_ref().expect("parallel"), s.as_ref().expect("sequential"));
        assert_eq!(p.name, s.name);
        assert_eq!(p.structured, s.structured);
    }
}
