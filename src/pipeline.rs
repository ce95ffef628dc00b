//! Per-function analysis pipeline.
//!
//! [`FunctionPipeline`] runs every pass on one function's statements, in order:
//!
//! 1. Basic block partitioning
//! 2. CFG construction
//! 3. Dominator sets, dominator tree and dominance frontiers
//! 4. Optional live variable and reaching definitions analyses
//! 5. Reducibility check and structured control recovery
//!
//! [`compile_functions`] drives one pipeline per function of a module. Functions are
//! independent, so with [`AnalysisConfig::parallel`] set they run on the rayon pool.

use rayon::prelude::*;
use tracing::{debug, warn};

use crate::{
    analysis::{
        dataflow::{CfgFacts, DataFlowSolver, Definition, LiveVariables, ReachingDefinitions},
        CfgNode, ControlFlowGraph, DomFrontiers, DomTree, Dominators,
    },
    ir::{BasicBlock, Statement, Variable},
    relooper::{Relooper, StructuredTree},
    AnalysisConfig, Result,
};

/// A named function body in statement form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Function {
    /// Function name, used in log output
    pub name: String,
    /// Flat statement list
    pub body: Vec<Statement>,
}

impl Function {
    /// Creates a function from its name and statements.
    pub fn new(name: impl Into<String>, body: Vec<Statement>) -> Self {
        Function {
            name: name.into(),
            body,
        }
    }
}

/// Everything the pipeline derived for one function.
#[derive(Debug, Clone)]
pub struct CompiledFunction {
    /// Function name
    pub name: String,
    /// Control flow graph, owning the basic blocks
    pub cfg: ControlFlowGraph,
    /// Dominator sets under `out`
    pub dominators: CfgFacts<CfgNode>,
    /// Immediate-dominator tree
    pub dom_tree: DomTree,
    /// Dominance frontiers under `df`
    pub frontiers: CfgFacts<CfgNode>,
    /// Live variables, when [`AnalysisConfig::compute_liveness`] is set
    pub liveness: Option<CfgFacts<Variable>>,
    /// Reaching definitions, when [`AnalysisConfig::compute_reaching`] is set
    pub reaching: Option<CfgFacts<Definition>>,
    /// Structured control blocks
    pub structured: StructuredTree,
}

/// Runs the analysis passes for single functions.
///
/// # Examples
///
/// ```rust
/// use cfgflow::{pipeline::FunctionPipeline, ir::{Statement, Value}, AnalysisConfig};
///
/// let body = vec![Statement::define("a", 1), Statement::ret(Some(Value::var("a")))];
/// let compiled = FunctionPipeline::new(AnalysisConfig::default()).run("main", &body)?;
///
/// assert_eq!(compiled.cfg.block_count(), 1);
/// assert!(compiled.liveness.is_some());
/// # Ok::<(), cfgflow::Error>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct FunctionPipeline {
    config: AnalysisConfig,
}

impl FunctionPipeline {
    /// Creates a pipeline with the given configuration.
    #[must_use]
    pub fn new(config: AnalysisConfig) -> Self {
        FunctionPipeline { config }
    }

    /// Returns the pipeline's configuration.
    #[must_use]
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Runs all passes over one function.
    ///
    /// # Errors
    ///
    /// Returns the first error any pass reports; see [`crate::Error`].
    pub fn run(&self, name: &str, body: &[Statement]) -> Result<CompiledFunction> {
        let blocks = BasicBlock::from_statement_list(body);
        let cfg = ControlFlowGraph::new(blocks)?;

        let dominators = Dominators::compute_with_config(&cfg, &self.config)?;
        let dom_tree = DomTree::new(&cfg, &dominators)?;
        let frontiers = DomFrontiers::new(&cfg, &dom_tree).run();

        let liveness = if self.config.compute_liveness {
            Some(DataFlowSolver::with_config(LiveVariables, &self.config).solve(&cfg)?)
        } else {
            None
        };
        let reaching = if self.config.compute_reaching {
            let analysis = ReachingDefinitions::new(&cfg);
            Some(DataFlowSolver::with_config(analysis, &self.config).solve(&cfg)?)
        } else {
            None
        };

        let structured = Relooper::new(&cfg, &dom_tree).run()?;

        debug!(
            function = name,
            blocks = cfg.block_count(),
            control_blocks = structured.len(),
            "function compiled"
        );

        Ok(CompiledFunction {
            name: name.to_string(),
            cfg,
            dominators,
            dom_tree,
            frontiers,
            liveness,
            reaching,
            structured,
        })
    }
}

/// Compiles every function of a module, returning one result per function in input
/// order.
///
/// A failing function does not stop the others; its error is logged at `warn` and
/// returned in its slot.
///
/// # Examples
///
/// ```rust
/// use cfgflow::{compile_functions, pipeline::Function, ir::Statement, AnalysisConfig};
///
/// let functions = vec![
///     Function::new("ok", vec![Statement::ret(None)]),
///     Function::new("broken", vec![Statement::jump("nowhere")]),
/// ];
/// let results = compile_functions(&functions, &AnalysisConfig::default());
///
/// assert!(results[0].is_ok());
/// assert!(results[1].is_err());
/// ```
pub fn compile_functions(
    functions: &[Function],
    config: &AnalysisConfig,
) -> Vec<Result<CompiledFunction>> {
    let pipeline = FunctionPipeline::new(*config);
    let compile = |function: &Function| {
        let result = pipeline.run(&function.name, &function.body);
        if let Err(error) = &result {
            warn!(function = %function.name, %error, "function rejected");
        }
        result
    };

    if config.parallel {
        functions.par_iter().map(compile).collect()
    } else {
        functions.iter().map(compile).collect()
    }
}
