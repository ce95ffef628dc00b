//! Analysis configuration for the per-function pipeline
//!
//! This module provides the knobs that bound the iterative data flow solver and
//! select which optional analyses the pipeline runs for every function.

/// Configuration for running the analysis pipeline over functions
///
/// The mandatory passes (block partitioning, CFG construction, dominance, the
/// reducibility check and structured translation) always run. The flags here only
/// control the optional data flow analyses and how a batch of functions is scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct AnalysisConfig {
    /// Upper bound on the number of solver sweeps before a data flow analysis fails
    /// with [`Error::IterationLimit`](crate::Error::IterationLimit) (default: 1000)
    pub max_sweeps: usize,

    /// Run live variable analysis for every function
    pub compute_liveness: bool,

    /// Run reaching definitions analysis for every function
    pub compute_reaching: bool,

    /// Compile independent functions on the rayon thread pool
    pub parallel: bool,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            max_sweeps: 1000,
            compute_liveness: true,
            compute_reaching: false,
            parallel: true,
        }
    }
}

impl AnalysisConfig {
    /// Creates a configuration that runs every optional analysis
    ///
    /// Functions are compiled one after another so log output stays in input order.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            max_sweeps: 1000,
            compute_liveness: true,
            compute_reaching: true,
            parallel: false,
        }
    }

    /// Creates a configuration that only runs the mandatory passes
    ///
    /// Use this when only the structured control tree is needed.
    #[must_use]
    pub fn fast() -> Self {
        Self {
            max_sweeps: 1000,
            compute_liveness: false,
            compute_reaching: false,
            parallel: true,
        }
    }
}
