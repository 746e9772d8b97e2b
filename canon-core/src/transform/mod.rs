//! Transform stages and pipeline composition.
//!
//! Every rewrite implements [`ProblemTransform`]: a single pure operation
//! from one problem value to an equivalent fresh one. A [`Pipeline`] is
//! an ordered sequence of stages applied left-to-right.

pub mod linear_cone;
pub mod var_bounds;

pub use linear_cone::LinearConeTransform;
pub use var_bounds::VariableBoundTransform;

use crate::error::{PipelineError, TransformResult};
use crate::problem::Problem;

/// A problem-rewriting pipeline stage.
///
/// Implementations must be pure functions of their input: no side
/// effects, and identical inputs produce structurally identical outputs,
/// so a pipeline can be re-run for solution verification or debugging.
/// The input is read-only; a stage never returns partial output on
/// failure.
pub trait ProblemTransform {
    /// Stage name, used for failure attribution in pipeline errors.
    fn name(&self) -> &'static str;

    /// Rewrite `problem` into an equivalent problem in this stage's
    /// target shape.
    fn transform(&self, problem: &Problem) -> TransformResult<Problem>;
}

/// Ordered sequence of transform stages.
///
/// Stages run strictly sequentially; the output of stage N is the input
/// of stage N+1. The first failing stage aborts the chain and is named in
/// the returned [`PipelineError`].
#[derive(Default)]
pub struct Pipeline {
    stages: Vec<Box<dyn ProblemTransform>>,
}

impl Pipeline {
    /// Empty pipeline (applies as the identity).
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a stage, builder-style.
    pub fn with_stage(mut self, stage: Box<dyn ProblemTransform>) -> Self {
        self.stages.push(stage);
        self
    }

    /// Append a stage.
    pub fn push(&mut self, stage: Box<dyn ProblemTransform>) {
        self.stages.push(stage);
    }

    /// Number of stages.
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// True if the pipeline has no stages.
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Thread `problem` through every stage in order.
    pub fn apply(&self, problem: Problem) -> Result<Problem, PipelineError> {
        let mut current = problem;
        for stage in &self.stages {
            current = stage.transform(&current).map_err(|source| PipelineError {
                stage: stage.name().to_string(),
                source,
            })?;
        }
        Ok(current)
    }
}
