//! Domain hint lowering.
//!
//! Turns `NonNegative` variable domain hints into explicit `x >= 0`
//! constraints so the conic stage can treat them uniformly with ordinary
//! inequalities. Runs ahead of [`LinearConeTransform`] in a typical
//! pipeline.
//!
//! [`LinearConeTransform`]: crate::transform::LinearConeTransform

use crate::error::{TransformError, TransformResult};
use crate::problem::{
    Constraints, LinExpr, LinearConstraint, Problem, Relation, VarDomain, VarId,
};
use crate::trace::TraceRecord;
use crate::transform::ProblemTransform;

/// Stage lowering nonnegative domain hints into explicit bound rows.
///
/// Lowered variables are reset to `Free`; the bound lives in the new
/// constraint and is recorded in the trace. Appended bound constraints
/// follow all user constraints, in variable order.
#[derive(Debug, Clone, Copy, Default)]
pub struct VariableBoundTransform;

impl VariableBoundTransform {
    /// Create the stage.
    pub fn new() -> Self {
        Self
    }
}

impl ProblemTransform for VariableBoundTransform {
    fn name(&self) -> &'static str {
        "variable_bounds"
    }

    fn transform(&self, problem: &Problem) -> TransformResult<Problem> {
        problem.validate()?;

        let linear = match &problem.constraints {
            Constraints::Linear(list) => list,
            Constraints::Conic(_) => {
                return Err(TransformError::UnsupportedProblemShape(
                    "variable bound lowering expects relational constraints, got conic form"
                        .into(),
                ));
            }
        };

        let mut constraints = linear.clone();
        let mut variables = problem.variables.clone();
        let mut trace = problem.trace.clone();

        for (idx, var) in variables.iter_mut().enumerate() {
            if var.domain == VarDomain::NonNegative {
                let constraint = constraints.len();
                constraints.push(LinearConstraint::new(
                    LinExpr::new().term(VarId(idx), 1.0),
                    Relation::Ge,
                    0.0,
                ));
                var.domain = VarDomain::Free;
                trace.push(TraceRecord::DomainLowered {
                    var: VarId(idx),
                    constraint,
                });
            }
        }

        Ok(Problem {
            objective: problem.objective.clone(),
            variables,
            constraints: Constraints::Linear(constraints),
            trace,
        })
    }
}
