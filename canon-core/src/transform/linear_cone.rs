//! Linear-to-conic lowering.
//!
//! Rewrites a problem with `<=` / `>=` / `=` constraints into the
//! canonical conic form `A x + s = b, s ∈ K`, with one fresh nonnegative
//! slack variable per inequality.
//!
//! Row layout convention: equality rows come first (zero-cone block, in
//! their original relative order), then inequality rows (nonnegative-
//! orthant block, in their original relative order). Downstream dual
//! recovery depends on this ordering; the trace records the row/
//! constraint correspondence explicitly.

use sprs::TriMat;

use crate::cones::{ConeSpec, ConicForm};
use crate::error::{TransformError, TransformResult};
use crate::problem::{Constraints, Problem, Relation, Sense, VarId, Variable};
use crate::trace::TraceRecord;
use crate::transform::ProblemTransform;

/// The linear-constraint → product-cone stage.
///
/// Accepts problems with a linear (or affine) objective and non-strict
/// relational constraints. Rejects quadratic objectives and strict
/// inequalities with `UnsupportedProblemShape`: cone membership is
/// closed, so `<` and `>` have no conic counterpart.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearConeTransform;

impl LinearConeTransform {
    /// Create the stage.
    pub fn new() -> Self {
        Self
    }
}

impl ProblemTransform for LinearConeTransform {
    fn name(&self) -> &'static str {
        "linear_cone"
    }

    fn transform(&self, problem: &Problem) -> TransformResult<Problem> {
        problem.validate()?;

        if !problem.objective.is_linear() {
            return Err(TransformError::UnsupportedProblemShape(
                "objective has a quadratic term; this stage lowers linear problems only".into(),
            ));
        }

        let linear = match &problem.constraints {
            Constraints::Linear(list) => list,
            // Already conic: nothing left to lower, only normalize the
            // sense. Applying the stage twice is a no-op.
            Constraints::Conic(_) => {
                let mut out = problem.clone();
                normalize_sense(&mut out);
                return Ok(out);
            }
        };

        // Reject before emitting anything; a failed transform produces no
        // partial output.
        for (idx, c) in linear.iter().enumerate() {
            if c.rel.is_strict() {
                return Err(TransformError::UnsupportedProblemShape(format!(
                    "constraint {} uses a strict relation {:?}; cone membership is closed",
                    idx, c.rel
                )));
            }
        }

        // Stable partition. Equalities keep their relative order and
        // always precede inequalities in the output rows.
        let eq_idx: Vec<usize> = (0..linear.len())
            .filter(|&i| linear[i].rel == Relation::Eq)
            .collect();
        let ineq_idx: Vec<usize> = (0..linear.len())
            .filter(|&i| linear[i].rel != Relation::Eq)
            .collect();

        let n = problem.num_vars();
        let m = linear.len();
        let n_new = n + ineq_idx.len();

        let mut tri = TriMat::new((m, n_new));
        let mut b = Vec::with_capacity(m);
        let mut variables = problem.variables.clone();
        let mut trace = problem.trace.clone();

        let mut row = 0usize;
        for &ci in &eq_idx {
            let c = &linear[ci];
            for &(var, coeff) in &c.lhs.terms {
                tri.add_triplet(row, var.index(), coeff);
            }
            // The lhs constant folds into the right-hand side. Constant
            // rows (empty lhs) are kept as 0 = b feasibility checks.
            b.push(c.rhs - c.lhs.constant);
            trace.push(TraceRecord::RowOrigin {
                row,
                constraint: ci,
            });
            row += 1;
        }

        for &ci in &ineq_idx {
            let c = &linear[ci];
            for &(var, coeff) in &c.lhs.terms {
                tri.add_triplet(row, var.index(), coeff);
            }

            // lhs <= rhs becomes lhs + s = rhs; lhs >= rhs becomes
            // lhs - s = rhs; s >= 0 either way.
            let slack_sign = if c.rel == Relation::Ge { -1.0 } else { 1.0 };
            let slack = VarId(variables.len());
            tri.add_triplet(row, slack.index(), slack_sign);
            variables.push(Variable::nonneg(format!("_slack{}", ci)));

            b.push(c.rhs - c.lhs.constant);
            trace.push(TraceRecord::SlackVariable {
                constraint: ci,
                var: slack,
            });
            trace.push(TraceRecord::RowOrigin {
                row,
                constraint: ci,
            });
            row += 1;
        }

        // Zero-cone block first, then the nonnegative orthant. Empty
        // blocks are omitted; zero constraints yield an empty descriptor.
        let mut cones = Vec::new();
        if !eq_idx.is_empty() {
            cones.push(ConeSpec::Zero { dim: eq_idx.len() });
        }
        if !ineq_idx.is_empty() {
            cones.push(ConeSpec::NonNeg {
                dim: ineq_idx.len(),
            });
        }

        let form = ConicForm {
            a: tri.to_csc(),
            b,
            cones,
        };

        let mut out = Problem {
            objective: problem.objective.clone(),
            variables,
            constraints: Constraints::Conic(form),
            trace,
        };
        normalize_sense(&mut out);
        out.validate()?;
        Ok(out)
    }
}

/// Normalize the objective sense to minimize, negating the cost and
/// recording the negation so the reported optimum can be un-negated.
fn normalize_sense(problem: &mut Problem) {
    if problem.objective.sense == Sense::Maximize {
        problem.objective = problem.objective.negated();
        problem.objective.sense = Sense::Minimize;
        problem.trace.push(TraceRecord::SenseNegated);
    }
}
