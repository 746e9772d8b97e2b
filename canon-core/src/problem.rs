//! Problem data structures and validation.
//!
//! This module defines the optimization problem representation shared by
//! all transform stages: named variables with domain hints, affine
//! expressions, relational constraints, and the objective. A problem
//! starts with [`Constraints::Linear`] and is lowered by the pipeline to
//! [`Constraints::Conic`].

use std::fmt;

use crate::cones::ConicForm;
use crate::error::{TransformError, TransformResult};
use crate::trace::TransformTrace;

/// Sparse symmetric matrix in CSC format (upper triangle only).
///
/// Used for the optional quadratic objective term. Stages that only
/// handle linear problems reject inputs carrying one.
pub type SparseSymmetricCsc = sprs::CsMatI<f64, usize>;

/// Identifier of a variable: its position in the problem's variable list.
///
/// Slack variables introduced by a transform are appended, so ids of
/// original variables survive every lowering unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct VarId(pub usize);

impl VarId {
    /// The position of this variable in the variable list.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for VarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x{}", self.0)
    }
}

/// Domain hint attached to a variable, consumed before conic lowering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VarDomain {
    /// Unconstrained variable.
    #[default]
    Free,

    /// Variable restricted to `x >= 0`.
    NonNegative,
}

/// A decision variable: a name plus an optional domain hint.
#[derive(Debug, Clone)]
pub struct Variable {
    /// Human-readable name, carried for reporting only; identity is the
    /// variable's [`VarId`].
    pub name: String,

    /// Domain hint.
    pub domain: VarDomain,
}

impl Variable {
    /// A free (unconstrained) variable.
    pub fn free(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            domain: VarDomain::Free,
        }
    }

    /// A variable hinted nonnegative.
    pub fn nonneg(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            domain: VarDomain::NonNegative,
        }
    }
}

/// Affine expression: a list of `(variable, coefficient)` terms plus a
/// constant.
///
/// Term order is insertion order and is preserved by every transform, so
/// identical inputs produce structurally identical outputs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LinExpr {
    /// Linear terms in insertion order.
    pub terms: Vec<(VarId, f64)>,

    /// Constant offset.
    pub constant: f64,
}

impl LinExpr {
    /// Empty expression (zero).
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a term `coeff * var`.
    pub fn term(mut self, var: VarId, coeff: f64) -> Self {
        self.terms.push((var, coeff));
        self
    }

    /// Set the constant offset.
    pub fn with_constant(mut self, constant: f64) -> Self {
        self.constant = constant;
        self
    }

    /// True if the expression has no variable terms (constant only).
    pub fn is_constant(&self) -> bool {
        self.terms.is_empty()
    }
}

/// Relation between a constraint's left-hand expression and its
/// right-hand constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    /// `lhs <= rhs`
    Le,
    /// `lhs >= rhs`
    Ge,
    /// `lhs = rhs`
    Eq,
    /// `lhs < rhs` (strict; not lowerable to a closed cone)
    Lt,
    /// `lhs > rhs` (strict; not lowerable to a closed cone)
    Gt,
}

impl Relation {
    /// True for the strict relations `<` and `>`.
    pub fn is_strict(self) -> bool {
        matches!(self, Relation::Lt | Relation::Gt)
    }
}

/// A single relational constraint `lhs <rel> rhs`.
#[derive(Debug, Clone)]
pub struct LinearConstraint {
    /// Left-hand affine expression.
    pub lhs: LinExpr,

    /// Relation.
    pub rel: Relation,

    /// Right-hand constant.
    pub rhs: f64,
}

impl LinearConstraint {
    /// Construct a constraint.
    pub fn new(lhs: LinExpr, rel: Relation, rhs: f64) -> Self {
        Self { lhs, rel, rhs }
    }
}

/// Optimization sense. Transforms normalize to `Minimize` internally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sense {
    /// Minimize the objective.
    Minimize,
    /// Maximize the objective (lowered by negating the cost).
    Maximize,
}

/// Objective: sense, linear cost terms, constant offset, and an optional
/// quadratic term.
///
/// The quadratic term mirrors the canonical-form `P` matrix: `None` means
/// a purely linear cost. A linear-only stage treats `Some` as an
/// unsupported (nonlinear) construct.
#[derive(Debug, Clone)]
pub struct Objective {
    /// Optimization sense.
    pub sense: Sense,

    /// Linear cost terms in insertion order.
    pub terms: Vec<(VarId, f64)>,

    /// Constant offset added to the objective value.
    pub offset: f64,

    /// Optional quadratic cost matrix (n × n, upper triangle in CSC).
    pub quadratic: Option<SparseSymmetricCsc>,
}

impl Objective {
    /// A minimization objective over the given linear terms.
    pub fn minimize(terms: Vec<(VarId, f64)>) -> Self {
        Self {
            sense: Sense::Minimize,
            terms,
            offset: 0.0,
            quadratic: None,
        }
    }

    /// A maximization objective over the given linear terms.
    pub fn maximize(terms: Vec<(VarId, f64)>) -> Self {
        Self {
            sense: Sense::Maximize,
            terms,
            offset: 0.0,
            quadratic: None,
        }
    }

    /// Set the constant offset.
    pub fn with_offset(mut self, offset: f64) -> Self {
        self.offset = offset;
        self
    }

    /// Attach a quadratic cost term.
    pub fn with_quadratic(mut self, p: SparseSymmetricCsc) -> Self {
        self.quadratic = Some(p);
        self
    }

    /// True if the objective has no quadratic term.
    pub fn is_linear(&self) -> bool {
        self.quadratic.is_none()
    }

    /// The objective with every coefficient, the offset, and the
    /// quadratic term negated. The sense is left unchanged; callers flip
    /// it alongside.
    pub fn negated(&self) -> Self {
        Self {
            sense: self.sense,
            terms: self.terms.iter().map(|&(v, c)| (v, -c)).collect(),
            offset: -self.offset,
            quadratic: self.quadratic.as_ref().map(|p| p.map(|v| -v)),
        }
    }
}

/// Constraint representation of a problem.
///
/// Problems enter the pipeline `Linear` and leave it `Conic`.
#[derive(Debug, Clone)]
pub enum Constraints {
    /// Relational constraints, prior to conic lowering.
    Linear(Vec<LinearConstraint>),

    /// Canonical conic form `A x + s = b, s ∈ K`.
    Conic(ConicForm),
}

/// An optimization problem.
///
/// Problem values are immutable across transform boundaries: a stage
/// reads its input and returns a fresh, independently owned output. The
/// [`TransformTrace`] accumulates monotonically across stages so solver
/// output can be mapped back to the original variable/constraint space.
#[derive(Debug, Clone)]
pub struct Problem {
    /// Objective to optimize.
    pub objective: Objective,

    /// Ordered variable list; [`VarId`]s index into it.
    pub variables: Vec<Variable>,

    /// Constraint system.
    pub constraints: Constraints,

    /// Accumulated solution-mapping metadata.
    pub trace: TransformTrace,
}

impl Problem {
    /// Create a problem over linear constraints with an empty trace.
    pub fn new(
        objective: Objective,
        variables: Vec<Variable>,
        constraints: Vec<LinearConstraint>,
    ) -> Self {
        Self {
            objective,
            variables,
            constraints: Constraints::Linear(constraints),
            trace: TransformTrace::new(),
        }
    }

    /// Number of variables (n).
    pub fn num_vars(&self) -> usize {
        self.variables.len()
    }

    /// Number of constraints: relational records before lowering, rows of
    /// the conic system after.
    pub fn num_constraints(&self) -> usize {
        match &self.constraints {
            Constraints::Linear(list) => list.len(),
            Constraints::Conic(form) => form.num_rows(),
        }
    }

    /// Dense cost vector over the current variable order.
    ///
    /// Variables without a cost term (slacks in particular) get zero.
    pub fn cost_vector(&self) -> Vec<f64> {
        let mut q = vec![0.0; self.num_vars()];
        for &(var, coeff) in &self.objective.terms {
            q[var.index()] += coeff;
        }
        q
    }

    /// Validate the data model invariants.
    ///
    /// Checks that every referenced [`VarId`] is in range and that conic
    /// dimensions are consistent. Violations are `MalformedProblem`.
    pub fn validate(&self) -> TransformResult<()> {
        let n = self.num_vars();

        for &(var, _) in &self.objective.terms {
            if var.index() >= n {
                return Err(TransformError::MalformedProblem(format!(
                    "objective references variable {} but only {} variables exist",
                    var, n
                )));
            }
        }

        if let Some(ref p) = self.objective.quadratic {
            if p.rows() != n || p.cols() != n {
                return Err(TransformError::MalformedProblem(format!(
                    "quadratic term has shape {}×{}, expected {}×{}",
                    p.rows(),
                    p.cols(),
                    n,
                    n
                )));
            }
        }

        match &self.constraints {
            Constraints::Linear(list) => {
                for (idx, c) in list.iter().enumerate() {
                    for &(var, _) in &c.lhs.terms {
                        if var.index() >= n {
                            return Err(TransformError::MalformedProblem(format!(
                                "constraint {} references variable {} but only {} variables exist",
                                idx, var, n
                            )));
                        }
                    }
                }
            }
            Constraints::Conic(form) => form.validate(n)?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_var_problem(constraints: Vec<LinearConstraint>) -> Problem {
        Problem::new(
            Objective::minimize(vec![(VarId(0), 1.0), (VarId(1), 2.0)]),
            vec![Variable::free("x"), Variable::free("y")],
            constraints,
        )
    }

    #[test]
    fn test_cost_vector() {
        let prob = two_var_problem(vec![]);
        assert_eq!(prob.cost_vector(), vec![1.0, 2.0]);
    }

    #[test]
    fn test_cost_vector_accumulates_repeated_terms() {
        let prob = Problem::new(
            Objective::minimize(vec![(VarId(0), 1.0), (VarId(0), 2.5)]),
            vec![Variable::free("x")],
            vec![],
        );
        assert_eq!(prob.cost_vector(), vec![3.5]);
    }

    #[test]
    fn test_validate_ok() {
        let prob = two_var_problem(vec![LinearConstraint::new(
            LinExpr::new().term(VarId(0), 1.0).term(VarId(1), -1.0),
            Relation::Eq,
            1.0,
        )]);
        assert!(prob.validate().is_ok());
    }

    #[test]
    fn test_validate_dangling_objective_reference() {
        let prob = Problem::new(
            Objective::minimize(vec![(VarId(3), 1.0)]),
            vec![Variable::free("x")],
            vec![],
        );
        assert!(matches!(
            prob.validate(),
            Err(TransformError::MalformedProblem(_))
        ));
    }

    #[test]
    fn test_validate_dangling_constraint_reference() {
        let prob = two_var_problem(vec![LinearConstraint::new(
            LinExpr::new().term(VarId(7), 1.0),
            Relation::Le,
            0.0,
        )]);
        assert!(matches!(
            prob.validate(),
            Err(TransformError::MalformedProblem(_))
        ));
    }

    #[test]
    fn test_negated_objective() {
        let obj = Objective::maximize(vec![(VarId(0), 2.0), (VarId(1), -3.0)]).with_offset(5.0);
        let neg = obj.negated();
        assert_eq!(neg.terms, vec![(VarId(0), -2.0), (VarId(1), 3.0)]);
        assert_eq!(neg.offset, -5.0);
        assert_eq!(neg.sense, Sense::Maximize);
    }

    #[test]
    fn test_relation_strictness() {
        assert!(Relation::Lt.is_strict());
        assert!(Relation::Gt.is_strict());
        assert!(!Relation::Le.is_strict());
        assert!(!Relation::Ge.is_strict());
        assert!(!Relation::Eq.is_strict());
    }
}
