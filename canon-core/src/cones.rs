//! Cone descriptor and canonical conic form.
//!
//! A product cone is described by an ordered list of `(kind, dimension)`
//! blocks. Order is significant: block k covers the next `dim` rows of
//! the constraint system after block k-1, and consuming solvers read row
//! blocks of `A`/`b` positionally in exactly this order.

use crate::error::{TransformError, TransformResult};

/// Sparse matrix in CSC format.
pub type SparseCsc = sprs::CsMatI<f64, usize>;

/// Elementary cone block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConeSpec {
    /// Zero cone: {0}^dim (equality constraints).
    Zero {
        /// Block dimension.
        dim: usize,
    },

    /// Nonnegative orthant: ℝ₊^dim (inequality constraints via slacks).
    NonNeg {
        /// Block dimension.
        dim: usize,
    },

    /// Free cone: ℝ^dim (unconstrained block, if retained).
    Free {
        /// Block dimension.
        dim: usize,
    },

    /// Second-order (Lorentz) cone: {(t, x) : t ≥ ||x||₂}.
    /// Dimension must be at least 2. Not emitted by the linear stage but
    /// part of the descriptor vocabulary downstream stages share.
    Soc {
        /// Block dimension.
        dim: usize,
    },
}

impl ConeSpec {
    /// Dimension of this block in the m-dimensional row space.
    pub fn dim(&self) -> usize {
        match self {
            ConeSpec::Zero { dim }
            | ConeSpec::NonNeg { dim }
            | ConeSpec::Free { dim }
            | ConeSpec::Soc { dim } => *dim,
        }
    }

    /// Validate this block specification.
    pub fn validate(&self) -> TransformResult<()> {
        match self {
            ConeSpec::Zero { dim } | ConeSpec::NonNeg { dim } | ConeSpec::Free { dim } => {
                if *dim == 0 {
                    return Err(TransformError::MalformedProblem(format!(
                        "{:?} cone block must have positive dimension",
                        self
                    )));
                }
            }
            ConeSpec::Soc { dim } => {
                if *dim < 2 {
                    return Err(TransformError::MalformedProblem(format!(
                        "SOC cone block must have dimension >= 2, got {}",
                        dim
                    )));
                }
            }
        }
        Ok(())
    }
}

/// Canonical conic constraint system `A x + s = b, s ∈ K`.
#[derive(Debug, Clone)]
pub struct ConicForm {
    /// Constraint matrix A (m × n, CSC format).
    pub a: SparseCsc,

    /// Right-hand side b (length m).
    pub b: Vec<f64>,

    /// Cone blocks partitioning the m rows, in row order.
    pub cones: Vec<ConeSpec>,
}

impl ConicForm {
    /// Number of rows (m).
    pub fn num_rows(&self) -> usize {
        self.b.len()
    }

    /// Total dimension of the cone descriptor.
    pub fn cone_dim(&self) -> usize {
        self.cones.iter().map(|c| c.dim()).sum()
    }

    /// Validate dimensions against a variable count.
    ///
    /// The row-block wire contract is enforced here: cone dimensions must
    /// sum to exactly the number of rows.
    pub fn validate(&self, num_vars: usize) -> TransformResult<()> {
        let m = self.num_rows();

        if self.a.rows() != m {
            return Err(TransformError::MalformedProblem(format!(
                "A has {} rows, expected {}",
                self.a.rows(),
                m
            )));
        }
        if self.a.cols() != num_vars {
            return Err(TransformError::MalformedProblem(format!(
                "A has {} cols, expected {}",
                self.a.cols(),
                num_vars
            )));
        }

        let cone_total = self.cone_dim();
        if cone_total != m {
            return Err(TransformError::MalformedProblem(format!(
                "cone dimensions sum to {}, expected {}",
                cone_total, m
            )));
        }

        for cone in &self.cones {
            cone.validate()?;
        }

        Ok(())
    }
}
