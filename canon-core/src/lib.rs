//! Canon: problem transformation pipeline for convex conic optimization
//!
//! This library lowers user-level optimization problems (linear objective
//! and `<=` / `>=` / `=` constraints over named variables) into the
//! canonical conic form that interior point and first-order cone solvers
//! consume:
//!
//! ```text
//! minimize    q^T x
//! subject to  A x + s = b
//!             s ∈ K
//! ```
//!
//! where K is a Cartesian product of elementary cones. The library does
//! not solve anything; it re-expresses problems. Each rewrite is a
//! [`ProblemTransform`] stage: a pure function from one [`Problem`] value
//! to an equivalent fresh one, composable through a [`Pipeline`].
//!
//! # Example
//!
//! ```
//! use canon_core::{
//!     LinExpr, LinearConeTransform, LinearConstraint, Objective, Problem,
//!     ProblemTransform, Relation, Variable,
//! };
//!
//! // min x + 2y  s.t.  x + y <= 4,  x - y = 1
//! let x = canon_core::VarId(0);
//! let y = canon_core::VarId(1);
//! let prob = Problem::new(
//!     Objective::minimize(vec![(x, 1.0), (y, 2.0)]),
//!     vec![Variable::free("x"), Variable::free("y")],
//!     vec![
//!         LinearConstraint::new(LinExpr::new().term(x, 1.0).term(y, 1.0), Relation::Le, 4.0),
//!         LinearConstraint::new(LinExpr::new().term(x, 1.0).term(y, -1.0), Relation::Eq, 1.0),
//!     ],
//! );
//!
//! let conic = LinearConeTransform::new().transform(&prob)?;
//! assert_eq!(conic.num_vars(), 3); // x, y, and one slack
//! # Ok::<(), canon_core::TransformError>(())
//! ```
//!
//! # Row-block contract
//!
//! The cone descriptor of a transformed problem lists `(kind, dimension)`
//! blocks in exactly the row order of the constraint matrix: the zero-cone
//! block (equalities) always precedes the nonnegative-orthant block
//! (inequalities). Consumers must read row blocks of `A`/`b` positionally
//! in that order, or dual variables will be misattributed.

#![warn(clippy::all)]

pub mod cones;
pub mod error;
pub mod problem;
pub mod trace;
pub mod transform;

pub use cones::{ConeSpec, ConicForm, SparseCsc};
pub use error::{PipelineError, TransformError, TransformResult};
pub use problem::{
    Constraints, LinExpr, LinearConstraint, Objective, Problem, Relation, Sense, VarDomain,
    VarId, Variable,
};
pub use trace::{TraceRecord, TransformTrace};
pub use transform::{LinearConeTransform, Pipeline, ProblemTransform, VariableBoundTransform};
