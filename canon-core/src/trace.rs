//! Transform metadata and solution recovery.

use crate::problem::VarId;

/// One bookkeeping entry recorded by a transform stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceRecord {
    /// The cost vector was negated to normalize a maximize objective.
    SenseNegated,

    /// Slack variable `var` was introduced for original constraint
    /// `constraint`.
    SlackVariable {
        /// Index of the original constraint.
        constraint: usize,
        /// The slack variable appended for it.
        var: VarId,
    },

    /// Output row `row` carries original constraint `constraint`.
    RowOrigin {
        /// Row index in the transformed constraint system.
        row: usize,
        /// Index of the original constraint.
        constraint: usize,
    },

    /// A nonnegative domain hint on `var` was lowered into explicit
    /// constraint `constraint`.
    DomainLowered {
        /// The variable whose hint was lowered.
        var: VarId,
        /// Index of the constraint that now carries the bound.
        constraint: usize,
    },
}

/// Append-only metadata threaded through the pipeline.
///
/// Records are never discarded, so the full chain of stages stays
/// reversible for solution mapping.
#[derive(Debug, Clone, Default)]
pub struct TransformTrace {
    records: Vec<TraceRecord>,
}

impl TransformTrace {
    /// Empty trace.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record.
    pub fn push(&mut self, record: TraceRecord) {
        self.records.push(record);
    }

    /// All records, in the order stages appended them.
    pub fn records(&self) -> &[TraceRecord] {
        &self.records
    }

    /// True if no stage has recorded anything.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// True iff the cost vector is negated relative to the original
    /// objective (an odd number of sense normalizations).
    pub fn sense_negated(&self) -> bool {
        self.records
            .iter()
            .filter(|r| matches!(r, TraceRecord::SenseNegated))
            .count()
            % 2
            == 1
    }

    /// Map a solver-reported objective value back to the original sense.
    pub fn recover_objective_value(&self, value: f64) -> f64 {
        if self.sense_negated() {
            -value
        } else {
            value
        }
    }

    /// Ids of all slack variables introduced across stages.
    pub fn slack_vars(&self) -> Vec<VarId> {
        self.records
            .iter()
            .filter_map(|r| match r {
                TraceRecord::SlackVariable { var, .. } => Some(*var),
                _ => None,
            })
            .collect()
    }

    /// Drop slack entries from a transformed primal solution, returning
    /// the original-variable portion in original order.
    pub fn recover_x(&self, x: &[f64]) -> Vec<f64> {
        let mut is_slack = vec![false; x.len()];
        for var in self.slack_vars() {
            if var.index() < x.len() {
                is_slack[var.index()] = true;
            }
        }
        x.iter()
            .zip(is_slack)
            .filter(|(_, slack)| !slack)
            .map(|(&v, _)| v)
            .collect()
    }

    /// The slack variable introduced for an original constraint, if any.
    ///
    /// Its value in the transformed solution is the constraint's slack
    /// (zero means the inequality is active).
    pub fn slack_for_constraint(&self, constraint: usize) -> Option<VarId> {
        self.records.iter().find_map(|r| match r {
            TraceRecord::SlackVariable { constraint: c, var } if *c == constraint => Some(*var),
            _ => None,
        })
    }

    /// The original constraint carried by a transformed row, if recorded.
    pub fn constraint_for_row(&self, row: usize) -> Option<usize> {
        self.records.iter().find_map(|r| match r {
            TraceRecord::RowOrigin { row: r2, constraint } if *r2 == row => Some(*constraint),
            _ => None,
        })
    }

    /// The transformed row carrying an original constraint, if recorded.
    pub fn row_for_constraint(&self, constraint: usize) -> Option<usize> {
        self.records.iter().find_map(|r| match r {
            TraceRecord::RowOrigin { row, constraint: c } if *c == constraint => Some(*row),
            _ => None,
        })
    }

    /// Reorder a row-indexed dual vector into original constraint order.
    ///
    /// Entry i of the result is the dual of original constraint i, taken
    /// from the transformed row that carries it. Constraints without a
    /// recorded row (none, for the transforms in this crate) get zero.
    pub fn constraint_duals(&self, z: &[f64]) -> Vec<f64> {
        let num_constraints = self
            .records
            .iter()
            .filter_map(|r| match r {
                TraceRecord::RowOrigin { constraint, .. } => Some(*constraint + 1),
                _ => None,
            })
            .max()
            .unwrap_or(0);

        let mut duals = vec![0.0; num_constraints];
        for r in &self.records {
            if let TraceRecord::RowOrigin { row, constraint } = r {
                if *row < z.len() {
                    duals[*constraint] = z[*row];
                }
            }
        }
        duals
    }
}
