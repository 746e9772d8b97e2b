//! Pipeline composition tests.

use canon_core::{
    ConeSpec, Constraints, LinExpr, LinearConeTransform, LinearConstraint, Objective, Pipeline,
    Problem, Relation, Sense, TraceRecord, VarId, Variable, VariableBoundTransform,
};

const X: VarId = VarId(0);
const Y: VarId = VarId(1);

fn canonical_pipeline() -> Pipeline {
    Pipeline::new()
        .with_stage(Box::new(VariableBoundTransform::new()))
        .with_stage(Box::new(LinearConeTransform::new()))
}

#[test]
fn test_empty_pipeline_is_identity() {
    let prob = Problem::new(
        Objective::minimize(vec![(X, 1.0)]),
        vec![Variable::free("x")],
        vec![],
    );
    let out = Pipeline::new().apply(prob).unwrap();
    assert_eq!(out.num_vars(), 1);
    assert!(matches!(out.constraints, Constraints::Linear(_)));
}

#[test]
fn test_bounds_then_cone_lowering() {
    // max x + y  s.t.  x + y <= 4,  x >= 0 (domain hint)
    let prob = Problem::new(
        Objective::maximize(vec![(X, 1.0), (Y, 1.0)]),
        vec![Variable::nonneg("x"), Variable::free("y")],
        vec![LinearConstraint::new(
            LinExpr::new().term(X, 1.0).term(Y, 1.0),
            Relation::Le,
            4.0,
        )],
    );

    let out = canonical_pipeline().apply(prob).unwrap();

    // The hint became an explicit x >= 0 row, so there are two
    // inequalities, two slacks, and no equalities.
    let Constraints::Conic(form) = &out.constraints else {
        panic!("expected conic constraints");
    };
    assert_eq!(form.cones, vec![ConeSpec::NonNeg { dim: 2 }]);
    assert_eq!(out.num_vars(), 4);
    assert_eq!(form.b, vec![4.0, 0.0]);

    // Sense normalized once, across the whole chain.
    assert_eq!(out.objective.sense, Sense::Minimize);
    assert_eq!(out.cost_vector(), vec![-1.0, -1.0, 0.0, 0.0]);
    assert!(out.trace.sense_negated());

    // Trace accumulated across both stages: the hint lowering first,
    // then the slack bookkeeping.
    assert!(out
        .trace
        .records()
        .iter()
        .any(|r| matches!(r, TraceRecord::DomainLowered { var: VarId(0), .. })));
    assert_eq!(out.trace.slack_vars().len(), 2);

    // Primal recovery drops both slacks.
    assert_eq!(out.trace.recover_x(&[1.0, 3.0, 0.0, 1.0]), vec![1.0, 3.0]);
}

#[test]
fn test_failure_names_the_originating_stage() {
    let prob = Problem::new(
        Objective::minimize(vec![(X, 1.0)]),
        vec![Variable::free("x")],
        vec![LinearConstraint::new(
            LinExpr::new().term(X, 1.0),
            Relation::Lt,
            1.0,
        )],
    );

    let err = canonical_pipeline().apply(prob).unwrap_err();
    assert_eq!(err.stage, "linear_cone");
    let msg = err.to_string();
    assert!(msg.contains("linear_cone"), "unexpected message: {msg}");
    assert!(
        msg.contains("unsupported problem shape"),
        "unexpected message: {msg}"
    );
}

#[test]
fn test_misordered_pipeline_fails_on_second_bounds_pass() {
    // Bounds lowering after the cone stage has conic input and must
    // refuse it, attributed to the right stage.
    let prob = Problem::new(
        Objective::minimize(vec![(X, 1.0)]),
        vec![Variable::nonneg("x")],
        vec![],
    );
    let misordered = Pipeline::new()
        .with_stage(Box::new(LinearConeTransform::new()))
        .with_stage(Box::new(VariableBoundTransform::new()));

    let err = misordered.apply(prob).unwrap_err();
    assert_eq!(err.stage, "variable_bounds");
}
