//! Blocks of relations evaluated against whole assignments.

use proptest::prelude::*;
use sf_core::Tolerances;
use sf_expr::{Bounds, ConstraintBlock, Expr, ExprError, Objective, VariableStore};

/// Two inlets mixing into one outlet with a component balance on species A.
fn mixer() -> (VariableStore, ConstraintBlock) {
    let mut vars = VariableStore::new();
    let flow = Bounds::new(0.0, 100.0);
    let n1 = vars.add("n[1]", flow, 4.0).unwrap();
    let n2 = vars.add("n[2]", flow, 6.0).unwrap();
    let n3 = vars.add("n[3]", flow, 10.0).unwrap();
    let y1 = vars.add("y[1,A]", Bounds::unit_interval(), 1.0).unwrap();
    let y2 = vars.add("y[2,A]", Bounds::unit_interval(), 0.5).unwrap();
    let y3 = vars.add("y[3,A]", Bounds::unit_interval(), 0.7).unwrap();

    let mut block = ConstraintBlock::new("M1");
    block.add_eq("mix_mb", Expr::var(n1) + n2, Expr::var(n3));
    block.add_eq(
        "mix_cb[A]",
        Expr::var(n1) * y1 + Expr::var(n2) * y2,
        Expr::var(n3) * y3,
    );
    block.add_le("mix_cap", Expr::var(n3), 50.0);
    (vars, block)
}

#[test]
fn consistent_point_satisfies_every_relation() {
    let (vars, block) = mixer();
    let values = vars.values();
    assert_eq!(block.violated(&values, Tolerances::feasibility()).count(), 0);
}

#[test]
fn perturbed_point_reports_only_broken_relations() {
    let (mut vars, block) = mixer();
    let (y3, _) = vars.iter().find(|(_, v)| v.name == "y[3,A]").unwrap();
    vars.set_value(y3, 0.8).unwrap();
    let values = vars.values();
    let broken: Vec<&str> = block
        .violated(&values, Tolerances::feasibility())
        .map(|c| c.name.as_str())
        .collect();
    assert_eq!(broken, ["mix_cb[A]"]);
    let c = block.get("mix_cb[A]").unwrap();
    assert!((c.violation(&values) - 1.0).abs() < 1e-12);
}

#[test]
fn absorbed_blocks_keep_order_and_duplicates() {
    let (_, block) = mixer();
    let mut all = ConstraintBlock::new("flowsheet");
    all.absorb(block.clone());
    all.absorb(block);
    assert_eq!(all.len(), 6);
    let names: Vec<_> = all.iter().map(|c| c.name.clone()).collect();
    assert_eq!(names[0], "mix_mb");
    assert_eq!(names[3], "mix_mb");
}

#[test]
fn loading_a_short_vector_fails() {
    let (mut vars, _) = mixer();
    assert_eq!(
        vars.load_values(&[1.0, 2.0]),
        Err(ExprError::ValueLength {
            expected: 6,
            got: 2
        })
    );
}

#[test]
fn objective_sense_does_not_change_value() {
    let (vars, _) = mixer();
    let values = vars.values();
    let (n3, _) = vars.iter().nth(2).unwrap();
    assert_eq!(Objective::minimize(n3).value(&values), 10.0);
    assert_eq!(Objective::maximize(2.0 * Expr::var(n3)).value(&values), 20.0);
}

proptest! {
    #[test]
    fn linear_combination_evaluates_termwise(
        a in -100.0f64..100.0,
        b in -100.0f64..100.0,
        x in -10.0f64..10.0,
        y in -10.0f64..10.0,
    ) {
        let mut vars = VariableStore::new();
        let bounds = Bounds::symmetric(10.0);
        let vx = vars.add("x", bounds, x).unwrap();
        let vy = vars.add("y", bounds, y).unwrap();
        let e = a * Expr::var(vx) - b * Expr::var(vy) + 3.0;
        prop_assert!(e.is_linear());
        let got = e.eval(&vars.values());
        prop_assert!((got - (a * x - b * y + 3.0)).abs() < 1e-9);
    }

    #[test]
    fn initial_values_are_clamped(init in -1e3f64..1e3) {
        let mut vars = VariableStore::new();
        let id = vars.add("z", Bounds::new(0.0, 1.0), init).unwrap();
        let v = vars.value(id).unwrap();
        prop_assert!((0.0..=1.0).contains(&v));
    }
}
