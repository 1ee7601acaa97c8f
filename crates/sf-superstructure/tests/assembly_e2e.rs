//! End-to-end assembly checks against hand-computed operating points.

use std::collections::HashMap;

use proptest::prelude::*;
use sf_core::{Tolerances, VarId, bar, k};
use sf_expr::{Constraint, Expr, Objective};
use sf_lci::{InventoryData, InventoryTable, LifeCycleInventory};
use sf_substances::{FeedComposition, Reaction, Substance, SubstanceMap, shomate};
use sf_superstructure::{
    AssembledModel, AssemblyError, Connector, Superstructure, UnitSpec, Violation,
};
use sf_unitops::Stream;

struct Point(Vec<f64>);

impl Point {
    fn of(model: &AssembledModel) -> Self {
        Point(model.vars().values())
    }

    fn set(&mut self, id: VarId, v: f64) {
        self.0[id.slot()] = v;
    }

    fn state(&mut self, s: &Stream, n: f64, t: f64, p: f64, y: &SubstanceMap<f64>) {
        self.set(s.flow, n);
        self.set(s.temperature, t);
        self.set(s.pressure, p);
        for (k, &id) in s.fractions.iter() {
            self.set(id, y[k]);
        }
    }
}

fn stream(model: &AssembledModel, i: u32) -> Stream {
    model.stream(i).unwrap().stream
}

fn pure(k: Substance) -> SubstanceMap<f64> {
    SubstanceMap::from_fn(|j| if j == k { 1.0 } else { 0.0 })
}

#[test]
fn single_compressor_minimum_work() {
    let mut s = Superstructure::new("compressor");
    s.fix_initial_stream(
        1,
        10.0,
        k(300.0),
        bar(1.0),
        FeedComposition::from_pairs([("CO", 1.0)]).unwrap(),
    )
    .unwrap();
    s.create_unit("C1", UnitSpec::compressor(1, 2)).unwrap();
    s.set_objective(Objective::minimize(s.total_work()));
    let model = s.create_disjunctions().unwrap();
    let tol = Tolerances::feasibility();
    let out = stream(&model, 2);
    let w = model.unit_variables().work("C1").unwrap();
    let y = pure(Substance::CO);

    // Pass-through: no compression, no work.
    let mut idle = Point::of(&model);
    idle.state(&out, 10.0, 300.0, 1.0, &y);
    idle.set(w, 0.0);
    assert!(model.is_feasible(&idle.0, tol), "{:?}", model.violations(&idle.0, tol));
    assert_eq!(model.objective().value(&idle.0), 0.0);

    // Any compressed outlet follows the isentropic relation and costs work.
    let kappa = shomate::kappa(300.0, &y);
    let t_out = 300.0 * 3.0_f64.powf((kappa - 1.0) / kappa);
    let work = (shomate::enthalpy(t_out, &y) - shomate::enthalpy(300.0, &y)) / 0.7 * 10.0;
    let mut compressed = Point::of(&model);
    compressed.state(&out, 10.0, t_out, 3.0, &y);
    compressed.set(w, work);
    assert!(model.is_feasible(&compressed.0, tol));
    assert!(model.objective().value(&compressed.0) > 0.0);

    // Flow is conserved.
    let mut leaky = Point::of(&model);
    leaky.state(&out, 9.0, 300.0, 1.0, &y);
    leaky.set(w, 0.0);
    let violations = model.violations(&leaky.0, tol);
    assert!(violations.iter().any(|v| matches!(
        v,
        Violation::Constraint { constraint, .. } if constraint == "comp_mb"
    )));
}

/// CO2 reforming vs partial oxidation on the same stream pair, with a
/// syngas connector defined differently in each alternative.
fn reforming(with_inventory: bool) -> AssembledModel {
    let mut s = Superstructure::new("reforming");
    s.fix_initial_stream(
        1,
        100.0,
        k(1200.0),
        bar(5.0),
        FeedComposition::from_pairs([("CO2", 0.5), ("CH4", 0.5)]).unwrap(),
    )
    .unwrap();
    s.create_disjunct_reactor("reformer", "cdr", "R2_CDR", 1, 2, Reaction::Cdr, None)
        .unwrap();
    s.create_disjunct_reactor("reformer", "por", "R2_POR", 1, 2, Reaction::Por, None)
        .unwrap();

    s.declare_connectors([Connector::Syngas11]).unwrap();
    let out = s.stream(2).unwrap();
    let syngas = out.n()
        * (out.y(Substance::H2) * Substance::H2.molar_weight()
            + out.y(Substance::CO) * Substance::CO.molar_weight());
    s.define_connector_in_disjunct("cdr", Connector::Syngas11, syngas)
        .unwrap();
    s.define_connector_in_disjunct("por", Connector::Syngas11, 0.0)
        .unwrap();
    s.add_disjunct_constraint(
        "por",
        Constraint::le("oxygen_feed", Expr::var(out.temperature), 2000.0),
    )
    .unwrap();

    if with_inventory {
        let data: InventoryData = InventoryTable {
            processes: vec!["Acetic acid from syngas".into()],
            flows: vec![Connector::Syngas11.flow_name().into()],
            matrix: vec![vec![-1.0]],
            capacity: vec![0.0],
            elementary: vec![0.5],
            end_of_life: vec![0.0],
        }
        .try_into()
        .unwrap();
        let mut lci: LifeCycleInventory = s.set_up_inventory("utilization", data).unwrap();
        lci.construct_flow_constraints(&s.connector_terms()).unwrap();
        lci.construct_objective().unwrap();
        s.import_inventory(lci).unwrap();
    } else {
        s.set_objective(Objective::minimize(s.total_heat()));
    }
    s.create_disjunctions().unwrap()
}

fn syngas_mass() -> f64 {
    90.0 * (Substance::H2.molar_weight() + Substance::CO.molar_weight())
}

/// Dry-reforming operating point at 90 % CH4 conversion.
fn cdr_point(model: &AssembledModel) -> Point {
    let mut y_in = SubstanceMap::default();
    y_in[Substance::CO2] = 0.5;
    y_in[Substance::CH4] = 0.5;
    let mut y_out = SubstanceMap::default();
    y_out[Substance::CO] = 90.0 / 190.0;
    y_out[Substance::H2] = 90.0 / 190.0;
    y_out[Substance::CO2] = 5.0 / 190.0;
    y_out[Substance::CH4] = 5.0 / 190.0;
    let q = (shomate::enthalpy(1200.0, &y_out) * 190.0 - shomate::enthalpy(1200.0, &y_in) * 100.0
        + 45.0 * Reaction::Cdr.enthalpy())
        / 0.7;

    let uv = model.unit_variables();
    let mut p = Point::of(model);
    p.state(&stream(model, 2), 190.0, 1200.0, 1.0, &y_out);
    p.set(uv.heat("R2_CDR").unwrap(), q);
    p.set(uv.conversion("R2_CDRCDR").unwrap(), 0.9);
    p.set(model.connectors()[0].1, syngas_mass());
    p
}

fn select(model: &AssembledModel, p: &mut Point, chosen: &str) {
    for d in model.disjunctions()[0].disjuncts() {
        p.set(d.indicator, if d.name == chosen { 1.0 } else { 0.0 });
    }
}

#[test]
fn rejected_disjunct_does_not_constrain() {
    let model = reforming(false);
    let tol = Tolerances::feasibility();
    let mut p = cdr_point(&model);

    select(&model, &mut p, "cdr");
    assert!(model.is_feasible(&p.0, tol), "{:?}", model.violations(&p.0, tol));
    assert_eq!(
        model.disjunctions()[0].selected(&p.0).map(|d| d.name.as_str()),
        Some("cdr")
    );

    // Same streams, other alternative: only its own relations fail.
    select(&model, &mut p, "por");
    let violations = model.violations(&p.0, tol);
    assert!(!violations.is_empty());
    for v in &violations {
        match v {
            Violation::Constraint { block, .. } => {
                assert!(block == "R2_POR" || block == "por.constraints", "{v:?}")
            }
            other => panic!("unexpected {other:?}"),
        }
    }
    assert!(violations.iter().any(|v| matches!(
        v,
        Violation::Constraint { constraint, .. } if constraint == "react_conversion1"
    )));
}

#[test]
fn exactly_one_alternative() {
    let model = reforming(false);
    let tol = Tolerances::feasibility();
    let mut p = cdr_point(&model);
    for d in model.disjunctions()[0].disjuncts() {
        p.set(d.indicator, 1.0);
    }
    assert!(model.violations(&p.0, tol).iter().any(|v| matches!(
        v,
        Violation::Constraint { constraint, .. } if constraint == "reformer.exactly_one"
    )));

    let mut none = cdr_point(&model);
    select(&model, &mut none, "nothing");
    assert!(!model.is_feasible(&none.0, tol));
}

#[test]
fn connector_value_reaches_inventory() {
    let model = reforming(true);
    let tol = Tolerances::feasibility();
    let lci = model.inventory().unwrap();
    let mut p = cdr_point(&model);
    select(&model, &mut p, "cdr");

    let syngas = syngas_mass();
    p.set(lci.activity("Acetic acid from syngas").unwrap(), syngas);
    p.set(lci.cradle_to_gate(), 0.5 * syngas);
    assert!(model.is_feasible(&p.0, tol), "{:?}", model.violations(&p.0, tol));
    assert!((model.objective().value(&p.0) - 0.5 * syngas).abs() < 1e-9);

    // The inventory balance pins the activity to the connector value.
    p.set(lci.activity("Acetic acid from syngas").unwrap(), syngas + 1.0);
    let violations = model.violations(&p.0, tol);
    assert!(violations.iter().any(|v| matches!(
        v,
        Violation::Constraint { block, .. } if block == "define_y"
    )));
}

#[test]
fn inventory_scale_must_match() {
    let mut s = Superstructure::new("scaled").with_scale(1e9).unwrap();
    let data: InventoryData = InventoryTable {
        processes: vec!["p".into()],
        flows: vec!["f".into()],
        matrix: vec![vec![1.0]],
        capacity: vec![0.0],
        elementary: vec![0.0],
        end_of_life: vec![0.0],
    }
    .try_into()
    .unwrap();
    let mut vars = sf_expr::VariableStore::new();
    let mut lci = LifeCycleInventory::set_up("lci", data, 1.0, &mut vars).unwrap();
    lci.construct_flow_constraints(&Default::default()).unwrap();
    lci.construct_objective().unwrap();
    assert!(matches!(
        s.import_inventory(lci),
        Err(AssemblyError::ScaleMismatch { .. })
    ));
}

fn hydrogen_data() -> InventoryData {
    InventoryTable {
        processes: vec!["H2 from SMR".into(), "Ammonia".into()],
        flows: vec![
            Connector::Hydrogen.flow_name().into(),
            Connector::Oxygen.flow_name().into(),
        ],
        matrix: vec![vec![1.0, -0.2], vec![0.0, 0.0]],
        capacity: vec![0.0, 0.0],
        elementary: vec![9.5, 1.0],
        end_of_life: vec![0.0, 0.0],
    }
    .try_into()
    .unwrap()
}

fn hydrogen_user() -> Superstructure {
    let mut s = Superstructure::new("coupling");
    s.declare_connectors([Connector::Hydrogen]).unwrap();
    s.define_connector(Connector::Hydrogen, -1.0).unwrap();
    s
}

#[test]
fn declared_connector_must_enter_inventory() {
    let mut s = hydrogen_user();
    let mut lci = s.set_up_inventory("lci", hydrogen_data()).unwrap();
    lci.construct_flow_constraints(&HashMap::new()).unwrap();
    lci.construct_objective().unwrap();
    assert!(matches!(
        s.import_inventory(lci),
        Err(AssemblyError::ConnectorNotCoupled(ref c)) if c == "Hydrogen (H2) [kg]"
    ));
}

#[test]
fn connector_declared_after_import_is_caught_at_finalisation() {
    let mut s = Superstructure::new("coupling");
    let mut lci = s.set_up_inventory("lci", hydrogen_data()).unwrap();
    lci.construct_flow_constraints(&s.connector_terms()).unwrap();
    lci.construct_objective().unwrap();
    s.import_inventory(lci).unwrap();

    s.declare_connectors([Connector::Hydrogen]).unwrap();
    s.define_connector(Connector::Hydrogen, -1.0).unwrap();
    assert!(matches!(
        s.create_disjunctions(),
        Err(AssemblyError::ConnectorNotCoupled(_))
    ));
}

#[test]
fn inventory_term_without_connector_is_rejected() {
    let mut s = hydrogen_user();
    let stray = s
        .vars_mut()
        .add("stray", sf_expr::Bounds::symmetric(1.0), 0.0)
        .unwrap();
    let mut terms = s.connector_terms();
    terms.insert(Connector::Oxygen.flow_name().to_string(), Expr::var(stray));
    let mut lci = s.set_up_inventory("lci", hydrogen_data()).unwrap();
    lci.construct_flow_constraints(&terms).unwrap();
    lci.construct_objective().unwrap();
    assert!(matches!(
        s.import_inventory(lci),
        Err(AssemblyError::UnknownCoupling(ref flow)) if flow == "Oxygen (O2) [kg]"
    ));
}

#[test]
fn matching_coupling_is_accepted() {
    let mut s = hydrogen_user();
    let mut lci = s.set_up_inventory("lci", hydrogen_data()).unwrap();
    lci.construct_flow_constraints(&s.connector_terms()).unwrap();
    lci.construct_objective().unwrap();
    s.import_inventory(lci).unwrap();
    let model = s.create_disjunctions().unwrap();
    assert_eq!(model.connectors().len(), 1);
}

proptest! {
    #[test]
    fn isentropic_outlet_is_feasible_for_any_ratio(ratio in 1.0f64..10.0, flow in 1.0f64..100.0) {
        let mut s = Superstructure::new("compressor");
        s.fix_initial_stream(
            1,
            flow,
            k(300.0),
            bar(1.0),
            FeedComposition::from_pairs([("CO", 1.0)]).unwrap(),
        )
        .unwrap();
        s.create_unit("C1", UnitSpec::compressor(1, 2)).unwrap();
        s.set_objective(Objective::minimize(s.total_work()));
        let model = s.create_disjunctions().unwrap();
        let y = pure(Substance::CO);

        let kappa = shomate::kappa(300.0, &y);
        let t_out = 300.0 * ratio.powf((kappa - 1.0) / kappa);
        let work = (shomate::enthalpy(t_out, &y) - shomate::enthalpy(300.0, &y)) / 0.7 * flow;
        let mut point = Point::of(&model);
        point.state(&stream(&model, 2), flow, t_out, ratio, &y);
        point.set(model.unit_variables().work("C1").unwrap(), work);
        let tol = Tolerances::feasibility();
        prop_assert!(model.is_feasible(&point.0, tol), "{:?}", model.violations(&point.0, tol));
    }
}
