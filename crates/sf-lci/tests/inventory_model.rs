use std::collections::{BTreeSet, HashMap};

use proptest::prelude::*;
use sf_core::Tolerances;
use sf_expr::VariableStore;
use sf_lci::{
    GRID_MIX_2020, InventoryConfig, InventoryData, InventoryError, InventoryTable,
    LifeCycleInventory, Scenario, USER_DEFINED_ELECTRICITY, WIND_POWER,
};

fn electricity_table() -> InventoryTable {
    InventoryTable {
        processes: vec![
            GRID_MIX_2020.into(),
            WIND_POWER.into(),
            USER_DEFINED_ELECTRICITY.into(),
            "Hydrogen electrolysis".into(),
        ],
        flows: vec!["Electricity [MJ]".into(), "Hydrogen (H2) [kg]".into()],
        matrix: vec![vec![1.0, 1.0, 1.0, -50.0], vec![0.0, 0.0, 0.0, 1.0]],
        capacity: vec![0.0, 10.0],
        elementary: vec![0.3, 0.01, 0.0, 0.0],
        end_of_life: vec![0.0, 0.0],
    }
}

fn inventory() -> (VariableStore, LifeCycleInventory) {
    let data = InventoryData::try_from(electricity_table()).unwrap();
    let mut vars = VariableStore::new();
    let lci = LifeCycleInventory::set_up("lci", data, 1.0, &mut vars).unwrap();
    (vars, lci)
}

fn finish(lci: &mut LifeCycleInventory) {
    lci.construct_flow_constraints(&HashMap::new()).unwrap();
    lci.construct_objective().unwrap();
}

#[test]
fn scenario_matches_manual_deactivation() {
    let (_, mut by_scenario) = inventory();
    by_scenario
        .activate_scenario(&Scenario::ElectricityToday)
        .unwrap();
    finish(&mut by_scenario);

    let (_, mut by_hand) = inventory();
    by_hand.deactivate_process(WIND_POWER).unwrap();
    by_hand.deactivate_process(USER_DEFINED_ELECTRICITY).unwrap();
    finish(&mut by_hand);

    let a: Vec<_> = by_scenario.blocks().collect();
    let b: Vec<_> = by_hand.blocks().collect();
    assert_eq!(a, b);
}

#[test]
fn user_defined_electricity_sets_impact() {
    let (mut vars, mut lci) = inventory();
    lci.activate_scenario(&Scenario::ElectricityUserDefined { impact: 0.05 })
        .unwrap();
    finish(&mut lci);
    assert_eq!(lci.elementary()[2], 0.05);

    // 10 kg hydrogen needs 500 MJ, only the user-defined route is open.
    vars.set_value(lci.activity("Hydrogen electrolysis").unwrap(), 10.0)
        .unwrap();
    vars.set_value(lci.activity(USER_DEFINED_ELECTRICITY).unwrap(), 500.0)
        .unwrap();
    vars.set_value(lci.flow("Hydrogen (H2) [kg]").unwrap(), 10.0)
        .unwrap();
    vars.set_value(lci.cradle_to_gate(), 25.0).unwrap();
    let values = vars.values();
    let violated: usize = lci
        .blocks()
        .map(|b| b.violated(&values, Tolerances::feasibility()).count())
        .sum();
    assert_eq!(violated, 0);
    assert!((lci.objective().unwrap().value(&values) - 25.0).abs() < 1e-12);
}

#[test]
fn config_applies_in_order() {
    let cfg = InventoryConfig::from_yaml_str(
        r#"
scenarios:
  - name: Electricity Best Case
deactivate: ["Hydrogen electrolysis"]
caps:
  - { process: "EU-28: Electricity from wind power ts", upper: 100.0 }
"#,
    )
    .unwrap();
    let (_, mut lci) = inventory();
    cfg.apply(&mut lci).unwrap();
    let names: Vec<&str> = lci
        .blocks()
        .flat_map(|b| b.iter().map(|c| c.name.as_str()))
        .collect();
    assert_eq!(
        names,
        [
            format!("deactivated[{GRID_MIX_2020}]").as_str(),
            format!("deactivated[{USER_DEFINED_ELECTRICITY}]").as_str(),
            "deactivated[Hydrogen electrolysis]",
            format!("cap[{WIND_POWER}]").as_str(),
        ]
    );
}

#[test]
fn config_with_unknown_process_fails() {
    let cfg = InventoryConfig::from_yaml_str("deactivate: [coal]").unwrap();
    let (_, mut lci) = inventory();
    assert!(cfg.apply(&mut lci).is_err());
}

fn constraint_count(lci: &LifeCycleInventory) -> usize {
    lci.blocks().map(|b| b.len()).sum()
}

#[test]
fn failing_scenario_leaves_inventory_untouched() {
    let mut table = electricity_table();
    table.processes[1] = "GDP today".into();
    let data = InventoryData::try_from(table).unwrap();
    let mut vars = VariableStore::new();
    let mut lci = LifeCycleInventory::set_up("lci", data, 1.0, &mut vars).unwrap();

    // "GDP best case" is missing, so nothing may be deactivated.
    let before = constraint_count(&lci);
    assert!(matches!(
        lci.activate_scenario(&Scenario::SeparationGdp),
        Err(InventoryError::UnknownProcess(p)) if p == "GDP best case"
    ));
    assert_eq!(constraint_count(&lci), before);
}

#[test]
fn late_override_leaves_inventory_untouched() {
    let (_, mut lci) = inventory();
    finish(&mut lci);
    let before = constraint_count(&lci);
    assert!(matches!(
        lci.activate_scenario(&Scenario::ElectricityUserDefined { impact: 0.05 }),
        Err(InventoryError::AlreadyBuilt { .. })
    ));
    assert_eq!(constraint_count(&lci), before);
    assert_eq!(lci.elementary()[2], 0.0);
}

#[test]
fn config_error_applies_nothing() {
    let cfg = InventoryConfig::from_yaml_str(
        r#"
scenarios:
  - name: Electricity Best Case
deactivate: ["Hydrogen electrolysis"]
caps:
  - { process: coal, upper: 1.0 }
"#,
    )
    .unwrap();
    let (_, mut lci) = inventory();
    let before = constraint_count(&lci);
    assert!(cfg.apply(&mut lci).is_err());
    assert_eq!(constraint_count(&lci), before);
}

#[test]
fn connected_flows_are_recorded() {
    let (mut vars, mut lci) = inventory();
    let c = vars
        .add("connector", sf_expr::Bounds::symmetric(1e4), 0.0)
        .unwrap();
    let mut connectors = HashMap::new();
    connectors.insert("Hydrogen (H2) [kg]".to_string(), sf_expr::Expr::var(c));
    lci.construct_flow_constraints(&connectors).unwrap();
    assert_eq!(lci.connected_flows(), ["Hydrogen (H2) [kg]".to_string()]);
}

proptest! {
    #[test]
    fn repeated_deactivation_keeps_feasible_region(
        repeats in 1usize..5,
        point in prop::collection::vec(-5.0f64..5.0, 8),
    ) {
        let (_, mut once) = inventory();
        once.deactivate_process(WIND_POWER).unwrap();
        finish(&mut once);

        let (_, mut many) = inventory();
        for _ in 0..repeats {
            many.deactivate_process(WIND_POWER).unwrap();
        }
        finish(&mut many);

        let violated = |lci: &LifeCycleInventory| -> BTreeSet<String> {
            lci.blocks()
                .flat_map(|b| b.violated(&point, Tolerances::feasibility()))
                .map(|c| c.name.clone())
                .collect()
        };
        prop_assert_eq!(violated(&once), violated(&many));
    }
}
