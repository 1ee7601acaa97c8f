//! Every unit kind builds a constraint block over freshly allocated streams.

use proptest::prelude::*;
use sf_core::Tolerances;
use sf_expr::{Bounds, VariableStore};
use sf_substances::{Reaction, Substance};
use sf_unitops::{
    Cca, Compressor, HeatExchanger, Mixer, Msp, Psa, ReactionStep, Reactor, SeparatorPorts,
    SorbentVars, Splitter, Stream, StreamIndex, Tsa, Unit, UnitOperation,
};

fn streams(vars: &mut VariableStore, n: u32) -> Vec<Stream> {
    (1..=n)
        .map(|i| Stream::allocate(StreamIndex(i), vars).unwrap())
        .collect()
}

fn aux(vars: &mut VariableStore, name: &str) -> sf_core::VarId {
    vars.add(name, Bounds::new(-5000.0, 10_000.0), 0.0).unwrap()
}

#[test]
fn all_units_build() {
    let mut vars = VariableStore::new();
    let s = streams(&mut vars, 3);
    let zeta = vars.add("zeta", Bounds::unit_interval(), 0.0).unwrap();
    let ports = |key| SeparatorPorts {
        inlet: s[0],
        product: s[1],
        byproduct: s[2],
        recovery: zeta,
        key,
    };
    let w = aux(&mut vars, "w");
    let q = aux(&mut vars, "q");
    let sorbent = SorbentVars {
        heat: q,
        mass_flow: aux(&mut vars, "m_s"),
        loading_rich: aux(&mut vars, "X_rich"),
        loading_lean: aux(&mut vars, "X_lean"),
    };
    let x = aux(&mut vars, "conversion");

    let units: Vec<Unit> = vec![
        Compressor::new("C1", s[0], s[1], w).into(),
        HeatExchanger::new("HE1", s[0], s[1], q).into(),
        Mixer::new("M1", s[0], s[1], s[2]).into(),
        Splitter::new("S1", s[0], s[1], s[2], x).into(),
        Psa::new("PSA1", ports(Substance::H2)).unwrap().into(),
        Tsa::new("TSA1", ports(Substance::CO2), sorbent).into(),
        Msp::new("MSP1", ports(Substance::CO2)).unwrap().into(),
        Cca::new("CCA1", ports(Substance::CO2), q).into(),
        Reactor::new("R1", s[0], s[1], q, ReactionStep::new(Reaction::Wgsr, x), None).into(),
    ];

    let labels: Vec<&str> = units.iter().map(|u| u.type_label()).collect();
    assert_eq!(
        labels,
        [
            "Compressor",
            "Heat Exchanger",
            "Mixer",
            "Splitter",
            "Pressure Swing Adsorption",
            "Temperature Swing Adsorption",
            "Membrane Separation Process",
            "Chemical Absorption",
            "Reactor",
        ]
    );

    for unit in &units {
        let block = unit.build(&vars).unwrap();
        assert_eq!(block.name(), unit.name());
        assert!(!block.is_empty(), "{}", unit.name());
    }
}

#[test]
fn compressor_block_layout() {
    let mut vars = VariableStore::new();
    let s = streams(&mut vars, 2);
    let w = aux(&mut vars, "w");
    let block = Compressor::new("C1", s[0], s[1], w).build(&vars).unwrap();
    // isentropic + mole balance + 6 component balances + energy + closure
    assert_eq!(block.len(), 10);
    assert!(block.get("comp_cb[H2O]").is_none());
}

#[test]
fn separator_balances_skip_water() {
    let mut vars = VariableStore::new();
    let s = streams(&mut vars, 3);
    let zeta = vars.add("zeta", Bounds::unit_interval(), 0.0).unwrap();
    let ports = SeparatorPorts {
        inlet: s[0],
        product: s[1],
        byproduct: s[2],
        recovery: zeta,
        key: Substance::H2,
    };
    let block = Psa::new("PSA1", ports).unwrap().build(&vars).unwrap();
    for k in Substance::balanced() {
        assert!(block.get(&format!("sep_cb[{k}]")).is_some());
    }
    assert!(block.get("sep_cb[H2O]").is_none());
    assert!(block.get("psa_prod_k[H2O]").is_some());
}

proptest! {
    #[test]
    fn splitter_conserves_any_split(split in 0.0f64..=1.0, flow in 0.1f64..500.0) {
        let mut vars = VariableStore::new();
        let s = streams(&mut vars, 3);
        let x = vars.add("split", Bounds::unit_interval(), 0.0).unwrap();
        let block = Splitter::new("S1", s[0], s[1], s[2], x).build(&vars).unwrap();

        let y = 1.0 / Substance::COUNT as f64;
        for (stream, n) in [(s[0], flow), (s[1], split * flow), (s[2], (1.0 - split) * flow)] {
            vars.set_value(stream.flow, n).unwrap();
            vars.set_value(stream.temperature, 350.0).unwrap();
            vars.set_value(stream.pressure, 2.0).unwrap();
            for (_, &id) in stream.fractions.iter() {
                vars.set_value(id, y).unwrap();
            }
        }
        vars.set_value(x, split).unwrap();
        let values = vars.values();
        prop_assert_eq!(block.violated(&values, Tolerances::feasibility()).count(), 0);

        // Any leak from the by-product breaks the mole balance.
        vars.set_value(s[2].flow, (1.0 - split) * flow + 1.0).unwrap();
        let leaky = vars.values();
        let names: Vec<String> = block
            .violated(&leaky, Tolerances::feasibility())
            .map(|c| c.name.clone())
            .collect();
        prop_assert_eq!(names, vec!["split_mb".to_string()]);
    }
}
