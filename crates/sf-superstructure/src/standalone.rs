//! Technology-choice runs: the inventory sub-model without a flowsheet.

use sf_lci::{InventoryConfig, InventoryData};
use tracing::info;

use crate::assembler::Superstructure;
use crate::connector::Connector;
use crate::error::AssemblyResult;
use crate::model::AssembledModel;

impl Superstructure {
    /// Assemble a model made of the inventory alone.
    ///
    /// `config` supplies the scale and the scenario, deactivation and cap
    /// set-up. Each entry of `pinned` fixes a connector to a plant-level
    /// quantity, divided by the scale before it enters the inventory.
    pub fn inventory_only(
        name: &str,
        data: InventoryData,
        config: &InventoryConfig,
        pinned: impl IntoIterator<Item = (Connector, f64)>,
    ) -> AssemblyResult<AssembledModel> {
        let mut s = Superstructure::new(name).with_scale(config.scale)?;
        let pinned: Vec<_> = pinned.into_iter().collect();
        s.declare_connectors(pinned.iter().map(|&(c, _)| c))?;
        for &(c, value) in &pinned {
            let scaled = s.scaled(value);
            s.define_connector(c, scaled)?;
        }

        let mut lci = s.set_up_inventory("lci", data)?;
        config.apply(&mut lci)?;
        lci.construct_flow_constraints(&s.connector_terms())?;
        lci.construct_objective()?;
        s.import_inventory(lci)?;
        info!(model = name, pinned = pinned.len(), "standalone inventory model");
        s.create_disjunctions()
    }
}
