//! Incremental superstructure assembler.

use std::collections::HashMap;

use sf_core::{Pressure, Registry, SfError, Temperature, VarId, ensure_finite, to_bar, to_kelvin};
use sf_expr::{Bounds, Constraint, ConstraintBlock, Expr, Objective, VariableStore};
use sf_lci::{InventoryData, LifeCycleInventory};
use sf_substances::{
    FeedComposition, Reaction, ReferenceMixture, Substance, msp_alpha, psa_beta,
};
use sf_unitops::stream::{FLOW_BOUNDS, PRESSURE_BOUNDS, TEMPERATURE_BOUNDS};
use sf_unitops::{
    Cca, Compressor, HeatExchanger, Mixer, MixerPressure, Msp, Psa, ReactionStep, Reactor,
    SeparatorPorts, SorbentVars, Splitter, Stream, StreamIndex, StreamKind, Tsa, Unit,
    UnitOperation,
};
use tracing::{debug, info};

use crate::connector::{CONNECTOR_BOUNDS, Connector};
use crate::disjunct::{Disjunct, OpenDisjunction};
use crate::error::{AssemblyError, AssemblyResult};
use crate::impact::ImpactFactors;
use crate::model::AssembledModel;
use crate::variables::UnitVariables;

/// A stream bundle and how its state is determined.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StreamEntry {
    pub stream: Stream,
    pub kind: StreamKind,
}

/// A unit, its constraint block, and the disjunct holding it (if any).
#[derive(Debug, Clone, PartialEq)]
pub struct UnitEntry {
    pub unit: Unit,
    pub block: ConstraintBlock,
    pub disjunct: Option<String>,
}

/// Inlet, outlets and key component of a separator-based unit.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeparationSpec {
    pub inlet: StreamIndex,
    pub product: StreamIndex,
    pub byproduct: StreamIndex,
    pub key: Substance,
}

/// Unit kinds created through [`Superstructure::create_unit`].
///
/// Mixers and reactors have dedicated constructors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UnitSpec {
    Compressor {
        inlet: StreamIndex,
        outlet: StreamIndex,
    },
    HeatExchanger {
        inlet: StreamIndex,
        outlet: StreamIndex,
    },
    Splitter {
        inlet: StreamIndex,
        product: StreamIndex,
        byproduct: StreamIndex,
    },
    Psa(SeparationSpec),
    Tsa(SeparationSpec),
    Msp(SeparationSpec),
    Cca(SeparationSpec),
}

impl UnitSpec {
    pub fn compressor(inlet: impl Into<StreamIndex>, outlet: impl Into<StreamIndex>) -> Self {
        UnitSpec::Compressor {
            inlet: inlet.into(),
            outlet: outlet.into(),
        }
    }

    pub fn heat_exchanger(inlet: impl Into<StreamIndex>, outlet: impl Into<StreamIndex>) -> Self {
        UnitSpec::HeatExchanger {
            inlet: inlet.into(),
            outlet: outlet.into(),
        }
    }

    pub fn splitter(
        inlet: impl Into<StreamIndex>,
        product: impl Into<StreamIndex>,
        byproduct: impl Into<StreamIndex>,
    ) -> Self {
        UnitSpec::Splitter {
            inlet: inlet.into(),
            product: product.into(),
            byproduct: byproduct.into(),
        }
    }

    pub fn psa(
        inlet: impl Into<StreamIndex>,
        product: impl Into<StreamIndex>,
        byproduct: impl Into<StreamIndex>,
        key: Substance,
    ) -> Self {
        UnitSpec::Psa(SeparationSpec::new(inlet, product, byproduct, key))
    }

    pub fn tsa(
        inlet: impl Into<StreamIndex>,
        product: impl Into<StreamIndex>,
        byproduct: impl Into<StreamIndex>,
        key: Substance,
    ) -> Self {
        UnitSpec::Tsa(SeparationSpec::new(inlet, product, byproduct, key))
    }

    pub fn msp(
        inlet: impl Into<StreamIndex>,
        product: impl Into<StreamIndex>,
        byproduct: impl Into<StreamIndex>,
        key: Substance,
    ) -> Self {
        UnitSpec::Msp(SeparationSpec::new(inlet, product, byproduct, key))
    }

    pub fn cca(
        inlet: impl Into<StreamIndex>,
        product: impl Into<StreamIndex>,
        byproduct: impl Into<StreamIndex>,
        key: Substance,
    ) -> Self {
        UnitSpec::Cca(SeparationSpec::new(inlet, product, byproduct, key))
    }
}

impl SeparationSpec {
    pub fn new(
        inlet: impl Into<StreamIndex>,
        product: impl Into<StreamIndex>,
        byproduct: impl Into<StreamIndex>,
        key: Substance,
    ) -> Self {
        Self {
            inlet: inlet.into(),
            product: product.into(),
            byproduct: byproduct.into(),
            key,
        }
    }
}

/// Where a unit's block is placed.
#[derive(Clone, Copy)]
enum Placement<'a> {
    TopLevel,
    Disjunct {
        disjunction: &'a str,
        disjunct: &'a str,
    },
}

#[derive(Debug, Clone)]
pub(crate) struct ConnectorEntry {
    pub(crate) var: VarId,
    pub(crate) top_level: bool,
    pub(crate) disjuncts: Vec<String>,
}

/// Top-level constraint blocks that do not belong to a unit.
#[derive(Debug, Clone)]
pub(crate) struct GlobalBlocks {
    pub(crate) initial_n: ConstraintBlock,
    pub(crate) initial_t: ConstraintBlock,
    pub(crate) initial_p: ConstraintBlock,
    pub(crate) initial_y: ConstraintBlock,
    pub(crate) closure: ConstraintBlock,
    pub(crate) constraints: ConstraintBlock,
    pub(crate) connector_definitions: ConstraintBlock,
}

impl Default for GlobalBlocks {
    fn default() -> Self {
        Self {
            initial_n: ConstraintBlock::new("initial_n"),
            initial_t: ConstraintBlock::new("initial_t"),
            initial_p: ConstraintBlock::new("initial_p"),
            initial_y: ConstraintBlock::new("initial_y"),
            closure: ConstraintBlock::new("closure"),
            constraints: ConstraintBlock::new("constraints"),
            connector_definitions: ConstraintBlock::new("connector_definitions"),
        }
    }
}

impl GlobalBlocks {
    pub(crate) fn into_vec(self) -> Vec<ConstraintBlock> {
        vec![
            self.initial_n,
            self.initial_t,
            self.initial_p,
            self.initial_y,
            self.closure,
            self.constraints,
            self.connector_definitions,
        ]
    }
}

/// Flowsheet superstructure under construction.
///
/// Streams, units and disjuncts are declared incrementally. Calling
/// [`create_disjunctions`](Self::create_disjunctions) consumes the assembler and
/// returns the immutable [`AssembledModel`], so nothing can be added to a
/// disjunction after it has been finalised.
#[derive(Debug, Clone)]
pub struct Superstructure {
    name: String,
    scale: f64,
    vars: VariableStore,
    streams: Registry<StreamIndex, StreamEntry>,
    units: Registry<String, UnitEntry>,
    unit_vars: UnitVariables,
    disjunctions: Registry<String, OpenDisjunction>,
    /// Disjunct name -> owning disjunction.
    disjunct_groups: HashMap<String, String>,
    blocks: GlobalBlocks,
    connectors: Registry<Connector, ConnectorEntry>,
    inventory: Option<LifeCycleInventory>,
    objective: Option<Objective>,
}

impl Superstructure {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            scale: 1.0,
            vars: VariableStore::new(),
            streams: Registry::new(),
            units: Registry::new(),
            unit_vars: UnitVariables::default(),
            disjunctions: Registry::new(),
            disjunct_groups: HashMap::new(),
            blocks: GlobalBlocks::default(),
            connectors: Registry::new(),
            inventory: None,
            objective: None,
        }
    }

    /// Scale factor applied to plant-level quantities and to the inventory.
    pub fn with_scale(mut self, scale: f64) -> AssemblyResult<Self> {
        ensure_finite(scale, "scale factor")?;
        if scale <= 0.0 {
            return Err(sf_lci::InventoryError::InvalidScale(scale).into());
        }
        self.scale = scale;
        Ok(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn vars(&self) -> &VariableStore {
        &self.vars
    }

    /// Mutable access, e.g. to seed initial guesses before building units
    /// whose structure depends on current values.
    pub fn vars_mut(&mut self) -> &mut VariableStore {
        &mut self.vars
    }

    pub fn unit_variables(&self) -> &UnitVariables {
        &self.unit_vars
    }

    // ---- streams ----------------------------------------------------------

    /// Return the stream for `index`, allocating it on first use.
    pub fn create_stream(&mut self, index: impl Into<StreamIndex>) -> AssemblyResult<Stream> {
        let index = index.into();
        if let Some(entry) = self.streams.get(&index) {
            return Ok(entry.stream);
        }
        let stream = Stream::allocate(index, &mut self.vars)?;
        self.streams.insert_new(
            "stream",
            index,
            StreamEntry {
                stream,
                kind: StreamKind::Free,
            },
        )?;
        debug!(stream = %index, "stream created");
        Ok(stream)
    }

    pub fn stream(&self, index: impl Into<StreamIndex>) -> AssemblyResult<Stream> {
        let index = index.into();
        self.streams
            .get(&index)
            .map(|e| e.stream)
            .ok_or(AssemblyError::UnknownStream(index))
    }

    pub fn stream_kind(&self, index: impl Into<StreamIndex>) -> Option<StreamKind> {
        self.streams.get(&index.into()).map(|e| e.kind)
    }

    /// Pin temperature, pressure and composition of a feed stream.
    ///
    /// A nonzero `flow` [mol/s] is pinned too; `0.0` leaves the flow free,
    /// which makes the stream a utility sized by the optimizer. The variables
    /// are also seeded with the pinned values.
    pub fn fix_initial_stream(
        &mut self,
        index: impl Into<StreamIndex>,
        flow: f64,
        temperature: Temperature,
        pressure: Pressure,
        composition: impl Into<FeedComposition>,
    ) -> AssemblyResult<StreamKind> {
        let index = index.into();
        let t = to_kelvin(temperature);
        let p = to_bar(pressure);
        let fractions = composition.into().fractions();

        let checks: [(&'static str, f64, Bounds); 3] = [
            ("flow", flow, FLOW_BOUNDS),
            ("temperature", t, TEMPERATURE_BOUNDS),
            ("pressure", p, PRESSURE_BOUNDS),
        ];
        for (what, v, bounds) in checks {
            ensure_finite(v, what)?;
            if !bounds.contains(v, 0.0) {
                return Err(AssemblyError::InvalidInitialState {
                    index,
                    what: format!("{what} {v} outside [{}, {}]", bounds.lower, bounds.upper),
                });
            }
        }

        let stream = self.create_stream(index)?;
        if self.stream_kind(index).is_some_and(|k| k.is_fixed()) {
            return Err(AssemblyError::StreamAlreadyFixed(index));
        }

        self.blocks
            .initial_t
            .add_eq(format!("initial_t[{index}]"), stream.t(), t);
        self.blocks
            .initial_p
            .add_eq(format!("initial_p[{index}]"), stream.p(), p);
        self.vars.set_value(stream.temperature, t)?;
        self.vars.set_value(stream.pressure, p)?;

        let kind = if flow != 0.0 {
            self.blocks
                .initial_n
                .add_eq(format!("initial_n[{index}]"), stream.n(), flow);
            self.vars.set_value(stream.flow, flow)?;
            StreamKind::FixedInitial
        } else {
            StreamKind::FixedUtility
        };

        for (k, &y) in fractions.iter() {
            self.blocks
                .initial_y
                .add_eq(format!("initial_y[{index},{k}]"), stream.y(k), y);
            self.vars.set_value(stream.fractions[k], y)?;
        }

        if let Some(entry) = self.streams.get_mut(&index) {
            entry.kind = kind;
        }
        debug!(stream = %index, kind = kind.label(), t, p, flow, "stream fixed");
        Ok(kind)
    }

    /// Add Σ y = 1 for a stream whose composition is otherwise unconstrained.
    pub fn close_composition(&mut self, index: impl Into<StreamIndex>) -> AssemblyResult<()> {
        let index = index.into();
        let stream = self.stream(index)?;
        self.blocks
            .closure
            .add_eq(format!("closure[{index}]"), stream.fraction_sum(), 1.0);
        Ok(())
    }

    pub fn streams(&self) -> impl Iterator<Item = &StreamEntry> {
        self.streams.values()
    }

    // ---- units ------------------------------------------------------------

    fn ensure_unit_name_free(&self, name: &str) -> AssemblyResult<()> {
        if self.units.contains(name) {
            return Err(SfError::Duplicate {
                kind: "unit",
                key: name.to_string(),
            }
            .into());
        }
        Ok(())
    }

    /// Checks that need no allocation. Runs before any stream or auxiliary
    /// variable of the unit is registered, so a rejected unit leaves no trace.
    fn check_unit_params(spec: &UnitSpec) -> AssemblyResult<()> {
        match spec {
            UnitSpec::Psa(sep) => {
                psa_beta(sep.key)?;
            }
            UnitSpec::Msp(sep) => {
                msp_alpha(sep.key, sep.key)?;
            }
            _ => {}
        }
        Ok(())
    }

    /// Conversion keys of a reactor, rejected if any is already taken.
    fn conversion_keys(
        &self,
        name: &str,
        first: Reaction,
        second: Option<Reaction>,
    ) -> AssemblyResult<(String, Option<String>)> {
        let first = format!("{name}{}", first.key());
        let second = second.map(|r| format!("{name}{}", r.key()));
        let repeated = second.as_ref().filter(|&k| *k == first);
        let taken = std::iter::once(&first)
            .chain(second.as_ref())
            .find(|k| self.unit_vars.conversion(k).is_some());
        if let Some(key) = repeated.or(taken) {
            return Err(SfError::Duplicate {
                kind: "conversion point",
                key: key.clone(),
            }
            .into());
        }
        Ok((first, second))
    }

    fn separator_ports(&mut self, name: &str, spec: &SeparationSpec) -> AssemblyResult<SeparatorPorts> {
        let inlet = self.create_stream(spec.inlet)?;
        let product = self.create_stream(spec.product)?;
        let byproduct = self.create_stream(spec.byproduct)?;
        let recovery = self.unit_vars.add_recovery(name, &mut self.vars)?;
        Ok(SeparatorPorts {
            inlet,
            product,
            byproduct,
            recovery,
            key: spec.key,
        })
    }

    /// Allocate streams and auxiliary variables and construct the unit.
    fn prepare_unit(&mut self, name: &str, spec: &UnitSpec) -> AssemblyResult<Unit> {
        Self::check_unit_params(spec)?;
        Ok(match spec {
            UnitSpec::Compressor { inlet, outlet } => {
                let inlet = self.create_stream(*inlet)?;
                let outlet = self.create_stream(*outlet)?;
                let work = self.unit_vars.add_work(name, &mut self.vars)?;
                Compressor::new(name, inlet, outlet, work).into()
            }
            UnitSpec::HeatExchanger { inlet, outlet } => {
                let inlet = self.create_stream(*inlet)?;
                let outlet = self.create_stream(*outlet)?;
                let heat = self.unit_vars.add_heat(name, &mut self.vars)?;
                HeatExchanger::new(name, inlet, outlet, heat).into()
            }
            UnitSpec::Splitter {
                inlet,
                product,
                byproduct,
            } => {
                let inlet = self.create_stream(*inlet)?;
                let product = self.create_stream(*product)?;
                let byproduct = self.create_stream(*byproduct)?;
                let split = self.unit_vars.add_split(name, &mut self.vars)?;
                Splitter::new(name, inlet, product, byproduct, split).into()
            }
            UnitSpec::Psa(sep) => {
                let ports = self.separator_ports(name, sep)?;
                Psa::new(name, ports)?.into()
            }
            UnitSpec::Msp(sep) => {
                let ports = self.separator_ports(name, sep)?;
                Msp::new(name, ports)?.into()
            }
            UnitSpec::Cca(sep) => {
                let ports = self.separator_ports(name, sep)?;
                let heat = self.unit_vars.add_heat(name, &mut self.vars)?;
                Cca::new(name, ports, heat).into()
            }
            UnitSpec::Tsa(sep) => {
                let ports = self.separator_ports(name, sep)?;
                let heat = self.unit_vars.add_heat(name, &mut self.vars)?;
                let sorbent = self.unit_vars.add_sorbent(name, &mut self.vars)?;
                Tsa::new(
                    name,
                    ports,
                    SorbentVars {
                        heat,
                        mass_flow: sorbent.mass_flow,
                        loading_rich: sorbent.loading_rich,
                        loading_lean: sorbent.loading_lean,
                    },
                )
                .into()
            }
        })
    }

    fn prepare_reactor(
        &mut self,
        name: &str,
        inlet: StreamIndex,
        outlet: StreamIndex,
        first: Reaction,
        second: Option<Reaction>,
    ) -> AssemblyResult<Unit> {
        let (first_key, second_key) = self.conversion_keys(name, first, second)?;
        let inlet = self.create_stream(inlet)?;
        let outlet = self.create_stream(outlet)?;
        let heat = self.unit_vars.add_heat(name, &mut self.vars)?;
        let conversion = self.unit_vars.add_conversion(&first_key, &mut self.vars)?;
        let first = ReactionStep::new(first, conversion);
        let second = match second.zip(second_key) {
            Some((reaction, key)) => {
                let conversion = self.unit_vars.add_conversion(&key, &mut self.vars)?;
                Some(ReactionStep::new(reaction, conversion))
            }
            None => None,
        };
        Ok(Reactor::new(name, inlet, outlet, heat, first, second).into())
    }

    /// Check that `disjunct` can be placed in `disjunction`.
    fn check_disjunct(&self, disjunction: &str, disjunct: &str) -> AssemblyResult<()> {
        match self.disjunct_groups.get(disjunct) {
            Some(existing) if existing != disjunction => Err(AssemblyError::DisjunctGroupConflict {
                disjunct: disjunct.to_string(),
                existing: existing.clone(),
                requested: disjunction.to_string(),
            }),
            _ => Ok(()),
        }
    }

    /// Return the disjunct, creating it (and its group) on first use.
    fn ensure_disjunct(&mut self, disjunction: &str, disjunct: &str) -> AssemblyResult<&mut Disjunct> {
        self.check_disjunct(disjunction, disjunct)?;
        if !self.disjunct_groups.contains_key(disjunct) {
            let indicator = self.vars.add_binary(format!("{disjunct}.indicator"));
            let (group, created) = self
                .disjunctions
                .upsert_with(disjunction.to_string(), || OpenDisjunction::new(disjunction));
            group
                .disjuncts
                .push(Disjunct::new(disjunct, disjunction, indicator));
            self.disjunct_groups
                .insert(disjunct.to_string(), disjunction.to_string());
            debug!(disjunction, disjunct, new_group = created, "disjunct created");
        }
        self.disjunct_mut(disjunct)
    }

    fn disjunct_mut(&mut self, disjunct: &str) -> AssemblyResult<&mut Disjunct> {
        let group = self
            .disjunct_groups
            .get(disjunct)
            .ok_or_else(|| AssemblyError::UnknownDisjunct(disjunct.to_string()))?;
        self.disjunctions
            .get_mut(group.as_str())
            .and_then(|g| g.get_mut(disjunct))
            .ok_or_else(|| AssemblyError::UnknownDisjunct(disjunct.to_string()))
    }

    /// Build the unit's block and register it.
    fn place(&mut self, unit: Unit, placement: Placement<'_>) -> AssemblyResult<()> {
        let block = unit.build(&self.vars)?;
        let name = unit.name().to_string();
        let disjunct = match placement {
            Placement::TopLevel => None,
            Placement::Disjunct {
                disjunction,
                disjunct,
            } => {
                self.ensure_disjunct(disjunction, disjunct)?
                    .units
                    .push(name.clone());
                Some(disjunct.to_string())
            }
        };
        debug!(
            unit = %name,
            kind = unit.type_label(),
            constraints = block.len(),
            disjunct = disjunct.as_deref().unwrap_or("-"),
            "unit created"
        );
        self.units.insert_new(
            "unit",
            name,
            UnitEntry {
                unit,
                block,
                disjunct,
            },
        )?;
        Ok(())
    }

    /// Add a unit to the model unconditionally.
    pub fn create_unit(&mut self, name: &str, spec: UnitSpec) -> AssemblyResult<()> {
        self.ensure_unit_name_free(name)?;
        let unit = self.prepare_unit(name, &spec)?;
        self.place(unit, Placement::TopLevel)
    }

    /// Add a two-inlet mixer with the default pressure policy.
    pub fn mix_streams(
        &mut self,
        name: &str,
        inlet_1: impl Into<StreamIndex>,
        inlet_2: impl Into<StreamIndex>,
        outlet: impl Into<StreamIndex>,
    ) -> AssemblyResult<()> {
        self.mix_streams_with(name, inlet_1, inlet_2, outlet, MixerPressure::default())
    }

    pub fn mix_streams_with(
        &mut self,
        name: &str,
        inlet_1: impl Into<StreamIndex>,
        inlet_2: impl Into<StreamIndex>,
        outlet: impl Into<StreamIndex>,
        pressure: MixerPressure,
    ) -> AssemblyResult<()> {
        self.ensure_unit_name_free(name)?;
        let a = self.create_stream(inlet_1)?;
        let b = self.create_stream(inlet_2)?;
        let o = self.create_stream(outlet)?;
        let mixer = Mixer::new(name, a, b, o).with_pressure(pressure);
        self.place(mixer.into(), Placement::TopLevel)
    }

    /// Add a conversion reactor. Conversion variables are keyed by the unit
    /// name followed by the reaction key.
    pub fn create_reactor(
        &mut self,
        name: &str,
        inlet: impl Into<StreamIndex>,
        outlet: impl Into<StreamIndex>,
        first: Reaction,
        second: Option<Reaction>,
    ) -> AssemblyResult<()> {
        self.ensure_unit_name_free(name)?;
        let unit = self.prepare_reactor(name, inlet.into(), outlet.into(), first, second)?;
        self.place(unit, Placement::TopLevel)
    }

    /// Build a unit inside a disjunct of `disjunction`.
    pub fn create_disjunct_unit(
        &mut self,
        disjunction: &str,
        disjunct: &str,
        name: &str,
        spec: UnitSpec,
    ) -> AssemblyResult<()> {
        self.ensure_unit_name_free(name)?;
        self.check_disjunct(disjunction, disjunct)?;
        let unit = self.prepare_unit(name, &spec)?;
        self.place(
            unit,
            Placement::Disjunct {
                disjunction,
                disjunct,
            },
        )
    }

    #[allow(clippy::too_many_arguments)]
    pub fn create_disjunct_reactor(
        &mut self,
        disjunction: &str,
        disjunct: &str,
        name: &str,
        inlet: impl Into<StreamIndex>,
        outlet: impl Into<StreamIndex>,
        first: Reaction,
        second: Option<Reaction>,
    ) -> AssemblyResult<()> {
        self.ensure_unit_name_free(name)?;
        self.check_disjunct(disjunction, disjunct)?;
        let unit = self.prepare_reactor(name, inlet.into(), outlet.into(), first, second)?;
        self.place(
            unit,
            Placement::Disjunct {
                disjunction,
                disjunct,
            },
        )
    }

    pub fn unit(&self, name: &str) -> Option<&UnitEntry> {
        self.units.get(name)
    }

    // ---- author constraints -----------------------------------------------

    /// Flowsheet-specific top-level relation.
    pub fn add_constraint(&mut self, constraint: Constraint) {
        self.blocks.constraints.add(constraint);
    }

    /// Relation enforced only when `disjunct` is selected.
    pub fn add_disjunct_constraint(
        &mut self,
        disjunct: &str,
        constraint: Constraint,
    ) -> AssemblyResult<()> {
        self.disjunct_mut(disjunct)?.constraints.add(constraint);
        Ok(())
    }

    // ---- connectors -------------------------------------------------------

    /// Declare connector variables. Declaring one twice is an error.
    pub fn declare_connectors(
        &mut self,
        connectors: impl IntoIterator<Item = Connector>,
    ) -> AssemblyResult<()> {
        for c in connectors {
            let var = self
                .vars
                .add(format!("connect_lp[{c}]"), CONNECTOR_BOUNDS, 0.0)?;
            self.connectors.insert_new(
                "connector",
                c,
                ConnectorEntry {
                    var,
                    top_level: false,
                    disjuncts: Vec::new(),
                },
            )?;
        }
        Ok(())
    }

    pub fn connector(&self, c: Connector) -> AssemblyResult<VarId> {
        self.connectors
            .get(&c)
            .map(|e| e.var)
            .ok_or_else(|| AssemblyError::UndeclaredConnector(c.to_string()))
    }

    /// Connector terms keyed by intermediate-flow name, for
    /// [`LifeCycleInventory::construct_flow_constraints`].
    pub fn connector_terms(&self) -> HashMap<String, Expr> {
        self.connectors
            .iter()
            .map(|(c, e)| (c.flow_name().to_string(), Expr::var(e.var)))
            .collect()
    }

    /// Pin a connector at top level: `connector == value`.
    pub fn define_connector(&mut self, c: Connector, value: impl Into<Expr>) -> AssemblyResult<()> {
        let entry = self
            .connectors
            .get_mut(&c)
            .ok_or_else(|| AssemblyError::UndeclaredConnector(c.to_string()))?;
        if entry.top_level || !entry.disjuncts.is_empty() {
            return Err(AssemblyError::ConnectorRedefined(c.to_string()));
        }
        entry.top_level = true;
        let var = entry.var;
        self.blocks
            .connector_definitions
            .add_eq(format!("define[{c}]"), Expr::var(var), value);
        Ok(())
    }

    /// Pin a connector only while `disjunct` is selected.
    pub fn define_connector_in_disjunct(
        &mut self,
        disjunct: &str,
        c: Connector,
        value: impl Into<Expr>,
    ) -> AssemblyResult<()> {
        // Resolve the disjunct first so an unknown name leaves the entry untouched.
        self.disjunct_mut(disjunct)?;
        let entry = self
            .connectors
            .get_mut(&c)
            .ok_or_else(|| AssemblyError::UndeclaredConnector(c.to_string()))?;
        if entry.top_level || entry.disjuncts.iter().any(|d| d == disjunct) {
            return Err(AssemblyError::ConnectorRedefined(c.to_string()));
        }
        entry.disjuncts.push(disjunct.to_string());
        let var = entry.var;
        self.disjunct_mut(disjunct)?
            .constraints
            .add_eq(format!("define[{c}]"), Expr::var(var), value);
        Ok(())
    }

    // ---- inventory --------------------------------------------------------

    /// Allocate an inventory in this model's variable store at this model's scale.
    pub fn set_up_inventory(
        &mut self,
        name: impl Into<String>,
        data: InventoryData,
    ) -> AssemblyResult<LifeCycleInventory> {
        Ok(LifeCycleInventory::set_up(name, data, self.scale, &mut self.vars)?)
    }

    /// Attach a fully constructed inventory. Its objective becomes the model
    /// objective unless one was set explicitly.
    pub fn import_inventory(&mut self, lci: LifeCycleInventory) -> AssemblyResult<()> {
        if self.inventory.is_some() {
            return Err(AssemblyError::InventoryAlreadyImported);
        }
        if lci.scale() != self.scale {
            return Err(AssemblyError::ScaleMismatch {
                flowsheet: self.scale,
                inventory: lci.scale(),
            });
        }
        if !lci.is_flow_built() {
            return Err(AssemblyError::InventoryIncomplete {
                what: "flow constraints not built",
            });
        }
        if lci.objective().is_none() {
            return Err(AssemblyError::InventoryIncomplete {
                what: "objective not built",
            });
        }
        self.check_coupling(&lci)?;
        info!(
            model = %self.name,
            inventory = lci.name(),
            processes = lci.processes().len(),
            "inventory imported"
        );
        self.inventory = Some(lci);
        Ok(())
    }

    /// Each declared connector must enter the inventory row it names, and
    /// the inventory must carry no connector term the flowsheet lacks.
    fn check_coupling(&self, lci: &LifeCycleInventory) -> AssemblyResult<()> {
        let coupled = lci.connected_flows();
        if let Some(c) = self
            .connectors
            .keys()
            .find(|c| !coupled.iter().any(|f| f == c.flow_name()))
        {
            return Err(AssemblyError::ConnectorNotCoupled(c.to_string()));
        }
        if let Some(flow) = coupled
            .iter()
            .find(|f| !self.connectors.keys().any(|c| c.flow_name() == f.as_str()))
        {
            return Err(AssemblyError::UnknownCoupling(flow.clone()));
        }
        Ok(())
    }

    pub fn inventory(&self) -> Option<&LifeCycleInventory> {
        self.inventory.as_ref()
    }

    // ---- objective and helpers -------------------------------------------

    pub fn set_objective(&mut self, objective: Objective) {
        self.objective = Some(objective);
    }

    pub fn total_work(&self) -> Expr {
        self.unit_vars.total_work()
    }

    pub fn total_heat(&self) -> Expr {
        self.unit_vars.total_heat()
    }

    /// f_el·Σw + f_heat·Σq.
    pub fn utility_impact(&self, factors: &ImpactFactors) -> Expr {
        factors.electricity * self.total_work() + factors.heat * self.total_heat()
    }

    /// n·y_k·M_k of one stream [kg/s].
    pub fn mass_flow(&self, index: impl Into<StreamIndex>, k: Substance) -> AssemblyResult<Expr> {
        let s = self.stream(index)?;
        Ok(s.component_flow(k) * k.molar_weight())
    }

    /// n·M_mix for a stream carrying a reference mixture.
    pub fn mixture_mass_flow(
        &self,
        index: impl Into<StreamIndex>,
        mixture: ReferenceMixture,
    ) -> AssemblyResult<Expr> {
        let s = self.stream(index)?;
        Ok(s.n() * mixture.molar_weight())
    }

    /// Plant-level parameter expressed in scaled units.
    pub fn scaled(&self, value: f64) -> f64 {
        value / self.scale
    }

    // ---- finalisation -----------------------------------------------------

    /// A connector needs a definition at top level, or one in every disjunct
    /// of each disjunction it is defined in.
    fn check_connector_definitions(&self) -> AssemblyResult<()> {
        for (c, entry) in self.connectors.iter() {
            if !entry.top_level && entry.disjuncts.is_empty() {
                return Err(AssemblyError::ConnectorUndefined(c.to_string()));
            }
            let siblings = entry
                .disjuncts
                .iter()
                .filter_map(|d| self.disjunct_groups.get(d))
                .filter_map(|group| self.disjunctions.get(group.as_str()))
                .flat_map(|group| group.disjuncts.iter());
            for sibling in siblings {
                if !entry.disjuncts.contains(&sibling.name) {
                    return Err(AssemblyError::ConnectorUndefinedInDisjunct {
                        connector: c.to_string(),
                        disjunct: sibling.name.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Finalise every disjunction and freeze the model.
    pub fn create_disjunctions(self) -> AssemblyResult<AssembledModel> {
        self.check_connector_definitions()?;
        if let Some(lci) = &self.inventory {
            self.check_coupling(lci)?;
        }
        let objective = match (self.objective, &self.inventory) {
            (Some(obj), _) => obj,
            (None, Some(lci)) => lci
                .objective()
                .cloned()
                .ok_or(AssemblyError::MissingObjective)?,
            (None, None) => return Err(AssemblyError::MissingObjective),
        };
        let disjunctions = self
            .disjunctions
            .into_values()
            .map(OpenDisjunction::finalize)
            .collect::<AssemblyResult<Vec<_>>>()?;

        info!(
            model = %self.name,
            streams = self.streams.len(),
            units = self.units.len(),
            disjunctions = disjunctions.len(),
            variables = self.vars.len(),
            "superstructure finalised"
        );

        let connectors = self
            .connectors
            .iter()
            .map(|(&c, e)| (c, e.var))
            .collect();

        Ok(AssembledModel::new(
            self.name,
            self.scale,
            self.vars,
            self.streams.into_values().collect(),
            self.units.into_values().collect(),
            self.unit_vars,
            disjunctions,
            self.blocks.into_vec(),
            connectors,
            self.inventory,
            objective,
        ))
    }
}
