//! Technology alternatives and exactly-one groups.
//!
//! A group accumulates disjuncts while the superstructure is being declared
//! (`OpenDisjunction`) and is turned into an immutable [`Disjunction`] when the
//! superstructure is consumed by finalisation.

use sf_core::VarId;
use sf_expr::{Constraint, ConstraintBlock, Expr};

use crate::error::{AssemblyError, AssemblyResult};

/// Indicator values above this count as selected.
pub const SELECTED_THRESHOLD: f64 = 0.5;

/// Container for the constraints of one alternative.
#[derive(Debug, Clone, PartialEq)]
pub struct Disjunct {
    pub name: String,
    pub disjunction: String,
    /// Binary indicator; 1 when this alternative is selected.
    pub indicator: VarId,
    /// Units whose blocks live inside this disjunct, in declaration order.
    pub units: Vec<String>,
    /// Author-supplied constraints and connector definitions.
    pub constraints: ConstraintBlock,
}

impl Disjunct {
    pub(crate) fn new(name: &str, disjunction: &str, indicator: VarId) -> Self {
        Self {
            name: name.to_string(),
            disjunction: disjunction.to_string(),
            indicator,
            units: Vec::new(),
            constraints: ConstraintBlock::new(format!("{name}.constraints")),
        }
    }

    pub fn is_selected(&self, values: &[f64]) -> bool {
        values
            .get(self.indicator.slot())
            .is_some_and(|&v| v > SELECTED_THRESHOLD)
    }
}

#[derive(Debug, Clone)]
pub(crate) struct OpenDisjunction {
    pub(crate) name: String,
    pub(crate) disjuncts: Vec<Disjunct>,
}

impl OpenDisjunction {
    pub(crate) fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            disjuncts: Vec::new(),
        }
    }

    pub(crate) fn get_mut(&mut self, disjunct: &str) -> Option<&mut Disjunct> {
        self.disjuncts.iter_mut().find(|d| d.name == disjunct)
    }

    pub(crate) fn finalize(self) -> AssemblyResult<Disjunction> {
        if self.disjuncts.len() < 2 {
            return Err(AssemblyError::TooFewDisjuncts {
                disjunction: self.name,
                count: self.disjuncts.len(),
            });
        }
        Ok(Disjunction {
            name: self.name,
            disjuncts: self.disjuncts,
        })
    }
}

/// A finalised group of mutually exclusive disjuncts.
#[derive(Debug, Clone, PartialEq)]
pub struct Disjunction {
    name: String,
    disjuncts: Vec<Disjunct>,
}

impl Disjunction {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn disjuncts(&self) -> &[Disjunct] {
        &self.disjuncts
    }

    /// Σ indicators = 1.
    pub fn exactly_one(&self) -> Constraint {
        Constraint::eq(
            format!("{}.exactly_one", self.name),
            Expr::sum(self.disjuncts.iter().map(|d| Expr::var(d.indicator))),
            1.0,
        )
    }

    /// The selected member, if exactly one indicator is set.
    pub fn selected(&self, values: &[f64]) -> Option<&Disjunct> {
        let mut chosen = self.disjuncts.iter().filter(|d| d.is_selected(values));
        match (chosen.next(), chosen.next()) {
            (Some(d), None) => Some(d),
            _ => None,
        }
    }
}
