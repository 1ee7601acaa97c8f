//! Algebraic constraints, named constraint containers and objectives.

use std::fmt;

use crate::expr::Expr;
use sf_core::Tolerances;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    Eq,
    Le,
    Ge,
}

impl fmt::Display for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Relation::Eq => "==",
            Relation::Le => "<=",
            Relation::Ge => ">=",
        };
        f.write_str(s)
    }
}

/// `lhs <relation> rhs`.
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    pub name: String,
    pub lhs: Expr,
    pub relation: Relation,
    pub rhs: Expr,
}

impl Constraint {
    pub fn new(
        name: impl Into<String>,
        lhs: impl Into<Expr>,
        relation: Relation,
        rhs: impl Into<Expr>,
    ) -> Self {
        Self {
            name: name.into(),
            lhs: lhs.into(),
            relation,
            rhs: rhs.into(),
        }
    }

    pub fn eq(name: impl Into<String>, lhs: impl Into<Expr>, rhs: impl Into<Expr>) -> Self {
        Self::new(name, lhs, Relation::Eq, rhs)
    }

    pub fn le(name: impl Into<String>, lhs: impl Into<Expr>, rhs: impl Into<Expr>) -> Self {
        Self::new(name, lhs, Relation::Le, rhs)
    }

    pub fn ge(name: impl Into<String>, lhs: impl Into<Expr>, rhs: impl Into<Expr>) -> Self {
        Self::new(name, lhs, Relation::Ge, rhs)
    }

    /// `lhs - rhs` at the given point.
    pub fn residual(&self, values: &[f64]) -> f64 {
        self.lhs.eval(values) - self.rhs.eval(values)
    }

    /// Amount by which the relation is violated (0 when satisfied, NaN stays NaN).
    pub fn violation(&self, values: &[f64]) -> f64 {
        let r = self.residual(values);
        match self.relation {
            Relation::Eq => r.abs(),
            Relation::Le => r.max(0.0),
            Relation::Ge => (-r).max(0.0),
        }
    }

    /// Satisfied up to `tol.abs + tol.rel * max(1, |lhs|, |rhs|)`.
    pub fn is_satisfied(&self, values: &[f64], tol: Tolerances) -> bool {
        let lhs = self.lhs.eval(values);
        let rhs = self.rhs.eval(values);
        let v = self.violation(values);
        if !v.is_finite() || !lhs.is_finite() || !rhs.is_finite() {
            return false;
        }
        v <= tol.abs + tol.rel * lhs.abs().max(rhs.abs()).max(1.0)
    }

    pub fn is_linear(&self) -> bool {
        self.lhs.is_linear() && self.rhs.is_linear()
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} {} {}", self.name, self.lhs, self.relation, self.rhs)
    }
}

/// A named, append-only list of constraints owned by one model component.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConstraintBlock {
    name: String,
    constraints: Vec<Constraint>,
}

impl ConstraintBlock {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            constraints: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn add(&mut self, constraint: Constraint) {
        self.constraints.push(constraint);
    }

    pub fn add_eq(&mut self, name: impl Into<String>, lhs: impl Into<Expr>, rhs: impl Into<Expr>) {
        self.add(Constraint::eq(name, lhs, rhs));
    }

    pub fn add_le(&mut self, name: impl Into<String>, lhs: impl Into<Expr>, rhs: impl Into<Expr>) {
        self.add(Constraint::le(name, lhs, rhs));
    }

    pub fn add_ge(&mut self, name: impl Into<String>, lhs: impl Into<Expr>, rhs: impl Into<Expr>) {
        self.add(Constraint::ge(name, lhs, rhs));
    }

    /// Move every constraint of `other` into this block.
    pub fn absorb(&mut self, other: ConstraintBlock) {
        self.constraints.extend(other.constraints);
    }

    pub fn len(&self) -> usize {
        self.constraints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Constraint> {
        self.constraints.iter()
    }

    /// First constraint with the given name.
    pub fn get(&self, name: &str) -> Option<&Constraint> {
        self.constraints.iter().find(|c| c.name == name)
    }

    /// Constraints not satisfied at `values`.
    pub fn violated<'a>(
        &'a self,
        values: &'a [f64],
        tol: Tolerances,
    ) -> impl Iterator<Item = &'a Constraint> + 'a {
        self.constraints
            .iter()
            .filter(move |c| !c.is_satisfied(values, tol))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sense {
    Minimize,
    Maximize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Objective {
    pub expr: Expr,
    pub sense: Sense,
}

impl Objective {
    pub fn minimize(expr: impl Into<Expr>) -> Self {
        Self {
            expr: expr.into(),
            sense: Sense::Minimize,
        }
    }

    pub fn maximize(expr: impl Into<Expr>) -> Self {
        Self {
            expr: expr.into(),
            sense: Sense::Maximize,
        }
    }

    pub fn value(&self, values: &[f64]) -> f64 {
        self.expr.eval(values)
    }
}
