//! Symbolic algebraic expressions over decision variables.

use std::collections::BTreeSet;
use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

use sf_core::VarId;

/// Expression tree. Built with the arithmetic operators on `Expr`, `VarId` and `f64`.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Const(f64),
    Var(VarId),
    Sum(Vec<Expr>),
    Product(Box<Expr>, Box<Expr>),
    Quotient(Box<Expr>, Box<Expr>),
    Power(Box<Expr>, Box<Expr>),
    Neg(Box<Expr>),
}

impl Expr {
    pub fn constant(v: f64) -> Self {
        Expr::Const(v)
    }

    pub fn var(id: VarId) -> Self {
        Expr::Var(id)
    }

    pub fn zero() -> Self {
        Expr::Const(0.0)
    }

    /// Sum of an arbitrary sequence of terms; an empty sequence is `0`.
    pub fn sum<I>(terms: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Expr>,
    {
        let terms: Vec<Expr> = terms.into_iter().map(Into::into).collect();
        match terms.len() {
            0 => Expr::zero(),
            1 => terms.into_iter().next().unwrap_or_else(Expr::zero),
            _ => Expr::Sum(terms),
        }
    }

    pub fn powf(self, exponent: impl Into<Expr>) -> Self {
        Expr::Power(Box::new(self), Box::new(exponent.into()))
    }

    pub fn powi(self, exponent: i32) -> Self {
        self.powf(f64::from(exponent))
    }

    /// Evaluate with `values[id.slot()]` as the value of each variable.
    ///
    /// Missing entries evaluate to NaN so that a wrongly sized assignment shows
    /// up as a violated constraint instead of a panic.
    pub fn eval(&self, values: &[f64]) -> f64 {
        match self {
            Expr::Const(c) => *c,
            Expr::Var(id) => values.get(id.slot()).copied().unwrap_or(f64::NAN),
            Expr::Sum(terms) => terms.iter().map(|t| t.eval(values)).sum(),
            Expr::Product(a, b) => a.eval(values) * b.eval(values),
            Expr::Quotient(a, b) => a.eval(values) / b.eval(values),
            Expr::Power(base, exp) => {
                let e = exp.eval(values);
                if e.fract() == 0.0 && e.abs() <= i32::MAX as f64 {
                    base.eval(values).powi(e as i32)
                } else {
                    base.eval(values).powf(e)
                }
            }
            Expr::Neg(a) => -a.eval(values),
        }
    }

    /// All variables referenced by this expression.
    pub fn variables(&self) -> BTreeSet<VarId> {
        let mut out = BTreeSet::new();
        self.collect_vars(&mut out);
        out
    }

    fn collect_vars(&self, out: &mut BTreeSet<VarId>) {
        match self {
            Expr::Const(_) => {}
            Expr::Var(id) => {
                out.insert(*id);
            }
            Expr::Sum(terms) => terms.iter().for_each(|t| t.collect_vars(out)),
            Expr::Product(a, b) | Expr::Quotient(a, b) | Expr::Power(a, b) => {
                a.collect_vars(out);
                b.collect_vars(out);
            }
            Expr::Neg(a) => a.collect_vars(out),
        }
    }

    /// True when the expression contains no products/quotients/powers of variables.
    pub fn is_linear(&self) -> bool {
        match self {
            Expr::Const(_) | Expr::Var(_) => true,
            Expr::Sum(terms) => terms.iter().all(Expr::is_linear),
            Expr::Neg(a) => a.is_linear(),
            Expr::Product(a, b) => {
                (a.is_constant() && b.is_linear()) || (b.is_constant() && a.is_linear())
            }
            Expr::Quotient(a, b) => a.is_linear() && b.is_constant(),
            Expr::Power(a, b) => a.is_constant() && b.is_constant(),
        }
    }

    pub fn is_constant(&self) -> bool {
        self.variables().is_empty()
    }
}

impl From<f64> for Expr {
    fn from(v: f64) -> Self {
        Expr::Const(v)
    }
}

impl From<VarId> for Expr {
    fn from(id: VarId) -> Self {
        Expr::Var(id)
    }
}

impl From<&Expr> for Expr {
    fn from(e: &Expr) -> Self {
        e.clone()
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Const(c) => write!(f, "{c}"),
            Expr::Var(id) => write!(f, "x{id}"),
            Expr::Sum(terms) => {
                write!(f, "(")?;
                for (i, t) in terms.iter().enumerate() {
                    if i > 0 {
                        write!(f, " + ")?;
                    }
                    write!(f, "{t}")?;
                }
                write!(f, ")")
            }
            Expr::Product(a, b) => write!(f, "{a}*{b}"),
            Expr::Quotient(a, b) => write!(f, "{a}/({b})"),
            Expr::Power(a, b) => write!(f, "({a})^({b})"),
            Expr::Neg(a) => write!(f, "-{a}"),
        }
    }
}

fn flatten_sum(lhs: Expr, rhs: Expr) -> Expr {
    let mut terms = match lhs {
        Expr::Sum(t) => t,
        other => vec![other],
    };
    match rhs {
        Expr::Sum(t) => terms.extend(t),
        other => terms.push(other),
    }
    Expr::Sum(terms)
}

impl<R: Into<Expr>> Add<R> for Expr {
    type Output = Expr;
    fn add(self, rhs: R) -> Expr {
        flatten_sum(self, rhs.into())
    }
}

impl<R: Into<Expr>> Sub<R> for Expr {
    type Output = Expr;
    fn sub(self, rhs: R) -> Expr {
        let rhs: Expr = rhs.into();
        flatten_sum(self, -rhs)
    }
}

impl<R: Into<Expr>> Mul<R> for Expr {
    type Output = Expr;
    fn mul(self, rhs: R) -> Expr {
        Expr::Product(Box::new(self), Box::new(rhs.into()))
    }
}

impl<R: Into<Expr>> Div<R> for Expr {
    type Output = Expr;
    fn div(self, rhs: R) -> Expr {
        Expr::Quotient(Box::new(self), Box::new(rhs.into()))
    }
}

impl Neg for Expr {
    type Output = Expr;
    fn neg(self) -> Expr {
        match self {
            Expr::Const(c) => Expr::Const(-c),
            Expr::Neg(inner) => *inner,
            other => Expr::Neg(Box::new(other)),
        }
    }
}

impl Add<Expr> for f64 {
    type Output = Expr;
    fn add(self, rhs: Expr) -> Expr {
        Expr::Const(self) + rhs
    }
}

impl Sub<Expr> for f64 {
    type Output = Expr;
    fn sub(self, rhs: Expr) -> Expr {
        Expr::Const(self) - rhs
    }
}

impl Mul<Expr> for f64 {
    type Output = Expr;
    fn mul(self, rhs: Expr) -> Expr {
        Expr::Const(self) * rhs
    }
}

impl Div<Expr> for f64 {
    type Output = Expr;
    fn div(self, rhs: Expr) -> Expr {
        Expr::Const(self) / rhs
    }
}
