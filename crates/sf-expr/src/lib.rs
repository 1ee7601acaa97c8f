//! sf-expr: symbolic model substrate for synflow.
//!
//! Provides:
//! - `VariableStore`: arena of bounded decision variables with current values
//! - `Expr`: algebraic expression trees with operator overloading
//! - `Constraint` / `ConstraintBlock`: named relations and their containers
//! - `Objective`
//!
//! Nothing here solves anything; expressions can only be evaluated at a given
//! point, which is what feasibility checks and reports need.
//!
//! # Example
//!
//! ```
//! use sf_expr::{Bounds, Constraint, Expr, VariableStore};
//! use sf_core::Tolerances;
//!
//! let mut vars = VariableStore::new();
//! let n = vars.add("n[1]", Bounds::new(0.0, 70_000.0), 10.0).unwrap();
//! let c = Constraint::eq("fix_n", Expr::var(n), 10.0);
//! assert!(c.is_satisfied(&vars.values(), Tolerances::feasibility()));
//! ```

pub mod constraint;
pub mod error;
pub mod expr;
pub mod variable;

pub use constraint::{Constraint, ConstraintBlock, Objective, Relation, Sense};
pub use error::{ExprError, ExprResult};
pub use expr::Expr;
pub use variable::{Bounds, Domain, Variable, VariableStore};
