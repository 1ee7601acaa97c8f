//! Technology-matrix data.
//!
//! `InventoryTable` is the serialisable, unchecked form produced by an external
//! loader; `InventoryData` is the validated form the linear model is built from.

use std::collections::HashMap;
use std::path::Path;

use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};
use sf_core::ensure_finite;

use crate::error::{InventoryError, InventoryResult};

/// Raw inventory as parsed from a spreadsheet export.
///
/// `matrix` is row-major with one row per intermediate flow and one column per
/// process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryTable {
    pub processes: Vec<String>,
    pub flows: Vec<String>,
    pub matrix: Vec<Vec<f64>>,
    /// Production capacity per flow.
    pub capacity: Vec<f64>,
    /// Elementary-flow (impact) coefficient per process.
    pub elementary: Vec<f64>,
    /// End-of-life impact per flow.
    pub end_of_life: Vec<f64>,
}

impl InventoryTable {
    pub fn from_yaml_str(s: &str) -> InventoryResult<Self> {
        Ok(serde_yaml::from_str(s)?)
    }

    pub fn from_json_str(s: &str) -> InventoryResult<Self> {
        Ok(serde_json::from_str(s)?)
    }
}

/// Validated technology matrix with disambiguated names.
#[derive(Debug, Clone, PartialEq)]
pub struct InventoryData {
    processes: Vec<String>,
    flows: Vec<String>,
    matrix: DMatrix<f64>,
    capacity: Vec<f64>,
    elementary: Vec<f64>,
    end_of_life: Vec<f64>,
}

fn check_len(what: &str, got: usize, expected: usize) -> InventoryResult<()> {
    if got != expected {
        return Err(InventoryError::Dimension {
            what: format!("{what} has {got} entries, expected {expected}"),
        });
    }
    Ok(())
}

fn check_finite(what: &'static str, values: &[f64]) -> InventoryResult<()> {
    for &v in values {
        ensure_finite(v, what)?;
    }
    Ok(())
}

impl InventoryData {
    pub fn new(
        processes: Vec<String>,
        flows: Vec<String>,
        matrix: DMatrix<f64>,
        capacity: Vec<f64>,
        elementary: Vec<f64>,
        end_of_life: Vec<f64>,
    ) -> InventoryResult<Self> {
        let (m, n) = matrix.shape();
        check_len("flow names", flows.len(), m)?;
        check_len("process names", processes.len(), n)?;
        check_len("capacity vector", capacity.len(), m)?;
        check_len("end-of-life vector", end_of_life.len(), m)?;
        check_len("elementary-flow vector", elementary.len(), n)?;
        check_finite("technology matrix", matrix.as_slice())?;
        check_finite("capacity", &capacity)?;
        check_finite("elementary", &elementary)?;
        check_finite("end_of_life", &end_of_life)?;

        let processes = disambiguate(processes.iter().map(|s| clean_name(s)));
        let flows = disambiguate(flows.iter().map(|s| clean_name(s)));
        Ok(Self {
            processes,
            flows,
            matrix,
            capacity,
            elementary,
            end_of_life,
        })
    }

    pub fn load_yaml(path: &Path) -> InventoryResult<Self> {
        let content = std::fs::read_to_string(path)?;
        InventoryTable::from_yaml_str(&content)?.try_into()
    }

    pub fn load_json(path: &Path) -> InventoryResult<Self> {
        let content = std::fs::read_to_string(path)?;
        InventoryTable::from_json_str(&content)?.try_into()
    }

    pub fn processes(&self) -> &[String] {
        &self.processes
    }

    pub fn flows(&self) -> &[String] {
        &self.flows
    }

    pub fn matrix(&self) -> &DMatrix<f64> {
        &self.matrix
    }

    pub fn capacity(&self) -> &[f64] {
        &self.capacity
    }

    pub fn elementary(&self) -> &[f64] {
        &self.elementary
    }

    pub fn end_of_life(&self) -> &[f64] {
        &self.end_of_life
    }

    /// Coefficients of one intermediate flow across all processes.
    pub fn row(&self, flow: usize) -> InventoryResult<Vec<f64>> {
        if flow >= self.flows.len() {
            return Err(InventoryError::Dimension {
                what: format!("row {flow} out of {}", self.flows.len()),
            });
        }
        one_dimensional(&self.matrix.rows(flow, 1).into_owned())
    }
}

impl TryFrom<InventoryTable> for InventoryData {
    type Error = InventoryError;

    fn try_from(t: InventoryTable) -> InventoryResult<Self> {
        let m = t.matrix.len();
        let n = t.processes.len();
        let mut flat = Vec::with_capacity(m * n);
        for (u, row) in t.matrix.iter().enumerate() {
            check_len(&format!("matrix row {u}"), row.len(), n)?;
            flat.extend_from_slice(row);
        }
        let matrix = DMatrix::from_row_slice(m, n, &flat);
        Self::new(
            t.processes,
            t.flows,
            matrix,
            t.capacity,
            t.elementary,
            t.end_of_life,
        )
    }
}

/// Flatten a row or column matrix into a vector.
pub fn one_dimensional(a: &DMatrix<f64>) -> InventoryResult<Vec<f64>> {
    let (rows, cols) = a.shape();
    if rows.min(cols) != 1 {
        return Err(InventoryError::NotOneDimensional { rows, cols });
    }
    Ok(a.iter().copied().collect())
}

/// Rename repeated names: the second occurrence of `x` becomes `x (2)`, the
/// third `x (3)`, and so on. First occurrences are kept.
pub fn disambiguate<I, S>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut seen: HashMap<String, usize> = HashMap::new();
    names
        .into_iter()
        .map(|name| {
            let name = name.into();
            let count = seen.entry(name.clone()).or_insert(0);
            *count += 1;
            if *count == 1 {
                name
            } else {
                format!("{name} ({count})")
            }
        })
        .collect()
}

/// Strip spreadsheet quoting: `'name'` and `'name` become `name`.
///
/// With a single apostrophe the longer side is kept.
pub fn clean_name(raw: &str) -> String {
    let parts: Vec<&str> = raw.split('\'').collect();
    match parts.as_slice() {
        [only] => only.to_string(),
        [a, b] if a.len() > b.len() => a.to_string(),
        [_, b] => b.to_string(),
        [_, inner, ..] => inner.to_string(),
        [] => String::new(),
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn disambiguated_names_are_unique(raw in prop::collection::vec("[abc]", 0..30)) {
            let names = disambiguate(raw.iter().cloned());
            prop_assert_eq!(names.len(), raw.len());
            let unique: std::collections::HashSet<_> = names.iter().collect();
            prop_assert_eq!(unique.len(), names.len());
            for (n, r) in names.iter().zip(&raw) {
                prop_assert!(n.starts_with(r.as_str()));
            }
        }
    }
}
