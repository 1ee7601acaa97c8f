//! sf-lci: background life-cycle-inventory linear sub-model.
//!
//! Provides:
//! - Technology-matrix loading and validation (`InventoryTable`, `InventoryData`)
//! - The inventory LP block (`LifeCycleInventory`): flow definitions, capacity and
//!   demand constraints, deactivations, activity caps, impact objective
//! - Named scenarios (`Scenario`) and declarative set-up (`InventoryConfig`)

pub mod config;
pub mod data;
pub mod error;
pub mod inventory;
pub mod scenario;

pub use config::{ActivityCap, InventoryConfig, ScenarioConfig};
pub use data::{InventoryData, InventoryTable, clean_name, disambiguate, one_dimensional};
pub use error::{InventoryError, InventoryResult};
pub use inventory::{LifeCycleInventory, UNSCALED_LIMIT};
pub use scenario::{
    GRID_MIX_2020, HIGH_TRL_CCU_COUNT, Scenario, ScenarioAction, USER_DEFINED_ELECTRICITY,
    WIND_POWER,
};
