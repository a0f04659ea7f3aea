//! Catalog entity models and their database access methods.
//!
//! Hierarchy: Brand -> Model -> Generation -> Trim, with an optional
//! 1:1 powertrain extension per trim.

mod brand;
mod generation;
mod model;
mod trim;

pub use brand::{Brand, CreateBrand, UpdateBrand};
pub use generation::{CreateGeneration, Generation};
pub use model::{CreateModel, Model, UpdateModel};
pub use trim::{CreateTrim, CreateTrimPowertrain, Trim, TrimPowertrain};
