//! HTTP route modules, one per resource, each exposing a `router()`
//! merged into the application router.

pub mod brand;
pub mod generation;
pub mod health;
pub mod model;
pub mod search;
pub mod trim;
