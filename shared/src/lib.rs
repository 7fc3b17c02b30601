//! Shared types, models and the pure engine for the Agro-Climate Advisory Platform
//!
//! This crate contains the records and computations shared between the
//! backend, the browser (via WASM), and other components of the system.

pub mod engine;
pub mod models;
pub mod types;
pub mod validation;

pub use engine::*;
pub use models::*;
pub use types::*;
pub use validation::*;
