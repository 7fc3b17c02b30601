//! HTTP handlers

pub mod analysis;
pub mod forecast;
pub mod health;
pub mod observation;
pub mod prediction;
pub mod reference;

pub use analysis::*;
pub use forecast::*;
pub use health::*;
pub use observation::*;
pub use prediction::*;
pub use reference::*;
