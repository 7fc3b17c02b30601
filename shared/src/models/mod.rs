//! Domain models for the agro-climate advisory engine

mod anomaly;
mod climate;
mod forecast;
mod observation;
mod pattern;
mod prediction;

pub use anomaly::*;
pub use climate::*;
pub use forecast::*;
pub use observation::*;
pub use pattern::*;
pub use prediction::*;
