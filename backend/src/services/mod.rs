//! Business logic services for the Agro-Climate Advisory Platform

pub mod alert;
pub mod analysis;
pub mod forecast;
pub mod observation;
pub mod prediction;

pub use alert::AlertDispatcher;
pub use analysis::AnalysisService;
pub use forecast::ForecastService;
pub use observation::ObservationService;
pub use prediction::PredictionService;
