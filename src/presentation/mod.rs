mod chart;
mod prediction;
mod presenter;

pub use chart::{DEFAULT_BAR_WIDTH, TextChart, percent};
pub use prediction::{ClassProbability, PredictionResult};
pub use presenter::{ResultPresenter, argmax};
