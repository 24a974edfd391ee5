mod engine;

pub use engine::{InferenceEngine, PROBABILITY_SUM_TOLERANCE};
