//! MRI brain tumor classification.
//!
//! An uploaded JPEG/PNG scan is decoded and normalized to a `[1, 128, 128, 3]`
//! tensor, run through an ONNX classifier that is downloaded into a local
//! cache on first use, and reported as one of four [`ClassLabel`]s together
//! with per-class probabilities.

pub mod core;
pub mod inference;
pub mod models;
pub mod preprocessing;
pub mod presentation;
pub mod tasks;
pub mod ui;

#[cfg(any(test, feature = "test-support"))]
pub mod testing;

pub use crate::core::{AppConfig, ClassLabel, ClassifierError, Result};
pub use crate::presentation::PredictionResult;
pub use crate::tasks::TumorDetector;
