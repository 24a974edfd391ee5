mod fixed_output_classifier;
mod static_http_server;

pub use fixed_output_classifier::FixedOutputClassifier;
pub use static_http_server::{CannedResponse, StaticHttpServer};
