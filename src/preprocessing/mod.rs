mod normalizer;

pub use normalizer::{ImageNormalizer, RESIZE_FILTER};
