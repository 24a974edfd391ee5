pub mod app_config;
pub mod class_label;
pub mod errors;
pub mod image_sample;
pub mod tensor;

pub use app_config::AppConfig;
pub use class_label::ClassLabel;
pub use errors::{ClassifierError, Result};
pub use image_sample::ImageSample;
pub use tensor::{ImageTensor, MODEL_INPUT_SHAPE};
