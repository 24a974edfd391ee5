use tract_onnx::prelude::tract_ndarray::Array4;

pub const INPUT_HEIGHT: usize = 128;
pub const INPUT_WIDTH: usize = 128;
pub const INPUT_CHANNELS: usize = 3;

/// NHWC shape of a single-sample model input.
pub const MODEL_INPUT_SHAPE: [usize; 4] = [1, INPUT_HEIGHT, INPUT_WIDTH, INPUT_CHANNELS];

/// Batched NHWC image tensor with values in `[0, 1]`.
pub type ImageTensor = Array4<f32>;
