use crate::core::errors::{ClassifierError, Result};
use crate::core::tensor::{ImageTensor, MODEL_INPUT_SHAPE};
use crate::models::classifier::ImageClassifier;
use crate::models::loader::ArtifactLoader;
use std::path::Path;
use std::sync::Arc;
use tract_onnx::prelude::*;

type Plan = TypedRunnableModel<TypedModel>;

/// Classifier backed by an ONNX graph with NHWC `[1, 128, 128, 3]` f32 input.
pub struct OnnxClassifier {
    plan: Plan,
    input_shape: Vec<usize>,
    output_width: usize,
}

impl OnnxClassifier {
    pub fn load(path: &Path) -> Result<Self> {
        let load_err = |e: TractError| ClassifierError::ModelLoad {
            path: path.to_path_buf(),
            reason: format!("{e:#}"),
        };

        let model = tract_onnx::onnx()
            .model_for_path(path)
            .map_err(load_err)?
            .with_input_fact(0, f32::fact(MODEL_INPUT_SHAPE).into())
            .map_err(load_err)?
            .into_optimized()
            .map_err(load_err)?;

        let output_width = model
            .output_fact(0)
            .map_err(load_err)?
            .shape
            .as_concrete()
            .and_then(|dims| dims.last().copied())
            .ok_or_else(|| ClassifierError::ModelLoad {
                path: path.to_path_buf(),
                reason: "output shape is not concrete".into(),
            })?;

        let plan = model.into_runnable().map_err(load_err)?;

        Ok(Self {
            plan,
            input_shape: MODEL_INPUT_SHAPE.to_vec(),
            output_width,
        })
    }
}

impl ImageClassifier for OnnxClassifier {
    fn input_shape(&self) -> &[usize] {
        &self.input_shape
    }

    fn output_width(&self) -> usize {
        self.output_width
    }

    fn forward(&self, tensor: &ImageTensor) -> Result<Vec<f32>> {
        let input: Tensor = tensor.clone().into();
        let outputs = self
            .plan
            .run(tvec!(input.into()))
            .map_err(|e| ClassifierError::Inference(format!("{e:#}")))?;

        let first = outputs
            .first()
            .ok_or_else(|| ClassifierError::Inference("model produced no outputs".into()))?;
        let view = first
            .to_array_view::<f32>()
            .map_err(|e| ClassifierError::Inference(format!("output is not f32: {e}")))?;

        Ok(view.iter().copied().collect())
    }
}

/// Loads ONNX artifacts from disk.
#[derive(Debug, Default, Clone, Copy)]
pub struct OnnxLoader;

impl ArtifactLoader for OnnxLoader {
    fn load(&self, path: &Path) -> Result<Arc<dyn ImageClassifier>> {
        tracing::info!(path = %path.display(), "loading ONNX model");
        let classifier = OnnxClassifier::load(path)?;
        tracing::info!(
            output_width = classifier.output_width(),
            "ONNX model ready"
        );
        Ok(Arc::new(classifier))
    }
}
