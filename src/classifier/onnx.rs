// src/classifier/onnx.rs
//! ONNX Runtime classifier backend

use crate::classifier::adapter::Classifier;
use crate::error::{ClassifierStage, GestureErrorBuilder, GestureResult};
use ndarray::ArrayView3;
use ort::session::Session;
use std::path::Path;
use tracing::info;

const COMPONENT: &str = "onnx_classifier";

/// Classifier running an ONNX model with a single `[batch, rows, width]` input
pub struct OnnxClassifier {
    session: Session,
    input_name: String,
    output_name: String,
}

impl OnnxClassifier {
    pub fn load(path: &Path) -> GestureResult<Self> {
        let error = |reason: String| GestureErrorBuilder::new(COMPONENT, "load").classifier(ClassifierStage::Load, &reason);

        let session = Session::builder()
            .and_then(|builder| builder.commit_from_file(path))
            .map_err(|e| error(format!("{}: {}", path.display(), e)))?;
        let input_name = session
            .inputs
            .first()
            .map(|input| input.name.clone())
            .ok_or_else(|| error("model declares no inputs".to_string()))?;
        let output_name = session
            .outputs
            .first()
            .map(|output| output.name.clone())
            .ok_or_else(|| error("model declares no outputs".to_string()))?;

        info!(model = %path.display(), input = %input_name, output = %output_name, "model loaded");
        Ok(Self {
            session,
            input_name,
            output_name,
        })
    }
}

impl Classifier for OnnxClassifier {
    fn predict(&mut self, input: ArrayView3<'_, f32>) -> GestureResult<Vec<f32>> {
        let error = |reason: String| {
            GestureErrorBuilder::new(COMPONENT, "predict").classifier(ClassifierStage::Invoke, &reason)
        };

        let shape = input.shape().to_vec();
        let data: Vec<f32> = input.iter().copied().collect();
        let value = ort::value::Value::from_array((shape, data)).map_err(|e| error(e.to_string()))?;

        let outputs = self
            .session
            .run(ort::inputs![self.input_name.as_str() => &value])
            .map_err(|e| error(e.to_string()))?;
        let (_, probabilities) = outputs[self.output_name.as_str()]
            .try_extract_tensor::<f32>()
            .map_err(|e| error(e.to_string()))?;
        Ok(probabilities.to_vec())
    }
}
