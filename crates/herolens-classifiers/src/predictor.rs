//! In-memory image classifier

use crate::model_loader::Architecture;
use crate::preprocess::{decode_image, image_to_tensor, INPUT_SIZE};
use candle_core::{Device, Module, Tensor, D};
use candle_nn::{Func, VarBuilder};
use herolens_core::{Error, Prediction, Result};
use image::DynamicImage;
use std::time::Instant;

/// A loaded classifier and the labels for its outputs.
///
/// Immutable once built; share it behind an `Arc`.
pub struct Predictor {
    name: String,
    model: Func<'static>,
    device: Device,
    classes: Vec<String>,
}

impl std::fmt::Debug for Predictor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Predictor")
            .field("name", &self.name)
            .field("device", &self.device)
            .field("classes", &self.classes)
            .finish_non_exhaustive()
    }
}

impl Predictor {
    /// Wrap an already-built forward function
    pub fn new(name: impl Into<String>, model: Func<'static>, device: Device, classes: Vec<String>) -> Self {
        Self {
            name: name.into(),
            model,
            device,
            classes,
        }
    }

    /// Build the network for `architecture` from a weight source
    pub fn from_var_builder(
        name: impl Into<String>,
        architecture: Architecture,
        classes: Vec<String>,
        vb: VarBuilder<'static>,
    ) -> candle_core::Result<Self> {
        let device = vb.device().clone();
        let model = architecture.build(classes.len(), vb)?;
        Ok(Self::new(name, model, device, classes))
    }

    /// Model name, usually the artifact file stem
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Class labels in model output order
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    /// Device the weights live on
    pub fn device(&self) -> &Device {
        &self.device
    }

    /// Decode raw bytes and classify them
    pub fn predict_bytes(&self, bytes: &[u8]) -> Result<Prediction> {
        let img = decode_image(bytes)?;
        self.predict(&img)
    }

    /// Classify a decoded image
    pub fn predict(&self, img: &DynamicImage) -> Result<Prediction> {
        let input = image_to_tensor(img, INPUT_SIZE, &self.device)?;
        self.predict_tensor(&input)
    }

    /// Run the forward pass on a prepared `(1, 3, H, W)` tensor
    pub fn predict_tensor(&self, input: &Tensor) -> Result<Prediction> {
        let start = Instant::now();

        let probabilities = self
            .forward_probabilities(input)
            .map_err(|e| Error::inference(format!("Model forward pass failed: {}", e)))?;

        let mut prediction = Prediction::from_probabilities(&self.classes, probabilities).ok_or_else(|| {
            Error::inference(format!(
                "Model produced a different number of outputs than the {} configured classes",
                self.classes.len()
            ))
        })?;
        prediction.latency_us = start.elapsed().as_micros() as u64;

        tracing::debug!(
            label = %prediction.label,
            confidence = prediction.confidence(),
            latency_us = prediction.latency_us,
            "Classified image"
        );

        Ok(prediction)
    }

    fn forward_probabilities(&self, input: &Tensor) -> candle_core::Result<Vec<f32>> {
        let logits = self.model.forward(input)?;
        candle_nn::ops::softmax(&logits, D::Minus1)?
            .squeeze(0)?
            .to_vec1::<f32>()
    }
}
