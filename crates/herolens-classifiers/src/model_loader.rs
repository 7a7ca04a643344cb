//! Model loading for Candle-based image classifiers

use crate::predictor::Predictor;
use candle_core::{DType, Device};
use candle_nn::{Func, VarBuilder};
use candle_transformers::models::resnet;
use herolens_core::{default_classes, Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

/// Marker the backend puts in errors for artifacts that need an accelerator
pub const CPU_ONLY_MARKER: &str = "CPU-only machine";

/// Operator-facing replacement for accelerator-only load failures
pub const REMEDIATION_MESSAGE: &str = "\n\nThis model was exported from an outdated training environment and will not work in a CPU environment.\n\nPlease update the training libraries in your training environment and export your model again.\n\nSee the model export instructions in the project README.";

/// Network architecture stored in the artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Architecture {
    Resnet18,
    #[default]
    Resnet34,
    Resnet50,
}

impl Architecture {
    /// Build the network with `num_classes` outputs
    pub fn build(self, num_classes: usize, vb: VarBuilder<'static>) -> candle_core::Result<Func<'static>> {
        match self {
            Self::Resnet18 => resnet::resnet18(num_classes, vb),
            Self::Resnet34 => resnet::resnet34(num_classes, vb),
            Self::Resnet50 => resnet::resnet50(num_classes, vb),
        }
    }
}

/// Model file format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ModelFormat {
    /// SafeTensors format (recommended)
    #[default]
    SafeTensors,
    /// PyTorch state dict
    PyTorch,
}

/// Configuration for loading the classifier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Network architecture
    #[serde(default)]
    pub architecture: Architecture,

    /// Weights file format
    #[serde(default)]
    pub format: ModelFormat,

    /// Device to run inference on: `cpu`, `cuda`, `cuda:N`, `metal`, `metal:N`
    #[serde(default = "default_device")]
    pub device: String,

    /// Class labels in model output order
    #[serde(default = "default_classes")]
    pub classes: Vec<String>,
}

fn default_device() -> String {
    "cpu".to_string()
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            architecture: Architecture::default(),
            format: ModelFormat::default(),
            device: default_device(),
            classes: default_classes(),
        }
    }
}

impl ModelConfig {
    /// Set architecture
    pub fn with_architecture(mut self, architecture: Architecture) -> Self {
        self.architecture = architecture;
        self
    }

    /// Set model format
    pub fn with_format(mut self, format: ModelFormat) -> Self {
        self.format = format;
        self
    }

    /// Set device
    pub fn with_device(mut self, device: impl Into<String>) -> Self {
        self.device = device.into();
        self
    }

    /// Set class labels
    pub fn with_classes(mut self, classes: Vec<String>) -> Self {
        self.classes = classes;
        self
    }
}

/// Create a Candle device from its configured name
pub fn create_device(name: &str) -> candle_core::Result<Device> {
    let (kind, ordinal) = match name.split_once(':') {
        Some((kind, idx)) => {
            let idx = idx
                .parse::<usize>()
                .map_err(|_| candle_core::Error::msg(format!("invalid device ordinal in '{}'", name)))?;
            (kind, idx)
        }
        None => (name, 0),
    };

    match kind {
        "cpu" => Ok(Device::Cpu),
        "cuda" => Device::new_cuda(ordinal),
        "metal" | "mps" => Device::new_metal(ordinal),
        other => Err(candle_core::Error::msg(format!("unknown device '{}'", other))),
    }
}

/// Deserializes an artifact into a [`Predictor`].
///
/// Errors are returned as raw backend errors so the loader can decide how to
/// present them.
pub trait ArtifactDecoder: Send + Sync {
    fn decode(&self, path: &Path, config: &ModelConfig) -> candle_core::Result<Predictor>;
}

/// Production decoder backed by Candle's ResNet implementations
#[derive(Debug, Clone, Copy, Default)]
pub struct CandleDecoder;

impl ArtifactDecoder for CandleDecoder {
    fn decode(&self, path: &Path, config: &ModelConfig) -> candle_core::Result<Predictor> {
        let device = create_device(&config.device)?;
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("model")
            .to_string();

        let (vb, classes) = match config.format {
            ModelFormat::SafeTensors => {
                let data = std::fs::read(path)?;
                let classes = classes_from_metadata(&data)?.unwrap_or_else(|| config.classes.clone());
                let vb = VarBuilder::from_buffered_safetensors(data, DType::F32, &device)?;
                (vb, classes)
            }
            ModelFormat::PyTorch => {
                let vb = VarBuilder::from_pth(path, DType::F32, &device)?;
                (vb, config.classes.clone())
            }
        };

        tracing::debug!(
            "Building {:?} with {} classes on {:?}",
            config.architecture,
            classes.len(),
            device
        );
        Predictor::from_var_builder(name, config.architecture, classes, vb)
    }
}

/// Read the `classes` entry from a SafeTensors header, if present.
///
/// The entry is a JSON array of strings written by the export script.
fn classes_from_metadata(data: &[u8]) -> candle_core::Result<Option<Vec<String>>> {
    let (_, metadata) = safetensors::SafeTensors::read_metadata(data)?;
    let Some(raw) = metadata.metadata().as_ref().and_then(|m| m.get("classes")) else {
        return Ok(None);
    };
    let classes: Vec<String> = serde_json::from_str(raw)
        .map_err(|e| candle_core::Error::msg(format!("invalid classes metadata: {}", e)))?;
    Ok(Some(classes))
}

/// True when the backend could not load the artifact without an accelerator.
///
/// Structured Candle errors are checked first. The text match is a
/// compatibility shim for backends that only report the condition in their
/// message.
pub fn is_accelerator_only(err: &candle_core::Error) -> bool {
    match err {
        candle_core::Error::NotCompiledWithCudaSupport
        | candle_core::Error::NotCompiledWithMetalSupport => true,
        candle_core::Error::WithBacktrace { inner, .. } => is_accelerator_only(inner),
        other => other.to_string().contains(CPU_ONLY_MARKER),
    }
}

/// Map a backend load error to the error reported to the operator
pub fn translate_load_error(err: candle_core::Error) -> Error {
    if is_accelerator_only(&err) {
        tracing::error!("{}", err);
        Error::IncompatibleArtifact(REMEDIATION_MESSAGE.to_string())
    } else {
        Error::ModelLoad(err.to_string())
    }
}

/// Loads the artifact into a [`Predictor`]
#[derive(Clone)]
pub struct ModelLoader {
    config: ModelConfig,
    decoder: Arc<dyn ArtifactDecoder>,
}

impl ModelLoader {
    /// Create a loader that decodes with Candle
    pub fn new(config: ModelConfig) -> Self {
        Self::with_decoder(config, CandleDecoder)
    }

    /// Create a loader with a custom decoder
    pub fn with_decoder(config: ModelConfig, decoder: impl ArtifactDecoder + 'static) -> Self {
        Self {
            config,
            decoder: Arc::new(decoder),
        }
    }

    /// Loader configuration
    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    /// Load `dir/filename`.
    ///
    /// Accelerator-only artifacts fail with [`Error::IncompatibleArtifact`]
    /// carrying [`REMEDIATION_MESSAGE`]; every other failure is reported as
    /// [`Error::ModelLoad`] with the backend text unchanged.
    pub fn load(&self, dir: &Path, filename: &str) -> Result<Predictor> {
        let path = dir.join(filename);
        if !path.exists() {
            return Err(Error::model_load(format!("Model file not found: {}", path.display())));
        }

        tracing::info!("Loading model from {}", path.display());
        let predictor = self
            .decoder
            .decode(&path, &self.config)
            .map_err(translate_load_error)?;

        tracing::info!(
            "Loaded model '{}' with {} classes",
            predictor.name(),
            predictor.classes().len()
        );
        Ok(predictor)
    }
}
