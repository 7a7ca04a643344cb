//! HeroLens Classifiers
//!
//! Everything between a remote model artifact and a [`Prediction`](herolens_core::Prediction):
//! - [`fetcher`]: downloads the artifact once if it is missing
//! - [`model_loader`]: deserializes it with Candle, translating
//!   accelerator-only failures into an actionable message
//! - [`predictor`]: the immutable classifier shared by all requests
//! - [`preprocess`]: image decoding and tensor preparation

pub mod fetcher;
pub mod model_loader;
pub mod predictor;
pub mod preprocess;

pub use fetcher::{ArtifactFetcher, FetchOutcome};
pub use model_loader::{
    Architecture, ArtifactDecoder, CandleDecoder, ModelConfig, ModelFormat, ModelLoader,
    REMEDIATION_MESSAGE,
};
pub use predictor::Predictor;
