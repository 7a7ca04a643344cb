//! HeroLens Core
//!
//! Types shared by the HeroLens classifier and server crates:
//! - The error type and result alias
//! - Prediction results and the default class list

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::{default_classes, Prediction, DEFAULT_CLASSES};
