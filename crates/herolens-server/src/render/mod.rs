//! Turns an uploaded image into a label and an embeddable chart

pub mod chart;

pub use chart::ChartRenderer;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use herolens_classifiers::Predictor;
use herolens_core::{Prediction, Result};

/// Classify `image_bytes` and render the class probabilities.
///
/// Returns the predicted label and an `<img>` tag with the chart inlined as
/// a base64 PNG.
pub fn render_prediction(
    predictor: &Predictor,
    charts: &ChartRenderer,
    image_bytes: &[u8],
) -> Result<(String, String)> {
    let prediction = predictor.predict_bytes(image_bytes)?;
    let plot = render_plot(predictor, charts, &prediction)?;
    Ok((prediction.label, plot))
}

/// Render the chart for an existing prediction as an `<img>` tag
pub fn render_plot(predictor: &Predictor, charts: &ChartRenderer, prediction: &Prediction) -> Result<String> {
    let png = charts.render_png(predictor.classes(), &prediction.probabilities)?;
    Ok(img_tag(&png))
}

/// Wrap PNG bytes in an `<img>` tag with a data URI
pub fn img_tag(png: &[u8]) -> String {
    format!("<img src='data:image/png;base64,{}'>", STANDARD.encode(png))
}
