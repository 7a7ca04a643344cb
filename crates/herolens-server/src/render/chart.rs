//! Probability bar chart rendering

use herolens_core::{Error, Result};
use plotters::prelude::*;
use resvg::{tiny_skia, usvg};
use std::sync::Arc;

/// Bar fill color, drawn at [`BAR_ALPHA`]
pub const BAR_COLOR: RGBColor = RGBColor(0x70, 0x52, 0xCB);

/// Bar opacity
pub const BAR_ALPHA: f64 = 0.5;

/// Chart size in pixels (10 x 5 inches at 100 dpi)
pub const CHART_SIZE: (u32, u32) = (1000, 500);

/// Font embedded for chart labels so output does not depend on the host
const CHART_FONT: &[u8] = include_bytes!("../../assets/DejaVuSans.ttf");

/// Family name of [`CHART_FONT`]
const CHART_FONT_FAMILY: &str = "DejaVu Sans";

/// Draws probability charts and rasterizes them to PNG.
///
/// Holds the font database so it is built once, not per request.
#[derive(Clone)]
pub struct ChartRenderer {
    fontdb: Arc<usvg::fontdb::Database>,
}

impl Default for ChartRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl ChartRenderer {
    /// Create a renderer that draws labels with the embedded font.
    ///
    /// The SVG names generic families (`sans-serif`), which fontdb resolves
    /// to Arial unless told otherwise, so both generics point at the
    /// embedded face.
    pub fn new() -> Self {
        let mut fontdb = usvg::fontdb::Database::new();
        fontdb.load_font_data(CHART_FONT.to_vec());
        fontdb.set_sans_serif_family(CHART_FONT_FAMILY);
        fontdb.set_serif_family(CHART_FONT_FAMILY);
        tracing::debug!("Chart renderer loaded {} font faces", fontdb.len());
        Self::with_fontdb(fontdb)
    }

    /// Create a renderer with a caller-provided font database
    pub fn with_fontdb(fontdb: usvg::fontdb::Database) -> Self {
        Self {
            fontdb: Arc::new(fontdb),
        }
    }

    /// Render a horizontal bar chart of `probabilities` as PNG bytes.
    ///
    /// One bar per class, first class at the top.
    pub fn render_png(&self, classes: &[String], probabilities: &[f32]) -> Result<Vec<u8>> {
        let svg = draw_svg(classes, probabilities)?;
        self.rasterize(&svg)
    }

    fn rasterize(&self, svg: &str) -> Result<Vec<u8>> {
        let options = usvg::Options {
            fontdb: self.fontdb.clone(),
            ..Default::default()
        };
        let tree = usvg::Tree::from_str(svg, &options)
            .map_err(|e| Error::render(format!("Failed to parse chart SVG: {}", e)))?;

        let size = tree.size().to_int_size();
        let mut pixmap = tiny_skia::Pixmap::new(size.width(), size.height())
            .ok_or_else(|| Error::render("Chart has zero size"))?;
        resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());

        pixmap
            .encode_png()
            .map_err(|e| Error::render(format!("Failed to encode chart PNG: {}", e)))
    }
}

/// Draw the chart as an SVG document
pub fn draw_svg(classes: &[String], probabilities: &[f32]) -> Result<String> {
    if classes.len() != probabilities.len() {
        return Err(Error::render(format!(
            "{} classes but {} probabilities",
            classes.len(),
            probabilities.len()
        )));
    }

    let mut svg = String::new();
    draw(&mut svg, classes, probabilities)
        .map_err(|e| Error::render(format!("Failed to draw chart: {}", e)))?;
    Ok(svg)
}

fn draw(
    buf: &mut String,
    classes: &[String],
    probabilities: &[f32],
) -> std::result::Result<(), Box<dyn std::error::Error>> {
    let n = classes.len();
    let root = SVGBackend::with_string(buf, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    // Row r holds class n - 1 - r so the first class is drawn at the top
    let row_of = |class: usize| (n - 1 - class) as f32;
    let label = |y: &f32| {
        let row = y.round();
        if (y - row).abs() > 1e-3 || row < 0.0 || row >= n as f32 {
            return String::new();
        }
        classes[n - 1 - row as usize].clone()
    };

    let mut chart = ChartBuilder::on(&root)
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(140)
        .build_cartesian_2d(0f32..1f32, -0.5f32..(n as f32 - 0.5))?;

    chart
        .configure_mesh()
        .disable_y_mesh()
        // Dense enough that every integer row gets a tick; the rest stay blank
        .y_labels(2 * n)
        .y_label_formatter(&label)
        .x_labels(6)
        .x_desc("probability")
        .draw()?;

    let style = BAR_COLOR.mix(BAR_ALPHA).filled();
    chart.draw_series(probabilities.iter().enumerate().map(|(i, p)| {
        let y = row_of(i);
        Rectangle::new([(0f32, y - 0.4), (p.clamp(0.0, 1.0), y + 0.4)], style)
    }))?;

    root.present()?;
    Ok(())
}
