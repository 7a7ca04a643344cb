#![allow(dead_code)]

use candle_core::{DType, Device};
use candle_nn::VarBuilder;
use herolens_classifiers::{Architecture, Predictor};
use herolens_core::default_classes;
use herolens_server::{AppState, ServerConfig};
use image::{ImageFormat, Rgb, RgbImage};
use std::io::Cursor;

pub const BOUNDARY: &str = "herolens-test-boundary";

/// ResNet-18 with all-zero weights: uniform probabilities, label "batman"
pub fn zero_predictor() -> Predictor {
    let vb = VarBuilder::zeros(DType::F32, &Device::Cpu);
    Predictor::from_var_builder("zeros", Architecture::Resnet18, default_classes(), vb).unwrap()
}

/// App state whose page and static files live in `dir`
pub fn test_state(dir: &std::path::Path) -> AppState {
    let view = dir.join("view");
    let static_dir = dir.join("static");
    std::fs::create_dir_all(&view).unwrap();
    std::fs::create_dir_all(&static_dir).unwrap();
    std::fs::write(view.join("index.html"), "<html><body><form id=\"upload\"></form></body></html>").unwrap();
    std::fs::write(static_dir.join("client.js"), "console.log('hi');").unwrap();

    let config = ServerConfig {
        model_dir: dir.to_path_buf(),
        static_dir,
        index_path: view.join("index.html"),
        ..Default::default()
    };
    AppState::new(zero_predictor(), config)
}

pub fn png_bytes() -> Vec<u8> {
    let img = RgbImage::from_fn(96, 64, |x, y| Rgb([(x * 2) as u8, (y * 3) as u8, 128]));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, ImageFormat::Png).unwrap();
    out.into_inner()
}

/// Content type and body of a single-field multipart form
pub fn multipart_body(field: &str, data: &[u8]) -> (String, Vec<u8>) {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"upload.png\"\r\nContent-Type: application/octet-stream\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    (format!("multipart/form-data; boundary={BOUNDARY}"), body)
}
