//! Image decoding and tensor preparation

use candle_core::{DType, Device, Tensor};
use herolens_core::{Error, Result};
use image::DynamicImage;

/// Side length of the square input the ResNet models expect
pub const INPUT_SIZE: u32 = 224;

// ImageNet normalization constants
const MEAN: [f32; 3] = [0.485, 0.456, 0.406];
const STD: [f32; 3] = [0.229, 0.224, 0.225];

/// Decode raw upload bytes into an image.
///
/// Any format the `image` crate recognizes is accepted; nothing else is checked.
pub fn decode_image(bytes: &[u8]) -> Result<DynamicImage> {
    image::load_from_memory(bytes).map_err(|e| Error::decode(format!("Failed to decode image: {}", e)))
}

/// Convert an image into a normalized `(1, 3, size, size)` f32 tensor
pub fn image_to_tensor(img: &DynamicImage, size: u32, device: &Device) -> Result<Tensor> {
    let rgb = img
        .resize_exact(size, size, image::imageops::FilterType::Triangle)
        .to_rgb8();
    let side = size as usize;

    let build = || -> candle_core::Result<Tensor> {
        let mean = Tensor::new(&MEAN, device)?.reshape((3, 1, 1))?;
        let std = Tensor::new(&STD, device)?.reshape((3, 1, 1))?;

        // HWC bytes -> CHW floats in [0, 1]
        let data = Tensor::from_vec(rgb.into_raw(), (side, side, 3), device)?
            .permute((2, 0, 1))?
            .to_dtype(DType::F32)?;
        let data = (data / 255.)?;

        data.broadcast_sub(&mean)?
            .broadcast_div(&std)?
            .unsqueeze(0)
    };

    build().map_err(|e| Error::inference(format!("Failed to create input tensor: {}", e)))
}
