use crate::core::errors::Result;
use crate::core::image_sample::ImageSample;
use crate::core::tensor::{ImageTensor, INPUT_CHANNELS, INPUT_HEIGHT, INPUT_WIDTH};
use image::imageops::{self, FilterType};

/// Resampling filter applied before inference. Part of the artifact's
/// preprocessing contract: changing it changes model output.
pub const RESIZE_FILTER: FilterType = FilterType::CatmullRom;

/// Turns uploads into `[1, 128, 128, 3]` tensors scaled to `[0, 1]`.
#[derive(Debug, Clone)]
pub struct ImageNormalizer {
    width: u32,
    height: u32,
    max_upload_bytes: u64,
}

impl ImageNormalizer {
    pub fn new(max_upload_bytes: u64) -> Self {
        Self {
            width: INPUT_WIDTH as u32,
            height: INPUT_HEIGHT as u32,
            max_upload_bytes,
        }
    }

    pub fn normalize(&self, raw_image_bytes: &[u8]) -> Result<ImageTensor> {
        let sample = ImageSample::decode(raw_image_bytes, self.max_upload_bytes)?;
        Ok(self.normalize_sample(&sample))
    }

    pub fn normalize_sample(&self, sample: &ImageSample) -> ImageTensor {
        let resized = imageops::resize(sample.pixels(), self.width, self.height, RESIZE_FILTER);

        ImageTensor::from_shape_fn(
            (1, self.height as usize, self.width as usize, INPUT_CHANNELS),
            |(_, y, x, c)| {
                let p = resized.get_pixel(x as u32, y as u32);
                p[c] as f32 / 255.0
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::errors::ClassifierError;
    use crate::core::tensor::MODEL_INPUT_SHAPE;
    use image::{DynamicImage, GrayImage, ImageFormat, Luma, Rgb, RgbImage};
    use std::io::Cursor;

    fn png(img: DynamicImage) -> Vec<u8> {
        let mut buf = Cursor::new(Vec::new());
        img.write_to(&mut buf, ImageFormat::Png).unwrap();
        buf.into_inner()
    }

    fn gradient_gray(w: u32, h: u32) -> DynamicImage {
        DynamicImage::ImageLuma8(GrayImage::from_fn(w, h, |x, y| {
            Luma([((x * 7 + y * 3) % 256) as u8])
        }))
    }

    #[test]
    fn output_has_model_shape_and_unit_range() {
        let normalizer = ImageNormalizer::new(u64::MAX);
        for (w, h) in [(100, 100), (300, 40), (1, 1), (128, 128)] {
            let tensor = normalizer.normalize(&png(gradient_gray(w, h))).unwrap();
            assert_eq!(tensor.shape(), &MODEL_INPUT_SHAPE);
            assert!(tensor.iter().all(|v| (0.0..=1.0).contains(v)));
        }
    }

    #[test]
    fn grayscale_input_yields_identical_channels() {
        let normalizer = ImageNormalizer::new(u64::MAX);
        let tensor = normalizer.normalize(&png(gradient_gray(100, 100))).unwrap();
        for y in 0..INPUT_HEIGHT {
            for x in 0..INPUT_WIDTH {
                let r = tensor[[0, y, x, 0]];
                assert_eq!(r, tensor[[0, y, x, 1]]);
                assert_eq!(r, tensor[[0, y, x, 2]]);
            }
        }
    }

    #[test]
    fn scales_by_255() {
        let normalizer = ImageNormalizer::new(u64::MAX);
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(128, 128, Rgb([0, 51, 255])));
        let tensor = normalizer.normalize(&png(img)).unwrap();
        assert_eq!(tensor[[0, 5, 9, 0]], 0.0);
        assert!((tensor[[0, 5, 9, 1]] - 0.2).abs() < 1e-6);
        assert_eq!(tensor[[0, 5, 9, 2]], 1.0);
    }

    #[test]
    fn is_deterministic() {
        let normalizer = ImageNormalizer::new(u64::MAX);
        let bytes = png(gradient_gray(77, 131));
        let a = normalizer.normalize(&bytes).unwrap();
        let b = normalizer.normalize(&bytes).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn surfaces_decode_errors() {
        let normalizer = ImageNormalizer::new(u64::MAX);
        assert!(matches!(
            normalizer.normalize(b"%PDF-1.7 not a raster"),
            Err(ClassifierError::Decode(_))
        ));
    }
}
