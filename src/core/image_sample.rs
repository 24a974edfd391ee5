use crate::core::errors::{ClassifierError, Result};
use image::{ImageFormat, RgbImage};

/// A decoded upload, always held as 8-bit RGB.
#[derive(Debug, Clone)]
pub struct ImageSample {
    format: ImageFormat,
    byte_len: usize,
    pixels: RgbImage,
}

impl ImageSample {
    pub const SUPPORTED_FORMATS: [ImageFormat; 2] = [ImageFormat::Jpeg, ImageFormat::Png];

    /// Decodes `bytes` as JPEG or PNG, sniffing the format from its magic
    /// number. Alpha is dropped and grayscale is replicated to three channels.
    pub fn decode(bytes: &[u8], max_bytes: u64) -> Result<Self> {
        if bytes.is_empty() {
            return Err(ClassifierError::Decode("upload is empty".into()));
        }
        if bytes.len() as u64 > max_bytes {
            return Err(ClassifierError::Decode(format!(
                "upload is {} bytes, limit is {max_bytes}",
                bytes.len()
            )));
        }

        let format = image::guess_format(bytes)
            .map_err(|_| ClassifierError::Decode("unrecognized image format".into()))?;
        if !Self::SUPPORTED_FORMATS.contains(&format) {
            return Err(ClassifierError::Decode(format!(
                "{format:?} images are not supported, expected JPEG or PNG"
            )));
        }

        let decoded = image::load_from_memory_with_format(bytes, format)
            .map_err(|e| ClassifierError::Decode(e.to_string()))?;

        Ok(Self {
            format,
            byte_len: bytes.len(),
            pixels: decoded.to_rgb8(),
        })
    }

    #[inline]
    pub fn format(&self) -> ImageFormat {
        self.format
    }

    #[inline]
    pub fn byte_len(&self) -> usize {
        self.byte_len
    }

    #[inline]
    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    #[inline]
    pub fn pixels(&self) -> &RgbImage {
        &self.pixels
    }
}
