use foundation::ids::{BufferId, TextureId};

use crate::ledger::Residency;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GpuError {
    #[error("unknown or already released buffer {0:?}")]
    UnknownBuffer(BufferId),
    #[error("unknown or already released texture {0:?}")]
    UnknownTexture(TextureId),
    #[error("refusing to allocate empty buffer {label:?}")]
    EmptyBuffer { label: String },
    #[error("allocation of {requested} bytes exceeds budget ({resident} of {limit} bytes resident)")]
    OutOfMemory {
        requested: usize,
        resident: usize,
        limit: usize,
    },
    #[error("image {width}x{height} has {len} bytes, expected {expected}")]
    InvalidImage {
        width: u32,
        height: u32,
        len: usize,
        expected: usize,
    },
    #[error("gpu backend error: {0}")]
    Backend(String),
}

/// Decoded RGBA8 image ready for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
}

impl DecodedImage {
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self, GpuError> {
        let expected = width as usize * height as usize * 4;
        if width == 0 || height == 0 || pixels.len() != expected {
            return Err(GpuError::InvalidImage {
                width,
                height,
                len: pixels.len(),
                expected,
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Single-color image, handy as a placeholder covering.
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Result<Self, GpuError> {
        let pixels = rgba
            .iter()
            .copied()
            .cycle()
            .take(width as usize * height as usize * 4)
            .collect();
        Self::new(width, height, pixels)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn byte_size(&self) -> usize {
        self.pixels.len()
    }
}

/// Resource seam between the render session and a GPU.
///
/// Every `create_*` must be paired with exactly one `release_*`; releasing an
/// id twice is an error rather than a silent no-op so leaks and double frees
/// both surface in tests.
pub trait GpuResources {
    fn create_vertex_buffer(&mut self, label: &str, data: &[f32]) -> Result<BufferId, GpuError>;
    fn create_texture(&mut self, label: &str, image: &DecodedImage)
    -> Result<TextureId, GpuError>;
    fn release_buffer(&mut self, id: BufferId) -> Result<(), GpuError>;
    fn release_texture(&mut self, id: TextureId) -> Result<(), GpuError>;
    fn residency(&self) -> Residency;
}

#[cfg(test)]
mod tests {
    use super::{DecodedImage, GpuError};

    #[test]
    fn image_length_must_match_dimensions() {
        assert!(DecodedImage::new(2, 2, vec![0; 16]).is_ok());
        assert_eq!(
            DecodedImage::new(2, 2, vec![0; 15]),
            Err(GpuError::InvalidImage {
                width: 2,
                height: 2,
                len: 15,
                expected: 16
            })
        );
        assert!(DecodedImage::new(0, 2, vec![]).is_err());
    }

    #[test]
    fn solid_image_repeats_color() {
        let img = DecodedImage::solid(2, 1, [1, 2, 3, 4]).unwrap();
        assert_eq!(img.pixels(), &[1, 2, 3, 4, 1, 2, 3, 4]);
        assert_eq!(img.byte_size(), 8);
    }
}
