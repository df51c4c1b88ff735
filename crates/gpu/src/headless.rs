use foundation::ids::{BufferId, TextureId};

use crate::ledger::{Residency, ResidencyLedger};
use crate::resources::{DecodedImage, GpuError, GpuResources};

/// Bookkeeping-only backend for tests and native tools.
///
/// Allocations are accounted exactly as a real device would see them, and an
/// optional byte budget stands in for VRAM exhaustion.
#[derive(Debug, Default)]
pub struct HeadlessGpu {
    ledger: ResidencyLedger,
    memory_limit: Option<usize>,
}

impl HeadlessGpu {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_memory_limit(limit: usize) -> Self {
        Self {
            ledger: ResidencyLedger::new(),
            memory_limit: Some(limit),
        }
    }

    pub fn buffer_bytes(&self, id: BufferId) -> Option<usize> {
        self.ledger.buffer_bytes(id)
    }

    pub fn texture_bytes(&self, id: TextureId) -> Option<usize> {
        self.ledger.texture_bytes(id)
    }

    fn reserve(&self, requested: usize) -> Result<(), GpuError> {
        let Some(limit) = self.memory_limit else {
            return Ok(());
        };
        let resident = self.ledger.residency().total_bytes();
        if resident + requested > limit {
            return Err(GpuError::OutOfMemory {
                requested,
                resident,
                limit,
            });
        }
        Ok(())
    }
}

impl GpuResources for HeadlessGpu {
    fn create_vertex_buffer(&mut self, label: &str, data: &[f32]) -> Result<BufferId, GpuError> {
        if data.is_empty() {
            return Err(GpuError::EmptyBuffer {
                label: label.to_string(),
            });
        }
        let bytes = std::mem::size_of_val(data);
        self.reserve(bytes)?;
        Ok(self.ledger.track_buffer(bytes))
    }

    fn create_texture(
        &mut self,
        _label: &str,
        image: &DecodedImage,
    ) -> Result<TextureId, GpuError> {
        self.reserve(image.byte_size())?;
        Ok(self.ledger.track_texture(image.byte_size()))
    }

    fn release_buffer(&mut self, id: BufferId) -> Result<(), GpuError> {
        self.ledger.untrack_buffer(id).map(|_| ())
    }

    fn release_texture(&mut self, id: TextureId) -> Result<(), GpuError> {
        self.ledger.untrack_texture(id).map(|_| ())
    }

    fn residency(&self) -> Residency {
        self.ledger.residency()
    }
}

#[cfg(test)]
mod tests {
    use super::HeadlessGpu;
    use crate::resources::{DecodedImage, GpuError, GpuResources};

    #[test]
    fn buffer_bytes_follow_f32_layout() {
        let mut gpu = HeadlessGpu::new();
        let id = gpu.create_vertex_buffer("pts", &[0.0; 9]).unwrap();
        assert_eq!(gpu.buffer_bytes(id), Some(36));
        assert_eq!(gpu.residency().buffer_bytes, 36);
        gpu.release_buffer(id).unwrap();
        assert_eq!(gpu.residency().buffers, 0);
    }

    #[test]
    fn empty_buffers_are_rejected() {
        let mut gpu = HeadlessGpu::new();
        assert!(matches!(
            gpu.create_vertex_buffer("empty", &[]),
            Err(GpuError::EmptyBuffer { .. })
        ));
    }

    #[test]
    fn memory_limit_is_enforced() {
        let mut gpu = HeadlessGpu::with_memory_limit(40);
        let a = gpu.create_vertex_buffer("a", &[0.0; 6]).unwrap();
        let err = gpu.create_vertex_buffer("b", &[0.0; 6]).unwrap_err();
        assert_eq!(
            err,
            GpuError::OutOfMemory {
                requested: 24,
                resident: 24,
                limit: 40
            }
        );
        gpu.release_buffer(a).unwrap();
        assert!(gpu.create_vertex_buffer("b", &[0.0; 6]).is_ok());
    }

    #[test]
    fn textures_are_accounted() {
        let mut gpu = HeadlessGpu::new();
        let img = DecodedImage::solid(4, 2, [0, 0, 0, 255]).unwrap();
        let t = gpu.create_texture("tex", &img).unwrap();
        assert_eq!(gpu.texture_bytes(t), Some(32));
        gpu.release_texture(t).unwrap();
        assert_eq!(gpu.release_texture(t), Err(GpuError::UnknownTexture(t)));
    }
}
