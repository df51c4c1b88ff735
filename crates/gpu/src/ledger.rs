use std::collections::BTreeMap;

use foundation::handles::HandleAllocator;
use foundation::ids::{BufferId, TextureId};
use tracing::trace;

use crate::resources::GpuError;

/// Snapshot of what is currently allocated on a backend.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct Residency {
    pub buffers: usize,
    pub buffer_bytes: usize,
    pub textures: usize,
    pub texture_bytes: usize,
}

impl Residency {
    pub fn total_bytes(&self) -> usize {
        self.buffer_bytes + self.texture_bytes
    }
}

/// Id allocation and byte accounting shared by every backend.
///
/// Sorted maps keep iteration (and therefore debug output) stable.
#[derive(Debug, Default)]
pub struct ResidencyLedger {
    handles: HandleAllocator,
    buffers: BTreeMap<BufferId, usize>,
    textures: BTreeMap<TextureId, usize>,
}

impl ResidencyLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn track_buffer(&mut self, bytes: usize) -> BufferId {
        let id = BufferId(self.handles.alloc());
        self.buffers.insert(id, bytes);
        trace!(?id, bytes, "buffer resident");
        id
    }

    /// Forgets `id` and returns the bytes it held.
    pub fn untrack_buffer(&mut self, id: BufferId) -> Result<usize, GpuError> {
        let bytes = self
            .buffers
            .remove(&id)
            .ok_or(GpuError::UnknownBuffer(id))?;
        self.handles.free(id.0);
        trace!(?id, bytes, "buffer released");
        Ok(bytes)
    }

    pub fn track_texture(&mut self, bytes: usize) -> TextureId {
        let id = TextureId(self.handles.alloc());
        self.textures.insert(id, bytes);
        trace!(?id, bytes, "texture resident");
        id
    }

    pub fn untrack_texture(&mut self, id: TextureId) -> Result<usize, GpuError> {
        let bytes = self
            .textures
            .remove(&id)
            .ok_or(GpuError::UnknownTexture(id))?;
        self.handles.free(id.0);
        trace!(?id, bytes, "texture released");
        Ok(bytes)
    }

    pub fn buffer_bytes(&self, id: BufferId) -> Option<usize> {
        self.buffers.get(&id).copied()
    }

    pub fn texture_bytes(&self, id: TextureId) -> Option<usize> {
        self.textures.get(&id).copied()
    }

    pub fn residency(&self) -> Residency {
        Residency {
            buffers: self.buffers.len(),
            buffer_bytes: self.buffers.values().sum(),
            textures: self.textures.len(),
            texture_bytes: self.textures.values().sum(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Residency, ResidencyLedger};
    use crate::resources::GpuError;
    use pretty_assertions::assert_eq;

    #[test]
    fn tracks_bytes_until_release() {
        let mut ledger = ResidencyLedger::new();
        let a = ledger.track_buffer(120);
        let t = ledger.track_texture(64);
        assert_eq!(
            ledger.residency(),
            Residency {
                buffers: 1,
                buffer_bytes: 120,
                textures: 1,
                texture_bytes: 64,
            }
        );
        assert_eq!(ledger.untrack_buffer(a), Ok(120));
        assert_eq!(ledger.untrack_texture(t), Ok(64));
        assert_eq!(ledger.residency(), Residency::default());
    }

    #[test]
    fn double_release_is_an_error() {
        let mut ledger = ResidencyLedger::new();
        let a = ledger.track_buffer(12);
        ledger.untrack_buffer(a).unwrap();
        assert_eq!(ledger.untrack_buffer(a), Err(GpuError::UnknownBuffer(a)));
    }

    #[test]
    fn recycled_ids_are_distinct() {
        let mut ledger = ResidencyLedger::new();
        let a = ledger.track_buffer(12);
        ledger.untrack_buffer(a).unwrap();
        let b = ledger.track_buffer(24);
        assert_ne!(a, b);
        assert_eq!(ledger.buffer_bytes(a), None);
        assert_eq!(ledger.buffer_bytes(b), Some(24));
    }
}
