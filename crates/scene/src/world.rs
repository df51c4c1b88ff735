use crate::components::{Drawable3D, Visibility};
use crate::entity::EntityId;
use foundation::handles::HandleAllocator;

/// Scene graph for the viewer: a flat set of drawables with visibility.
///
/// The world only stores bookkeeping. GPU resources referenced by a drawable
/// are owned by whoever added it and must be released by them after `remove`.
#[derive(Debug, Default)]
pub struct World {
    handles: HandleAllocator,
    visibility: Vec<Option<Visibility>>,
    drawables_3d: Vec<Option<Drawable3D>>,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, drawable: Drawable3D) -> EntityId {
        let id = EntityId(self.handles.alloc());
        let idx = id.index() as usize;
        self.ensure_capacity(idx);
        self.drawables_3d[idx] = Some(drawable);
        self.visibility[idx] = Some(Visibility::visible());
        id
    }

    /// Detaches `entity` and hands its drawable back to the caller.
    pub fn remove(&mut self, entity: EntityId) -> Option<Drawable3D> {
        if !self.handles.free(entity.0) {
            return None;
        }
        let idx = entity.index() as usize;
        self.visibility[idx] = None;
        self.drawables_3d[idx].take()
    }

    pub fn contains(&self, entity: EntityId) -> bool {
        self.handles.is_live(entity.0)
    }

    pub fn len(&self) -> usize {
        self.handles.live_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn drawable(&self, entity: EntityId) -> Option<&Drawable3D> {
        if !self.contains(entity) {
            return None;
        }
        self.drawables_3d
            .get(entity.index() as usize)
            .and_then(|d| d.as_ref())
    }

    pub fn drawable_mut(&mut self, entity: EntityId) -> Option<&mut Drawable3D> {
        if !self.contains(entity) {
            return None;
        }
        self.drawables_3d
            .get_mut(entity.index() as usize)
            .and_then(|d| d.as_mut())
    }

    /// Returns `false` if the entity is gone.
    pub fn set_visibility(&mut self, entity: EntityId, visibility: Visibility) -> bool {
        if !self.contains(entity) {
            return false;
        }
        self.visibility[entity.index() as usize] = Some(visibility);
        true
    }

    pub fn is_visible(&self, entity: EntityId) -> bool {
        self.contains(entity)
            && self
                .visibility
                .get(entity.index() as usize)
                .and_then(|v| *v)
                .map(|v| v.visible)
                .unwrap_or(true)
    }

    /// Visible drawables in insertion-slot order.
    pub fn drawables_3d(&self) -> Vec<(EntityId, Drawable3D)> {
        let mut out = Vec::new();
        for (idx, drawable) in self.drawables_3d.iter().enumerate() {
            let Some(drawable) = drawable else { continue };
            let visible = self
                .visibility
                .get(idx)
                .and_then(|v| *v)
                .map(|v| v.visible)
                .unwrap_or(true);
            if !visible {
                continue;
            }
            // Slots are only occupied while live, so the current generation is the entity's.
            let Some(id) = self.live_id(idx) else {
                continue;
            };
            out.push((id, *drawable));
        }
        out
    }

    fn live_id(&self, idx: usize) -> Option<EntityId> {
        self.handles.live_handle(idx as u32).map(EntityId)
    }

    fn ensure_capacity(&mut self, idx: usize) {
        if self.drawables_3d.len() <= idx {
            let new_len = idx + 1;
            self.visibility.resize(new_len, None);
            self.drawables_3d.resize(new_len, None);
        }
    }
}
