use foundation::ids::TextureId;

use crate::World;
use crate::components::{Drawable3D, Shape3D};
use crate::entity::EntityId;

pub fn spawn_globe(world: &mut World, radius: f64) -> EntityId {
    world.add(Drawable3D::globe(radius))
}

/// Points the globe's surface covering at `texture`, returning the previous one.
///
/// The caller still owns the returned texture and must release it.
pub fn set_globe_texture(
    world: &mut World,
    globe: EntityId,
    texture: TextureId,
) -> Option<Option<TextureId>> {
    match world.drawable_mut(globe) {
        Some(Drawable3D {
            shape: Shape3D::Globe { texture: slot, .. },
        }) => Some(slot.replace(texture)),
        _ => None,
    }
}

pub fn globe_texture(world: &World, globe: EntityId) -> Option<TextureId> {
    match world.drawable(globe) {
        Some(Drawable3D {
            shape: Shape3D::Globe { texture, .. },
        }) => *texture,
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::{globe_texture, set_globe_texture, spawn_globe};
    use crate::World;
    use crate::components::{Drawable3D, PointMaterial, Shape3D};
    use foundation::handles::Handle;
    use foundation::ids::{BufferId, TextureId};

    #[test]
    fn spawns_globe_drawable() {
        let mut world = World::new();
        let entity = spawn_globe(&mut world, 1.0);

        let drawables = world.drawables_3d();
        assert_eq!(drawables.len(), 1);
        assert_eq!(drawables[0].0, entity);

        let Drawable3D { shape } = drawables[0].1;
        assert!(matches!(shape, Shape3D::Globe { .. }));
    }

    #[test]
    fn texture_assignment_returns_previous() {
        let mut world = World::new();
        let globe = spawn_globe(&mut world, 1.0);
        let a = TextureId(Handle::new(0, 0));
        let b = TextureId(Handle::new(1, 0));

        assert_eq!(set_globe_texture(&mut world, globe, a), Some(None));
        assert_eq!(set_globe_texture(&mut world, globe, b), Some(Some(a)));
        assert_eq!(globe_texture(&world, globe), Some(b));
    }

    #[test]
    fn texture_assignment_ignores_non_globes() {
        let mut world = World::new();
        let pts = world.add(Drawable3D::points(
            BufferId(Handle::new(0, 0)),
            1,
            PointMaterial::default(),
        ));
        assert_eq!(
            set_globe_texture(&mut world, pts, TextureId(Handle::new(0, 0))),
            None
        );
    }
}
