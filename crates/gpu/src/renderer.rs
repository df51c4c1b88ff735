use foundation::ids::{BufferId, TextureId};
use scene::components::{LineMaterial, PointMaterial, Shape3D};
use scene::world::World;

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum RenderCommand {
    Globe {
        radius: f64,
        texture: Option<TextureId>,
    },
    Lines {
        buffer: BufferId,
        vertex_count: u32,
        material: LineMaterial,
    },
    Points {
        buffer: BufferId,
        count: u32,
        material: PointMaterial,
    },
}

impl RenderCommand {
    /// Pass order: opaque globe first, then the overlays blended on top.
    fn pass(&self) -> u8 {
        match self {
            RenderCommand::Globe { .. } => 0,
            RenderCommand::Lines { .. } => 1,
            RenderCommand::Points { .. } => 2,
        }
    }
}

#[derive(Debug, Default)]
pub struct RenderFrame {
    pub commands: Vec<RenderCommand>,
}

pub struct Renderer;

impl Renderer {
    /// Collects visible drawables into pass order. Within a pass the world's
    /// slot order is kept, so output is deterministic.
    pub fn collect(world: &World) -> RenderFrame {
        let mut frame = RenderFrame::default();
        for (_, drawable) in world.drawables_3d() {
            let command = match drawable.shape {
                Shape3D::Globe { radius, texture } => RenderCommand::Globe { radius, texture },
                Shape3D::Lines {
                    buffer,
                    vertex_count,
                    material,
                } => RenderCommand::Lines {
                    buffer,
                    vertex_count,
                    material,
                },
                Shape3D::Points {
                    buffer,
                    count,
                    material,
                } => RenderCommand::Points {
                    buffer,
                    count,
                    material,
                },
            };
            frame.commands.push(command);
        }
        frame.commands.sort_by_key(RenderCommand::pass);
        frame
    }
}

#[cfg(test)]
mod tests {
    use super::{RenderCommand, Renderer};
    use foundation::handles::Handle;
    use foundation::ids::BufferId;
    use scene::components::{Drawable3D, LineMaterial, PointMaterial, Visibility};
    use scene::world::World;

    #[test]
    fn collects_in_pass_order() {
        let mut world = World::new();
        world.add(Drawable3D::points(
            BufferId(Handle::new(0, 0)),
            5,
            PointMaterial::default(),
        ));
        world.add(Drawable3D::lines(
            BufferId(Handle::new(1, 0)),
            8,
            LineMaterial::default(),
        ));
        world.add(Drawable3D::globe(1.0));

        let frame = Renderer::collect(&world);
        assert!(matches!(
            frame.commands.as_slice(),
            [
                RenderCommand::Globe { .. },
                RenderCommand::Lines { .. },
                RenderCommand::Points { count: 5, .. }
            ]
        ));
    }

    #[test]
    fn hidden_overlays_are_skipped() {
        let mut world = World::new();
        world.add(Drawable3D::globe(1.0));
        let lines = world.add(Drawable3D::lines(
            BufferId(Handle::new(1, 0)),
            8,
            LineMaterial::default(),
        ));
        world.set_visibility(lines, Visibility::hidden());

        let frame = Renderer::collect(&world);
        assert!(matches!(
            frame.commands.as_slice(),
            [RenderCommand::Globe { .. }]
        ));
    }
}
