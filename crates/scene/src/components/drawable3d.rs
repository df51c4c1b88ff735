use foundation::ids::{BufferId, TextureId};

use super::material::{LineMaterial, PointMaterial};

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Shape3D {
    /// Textured sphere. `texture` is `None` until the first asset resolves.
    Globe {
        radius: f64,
        texture: Option<TextureId>,
    },
    /// `PointList` geometry: `count` xyz vertices in `buffer`.
    Points {
        buffer: BufferId,
        count: u32,
        material: PointMaterial,
    },
    /// `LineList` geometry: `vertex_count` xyz vertices in `buffer`, two per segment.
    Lines {
        buffer: BufferId,
        vertex_count: u32,
        material: LineMaterial,
    },
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Drawable3D {
    pub shape: Shape3D,
}

impl Drawable3D {
    pub fn globe(radius: f64) -> Self {
        Self {
            shape: Shape3D::Globe {
                radius,
                texture: None,
            },
        }
    }

    pub fn points(buffer: BufferId, count: u32, material: PointMaterial) -> Self {
        Self {
            shape: Shape3D::Points {
                buffer,
                count,
                material,
            },
        }
    }

    pub fn lines(buffer: BufferId, vertex_count: u32, material: LineMaterial) -> Self {
        Self {
            shape: Shape3D::Lines {
                buffer,
                vertex_count,
                material,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Drawable3D, Shape3D};
    use crate::components::PointMaterial;
    use foundation::handles::Handle;
    use foundation::ids::BufferId;

    #[test]
    fn create_globe_drawable() {
        let drawable = Drawable3D::globe(1.0);
        assert!(matches!(
            drawable.shape,
            Shape3D::Globe { texture: None, .. }
        ));
    }

    #[test]
    fn point_drawable_keeps_buffer_and_count() {
        let buffer = BufferId(Handle::new(3, 1));
        let drawable = Drawable3D::points(buffer, 10, PointMaterial::default());
        assert!(matches!(
            drawable.shape,
            Shape3D::Points { buffer: b, count: 10, .. } if b == buffer
        ));
    }
}
