use foundation::math::Vec3;

pub type Mat4 = [[f32; 4]; 4];

/// Fixed-axis camera: looks at the globe center from `+z`, like the viewer's
/// home view. Orbiting is left to the host.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ViewParams {
    pub distance: f64,
    pub fov_y_deg: f64,
    pub near: f64,
    pub far: f64,
    pub width: f64,
    pub height: f64,
}

impl ViewParams {
    pub fn aspect(&self) -> f64 {
        if self.height <= 0.0 {
            1.0
        } else {
            (self.width / self.height).max(1e-6)
        }
    }

    pub fn view_proj(&self) -> Mat4 {
        let eye = Vec3::new(0.0, 0.0, self.distance);
        let view = look_at_rh(eye, Vec3::ZERO, Vec3::new(0.0, 1.0, 0.0));
        let proj = perspective_rh_z0(
            self.fov_y_deg.to_radians(),
            self.aspect(),
            self.near,
            self.far,
        );
        mul(proj, view)
    }
}

/// Column-major product `a * b`.
pub fn mul(a: Mat4, b: Mat4) -> Mat4 {
    let mut c = [[0.0f32; 4]; 4];
    for col in 0..4 {
        for row in 0..4 {
            c[col][row] = a[0][row] * b[col][0]
                + a[1][row] * b[col][1]
                + a[2][row] * b[col][2]
                + a[3][row] * b[col][3];
        }
    }
    c
}

/// Right-handed perspective with WebGPU's `[0, 1]` depth range.
pub fn perspective_rh_z0(fov_y_rad: f64, aspect: f64, near: f64, far: f64) -> Mat4 {
    let f = 1.0 / (0.5 * fov_y_rad).tan();
    let m22 = (far / (near - far)) as f32;
    let m23 = ((near * far) / (near - far)) as f32;
    [
        [(f / aspect) as f32, 0.0, 0.0, 0.0],
        [0.0, f as f32, 0.0, 0.0],
        [0.0, 0.0, m22, -1.0],
        [0.0, 0.0, m23, 0.0],
    ]
}

pub fn look_at_rh(eye: Vec3, target: Vec3, up: Vec3) -> Mat4 {
    let f = (target - eye).normalized();
    let s = f.cross(up).normalized();
    let u = s.cross(f);
    [
        [s.x as f32, u.x as f32, -f.x as f32, 0.0],
        [s.y as f32, u.y as f32, -f.y as f32, 0.0],
        [s.z as f32, u.z as f32, -f.z as f32, 0.0],
        [
            -s.dot(eye) as f32,
            -u.dot(eye) as f32,
            f.dot(eye) as f32,
            1.0,
        ],
    ]
}

/// Applies `m` to a point and divides by `w`.
pub fn project(m: Mat4, p: [f32; 3]) -> [f32; 3] {
    let mut out = [0.0f32; 4];
    for (row, v) in out.iter_mut().enumerate() {
        *v = m[0][row] * p[0] + m[1][row] * p[1] + m[2][row] * p[2] + m[3][row];
    }
    [out[0] / out[3], out[1] / out[3], out[2] / out[3]]
}

#[cfg(test)]
mod tests {
    use super::{ViewParams, project};

    fn params(distance: f64) -> ViewParams {
        ViewParams {
            distance,
            fov_y_deg: 60.0,
            near: 0.1,
            far: 2000.0,
            width: 800.0,
            height: 600.0,
        }
    }

    #[test]
    fn globe_center_projects_to_screen_center() {
        let p = project(params(2.5).view_proj(), [0.0, 0.0, 0.0]);
        assert!(p[0].abs() < 1e-6 && p[1].abs() < 1e-6);
        assert!(p[2] > 0.0 && p[2] < 1.0);
    }

    #[test]
    fn near_side_is_closer_than_far_side() {
        let m = params(2.5).view_proj();
        let front = project(m, [0.0, 0.0, 1.0]);
        let back = project(m, [0.0, 0.0, -1.0]);
        assert!(front[2] < back[2]);
    }

    #[test]
    fn zooming_out_shrinks_the_globe() {
        let top_near = project(params(2.0).view_proj(), [0.0, 1.0, 0.0]);
        let top_far = project(params(4.0).view_proj(), [0.0, 1.0, 0.0]);
        assert!(top_near[1] > top_far[1]);
        assert!(top_far[1] > 0.0);
    }

    #[test]
    fn zero_height_falls_back_to_square() {
        let mut p = params(2.5);
        p.height = 0.0;
        assert_eq!(p.aspect(), 1.0);
    }
}
