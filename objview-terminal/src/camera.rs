/// Orthographic camera framing the unit cube
use nalgebra::{Matrix4, Point3, Vector3};

/// Character cells are roughly twice as tall as they are wide.
const CELL_ASPECT: f32 = 2.0;

/// Camera configuration for terminal rendering
pub struct Camera {
    pub position: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
    /// Half the height of the visible region, in model units.
    pub extent: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            position: Point3::new(0.0, 0.0, 5.0),
            target: Point3::new(0.0, 0.0, 0.0),
            up: Vector3::new(0.0, 1.0, 0.0),
            // Leaves room for a normalized model's corners after rotation
            extent: 1.8,
            aspect: width as f32 / (height.max(1) as f32 * CELL_ASPECT),
            near: 0.1,
            far: 100.0,
        }
    }

    /// Create the view matrix (camera transformation)
    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(&self.position, &self.target, &self.up)
    }

    pub fn projection_matrix(&self) -> Matrix4<f32> {
        let half_width = self.extent * self.aspect;
        Matrix4::new_orthographic(
            -half_width,
            half_width,
            -self.extent,
            self.extent,
            self.near,
            self.far,
        )
    }

    pub fn view_projection(&self) -> Matrix4<f32> {
        self.projection_matrix() * self.view_matrix()
    }
}

/// Map a point through `view_projection` to screen cells.
///
/// Returns `(column, row, depth)` with smaller depth nearer the camera, or
/// `None` when the point falls outside the near/far range. Points off the
/// sides of the screen are kept so partly visible polygons still rasterize.
pub fn project_to_screen(
    view_projection: &Matrix4<f32>,
    point: &Point3<f32>,
    width: usize,
    height: usize,
) -> Option<(f32, f32, f32)> {
    let ndc = view_projection.transform_point(point);
    if !(-1.0..=1.0).contains(&ndc.z) {
        return None;
    }

    let screen_x = (ndc.x + 1.0) * 0.5 * width as f32;
    let screen_y = (1.0 - ndc.y) * 0.5 * height as f32;
    Some((screen_x, screen_y, ndc.z))
}
