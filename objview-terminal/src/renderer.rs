/// ASCII rasterizer for terminal rendering
use crossterm::{
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use nalgebra::{Matrix4, Point3, Vector3};
use objview_core::Renderer;
use std::io::Write;

use crate::camera::{project_to_screen, Camera};

/// Character luminosity ramp for depth/shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Polygon attributes collected between `begin_polygon` and `end_polygon`.
#[derive(Default)]
struct PendingPolygon {
    positions: Vec<Point3<f32>>,
    normal: Option<Vector3<f32>>,
    color: [f32; 3],
}

/// Rasterizes polygons into a character grid with a depth buffer.
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    depth_buffer: Vec<f32>,
    char_buffer: Vec<char>,
    color_buffer: Vec<Color>,
    view_projection: Matrix4<f32>,
    current_color: [f32; 3],
    polygon: Option<PendingPolygon>,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            depth_buffer: vec![f32::INFINITY; size],
            char_buffer: vec![' '; size],
            color_buffer: vec![Color::Reset; size],
            view_projection: Camera::new(width as u32, height as u32).view_projection(),
            current_color: [1.0, 1.0, 1.0],
            polygon: None,
        }
    }

    pub fn set_camera(&mut self, camera: &Camera) {
        self.view_projection = camera.view_projection();
    }

    pub fn clear(&mut self) {
        self.depth_buffer.fill(f32::INFINITY);
        self.char_buffer.fill(' ');
        self.color_buffer.fill(Color::Reset);
    }

    pub fn char_at(&self, x: usize, y: usize) -> Option<char> {
        (x < self.width && y < self.height).then(|| self.char_buffer[y * self.width + x])
    }

    pub fn color_at(&self, x: usize, y: usize) -> Option<Color> {
        (x < self.width && y < self.height).then(|| self.color_buffer[y * self.width + x])
    }

    fn shade(&self, polygon: &PendingPolygon) -> char {
        let normal = polygon.normal.unwrap_or_else(|| {
            let [a, b, c] = [polygon.positions[0], polygon.positions[1], polygon.positions[2]];
            (b - a).cross(&(c - a))
        });
        // Winding is whatever the file says, so light both sides
        let light_dir = Vector3::new(0.0, 0.0, 1.0);
        let brightness = normal
            .try_normalize(1e-12)
            .map(|n| n.dot(&light_dir).abs())
            .unwrap_or(0.0);

        // Keep every face visible, even edge-on ones
        let char_index = (brightness * (LUMINOSITY_RAMP.len() - 1) as f32) as usize;
        LUMINOSITY_RAMP[char_index.clamp(1, LUMINOSITY_RAMP.len() - 1)]
    }

    fn render_polygon(&mut self, polygon: &PendingPolygon) {
        if polygon.positions.len() < 3 {
            return;
        }

        // Project vertices to screen space
        let mut screen_coords = Vec::with_capacity(polygon.positions.len());
        for position in &polygon.positions {
            match project_to_screen(&self.view_projection, position, self.width, self.height) {
                Some(coords) => screen_coords.push(coords),
                None => return, // Polygon is clipped
            }
        }

        let character = self.shade(polygon);
        let [r, g, b] = polygon.color.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8);
        let color = Color::Rgb { r, g, b };

        // Fan triangulation; faces are convex
        for i in 1..screen_coords.len() - 1 {
            let triangle = [screen_coords[0], screen_coords[i], screen_coords[i + 1]];
            self.rasterize_triangle(&triangle, character, color);
        }
    }

    fn rasterize_triangle(&mut self, coords: &[(f32, f32, f32); 3], character: char, color: Color) {
        let [v0, v1, v2] = *coords;

        // Bounding box
        let min_x = v0.0.min(v1.0).min(v2.0).floor() as i32;
        let max_x = v0.0.max(v1.0).max(v2.0).ceil() as i32;
        let min_y = v0.1.min(v1.1).min(v2.1).floor() as i32;
        let max_y = v0.1.max(v1.1).max(v2.1).ceil() as i32;

        // Clip to screen bounds
        let min_x = min_x.max(0);
        let max_x = max_x.min(self.width as i32 - 1);
        let min_y = min_y.max(0);
        let max_y = max_y.min(self.height as i32 - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let px = x as f32 + 0.5;
                let py = y as f32 + 0.5;

                let Some((w0, w1, w2)) =
                    barycentric((v0.0, v0.1), (v1.0, v1.1), (v2.0, v2.1), (px, py))
                else {
                    continue;
                };
                if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                    continue;
                }

                let depth = w0 * v0.2 + w1 * v1.2 + w2 * v2.2;
                let idx = y as usize * self.width + x as usize;
                if depth < self.depth_buffer[idx] {
                    self.depth_buffer[idx] = depth;
                    self.char_buffer[idx] = character;
                    self.color_buffer[idx] = color;
                }
            }
        }
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for y in 0..self.height {
            for x in 0..self.width {
                let idx = y * self.width + x;
                writer.queue(SetForegroundColor(self.color_buffer[idx]))?;
                writer.queue(Print(self.char_buffer[idx]))?;
            }
            if y + 1 < self.height {
                writer.queue(Print("\r\n"))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

impl Renderer for AsciiRenderer {
    fn begin_polygon(&mut self) {
        self.polygon = Some(PendingPolygon::default());
    }

    fn end_polygon(&mut self) {
        if let Some(polygon) = self.polygon.take() {
            self.render_polygon(&polygon);
        }
    }

    fn set_color(&mut self, r: f32, g: f32, b: f32) {
        self.current_color = [r, g, b];
    }

    /// Flat shading: the last normal given inside a polygon shades all of it.
    fn set_normal(&mut self, x: f32, y: f32, z: f32) {
        if let Some(polygon) = self.polygon.as_mut() {
            polygon.normal = Some(Vector3::new(x, y, z));
        }
    }

    // A character cell has no room for texture detail.
    fn set_texcoord(&mut self, _u: f32, _v: f32) {}

    fn emit_vertex(&mut self, x: f32, y: f32, z: f32) {
        let color = self.current_color;
        if let Some(polygon) = self.polygon.as_mut() {
            polygon.positions.push(Point3::new(x, y, z));
            polygon.color = color;
        }
    }
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: (f32, f32),
    v1: (f32, f32),
    v2: (f32, f32),
    p: (f32, f32),
) -> Option<(f32, f32, f32)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-6 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}

#[cfg(test)]
mod tests {
    use super::*;
    use objview_core::{draw_model, face_color, parse_obj};

    fn square(renderer: &mut AsciiRenderer, z: f32, color: [f32; 3]) {
        renderer.begin_polygon();
        renderer.set_color(color[0], color[1], color[2]);
        for (x, y) in [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)] {
            renderer.emit_vertex(x, y, z);
        }
        renderer.end_polygon();
    }

    #[test]
    fn test_polygon_fills_center() {
        let mut renderer = AsciiRenderer::new(40, 20);
        square(&mut renderer, 0.0, [1.0, 0.0, 0.0]);

        assert_eq!(renderer.char_at(20, 10), Some('@'));
        assert_eq!(renderer.color_at(20, 10), Some(Color::Rgb { r: 255, g: 0, b: 0 }));
        assert_eq!(renderer.char_at(0, 0), Some(' '));
        assert_eq!(renderer.char_at(40, 0), None);
    }

    #[test]
    fn test_nearer_polygon_wins() {
        let mut renderer = AsciiRenderer::new(40, 20);
        square(&mut renderer, 0.5, [0.0, 1.0, 0.0]);
        square(&mut renderer, -0.5, [0.0, 0.0, 1.0]);
        assert_eq!(renderer.color_at(20, 10), Some(Color::Rgb { r: 0, g: 255, b: 0 }));

        renderer.clear();
        assert_eq!(renderer.char_at(20, 10), Some(' '));
    }

    #[test]
    fn test_degenerate_polygons_draw_nothing() {
        let mut renderer = AsciiRenderer::new(40, 20);
        renderer.begin_polygon();
        renderer.emit_vertex(-1.0, -1.0, 0.0);
        renderer.emit_vertex(1.0, 1.0, 0.0);
        renderer.end_polygon();

        // Vertices outside a polygon are dropped
        renderer.emit_vertex(0.0, 0.0, 0.0);

        let blank = (0..20).all(|y| (0..40).all(|x| renderer.char_at(x, y) == Some(' ')));
        assert!(blank);
    }

    #[test]
    fn test_draws_loaded_model_with_face_colors() {
        let text = "v -1 -1 0\nv 1 -1 0\nv 1 1 0\nv -1 1 0\nvn 0 0 1\nf 1//1 2//1 3//1 4//1\n";
        let model = parse_obj(text.as_bytes(), "quad.obj").unwrap();
        let mut renderer = AsciiRenderer::new(40, 20);
        draw_model(&model, &mut renderer);

        let [r, g, b] = face_color(1).map(|c| (c * 255.0).round() as u8);
        assert_eq!(renderer.color_at(20, 10), Some(Color::Rgb { r, g, b }));
        assert_eq!(renderer.char_at(20, 10), Some('@'));
    }

    #[test]
    fn test_draw_writes_every_cell() {
        let mut renderer = AsciiRenderer::new(4, 2);
        square(&mut renderer, 0.0, [1.0, 1.0, 1.0]);
        let mut out = Vec::new();
        renderer.draw(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("\r\n"));
    }
}
