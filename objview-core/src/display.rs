//! Emit loaded models to an immediate-mode polygon renderer
use crate::model::Model;

/// The drawing capabilities a viewer backend must provide.
///
/// Current attributes (color, normal, texture coordinate) apply to every
/// vertex emitted after them until they are set again.
pub trait Renderer {
    fn begin_polygon(&mut self);
    fn end_polygon(&mut self);
    fn set_color(&mut self, r: f32, g: f32, b: f32);
    fn set_normal(&mut self, x: f32, y: f32, z: f32);
    fn set_texcoord(&mut self, u: f32, v: f32);
    fn emit_vertex(&mut self, x: f32, y: f32, z: f32);
}

fn frac(x: f64) -> f64 {
    x - x.floor()
}

/// Synthetic color for the 1-based face ordinal `n`.
pub fn face_color(n: usize) -> [f32; 3] {
    let n = n as f64;
    [
        frac(n * 0.1) as f32,
        frac(n * 0.2) as f32,
        frac(n * 0.3) as f32,
    ]
}

/// Emit every face of `model` as one polygon, in load order.
pub fn draw_model<R: Renderer + ?Sized>(model: &Model, renderer: &mut R) {
    let vertices = model.vertices();
    let texcoords = model.texcoords();
    let normals = model.normals();

    for (ordinal, face) in model.faces().iter().enumerate() {
        let [r, g, b] = face_color(ordinal + 1);

        renderer.begin_polygon();
        for reference in &face.vertices {
            if let Some(normal) = reference.normal.map(|i| normals[i]) {
                renderer.set_normal(normal.x as f32, normal.y as f32, normal.z as f32);
            }
            if let Some(texcoord) = reference.texcoord.map(|i| texcoords[i]) {
                renderer.set_texcoord(texcoord.u as f32, texcoord.v as f32);
            }
            renderer.set_color(r, g, b);

            let position = vertices[reference.vertex].position;
            renderer.emit_vertex(position.x as f32, position.y as f32, position.z as f32);
        }
        renderer.end_polygon();
    }
}

/// Draw every model in order for one display pass.
pub fn draw_models<R: Renderer + ?Sized>(models: &[Model], renderer: &mut R) {
    for model in models {
        draw_model(model, renderer);
    }
}
