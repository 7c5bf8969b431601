//! In-memory geometry of one loaded OBJ file
use nalgebra::Point3;

use crate::element::{Face, Normal, ParamSpaceVertex, TexCoord, Vertex};

/// Smallest accumulated scale a model may reach.
pub const MIN_SCALE: f64 = 0.01;
/// Largest accumulated scale a model may reach.
pub const MAX_SCALE: f64 = 2.0;

/// Parsed geometry plus the running product of every accepted scale.
///
/// Every face reference points inside the sequences it names, so consumers
/// can index without bounds checks failing. Only the transform operations
/// mutate a model, and they only touch vertex positions.
#[derive(Debug, Clone)]
pub struct Model {
    filename: String,
    pub(crate) vertices: Vec<Vertex>,
    pub(crate) texcoords: Vec<TexCoord>,
    pub(crate) normals: Vec<Normal>,
    pub(crate) param_space_vertices: Vec<ParamSpaceVertex>,
    pub(crate) faces: Vec<Face>,
    pub(crate) accumulated_scale: f64,
}

impl Model {
    pub(crate) fn new(filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            vertices: Vec::new(),
            texcoords: Vec::new(),
            normals: Vec::new(),
            param_space_vertices: Vec::new(),
            faces: Vec::new(),
            accumulated_scale: 1.0,
        }
    }

    /// Name of the file this model was loaded from.
    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    pub fn texcoords(&self) -> &[TexCoord] {
        &self.texcoords
    }

    pub fn normals(&self) -> &[Normal] {
        &self.normals
    }

    /// Stored for completeness; nothing draws them.
    pub fn param_space_vertices(&self) -> &[ParamSpaceVertex] {
        &self.param_space_vertices
    }

    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    /// Product of every scale factor accepted since load.
    pub fn accumulated_scale(&self) -> f64 {
        self.accumulated_scale
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }

    /// Arithmetic mean of the vertex positions, `None` for an empty model.
    pub fn centroid(&self) -> Option<Point3<f64>> {
        mean(self.vertices.iter().map(|vertex| vertex.position))
    }

    /// Componentwise minimum and maximum corner, `None` for an empty model.
    pub fn bounding_box(&self) -> Option<(Point3<f64>, Point3<f64>)> {
        let first = self.vertices.first()?.position;
        Some(self.vertices.iter().fold((first, first), |(min, max), vertex| {
            (min.inf(&vertex.position), max.sup(&vertex.position))
        }))
    }
}

/// Running mean of `points`.
///
/// Each step is a convex combination of the previous mean and the next point,
/// so coordinates near `f64::MAX` never overflow an intermediate sum.
pub(crate) fn mean(points: impl IntoIterator<Item = Point3<f64>>) -> Option<Point3<f64>> {
    points
        .into_iter()
        .enumerate()
        .fold(None, |acc, (i, point)| {
            let Some(mean) = acc else {
                return Some(point);
            };
            let k = i as f64 + 1.0;
            Some(Point3::from(mean.coords * ((k - 1.0) / k) + point.coords / k))
        })
}
