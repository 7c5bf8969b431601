//! In-place geometric transformations of a model's vertex positions
use log::debug;
use nalgebra::{Matrix3, Point3, Rotation3, Vector3};

use crate::model::{mean, Model, MAX_SCALE, MIN_SCALE};

/// Rotation matrix for Euler angles in degrees.
///
/// The elementary rotations apply about X first, then Y, then Z.
pub fn rotation_matrix(ax: f64, ay: f64, az: f64) -> Matrix3<f64> {
    let rx = Rotation3::from_axis_angle(&Vector3::x_axis(), ax.to_radians());
    let ry = Rotation3::from_axis_angle(&Vector3::y_axis(), ay.to_radians());
    let rz = Rotation3::from_axis_angle(&Vector3::z_axis(), az.to_radians());

    (rz * ry * rx).into_inner()
}

impl Model {
    /// Replace every position with `f(position)`, all or nothing.
    ///
    /// If any mapped component is not finite the model is left untouched and
    /// `false` is returned.
    fn map_positions(&mut self, f: impl Fn(Point3<f64>) -> Point3<f64>) -> bool {
        let mapped: Vec<Point3<f64>> = self.vertices.iter().map(|v| f(v.position)).collect();
        if !mapped.iter().all(|p| p.iter().all(|c| c.is_finite())) {
            debug!("{}: transform would overflow, ignoring it", self.filename());
            return false;
        }
        for (vertex, position) in self.vertices.iter_mut().zip(mapped) {
            vertex.position = position;
        }
        true
    }

    /// Rotate about the centroid by `(ax, ay, az)` degrees.
    pub fn rotate(&mut self, ax: f64, ay: f64, az: f64) {
        if ![ax, ay, az].iter().all(|angle| angle.is_finite()) {
            return;
        }
        let Some(pivot) = self.centroid() else {
            return;
        };

        let rotation = rotation_matrix(ax, ay, az);
        if self.map_positions(|p| pivot + rotation * (p - pivot)) {
            debug!("{}: rotated by ({ax}, {ay}, {az})", self.filename());
        }
    }

    pub fn translate(&mut self, dx: f64, dy: f64, dz: f64) {
        let offset = Vector3::new(dx, dy, dz);
        if !offset.iter().all(|d| d.is_finite()) {
            return;
        }
        self.map_positions(|p| p + offset);
    }

    /// Uniformly scale about the centroid.
    ///
    /// A factor that would take the accumulated scale outside
    /// `[MIN_SCALE, MAX_SCALE]` is ignored, as is zero. Returns whether the
    /// scale was applied.
    pub fn scale(&mut self, factor: f64) -> bool {
        let target = self.accumulated_scale * factor;
        if factor == 0.0 || !target.is_finite() || !(MIN_SCALE..=MAX_SCALE).contains(&target) {
            debug!(
                "{}: ignoring scale by {factor} (accumulated scale would be {target})",
                self.filename()
            );
            return false;
        }

        let applied = match self.centroid() {
            Some(pivot) => self.map_positions(|p| pivot + (p - pivot) * factor),
            None => true,
        };
        if !applied {
            return false;
        }

        self.accumulated_scale = target;
        debug!("{}: accumulated scale is now {target}", self.filename());
        true
    }

    /// Move the centroid to the origin.
    pub fn center(&mut self) {
        if let Some(centroid) = self.centroid() {
            let offset = centroid.coords;
            self.map_positions(|p| p - offset);
        }
    }

    /// Center the model and fit it into the `[-1, 1]` cube.
    ///
    /// The extent is measured from the centroid, not from the origin: the
    /// divisor is the largest absolute component of `p - centroid`, so the
    /// result stays inside the cube and at least one component lands exactly
    /// on its surface. Positions are first divided by their largest raw
    /// component so centering cannot overflow. Empty and single-point models
    /// are left alone. Returns whether anything moved.
    pub fn normalize(&mut self) -> bool {
        let Some(first) = self.vertices.first().map(|vertex| vertex.position) else {
            debug!("{}: nothing to normalize in an empty model", self.filename());
            return false;
        };
        if self.vertices.iter().all(|vertex| vertex.position == first) {
            debug!("{}: degenerate model, skipping normalize", self.filename());
            return false;
        }

        let magnitude = self
            .vertices
            .iter()
            .map(|vertex| vertex.position.coords.amax())
            .fold(0.0, f64::max);

        let scaled: Vec<Point3<f64>> = self
            .vertices
            .iter()
            .map(|vertex| vertex.position / magnitude)
            .collect();
        let Some(centroid) = mean(scaled.iter().copied()) else {
            return false;
        };
        let extent = scaled
            .iter()
            .map(|p| (p - centroid).amax())
            .fold(0.0, f64::max);
        if extent == 0.0 {
            debug!("{}: degenerate model, skipping normalize", self.filename());
            return false;
        }

        for (vertex, p) in self.vertices.iter_mut().zip(scaled) {
            vertex.position = Point3::from((p - centroid) / extent);
        }
        debug!("{}: normalized with extent {}", self.filename(), extent * magnitude);
        true
    }
}
