//! Typed OBJ elements and the per-line parsers that produce them
use nalgebra::{Point3, Vector3};
use nom::{character::complete::i64 as integer, combinator::all_consuming, number::complete::double, IResult};
use thiserror::Error;

use crate::error::ObjError;
use crate::tokenize::{split, split_nonempty};

/// Geometric vertex (`v`). `w` defaults to 1.0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: Point3<f64>,
    pub w: f64,
}

impl Vertex {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self {
            position: Point3::new(x, y, z),
            w: 1.0,
        }
    }
}

/// Texture coordinate (`vt`). `v` and `w` default to 0.0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TexCoord {
    pub u: f64,
    pub v: f64,
    pub w: f64,
}

/// Vertex normal (`vn`). All three components are required.
pub type Normal = Vector3<f64>;

/// Parameter-space vertex (`vp`). `v` defaults to 0.0, `w` to 1.0.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParamSpaceVertex {
    pub u: f64,
    pub v: f64,
    pub w: f64,
}

/// One corner of a face.
///
/// `I` is `i64` straight out of the parser (1-based, possibly negative) and
/// `usize` once the loader has resolved it to an absolute 0-based offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaceRef<I> {
    pub vertex: I,
    pub texcoord: Option<I>,
    pub normal: Option<I>,
}

/// A face reference as written in the file.
pub type RawFaceRef = FaceRef<i64>;

/// A face reference resolved against the loaded sequences.
pub type FaceVertex = FaceRef<usize>;

/// A polygon with at least three resolved references, in source winding order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Face {
    pub vertices: Vec<FaceVertex>,
}

/// A directive line whose shape did not match its keyword.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{reason}: {content}")]
pub struct MalformedLine {
    pub content: String,
    pub reason: &'static str,
}

impl MalformedLine {
    fn new(content: &str, reason: &'static str) -> Self {
        Self {
            content: content.to_string(),
            reason,
        }
    }

    /// Attach the line number the loader was on.
    pub fn at_line(self, line: usize) -> ObjError {
        ObjError::MalformedElement {
            line,
            content: self.content,
            reason: self.reason.to_string(),
        }
    }
}

/// Parse a finite real; the whole token must be consumed.
fn real(token: &str) -> Option<f64> {
    let parsed: IResult<&str, f64> = all_consuming(double)(token);
    parsed.ok().map(|(_, value)| value).filter(|value| value.is_finite())
}

fn index(token: &str) -> Option<i64> {
    let parsed: IResult<&str, i64> = all_consuming(integer)(token);
    parsed.ok().map(|(_, value)| value)
}

/// Check the keyword and arity of `line`, then parse every numeric token.
fn reals(
    line: &str,
    keyword: &str,
    arity: std::ops::RangeInclusive<usize>,
    reason: &'static str,
) -> Result<Vec<f64>, MalformedLine> {
    let tokens = split_nonempty(line, ' ');
    match tokens.split_first() {
        Some((head, rest)) if *head == keyword && arity.contains(&rest.len()) => rest
            .iter()
            .map(|token| real(token))
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| MalformedLine::new(line, "invalid values")),
        _ => Err(MalformedLine::new(line, reason)),
    }
}

/// `v x y z [w]`
pub fn parse_vertex(line: &str) -> Result<Vertex, MalformedLine> {
    let values = reals(line, "v", 3..=4, "invalid vertex")?;
    Ok(Vertex {
        position: Point3::new(values[0], values[1], values[2]),
        w: values.get(3).copied().unwrap_or(1.0),
    })
}

/// `vt u [v [w]]`
pub fn parse_texcoord(line: &str) -> Result<TexCoord, MalformedLine> {
    let values = reals(line, "vt", 1..=3, "invalid texture coordinate")?;
    Ok(TexCoord {
        u: values[0],
        v: values.get(1).copied().unwrap_or(0.0),
        w: values.get(2).copied().unwrap_or(0.0),
    })
}

/// `vn x y z`
pub fn parse_normal(line: &str) -> Result<Normal, MalformedLine> {
    let values = reals(line, "vn", 3..=3, "invalid normal")?;
    Ok(Normal::new(values[0], values[1], values[2]))
}

/// `vp u [v [w]]`
pub fn parse_param_space_vertex(line: &str) -> Result<ParamSpaceVertex, MalformedLine> {
    let values = reals(line, "vp", 1..=3, "invalid parameter space vertex")?;
    Ok(ParamSpaceVertex {
        u: values[0],
        v: values.get(1).copied().unwrap_or(0.0),
        w: values.get(2).copied().unwrap_or(1.0),
    })
}

/// `f v1[/vt1[/vn1]] v2... v3...`
///
/// Indices are returned as written. Bounds and negative offsets are the
/// loader's business since they depend on what has been read so far.
pub fn parse_face(line: &str) -> Result<Vec<RawFaceRef>, MalformedLine> {
    let tokens = split_nonempty(line, ' ');
    let refs = match tokens.split_first() {
        Some((&"f", rest)) if rest.len() >= 3 => rest,
        _ => return Err(MalformedLine::new(line, "invalid face")),
    };

    refs.iter()
        .map(|token| parse_face_ref(token).ok_or_else(|| MalformedLine::new(line, "invalid values")))
        .collect()
}

fn parse_face_ref(token: &str) -> Option<RawFaceRef> {
    let slots = split(token, '/');
    if slots.is_empty() || slots.len() > 3 {
        return None;
    }

    let vertex = index(slots[0])?;
    // `v//vn` leaves the texture slot empty
    let texcoord = match slots.get(1) {
        Some(slot) if !slot.is_empty() => Some(index(slot)?),
        _ => None,
    };
    let normal = match slots.get(2) {
        Some(slot) => Some(index(slot)?),
        None => None,
    };

    Some(RawFaceRef {
        vertex,
        texcoord,
        normal,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_vertex_defaults_w() {
        let vertex = parse_vertex("v 1 2 3").unwrap();
        assert_eq!(vertex.position, Point3::new(1.0, 2.0, 3.0));
        assert_eq!(vertex.w, 1.0);

        let vertex = parse_vertex("v  1.5 -2e1 .25   0.5 ").unwrap();
        assert_relative_eq!(vertex.position.y, -20.0);
        assert_relative_eq!(vertex.position.z, 0.25);
        assert_relative_eq!(vertex.w, 0.5);
    }

    #[test]
    fn test_vertex_arity() {
        assert!(parse_vertex("v 1 2").is_err());
        assert!(parse_vertex("v 1 2 3 4 5").is_err());
    }

    #[test]
    fn test_texcoord_and_param_space_defaults() {
        let texcoord = parse_texcoord("vt 0.5").unwrap();
        assert_eq!((texcoord.u, texcoord.v, texcoord.w), (0.5, 0.0, 0.0));

        let param = parse_param_space_vertex("vp 0.5").unwrap();
        assert_eq!((param.u, param.v, param.w), (0.5, 0.0, 1.0));

        let param = parse_param_space_vertex("vp 0.1 0.2 0.3").unwrap();
        assert_eq!((param.u, param.v, param.w), (0.1, 0.2, 0.3));
    }

    #[test]
    fn test_normal_requires_three() {
        assert_eq!(parse_normal("vn 0 0 1").unwrap(), Normal::new(0.0, 0.0, 1.0));
        assert!(parse_normal("vn 0 1").is_err());
        assert!(parse_normal("vn 0 0 1 1").is_err());
    }

    #[test]
    fn test_non_numeric_values_are_rejected() {
        let err = parse_vertex("v 1 two 3").unwrap_err();
        assert_eq!(err.reason, "invalid values");
        assert_eq!(err.content, "v 1 two 3");

        assert!(parse_vertex("v 1.5x 2 3").is_err());
        assert!(parse_vertex("v inf 2 3").is_err());
        assert!(parse_vertex("v nan 2 3").is_err());
    }

    #[test]
    fn test_keyword_must_lead() {
        assert!(parse_normal("vnx 0 0 1").is_err());
        assert!(parse_vertex("vt 1 2 3").is_err());
    }

    #[test]
    fn test_face_reference_shapes() {
        let face = parse_face("f 1 2 3").unwrap();
        assert_eq!(face[2], RawFaceRef { vertex: 3, texcoord: None, normal: None });

        let face = parse_face("f 1/2 3/4 5/6").unwrap();
        assert_eq!(face[1], RawFaceRef { vertex: 3, texcoord: Some(4), normal: None });

        let face = parse_face("f 1/2/3 4/5/6 7/8/9").unwrap();
        assert_eq!(face[2], RawFaceRef { vertex: 7, texcoord: Some(8), normal: Some(9) });

        let face = parse_face("f 1//3 4//6 7//9").unwrap();
        assert_eq!(face[0], RawFaceRef { vertex: 1, texcoord: None, normal: Some(3) });
    }

    #[test]
    fn test_face_keeps_negative_indices() {
        let face = parse_face("f -1 -2 -3 -4").unwrap();
        let vertices: Vec<i64> = face.iter().map(|r| r.vertex).collect();
        assert_eq!(vertices, vec![-1, -2, -3, -4]);
    }

    #[test]
    fn test_face_shape_errors() {
        assert_eq!(parse_face("f 1 2").unwrap_err().reason, "invalid face");
        assert_eq!(parse_face("f 1/2/3/4 2 3").unwrap_err().reason, "invalid values");
        assert!(parse_face("f a 2 3").is_err());
        assert!(parse_face("f /1 2 3").is_err());
        assert!(parse_face("f 1.5 2 3").is_err());
    }
}
