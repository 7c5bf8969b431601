//! Line-oriented OBJ loader
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use log::info;

use crate::element::{
    parse_face, parse_normal, parse_param_space_vertex, parse_texcoord, parse_vertex, Face,
    FaceVertex, MalformedLine, RawFaceRef,
};
use crate::error::{IndexKind, ObjError, Result};
use crate::model::Model;

/// Load an OBJ file and normalize it into the unit cube.
pub fn load_obj(path: impl AsRef<Path>) -> Result<Model> {
    let path = path.as_ref();
    info!("Loading {}", path.display());

    let file = File::open(path).map_err(|source| ObjError::FileNotFound {
        path: path.to_path_buf(),
        source,
    })?;

    parse_obj(BufReader::new(file), &path.display().to_string()).map_err(|err| match err {
        ObjError::Read { source, .. } => ObjError::Read {
            path: path.to_path_buf(),
            source,
        },
        other => other,
    })
}

/// Parse OBJ text from any buffered reader.
///
/// `name` is recorded as the model's filename. The first bad line aborts the
/// parse; a model is only returned when every line was accepted.
pub fn parse_obj<R: BufRead>(mut reader: R, name: &str) -> Result<Model> {
    let mut model = Model::new(name);
    let mut buf = Vec::new();
    let mut line_number = 0;

    loop {
        buf.clear();
        let read = reader.read_until(b'\n', &mut buf).map_err(|source| ObjError::Read {
            path: name.into(),
            source,
        })?;
        if read == 0 {
            break;
        }
        line_number += 1;

        read_line(&mut model, strip_line_ending(&buf), line_number)?;
    }

    info!(
        "Successfully loaded and parsed {}: {} vertices, {} texture coordinates, {} normals, {} faces",
        name,
        model.vertices.len(),
        model.texcoords.len(),
        model.normals.len(),
        model.faces.len()
    );

    if !model.is_empty() {
        model.normalize();
    }
    Ok(model)
}

fn strip_line_ending(buf: &[u8]) -> &[u8] {
    let buf = buf.strip_suffix(b"\n").unwrap_or(buf);
    buf.strip_suffix(b"\r").unwrap_or(buf)
}

/// Dispatch one line on its two-character identifier.
///
/// Length and identifier are checked on the raw bytes; the rest is decoded
/// lossily for the element parsers.
fn read_line(model: &mut Model, bytes: &[u8], line_number: usize) -> Result<()> {
    if bytes.is_empty() || bytes[0] == b'#' {
        return Ok(());
    }

    let line = String::from_utf8_lossy(bytes);
    if bytes.len() < 2 {
        return Err(ObjError::malformed(line_number, &line, "too short"));
    }
    let line: &str = &line;

    // `vt`, `vn` and `vp` must be followed by a space or the end of the line
    let separated = matches!(bytes.get(2), None | Some(b' '));
    let at = |err: MalformedLine| err.at_line(line_number);

    match &bytes[..2] {
        b"v " => model.vertices.push(parse_vertex(line).map_err(at)?),
        b"vt" if separated => model.texcoords.push(parse_texcoord(line).map_err(at)?),
        b"vn" if separated => model.normals.push(parse_normal(line).map_err(at)?),
        b"vp" if separated => model
            .param_space_vertices
            .push(parse_param_space_vertex(line).map_err(at)?),
        b"f " => {
            let refs = parse_face(line).map_err(at)?;
            let face = resolve_face(model, &refs, line_number)?;
            model.faces.push(face);
        }
        prefix => {
            return Err(ObjError::UnknownToken {
                prefix: String::from_utf8_lossy(prefix).into_owned(),
                line: line_number,
            })
        }
    }
    Ok(())
}

/// Rewrite 1-based and negative indices into 0-based offsets against the
/// counts read so far.
fn resolve_face(model: &Model, refs: &[RawFaceRef], line_number: usize) -> Result<Face> {
    let out_of_bounds = |kind| ObjError::InvalidFace {
        line: line_number,
        kind,
    };

    let vertices = refs
        .iter()
        .map(|r| -> Result<FaceVertex> {
            let vertex = resolve_index(r.vertex, model.vertices.len())
                .ok_or_else(|| out_of_bounds(IndexKind::Vertex))?;
            let texcoord = r
                .texcoord
                .map(|i| resolve_index(i, model.texcoords.len()))
                .map(|resolved| resolved.ok_or_else(|| out_of_bounds(IndexKind::TextureCoordinate)))
                .transpose()?;
            let normal = r
                .normal
                .map(|i| resolve_index(i, model.normals.len()))
                .map(|resolved| resolved.ok_or_else(|| out_of_bounds(IndexKind::Normal)))
                .transpose()?;
            Ok(FaceVertex {
                vertex,
                texcoord,
                normal,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(Face { vertices })
}

/// `k` becomes `k - 1`, `-k` becomes `count - k`; `None` when out of range.
fn resolve_index(index: i64, count: usize) -> Option<usize> {
    let count = i64::try_from(count).ok()?;
    let resolved = if index < 0 { count + index } else { index - 1 };
    if (0..count).contains(&resolved) {
        usize::try_from(resolved).ok()
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<Model> {
        parse_obj(text.as_bytes(), "test.obj")
    }

    const TRIANGLE: &str = "v 0 0 0\nv 1 0 0\nv 0 1 0\n";

    #[test]
    fn test_resolve_index() {
        assert_eq!(resolve_index(1, 3), Some(0));
        assert_eq!(resolve_index(3, 3), Some(2));
        assert_eq!(resolve_index(-1, 3), Some(2));
        assert_eq!(resolve_index(-3, 3), Some(0));
        assert_eq!(resolve_index(0, 3), None);
        assert_eq!(resolve_index(4, 3), None);
        assert_eq!(resolve_index(-4, 3), None);
        assert_eq!(resolve_index(1, 0), None);
    }

    #[test]
    fn test_positive_and_negative_faces() {
        let model = parse(&format!("{TRIANGLE}f 1 2 3\nf -1 -2 -3\n")).unwrap();
        let first: Vec<usize> = model.faces()[0].vertices.iter().map(|r| r.vertex).collect();
        let second: Vec<usize> = model.faces()[1].vertices.iter().map(|r| r.vertex).collect();
        assert_eq!(first, vec![0, 1, 2]);
        assert_eq!(second, vec![2, 1, 0]);
    }

    #[test]
    fn test_negative_indices_use_counts_at_parse_time() {
        let text = format!("{TRIANGLE}f -3 -2 -1\nv 5 5 5\nf -3 -2 -1\n");
        let model = parse(&text).unwrap();
        let first: Vec<usize> = model.faces()[0].vertices.iter().map(|r| r.vertex).collect();
        let second: Vec<usize> = model.faces()[1].vertices.iter().map(|r| r.vertex).collect();
        assert_eq!(first, vec![0, 1, 2]);
        assert_eq!(second, vec![1, 2, 3]);
    }

    #[test]
    fn test_forward_references_fail() {
        let err = parse("v 0 0 0\nv 1 0 0\nf 1 2 3\nv 0 1 0\n").unwrap_err();
        assert!(matches!(
            err,
            ObjError::InvalidFace {
                line: 3,
                kind: IndexKind::Vertex
            }
        ));
    }

    #[test]
    fn test_negative_texcoord_and_normal_indices() {
        let text = format!("{TRIANGLE}vt 0 0\nvt 1 0\nvn 0 0 1\nvn 0 1 0\nf 1/-1/-1 2/-1/-1 3/-1/-1\n");
        let model = parse(&text).unwrap();
        let face = &model.faces()[0];
        let vertices: Vec<usize> = face.vertices.iter().map(|r| r.vertex).collect();
        assert_eq!(vertices, vec![0, 1, 2]);
        for r in &face.vertices {
            assert_eq!(r.texcoord, Some(1));
            assert_eq!(r.normal, Some(1));
        }
    }

    #[test]
    fn test_texcoord_and_normal_bounds() {
        let err = parse(&format!("{TRIANGLE}vt 0 0\nf 1/1 2/2 3/1\n")).unwrap_err();
        assert!(matches!(
            err,
            ObjError::InvalidFace {
                line: 5,
                kind: IndexKind::TextureCoordinate
            }
        ));

        let err = parse(&format!("{TRIANGLE}f 1//1 2//1 3//1\n")).unwrap_err();
        assert!(matches!(
            err,
            ObjError::InvalidFace {
                kind: IndexKind::Normal,
                ..
            }
        ));
    }

    #[test]
    fn test_zero_index_is_out_of_bounds() {
        assert!(matches!(
            parse(&format!("{TRIANGLE}f 0 1 2\n")),
            Err(ObjError::InvalidFace { .. })
        ));
    }

    #[test]
    fn test_too_short_line() {
        let err = parse("v 0 0 0\nv\n").unwrap_err();
        match err {
            ObjError::MalformedElement { line, reason, .. } => {
                assert_eq!(line, 2);
                assert_eq!(reason, "too short");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_single_non_utf8_byte_is_too_short() {
        let err = parse_obj(&b"v 0 0 0\n\xff\n"[..], "test.obj").unwrap_err();
        match err {
            ObjError::MalformedElement { line, reason, .. } => {
                assert_eq!(line, 2);
                assert_eq!(reason, "too short");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_malformed_element_carries_line() {
        let err = parse("# header\nv 1 2\n").unwrap_err();
        match err {
            ObjError::MalformedElement { line, content, .. } => {
                assert_eq!(line, 2);
                assert_eq!(content, "v 1 2");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_unknown_tokens() {
        for (text, prefix) in [
            ("mtllib foo.mtl\n", "mt"),
            ("l 1 2\n", "l "),
            ("vna 0 0 1\n", "vn"),
            ("usemtl red\n", "us"),
            ("v\t0 0 0\n", "v\t"),
        ] {
            match parse(text).unwrap_err() {
                ObjError::UnknownToken { prefix: found, line } => {
                    assert_eq!(found, prefix);
                    assert_eq!(line, 1);
                }
                other => panic!("unexpected error {other:?}"),
            }
        }
    }

    #[test]
    fn test_param_space_vertices_are_kept() {
        let model = parse(&format!("{TRIANGLE}vp 0.5\nvp 0.1 0.2 0.3\n")).unwrap();
        assert_eq!(model.param_space_vertices().len(), 2);
        assert_eq!(model.param_space_vertices()[0].w, 1.0);
    }

    #[test]
    fn test_crlf_and_missing_final_newline() {
        let model = parse("v 0 0 0\r\nv 1 0 0\r\nv 0 1 0\r\nf 1 2 3").unwrap();
        assert_eq!(model.vertices().len(), 3);
        assert_eq!(model.faces().len(), 1);
    }

    #[test]
    fn test_empty_input_skips_normalize() {
        let model = parse("").unwrap();
        assert!(model.is_empty());
        assert_eq!(model.accumulated_scale(), 1.0);
    }

    #[test]
    fn test_huge_coordinates_stay_finite() {
        let text = "v 1e308 1e308 1e308\nv 1.5e308 1e308 1e308\nv 1e308 1.2e308 1e308\nf 1 2 3\n";
        let in_cube = |model: &Model| {
            model
                .vertices()
                .iter()
                .all(|v| v.position.iter().all(|c| c.is_finite() && c.abs() <= 1.0 + 1e-12))
        };

        let mut model = parse(text).unwrap();
        assert!(in_cube(&model));

        model.center();
        assert!(in_cube(&model));

        model.rotate(30.0, 45.0, 60.0);
        assert!(model
            .vertices()
            .iter()
            .all(|v| v.position.iter().all(|c| c.is_finite())));
    }

    #[test]
    fn test_load_is_normalized() {
        let model = parse("v 10 10 10\nv 14 10 10\nv 10 12 10\n").unwrap();
        for vertex in model.vertices() {
            assert!(vertex.position.iter().all(|c| c.abs() <= 1.0));
        }
    }
}
