//! objview core - Wavefront OBJ ingestion and geometry
//!
//! Parses the `v`/`vt`/`vn`/`vp`/`f` subset of OBJ into a [`Model`], applies
//! in-place transformations to it and emits it to a polygon [`Renderer`].

pub mod display;
pub mod element;
pub mod error;
pub mod loader;
pub mod model;
pub mod tokenize;
pub mod transform;

// Re-export commonly used types
pub use display::{draw_model, draw_models, face_color, Renderer};
pub use element::{Face, FaceVertex, Normal, ParamSpaceVertex, TexCoord, Vertex};
pub use error::{IndexKind, ObjError};
pub use loader::{load_obj, parse_obj};
pub use model::Model;
