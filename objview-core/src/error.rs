//! Errors raised while loading OBJ files
use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Which index slot of a face reference failed its bounds check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexKind {
    Vertex,
    TextureCoordinate,
    Normal,
}

impl fmt::Display for IndexKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            IndexKind::Vertex => "vertex",
            IndexKind::TextureCoordinate => "texture coordinate",
            IndexKind::Normal => "normal",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum ObjError {
    #[error("file {} not found", path.display())]
    FileNotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("line {line} is invalid ({reason}): {content}")]
    MalformedElement {
        line: usize,
        content: String,
        reason: String,
    },

    #[error("unknown token {prefix} on line {line}")]
    UnknownToken { prefix: String, line: usize },

    #[error("line {line} is invalid ({kind} index out of bounds)")]
    InvalidFace { line: usize, kind: IndexKind },
}

impl ObjError {
    pub(crate) fn malformed(line: usize, content: &str, reason: impl Into<String>) -> Self {
        ObjError::MalformedElement {
            line,
            content: content.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ObjError>;
