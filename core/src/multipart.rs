//! `multipart/form-data` body encoding.
//!
//! # Design
//! `MultipartForm` is a consuming builder: parts accumulate in insertion
//! order and bytes are produced only by `close`, which takes the form by
//! value, so nothing can be appended to a finished body. The boundary is a
//! random v4 UUID fixed at construction, so `content_type()` may be read
//! before or after parts are added and always matches the encoded body.
//!
//! Wire layout per part:
//!
//! ```text
//! --{boundary}\r\n
//! Content-Disposition: form-data; name="{name}"[; filename="{filename}"]\r\n
//! [Content-Type: {mime}\r\n]
//! \r\n
//! {value}\r\n
//! ```
//!
//! followed by a single `--{boundary}--\r\n` terminator.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MultipartError {
    /// A part's name, filename or content contains the boundary token, which
    /// would split the part on the receiving side.
    #[error("part `{part}` contains the multipart boundary")]
    BoundaryCollision { part: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Part {
    Text {
        name: String,
        value: String,
    },
    File {
        name: String,
        filename: String,
        mime_type: String,
        bytes: Vec<u8>,
    },
}

impl Part {
    fn name(&self) -> &str {
        match self {
            Part::Text { name, .. } | Part::File { name, .. } => name,
        }
    }
}

/// An ordered set of form parts awaiting encoding.
#[derive(Debug, Clone)]
pub struct MultipartForm {
    boundary: String,
    parts: Vec<Part>,
}

impl Default for MultipartForm {
    fn default() -> Self {
        Self::new()
    }
}

impl MultipartForm {
    /// Create an empty form with a fresh random boundary.
    pub fn new() -> Self {
        Self::with_boundary(Uuid::new_v4().to_string())
    }

    /// Create an empty form with a caller-chosen boundary.
    pub fn with_boundary(boundary: impl Into<String>) -> Self {
        Self {
            boundary: boundary.into(),
            parts: Vec::new(),
        }
    }

    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    /// Value for the request's `Content-Type` header.
    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Append a UTF-8 text field.
    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.parts.push(Part::Text {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    /// Append a binary file part.
    pub fn file(
        mut self,
        name: impl Into<String>,
        filename: impl Into<String>,
        mime_type: impl Into<String>,
        bytes: impl Into<Vec<u8>>,
    ) -> Self {
        self.parts.push(Part::File {
            name: name.into(),
            filename: filename.into(),
            mime_type: mime_type.into(),
            bytes: bytes.into(),
        });
        self
    }

    /// Append a JPEG image part named `{name}` with filename `{name}.jpg`.
    pub fn jpeg(self, name: &str, bytes: impl Into<Vec<u8>>) -> Self {
        let filename = format!("{name}.jpg");
        self.file(name, filename, "image/jpeg", bytes)
    }

    /// Encode every part followed by the terminal delimiter.
    ///
    /// Fails if any part contains the boundary token.
    pub fn close(self) -> Result<MultipartBody, MultipartError> {
        let needle = self.boundary.as_bytes();
        for part in &self.parts {
            let collides = match part {
                Part::Text { name, value } => {
                    contains(name.as_bytes(), needle) || contains(value.as_bytes(), needle)
                }
                Part::File {
                    name,
                    filename,
                    mime_type,
                    bytes,
                } => {
                    contains(name.as_bytes(), needle)
                        || contains(filename.as_bytes(), needle)
                        || contains(mime_type.as_bytes(), needle)
                        || contains(bytes, needle)
                }
            };
            if collides {
                return Err(MultipartError::BoundaryCollision {
                    part: part.name().to_string(),
                });
            }
        }

        let content_type = self.content_type();
        let mut bytes = Vec::new();
        for part in self.parts {
            bytes.extend_from_slice(format!("--{}\r\n", self.boundary).as_bytes());
            match part {
                Part::Text { name, value } => {
                    bytes.extend_from_slice(
                        format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                    );
                    bytes.extend_from_slice(value.as_bytes());
                }
                Part::File {
                    name,
                    filename,
                    mime_type,
                    bytes: data,
                } => {
                    bytes.extend_from_slice(
                        format!(
                            "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n"
                        )
                        .as_bytes(),
                    );
                    bytes.extend_from_slice(format!("Content-Type: {mime_type}\r\n\r\n").as_bytes());
                    bytes.extend_from_slice(&data);
                }
            }
            bytes.extend_from_slice(b"\r\n");
        }
        bytes.extend_from_slice(format!("--{}--\r\n", self.boundary).as_bytes());

        Ok(MultipartBody {
            content_type,
            bytes,
        })
    }
}

/// A finished multipart body and its matching `Content-Type` header value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultipartBody {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    !needle.is_empty() && haystack.windows(needle.len()).any(|window| window == needle)
}
