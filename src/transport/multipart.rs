use std::path::{Path, PathBuf};

use serde::Serialize;
use uuid::Uuid;

const OCTET_STREAM: &str = "application/octet-stream";

#[derive(Debug, thiserror::Error)]
pub enum MultipartError {
    #[error("failed to serialize part {name:?}: {source}")]
    Json {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to read attachment {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A file part: name shown to the server, media type and raw bytes.
pub struct Attachment {
    pub filename: String,
    pub content_type: String,
    pub content: Vec<u8>,
}

impl Attachment {
    pub fn new(
        filename: impl Into<String>,
        content_type: impl Into<String>,
        content: impl Into<Vec<u8>>,
    ) -> Self {
        Self {
            filename: filename.into(),
            content_type: content_type.into(),
            content: content.into(),
        }
    }

    /// Read a file from disk. The filename and media type come from the path.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, MultipartError> {
        let path = path.as_ref();
        let content = std::fs::read(path).map_err(|source| MultipartError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        let content_type = content_type_for(path);
        Ok(Self {
            filename,
            content_type: content_type.to_owned(),
            content,
        })
    }

    pub fn len(&self) -> usize {
        self.content.len()
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

fn content_type_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("txt") => "text/plain",
        Some("html" | "htm") => "text/html",
        Some("json") => "application/json",
        Some("xml" | "smil") => "application/xml",
        Some("pdf") => "application/pdf",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("mp3") => "audio/mpeg",
        Some("mp4") => "video/mp4",
        _ => OCTET_STREAM,
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
/// A fully assembled `multipart/form-data` body and the boundary it uses.
pub struct MultipartBody {
    boundary: String,
    body: Vec<u8>,
}

impl MultipartBody {
    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    /// Value for the `Content-Type` header.
    pub fn content_type(&self) -> String {
        format!("multipart/form-data; boundary={}", self.boundary)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.body
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.body
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

#[derive(Debug)]
/// Writes named parts into one `multipart/form-data` body.
///
/// ```rust
/// use infobip::transport::{Attachment, MultipartWriter};
///
/// let mut writer = MultipartWriter::new();
/// writer
///     .text("from", "Jane <jane@example.com>")
///     .file("attachment", &Attachment::new("a.txt", "text/plain", "hi"));
/// let body = writer.finish();
/// assert!(body.content_type().ends_with(body.boundary()));
/// ```
pub struct MultipartWriter {
    boundary: String,
    body: Vec<u8>,
}

impl Default for MultipartWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl MultipartWriter {
    /// Start a body with a random boundary.
    pub fn new() -> Self {
        Self::with_boundary(Uuid::new_v4().simple().to_string())
    }

    pub fn with_boundary(boundary: impl Into<String>) -> Self {
        Self {
            boundary: boundary.into(),
            body: Vec::new(),
        }
    }

    pub fn boundary(&self) -> &str {
        &self.boundary
    }

    pub fn text(&mut self, name: &str, value: &str) -> &mut Self {
        self.part(name, None, None, value.as_bytes())
    }

    /// Skipped when `value` is `None` or empty.
    pub fn text_opt(&mut self, name: &str, value: Option<&str>) -> &mut Self {
        match value {
            Some(value) if !value.is_empty() => self.text(name, value),
            _ => self,
        }
    }

    /// One text part per value, all named `name`.
    pub fn texts<I, S>(&mut self, name: &str, values: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for value in values {
            self.text(name, value.as_ref());
        }
        self
    }

    /// A part holding `value` serialized as JSON.
    pub fn json<T: Serialize + ?Sized>(
        &mut self,
        name: &str,
        value: &T,
    ) -> Result<&mut Self, MultipartError> {
        let bytes = super::json::to_vec(value).map_err(|source| MultipartError::Json {
            name: name.to_owned(),
            source,
        })?;
        Ok(self.part(name, None, Some("application/json"), &bytes))
    }

    pub fn xml(&mut self, name: &str, value: &str) -> &mut Self {
        self.part(name, None, Some("application/xml"), value.as_bytes())
    }

    /// A file part. A blank or multi-line media type falls back to `application/octet-stream`.
    pub fn file(&mut self, name: &str, attachment: &Attachment) -> &mut Self {
        let content_type = attachment.content_type.trim();
        let content_type = if content_type.is_empty() || content_type.contains(['\r', '\n']) {
            OCTET_STREAM
        } else {
            content_type
        };
        self.part(
            name,
            Some(&attachment.filename),
            Some(content_type),
            &attachment.content,
        )
    }

    /// Write the closing boundary.
    pub fn finish(mut self) -> MultipartBody {
        self.body
            .extend_from_slice(format!("--{}--\r\n", self.boundary).as_bytes());
        MultipartBody {
            boundary: self.boundary,
            body: self.body,
        }
    }

    fn part(
        &mut self,
        name: &str,
        filename: Option<&str>,
        content_type: Option<&str>,
        value: &[u8],
    ) -> &mut Self {
        let mut head = format!(
            "--{}\r\nContent-Disposition: form-data; name=\"{}\"",
            self.boundary,
            escape_param(name)
        );
        if let Some(filename) = filename {
            head.push_str(&format!("; filename=\"{}\"", escape_param(filename)));
        }
        head.push_str("\r\n");
        if let Some(content_type) = content_type {
            head.push_str(&format!("Content-Type: {content_type}\r\n"));
        }
        head.push_str("\r\n");

        self.body.extend_from_slice(head.as_bytes());
        self.body.extend_from_slice(value);
        self.body.extend_from_slice(b"\r\n");
        self
    }
}

/// Quoted-string value for a `Content-Disposition` parameter.
///
/// CR and LF are percent-encoded so a value can never end the header line.
fn escape_param(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '\\' => escaped.push_str("\\\\"),
            '"' => escaped.push_str("\\\""),
            '\r' => escaped.push_str("%0D"),
            '\n' => escaped.push_str("%0A"),
            _ => escaped.push(ch),
        }
    }
    escaped
}
