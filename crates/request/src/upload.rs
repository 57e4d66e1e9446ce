//! Uploaded file descriptors.

use std::path::{Path, PathBuf};

use mime::Mime;

/// Metadata for a file uploaded with the request.
///
/// The routing layer never reads file contents; it only carries the
/// descriptor so controllers can locate the temporary file the hosting
/// environment wrote.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    name: String,
    path: PathBuf,
    size: u64,
    content_type: Option<Mime>,
}

impl UploadedFile {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>, size: u64) -> Self {
        Self { name: name.into(), path: path.into(), size, content_type: None }
    }

    pub fn with_content_type(mut self, content_type: Mime) -> Self {
        self.content_type = Some(content_type);
        self
    }

    /// The client-supplied file name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Where the hosting environment stored the uploaded bytes.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Size of the upload in bytes.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// The declared content type, if the client sent one.
    pub fn content_type(&self) -> Option<&Mime> {
        self.content_type.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_carries_all_fields() {
        let file = UploadedFile::new("avatar.png", "/tmp/upload-1", 2048).with_content_type(mime::IMAGE_PNG);

        assert_eq!(file.name(), "avatar.png");
        assert_eq!(file.path(), Path::new("/tmp/upload-1"));
        assert_eq!(file.size(), 2048);
        assert_eq!(file.content_type(), Some(&mime::IMAGE_PNG));
    }
}
