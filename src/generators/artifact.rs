//! The deliverable file and its format.

/// Format of a delivered artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactFormat {
    Pdf,
    /// The rendered document, delivered when conversion failed.
    Html,
}

impl ArtifactFormat {
    pub fn mime_type(&self) -> &'static str {
        match self {
            Self::Pdf => "application/pdf",
            Self::Html => "text/html",
        }
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Html => "html",
        }
    }
}

/// A finished offer letter ready for storage, mail and download.
#[derive(Debug, Clone)]
pub struct Artifact {
    pub filename: String,
    pub bytes: Vec<u8>,
    pub format: ArtifactFormat,
}

impl Artifact {
    pub fn new(stem: &str, bytes: Vec<u8>, format: ArtifactFormat) -> Self {
        Self {
            filename: format!("{}.{}", stem, format.extension()),
            bytes,
            format,
        }
    }

    pub fn mime_type(&self) -> &'static str {
        self.format.mime_type()
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}

/// Check for the `%PDF` magic bytes.
pub fn looks_like_pdf(data: &[u8]) -> bool {
    data.starts_with(b"%PDF")
}
