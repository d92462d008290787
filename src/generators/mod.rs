//! Generators module - turns a validated offer into a deliverable artifact.
//!
//! - `template` renders the HTML offer letter and embeds the QR code
//! - `converter` turns the rendered HTML into a PDF (or falls back to HTML)
//! - `workspace` owns the per-request scratch directory

pub mod artifact;
pub mod common;
pub mod converter;
pub mod qr;
pub mod template;
pub mod workspace;

pub use artifact::{Artifact, ArtifactFormat};
pub use converter::{
    build_converter, convert_or_fallback, ArtifactConverter, ConversionError, ConverterKind,
    HtmlToPdfConverter, OfficeConverter, RasterPdfConverter,
};
pub use template::{OfferLetterRenderer, RenderedDocument};
pub use workspace::RequestWorkspace;

use thiserror::Error;

/// Errors that abort document generation.
#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("failed to load offer letter template: {0}")]
    TemplateIo(#[source] std::io::Error),
    #[error("failed to render offer letter template: {0}")]
    Template(#[from] tera::Error),
    #[error("failed to create request workspace: {0}")]
    Workspace(#[source] std::io::Error),
    #[error("failed to write rendered document: {0}")]
    WriteDocument(#[source] std::io::Error),
}
