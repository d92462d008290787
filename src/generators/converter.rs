//! PDF conversion of the rendered offer letter.
//!
//! Three interchangeable strategies, selected at configuration time:
//! - `DirectRender` - headless HTML renderer (`wkhtmltopdf`)
//! - `NativeOffice` - office suite converter (`soffice --convert-to pdf`)
//! - `RasterFallback` - HTML to PNG (`wkhtmltoimage`), then a single-page PDF
//!
//! Conversion never aborts the pipeline: [`convert_or_fallback`] delivers the
//! rendered HTML whenever a converter fails.

use std::fmt;
use std::fs;
use std::path::Path;
use std::process::Command;
use std::str::FromStr;
use std::sync::Arc;

use thiserror::Error;

use super::artifact::{looks_like_pdf, Artifact, ArtifactFormat};
use super::template::RenderedDocument;
use super::workspace::RequestWorkspace;
use crate::config::ConfigError;

/// Page width of the raster PDF (A4).
const RASTER_PAGE_WIDTH_MM: f32 = 210.0;
const MM_PER_INCH: f32 = 25.4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConverterKind {
    DirectRender,
    NativeOffice,
    RasterFallback,
}

impl ConverterKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DirectRender => "direct-render",
            Self::NativeOffice => "native-office",
            Self::RasterFallback => "raster-fallback",
        }
    }

    /// Executable used when no override is configured.
    pub fn default_program(&self) -> &'static str {
        match self {
            Self::DirectRender => "wkhtmltopdf",
            Self::NativeOffice => "soffice",
            Self::RasterFallback => "wkhtmltoimage",
        }
    }
}

impl fmt::Display for ConverterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConverterKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "direct-render" | "direct" | "wkhtmltopdf" => Ok(Self::DirectRender),
            "native-office" | "native" | "soffice" => Ok(Self::NativeOffice),
            "raster-fallback" | "raster" => Ok(Self::RasterFallback),
            _ => Err(ConfigError::UnknownConverter(s.to_string())),
        }
    }
}

#[derive(Debug, Error)]
pub enum ConversionError {
    #[error("failed to launch {program}: {source}")]
    Launch {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{program} exited with status {code}")]
    Exit { program: String, code: i32 },
    #[error("failed to read converter output: {0}")]
    ReadOutput(#[source] std::io::Error),
    #[error("converter output is not a PDF")]
    NotPdf,
    #[error("failed to assemble raster PDF: {0}")]
    Raster(String),
}

/// Turns a rendered document into PDF bytes.
pub trait ArtifactConverter: Send + Sync {
    fn kind(&self) -> ConverterKind;

    fn convert(
        &self,
        document: &RenderedDocument,
        workspace: &RequestWorkspace,
    ) -> Result<Vec<u8>, ConversionError>;
}

/// Build the converter for `kind`, optionally overriding its executable.
pub fn build_converter(kind: ConverterKind, program: Option<String>) -> Arc<dyn ArtifactConverter> {
    let program = program.unwrap_or_else(|| kind.default_program().to_string());
    match kind {
        ConverterKind::DirectRender => Arc::new(HtmlToPdfConverter::new(program)),
        ConverterKind::NativeOffice => Arc::new(OfficeConverter::new(program)),
        ConverterKind::RasterFallback => Arc::new(RasterPdfConverter::new(program)),
    }
}

/// Convert `document` to PDF, or fall back to the rendered HTML.
///
/// Returns the artifact and, on fallback, a warning for the user.
pub fn convert_or_fallback(
    converter: &dyn ArtifactConverter,
    document: &RenderedDocument,
    workspace: &RequestWorkspace,
    file_stem: &str,
) -> (Artifact, Option<String>) {
    let result = converter.convert(document, workspace).and_then(|pdf| {
        if looks_like_pdf(&pdf) {
            Ok(pdf)
        } else {
            Err(ConversionError::NotPdf)
        }
    });

    match result {
        Ok(pdf) => (Artifact::new(file_stem, pdf, ArtifactFormat::Pdf), None),
        Err(e) => {
            log::warn!(
                "[{}] {} conversion failed, delivering HTML: {}",
                workspace.offer_id(),
                converter.kind(),
                e
            );
            let artifact = Artifact::new(
                file_stem,
                document.html.as_bytes().to_vec(),
                ArtifactFormat::Html,
            );
            let warning = format!(
                "PDF conversion ({}) failed: {}. The offer letter is delivered as HTML instead",
                converter.kind(),
                e
            );
            (artifact, Some(warning))
        }
    }
}

/// Headless HTML to PDF rendering.
#[derive(Debug, Clone)]
pub struct HtmlToPdfConverter {
    program: String,
}

impl HtmlToPdfConverter {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl ArtifactConverter for HtmlToPdfConverter {
    fn kind(&self) -> ConverterKind {
        ConverterKind::DirectRender
    }

    fn convert(
        &self,
        document: &RenderedDocument,
        workspace: &RequestWorkspace,
    ) -> Result<Vec<u8>, ConversionError> {
        let output = workspace.file(&format!("offer-{}.pdf", workspace.offer_id()));
        let mut command = Command::new(&self.program);
        command
            .arg("--quiet")
            .arg("--enable-local-file-access")
            .arg(&document.path)
            .arg(&output);
        run_tool(&self.program, command, workspace.path())?;
        fs::read(&output).map_err(ConversionError::ReadOutput)
    }
}

/// Office suite conversion; only usable where an office suite is installed.
#[derive(Debug, Clone)]
pub struct OfficeConverter {
    program: String,
}

impl OfficeConverter {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl ArtifactConverter for OfficeConverter {
    fn kind(&self) -> ConverterKind {
        ConverterKind::NativeOffice
    }

    fn convert(
        &self,
        document: &RenderedDocument,
        workspace: &RequestWorkspace,
    ) -> Result<Vec<u8>, ConversionError> {
        let mut command = Command::new(&self.program);
        command
            .arg("--headless")
            .arg("--convert-to")
            .arg("pdf")
            .arg("--outdir")
            .arg(workspace.path())
            .arg(&document.path);
        run_tool(&self.program, command, workspace.path())?;

        // soffice keeps the input stem and swaps the extension.
        let output = document.path.with_extension("pdf");
        fs::read(&output).map_err(ConversionError::ReadOutput)
    }
}

/// HTML to raster image to single-page PDF.
#[derive(Debug, Clone)]
pub struct RasterPdfConverter {
    program: String,
}

impl RasterPdfConverter {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl ArtifactConverter for RasterPdfConverter {
    fn kind(&self) -> ConverterKind {
        ConverterKind::RasterFallback
    }

    fn convert(
        &self,
        document: &RenderedDocument,
        workspace: &RequestWorkspace,
    ) -> Result<Vec<u8>, ConversionError> {
        let image_path = workspace.file(&format!("offer-{}.png", workspace.offer_id()));
        let mut command = Command::new(&self.program);
        command
            .arg("--quiet")
            .arg("--enable-local-file-access")
            .arg("--format")
            .arg("png")
            .arg(&document.path)
            .arg(&image_path);
        run_tool(&self.program, command, workspace.path())?;

        let png = fs::read(&image_path).map_err(ConversionError::ReadOutput)?;
        png_to_single_page_pdf(&png, &format!("Offer {}", workspace.offer_id()))
    }
}

/// Place a raster image on a single A4-wide page sized to the image.
pub fn png_to_single_page_pdf(png: &[u8], title: &str) -> Result<Vec<u8>, ConversionError> {
    use printpdf::image_crate::{self, DynamicImage, GenericImageView};
    use printpdf::{Image, ImageTransform, Mm, PdfDocument};

    let raster = image_crate::load_from_memory(png)
        .map_err(|e| ConversionError::Raster(e.to_string()))?;
    let (width_px, height_px) = GenericImageView::dimensions(&raster);
    if width_px == 0 || height_px == 0 {
        return Err(ConversionError::Raster("raster image is empty".to_string()));
    }

    let dpi = width_px as f32 * MM_PER_INCH / RASTER_PAGE_WIDTH_MM;
    let page_height_mm = height_px as f32 * MM_PER_INCH / dpi;

    let (doc, page, layer) = PdfDocument::new(
        title,
        Mm(RASTER_PAGE_WIDTH_MM),
        Mm(page_height_mm),
        "offer letter",
    );
    let layer = doc.get_page(page).get_layer(layer);
    let rgb = DynamicImage::ImageRgb8(raster.to_rgb8());
    Image::from_dynamic_image(&rgb).add_to_layer(
        layer,
        ImageTransform {
            dpi: Some(dpi),
            ..Default::default()
        },
    );

    doc.save_to_bytes()
        .map_err(|e| ConversionError::Raster(e.to_string()))
}

fn run_tool(program: &str, mut command: Command, cwd: &Path) -> Result<(), ConversionError> {
    let output = command
        .current_dir(cwd)
        .output()
        .map_err(|source| ConversionError::Launch {
            program: program.to_string(),
            source,
        })?;

    if !output.status.success() {
        log::debug!(
            "{} stderr: {}",
            program,
            String::from_utf8_lossy(&output.stderr)
        );
        return Err(ConversionError::Exit {
            program: program.to_string(),
            code: output.status.code().unwrap_or(-1),
        });
    }
    Ok(())
}
