#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDate;
use intern_offer_server::generators::{
    ArtifactConverter, Artifact, ConversionError, ConverterKind, OfferLetterRenderer,
    RenderedDocument, RequestWorkspace,
};
use intern_offer_server::ledger::LedgerWriter;
use intern_offer_server::notify::{Notifier, NotifyError};
use intern_offer_server::offer::models::{OfferRequest, OfferSubmission};
use intern_offer_server::offer::pipeline::OfferPipeline;
use intern_offer_server::storage::ArtifactStore;

pub const TEMPLATE_WITH_QR: &str = r#"<html><body>
<p>Dear {{ intern_name }}, welcome to {{ domain }}.</p>
<p>{{ start_date }} - {{ end_date }} (offered {{ offer_date }}), ref {{ offer_id }}</p>
<table><tr><td class="qr"><img src="{{ qr_code | safe }}"></td></tr></table>
</body></html>"#;

pub const TEMPLATE_WITHOUT_QR: &str = "<html><body><p>Dear {{ intern_name }}</p></body></html>";

/// Converter that always yields a minimal PDF.
pub struct StubPdfConverter;

impl ArtifactConverter for StubPdfConverter {
    fn kind(&self) -> ConverterKind {
        ConverterKind::DirectRender
    }

    fn convert(
        &self,
        document: &RenderedDocument,
        _workspace: &RequestWorkspace,
    ) -> Result<Vec<u8>, ConversionError> {
        let mut pdf = b"%PDF-1.4\n".to_vec();
        pdf.extend_from_slice(document.html.as_bytes());
        Ok(pdf)
    }
}

/// Converter whose external tool always exits non-zero.
pub struct FailingConverter;

impl ArtifactConverter for FailingConverter {
    fn kind(&self) -> ConverterKind {
        ConverterKind::NativeOffice
    }

    fn convert(
        &self,
        _document: &RenderedDocument,
        _workspace: &RequestWorkspace,
    ) -> Result<Vec<u8>, ConversionError> {
        Err(ConversionError::Exit {
            program: "soffice".to_string(),
            code: 1,
        })
    }
}

/// Notifier that records recipients and optionally fails.
#[derive(Default)]
pub struct RecordingNotifier {
    pub sent: Mutex<Vec<(String, String)>>,
    pub fail: bool,
}

impl RecordingNotifier {
    pub fn failing() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn recipients(&self) -> Vec<(String, String)> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send_offer(
        &self,
        submission: &OfferSubmission,
        artifact: &Artifact,
    ) -> Result<(), NotifyError> {
        if self.fail {
            return Err(NotifyError::Build("relay refused connection".to_string()));
        }
        self.sent
            .lock()
            .unwrap()
            .push((submission.email.clone(), artifact.filename.clone()));
        Ok(())
    }
}

pub struct Fixture {
    pub pipeline: OfferPipeline,
    pub template_path: PathBuf,
    pub ledger_path: PathBuf,
    pub artifact_dir: PathBuf,
}

/// Build a pipeline rooted in `dir`. Pass `None` to leave the template absent.
pub fn fixture(
    dir: &Path,
    template: Option<&str>,
    converter: Arc<dyn ArtifactConverter>,
    notifier: Arc<dyn Notifier>,
) -> Fixture {
    let template_path = dir.join("offer_letter.html");
    if let Some(contents) = template {
        std::fs::write(&template_path, contents).unwrap();
    }
    let ledger_path = dir.join("intern_offers.csv");
    let artifact_dir = dir.join("artifacts");

    let pipeline = OfferPipeline::new(
        OfferLetterRenderer::new(&template_path, "SkyHighes Technologies"),
        converter,
        LedgerWriter::spawn(&ledger_path),
        notifier,
        ArtifactStore::new(&artifact_dir),
    );

    Fixture {
        pipeline,
        template_path,
        ledger_path,
        artifact_dir,
    }
}

pub fn jane_request() -> OfferRequest {
    OfferRequest {
        intern_name: Some("Jane Doe".to_string()),
        domain: Some("Data Science".to_string()),
        email: Some("jane@example.com".to_string()),
        start_date: NaiveDate::from_ymd_opt(2024, 1, 1),
        end_date: NaiveDate::from_ymd_opt(2024, 6, 1),
        offer_date: NaiveDate::from_ymd_opt(2023, 12, 1),
    }
}

/// Data rows of the ledger (header excluded).
pub fn ledger_rows(path: &Path) -> Vec<csv::StringRecord> {
    if !path.exists() {
        return Vec::new();
    }
    let mut reader = csv::Reader::from_path(path).unwrap();
    reader.records().map(|r| r.unwrap()).collect()
}

pub fn stored_files(artifact_dir: &Path) -> usize {
    if !artifact_dir.exists() {
        return 0;
    }
    std::fs::read_dir(artifact_dir)
        .unwrap()
        .filter_map(Result::ok)
        .map(|entry| std::fs::read_dir(entry.path()).unwrap().count())
        .sum()
}
