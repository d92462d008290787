//! The offer pipeline: validate, identify, render, convert, log, notify.
//!
//! Every stage but conversion and notification aborts the submission on
//! failure. Conversion falls back to the rendered HTML; a failed send is
//! reported in the outcome while the artifact stays downloadable.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::Local;
use thiserror::Error;

use super::identifier::generate_offer_id;
use super::models::{DeliveryStatus, OfferRequest, OfferSubmission};
use super::validation::{validate_offer, ValidationError};
use crate::generators::common::offer_file_stem;
use crate::generators::{
    convert_or_fallback, Artifact, ArtifactConverter, GeneratorError, OfferLetterRenderer,
    RequestWorkspace,
};
use crate::ledger::{LedgerError, LedgerRecord, LedgerWriter};
use crate::notify::Notifier;
use crate::storage::{ArtifactStore, StorageError};

/// Lifecycle of one submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionStage {
    Received,
    Validated,
    Identified,
    Rendered,
    Converted,
    Logged,
    Sent,
    SendFailed,
}

impl SubmissionStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Received => "received",
            Self::Validated => "validated",
            Self::Identified => "identified",
            Self::Rendered => "rendered",
            Self::Converted => "converted",
            Self::Logged => "logged",
            Self::Sent => "sent",
            Self::SendFailed => "send-failed",
        }
    }
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("{0}")]
    Validation(#[from] ValidationError),
    #[error("{0}")]
    Render(#[from] GeneratorError),
    #[error("{0}")]
    Store(#[from] StorageError),
    #[error("{0}")]
    Ledger(#[from] LedgerError),
    #[error("document generation task failed: {0}")]
    Task(String),
}

impl PipelineError {
    /// Name of the stage that failed.
    pub fn stage(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validate",
            Self::Render(_) | Self::Task(_) => "render",
            Self::Store(_) => "store",
            Self::Ledger(_) => "ledger",
        }
    }
}

/// Result of a submission that reached the notification stage.
#[derive(Debug)]
pub struct OfferOutcome {
    pub submission: OfferSubmission,
    pub artifact: Artifact,
    pub stored_at: PathBuf,
    pub status: DeliveryStatus,
    pub message: String,
    pub warnings: Vec<String>,
}

#[derive(Clone)]
pub struct OfferPipeline {
    renderer: OfferLetterRenderer,
    converter: Arc<dyn ArtifactConverter>,
    ledger: LedgerWriter,
    notifier: Arc<dyn Notifier>,
    store: ArtifactStore,
}

impl OfferPipeline {
    pub fn new(
        renderer: OfferLetterRenderer,
        converter: Arc<dyn ArtifactConverter>,
        ledger: LedgerWriter,
        notifier: Arc<dyn Notifier>,
        store: ArtifactStore,
    ) -> Self {
        Self {
            renderer,
            converter,
            ledger,
            notifier,
            store,
        }
    }

    pub fn store(&self) -> &ArtifactStore {
        &self.store
    }

    pub async fn process(&self, request: OfferRequest) -> Result<OfferOutcome, PipelineError> {
        log::debug!("offer request {}", SubmissionStage::Received.as_str());

        let validated = validate_offer(
            &request,
            self.renderer.template_path(),
            Local::now().date_naive(),
        )
        .map_err(|e| {
            log::info!("offer request rejected ({}): {}", e.kind.as_str(), e);
            e
        })?;

        log::debug!("offer request {}", SubmissionStage::Validated.as_str());

        let submission = validated.identify(generate_offer_id());
        let offer_id = submission.offer_id.clone();
        log::info!("[{}] {}", offer_id, SubmissionStage::Identified.as_str());

        let renderer = self.renderer.clone();
        let converter = Arc::clone(&self.converter);
        let store = self.store.clone();
        let to_generate = submission.clone();
        let (artifact, stored_at, warnings) = tokio::task::spawn_blocking(move || {
            generate_artifact(&renderer, converter.as_ref(), &store, &to_generate)
        })
        .await
        .map_err(|e| PipelineError::Task(e.to_string()))?
        .map_err(|e| {
            log::error!("[{}] {} stage failed: {}", offer_id, e.stage(), e);
            e
        })?;

        if let Err(e) = self.ledger.append(LedgerRecord::from(&submission)).await {
            if let Err(cleanup) = self.store.remove(&offer_id) {
                log::warn!("[{}] failed to remove artifact: {}", offer_id, cleanup);
            }
            return Err(e.into());
        }
        log::info!("[{}] {}", offer_id, SubmissionStage::Logged.as_str());

        let (status, message) = match self.notifier.send_offer(&submission, &artifact).await {
            Ok(()) => (DeliveryStatus::Sent, format!("Sent to {}", submission.email)),
            Err(e) => {
                log::error!("[{}] email failed: {}", offer_id, e);
                (DeliveryStatus::SendFailed, format!("Email failed: {}", e))
            }
        };
        let stage = match status {
            DeliveryStatus::Sent => SubmissionStage::Sent,
            DeliveryStatus::SendFailed => SubmissionStage::SendFailed,
        };
        log::info!("[{}] {}", offer_id, stage.as_str());

        Ok(OfferOutcome {
            submission,
            artifact,
            stored_at,
            status,
            message,
            warnings,
        })
    }
}

/// Render, convert and store the letter inside a per-request workspace.
fn generate_artifact(
    renderer: &OfferLetterRenderer,
    converter: &dyn ArtifactConverter,
    store: &ArtifactStore,
    submission: &OfferSubmission,
) -> Result<(Artifact, PathBuf, Vec<String>), PipelineError> {
    let offer_id = &submission.offer_id;
    let workspace = RequestWorkspace::create(offer_id)?;

    let document = renderer.render(submission, &workspace)?;
    log::info!("[{}] {}", offer_id, SubmissionStage::Rendered.as_str());

    let mut warnings = document.warnings.clone();
    let (artifact, fallback) = convert_or_fallback(
        converter,
        &document,
        &workspace,
        &offer_file_stem(&submission.intern_name),
    );
    warnings.extend(fallback);
    log::info!(
        "[{}] {} ({})",
        offer_id,
        SubmissionStage::Converted.as_str(),
        artifact.filename
    );

    let stored_at = store.save(offer_id, &artifact)?;
    Ok((artifact, stored_at, warnings))
}
