use std::sync::Arc;

use crate::config::AppConfig;
use crate::generators::{build_converter, OfferLetterRenderer};
use crate::ledger::LedgerWriter;
use crate::notify::{DisabledNotifier, Notifier, NotifyError, SmtpNotifier};
use crate::offer::pipeline::OfferPipeline;
use crate::storage::ArtifactStore;

/// Shared application state handed to every request.
#[derive(Clone)]
pub struct AppState {
    pub pipeline: OfferPipeline,
}

impl AppState {
    pub fn new(pipeline: OfferPipeline) -> Self {
        Self { pipeline }
    }

    /// Wire the pipeline from configuration.
    ///
    /// Must run inside a Tokio runtime: the ledger worker is spawned here.
    pub fn from_config(config: &AppConfig) -> Result<Self, NotifyError> {
        let notifier: Arc<dyn Notifier> = match &config.mail {
            Some(mail) => {
                log::info!(
                    "Mail delivery via {}:{} as {}",
                    mail.relay_host,
                    mail.port,
                    mail.user
                );
                Arc::new(SmtpNotifier::new(mail, config.company_name.clone())?)
            }
            None => {
                log::warn!("MAIL_USER / MAIL_PASSWORD not set, offers will not be emailed");
                Arc::new(DisabledNotifier)
            }
        };

        log::info!(
            "Using {} converter, template {}",
            config.converter,
            config.template_path.display()
        );
        if !config.template_path.is_file() {
            log::warn!(
                "Offer letter template not found at {}; submissions will be rejected",
                config.template_path.display()
            );
        }

        let pipeline = OfferPipeline::new(
            OfferLetterRenderer::new(&config.template_path, config.company_name.clone()),
            build_converter(config.converter, config.converter_bin.clone()),
            LedgerWriter::spawn(&config.ledger_path),
            notifier,
            ArtifactStore::new(&config.artifact_dir),
        );
        Ok(Self::new(pipeline))
    }
}
