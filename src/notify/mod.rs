//! Offer letter delivery by email.

pub mod email;

pub use email::{build_offer_message, SmtpNotifier};

use async_trait::async_trait;
use thiserror::Error;

use crate::generators::Artifact;
use crate::offer::models::OfferSubmission;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("mail delivery is not configured (MAIL_USER / MAIL_PASSWORD unset)")]
    NotConfigured,
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),
    #[error("email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),
    #[error("email body rendering failed: {0}")]
    Template(#[from] tera::Error),
    #[error("email build error: {0}")]
    Build(String),
}

/// Sends a finished offer letter to its recipient.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_offer(
        &self,
        submission: &OfferSubmission,
        artifact: &Artifact,
    ) -> Result<(), NotifyError>;
}

/// Notifier used when no mail credentials are configured.
pub struct DisabledNotifier;

#[async_trait]
impl Notifier for DisabledNotifier {
    async fn send_offer(
        &self,
        submission: &OfferSubmission,
        _artifact: &Artifact,
    ) -> Result<(), NotifyError> {
        log::warn!(
            "[{}] mail delivery not configured, offer not sent",
            submission.offer_id
        );
        Err(NotifyError::NotConfigured)
    }
}
