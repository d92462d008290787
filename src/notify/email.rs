//! SMTP delivery of offer letters.
//!
//! [`SmtpNotifier`] wraps the `lettre` async SMTP transport. The relay is
//! reached over STARTTLS and the session is authenticated with the mail
//! user's credentials, which also provide the sender address.

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tera::{Context, Tera};

use super::{Notifier, NotifyError};
use crate::config::MailConfig;
use crate::generators::common::format_offer_date;
use crate::generators::Artifact;
use crate::offer::models::OfferSubmission;

const OFFER_EMAIL_TEMPLATE: &str = r#"<html><body>
<p>Dear {{ intern_name }},</p>
<p>We are pleased to offer you an internship at <strong>{{ company_name }}</strong>.</p>
<ul>
    <li><b>Domain:</b> {{ domain }}</li>
    <li><b>Start Date:</b> {{ start_date }}</li>
    <li><b>End Date:</b> {{ end_date }}</li>
    <li><b>Offer Date:</b> {{ offer_date }}</li>
    <li><b>Offer ID:</b> {{ offer_id }}</li>
</ul>
<p>Your offer letter is attached.</p>
</body></html>
"#;

pub struct SmtpNotifier {
    from: Mailbox,
    company_name: String,
    mailer: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpNotifier {
    pub fn new(config: &MailConfig, company_name: impl Into<String>) -> Result<Self, NotifyError> {
        let from: Mailbox = config.user.parse()?;
        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.relay_host)?
            .port(config.port)
            .credentials(Credentials::new(
                config.user.clone(),
                config.password.clone(),
            ))
            .build();

        Ok(Self {
            from,
            company_name: company_name.into(),
            mailer,
        })
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn send_offer(
        &self,
        submission: &OfferSubmission,
        artifact: &Artifact,
    ) -> Result<(), NotifyError> {
        let message =
            build_offer_message(self.from.clone(), submission, artifact, &self.company_name)?;
        self.mailer.send(message).await?;

        log::info!(
            "[{}] offer letter sent to {}",
            submission.offer_id,
            submission.email
        );
        Ok(())
    }
}

/// Assemble the offer email: HTML summary plus the artifact as attachment.
pub fn build_offer_message(
    from: Mailbox,
    submission: &OfferSubmission,
    artifact: &Artifact,
    company_name: &str,
) -> Result<Message, NotifyError> {
    let to: Mailbox = submission.email.parse()?;
    let body = render_offer_email(submission, company_name)?;
    let content_type = ContentType::parse(artifact.mime_type())
        .map_err(|e| NotifyError::Build(e.to_string()))?;
    let attachment =
        Attachment::new(artifact.filename.clone()).body(artifact.bytes.clone(), content_type);

    Message::builder()
        .from(from)
        .to(to)
        .subject(format!(
            "🎉 Your Internship Offer - {}",
            submission.intern_name
        ))
        .multipart(
            MultiPart::mixed()
                .singlepart(SinglePart::html(body))
                .singlepart(attachment),
        )
        .map_err(|e| NotifyError::Build(e.to_string()))
}

/// Render the HTML body of the offer email.
pub fn render_offer_email(
    submission: &OfferSubmission,
    company_name: &str,
) -> Result<String, NotifyError> {
    let mut context = Context::new();
    context.insert("intern_name", &submission.intern_name);
    context.insert("company_name", company_name);
    context.insert("domain", &submission.domain);
    context.insert("start_date", &format_offer_date(submission.start_date));
    context.insert("end_date", &format_offer_date(submission.end_date));
    context.insert("offer_date", &format_offer_date(submission.offer_date));
    context.insert("offer_id", &submission.offer_id);
    Ok(Tera::one_off(OFFER_EMAIL_TEMPLATE, &context, true)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generators::ArtifactFormat;
    use chrono::NaiveDate;

    fn submission(email: &str) -> OfferSubmission {
        OfferSubmission {
            offer_id: "MAIL12345".to_string(),
            intern_name: "Jane Doe".to_string(),
            domain: "Data Science".to_string(),
            email: email.to_string(),
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            offer_date: NaiveDate::from_ymd_opt(2023, 12, 1).unwrap(),
        }
    }

    fn artifact() -> Artifact {
        Artifact::new("Offer_Jane_Doe", b"%PDF-1.4 test".to_vec(), ArtifactFormat::Pdf)
    }

    #[test]
    fn test_render_offer_email() {
        let body = render_offer_email(&submission("jane@example.com"), "Acme & Co").unwrap();
        assert!(body.contains("Dear Jane Doe"));
        assert!(body.contains("Acme &amp; Co"));
        assert!(body.contains("<b>Domain:</b> Data Science"));
        assert!(body.contains("Monday, 01 January 2024"));
        assert!(body.contains("MAIL12345"));
    }

    #[test]
    fn test_build_offer_message_attaches_artifact() {
        let from: Mailbox = "hr@example.com".parse().unwrap();
        let message =
            build_offer_message(from, &submission("jane@example.com"), &artifact(), "Acme").unwrap();
        let formatted = String::from_utf8_lossy(&message.formatted()).to_string();

        assert!(formatted.contains("To: jane@example.com"));
        assert!(formatted.contains("Offer_Jane_Doe.pdf"));
        assert!(formatted.contains("application/pdf"));
        assert!(formatted.contains("text/html"));
    }

    #[test]
    fn test_invalid_recipient_is_rejected() {
        let from: Mailbox = "hr@example.com".parse().unwrap();
        let err = build_offer_message(from, &submission("not-an-email"), &artifact(), "Acme")
            .unwrap_err();
        assert!(matches!(err, NotifyError::Address(_)));
    }

    #[tokio::test]
    async fn test_smtp_notifier_builds_from_config() {
        let config = MailConfig {
            relay_host: "smtp.example.com".to_string(),
            port: 587,
            user: "hr@example.com".to_string(),
            password: "secret".to_string(),
        };
        assert!(SmtpNotifier::new(&config, "Acme").is_ok());

        let bad = MailConfig {
            user: "not an address".to_string(),
            ..config
        };
        assert!(matches!(
            SmtpNotifier::new(&bad, "Acme"),
            Err(NotifyError::Address(_))
        ));
    }
}
