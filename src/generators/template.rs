//! Offer letter template rendering.
//!
//! Templates use Tera (Jinja-style) syntax. The QR code is embedded through
//! the `qr_code` (data URI) or `qr_path` (file in the request workspace)
//! variables; a template referencing neither has no anchor and the letter is
//! produced without a QR code.

use std::fs;
use std::path::{Path, PathBuf};

use lazy_static::lazy_static;
use regex::Regex;
use tera::{Context, Tera};

use super::common::format_offer_date;
use super::qr::{png_data_uri, qr_payload, render_qr_png};
use super::workspace::RequestWorkspace;
use super::GeneratorError;
use crate::offer::models::OfferSubmission;

lazy_static! {
    static ref QR_ANCHOR: Regex = Regex::new(r"\{\{-?\s*qr_(code|path)\b").unwrap();
}

/// Rendered offer letter, written into the request workspace.
#[derive(Debug)]
pub struct RenderedDocument {
    pub html: String,
    pub path: PathBuf,
    pub warnings: Vec<String>,
}

/// Renders the offer letter from the template at a fixed path.
#[derive(Debug, Clone)]
pub struct OfferLetterRenderer {
    template_path: PathBuf,
    company_name: String,
}

impl OfferLetterRenderer {
    pub fn new(template_path: impl Into<PathBuf>, company_name: impl Into<String>) -> Self {
        Self {
            template_path: template_path.into(),
            company_name: company_name.into(),
        }
    }

    pub fn template_path(&self) -> &Path {
        &self.template_path
    }

    /// Render the letter for `submission` into `workspace`.
    ///
    /// The template is re-read on every call so edits take effect without a
    /// restart.
    pub fn render(
        &self,
        submission: &OfferSubmission,
        workspace: &RequestWorkspace,
    ) -> Result<RenderedDocument, GeneratorError> {
        let template =
            fs::read_to_string(&self.template_path).map_err(GeneratorError::TemplateIo)?;
        let mut warnings = Vec::new();

        let (qr_code, qr_path) = if has_qr_anchor(&template) {
            match self.write_qr(submission, workspace) {
                Ok(embedded) => embedded,
                Err(e) => {
                    log::warn!("[{}] QR code embedding failed: {}", submission.offer_id, e);
                    warnings.push(format!(
                        "QR code could not be generated ({}); the letter was produced without it",
                        e
                    ));
                    (String::new(), String::new())
                }
            }
        } else {
            log::warn!(
                "[{}] template {} has no QR anchor",
                submission.offer_id,
                self.template_path.display()
            );
            warnings.push(
                "QR anchor (qr_code or qr_path) not found in template; the letter was produced without a QR code"
                    .to_string(),
            );
            (String::new(), String::new())
        };

        let context = self.context(submission, &qr_code, &qr_path);
        let html = Tera::one_off(&template, &context, true)?;

        let path = workspace.document_path();
        fs::write(&path, &html).map_err(GeneratorError::WriteDocument)?;

        Ok(RenderedDocument {
            html,
            path,
            warnings,
        })
    }

    fn write_qr(
        &self,
        submission: &OfferSubmission,
        workspace: &RequestWorkspace,
    ) -> Result<(String, String), String> {
        let png = render_qr_png(&qr_payload(submission)).map_err(|e| e.to_string())?;
        let path = workspace.qr_path();
        fs::write(&path, &png).map_err(|e| e.to_string())?;
        Ok((png_data_uri(&png), path.display().to_string()))
    }

    fn context(&self, submission: &OfferSubmission, qr_code: &str, qr_path: &str) -> Context {
        let mut context = Context::new();
        context.insert("intern_name", &submission.intern_name);
        context.insert("domain", &submission.domain);
        context.insert("email", &submission.email);
        context.insert("start_date", &format_offer_date(submission.start_date));
        context.insert("end_date", &format_offer_date(submission.end_date));
        context.insert("offer_date", &format_offer_date(submission.offer_date));
        context.insert("offer_id", &submission.offer_id);
        context.insert("i_id", &submission.offer_id);
        context.insert("company_name", &self.company_name);
        context.insert("qr_code", qr_code);
        context.insert("qr_path", qr_path);
        context
    }
}

/// Whether the template references one of the QR variables in an expression.
pub fn has_qr_anchor(template: &str) -> bool {
    QR_ANCHOR.is_match(template)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    fn submission() -> OfferSubmission {
        OfferSubmission {
            offer_id: "Q1W2E3R4T".to_string(),
            intern_name: "Jane <b>Doe</b>".to_string(),
            domain: "Data Science".to_string(),
            email: "jane@example.com".to_string(),
            start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            offer_date: NaiveDate::from_ymd_opt(2023, 12, 1).unwrap(),
        }
    }

    #[test]
    fn test_has_qr_anchor() {
        assert!(has_qr_anchor(r#"<img src="{{ qr_code | safe }}">"#));
        assert!(has_qr_anchor(r#"<img src="file://{{qr_path}}">"#));
        assert!(has_qr_anchor(r#"<td>{{- qr_code }}</td>"#));
        assert!(!has_qr_anchor("<p>qr_code goes here</p>"));
        assert!(!has_qr_anchor("{{ intern_name }}"));
    }

    #[test]
    fn test_render_substitutes_fields_and_embeds_qr() {
        let dir = tempdir().unwrap();
        let template_path = dir.path().join("letter.html");
        fs::write(
            &template_path,
            r#"<p>{{ intern_name }} / {{ domain }} / {{ start_date }} / {{ i_id }} / {{ company_name }}</p><img src="{{ qr_code | safe }}">"#,
        )
        .unwrap();

        let renderer = OfferLetterRenderer::new(&template_path, "Acme");
        let workspace = RequestWorkspace::create_in(dir.path(), "Q1W2E3R4T").unwrap();
        let doc = renderer.render(&submission(), &workspace).unwrap();

        assert!(doc.warnings.is_empty());
        assert!(doc.html.contains("Jane &lt;b&gt;Doe&lt;&#x2F;b&gt;"));
        assert!(doc.html.contains("Monday, 01 January 2024"));
        assert!(doc.html.contains("Q1W2E3R4T"));
        assert!(doc.html.contains("Acme"));
        assert!(doc.html.contains("data:image/png;base64,"));
        assert!(workspace.qr_path().exists());
        assert_eq!(fs::read_to_string(&doc.path).unwrap(), doc.html);
    }

    #[test]
    fn test_missing_anchor_is_a_warning() {
        let dir = tempdir().unwrap();
        let template_path = dir.path().join("letter.html");
        fs::write(&template_path, "<p>Dear {{ intern_name }}</p>").unwrap();

        let renderer = OfferLetterRenderer::new(&template_path, "Acme");
        let workspace = RequestWorkspace::create_in(dir.path(), "Q1W2E3R4T").unwrap();
        let doc = renderer.render(&submission(), &workspace).unwrap();

        assert_eq!(doc.warnings.len(), 1);
        assert!(doc.warnings[0].contains("QR anchor"));
        assert!(doc.html.contains("Dear Jane"));
        assert!(!workspace.qr_path().exists());
    }

    #[test]
    fn test_qr_failure_is_a_warning() {
        let dir = tempdir().unwrap();
        let template_path = dir.path().join("letter.html");
        fs::write(&template_path, r#"<p>Dear Jane</p><img src="{{ qr_code | safe }}">"#).unwrap();

        let mut oversized = submission();
        oversized.domain = "D".repeat(5000);
        let renderer = OfferLetterRenderer::new(&template_path, "Acme");
        let workspace = RequestWorkspace::create_in(dir.path(), "Q1W2E3R4T").unwrap();
        let doc = renderer.render(&oversized, &workspace).unwrap();

        assert_eq!(doc.warnings.len(), 1);
        assert!(doc.warnings[0].contains("QR code could not be generated"));
        assert!(doc.html.contains("Dear Jane"));
        assert!(!doc.html.contains("data:image/png"));
        assert!(!workspace.qr_path().exists());
    }

    #[test]
    fn test_missing_template_is_an_error() {
        let dir = tempdir().unwrap();
        let renderer = OfferLetterRenderer::new(dir.path().join("absent.html"), "Acme");

        let workspace = RequestWorkspace::create_in(dir.path(), "Q1W2E3R4T").unwrap();
        let err = renderer.render(&submission(), &workspace).unwrap_err();
        assert!(matches!(err, GeneratorError::TemplateIo(_)));
    }
}
