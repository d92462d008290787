use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

/// Raw form input for a new offer letter.
///
/// Every field is optional on the wire so that absence is reported as a
/// missing field by validation instead of a decode error.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct OfferRequest {
    #[schema(example = "Jane Doe")]
    pub intern_name: Option<String>,
    #[schema(example = "Data Science")]
    pub domain: Option<String>,
    #[schema(example = "jane@example.com")]
    pub email: Option<String>,
    #[schema(value_type = Option<String>, format = Date, example = "2024-01-01")]
    #[serde(default, deserialize_with = "blank_date_as_none")]
    pub start_date: Option<NaiveDate>,
    #[schema(value_type = Option<String>, format = Date, example = "2024-06-01")]
    #[serde(default, deserialize_with = "blank_date_as_none")]
    pub end_date: Option<NaiveDate>,
    /// Defaults to today when omitted.
    #[schema(value_type = Option<String>, format = Date, example = "2023-12-01")]
    #[serde(default, deserialize_with = "blank_date_as_none")]
    pub offer_date: Option<NaiveDate>,
}

/// HTML date inputs submit an empty string when left blank.
fn blank_date_as_none<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<NaiveDate>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        _ => Ok(None),
    }
}

/// Offer details that passed validation but have no identifier yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedOffer {
    pub intern_name: String,
    pub domain: String,
    pub email: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub offer_date: NaiveDate,
}

impl ValidatedOffer {
    /// Attach the generated identifier, producing the immutable submission.
    pub fn identify(self, offer_id: String) -> OfferSubmission {
        OfferSubmission {
            offer_id,
            intern_name: self.intern_name,
            domain: self.domain,
            email: self.email,
            start_date: self.start_date,
            end_date: self.end_date,
            offer_date: self.offer_date,
        }
    }
}

/// One validated and identified offer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfferSubmission {
    pub offer_id: String,
    pub intern_name: String,
    pub domain: String,
    pub email: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub offer_date: NaiveDate,
}

/// Outcome of the notification stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryStatus {
    Sent,
    SendFailed,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ArtifactInfo {
    #[schema(example = "Offer_Jane_Doe.pdf")]
    pub filename: String,
    #[schema(example = "application/pdf")]
    pub content_type: String,
    pub size: usize,
}

/// Response body of a processed offer.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OfferResponse {
    #[schema(example = "K7Q2ZP9AB")]
    pub offer_id: String,
    pub status: DeliveryStatus,
    #[schema(example = "Sent to jane@example.com")]
    pub message: String,
    /// Non-fatal problems: missing QR anchor, PDF conversion fallback.
    pub warnings: Vec<String>,
    pub artifact: ArtifactInfo,
    #[schema(example = "/api/offers/K7Q2ZP9AB/artifact")]
    pub download_url: String,
}
