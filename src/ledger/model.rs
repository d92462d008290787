use serde::{Deserialize, Serialize};

use crate::generators::common::format_offer_date;
use crate::offer::models::OfferSubmission;

/// One ledger row. Field order is the column order of the CSV file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerRecord {
    pub intern_name: String,
    pub domain: String,
    pub start_date: String,
    pub end_date: String,
    pub offer_date: String,
    pub offer_id: String,
    pub email: String,
}

impl From<&OfferSubmission> for LedgerRecord {
    fn from(submission: &OfferSubmission) -> Self {
        Self {
            intern_name: submission.intern_name.clone(),
            domain: submission.domain.clone(),
            start_date: format_offer_date(submission.start_date),
            end_date: format_offer_date(submission.end_date),
            offer_date: format_offer_date(submission.offer_date),
            offer_id: submission.offer_id.clone(),
            email: submission.email.clone(),
        }
    }
}
