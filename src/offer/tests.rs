use super::models::{DeliveryStatus, OfferRequest, OfferResponse, ValidatedOffer};
use chrono::NaiveDate;

#[test]
fn test_offer_request_deserialization() {
    let json = r#"{
        "intern_name": "Jane Doe",
        "domain": "Data Science",
        "email": "jane@example.com",
        "start_date": "2024-01-01",
        "end_date": "2024-06-01",
        "offer_date": "2023-12-01"
    }"#;

    let request: OfferRequest = serde_json::from_str(json).unwrap();
    assert_eq!(request.intern_name.as_deref(), Some("Jane Doe"));
    assert_eq!(request.start_date, NaiveDate::from_ymd_opt(2024, 1, 1));
    assert_eq!(request.offer_date, NaiveDate::from_ymd_opt(2023, 12, 1));
}

#[test]
fn test_offer_request_missing_fields_are_none() {
    let request: OfferRequest = serde_json::from_str(r#"{ "intern_name": "Jane" }"#).unwrap();
    assert!(request.domain.is_none());
    assert!(request.start_date.is_none());
}

#[test]
fn test_identify_keeps_details() {
    let validated = ValidatedOffer {
        intern_name: "Jane Doe".to_string(),
        domain: "Data Science".to_string(),
        email: "jane@example.com".to_string(),
        start_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        end_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        offer_date: NaiveDate::from_ymd_opt(2023, 12, 1).unwrap(),
    };

    let submission = validated.clone().identify("ABCDEFGH1".to_string());
    assert_eq!(submission.offer_id, "ABCDEFGH1");
    assert_eq!(submission.intern_name, validated.intern_name);
    assert_eq!(submission.end_date, validated.end_date);
}

#[test]
fn test_delivery_status_serialization() {
    assert_eq!(serde_json::to_string(&DeliveryStatus::Sent).unwrap(), r#""sent""#);
    assert_eq!(
        serde_json::to_string(&DeliveryStatus::SendFailed).unwrap(),
        r#""send_failed""#
    );
}

#[test]
fn test_offer_response_round_trip() {
    let json = r#"{
        "offer_id": "ABCDEFGH1",
        "status": "send_failed",
        "message": "Email failed: mail delivery is not configured",
        "warnings": ["QR anchor not found"],
        "artifact": { "filename": "Offer_Jane_Doe.pdf", "content_type": "application/pdf", "size": 1024 },
        "download_url": "/api/offers/ABCDEFGH1/artifact"
    }"#;

    let response: OfferResponse = serde_json::from_str(json).unwrap();
    assert_eq!(response.status, DeliveryStatus::SendFailed);
    assert_eq!(response.artifact.size, 1024);
    assert_eq!(response.warnings.len(), 1);
}

#[test]
fn test_blank_dates_are_none() {
    let json = r#"{ "intern_name": "Jane", "start_date": "", "end_date": "  ", "offer_date": null }"#;
    let request: OfferRequest = serde_json::from_str(json).unwrap();
    assert!(request.start_date.is_none());
    assert!(request.end_date.is_none());
    assert!(request.offer_date.is_none());
}

#[test]
fn test_malformed_date_is_a_decode_error() {
    let json = r#"{ "intern_name": "Jane", "start_date": "2024-13-01" }"#;
    assert!(serde_json::from_str::<OfferRequest>(json).is_err());
}
