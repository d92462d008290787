//! Common utilities for offer letter generation.

use chrono::NaiveDate;

/// Longest name portion kept in an artifact filename.
const MAX_NAME_CHARS: usize = 80;

/// Format a date the way it appears in the letter (e.g., "Monday, 01 January 2024").
pub fn format_offer_date(date: NaiveDate) -> String {
    date.format("%A, %d %B %Y").to_string()
}

/// Build the artifact filename stem for an intern, e.g. `Offer_Jane_Doe`.
pub fn offer_file_stem(intern_name: &str) -> String {
    let joined = intern_name.split_whitespace().collect::<Vec<_>>().join("_");
    let safe: String = sanitize_filename::sanitize(&joined)
        .chars()
        .take(MAX_NAME_CHARS)
        .collect();
    if safe.is_empty() {
        "Offer".to_string()
    } else {
        format!("Offer_{}", safe)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_offer_date() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert_eq!(format_offer_date(date), "Monday, 01 January 2024");
    }

    #[test]
    fn test_offer_file_stem() {
        assert_eq!(offer_file_stem("Jane Doe"), "Offer_Jane_Doe");
        assert_eq!(offer_file_stem("  Jane   Doe "), "Offer_Jane_Doe");
        assert!(!offer_file_stem("../../etc/passwd").contains('/'));
        assert_eq!(offer_file_stem("///"), "Offer");
        assert_eq!(offer_file_stem(&"J".repeat(5000)).len(), "Offer_".len() + 80);
    }
}
