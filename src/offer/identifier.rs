//! Per-submission offer identifiers.

use rand::Rng;

pub const OFFER_ID_LEN: usize = 9;
const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Generate a random 9-character identifier from `A-Z0-9`.
///
/// Uniqueness is not checked.
pub fn generate_offer_id() -> String {
    generate_offer_id_with(&mut rand::rng())
}

pub fn generate_offer_id_with<R: Rng + ?Sized>(rng: &mut R) -> String {
    (0..OFFER_ID_LEN)
        .map(|_| CHARSET[rng.random_range(0..CHARSET.len())] as char)
        .collect()
}

/// Whether `value` has the shape of a generated identifier.
pub fn is_offer_id(value: &str) -> bool {
    value.len() == OFFER_ID_LEN
        && value
            .bytes()
            .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_generated_ids_are_well_formed() {
        for _ in 0..1000 {
            let id = generate_offer_id();
            assert_eq!(id.len(), 9);
            assert!(is_offer_id(&id), "bad id {}", id);
        }
    }

    #[test]
    fn test_seeded_generation_is_deterministic() {
        let a = generate_offer_id_with(&mut StdRng::seed_from_u64(7));
        let b = generate_offer_id_with(&mut StdRng::seed_from_u64(7));
        assert_eq!(a, b);
    }

    #[test]
    fn test_is_offer_id() {
        assert!(is_offer_id("ABC123XYZ"));
        assert!(!is_offer_id("abc123xyz"));
        assert!(!is_offer_id("ABC123XY"));
        assert!(!is_offer_id("../../etc"));
        assert!(!is_offer_id("ABC-23XYZ"));
    }
}
