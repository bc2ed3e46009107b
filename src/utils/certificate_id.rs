use chrono::{DateTime, Utc};
use rand::Rng;

const TIMESTAMP_DIGITS: usize = 7;
const MIN_ID_LEN: usize = 8;
const MAX_ID_LEN: usize = 10;
const VALIDATION_CODE_LEN: usize = 20;

/// Builds a certificate id: the last 7 digits of the unix time followed by three
/// random digits. Always 8 to 10 ASCII digits.
pub fn generate_certificate_id<R: Rng + ?Sized>(now: DateTime<Utc>, rng: &mut R) -> String {
    let seconds = now.timestamp().unsigned_abs().to_string();
    let tail = &seconds[seconds.len().saturating_sub(TIMESTAMP_DIGITS)..];
    let suffix: u16 = rng.gen_range(100..=999);

    let mut id: String = format!("{}{}", tail, suffix)
        .chars()
        .filter(char::is_ascii_digit)
        .collect();
    id.truncate(MAX_ID_LEN);

    if id.len() < MIN_ID_LEN {
        id = format!("{:0>width$}", seconds, width = MIN_ID_LEN);
        let start = id.len().saturating_sub(MAX_ID_LEN);
        id = id[start..].to_string();
    }
    id
}

pub fn is_valid_certificate_id(id: &str) -> bool {
    (MIN_ID_LEN..=MAX_ID_LEN).contains(&id.len()) && id.bytes().all(|b| b.is_ascii_digit())
}

/// Twenty uppercase hex characters taken from a random v4 uuid.
pub fn generate_validation_code() -> String {
    let mut code = uuid::Uuid::new_v4().simple().to_string().to_uppercase();
    code.truncate(VALIDATION_CODE_LEN);
    code
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn ids_are_ten_digits_for_current_timestamps() {
        let mut rng = StdRng::seed_from_u64(7);
        let now = Utc.with_ymd_and_hms(2025, 11, 10, 20, 41, 44).unwrap();
        for _ in 0..200 {
            let id = generate_certificate_id(now, &mut rng);
            assert_eq!(id.len(), 10);
            assert!(is_valid_certificate_id(&id));
            let seconds = now.timestamp().to_string();
            assert!(id.starts_with(&seconds[seconds.len() - 7..]));
        }
    }

    #[test]
    fn short_timestamps_still_produce_valid_ids() {
        let mut rng = StdRng::seed_from_u64(1);
        let early = Utc.timestamp_opt(42, 0).unwrap();
        let id = generate_certificate_id(early, &mut rng);
        assert!(is_valid_certificate_id(&id), "{id}");
    }

    #[test]
    fn validation_code_is_uppercase_hex() {
        let code = generate_validation_code();
        assert_eq!(code.len(), 20);
        assert!(code.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_lowercase()));
    }

    #[test]
    fn rejects_non_numeric_or_badly_sized_ids() {
        assert!(is_valid_certificate_id("12345678"));
        assert!(!is_valid_certificate_id("1234567"));
        assert!(!is_valid_certificate_id("12345678901"));
        assert!(!is_valid_certificate_id("12345abc90"));
    }
}
