//! Human-readable booking codes.

use chrono::NaiveDate;
use uuid::Uuid;

/// `BK` + check-in as `yymmdd` + 8 uppercase hex characters,
/// e.g. `BK260102A1B2C3D4`.
pub fn generate(check_in: NaiveDate) -> String {
    let random = Uuid::new_v4().simple().to_string().to_uppercase();
    format!("BK{}{}", check_in.format("%y%m%d"), &random[..8])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format() {
        let code = generate(NaiveDate::from_ymd_opt(2026, 1, 2).unwrap());
        assert_eq!(code.len(), 16);
        assert!(code.starts_with("BK260102"));
        assert!(
            code[8..]
                .chars()
                .all(|c| c.is_ascii_digit() || ('A'..='F').contains(&c))
        );
    }

    #[test]
    fn test_codes_differ() {
        let day = NaiveDate::from_ymd_opt(2026, 1, 2).unwrap();
        assert_ne!(generate(day), generate(day));
    }
}
