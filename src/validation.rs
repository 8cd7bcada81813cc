use crate::error::AppError;
use chrono::NaiveDate;
use sha2::{Digest, Sha256};

const MAX_NAME_LEN: usize = 64;

pub fn require_field(value: Option<&str>, field: &str) -> Result<String, AppError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(AppError::BadRequest(format!("{field} is required"))),
    }
}

pub fn require_name(value: Option<&str>, field: &str) -> Result<String, AppError> {
    let name = require_field(value, field)?;
    if name.chars().count() > MAX_NAME_LEN {
        return Err(AppError::BadRequest(format!(
            "{field} must be at most {MAX_NAME_LEN} characters"
        )));
    }
    Ok(name)
}

pub fn require_int(value: Option<&str>, field: &str) -> Result<i64, AppError> {
    let raw = require_field(value, field)?;
    raw.parse()
        .map_err(|_| AppError::BadRequest(format!("{field} must be a whole number")))
}

pub fn require_score(value: Option<&str>, field: &str) -> Result<i64, AppError> {
    let score = require_int(value, field)?;
    if score < 0 {
        return Err(AppError::BadRequest(format!("{field} cannot be negative")));
    }
    Ok(score)
}

pub fn require_game_date(value: Option<&str>) -> Result<String, AppError> {
    let raw = require_field(value, "game_date")?;
    NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
        .map_err(|_| AppError::BadRequest("game_date must be a YYYY-MM-DD date".to_string()))?;
    Ok(raw)
}

/// The front end serializes the per-round log as a JSON string field; it is
/// stored verbatim, so any valid JSON value is accepted.
pub fn require_round_history(value: Option<&str>) -> Result<serde_json::Value, AppError> {
    let raw = require_field(value, "round_history")?;
    serde_json::from_str(&raw)
        .map_err(|_| AppError::BadRequest("round_history must be valid JSON".to_string()))
}

/// Compare digests rather than the strings so the check does not leak a
/// matching prefix through timing.
pub fn verify_admin_key(submitted: Option<&str>, expected: &str) -> Result<(), AppError> {
    let submitted = Sha256::digest(submitted.unwrap_or("").as_bytes());
    let expected = Sha256::digest(expected.as_bytes());
    if submitted == expected {
        Ok(())
    } else {
        Err(AppError::Unauthorized("Incorrect admin key".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn require_field_trims_and_rejects_empty() {
        assert_eq!(require_field(Some("  Korghos  "), "name").unwrap(), "Korghos");
        assert!(require_field(Some("   "), "name").is_err());
        assert!(require_field(None, "name").is_err());
    }

    #[test]
    fn require_int_accepts_signed_values() {
        assert_eq!(require_int(Some("-3"), "points_change").unwrap(), -3);
        assert_eq!(require_int(Some("12"), "points_change").unwrap(), 12);
        assert!(require_int(Some("twelve"), "points_change").is_err());
    }

    #[test]
    fn require_score_rejects_negative() {
        assert!(require_score(Some("-1"), "player1_score").is_err());
        assert_eq!(require_score(Some("0"), "player1_score").unwrap(), 0);
    }

    #[test]
    fn game_date_must_be_iso() {
        assert!(require_game_date(Some("2026-08-07")).is_ok());
        assert!(require_game_date(Some("07/08/2026")).is_err());
    }

    #[test]
    fn round_history_must_parse() {
        let value = require_round_history(Some(r#"[{"round":1,"p1":3}]"#)).unwrap();
        assert_eq!(value[0]["round"], 1);
        assert!(require_round_history(Some("not json")).is_err());
    }

    #[test]
    fn admin_key_mismatch_is_unauthorized() {
        assert!(verify_admin_key(Some("secret"), "secret").is_ok());
        assert!(matches!(
            verify_admin_key(Some("guess"), "secret"),
            Err(AppError::Unauthorized(_))
        ));
        assert!(verify_admin_key(None, "secret").is_err());
    }
}
