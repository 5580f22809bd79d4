//! Classification of sqlx failures into application error kinds.

use lodging_core::error::{AppError, ErrorKind};

/// `serialization_failure`
const SERIALIZATION_FAILURE: &str = "40001";
/// `deadlock_detected`
const DEADLOCK_DETECTED: &str = "40P01";
/// `unique_violation`
const UNIQUE_VIOLATION: &str = "23505";

/// Wrap a sqlx error, marking serialization failures, deadlocks and unique
/// violations as [`ErrorKind::Conflict`] so the engine retries them.
pub fn classify(context: &str, err: sqlx::Error) -> AppError {
    let code = err
        .as_database_error()
        .and_then(|db| db.code())
        .map(|c| c.into_owned());

    match code.as_deref() {
        Some(SERIALIZATION_FAILURE) | Some(DEADLOCK_DETECTED) => AppError::with_source(
            ErrorKind::Conflict,
            format!("{context}: transaction conflict"),
            err,
        ),
        Some(UNIQUE_VIOLATION) => AppError::with_source(
            ErrorKind::Conflict,
            format!("{context}: duplicate key"),
            err,
        ),
        _ => AppError::with_source(ErrorKind::Database, context.to_string(), err),
    }
}

/// Shorthand for `.map_err(db_err("..."))`.
pub fn db_err(context: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
    move |e| classify(context, e)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_database_errors_are_not_transient() {
        let err = classify("Failed to load booking", sqlx::Error::RowNotFound);
        assert_eq!(err.kind, ErrorKind::Database);
        assert!(!err.is_transient());
    }
}
