//! Conversions from external infrastructure errors into domain errors.

use openslot_domain::OpenSlotError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub OpenSlotError);

impl From<InfraError> for OpenSlotError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<OpenSlotError> for InfraError {
    fn from(value: OpenSlotError) -> Self {
        InfraError(value)
    }
}

impl From<rusqlite::Error> for InfraError {
    fn from(err: rusqlite::Error) -> Self {
        use rusqlite::ffi::ErrorCode;
        use rusqlite::Error as RE;

        let domain = match err {
            RE::SqliteFailure(code, maybe_message) => {
                let message = maybe_message.unwrap_or_default();
                match code.code {
                    ErrorCode::DatabaseBusy => OpenSlotError::Database("database is busy".into()),
                    ErrorCode::DatabaseLocked => {
                        OpenSlotError::Database("database is locked".into())
                    }
                    ErrorCode::ConstraintViolation => OpenSlotError::Database(format!(
                        "constraint violation (code {}): {message}",
                        code.extended_code
                    )),
                    _ => OpenSlotError::Database(format!(
                        "sqlite failure {:?} (code {}): {message}",
                        code.code, code.extended_code
                    )),
                }
            }
            RE::QueryReturnedNoRows => {
                OpenSlotError::NotFound("no rows returned by query".into())
            }
            other => OpenSlotError::Database(other.to_string()),
        };

        InfraError(domain)
    }
}

impl From<r2d2::Error> for InfraError {
    fn from(err: r2d2::Error) -> Self {
        InfraError(OpenSlotError::Database(format!("connection pool error: {err}")))
    }
}

impl From<reqwest::Error> for InfraError {
    fn from(err: reqwest::Error) -> Self {
        InfraError(OpenSlotError::Network(err.to_string()))
    }
}

/// Convert a SQL error straight into the domain error type.
pub(crate) fn map_sql_error(err: rusqlite::Error) -> OpenSlotError {
    InfraError::from(err).into()
}
