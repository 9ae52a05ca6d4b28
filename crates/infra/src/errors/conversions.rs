//! Conversions from external infrastructure errors into domain errors.

use launchbi_domain::LaunchBiError;
use reqwest::Error as HttpError;
use rusqlite::Error as SqlError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub LaunchBiError);

impl From<InfraError> for LaunchBiError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<LaunchBiError> for InfraError {
    fn from(value: LaunchBiError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoLaunchBiError {
    fn into_launchbi(self) -> LaunchBiError;
}

/* -------------------------------------------------------------------------- */
/* rusqlite::Error → LaunchBiError */
/* -------------------------------------------------------------------------- */

impl IntoLaunchBiError for SqlError {
    fn into_launchbi(self) -> LaunchBiError {
        use rusqlite::ffi::ErrorCode;
        use rusqlite::Error as RE;

        match self {
            RE::SqliteFailure(err, maybe_message) => {
                let message = maybe_message.unwrap_or_default();
                match err.code {
                    ErrorCode::DatabaseBusy => LaunchBiError::Store("database is busy".into()),
                    ErrorCode::DatabaseLocked => LaunchBiError::Store("database is locked".into()),
                    ErrorCode::ConstraintViolation => {
                        LaunchBiError::Store("constraint violation".into())
                    }
                    _ => LaunchBiError::Store(format!(
                        "sqlite failure {:?} (code {}): {}",
                        err.code, err.extended_code, message
                    )),
                }
            }
            RE::QueryReturnedNoRows => LaunchBiError::NotFound("no rows returned by query".into()),
            RE::FromSqlConversionFailure(_, _, cause) => {
                LaunchBiError::Store(format!("failed to convert sqlite value: {cause}"))
            }
            RE::InvalidColumnType(_, _, ty) => {
                LaunchBiError::Store(format!("invalid column type: {ty}"))
            }
            RE::Utf8Error(_) => LaunchBiError::Store("invalid UTF-8 returned from sqlite".into()),
            RE::InvalidPath(path) => {
                LaunchBiError::Store(format!("invalid database path: {}", path.to_string_lossy()))
            }
            RE::InvalidQuery => LaunchBiError::Store("invalid SQL query".into()),
            other => LaunchBiError::Store(other.to_string()),
        }
    }
}

impl From<SqlError> for InfraError {
    fn from(value: SqlError) -> Self {
        InfraError(value.into_launchbi())
    }
}

/* -------------------------------------------------------------------------- */
/* r2d2::Error → LaunchBiError */
/* -------------------------------------------------------------------------- */

impl IntoLaunchBiError for r2d2::Error {
    fn into_launchbi(self) -> LaunchBiError {
        LaunchBiError::Store(format!("connection pool error: {self}"))
    }
}

impl From<r2d2::Error> for InfraError {
    fn from(value: r2d2::Error) -> Self {
        InfraError(value.into_launchbi())
    }
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → LaunchBiError */
/* -------------------------------------------------------------------------- */

impl IntoLaunchBiError for HttpError {
    fn into_launchbi(self) -> LaunchBiError {
        if self.is_timeout() {
            return LaunchBiError::Network("HTTP request timed out".into());
        }

        if self.is_connect() {
            return LaunchBiError::Network("HTTP connection failure".into());
        }

        if let Some(status) = self.status() {
            let code = status.as_u16();
            let message =
                format!("HTTP {} {}", code, status.canonical_reason().unwrap_or("unknown status"));

            return match code {
                404 => LaunchBiError::NotFound(message),
                400..=499 => LaunchBiError::Validation(message),
                _ => LaunchBiError::Network(message),
            };
        }

        LaunchBiError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_launchbi())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
