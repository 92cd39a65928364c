//! Conversions from external infrastructure errors into domain errors.

use dirgraph_domain::DirectoryError;
use reqwest::Error as HttpError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub DirectoryError);

impl From<InfraError> for DirectoryError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<DirectoryError> for InfraError {
    fn from(value: DirectoryError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoDirectoryError {
    fn into_directory(self) -> DirectoryError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → DirectoryError */
/* -------------------------------------------------------------------------- */

impl IntoDirectoryError for HttpError {
    fn into_directory(self) -> DirectoryError {
        if self.is_timeout() {
            return DirectoryError::transport("HTTP request timed out");
        }

        #[cfg(not(target_arch = "wasm32"))]
        if self.is_connect() {
            return DirectoryError::transport(format!("HTTP connection failure: {self}"));
        }

        if self.is_builder() {
            return DirectoryError::invalid_input(format!("invalid HTTP request: {self}"));
        }

        if let Some(status) = self.status() {
            let reason = status.canonical_reason().unwrap_or("unknown status");
            return DirectoryError::http(status.as_u16(), reason);
        }

        if self.is_decode() || self.is_body() {
            return DirectoryError::transport(format!("failed to read HTTP response body: {self}"));
        }

        DirectoryError::transport(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_directory())
    }
}

/* -------------------------------------------------------------------------- */
/* std::io::Error → DirectoryError */
/* -------------------------------------------------------------------------- */

impl IntoDirectoryError for std::io::Error {
    fn into_directory(self) -> DirectoryError {
        DirectoryError::internal(format!("console I/O failed: {self}"))
    }
}

impl From<std::io::Error> for InfraError {
    fn from(value: std::io::Error) -> Self {
        InfraError(value.into_directory())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
