//! Conversions from external infrastructure errors into domain errors.

use std::io::Error as IoError;

use medibook_domain::ApiError;
use reqwest::Error as HttpError;
use toml::de::Error as TomlError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub ApiError);

impl From<InfraError> for ApiError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<ApiError> for InfraError {
    fn from(value: ApiError) -> Self {
        InfraError(value)
    }
}

/// Extension trait to make the conversion logic explicit in tests and within
/// this module.
trait IntoApiError {
    fn into_api_error(self) -> ApiError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → ApiError */
/* -------------------------------------------------------------------------- */

impl IntoApiError for HttpError {
    fn into_api_error(self) -> ApiError {
        if self.is_timeout() {
            return ApiError::Network("HTTP request timed out".into());
        }

        #[cfg(not(target_arch = "wasm32"))]
        if self.is_connect() {
            return ApiError::Network(format!("HTTP connection failure: {self}"));
        }

        if self.is_decode() {
            return ApiError::Serialization(format!("failed to decode response body: {self}"));
        }

        if self.is_builder() {
            return ApiError::Config(format!("invalid request: {self}"));
        }

        ApiError::Network(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_api_error())
    }
}

/* -------------------------------------------------------------------------- */
/* std::io::Error → ApiError */
/* -------------------------------------------------------------------------- */

impl IntoApiError for IoError {
    fn into_api_error(self) -> ApiError {
        use std::io::ErrorKind;

        match self.kind() {
            ErrorKind::PermissionDenied => {
                ApiError::Storage(format!("permission denied on token file: {self}"))
            }
            ErrorKind::InvalidData => ApiError::Serialization(self.to_string()),
            _ => ApiError::Storage(self.to_string()),
        }
    }
}

impl From<IoError> for InfraError {
    fn from(value: IoError) -> Self {
        InfraError(value.into_api_error())
    }
}

/* -------------------------------------------------------------------------- */
/* toml::de::Error → ApiError */
/* -------------------------------------------------------------------------- */

impl IntoApiError for TomlError {
    fn into_api_error(self) -> ApiError {
        ApiError::Config(format!("Invalid TOML format: {}", self.message()))
    }
}

impl From<TomlError> for InfraError {
    fn from(value: TomlError) -> Self {
        InfraError(value.into_api_error())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
