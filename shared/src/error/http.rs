//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the HTTP status code the gateway uses for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            Self::Success => StatusCode::OK,

            Self::NotFound | Self::CategoryNotFound | Self::ProductNotFound => {
                StatusCode::NOT_FOUND
            }

            Self::AlreadyExists
            | Self::CategoryNameExists
            | Self::CategoryHasProducts
            | Self::BulkJobBusy
            | Self::InvalidState => StatusCode::CONFLICT,

            Self::NotAuthenticated
            | Self::TokenExpired
            | Self::TokenInvalid
            | Self::SessionExpired => StatusCode::UNAUTHORIZED,

            Self::PermissionDenied => StatusCode::FORBIDDEN,

            Self::ValidationFailed
            | Self::InvalidRequest
            | Self::InvalidFormat
            | Self::RequiredField
            | Self::ValueOutOfRange
            | Self::CategoryArchived
            | Self::ProductInvalidPrice
            | Self::ProductInvalidOrderQty
            | Self::ProductCategoryMissing
            | Self::ImageInvalid
            | Self::NoFileSelected
            | Self::InvalidSpreadsheet => StatusCode::BAD_REQUEST,

            Self::TimeoutError => StatusCode::GATEWAY_TIMEOUT,
            Self::ServiceUnavailable | Self::NetworkError => StatusCode::SERVICE_UNAVAILABLE,

            Self::Unknown
            | Self::ImageUploadFailed
            | Self::ImportFailed
            | Self::ExportFailed
            | Self::InternalError
            | Self::ConfigError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Best-effort mapping from an HTTP status returned without an envelope
    pub fn from_http_status(status: StatusCode) -> Self {
        match status {
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => Self::ValidationFailed,
            StatusCode::UNAUTHORIZED => Self::NotAuthenticated,
            StatusCode::FORBIDDEN => Self::PermissionDenied,
            StatusCode::NOT_FOUND => Self::NotFound,
            StatusCode::CONFLICT => Self::AlreadyExists,
            StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => Self::TimeoutError,
            StatusCode::BAD_GATEWAY | StatusCode::SERVICE_UNAVAILABLE => Self::ServiceUnavailable,
            s if s.is_success() => Self::Success,
            _ => Self::InternalError,
        }
    }
}
