use http::StatusCode;
use shared::http::HttpError;

#[derive(thiserror::Error, Debug)]
pub enum RegistryError {
    #[error("not logged in")]
    NotAuthenticated,
    #[error("permission denied: {0}")]
    PermissionDenied(&'static str),
    #[error("another change is already in flight, try again")]
    MutationInFlight,
    #[error("API error ({status}): {message}")]
    Api { status: StatusCode, message: String },
    #[error("invalid base URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),
    #[error("could not read or write the session file: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not encode session data: {0}")]
    Serde(#[from] serde_json::Error),
}

impl From<HttpError> for RegistryError {
    fn from(err: HttpError) -> Self {
        match err {
            HttpError::Reqwest(err) => RegistryError::Reqwest(err),
            HttpError::Status { status, message } => RegistryError::Api { status, message },
        }
    }
}
