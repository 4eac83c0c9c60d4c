use thiserror::Error;

#[derive(Debug, Error)]
pub enum HolidayError {
    #[error("Holiday API key is not configured")]
    MissingConfig,

    #[error("Holiday service returned result code {code}: {message}")]
    UpstreamResult { code: String, message: String },

    #[error("Holiday service request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Holiday service returned an unreadable body: {0}")]
    InvalidBody(String),
}

impl HolidayError {
    /// Whether the failure is attributable to the third-party service
    /// rather than our own configuration.
    pub fn is_upstream(&self) -> bool {
        !matches!(self, HolidayError::MissingConfig)
    }
}
