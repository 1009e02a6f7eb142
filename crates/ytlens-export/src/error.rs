use thiserror::Error;

/// Errors returned by the CSV writer and the Airtable client.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Airtable export was requested but its credentials are not set.
    #[error(
        "Airtable export is not configured; set AIRTABLE_API_KEY, AIRTABLE_BASE_ID and AIRTABLE_TABLE_NAME"
    )]
    Unconfigured,

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Airtable answered with a non-2xx status.
    #[error("Airtable API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("invalid Airtable base URL {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}
