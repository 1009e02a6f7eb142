use serde::Deserialize;
use thiserror::Error;

/// Errors returned by the `YouTube` Data API client, resolver, and collector.
#[derive(Debug, Error)]
pub enum YoutubeError {
    /// No known URL shape or bare-ID heuristic matched the input.
    #[error("not a recognised YouTube URL or ID: \"{0}\"")]
    NotResolvable(String),

    /// A channel lookup (by ID, handle, or legacy username) returned no items.
    #[error("channel not found: {0}")]
    ChannelNotFound(String),

    #[error("video not found: {0}")]
    VideoNotFound(String),

    #[error("comments are disabled for video {0}")]
    CommentsDisabled(String),

    /// Daily quota or per-user rate limit exhausted. Never retried.
    #[error("YouTube API quota exceeded: {0}")]
    QuotaExceeded(String),

    /// 5xx or 429 from the API.
    #[error("transient YouTube API error (HTTP {status}): {message}")]
    Transient { status: u16, message: String },

    /// Any other non-2xx response, with the API's machine-readable reason.
    #[error("YouTube API error (HTTP {status}, reason {reason}): {message}")]
    Api {
        status: u16,
        reason: String,
        message: String,
    },

    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid base URL \"{url}\": {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

impl YoutubeError {
    /// `true` for failures a user could reasonably fix by trying again later.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        match self {
            YoutubeError::Transient { .. } => true,
            YoutubeError::Http(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            _ => false,
        }
    }

    /// Short message suitable for showing to the person at the terminal.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            YoutubeError::NotResolvable(input) => format!(
                "invalid URL: \"{input}\" is not a YouTube channel or video link"
            ),
            YoutubeError::ChannelNotFound(reference) => {
                format!("could not find a channel for {reference}")
            }
            YoutubeError::VideoNotFound(id) => {
                format!("video {id} was not found; it may be private or deleted")
            }
            YoutubeError::CommentsDisabled(id) => {
                format!("comments are disabled for video {id}")
            }
            YoutubeError::QuotaExceeded(_) => {
                "YouTube API quota exceeded; try again later".to_string()
            }
            YoutubeError::Transient { .. } | YoutubeError::Http(_) => {
                format!("YouTube is not responding right now ({self}); try again")
            }
            YoutubeError::Api { .. }
            | YoutubeError::Deserialize { .. }
            | YoutubeError::InvalidBaseUrl { .. } => self.to_string(),
        }
    }
}

/// Error envelope returned by Google APIs on non-2xx responses.
#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
    #[serde(default)]
    errors: Vec<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    #[serde(default)]
    reason: String,
}

/// Maps a non-2xx API response onto the error taxonomy.
///
/// The first `errors[].reason` decides when it is one we know; otherwise the
/// HTTP status does. `video_id` names the video for video-scoped endpoints.
pub(crate) fn classify_api_error(status: u16, body: &str, video_id: Option<&str>) -> YoutubeError {
    let (reason, message) = match serde_json::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => (
            envelope
                .error
                .errors
                .into_iter()
                .map(|d| d.reason)
                .find(|r| !r.is_empty())
                .unwrap_or_default(),
            envelope.error.message,
        ),
        Err(_) => (String::new(), body.chars().take(200).collect()),
    };
    let subject = video_id.unwrap_or("unknown").to_string();

    match reason.as_str() {
        "quotaExceeded" | "dailyLimitExceeded" | "rateLimitExceeded" | "userRateLimitExceeded" => {
            YoutubeError::QuotaExceeded(message)
        }
        "commentsDisabled" => YoutubeError::CommentsDisabled(subject),
        "videoNotFound" => YoutubeError::VideoNotFound(subject),
        _ if status == 429 || status >= 500 => YoutubeError::Transient { status, message },
        _ if status == 404 && video_id.is_some() => YoutubeError::VideoNotFound(subject),
        _ => YoutubeError::Api {
            status,
            reason: if reason.is_empty() {
                "unknown".to_string()
            } else {
                reason
            },
            message,
        },
    }
}
