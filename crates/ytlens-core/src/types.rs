//! Domain types shared by the API client, exporters, and CLI.
//!
//! These are the reshaped, API-independent forms of what the `YouTube` Data
//! API returns. Counts are `Option` throughout because the API omits fields
//! it considers private or unavailable.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Which kind of entity a user-supplied reference resolved to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RefKind {
    Channel,
    Video,
}

impl std::fmt::Display for RefKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RefKind::Channel => write!(f, "channel"),
            RefKind::Video => write!(f, "video"),
        }
    }
}

/// A resolved channel identifier and the raw input it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelRef {
    id: String,
    input: String,
}

impl ChannelRef {
    #[must_use]
    pub fn new(id: impl Into<String>, input: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            input: input.into(),
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }
}

/// A resolved video identifier and the raw input it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoRef {
    id: String,
    input: String,
}

impl VideoRef {
    #[must_use]
    pub fn new(id: impl Into<String>, input: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            input: input.into(),
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }
}

/// Outcome of resolving user input: either a channel or a video.
///
/// Once built, every later call in the same command uses this ID; the raw
/// input is never re-parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedRef {
    Channel(ChannelRef),
    Video(VideoRef),
}

impl ResolvedRef {
    #[must_use]
    pub fn kind(&self) -> RefKind {
        match self {
            ResolvedRef::Channel(_) => RefKind::Channel,
            ResolvedRef::Video(_) => RefKind::Video,
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            ResolvedRef::Channel(c) => c.id(),
            ResolvedRef::Video(v) => v.id(),
        }
    }

    #[must_use]
    pub fn input(&self) -> &str {
        match self {
            ResolvedRef::Channel(c) => c.input(),
            ResolvedRef::Video(v) => v.input(),
        }
    }
}

/// Snapshot of a channel's public statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChannelStats {
    pub channel_id: String,
    pub title: Option<String>,
    pub description: Option<String>,
    /// Vanity URL fragment, usually the `@handle`.
    pub custom_url: Option<String>,
    pub country: Option<String>,
    pub thumbnail_url: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub subscriber_count: Option<u64>,
    pub hidden_subscriber_count: bool,
    pub view_count: Option<u64>,
    pub video_count: Option<u64>,
}

impl ChannelStats {
    /// The channel's handle with exactly one leading `@`, if it has one.
    #[must_use]
    pub fn handle(&self) -> Option<String> {
        self.custom_url
            .as_deref()
            .map(|u| format!("@{}", u.trim_start_matches('@')))
    }
}

/// Metadata for a single video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoDetails {
    pub video_id: String,
    pub title: Option<String>,
    pub channel_id: Option<String>,
    pub channel_title: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub thumbnail_url: Option<String>,
    pub view_count: Option<u64>,
    pub like_count: Option<u64>,
    /// `None` when the API omits the count, which it does for videos with
    /// comments turned off.
    pub comment_count: Option<u64>,
}

impl VideoDetails {
    #[must_use]
    pub fn comments_disabled(&self) -> bool {
        self.comment_count.is_none()
    }
}

/// A single top-level comment or reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub comment_id: String,
    pub author_name: String,
    pub author_profile_image_url: Option<String>,
    pub author_channel_url: Option<String>,
    pub text: String,
    pub like_count: u64,
    pub published_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub video_id: String,
    /// ID of the top-level comment this one replies to; `None` for
    /// top-level comments.
    pub parent_id: Option<String>,
    pub is_reply: bool,
}
