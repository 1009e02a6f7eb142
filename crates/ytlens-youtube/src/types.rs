//! `YouTube` Data API v3 response types.
//!
//! Every list endpoint returns the same envelope: `items`, an optional
//! `nextPageToken`, and `pageInfo`. [`ListResponse`] captures it
//! generically.
//!
//! ### Counts are strings
//! `statistics.viewCount`, `subscriberCount`, `videoCount`, `likeCount` and
//! `commentCount` arrive as JSON strings (`"1234"`), not numbers. They are
//! kept as `Option<String>` here and parsed during normalization.
//! `snippet.likeCount` on comments is a real number.
//!
//! ### Omitted fields
//! `subscriberCount` is absent when `hiddenSubscriberCount` is true, and
//! `commentCount` is absent when comments are turned off for a video.

use serde::Deserialize;

/// Envelope shared by `channels.list`, `videos.list`, and `commentThreads.list`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
    #[serde(default)]
    pub next_page_token: Option<String>,
    #[serde(default)]
    pub page_info: Option<PageInfo>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    #[serde(default)]
    pub total_results: Option<u64>,
    #[serde(default)]
    pub results_per_page: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct Thumbnails {
    #[serde(default)]
    pub default: Option<Thumbnail>,
    #[serde(default)]
    pub medium: Option<Thumbnail>,
    #[serde(default)]
    pub high: Option<Thumbnail>,
}

impl Thumbnails {
    /// Best available thumbnail URL, preferring higher resolutions.
    #[must_use]
    pub fn best_url(&self) -> Option<String> {
        self.high
            .as_ref()
            .or(self.medium.as_ref())
            .or(self.default.as_ref())
            .map(|t| t.url.clone())
    }
}

#[derive(Debug, Deserialize)]
pub struct Thumbnail {
    pub url: String,
}

// ---------------------------------------------------------------------------
// channels.list
// ---------------------------------------------------------------------------

/// A channel resource. Only `id` is guaranteed; the rest depends on `part`.
#[derive(Debug, Deserialize)]
pub struct ChannelResource {
    pub id: String,
    #[serde(default)]
    pub snippet: Option<ChannelSnippet>,
    #[serde(default)]
    pub statistics: Option<ChannelStatistics>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelSnippet {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub custom_url: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    /// RFC 3339 timestamp.
    #[serde(default)]
    pub published_at: Option<String>,
    #[serde(default)]
    pub thumbnails: Thumbnails,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelStatistics {
    #[serde(default)]
    pub view_count: Option<String>,
    #[serde(default)]
    pub subscriber_count: Option<String>,
    #[serde(default)]
    pub hidden_subscriber_count: bool,
    #[serde(default)]
    pub video_count: Option<String>,
}

// ---------------------------------------------------------------------------
// videos.list
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct VideoResource {
    pub id: String,
    #[serde(default)]
    pub snippet: Option<VideoSnippet>,
    #[serde(default)]
    pub statistics: Option<VideoStatistics>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoSnippet {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub channel_id: Option<String>,
    #[serde(default)]
    pub channel_title: Option<String>,
    #[serde(default)]
    pub published_at: Option<String>,
    #[serde(default)]
    pub thumbnails: Thumbnails,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoStatistics {
    #[serde(default)]
    pub view_count: Option<String>,
    #[serde(default)]
    pub like_count: Option<String>,
    #[serde(default)]
    pub comment_count: Option<String>,
}

// ---------------------------------------------------------------------------
// commentThreads.list
// ---------------------------------------------------------------------------

/// A top-level comment plus (a subset of) its replies.
///
/// `replies.comments` holds at most a handful of replies even when
/// `totalReplyCount` is larger; the API does not page them here.
#[derive(Debug, Deserialize)]
pub struct CommentThreadResource {
    pub id: String,
    pub snippet: CommentThreadSnippet,
    #[serde(default)]
    pub replies: Option<CommentReplies>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentThreadSnippet {
    #[serde(default)]
    pub video_id: Option<String>,
    pub top_level_comment: CommentResource,
    #[serde(default)]
    pub total_reply_count: u64,
}

#[derive(Debug, Deserialize)]
pub struct CommentReplies {
    #[serde(default)]
    pub comments: Vec<CommentResource>,
}

#[derive(Debug, Deserialize)]
pub struct CommentResource {
    pub id: String,
    pub snippet: CommentSnippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentSnippet {
    #[serde(default)]
    pub author_display_name: String,
    #[serde(default)]
    pub author_profile_image_url: Option<String>,
    /// Channel URL of the author; absent for some deleted accounts.
    #[serde(default)]
    pub author_channel_url: Option<String>,
    #[serde(default)]
    pub text_original: Option<String>,
    #[serde(default)]
    pub text_display: Option<String>,
    #[serde(default)]
    pub like_count: u64,
    /// RFC 3339 timestamp. Comments without one are skipped during
    /// normalization rather than failing the whole page.
    #[serde(default)]
    pub published_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
    /// Present on replies only.
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub video_id: Option<String>,
}
