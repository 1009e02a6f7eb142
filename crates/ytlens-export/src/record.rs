//! Flat, export-ready view of a [`Comment`].
//!
//! Field names match the `YouTube` API's own (`textOriginal`,
//! `authorDisplayName`, ...) so CSV headers and Airtable columns read the same
//! as the upstream data.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use ytlens_core::Comment;

/// One exported row. Declaration order is the CSV column order.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentRecord<'a> {
    pub comment_id: &'a str,
    pub author_display_name: &'a str,
    pub author_profile_image_url: Option<&'a str>,
    pub author_channel_url: Option<&'a str>,
    pub text_original: &'a str,
    pub like_count: u64,
    pub published_at: String,
    pub updated_at: Option<String>,
    pub video_id: &'a str,
    pub parent_id: Option<&'a str>,
    pub is_reply: bool,
}

/// Column names in output order.
pub const COLUMNS: [&str; 11] = [
    "commentId",
    "authorDisplayName",
    "authorProfileImageUrl",
    "authorChannelUrl",
    "textOriginal",
    "likeCount",
    "publishedAt",
    "updatedAt",
    "videoId",
    "parentId",
    "isReply",
];

fn timestamp(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Secs, true)
}

impl<'a> From<&'a Comment> for CommentRecord<'a> {
    fn from(comment: &'a Comment) -> Self {
        Self {
            comment_id: &comment.comment_id,
            author_display_name: &comment.author_name,
            author_profile_image_url: comment.author_profile_image_url.as_deref(),
            author_channel_url: comment.author_channel_url.as_deref(),
            text_original: &comment.text,
            like_count: comment.like_count,
            published_at: timestamp(&comment.published_at),
            updated_at: comment.updated_at.as_ref().map(timestamp),
            video_id: &comment.video_id,
            parent_id: comment.parent_id.as_deref(),
            is_reply: comment.is_reply,
        }
    }
}
