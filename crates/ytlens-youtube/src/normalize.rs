//! Reshapes raw API resources into `ytlens-core` domain types.

use chrono::{DateTime, Utc};
use ytlens_core::{ChannelStats, Comment, VideoDetails};

use crate::types::{ChannelResource, CommentResource, CommentThreadResource, VideoResource};

fn parse_timestamp(raw: Option<&str>) -> Option<DateTime<Utc>> {
    raw.and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

fn parse_count(raw: Option<&String>) -> Option<u64> {
    raw.and_then(|s| s.trim().parse::<u64>().ok())
}

fn non_empty(raw: Option<String>) -> Option<String> {
    raw.filter(|s| !s.trim().is_empty())
}

#[must_use]
pub fn normalize_channel(resource: ChannelResource) -> ChannelStats {
    let (title, description, custom_url, country, thumbnail_url, published_at) =
        match resource.snippet {
            Some(s) => (
                non_empty(s.title),
                non_empty(s.description),
                non_empty(s.custom_url),
                non_empty(s.country),
                s.thumbnails.best_url(),
                parse_timestamp(s.published_at.as_deref()),
            ),
            None => (None, None, None, None, None, None),
        };

    let stats = resource.statistics;
    let hidden_subscriber_count = stats.as_ref().is_some_and(|s| s.hidden_subscriber_count);

    ChannelStats {
        channel_id: resource.id,
        title,
        description,
        custom_url,
        country,
        thumbnail_url,
        published_at,
        subscriber_count: if hidden_subscriber_count {
            None
        } else {
            stats.as_ref().and_then(|s| parse_count(s.subscriber_count.as_ref()))
        },
        hidden_subscriber_count,
        view_count: stats.as_ref().and_then(|s| parse_count(s.view_count.as_ref())),
        video_count: stats.as_ref().and_then(|s| parse_count(s.video_count.as_ref())),
    }
}

#[must_use]
pub fn normalize_video(resource: VideoResource) -> VideoDetails {
    let snippet = resource.snippet;
    let stats = resource.statistics;
    VideoDetails {
        video_id: resource.id,
        title: snippet.as_ref().and_then(|s| s.title.clone()),
        channel_id: snippet.as_ref().and_then(|s| s.channel_id.clone()),
        channel_title: snippet.as_ref().and_then(|s| s.channel_title.clone()),
        published_at: snippet
            .as_ref()
            .and_then(|s| parse_timestamp(s.published_at.as_deref())),
        thumbnail_url: snippet.as_ref().and_then(|s| s.thumbnails.best_url()),
        view_count: stats.as_ref().and_then(|s| parse_count(s.view_count.as_ref())),
        like_count: stats.as_ref().and_then(|s| parse_count(s.like_count.as_ref())),
        comment_count: stats
            .as_ref()
            .and_then(|s| parse_count(s.comment_count.as_ref())),
    }
}

/// Converts one comment resource. Returns `None` when `publishedAt` is
/// missing or not a valid RFC 3339 timestamp.
fn normalize_comment(resource: CommentResource, video_id: &str, is_reply: bool) -> Option<Comment> {
    let snippet = resource.snippet;
    let Some(published_at) = parse_timestamp(snippet.published_at.as_deref()) else {
        tracing::warn!(
            comment_id = %resource.id,
            published_at = ?snippet.published_at,
            "skipping comment with missing or unparseable publishedAt"
        );
        return None;
    };

    Some(Comment {
        comment_id: resource.id,
        author_name: snippet.author_display_name,
        author_profile_image_url: non_empty(snippet.author_profile_image_url),
        author_channel_url: non_empty(snippet.author_channel_url),
        text: snippet
            .text_original
            .or(snippet.text_display)
            .unwrap_or_default(),
        like_count: snippet.like_count,
        published_at,
        updated_at: parse_timestamp(snippet.updated_at.as_deref()),
        video_id: snippet.video_id.unwrap_or_else(|| video_id.to_string()),
        parent_id: if is_reply {
            non_empty(snippet.parent_id)
        } else {
            None
        },
        is_reply,
    })
}

/// Flattens a comment thread into its top-level comment followed by any
/// replies the API embedded, in the order they were returned.
#[must_use]
pub fn flatten_thread(
    thread: CommentThreadResource,
    video_id: &str,
    include_replies: bool,
) -> Vec<Comment> {
    let video_id = thread.snippet.video_id.as_deref().unwrap_or(video_id).to_string();
    let mut out = Vec::with_capacity(1);
    out.extend(normalize_comment(
        thread.snippet.top_level_comment,
        &video_id,
        false,
    ));

    if include_replies {
        if let Some(replies) = thread.replies {
            out.extend(
                replies
                    .comments
                    .into_iter()
                    .filter_map(|r| normalize_comment(r, &video_id, true)),
            );
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn thread_json(with_reply: bool) -> serde_json::Value {
        let mut thread = serde_json::json!({
            "id": "Ugz-thread-1",
            "snippet": {
                "videoId": "dQw4w9WgXcQ",
                "totalReplyCount": 1,
                "topLevelComment": {
                    "id": "Ugz-thread-1",
                    "snippet": {
                        "authorDisplayName": "@listener",
                        "authorProfileImageUrl": "https://yt3.ggpht.com/a.jpg",
                        "authorChannelUrl": "http://www.youtube.com/@listener",
                        "textOriginal": "never gonna give you up",
                        "textDisplay": "never gonna give you up",
                        "likeCount": 42,
                        "publishedAt": "2024-05-01T12:00:00Z",
                        "updatedAt": "2024-05-02T08:30:00Z"
                    }
                }
            }
        });
        if with_reply {
            thread["replies"] = serde_json::json!({
                "comments": [{
                    "id": "Ugz-thread-1.reply-1",
                    "snippet": {
                        "authorDisplayName": "@replier",
                        "textOriginal": "same",
                        "likeCount": 3,
                        "publishedAt": "2024-05-03T00:00:00Z",
                        "parentId": "Ugz-thread-1"
                    }
                }]
            });
        }
        thread
    }

    #[test]
    fn flatten_thread_puts_replies_after_parent() {
        let thread: CommentThreadResource = serde_json::from_value(thread_json(true)).unwrap();
        let comments = flatten_thread(thread, "dQw4w9WgXcQ", true);
        assert_eq!(comments.len(), 2);
        assert!(!comments[0].is_reply);
        assert_eq!(comments[0].like_count, 42);
        assert_eq!(comments[0].video_id, "dQw4w9WgXcQ");
        assert!(comments[0].parent_id.is_none());
        assert!(comments[1].is_reply);
        assert_eq!(comments[1].parent_id.as_deref(), Some("Ugz-thread-1"));
        assert!(comments[1].author_channel_url.is_none());
    }

    #[test]
    fn flatten_thread_drops_replies_when_not_requested() {
        let thread: CommentThreadResource = serde_json::from_value(thread_json(true)).unwrap();
        let comments = flatten_thread(thread, "dQw4w9WgXcQ", false);
        assert_eq!(comments.len(), 1);
    }

    #[test]
    fn comment_with_bad_timestamp_is_skipped() {
        let mut json = thread_json(false);
        json["snippet"]["topLevelComment"]["snippet"]["publishedAt"] =
            serde_json::json!("yesterday");
        let thread: CommentThreadResource = serde_json::from_value(json).unwrap();
        assert!(flatten_thread(thread, "dQw4w9WgXcQ", true).is_empty());
    }

    #[test]
    fn reply_without_timestamp_is_skipped_and_parent_kept() {
        let mut json = thread_json(true);
        json["replies"]["comments"][0]["snippet"]
            .as_object_mut()
            .unwrap()
            .remove("publishedAt");
        let thread: CommentThreadResource = serde_json::from_value(json).unwrap();
        let comments = flatten_thread(thread, "dQw4w9WgXcQ", true);
        assert_eq!(comments.len(), 1);
        assert_eq!(comments[0].comment_id, "Ugz-thread-1");
    }

    #[test]
    fn hidden_subscriber_count_clears_count() {
        let resource: ChannelResource = serde_json::from_value(serde_json::json!({
            "id": "UC_x5XG1OV2P6uZZ5FSM9Ttw",
            "snippet": { "title": "Google for Developers", "country": "" },
            "statistics": {
                "viewCount": "123456",
                "subscriberCount": "1000",
                "hiddenSubscriberCount": true,
                "videoCount": "12"
            }
        }))
        .unwrap();
        let stats = normalize_channel(resource);
        assert!(stats.hidden_subscriber_count);
        assert!(stats.subscriber_count.is_none());
        assert_eq!(stats.view_count, Some(123_456));
        assert_eq!(stats.video_count, Some(12));
        assert!(stats.country.is_none(), "empty strings are treated as absent");
    }

    #[test]
    fn video_without_comment_count_reports_disabled() {
        let resource: VideoResource = serde_json::from_value(serde_json::json!({
            "id": "dQw4w9WgXcQ",
            "snippet": { "title": "Never Gonna Give You Up", "channelId": "UCuAXFkgsw1L7xaCfnd5JJOw" },
            "statistics": { "viewCount": "1500000000", "likeCount": "17000000" }
        }))
        .unwrap();
        let video = normalize_video(resource);
        assert!(video.comments_disabled());
        assert_eq!(video.channel_id.as_deref(), Some("UCuAXFkgsw1L7xaCfnd5JJOw"));
    }
}
