use std::sync::Mutex;

use chrono::{TimeZone, Utc};

use super::*;

/// In-memory source serving `total` comments. Tokens are `"offset-N"` so
/// varying page sizes stay consistent. Records every request it receives.
struct FakeSource {
    total: usize,
    /// Fail the n-th request (0-based) with the given error factory.
    fail_on_request: Option<(usize, fn(&str) -> YoutubeError)>,
    requests: Mutex<Vec<(u32, Option<String>)>>,
}

impl FakeSource {
    fn new(total: usize) -> Self {
        Self {
            total,
            fail_on_request: None,
            requests: Mutex::new(Vec::new()),
        }
    }

    fn failing_on(mut self, request: usize, err: fn(&str) -> YoutubeError) -> Self {
        self.fail_on_request = Some((request, err));
        self
    }

    fn request_log(&self) -> Vec<(u32, Option<String>)> {
        self.requests.lock().unwrap().clone()
    }
}

fn comment(video_id: &str, n: usize) -> Comment {
    Comment {
        comment_id: format!("c{n}"),
        author_name: format!("author {n}"),
        author_profile_image_url: None,
        author_channel_url: None,
        text: format!("comment number {n}"),
        like_count: 0,
        published_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        updated_at: None,
        video_id: video_id.to_string(),
        parent_id: None,
        is_reply: false,
    }
}

impl CommentPageSource for FakeSource {
    async fn fetch_comment_page(
        &self,
        request: PageRequest<'_>,
    ) -> Result<CommentPage, YoutubeError> {
        let request_index = {
            let mut log = self.requests.lock().unwrap();
            log.push((request.page_size, request.page_token.map(str::to_string)));
            log.len() - 1
        };

        if let Some((fail_at, make_err)) = self.fail_on_request {
            if fail_at == request_index {
                return Err(make_err(request.video_id));
            }
        }

        let start = request
            .page_token
            .and_then(|t| t.strip_prefix("offset-"))
            .map_or(0, |n| n.parse::<usize>().unwrap());
        let end = (start + request.page_size as usize).min(self.total);
        let comments = (start..end).map(|n| comment(request.video_id, n)).collect();
        let next_page_token = (end < self.total).then(|| format!("offset-{end}"));
        Ok(CommentPage {
            comments,
            next_page_token,
        })
    }
}

fn options(max_results: Option<usize>, page_size: u32) -> CollectOptions {
    CollectOptions {
        max_results,
        include_replies: true,
        page_size,
        inter_page_delay_ms: 0,
    }
}

// ---------------------------------------------------------------------------
// CollectState
// ---------------------------------------------------------------------------

#[test]
fn state_truncates_page_to_remaining_cap() {
    let mut state = CollectState::new(Some(3));
    let more = state.absorb(CommentPage {
        comments: (0..5).map(|n| comment("v", n)).collect(),
        next_page_token: Some("page-1".to_string()),
    });
    assert!(!more, "cap reached, no further pages");
    assert_eq!(state.into_comments().len(), 3);
}

#[test]
fn state_stops_without_token() {
    let mut state = CollectState::new(None);
    let more = state.absorb(CommentPage {
        comments: vec![comment("v", 0)],
        next_page_token: None,
    });
    assert!(!more);
    assert_eq!(state.pages(), 1);
}

#[test]
fn state_stops_on_repeated_token() {
    let mut state = CollectState::new(None);
    assert!(state.absorb(CommentPage {
        comments: vec![comment("v", 0)],
        next_page_token: Some("same".to_string()),
    }));
    assert!(!state.absorb(CommentPage {
        comments: vec![comment("v", 1)],
        next_page_token: Some("same".to_string()),
    }));
    assert_eq!(state.into_comments().len(), 2);
}

#[test]
fn next_page_size_is_bounded_by_cap_and_api_limit() {
    assert_eq!(CollectState::new(None).next_page_size(500), 100);
    assert_eq!(CollectState::new(Some(30)).next_page_size(100), 30);
    assert_eq!(CollectState::new(Some(1_000)).next_page_size(50), 50);
    assert_eq!(CollectState::new(None).next_page_size(0), 1);
}

// ---------------------------------------------------------------------------
// collect_comments
// ---------------------------------------------------------------------------

#[tokio::test]
async fn cap_of_fifty_out_of_five_hundred_returns_first_fifty_in_order() {
    let source = FakeSource::new(500);
    let result = collect_comments(&source, "dQw4w9WgXcQ", options(Some(50), 100))
        .await
        .expect("collection should succeed");

    assert_eq!(result.comments.len(), 50);
    assert!(result.is_complete());
    let ids: Vec<&str> = result.comments.iter().map(|c| c.comment_id.as_str()).collect();
    let expected: Vec<String> = (0..50).map(|n| format!("c{n}")).collect();
    assert_eq!(ids, expected.iter().map(String::as_str).collect::<Vec<_>>());
    assert_eq!(source.request_log(), vec![(50, None)]);
}

#[tokio::test]
async fn uncapped_collection_follows_every_page() {
    let source = FakeSource::new(250);
    let result = collect_comments(&source, "dQw4w9WgXcQ", options(None, 100))
        .await
        .unwrap();

    assert_eq!(result.comments.len(), 250);
    assert_eq!(result.pages_fetched, 3);
    let tokens: Vec<Option<String>> = source.request_log().into_iter().map(|(_, t)| t).collect();
    assert_eq!(
        tokens,
        vec![None, Some("offset-100".to_string()), Some("offset-200".to_string())]
    );
}

#[tokio::test]
async fn cap_larger_than_available_returns_everything() {
    let source = FakeSource::new(120);
    let result = collect_comments(&source, "dQw4w9WgXcQ", options(Some(1_000), 100))
        .await
        .unwrap();
    assert_eq!(result.comments.len(), 120);
}

#[tokio::test]
async fn cap_never_exceeded_for_any_cap() {
    for cap in [1usize, 7, 99, 100, 101, 199, 333] {
        let source = FakeSource::new(250);
        let result = collect_comments(&source, "v", options(Some(cap), 100))
            .await
            .unwrap();
        assert_eq!(result.comments.len(), cap.min(250), "cap {cap}");
    }
}

#[tokio::test]
async fn zero_cap_makes_no_requests() {
    let source = FakeSource::new(10);
    let result = collect_comments(&source, "v", options(Some(0), 100))
        .await
        .unwrap();
    assert!(result.comments.is_empty());
    assert!(source.request_log().is_empty());
}

#[tokio::test]
async fn comments_disabled_yields_empty_collection() {
    let source = FakeSource::new(10)
        .failing_on(0, |id| YoutubeError::CommentsDisabled(id.to_string()));
    let result = collect_comments(&source, "dQw4w9WgXcQ", options(None, 100))
        .await
        .expect("disabled comments are not an error");
    assert!(result.comments.is_empty());
    assert!(result.is_complete());
}

#[tokio::test]
async fn missing_video_fails_with_video_not_found() {
    let source =
        FakeSource::new(0).failing_on(0, |id| YoutubeError::VideoNotFound(id.to_string()));
    let err = collect_comments(&source, "xxxxxxxxxxx", options(None, 100))
        .await
        .unwrap_err();
    assert!(matches!(err, YoutubeError::VideoNotFound(ref id) if id == "xxxxxxxxxxx"));
}

#[tokio::test]
async fn first_page_quota_error_is_returned() {
    let source = FakeSource::new(10)
        .failing_on(0, |_| YoutubeError::QuotaExceeded("daily limit".to_string()));
    let err = collect_comments(&source, "v", options(None, 100))
        .await
        .unwrap_err();
    assert!(matches!(err, YoutubeError::QuotaExceeded(_)));
    assert_eq!(source.request_log().len(), 1, "no retry after quota error");
}

#[tokio::test]
async fn later_page_failure_keeps_partial_results() {
    let source = FakeSource::new(300).failing_on(2, |_| YoutubeError::Transient {
        status: 503,
        message: "backend error".to_string(),
    });
    let result = collect_comments(&source, "v", options(None, 100))
        .await
        .expect("partial results are returned");

    assert_eq!(result.comments.len(), 200);
    assert_eq!(result.pages_fetched, 2);
    assert!(matches!(
        result.interrupted,
        Some(YoutubeError::Transient { status: 503, .. })
    ));
    assert!(!result.is_complete());
}
