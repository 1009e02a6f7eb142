//! Paginated comment collection.
//!
//! [`collect_comments`] drives a sequential fetch loop over any
//! [`CommentPageSource`]; [`YoutubeClient`] is the production source and
//! tests use an in-memory fake. Loop state lives in [`CollectState`] so the
//! stopping rules can be checked without a network.
//!
//! **Best-effort semantics**: a failure on the first page is returned as an
//! error. A failure on any later page ends the loop and returns the comments
//! gathered so far, with the error recorded in
//! [`CommentCollection::interrupted`].

use std::future::Future;
use std::time::Duration;

use ytlens_core::config::MAX_COMMENT_PAGE_SIZE;
use ytlens_core::Comment;

use crate::client::YoutubeClient;
use crate::error::YoutubeError;
use crate::normalize::flatten_thread;
use crate::types::{CommentThreadResource, ListResponse};

/// One page of already-normalized comments plus the continuation token.
#[derive(Debug, Default)]
pub struct CommentPage {
    pub comments: Vec<Comment>,
    /// `None` when this was the last page.
    pub next_page_token: Option<String>,
}

/// Parameters for a single page request.
#[derive(Debug, Clone, Copy)]
pub struct PageRequest<'a> {
    pub video_id: &'a str,
    pub page_size: u32,
    pub page_token: Option<&'a str>,
    pub include_replies: bool,
}

/// Anything that can serve pages of comments for a video.
pub trait CommentPageSource {
    /// Fetches one page.
    fn fetch_comment_page(
        &self,
        request: PageRequest<'_>,
    ) -> impl Future<Output = Result<CommentPage, YoutubeError>> + Send;
}

#[derive(Debug, Clone, Copy)]
pub struct CollectOptions {
    /// Upper bound on returned comments; `None` collects everything.
    pub max_results: Option<usize>,
    pub include_replies: bool,
    /// Threads requested per page, clamped to `1..=100`.
    pub page_size: u32,
    /// Pause between page requests. Not applied before the first page.
    pub inter_page_delay_ms: u64,
}

impl Default for CollectOptions {
    fn default() -> Self {
        Self {
            max_results: None,
            include_replies: true,
            page_size: MAX_COMMENT_PAGE_SIZE,
            inter_page_delay_ms: 0,
        }
    }
}

/// Comments gathered by one [`collect_comments`] call.
#[derive(Debug, Default)]
pub struct CommentCollection {
    /// In API page order; replies follow their parent.
    pub comments: Vec<Comment>,
    pub pages_fetched: usize,
    /// The error that cut collection short after at least one page.
    pub interrupted: Option<YoutubeError>,
}

impl CommentCollection {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.interrupted.is_none()
    }
}

/// Loop state for the paginated fetch.
#[derive(Debug)]
pub struct CollectState {
    accumulated: Vec<Comment>,
    token: Option<String>,
    remaining_cap: Option<usize>,
    pages: usize,
}

impl CollectState {
    #[must_use]
    pub fn new(max_results: Option<usize>) -> Self {
        Self {
            accumulated: Vec::new(),
            token: None,
            remaining_cap: max_results,
            pages: 0,
        }
    }

    #[must_use]
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    #[must_use]
    pub fn pages(&self) -> usize {
        self.pages
    }

    #[must_use]
    pub fn cap_reached(&self) -> bool {
        self.remaining_cap == Some(0)
    }

    /// Page size for the next request: never more than the remaining cap.
    #[must_use]
    pub fn next_page_size(&self, page_size: u32) -> u32 {
        let page_size = page_size.clamp(1, MAX_COMMENT_PAGE_SIZE);
        match self.remaining_cap {
            Some(rem) => u32::try_from(rem).map_or(page_size, |r| r.clamp(1, page_size)),
            None => page_size,
        }
    }

    /// Appends a page and returns `true` if another page should be fetched.
    ///
    /// Comments beyond the remaining cap are dropped. The loop ends when the
    /// page carries no continuation token, when the cap is reached, or when
    /// the API hands back the token it was just given.
    pub fn absorb(&mut self, page: CommentPage) -> bool {
        self.pages += 1;
        let mut comments = page.comments;
        if let Some(rem) = self.remaining_cap {
            comments.truncate(rem);
            self.remaining_cap = Some(rem - comments.len());
        }
        self.accumulated.extend(comments);

        let repeated = page.next_page_token.is_some() && page.next_page_token == self.token;
        if repeated {
            tracing::warn!(
                token = ?page.next_page_token,
                "API returned the same page token twice; stopping"
            );
        }
        self.token = page.next_page_token;
        self.token.is_some() && !repeated && !self.cap_reached()
    }

    #[must_use]
    pub fn into_comments(self) -> Vec<Comment> {
        self.accumulated
    }
}

/// Collects comments for `video_id` page by page.
///
/// Returns exactly `min(available, max_results)` comments when no page
/// fails. Comments being disabled on the video yields an empty collection.
///
/// # Errors
///
/// Returns the first page's error unchanged (except
/// [`YoutubeError::CommentsDisabled`]), e.g. [`YoutubeError::VideoNotFound`]
/// or [`YoutubeError::QuotaExceeded`]. Later page failures are reported
/// through [`CommentCollection::interrupted`] instead.
pub async fn collect_comments<S: CommentPageSource>(
    source: &S,
    video_id: &str,
    options: CollectOptions,
) -> Result<CommentCollection, YoutubeError> {
    let mut state = CollectState::new(options.max_results);
    if state.cap_reached() {
        return Ok(CommentCollection::default());
    }

    loop {
        if state.pages() > 0 && options.inter_page_delay_ms > 0 {
            tokio::time::sleep(Duration::from_millis(options.inter_page_delay_ms)).await;
        }

        let request = PageRequest {
            video_id,
            page_size: state.next_page_size(options.page_size),
            page_token: state.token(),
            include_replies: options.include_replies,
        };

        match source.fetch_comment_page(request).await {
            Ok(page) => {
                tracing::debug!(
                    video_id,
                    page = state.pages() + 1,
                    comments = page.comments.len(),
                    has_next = page.next_page_token.is_some(),
                    "fetched comment page"
                );
                if !state.absorb(page) {
                    break;
                }
            }
            Err(YoutubeError::CommentsDisabled(_)) if state.pages() == 0 => {
                tracing::info!(video_id, "comments are disabled for this video");
                return Ok(CommentCollection::default());
            }
            Err(err) if state.pages() == 0 => return Err(err),
            Err(err) => {
                let pages_fetched = state.pages();
                let comments = state.into_comments();
                tracing::warn!(
                    video_id,
                    pages_fetched,
                    collected = comments.len(),
                    error = %err,
                    "comment collection interrupted; returning partial results"
                );
                return Ok(CommentCollection {
                    comments,
                    pages_fetched,
                    interrupted: Some(err),
                });
            }
        }
    }

    let pages_fetched = state.pages();
    Ok(CommentCollection {
        comments: state.into_comments(),
        pages_fetched,
        interrupted: None,
    })
}

impl CommentPageSource for YoutubeClient {
    async fn fetch_comment_page(
        &self,
        request: PageRequest<'_>,
    ) -> Result<CommentPage, YoutubeError> {
        let part = if request.include_replies {
            "snippet,replies"
        } else {
            "snippet"
        };
        let page_size = request.page_size.to_string();
        let mut params = vec![
            ("part", part),
            ("videoId", request.video_id),
            ("maxResults", page_size.as_str()),
            ("textFormat", "plainText"),
        ];
        if let Some(token) = request.page_token {
            params.push(("pageToken", token));
        }

        let url = self.build_url("commentThreads", &params)?;
        let response: ListResponse<CommentThreadResource> = self
            .request_json(&url, "commentThreads.list", Some(request.video_id))
            .await?;

        let comments = response
            .items
            .into_iter()
            .flat_map(|thread| flatten_thread(thread, request.video_id, request.include_replies))
            .collect();

        Ok(CommentPage {
            comments,
            next_page_token: response.next_page_token.filter(|t| !t.is_empty()),
        })
    }
}

impl YoutubeClient {
    /// Convenience wrapper around [`collect_comments`] using this client as
    /// the page source.
    ///
    /// # Errors
    ///
    /// See [`collect_comments`].
    pub async fn collect_comments(
        &self,
        video_id: &str,
        options: CollectOptions,
    ) -> Result<CommentCollection, YoutubeError> {
        collect_comments(self, video_id, options).await
    }
}

#[cfg(test)]
#[path = "comments_test.rs"]
mod tests;
