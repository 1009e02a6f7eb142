//! Turns user-supplied URLs and bare IDs into canonical channel or video IDs.
//!
//! Matching is a fixed-priority table of `(UrlShape, Regex)` rows. The first
//! row whose pattern matches the trimmed input decides the outcome; later rows
//! are never consulted. Adding a URL shape means adding one row.
//!
//! Handles and legacy names are not IDs; they are returned as lookup targets
//! and [`YoutubeClient::resolve`] turns them into channel IDs with one extra
//! API call.

use std::sync::LazyLock;

use percent_encoding::percent_decode_str;
use regex::Regex;
use ytlens_core::{ChannelRef, ResolvedRef, VideoRef};

use crate::client::YoutubeClient;
use crate::error::YoutubeError;

/// Optional scheme and host prefix shared by every `youtube.com` pattern.
/// Scheme and host are case-insensitive.
const YT_HOST: &str = r"^(?i:https?://)?(?i:www\.|m\.|music\.)?(?i:youtube\.com)";
/// Anything allowed after the captured segment: nothing, or a `/`, `?`, `&`
/// or `#` followed by the rest of the URL.
const TAIL: &str = r"(?:[/?&#].*)?$";

const CHANNEL_ID: &str = r"(UC[A-Za-z0-9_-]{22})";
const VIDEO_ID: &str = r"([A-Za-z0-9_-]{11})";
/// Handles may contain any letter or digit, and arrive percent-encoded when
/// copied from a browser address bar.
const HANDLE: &str = r"([\p{L}\p{N}\p{M}._%-]{3,})";
const LEGACY_NAME: &str = r"([A-Za-z0-9._-]+)";

/// The URL shapes the resolver recognises, in the order they are tried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlShape {
    ChannelPath,
    HandlePath,
    CustomPath,
    UserPath,
    WatchQuery,
    ShortLink,
    EmbedPath,
    LegacyVideoPath,
    ShortsPath,
    LivePath,
    BareChannelId,
    BareHandle,
    BareVideoId,
}

/// What a matched shape points at before any API lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    ChannelId(String),
    /// `@handle`, stored without the `@` and percent-decoded.
    Handle(String),
    /// Legacy `/user/` or `/c/` name.
    Username(String),
    VideoId(String),
}

/// Result of the offline parsing step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRef {
    pub shape: UrlShape,
    pub target: Target,
}

impl UrlShape {
    fn target(self, captured: &str) -> Target {
        let owned = captured.to_string();
        match self {
            UrlShape::ChannelPath | UrlShape::BareChannelId => Target::ChannelId(owned),
            UrlShape::HandlePath | UrlShape::BareHandle => {
                Target::Handle(percent_decode_str(captured).decode_utf8_lossy().into_owned())
            }
            UrlShape::CustomPath | UrlShape::UserPath => Target::Username(owned),
            UrlShape::WatchQuery
            | UrlShape::ShortLink
            | UrlShape::EmbedPath
            | UrlShape::LegacyVideoPath
            | UrlShape::ShortsPath
            | UrlShape::LivePath
            | UrlShape::BareVideoId => Target::VideoId(owned),
        }
    }
}

static MATCHERS: LazyLock<Vec<(UrlShape, Regex)>> = LazyLock::new(|| {
    let rows = [
        (UrlShape::ChannelPath, format!("{YT_HOST}/channel/{CHANNEL_ID}{TAIL}")),
        (UrlShape::HandlePath, format!("{YT_HOST}/@{HANDLE}{TAIL}")),
        (UrlShape::CustomPath, format!("{YT_HOST}/c/{LEGACY_NAME}{TAIL}")),
        (UrlShape::UserPath, format!("{YT_HOST}/user/{LEGACY_NAME}{TAIL}")),
        (
            UrlShape::WatchQuery,
            format!(r"{YT_HOST}/watch/?\?(?:[^#]*&)?v={VIDEO_ID}/?(?:[&#].*)?$"),
        ),
        (
            UrlShape::ShortLink,
            format!(r"^(?i:https?://)?(?i:youtu\.be)/{VIDEO_ID}{TAIL}"),
        ),
        (
            UrlShape::EmbedPath,
            format!(
                r"^(?i:https?://)?(?i:www\.)?(?i:youtube\.com|youtube-nocookie\.com)/embed/{VIDEO_ID}{TAIL}"
            ),
        ),
        (UrlShape::LegacyVideoPath, format!("{YT_HOST}/v/{VIDEO_ID}{TAIL}")),
        (UrlShape::ShortsPath, format!("{YT_HOST}/shorts/{VIDEO_ID}{TAIL}")),
        (UrlShape::LivePath, format!("{YT_HOST}/live/{VIDEO_ID}{TAIL}")),
        (UrlShape::BareChannelId, format!("^{CHANNEL_ID}$")),
        (UrlShape::BareHandle, format!("^@{HANDLE}$")),
        (UrlShape::BareVideoId, format!("^{VIDEO_ID}$")),
    ];
    rows.into_iter()
        .map(|(shape, pattern)| (shape, Regex::new(&pattern).expect("valid URL shape regex")))
        .collect()
});

/// Parses `input` against the URL-shape table without any network calls.
///
/// Surrounding whitespace is ignored. Trailing slashes, extra path segments,
/// fragments, and unrelated query parameters are tolerated.
///
/// # Errors
///
/// Returns [`YoutubeError::NotResolvable`] when no shape matches.
pub fn parse_reference(input: &str) -> Result<ParsedRef, YoutubeError> {
    let trimmed = input.trim();
    MATCHERS
        .iter()
        .find_map(|(shape, re)| {
            re.captures(trimmed)
                .and_then(|caps| caps.get(1))
                .map(|m| ParsedRef {
                    shape: *shape,
                    target: shape.target(m.as_str()),
                })
        })
        .ok_or_else(|| YoutubeError::NotResolvable(trimmed.to_string()))
}

impl YoutubeClient {
    /// Resolves user input to a channel or video reference.
    ///
    /// Channel and video IDs are returned without an API call. Handles and
    /// legacy names cost one `channels.list` lookup.
    ///
    /// # Errors
    ///
    /// - [`YoutubeError::NotResolvable`] for unrecognised input.
    /// - [`YoutubeError::ChannelNotFound`] when a handle or name lookup finds
    ///   nothing.
    /// - Transport and API errors from the lookup call.
    pub async fn resolve(&self, input: &str) -> Result<ResolvedRef, YoutubeError> {
        let parsed = parse_reference(input)?;
        tracing::debug!(shape = ?parsed.shape, "matched URL shape");
        let raw = input.trim();

        let resolved = match parsed.target {
            Target::ChannelId(id) => ResolvedRef::Channel(ChannelRef::new(id, raw)),
            Target::VideoId(id) => ResolvedRef::Video(VideoRef::new(id, raw)),
            Target::Handle(handle) => {
                let id = self.channel_id_for_handle(&handle).await?;
                ResolvedRef::Channel(ChannelRef::new(id, raw))
            }
            Target::Username(name) => {
                let id = self.channel_id_for_username(&name).await?;
                ResolvedRef::Channel(ChannelRef::new(id, raw))
            }
        };
        Ok(resolved)
    }

    /// Resolves input to a channel, following a video reference to the
    /// channel that uploaded it.
    ///
    /// # Errors
    ///
    /// As for [`Self::resolve`], plus [`YoutubeError::VideoNotFound`] when
    /// the referenced video does not exist, and
    /// [`YoutubeError::ChannelNotFound`] when it carries no channel ID.
    pub async fn resolve_channel(&self, input: &str) -> Result<ChannelRef, YoutubeError> {
        match self.resolve(input).await? {
            ResolvedRef::Channel(channel) => Ok(channel),
            ResolvedRef::Video(video) => {
                let details = self.get_video(video.id()).await?;
                let channel_id = details.channel_id.ok_or_else(|| {
                    YoutubeError::ChannelNotFound(format!("uploader of video {}", video.id()))
                })?;
                Ok(ChannelRef::new(channel_id, video.input()))
            }
        }
    }
}
