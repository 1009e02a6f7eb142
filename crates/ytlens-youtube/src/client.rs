//! HTTP client for the `YouTube` Data API v3.
//!
//! Wraps `reqwest` with API-key management, an explicit per-call timeout,
//! typed error classification, and typed response deserialization. All calls
//! are read-only GETs; nothing is retried.

use std::time::Duration;

use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use ytlens_core::{ChannelStats, VideoDetails};

use crate::error::{classify_api_error, YoutubeError};
use crate::normalize::{normalize_channel, normalize_video};
use crate::types::{ChannelResource, ListResponse, VideoResource};

const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/youtube/v3/";

/// Client for the `YouTube` Data API.
///
/// Use [`YoutubeClient::new`] for production or
/// [`YoutubeClient::with_base_url`] to point at a mock server in tests.
pub struct YoutubeClient {
    client: Client,
    api_key: String,
    base_url: Url,
}

impl YoutubeClient {
    /// Creates a client pointed at the production API.
    ///
    /// # Errors
    ///
    /// Returns [`YoutubeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, YoutubeError> {
        Self::with_base_url(api_key, timeout_secs, user_agent, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`YoutubeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`YoutubeError::InvalidBaseUrl`] if
    /// `base_url` does not parse.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, YoutubeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Exactly one trailing slash so `Url::join` appends the endpoint
        // instead of replacing the last path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| YoutubeError::InvalidBaseUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url,
        })
    }

    /// Fetches snippet and statistics for one channel.
    ///
    /// # Errors
    ///
    /// - [`YoutubeError::ChannelNotFound`] if the API returns no items.
    /// - [`YoutubeError::QuotaExceeded`], [`YoutubeError::Transient`],
    ///   [`YoutubeError::Api`] for non-2xx responses.
    /// - [`YoutubeError::Http`] on network failure.
    /// - [`YoutubeError::Deserialize`] if the body does not match.
    pub async fn get_channel(&self, channel_id: &str) -> Result<ChannelStats, YoutubeError> {
        let url = self.build_url(
            "channels",
            &[("part", "snippet,statistics"), ("id", channel_id)],
        )?;
        let response: ListResponse<ChannelResource> =
            self.request_json(&url, "channels.list", None).await?;

        response
            .items
            .into_iter()
            .next()
            .map(normalize_channel)
            .ok_or_else(|| YoutubeError::ChannelNotFound(channel_id.to_owned()))
    }

    /// Maps an `@handle` to its canonical channel ID.
    ///
    /// The leading `@` is optional.
    ///
    /// # Errors
    ///
    /// [`YoutubeError::ChannelNotFound`] when no channel owns the handle, plus
    /// the transport errors of [`Self::get_channel`].
    pub async fn channel_id_for_handle(&self, handle: &str) -> Result<String, YoutubeError> {
        let handle = format!("@{}", handle.trim_start_matches('@'));
        self.lookup_channel_id("forHandle", &handle).await
    }

    /// Maps a legacy `/user/` or `/c/` name to a channel ID.
    ///
    /// # Errors
    ///
    /// [`YoutubeError::ChannelNotFound`] when the name is unknown, plus the
    /// transport errors of [`Self::get_channel`].
    pub async fn channel_id_for_username(&self, username: &str) -> Result<String, YoutubeError> {
        self.lookup_channel_id("forUsername", username).await
    }

    async fn lookup_channel_id(&self, param: &str, value: &str) -> Result<String, YoutubeError> {
        let url = self.build_url("channels", &[("part", "id"), (param, value)])?;
        let response: ListResponse<ChannelResource> =
            self.request_json(&url, "channels.list", None).await?;

        let id = response
            .items
            .into_iter()
            .next()
            .map(|c| c.id)
            .ok_or_else(|| YoutubeError::ChannelNotFound(value.to_owned()))?;
        tracing::debug!(%param, %value, channel_id = %id, "resolved channel lookup");
        Ok(id)
    }

    /// Fetches snippet and statistics for one video.
    ///
    /// # Errors
    ///
    /// - [`YoutubeError::VideoNotFound`] if the API returns no items.
    /// - Transport and classification errors as for [`Self::get_channel`].
    pub async fn get_video(&self, video_id: &str) -> Result<VideoDetails, YoutubeError> {
        let url = self.build_url(
            "videos",
            &[("part", "snippet,statistics"), ("id", video_id)],
        )?;
        let response: ListResponse<VideoResource> =
            self.request_json(&url, "videos.list", Some(video_id)).await?;

        response
            .items
            .into_iter()
            .next()
            .map(normalize_video)
            .ok_or_else(|| YoutubeError::VideoNotFound(video_id.to_owned()))
    }

    /// Builds the request URL for `endpoint` with the API key and
    /// percent-encoded query parameters.
    pub(crate) fn build_url(
        &self,
        endpoint: &str,
        params: &[(&str, &str)],
    ) -> Result<Url, YoutubeError> {
        let mut url = self
            .base_url
            .join(endpoint)
            .map_err(|e| YoutubeError::InvalidBaseUrl {
                url: self.base_url.to_string(),
                reason: e.to_string(),
            })?;
        {
            let mut pairs = url.query_pairs_mut();
            for (k, v) in params {
                pairs.append_pair(k, v);
            }
            pairs.append_pair("key", &self.api_key);
        }
        Ok(url)
    }

    /// Sends a GET request, classifies non-2xx responses, and deserializes
    /// the body.
    ///
    /// `endpoint` is used as the error context so the API key in the URL is
    /// never echoed into messages or logs.
    pub(crate) async fn request_json<T: DeserializeOwned>(
        &self,
        url: &Url,
        endpoint: &str,
        video_id: Option<&str>,
    ) -> Result<T, YoutubeError> {
        tracing::debug!(endpoint, "YouTube API request");
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let err = classify_api_error(status.as_u16(), &body, video_id);
            tracing::debug!(endpoint, status = status.as_u16(), error = %err, "YouTube API error");
            return Err(err);
        }

        serde_json::from_str(&body).map_err(|e| YoutubeError::Deserialize {
            context: endpoint.to_owned(),
            source: e,
        })
    }
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
