//! `YouTube` Data API v3 client: identifier resolution, channel and video
//! lookups, and paginated comment collection.

pub mod client;
pub mod comments;
pub mod error;
pub mod normalize;
pub mod resolve;
pub mod types;

pub use client::YoutubeClient;
pub use comments::{
    collect_comments, CollectOptions, CollectState, CommentCollection, CommentPage,
    CommentPageSource, PageRequest,
};
pub use error::YoutubeError;
pub use resolve::{parse_reference, ParsedRef, Target, UrlShape};
