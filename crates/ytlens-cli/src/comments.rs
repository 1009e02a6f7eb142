//! `comments` command: collect a video's comments, preview them, and export.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::Utc;
use ytlens_core::{format_count, AppConfig, Comment, ResolvedRef, VideoDetails};
use ytlens_export::{csv_filename, write_comments_csv, AirtableClient, ExportError};
use ytlens_youtube::{CollectOptions, YoutubeClient};

const DASH: &str = "\u{2014}";
const PREVIEW_TEXT_WIDTH: usize = 60;

#[derive(Debug)]
pub(crate) struct CommentsArgs {
    pub(crate) input: String,
    pub(crate) max_results: Option<usize>,
    pub(crate) include_replies: bool,
    pub(crate) csv: Option<PathBuf>,
    pub(crate) csv_dir: Option<PathBuf>,
    pub(crate) airtable: bool,
    pub(crate) preview: usize,
}

/// Collect comments for one video and hand them to the requested exporters.
///
/// Video details are fetched first; a video without a comment count has
/// comments turned off and nothing further is requested. A collection cut
/// short by an API error still prints and exports what was gathered.
///
/// # Errors
///
/// Returns an error if the input is not a video, the video cannot be found,
/// the first comment page fails, or an export fails. Missing Airtable
/// credentials only skip the upload.
pub(crate) async fn run_comments(
    client: &YoutubeClient,
    config: &AppConfig,
    args: &CommentsArgs,
) -> anyhow::Result<()> {
    let airtable = if args.airtable {
        airtable_client(config)?
    } else {
        None
    };

    let video_id = match client.resolve(&args.input).await? {
        ResolvedRef::Video(video) => video.id().to_string(),
        ResolvedRef::Channel(_) => {
            anyhow::bail!("\"{}\" is a channel, not a video", args.input.trim())
        }
    };

    let video = client.get_video(&video_id).await?;
    print_video(&video);
    if video.comments_disabled() {
        println!("Comments are disabled for this video.");
        return Ok(());
    }

    let options = CollectOptions {
        max_results: args.max_results,
        include_replies: args.include_replies,
        page_size: config.comment_page_size,
        inter_page_delay_ms: config.inter_page_delay_ms,
    };
    let collection = client.collect_comments(&video_id, options).await?;
    if let Some(err) = &collection.interrupted {
        eprintln!(
            "warning: stopped after {} page(s): {}",
            collection.pages_fetched,
            err.user_message()
        );
    }

    let comments = &collection.comments;
    println!();
    let fetched = u64::try_from(comments.len()).unwrap_or(u64::MAX);
    println!("Fetched {} comments.", format_count(Some(fetched), true, 0));
    if comments.is_empty() {
        return Ok(());
    }

    if args.preview > 0 {
        println!();
        print_preview(comments, args.preview);
    }

    if let Some(path) = csv_target(args, &video) {
        export_csv(&path, comments)?;
        println!("Wrote {}", path.display());
    }

    if let Some(airtable) = airtable {
        let created = airtable
            .upload_comments(comments, config.inter_page_delay_ms)
            .await?;
        println!("Uploaded {created} records to Airtable.");
    }

    Ok(())
}

/// Airtable client for `--airtable`, or `None` with a warning when the
/// credentials are not configured.
fn airtable_client(config: &AppConfig) -> Result<Option<AirtableClient>, ExportError> {
    match AirtableClient::from_optional(config.airtable.as_ref(), config.request_timeout_secs) {
        Ok(client) => Ok(Some(client)),
        Err(ExportError::Unconfigured) => {
            eprintln!(
                "warning: {}; skipping Airtable upload",
                ExportError::Unconfigured
            );
            tracing::warn!("Airtable export requested without credentials");
            Ok(None)
        }
        Err(err) => Err(err),
    }
}

fn print_video(video: &VideoDetails) {
    let published = video.published_at.map_or_else(
        || DASH.to_string(),
        |d| d.format("%Y-%m-%d").to_string(),
    );
    println!("{}", video.title.as_deref().unwrap_or(DASH));
    println!("{:<11}{}", "Channel", video.channel_title.as_deref().unwrap_or(DASH));
    println!("{:<11}{published}", "Published");
    println!("{:<11}{}", "Views", format_count(video.view_count, true, 0));
    if !video.comments_disabled() {
        println!("{:<11}{}", "Comments", format_count(video.comment_count, true, 0));
    }
}

fn print_preview(comments: &[Comment], limit: usize) {
    let header = format!(
        "{:<24}{:<7}{:<12}{:<7}COMMENT",
        "AUTHOR", "LIKES", "PUBLISHED", "REPLY"
    );
    println!("{header}");
    for comment in comments.iter().take(limit) {
        println!(
            "{:<24}{:<7}{:<12}{:<7}{}",
            truncate(&comment.author_name, 22),
            comment.like_count,
            comment.published_at.format("%Y-%m-%d").to_string(),
            if comment.is_reply { "yes" } else { "no" },
            truncate(&comment.text.replace('\n', " "), PREVIEW_TEXT_WIDTH),
        );
    }
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() > width {
        format!("{}...", text.chars().take(width).collect::<String>())
    } else {
        text.to_string()
    }
}

/// Where the CSV should go: the explicit path, or a title-derived name
/// inside `--csv-dir`.
fn csv_target(args: &CommentsArgs, video: &VideoDetails) -> Option<PathBuf> {
    if let Some(path) = &args.csv {
        return Some(path.clone());
    }
    args.csv_dir.as_ref().map(|dir| {
        let title = video.title.as_deref().unwrap_or(&video.video_id);
        dir.join(csv_filename(title, Utc::now().date_naive()))
    })
}

fn export_csv(path: &Path, comments: &[Comment]) -> anyhow::Result<()> {
    let file = File::create(path)
        .with_context(|| format!("could not create {}", path.display()))?;
    write_comments_csv(BufWriter::new(file), comments)?;
    tracing::info!(path = %path.display(), rows = comments.len(), "wrote CSV export");
    Ok(())
}
