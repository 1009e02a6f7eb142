//! CSV serialization of collected comments.

use std::io::Write;
use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;
use ytlens_core::Comment;

use crate::error::ExportError;
use crate::record::{CommentRecord, COLUMNS};

static UNSAFE_FILENAME_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s-]").expect("valid filename regex"));

/// Writes a header row and one row per comment, in input order.
///
/// The header is written even when `comments` is empty.
///
/// # Errors
///
/// Returns [`ExportError::Csv`] or [`ExportError::Io`] if writing fails.
pub fn write_comments_csv<W: Write>(writer: W, comments: &[Comment]) -> Result<(), ExportError> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    csv_writer.write_record(COLUMNS)?;
    for comment in comments {
        csv_writer.serialize(CommentRecord::from(comment))?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Reduces a video title to something safe for a file name.
///
/// Punctuation is dropped and whitespace runs become `_`. Falls back to
/// `"video"` when nothing is left.
#[must_use]
pub fn clean_title(title: &str) -> String {
    let stripped = UNSAFE_FILENAME_CHARS.replace_all(title, "");
    let cleaned = stripped.split_whitespace().collect::<Vec<_>>().join("_");
    if cleaned.is_empty() {
        "video".to_string()
    } else {
        cleaned
    }
}

/// Default export file name: `<clean title>_comments_<YYYYMMDD>.csv`.
#[must_use]
pub fn csv_filename(title: &str, date: NaiveDate) -> String {
    format!("{}_comments_{}.csv", clean_title(title), date.format("%Y%m%d"))
}
