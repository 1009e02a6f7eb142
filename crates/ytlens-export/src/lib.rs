//! Comment export targets: CSV files and Airtable tables.

pub mod airtable;
pub mod csv_writer;
pub mod error;
pub mod record;

pub use airtable::{AirtableClient, AIRTABLE_BATCH_SIZE};
pub use csv_writer::{clean_title, csv_filename, write_comments_csv};
pub use error::ExportError;
pub use record::{CommentRecord, COLUMNS};
