//! Export and delivery boundary.
//!
//! Results leave the library as a tabular artifact with the columns
//! `site_name, title, link, snippet, date`. [`CsvExporter`] is the
//! spreadsheet-compatible default; mail servers live behind [`MailTransport`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::errors::WatchError;
use crate::models::{AnnotatedResult, ResultSet};

/// Column order of every export.
pub const COLUMNS: [&str; 5] = ["site_name", "title", "link", "snippet", "date"];

/// Body text of a delivery message.
pub const DELIVERY_BODY: &str = "Search results are attached.";

/// One exported row. Missing values are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportRecord {
    /// Canonical host.
    pub site_name: String,
    /// Result title.
    pub title: String,
    /// Result URL.
    pub link: String,
    /// Snippet with the date removed.
    pub snippet: String,
    /// Canonical date, or empty.
    pub date: String,
}

impl ExportRecord {
    /// Cell values in [`COLUMNS`] order.
    #[must_use]
    pub fn cells(&self) -> [&str; 5] {
        [
            self.site_name.as_str(),
            self.title.as_str(),
            self.link.as_str(),
            self.snippet.as_str(),
            self.date.as_str(),
        ]
    }
}

impl From<&AnnotatedResult> for ExportRecord {
    fn from(result: &AnnotatedResult) -> Self {
        Self {
            site_name: result.site_name.clone(),
            title: result.title.clone(),
            link: result.link.clone(),
            snippet: result.snippet.clone(),
            date: result.date.clone(),
        }
    }
}

/// Rows for a result set, in result order.
#[must_use]
pub fn records(results: &ResultSet) -> Vec<ExportRecord> {
    results.iter().map(ExportRecord::from).collect()
}

/// `<keyword>_search_results.<extension>`, with path separators replaced.
#[must_use]
pub fn export_file_name(keyword: &str, extension: &str) -> String {
    let stem: String = keyword
        .trim()
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '_' } else { c })
        .collect();
    format!("{stem}_search_results.{extension}")
}

/// An encoded export ready to download or attach.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    /// Suggested file name.
    pub file_name: String,
    /// MIME type of `bytes`.
    pub mime_type: String,
    /// Encoded payload.
    pub bytes: Vec<u8>,
}

impl ExportArtifact {
    /// Size of the encoded payload.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Whether the payload is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Writes the payload into `dir` under its file name.
    pub fn write_to(&self, dir: impl AsRef<Path>) -> Result<PathBuf, WatchError> {
        let path = dir.as_ref().join(&self.file_name);
        std::fs::write(&path, &self.bytes)?;
        Ok(path)
    }
}

/// Encodes rows into one tabular file format.
pub trait TabularExporter: Send + Sync {
    /// File extension without the dot.
    fn extension(&self) -> &'static str;

    /// MIME type of the encoded payload.
    fn mime_type(&self) -> &'static str;

    /// Encodes rows in [`COLUMNS`] order.
    fn encode(&self, records: &[ExportRecord]) -> Result<Vec<u8>, WatchError>;

    /// Encodes a result set into a named artifact.
    fn export(&self, keyword: &str, results: &ResultSet) -> Result<ExportArtifact, WatchError> {
        let bytes = self.encode(&records(results))?;
        tracing::debug!(
            keyword,
            rows = results.len(),
            bytes = bytes.len(),
            format = self.extension(),
            "encoded export"
        );
        Ok(ExportArtifact {
            file_name: export_file_name(keyword, self.extension()),
            mime_type: self.mime_type().to_string(),
            bytes,
        })
    }
}

/// Writes rows as CSV with a header line, the spreadsheet-compatible default.
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvExporter;

impl CsvExporter {
    /// Creates a CSV exporter.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl TabularExporter for CsvExporter {
    fn extension(&self) -> &'static str {
        "csv"
    }

    fn mime_type(&self) -> &'static str {
        "text/csv"
    }

    fn encode(&self, records: &[ExportRecord]) -> Result<Vec<u8>, WatchError> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(COLUMNS)?;
        for record in records {
            writer.write_record(record.cells())?;
        }
        writer
            .into_inner()
            .map_err(|e| WatchError::export(format!("cannot finish CSV export: {e}")))
    }
}

/// Writes rows as a JSON array of objects.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonExporter {
    pretty: bool,
}

impl JsonExporter {
    /// Compact output.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Indented output.
    #[must_use]
    pub fn pretty() -> Self {
        Self { pretty: true }
    }
}

impl TabularExporter for JsonExporter {
    fn extension(&self) -> &'static str {
        "json"
    }

    fn mime_type(&self) -> &'static str {
        "application/json"
    }

    fn encode(&self, records: &[ExportRecord]) -> Result<Vec<u8>, WatchError> {
        let bytes = if self.pretty {
            serde_json::to_vec_pretty(records)?
        } else {
            serde_json::to_vec(records)?
        };
        Ok(bytes)
    }
}

/// A message carrying an export to one recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryRequest {
    /// Destination address.
    pub recipient: String,
    /// Message subject.
    pub subject: String,
    /// Message body.
    pub body: String,
    /// Attached export.
    pub attachment: ExportArtifact,
}

impl DeliveryRequest {
    /// Builds the standard results message for `keyword`.
    ///
    /// # Errors
    ///
    /// Returns [`WatchError::Delivery`] if the recipient is not an address.
    pub fn for_results(
        keyword: &str,
        recipient: &str,
        attachment: ExportArtifact,
    ) -> Result<Self, WatchError> {
        let recipient = recipient.trim();
        if !looks_like_address(recipient) {
            return Err(WatchError::Delivery(format!(
                "invalid recipient address: '{recipient}'"
            )));
        }
        Ok(Self {
            recipient: recipient.to_string(),
            subject: format!("{} Search Results", keyword.trim()),
            body: DELIVERY_BODY.to_string(),
            attachment,
        })
    }
}

fn looks_like_address(text: &str) -> bool {
    match text.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !text.contains(char::is_whitespace)
        }
        None => false,
    }
}

/// What a transport did with a delivery request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryOutcome {
    /// The message left through a mail server.
    Sent,
    /// The message was only recorded; nothing was sent.
    Logged,
}

impl DeliveryOutcome {
    /// User-facing line describing the outcome for `recipient`.
    #[must_use]
    pub fn notice(self, recipient: &str) -> String {
        match self {
            Self::Sent => format!("Results sent to {recipient}"),
            Self::Logged => {
                format!("Delivery request logged for {recipient} (no mail transport configured)")
            }
        }
    }
}

/// Sends delivery requests.
#[async_trait]
pub trait MailTransport: Send + Sync {
    /// Hands one message to the transport.
    async fn send(&self, request: &DeliveryRequest) -> Result<DeliveryOutcome, WatchError>;
}

/// Logs each message instead of sending it.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingMailTransport;

#[async_trait]
impl MailTransport for LoggingMailTransport {
    async fn send(&self, request: &DeliveryRequest) -> Result<DeliveryOutcome, WatchError> {
        tracing::info!(
            recipient = %request.recipient,
            subject = %request.subject,
            attachment = %request.attachment.file_name,
            bytes = request.attachment.len(),
            "delivery logged, no mail transport configured"
        );
        Ok(DeliveryOutcome::Logged)
    }
}
