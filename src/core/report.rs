//! # Report Link Extraction
//!
//! The backend announces a generated PDF by embedding its download path in
//! the reply text (`.../api/reports/download/<name>`). We lift that path out
//! of the text and turn it into a [`ReportLink`] the message view can offer
//! for download.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;

use crate::core::types::ReportLink;

/// Literal path prefix the backend uses for report downloads.
pub const REPORT_PATH_PREFIX: &str = "/api/reports/download/";

/// Shown instead of an empty bubble when the reply was nothing but a link.
pub const REPORT_READY_TEXT: &str = "I've generated a PDF report for you. You can download it below!";

static REPORT_PATH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"{}\S+", regex::escape(REPORT_PATH_PREFIX))).expect("valid report regex")
});

/// Result of scanning a bot reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedReply {
    pub text: String,
    pub report: Option<ReportLink>,
}

/// Strip the first embedded report path from `text`.
///
/// When a path is found it is removed, the remainder is trimmed, and the
/// report URL becomes `{base_url}{path}`. An empty remainder is replaced by
/// [`REPORT_READY_TEXT`]. Text without a report path is returned unchanged.
pub fn extract_report(text: &str, base_url: &str, now: DateTime<Utc>) -> ExtractedReply {
    let Some(found) = REPORT_PATH.find(text) else {
        return ExtractedReply {
            text: text.to_string(),
            report: None,
        };
    };

    let path = found.as_str();
    let mut remaining = String::with_capacity(text.len() - path.len());
    remaining.push_str(&text[..found.start()]);
    remaining.push_str(&text[found.end()..]);
    let mut remaining = remaining.trim().to_string();
    if remaining.is_empty() {
        remaining = REPORT_READY_TEXT.to_string();
    }

    ExtractedReply {
        text: remaining,
        report: Some(ReportLink {
            url: format!("{}{}", base_url.trim_end_matches('/'), path),
            file_name: report_file_name(now),
        }),
    }
}

/// Suggested filename for a report downloaded at `now`.
pub fn report_file_name(now: DateTime<Utc>) -> String {
    format!("report_{}.pdf", now.timestamp_millis())
}
