use std::fmt;
use std::path::PathBuf;

use serde::Deserialize;

/// Payload of the first (and only) client message on a link session.
#[derive(Debug, Clone, Deserialize)]
pub struct LinkRequest {
    pub link: bool,
    pub src_files: Vec<String>,
    pub dst_path: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkStatus {
    Linked,
    Skipped,
    Failed,
}

impl LinkStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkStatus::Linked => "linked",
            LinkStatus::Skipped => "skipped",
            LinkStatus::Failed => "failed",
        }
    }
}

/// Result of processing one source file (or one directory that could not be mirrored).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkOutcome {
    pub source_path: PathBuf,
    pub status: LinkStatus,
    pub detail: String,
}

impl LinkOutcome {
    pub fn linked(source_path: PathBuf, target: &std::path::Path) -> Self {
        Self {
            source_path,
            status: LinkStatus::Linked,
            detail: target.display().to_string(),
        }
    }

    pub fn skipped(source_path: PathBuf, detail: impl Into<String>) -> Self {
        Self {
            source_path,
            status: LinkStatus::Skipped,
            detail: detail.into(),
        }
    }

    pub fn failed(source_path: PathBuf, detail: impl Into<String>) -> Self {
        Self {
            source_path,
            status: LinkStatus::Failed,
            detail: detail.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkSummary {
    pub linked: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl LinkSummary {
    pub fn record(&mut self, status: LinkStatus) {
        match status {
            LinkStatus::Linked => self.linked += 1,
            LinkStatus::Skipped => self.skipped += 1,
            LinkStatus::Failed => self.failed += 1,
        }
    }
}

/// Everything a link session reports, in emission order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkEvent {
    /// The request failed validation; nothing was processed.
    Rejected(String),
    /// `item` is the 1-based position of the requested source this outcome belongs to.
    Outcome {
        item: usize,
        total: usize,
        outcome: LinkOutcome,
    },
    Summary(LinkSummary),
}

impl LinkEvent {
    pub fn outcome(&self) -> Option<&LinkOutcome> {
        match self {
            LinkEvent::Outcome { outcome, .. } => Some(outcome),
            _ => None,
        }
    }
}

impl fmt::Display for LinkEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkEvent::Rejected(detail) => write!(f, "error: {detail}"),
            LinkEvent::Outcome {
                item,
                total,
                outcome,
            } => match outcome.status {
                LinkStatus::Linked => write!(
                    f,
                    "[{item}/{total}] linked {} -> {}",
                    outcome.source_path.display(),
                    outcome.detail
                ),
                status => write!(
                    f,
                    "[{item}/{total}] {} {}: {}",
                    status.as_str(),
                    outcome.source_path.display(),
                    outcome.detail
                ),
            },
            LinkEvent::Summary(summary) => write!(
                f,
                "done: {} linked, {} skipped, {} failed",
                summary.linked, summary.skipped, summary.failed
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_progress_lines() {
        let linked = LinkEvent::Outcome {
            item: 1,
            total: 2,
            outcome: LinkOutcome::linked(PathBuf::from("/src/a.txt"), std::path::Path::new("/dst/a.txt")),
        };
        assert_eq!(linked.to_string(), "[1/2] linked /src/a.txt -> /dst/a.txt");

        let skipped = LinkEvent::Outcome {
            item: 2,
            total: 2,
            outcome: LinkOutcome::skipped(PathBuf::from("/src/b.txt"), "already exists"),
        };
        assert_eq!(skipped.to_string(), "[2/2] skipped /src/b.txt: already exists");

        let summary = LinkEvent::Summary(LinkSummary {
            linked: 1,
            skipped: 1,
            failed: 0,
        });
        assert_eq!(summary.to_string(), "done: 1 linked, 1 skipped, 0 failed");
    }

    #[test]
    fn parses_request_payload() {
        let request: LinkRequest = serde_json::from_str(
            r#"{"link": true, "src_files": ["/tmp/a.txt"], "dst_path": "/tmp/out"}"#,
        )
        .unwrap();
        assert!(request.link);
        assert_eq!(request.src_files, vec!["/tmp/a.txt".to_string()]);
        assert_eq!(request.dst_path, "/tmp/out");
    }
}
