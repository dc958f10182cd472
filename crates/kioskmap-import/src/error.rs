use std::time::Duration;

use kioskmap_db::DbError;
use thiserror::Error;

/// Stage-level classification of an [`ImportError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportErrorKind {
    Fetch,
    Parse,
    Persist,
    Deadline,
}

impl std::fmt::Display for ImportErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImportErrorKind::Fetch => write!(f, "fetch"),
            ImportErrorKind::Parse => write!(f, "parse"),
            ImportErrorKind::Persist => write!(f, "persist"),
            ImportErrorKind::Deadline => write!(f, "deadline"),
        }
    }
}

/// A failed import run. Nothing from the run was committed.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("invalid data source URL \"{url}\": {reason}")]
    InvalidEndpoint { url: String, reason: String },

    /// The underlying `reqwest::Client` could not be constructed.
    #[error("HTTP client error: {0}")]
    Client(#[source] reqwest::Error),

    /// Network, TLS or timeout failure while fetching a page.
    #[error("HTTP error fetching page {page}: {source}")]
    Http {
        page: u32,
        #[source]
        source: reqwest::Error,
    },

    #[error("unexpected HTTP status {status} fetching page {page}: {body}")]
    UnexpectedStatus { page: u32, status: u16, body: String },

    #[error("empty response body for page {page}")]
    EmptyBody { page: u32 },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("malformed page {page}: {reason}")]
    Malformed { page: u32, reason: String },

    #[error("failed to persist {count} records: {source}")]
    Persist {
        count: usize,
        #[source]
        source: DbError,
    },

    #[error("import exceeded its deadline of {}s", deadline.as_secs())]
    DeadlineExceeded { deadline: Duration },
}

impl ImportError {
    #[must_use]
    pub fn kind(&self) -> ImportErrorKind {
        match self {
            ImportError::InvalidEndpoint { .. }
            | ImportError::Client(_)
            | ImportError::Http { .. }
            | ImportError::UnexpectedStatus { .. }
            | ImportError::EmptyBody { .. } => ImportErrorKind::Fetch,
            ImportError::Deserialize { .. } | ImportError::Malformed { .. } => {
                ImportErrorKind::Parse
            }
            ImportError::Persist { .. } => ImportErrorKind::Persist,
            ImportError::DeadlineExceeded { .. } => ImportErrorKind::Deadline,
        }
    }
}
