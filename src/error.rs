use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("GET {url} failed with status {status}")]
    Remote { url: String, status: u16 },

    #[error("GET {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("malformed response body from {url}: {source}")]
    MalformedBody {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("file or folder already exists: {} (clean the output directory before re-running)", .0.display())]
    OutputConflict(PathBuf),

    #[error(
        "attachment download is not supported; open attachments.html to see a list of attachments which can be manually downloaded"
    )]
    UnsupportedDownload,

    #[error("post creator {0} is not a member of the workspace")]
    UnknownAuthor(u64),

    #[error("encode {}: {source}", .path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl ExportError {
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}
