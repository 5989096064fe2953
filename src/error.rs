// SPDX-License-Identifier: GPL-3.0-only
use thiserror::Error;

/// Failure taxonomy for a synchronization session.
///
/// Storage errors are soft when reading the local cache at session start
/// (the cache degrades to empty) and hard everywhere else. Network and
/// parse errors always terminate the session before the manifest swap.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The local cache could not be read or written.
    #[error("cache storage unavailable ({context}): {source}")]
    StorageUnavailable {
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// A manifest or package transfer failed.
    #[error("network transfer failed for '{url}': {source}")]
    NetworkError {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The manifest document is not a valid package mapping.
    #[error("malformed manifest: {0}")]
    ParseError(String),

    /// A synchronization session is already in progress.
    #[error("a synchronization session is already running")]
    SessionBusy,
}

impl SyncError {
    pub fn storage(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::StorageUnavailable {
            context: context.into(),
            source,
        }
    }

    pub fn network(url: impl Into<String>, source: reqwest::Error) -> Self {
        Self::NetworkError {
            url: url.into(),
            source,
        }
    }
}
