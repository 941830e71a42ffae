// SPDX-FileCopyrightText: 2026 Puckwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the puckwatch game tracker.

use thiserror::Error;

/// The primary error type used across all puckwatch adapter traits and core
/// operations.
#[derive(Debug, Error)]
pub enum PuckwatchError {
    /// Configuration errors (invalid TOML, missing required fields, an
    /// unparseable execution window).
    #[error("configuration error: {0}")]
    Config(String),

    /// An upstream data source (play-by-play, stats, schedule) failed or
    /// returned a malformed response. Recovered locally: the iteration
    /// proceeds with partial data.
    #[error("upstream unavailable: {message}")]
    Upstream {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A requested stats column is absent from the snapshot. Recovered
    /// locally: the key is omitted from the data map.
    #[error("stats column missing: {column}")]
    ColumnMissing { column: String },

    /// A downstream notifier dispatch failed. Recovered locally (logged).
    #[error("notifier dispatch failed: {message}")]
    Notify {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// The broker delivered an undecodable payload. Surfaced terminally:
    /// invalid payloads are never retried.
    #[error("payload decode failed: {0}")]
    PayloadDecode(String),

    /// A broker producer call failed. Surfaced as retryable.
    #[error("enqueue failed: {message}")]
    Enqueue {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}
