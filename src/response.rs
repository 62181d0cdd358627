//! Event payloads delivered to observers.
//!
//! These are the three payload shapes the fetch backend pushes through
//! the observer coordinator: incremental progress, a terminal success
//! carrying the image bytes, and a terminal failure. This crate does
//! not interpret any of them - a failure here is a notification to fan
//! out, not an error of the coordination layer itself.

use bytes::Bytes;
use thiserror::Error;

/// Incremental progress for an in-flight fetch.
///
/// `total` is `None` when the backend does not know the final size
/// (e.g. chunked transfer without a Content-Length).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageProgress {
    /// Bytes received so far.
    pub loaded: u64,
    /// Expected total bytes, if known.
    pub total: Option<u64>,
}

impl ImageProgress {
    /// Creates a progress report.
    pub fn new(loaded: u64, total: Option<u64>) -> Self {
        Self { loaded, total }
    }

    /// Completion fraction in `[0.0, 1.0]`, if the total is known
    /// and non-zero.
    pub fn fraction(&self) -> Option<f64> {
        match self.total {
            Some(total) if total > 0 => Some((self.loaded as f64 / total as f64).min(1.0)),
            _ => None,
        }
    }
}

/// Terminal success payload: the fetched image bytes.
///
/// The bytes are whatever the backend produced (decoded bitmap or
/// still-encoded data, per its contract with the consumer); cloning is
/// cheap because `Bytes` is reference-counted.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageResponse {
    /// Fetched image data.
    pub data: Bytes,
}

impl ImageResponse {
    /// Creates a response from fetched bytes.
    pub fn new(data: Bytes) -> Self {
        Self { data }
    }

    /// Returns true if the response carries any data.
    pub fn has_data(&self) -> bool {
        !self.data.is_empty()
    }
}

/// Terminal failure payload reported by the fetch backend.
///
/// Categories mirror what backends actually report; consumers react
/// (e.g. render a broken-image placeholder), this crate only delivers.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ImageLoadError {
    /// The fetch was cancelled before completing.
    #[error("image fetch cancelled")]
    Cancelled,

    /// Network transfer failed.
    #[error("network error fetching {uri}: {message}")]
    Network { uri: String, message: String },

    /// Fetched bytes could not be decoded as an image.
    #[error("image decode failed: {0}")]
    Decode(String),

    /// Backend-specific failure that fits no other category.
    #[error("backend error: {0}")]
    Backend(String),
}
