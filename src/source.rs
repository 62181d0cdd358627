//! Image source descriptors.
//!
//! Provides the `ImageSource` type that describes where an image comes
//! from and how large it is expected to render. Sources are immutable
//! after construction; the request handle owns one by value and only
//! ever hands out read access.

use serde::{Deserialize, Serialize};

/// Kind of location an image is fetched from.
///
/// The rendering tree distinguishes remote URLs (network fetch) from
/// local resources (bundled assets, file paths). `Invalid` marks a
/// source the props layer could not resolve; the backend is expected
/// to fail such a fetch immediately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SourceKind {
    /// Source could not be resolved from component props.
    Invalid,
    /// Fetched over the network.
    #[default]
    Remote,
    /// Resolved from a local bundle or file path.
    Local,
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SourceKind::Invalid => write!(f, "invalid"),
            SourceKind::Remote => write!(f, "remote"),
            SourceKind::Local => write!(f, "local"),
        }
    }
}

/// Expected render dimensions for an image, in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImageSize {
    /// Width in logical pixels.
    pub width: f64,
    /// Height in logical pixels.
    pub height: f64,
}

impl ImageSize {
    /// Creates a new size hint.
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Immutable description of where an image comes from.
///
/// Carries the locator plus the sizing hints the backend may use to
/// pick a resolution variant. Never mutated after construction.
///
/// # Example
///
/// ```
/// use imageflight::source::{ImageSource, ImageSize, SourceKind};
///
/// let source = ImageSource::remote("https://example.com/logo.png")
///     .with_size(ImageSize::new(128.0, 128.0))
///     .with_scale(2.0);
///
/// assert_eq!(source.kind(), SourceKind::Remote);
/// assert_eq!(source.scale(), 2.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageSource {
    kind: SourceKind,
    uri: String,
    size: Option<ImageSize>,
    scale: f64,
}

impl ImageSource {
    /// Creates a source fetched over the network.
    pub fn remote(uri: impl Into<String>) -> Self {
        Self {
            kind: SourceKind::Remote,
            uri: uri.into(),
            size: None,
            scale: 1.0,
        }
    }

    /// Creates a source resolved from a local bundle or path.
    pub fn local(uri: impl Into<String>) -> Self {
        Self {
            kind: SourceKind::Local,
            uri: uri.into(),
            size: None,
            scale: 1.0,
        }
    }

    /// Creates an invalid source.
    ///
    /// Used by the props layer when a source cannot be resolved; a
    /// fetch of an invalid source fails immediately in the backend.
    pub fn invalid() -> Self {
        Self {
            kind: SourceKind::Invalid,
            uri: String::new(),
            size: None,
            scale: 1.0,
        }
    }

    /// Sets the expected render dimensions.
    pub fn with_size(mut self, size: ImageSize) -> Self {
        self.size = Some(size);
        self
    }

    /// Sets the display scale factor (e.g. 2.0 for @2x assets).
    pub fn with_scale(mut self, scale: f64) -> Self {
        self.scale = scale;
        self
    }

    /// Get the source kind.
    pub fn kind(&self) -> SourceKind {
        self.kind
    }

    /// Get the locator (URL or local path).
    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Get the expected render dimensions, if known.
    pub fn size(&self) -> Option<ImageSize> {
        self.size
    }

    /// Get the display scale factor.
    pub fn scale(&self) -> f64 {
        self.scale
    }
}
