//! ImageFlight - lifecycle coordination for in-flight image fetches
//!
//! This library models a single outstanding request for a remotely- or
//! locally-sourced image inside a larger rendering pipeline. The fetch
//! itself (network, disk, decode) lives in an external backend; this
//! crate owns the part that is easy to get wrong: request identity,
//! cancellation tied to handle teardown, and fanning progress and
//! completion events out to however many consumers are watching.
//!
//! # High-Level API
//!
//! ```
//! use std::sync::Arc;
//! use imageflight::request::ImageRequest;
//! use imageflight::source::ImageSource;
//! use imageflight::telemetry::ImageTelemetry;
//!
//! let source = ImageSource::remote("https://example.com/hero.png");
//! let telemetry = Arc::new(ImageTelemetry::for_surface(42));
//!
//! let request = ImageRequest::new(source, telemetry);
//!
//! // The fetch backend keeps a shared coordinator so it can keep
//! // reporting even if the handle is dropped mid-delivery.
//! let coordinator = request.shared_coordinator();
//!
//! // Dropping the request invokes whatever cancellation action the
//! // backend installed, exactly once.
//! drop(request);
//! ```

pub mod coordinator;
pub mod request;
pub mod response;
pub mod source;
pub mod telemetry;

/// Version of the ImageFlight library.
///
/// Defined in `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
