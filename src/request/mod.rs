//! Image request handles.
//!
//! An [`ImageRequest`] represents one cancellable, observable image
//! fetch. The handle is held by the consumer that initiated the fetch
//! (typically a view in the rendering tree); the fetch backend holds a
//! shared reference to the handle's observer coordinator so it can
//! keep reporting even after the handle is dropped.
//!
//! # Lifecycle
//!
//! ```text
//! Consumer ── ImageRequest::new(source, telemetry) ──► handle
//!                 │
//!                 │ shared_coordinator()
//!                 ▼
//!            Fetch backend ── install_cancelation(action)
//!                 │
//!                 │ notify_progress / notify_success / notify_failure
//!                 ▼
//!            Attached observers
//!
//! Consumer drops handle ──► installed action invoked exactly once
//! ```
//!
//! Cancellation is tied to handle teardown and nothing else: there is
//! no explicit cancel method. A consumer that no longer wants the
//! image (view unmounted, scrolled off-screen) simply drops the
//! handle.

mod handle;
mod id;

pub use handle::ImageRequest;
pub use id::RequestId;
