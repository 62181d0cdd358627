//! Observer fan-out for image responses.
//!
//! The coordinator decouples the fetch backend's reporting point from
//! however many consumers are watching one request. The backend calls
//! the `notify_*` methods without knowing who is listening; consumers
//! attach and detach observers without the backend's involvement.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   notify_progress /
//! │ Fetch backend│   notify_success / notify_failure
//! └──────┬───────┘
//!        │
//!        ▼
//! ┌─────────────────────────────────────┐
//! │  ImageResponseObserverCoordinator   │
//! │  ordered observer list, one mutex   │
//! └──────┬──────────────┬───────────────┘
//!        │              │
//!        ▼              ▼
//! ┌────────────┐  ┌────────────┐
//! │ Observer 1 │  │ Observer 2 │   (placeholder renderer,
//! └────────────┘  └────────────┘    cache warmer, ...)
//! ```
//!
//! # Delivery contract
//!
//! - Observers receive events in attachment order, synchronously on
//!   whichever thread the backend calls from. Observers needing a
//!   specific thread must redispatch themselves.
//! - An observer attached after an event fired does not see that past
//!   event; there is no replay.
//! - An observer detached while an event is mid-delivery to others
//!   does not receive that event.
//! - Exactly one terminal event (success or failure) per request is a
//!   backend contract; the coordinator does not enforce it.

mod hub;

pub use hub::ImageResponseObserverCoordinator;

use crate::response::{ImageLoadError, ImageProgress, ImageResponse};
use std::sync::atomic::{AtomicU64, Ordering};

/// Capability interested in one request's progress and outcome.
///
/// Callbacks run synchronously on the backend's thread and must not
/// block it; heavy reactions belong on the consumer's own executor.
/// Implementations may attach or detach observers from inside a
/// callback - no coordinator lock is held while callbacks run.
pub trait ImageResponseObserver: Send + Sync {
    /// Called for each progress report from the backend.
    fn on_progress(&self, progress: &ImageProgress);

    /// Called when the fetch completes successfully.
    fn on_response(&self, response: &ImageResponse);

    /// Called when the fetch fails.
    fn on_failure(&self, error: &ImageLoadError);
}

/// Global counter for observer tokens.
static OBSERVER_TOKEN_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Opaque token identifying one attached observer.
///
/// Returned by [`ImageResponseObserverCoordinator::attach`] and passed
/// back to [`ImageResponseObserverCoordinator::detach`]. Tokens are
/// unique within a process lifetime, so a stale token can never detach
/// somebody else's observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverToken(u64);

impl ObserverToken {
    pub(crate) fn next() -> Self {
        Self(OBSERVER_TOKEN_COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

impl std::fmt::Display for ObserverToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "obs-{}", self.0)
    }
}
