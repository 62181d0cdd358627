//! The request handle and its cancellation slot.

use crate::coordinator::ImageResponseObserverCoordinator;
use crate::request::RequestId;
use crate::source::ImageSource;
use crate::telemetry::ImageTelemetry;
use std::sync::{Arc, Mutex};
use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

/// The cancellation capability installed by the fetch backend.
type CancelFn = Box<dyn FnOnce() + Send>;

/// Handle for one cancellable, observable image fetch.
///
/// Owns the [`ImageSource`] by value, shares an [`ImageTelemetry`]
/// record and an [`ImageResponseObserverCoordinator`], and holds a
/// single optional cancellation action installed by the fetch backend.
///
/// Dropping the handle is the sole cancellation trigger: whatever
/// action is installed at that moment is invoked exactly once,
/// synchronously, before the handle's memory is released. If the
/// backend never installed one (fetch already finished, or never
/// started), teardown is a no-op beyond normal resource release.
///
/// # Cancellation slot
///
/// The slot holds at most one action. Installing a new action replaces
/// the previous one without invoking it - last write wins, no
/// chaining. Install and teardown are serialized on a mutex, so a
/// backend installing mid-flight while the consumer drops the handle
/// never observes a half-written action.
pub struct ImageRequest {
    id: RequestId,
    source: ImageSource,
    telemetry: Arc<ImageTelemetry>,
    coordinator: Arc<ImageResponseObserverCoordinator>,
    cancel_slot: Mutex<Option<CancelFn>>,
}

impl ImageRequest {
    /// Creates a handle for a new fetch.
    ///
    /// The observer coordinator is created eagerly here, empty, and is
    /// never replaced for the life of the request, so consumers can
    /// attach observers before the backend reports anything. No
    /// cancellation action is installed yet.
    ///
    /// # Arguments
    ///
    /// * `source` - Where the image comes from
    /// * `telemetry` - Shared record owned jointly with the telemetry
    ///   subsystem; this crate only extends its lifetime
    pub fn new(source: ImageSource, telemetry: Arc<ImageTelemetry>) -> Self {
        let id = RequestId::new();
        debug!(request_id = %id, uri = source.uri(), kind = %source.kind(), "Image request created");
        Self {
            id,
            source,
            telemetry,
            coordinator: Arc::new(ImageResponseObserverCoordinator::new(id)),
            cancel_slot: Mutex::new(None),
        }
    }

    /// Get this request's process-unique ID.
    pub fn id(&self) -> RequestId {
        self.id
    }

    /// Installs the action invoked when the handle is dropped.
    ///
    /// Called by the fetch backend once it begins work. Replaces any
    /// previously installed action without invoking it; if the backend
    /// retries a fetch, only the most recent action is ever run. The
    /// action is fire-and-forget - it returns nothing and nothing is
    /// awaited.
    pub fn install_cancelation(&self, action: impl FnOnce() + Send + 'static) {
        let mut slot = match self.cancel_slot.lock() {
            Ok(slot) => slot,
            Err(poisoned) => poisoned.into_inner(),
        };
        let replaced = slot.replace(Box::new(action)).is_some();
        drop(slot);
        trace!(request_id = %self.id, replaced, "Cancellation action installed");
    }

    /// Installs a cancellation action that cancels `token` on drop.
    ///
    /// Convenience for backends built on [`CancellationToken`]: the
    /// token is cancelled when the handle is dropped, with the same
    /// last-write-wins slot semantics as [`install_cancelation`].
    ///
    /// [`install_cancelation`]: ImageRequest::install_cancelation
    pub fn install_cancelation_token(&self, token: CancellationToken) {
        self.install_cancelation(move || token.cancel());
    }

    /// Get the source this request fetches.
    pub fn source(&self) -> &ImageSource {
        &self.source
    }

    /// Get shared access to the telemetry record.
    ///
    /// Callers may keep the returned `Arc` past the handle's lifetime.
    pub fn telemetry(&self) -> Arc<ImageTelemetry> {
        Arc::clone(&self.telemetry)
    }

    /// Get the observer coordinator by reference.
    ///
    /// Valid for the handle's whole lifetime; used by consumers to
    /// attach and detach observers.
    pub fn coordinator(&self) -> &ImageResponseObserverCoordinator {
        &self.coordinator
    }

    /// Get shared ownership of the observer coordinator.
    ///
    /// The fetch backend retains this so an in-flight notification can
    /// still resolve safely after the handle is dropped. No new
    /// cancellation can occur once the handle is gone.
    pub fn shared_coordinator(&self) -> Arc<ImageResponseObserverCoordinator> {
        Arc::clone(&self.coordinator)
    }
}

impl Drop for ImageRequest {
    fn drop(&mut self) {
        // Take the action out of the slot so it runs at most once even
        // if teardown races with a concurrent install.
        let action = match self.cancel_slot.lock() {
            Ok(mut slot) => slot.take(),
            Err(poisoned) => poisoned.into_inner().take(),
        };
        if let Some(action) = action {
            debug!(request_id = %self.id, "Request dropped, invoking cancellation action");
            action();
        } else {
            trace!(request_id = %self.id, "Request dropped, no cancellation installed");
        }
    }
}

impl std::fmt::Debug for ImageRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageRequest")
            .field("id", &self.id)
            .field("source", &self.source)
            .field("observers", &self.coordinator.observer_count())
            .finish()
    }
}
