//! The fan-out hub itself.

use super::{ImageResponseObserver, ObserverToken};
use crate::request::RequestId;
use crate::response::{ImageLoadError, ImageProgress, ImageResponse};
use std::sync::{Arc, Mutex};
use tracing::{debug, trace};

/// Fan-out hub for one image request's events.
///
/// Holds the ordered set of currently attached observers behind a
/// mutex. Created eagerly by [`ImageRequest::new`] and shared between
/// the handle, the fetch backend, and any observer that keeps a
/// reference; its lifetime is the union of all holders.
///
/// # Locking
///
/// Attach, detach, and delivery serialize on one mutex, but the lock
/// is never held while an observer callback runs. Delivery snapshots
/// the list, then re-confirms each observer is still attached just
/// before invoking it, so a detach racing with delivery wins and a
/// callback can safely call back into the coordinator.
///
/// [`ImageRequest::new`]: crate::request::ImageRequest::new
pub struct ImageResponseObserverCoordinator {
    request_id: RequestId,
    observers: Mutex<Vec<(ObserverToken, Arc<dyn ImageResponseObserver>)>>,
}

impl ImageResponseObserverCoordinator {
    /// Creates an empty coordinator for the given request.
    pub(crate) fn new(request_id: RequestId) -> Self {
        Self {
            request_id,
            observers: Mutex::new(Vec::new()),
        }
    }

    /// Attaches an observer; returns the token used to detach it.
    ///
    /// The observer receives only events fired after this call.
    /// Consumers normally attach before the backend starts reporting,
    /// since the coordinator exists from request construction.
    pub fn attach(&self, observer: Arc<dyn ImageResponseObserver>) -> ObserverToken {
        let token = ObserverToken::next();
        let mut observers = self.lock_observers();
        observers.push((token, observer));
        debug!(
            request_id = %self.request_id,
            token = %token,
            attached = observers.len(),
            "Observer attached"
        );
        token
    }

    /// Detaches the observer registered under `token`.
    ///
    /// Once this returns, the observer receives no further events,
    /// including an event currently being delivered to other
    /// observers. Detaching an unknown or already-detached token is a
    /// no-op.
    pub fn detach(&self, token: ObserverToken) {
        let mut observers = self.lock_observers();
        let before = observers.len();
        observers.retain(|(t, _)| *t != token);
        let removed = observers.len() < before;
        drop(observers);
        debug!(
            request_id = %self.request_id,
            token = %token,
            removed,
            "Observer detach"
        );
    }

    /// Number of currently attached observers.
    pub fn observer_count(&self) -> usize {
        self.lock_observers().len()
    }

    /// Fans a progress report out to all attached observers.
    ///
    /// Called by the fetch backend; delivery is synchronous on the
    /// caller's thread, in attachment order.
    pub fn notify_progress(&self, progress: &ImageProgress) {
        trace!(
            request_id = %self.request_id,
            loaded = progress.loaded,
            total = ?progress.total,
            "Notifying progress"
        );
        self.deliver(|observer| observer.on_progress(progress));
    }

    /// Fans a terminal success out to all attached observers.
    pub fn notify_success(&self, response: &ImageResponse) {
        debug!(
            request_id = %self.request_id,
            size_bytes = response.data.len(),
            "Notifying success"
        );
        self.deliver(|observer| observer.on_response(response));
    }

    /// Fans a terminal failure out to all attached observers.
    pub fn notify_failure(&self, error: &ImageLoadError) {
        debug!(
            request_id = %self.request_id,
            error = %error,
            "Notifying failure"
        );
        self.deliver(|observer| observer.on_failure(error));
    }

    /// Delivers one event to every observer still attached.
    ///
    /// Snapshots the list under the lock, then walks the snapshot
    /// invoking `callback` outside the lock. Each observer's
    /// membership is re-checked under the lock immediately before its
    /// callback, so a concurrent detach suppresses delivery for this
    /// event without disturbing the remaining observers.
    fn deliver(&self, callback: impl Fn(&dyn ImageResponseObserver)) {
        let snapshot: Vec<(ObserverToken, Arc<dyn ImageResponseObserver>)> =
            self.lock_observers().clone();

        for (token, observer) in snapshot {
            let still_attached = self.lock_observers().iter().any(|(t, _)| *t == token);
            if still_attached {
                callback(observer.as_ref());
            } else {
                trace!(
                    request_id = %self.request_id,
                    token = %token,
                    "Observer detached mid-delivery, skipping"
                );
            }
        }
    }

    fn lock_observers(
        &self,
    ) -> std::sync::MutexGuard<'_, Vec<(ObserverToken, Arc<dyn ImageResponseObserver>)>> {
        match self.observers.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl std::fmt::Debug for ImageResponseObserverCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageResponseObserverCoordinator")
            .field("request_id", &self.request_id)
            .field("observers", &self.observer_count())
            .finish()
    }
}
