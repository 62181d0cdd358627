//! Integration tests for the image request lifecycle.
//!
//! These tests exercise the full contract across module boundaries:
//! - Construction, observer attach/detach, and event fan-out
//! - Cancellation-on-drop with a backend on its own execution context
//! - Attach/detach/notify races from multiple threads
//! - Coordinator and telemetry outliving the request handle

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use bytes::Bytes;
use imageflight::coordinator::ImageResponseObserver;
use imageflight::request::ImageRequest;
use imageflight::response::{ImageLoadError, ImageProgress, ImageResponse};
use imageflight::source::{ImageSize, ImageSource};
use imageflight::telemetry::ImageTelemetry;
use tokio_util::sync::CancellationToken;

// =============================================================================
// Test Helpers
// =============================================================================

/// Observer that appends a labelled line per event to a shared log.
struct LoggingObserver {
    label: &'static str,
    log: Arc<Mutex<Vec<String>>>,
}

impl LoggingObserver {
    fn new(label: &'static str, log: &Arc<Mutex<Vec<String>>>) -> Arc<Self> {
        Arc::new(Self {
            label,
            log: Arc::clone(log),
        })
    }
}

impl ImageResponseObserver for LoggingObserver {
    fn on_progress(&self, progress: &ImageProgress) {
        self.log
            .lock()
            .unwrap()
            .push(format!("{} progress {}", self.label, progress.loaded));
    }

    fn on_response(&self, response: &ImageResponse) {
        self.log
            .lock()
            .unwrap()
            .push(format!("{} success {}b", self.label, response.data.len()));
    }

    fn on_failure(&self, error: &ImageLoadError) {
        self.log
            .lock()
            .unwrap()
            .push(format!("{} failure {}", self.label, error));
    }
}

/// Observer that only counts events, for the concurrency tests.
struct CountingObserver {
    events: Arc<AtomicUsize>,
}

impl ImageResponseObserver for CountingObserver {
    fn on_progress(&self, _progress: &ImageProgress) {
        self.events.fetch_add(1, Ordering::SeqCst);
    }

    fn on_response(&self, _response: &ImageResponse) {
        self.events.fetch_add(1, Ordering::SeqCst);
    }

    fn on_failure(&self, _error: &ImageLoadError) {
        self.events.fetch_add(1, Ordering::SeqCst);
    }
}

fn test_request() -> ImageRequest {
    ImageRequest::new(
        ImageSource::remote("https://example.com/hero.png").with_size(ImageSize::new(64.0, 64.0)),
        Arc::new(ImageTelemetry::for_surface(1)),
    )
}

// =============================================================================
// Lifecycle
// =============================================================================

#[test]
fn test_full_fetch_sequence_reaches_all_observers_in_order() {
    let request = test_request();
    let log = Arc::new(Mutex::new(Vec::new()));

    request
        .coordinator()
        .attach(LoggingObserver::new("placeholder", &log));
    request
        .coordinator()
        .attach(LoggingObserver::new("cache-warmer", &log));

    // The backend reports through its shared reference, not the handle
    let coordinator = request.shared_coordinator();
    coordinator.notify_progress(&ImageProgress::new(50, Some(100)));
    coordinator.notify_success(&ImageResponse::new(Bytes::from_static(b"imagebytes")));

    assert_eq!(
        *log.lock().unwrap(),
        vec![
            "placeholder progress 50",
            "cache-warmer progress 50",
            "placeholder success 10b",
            "cache-warmer success 10b",
        ]
    );
}

#[test]
fn test_failure_sequence() {
    let request = test_request();
    let log = Arc::new(Mutex::new(Vec::new()));
    request
        .coordinator()
        .attach(LoggingObserver::new("view", &log));

    request.shared_coordinator().notify_failure(&ImageLoadError::Network {
        uri: "https://example.com/hero.png".into(),
        message: "timed out".into(),
    });

    let log = log.lock().unwrap();
    assert_eq!(log.len(), 1);
    assert!(log[0].starts_with("view failure"));
    assert!(log[0].contains("timed out"));
}

#[test]
fn test_coordinator_usable_after_handle_dropped() {
    let request = test_request();
    let log = Arc::new(Mutex::new(Vec::new()));
    request
        .coordinator()
        .attach(LoggingObserver::new("survivor", &log));

    let coordinator = request.shared_coordinator();
    drop(request);

    // An in-flight backend can still resolve safely
    coordinator.notify_success(&ImageResponse::new(Bytes::from_static(b"late")));
    assert_eq!(*log.lock().unwrap(), vec!["survivor success 4b"]);
}

#[test]
fn test_telemetry_identity_and_survival() {
    let telemetry = Arc::new(ImageTelemetry::for_surface(11));
    let source = ImageSource::local("assets/icon.png");
    let request = ImageRequest::new(source.clone(), Arc::clone(&telemetry));

    assert_eq!(request.source(), &source);
    assert!(Arc::ptr_eq(&telemetry, &request.telemetry()));

    let held = request.telemetry();
    drop(request);
    assert_eq!(held.surface_id(), 11);
}

// =============================================================================
// Cancellation
// =============================================================================

#[tokio::test]
async fn test_drop_cancels_backend_task() {
    let request = test_request();
    let token = CancellationToken::new();
    request.install_cancelation_token(token.clone());

    // Simulated backend: waits for cancellation on its own task
    let cancelled = Arc::new(AtomicUsize::new(0));
    let backend = tokio::spawn({
        let token = token.clone();
        let cancelled = Arc::clone(&cancelled);
        async move {
            token.cancelled().await;
            cancelled.fetch_add(1, Ordering::SeqCst);
        }
    });

    drop(request);
    tokio::time::timeout(Duration::from_secs(1), backend)
        .await
        .expect("backend should observe cancellation")
        .unwrap();
    assert_eq!(cancelled.load(Ordering::SeqCst), 1);
}

#[test]
fn test_retried_backend_replaces_cancelation() {
    let request = test_request();
    let first = CancellationToken::new();
    let second = CancellationToken::new();

    // First attempt installs, retry replaces
    request.install_cancelation_token(first.clone());
    request.install_cancelation_token(second.clone());

    drop(request);
    assert!(!first.is_cancelled());
    assert!(second.is_cancelled());
}

#[test]
fn test_completed_fetch_clears_nothing_extra() {
    // Backend never started, so nothing installed; drop is a no-op
    let request = test_request();
    drop(request);
}

// =============================================================================
// Concurrency
// =============================================================================

#[test]
fn test_concurrent_attach_detach_notify() {
    let request = Arc::new(test_request());
    let coordinator = request.shared_coordinator();
    let events = Arc::new(AtomicUsize::new(0));

    let notifier = {
        let coordinator = Arc::clone(&coordinator);
        std::thread::spawn(move || {
            for loaded in 0..500 {
                coordinator.notify_progress(&ImageProgress::new(loaded, Some(500)));
            }
        })
    };

    let churner = {
        let coordinator = Arc::clone(&coordinator);
        let events = Arc::clone(&events);
        std::thread::spawn(move || {
            for _ in 0..200 {
                let token = coordinator.attach(Arc::new(CountingObserver {
                    events: Arc::clone(&events),
                }));
                coordinator.detach(token);
            }
        })
    };

    notifier.join().unwrap();
    churner.join().unwrap();

    // Everything detached; a final notification reaches nobody
    assert_eq!(coordinator.observer_count(), 0);
    let before = events.load(Ordering::SeqCst);
    coordinator.notify_progress(&ImageProgress::new(500, Some(500)));
    assert_eq!(events.load(Ordering::SeqCst), before);
}

#[test]
fn test_notify_from_backend_thread_is_synchronous() {
    let request = test_request();
    let log = Arc::new(Mutex::new(Vec::new()));
    request
        .coordinator()
        .attach(LoggingObserver::new("view", &log));

    let coordinator = request.shared_coordinator();
    let backend = std::thread::spawn(move || {
        coordinator.notify_progress(&ImageProgress::new(10, None));
        // Delivery is synchronous: by the time notify returns on this
        // thread, the observer has run
    });
    backend.join().unwrap();

    assert_eq!(*log.lock().unwrap(), vec!["view progress 10"]);
}

#[test]
fn test_install_races_with_drop_invokes_exactly_once() {
    for _ in 0..50 {
        let request = Arc::new(test_request());
        let calls = Arc::new(AtomicUsize::new(0));

        {
            let calls = Arc::clone(&calls);
            request.install_cancelation(move || {
                calls.fetch_add(1, Ordering::SeqCst);
            });
        }

        let installer = {
            let request = Arc::clone(&request);
            let calls = Arc::clone(&calls);
            std::thread::spawn(move || {
                let calls = Arc::clone(&calls);
                request.install_cancelation(move || {
                    calls.fetch_add(1, Ordering::SeqCst);
                });
            })
        };

        installer.join().unwrap();
        drop(request);

        // Whichever action survived the race, it ran exactly once
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
