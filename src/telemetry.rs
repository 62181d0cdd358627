//! Fetch telemetry records.
//!
//! An `ImageTelemetry` record is created by the telemetry subsystem
//! when a fetch is initiated and shared with the request handle via
//! `Arc`. This crate never writes to it; it only extends the record's
//! lifetime so whoever reports fetch timing can still read it after
//! the handle is gone.

use std::time::Instant;

/// Shared, read-only record of one fetch's identity and timing.
///
/// Shared ownership between the request handle and the telemetry
/// subsystem; the record lives as long as the longest holder.
#[derive(Debug, Clone)]
pub struct ImageTelemetry {
    /// Surface (render tree root) the request originated from.
    surface_id: i32,
    /// When the fetch was requested.
    requested_at: Instant,
}

impl ImageTelemetry {
    /// Creates a record for a request originating from the given surface.
    ///
    /// Stamps the current instant as the request time.
    pub fn for_surface(surface_id: i32) -> Self {
        Self {
            surface_id,
            requested_at: Instant::now(),
        }
    }

    /// Get the originating surface id.
    pub fn surface_id(&self) -> i32 {
        self.surface_id
    }

    /// Get the instant the fetch was requested.
    pub fn requested_at(&self) -> Instant {
        self.requested_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_surface_id() {
        let telemetry = ImageTelemetry::for_surface(7);
        assert_eq!(telemetry.surface_id(), 7);
    }

    #[test]
    fn test_requested_at_is_in_the_past() {
        let telemetry = ImageTelemetry::for_surface(1);
        assert!(telemetry.requested_at() <= Instant::now());
    }

    #[test]
    fn test_shared_record_outlives_first_holder() {
        let telemetry = Arc::new(ImageTelemetry::for_surface(3));
        let second_holder = Arc::clone(&telemetry);
        drop(telemetry);

        // The second holder keeps the record alive and readable
        assert_eq!(second_holder.surface_id(), 3);
    }
}
