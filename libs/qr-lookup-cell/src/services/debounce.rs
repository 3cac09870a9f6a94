use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::debug;

use shared_utils::Clock;

/// Suppresses an identical payload seen again within the window.
pub struct ScanDebouncer {
    window: Duration,
    clock: Arc<dyn Clock>,
    last: Option<(String, Instant)>,
}

impl ScanDebouncer {
    pub fn new(window: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            window,
            clock,
            last: None,
        }
    }

    /// True when `payload` should be processed, false for a duplicate.
    pub fn accept(&mut self, payload: &str) -> bool {
        let now = self.clock.now();

        if let Some((last, at)) = &self.last {
            let elapsed = now.saturating_duration_since(*at);
            if last == payload && elapsed < self.window {
                debug!("Suppressed duplicate scan {} after {:?}", payload, elapsed);
                return false;
            }
        }

        self.last = Some((payload.to_string(), now));
        true
    }

    pub fn reset(&mut self) {
        self.last = None;
    }

    pub fn window(&self) -> Duration {
        self.window
    }
}
