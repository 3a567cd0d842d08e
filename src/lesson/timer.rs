use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Counts active seconds for a lesson.
///
/// Counting happens on a ticker thread that exists only while the timer is
/// active. Deactivating or dropping the timer drops the ticker, which closes
/// its stop channel and joins the thread, so at most one ticker is alive.
pub struct Timer {
    elapsed: Arc<AtomicU64>,
    interval: Duration,
    ticker: Option<Ticker>,
}

struct Ticker {
    stop: Option<mpsc::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl Ticker {
    fn spawn(elapsed: Arc<AtomicU64>, interval: Duration) -> Self {
        let (stop, rx) = mpsc::channel::<()>();
        let handle = thread::spawn(move || {
            loop {
                match rx.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => {
                        elapsed.fetch_add(1, Ordering::Relaxed);
                    }
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => return,
                }
            }
        });
        Self {
            stop: Some(stop),
            handle: Some(handle),
        }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        // Closing the channel wakes the thread immediately.
        drop(self.stop.take());
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Timer {
    pub fn new() -> Self {
        Self::with_interval(Duration::from_secs(1))
    }

    pub fn with_interval(interval: Duration) -> Self {
        Self {
            elapsed: Arc::new(AtomicU64::new(0)),
            interval,
            ticker: None,
        }
    }

    pub fn set_active(&mut self, active: bool) {
        match (active, self.ticker.is_some()) {
            (true, false) => {
                self.ticker = Some(Ticker::spawn(Arc::clone(&self.elapsed), self.interval));
            }
            (false, true) => self.ticker = None,
            _ => {}
        }
    }

    pub fn is_active(&self) -> bool {
        self.ticker.is_some()
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed.load(Ordering::Relaxed)
    }

    pub fn reset(&mut self) {
        self.elapsed.store(0, Ordering::Relaxed);
    }
}

impl Default for Timer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Timer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Timer")
            .field("elapsed", &self.elapsed_secs())
            .field("active", &self.is_active())
            .finish()
    }
}
