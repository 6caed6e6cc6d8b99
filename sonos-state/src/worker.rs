//! Background polling thread

use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Signal {
    /// Run a cycle now instead of waiting out the interval
    Refresh,
    Shutdown,
}

/// Runs a cycle, waits `interval` (or for a refresh request), repeats.
///
/// Dropping the worker stops the thread and waits for an in-flight cycle to
/// finish.
pub(crate) struct Worker {
    tx: mpsc::Sender<Signal>,
    handle: Option<JoinHandle<()>>,
}

impl Worker {
    pub(crate) fn spawn<F>(interval: Duration, mut run_cycle: F) -> std::io::Result<Self>
    where
        F: FnMut() + Send + 'static,
    {
        let (tx, rx) = mpsc::channel();

        let handle = thread::Builder::new()
            .name("sonos-coordinator".to_string())
            .spawn(move || {
                info!(interval_secs = interval.as_secs(), "polling worker started");
                loop {
                    run_cycle();

                    match rx.recv_timeout(interval) {
                        Ok(Signal::Refresh) => {
                            // collapse a burst of requests into one cycle
                            if rx.try_iter().any(|signal| signal == Signal::Shutdown) {
                                break;
                            }
                            debug!("refresh requested");
                        }
                        Err(RecvTimeoutError::Timeout) => {}
                        Ok(Signal::Shutdown) | Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
                info!("polling worker stopped");
            })?;

        Ok(Self {
            tx,
            handle: Some(handle),
        })
    }

    /// Wake the worker early; false if it has already exited
    pub(crate) fn request_refresh(&self) -> bool {
        self.tx.send(Signal::Refresh).is_ok()
    }
}

impl Drop for Worker {
    fn drop(&mut self) {
        let _ = self.tx.send(Signal::Shutdown);
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("polling worker panicked");
            }
        }
    }
}
