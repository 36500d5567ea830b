//! Live position polling.
//!
//! A [`PositionSource`] is whatever can tell us where the user is right now.
//! [`PositionTracker`] polls one on a fixed interval in a background task and
//! publishes the latest sample on a `watch` channel. The tracker only ever
//! writes its own position value; it never touches the registry.
//!
//! ```rust,no_run
//! use std::time::Duration;
//! use waymark_core::{geo::Coordinates, position::{FixedPosition, PositionTracker}};
//!
//! # async fn example() -> waymark_core::Result<()> {
//! let here = Coordinates::new(37.0, -122.0)?;
//! let tracker = PositionTracker::spawn(FixedPosition::new(here), Duration::from_secs(10));
//!
//! let mut updates = tracker.subscribe();
//! updates.changed().await.ok();
//! assert_eq!(tracker.current(), Some(here));
//!
//! tracker.stop();
//! # Ok(())
//! # }
//! ```

use std::{
    path::{Path, PathBuf},
    sync::Arc,
    time::Duration,
};

use log::{debug, warn};
use tokio::{
    sync::watch,
    task::{self, JoinHandle},
    time::MissedTickBehavior,
};
use tokio_util::sync::CancellationToken;

use crate::{
    error::{Result, WaymarkError},
    geo::Coordinates,
};

/// Default polling interval.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(10);

/// Something that can report the device's current position.
///
/// A failed sample should be reported as
/// `WaymarkError::PositionUnavailable`; trackers treat it as non-fatal.
/// Implementations may block: [`PositionTracker`] samples on the blocking
/// thread pool.
pub trait PositionSource: Send + Sync + 'static {
    fn current_position(&self) -> Result<Coordinates>;
}

impl<S: PositionSource + ?Sized> PositionSource for Arc<S> {
    fn current_position(&self) -> Result<Coordinates> {
        (**self).current_position()
    }
}

/// A source that always reports the same coordinates.
#[derive(Debug, Clone, Copy)]
pub struct FixedPosition(Coordinates);

impl FixedPosition {
    pub fn new(coordinates: Coordinates) -> Self {
        Self(coordinates)
    }
}

impl PositionSource for FixedPosition {
    fn current_position(&self) -> Result<Coordinates> {
        Ok(self.0)
    }
}

/// Reads `lat,lng` from a text file on every sample.
///
/// Lets an external GPS daemon or script feed positions by rewriting the
/// file. Blank lines and `#` comments are ignored; the first remaining line
/// is the position.
#[derive(Debug, Clone)]
pub struct PositionFile {
    path: PathBuf,
}

impl PositionFile {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

impl PositionSource for PositionFile {
    fn current_position(&self) -> Result<Coordinates> {
        let contents = std::fs::read_to_string(&self.path).map_err(|e| {
            WaymarkError::PositionUnavailable {
                reason: format!("cannot read {}: {e}", self.path.display()),
            }
        })?;

        let line = contents
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty() && !line.starts_with('#'))
            .ok_or_else(|| WaymarkError::PositionUnavailable {
                reason: format!("{} holds no position", self.path.display()),
            })?;

        line.parse::<Coordinates>()
            .map_err(|e| WaymarkError::PositionUnavailable {
                reason: format!("{}: {e}", self.path.display()),
            })
    }
}

/// Background poller producing a stream of position samples.
///
/// Dropping the tracker cancels the polling task.
#[derive(Debug)]
pub struct PositionTracker {
    receiver: watch::Receiver<Option<Coordinates>>,
    cancellation: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl PositionTracker {
    /// Starts polling `source` every `interval`, beginning immediately.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn<S: PositionSource>(source: S, interval: Duration) -> Self {
        let source = Arc::new(source);
        let (sender, receiver) = watch::channel(None);
        let cancellation = CancellationToken::new();
        let token = cancellation.clone();

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                tokio::select! {
                    _ = token.cancelled() => {
                        debug!("Position tracker stopped");
                        break;
                    }
                    _ = ticker.tick() => {
                        let sampler = Arc::clone(&source);
                        match task::spawn_blocking(move || sampler.current_position()).await {
                            Ok(Ok(position)) => {
                                sender.send_replace(Some(position));
                            }
                            Ok(Err(e)) => warn!("Position sample failed, keeping last known position: {e}"),
                            Err(e) => warn!("Position sample task failed: {e}"),
                        }
                    }
                }
            }
        });

        Self {
            receiver,
            cancellation,
            handle: Some(handle),
        }
    }

    /// The latest sample, or `None` until the first one succeeds.
    pub fn current(&self) -> Option<Coordinates> {
        *self.receiver.borrow()
    }

    /// A receiver notified on every new sample.
    pub fn subscribe(&self) -> watch::Receiver<Option<Coordinates>> {
        self.receiver.clone()
    }

    /// A token that stops the tracker when cancelled.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancellation.clone()
    }

    /// Stops polling. The last sample stays readable through receivers
    /// obtained earlier.
    pub fn stop(self) {
        self.cancellation.cancel();
    }

    /// Stops polling and waits for the background task to finish.
    pub async fn shutdown(mut self) {
        self.cancellation.cancel();
        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                warn!("Position tracker task failed: {e}");
            }
        }
    }
}

impl Drop for PositionTracker {
    fn drop(&mut self) {
        self.cancellation.cancel();
    }
}
