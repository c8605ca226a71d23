//! Scan synchronizer
//!
//! The radio reports scan results through a callback that fires outside the
//! caller's control flow. [`ScanSynchronizer::scan`] turns that into a single
//! awaited call:
//!
//! 1. a session with a fresh generation token is installed in the single
//!    process-wide slot (a second caller gets `ScanInProgress`),
//! 2. the driver receives a callback that captures the token and a weak
//!    reference to the slot,
//! 3. the caller awaits a oneshot channel, bounded by the scan timeout,
//! 4. the callback fills the session only if the slot still holds the
//!    session with its token; otherwise it is a no-op.
//!
//! Timeout, cancellation of the awaiting future, and a failed scan request
//! all clear the slot through [`SessionGuard`], so a late callback can never
//! write into a session that is no longer awaited.

use std::{
    sync::{
        Arc, Mutex, MutexGuard, PoisonError, Weak,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use tokio::sync::oneshot;
use tracing::{debug, warn};

use crate::{
    core::{
        error::{DriverResultExt, ScanFailure, WlanError, WlanResult},
        types::{RadioMode, ScanRecord},
    },
    driver::{RadioDriver, ScanCallback, ScanOutcome},
};

/// Default upper bound for one scan
pub const DEFAULT_SCAN_TIMEOUT: Duration = Duration::from_secs(10);

/// The one in-flight scan
#[derive(Debug)]
struct ScanSession {
    token: u64,
    results: Vec<ScanRecord>,
}

type SessionSlot = Mutex<Option<ScanSession>>;

fn lock_slot(slot: &SessionSlot) -> MutexGuard<'_, Option<ScanSession>> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Remove the session from `slot` if it is still the one identified by `token`
fn take_session(slot: &SessionSlot, token: u64) -> Option<ScanSession> {
    let mut guard = lock_slot(slot);
    match guard.as_ref() {
        Some(session) if session.token == token => guard.take(),
        _ => None,
    }
}

/// Invalidates its session when dropped
///
/// After a successful completion the callback has already taken the session
/// and dropping the guard does nothing.
struct SessionGuard<'a> {
    slot: &'a SessionSlot,
    token: u64,
}

impl Drop for SessionGuard<'_> {
    fn drop(&mut self) {
        if take_session(self.slot, self.token).is_some() {
            debug!(token = self.token, "Scan session invalidated");
        }
    }
}

/// Build the driver callback for the session identified by `token`
fn completion(
    slot: Weak<SessionSlot>,
    token: u64,
    done: oneshot::Sender<ScanOutcome>,
) -> ScanCallback {
    Box::new(move |outcome: ScanOutcome| {
        let Some(slot) = slot.upgrade() else {
            debug!(token, "Scan completion after synchronizer shutdown ignored");
            return;
        };

        let Some(mut session) = take_session(&slot, token) else {
            debug!(token, "Stale scan completion ignored");
            return;
        };

        let outcome = outcome.map(|records| {
            session.results.extend(records);
            session.results
        });

        if done.send(outcome).is_err() {
            debug!(token, "Scan caller went away before completion");
        }
    })
}

/// Bridges the radio's scan callback into an awaited result
pub struct ScanSynchronizer<D: RadioDriver> {
    driver: Arc<D>,
    slot: Arc<SessionSlot>,
    next_token: AtomicU64,
    timeout: Duration,
}

impl<D: RadioDriver> ScanSynchronizer<D> {
    /// Create a synchronizer bounded by `timeout` per scan
    pub fn new(driver: Arc<D>, timeout: Duration) -> Self {
        Self {
            driver,
            slot: Arc::new(Mutex::new(None)),
            next_token: AtomicU64::new(1),
            timeout,
        }
    }

    /// Whether a scan is currently in flight
    pub fn is_scanning(&self) -> bool {
        lock_slot(&self.slot).is_some()
    }

    /// Scan for networks and wait for the radio to report
    ///
    /// An empty environment is a success with no records. Fails with
    /// `UnsupportedMode` if the radio runs as access point only and with
    /// `ScanInProgress` if another scan is in flight.
    pub async fn scan(&self) -> WlanResult<Vec<ScanRecord>> {
        let mode = self.driver.mode().await.context("cannot get radio mode")?;
        if mode == RadioMode::ACCESS_POINT {
            return Err(WlanError::UnsupportedMode);
        }

        let token = self.open_session()?;
        let guard = SessionGuard {
            slot: self.slot.as_ref(),
            token,
        };

        let (done_tx, done_rx) = oneshot::channel();
        let callback = completion(Arc::downgrade(&self.slot), token, done_tx);

        self.driver
            .request_scan(callback)
            .await
            .context("cannot start scan")?;
        debug!(token, "Scan requested");

        let outcome = tokio::time::timeout(self.timeout, done_rx).await;
        drop(guard);

        match outcome {
            Ok(Ok(Ok(records))) => {
                debug!(token, "Scan complete, found {} networks", records.len());
                Ok(records)
            }
            Ok(Ok(Err(e))) => {
                warn!(token, "Scan reported failure: {}", e);
                Err(WlanError::ScanFailed(ScanFailure::Driver(e)))
            }
            Ok(Err(_)) => {
                warn!(token, "Scan completion dropped by driver");
                Err(WlanError::ScanFailed(ScanFailure::Abandoned))
            }
            Err(_) => {
                warn!(token, timeout = ?self.timeout, "Scan timed out");
                Err(WlanError::ScanFailed(ScanFailure::Timeout))
            }
        }
    }

    /// Claim the slot for a new session
    fn open_session(&self) -> WlanResult<u64> {
        let mut slot = lock_slot(&self.slot);
        if slot.is_some() {
            return Err(WlanError::ScanInProgress);
        }

        let token = self.next_token.fetch_add(1, Ordering::Relaxed);
        *slot = Some(ScanSession {
            token,
            results: Vec::new(),
        });
        Ok(token)
    }
}
