//! Shared bot process state
//!
//! Written by the poll loop, read by the health server. All mutable fields
//! sit behind one mutex that is only held for the duration of a field
//! access, never across network I/O.

use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};
use chrono::{DateTime, Utc};
use serde::Serialize;

#[derive(Debug, Default)]
struct Inner {
    last_update_id: Option<i64>,
    running: bool,
    poller_started: bool,
}

#[derive(Debug)]
pub struct BotState {
    started: Instant,
    started_at: DateTime<Utc>,
    inner: Mutex<Inner>,
}

/// Point-in-time view served on `/health`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusSnapshot {
    pub ok: bool,
    pub last_update_id: Option<i64>,
    pub uptime_sec: f64,
    pub started_at: DateTime<Utc>,
}

impl BotState {
    pub fn new() -> Self {
        Self {
            started: Instant::now(),
            started_at: Utc::now(),
            inner: Mutex::new(Inner {
                running: true,
                ..Inner::default()
            }),
        }
    }

    // The guarded data is plain values, so a poisoned lock is still usable.
    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn last_update_id(&self) -> Option<i64> {
        self.lock().last_update_id
    }

    /// Offset for the next fetch: one past the last processed update
    pub fn next_offset(&self) -> Option<i64> {
        self.lock().last_update_id.map(|id| id + 1)
    }

    /// Record `update_id` as processed. Never moves the offset backwards.
    pub fn advance_offset(&self, update_id: i64) {
        let mut inner = self.lock();
        if inner.last_update_id.map_or(true, |last| update_id > last) {
            inner.last_update_id = Some(update_id);
        }
    }

    pub fn is_running(&self) -> bool {
        self.lock().running
    }

    /// Ask the poll loop to exit after its current cycle
    pub fn stop(&self) {
        self.lock().running = false;
    }

    /// Returns `true` exactly once per state; later callers get `false`.
    pub fn claim_poller(&self) -> bool {
        let mut inner = self.lock();
        if inner.poller_started {
            return false;
        }
        inner.poller_started = true;
        true
    }

    pub fn uptime(&self) -> Duration {
        self.started.elapsed()
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn status(&self) -> StatusSnapshot {
        let last_update_id = self.last_update_id();
        let uptime_sec = (self.uptime().as_secs_f64() * 100.0).round() / 100.0;
        StatusSnapshot {
            ok: true,
            last_update_id,
            uptime_sec,
            started_at: self.started_at,
        }
    }
}

impl Default for BotState {
    fn default() -> Self {
        Self::new()
    }
}
