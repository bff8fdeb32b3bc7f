use crate::constants::{SLEEP_LIMIT, SLEEP_THRESHOLD, WATCHDOG_INTERVAL};
use log::{debug, error, trace, warn};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Instant;
use tokio::task::AbortHandle;

struct Worker {
    last_active: Instant,
    abort: Option<AbortHandle>,
}

#[derive(Default)]
struct Inner {
    active: HashMap<u64, Worker>,
    sleeping: HashMap<u64, Worker>,
    running: usize,
}

/// Tracks every connection worker with its last-observed-active
/// timestamp. Workers idle past the sleep threshold are reclassified as
/// sleeping; sleeping workers past the dead-lock limit drop out of
/// tracking and are optionally aborted. Terminated workers are
/// garbage-collected on observation.
pub struct SessionRegistry {
    inner: Mutex<Inner>,
    next_id: AtomicU64,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
            next_id: AtomicU64::new(1),
        }
    }

    /// Registers a new worker and returns its id.
    pub fn begin(&self) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let mut inner = self.inner.lock().unwrap();
        inner.active.insert(
            id,
            Worker {
                last_active: Instant::now(),
                abort: None,
            },
        );
        inner.running += 1;
        id
    }

    /// Hands the registry the means to interrupt the worker.
    pub fn attach(&self, id: u64, abort: AbortHandle) {
        let mut inner = self.inner.lock().unwrap();
        if let Some(worker) = inner.active.get_mut(&id) {
            worker.abort = Some(abort);
        } else if let Some(worker) = inner.sleeping.get_mut(&id) {
            worker.abort = Some(abort);
        }
    }

    /// Marks the worker as active now; a sleeping worker wakes up.
    pub fn touch(&self, id: u64) {
        let mut inner = self.inner.lock().unwrap();
        if let Some(mut worker) = inner.sleeping.remove(&id) {
            worker.last_active = Instant::now();
            inner.active.insert(id, worker);
        } else if let Some(worker) = inner.active.get_mut(&id) {
            worker.last_active = Instant::now();
        }
    }

    /// A worker has terminated on its own.
    pub fn end(&self, id: u64) {
        let mut inner = self.inner.lock().unwrap();
        inner.active.remove(&id);
        inner.sleeping.remove(&id);
        inner.running = inner.running.saturating_sub(1);
    }

    pub fn running(&self) -> usize {
        self.inner.lock().unwrap().running
    }

    /// True iff no sessions are counted as running; the host process may
    /// stop the server then.
    pub fn idle(&self) -> bool {
        let inner = self.inner.lock().unwrap();
        if inner.running == 0 {
            return true;
        }
        inner.active.is_empty()
    }

    /// One housekeeping pass over the tracked workers.
    pub fn sweep(&self, term_sleeping: bool) {
        let now = Instant::now();
        let mut inner = self.inner.lock().unwrap();

        // workers that already terminated are garbage-collected
        let finished: Vec<u64> = inner
            .active
            .iter()
            .chain(inner.sleeping.iter())
            .filter(|(_, w)| w.abort.as_ref().map_or(false, |h| h.is_finished()))
            .map(|(id, _)| *id)
            .collect();
        for id in finished {
            inner.active.remove(&id);
            inner.sleeping.remove(&id);
        }

        // active workers idle past the threshold become sleeping
        let stale: Vec<u64> = inner
            .active
            .iter()
            .filter(|(_, w)| now.duration_since(w.last_active) > SLEEP_THRESHOLD)
            .map(|(id, _)| *id)
            .collect();
        for id in stale {
            if let Some(worker) = inner.active.remove(&id) {
                debug!("session {} is sleeping", id);
                inner.sleeping.insert(id, worker);
            }
        }

        // sleeping workers past the dead-lock limit leave the tracking
        let dead: Vec<u64> = inner
            .sleeping
            .iter()
            .filter(|(_, w)| now.duration_since(w.last_active) > SLEEP_LIMIT)
            .map(|(id, _)| *id)
            .collect();
        for id in dead {
            if let Some(worker) = inner.sleeping.remove(&id) {
                if term_sleeping {
                    warn!("aborting dead-locked session {}", id);
                    if let Some(abort) = worker.abort {
                        abort.abort();
                    }
                    inner.running = inner.running.saturating_sub(1);
                } else {
                    warn!("session {} exceeded the dead-lock limit", id);
                }
            }
        }

        if inner.running == 0 && !inner.active.is_empty() {
            error!(
                "idle-test: active session estimation wrong ({})",
                inner.active.len()
            );
        }
    }

    #[cfg(test)]
    fn backdate(&self, id: u64, age: std::time::Duration) {
        let mut inner = self.inner.lock().unwrap();
        if let Some(worker) = inner.active.get_mut(&id) {
            worker.last_active = Instant::now() - age;
        } else if let Some(worker) = inner.sleeping.get_mut(&id) {
            worker.last_active = Instant::now() - age;
        }
    }

    #[cfg(test)]
    fn is_sleeping(&self, id: u64) -> bool {
        self.inner.lock().unwrap().sleeping.contains_key(&id)
    }

    #[cfg(test)]
    fn is_tracked(&self, id: u64) -> bool {
        let inner = self.inner.lock().unwrap();
        inner.active.contains_key(&id) || inner.sleeping.contains_key(&id)
    }
}

/// Periodic sweep over the session registry.
pub fn start_watchdog(registry: Arc<SessionRegistry>, term_sleeping: bool) {
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(WATCHDOG_INTERVAL).await;
            registry.sweep(term_sleeping);
            trace!(
                "watchdog: {} sessions running, idle={}",
                registry.running(),
                registry.idle()
            );
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn counting_and_idle() {
        let registry = SessionRegistry::new();
        assert!(registry.idle());
        let a = registry.begin();
        let b = registry.begin();
        assert_eq!(registry.running(), 2);
        assert!(!registry.idle());
        registry.end(a);
        registry.end(b);
        assert_eq!(registry.running(), 0);
        assert!(registry.idle());
    }

    #[test]
    fn sweep_reclassifies_stale_workers() {
        let registry = SessionRegistry::new();
        let id = registry.begin();
        registry.sweep(false);
        assert!(!registry.is_sleeping(id));

        registry.backdate(id, Duration::from_secs(60));
        registry.sweep(false);
        assert!(registry.is_sleeping(id));

        // touching wakes the worker up again
        registry.touch(id);
        assert!(!registry.is_sleeping(id));

        // past the dead-lock limit the worker leaves the tracking
        registry.backdate(id, Duration::from_secs(60));
        registry.sweep(false);
        registry.backdate(id, Duration::from_secs(7200));
        registry.sweep(false);
        assert!(!registry.is_tracked(id));
        // without the term flag it still counts as running
        assert_eq!(registry.running(), 1);
    }
}
