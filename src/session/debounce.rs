//! Debounce scheduling and supersession tracking.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Serializes bursts of input into at most one live fetch task.
///
/// Every trigger bumps the generation and spawns a replacement task. The
/// generation check at apply time is the correctness mechanism; aborting the
/// superseded task merely frees its resources early.
pub(crate) struct Debouncer {
    delay: Duration,
    generation: AtomicU64,
    current: Mutex<Option<JoinHandle<()>>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            generation: AtomicU64::new(0),
            current: Mutex::new(None),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Invalidate all outstanding work and return the new generation.
    pub fn bump(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    pub fn current(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Whether work tagged with this generation is still authoritative.
    pub fn is_current(&self, generation: u64) -> bool {
        self.current() == generation
    }

    /// Track a newly spawned task, aborting its predecessor.
    pub fn install(&self, handle: JoinHandle<()>) {
        let mut current = self.current.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(previous) = current.replace(handle) {
            previous.abort();
        }
    }

    /// Invalidate and abort any outstanding work.
    pub fn cancel(&self) {
        self.bump();
        let handle = self
            .current
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take();
        if let Some(handle) = handle {
            handle.abort();
        }
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        if let Ok(current) = self.current.get_mut() {
            if let Some(handle) = current.take() {
                handle.abort();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicBool;
    use std::sync::Arc;

    #[test]
    fn test_bump_invalidates_previous_generation() {
        let debouncer = Debouncer::new(Duration::from_millis(300));

        let first = debouncer.bump();
        assert!(debouncer.is_current(first));

        let second = debouncer.bump();
        assert!(!debouncer.is_current(first));
        assert!(debouncer.is_current(second));
    }

    #[tokio::test(start_paused = true)]
    async fn test_installed_task_fires_after_delay() {
        let debouncer = Debouncer::new(Duration::from_millis(300));
        let fired = Arc::new(AtomicBool::new(false));

        let flag = fired.clone();
        debouncer.install(tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(300)).await;
            flag.store(true, Ordering::SeqCst);
        }));

        // The task's first poll registers its sleep; the clock must not move
        // before that happens.
        tokio::task::yield_now().await;
        tokio::time::advance(Duration::from_millis(300)).await;
        tokio::task::yield_now().await;

        assert!(fired.load(Ordering::SeqCst));
    }

    #[tokio::test(start_paused = true)]
    async fn test_install_aborts_predecessor() {
        let debouncer = Debouncer::new(Duration::from_millis(300));
        let fired = Arc::new(AtomicBool::new(false));

        let flag = fired.clone();
        debouncer.install(tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(300)).await;
            flag.store(true, Ordering::SeqCst);
        }));
        debouncer.install(tokio::spawn(async {}));

        tokio::time::advance(Duration::from_millis(400)).await;
        tokio::task::yield_now().await;

        assert!(!fired.load(Ordering::SeqCst));
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_aborts_and_invalidates() {
        let debouncer = Debouncer::new(Duration::from_millis(300));
        let generation = debouncer.bump();

        let fired = Arc::new(AtomicBool::new(false));
        let flag = fired.clone();
        debouncer.install(tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(300)).await;
            flag.store(true, Ordering::SeqCst);
        }));

        debouncer.cancel();
        assert!(!debouncer.is_current(generation));

        tokio::time::advance(Duration::from_millis(400)).await;
        tokio::task::yield_now().await;
        assert!(!fired.load(Ordering::SeqCst));
    }
}
