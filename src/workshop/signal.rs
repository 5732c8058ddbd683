//! # Counting signal.
//!
//! [`Signal`] is a counting semaphore used purely for rendezvous: `release(n)`
//! adds exactly `n` tokens, each [`Signal::wait`] consumes exactly one. There is
//! no broadcast wakeup; releasing 3 lets exactly 3 waiters through, whatever
//! the number of waiters.
//!
//! Backed by [`tokio::sync::Semaphore`], whose waiters are served in FIFO order.
//! Permits taken by `wait` are forgotten rather than returned on drop, so
//! tokens only ever come from `release`.

use tokio::sync::Semaphore;

use crate::error::SignalClosed;

/// Counting rendezvous signal with exact release counts.
#[derive(Debug)]
pub struct Signal {
    name: &'static str,
    sem: Semaphore,
}

impl Signal {
    /// Creates a signal holding `initial` tokens.
    pub fn new(name: &'static str, initial: usize) -> Self {
        Self {
            name,
            sem: Semaphore::new(initial),
        }
    }

    /// Adds `n` tokens, waking up to `n` waiters.
    #[inline]
    pub fn release(&self, n: usize) {
        if n > 0 {
            self.sem.add_permits(n);
        }
    }

    /// Blocks until a token is available and consumes it.
    ///
    /// Fails only once the signal is [`close`](Self::close)d.
    pub async fn wait(&self) -> Result<(), SignalClosed> {
        let permit = self.sem.acquire().await.map_err(|_| SignalClosed)?;
        permit.forget();
        Ok(())
    }

    /// Fails every current and future waiter.
    pub fn close(&self) {
        self.sem.close();
    }

    /// Tokens currently available.
    #[inline]
    pub fn available(&self) -> usize {
        self.sem.available_permits()
    }

    /// Name for diagnostics.
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn release_lets_exactly_n_waiters_through() {
        let signal = Arc::new(Signal::new("elf_release", 0));
        let passed = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..5 {
            let signal = Arc::clone(&signal);
            let passed = Arc::clone(&passed);
            handles.push(tokio::spawn(async move {
                if signal.wait().await.is_ok() {
                    passed.fetch_add(1, Ordering::SeqCst);
                }
            }));
        }

        signal.release(3);
        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(passed.load(Ordering::SeqCst), 3);
        assert_eq!(signal.available(), 0);

        signal.close();
        for h in handles {
            h.await.unwrap();
        }
        assert_eq!(passed.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn tokens_released_before_wait_are_kept() {
        let signal = Signal::new("wake_santa", 0);
        signal.release(2);
        signal.wait().await.unwrap();
        signal.wait().await.unwrap();
        assert_eq!(signal.available(), 0);
    }

    #[tokio::test]
    async fn closed_signal_fails_waiters() {
        let signal = Signal::new("all_hitched", 0);
        signal.close();
        assert_eq!(signal.wait().await, Err(SignalClosed));
    }

    #[test]
    fn release_zero_is_noop() {
        let signal = Signal::new("workshop_slot", 1);
        signal.release(0);
        assert_eq!(signal.available(), 1);
        assert_eq!(signal.name(), "workshop_slot");
    }
}
