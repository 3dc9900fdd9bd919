// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Bounded waiting for a condition to become true.

use std::future::Future;
use std::time::Duration;
use tokio::time::Instant;

/// Progress of a readiness wait.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadinessState {
    WaitingForRoom,
    Ready,
    TimedOut,
}

/// Poll `predicate` every `poll_interval` until it holds or `timeout` elapses.
///
/// The predicate is checked once before any sleeping, so an already
/// satisfied condition returns immediately. Returns `Ready` or `TimedOut`.
pub async fn wait_until<F, Fut>(
    mut predicate: F,
    poll_interval: Duration,
    timeout: Duration,
) -> ReadinessState
where
    F: FnMut() -> Fut,
    Fut: Future<Output = bool>,
{
    let started = Instant::now();
    let deadline = started + timeout;
    let mut state = ReadinessState::WaitingForRoom;

    while state == ReadinessState::WaitingForRoom {
        if predicate().await {
            state = ReadinessState::Ready;
        } else if Instant::now() >= deadline {
            state = ReadinessState::TimedOut;
        } else {
            tokio::time::sleep_until((Instant::now() + poll_interval).min(deadline)).await;
        }
    }

    tracing::debug!(
        state = ?state,
        waited_ms = started.elapsed().as_millis() as u64,
        "Readiness wait finished"
    );
    state
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn ready_immediately() {
        let state = wait_until(
            || async { true },
            Duration::from_millis(100),
            Duration::from_secs(5),
        )
        .await;
        assert_eq!(state, ReadinessState::Ready);
    }

    #[tokio::test(start_paused = true)]
    async fn becomes_ready_after_polls() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = calls.clone();
        let started = Instant::now();

        let state = wait_until(
            move || {
                let counter = counter.clone();
                async move { counter.fetch_add(1, Ordering::SeqCst) >= 3 }
            },
            Duration::from_millis(100),
            Duration::from_secs(5),
        )
        .await;

        assert_eq!(state, ReadinessState::Ready);
        assert_eq!(calls.load(Ordering::SeqCst), 4);
        let waited = started.elapsed();
        assert!(waited >= Duration::from_millis(300) && waited < Duration::from_millis(310));
    }

    #[tokio::test(start_paused = true)]
    async fn times_out_at_deadline() {
        let started = Instant::now();
        let state = wait_until(
            || async { false },
            Duration::from_millis(400),
            Duration::from_secs(1),
        )
        .await;

        assert_eq!(state, ReadinessState::TimedOut);
        let waited = started.elapsed();
        assert!(waited >= Duration::from_secs(1) && waited < Duration::from_millis(1010));
    }
}
