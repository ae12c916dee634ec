#![allow(dead_code)]
//! Helpers for exercising guards in tests: scripted fallible operations and
//! futures that settle after a delay. Used by the integration tests and kept
//! public so downstream consumers can reuse the same scenarios.

use anyhow::bail;
use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll, Waker};
use std::thread;
use std::time::Duration;

/// Operation that fails a scripted number of times before it starts
/// succeeding with a fixed value. Call counting is atomic so a single
/// instance can be shared across threads.
pub struct FlakyOp {
    value: String,
    fail_times: u32,
    calls: AtomicU32,
}

impl FlakyOp {
    pub fn new<V: Into<String>>(value: V, fail_times: u32) -> Self {
        Self {
            value: value.into(),
            fail_times,
            calls: AtomicU32::new(0),
        }
    }

    /// Runs the operation once; the first `fail_times` calls fault.
    pub fn call(&self) -> anyhow::Result<String> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call < self.fail_times {
            bail!("flaky operation failed on call {}", call + 1);
        }
        Ok(self.value.clone())
    }

    /// Number of times the operation ran so far.
    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

struct DelayShared {
    elapsed: AtomicBool,
    waker: Mutex<Option<Waker>>,
}

/// One-shot future resolving to its value after the given delay.
///
/// The first poll spawns a timer thread and parks the task; the thread wakes
/// it once the delay elapsed. Good enough to drive any executor in tests, no
/// runtime required.
pub struct Delayed<T> {
    value: Option<T>,
    delay: Duration,
    shared: Option<Arc<DelayShared>>,
}

/// Builds a future that resolves to `value` after `delay`.
pub fn delayed<T>(value: T, delay: Duration) -> Delayed<T> {
    Delayed {
        value: Some(value),
        delay,
        shared: None,
    }
}

impl<T: Unpin> Future for Delayed<T> {
    type Output = T;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<T> {
        let this = self.get_mut();

        let shared = match &this.shared {
            Some(shared) => {
                // remember the latest waker before re-checking, the timer
                // thread consumes whatever is stored when it fires
                *shared.waker.lock().expect("waker lock") = Some(cx.waker().clone());
                Arc::clone(shared)
            }
            None => {
                // the waker has to be in place before the timer starts
                let shared = Arc::new(DelayShared {
                    elapsed: AtomicBool::new(false),
                    waker: Mutex::new(Some(cx.waker().clone())),
                });
                this.shared = Some(Arc::clone(&shared));

                let timer = Arc::clone(&shared);
                let delay = this.delay;
                thread::spawn(move || {
                    thread::sleep(delay);
                    timer.elapsed.store(true, Ordering::SeqCst);
                    if let Some(waker) = timer.waker.lock().expect("waker lock").take() {
                        waker.wake();
                    }
                });
                shared
            }
        };

        if shared.elapsed.load(Ordering::SeqCst) {
            Poll::Ready(this.value.take().expect("delayed future polled after completion"))
        } else {
            Poll::Pending
        }
    }
}
