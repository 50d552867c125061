//! Animation-frame source and scoped task ownership.
//!
//! Everything in the page loader runs on one cooperative event loop: a
//! current-thread tokio runtime driving a `LocalSet`. Work that must not
//! outlive the component that started it is held in a [`ScopedTask`], which
//! aborts the task when dropped.

use core::cell::Cell;
use core::time::Duration;
use futures::future::LocalBoxFuture;
use std::rc::{Rc, Weak};
use tokio::sync::watch;
use tokio::task::{self, JoinHandle};
use tokio::time::{self, MissedTickBehavior};

/// Default frame budget: one frame at roughly 60 Hz.
pub const DEFAULT_FRAME_BUDGET: Duration = Duration::from_millis(16);

/// Owning handle for a local task. Dropping it aborts the task.
#[derive(Debug)]
pub struct ScopedTask {
    handle: JoinHandle<()>,
}

impl ScopedTask {
    /// Spawn `future` on the current `LocalSet`.
    pub fn spawn_local<F>(future: F) -> Self
    where
        F: Future<Output = ()> + 'static,
    {
        Self {
            handle: task::spawn_local(future),
        }
    }

    /// Whether the task ran to completion or was aborted.
    #[inline]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Abort the task now.
    #[inline]
    pub fn cancel(&self) {
        self.handle.abort();
    }
}

impl Drop for ScopedTask {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

struct ClockInner {
    /// Target interval between frames.
    budget: Duration,
    /// Current frame number; bumped once per frame.
    frames: watch::Sender<u64>,
    /// Number of ticks the driver skipped because the loop was busy.
    skipped: Cell<u64>,
}

/// Frame clock emitting numbered animation frames every `budget`.
///
/// Clones share one clock. The driver task stops once the last clone is
/// dropped, after which [`FrameClock::next_frame`] resolves immediately so
/// that nothing waiting on a frame can hang.
#[derive(Clone)]
pub struct FrameClock {
    inner: Rc<ClockInner>,
    driver: Rc<ScopedTask>,
}

impl FrameClock {
    /// Start a clock on the current `LocalSet`. The first frame fires
    /// immediately.
    pub fn start(budget: Duration) -> Self {
        let budget = budget.max(Duration::from_millis(1));
        let (frames, _) = watch::channel(0_u64);
        let inner = Rc::new(ClockInner {
            budget,
            frames,
            skipped: Cell::new(0),
        });
        let driver = ScopedTask::spawn_local(drive_frames(Rc::downgrade(&inner), budget));
        Self {
            inner,
            driver: Rc::new(driver),
        }
    }

    /// Returns the configured frame budget duration.
    #[inline]
    pub fn budget(&self) -> Duration {
        self.inner.budget
    }

    /// Number of the most recent frame.
    #[inline]
    pub fn current_frame(&self) -> u64 {
        *self.inner.frames.borrow()
    }

    /// Frames the driver dropped because the loop could not keep up.
    #[inline]
    pub fn skipped(&self) -> u64 {
        self.inner.skipped.get()
    }

    /// Whether the driver task is still producing frames.
    #[inline]
    pub fn is_running(&self) -> bool {
        !self.driver.is_finished()
    }

    /// Wait for the next frame and return its number.
    pub fn next_frame(&self) -> LocalBoxFuture<'static, u64> {
        let mut frames = self.inner.frames.subscribe();
        let seen = *frames.borrow_and_update();
        Box::pin(async move {
            if frames.changed().await.is_err() {
                return seen;
            }
            *frames.borrow_and_update()
        })
    }

    /// Run `callback` on the next frame unless the returned handle is dropped
    /// first.
    pub fn request_frame<F>(&self, callback: F) -> ScopedTask
    where
        F: FnOnce(u64) + 'static,
    {
        let next = self.next_frame();
        ScopedTask::spawn_local(async move {
            let frame = next.await;
            callback(frame);
        })
    }
}

async fn drive_frames(inner: Weak<ClockInner>, budget: Duration) {
    let mut interval = time::interval(budget);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut last = time::Instant::now();
    loop {
        let tick = interval.tick().await;
        let Some(clock) = inner.upgrade() else {
            return;
        };
        let behind = tick.saturating_duration_since(last).as_millis() / budget.as_millis().max(1);
        if behind > 1 {
            clock
                .skipped
                .set(clock.skipped.get().saturating_add((behind - 1) as u64));
        }
        last = tick;
        clock.frames.send_modify(|frame| *frame = frame.wrapping_add(1));
    }
}
