//! Page-level ready gate.
//!
//! Decides once per page lifetime whether the full-page skeleton or the real
//! page is shown. The document load event races a fallback timer; whichever
//! finishes first opens the gate and the other is dropped. The transition is
//! a compare-and-set on the gate state, so a late trigger is a no-op.

use crate::events::{PageEvent, PageEvents};
use crate::scheduler::{FrameClock, ScopedTask};
use core::cell::Cell;
use core::time::Duration;
use futures::future::LocalBoxFuture;
use serde::Serialize;
use std::rc::{Rc, Weak};
use tokio::sync::watch;
use tokio::time::{self, Instant};

/// Default time after which the page is revealed without a load event.
pub const DEFAULT_READY_FALLBACK: Duration = Duration::from_millis(2000);

/// Which path opened the gate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadyTrigger {
    /// The document finished loading
    LoadEvent,
    /// The fallback timer elapsed first
    Fallback,
}

/// Gate state machine. `Ready` is terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GatePhase {
    /// Neither the load event nor the fallback has fired; the page
    /// skeleton is showing
    Loading,
    /// The real page is showing, opened by the given trigger
    Ready(ReadyTrigger),
}

/// Tuning for [`ReadyGate::mount`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GateOptions {
    /// How long to wait for the load event before revealing anyway
    pub fallback: Duration,
}

impl Default for GateOptions {
    fn default() -> Self {
        Self {
            fallback: DEFAULT_READY_FALLBACK,
        }
    }
}

/// Snapshot of the gate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoadGateState {
    pub phase: GatePhase,
    /// When the gate was mounted
    pub started_at: Instant,
    /// When the fallback fires if nothing else does
    pub fallback_deadline: Instant,
    /// When the gate opened
    pub ready_at: Option<Instant>,
}

impl LoadGateState {
    /// Whether the gate is still closed.
    #[inline]
    pub fn is_loading(&self) -> bool {
        self.phase == GatePhase::Loading
    }

    /// Time from mount to ready, once ready.
    pub fn time_to_ready(&self) -> Option<Duration> {
        self.ready_at
            .map(|ready| ready.saturating_duration_since(self.started_at))
    }
}

struct GateCore {
    state: Cell<LoadGateState>,
    phase: watch::Sender<GatePhase>,
    transitions: Cell<u32>,
    events: PageEvents,
}

impl GateCore {
    fn transition(&self, trigger: ReadyTrigger) -> bool {
        let mut state = self.state.get();
        if !state.is_loading() {
            log::debug!("ready gate: {trigger:?} arrived after {:?}; ignored", state.phase);
            return false;
        }
        let now = Instant::now();
        state.phase = GatePhase::Ready(trigger);
        state.ready_at = Some(now);
        self.state.set(state);
        self.transitions.set(self.transitions.get() + 1);
        self.phase.send_replace(GatePhase::Ready(trigger));

        let at_ms = self.events.since_origin_ms(now);
        log::info!(
            "page ready via {trigger:?} after {}ms",
            now.saturating_duration_since(state.started_at).as_millis()
        );
        self.events.emit(PageEvent::PageReady { trigger, at_ms });
        true
    }
}

async fn race(core: Weak<GateCore>, load: LocalBoxFuture<'static, ()>, deadline: Instant) {
    let trigger = tokio::select! {
        biased;
        () = load => ReadyTrigger::LoadEvent,
        () = time::sleep_until(deadline) => ReadyTrigger::Fallback,
    };
    if let Some(core) = core.upgrade() {
        core.transition(trigger);
    }
}

/// The page's loading gate and its deferred initializers.
pub struct ReadyGate {
    core: Rc<GateCore>,
    frames: FrameClock,
    _race: ScopedTask,
    initializers: Vec<ScopedTask>,
}

impl ReadyGate {
    /// Mount the gate and start the race between `load` and the fallback.
    pub fn mount(
        load: LocalBoxFuture<'static, ()>,
        options: GateOptions,
        frames: &FrameClock,
        events: &PageEvents,
    ) -> Self {
        let started_at = Instant::now();
        let fallback_deadline = started_at + options.fallback;
        let (phase, _) = watch::channel(GatePhase::Loading);
        let core = Rc::new(GateCore {
            state: Cell::new(LoadGateState {
                phase: GatePhase::Loading,
                started_at,
                fallback_deadline,
                ready_at: None,
            }),
            phase,
            transitions: Cell::new(0),
            events: events.clone(),
        });
        let race = ScopedTask::spawn_local(race(Rc::downgrade(&core), load, fallback_deadline));
        Self {
            core,
            frames: frames.clone(),
            _race: race,
            initializers: Vec::new(),
        }
    }

    #[inline]
    pub fn phase(&self) -> GatePhase {
        self.core.state.get().phase
    }

    #[inline]
    pub fn is_ready(&self) -> bool {
        !self.core.state.get().is_loading()
    }

    /// Snapshot including mount, deadline and ready instants.
    #[inline]
    pub fn state(&self) -> LoadGateState {
        self.core.state.get()
    }

    /// Number of transitions so far; never more than one.
    #[inline]
    pub fn transitions(&self) -> u32 {
        self.core.transitions.get()
    }

    /// Phase signal for components that render differently once ready.
    pub fn subscribe(&self) -> watch::Receiver<GatePhase> {
        self.core.phase.subscribe()
    }

    /// Open the gate from outside the race, as a trigger arriving at an
    /// arbitrary time would. Returns false if it was already open, in which
    /// case nothing changes.
    #[cfg(test)]
    fn trigger(&self, trigger: ReadyTrigger) -> bool {
        self.core.transition(trigger)
    }

    /// Wait until the gate opens.
    pub async fn ready(&self) -> ReadyTrigger {
        let mut phase = self.subscribe();
        loop {
            if let GatePhase::Ready(trigger) = *phase.borrow_and_update() {
                return trigger;
            }
            if phase.changed().await.is_err() {
                return ReadyTrigger::Fallback;
            }
        }
    }

    /// Run `init` on the next animation frame so it does not block first
    /// paint. Dropping the gate before then cancels it.
    pub fn defer<F>(&mut self, name: &'static str, init: F)
    where
        F: FnOnce() + 'static,
    {
        let events = self.core.events.clone();
        let task = self.frames.request_frame(move |frame| {
            log::debug!("initializer {name} on frame {frame}");
            init();
            events.emit(PageEvent::InitializerRan {
                name: name.to_owned(),
            });
        });
        self.initializers.push(task);
    }

    /// Initializers scheduled but not yet run.
    pub fn pending_initializers(&self) -> usize {
        self.initializers
            .iter()
            .filter(|task| !task.is_finished())
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::future;
    use tokio::task::LocalSet;

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn already_loaded_document_opens_immediately() {
        LocalSet::new()
            .run_until(async {
                let frames = FrameClock::start(Duration::from_millis(16));
                let events = PageEvents::new();
                let gate = ReadyGate::mount(
                    Box::pin(future::ready(())),
                    GateOptions::default(),
                    &frames,
                    &events,
                );
                assert_eq!(gate.ready().await, ReadyTrigger::LoadEvent);
                assert_eq!(gate.state().time_to_ready(), Some(Duration::ZERO));
            })
            .await;
    }

    #[tokio::test(flavor = "current_thread", start_paused = true)]
    async fn manual_trigger_wins_once() {
        LocalSet::new()
            .run_until(async {
                let frames = FrameClock::start(Duration::from_millis(16));
                let events = PageEvents::new();
                let gate = ReadyGate::mount(
                    Box::pin(future::pending()),
                    GateOptions {
                        fallback: Duration::from_millis(300),
                    },
                    &frames,
                    &events,
                );
                assert!(gate.trigger(ReadyTrigger::LoadEvent));
                assert!(!gate.trigger(ReadyTrigger::Fallback));
                time::sleep(Duration::from_millis(500)).await;
                assert_eq!(gate.phase(), GatePhase::Ready(ReadyTrigger::LoadEvent));
                assert_eq!(gate.transitions(), 1);
            })
            .await;
    }
}
