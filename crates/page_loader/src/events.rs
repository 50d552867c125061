//! Page-wide notifications.
//!
//! Components publish what happened to them here instead of calling each
//! other. Subscribers (telemetry, tests) receive every
//! event sent after they subscribe; nobody is required to listen.

use crate::gate::ReadyTrigger;
use crate::section::SectionId;
use serde::Serialize;
use std::rc::Rc;
use tokio::sync::broadcast;
use tokio::time::Instant;

/// Capacity of the broadcast ring. Slow subscribers lag rather than block.
const EVENT_CAPACITY: usize = 256;

/// Something observable that happened on the page.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum PageEvent {
    /// A deferred section's placeholder came within the proximity threshold.
    SectionVisible {
        /// Section that became visible
        section: SectionId,
        /// Milliseconds since page origin
        at_ms: u64,
    },
    /// A section's implementation resolved and replaced its skeleton.
    SectionLoaded {
        /// Section that loaded
        section: SectionId,
        /// Milliseconds spent retrieving it
        elapsed_ms: u64,
    },
    /// A section's retrieval failed; an inline notice is shown instead.
    SectionFailed {
        /// Section that failed
        section: SectionId,
        /// Error description
        message: String,
    },
    /// The ready gate left the loading state.
    PageReady {
        /// Which path won the race
        trigger: ReadyTrigger,
        /// Milliseconds since page origin
        at_ms: u64,
    },
    /// A deferred initializer ran after first paint.
    InitializerRan {
        /// Initializer name
        name: String,
    },
}

struct Bus {
    sender: broadcast::Sender<PageEvent>,
    origin: Instant,
}

/// Handle to the page's event bus. Clones share one bus.
#[derive(Clone)]
pub struct PageEvents {
    bus: Rc<Bus>,
}

impl PageEvents {
    /// Create a bus whose timestamps count from now.
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            bus: Rc::new(Bus {
                sender,
                origin: Instant::now(),
            }),
        }
    }

    /// Publish an event. Having no subscribers is not an error.
    pub fn emit(&self, event: PageEvent) {
        log::trace!("page event: {event:?}");
        if self.bus.sender.send(event).is_err() {
            log::trace!("page event dropped: no subscribers");
        }
    }

    /// Receive every event published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<PageEvent> {
        self.bus.sender.subscribe()
    }

    /// Instant the page was created.
    #[inline]
    pub fn origin(&self) -> Instant {
        self.bus.origin
    }

    /// Milliseconds elapsed since the page origin.
    #[inline]
    pub fn elapsed_ms(&self) -> u64 {
        self.since_origin_ms(Instant::now())
    }

    /// Milliseconds between the page origin and `at`.
    #[inline]
    pub fn since_origin_ms(&self, at: Instant) -> u64 {
        at.saturating_duration_since(self.bus.origin).as_millis() as u64
    }
}

impl Default for PageEvents {
    fn default() -> Self {
        Self::new()
    }
}

/// Drain whatever is queued on `receiver` without waiting.
pub fn drain(receiver: &mut broadcast::Receiver<PageEvent>) -> Vec<PageEvent> {
    use tokio::sync::broadcast::error::TryRecvError;
    let mut out = Vec::new();
    loop {
        match receiver.try_recv() {
            Ok(event) => out.push(event),
            Err(TryRecvError::Lagged(missed)) => {
                log::warn!("page event subscriber lagged, {missed} events lost");
            }
            Err(TryRecvError::Empty | TryRecvError::Closed) => break,
        }
    }
    out
}
