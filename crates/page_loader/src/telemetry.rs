//! Telemetry utilities for counting page events and emitting them as JSON lines.
//! Kept independent of component internals; everything arrives over the event bus.
use crate::events::{PageEvent, PageEvents};
use crate::scheduler::ScopedTask;
use serde::Serialize;
use std::cell::RefCell;
use std::rc::Rc;
use tokio::sync::broadcast::error::RecvError;

/// Running totals for one page session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct PageCounters {
    pub sections_visible: u64,
    pub sections_loaded: u64,
    pub sections_failed: u64,
    pub initializers_run: u64,
    pub load_time_total_ms: u64,
    pub ready_at_ms: Option<u64>,
}

impl PageCounters {
    /// Fold one event into the totals.
    pub fn record(&mut self, event: &PageEvent) {
        match event {
            PageEvent::SectionVisible { .. } => self.sections_visible += 1,
            PageEvent::SectionLoaded { elapsed_ms, .. } => {
                self.sections_loaded += 1;
                self.load_time_total_ms = self.load_time_total_ms.saturating_add(*elapsed_ms);
            }
            PageEvent::SectionFailed { .. } => self.sections_failed += 1,
            PageEvent::PageReady { at_ms, .. } => self.ready_at_ms = Some(*at_ms),
            PageEvent::InitializerRan { .. } => self.initializers_run += 1,
        }
    }
}

/// Serialize counters as a single JSON object line.
pub fn counters_json(counters: &PageCounters) -> String {
    serde_json::to_string(counters).unwrap_or_else(|err| format!("{{\"error\":\"{err}\"}}"))
}

/// Serialize an event as a single JSON object line.
pub fn event_json(event: &PageEvent) -> String {
    serde_json::to_string(event).unwrap_or_else(|err| format!("{{\"error\":\"{err}\"}}"))
}

pub fn maybe_emit(enabled: bool, json_line: &str) {
    if enabled {
        log::info!(target: "telemetry", "{json_line}");
    }
}

/// Event-bus subscriber that keeps [`PageCounters`] current.
pub struct Telemetry {
    counters: Rc<RefCell<PageCounters>>,
    _task: ScopedTask,
}

impl Telemetry {
    /// Subscribe to `events`; when `enabled`, every event is also logged as JSON.
    pub fn attach(events: &PageEvents, enabled: bool) -> Self {
        let counters = Rc::new(RefCell::new(PageCounters::default()));
        let sink = Rc::clone(&counters);
        let mut receiver = events.subscribe();
        let task = ScopedTask::spawn_local(async move {
            loop {
                match receiver.recv().await {
                    Ok(event) => {
                        sink.borrow_mut().record(&event);
                        maybe_emit(enabled, &event_json(&event));
                    }
                    Err(RecvError::Lagged(missed)) => {
                        log::warn!("telemetry lagged behind, {missed} events lost");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        });
        Self {
            counters,
            _task: task,
        }
    }

    /// Current totals.
    pub fn snapshot(&self) -> PageCounters {
        *self.counters.borrow()
    }

    /// Current totals as a JSON line.
    pub fn snapshot_json(&self) -> String {
        counters_json(&self.snapshot())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::ReadyTrigger;
    use crate::section::SectionId;

    #[test]
    fn counters_fold_events() {
        let mut counters = PageCounters::default();
        counters.record(&PageEvent::SectionVisible {
            section: SectionId::from_static("about"),
            at_ms: 40,
        });
        counters.record(&PageEvent::SectionLoaded {
            section: SectionId::from_static("about"),
            elapsed_ms: 120,
        });
        counters.record(&PageEvent::PageReady {
            trigger: ReadyTrigger::Fallback,
            at_ms: 2000,
        });
        assert_eq!(counters.sections_visible, 1);
        assert_eq!(counters.sections_loaded, 1);
        assert_eq!(counters.load_time_total_ms, 120);
        assert_eq!(counters.ready_at_ms, Some(2000));
    }

    #[test]
    fn json_lines_carry_event_tag() {
        let line = event_json(&PageEvent::SectionFailed {
            section: SectionId::from_static("pricing"),
            message: "chunk".to_owned(),
        });
        assert!(line.contains("\"event\":\"section_failed\""), "{line}");
        assert!(line.contains("\"section\":\"pricing\""), "{line}");
        let counters = counters_json(&PageCounters::default());
        assert!(counters.contains("\"sections_loaded\":0"), "{counters}");
    }
}
