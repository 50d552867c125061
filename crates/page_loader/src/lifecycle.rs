//! Document lifecycle: ready state and critical resource tracking.
//!
//! The load event fires once parsing has finished and every tracked
//! resource (images, fonts, stylesheets, scripts) has settled. A resource
//! that fails still settles; browsers fire `load` regardless.

use futures::future::{self, LocalBoxFuture};
use std::cell::Cell;
use std::rc::Rc;
use tokio::sync::watch;

/// `document.readyState` equivalent.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum ReadyState {
    /// Still parsing
    Loading,
    /// Parsed (`DOMContentLoaded` fired), resources outstanding
    Interactive,
    /// Everything settled (`load` fired)
    Complete,
}

/// Kind of critical resource holding back the load event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResourceKind {
    Image,
    Font,
    Stylesheet,
    Script,
}

struct LifecycleInner {
    state: watch::Sender<ReadyState>,
    pending: Cell<usize>,
    parsed: Cell<bool>,
    failed: Cell<usize>,
}

impl LifecycleInner {
    fn settle(&self) {
        self.pending.set(self.pending.get().saturating_sub(1));
        self.maybe_complete();
    }

    fn maybe_complete(&self) {
        if self.parsed.get() && self.pending.get() == 0 {
            self.state.send_if_modified(|state| {
                if *state == ReadyState::Complete {
                    return false;
                }
                log::debug!("document load complete");
                *state = ReadyState::Complete;
                true
            });
        }
    }
}

/// Lifecycle of one document. Clones share state.
#[derive(Clone)]
pub struct DocumentLifecycle {
    inner: Rc<LifecycleInner>,
}

impl DocumentLifecycle {
    pub fn new() -> Self {
        let (state, _) = watch::channel(ReadyState::Loading);
        Self {
            inner: Rc::new(LifecycleInner {
                state,
                pending: Cell::new(0),
                parsed: Cell::new(false),
                failed: Cell::new(0),
            }),
        }
    }

    /// Current ready state.
    #[inline]
    pub fn ready_state(&self) -> ReadyState {
        *self.inner.state.borrow()
    }

    /// Resources still outstanding.
    #[inline]
    pub fn pending(&self) -> usize {
        self.inner.pending.get()
    }

    /// Resources that settled with a failure.
    #[inline]
    pub fn failed(&self) -> usize {
        self.inner.failed.get()
    }

    /// Register a resource that must settle before the load event.
    ///
    /// Tracking after the load event has fired has no effect on it.
    pub fn track(&self, kind: ResourceKind, url: impl Into<String>) -> ResourceLoad {
        let url = url.into();
        let counted = self.ready_state() != ReadyState::Complete;
        if counted {
            self.inner.pending.set(self.inner.pending.get() + 1);
        } else {
            log::debug!("{kind:?} {url} tracked after load; ignored for readiness");
        }
        ResourceLoad {
            lifecycle: Rc::clone(&self.inner),
            kind,
            url,
            settled: !counted,
        }
    }

    /// Parsing finished: moves to `Interactive`, or straight to `Complete`
    /// when nothing is outstanding.
    pub fn finish_parsing(&self) {
        if self.inner.parsed.replace(true) {
            return;
        }
        self.inner.state.send_if_modified(|state| {
            if *state == ReadyState::Loading {
                *state = ReadyState::Interactive;
                true
            } else {
                false
            }
        });
        self.inner.maybe_complete();
    }

    /// Resolves when the load event fires. If the lifecycle is dropped before
    /// that, it never resolves.
    pub fn load_event(&self) -> LocalBoxFuture<'static, ()> {
        let mut state = self.inner.state.subscribe();
        Box::pin(async move {
            let missed = state
                .wait_for(|ready| *ready == ReadyState::Complete)
                .await
                .is_err();
            if missed {
                log::debug!("document dropped before load; waiting forever");
                future::pending::<()>().await;
            }
        })
    }
}

impl Default for DocumentLifecycle {
    fn default() -> Self {
        Self::new()
    }
}

/// Guard for one tracked resource. Dropping it without calling
/// [`ResourceLoad::complete`] or [`ResourceLoad::fail`] settles it as
/// abandoned.
pub struct ResourceLoad {
    lifecycle: Rc<LifecycleInner>,
    kind: ResourceKind,
    url: String,
    settled: bool,
}

impl ResourceLoad {
    /// The resource finished loading.
    pub fn complete(mut self) {
        log::trace!("{:?} loaded: {}", self.kind, self.url);
        self.settle();
    }

    /// The resource failed; it no longer holds back the load event.
    pub fn fail(mut self, reason: &str) {
        log::warn!("{:?} failed to load ({}): {reason}", self.kind, self.url);
        self.lifecycle.failed.set(self.lifecycle.failed.get() + 1);
        self.settle();
    }

    fn settle(&mut self) {
        if !self.settled {
            self.settled = true;
            self.lifecycle.settle();
        }
    }
}

impl Drop for ResourceLoad {
    fn drop(&mut self) {
        if !self.settled {
            log::debug!("{:?} abandoned: {}", self.kind, self.url);
        }
        self.settle();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_waits_for_parse_and_resources() {
        let doc = DocumentLifecycle::new();
        let hero = doc.track(ResourceKind::Image, "/hero.webp");
        let font = doc.track(ResourceKind::Font, "/inter.woff2");
        assert_eq!(doc.ready_state(), ReadyState::Loading);

        doc.finish_parsing();
        assert_eq!(doc.ready_state(), ReadyState::Interactive);

        hero.complete();
        assert_eq!(doc.ready_state(), ReadyState::Interactive);
        font.fail("404");
        assert_eq!(doc.ready_state(), ReadyState::Complete);
        assert_eq!(doc.failed(), 1);
    }

    #[test]
    fn empty_document_completes_on_parse() {
        let doc = DocumentLifecycle::new();
        doc.finish_parsing();
        assert_eq!(doc.ready_state(), ReadyState::Complete);
        let late = doc.track(ResourceKind::Script, "/late.js");
        assert_eq!(doc.pending(), 0);
        drop(late);
        assert_eq!(doc.ready_state(), ReadyState::Complete);
    }

    #[test]
    fn dropped_guard_settles() {
        let doc = DocumentLifecycle::new();
        {
            let _css = doc.track(ResourceKind::Stylesheet, "/site.css");
            doc.finish_parsing();
            assert_eq!(doc.pending(), 1);
        }
        assert_eq!(doc.ready_state(), ReadyState::Complete);
    }
}
