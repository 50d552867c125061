//! Demand-triggered section retrieval.
//!
//! A [`SectionLoader`] renders its fallback until it is told the section is
//! visible, then invokes the section's [`SectionResolver`] exactly once and
//! swaps the fallback for the resolved content in a single assignment.
//! Errors and panics inside the resolver are caught here and shown as an
//! inline notice; they never reach the rest of the page.

use crate::events::{PageEvent, PageEvents};
use crate::section::SectionId;
use crate::skeleton::Skeleton;
use anyhow::Result;
use core::any::Any;
use core::cell::{Cell, RefCell};
use core::panic::AssertUnwindSafe;
use futures::FutureExt as _;
use futures::future::LocalBoxFuture;
use markup::{Element, Html};
use once_cell::unsync::OnceCell;
use std::rc::Rc;
use tokio::task;
use tokio::time::Instant;
use tracing::Instrument as _;

/// Future produced by a resolver.
pub type ResolveFuture = LocalBoxFuture<'static, Result<Html>>;

struct ResolverInner {
    factory: Box<dyn Fn() -> ResolveFuture>,
    cache: OnceCell<Html>,
    invocations: Cell<u32>,
}

/// Async factory for a section's content.
///
/// A successful result is remembered, so a later mount of the same section
/// renders immediately without invoking the factory again. Failures are not
/// remembered.
#[derive(Clone)]
pub struct SectionResolver {
    inner: Rc<ResolverInner>,
}

impl SectionResolver {
    /// Wrap `factory`, which is called at most once per successful load.
    pub fn new<F, Fut>(factory: F) -> Self
    where
        F: Fn() -> Fut + 'static,
        Fut: Future<Output = Result<Html>> + 'static,
    {
        Self {
            inner: Rc::new(ResolverInner {
                factory: Box::new(move || Box::pin(factory())),
                cache: OnceCell::new(),
                invocations: Cell::new(0),
            }),
        }
    }

    /// Resolver whose content is already available.
    pub fn ready(html: Html) -> Self {
        let resolver = Self::new(|| async { Ok(Html::empty()) });
        resolver.remember(&html);
        resolver
    }

    /// How many times the factory has been invoked.
    #[inline]
    pub fn invocations(&self) -> u32 {
        self.inner.invocations.get()
    }

    /// Previously resolved content, if any.
    #[inline]
    pub fn cached(&self) -> Option<Html> {
        self.inner.cache.get().cloned()
    }

    fn invoke(&self) -> ResolveFuture {
        self.inner.invocations.set(self.inner.invocations.get() + 1);
        (self.inner.factory)()
    }

    fn remember(&self, html: &Html) {
        if self.inner.cache.set(html.clone()).is_err() {
            log::trace!("resolver already cached; keeping first result");
        }
    }
}

/// Why a section is showing an error notice.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LoadFailure {
    /// Section that failed
    pub section: SectionId,
    /// Error or panic message
    pub message: String,
    /// Whether the resolver panicked rather than returning an error
    pub panicked: bool,
}

impl LoadFailure {
    /// Minimal inline notice shown in place of the section. Keeps the
    /// section's id as an anchor target.
    pub fn render(&self) -> Html {
        Element::new("div")
            .id(self.section.as_str())
            .class("section-error")
            .attr("role", "alert")
            .attr("data-section", self.section.as_str())
            .child(
                Element::new("p")
                    .text("This section couldn't be loaded. Please refresh to try again.")
                    .build(),
            )
            .build()
    }
}

/// What a section currently shows. Exactly one variant at a time.
#[derive(Clone, Debug, PartialEq)]
pub enum SectionSlot {
    /// Nothing; only for loaders mounted without a fallback
    Empty,
    /// The skeleton placeholder
    Fallback(Skeleton),
    /// The resolved section
    Content(Html),
    /// The inline error notice
    Failed(LoadFailure),
}

impl SectionSlot {
    /// Markup for whichever variant is showing.
    pub fn render(&self) -> Html {
        match self {
            Self::Empty => Html::empty(),
            Self::Fallback(skeleton) => skeleton.render(),
            Self::Content(html) => html.clone(),
            Self::Failed(failure) => failure.render(),
        }
    }
}

/// Retrieval progress.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadPhase {
    /// Not yet visible; the resolver has not been invoked
    Idle,
    /// Resolver invoked, waiting for it
    Pending,
    /// Content is showing
    Ready,
    /// Error notice is showing
    Failed,
}

struct LoaderState {
    slot: SectionSlot,
    phase: LoadPhase,
}

/// Code-split boundary for one section.
pub struct SectionLoader {
    section: SectionId,
    resolver: SectionResolver,
    state: Rc<RefCell<LoaderState>>,
    events: PageEvents,
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_owned()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "resolver panicked".to_owned()
    }
}

impl SectionLoader {
    /// Mount a loader showing `fallback` (or nothing) until visible.
    pub fn new(
        section: SectionId,
        resolver: SectionResolver,
        fallback: Option<Skeleton>,
        events: &PageEvents,
    ) -> Self {
        let slot = fallback.map_or(SectionSlot::Empty, SectionSlot::Fallback);
        Self {
            section,
            resolver,
            state: Rc::new(RefCell::new(LoaderState {
                slot,
                phase: LoadPhase::Idle,
            })),
            events: events.clone(),
        }
    }

    /// Section this loader retrieves.
    #[inline]
    pub fn section(&self) -> &SectionId {
        &self.section
    }

    /// Report visibility. The first `true` starts retrieval; everything
    /// after that, including `false`, is ignored.
    pub fn set_visible(&self, visible: bool) {
        if !visible || self.state.borrow().phase != LoadPhase::Idle {
            return;
        }
        if let Some(html) = self.resolver.cached() {
            log::debug!("{}: using cached content", self.section);
            *self.state.borrow_mut() = LoaderState {
                slot: SectionSlot::Content(html),
                phase: LoadPhase::Ready,
            };
            self.events.emit(PageEvent::SectionLoaded {
                section: self.section.clone(),
                elapsed_ms: 0,
            });
            return;
        }
        self.state.borrow_mut().phase = LoadPhase::Pending;
        self.spawn_retrieval();
    }

    fn spawn_retrieval(&self) {
        let future = self.resolver.invoke();
        let state = Rc::downgrade(&self.state);
        let resolver = self.resolver.clone();
        let events = self.events.clone();
        let section = self.section.clone();
        let started = Instant::now();
        let span = tracing::info_span!("section_load", section = %section);
        log::debug!("{section}: retrieval started");

        // Detached: an unmounted loader cannot abort the retrieval, only
        // ignore its result.
        drop(task::spawn_local(
            async move {
                let outcome = AssertUnwindSafe(future).catch_unwind().await;
                if let Ok(Ok(html)) = &outcome {
                    resolver.remember(html);
                }
                let Some(state) = state.upgrade() else {
                    log::debug!("{section}: resolved after unmount; ignored");
                    return;
                };
                let elapsed_ms = started.elapsed().as_millis() as u64;
                let failure = match outcome {
                    Ok(Ok(html)) => {
                        *state.borrow_mut() = LoaderState {
                            slot: SectionSlot::Content(html),
                            phase: LoadPhase::Ready,
                        };
                        log::debug!("{section}: loaded in {elapsed_ms}ms");
                        events.emit(PageEvent::SectionLoaded {
                            section,
                            elapsed_ms,
                        });
                        return;
                    }
                    Ok(Err(err)) => LoadFailure {
                        section: section.clone(),
                        message: format!("{err:#}"),
                        panicked: false,
                    },
                    Err(payload) => LoadFailure {
                        section: section.clone(),
                        message: panic_message(payload.as_ref()),
                        panicked: true,
                    },
                };
                log::warn!("{section}: failed to load: {}", failure.message);
                let message = failure.message.clone();
                *state.borrow_mut() = LoaderState {
                    slot: SectionSlot::Failed(failure),
                    phase: LoadPhase::Failed,
                };
                events.emit(PageEvent::SectionFailed { section, message });
            }
            .instrument(span),
        ));
    }

    /// Current retrieval progress.
    ///
    /// # Returns
    /// `Idle` until the first visible report, `Pending` while the resolver
    /// runs, then `Ready` or `Failed` for good.
    #[inline]
    pub fn phase(&self) -> LoadPhase {
        self.state.borrow().phase
    }

    /// Snapshot of what is showing.
    pub fn slot(&self) -> SectionSlot {
        self.state.borrow().slot.clone()
    }

    /// Markup for what is showing.
    pub fn render(&self) -> Html {
        self.state.borrow().slot.render()
    }
}
