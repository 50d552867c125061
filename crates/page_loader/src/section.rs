//! Deferred sections: observer, loader and skeleton composed per section.

use crate::events::PageEvents;
use crate::geometry::{Rect, Viewport};
use crate::loader::{LoadPhase, SectionLoader, SectionResolver, SectionSlot};
use crate::observer::{ObserverOptions, VisibilityObserver};
use crate::scheduler::{FrameClock, ScopedTask};
use crate::skeleton::Skeleton;
use core::fmt;
use markup::Html;
use serde::Serialize;
use std::borrow::Cow;
use std::rc::Rc;
use tokio::sync::watch;

/// Stable identifier of a page section, also used as its DOM id.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct SectionId(Cow<'static, str>);

impl SectionId {
    /// Id from a string literal; no allocation.
    #[inline]
    pub const fn from_static(id: &'static str) -> Self {
        Self(Cow::Borrowed(id))
    }

    /// The id as written in markup.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for SectionId {
    fn from(id: String) -> Self {
        Self(Cow::Owned(id))
    }
}

impl fmt::Display for SectionId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.0)
    }
}

/// Page-wide collaborators every deferred section needs.
#[derive(Clone)]
pub struct PageContext {
    /// Animation-frame source
    pub frames: FrameClock,
    /// Event bus
    pub events: PageEvents,
    /// Current viewport, updated on scroll and resize
    pub viewport: watch::Receiver<Viewport>,
    /// Proximity settings applied to every section
    pub observer: ObserverOptions,
}

/// A section rendered as a skeleton until it nears the viewport.
pub struct DeferredSection {
    observer: VisibilityObserver,
    loader: Rc<SectionLoader>,
    _link: Option<ScopedTask>,
}

impl DeferredSection {
    /// Mount the section. Dropping it disconnects the observer; a retrieval
    /// already in flight is left to finish and ignored.
    pub fn mount(
        skeleton: Skeleton,
        region: watch::Receiver<Rect>,
        resolver: SectionResolver,
        ctx: &PageContext,
    ) -> Self {
        let section = skeleton.section().clone();
        let observer = VisibilityObserver::mount(
            section.clone(),
            region,
            ctx.viewport.clone(),
            ctx.observer,
            &ctx.frames,
            &ctx.events,
        );
        let loader = Rc::new(SectionLoader::new(
            section,
            resolver,
            Some(skeleton),
            &ctx.events,
        ));

        let link = if observer.is_visible() {
            loader.set_visible(true);
            None
        } else {
            let mut visible = observer.subscribe();
            let target = Rc::downgrade(&loader);
            Some(ScopedTask::spawn_local(async move {
                if visible.wait_for(|shown| *shown).await.is_err() {
                    return;
                }
                if let Some(loader) = target.upgrade() {
                    loader.set_visible(true);
                }
            }))
        };

        Self {
            observer,
            loader,
            _link: link,
        }
    }

    #[inline]
    pub fn section(&self) -> &SectionId {
        self.loader.section()
    }

    #[inline]
    pub fn observer(&self) -> &VisibilityObserver {
        &self.observer
    }

    /// Whether the section has come near the viewport. Never reverts.
    #[inline]
    pub fn is_visible(&self) -> bool {
        self.observer.is_visible()
    }

    /// Retrieval progress of the section's loader.
    #[inline]
    pub fn phase(&self) -> LoadPhase {
        self.loader.phase()
    }

    /// What the section is showing right now.
    pub fn slot(&self) -> SectionSlot {
        self.loader.slot()
    }

    /// Markup for the current slot. Every slot carries the section's id.
    pub fn render(&self) -> Html {
        self.loader.render()
    }
}
