//! The home page: a ready gate in front of deferred sections.
//!
//! Until the gate opens the whole page is a skeleton. Once it opens the hero
//! renders eagerly and every other section is mounted as a
//! [`DeferredSection`] stacked below the navbar, loading as the visitor
//! scrolls near it.

use crate::config::SiteConfig;
use crate::contact::{ContactForm, Toast};
use crate::navbar::{NAVBAR_HEIGHT, NavKey, Navbar};
use crate::pages;
use crate::sections::{SectionCatalog, SectionKind};
use core::cell::{Cell, RefCell};
use futures::future::LocalBoxFuture;
use markup::{Element, Html};
use page_loader::{
    DeferredSection, FrameClock, GatePhase, LoadPhase, PageContext, PageCounters, PageEvents,
    PageSkeleton, ReadyGate, Rect, ScopedTask, Telemetry, Viewport,
};
use std::rc::Rc;
use tokio::sync::watch;

/// Height reserved for the footer when computing the scrollable extent.
const FOOTER_HEIGHT: f32 = 240.0;

/// Post-paint enhancements switched on by the gate's deferred initializers.
#[derive(Debug, Default)]
pub struct Effects {
    scroll_reveal: Cell<bool>,
    tilt: Cell<bool>,
}

impl Effects {
    #[inline]
    pub fn scroll_reveal(&self) -> bool {
        self.scroll_reveal.get()
    }

    #[inline]
    pub fn tilt(&self) -> bool {
        self.tilt.get()
    }
}

/// Sections stacked top to bottom under the navbar.
fn stack(width: f32) -> Vec<(SectionKind, Rect)> {
    let mut top = NAVBAR_HEIGHT;
    SectionKind::HOME
        .into_iter()
        .map(|kind| {
            let rect = Rect::new(0.0, top, width, kind.estimated_height());
            top += kind.estimated_height();
            (kind, rect)
        })
        .collect()
}

struct HomeBody {
    hero: Html,
    sections: Vec<(SectionKind, DeferredSection)>,
    regions: Vec<(SectionKind, watch::Sender<Rect>)>,
}

impl HomeBody {
    fn mount(catalog: &SectionCatalog, layout: &[(SectionKind, Rect)], ctx: &PageContext) -> Self {
        let mut hero = Html::empty();
        let mut sections = Vec::new();
        let mut regions = Vec::new();
        for (kind, rect) in layout {
            let resolver = catalog.resolver(*kind);
            if kind.is_eager() {
                hero = resolver.cached().unwrap_or_else(|| kind.render());
                continue;
            }
            let (region, receiver) = watch::channel(*rect);
            sections.push((
                *kind,
                DeferredSection::mount(kind.skeleton(), receiver, resolver, ctx),
            ));
            regions.push((*kind, region));
        }
        log::debug!("home body mounted with {} deferred sections", sections.len());
        Self {
            hero,
            sections,
            regions,
        }
    }

    fn relayout(&self, layout: &[(SectionKind, Rect)]) {
        for (kind, region) in &self.regions {
            if let Some((_, rect)) = layout.iter().find(|(candidate, _)| candidate == kind) {
                region.send_replace(*rect);
            }
        }
    }
}

/// A mounted home page.
pub struct HomePage {
    ctx: PageContext,
    viewport: watch::Sender<Viewport>,
    gate: ReadyGate,
    skeleton: PageSkeleton,
    layout: Rc<RefCell<Vec<(SectionKind, Rect)>>>,
    body: Rc<RefCell<Option<HomeBody>>>,
    navbar: RefCell<Navbar>,
    effects: Rc<Effects>,
    contact: Rc<ContactForm>,
    telemetry: Telemetry,
    _mount_body: ScopedTask,
}

impl HomePage {
    /// Mount the page. `load` resolves when the document's load event fires.
    /// Must be called inside a `LocalSet`.
    pub fn mount(
        config: &SiteConfig,
        catalog: SectionCatalog,
        load: LocalBoxFuture<'static, ()>,
    ) -> Self {
        let frames = FrameClock::start(config.frame_budget());
        let events = PageEvents::new();
        let telemetry = Telemetry::attach(&events, config.telemetry_enabled);
        let (viewport, viewport_rx) = watch::channel(config.viewport());
        let ctx = PageContext {
            frames: frames.clone(),
            events: events.clone(),
            viewport: viewport_rx,
            observer: config.observer_options(),
        };

        let mut gate = ReadyGate::mount(load, config.gate_options(), &frames, &events);
        let effects = Rc::new(Effects::default());
        let reveal = Rc::clone(&effects);
        gate.defer("scroll_reveal", move || reveal.scroll_reveal.set(true));
        let tilt = Rc::clone(&effects);
        gate.defer("tilt_effects", move || tilt.tilt.set(true));

        let layout = Rc::new(RefCell::new(stack(config.viewport_width)));
        let skeleton = PageSkeleton::new(
            NAVBAR_HEIGHT,
            SectionKind::HOME.into_iter().map(SectionKind::skeleton).collect(),
        );

        let body = Rc::new(RefCell::new(None));
        let mount_body = {
            let mut phase = gate.subscribe();
            let body = Rc::clone(&body);
            let layout = Rc::clone(&layout);
            let ctx = ctx.clone();
            ScopedTask::spawn_local(async move {
                if phase
                    .wait_for(|current| *current != GatePhase::Loading)
                    .await
                    .is_err()
                {
                    return;
                }
                let mounted = HomeBody::mount(&catalog, &layout.borrow(), &ctx);
                *body.borrow_mut() = Some(mounted);
            })
        };

        let page = Self {
            ctx,
            viewport,
            gate,
            skeleton,
            layout,
            body,
            navbar: RefCell::new(Navbar::new()),
            effects,
            contact: Rc::new(ContactForm::new(config.submit_delay())),
            telemetry,
            _mount_body: mount_body,
        };
        page.update_navbar();
        page
    }

    #[inline]
    pub fn gate(&self) -> &ReadyGate {
        &self.gate
    }

    #[inline]
    pub fn events(&self) -> &PageEvents {
        &self.ctx.events
    }

    #[inline]
    pub fn effects(&self) -> &Effects {
        &self.effects
    }

    /// Shared handle to the contact form controller.
    pub fn contact(&self) -> Rc<ContactForm> {
        Rc::clone(&self.contact)
    }

    pub fn counters(&self) -> PageCounters {
        self.telemetry.snapshot()
    }

    pub fn navbar(&self) -> Navbar {
        self.navbar.borrow().clone()
    }

    pub fn viewport(&self) -> Viewport {
        *self.viewport.borrow()
    }

    /// Whether the real tree (not the page skeleton) is mounted.
    pub fn is_mounted(&self) -> bool {
        self.body.borrow().is_some()
    }

    /// Total scrollable height.
    pub fn document_height(&self) -> f32 {
        self.layout
            .borrow()
            .last()
            .map_or(NAVBAR_HEIGHT, |(_, rect)| rect.bottom())
            + FOOTER_HEIGHT
    }

    /// Load phase of one deferred section, if mounted.
    pub fn section_phase(&self, kind: SectionKind) -> Option<LoadPhase> {
        self.body.borrow().as_ref().and_then(|body| {
            body.sections
                .iter()
                .find(|(candidate, _)| *candidate == kind)
                .map(|(_, section)| section.phase())
        })
    }

    /// Whether every deferred section has either loaded or failed.
    pub fn is_settled(&self) -> bool {
        self.body.borrow().as_ref().is_some_and(|body| {
            body.sections.iter().all(|(_, section)| {
                matches!(section.phase(), LoadPhase::Ready | LoadPhase::Failed)
            })
        })
    }

    fn update_navbar(&self) {
        let viewport = self.viewport();
        self.navbar
            .borrow_mut()
            .on_scroll(&viewport, &self.layout.borrow());
    }

    /// Scroll to `scroll_y`, clamped to the document.
    pub fn scroll_to(&self, scroll_y: f32) {
        let max = (self.document_height() - self.viewport().height).max(0.0);
        let target = scroll_y.clamp(0.0, max);
        self.viewport
            .send_modify(|viewport| *viewport = viewport.scrolled_to(target));
        self.update_navbar();
    }

    /// Resize the viewport; sections are re-stacked at the new width.
    pub fn resize(&self, width: f32, height: f32) {
        self.viewport.send_modify(|viewport| {
            viewport.width = width;
            viewport.height = height;
        });
        *self.layout.borrow_mut() = stack(width);
        if let Some(body) = self.body.borrow().as_ref() {
            body.relayout(&self.layout.borrow());
        }
        self.update_navbar();
    }

    /// Scroll a section under the navbar, as clicking its nav link does.
    pub fn navigate(&self, kind: SectionKind) {
        let target = self
            .navbar
            .borrow_mut()
            .navigate(kind, &self.layout.borrow());
        if let Some(scroll_y) = target {
            self.scroll_to(scroll_y);
        }
    }

    pub fn toggle_menu(&self) {
        self.navbar.borrow_mut().toggle_menu();
    }

    pub fn on_key(&self, key: NavKey) {
        self.navbar.borrow_mut().on_key(key);
    }

    /// Current markup of the page body.
    pub fn render(&self) -> Html {
        let body = self.body.borrow();
        let Some(body) = body.as_ref() else {
            return Element::new("main")
                .class("page page-loading")
                .child(self.skeleton.render())
                .build();
        };

        let mut class = String::from("page");
        if self.effects.scroll_reveal() {
            class.push_str(" reveal-ready");
        }
        if self.effects.tilt() {
            class.push_str(" tilt-ready");
        }
        let toasts = self.contact.toasts();
        Element::new("main")
            .class(class)
            .child(self.navbar.borrow().render())
            .child(body.hero.clone())
            .children(body.sections.iter().map(|(kind, section)| {
                // The loaded contact chunk is live: it shows the draft and
                // inline errors.
                if *kind == SectionKind::Contact && section.phase() == LoadPhase::Ready {
                    SectionKind::render_contact(&self.contact)
                } else {
                    section.render()
                }
            }))
            .child(pages::footer())
            .children(toasts.iter().map(Toast::render))
            .build()
    }
}
