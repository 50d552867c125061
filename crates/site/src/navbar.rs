//! Fixed navigation bar state.

use crate::content::COMPANY;
use crate::sections::SectionKind;
use markup::{Element, Html};
use page_loader::{Rect, Viewport};

/// Height of the fixed navbar; sections start below it.
pub const NAVBAR_HEIGHT: f32 = 64.0;

/// Scroll offset after which the navbar gets its solid background.
pub const SCROLLED_AFTER_PX: f32 = 20.0;

/// Keys the navbar reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavKey {
    Escape,
    Other,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Navbar {
    scrolled: bool,
    active: Option<SectionKind>,
    menu_open: bool,
}

impl Navbar {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn is_scrolled(&self) -> bool {
        self.scrolled
    }

    #[inline]
    pub fn active(&self) -> Option<SectionKind> {
        self.active
    }

    #[inline]
    pub fn is_menu_open(&self) -> bool {
        self.menu_open
    }

    /// Recompute scroll-dependent state. The active section is the last one
    /// whose top has passed the upper third of the viewport.
    pub fn on_scroll(&mut self, viewport: &Viewport, sections: &[(SectionKind, Rect)]) {
        self.scrolled = viewport.scroll_y > SCROLLED_AFTER_PX;
        let marker = viewport.scroll_y + viewport.height / 3.0;
        self.active = sections
            .iter()
            .take_while(|(_, rect)| rect.y <= marker)
            .last()
            .map(|(kind, _)| *kind);
    }

    pub fn toggle_menu(&mut self) {
        self.menu_open = !self.menu_open;
    }

    pub fn on_key(&mut self, key: NavKey) {
        if key == NavKey::Escape {
            self.menu_open = false;
        }
    }

    /// Scroll offset that brings `kind` just under the navbar. Closes the
    /// mobile menu.
    pub fn navigate(&mut self, kind: SectionKind, sections: &[(SectionKind, Rect)]) -> Option<f32> {
        self.menu_open = false;
        sections
            .iter()
            .find(|(candidate, _)| *candidate == kind)
            .map(|(_, rect)| (rect.y - NAVBAR_HEIGHT).max(0.0))
    }

    pub fn render(&self) -> Html {
        let links = SectionKind::HOME.into_iter().map(|kind| {
            let link = Element::new("a")
                .attr("href", format!("#{}", kind.slug()))
                .text(kind.label());
            let link = if self.active == Some(kind) {
                link.class("nav-link active").attr("aria-current", "true")
            } else {
                link.class("nav-link")
            };
            Element::new("li").child(link.build()).build()
        });
        let mut class = String::from("navbar");
        if self.scrolled {
            class.push_str(" navbar-scrolled");
        }
        if self.menu_open {
            class.push_str(" menu-open");
        }
        Element::new("nav")
            .class(class)
            .attr("style", format!("height:{NAVBAR_HEIGHT}px"))
            .child(
                Element::new("a")
                    .class("brand")
                    .attr("href", "/")
                    .text(COMPANY)
                    .build(),
            )
            .child(
                Element::new("button")
                    .class("menu-toggle")
                    .attr("aria-expanded", if self.menu_open { "true" } else { "false" })
                    .text("Menu")
                    .build(),
            )
            .child(Element::new("ul").class("nav-links").children(links).build())
            .build()
    }
}
