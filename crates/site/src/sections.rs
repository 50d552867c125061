//! Home page sections and their code-split resolvers.

use crate::contact::{ContactDraft, ContactForm, FieldErrors, render_form};
use crate::content::{
    COMPANY, CONTACT_EMAIL, PLANS, PROJECTS, SERVICES, TAGLINE, TESTIMONIALS,
};
use core::time::Duration;
use markup::{Element, Html};
use page_loader::{SectionId, SectionResolver, Skeleton, SkeletonShape};
use std::collections::HashMap;
use tokio::time;

/// One of the home page's sections, in page order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SectionKind {
    Hero,
    About,
    Services,
    Portfolio,
    Testimonials,
    Pricing,
    Contact,
}

impl SectionKind {
    /// Home page order.
    pub const HOME: [Self; 7] = [
        Self::Hero,
        Self::About,
        Self::Services,
        Self::Portfolio,
        Self::Testimonials,
        Self::Pricing,
        Self::Contact,
    ];

    /// DOM id and fragment target.
    pub const fn slug(self) -> &'static str {
        match self {
            Self::Hero => "home",
            Self::About => "about",
            Self::Services => "services",
            Self::Portfolio => "portfolio",
            Self::Testimonials => "testimonials",
            Self::Pricing => "pricing",
            Self::Contact => "contact",
        }
    }

    #[inline]
    pub const fn id(self) -> SectionId {
        SectionId::from_static(self.slug())
    }

    /// Navigation label.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Hero => "Home",
            Self::About => "About",
            Self::Services => "Services",
            Self::Portfolio => "Work",
            Self::Testimonials => "Testimonials",
            Self::Pricing => "Pricing",
            Self::Contact => "Contact",
        }
    }

    /// The hero is above the fold and never deferred.
    #[inline]
    pub const fn is_eager(self) -> bool {
        matches!(self, Self::Hero)
    }

    pub const fn shape(self) -> SkeletonShape {
        match self {
            Self::Hero => SkeletonShape::Hero,
            Self::About => SkeletonShape::Columns { count: 2 },
            Self::Services | Self::Portfolio => SkeletonShape::Cards { count: 4 },
            Self::Testimonials => SkeletonShape::Cards { count: 3 },
            Self::Pricing => SkeletonShape::Columns { count: 3 },
            Self::Contact => SkeletonShape::Form { fields: 3 },
        }
    }

    /// Height reserved for the section before it renders.
    pub const fn estimated_height(self) -> f32 {
        match self {
            Self::Hero => 720.0,
            Self::About => 640.0,
            Self::Services => 760.0,
            Self::Portfolio => 900.0,
            Self::Testimonials => 560.0,
            Self::Pricing => 820.0,
            Self::Contact => 700.0,
        }
    }

    pub fn skeleton(self) -> Skeleton {
        Skeleton::new(self.id(), self.shape(), self.estimated_height())
    }

    /// Full markup of the section as first delivered.
    pub fn render(self) -> Html {
        let body = match self {
            Self::Hero => hero(),
            Self::About => about(),
            Self::Services => services(),
            Self::Portfolio => portfolio(),
            Self::Testimonials => testimonials(),
            Self::Pricing => pricing(),
            Self::Contact => contact(render_form(
                &ContactDraft::default(),
                &FieldErrors::default(),
                false,
            )),
        };
        self.wrap(body)
    }

    /// The contact section reflecting `form`'s draft and errors.
    pub fn render_contact(form: &ContactForm) -> Html {
        Self::Contact.wrap(contact(form.render()))
    }

    fn wrap(self, body: Html) -> Html {
        Element::new("section")
            .id(self.slug())
            .class(format!("section section-{}", self.slug()))
            .attr("style", format!("min-height:{}px", self.estimated_height()))
            .child(body)
            .build()
    }
}

fn heading(title: &str, subtitle: &str) -> Html {
    Element::new("header")
        .class("section-heading")
        .child(Element::new("h2").text(title).build())
        .child(Element::new("p").text(subtitle).build())
        .build()
}

fn hero() -> Html {
    Element::new("div")
        .class("hero")
        .child(Element::new("h1").text(COMPANY).build())
        .child(Element::new("p").class("hero-tagline").text(TAGLINE).build())
        .child(
            Element::new("a")
                .class("button button-primary")
                .attr("href", "#contact")
                .text("Start a project")
                .build(),
        )
        .child(
            Element::new("a")
                .class("button")
                .attr("href", "/portfolio")
                .text("See our work")
                .build(),
        )
        .build()
}

fn about() -> Html {
    Html::from_iter([
        heading("About us", "A small team with a big portfolio."),
        Element::new("div")
            .class("columns")
            .child(
                Element::new("p")
                    .text("Since 2015 we have helped startups and established brands ship products that matter.")
                    .build(),
            )
            .child(
                Element::new("p")
                    .child(Html::from("Meet the people behind the work on our "))
                    .child(Element::new("a").attr("href", "/team").text("team page").build())
                    .build(),
            )
            .build(),
    ])
}

fn services() -> Html {
    let cards = SERVICES.iter().map(|service| {
        Element::new("article")
            .class("card tilt")
            .child(Element::new("h3").text(service.title).build())
            .child(Element::new("p").text(service.summary).build())
            .build()
    });
    Html::from_iter([
        heading("Services", "Everything you need to launch and grow."),
        Element::new("div").class("cards").children(cards).build(),
    ])
}

fn portfolio() -> Html {
    let cards = PROJECTS.iter().map(|project| {
        Element::new("article")
            .class("card tilt")
            .attr("data-project", project.slug)
            .child(Element::new("span").class("badge").text(project.category).build())
            .child(Element::new("h3").text(project.title).build())
            .child(Element::new("p").text(project.summary).build())
            .build()
    });
    Html::from_iter([
        heading("Selected work", "A few projects we are proud of."),
        Element::new("div").class("cards").children(cards).build(),
        Element::new("a")
            .class("button")
            .attr("href", "/portfolio")
            .text("View all projects")
            .build(),
    ])
}

fn testimonials() -> Html {
    let quotes = TESTIMONIALS.iter().map(|entry| {
        Element::new("blockquote")
            .class("card")
            .child(Element::new("p").text(entry.quote).build())
            .child(
                Element::new("footer")
                    .text(format!("{}, {}", entry.author, entry.role))
                    .build(),
            )
            .build()
    });
    Html::from_iter([
        heading("What clients say", "Results speak louder than pitches."),
        Element::new("div").class("cards").children(quotes).build(),
    ])
}

fn pricing() -> Html {
    let plans = PLANS.iter().map(|plan| {
        let features = plan
            .features
            .iter()
            .map(|feature| Element::new("li").text(feature).build());
        Element::new("article")
            .class(if plan.featured { "plan plan-featured" } else { "plan" })
            .child(Element::new("h3").text(plan.name).build())
            .child(Element::new("p").class("price").text(plan.price).build())
            .child(Element::new("ul").children(features).build())
            .child(
                Element::new("a")
                    .class("button")
                    .attr("href", "#contact")
                    .text("Get started")
                    .build(),
            )
            .build()
    });
    Html::from_iter([
        heading("Pricing", "Transparent packages, no surprises."),
        Element::new("div").class("columns").children(plans).build(),
        Element::new("p")
            .class("fine-print")
            .child(Html::from("See our "))
            .child(
                Element::new("a")
                    .attr("href", "/refund-policy")
                    .text("refund policy")
                    .build(),
            )
            .build(),
    ])
}

fn contact(form: Html) -> Html {
    Html::from_iter([
        heading("Let's talk", "Tell us about your project."),
        form,
        Element::new("p")
            .class("contact-alt")
            .child(Html::from("Prefer email? "))
            .child(
                Element::new("a")
                    .attr("href", format!("mailto:{CONTACT_EMAIL}"))
                    .text(CONTACT_EMAIL)
                    .build(),
            )
            .build(),
    ])
}

/// Resolvers for every home page section.
///
/// Deferred sections resolve after a simulated chunk latency; the hero is
/// available immediately.
pub struct SectionCatalog {
    resolvers: HashMap<SectionKind, SectionResolver>,
}

impl SectionCatalog {
    pub fn new(chunk_latency: Duration) -> Self {
        let resolvers = SectionKind::HOME
            .into_iter()
            .map(|kind| {
                let resolver = if kind.is_eager() {
                    SectionResolver::ready(kind.render())
                } else {
                    SectionResolver::new(move || async move {
                        time::sleep(chunk_latency).await;
                        log::debug!("chunk for {} fetched", kind.slug());
                        Ok(kind.render())
                    })
                };
                (kind, resolver)
            })
            .collect();
        Self { resolvers }
    }

    /// Replace one section's resolver.
    #[must_use]
    pub fn with_resolver(mut self, kind: SectionKind, resolver: SectionResolver) -> Self {
        self.resolvers.insert(kind, resolver);
        self
    }

    /// Resolver for `kind`. Clones share the memoised result.
    pub fn resolver(&self, kind: SectionKind) -> SectionResolver {
        self.resolvers
            .get(&kind)
            .cloned()
            .unwrap_or_else(|| SectionResolver::ready(kind.render()))
    }
}
