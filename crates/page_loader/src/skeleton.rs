//! Skeleton placeholders shown while sections load.

use crate::section::SectionId;
use markup::{Element, Html};

/// Shape hint so a placeholder resembles the content it stands in for.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkeletonShape {
    /// Large title, subtitle and call-to-action
    Hero,
    /// Grid of cards
    Cards { count: u8 },
    /// Side-by-side columns
    Columns { count: u8 },
    /// Paragraph lines
    Lines { count: u8 },
    /// Form fields with a submit button
    Form { fields: u8 },
}

/// Presentational stand-in for one section.
#[derive(Clone, Debug, PartialEq)]
pub struct Skeleton {
    section: SectionId,
    shape: SkeletonShape,
    min_height: f32,
}

fn line(width_pct: u8) -> Html {
    Element::new("div")
        .class("skeleton-line")
        .attr("style", format!("width:{width_pct}%"))
        .build()
}

fn block(class: &str, count: u8, body: impl Fn(u8) -> Html) -> Html {
    Element::new("div")
        .class(class)
        .attr("style", format!("--skeleton-count:{count}"))
        .children((0..count).map(body))
        .build()
}

impl Skeleton {
    /// `min_height` reserves the section's space to prevent layout shift.
    pub fn new(section: SectionId, shape: SkeletonShape, min_height: f32) -> Self {
        Self {
            section,
            shape,
            min_height: min_height.max(0.0),
        }
    }

    #[inline]
    pub fn section(&self) -> &SectionId {
        &self.section
    }

    #[inline]
    pub fn shape(&self) -> SkeletonShape {
        self.shape
    }

    #[inline]
    pub fn min_height(&self) -> f32 {
        self.min_height
    }

    fn body(&self) -> Html {
        match self.shape {
            SkeletonShape::Hero => [line(70), line(50), line(30)]
                .into_iter()
                .chain([Element::new("div").class("skeleton-button").build()])
                .collect(),
            SkeletonShape::Cards { count } => block("skeleton-cards", count, |_| {
                Element::new("div")
                    .class("skeleton-card")
                    .child(Element::new("div").class("skeleton-media").build())
                    .child(line(80))
                    .child(line(60))
                    .build()
            }),
            SkeletonShape::Columns { count } => block("skeleton-columns", count, |_| {
                Element::new("div")
                    .class("skeleton-column")
                    .children([line(90), line(75), line(85)])
                    .build()
            }),
            SkeletonShape::Lines { count } => {
                (0..count).map(|idx| line(95 - (idx % 4) * 10)).collect()
            }
            SkeletonShape::Form { fields } => {
                let mut form = block("skeleton-form", fields, |_| {
                    Element::new("div").class("skeleton-field").build()
                });
                form.push(&Element::new("div").class("skeleton-button").build());
                form
            }
        }
    }

    /// Markup for the placeholder. Carries the section's id so fragment
    /// links resolve before the content arrives.
    pub fn render(&self) -> Html {
        Element::new("div")
            .id(self.section.as_str())
            .class("skeleton")
            .attr("data-skeleton", self.section.as_str())
            .attr("aria-busy", "true")
            .attr("style", format!("min-height:{}px", self.min_height))
            .child(self.body())
            .build()
    }
}

/// Full-page placeholder shown until the ready gate opens.
#[derive(Clone, Debug, PartialEq)]
pub struct PageSkeleton {
    navbar_height: f32,
    sections: Vec<Skeleton>,
}

impl PageSkeleton {
    pub fn new(navbar_height: f32, sections: Vec<Skeleton>) -> Self {
        Self {
            navbar_height,
            sections,
        }
    }

    /// Placeholders in page order.
    #[inline]
    pub fn sections(&self) -> &[Skeleton] {
        &self.sections
    }

    /// Total reserved height including the navbar.
    pub fn min_height(&self) -> f32 {
        self.navbar_height + self.sections.iter().map(Skeleton::min_height).sum::<f32>()
    }

    pub fn render(&self) -> Html {
        let nav = Element::new("div")
            .class("skeleton-nav")
            .attr("style", format!("height:{}px", self.navbar_height))
            .child(line(15))
            .build();
        Element::new("div")
            .class("page-skeleton")
            .attr("aria-busy", "true")
            .attr("aria-label", "Loading page")
            .child(nav)
            .children(self.sections.iter().map(Skeleton::render))
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skeleton_reserves_height_and_names_section() {
        let skeleton = Skeleton::new(
            SectionId::from_static("services"),
            SkeletonShape::Cards { count: 3 },
            640.0,
        );
        let html = skeleton.render();
        assert!(html.contains("data-skeleton=\"services\""));
        assert!(html.contains("id=\"services\""));
        assert!(html.contains("min-height:640px"));
        assert_eq!(html.as_str().matches("class=\"skeleton-card\"").count(), 3);
    }

    #[test]
    fn form_skeleton_has_fields_and_button() {
        let skeleton = Skeleton::new(
            SectionId::from_static("contact"),
            SkeletonShape::Form { fields: 3 },
            560.0,
        );
        let html = skeleton.render();
        assert_eq!(html.as_str().matches("skeleton-field").count(), 3);
        assert!(html.contains("skeleton-button"));
    }

    #[test]
    fn page_skeleton_sums_heights() {
        let page = PageSkeleton::new(
            64.0,
            vec![
                Skeleton::new(SectionId::from_static("hero"), SkeletonShape::Hero, 720.0),
                Skeleton::new(SectionId::from_static("about"), SkeletonShape::Lines { count: 4 }, 480.0),
            ],
        );
        assert!((page.min_height() - 1264.0).abs() < f32::EPSILON);
        assert!(page.render().contains("aria-label=\"Loading page\""));
    }
}
