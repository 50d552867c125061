//! Static pages and the shared document chrome.

use crate::content::{
    COMPANY, CONTACT_EMAIL, COOKIES_POLICY, PRIVACY_POLICY, PROJECTS, Policy, REFUND_POLICY,
    TEAM, TERMS_OF_SERVICE,
};
use crate::routes::Route;
use markup::{Element, Html};

/// Wrap `body` in a complete HTML document.
pub fn document(route: &Route, body: Html) -> Html {
    let head = Element::new("head")
        .child(Element::new("meta").attr("charset", "utf-8").build())
        .child(
            Element::new("meta")
                .attr("name", "viewport")
                .attr("content", "width=device-width, initial-scale=1")
                .build(),
        )
        .child(Element::new("title").text(route.title()).build())
        .build();
    let html = Element::new("html")
        .attr("lang", "en")
        .child(head)
        .child(Element::new("body").child(body).build())
        .build();
    Html::from_iter([Html::from("<!DOCTYPE html>"), html])
}

/// Footer shared by every page.
pub fn footer() -> Html {
    let links = [
        ("/portfolio", "Portfolio"),
        ("/team", "Team"),
        ("/privacy-policy", "Privacy Policy"),
        ("/terms-of-service", "Terms of Service"),
        ("/refund-policy", "Refund Policy"),
        ("/cookies-policy", "Cookies Policy"),
    ]
    .into_iter()
    .map(|(href, label)| {
        Element::new("li")
            .child(Element::new("a").attr("href", href).text(label).build())
            .build()
    });
    Element::new("footer")
        .class("site-footer")
        .child(Element::new("ul").class("footer-links").children(links).build())
        .child(
            Element::new("p")
                .child(
                    Element::new("a")
                        .attr("href", format!("mailto:{CONTACT_EMAIL}"))
                        .text(CONTACT_EMAIL)
                        .build(),
                )
                .build(),
        )
        .child(
            Element::new("p")
                .class("copyright")
                .text(format!("\u{a9} {COMPANY}. All rights reserved."))
                .build(),
        )
        .build()
}

/// Simple header for pages other than home.
fn page_header(title: &str) -> Html {
    Element::new("header")
        .class("page-header")
        .child(
            Element::new("a")
                .class("brand")
                .attr("href", "/")
                .text(COMPANY)
                .build(),
        )
        .child(Element::new("h1").text(title).build())
        .build()
}

fn policy(title: &str, sections: &[Policy]) -> Html {
    let body = sections.iter().map(|section| {
        Element::new("section")
            .child(Element::new("h2").text(section.heading).build())
            .child(Element::new("p").text(section.body).build())
            .build()
    });
    Html::from_iter([
        page_header(title),
        Element::new("article").class("policy").children(body).build(),
    ])
}

fn portfolio() -> Html {
    let projects = PROJECTS.iter().map(|project| {
        Element::new("article")
            .class("card")
            .id(project.slug)
            .child(Element::new("span").class("badge").text(project.category).build())
            .child(Element::new("h2").text(project.title).build())
            .child(Element::new("p").text(project.summary).build())
            .build()
    });
    Html::from_iter([
        page_header("Our work"),
        Element::new("div").class("cards").children(projects).build(),
        Element::new("a")
            .class("button button-primary")
            .attr("href", "/#contact")
            .text("Start your project")
            .build(),
    ])
}

fn team() -> Html {
    let members = TEAM.iter().map(|member| {
        Element::new("article")
            .class("card")
            .child(Element::new("h2").text(member.name).build())
            .child(Element::new("p").text(member.role).build())
            .build()
    });
    Html::from_iter([
        page_header("Meet the team"),
        Element::new("div").class("cards").children(members).build(),
    ])
}

fn not_found(path: &str) -> Html {
    Html::from_iter([
        page_header("Page not found"),
        Element::new("p")
            .class("not-found")
            .text(format!("Nothing lives at {path}."))
            .build(),
        Element::new("a")
            .class("button")
            .attr("href", "/")
            .text("Back to home")
            .build(),
    ])
}

/// Body of a page that needs no deferred loading. `None` for the home page.
pub fn static_body(route: &Route) -> Option<Html> {
    let content = match route {
        Route::Home => return None,
        Route::Portfolio => portfolio(),
        Route::Team => team(),
        Route::PrivacyPolicy => policy("Privacy Policy", PRIVACY_POLICY),
        Route::TermsOfService => policy("Terms of Service", TERMS_OF_SERVICE),
        Route::RefundPolicy => policy("Refund Policy", REFUND_POLICY),
        Route::CookiesPolicy => policy("Cookies Policy", COOKIES_POLICY),
        Route::NotFound(path) => not_found(path),
    };
    Some(
        Element::new("main")
            .class("page")
            .child(content)
            .child(footer())
            .build(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_static_route_renders() {
        for route in Route::KNOWN.iter().filter(|route| **route != Route::Home) {
            let body = static_body(route);
            assert!(body.is_some_and(|html| html.contains("site-footer")), "{route}");
        }
        assert!(static_body(&Route::Home).is_none());
    }

    #[test]
    fn not_found_echoes_path_escaped() {
        let body = static_body(&Route::NotFound("/<x>".to_owned())).unwrap_or_default();
        assert!(body.contains("Nothing lives at /&lt;x&gt;."));
        let page = document(&Route::NotFound("/x".to_owned()), body);
        assert!(page.as_str().starts_with("<!DOCTYPE html>"));
        assert!(page.contains("<title>Page Not Found | Northwind Studio</title>"));
    }
}
