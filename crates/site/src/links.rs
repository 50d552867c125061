//! Development-only link integrity check.
//!
//! Parses rendered markup, resolves every anchor against the page's URL and
//! reports internal links that would land on the 404 page or on a fragment
//! with no matching element id.

use crate::config::BuildMode;
use crate::routes::Route;
use anyhow::Result;
use markup::{Html, index_links};

/// A broken link found in rendered markup.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LinkIssue {
    /// Internal path with no route
    UnknownRoute { href: String },
    /// Fragment on this page with no element carrying that id
    MissingAnchor { href: String, id: String },
    /// `href` that is not a valid URL reference
    Malformed { href: String },
}

/// Check every anchor in `html`, rendered for `page`.
///
/// # Errors
/// Returns an error if the page URL cannot be built or the markup cannot be
/// parsed
pub fn check_links(page: &Route, html: &Html) -> Result<Vec<LinkIssue>> {
    let index = index_links(html.as_str())?;
    let base = page.url()?;
    let mut issues = Vec::new();
    for anchor in &index.anchors {
        let href = anchor.href.trim();
        if href.is_empty() {
            continue;
        }
        let Ok(url) = Route::resolve(&base, href) else {
            issues.push(LinkIssue::Malformed {
                href: href.to_owned(),
            });
            continue;
        };
        if url.origin() != base.origin() {
            continue;
        }
        let target = Route::from_url(&url);
        if target.is_not_found() {
            issues.push(LinkIssue::UnknownRoute {
                href: href.to_owned(),
            });
            continue;
        }
        let missing = url
            .fragment()
            .filter(|id| !id.is_empty() && target == *page && !index.has_id(id));
        if let Some(id) = missing {
            issues.push(LinkIssue::MissingAnchor {
                href: href.to_owned(),
                id: id.to_owned(),
            });
        }
    }
    Ok(issues)
}

/// Run [`check_links`] in development builds and log what it finds.
/// Production builds skip the check entirely.
pub fn warn_on_broken_links(mode: BuildMode, page: &Route, html: &Html) -> Vec<LinkIssue> {
    if !mode.is_development() {
        return Vec::new();
    }
    match check_links(page, html) {
        Ok(issues) => {
            for issue in &issues {
                log::warn!("{page}: broken link {issue:?}");
            }
            issues
        }
        Err(err) => {
            log::warn!("{page}: link check skipped: {err:#}");
            Vec::new()
        }
    }
}
