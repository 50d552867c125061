//! Path-based routing.

use anyhow::{Context as _, Result};
use core::fmt;
use url::Url;

/// Origin used to resolve relative links during checks.
pub const SITE_ORIGIN: &str = "https://agency.example/";

/// A page of the site. Unknown paths map to [`Route::NotFound`].
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Route {
    Home,
    Portfolio,
    Team,
    PrivacyPolicy,
    TermsOfService,
    RefundPolicy,
    CookiesPolicy,
    /// Catch-all; carries the requested path
    NotFound(String),
}

impl Route {
    /// Every routable page, in navigation order.
    pub const KNOWN: [Self; 7] = [
        Self::Home,
        Self::Portfolio,
        Self::Team,
        Self::PrivacyPolicy,
        Self::TermsOfService,
        Self::RefundPolicy,
        Self::CookiesPolicy,
    ];

    /// Route for a request path. Query strings, fragments and a trailing
    /// slash are ignored.
    pub fn from_path(raw: &str) -> Self {
        let path = raw
            .split(['?', '#'])
            .next()
            .unwrap_or_default();
        let trimmed = path.trim_end_matches('/');
        match trimmed {
            "" => Self::Home,
            "/portfolio" => Self::Portfolio,
            "/team" => Self::Team,
            "/privacy-policy" => Self::PrivacyPolicy,
            "/terms-of-service" => Self::TermsOfService,
            "/refund-policy" => Self::RefundPolicy,
            "/cookies-policy" => Self::CookiesPolicy,
            _ => Self::NotFound(path.to_owned()),
        }
    }

    /// Route for an absolute URL on this site.
    pub fn from_url(url: &Url) -> Self {
        Self::from_path(url.path())
    }

    /// Resolve `href` against the page at `base`.
    ///
    /// # Errors
    /// Returns an error if `href` cannot be joined to `base`
    pub fn resolve(base: &Url, href: &str) -> Result<Url> {
        base.join(href)
            .with_context(|| format!("cannot resolve {href:?} against {base}"))
    }

    /// Canonical path.
    pub fn path(&self) -> &str {
        match self {
            Self::Home => "/",
            Self::Portfolio => "/portfolio",
            Self::Team => "/team",
            Self::PrivacyPolicy => "/privacy-policy",
            Self::TermsOfService => "/terms-of-service",
            Self::RefundPolicy => "/refund-policy",
            Self::CookiesPolicy => "/cookies-policy",
            Self::NotFound(path) => path,
        }
    }

    /// Document title.
    pub fn title(&self) -> &'static str {
        match self {
            Self::Home => "Northwind Studio | Digital Agency",
            Self::Portfolio => "Portfolio | Northwind Studio",
            Self::Team => "Our Team | Northwind Studio",
            Self::PrivacyPolicy => "Privacy Policy | Northwind Studio",
            Self::TermsOfService => "Terms of Service | Northwind Studio",
            Self::RefundPolicy => "Refund Policy | Northwind Studio",
            Self::CookiesPolicy => "Cookies Policy | Northwind Studio",
            Self::NotFound(_) => "Page Not Found | Northwind Studio",
        }
    }

    /// Absolute URL of this route on the site origin.
    ///
    /// # Errors
    /// Returns an error if the path does not form a valid URL
    pub fn url(&self) -> Result<Url> {
        let origin = Url::parse(SITE_ORIGIN).context("site origin")?;
        Self::resolve(&origin, self.path())
    }

    #[inline]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

impl fmt::Display for Route {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.path())
    }
}
