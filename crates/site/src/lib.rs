//! Marketing site for a small digital agency.
//!
//! Routes map to pages; the home page stacks its sections under a fixed
//! navbar and defers everything below the hero through `page_loader`.
//! [`headless::render_route`] drives a page to completion without a browser.

pub mod config;
pub mod contact;
pub mod content;
pub mod headless;
pub mod home;
pub mod links;
pub mod navbar;
pub mod pages;
pub mod routes;
pub mod sections;

pub use config::{BuildMode, SiteConfig};
pub use contact::{ContactDraft, ContactForm, Field, FieldErrors, SubmitOutcome, Toast};
pub use headless::{RenderReport, render_route};
pub use home::{Effects, HomePage};
pub use links::{LinkIssue, check_links};
pub use navbar::{NavKey, Navbar};
pub use routes::Route;
pub use sections::{SectionCatalog, SectionKind};
