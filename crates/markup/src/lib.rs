//! Markup primitives shared by the page loader and the site.
//!
//! `Html` is the renderable value every section, skeleton and page produces.
//! `Element` builds escaped markup without a template engine, and `links`
//! parses rendered output back into anchors and ids for integrity checks.

pub mod html;
pub mod links;

pub use html::{Element, Html, escape_attr, escape_text, text};
pub use links::{Anchor, LinkIndex, index_links};
