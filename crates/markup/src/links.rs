//! Anchor and id extraction from rendered markup
//!
//! Uses html5ever to parse a rendered page back into a tree, then walks it
//! collecting every `a[href]` together with the set of element ids so that
//! callers can check internal links and fragment targets.

use anyhow::Result;
use html5ever::tendril::TendrilSink as _;
use html5ever::tree_builder::TreeBuilderOpts;
use html5ever::{ParseOpts, parse_document};
use markup5ever_rcdom::{Handle, NodeData, RcDom};
use std::collections::HashSet;

/// A single anchor found in the document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Anchor {
    /// Raw `href` attribute value
    pub href: String,
    /// Concatenated, whitespace-trimmed text content
    pub text: String,
}

/// Anchors and element ids of one rendered document.
#[derive(Clone, Debug, Default)]
pub struct LinkIndex {
    /// Anchors in document order
    pub anchors: Vec<Anchor>,
    /// Every `id` attribute value
    pub ids: HashSet<String>,
}

impl LinkIndex {
    /// Whether an element with this id exists
    #[inline]
    pub fn has_id(&self, id: &str) -> bool {
        self.ids.contains(id)
    }
}

fn collect_text(handle: &Handle, out: &mut String) {
    match &handle.data {
        NodeData::Text { contents } => out.push_str(&contents.borrow()),
        NodeData::Element { .. } | NodeData::Document => {
            for child in handle.children.borrow().iter() {
                collect_text(child, out);
            }
        }
        _ => {}
    }
}

fn walk_tree(handle: &Handle, index: &mut LinkIndex) {
    match &handle.data {
        NodeData::Element { name, attrs, .. } => {
            let mut href = None;
            for attr in attrs.borrow().iter() {
                match &*attr.name.local {
                    "id" => {
                        index.ids.insert(attr.value.to_string());
                    }
                    "href" if &*name.local == "a" => href = Some(attr.value.to_string()),
                    _ => {}
                }
            }
            if let Some(href) = href {
                let mut label = String::new();
                collect_text(handle, &mut label);
                index.anchors.push(Anchor {
                    href,
                    text: label.trim().to_owned(),
                });
            }
            for child in handle.children.borrow().iter() {
                walk_tree(child, index);
            }
        }
        NodeData::Document => {
            for child in handle.children.borrow().iter() {
                walk_tree(child, index);
            }
        }
        _ => {
            // Text, comments and doctypes carry no links.
        }
    }
}

/// Parse rendered markup and index its anchors and ids.
///
/// # Errors
/// Returns an error if the parser cannot read the input
pub fn index_links(html: &str) -> Result<LinkIndex> {
    let opts = ParseOpts {
        tree_builder: TreeBuilderOpts {
            exact_errors: false,
            scripting_enabled: false,
            ..TreeBuilderOpts::default()
        },
        ..ParseOpts::default()
    };

    let dom = parse_document(RcDom::default(), opts)
        .from_utf8()
        .read_from(&mut html.as_bytes())?;

    let mut index = LinkIndex::default();
    walk_tree(&dom.document, &mut index);
    log::debug!(
        "index_links: {} anchors, {} ids",
        index.anchors.len(),
        index.ids.len()
    );
    Ok(index)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collects_anchors_and_ids() -> Result<()> {
        let html = r##"
            <nav><a href="/portfolio"> Our <b>work</b> </a><a href="#contact">Contact</a></nav>
            <section id="contact"><a name="no-href">skip</a></section>
        "##;
        let index = index_links(html)?;
        assert_eq!(index.anchors.len(), 2);
        assert_eq!(index.anchors[0].href, "/portfolio");
        assert_eq!(index.anchors[0].text, "Our work");
        assert_eq!(index.anchors[1].href, "#contact");
        assert!(index.has_id("contact"));
        assert!(!index.has_id("pricing"));
        Ok(())
    }
}
