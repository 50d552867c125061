//! HTML representation for rendered page fragments

use core::fmt;

/// Elements that never carry children or a closing tag.
const VOID_ELEMENTS: &[&str] = &["br", "hr", "img", "input", "link", "meta"];

/// Represents HTML content that can be rendered
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Html {
    /// Raw HTML string
    content: String,
}

impl Html {
    /// Create HTML from already-escaped markup
    #[inline]
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }

    /// Create empty HTML
    #[inline]
    pub const fn empty() -> Self {
        Self {
            content: String::new(),
        }
    }

    /// Whether no markup has been produced
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Borrow the raw markup
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.content
    }

    /// Consume into the raw markup string
    #[inline]
    pub fn into_string(self) -> String {
        self.content
    }

    /// Append another fragment
    #[inline]
    pub fn push(&mut self, other: &Self) {
        self.content.push_str(&other.content);
    }

    /// Whether the markup contains the given substring
    #[inline]
    pub fn contains(&self, needle: &str) -> bool {
        self.content.contains(needle)
    }
}

impl From<String> for Html {
    #[inline]
    fn from(content: String) -> Self {
        Self::new(content)
    }
}

impl From<&str> for Html {
    #[inline]
    fn from(content: &str) -> Self {
        Self::new(content)
    }
}

impl FromIterator<Html> for Html {
    fn from_iter<I: IntoIterator<Item = Html>>(iter: I) -> Self {
        let mut out = Self::empty();
        for fragment in iter {
            out.push(&fragment);
        }
        out
    }
}

impl fmt::Display for Html {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(&self.content)
    }
}

/// Escape text content for placement between tags.
pub fn escape_text(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Escape a value for a double-quoted attribute.
pub fn escape_attr(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Escaped text node.
#[inline]
pub fn text(raw: &str) -> Html {
    Html::new(escape_text(raw))
}

/// Builder for a single element and its children.
///
/// Attribute values and `text` children are escaped; `child` fragments are
/// trusted markup produced by other builders.
#[derive(Clone, Debug)]
pub struct Element {
    tag: &'static str,
    attrs: Vec<(&'static str, String)>,
    children: Vec<Html>,
}

impl Element {
    /// Start an element with the given tag name
    #[inline]
    pub const fn new(tag: &'static str) -> Self {
        Self {
            tag,
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Set an attribute
    #[must_use]
    pub fn attr(mut self, name: &'static str, value: impl AsRef<str>) -> Self {
        self.attrs.push((name, escape_attr(value.as_ref())));
        self
    }

    /// Set the `class` attribute
    #[must_use]
    pub fn class(self, value: impl AsRef<str>) -> Self {
        self.attr("class", value)
    }

    /// Set the `id` attribute
    #[must_use]
    pub fn id(self, value: impl AsRef<str>) -> Self {
        self.attr("id", value)
    }

    /// Append an escaped text child
    #[must_use]
    pub fn text(mut self, raw: impl AsRef<str>) -> Self {
        self.children.push(text(raw.as_ref()));
        self
    }

    /// Append a markup child
    #[must_use]
    pub fn child(mut self, child: Html) -> Self {
        self.children.push(child);
        self
    }

    /// Append several markup children
    #[must_use]
    pub fn children(mut self, children: impl IntoIterator<Item = Html>) -> Self {
        self.children.extend(children);
        self
    }

    /// Serialize the element
    pub fn build(self) -> Html {
        let mut out = String::from("<");
        out.push_str(self.tag);
        for (name, value) in &self.attrs {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            out.push_str(value);
            out.push('"');
        }
        out.push('>');
        if VOID_ELEMENTS.contains(&self.tag) {
            return Html::new(out);
        }
        for child in &self.children {
            out.push_str(child.as_str());
        }
        out.push_str("</");
        out.push_str(self.tag);
        out.push('>');
        Html::new(out)
    }
}

impl From<Element> for Html {
    #[inline]
    fn from(element: Element) -> Self {
        element.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_escapes_attributes_and_text() {
        let html = Element::new("a")
            .attr("href", "/team?x=\"1\"")
            .text("Tom & Jerry <3")
            .build();
        assert_eq!(
            html.as_str(),
            "<a href=\"/team?x=&quot;1&quot;\">Tom &amp; Jerry &lt;3</a>"
        );
    }

    #[test]
    fn void_elements_have_no_closing_tag() {
        let html = Element::new("input").attr("name", "email").build();
        assert_eq!(html.as_str(), "<input name=\"email\">");
    }

    #[test]
    fn fragments_concatenate_in_order() {
        let joined: Html = ["<p>a</p>", "<p>b</p>"].into_iter().map(Html::from).collect();
        assert_eq!(joined.as_str(), "<p>a</p><p>b</p>");
    }
}
