//! Read-only document tree used by the parsing stages.
//!
//! The stages only need tag names, attributes, ordered contents and text, so
//! they are written against [`Node`]. The `scraper` adapter in
//! [`html`](crate::html) implements it for real documents; [`Element`] is an
//! owned tree that tests build directly from literal fixtures.

/// One item of an element's ordered contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content<N> {
    Text(String),
    Element(N),
}

/// An element in a read-only markup tree.
pub trait Node: Sized + Clone {
    /// Lower-case tag name.
    fn tag(&self) -> &str;

    fn attr(&self, name: &str) -> Option<&str>;

    /// Direct children in document order, text included.
    fn contents(&self) -> Vec<Content<Self>>;

    /// Direct element children in document order.
    fn children(&self) -> Vec<Self> {
        self.contents()
            .into_iter()
            .filter_map(|c| match c {
                Content::Element(el) => Some(el),
                Content::Text(_) => None,
            })
            .collect()
    }

    /// Concatenated text of the whole subtree.
    fn text(&self) -> String {
        let mut out = String::new();
        collect_text(self, &mut out);
        out
    }

    fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .is_some_and(|c| c.split_whitespace().any(|c| c == class))
    }

    /// First descendant (depth-first, excluding `self`) matching `pred`.
    fn find(&self, pred: &dyn Fn(&Self) -> bool) -> Option<Self> {
        for child in self.children() {
            if pred(&child) {
                return Some(child);
            }
            if let Some(found) = child.find(pred) {
                return Some(found);
            }
        }
        None
    }

    /// All descendants matching `pred`, in document order.
    fn find_all(&self, pred: &dyn Fn(&Self) -> bool) -> Vec<Self> {
        let mut out = Vec::new();
        collect_matching(self, pred, &mut out);
        out
    }

    fn find_tag(&self, tag: &str) -> Option<Self> {
        self.find(&|n: &Self| n.tag() == tag)
    }

    fn find_all_tag(&self, tag: &str) -> Vec<Self> {
        self.find_all(&|n: &Self| n.tag() == tag)
    }

    /// First text in the subtree that is not blank, trimmed.
    fn first_text(&self) -> Option<String> {
        for content in self.contents() {
            match content {
                Content::Text(t) if !t.trim().is_empty() => return Some(t.trim().to_string()),
                Content::Text(_) => {}
                Content::Element(el) => {
                    if let Some(t) = el.first_text() {
                        return Some(t);
                    }
                }
            }
        }
        None
    }
}

fn collect_text<N: Node>(node: &N, out: &mut String) {
    for content in node.contents() {
        match content {
            Content::Text(t) => out.push_str(&t),
            Content::Element(el) => collect_text(&el, out),
        }
    }
}

fn collect_matching<N: Node>(node: &N, pred: &dyn Fn(&N) -> bool, out: &mut Vec<N>) {
    for child in node.children() {
        if pred(&child) {
            out.push(child.clone());
        }
        collect_matching(&child, pred, out);
    }
}

/// Collapses runs of whitespace into single spaces and trims.
pub fn normalize_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Owned element tree for building fixtures.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    tag: String,
    attrs: Vec<(String, String)>,
    contents: Vec<Content<Element>>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into().to_ascii_lowercase(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push((name.into(), value.into()));
        self
    }

    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.contents.push(Content::Text(text.into()));
        self
    }

    #[must_use]
    pub fn with_child(mut self, child: Self) -> Self {
        self.contents.push(Content::Element(child));
        self
    }

    #[must_use]
    pub fn with_children(mut self, children: impl IntoIterator<Item = Self>) -> Self {
        self.contents
            .extend(children.into_iter().map(Content::Element));
        self
    }
}

impl<'a> Node for &'a Element {
    fn tag(&self) -> &str {
        &self.tag
    }

    fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    fn contents(&self) -> Vec<Content<Self>> {
        let element: &'a Element = *self;
        element
            .contents
            .iter()
            .map(|c| match c {
                Content::Text(t) => Content::Text(t.clone()),
                Content::Element(el) => Content::Element(el),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixture() -> Element {
        Element::new("div")
            .with_attr("class", "outer wide")
            .with_text("\n  ")
            .with_child(Element::new("img").with_attr("title", "Dogodek"))
            .with_child(
                Element::new("span")
                    .with_text("Hello ")
                    .with_child(Element::new("em").with_text("world")),
            )
            .with_text(" tail")
    }

    #[test]
    fn children_skip_text() {
        let root = fixture();
        let tags: Vec<_> = (&root)
            .children()
            .iter()
            .map(|c| c.tag().to_string())
            .collect();
        assert_eq!(tags, ["img", "span"]);
    }

    #[test]
    fn text_concatenates_subtree() {
        let root = fixture();
        assert_eq!(normalize_ws(&(&root).text()), "Hello world tail");
        assert_eq!((&root).first_text().as_deref(), Some("Hello"));
    }

    #[test]
    fn find_is_depth_first() {
        let root = fixture();
        let em = (&root).find_tag("em").unwrap();
        assert_eq!(em.text(), "world");
        assert!((&root).find_tag("table").is_none());
        assert_eq!((&root).find_all_tag("span").len(), 1);
    }

    #[test]
    fn class_and_attr_lookup() {
        let root = fixture();
        assert!((&root).has_class("wide"));
        assert!(!(&root).has_class("narrow"));
        let img = (&root).find_tag("img").unwrap();
        assert_eq!(img.attr("title"), Some("Dogodek"));
        assert_eq!(img.attr("alt"), None);
    }
}
