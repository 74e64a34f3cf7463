//! `scraper`-backed implementation of the document tree.

use std::ops::Deref;

use scraper::{ElementRef, Html};

use crate::dom::{Content, Node};

/// A parsed HTML document.
pub struct HtmlDocument {
    html: Html,
}

impl HtmlDocument {
    /// Parses a full document; the HTML5 parser never fails, it repairs.
    pub fn parse(text: &str) -> Self {
        Self {
            html: Html::parse_document(text),
        }
    }

    /// The `<html>` element.
    pub fn root(&self) -> HtmlNode<'_> {
        HtmlNode(self.html.root_element())
    }
}

impl std::fmt::Debug for HtmlDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HtmlDocument").finish_non_exhaustive()
    }
}

/// An element of an [`HtmlDocument`].
#[derive(Debug, Clone, Copy)]
pub struct HtmlNode<'a>(ElementRef<'a>);

impl Node for HtmlNode<'_> {
    fn tag(&self) -> &str {
        self.0.value().name()
    }

    fn attr(&self, name: &str) -> Option<&str> {
        self.0.value().attr(name)
    }

    fn contents(&self) -> Vec<Content<Self>> {
        self.0
            .deref()
            .children()
            .filter_map(|child| match child.value() {
                scraper::Node::Text(text) => Some(Content::Text(String::from(&**text))),
                scraper::Node::Element(_) => {
                    ElementRef::wrap(child).map(|el| Content::Element(Self(el)))
                }
                _ => None,
            })
            .collect()
    }
}
