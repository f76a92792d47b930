//! Owned snapshot of a rendered chat tree.
//!
//! Hosts serialize whatever they render into this shape (JSON: strings are
//! text nodes, objects are elements) and the extractor queries it with
//! [`Selector`]s.

use crate::selector::Selector;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DomNode {
    Text(String),
    Element(Element),
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Element {
    pub tag: String,
    /// All attributes, including `id` and `class`.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<DomNode>,
}

impl DomNode {
    pub fn text_content(&self) -> String {
        match self {
            DomNode::Text(text) => text.clone(),
            DomNode::Element(element) => element.text_content(),
        }
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            DomNode::Element(element) => Some(element),
            DomNode::Text(_) => None,
        }
    }
}

impl From<Element> for DomNode {
    fn from(element: Element) -> Self {
        DomNode::Element(element)
    }
}

impl From<&str> for DomNode {
    fn from(text: &str) -> Self {
        DomNode::Text(text.to_string())
    }
}

impl From<String> for DomNode {
    fn from(text: String) -> Self {
        DomNode::Text(text)
    }
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn with_id(self, id: impl Into<String>) -> Self {
        self.with_attr("id", id)
    }

    /// Append a class to the `class` attribute.
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        let class = class.into();
        match self.attributes.get_mut("class") {
            Some(existing) if !existing.is_empty() => {
                existing.push(' ');
                existing.push_str(&class);
            }
            _ => {
                self.attributes.insert("class".to_string(), class);
            }
        }
        self
    }

    pub fn with_child(mut self, child: impl Into<DomNode>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.with_child(DomNode::Text(text.into()))
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn id(&self) -> Option<&str> {
        self.attr("id")
    }

    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.attr("class").unwrap_or_default().split_whitespace()
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes().any(|c| c == class)
    }

    /// Concatenated text of every descendant text node, in document order.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.push_text(&mut out);
        out
    }

    fn push_text(&self, out: &mut String) {
        for child in &self.children {
            match child {
                DomNode::Text(text) => out.push_str(text),
                DomNode::Element(element) => element.push_text(out),
            }
        }
    }

    /// First descendant matching `selector`, in document order.
    ///
    /// `self` is never a candidate but does count as an ancestor, so
    /// `.wrapper img` matches an `img` directly under a `.wrapper` root.
    pub fn query_selector(&self, selector: &Selector) -> Option<&Element> {
        let mut found = Vec::with_capacity(1);
        let mut ancestors = vec![self];
        self.collect(selector, &mut ancestors, &mut found, true);
        found.into_iter().next()
    }

    /// Every descendant matching `selector`, in document order.
    pub fn query_selector_all(&self, selector: &Selector) -> Vec<&Element> {
        let mut found = Vec::new();
        let mut ancestors = vec![self];
        self.collect(selector, &mut ancestors, &mut found, false);
        found
    }

    /// Returns `true` once a match is found and `first_only` is set.
    fn collect<'a>(
        &'a self,
        selector: &Selector,
        ancestors: &mut Vec<&'a Element>,
        found: &mut Vec<&'a Element>,
        first_only: bool,
    ) -> bool {
        for child in self.children.iter().filter_map(DomNode::as_element) {
            if selector.matches(child, ancestors.as_slice()) {
                found.push(child);
                if first_only {
                    return true;
                }
            }
            ancestors.push(child);
            let done = child.collect(selector, ancestors, found, first_only);
            ancestors.pop();
            if done {
                return true;
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sel(s: &str) -> Selector {
        Selector::parse(s).unwrap()
    }

    fn sample() -> Element {
        Element::new("ol")
            .with_child(
                Element::new("li")
                    .with_class("item")
                    .with_child(Element::new("span").with_class("name").with_text("alice"))
                    .with_text(" says "),
            )
            .with_child(
                Element::new("li")
                    .with_class("item")
                    .with_child(Element::new("span").with_class("name").with_text("bob")),
            )
    }

    #[test]
    fn test_text_content_concatenates_in_order() {
        assert_eq!(sample().text_content(), "alice says bob");
    }

    #[test]
    fn test_query_selector_all_document_order() {
        let root = sample();
        let names: Vec<_> = root
            .query_selector_all(&sel(".item .name"))
            .into_iter()
            .map(Element::text_content)
            .collect();
        assert_eq!(names, vec!["alice", "bob"]);
    }

    #[test]
    fn test_query_selector_excludes_root_but_uses_it_as_ancestor() {
        let wrapper = Element::new("span")
            .with_class("emojiContainer_bae8cb")
            .with_child(Element::new("img").with_attr("alt", ":wave:"));

        assert!(wrapper.query_selector(&sel(".emojiContainer_bae8cb")).is_none());
        let img = wrapper.query_selector(&sel(".emojiContainer_bae8cb img")).unwrap();
        assert_eq!(img.attr("alt"), Some(":wave:"));
    }

    #[test]
    fn test_with_class_appends() {
        let el = Element::new("div").with_class("a").with_class("b");
        assert_eq!(el.attr("class"), Some("a b"));
        assert!(el.has_class("b"));
    }

    #[test]
    fn test_json_shape() {
        let json = r#"{"tag":"li","attributes":{"class":"item"},"children":["hi ",{"tag":"b","children":["there"]}]}"#;
        let node: DomNode = serde_json::from_str(json).unwrap();
        assert_eq!(node.text_content(), "hi there");
        assert!(node.as_element().unwrap().has_class("item"));
    }
}
