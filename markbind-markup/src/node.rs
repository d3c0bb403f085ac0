//! Markup node tree.
//!
//! A parsed document is a single root [`MarkupNode`] that exclusively owns its
//! children. Attribute values are kept as the raw strings found in the markup.

use crate::error::ParseError;
use std::collections::BTreeMap;

/// Reserved attribute identifying a bindable element.
pub const NAME_ATTRIBUTE: &str = "name";

/// One element of a parsed markup document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkupNode {
    /// Element type name, without namespace prefix.
    pub tag: String,
    /// Namespace prefix as written (`ui` for `ui:Button`).
    pub prefix: Option<String>,
    /// Raw attribute values keyed by attribute name.
    pub attributes: BTreeMap<String, String>,
    /// Child elements in document order.
    pub children: Vec<MarkupNode>,
}

impl MarkupNode {
    /// Creates a node with no attributes and no children.
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            prefix: None,
            attributes: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    /// Sets an attribute, replacing any previous value.
    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attribute(key, value);
        self
    }

    /// Appends a child element.
    #[must_use]
    pub fn with_child(mut self, child: MarkupNode) -> Self {
        self.children.push(child);
        self
    }

    /// Sets an attribute. The last write for a key wins.
    pub fn set_attribute(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.attributes.insert(key.into(), value.into());
    }

    /// Returns the raw value of an attribute.
    #[must_use]
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// Returns the value of the reserved `name` attribute.
    #[must_use]
    pub fn declared_name(&self) -> Option<&str> {
        self.attribute(NAME_ATTRIBUTE)
    }

    /// Returns true if the node carries a non-empty declared name.
    #[must_use]
    pub fn has_name(&self) -> bool {
        self.declared_name().is_some_and(|name| !name.is_empty())
    }

    /// Returns the tag as written in markup, including its prefix.
    #[must_use]
    pub fn qualified_tag(&self) -> String {
        match &self.prefix {
            Some(prefix) => format!("{}:{}", prefix, self.tag),
            None => self.tag.clone(),
        }
    }

    /// Interprets an attribute as a truth string.
    ///
    /// Absence reads as `false`. Values are compared case-insensitively after
    /// trimming whitespace.
    ///
    /// # Errors
    /// Returns `ParseError::InvalidAttribute` if the value is neither `true`
    /// nor `false`.
    pub fn bool_attribute(&self, key: &str) -> Result<bool, ParseError> {
        let Some(raw) = self.attribute(key) else {
            return Ok(false);
        };

        let value = raw.trim();
        if value.eq_ignore_ascii_case("true") {
            Ok(true)
        } else if value.eq_ignore_ascii_case("false") {
            Ok(false)
        } else {
            Err(ParseError::invalid_attr(self.qualified_tag(), key, raw))
        }
    }

    /// Iterates over all descendants in depth-first pre-order.
    ///
    /// The node itself is not yielded.
    #[must_use]
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants {
            stack: self.children.iter().rev().collect(),
        }
    }
}

/// Pre-order iterator over the descendants of a [`MarkupNode`].
#[derive(Debug, Clone)]
pub struct Descendants<'a> {
    stack: Vec<&'a MarkupNode>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a MarkupNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tree() -> MarkupNode {
        MarkupNode::new("UXML")
            .with_child(
                MarkupNode::new("VisualElement")
                    .with_attribute("name", "Container")
                    .with_child(MarkupNode::new("Label").with_attribute("name", "Title"))
                    .with_child(MarkupNode::new("Button")),
            )
            .with_child(MarkupNode::new("Toggle").with_attribute("name", "Enabled"))
    }

    #[test]
    fn test_descendants_pre_order() {
        let root = sample_tree();
        let tags: Vec<&str> = root.descendants().map(|n| n.tag.as_str()).collect();
        assert_eq!(tags, vec!["VisualElement", "Label", "Button", "Toggle"]);
    }

    #[test]
    fn test_descendants_excludes_root() {
        let root = MarkupNode::new("UXML").with_attribute("name", "Root");
        assert_eq!(root.descendants().count(), 0);
    }

    #[test]
    fn test_has_name() {
        assert!(MarkupNode::new("Label").with_attribute("name", "A").has_name());
        assert!(!MarkupNode::new("Label").with_attribute("name", "").has_name());
        assert!(!MarkupNode::new("Label").has_name());
    }

    #[test]
    fn test_set_attribute_last_write_wins() {
        let node = MarkupNode::new("Label")
            .with_attribute("name", "First")
            .with_attribute("name", "Second");
        assert_eq!(node.declared_name(), Some("Second"));
        assert_eq!(node.attributes.len(), 1);
    }

    #[test]
    fn test_bool_attribute() {
        let node = MarkupNode::new("UXML")
            .with_attribute("a", "True")
            .with_attribute("b", " false ")
            .with_attribute("c", "yes");

        assert!(node.bool_attribute("a").expect("valid"));
        assert!(!node.bool_attribute("b").expect("valid"));
        assert!(!node.bool_attribute("missing").expect("absent is false"));
        assert!(matches!(
            node.bool_attribute("c"),
            Err(ParseError::InvalidAttribute { .. })
        ));
    }

    #[test]
    fn test_qualified_tag() {
        let mut node = MarkupNode::new("Button");
        assert_eq!(node.qualified_tag(), "Button");
        node.prefix = Some("ui".to_string());
        assert_eq!(node.qualified_tag(), "ui:Button");
    }
}
