//! UXML markup parser.
//!
//! This module turns markup text into a [`MarkupNode`] tree rooted at the
//! document element. Only element structure and attributes are kept; text,
//! comments, processing instructions and declarations are ignored.

use crate::error::ParseError;
use crate::node::MarkupNode;
use quick_xml::Reader;
use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};
use std::path::Path;

/// Parses a markup document from a string.
///
/// # Arguments
/// * `text` - Markup content
///
/// # Returns
/// The document element with its children.
///
/// # Errors
/// Returns `ParseError` if the markup is not well-formed: unbalanced or
/// mismatched tags, invalid attribute syntax, no document element, or more
/// than one document element.
pub fn parse_document(text: &str) -> Result<MarkupNode, ParseError> {
    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<MarkupNode> = Vec::new();
    let mut root: Option<MarkupNode> = None;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => {
                if stack.is_empty() && root.is_some() {
                    return Err(ParseError::structure("multiple root elements"));
                }
                stack.push(parse_element(e)?);
            }
            Ok(Event::Empty(ref e)) => {
                let node = parse_element(e)?;
                attach(&mut stack, &mut root, node)?;
            }
            Ok(Event::End(_)) => {
                let node = stack
                    .pop()
                    .ok_or_else(|| ParseError::structure("closing tag without opening tag"))?;
                attach(&mut stack, &mut root, node)?;
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(ParseError::Xml(e)),
            _ => {}
        }
        buf.clear();
    }

    if let Some(open) = stack.pop() {
        return Err(ParseError::UnclosedElement {
            element: open.qualified_tag(),
        });
    }

    root.ok_or_else(|| ParseError::structure("no root element found"))
}

/// Parses a markup document from a file.
///
/// # Errors
/// Returns `ParseError` if the file cannot be read or is not well-formed.
pub fn parse_file(path: &Path) -> Result<MarkupNode, ParseError> {
    let text = std::fs::read_to_string(path)?;
    parse_document(&text)
}

/// Places a completed node under its parent, or makes it the root.
fn attach(
    stack: &mut [MarkupNode],
    root: &mut Option<MarkupNode>,
    node: MarkupNode,
) -> Result<(), ParseError> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(node),
        None if root.is_some() => return Err(ParseError::structure("multiple root elements")),
        None => *root = Some(node),
    }
    Ok(())
}

/// Builds a childless node from a start or empty-element tag.
fn parse_element(e: &BytesStart<'_>) -> Result<MarkupNode, ParseError> {
    let name_bytes = e.name().as_ref().to_vec();
    let qualified = std::str::from_utf8(&name_bytes)?;

    let mut node = match qualified.split_once(':') {
        Some((prefix, local)) => {
            let mut node = MarkupNode::new(local);
            node.prefix = Some(prefix.to_string());
            node
        }
        None => MarkupNode::new(qualified),
    };

    // Duplicate keys are tolerated; the later value overwrites the earlier.
    let mut attributes = e.attributes();
    attributes.with_checks(false);

    for attr in attributes {
        let attr = attr?;
        let key = std::str::from_utf8(attr.key.as_ref())?;
        let raw = std::str::from_utf8(&attr.value)?;
        let value = unescape(raw)?;
        node.set_attribute(key, value.into_owned());
    }

    Ok(node)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MENU_DOCUMENT: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<ui:UXML xmlns:ui="UnityEngine.UIElements" xmlns:uie="UnityEditor.UIElements"
         editor-extension-mode="False">
    <!-- main menu -->
    <ui:VisualElement name="Container" class="menu">
        <ui:Label text="Welcome" name="Title" />
        <ui:Button text="Play" name="PlayButton" />
        <ui:VisualElement>
            <ui:Toggle name="MusicToggle" value="true" />
        </ui:VisualElement>
    </ui:VisualElement>
    <ui:Button text="Quit" name="QuitButton" />
</ui:UXML>"#;

    #[test]
    fn test_parse_root_element() {
        let root = parse_document(MENU_DOCUMENT).expect("Failed to parse");

        assert_eq!(root.tag, "UXML");
        assert_eq!(root.prefix.as_deref(), Some("ui"));
        assert_eq!(root.attribute("editor-extension-mode"), Some("False"));
        assert_eq!(root.children.len(), 2);
    }

    #[test]
    fn test_parse_nested_children() {
        let root = parse_document(MENU_DOCUMENT).expect("Failed to parse");

        let container = &root.children[0];
        assert_eq!(container.tag, "VisualElement");
        assert_eq!(container.declared_name(), Some("Container"));
        assert_eq!(container.attribute("class"), Some("menu"));
        assert_eq!(container.children.len(), 3);
        assert_eq!(container.children[2].children[0].tag, "Toggle");

        let names: Vec<&str> = root
            .descendants()
            .filter_map(MarkupNode::declared_name)
            .collect();
        assert_eq!(
            names,
            vec!["Container", "Title", "PlayButton", "MusicToggle", "QuitButton"]
        );
    }

    #[test]
    fn test_parse_is_deterministic() {
        let first = parse_document(MENU_DOCUMENT).expect("Failed to parse");
        let second = parse_document(MENU_DOCUMENT).expect("Failed to parse");
        assert_eq!(first, second);
    }

    #[test]
    fn test_parse_unprefixed_tags() {
        let root = parse_document(r#"<UXML><Label name="A"/></UXML>"#).expect("Failed to parse");
        assert_eq!(root.prefix, None);
        assert_eq!(root.children[0].tag, "Label");
    }

    #[test]
    fn test_attribute_values_are_raw_strings() {
        let root =
            parse_document(r#"<UXML><Slider name="Volume" low-value="0.5" value="1"/></UXML>"#)
                .expect("Failed to parse");
        let slider = &root.children[0];
        assert_eq!(slider.attribute("low-value"), Some("0.5"));
        assert_eq!(slider.attribute("value"), Some("1"));
    }

    #[test]
    fn test_attribute_entities_unescaped() {
        let root = parse_document(r#"<UXML><Label name="A" text="Fish &amp; Chips"/></UXML>"#)
            .expect("Failed to parse");
        assert_eq!(root.children[0].attribute("text"), Some("Fish & Chips"));
    }

    #[test]
    fn test_duplicate_attribute_last_wins() {
        let root = parse_document(r#"<UXML><Label name="First" name="Second"/></UXML>"#)
            .expect("Failed to parse");
        assert_eq!(root.children[0].declared_name(), Some("Second"));
    }

    #[test]
    fn test_mismatched_tags_rejected() {
        let result = parse_document("<UXML><VisualElement></Label></UXML>");
        assert!(result.is_err());
    }

    #[test]
    fn test_unclosed_element_rejected() {
        let result = parse_document("<UXML><VisualElement>");
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_attribute_syntax_rejected() {
        let result = parse_document(r#"<UXML><Label name=Title/></UXML>"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_empty_document_rejected() {
        let result = parse_document("<?xml version=\"1.0\"?>");
        assert!(matches!(result, Err(ParseError::InvalidStructure { .. })));
    }

    #[test]
    fn test_multiple_roots_rejected() {
        let result = parse_document("<UXML/><UXML/>");
        assert!(matches!(result, Err(ParseError::InvalidStructure { .. })));
    }
}
