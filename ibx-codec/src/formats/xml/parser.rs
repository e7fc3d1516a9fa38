//! XML text → Document
//!
//! Parsing happens in two passes over the roxmltree DOM. The first checks the
//! document shape and turns any deviation into a passthrough; the second
//! builds the tree and fails on values that cannot be represented.

use roxmltree::{Node, ParsingOptions};
use tracing::{debug, trace};

use super::{PROPERTY_TAG, TBYTE_ATTR};
use crate::error::{CodecError, PassthroughReason, Result};
use crate::format::Parsed;
use crate::tree::{Document, Element, Property, MAX_DEPTH};
use crate::value::{Scalar, TypedValue, UNKNOWN_TYPE};

/// Parse raw bytes, which must be UTF-8.
pub fn parse_bytes(source: &[u8]) -> Result<Parsed> {
    let text = std::str::from_utf8(source)
        .map_err(|e| CodecError::Xml(format!("input is not valid UTF-8: {e}")))?;
    parse_document(text)
}

pub fn parse_document(source: &str) -> Result<Parsed> {
    let source = source.strip_prefix('\u{feff}').unwrap_or(source);
    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    let xml = roxmltree::Document::parse_with_options(source, options)
        .map_err(|e| CodecError::Xml(e.to_string()))?;

    let root = xml.root_element();
    if let Some(reason) = check_shape(root)? {
        debug!(%reason, "XML does not describe an IBX1 document, passing through");
        return Ok(Parsed::Passthrough(reason));
    }
    Ok(Parsed::Document(Document::new(build_element(root)?)))
}

fn non_conformant(element: &str, reason: impl Into<String>) -> PassthroughReason {
    PassthroughReason::NonConformantDocument {
        element: element.to_string(),
        reason: reason.into(),
    }
}

/// Name as written in the source, prefix included.
fn qualified_name(node: Node<'_, '_>) -> String {
    let tag = node.tag_name();
    match tag.namespace().and_then(|uri| node.lookup_prefix(uri)) {
        Some(prefix) if !prefix.is_empty() => format!("{prefix}:{}", tag.name()),
        _ => tag.name().to_string(),
    }
}

/// Walk the element tree in document order and report the first deviation
/// from the element/property schema.
///
/// Nesting is bounded here so the recursive build that follows stays within
/// [`MAX_DEPTH`] levels.
fn check_shape(root: Node<'_, '_>) -> Result<Option<PassthroughReason>> {
    let mut stack = vec![(root, 1)];
    while let Some((node, depth)) = stack.pop() {
        if node.namespaces().next().is_some() {
            return Ok(Some(non_conformant(
                &qualified_name(node),
                "namespace declaration",
            )));
        }
        if node.tag_name().namespace().is_some() {
            return Ok(Some(non_conformant(
                &qualified_name(node),
                "namespaced element name",
            )));
        }
        let name = node.tag_name().name();
        if name == PROPERTY_TAG {
            if depth == 1 {
                return Ok(Some(non_conformant(name, "root element is a property")));
            }
            if node.children().any(|child| child.is_element()) {
                return Ok(Some(non_conformant(name, "property has element children")));
            }
            continue;
        }
        if depth > MAX_DEPTH {
            return Err(CodecError::NestingTooDeep { limit: MAX_DEPTH });
        }
        if let Some(attribute) = node.attributes().next() {
            return Ok(Some(non_conformant(
                name,
                format!("unexpected attribute '{}'", attribute.name()),
            )));
        }
        stack.extend(
            node.children()
                .filter(|child| child.is_element())
                .rev()
                .map(|child| (child, depth + 1)),
        );
    }
    Ok(None)
}

fn build_element(node: Node<'_, '_>) -> Result<Element> {
    let mut element = Element::new(node.tag_name().name());
    trace!(name = element.name.as_str(), "element");
    for child in node.children().filter(|child| child.is_element()) {
        if child.tag_name().name() == PROPERTY_TAG {
            element.properties.push(build_property(child)?);
        } else {
            element.children.push(build_element(child)?);
        }
    }
    Ok(element)
}

fn build_property(node: Node<'_, '_>) -> Result<Property> {
    let name = required_attribute(node, "name")?;
    let declared = required_attribute(node, "type")?;
    let value = if declared == UNKNOWN_TYPE {
        let raw = required_attribute(node, TBYTE_ATTR)?;
        parse_tbyte(raw)
            .filter(|byte| !TypedValue::is_known_discriminant(*byte))
            .map(Scalar::Unknown)
            .ok_or_else(|| CodecError::InvalidValue {
                ty: UNKNOWN_TYPE.to_string(),
                value: raw.to_string(),
            })?
    } else {
        Scalar::parse(declared, node.attribute("value").unwrap_or(""))?
    };
    trace!(name, kind = value.type_name(), "property");
    Ok(Property::new(name, value))
}

fn required_attribute<'a>(node: Node<'a, '_>, attribute: &str) -> Result<&'a str> {
    node.attribute(attribute)
        .ok_or_else(|| CodecError::MissingAttribute {
            element: node.tag_name().name().to_string(),
            attribute: attribute.to_string(),
        })
}

/// `0x`-prefixed hex or plain decimal.
fn parse_tbyte(raw: &str) -> Option<u8> {
    let raw = raw.trim();
    match raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
        Some(hex) => u8::from_str_radix(hex, 16).ok(),
        None => raw.parse().ok(),
    }
}
