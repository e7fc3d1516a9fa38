//! Document → XML text
//!
//! Element names become tags, so they must be XML names without a prefix.
//! Names and strings travel in attributes and may hold any character XML 1.0
//! allows; anything else fails the pass rather than produce unreadable text.

use super::{XmlOptions, PROPERTY_TAG, TBYTE_ATTR};
use crate::error::{CodecError, Result};
use crate::tree::{Document, Element, Property};
use crate::value::Scalar;

pub const XML_HEADER: &str = "<?xml version=\"1.0\" ?>";

const INDENT: &str = "  ";

/// Serialize a document, header included.
pub fn serialize_document(doc: &Document, options: &XmlOptions) -> Result<String> {
    doc.root.check_depth()?;
    let mut output = String::new();
    output.push_str(XML_HEADER);
    output.push('\n');
    format_element(&doc.root, 0, options, &mut output)?;
    Ok(output)
}

fn format_element(
    element: &Element,
    indent_level: usize,
    options: &XmlOptions,
    output: &mut String,
) -> Result<()> {
    let indent = INDENT.repeat(indent_level);
    let tag = &element.name;
    if !is_xml_name(tag) {
        return Err(CodecError::InvalidElementName(tag.clone()));
    }

    if element.properties.is_empty() && element.children.is_empty() {
        output.push_str(&format!("{indent}<{tag}/>\n"));
        return Ok(());
    }

    output.push_str(&format!("{indent}<{tag}>\n"));
    for property in &element.properties {
        format_property(property, indent_level + 1, options, output)?;
    }
    for child in &element.children {
        format_element(child, indent_level + 1, options, output)?;
    }
    output.push_str(&format!("{indent}</{tag}>\n"));
    Ok(())
}

fn format_property(
    property: &Property,
    indent_level: usize,
    options: &XmlOptions,
    output: &mut String,
) -> Result<()> {
    check_characters(&property.name, &property.name)?;
    if let Scalar::String(value) = &property.value {
        check_characters(value, &property.name)?;
    }
    let indent = INDENT.repeat(indent_level);
    let name = escape_xml(&property.name);
    let ty = property.value.type_name();
    match &property.value {
        Scalar::Unknown(_) => output.push_str(&format!(
            "{indent}<{PROPERTY_TAG} name=\"{name}\" type=\"{ty}\" {TBYTE_ATTR}=\"{}\"/>\n",
            property.value
        )),
        value => output.push_str(&format!(
            "{indent}<{PROPERTY_TAG} name=\"{name}\" type=\"{ty}\" value=\"{}\"/>\n",
            escape_xml(&format_value(value, options))
        )),
    }
    Ok(())
}

/// The `Char` production of XML 1.0.
fn is_xml_char(c: char) -> bool {
    matches!(c,
        '\t' | '\n' | '\r'
        | '\u{20}'..='\u{D7FF}'
        | '\u{E000}'..='\u{FFFD}'
        | '\u{10000}'..='\u{10FFFF}')
}

fn check_characters(text: &str, context: &str) -> Result<()> {
    match text.chars().find(|c| !is_xml_char(*c)) {
        Some(c) => Err(CodecError::UnrepresentableCharacter {
            context: context.to_string(),
            code: u32::from(c),
        }),
        None => Ok(()),
    }
}

fn is_name_start_char(c: char) -> bool {
    matches!(c,
        'A'..='Z' | '_' | 'a'..='z'
        | '\u{C0}'..='\u{D6}'
        | '\u{D8}'..='\u{F6}'
        | '\u{F8}'..='\u{2FF}'
        | '\u{370}'..='\u{37D}'
        | '\u{37F}'..='\u{1FFF}'
        | '\u{200C}'..='\u{200D}'
        | '\u{2070}'..='\u{218F}'
        | '\u{2C00}'..='\u{2FEF}'
        | '\u{3001}'..='\u{D7FF}'
        | '\u{F900}'..='\u{FDCF}'
        | '\u{FDF0}'..='\u{FFFD}'
        | '\u{10000}'..='\u{EFFFF}')
}

fn is_name_char(c: char) -> bool {
    is_name_start_char(c)
        || matches!(c,
            '-' | '.' | '0'..='9' | '\u{B7}'
            | '\u{300}'..='\u{36F}'
            | '\u{203F}'..='\u{2040}')
}

/// An XML `Name` without `:`, which would read back as a namespace prefix.
fn is_xml_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().is_some_and(is_name_start_char) && chars.all(is_name_char)
}

/// Literal written to the `value` attribute.
///
/// Hex rendering uses the two's-complement bit pattern of the width.
pub fn format_value(value: &Scalar, options: &XmlOptions) -> String {
    match *value {
        Scalar::Int8(v) if options.hex8 => format!("0x{:02X}", v as u8),
        Scalar::Int16(v) if options.hex16 => format!("0x{:04X}", v as u16),
        Scalar::Int32(v) if options.hex32 => format!("0x{:08X}", v as u32),
        _ => value.to_string(),
    }
}

/// Escape XML special characters for a double-quoted attribute value.
///
/// Whitespace other than plain spaces is written as character references so
/// attribute normalization on the way back in leaves it intact.
fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('\"', "&quot;")
        .replace('\'', "&apos;")
        .replace('\n', "&#10;")
        .replace('\r', "&#13;")
        .replace('\t', "&#9;")
}
