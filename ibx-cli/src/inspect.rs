//! Inspect views
//!
//! Each view renders one input as text for debugging:
//!
//! - `tables`: the encoding marker, the String Table and the Typed Value
//!   Table with each entry's index, discriminant, type and resolved value.
//!   XML input is encoded first, so this shows what conversion would write.
//! - `tree-json`: the decoded tree as pretty-printed JSON.

use ibx_codec::value::TypedValue;
use ibx_codec::{Conversion, Decoder, FormatOptions, FormatRegistry, Parsed, SerializedDocument};

/// All available inspect views
pub const AVAILABLE_VIEWS: &[&str] = &["tables", "tree-json"];

pub const DEFAULT_VIEW: &str = "tables";

/// Render `source` (in `format`) with the named view.
pub fn execute_view(
    registry: &FormatRegistry,
    source: &[u8],
    format: &str,
    view: &str,
    options: &FormatOptions,
) -> Result<String, String> {
    match view {
        "tables" => {
            let bytes = binary_form(registry, source, format, options)?;
            render_tables(&bytes)
        }
        "tree-json" => {
            let doc = match registry
                .parse(source, format, options)
                .map_err(|e| e.to_string())?
            {
                Parsed::Document(doc) => doc,
                Parsed::Passthrough(reason) => {
                    return Err(format!("Nothing to inspect: {reason}"));
                }
            };
            serde_json::to_string_pretty(&doc)
                .map(|json| json + "\n")
                .map_err(|e| format!("JSON serialization failed: {e}"))
        }
        other => Err(format!(
            "Unknown view '{other}'. Available views: {}",
            AVAILABLE_VIEWS.join(", ")
        )),
    }
}

fn binary_form(
    registry: &FormatRegistry,
    source: &[u8],
    format: &str,
    options: &FormatOptions,
) -> Result<Vec<u8>, String> {
    if format == "ibx" {
        return Ok(source.to_vec());
    }
    match registry
        .convert(source, format, "ibx", options)
        .map_err(|e| e.to_string())?
    {
        Conversion::Converted(SerializedDocument::Binary(bytes)) => Ok(bytes),
        Conversion::Converted(SerializedDocument::Text(_)) => {
            Err("Encoder produced text output".to_string())
        }
        Conversion::Passthrough(reason) => Err(format!("Nothing to inspect: {reason}")),
    }
}

/// Table listing for an IBX1 buffer.
pub fn render_tables(bytes: &[u8]) -> Result<String, String> {
    let decoder = Decoder::new(bytes)
        .map_err(|e| e.to_string())?
        .ok_or_else(|| "Nothing to inspect: no IBX1 signature".to_string())?;

    let mut output = String::new();
    output.push_str(&format!("encoding: {:#04x}\n", decoder.encoding()));

    output.push_str(&format!("strings ({}):\n", decoder.strings().len()));
    for (index, text) in decoder.strings().iter().enumerate() {
        output.push_str(&format!("  [{index}] {text:?}\n"));
    }

    output.push_str(&format!("values ({}):\n", decoder.values().len()));
    for (index, value) in decoder.values().iter().enumerate() {
        let scalar = value.resolve(decoder.strings()).map_err(|e| e.to_string())?;
        let shown = match value {
            TypedValue::StringRef(string_index) => {
                format!("#{string_index} {:?}", scalar.to_string())
            }
            _ => scalar.to_string(),
        };
        output.push_str(&format!(
            "  [{index}] {:#04x} {} {shown}\n",
            value.discriminant(),
            value.type_name()
        ));
    }
    Ok(output)
}
