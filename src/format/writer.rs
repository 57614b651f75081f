//! Canonical pretty-printer
//!
//! Reproduces the engine's own output layout so a formatting pass over an
//! engine-written file is a no-op: two-space indent, one field per line,
//! floats always carrying a decimal point, and strings containing newlines
//! split into one literal per line.

use super::{Document, Value};

/// Render a document in canonical form. The result always ends with a
/// newline (unless the document is empty) and parses back to an equal
/// document.
pub fn write_document(doc: &Document) -> String {
    let mut out = String::new();
    write_fields(doc, 0, &mut out);
    out
}

fn write_fields(doc: &Document, depth: usize, out: &mut String) {
    let indent = "  ".repeat(depth);
    for field in doc.iter() {
        match &field.value {
            Value::Message(inner) => {
                out.push_str(&indent);
                out.push_str(&field.name);
                out.push_str(" {\n");
                write_fields(inner, depth + 1, out);
                out.push_str(&indent);
                out.push_str("}\n");
            }
            Value::Str(s) => write_string_field(&indent, &field.name, s, out),
            Value::Int(n) => {
                out.push_str(&format!("{}{}: {}\n", indent, field.name, n));
            }
            Value::Float(v) => {
                out.push_str(&format!("{}{}: {}\n", indent, field.name, format_float(*v)));
            }
            Value::Bool(b) => {
                out.push_str(&format!("{}{}: {}\n", indent, field.name, b));
            }
            Value::Enum(e) => {
                out.push_str(&format!("{}{}: {}\n", indent, field.name, e));
            }
        }
    }
}

/// Strings with embedded newlines become a run of literals, one source line
/// of content per literal, continuation literals at the field's indent:
///
/// ```text
/// data: "tile_set: \"/gardens/atlas/props.atlas\"\n"
/// "default_animation: \"lantern-lit\"\n"
/// ""
/// ```
fn write_string_field(indent: &str, name: &str, s: &str, out: &mut String) {
    let parts: Vec<&str> = s.split('\n').collect();
    let last = parts.len() - 1;
    for (i, part) in parts.iter().enumerate() {
        if i == 0 {
            out.push_str(&format!("{}{}: ", indent, name));
        } else {
            out.push_str(indent);
        }
        out.push('"');
        escape_into(part, out);
        if i < last {
            out.push_str("\\n");
        }
        out.push_str("\"\n");
    }
}

fn escape_into(s: &str, out: &mut String) {
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if (c as u32) < 0x20 => out.push_str(&format!("\\x{:02x}", c as u32)),
            c => out.push(c),
        }
    }
}

/// Floats always carry a decimal point (`0.0`, `12.5`), matching the engine
/// writer. Integral values too large for that form use exponent notation so
/// they still read back as floats.
fn format_float(v: f64) -> String {
    if v.is_nan() {
        return "nan".to_string();
    }
    if v.is_infinite() {
        return if v > 0.0 { "inf" } else { "-inf" }.to_string();
    }
    if v == v.trunc() {
        if v.abs() < 1e15 {
            format!("{:.1}", v)
        } else {
            format!("{:e}", v)
        }
    } else {
        format!("{}", v)
    }
}
