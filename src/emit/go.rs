//! Go emitter
//!
//! Renders each document as one Go file: named enum types with prefixed
//! constants, structs with combined `json`/`yaml` tags and `validate` tags
//! for bounds and required fields. Optional non-container fields become
//! pointers. External references render as bare type names; every document
//! shares one package, so no Go imports are needed between artifacts.

use std::collections::BTreeSet;

use crate::error::Result;
use crate::names::{go_field_name, pascal_case};
use crate::schema::{AdditionalProperties, SchemaNode};
use crate::traverse::TypeDescriptor;

use super::{enum_member_desc, header_comment, EmitContext, Language};

pub fn emit(
    _root: &SchemaNode,
    descriptors: &[TypeDescriptor],
    ctx: &EmitContext<'_>,
) -> Result<String> {
    let mut out = String::new();
    out.push_str(&header_comment(Language::Go));
    out.push('\n');
    out.push_str(&format!("package {}\n", ctx.package));

    let imports = stdlib_imports(descriptors);
    if !imports.is_empty() {
        out.push_str("\nimport (\n");
        for import in &imports {
            out.push_str(&format!("\t\"{import}\"\n"));
        }
        out.push_str(")\n");
    }

    for descriptor in descriptors {
        out.push('\n');
        if descriptor.is_enum {
            out.push_str(&emit_enum(&descriptor.name, &descriptor.node));
        } else if descriptor.node.is_object_with_properties() {
            out.push_str(&emit_struct(&descriptor.name, &descriptor.node, ctx)?);
        } else {
            out.push_str(&emit_alias(&descriptor.name, &descriptor.node, ctx)?);
        }
    }

    Ok(out)
}

/// Stdlib/third-party imports needed by the emitted types, derived from the
/// string formats they use.
fn stdlib_imports(descriptors: &[TypeDescriptor]) -> BTreeSet<&'static str> {
    let mut imports = BTreeSet::new();
    for descriptor in descriptors {
        scan_formats(&descriptor.node, &mut imports);
    }
    imports
}

fn scan_formats(node: &SchemaNode, imports: &mut BTreeSet<&'static str>) {
    if node.is_reference() {
        // Referenced types carry their own imports in their own artifact.
        return;
    }
    if node.schema_type.as_deref() == Some("string") {
        match node.format.as_deref() {
            Some("date-time") | Some("date") | Some("time") | Some("duration") => {
                imports.insert("time");
            }
            Some("uuid") => {
                imports.insert("github.com/google/uuid");
            }
            Some("uri") | Some("url") => {
                imports.insert("net/url");
            }
            _ => {}
        }
    }
    for child in node.properties.values() {
        scan_formats(child, imports);
    }
    if let Some(items) = &node.items {
        scan_formats(items, imports);
    }
    if let Some(AdditionalProperties::Schema(schema)) = &node.additional_properties {
        scan_formats(schema, imports);
    }
    for child in node.one_of.iter().chain(&node.any_of).chain(&node.all_of) {
        scan_formats(child, imports);
    }
}

fn emit_enum(name: &str, node: &SchemaNode) -> String {
    let mut out = String::new();
    if let Some(desc) = &node.description {
        out.push_str(&format!("// {name} {desc}\n"));
    }

    let values = node.enum_values.as_deref().unwrap_or_default();
    let is_string = node.type_is("string") || values.iter().all(|v| v.is_string());
    let base = if is_string { "string" } else { "int" };
    out.push_str(&format!("type {name} {base}\n\nconst (\n"));

    for (i, value) in values.iter().enumerate() {
        // Go convention: constants carry the type name as a prefix.
        let member = go_const_name(name, node, value, i);
        let comment = enum_member_desc(node.enum_descriptions.as_ref(), value, i)
            .map(|d| format!(" // {d}"))
            .unwrap_or_default();
        match value {
            serde_json::Value::String(s) => {
                out.push_str(&format!("\t{member} {name} = \"{s}\"{comment}\n"));
            }
            other => {
                out.push_str(&format!("\t{member} {name} = {other}{comment}\n"));
            }
        }
    }
    out.push_str(")\n");
    out
}

/// `<Type><Member>` constant name, from the `enumNames` hint when present,
/// else the PascalCased value text.
fn go_const_name(
    type_name: &str,
    node: &SchemaNode,
    value: &serde_json::Value,
    index: usize,
) -> String {
    let mut base = match node.enum_names.as_ref().and_then(|h| h.get(value, index)) {
        Some(hint) => hint.to_string(),
        None => match value {
            serde_json::Value::String(s) => pascal_case(s),
            other => pascal_case(&other.to_string()),
        },
    };
    if base.len() > type_name.len() && base.starts_with(type_name) {
        base = base[type_name.len()..].to_string();
    }
    format!("{type_name}{base}")
}

fn emit_struct(name: &str, node: &SchemaNode, ctx: &EmitContext<'_>) -> Result<String> {
    let mut out = String::new();
    if let Some(desc) = &node.description {
        out.push_str(&format!("// {name} {desc}\n"));
    }
    out.push_str(&format!("type {name} struct {{\n"));

    // Pre-compute field and type column widths for alignment.
    let mut fields: Vec<(String, String, String, Option<String>)> = Vec::new();
    for (prop_name, prop_node) in &node.properties {
        let field_name = go_field_name(prop_name);
        let mut go_type = field_type(prop_node, &pascal_case(prop_name), ctx)?;
        let required = node.requires(prop_name);
        if !required
            && !go_type.starts_with("[]")
            && !go_type.starts_with("map[")
            && go_type != "interface{}"
        {
            go_type = format!("*{go_type}");
        }
        let tag = field_tag(prop_name, prop_node, required);
        fields.push((field_name, go_type, tag, prop_node.description.clone()));
    }

    let name_width = fields.iter().map(|f| f.0.len()).max().unwrap_or(0);
    let type_width = fields.iter().map(|f| f.1.len()).max().unwrap_or(0);
    for (field_name, go_type, tag, description) in &fields {
        let comment = description
            .as_ref()
            .map(|d| format!(" // {d}"))
            .unwrap_or_default();
        out.push_str(&format!(
            "\t{field_name:<name_width$} {go_type:<type_width$} {tag}{comment}\n"
        ));
    }
    out.push_str("}\n");
    Ok(out)
}

fn emit_alias(name: &str, node: &SchemaNode, ctx: &EmitContext<'_>) -> Result<String> {
    let target = field_type(node, name, ctx)?;
    Ok(format!("type {name} {target}\n"))
}

/// Combined json/yaml/validate struct tag for one field.
fn field_tag(prop_name: &str, node: &SchemaNode, required: bool) -> String {
    let mut parts = vec![
        format!("json:\"{prop_name}\""),
        format!("yaml:\"{prop_name}\""),
    ];

    let mut validations: Vec<String> = Vec::new();
    if matches!(node.schema_type.as_deref(), Some("integer") | Some("number")) {
        if let Some(min) = node.minimum {
            validations.push(format!("min={}", number(min)));
        }
        if let Some(max) = node.maximum {
            validations.push(format!("max={}", number(max)));
        }
        if let Some(gt) = node.exclusive_minimum {
            validations.push(format!("gt={}", number(gt)));
        }
        if let Some(lt) = node.exclusive_maximum {
            validations.push(format!("lt={}", number(lt)));
        }
    }
    if let Some(default) = &node.default {
        match default {
            serde_json::Value::String(s) => validations.push(format!("default=\"{s}\"")),
            other => validations.push(format!("default={other}")),
        }
    }
    if required {
        validations.push("required".to_string());
    }
    if !validations.is_empty() {
        parts.push(format!("validate:\"{}\"", validations.join(",")));
    }

    format!("`{}`", parts.join(" "))
}

/// Render an integer-valued bound without a trailing `.0`.
fn number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

/// Map a schema fragment to a Go type. `hint` is the PascalCase name nested
/// anonymous types were yielded under.
fn field_type(node: &SchemaNode, hint: &str, ctx: &EmitContext<'_>) -> Result<String> {
    if let Some(pointer) = &node.reference {
        return super::ref_type_name(pointer, ctx);
    }
    if node.is_enum() {
        return Ok(hint.to_string());
    }
    if !node.one_of.is_empty() || !node.any_of.is_empty() || node.not.is_some() {
        // No union types in Go.
        return Ok("interface{}".to_string());
    }
    if let Some(last) = node.all_of.last() {
        return field_type(last, hint, ctx);
    }

    let go_type = match node.schema_type.as_deref() {
        Some("string") | None => match node.format.as_deref() {
            Some("date-time") | Some("date") | Some("time") => "time.Time".to_string(),
            Some("duration") => "time.Duration".to_string(),
            Some("uuid") => "uuid.UUID".to_string(),
            Some("uri") | Some("url") => "url.URL".to_string(),
            _ => "string".to_string(),
        },
        Some("integer") => "int".to_string(),
        Some("number") => "float32".to_string(),
        Some("boolean") => "bool".to_string(),
        Some("array") => {
            let item = match &node.items {
                Some(items) => field_type(items, &format!("{hint}Item"), ctx)?,
                None => "interface{}".to_string(),
            };
            format!("[]{item}")
        }
        Some("object") => {
            if node.is_object_with_properties() {
                hint.to_string()
            } else {
                match &node.additional_properties {
                    Some(AdditionalProperties::Schema(schema)) => {
                        let value = field_type(schema, "Value", ctx)?;
                        format!("map[string]{value}")
                    }
                    _ => "map[string]interface{}".to_string(),
                }
            }
        }
        Some(_) => "interface{}".to_string(),
    };
    Ok(go_type)
}
