//! TypeScript emitter
//!
//! Interfaces with `?` optionals and JSDoc descriptions. String enums become
//! a literal-union type plus a `<Name>Values` const object; other enums use
//! a TypeScript `enum`. External documents are imported from sibling
//! PascalCase modules in the same output directory.

use crate::error::Result;
use crate::names::pascal_case;
use crate::schema::{AdditionalProperties, SchemaNode};
use crate::traverse::TypeDescriptor;

use super::{
    enum_member_desc, enum_member_name, external_imports, header_comment, EmitContext, Language,
};

pub fn emit(
    root: &SchemaNode,
    descriptors: &[TypeDescriptor],
    ctx: &EmitContext<'_>,
) -> Result<String> {
    let mut blocks: Vec<String> = Vec::new();
    blocks.push(header_comment(Language::Typescript).trim_end().to_string());

    let imports = external_imports(root, ctx)?;
    if !imports.is_empty() {
        let lines: Vec<String> = imports
            .iter()
            .map(|(_, name)| format!("import {{ {name} }} from './{name}';"))
            .collect();
        blocks.push(lines.join("\n"));
    }

    for descriptor in descriptors {
        if descriptor.is_enum {
            blocks.push(emit_enum(&descriptor.name, &descriptor.node));
        } else if descriptor.node.is_object_with_properties() {
            blocks.push(emit_interface(&descriptor.name, &descriptor.node, ctx)?);
        } else {
            blocks.push(emit_alias(&descriptor.name, &descriptor.node, ctx)?);
        }
    }

    let mut out = blocks.join("\n\n");
    out.push('\n');
    Ok(out)
}

fn emit_enum(name: &str, node: &SchemaNode) -> String {
    let values = node.enum_values.as_deref().unwrap_or_default();
    let all_strings = values.iter().all(|v| v.is_string());
    let mut out = String::new();
    if let Some(desc) = &node.description {
        out.push_str(&format!("/**\n * {desc}\n */\n"));
    }

    if node.type_is("string") && all_strings {
        // String enums read best as literal unions, with a const object for
        // convenient value access.
        let union = values
            .iter()
            .filter_map(|v| v.as_str())
            .map(|v| format!("'{v}'"))
            .collect::<Vec<_>>()
            .join(" | ");
        out.push_str(&format!("export type {name} = {union};\n\n"));
        out.push_str(&format!("/**\n * Constant values for {name}\n */\n"));
        out.push_str(&format!("export const {name}Values = {{\n"));
        for (i, value) in values.iter().enumerate() {
            let member = enum_member_name(node.enum_names.as_ref(), value, i, Some(name));
            let text = value.as_str().unwrap_or_default();
            let desc = enum_member_desc(node.enum_descriptions.as_ref(), value, i)
                .map(|d| format!(" // {d}"))
                .unwrap_or_default();
            out.push_str(&format!("  /** {text}{desc} */\n"));
            let comma = if i + 1 < values.len() { "," } else { "" };
            out.push_str(&format!("  {member}: '{text}'{comma}\n"));
        }
        out.push_str("} as const;");
        return out;
    }

    out.push_str(&format!("export enum {name} {{\n"));
    for (i, value) in values.iter().enumerate() {
        let member = enum_member_name(node.enum_names.as_ref(), value, i, Some(name));
        let desc = enum_member_desc(node.enum_descriptions.as_ref(), value, i)
            .map(|d| format!(" // {d}"))
            .unwrap_or_default();
        match value {
            serde_json::Value::String(s) => {
                out.push_str(&format!("  {member} = '{s}',{desc}\n"));
            }
            other => {
                out.push_str(&format!("  {member} = {other},{desc}\n"));
            }
        }
    }
    out.push('}');
    out
}

fn emit_interface(name: &str, node: &SchemaNode, ctx: &EmitContext<'_>) -> Result<String> {
    let mut out = String::new();
    if let Some(desc) = &node.description {
        out.push_str(&format!("/**\n * {desc}\n */\n"));
    }
    out.push_str(&format!("export interface {name} {{\n"));
    for (prop_name, prop_node) in &node.properties {
        if let Some(desc) = &prop_node.description {
            out.push_str(&format!("  /**\n   * {desc}\n   */\n"));
        }
        let optional = if node.requires(prop_name) { "" } else { "?" };
        let ts_type = field_type(prop_node, prop_name, ctx)?;
        out.push_str(&format!("  {prop_name}{optional}: {ts_type};\n"));
    }
    out.push('}');
    Ok(out)
}

fn emit_alias(name: &str, node: &SchemaNode, ctx: &EmitContext<'_>) -> Result<String> {
    let target = field_type(node, name, ctx)?;
    Ok(format!("export type {name} = {target};"))
}

/// Map a schema fragment to a TypeScript type. `hint` is the property name
/// nested anonymous types were yielded under.
fn field_type(node: &SchemaNode, hint: &str, ctx: &EmitContext<'_>) -> Result<String> {
    if let Some(pointer) = &node.reference {
        return super::ref_type_name(pointer, ctx);
    }
    if node.is_enum() {
        return Ok(pascal_case(hint));
    }
    if !node.one_of.is_empty() || !node.any_of.is_empty() {
        let arms = node.one_of.iter().chain(&node.any_of);
        let types: Vec<String> = arms
            .enumerate()
            .map(|(i, arm)| field_type(arm, &format!("{hint}Option{i}"), ctx))
            .collect::<Result<_>>()?;
        return Ok(types.join(" | "));
    }
    if let Some(last) = node.all_of.last() {
        return field_type(last, hint, ctx);
    }
    if node.not.is_some() {
        return Ok("unknown".to_string());
    }

    let ts_type = match node.schema_type.as_deref() {
        Some("string") | None => match node.format.as_deref() {
            Some("date-time") | Some("date") => "Date".to_string(),
            Some("uri") | Some("url") => "URL".to_string(),
            _ => "string".to_string(),
        },
        Some("integer") | Some("number") => "number".to_string(),
        Some("boolean") => "boolean".to_string(),
        Some("array") => {
            let item = match &node.items {
                Some(items) => field_type(items, &format!("{hint}Item"), ctx)?,
                None => "unknown".to_string(),
            };
            format!("{item}[]")
        }
        Some("object") => {
            if node.is_object_with_properties() {
                pascal_case(hint)
            } else {
                match &node.additional_properties {
                    Some(AdditionalProperties::Schema(schema)) => {
                        let value = field_type(schema, "value", ctx)?;
                        format!("Record<string, {value}>")
                    }
                    _ => "Record<string, unknown>".to_string(),
                }
            }
        }
        Some(_) => "unknown".to_string(),
    };
    Ok(ts_type)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::DocumentCache;
    use crate::names::CanonicalNamer;
    use crate::resolver::ReferenceResolver;
    use crate::traverse::enumerate;

    fn emit_source(json: &str) -> String {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.schema.json");
        std::fs::write(&path, json).unwrap();
        let mut resolver =
            ReferenceResolver::new(&path, DocumentCache::new(), CanonicalNamer::default())
                .unwrap();
        resolver.discover(&path).unwrap();
        let root = resolver.root().clone();
        let descriptors = enumerate(&root, &resolver, &path).unwrap();
        let ctx = EmitContext {
            resolver: &resolver,
            document_path: &path,
            package: "main",
            namespace: "SchemaTypes",
            use_pydantic: true,
        };
        emit(&root, &descriptors, &ctx).unwrap()
    }

    #[test]
    fn test_interface_with_optional_fields() {
        let source = emit_source(
            r#"{
                "title": "User",
                "type": "object",
                "properties": {
                    "name": {"type": "string"},
                    "age": {"type": "integer"}
                },
                "required": ["name"]
            }"#,
        );
        assert!(source.contains("export interface User {"));
        assert!(source.contains("  name: string;"));
        assert!(source.contains("  age?: number;"));
    }

    #[test]
    fn test_string_enum_union_and_const_object() {
        let source = emit_source(
            r#"{
                "title": "Role",
                "type": "string",
                "enum": ["admin", "member"]
            }"#,
        );
        assert!(source.contains("export type Role = 'admin' | 'member';"));
        assert!(source.contains("export const RoleValues = {"));
        assert!(source.contains("ADMIN: 'admin',"));
        assert!(source.contains("} as const;"));
    }

    #[test]
    fn test_integer_enum_uses_enum_declaration() {
        let source = emit_source(
            r#"{
                "title": "Level",
                "type": "integer",
                "enum": [1, 2],
                "enumNames": ["Low", "High"]
            }"#,
        );
        assert!(source.contains("export enum Level {"));
        assert!(source.contains("  Low = 1,"));
        assert!(source.contains("  High = 2,"));
    }

    #[test]
    fn test_inline_object_property_references_nested_interface() {
        let source = emit_source(
            r#"{
                "title": "ChatRequest",
                "type": "object",
                "properties": {
                    "message": {
                        "type": "object",
                        "properties": {"text": {"type": "string"}}
                    }
                }
            }"#,
        );
        assert!(source.contains("export interface Message {"));
        assert!(source.contains("  message?: Message;"));
        assert!(source.contains("export interface ChatRequest {"));
    }
}
