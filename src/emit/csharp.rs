//! C# emitter
//!
//! One namespace per run; classes carry `[JsonPropertyName]` attributes,
//! `[Range]` bounds on numeric properties, nullable non-required properties
//! and `= default!;` initializers for required ones. String enums get the
//! `JsonStringEnumConverter`. All artifacts share the namespace, so no
//! usings are needed between them.

use crate::error::Result;
use crate::names::pascal_case;
use crate::schema::{AdditionalProperties, SchemaNode};
use crate::traverse::TypeDescriptor;

use super::{
    enum_member_desc, enum_member_name, header_comment, EmitContext, Language,
};

pub fn emit(
    _root: &SchemaNode,
    descriptors: &[TypeDescriptor],
    ctx: &EmitContext<'_>,
) -> Result<String> {
    let mut out = String::new();
    out.push_str(&header_comment(Language::Csharp));
    out.push_str("using System;\n");
    out.push_str("using System.Collections.Generic;\n");
    out.push_str("using System.Text.Json.Serialization;\n");
    out.push('\n');
    out.push_str("#nullable enable\n");
    out.push('\n');
    out.push_str(&format!("namespace {}\n{{\n", ctx.namespace));

    let mut first = true;
    for descriptor in descriptors {
        if !first {
            out.push('\n');
        }
        first = false;
        if descriptor.is_enum {
            out.push_str(&emit_enum(&descriptor.name, &descriptor.node));
        } else {
            out.push_str(&emit_class(&descriptor.name, &descriptor.node, ctx)?);
        }
    }

    out.push_str("}\n");
    Ok(out)
}

fn emit_enum(name: &str, node: &SchemaNode) -> String {
    let indent = "    ";
    let mut out = String::new();
    if let Some(desc) = &node.description {
        out.push_str(&format!(
            "{indent}/// <summary>\n{indent}/// {desc}\n{indent}/// </summary>\n"
        ));
    }
    let is_string = node.type_is("string");
    if is_string {
        out.push_str(&format!(
            "{indent}[JsonConverter(typeof(JsonStringEnumConverter))]\n"
        ));
    }
    out.push_str(&format!("{indent}public enum {name}\n{indent}{{\n"));

    let values = node.enum_values.as_deref().unwrap_or_default();
    for (i, value) in values.iter().enumerate() {
        let member = enum_member_name(node.enum_names.as_ref(), value, i, Some(name));
        if let Some(desc) = enum_member_desc(node.enum_descriptions.as_ref(), value, i) {
            out.push_str(&format!(
                "{indent}    /// <summary>\n{indent}    /// {desc}\n{indent}    /// </summary>\n"
            ));
        }
        let comma = if i + 1 < values.len() { "," } else { "" };
        match value {
            serde_json::Value::String(s) => {
                out.push_str(&format!("{indent}    [JsonPropertyName(\"{s}\")]\n"));
                out.push_str(&format!("{indent}    {member}{comma}\n"));
            }
            other => {
                out.push_str(&format!("{indent}    {member} = {other}{comma}\n"));
            }
        }
    }
    out.push_str(&format!("{indent}}}\n"));
    out
}

fn emit_class(name: &str, node: &SchemaNode, ctx: &EmitContext<'_>) -> Result<String> {
    let indent = "    ";
    let mut out = String::new();
    if let Some(desc) = &node.description {
        out.push_str(&format!(
            "{indent}/// <summary>\n{indent}/// {desc}\n{indent}/// </summary>\n"
        ));
    }
    out.push_str(&format!("{indent}public class {name}\n{indent}{{\n"));

    for (prop_name, prop_node) in &node.properties {
        let property = pascal_case(prop_name);
        let cs_type = field_type(prop_node, prop_name, ctx)?;
        let required = node.requires(prop_name);

        if let Some(desc) = &prop_node.description {
            out.push_str(&format!(
                "{indent}    /// <summary>\n{indent}    /// {desc}\n{indent}    /// </summary>\n"
            ));
        }
        out.push_str(&format!(
            "{indent}    [JsonPropertyName(\"{prop_name}\")]\n"
        ));
        if matches!(
            prop_node.schema_type.as_deref(),
            Some("integer") | Some("number")
        ) {
            if let Some(min) = prop_node.minimum {
                out.push_str(&format!(
                    "{indent}    [Range({min}, double.MaxValue)]\n"
                ));
            }
            if let Some(max) = prop_node.maximum {
                out.push_str(&format!(
                    "{indent}    [Range(double.MinValue, {max})]\n"
                ));
            }
        }

        let default = match &prop_node.default {
            Some(serde_json::Value::String(s)) => format!(" = \"{s}\";"),
            Some(serde_json::Value::Bool(b)) => format!(" = {b};"),
            Some(other) => format!(" = {other};"),
            None if required => " = default!;".to_string(),
            None => String::new(),
        };
        let nullable = if required { "" } else { "?" };
        out.push_str(&format!(
            "{indent}    public {cs_type}{nullable} {property} {{ get; set; }}{default}\n"
        ));
    }

    out.push_str(&format!("{indent}}}\n"));
    Ok(out)
}

/// Map a schema fragment to a C# type. `hint` is the property name nested
/// anonymous types were yielded under.
fn field_type(node: &SchemaNode, hint: &str, ctx: &EmitContext<'_>) -> Result<String> {
    if let Some(pointer) = &node.reference {
        return super::ref_type_name(pointer, ctx);
    }
    if node.is_enum() {
        return Ok(pascal_case(hint));
    }
    if !node.one_of.is_empty() || !node.any_of.is_empty() || node.not.is_some() {
        // No union types in C#.
        return Ok("object".to_string());
    }
    if let Some(last) = node.all_of.last() {
        return field_type(last, hint, ctx);
    }

    let cs_type = match node.schema_type.as_deref() {
        Some("string") | None => match node.format.as_deref() {
            Some("date-time") => "DateTime".to_string(),
            Some("date") => "DateOnly".to_string(),
            Some("time") => "TimeOnly".to_string(),
            Some("duration") => "TimeSpan".to_string(),
            Some("uuid") => "Guid".to_string(),
            Some("uri") | Some("url") => "Uri".to_string(),
            _ => "string".to_string(),
        },
        Some("integer") => "long".to_string(),
        Some("number") => "double".to_string(),
        Some("boolean") => "bool".to_string(),
        Some("array") => {
            let item = match &node.items {
                Some(items) => field_type(items, &format!("{hint}Item"), ctx)?,
                None => "object".to_string(),
            };
            format!("List<{item}>")
        }
        Some("object") => {
            if node.is_object_with_properties() {
                pascal_case(hint)
            } else {
                match &node.additional_properties {
                    Some(AdditionalProperties::Schema(schema)) => {
                        let value = field_type(schema, "value", ctx)?;
                        format!("Dictionary<string, {value}>")
                    }
                    _ => "Dictionary<string, object>".to_string(),
                }
            }
        }
        Some(_) => "object".to_string(),
    };
    Ok(cs_type)
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
            namespace: "Generated.Models",
            use_pydantic: true,
        };
        emit(&root, &descriptors, &ctx).unwrap()
    }

    #[test]
    fn test_class_properties() {
        let source = emit_source(
            r#"{
                "title": "Account",
                "type": "object",
                "properties": {
                    "user_name": {"type": "string"},
                    "balance": {"type": "number", "minimum": 0}
                },
                "required": ["user_name"]
            }"#,
        );
        assert!(source.contains("namespace Generated.Models"));
        assert!(source.contains("public class Account"));
        assert!(source.contains("[JsonPropertyName(\"user_name\")]"));
        assert!(source.contains("public string UserName { get; set; } = default!;"));
        assert!(source.contains("[Range(0, double.MaxValue)]"));
        assert!(source.contains("public double? Balance { get; set; }"));
    }

    #[test]
    fn test_string_enum_converter() {
        let source = emit_source(
            r#"{
                "title": "Role",
                "type": "string",
                "enum": ["admin", "member"],
                "enumNames": {"admin": "Admin", "member": "Member"}
            }"#,
        );
        assert!(source.contains("[JsonConverter(typeof(JsonStringEnumConverter))]"));
        assert!(source.contains("public enum Role"));
        assert!(source.contains("[JsonPropertyName(\"admin\")]"));
        assert!(source.contains("        Admin,"));
    }
}
