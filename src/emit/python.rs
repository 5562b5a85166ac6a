//! Python emitter
//!
//! Renders pydantic `BaseModel` classes with `Field` constraints by default,
//! or plain dataclasses with `--no-pydantic`. Enums become `Enum` subclasses
//! (string enums mix in `str`). External documents are imported as sibling
//! modules.

use crate::error::Result;
use crate::names::file_stem;
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
    blocks.push(header_comment(Language::Python).trim_end().to_string());
    blocks.push(imports_block(root, descriptors, ctx)?);

    for descriptor in descriptors {
        if descriptor.is_enum {
            blocks.push(emit_enum(&descriptor.name, &descriptor.node, ctx));
        } else {
            blocks.push(emit_class(&descriptor.name, &descriptor.node, ctx)?);
        }
    }

    let mut out = blocks.join("\n\n");
    out.push('\n');
    Ok(out)
}

fn imports_block(
    root: &SchemaNode,
    descriptors: &[TypeDescriptor],
    ctx: &EmitContext<'_>,
) -> Result<String> {
    let mut lines = vec![
        "from typing import List, Dict, Optional, Any, Union".to_string(),
        "from datetime import datetime, date, time, timedelta".to_string(),
    ];

    if descriptors
        .iter()
        .any(|d| format_used(&d.node, "uuid"))
    {
        lines.push("import uuid".to_string());
    }
    if descriptors.iter().any(|d| d.is_enum) {
        lines.push("from enum import Enum".to_string());
    }
    if ctx.use_pydantic {
        lines.push("from pydantic import BaseModel, Field, AnyUrl, EmailStr".to_string());
    } else {
        lines.push("from dataclasses import dataclass".to_string());
    }

    for (path, name) in external_imports(root, ctx)? {
        let module = file_stem(&path);
        lines.push(format!("from .{module} import {name}"));
    }
    Ok(lines.join("\n"))
}

fn format_used(node: &SchemaNode, format: &str) -> bool {
    if node.is_reference() {
        return false;
    }
    if node.format.as_deref() == Some(format) {
        return true;
    }
    node.properties.values().any(|c| format_used(c, format))
        || node
            .items
            .as_deref()
            .map(|i| format_used(i, format))
            .unwrap_or(false)
}

fn emit_enum(name: &str, node: &SchemaNode, ctx: &EmitContext<'_>) -> String {
    let mut out = String::new();
    let is_string = node.type_is("string");
    if ctx.use_pydantic && is_string {
        out.push_str(&format!("class {name}(str, Enum):\n"));
    } else {
        out.push_str(&format!("class {name}(Enum):\n"));
    }
    if let Some(desc) = &node.description {
        out.push_str(&format!("    \"\"\"{desc}\"\"\"\n"));
    }

    let values = node.enum_values.as_deref().unwrap_or_default();
    if values.is_empty() {
        out.push_str("    pass\n");
        return out.trim_end().to_string();
    }
    for (i, value) in values.iter().enumerate() {
        let member = enum_member_name(node.enum_names.as_ref(), value, i, Some(name));
        match value {
            serde_json::Value::String(s) => {
                out.push_str(&format!("    {member} = '{s}'\n"));
            }
            other => {
                out.push_str(&format!("    {member} = {other}\n"));
            }
        }
        if let Some(desc) = enum_member_desc(node.enum_descriptions.as_ref(), value, i) {
            out.push_str(&format!("    \"\"\"{desc}\"\"\"\n"));
        }
    }
    out.trim_end().to_string()
}

fn emit_class(name: &str, node: &SchemaNode, ctx: &EmitContext<'_>) -> Result<String> {
    let mut out = String::new();
    if ctx.use_pydantic {
        out.push_str(&format!("class {name}(BaseModel):\n"));
    } else {
        out.push_str(&format!("@dataclass\nclass {name}:\n"));
    }
    if let Some(desc) = &node.description {
        out.push_str(&format!("    \"\"\"{desc}\"\"\"\n"));
    }
    if node.properties.is_empty() {
        out.push_str("    pass\n");
        return Ok(out.trim_end().to_string());
    }

    for (prop_name, prop_node) in &node.properties {
        let field_type = field_type(prop_node, prop_name, ctx)?;
        let required = node.requires(prop_name);
        if ctx.use_pydantic {
            out.push_str(&pydantic_field(prop_name, prop_node, &field_type, required));
        } else {
            out.push_str(&dataclass_field(prop_name, prop_node, &field_type, required));
        }
    }

    if ctx.use_pydantic {
        out.push_str("\n    class Config:\n        extra = \"ignore\"\n");
    }
    Ok(out.trim_end().to_string())
}

fn pydantic_field(
    prop_name: &str,
    node: &SchemaNode,
    field_type: &str,
    required: bool,
) -> String {
    let mut params: Vec<String> = Vec::new();
    match &node.default {
        Some(serde_json::Value::String(s)) => params.push(format!("default=\"{s}\"")),
        Some(serde_json::Value::Bool(b)) => {
            params.push(format!("default={}", if *b { "True" } else { "False" }));
        }
        Some(other) => params.push(format!("default={other}")),
        None if !required => params.push("default=None".to_string()),
        None => params.push("...".to_string()),
    }
    if let Some(desc) = &node.description {
        params.push(format!("description=\"{}\"", desc.replace('"', "\\\"")));
    }
    if let Some(min) = node.minimum {
        params.push(format!("ge={min}"));
    }
    if let Some(max) = node.maximum {
        params.push(format!("le={max}"));
    }
    if let Some(gt) = node.exclusive_minimum {
        params.push(format!("gt={gt}"));
    }
    if let Some(lt) = node.exclusive_maximum {
        params.push(format!("lt={lt}"));
    }
    let params = params.join(", ");

    if required {
        format!("    {prop_name}: {field_type} = Field({params})\n")
    } else {
        format!("    {prop_name}: Optional[{field_type}] = Field({params})\n")
    }
}

fn dataclass_field(
    prop_name: &str,
    node: &SchemaNode,
    field_type: &str,
    required: bool,
) -> String {
    match &node.default {
        Some(serde_json::Value::String(s)) => {
            format!("    {prop_name}: {field_type} = \"{s}\"\n")
        }
        Some(serde_json::Value::Bool(b)) => {
            let value = if *b { "True" } else { "False" };
            format!("    {prop_name}: {field_type} = {value}\n")
        }
        Some(other) => format!("    {prop_name}: {field_type} = {other}\n"),
        None if required => format!("    {prop_name}: {field_type}\n"),
        None => format!("    {prop_name}: Optional[{field_type}] = None\n"),
    }
}

/// Map a schema fragment to a Python type annotation. `hint` is the property
/// name nested anonymous types were yielded under.
fn field_type(node: &SchemaNode, hint: &str, ctx: &EmitContext<'_>) -> Result<String> {
    if let Some(pointer) = &node.reference {
        return super::ref_type_name(pointer, ctx);
    }
    if node.is_enum() {
        return Ok(crate::names::pascal_case(hint));
    }
    if !node.one_of.is_empty() || !node.any_of.is_empty() {
        let arms = node.one_of.iter().chain(&node.any_of);
        let types: Vec<String> = arms
            .enumerate()
            .map(|(i, arm)| field_type(arm, &format!("{hint}Option{i}"), ctx))
            .collect::<Result<_>>()?;
        return Ok(format!("Union[{}]", types.join(", ")));
    }
    if let Some(last) = node.all_of.last() {
        return field_type(last, hint, ctx);
    }
    if node.not.is_some() {
        return Ok("Any".to_string());
    }

    let annotation = match node.schema_type.as_deref() {
        Some("string") | None => match node.format.as_deref() {
            Some("date-time") => "datetime".to_string(),
            Some("date") => "date".to_string(),
            Some("time") => "time".to_string(),
            Some("duration") => "timedelta".to_string(),
            Some("uuid") => "uuid.UUID".to_string(),
            Some("uri") | Some("url") if ctx.use_pydantic => "AnyUrl".to_string(),
            Some("email") if ctx.use_pydantic => "EmailStr".to_string(),
            _ => "str".to_string(),
        },
        Some("integer") => "int".to_string(),
        Some("number") => "float".to_string(),
        Some("boolean") => "bool".to_string(),
        Some("array") => {
            let item = match &node.items {
                Some(items) => field_type(items, &format!("{hint}Item"), ctx)?,
                None => "Any".to_string(),
            };
            format!("List[{item}]")
        }
        Some("object") => {
            if node.is_object_with_properties() {
                crate::names::pascal_case(hint)
            } else {
                match &node.additional_properties {
                    Some(AdditionalProperties::Schema(schema)) => {
                        let value = field_type(schema, "value", ctx)?;
                        format!("Dict[str, {value}]")
                    }
                    _ => "Dict[str, Any]".to_string(),
                }
            }
        }
        Some(_) => "Any".to_string(),
    };
    Ok(annotation)
}
