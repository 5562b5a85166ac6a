//! End-to-end generation tests
//!
//! Runs the full driver over multi-file schemas and checks the shape of the
//! emitted artifacts for each language.

use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use schema2code::{generate, GenerateOptions, Language};

fn write(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, content).unwrap();
    path
}

/// Root schema with an alias definition to an external document and an
/// inline object property.
fn chat_fixture(dir: &Path) -> PathBuf {
    write(
        dir,
        "chat_request.schema.json",
        r##"{
            "title": "ChatRequest",
            "type": "object",
            "definitions": {
                "Details": {"$ref": "./model_details.schema.json"}
            },
            "properties": {
                "model": {"$ref": "#/definitions/Details"},
                "message": {
                    "type": "object",
                    "properties": {
                        "role": {"type": "string", "enum": ["user", "assistant"]},
                        "text": {"type": "string"}
                    },
                    "required": ["text"]
                },
                "temperature": {"type": "number", "minimum": 0, "maximum": 2}
            },
            "required": ["message"]
        }"##,
    )
}

fn model_details_fixture(dir: &Path) {
    write(
        dir,
        "model_details.schema.json",
        r#"{
            "title": "ModelDetails",
            "type": "object",
            "properties": {
                "name": {"type": "string"},
                "max_tokens": {"type": "integer", "minimum": 1}
            },
            "required": ["name"]
        }"#,
    );
}

fn artifact<'a>(artifacts: &'a IndexMap<PathBuf, String>, suffix: &str) -> &'a String {
    artifacts
        .iter()
        .find(|(path, _)| path.to_string_lossy().ends_with(suffix))
        .map(|(_, content)| content)
        .unwrap_or_else(|| panic!("no artifact ending in {suffix}: {:?}", artifacts.keys()))
}

#[test]
fn test_go_generation() {
    let dir = tempfile::tempdir().unwrap();
    let root = chat_fixture(dir.path());
    model_details_fixture(dir.path());

    let out = dir.path().join("out").join("chat_request.go");
    let mut options = GenerateOptions::new(Language::Go, out);
    options.package = "models".to_string();
    let artifacts = generate(&root, &options).unwrap();

    assert_eq!(artifacts.len(), 2);
    let main = artifact(&artifacts, "chat_request.go");
    assert!(main.contains("package models"));
    assert!(main.contains("type ChatRequest struct {"));
    assert!(main.contains("type Message struct {"));
    // The alias definition is imported, never redefined here.
    assert!(!main.contains("type Details"));
    assert!(!main.contains("type ModelDetails"));
    assert!(main.contains("ModelDetails"));

    let external = artifact(&artifacts, "model_details.go");
    assert!(external.contains("type ModelDetails struct {"));
    assert!(external.contains("`json:\"max_tokens\" yaml:\"max_tokens\" validate:\"min=1\"`"));
}

#[test]
fn test_typescript_generation() {
    let dir = tempfile::tempdir().unwrap();
    let root = chat_fixture(dir.path());
    model_details_fixture(dir.path());

    let out = dir.path().join("out").join("chat_request.ts");
    let options = GenerateOptions::new(Language::Typescript, out);
    let artifacts = generate(&root, &options).unwrap();

    // Main artifact is renamed to PascalCase for TypeScript.
    let main = artifact(&artifacts, "ChatRequest.ts");
    assert!(main.contains("import { ModelDetails } from './ModelDetails';"));
    assert!(main.contains("export interface ChatRequest {"));
    assert!(main.contains("export interface Message {"));
    assert!(main.contains("model?: ModelDetails;"));
    assert!(main.contains("message: Message;"));
    assert!(!main.contains("interface Details"));

    let external = artifact(&artifacts, "ModelDetails.ts");
    assert!(external.contains("export interface ModelDetails {"));
    assert!(external.contains("max_tokens?: number;"));
}

#[test]
fn test_python_generation_with_init_exports() {
    let dir = tempfile::tempdir().unwrap();
    let root = chat_fixture(dir.path());
    model_details_fixture(dir.path());

    let out = dir.path().join("out").join("chat_request.py");
    let options = GenerateOptions::new(Language::Python, out);
    let artifacts = generate(&root, &options).unwrap();

    let main = artifact(&artifacts, "chat_request.py");
    assert!(main.contains("from .model_details import ModelDetails"));
    assert!(main.contains("class ChatRequest(BaseModel):"));
    assert!(main.contains("class Message(BaseModel):"));
    assert!(main.contains("temperature: Optional[float] = Field(default=None, ge=0, le=2)"));

    let init = artifact(&artifacts, "__init__.py");
    assert!(init.contains("from .chat_request import"));
    assert!(init.contains("from .model_details import ModelDetails"));
    assert!(init.contains("\"ChatRequest\""));
    assert!(init.contains("\"ModelDetails\""));
}

#[test]
fn test_csharp_generation() {
    let dir = tempfile::tempdir().unwrap();
    let root = chat_fixture(dir.path());
    model_details_fixture(dir.path());

    let out = dir.path().join("out").join("chat_request.cs");
    let mut options = GenerateOptions::new(Language::Csharp, out);
    options.namespace = "Chat.Models".to_string();
    let artifacts = generate(&root, &options).unwrap();

    let main = artifact(&artifacts, "ChatRequest.cs");
    assert!(main.contains("namespace Chat.Models"));
    assert!(main.contains("public class ChatRequest"));
    assert!(main.contains("[JsonPropertyName(\"message\")]"));
    assert!(main.contains("public Message Message { get; set; } = default!;"));

    let external = artifact(&artifacts, "ModelDetails.cs");
    assert!(external.contains("public class ModelDetails"));
    assert!(external.contains("public string Name { get; set; } = default!;"));
}

#[test]
fn test_generation_is_deterministic() {
    let dir = tempfile::tempdir().unwrap();
    let root = chat_fixture(dir.path());
    model_details_fixture(dir.path());

    let out = dir.path().join("out").join("chat_request.go");
    let options = GenerateOptions::new(Language::Go, out);
    let first = generate(&root, &options).unwrap();
    let second = generate(&root, &options).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_yaml_root_document() {
    let dir = tempfile::tempdir().unwrap();
    let root = write(
        dir.path(),
        "event.schema.yaml",
        "title: Event\ntype: object\nproperties:\n  name:\n    type: string\nrequired:\n  - name\n",
    );

    let out = dir.path().join("event.go");
    let options = GenerateOptions::new(Language::Go, out);
    let artifacts = generate(&root, &options).unwrap();
    let main = artifact(&artifacts, "event.go");
    assert!(main.contains("type Event struct {"));
    assert!(main.contains("Name string"));
}

#[test]
fn test_generation_failure_names_offending_pointer() {
    let dir = tempfile::tempdir().unwrap();
    let root = write(
        dir.path(),
        "broken.schema.json",
        r#"{"title": "Broken", "type": "object",
            "properties": {"x": {"$ref": "./gone.schema.json"}}}"#,
    );

    let options = GenerateOptions::new(Language::Go, dir.path().join("broken.go"));
    let err = generate(&root, &options).unwrap_err();
    assert!(err.to_string().contains("gone.schema.json"), "{err}");
}
