//! Scan, synthesize and emit a fixture project end to end

use mcpwrap_config::{ScanSettings, ServerSettings};
use mcpwrap_emitter::{Emitter, README_FILE, SERVER_FILE};
use mcpwrap_scanner::Scanner;
use mcpwrap_schema::{synthesize, Tool};
use std::fs;
use tempfile::TempDir;

const APP: &str = r#"
from fastapi import FastAPI
from pydantic import BaseModel

app = FastAPI()

class Item(BaseModel):
    title: str
    price: float

@app.get("/items/{item_id}")
def read_item(item_id: int, q: str = None):
    """Read one item."""
    return {"id": item_id}

@app.post("/items")
def create_item(item: Item):
    return item

@app.get("/files/{file_path:path}")
def read_file(file_path: str):
    return ""
"#;

fn tools() -> Vec<Tool> {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("app.py"), APP).unwrap();
    let output = Scanner::new(temp.path(), ScanSettings::default())
        .scan()
        .unwrap();
    synthesize(&output.endpoints).tools
}

fn settings() -> ServerSettings {
    ServerSettings {
        name: "items-api".to_string(),
        port: 9000,
        ..ServerSettings::default()
    }
}

#[test_log::test]
fn test_emission_is_byte_identical() {
    let tools = tools();
    let first = Emitter::new(settings()).unwrap().render(&tools).unwrap();
    let second = Emitter::new(settings()).unwrap().render(&tools).unwrap();
    assert_eq!(first, second);
}

#[test_log::test]
fn test_server_handlers_forward_to_routes() {
    let scaffold = Emitter::new(settings()).unwrap().render(&tools()).unwrap();
    let server = scaffold.get(SERVER_FILE).unwrap();

    assert!(server.contains(r#"BASE_URL = "http://localhost:9000""#));
    assert!(server.contains(r#"SERVER_NAME = "items-api""#));

    assert!(server.contains("# GET /items/{item_id}\n@handler(\"getItemsByItemId\")"));
    assert!(server.contains("async def handle_getItemsByItemId(arguments):"));
    assert!(server.contains(
        r#"path = build_path("/items/{item_id}", arguments, [["{item_id}","item_id",""]])"#
    ));
    assert!(server.contains(r#"for name in ["q"] if name in arguments"#));

    assert!(server.contains("async def handle_postItems(arguments):"));
    assert!(server.contains(r#"payload = pick_payload(arguments, ["body","item"])"#));
    assert!(server.contains(r#"return await forward("POST", path"#));

    assert!(server.contains(r#"[["{file_path:path}","file_path","/"]]"#));
    assert!(server.contains("except httpx.HTTPError as exc:"));
}

#[test_log::test]
fn test_written_output_tree() {
    let temp = TempDir::new().unwrap();
    let out = temp.path().join("generated");
    let tools = tools();
    let written = Emitter::new(settings()).unwrap().emit(&tools, &out).unwrap();
    assert_eq!(written.len(), 4);

    let doc: serde_yaml_ng::Value =
        serde_yaml_ng::from_str(&fs::read_to_string(out.join("mcp.yaml")).unwrap()).unwrap();
    assert_eq!(doc["name"].as_str(), Some("items-api"));
    let names: Vec<_> = doc["tools"]
        .as_sequence()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(
        names,
        vec!["getItemsByItemId", "postItems", "getFilesByFilePath"]
    );
    assert_eq!(
        doc["tools"][1]["inputSchema"]["properties"]["body"]["properties"]["price"]["type"]
            .as_str(),
        Some("number")
    );

    let readme = fs::read_to_string(out.join(README_FILE)).unwrap();
    assert!(readme.contains("| `getItemsByItemId` | `GET /items/{item_id}` | Read one item. |"));
    let requirements = fs::read_to_string(out.join("requirements.txt")).unwrap();
    assert!(requirements.contains("httpx"));
}
