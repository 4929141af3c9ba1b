//! Document builders for unit tests.

use serde_json::{Value, json};
use vellum_doc::Document;

fn node(id: &str, tag: &str, w: f32, h: f32) -> Value {
    json!({
        "id": id,
        "name": id,
        "type": tag,
        "visible": true,
        "opacity": 1,
        "relativeTransform": [[1, 0, 0], [0, 1, 0]],
        "size": { "width": w, "height": h },
        "localBounds": { "x": 0, "y": 0, "width": w, "height": h },
        "absBounds": { "x": 0, "y": 0, "width": w, "height": h },
        "style": { "fills": [], "strokes": [], "effects": [] }
    })
}

pub fn group(id: &str, children: &[&str]) -> Value {
    let mut v = node(id, "GROUP", 0.0, 0.0);
    v["children"] = json!(children);
    v["clipsContent"] = json!(false);
    v
}

pub fn frame(id: &str, w: f32, h: f32, children: &[&str]) -> Value {
    let mut v = node(id, "FRAME", w, h);
    v["children"] = json!(children);
    v["clipsContent"] = json!(false);
    v
}

pub fn rect(id: &str, w: f32, h: f32) -> Value {
    let mut v = node(id, "RECTANGLE", w, h);
    v["cornerRadius"] = json!({ "topLeft": 0, "topRight": 0, "bottomRight": 0, "bottomLeft": 0 });
    v
}

pub fn vector(id: &str, paths: &[&str], rules: &[&str]) -> Value {
    let mut v = node(id, "VECTOR", 0.0, 0.0);
    v["geometry"] = json!({ "svgPaths": { "paths": paths, "windingRules": rules } });
    v
}

pub fn text(id: &str, characters: &str, w: f32) -> Value {
    let mut v = node(id, "TEXT", w, 20.0);
    v["characters"] = json!(characters);
    v["font"] = json!({ "family": "Inter", "faceName": "Inter-Regular" });
    v["fontSize"] = json!(10);
    v["lineHeight"] = json!(12);
    v["letterSpacing"] = json!(0);
    v["textAlign"] = json!("LEFT");
    v
}

pub fn with_transform(mut v: Value, rows: [[f32; 3]; 2]) -> Value {
    v["relativeTransform"] = json!(rows);
    v
}

pub fn with_abs(mut v: Value, x: f32, y: f32, w: f32, h: f32) -> Value {
    v["absBounds"] = json!({ "x": x, "y": y, "width": w, "height": h });
    v
}

pub fn with_fills(mut v: Value, fills: Value) -> Value {
    v["style"]["fills"] = fills;
    v
}

pub fn doc(root: &str, nodes: Vec<Value>) -> Document {
    let map: serde_json::Map<String, Value> = nodes
        .into_iter()
        .map(|n| (n["id"].as_str().unwrap_or_default().to_string(), n))
        .collect();
    serde_json::from_value(json!({
        "version": 1,
        "rootId": root,
        "nodes": map,
        "assets": { "images": {}, "fonts": [] }
    }))
    .expect("test document should deserialize")
}
