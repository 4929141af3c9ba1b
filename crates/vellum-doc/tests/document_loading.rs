use anyhow::Result;
use std::path::PathBuf;
use vellum_doc::{Document, DocumentIssue, NodeKind, TextMetric, VectorKind};

fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/scene.json")
}

#[test]
fn loads_fixture_scene() -> Result<()> {
    let doc = Document::from_path(&fixture_path())?;

    assert_eq!(doc.version, 1);
    assert_eq!(doc.root_id, "root");
    assert_eq!(doc.nodes.len(), 6);
    assert_eq!(doc.root().map(|n| n.children().len()), Some(4));
    assert_eq!(doc.assets.fonts[0].face_name, "Inter-Regular");

    let badge = doc.node("badge").expect("badge node");
    assert_eq!(badge.children(), ["tri".to_string(), "label".to_string()]);
    assert_eq!(badge.relative_transform.translation(), [200.0, 50.0]);

    let ring = doc.node("ring").and_then(|n| n.as_vector()).expect("ring vector");
    assert_eq!(ring.kind, VectorKind::BooleanOperation);
    assert_eq!(ring.style.effects.len(), 1);

    match &doc.node("label").expect("label").kind {
        NodeKind::Text(text) => {
            assert_eq!(text.font_size, TextMetric::Uniform(14.0));
            assert_eq!(text.line_height, TextMetric::Mixed);
        }
        other => panic!("label should be text, got {other:?}"),
    }
    Ok(())
}

#[test]
fn fixture_reports_its_dangling_child() -> Result<()> {
    let doc = Document::from_path(&fixture_path())?;
    assert_eq!(
        doc.validate(),
        vec![DocumentIssue::DanglingChild {
            parent: "root".into(),
            child: "ghost".into()
        }]
    );
    Ok(())
}

#[test]
fn save_and_reload_preserves_the_document() -> Result<()> {
    let doc = Document::from_path(&fixture_path())?;
    let dir = tempfile::tempdir()?;
    let out = dir.path().join("scene.json");
    doc.save(&out)?;

    let reloaded = Document::from_path(&out)?;
    assert_eq!(reloaded, doc);

    let raw: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&out)?)?;
    assert_eq!(raw["nodes"]["ring"]["type"], "BOOLEAN_OPERATION");
    assert_eq!(raw["nodes"]["label"]["lineHeight"], "MIXED");
    assert_eq!(raw["nodes"]["label"]["font"]["faceName"], "Inter-Regular");
    Ok(())
}

#[test]
fn missing_file_names_the_path() {
    let err = Document::from_path(&PathBuf::from("/definitely/not/here.json")).unwrap_err();
    assert!(format!("{err:#}").contains("/definitely/not/here.json"));
}
