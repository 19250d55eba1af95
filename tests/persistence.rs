mod common;

use common::{editor_with_frames, stroke_through};
use eframe_flipbook::ProjectFile;
use eframe_flipbook::state::PersistenceError;

#[test]
fn test_project_round_trips_through_json() {
    let mut editor = editor_with_frames(2);
    assert!(editor.extend_frame(0, 2, false));
    assert!(editor.add_layer());
    assert!(editor.add_stroke(stroke_through(&[(1.0, 2.0), (3.0, 4.0), (5.0, 6.0)])));
    assert!(editor.fill_canvas());
    let id = editor.document().current_layer_id();
    assert!(editor.toggle_layer_lock(id));

    let json = ProjectFile::new(editor.document()).to_json().unwrap();
    let loaded = ProjectFile::from_json(&json).unwrap();
    assert_eq!(&loaded.document, editor.document());
    assert_eq!(loaded.version, env!("CARGO_PKG_VERSION"));
}

#[test]
fn test_save_and_load_file() {
    let mut editor = editor_with_frames(3);
    assert!(editor.add_stroke(stroke_through(&[(0.0, 0.0), (9.0, 9.0)])));

    let path = std::env::temp_dir()
        .join(format!("flipbook-test-{}", uuid::Uuid::new_v4()))
        .join("project.json");
    ProjectFile::new(editor.document()).save(&path).unwrap();
    let loaded = ProjectFile::load(&path).unwrap().into_document();
    let _ = std::fs::remove_dir_all(path.parent().unwrap());

    let mut restored = eframe_flipbook::EditorContext::default();
    restored.load_document(loaded);
    assert_eq!(restored.document(), editor.document());
    assert!(!restored.can_undo());
}

#[test]
fn test_garbage_is_rejected() {
    assert!(matches!(
        ProjectFile::from_json("{\"version\": 1}"),
        Err(PersistenceError::SerializationError(_))
    ));
}
