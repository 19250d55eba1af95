mod common;

use common::{editor_with_frames, frame_ids, stroke_through};
use std::sync::Arc;

#[test]
fn test_hold_run_propagation() {
    // frames: K0, K1, H, H, K4
    let mut editor = editor_with_frames(2);
    assert!(editor.extend_frame(1, 2, false));
    assert!(editor.set_current_frame(3));
    assert!(editor.add_frame());
    assert_eq!(editor.document().frame_count(), 5);

    assert!(editor.set_current_frame(2));
    let stroke = stroke_through(&[(0.0, 0.0), (10.0, 10.0)]);
    assert!(editor.add_stroke(stroke.clone()));

    let layer_id = editor.document().current_layer_id();
    for (index, frame) in editor.document().frames().iter().enumerate() {
        let strokes = &frame.layer(layer_id).unwrap().strokes;
        if (1..=3).contains(&index) {
            assert_eq!(strokes.len(), 1, "frame {index}");
            assert!(Arc::ptr_eq(&strokes[0], &stroke));
        } else {
            assert!(strokes.is_empty(), "frame {index}");
        }
    }
}

#[test]
fn test_fill_follows_hold_run() {
    let mut editor = editor_with_frames(1);
    assert!(editor.extend_frame(0, 2, false));
    assert!(editor.fill_canvas());
    assert!(editor
        .document()
        .frames()
        .iter()
        .all(|frame| frame.stroke_count() == 1));
}

#[test]
fn test_clear_canvas_is_frame_local() {
    let mut editor = editor_with_frames(1);
    assert!(editor.extend_frame(0, 1, false));
    assert!(editor.add_stroke(stroke_through(&[(0.0, 0.0), (1.0, 1.0)])));
    assert!(editor.clear_canvas());
    assert_eq!(editor.document().frames()[0].stroke_count(), 0);
    assert_eq!(editor.document().frames()[1].stroke_count(), 1);
}

#[test]
fn test_frame_deletion_before_current() {
    let mut editor = editor_with_frames(5);
    assert!(editor.set_current_frame(3));
    assert!(editor.delete_frame(1));
    assert_eq!(editor.document().current_frame_index(), 2);
}

#[test]
fn test_frame_deletion_after_current() {
    let mut editor = editor_with_frames(5);
    assert!(editor.set_current_frame(3));
    assert!(editor.delete_frame(4));
    assert_eq!(editor.document().current_frame_index(), 3);
}

#[test]
fn test_last_frame_cannot_be_deleted() {
    let mut editor = editor_with_frames(1);
    assert!(!editor.delete_frame(0));
    assert_eq!(editor.document().frame_count(), 1);
    assert!(!editor.can_undo());
}

#[test]
fn test_out_of_range_arguments_are_noops() {
    let mut editor = editor_with_frames(2);
    let before = editor.document().clone();
    let undo_len = editor.history().undo_len();

    assert!(!editor.delete_frame(9));
    assert!(!editor.duplicate_frame(9));
    assert!(!editor.extend_frame(9, 1, false));
    assert!(!editor.delete_layer(eframe_flipbook::LayerId::new()));

    assert_eq!(editor.document(), &before);
    assert_eq!(editor.history().undo_len(), undo_len);
}

#[test]
fn test_extend_shrink_symmetry() {
    let mut editor = editor_with_frames(2);
    let original = frame_ids(&editor);

    assert!(editor.extend_frame(0, 3, false));
    assert_eq!(editor.document().frame_count(), 5);
    assert!(editor.document().frames()[1..4].iter().all(|frame| !frame.is_keyframe));

    assert!(editor.extend_frame(0, -3, false));
    assert_eq!(frame_ids(&editor), original);
}

#[test]
fn test_shrink_never_crosses_keyframe() {
    let mut editor = editor_with_frames(3);
    assert!(editor.extend_frame(0, 1, false));
    let before = editor.document().frame_count();
    assert!(editor.extend_frame(0, -10, false));
    assert_eq!(editor.document().frame_count(), before - 1);
    assert!(editor.document().frames().iter().all(|frame| frame.is_keyframe));
}

#[test]
fn test_duplicate_frame_is_keyframe_copy() {
    let mut editor = editor_with_frames(1);
    assert!(editor.extend_frame(0, 1, false));
    assert!(editor.add_stroke(stroke_through(&[(0.0, 0.0), (5.0, 5.0)])));

    assert!(editor.duplicate_frame(1));
    let document = editor.document();
    assert_eq!(document.frame_count(), 3);
    assert_eq!(document.current_frame_index(), 2);
    let copy = &document.frames()[2];
    assert!(copy.is_keyframe);
    assert_ne!(copy.id, document.frames()[1].id);
    assert_eq!(copy.stroke_count(), 1);
}

#[test]
fn test_keyframe_numbering_skips_holds() {
    let mut editor = editor_with_frames(2);
    assert!(editor.extend_frame(0, 2, false));
    assert_eq!(
        editor.document().keyframe_numbers(),
        vec![Some(1), None, None, Some(2)]
    );
}

#[test]
fn test_add_frame_inside_hold_run_keeps_holds_consistent() {
    // K0 with two holds, all showing stroke A
    let mut editor = editor_with_frames(1);
    assert!(editor.add_stroke(stroke_through(&[(0.0, 0.0), (5.0, 5.0)])));
    assert!(editor.extend_frame(0, 2, false));
    assert!(editor.set_current_frame(0));

    assert!(editor.add_frame());
    assert_eq!(editor.document().current_frame_index(), 1);
    assert!(editor.add_stroke(stroke_through(&[(1.0, 1.0), (9.0, 9.0)])));

    let layer_id = editor.document().current_layer_id();
    let shape: Vec<(bool, usize)> = editor
        .document()
        .frames()
        .iter()
        .map(|frame| (frame.is_keyframe, frame.layer(layer_id).unwrap().strokes.len()))
        .collect();
    assert_eq!(shape, vec![(true, 1), (true, 1), (true, 1), (false, 1)]);

    // Every hold still matches the keyframe that owns it
    let frames = editor.document().frames();
    for (index, frame) in frames.iter().enumerate().filter(|(_, frame)| !frame.is_keyframe) {
        let keyframe = &frames[*editor.document().hold_run(index).start()];
        assert_eq!(frame.layers, keyframe.layers, "frame {index}");
    }
}
