//! Integration tests for the signature pad (signature-pad).
//!
//! Replays JSON gesture scripts and checks the files written to disk.

use signature_core::parse_script;
use signature_pad::{PadConfig, PadEvent, SignaturePad};
use signature_renderer::ExportFormat;
use std::sync::{Arc, Mutex};

const GESTURE: &str = r#"[
    {"type": "SetStrokeColor", "data": {"color": "darkgray"}},
    {"type": "Pointer", "data": {"phase": "down", "x": 30.0, "y": 150.0}},
    {"type": "Pointer", "data": {"phase": "move", "x": 80.0, "y": 120.0, "pressure": 0.7}},
    {"type": "Pointer", "data": {"phase": "move", "x": 140.0, "y": 170.0, "pressure": 0.9}},
    {"type": "Pointer", "data": {"phase": "move", "x": 220.0, "y": 130.0}},
    {"type": "Pointer", "data": {"phase": "up", "x": 220.0, "y": 130.0}}
]"#;

fn config_in(dir: &std::path::Path, format: ExportFormat) -> PadConfig {
    PadConfig {
        out_dir: dir.to_path_buf(),
        format,
        ..PadConfig::default()
    }
}

// ==========================================================================
// Save
// ==========================================================================

#[test]
fn test_replayed_gesture_saves_jpeg() {
    let temp = tempfile::tempdir().expect("tempdir");
    let mut pad =
        SignaturePad::from_config(config_in(temp.path(), ExportFormat::Jpeg)).expect("pad");

    let events = parse_script(GESTURE).expect("script");
    assert_eq!(pad.replay(&events), 0);

    let saved = pad.save().expect("save");
    assert!(saved.name.starts_with("signature_"));
    assert!(saved.name.ends_with(".jpg"));
    assert_eq!((saved.width, saved.height), (600, 300));

    let bytes = std::fs::read(&saved.path).expect("read");
    assert_eq!(bytes.len() as u64, saved.size);
    let decoded = image::load_from_memory(&bytes).expect("decode").to_rgba8();
    assert_eq!(decoded.dimensions(), (600, 300));
    assert!(decoded.get_pixel(0, 0).0[0] >= 240);
}

#[test]
fn test_png_save_keeps_transparency() {
    let temp = tempfile::tempdir().expect("tempdir");
    let mut pad =
        SignaturePad::from_config(config_in(temp.path(), ExportFormat::Png)).expect("pad");
    pad.replay(&parse_script(GESTURE).expect("script"));

    let saved = pad.save().expect("save");
    assert!(saved.name.ends_with(".png"));
    let decoded = image::open(&saved.path).expect("open").to_rgba8();
    assert_eq!(decoded.get_pixel(599, 0).0[3], 0);
}

#[test]
fn test_empty_pad_writes_nothing() {
    let temp = tempfile::tempdir().expect("tempdir");
    let out = temp.path().join("out");
    let mut pad = SignaturePad::from_config(config_in(&out, ExportFormat::Jpeg)).expect("pad");

    pad.replay(&parse_script(GESTURE).expect("script"));
    pad.clear();

    let err = pad.save().expect_err("empty");
    assert!(err.is_empty_canvas());
    assert_eq!(std::fs::read_dir(&out).expect("read_dir").count(), 0);
}

// ==========================================================================
// Events
// ==========================================================================

#[test]
fn test_listener_sees_clear_and_save() {
    let temp = tempfile::tempdir().expect("tempdir");
    let mut pad =
        SignaturePad::from_config(config_in(temp.path(), ExportFormat::Png)).expect("pad");

    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    pad.set_on_event(move |event| sink.lock().expect("lock").push(event.clone()));

    let script = parse_script(GESTURE).expect("script");
    pad.replay(&script);
    let saved = pad.save().expect("save");
    pad.replay(&parse_script(r#"[{"type": "Clear"}]"#).expect("clear script"));
    let _ = pad.save();

    let seen = seen.lock().expect("lock");
    assert_eq!(seen.len(), 3);
    assert_eq!(seen[0], PadEvent::Saved(saved));
    assert_eq!(seen[1], PadEvent::Cleared);
    assert!(matches!(
        seen[2],
        PadEvent::SaveFailed {
            empty_canvas: true,
            ..
        }
    ));
}

#[test]
fn test_two_saves_produce_two_files() {
    let temp = tempfile::tempdir().expect("tempdir");
    let mut pad =
        SignaturePad::from_config(config_in(temp.path(), ExportFormat::Png)).expect("pad");
    pad.replay(&parse_script(GESTURE).expect("script"));

    let first = pad.save().expect("first");
    let second = pad.save().expect("second");
    assert_ne!(first.path, second.path);
    assert_eq!(
        std::fs::read(&first.path).expect("first bytes"),
        std::fs::read(&second.path).expect("second bytes")
    );
}
