//! Tests for the TimelineView widget using egui_kittest

use cutline::{CutlineContextExt, Theme, TimelineView, Transport};
use cutline_core::{ItemKind, Overlay, TimelineConfig, TimelineEditor};
use egui_kittest::Harness;

fn overlay(id: &str, from: i64, frames: i64, row: usize, kind: ItemKind) -> Overlay {
    Overlay {
        id: id.into(),
        from,
        duration_in_frames: frames,
        row,
        kind,
        label: Some(id.to_uppercase()),
        color: Some([120, 140, 255]),
        speed: None,
        video_start_time: None,
        start_from_sound: None,
        media_duration: None,
        data: serde_json::Value::Null,
    }
}

fn editor() -> TimelineEditor {
    let mut editor = TimelineEditor::new(TimelineConfig::default());
    editor.set_overlays(
        vec![
            overlay("a", 0, 60, 0, ItemKind::Video),
            overlay("b", 90, 60, 0, ItemKind::Text),
            overlay("c", 0, 120, 1, ItemKind::Audio),
        ],
        0.0,
    );
    editor
}

/// The timeline renders without panicking
#[test]
fn test_timeline_renders() {
    let mut editor = editor();
    let mut harness = Harness::new_ui(|ui| {
        let theme = ui.ctx().cutline_theme();
        TimelineView::new().show(ui, &mut editor, &theme);
    });

    harness.run();
}

/// An empty editor still renders one (empty) track row
#[test]
fn test_timeline_renders_empty() {
    let mut editor = TimelineEditor::new(TimelineConfig::default());
    let mut harness = Harness::new_ui(|ui| {
        let theme = ui.ctx().cutline_theme();
        TimelineView::new().show(ui, &mut editor, &theme);
    });

    harness.run();
}

/// Split mode changes hit handling but must not change rendering safety
#[test]
fn test_timeline_renders_in_split_mode() {
    let mut editor = editor();
    editor.set_split_mode(true);
    let mut harness = Harness::new_ui(|ui| {
        let theme = ui.ctx().cutline_theme();
        TimelineView::new().show(ui, &mut editor, &theme);
    });

    harness.run();
}

/// A selection draws resize handles
#[test]
fn test_timeline_renders_with_selection() {
    let mut editor = editor();
    editor.click_item("a", false);
    let mut harness = Harness::new_ui(|ui| {
        let theme = ui.ctx().cutline_theme();
        TimelineView::new().show(ui, &mut editor, &theme);
    });

    harness.run();
}

/// Zoomed far in, the content is wider than the viewport
#[test]
fn test_timeline_renders_zoomed() {
    let mut editor = editor();
    editor.zoom.zoom_at(200.0, 0.0, 8.0);
    let mut harness = Harness::new_ui(|ui| {
        let theme = ui.ctx().cutline_theme();
        TimelineView::new().show(ui, &mut editor, &theme);
    });

    harness.run();
    harness.run();
}

/// The transport strip renders and reflects playback state
#[test]
fn test_transport_renders() {
    let mut editor = editor();
    editor.toggle_playback();
    let mut harness = Harness::new_ui(|ui| {
        let theme = ui.ctx().cutline_theme();
        Transport::new().show(ui, &mut editor, &theme);
    });

    harness.run();
}

/// Light theme renders too
#[test]
fn test_timeline_renders_light_theme() {
    let mut editor = editor();
    let mut harness = Harness::new_ui(|ui| {
        ui.ctx().set_cutline_theme(Theme::light());
        let theme = ui.ctx().cutline_theme();
        TimelineView::new().show(ui, &mut editor, &theme);
    });

    harness.run();
}
