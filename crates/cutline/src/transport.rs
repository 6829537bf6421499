//! Transport Strip
//!
//! Play/pause and seek buttons plus a timecode readout, wired to the editor
//! facade's playback commands.

use cutline_core::{frame_to_time, TimelineEditor};
use egui::{Response, Ui};

use crate::theme::Theme;

/// Response from transport interaction.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    /// The egui response for the row
    pub response: Response,
}

/// Transport control row: ⏮ ⏯ ⏭ and the current timecode.
pub struct Transport;

impl Transport {
    /// Create a transport strip.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Show the strip, pushing commands straight into the editor.
    pub fn show(self, ui: &mut Ui, editor: &mut TimelineEditor, theme: &Theme) -> TransportResponse {
        let response = ui
            .horizontal(|ui| {
                ui.spacing_mut().item_spacing.x = theme.spacing.sm;

                if ui.button("⏮").on_hover_text("Seek to start").clicked() {
                    editor.seek_to_start();
                }
                let play_label = if editor.is_playing() { "⏸" } else { "▶" };
                if ui.button(play_label).clicked() {
                    editor.toggle_playback();
                }
                if ui.button("⏭").on_hover_text("Seek to end").clicked() {
                    editor.seek_to_end();
                }

                let time = frame_to_time(editor.current_frame(), editor.config.fps);
                let minutes = (time / 60.0).floor() as u64;
                let seconds = time % 60.0;
                ui.label(
                    egui::RichText::new(format!("{minutes}:{seconds:05.2}"))
                        .color(theme.muted_foreground())
                        .monospace(),
                );
            })
            .response;

        TransportResponse { response }
    }
}

impl Default for Transport {
    fn default() -> Self {
        Self::new()
    }
}
