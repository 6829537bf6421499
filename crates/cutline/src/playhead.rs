//! Playhead and Hover Marker
//!
//! The red playhead line spanning ruler and tracks, and the faint ghost
//! marker that follows the cursor. Both are one-pixel overlays painted after
//! the content so they never take part in layout.

use egui::{Color32, Pos2, Rect, Sense, Stroke, Ui};

use crate::theme::Theme;

/// Playhead overlay across the full timeline height.
pub struct Playhead {
    /// Playhead time in seconds
    time: f64,
    /// Seconds represented by the content width
    viewport_duration: f64,
    color: Option<Color32>,
    id: Option<egui::Id>,
}

/// Response from playhead interaction.
#[derive(Debug, Clone)]
pub struct PlayheadResponse {
    /// Time the head was scrubbed to, in seconds
    pub scrubbed_to: Option<f64>,
    /// Whether the head is being dragged
    pub dragging: bool,
}

impl Playhead {
    /// Create a playhead at `time` within `viewport_duration`.
    #[must_use]
    pub const fn new(time: f64, viewport_duration: f64) -> Self {
        Self {
            time,
            viewport_duration,
            color: None,
            id: None,
        }
    }

    /// Override the line color
    #[must_use]
    pub const fn color(mut self, color: Color32) -> Self {
        self.color = Some(color);
        self
    }

    /// Set a custom ID
    #[must_use]
    pub fn id(mut self, id: impl Into<egui::Id>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Paint into `content_rect` (already offset by scroll) clipped to
    /// `clip_rect`, with a draggable grab handle at the top.
    pub fn show_in_rect(
        self,
        ui: &mut Ui,
        content_rect: Rect,
        clip_rect: Rect,
        theme: &Theme,
    ) -> PlayheadResponse {
        if self.viewport_duration <= 0.0 {
            return PlayheadResponse { scrubbed_to: None, dragging: false };
        }
        let x = content_rect.min.x
            + (self.time / self.viewport_duration) as f32 * content_rect.width();
        let color = self.color.unwrap_or_else(|| theme.destructive());

        let head_id = self.id.unwrap_or_else(|| ui.id()).with("playhead");
        let grab = Rect::from_center_size(
            Pos2::new(x, clip_rect.min.y + 6.0),
            egui::vec2(12.0, 12.0),
        );
        let response = ui.interact(grab, head_id, Sense::click_and_drag());

        let mut scrubbed_to = None;
        if response.dragged() {
            if let Some(pos) = response.interact_pointer_pos() {
                let t = f64::from(pos.x - content_rect.min.x) / f64::from(content_rect.width())
                    * self.viewport_duration;
                scrubbed_to = Some(t.clamp(0.0, self.viewport_duration));
            }
        }

        if clip_rect.x_range().contains(x) {
            let painter = ui.painter().with_clip_rect(clip_rect);
            painter.line_segment(
                [Pos2::new(x, clip_rect.min.y), Pos2::new(x, clip_rect.max.y)],
                Stroke::new(1.5, color),
            );
            // Grab handle triangle at the ruler.
            let size = 5.0;
            painter.add(egui::Shape::convex_polygon(
                vec![
                    Pos2::new(x - size, clip_rect.min.y),
                    Pos2::new(x + size, clip_rect.min.y),
                    Pos2::new(x, clip_rect.min.y + size * 1.6),
                ],
                color,
                Stroke::NONE,
            ));
        }

        PlayheadResponse {
            scrubbed_to,
            dragging: response.dragged(),
        }
    }
}

/// Faint vertical line following the cursor over the tracks.
pub fn draw_ghost_marker(
    ui: &Ui,
    time: f64,
    viewport_duration: f64,
    content_rect: Rect,
    clip_rect: Rect,
    theme: &Theme,
) {
    if viewport_duration <= 0.0 {
        return;
    }
    let x = content_rect.min.x + (time / viewport_duration) as f32 * content_rect.width();
    if clip_rect.x_range().contains(x) {
        ui.painter().with_clip_rect(clip_rect).line_segment(
            [Pos2::new(x, clip_rect.min.y), Pos2::new(x, clip_rect.max.y)],
            Stroke::new(1.0, theme.muted_foreground().gamma_multiply(0.5)),
        );
    }
}
