//! Time Ruler
//!
//! Horizontal markers strip above the tracks: graduated time ticks with
//! labels, click-to-seek, and drag scrubbing.

use cutline_core::{major_tick_interval, minor_tick_interval};
use egui::{Pos2, Rect, Response, Sense, Stroke, Ui};

use crate::theme::Theme;

/// Response from ruler interaction.
#[derive(Debug, Clone)]
pub struct TimeRulerResponse {
    /// The egui response for the strip
    pub response: Response,
    /// Time the user clicked or scrubbed to, in seconds
    pub seeked_to: Option<f64>,
    /// Whether a scrub drag is in progress
    pub scrubbing: bool,
}

/// Horizontal time ruler for the timeline.
///
/// The ruler paints within `ui.max_rect()` and respects `ui.clip_rect()`;
/// the parent offsets `max_rect` by the scroll position.
pub struct TimeRuler {
    /// Seconds represented by the content width
    viewport_duration: f64,
    /// Content width in pixels
    content_width: f32,
    /// Strip height in pixels
    height: f32,
    id: Option<egui::Id>,
}

impl TimeRuler {
    /// Create a ruler for the given span and width.
    #[must_use]
    pub const fn new(viewport_duration: f64, content_width: f32) -> Self {
        Self {
            viewport_duration,
            content_width,
            height: 40.0,
            id: None,
        }
    }

    /// Set the strip height
    #[must_use]
    pub const fn height(mut self, height: f32) -> Self {
        self.height = height;
        self
    }

    /// Set a custom ID (needed when multiple rulers exist)
    #[must_use]
    pub fn id(mut self, id: impl Into<egui::Id>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Show the ruler within a pre-allocated clipped area.
    pub fn show_clipped(self, ui: &mut Ui, theme: &Theme) -> TimeRulerResponse {
        let rect = ui.max_rect();
        let clip = ui.clip_rect();
        let ruler_id = self.id.unwrap_or_else(|| ui.id()).with("time_ruler");
        let response = ui.interact(clip, ruler_id, Sense::click_and_drag());

        let mut seeked_to = None;
        let scrubbing = response.dragged();
        if response.clicked() || response.dragged() {
            if let Some(pos) = response.interact_pointer_pos() {
                let t = f64::from(pos.x - rect.min.x) / f64::from(self.content_width)
                    * self.viewport_duration;
                seeked_to = Some(t.clamp(0.0, self.viewport_duration));
            }
        }

        if ui.is_rect_visible(clip) {
            let painter = ui.painter().with_clip_rect(clip);
            painter.rect_filled(clip, 0.0, theme.card());
            painter.line_segment(
                [Pos2::new(clip.min.x, clip.max.y), Pos2::new(clip.max.x, clip.max.y)],
                Stroke::new(1.0, theme.input()),
            );
            self.draw_ticks(&painter, theme, rect, clip);
        }

        TimeRulerResponse {
            response,
            seeked_to,
            scrubbing,
        }
    }

    fn draw_ticks(&self, painter: &egui::Painter, theme: &Theme, rect: Rect, clip: Rect) {
        if self.viewport_duration <= 0.0 || self.content_width <= 0.0 {
            return;
        }
        let major = major_tick_interval(self.viewport_duration, self.content_width);
        let minor = minor_tick_interval(major);
        let px_per_sec = f64::from(self.content_width) / self.viewport_duration;

        let mut t = 0.0;
        let mut index = 0_u64;
        while t <= self.viewport_duration + 1e-9 {
            let x = rect.min.x + (t * px_per_sec) as f32;
            if x > clip.max.x + 1.0 {
                break;
            }
            let minor_per_major = (major / minor).round() as u64;
            let is_major = index % minor_per_major == 0;
            if x >= clip.min.x - 1.0 {
                if is_major {
                    painter.line_segment(
                        [Pos2::new(x, rect.max.y - rect.height() * 0.5), Pos2::new(x, rect.max.y)],
                        Stroke::new(1.5, theme.border()),
                    );
                    painter.text(
                        Pos2::new(x + theme.spacing.xs, rect.min.y + theme.spacing.xs),
                        egui::Align2::LEFT_TOP,
                        format_tick(t, major),
                        egui::FontId::proportional(10.0),
                        theme.muted_foreground(),
                    );
                } else {
                    painter.line_segment(
                        [Pos2::new(x, rect.max.y - rect.height() * 0.25), Pos2::new(x, rect.max.y)],
                        Stroke::new(0.5, theme.input()),
                    );
                }
            }
            index += 1;
            t = index as f64 * minor;
        }
    }
}

/// Format a tick label: fractional seconds zoomed in, h:mm:ss zoomed out.
#[must_use]
pub fn format_tick(t: f64, major: f64) -> String {
    if major < 1.0 {
        return format!("{t:.1}s");
    }
    let total = t.round() as u64;
    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let seconds = total % 60;
    if hours > 0 {
        format!("{hours}:{minutes:02}:{seconds:02}")
    } else {
        format!("{minutes}:{seconds:02}")
    }
}
