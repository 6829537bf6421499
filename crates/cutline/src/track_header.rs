//! Track Header
//!
//! One cell of the left handle column: track name plus magnetic, visibility
//! and mute toggles. Clicking the header body reports a selection toggle so
//! the parent can highlight the row.

use cutline_core::Track;
use egui::{Color32, Pos2, Rect, Response, Sense, Stroke, Ui, Vec2};

use crate::theme::Theme;

/// Response from header interaction.
#[derive(Debug, Clone)]
pub struct TrackHeaderResponse {
    /// The egui response for the whole cell
    pub response: Response,
    /// Magnetic toggle clicked
    pub magnetic_clicked: bool,
    /// Visibility toggle clicked
    pub visible_clicked: bool,
    /// Mute toggle clicked
    pub mute_clicked: bool,
    /// Delete button clicked
    pub delete_clicked: bool,
}

/// Header cell for one track row.
pub struct TrackHeader {
    width: f32,
    height: f32,
    id: Option<egui::Id>,
}

impl TrackHeader {
    /// Create a header cell.
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height, id: None }
    }

    /// Set a custom ID (required with multiple rows)
    #[must_use]
    pub fn id(mut self, id: impl Into<egui::Id>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Show the header for `track`.
    pub fn show(self, ui: &mut Ui, track: &Track, theme: &Theme) -> TrackHeaderResponse {
        let (rect, response) =
            ui.allocate_exact_size(Vec2::new(self.width, self.height), Sense::click());
        let id = self.id.unwrap_or_else(|| ui.id()).with(&track.id);

        let mut magnetic_clicked = false;
        let mut visible_clicked = false;
        let mut mute_clicked = false;
        let mut delete_clicked = false;

        if ui.is_rect_visible(rect) {
            let painter = ui.painter().with_clip_rect(rect);
            painter.rect_filled(rect, 0.0, theme.card());
            painter.line_segment(
                [Pos2::new(rect.min.x, rect.max.y), Pos2::new(rect.max.x, rect.max.y)],
                Stroke::new(1.0, theme.border()),
            );

            let name = track.name.clone().unwrap_or_else(|| "Track".to_string());
            painter.text(
                Pos2::new(rect.min.x + theme.spacing.sm, rect.min.y + theme.spacing.xs),
                egui::Align2::LEFT_TOP,
                name,
                egui::FontId::proportional(11.0),
                theme.foreground(),
            );

            // Toggle row along the bottom edge of the cell.
            let button = Vec2::new(18.0, 16.0);
            let y = rect.max.y - button.y - 3.0;
            let toggles: [(&str, bool, &mut bool); 4] = [
                ("M", track.magnetic, &mut magnetic_clicked),
                ("V", track.visible, &mut visible_clicked),
                ("S", track.muted, &mut mute_clicked),
                ("X", false, &mut delete_clicked),
            ];
            let mut x = rect.min.x + theme.spacing.sm;
            for (label, active, clicked) in toggles {
                let button_rect = Rect::from_min_size(Pos2::new(x, y), button);
                let button_response =
                    ui.interact(button_rect, id.with(label), Sense::click());
                let fill = if active {
                    theme.primary()
                } else if button_response.hovered() {
                    theme.hover()
                } else {
                    theme.secondary()
                };
                painter.rect_filled(button_rect, 3.0, fill);
                painter.text(
                    button_rect.center(),
                    egui::Align2::CENTER_CENTER,
                    label,
                    egui::FontId::proportional(9.0),
                    if active { theme.primary_foreground() } else { theme.muted_foreground() },
                );
                if button_response.clicked() {
                    *clicked = true;
                }
                x += button.x + 4.0;
            }

            if !track.visible {
                painter.rect_filled(rect, 0.0, Color32::from_black_alpha(60));
            }
        }

        TrackHeaderResponse {
            response,
            magnetic_clicked,
            visible_clicked,
            mute_clicked,
            delete_clicked,
        }
    }
}
