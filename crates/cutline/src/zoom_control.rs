//! Zoom Control
//!
//! Buttons and slider for adjusting the timeline zoom. The control only
//! reports intent; the timeline view applies it through the zoom controller
//! so the playhead anchor math stays in one place.

use egui::{Response, Ui};

use crate::theme::Theme;

/// Response from zoom control interaction.
#[derive(Debug, Clone)]
pub struct ZoomControlResponse {
    /// The egui response for the row
    pub response: Response,
    /// Zoom in button was clicked
    pub zoom_in: bool,
    /// Zoom out button was clicked
    pub zoom_out: bool,
    /// Reset button was clicked
    pub reset: bool,
    /// Slider target scale, while the slider is being dragged
    pub slider_scale: Option<f64>,
    /// Slider drag started this frame
    pub slider_started: bool,
    /// Slider drag ended this frame
    pub slider_ended: bool,
}

/// Zoom control row: − / slider / + / percentage / reset.
pub struct ZoomControl {
    scale: f64,
    min: f64,
    max: f64,
    slider_width: f32,
    show_label: bool,
}

impl ZoomControl {
    /// Create a control reflecting the current scale.
    #[must_use]
    pub const fn new(scale: f64, min: f64, max: f64) -> Self {
        Self {
            scale,
            min,
            max,
            slider_width: 120.0,
            show_label: true,
        }
    }

    /// Set the slider width in pixels
    #[must_use]
    pub const fn slider_width(mut self, width: f32) -> Self {
        self.slider_width = width.max(50.0);
        self
    }

    /// Show or hide the percentage label
    #[must_use]
    pub const fn show_label(mut self, show: bool) -> Self {
        self.show_label = show;
        self
    }

    /// Show the control.
    pub fn show(self, ui: &mut Ui, theme: &Theme) -> ZoomControlResponse {
        let mut zoom_in = false;
        let mut zoom_out = false;
        let mut reset = false;
        let mut slider_scale = None;
        let mut slider_started = false;
        let mut slider_ended = false;

        let response = ui
            .horizontal(|ui| {
                ui.spacing_mut().item_spacing.x = theme.spacing.sm;

                if ui.button("−").clicked() {
                    zoom_out = true;
                }

                let mut value = self.scale;
                let slider = ui.add(
                    egui::Slider::new(&mut value, self.min..=self.max)
                        .logarithmic(true)
                        .show_value(false),
                );
                if slider.drag_started() {
                    slider_started = true;
                }
                if slider.changed() {
                    slider_scale = Some(value);
                }
                if slider.drag_stopped() {
                    slider_ended = true;
                }

                if ui.button("+").clicked() {
                    zoom_in = true;
                }

                if self.show_label {
                    ui.label(
                        egui::RichText::new(format!("{:.0}%", self.scale * 100.0))
                            .color(theme.muted_foreground())
                            .size(11.0),
                    );
                }

                if ui.button("1:1").clicked() {
                    reset = true;
                }
            })
            .response;

        ZoomControlResponse {
            response,
            zoom_in,
            zoom_out,
            reset,
            slider_scale,
            slider_started,
            slider_ended,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zoom_control_builder() {
        let control = ZoomControl::new(2.0, 0.5, 30.0).slider_width(200.0).show_label(false);
        assert_eq!(control.scale, 2.0);
        assert_eq!(control.slider_width, 200.0);
        assert!(!control.show_label);
    }
}
