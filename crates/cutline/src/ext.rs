//! Context extension for theme storage
//!
//! Stores the Cutline theme in egui's context so widgets can fetch it
//! without every call site threading it through.

use crate::theme::Theme;
use egui::Context;

/// Extension trait for storing the Cutline theme in an egui `Context`.
pub trait CutlineContextExt {
    /// The current theme, or `Theme::dark()` when none was set.
    fn cutline_theme(&self) -> Theme;

    /// Store the theme for all widgets to pick up.
    fn set_cutline_theme(&self, theme: Theme);
}

impl CutlineContextExt for Context {
    fn cutline_theme(&self) -> Theme {
        self.data(|d| d.get_temp(egui::Id::new("cutline_theme")))
            .unwrap_or_else(Theme::dark)
    }

    fn set_cutline_theme(&self, theme: Theme) {
        self.data_mut(|d| d.insert_temp(egui::Id::new("cutline_theme"), theme));
    }
}
