//! Cutline Theme System
//!
//! Serializable theme for the timeline widgets. Colors follow shadcn/ui
//! naming so applications already using that convention can map their
//! palette straight across.

use egui::Color32;
use serde::{Deserialize, Serialize};

/// Complete theme with colors and spacing
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Theme {
    /// Color palette
    pub colors: ColorPalette,
    /// Spacing configuration
    pub spacing: Spacing,
}

/// Color palette using shadcn/ui naming conventions
/// All colors stored as [R, G, B] for serializability
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ColorPalette {
    /// Default background color
    pub background: [u8; 3],
    /// Default foreground (text) color
    pub foreground: [u8; 3],
    /// Card background color for elevated surfaces
    pub card: [u8; 3],
    /// Primary brand color
    pub primary: [u8; 3],
    /// Primary foreground (text) color
    pub primary_foreground: [u8; 3],
    /// Secondary color
    pub secondary: [u8; 3],
    /// Muted/subtle background color
    pub muted: [u8; 3],
    /// Muted foreground (text) color
    pub muted_foreground: [u8; 3],
    /// Accent color
    pub accent: [u8; 3],
    /// Destructive/error color
    pub destructive: [u8; 3],
    /// Border color
    pub border: [u8; 3],
    /// Input border color
    pub input: [u8; 3],
    /// Focus ring color
    pub ring: [u8; 3],
    /// Hover state color
    pub hover: [u8; 3],
}

/// Spacing configuration for layouts
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Spacing {
    /// Extra small spacing (4px)
    pub xs: f32,
    /// Small spacing (8px)
    pub sm: f32,
    /// Medium spacing (16px)
    pub md: f32,
    /// Large spacing (24px)
    pub lg: f32,
    /// Tiny corner radius (4px)
    pub corner_radius_tiny: u8,
    /// Small corner radius (8px)
    pub corner_radius_small: u8,
    /// Standard corner radius (12px)
    pub corner_radius: u8,
}

impl Default for Theme {
    fn default() -> Self {
        Self::dark()
    }
}

impl Theme {
    /// Dark theme using the Zinc palette (shadcn default)
    #[must_use]
    pub const fn dark() -> Self {
        Self {
            colors: ColorPalette {
                background: [9, 9, 11],        // zinc-950
                foreground: [250, 250, 250],   // zinc-50
                card: [24, 24, 27],            // zinc-900
                primary: [99, 102, 241],       // indigo-500
                primary_foreground: [250, 250, 250],
                secondary: [39, 39, 42],       // zinc-800
                muted: [39, 39, 42],           // zinc-800
                muted_foreground: [161, 161, 170], // zinc-400
                accent: [14, 165, 233],        // sky-500
                destructive: [239, 68, 68],    // red-500
                border: [39, 39, 42],          // zinc-800
                input: [63, 63, 70],           // zinc-700
                ring: [99, 102, 241],          // indigo-500
                hover: [39, 39, 42],           // zinc-800
            },
            spacing: Spacing {
                xs: 4.0,
                sm: 8.0,
                md: 16.0,
                lg: 24.0,
                corner_radius_tiny: 4,
                corner_radius_small: 8,
                corner_radius: 12,
            },
        }
    }

    /// Light theme
    #[must_use]
    pub const fn light() -> Self {
        Self {
            colors: ColorPalette {
                background: [255, 255, 255],
                foreground: [9, 9, 11],        // zinc-950
                card: [250, 250, 250],         // zinc-50
                primary: [79, 70, 229],        // indigo-600
                primary_foreground: [250, 250, 250],
                secondary: [244, 244, 245],    // zinc-100
                muted: [244, 244, 245],        // zinc-100
                muted_foreground: [113, 113, 122], // zinc-500
                accent: [2, 132, 199],         // sky-600
                destructive: [220, 38, 38],    // red-600
                border: [228, 228, 231],       // zinc-200
                input: [212, 212, 216],        // zinc-300
                ring: [79, 70, 229],           // indigo-600
                hover: [244, 244, 245],        // zinc-100
            },
            spacing: Spacing {
                xs: 4.0,
                sm: 8.0,
                md: 16.0,
                lg: 24.0,
                corner_radius_tiny: 4,
                corner_radius_small: 8,
                corner_radius: 12,
            },
        }
    }

    /// Default background color
    #[must_use]
    pub const fn background(&self) -> Color32 {
        rgb(self.colors.background)
    }

    /// Default foreground (text) color
    #[must_use]
    pub const fn foreground(&self) -> Color32 {
        rgb(self.colors.foreground)
    }

    /// Card background color
    #[must_use]
    pub const fn card(&self) -> Color32 {
        rgb(self.colors.card)
    }

    /// Primary brand color
    #[must_use]
    pub const fn primary(&self) -> Color32 {
        rgb(self.colors.primary)
    }

    /// Primary foreground (text) color
    #[must_use]
    pub const fn primary_foreground(&self) -> Color32 {
        rgb(self.colors.primary_foreground)
    }

    /// Secondary color
    #[must_use]
    pub const fn secondary(&self) -> Color32 {
        rgb(self.colors.secondary)
    }

    /// Muted/subtle background color
    #[must_use]
    pub const fn muted(&self) -> Color32 {
        rgb(self.colors.muted)
    }

    /// Muted foreground (text) color
    #[must_use]
    pub const fn muted_foreground(&self) -> Color32 {
        rgb(self.colors.muted_foreground)
    }

    /// Accent color
    #[must_use]
    pub const fn accent(&self) -> Color32 {
        rgb(self.colors.accent)
    }

    /// Destructive/error color
    #[must_use]
    pub const fn destructive(&self) -> Color32 {
        rgb(self.colors.destructive)
    }

    /// Border color
    #[must_use]
    pub const fn border(&self) -> Color32 {
        rgb(self.colors.border)
    }

    /// Input border color
    #[must_use]
    pub const fn input(&self) -> Color32 {
        rgb(self.colors.input)
    }

    /// Focus ring color
    #[must_use]
    pub const fn ring(&self) -> Color32 {
        rgb(self.colors.ring)
    }

    /// Hover state color
    #[must_use]
    pub const fn hover(&self) -> Color32 {
        rgb(self.colors.hover)
    }
}

const fn rgb(c: [u8; 3]) -> Color32 {
    Color32::from_rgb(c[0], c[1], c[2])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_serde_round_trip() {
        let theme = Theme::dark();
        let json = serde_json::to_string(&theme).unwrap();
        let back: Theme = serde_json::from_str(&json).unwrap();
        assert_eq!(back.colors.primary, theme.colors.primary);
    }

    #[test]
    fn test_dark_light_differ() {
        assert_ne!(Theme::dark().colors.background, Theme::light().colors.background);
    }
}
