//! Drag Previews
//!
//! Everything drawn on top of the tracks while a gesture is in flight:
//! track-aligned ghosts, the cursor-attached floating ghost, the blue
//! new-track insertion line, alignment guidelines, magnetic reflow previews,
//! and the marquee rectangle.

use cutline_core::{
    Ghost, Guideline, MagneticPreview, MarqueeRect, TimelineStore,
};
use egui::{Color32, Pos2, Rect, Stroke, Ui, Vec2};

use crate::theme::Theme;

/// Paints every store-driven preview. Call after the track content.
pub fn draw_drag_previews(
    ui: &Ui,
    store: &TimelineStore,
    viewport_duration: f64,
    content_rect: Rect,
    clip_rect: Rect,
    track_height: f32,
    track_count: usize,
    theme: &Theme,
) {
    let painter = ui.painter().with_clip_rect(clip_rect);

    if let Some(ghosts) = &store.ghost_elements {
        for ghost in ghosts {
            draw_ghost(&painter, ghost, content_rect, track_height, track_count, theme);
        }
    }

    if let Some(preview) = &store.magnetic_preview {
        draw_magnetic_preview(
            &painter,
            store,
            preview,
            viewport_duration,
            content_rect,
            track_height,
            track_count,
            theme,
        );
    }

    if let Some(floating) = &store.floating_ghost {
        draw_floating_ghost(&painter, floating, content_rect, track_height, theme);
    }

    if let Some(index) = store.insertion_index {
        draw_insertion_line(&painter, index, content_rect, clip_rect, track_height, theme);
    }
}

fn draw_ghost(
    painter: &egui::Painter,
    ghost: &Ghost,
    content_rect: Rect,
    track_height: f32,
    track_count: usize,
    theme: &Theme,
) {
    let x = content_rect.min.x + (ghost.left_pct / 100.0) as f32 * content_rect.width();
    let width = (ghost.width_pct / 100.0) as f32 * content_rect.width();
    let y = content_rect.min.y + (ghost.top_pct / 100.0) as f32 * track_height * track_count as f32;
    let rect = Rect::from_min_size(Pos2::new(x, y + 3.0), Vec2::new(width, track_height - 6.0));

    // Invalid drops glow red; valid ones use the brand color.
    let color = if ghost.valid { theme.primary() } else { theme.destructive() };
    painter.rect_filled(rect, 4.0, color.gamma_multiply(0.25));
    painter.rect_stroke(rect, 4.0, Stroke::new(1.5, color), egui::StrokeKind::Inside);
}

fn draw_floating_ghost(
    painter: &egui::Painter,
    floating: &cutline_core::FloatingGhost,
    content_rect: Rect,
    track_height: f32,
    theme: &Theme,
) {
    let rect = Rect::from_min_size(
        Pos2::new(content_rect.min.x + floating.x, content_rect.min.y + floating.y - track_height * 0.4),
        Vec2::new(floating.width.max(24.0), track_height * 0.8),
    );
    let color = if floating.valid { theme.accent() } else { theme.destructive() };
    painter.rect_filled(rect, 4.0, color.gamma_multiply(0.3));
    painter.rect_stroke(rect, 4.0, Stroke::new(1.0, color), egui::StrokeKind::Inside);
    if let Some(label) = &floating.label {
        painter.text(
            rect.center(),
            egui::Align2::CENTER_CENTER,
            label,
            egui::FontId::proportional(10.0),
            theme.foreground(),
        );
    }
}

fn draw_insertion_line(
    painter: &egui::Painter,
    index: usize,
    content_rect: Rect,
    clip_rect: Rect,
    track_height: f32,
    theme: &Theme,
) {
    let y = content_rect.min.y + index as f32 * track_height;
    painter.line_segment(
        [Pos2::new(clip_rect.min.x, y), Pos2::new(clip_rect.max.x, y)],
        Stroke::new(2.0, theme.accent()),
    );
    // End caps make the insertion target easier to read.
    for x in [clip_rect.min.x + 2.0, clip_rect.max.x - 2.0] {
        painter.circle_filled(Pos2::new(x, y), 3.0, theme.accent());
    }
}

fn draw_magnetic_preview(
    painter: &egui::Painter,
    store: &TimelineStore,
    preview: &MagneticPreview,
    viewport_duration: f64,
    content_rect: Rect,
    track_height: f32,
    track_count: usize,
    theme: &Theme,
) {
    if viewport_duration <= 0.0 {
        return;
    }
    // The target row comes from the ghost; the reflowed spans render as a
    // thin strip so the user can see where neighbors will land.
    let Some(ghost) = store.ghost_elements.as_ref().and_then(|g| g.first()) else {
        return;
    };
    let y = content_rect.min.y
        + (ghost.top_pct / 100.0) as f32 * track_height * track_count as f32;
    let width = content_rect.width();
    for item in &preview.items {
        let x0 = content_rect.min.x + (item.start / viewport_duration) as f32 * width;
        let x1 = content_rect.min.x + (item.end / viewport_duration) as f32 * width;
        painter.rect_stroke(
            Rect::from_min_max(Pos2::new(x0, y + 4.0), Pos2::new(x1, y + 9.0)),
            1.0,
            Stroke::new(1.0, theme.accent().gamma_multiply(0.8)),
            egui::StrokeKind::Inside,
        );
    }
}

/// Draw one-pixel alignment guidelines at the candidate times.
pub fn draw_guidelines(
    ui: &Ui,
    guidelines: &[Guideline],
    viewport_duration: f64,
    content_rect: Rect,
    clip_rect: Rect,
    theme: &Theme,
) {
    if viewport_duration <= 0.0 {
        return;
    }
    let painter = ui.painter().with_clip_rect(clip_rect);
    for guideline in guidelines {
        let x = content_rect.min.x
            + (guideline.time / viewport_duration) as f32 * content_rect.width();
        painter.line_segment(
            [Pos2::new(x, clip_rect.min.y), Pos2::new(x, clip_rect.max.y)],
            Stroke::new(1.0, theme.ring()),
        );
    }
}

/// Draw the marquee rectangle.
pub fn draw_marquee(ui: &Ui, rect: MarqueeRect, content_rect: Rect, clip_rect: Rect, theme: &Theme) {
    let painter = ui.painter().with_clip_rect(clip_rect);
    let screen = Rect::from_min_max(
        Pos2::new(content_rect.min.x + rect.min_x, content_rect.min.y + rect.min_y),
        Pos2::new(content_rect.min.x + rect.max_x, content_rect.min.y + rect.max_y),
    );
    painter.rect_filled(screen, 0.0, Color32::from_rgba_unmultiplied(
        theme.colors.primary[0],
        theme.colors.primary[1],
        theme.colors.primary[2],
        24,
    ));
    painter.rect_stroke(screen, 0.0, Stroke::new(1.0, theme.primary()), egui::StrokeKind::Inside);
}
