//! Item Content Renderers
//!
//! Draws the body of a timeline item according to its kind: thumbnail strips
//! for video, waveforms for audio, labels for text and captions, tints for
//! shapes and blurs. Kinds dispatch through a registry so applications can
//! override individual renderers without forking the track view.

use std::collections::HashMap;
use std::sync::Arc;

use cutline_core::{
    sprite_cache_key, thumbnail_interval, Item, ItemKind, SpriteSheet, ThumbnailCache,
    WaveformProcessor,
};
use egui::{Color32, Pos2, Rect, Ui, Vec2};

use crate::theme::Theme;

/// Everything a renderer needs to paint one item body.
pub struct ItemPaintContext<'a> {
    /// Ui to paint through (also used for texture uploads)
    pub ui: &'a mut Ui,
    /// The item box, already clipped to the track lane
    pub rect: Rect,
    /// The item being drawn
    pub item: &'a Item,
    /// Active theme
    pub theme: &'a Theme,
    /// Whether the item is selected
    pub selected: bool,
    /// Thumbnail sprite cache, when the host wired one up
    pub thumbnails: Option<&'a ThumbnailCache>,
    /// Waveform processor, when the host wired one up
    pub waveforms: Option<&'a WaveformProcessor>,
    /// Committed zoom scale
    pub zoom_scale: f64,
    /// Seconds represented by one content pixel
    pub sec_per_pixel: f64,
}

impl ItemPaintContext<'_> {
    /// The item's media source path, when its payload carries one.
    #[must_use]
    pub fn media_src(&self) -> Option<&str> {
        self.item.data.get("src").and_then(|v| v.as_str())
    }

    /// Stable id for sprite caching: the payload's video id or the source.
    #[must_use]
    pub fn video_id(&self) -> Option<String> {
        self.item
            .data
            .get("videoId")
            .and_then(|v| v.as_str())
            .map(str::to_string)
            .or_else(|| self.media_src().map(str::to_string))
    }
}

/// Paints the body of one item kind.
pub trait ItemRenderer {
    /// Draw into `ctx.rect`.
    fn paint(&self, ctx: &mut ItemPaintContext<'_>);
}

/// Kind-keyed dispatch table with built-in defaults for every kind.
pub struct ItemContentRegistry {
    renderers: HashMap<ItemKind, Box<dyn ItemRenderer>>,
}

impl ItemContentRegistry {
    /// Registry with the built-in renderer for every kind.
    #[must_use]
    pub fn new() -> Self {
        let mut renderers: HashMap<ItemKind, Box<dyn ItemRenderer>> = HashMap::new();
        renderers.insert(ItemKind::Video, Box::new(VideoRenderer));
        renderers.insert(ItemKind::Audio, Box::new(AudioRenderer));
        renderers.insert(ItemKind::Text, Box::new(LabelRenderer));
        renderers.insert(ItemKind::Caption, Box::new(LabelRenderer));
        renderers.insert(ItemKind::Image, Box::new(FillRenderer { outline: true }));
        renderers.insert(ItemKind::Sticker, Box::new(FillRenderer { outline: true }));
        renderers.insert(ItemKind::Shape, Box::new(FillRenderer { outline: false }));
        renderers.insert(ItemKind::Blur, Box::new(BlurRenderer));
        Self { renderers }
    }

    /// Replace the renderer for one kind.
    pub fn register(&mut self, kind: ItemKind, renderer: Box<dyn ItemRenderer>) {
        self.renderers.insert(kind, renderer);
    }

    /// Paint an item through its registered renderer.
    pub fn paint(&self, kind: ItemKind, ctx: &mut ItemPaintContext<'_>) {
        if let Some(renderer) = self.renderers.get(&kind) {
            renderer.paint(ctx);
        } else {
            LabelRenderer.paint(ctx);
        }
    }
}

impl Default for ItemContentRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// The display color of an item, falling back to the theme primary.
#[must_use]
pub fn item_color(item: &Item, theme: &Theme) -> Color32 {
    item.color
        .map_or_else(|| theme.primary(), |[r, g, b]| Color32::from_rgb(r, g, b))
}

fn draw_label(ctx: &ItemPaintContext<'_>, color: Color32) {
    let Some(label) = ctx.item.label.as_deref() else {
        return;
    };
    let painter = ctx.ui.painter().with_clip_rect(ctx.rect);
    painter.text(
        Pos2::new(ctx.rect.min.x + 6.0, ctx.rect.min.y + 4.0),
        egui::Align2::LEFT_TOP,
        label,
        egui::FontId::proportional(11.0),
        color,
    );
}

// ---------------------------------------------------------------------------

struct LabelRenderer;

impl ItemRenderer for LabelRenderer {
    fn paint(&self, ctx: &mut ItemPaintContext<'_>) {
        draw_label(ctx, Color32::WHITE);
    }
}

struct FillRenderer {
    outline: bool,
}

impl ItemRenderer for FillRenderer {
    fn paint(&self, ctx: &mut ItemPaintContext<'_>) {
        let color = item_color(ctx.item, ctx.theme);
        let painter = ctx.ui.painter().with_clip_rect(ctx.rect);
        let inner = ctx.rect.shrink(3.0);
        painter.rect_filled(
            inner,
            f32::from(ctx.theme.spacing.corner_radius_tiny),
            color.gamma_multiply(0.35),
        );
        if self.outline {
            painter.rect_stroke(
                inner,
                f32::from(ctx.theme.spacing.corner_radius_tiny),
                egui::Stroke::new(1.0, color.gamma_multiply(0.8)),
                egui::StrokeKind::Inside,
            );
        }
        draw_label(ctx, Color32::WHITE);
    }
}

struct BlurRenderer;

impl ItemRenderer for BlurRenderer {
    fn paint(&self, ctx: &mut ItemPaintContext<'_>) {
        let painter = ctx.ui.painter().with_clip_rect(ctx.rect);
        let color = item_color(ctx.item, ctx.theme);
        // Diagonal hatching reads as "this region is frosted".
        let step = 7.0;
        let mut x = ctx.rect.min.x - ctx.rect.height();
        while x < ctx.rect.max.x {
            painter.line_segment(
                [
                    Pos2::new(x, ctx.rect.max.y),
                    Pos2::new(x + ctx.rect.height(), ctx.rect.min.y),
                ],
                egui::Stroke::new(1.0, color.gamma_multiply(0.4)),
            );
            x += step;
        }
        draw_label(ctx, ctx.theme.muted_foreground());
    }
}

// ---------------------------------------------------------------------------

struct AudioRenderer;

impl ItemRenderer for AudioRenderer {
    fn paint(&self, ctx: &mut ItemPaintContext<'_>) {
        let color = item_color(ctx.item, ctx.theme);
        let wave_color = Color32::from_rgba_unmultiplied(color.r(), color.g(), color.b(), 160);

        let peaks = ctx.waveforms.and_then(|processor| {
            let src = ctx.media_src()?;
            let start = ctx.item.media_start.unwrap_or(0.0);
            let duration = ctx.item.duration();
            processor.request(src, start, duration);
            processor.peaks(src, start, duration)
        });

        let painter = ctx.ui.painter().with_clip_rect(ctx.rect);
        let content = ctx.rect.shrink2(Vec2::new(4.0, 6.0));
        let center_y = content.center().y;

        match peaks {
            Some(peaks) if !peaks.peaks.is_empty() => {
                let x_step = content.width() / peaks.peaks.len() as f32;
                for (i, peak) in peaks.peaks.iter().enumerate() {
                    let x = (i as f32).mul_add(x_step, content.min.x);
                    let half = peak * content.height() * 0.5;
                    painter.line_segment(
                        [Pos2::new(x, center_y - half), Pos2::new(x, center_y + half)],
                        egui::Stroke::new(1.5, wave_color),
                    );
                }
            }
            _ => {
                // Placeholder bars until extraction lands.
                let bars = (content.width() / 4.0) as i32;
                for i in 0..bars {
                    let x = (i as f32).mul_add(4.0, content.min.x);
                    let half = ((i as f32 * 0.7).sin().abs() * 0.4 + 0.1) * content.height() * 0.5;
                    painter.line_segment(
                        [Pos2::new(x, center_y - half), Pos2::new(x, center_y + half)],
                        egui::Stroke::new(1.0, wave_color.gamma_multiply(0.5)),
                    );
                }
            }
        }
        draw_label(ctx, Color32::WHITE);
    }
}

// ---------------------------------------------------------------------------

struct VideoRenderer;

impl VideoRenderer {
    /// Upload the sprite atlas once and reuse the texture across frames.
    fn sprite_texture(
        ui: &mut Ui,
        cache_key: &str,
        sprite: &Arc<SpriteSheet>,
    ) -> egui::TextureHandle {
        let id = egui::Id::new(("cutline-sprite", cache_key));
        if let Some(handle) = ui.ctx().data(|d| d.get_temp::<egui::TextureHandle>(id)) {
            return handle;
        }
        let image = egui::ColorImage::from_rgba_unmultiplied(
            [sprite.width as usize, sprite.height as usize],
            &sprite.rgba,
        );
        let handle = ui
            .ctx()
            .load_texture(cache_key.to_string(), image, egui::TextureOptions::LINEAR);
        ui.ctx().data_mut(|d| d.insert_temp(id, handle.clone()));
        handle
    }
}

impl ItemRenderer for VideoRenderer {
    fn paint(&self, ctx: &mut ItemPaintContext<'_>) {
        let color = item_color(ctx.item, ctx.theme);
        let Some(cache) = ctx.thumbnails else {
            draw_label(ctx, Color32::WHITE);
            return;
        };
        let (Some(src), Some(video_id)) = (ctx.media_src().map(str::to_string), ctx.video_id())
        else {
            draw_label(ctx, Color32::WHITE);
            return;
        };

        let source_duration = ctx.item.media_src_duration.unwrap_or_else(|| ctx.item.duration());
        let zoomed_in = ctx.zoom_scale >= 1.0;
        let interval = thumbnail_interval(source_duration, zoomed_in, ctx.sec_per_pixel);
        let height = ctx.rect.height().max(1.0) as u32;
        let cache_key = sprite_cache_key(&video_id, interval, height);

        let sprite = cache
            .get_or_create(&cache_key, &src, source_duration, interval, height)
            .or_else(|| {
                // A coarser sheet fills in while this one generates.
                cache.fallback_sprite(&video_id, height)
            });

        if let Some(sprite) = sprite {
            if sprite.interval > interval {
                cache.ensure_fine_sprite(&video_id, &src, source_duration, interval, height);
            }
            let texture = Self::sprite_texture(ctx.ui, &cache_key, &sprite);
            let painter = ctx.ui.painter().with_clip_rect(ctx.rect);

            let cell_w = ctx.rect.height() * 16.0 / 9.0;
            let media_start = ctx.item.media_start.unwrap_or(0.0);
            let speed = if ctx.item.speed > 0.0 { ctx.item.speed } else { 1.0 };
            let mut x = ctx.rect.min.x;
            while x < ctx.rect.max.x {
                let offset = f64::from(x - ctx.rect.min.x) * ctx.sec_per_pixel;
                let media_time = media_start + offset * speed;
                let cell = sprite.rect_for_time(media_time);
                let uv = Rect::from_min_max(
                    Pos2::new(
                        cell.x as f32 / sprite.width as f32,
                        cell.y as f32 / sprite.height as f32,
                    ),
                    Pos2::new(
                        (cell.x + cell.w) as f32 / sprite.width as f32,
                        (cell.y + cell.h) as f32 / sprite.height as f32,
                    ),
                );
                let dest = Rect::from_min_size(
                    Pos2::new(x, ctx.rect.min.y),
                    Vec2::new(cell_w, ctx.rect.height()),
                );
                painter.image(texture.id(), dest, uv, Color32::WHITE);
                x += cell_w;
            }
        } else {
            // Film-strip placeholder until the first sprite lands.
            let painter = ctx.ui.painter().with_clip_rect(ctx.rect);
            let cell_w = ctx.rect.height() * 16.0 / 9.0;
            let mut x = ctx.rect.min.x;
            while x < ctx.rect.max.x {
                painter.rect_stroke(
                    Rect::from_min_size(
                        Pos2::new(x, ctx.rect.min.y + 2.0),
                        Vec2::new(cell_w - 2.0, ctx.rect.height() - 4.0),
                    ),
                    2.0,
                    egui::Stroke::new(1.0, color.gamma_multiply(0.4)),
                    egui::StrokeKind::Inside,
                );
                x += cell_w;
            }
        }
        draw_label(ctx, Color32::WHITE);
    }
}
