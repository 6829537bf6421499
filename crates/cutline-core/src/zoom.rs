//! Zoom Controller
//!
//! Maintains `(scale, scroll_left)` for the timeline, zooming around an
//! anchor so the content time under the cursor or playhead stays put. The
//! widened content width only exists after the next layout pass, so scroll
//! produced by a zoom is held as a pending value and applied once the new
//! width is known.

use crate::config::ZoomConfig;

/// State captured on the first tick of a zoom-slider drag.
///
/// Subsequent ticks recompute scroll from these values instead of the live
/// fields, so rapid slider updates cannot compound rounding drift and the
/// playhead stays pinned to the same screen x.
#[derive(Debug, Clone, Copy)]
pub struct SliderDragState {
    /// Playhead screen x at drag start, relative to the viewport
    pub playhead_screen_x: f32,
    /// Scale at drag start
    pub initial_scale: f64,
    /// Scroll at drag start
    pub scroll_left: f32,
    /// Viewport width at drag start
    pub viewport_width: f32,
}

/// Anchored zoom and scroll state.
#[derive(Debug)]
pub struct ZoomController {
    config: ZoomConfig,
    scale: f64,
    scroll_left: f32,
    pending_scroll: Option<f32>,
    slider_drag: Option<SliderDragState>,
}

impl ZoomController {
    /// Create a controller at the default scale.
    #[must_use]
    pub fn new(config: ZoomConfig) -> Self {
        let scale = config.default;
        Self {
            config,
            scale,
            scroll_left: 0.0,
            pending_scroll: None,
            slider_drag: None,
        }
    }

    /// The committed scale.
    #[must_use]
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// The current horizontal scroll offset in pixels.
    #[must_use]
    pub fn scroll_left(&self) -> f32 {
        self.scroll_left
    }

    /// Record a scroll offset produced by ordinary scrolling.
    pub fn set_scroll(&mut self, scroll_left: f32) {
        self.scroll_left = scroll_left.max(0.0);
    }

    /// Step size at the current scale.
    ///
    /// Steps grow with the scale so zooming feels uniform: ×1 below 3,
    /// ×2 up to 10, ×4 up to 20, ×6 above.
    #[must_use]
    pub fn step_for(&self, base: f64) -> f64 {
        let multiplier = if self.scale < 3.0 {
            1.0
        } else if self.scale <= 10.0 {
            2.0
        } else if self.scale <= 20.0 {
            4.0
        } else {
            6.0
        };
        base * multiplier
    }

    /// Zoom to `new_scale` keeping the content under `anchor_x` stationary.
    ///
    /// `anchor_x` is a screen x; `rect_left` is the content area's left
    /// screen edge. Returns the applied scale.
    pub fn zoom_at(&mut self, anchor_x: f32, rect_left: f32, new_scale: f64) -> f64 {
        let new_scale = new_scale.clamp(self.config.min, self.config.max);
        if (new_scale - self.scale).abs() < 1e-9 {
            return self.scale;
        }

        let relative = anchor_x - rect_left + self.scroll_left;
        let zoom_factor = (new_scale / self.scale) as f32;
        let new_scroll = relative * zoom_factor - (anchor_x - rect_left);

        self.scroll_left = new_scroll.max(0.0);
        self.pending_scroll = Some(self.scroll_left);
        self.scale = new_scale;
        self.scale
    }

    /// Zoom in by one (tiered) manual step around the anchor.
    pub fn zoom_in(&mut self, anchor_x: f32, rect_left: f32) -> f64 {
        let step = self.step_for(self.config.step);
        self.zoom_at(anchor_x, rect_left, self.scale + step)
    }

    /// Zoom out by one (tiered) manual step around the anchor.
    pub fn zoom_out(&mut self, anchor_x: f32, rect_left: f32) -> f64 {
        let step = self.step_for(self.config.step);
        self.zoom_at(anchor_x, rect_left, self.scale - step)
    }

    /// Wheel zoom around the cursor. Positive `steps` zoom in.
    pub fn wheel_zoom(&mut self, steps: f64, cursor_x: f32, rect_left: f32) -> f64 {
        let step = self.step_for(self.config.wheel_step);
        self.zoom_at(cursor_x, rect_left, self.scale + steps * step)
    }

    /// Take the scroll that must be re-applied after layout, clamped to the
    /// post-layout maximum.
    pub fn take_pending_scroll(&mut self, max_scroll: f32) -> Option<f32> {
        let pending = self.pending_scroll.take()?;
        let clamped = pending.clamp(0.0, max_scroll.max(0.0));
        self.scroll_left = clamped;
        Some(clamped)
    }

    /// Begin a zoom-slider drag, pinning the playhead's screen position.
    pub fn begin_slider_drag(&mut self, playhead_screen_x: f32, viewport_width: f32) {
        self.slider_drag = Some(SliderDragState {
            playhead_screen_x,
            initial_scale: self.scale,
            scroll_left: self.scroll_left,
            viewport_width,
        });
    }

    /// Apply one slider tick, keeping the captured playhead x invariant.
    pub fn slider_tick(&mut self, new_scale: f64) -> f64 {
        let Some(drag) = self.slider_drag else {
            return self.scale;
        };
        let new_scale = new_scale.clamp(self.config.min, self.config.max);

        let relative = drag.playhead_screen_x + drag.scroll_left;
        let zoom_factor = (new_scale / drag.initial_scale) as f32;
        let new_scroll = relative * zoom_factor - drag.playhead_screen_x;

        self.scroll_left = new_scroll.max(0.0);
        self.pending_scroll = Some(self.scroll_left);
        self.scale = new_scale;
        self.scale
    }

    /// End a zoom-slider drag.
    pub fn end_slider_drag(&mut self) {
        self.slider_drag = None;
    }

    /// Back to the default scale with no scroll.
    pub fn reset(&mut self) {
        self.scale = self.config.default;
        self.scroll_left = 0.0;
        self.pending_scroll = None;
        self.slider_drag = None;
    }
}

impl Default for ZoomController {
    fn default() -> Self {
        Self::new(ZoomConfig::default())
    }
}
