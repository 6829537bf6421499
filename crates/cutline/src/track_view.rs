//! Track Lane
//!
//! One horizontal track row in the content area: item boxes with selection
//! and resize handles, split-mode hit testing, and the empty-background
//! press that starts a marquee. The lane reports intents; the timeline view
//! routes them into the editor.

use std::collections::HashSet;

use cutline_core::{DragAction, Item, LivePreview, TimelineStore, Track};
use egui::{Color32, CursorIcon, Pos2, Rect, Sense, Stroke, Ui, Vec2};

use crate::item_content::{item_color, ItemContentRegistry, ItemPaintContext};
use crate::theme::Theme;

/// Width of the edge zones that arm a resize instead of a move.
const EDGE_HANDLE_WIDTH: f32 = 8.0;

/// An interaction the lane observed this frame.
#[derive(Debug, Clone, PartialEq)]
pub enum LaneAction {
    /// An item was clicked
    Clicked {
        /// Item id
        item_id: String,
        /// A multi-select modifier was held
        multi: bool,
    },
    /// An item was right-clicked
    ContextClicked {
        /// Item id
        item_id: String,
    },
    /// A drag gesture began on an item
    DragStarted {
        /// Item id
        item_id: String,
        /// Move or one of the resize edges
        action: DragAction,
        /// Pointer x in content pixels
        x: f32,
        /// Pointer y in content pixels
        y: f32,
    },
    /// Split mode was armed and an item was clicked
    SplitClicked {
        /// Item id
        item_id: String,
        /// Timeline position of the click, in seconds
        time: f64,
    },
    /// The empty background was pressed
    EmptyPressed {
        /// Pointer x in content pixels
        x: f32,
        /// Pointer y in content pixels
        y: f32,
        /// Shift was held (additive marquee)
        shift: bool,
    },
}

/// Parameters for rendering one lane.
pub struct TrackLane<'a> {
    /// The track to render
    pub track: &'a Track,
    /// Row index of the track
    pub row: usize,
    /// Seconds represented by the content width
    pub viewport_duration: f64,
    /// Content rect for this row (origin already offset by scroll)
    pub content_rect: Rect,
    /// Visible clip rect
    pub clip_rect: Rect,
    /// Item box height
    pub item_height: f32,
    /// Selected item ids
    pub selected: &'a HashSet<String>,
    /// Whether split mode is armed
    pub split_mode: bool,
    /// Transient store, for live previews and dragged-item dimming
    pub store: &'a TimelineStore,
    /// Renderer registry for item bodies
    pub registry: &'a ItemContentRegistry,
    /// Committed zoom scale
    pub zoom_scale: f64,
    /// Thumbnail cache, if wired
    pub thumbnails: Option<&'a cutline_core::ThumbnailCache>,
    /// Waveform processor, if wired
    pub waveforms: Option<&'a cutline_core::WaveformProcessor>,
}

/// Response from a lane.
#[derive(Debug, Clone)]
pub struct TrackLaneResponse {
    /// Interactions observed this frame
    pub actions: Vec<LaneAction>,
}

impl TrackLane<'_> {
    /// Show the lane.
    pub fn show(self, ui: &mut Ui, theme: &Theme) -> TrackLaneResponse {
        let mut actions = Vec::new();
        let row_rect = Rect::from_min_size(
            self.content_rect.min,
            Vec2::new(self.content_rect.width(), self.content_rect.height()),
        );
        let visible = row_rect.intersect(self.clip_rect);

        let painter = ui.painter().with_clip_rect(self.clip_rect);
        painter.line_segment(
            [
                Pos2::new(visible.min.x, row_rect.max.y),
                Pos2::new(visible.max.x, row_rect.max.y),
            ],
            Stroke::new(1.0, theme.border().gamma_multiply(0.6)),
        );
        if !self.track.visible {
            painter.rect_filled(visible, 0.0, Color32::from_black_alpha(40));
        }

        let lane_id = ui.id().with("lane").with(self.row);
        let sec_per_pixel = self.viewport_duration / f64::from(self.content_rect.width().max(1.0));

        let mut pressed_on_item = false;
        for (index, item) in self.track.items.iter().enumerate() {
            let rect = self.item_rect(item);
            if rect.max.x < self.clip_rect.min.x || rect.min.x > self.clip_rect.max.x {
                continue;
            }
            let item_id = lane_id.with(index);
            let response = ui.interact(rect, item_id, Sense::click_and_drag());
            if response.hovered() || response.clicked() || response.drag_started() {
                pressed_on_item = true;
            }

            let selected = self.selected.contains(&item.id);
            self.draw_item(ui, item, rect, selected, sec_per_pixel, theme);

            if self.split_mode {
                if response.hovered() {
                    ui.ctx().set_cursor_icon(CursorIcon::VerticalText);
                }
                if response.clicked() {
                    if let Some(pos) = response.interact_pointer_pos() {
                        actions.push(LaneAction::SplitClicked {
                            item_id: item.id.clone(),
                            time: self.time_at(pos.x),
                        });
                    }
                    continue;
                }
            }

            let show_handles = selected && self.selected.len() == 1 && !self.split_mode;
            if show_handles {
                self.draw_handles(&painter, rect, theme);
            }

            if let Some(pos) = response.hover_pos() {
                if show_handles
                    && (pos.x - rect.min.x <= EDGE_HANDLE_WIDTH
                        || rect.max.x - pos.x <= EDGE_HANDLE_WIDTH)
                {
                    ui.ctx().set_cursor_icon(CursorIcon::ResizeHorizontal);
                }
            }

            if response.drag_started() {
                if let Some(pos) = response.interact_pointer_pos() {
                    let action = if show_handles && pos.x - rect.min.x <= EDGE_HANDLE_WIDTH {
                        DragAction::ResizeStart
                    } else if show_handles && rect.max.x - pos.x <= EDGE_HANDLE_WIDTH {
                        DragAction::ResizeEnd
                    } else {
                        DragAction::Move
                    };
                    actions.push(LaneAction::DragStarted {
                        item_id: item.id.clone(),
                        action,
                        x: pos.x - self.content_rect.min.x,
                        y: pos.y - self.content_rect.min.y
                            + self.row as f32 * self.content_rect.height(),
                    });
                }
            } else if response.clicked() && !self.split_mode {
                let multi = ui.input(|i| i.modifiers.shift || i.modifiers.command || i.modifiers.ctrl);
                actions.push(LaneAction::Clicked { item_id: item.id.clone(), multi });
            } else if response.secondary_clicked() {
                actions.push(LaneAction::ContextClicked { item_id: item.id.clone() });
            }
        }

        // Background press starts a marquee, unless a gesture is running.
        let background = ui.interact(visible, lane_id.with("bg"), Sense::click_and_drag());
        if background.drag_started()
            && !pressed_on_item
            && !self.store.is_dragging
            && !self.store.is_context_menu_open
        {
            if let Some(pos) = background.interact_pointer_pos() {
                actions.push(LaneAction::EmptyPressed {
                    x: pos.x - self.content_rect.min.x,
                    y: pos.y - self.content_rect.min.y
                        + self.row as f32 * self.content_rect.height(),
                    shift: ui.input(|i| i.modifiers.shift),
                });
            }
        }

        TrackLaneResponse { actions }
    }

    fn item_rect(&self, item: &Item) -> Rect {
        // A live preview moves the box with the gesture before commit.
        let (start, end) = match self.store.live_preview_updates.get(&item.id) {
            Some(LivePreview { start, end }) => {
                (start.unwrap_or(item.start), end.unwrap_or(item.end))
            }
            None => (item.start, item.end),
        };
        let x0 = self.content_rect.min.x
            + (start / self.viewport_duration) as f32 * self.content_rect.width();
        let x1 = self.content_rect.min.x
            + (end / self.viewport_duration) as f32 * self.content_rect.width();
        let y = self.content_rect.min.y + (self.content_rect.height() - self.item_height) / 2.0;
        Rect::from_min_max(Pos2::new(x0, y), Pos2::new(x1, y + self.item_height))
    }

    fn draw_item(
        &self,
        ui: &mut Ui,
        item: &Item,
        rect: Rect,
        selected: bool,
        sec_per_pixel: f64,
        theme: &Theme,
    ) {
        let color = item_color(item, theme);
        let dragging_this = self
            .store
            .dragged_item_id
            .as_deref()
            .is_some_and(|id| id == item.id);

        let fill = if dragging_this {
            color.gamma_multiply(0.15)
        } else if self.track.muted && item.kind == cutline_core::ItemKind::Audio {
            color.gamma_multiply(0.25)
        } else {
            color.gamma_multiply(0.55)
        };
        let painter = ui.painter().with_clip_rect(self.clip_rect);
        let rounding = f32::from(theme.spacing.corner_radius_tiny);
        painter.rect_filled(rect, rounding, fill);
        if selected {
            painter.rect_stroke(rect, rounding, Stroke::new(2.0, theme.primary()), egui::StrokeKind::Outside);
        } else {
            painter.rect_stroke(rect, rounding, Stroke::new(1.0, Color32::from_black_alpha(50)), egui::StrokeKind::Outside);
        }

        if !dragging_this {
            let clip = rect.intersect(self.clip_rect);
            let mut ctx = ItemPaintContext {
                ui,
                rect: clip,
                item,
                theme,
                selected,
                thumbnails: self.thumbnails,
                waveforms: self.waveforms,
                zoom_scale: self.zoom_scale,
                sec_per_pixel,
            };
            self.registry.paint(item.kind, &mut ctx);
        }
    }

    fn draw_handles(&self, painter: &egui::Painter, rect: Rect, theme: &Theme) {
        let handle = Vec2::new(3.0, rect.height());
        painter.rect_filled(
            Rect::from_min_size(rect.min, handle),
            0.0,
            theme.primary(),
        );
        painter.rect_filled(
            Rect::from_min_size(Pos2::new(rect.max.x - handle.x, rect.min.y), handle),
            0.0,
            theme.primary(),
        );
    }

    fn time_at(&self, screen_x: f32) -> f64 {
        f64::from(screen_x - self.content_rect.min.x) / f64::from(self.content_rect.width())
            * self.viewport_duration
    }
}
