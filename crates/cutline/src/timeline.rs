//! Timeline View
//!
//! The composite timeline widget: track-handle column, time ruler, track
//! lanes, drag previews, playhead, marquee, and the keyboard map. State
//! lives in [`TimelineEditor`]; this widget renders one frame of it and
//! routes pointer/keyboard input back into the editor's controllers.

use cutline_core::{
    content_width, frame_to_time, guideline_candidates, viewport_duration, DragGeometry,
    ThumbnailCache, WaveformProcessor,
};
use egui::{Pos2, Rect, Response, Sense, Ui, Vec2};

use cutline_core::TimelineEditor;

use crate::item_content::ItemContentRegistry;
use crate::playhead::{draw_ghost_marker, Playhead};
use crate::previews::{draw_drag_previews, draw_guidelines, draw_marquee};
use crate::ruler::TimeRuler;
use crate::theme::Theme;
use crate::track_header::TrackHeader;
use crate::track_view::{LaneAction, TrackLane};
use crate::zoom_control::ZoomControl;

/// Response from the timeline view.
#[derive(Debug, Clone)]
pub struct TimelineViewResponse {
    /// The egui response for the whole widget
    pub response: Response,
    /// The tracks changed this frame
    pub changed: bool,
}

/// Pending context menu state kept in egui temp data.
#[derive(Clone)]
struct ContextMenuState {
    item_id: String,
    pos: Pos2,
}

/// The complete timeline widget.
///
/// # Example
///
/// ```rust,no_run
/// use cutline::{TimelineView, Theme};
/// use cutline_core::{TimelineConfig, TimelineEditor};
///
/// fn ui(ui: &mut egui::Ui, editor: &mut TimelineEditor) {
///     let theme = Theme::dark();
///     TimelineView::new().show(ui, editor, &theme);
/// }
/// ```
pub struct TimelineView<'a> {
    id: Option<egui::Id>,
    thumbnails: Option<&'a ThumbnailCache>,
    waveforms: Option<&'a WaveformProcessor>,
    registry: Option<&'a ItemContentRegistry>,
    show_zoom_control: bool,
    auto_follow_playhead: bool,
    auto_follow_margin: f32,
}

impl<'a> TimelineView<'a> {
    /// Create a timeline view.
    #[must_use]
    pub fn new() -> Self {
        Self {
            id: None,
            thumbnails: None,
            waveforms: None,
            registry: None,
            show_zoom_control: true,
            auto_follow_playhead: true,
            auto_follow_margin: 0.25,
        }
    }

    /// Set a custom ID (needed with multiple timelines)
    #[must_use]
    pub fn id(mut self, id: impl Into<egui::Id>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Wire the thumbnail sprite cache for video items
    #[must_use]
    pub fn thumbnails(mut self, cache: &'a ThumbnailCache) -> Self {
        self.thumbnails = Some(cache);
        self
    }

    /// Wire the waveform processor for audio items
    #[must_use]
    pub fn waveforms(mut self, processor: &'a WaveformProcessor) -> Self {
        self.waveforms = Some(processor);
        self
    }

    /// Use a custom item renderer registry
    #[must_use]
    pub fn registry(mut self, registry: &'a ItemContentRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Show or hide the zoom control row
    #[must_use]
    pub const fn show_zoom_control(mut self, show: bool) -> Self {
        self.show_zoom_control = show;
        self
    }

    /// Keep the playhead inside a margin of the viewport during playback
    #[must_use]
    pub const fn auto_follow_playhead(mut self, follow: bool) -> Self {
        self.auto_follow_playhead = follow;
        self
    }

    /// Margin fraction for auto-follow (0.0 = left edge, 0.5 = center)
    #[must_use]
    pub const fn auto_follow_margin(mut self, margin: f32) -> Self {
        self.auto_follow_margin = margin.clamp(0.0, 1.0);
        self
    }

    /// Show the timeline.
    pub fn show(
        self,
        ui: &mut Ui,
        editor: &mut TimelineEditor,
        theme: &Theme,
    ) -> TimelineViewResponse {
        let now = ui.input(|i| i.time);
        editor.tick(now);

        let widget_id = self.id.unwrap_or_else(|| ui.id()).with("timeline_view");
        let default_registry = ItemContentRegistry::new();
        let registry = self.registry.unwrap_or(&default_registry);

        let config = editor.config.clone();
        let available = ui.available_rect_before_wrap();
        let element_width = (available.width() - config.handle_width).max(100.0);
        let tracks_height =
            (available.height() - config.markers_height - if self.show_zoom_control { 28.0 } else { 0.0 })
                .max(config.track_height);

        let total = editor.total_duration();
        let scale = editor.zoom.scale();
        let viewport = viewport_duration(total, scale);
        let content_w = content_width(element_width, scale);
        let max_scroll_x = (content_w - element_width).max(0.0);

        // The widened content only exists now, after layout: apply the
        // scroll a zoom computed last frame against the real maximum.
        editor.zoom.take_pending_scroll(max_scroll_x);
        let scroll_x = editor.zoom.scroll_left().clamp(0.0, max_scroll_x);
        editor.zoom.set_scroll(scroll_x);

        let track_count = editor.tracks().len();
        let content_height = track_count as f32 * config.track_height;
        let max_scroll_y = (content_height - tracks_height).max(0.0);
        let scroll_y_id = widget_id.with("scroll_y");
        let mut scroll_y: f32 = ui
            .ctx()
            .data_mut(|d| d.get_persisted::<f32>(scroll_y_id).unwrap_or(0.0))
            .clamp(0.0, max_scroll_y);

        // Screen rects for the three regions.
        let ruler_rect = Rect::from_min_size(
            Pos2::new(available.min.x + config.handle_width, available.min.y),
            Vec2::new(element_width, config.markers_height),
        );
        let headers_rect = Rect::from_min_size(
            Pos2::new(available.min.x, available.min.y + config.markers_height),
            Vec2::new(config.handle_width, tracks_height),
        );
        let tracks_rect = Rect::from_min_size(
            Pos2::new(ruler_rect.min.x, headers_rect.min.y),
            Vec2::new(element_width, tracks_height),
        );

        let geometry = DragGeometry {
            timeline_width: content_w,
            total_duration: viewport,
            track_height: config.track_height,
        };

        let response = ui.allocate_rect(
            Rect::from_min_size(
                available.min,
                Vec2::new(available.width(), config.markers_height + tracks_height),
            ),
            Sense::hover(),
        );
        let mut changed = false;

        // --- ruler ---
        {
            let ruler_content = Rect::from_min_size(
                Pos2::new(ruler_rect.min.x - scroll_x, ruler_rect.min.y),
                Vec2::new(content_w, config.markers_height),
            );
            let mut ruler_ui = ui.new_child(
                egui::UiBuilder::new()
                    .max_rect(ruler_content)
                    .layout(egui::Layout::left_to_right(egui::Align::Min)),
            );
            ruler_ui.set_clip_rect(ruler_rect);
            let ruler_response = TimeRuler::new(viewport, content_w)
                .height(config.markers_height)
                .id(widget_id.with("ruler"))
                .show_clipped(&mut ruler_ui, theme);
            if let Some(t) = ruler_response.seeked_to {
                editor.seek_to_time(t);
            }
            editor.store.is_playhead_dragging = ruler_response.scrubbing;
        }

        // --- track headers ---
        {
            let painter = ui.painter().with_clip_rect(headers_rect);
            painter.rect_filled(headers_rect, 0.0, theme.background());
            let first = (scroll_y / config.track_height).floor() as usize;
            let last = ((scroll_y + tracks_height) / config.track_height).ceil() as usize;
            let mut header_ops: Vec<(String, &'static str)> = Vec::new();
            for row in first..last.min(track_count) {
                let track = &editor.tracks()[row];
                let cell = Rect::from_min_size(
                    Pos2::new(
                        headers_rect.min.x,
                        headers_rect.min.y + row as f32 * config.track_height - scroll_y,
                    ),
                    Vec2::new(config.handle_width, config.track_height),
                );
                let mut header_ui = ui.new_child(
                    egui::UiBuilder::new()
                        .max_rect(cell)
                        .layout(egui::Layout::top_down(egui::Align::Min)),
                );
                header_ui.set_clip_rect(headers_rect);
                let header = TrackHeader::new(config.handle_width, config.track_height)
                    .id(widget_id.with("header").with(row))
                    .show(&mut header_ui, track, theme);
                if header.magnetic_clicked {
                    header_ops.push((track.id.clone(), "magnetic"));
                }
                if header.visible_clicked {
                    header_ops.push((track.id.clone(), "visible"));
                }
                if header.mute_clicked {
                    header_ops.push((track.id.clone(), "mute"));
                }
                if header.delete_clicked {
                    header_ops.push((track.id.clone(), "delete"));
                }
            }
            for (track_id, op) in header_ops {
                let flags = editor
                    .tracks()
                    .iter()
                    .find(|t| t.id == track_id)
                    .map(|t| (t.visible, t.muted));
                match (op, flags) {
                    ("magnetic", _) => editor.toggle_magnetic(&track_id, now),
                    ("visible", Some((visible, _))) => {
                        editor.set_track_visible(&track_id, !visible, now);
                    }
                    ("mute", Some((_, muted))) => editor.set_track_muted(&track_id, !muted, now),
                    ("delete", _) => editor.delete_track(&track_id, now),
                    _ => {}
                }
                changed = true;
            }
        }

        // Header ops can add or remove tracks; re-read the count for lanes.
        let track_count = editor.tracks().len();

        // --- track lanes ---
        let mut actions: Vec<LaneAction> = Vec::new();
        {
            let painter = ui.painter().with_clip_rect(tracks_rect);
            painter.rect_filled(tracks_rect, 0.0, theme.background());

            let first = (scroll_y / config.track_height).floor() as usize;
            let last = ((scroll_y + tracks_height) / config.track_height).ceil() as usize;
            let selected = editor.selection().clone();
            let split_mode = editor.split_mode();
            for row in first..last.min(track_count) {
                let content_rect = Rect::from_min_size(
                    Pos2::new(
                        tracks_rect.min.x - scroll_x,
                        tracks_rect.min.y + row as f32 * config.track_height - scroll_y,
                    ),
                    Vec2::new(content_w, config.track_height),
                );
                let lane = TrackLane {
                    track: &editor.tracks()[row],
                    row,
                    viewport_duration: viewport,
                    content_rect,
                    clip_rect: tracks_rect,
                    item_height: config.track_item_height,
                    selected: &selected,
                    split_mode,
                    store: &editor.store,
                    registry,
                    zoom_scale: scale,
                    thumbnails: self.thumbnails,
                    waveforms: self.waveforms,
                };
                let lane_response = lane.show(ui, theme);
                actions.extend(lane_response.actions);
            }
        }

        for action in actions {
            match action {
                LaneAction::Clicked { item_id, multi } => editor.click_item(&item_id, multi),
                LaneAction::ContextClicked { item_id } => {
                    editor.context_click_item(&item_id);
                    editor.store.is_context_menu_open = true;
                    if let Some(pos) = ui.input(|i| i.pointer.hover_pos()) {
                        ui.ctx().data_mut(|d| {
                            d.insert_temp(
                                widget_id.with("context_menu"),
                                ContextMenuState { item_id, pos },
                            );
                        });
                    }
                }
                LaneAction::DragStarted { item_id, action, x, y } => {
                    editor.start_drag(&geometry, &item_id, x, y, action);
                }
                LaneAction::SplitClicked { item_id, time } => {
                    if editor.split_item(&item_id, time, now).is_some() {
                        changed = true;
                    }
                }
                LaneAction::EmptyPressed { x, y, shift } => {
                    editor.begin_marquee(x, y, shift);
                }
            }
        }

        // --- active gestures follow the global pointer ---
        let pointer_pos = ui.input(|i| i.pointer.latest_pos());
        let pointer_down = ui.input(|i| i.pointer.primary_down());
        let to_content = |pos: Pos2| {
            (
                pos.x - tracks_rect.min.x + scroll_x,
                pos.y - tracks_rect.min.y + scroll_y,
            )
        };

        if editor.store.is_dragging {
            if let Some(pos) = pointer_pos {
                let (x, y) = to_content(pos);
                if pointer_down {
                    editor.update_drag(&geometry, x, y, now);
                } else {
                    changed |= editor.end_drag(&geometry, now)
                        != cutline_core::DragCommit::Discarded;
                }
            } else if !pointer_down {
                changed |=
                    editor.end_drag(&geometry, now) != cutline_core::DragCommit::Discarded;
            }
        } else if editor.marquee.is_active() {
            if let Some(pos) = pointer_pos {
                let (x, y) = to_content(pos);
                if pointer_down {
                    editor.update_marquee(x, y, now, &geometry);
                } else {
                    editor.end_marquee();
                }
            } else if !pointer_down {
                editor.end_marquee();
            }
        }

        // --- overlays ---
        let full_clip = Rect::from_min_max(
            Pos2::new(tracks_rect.min.x, ruler_rect.min.y),
            tracks_rect.max,
        );
        let content_origin = Rect::from_min_size(
            Pos2::new(tracks_rect.min.x - scroll_x, tracks_rect.min.y - scroll_y),
            Vec2::new(content_w, content_height.max(tracks_height)),
        );

        if editor.store.is_dragging {
            if let (Some(position), Some(info)) =
                (editor.store.current_drag_position, editor.store.drag_info.as_ref())
            {
                let guidelines = guideline_candidates(
                    editor.tracks(),
                    Some(info.start_row),
                    position.start,
                    position.end,
                    &config,
                );
                draw_guidelines(ui, &guidelines, viewport, content_origin, tracks_rect, theme);
            }
        }

        draw_drag_previews(
            ui,
            &editor.store,
            viewport,
            content_origin,
            tracks_rect,
            config.track_height,
            track_count,
            theme,
        );

        if let Some(rect) = editor.marquee.rect() {
            draw_marquee(ui, rect, content_origin, tracks_rect, theme);
        }

        // Hover marker over the tracks, skipped while gestures run.
        if let Some(pos) = pointer_pos {
            if tracks_rect.contains(pos) && !editor.store.is_dragging {
                let time = f64::from(pos.x - tracks_rect.min.x + scroll_x)
                    / f64::from(content_w)
                    * viewport;
                editor.store.set_ghost_marker(Some(time));
            }
        }
        if let (Some(time), false) = (editor.store.ghost_marker_position, editor.store.is_dragging) {
            draw_ghost_marker(ui, time, viewport, content_origin, tracks_rect, theme);
        }

        // --- playhead ---
        {
            let time = frame_to_time(editor.current_frame(), config.fps);
            let playhead_content = Rect::from_min_size(
                Pos2::new(tracks_rect.min.x - scroll_x, ruler_rect.min.y),
                Vec2::new(content_w, config.markers_height + tracks_height),
            );
            let playhead = Playhead::new(time, viewport)
                .id(widget_id.with("playhead"))
                .show_in_rect(ui, playhead_content, full_clip, theme);
            if let Some(t) = playhead.scrubbed_to {
                editor.seek_to_time(t);
            }
            if playhead.dragging {
                editor.store.is_playhead_dragging = true;
            }

            if self.auto_follow_playhead && editor.is_playing() && !editor.store.is_playhead_dragging
            {
                let playhead_x = (time / viewport) as f32 * content_w;
                let margin = element_width * self.auto_follow_margin;
                let mut scroll = editor.zoom.scroll_left();
                if playhead_x < scroll + margin {
                    scroll = (playhead_x - margin).max(0.0);
                } else if playhead_x > scroll + element_width - margin {
                    scroll = (playhead_x - element_width + margin).min(max_scroll_x);
                }
                editor.zoom.set_scroll(scroll);
            }
        }

        self.show_context_menu(ui, editor, widget_id, now);

        // --- scrolling and wheel zoom ---
        if response.hovered() || tracks_rect.contains(pointer_pos.unwrap_or(Pos2::ZERO)) {
            let (scroll_delta, zoom_modifier) = ui.input(|i| {
                (i.smooth_scroll_delta, i.modifiers.command || i.modifiers.ctrl)
            });
            if scroll_delta != Vec2::ZERO {
                if zoom_modifier {
                    if let Some(pos) = pointer_pos {
                        if content_w > 0.0 {
                            editor.zoom.wheel_zoom(
                                f64::from(scroll_delta.y / 50.0),
                                pos.x,
                                tracks_rect.min.x,
                            );
                        } else {
                            log::warn!("wheel zoom skipped: timeline has no width yet");
                        }
                    }
                } else {
                    editor
                        .zoom
                        .set_scroll((scroll_x - scroll_delta.x).clamp(0.0, max_scroll_x));
                    scroll_y = (scroll_y - scroll_delta.y).clamp(0.0, max_scroll_y);
                }
            }
        }
        ui.ctx().data_mut(|d| d.insert_persisted(scroll_y_id, scroll_y));

        // --- keyboard map ---
        self.handle_keys(ui, editor, &tracks_rect, viewport, content_w, now);

        // --- zoom control row ---
        if self.show_zoom_control {
            let row_rect = Rect::from_min_size(
                Pos2::new(available.min.x, tracks_rect.max.y + 2.0),
                Vec2::new(available.width(), 24.0),
            );
            let mut row_ui = ui.new_child(
                egui::UiBuilder::new()
                    .max_rect(row_rect)
                    .layout(egui::Layout::left_to_right(egui::Align::Center)),
            );
            self.show_zoom_row(&mut row_ui, editor, &tracks_rect, viewport, content_w, element_width, theme);
        }

        TimelineViewResponse { response, changed }
    }

    fn show_zoom_row(
        &self,
        ui: &mut Ui,
        editor: &mut TimelineEditor,
        tracks_rect: &Rect,
        viewport: f64,
        content_w: f32,
        element_width: f32,
        theme: &Theme,
    ) {
        let zoom_bounds = (editor.config.zoom.min, editor.config.zoom.max);
        let control = ZoomControl::new(editor.zoom.scale(), zoom_bounds.0, zoom_bounds.1)
            .show(ui, theme);

        let playhead_time = frame_to_time(editor.current_frame(), editor.config.fps);
        let playhead_anchor = if viewport > 0.0 {
            tracks_rect.min.x + (playhead_time / viewport) as f32 * content_w
                - editor.zoom.scroll_left()
        } else {
            tracks_rect.min.x
        };
        let anchor = playhead_anchor.clamp(tracks_rect.min.x, tracks_rect.max.x);

        if control.zoom_in {
            editor.zoom.zoom_in(anchor, tracks_rect.min.x);
        }
        if control.zoom_out {
            editor.zoom.zoom_out(anchor, tracks_rect.min.x);
        }
        if control.reset {
            editor.zoom.reset();
        }
        if control.slider_started {
            editor
                .zoom
                .begin_slider_drag(anchor - tracks_rect.min.x, element_width);
        }
        if let Some(scale) = control.slider_scale {
            editor.zoom.slider_tick(scale);
        }
        if control.slider_ended {
            editor.zoom.end_slider_drag();
        }
    }

    fn show_context_menu(
        &self,
        ui: &mut Ui,
        editor: &mut TimelineEditor,
        widget_id: egui::Id,
        now: f64,
    ) {
        let menu_id = widget_id.with("context_menu");
        let Some(state) = ui.ctx().data(|d| d.get_temp::<ContextMenuState>(menu_id)) else {
            editor.store.is_context_menu_open = false;
            return;
        };
        editor.store.is_context_menu_open = true;

        let mut close = false;
        egui::Area::new(menu_id.with("area"))
            .fixed_pos(state.pos)
            .order(egui::Order::Foreground)
            .show(ui.ctx(), |ui| {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    ui.set_min_width(120.0);
                    if ui.button("Duplicate").clicked() {
                        editor.duplicate_selected(now);
                        close = true;
                    }
                    if ui.button("Split at playhead").clicked() {
                        editor.split_selected_at_playhead(now);
                        close = true;
                    }
                    if ui.button("Delete").clicked() {
                        editor.delete_selected(now);
                        close = true;
                    }
                });
            });

        let clicked_elsewhere = ui.input(|i| i.pointer.any_pressed())
            && ui
                .input(|i| i.pointer.interact_pos())
                .is_some_and(|p| (p - state.pos).length() > 160.0);
        if close || clicked_elsewhere || ui.input(|i| i.key_pressed(egui::Key::Escape)) {
            ui.ctx().data_mut(|d| d.remove::<ContextMenuState>(menu_id));
            editor.store.is_context_menu_open = false;
        }
    }

    fn handle_keys(
        &self,
        ui: &Ui,
        editor: &mut TimelineEditor,
        tracks_rect: &Rect,
        viewport: f64,
        content_w: f32,
        now: f64,
    ) {
        // Space toggles playback unless a text edit owns the keyboard.
        let typing = ui.ctx().wants_keyboard_input();
        let (space, undo, redo, zoom_in, zoom_out, delete) = ui.input(|i| {
            let cmd = i.modifiers.command || i.modifiers.ctrl;
            (
                i.key_pressed(egui::Key::Space),
                cmd && !i.modifiers.shift && i.key_pressed(egui::Key::Z),
                (cmd && i.modifiers.shift && i.key_pressed(egui::Key::Z))
                    || (cmd && i.key_pressed(egui::Key::Y)),
                cmd && (i.key_pressed(egui::Key::Equals) || i.key_pressed(egui::Key::Plus)),
                cmd && i.key_pressed(egui::Key::Minus),
                i.key_pressed(egui::Key::Delete) || i.key_pressed(egui::Key::Backspace),
            )
        });

        if space && !typing {
            editor.toggle_playback();
        }
        if undo {
            editor.undo(now);
        }
        if redo {
            editor.redo(now);
        }
        if delete && !typing {
            editor.delete_selected(now);
        }
        if zoom_in || zoom_out {
            let playhead_time = frame_to_time(editor.current_frame(), editor.config.fps);
            let anchor = if viewport > 0.0 {
                (tracks_rect.min.x + (playhead_time / viewport) as f32 * content_w
                    - editor.zoom.scroll_left())
                .clamp(tracks_rect.min.x, tracks_rect.max.x)
            } else {
                tracks_rect.min.x
            };
            if zoom_in {
                editor.zoom.zoom_in(anchor, tracks_rect.min.x);
            } else {
                editor.zoom.zoom_out(anchor, tracks_rect.min.x);
            }
        }
    }
}

impl Default for TimelineView<'_> {
    fn default() -> Self {
        Self::new()
    }
}
