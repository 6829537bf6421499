//! Timeline demo: a small composition with synthetic media providers.
//!
//! Run with `cargo run --example timeline_demo`.

use std::sync::Arc;

use cutline::{CutlineContextExt, Theme, TimelineView, Transport};
use cutline_core::{
    AbortToken, AudioProvider, DecodedAudio, FrameImage, FrameSource, ItemKind, MediaError,
    NewItemOptions, Overlay, ThumbnailCache, TimelineConfig, TimelineEditor, WaveformProcessor,
};

/// Synthesizes a decaying sine so waveforms have something to show.
struct ToneProvider;

impl AudioProvider for ToneProvider {
    fn decode(&self, _src: &str, abort: &AbortToken) -> Result<DecodedAudio, MediaError> {
        abort.check()?;
        let sample_rate = 8000;
        let samples: Vec<f32> = (0..sample_rate * 20)
            .map(|i| {
                let t = i as f32 / sample_rate as f32;
                (t * 220.0 * std::f32::consts::TAU).sin() * (-t * 0.2).exp()
            })
            .collect();
        Ok(DecodedAudio { samples, sample_rate })
    }
}

/// Produces flat-colored poster frames that shift hue over time.
struct GradientFrames;

impl FrameSource for GradientFrames {
    fn poster_frame(
        &self,
        _src: &str,
        time: f64,
        height: u32,
        abort: &AbortToken,
    ) -> Result<FrameImage, MediaError> {
        abort.check()?;
        let width = height * 16 / 9;
        let r = ((time * 12.0) as u32 % 200 + 40) as u8;
        let b = (220 - (time * 8.0) as u32 % 180) as u8;
        let mut rgba = Vec::with_capacity((width * height * 4) as usize);
        for _ in 0..width * height {
            rgba.extend_from_slice(&[r, 80, b, 255]);
        }
        Ok(FrameImage { width, height, rgba })
    }
}

fn demo_overlays() -> Vec<Overlay> {
    let base = |id: &str, from: i64, frames: i64, row: usize, kind: ItemKind| Overlay {
        id: id.into(),
        from,
        duration_in_frames: frames,
        row,
        kind,
        label: Some(id.to_uppercase()),
        color: None,
        speed: None,
        video_start_time: None,
        start_from_sound: None,
        media_duration: None,
        data: serde_json::Value::Null,
    };

    let mut intro = base("intro", 0, 150, 0, ItemKind::Video);
    intro.color = Some([99, 102, 241]);
    intro.media_duration = Some(18.0);
    intro.data = serde_json::json!({"src": "intro.mp4", "videoId": "intro"});

    let mut title = base("title", 30, 90, 1, ItemKind::Text);
    title.color = Some([14, 165, 233]);

    let mut music = base("music", 0, 300, 2, ItemKind::Audio);
    music.color = Some([34, 197, 94]);
    music.media_duration = Some(20.0);
    music.data = serde_json::json!({"src": "music.wav"});

    vec![intro, title, music]
}

struct DemoApp {
    editor: TimelineEditor,
    thumbnails: ThumbnailCache,
    waveforms: WaveformProcessor,
}

impl DemoApp {
    fn new(ctx: &egui::Context) -> Self {
        ctx.set_cutline_theme(Theme::dark());
        let mut editor = TimelineEditor::new(TimelineConfig::default());
        editor.set_overlays(demo_overlays(), 0.0);
        editor.set_external_duration(Some(12.0));
        Self {
            editor,
            thumbnails: ThumbnailCache::new(Arc::new(GradientFrames)),
            waveforms: WaveformProcessor::new(Arc::new(ToneProvider)),
        }
    }
}

impl eframe::App for DemoApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let theme = ctx.cutline_theme();

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui.horizontal(|ui| {
                Transport::new().show(ui, &mut self.editor, &theme);
                ui.separator();
                if ui.button("+ Text").clicked() {
                    let mut options = NewItemOptions::new(ItemKind::Text);
                    options.label = Some("New text".into());
                    options.duration = Some(3.0);
                    self.editor.add_new_item(options, ui.input(|i| i.time));
                }
                let split = self.editor.split_mode();
                if ui.selectable_label(split, "Split").clicked() {
                    self.editor.set_split_mode(!split);
                }
            });
        });

        egui::CentralPanel::default().show(ctx, |ui| {
            TimelineView::new()
                .thumbnails(&self.thumbnails)
                .waveforms(&self.waveforms)
                .show(ui, &mut self.editor, &theme);
        });

        // Advance the playhead while playing.
        if self.editor.is_playing() {
            let frame = self.editor.current_frame() + 1;
            self.editor.seek_to_frame(frame);
            ctx.request_repaint();
        }
        let _ = self.editor.take_events();
    }
}

fn main() -> eframe::Result {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default().with_inner_size([1100.0, 480.0]),
        ..Default::default()
    };
    eframe::run_native(
        "Cutline timeline demo",
        options,
        Box::new(|cc| Ok(Box::new(DemoApp::new(&cc.egui_ctx)))),
    )
}
