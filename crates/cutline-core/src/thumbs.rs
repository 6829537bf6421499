//! Thumbnail Cache
//!
//! Content-addressed sprite atlases of poster frames for video items. A
//! sprite samples the source at a fixed interval chosen from the zoom level;
//! the renderer maps a timeline time to an atlas rectangle through
//! [`SpriteSheet::rect_for_time`]. Coarse sprites appear quickly; a finer
//! one is generated in the background once per `(video, interval)` and the
//! renderer switches over when it lands.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use crate::error::MediaError;
use crate::media::{AbortToken, FrameImage, FrameSource};

/// Pixel rectangle inside a sprite atlas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SpriteRect {
    /// Left edge in pixels
    pub x: u32,
    /// Top edge in pixels
    pub y: u32,
    /// Width in pixels
    pub w: u32,
    /// Height in pixels
    pub h: u32,
}

/// A generated sprite atlas and the sampling it was built with.
#[derive(Debug, Clone)]
pub struct SpriteSheet {
    /// Atlas width in pixels
    pub width: u32,
    /// Atlas height in pixels
    pub height: u32,
    /// Tightly packed RGBA bytes, row major
    pub rgba: Vec<u8>,
    /// Width of one frame cell
    pub frame_width: u32,
    /// Height of one frame cell
    pub frame_height: u32,
    /// Cells per atlas row
    pub columns: u32,
    /// Number of sampled frames
    pub frame_count: u32,
    /// Seconds between sampled frames
    pub interval: f64,
}

impl SpriteSheet {
    /// The atlas cell covering media time `t` seconds.
    #[must_use]
    pub fn rect_for_time(&self, t: f64) -> SpriteRect {
        let index = if self.interval > 0.0 {
            ((t / self.interval).floor() as i64).clamp(0, i64::from(self.frame_count) - 1) as u32
        } else {
            0
        };
        let col = index % self.columns.max(1);
        let row = index / self.columns.max(1);
        SpriteRect {
            x: col * self.frame_width,
            y: row * self.frame_height,
            w: self.frame_width,
            h: self.frame_height,
        }
    }
}

/// Sampling interval for a video at the current zoom.
///
/// Short videos always sample densely. Zoomed in, the interval grows with
/// the video length; zoomed out it is driven by how many seconds one pixel
/// spans, with a wide bucket past 1.45 s/px.
#[must_use]
pub fn thumbnail_interval(video_duration: f64, zoomed_in: bool, sec_per_pixel: f64) -> f64 {
    if video_duration < 180.0 {
        return 1.0;
    }
    if zoomed_in {
        if video_duration < 420.0 {
            1.0
        } else if video_duration <= 3600.0 {
            5.0
        } else {
            10.0
        }
    } else if sec_per_pixel <= 1.45 {
        60.0
    } else {
        180.0
    }
}

/// Cache key for one sprite variant.
#[must_use]
pub fn sprite_cache_key(video_id: &str, interval: f64, height: u32) -> String {
    format!("video-thumbnail-{video_id}-{interval}-{height}")
}

#[derive(Default)]
struct CacheState {
    started: HashSet<String>,
    ready: HashMap<String, Arc<SpriteSheet>>,
    fine_started: HashSet<String>,
    aborts: Vec<AbortToken>,
}

/// Content-addressed sprite generator and cache.
///
/// [`ThumbnailCache::get_or_create`] returns a finished sprite when one is
/// cached, otherwise kicks off background generation exactly once per key
/// and returns `None` until it lands. Concurrent requests for the same key
/// share the single generation.
pub struct ThumbnailCache {
    source: Arc<dyn FrameSource>,
    state: Arc<Mutex<CacheState>>,
}

impl ThumbnailCache {
    /// Create a cache over the host's frame extractor.
    #[must_use]
    pub fn new(source: Arc<dyn FrameSource>) -> Self {
        Self {
            source,
            state: Arc::new(Mutex::new(CacheState::default())),
        }
    }

    /// Fetch the sprite for a key, starting generation if needed.
    pub fn get_or_create(
        &self,
        cache_key: &str,
        video_src: &str,
        video_duration: f64,
        interval: f64,
        height: u32,
    ) -> Option<Arc<SpriteSheet>> {
        {
            let mut state = self.state.lock().expect("thumbnail state poisoned");
            if let Some(sprite) = state.ready.get(cache_key) {
                return Some(Arc::clone(sprite));
            }
            if !state.started.insert(cache_key.to_string()) {
                return None;
            }
        }
        self.spawn_generation(cache_key.to_string(), video_src.to_string(), video_duration, interval, height);
        None
    }

    /// Kick off a finer sprite once per `(video, interval)` pair.
    ///
    /// Call while rendering from a coarse sprite; the renderer picks the
    /// fine one up through [`ThumbnailCache::get_or_create`] when ready.
    pub fn ensure_fine_sprite(
        &self,
        video_id: &str,
        video_src: &str,
        video_duration: f64,
        fine_interval: f64,
        height: u32,
    ) {
        let fine_key = format!("{video_id}-{fine_interval}");
        {
            let mut state = self.state.lock().expect("thumbnail state poisoned");
            if !state.fine_started.insert(fine_key) {
                return;
            }
        }
        let cache_key = sprite_cache_key(video_id, fine_interval, height);
        self.get_or_create(&cache_key, video_src, video_duration, fine_interval, height);
    }

    /// The finest finished sprite for the video at this height.
    ///
    /// Used as a stand-in while the requested interval is still generating.
    #[must_use]
    pub fn fallback_sprite(&self, video_id: &str, height: u32) -> Option<Arc<SpriteSheet>> {
        let prefix = format!("video-thumbnail-{video_id}-");
        let suffix = format!("-{height}");
        let state = self.state.lock().expect("thumbnail state poisoned");
        state
            .ready
            .iter()
            .filter(|(key, _)| key.starts_with(&prefix) && key.ends_with(&suffix))
            .map(|(_, sprite)| sprite)
            .min_by(|a, b| {
                a.interval
                    .partial_cmp(&b.interval)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(Arc::clone)
    }

    /// Cancel all in-flight generation (consumer teardown).
    pub fn cancel_all(&self) {
        let state = self.state.lock().expect("thumbnail state poisoned");
        for token in &state.aborts {
            token.cancel();
        }
    }

    fn spawn_generation(
        &self,
        cache_key: String,
        video_src: String,
        video_duration: f64,
        interval: f64,
        height: u32,
    ) {
        let abort = AbortToken::new();
        self.state
            .lock()
            .expect("thumbnail state poisoned")
            .aborts
            .push(abort.clone());

        let source = Arc::clone(&self.source);
        let state = Arc::clone(&self.state);
        std::thread::spawn(move || {
            let result = build_sprite(source.as_ref(), &video_src, video_duration, interval, height, &abort);
            let mut state = state.lock().expect("thumbnail state poisoned");
            match result {
                Ok(sprite) => {
                    state.ready.insert(cache_key, Arc::new(sprite));
                }
                Err(MediaError::Cancelled) => {
                    state.started.remove(&cache_key);
                }
                Err(err) => {
                    log::warn!("thumbnail sprite failed for {video_src}: {err}");
                    state.started.remove(&cache_key);
                }
            }
        });
    }
}

/// Sample the source and stitch the frames into a roughly square atlas.
fn build_sprite(
    source: &dyn FrameSource,
    video_src: &str,
    video_duration: f64,
    interval: f64,
    height: u32,
    abort: &AbortToken,
) -> Result<SpriteSheet, MediaError> {
    let interval = if interval > 0.0 { interval } else { 1.0 };
    let frame_count = ((video_duration / interval).ceil() as u32).max(1);

    let mut frames: Vec<FrameImage> = Vec::with_capacity(frame_count as usize);
    for index in 0..frame_count {
        abort.check()?;
        let time = f64::from(index) * interval;
        frames.push(source.poster_frame(video_src, time, height, abort)?);
    }

    let frame_width = frames.iter().map(|f| f.width).max().unwrap_or(1).max(1);
    let frame_height = frames.iter().map(|f| f.height).max().unwrap_or(1).max(1);
    let columns = (f64::from(frame_count).sqrt().ceil() as u32).max(1);
    let rows = frame_count.div_ceil(columns);

    let width = columns * frame_width;
    let atlas_height = rows * frame_height;
    let mut rgba = vec![0_u8; (width * atlas_height * 4) as usize];

    for (index, frame) in frames.iter().enumerate() {
        abort.check()?;
        let cell_x = (index as u32 % columns) * frame_width;
        let cell_y = (index as u32 / columns) * frame_height;
        blit(&mut rgba, width, frame, cell_x, cell_y);
    }

    Ok(SpriteSheet {
        width,
        height: atlas_height,
        rgba,
        frame_width,
        frame_height,
        columns,
        frame_count,
        interval,
    })
}

fn blit(atlas: &mut [u8], atlas_width: u32, frame: &FrameImage, dst_x: u32, dst_y: u32) {
    let row_bytes = (frame.width * 4) as usize;
    for row in 0..frame.height {
        let src_offset = (row * frame.width * 4) as usize;
        let dst_offset = (((dst_y + row) * atlas_width + dst_x) * 4) as usize;
        let src_end = src_offset + row_bytes;
        if src_end <= frame.rgba.len() && dst_offset + row_bytes <= atlas.len() {
            atlas[dst_offset..dst_offset + row_bytes]
                .copy_from_slice(&frame.rgba[src_offset..src_end]);
        }
    }
}
