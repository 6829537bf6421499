//! Time Axis Math
//!
//! Frame/seconds conversion at a fixed frame rate, viewport sizing under
//! zoom, and the ruler tick ladder.

/// Convert a frame number to seconds, rounded to millisecond precision.
#[must_use]
pub fn frame_to_time(frame: i64, fps: u32) -> f64 {
    (frame as f64 / f64::from(fps) * 1000.0).round() / 1000.0
}

/// Convert seconds to the nearest frame number.
///
/// Times are first rounded to millisecond precision so that values produced
/// by [`frame_to_time`] map back to the same frame.
#[must_use]
pub fn time_to_frame(time: f64, fps: u32) -> i64 {
    let millis = (time * 1000.0).round() / 1000.0;
    (millis * f64::from(fps)).round() as i64
}

/// The time span the timeline element represents at the given zoom.
///
/// Zooming in (`zoom >= 1`) keeps the span and widens the element instead;
/// zooming out expands the span.
#[must_use]
pub fn viewport_duration(composition: f64, zoom: f64) -> f64 {
    if zoom >= 1.0 {
        composition
    } else {
        composition / zoom.max(1e-4)
    }
}

/// Pixel width of the timeline content at the given zoom.
///
/// The counterpart of [`viewport_duration`]: zooming in widens the content,
/// zooming out leaves it at the element width.
#[must_use]
pub fn content_width(element_width: f32, zoom: f64) -> f32 {
    element_width * zoom.max(1.0) as f32
}

/// Candidate spacings for major ruler ticks, in seconds.
pub const TICK_LADDER: [f64; 16] = [
    0.1, 0.2, 0.5, 1.0, 2.0, 5.0, 10.0, 15.0, 30.0, 60.0, 120.0, 300.0, 600.0, 900.0, 1800.0,
    3600.0,
];

/// Spacing between major ruler ticks for the given span and element width.
///
/// Picks the smallest ladder entry that keeps major ticks at least ~100 px
/// apart; the coarsest entry is used when even that is too dense.
#[must_use]
pub fn major_tick_interval(total_duration: f64, timeline_width: f32) -> f64 {
    if timeline_width <= 0.0 || total_duration <= 0.0 {
        return TICK_LADDER[0];
    }
    let seconds_per_hundred_px = total_duration / f64::from(timeline_width) * 100.0;
    for interval in TICK_LADDER {
        if interval >= seconds_per_hundred_px {
            return interval;
        }
    }
    TICK_LADDER[TICK_LADDER.len() - 1]
}

/// Spacing between minor ticks for a given major interval.
///
/// Sub-second majors split in half; larger ones split in five.
#[must_use]
pub fn minor_tick_interval(major: f64) -> f64 {
    if major < 1.0 {
        major / 2.0
    } else {
        major / 5.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_time_round_trip() {
        for frame in [0_i64, 1, 29, 30, 31, 899, 900, 12_345] {
            let t = frame_to_time(frame, 30);
            assert_eq!(time_to_frame(t, 30), frame, "frame {frame}");
        }
    }

    #[test]
    fn test_frame_to_time_millisecond_precision() {
        // 1/30 s = 0.0333... rounds to 0.033
        assert!((frame_to_time(1, 30) - 0.033).abs() < 1e-9);
        assert!((frame_to_time(10, 30) - 0.333).abs() < 1e-9);
    }

    #[test]
    fn test_viewport_duration() {
        assert_eq!(viewport_duration(60.0, 1.0), 60.0);
        assert_eq!(viewport_duration(60.0, 4.0), 60.0);
        assert_eq!(viewport_duration(60.0, 0.5), 120.0);
        // Tiny zoom values are floored rather than dividing by zero.
        assert!(viewport_duration(60.0, 0.0) <= 60.0 / 1e-4 + 1.0);
    }

    #[test]
    fn test_content_width() {
        assert_eq!(content_width(800.0, 1.0), 800.0);
        assert_eq!(content_width(800.0, 2.0), 1600.0);
        assert_eq!(content_width(800.0, 0.5), 800.0);
    }

    #[test]
    fn test_major_tick_interval_scales_with_duration() {
        // 10 s over 1000 px => 1 s per 100 px
        assert_eq!(major_tick_interval(10.0, 1000.0), 1.0);
        // 1 hour over 1000 px => 360 s per 100 px => 600 s ticks
        assert_eq!(major_tick_interval(3600.0, 1000.0), 600.0);
        // Short spans get sub-second ticks
        assert_eq!(major_tick_interval(0.5, 1000.0), 0.1);
    }

    #[test]
    fn test_minor_tick_interval() {
        assert_eq!(minor_tick_interval(5.0), 1.0);
        assert_eq!(minor_tick_interval(0.5), 0.25);
    }
}
