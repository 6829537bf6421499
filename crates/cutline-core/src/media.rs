//! Media Providers
//!
//! Seams between the timeline and the host's media stack. The host supplies
//! decoded audio and poster frames; the core derives waveform peaks and
//! thumbnail sprites from them, off the UI thread, with cooperative
//! cancellation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::MediaError;

/// Cooperative cancellation token shared with in-flight media work.
///
/// Cloning shares the flag. Long-running providers should poll
/// [`AbortToken::is_cancelled`] and bail out with [`MediaError::Cancelled`].
#[derive(Debug, Clone, Default)]
pub struct AbortToken {
    flag: Arc<AtomicBool>,
}

impl AbortToken {
    /// Create a live token.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation was requested.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }

    /// Convenience guard: `Err(Cancelled)` once cancellation was requested.
    pub fn check(&self) -> Result<(), MediaError> {
        if self.is_cancelled() {
            Err(MediaError::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// Mono audio decoded by the host.
#[derive(Debug, Clone)]
pub struct DecodedAudio {
    /// Samples mixed down to one channel, in [-1, 1]
    pub samples: Vec<f32>,
    /// Sample rate of `samples`
    pub sample_rate: u32,
}

impl DecodedAudio {
    /// Duration of the decoded audio in seconds.
    #[must_use]
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f64 / f64::from(self.sample_rate)
    }
}

/// Decodes audio sources for waveform extraction.
pub trait AudioProvider: Send + Sync {
    /// Decode the source to mono samples.
    fn decode(&self, src: &str, abort: &AbortToken) -> Result<DecodedAudio, MediaError>;
}

/// An RGBA poster frame produced by the host.
#[derive(Debug, Clone)]
pub struct FrameImage {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Tightly packed RGBA bytes, row major
    pub rgba: Vec<u8>,
}

/// Extracts approximate poster frames from video sources.
pub trait FrameSource: Send + Sync {
    /// A frame near `time` seconds, scaled to the requested height.
    fn poster_frame(
        &self,
        src: &str,
        time: f64,
        height: u32,
        abort: &AbortToken,
    ) -> Result<FrameImage, MediaError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_abort_token() {
        let token = AbortToken::new();
        assert!(token.check().is_ok());
        let shared = token.clone();
        shared.cancel();
        assert!(token.is_cancelled());
        assert_eq!(token.check(), Err(MediaError::Cancelled));
    }

    #[test]
    fn test_decoded_audio_duration() {
        let audio = DecodedAudio { samples: vec![0.0; 44_100], sample_rate: 44_100 };
        assert!((audio.duration_secs() - 1.0).abs() < 1e-9);
    }
}
