//! Waveform Processor
//!
//! Derives normalized RMS peak arrays from decoded audio for the waveform
//! renderer. Results are cached by a `(source, start, duration)` fingerprint;
//! a new request for a different fingerprint aborts whatever was still in
//! flight. Decoding runs on a worker thread and the renderer polls for the
//! finished peaks each frame.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::error::MediaError;
use crate::media::{AbortToken, AudioProvider};

/// Floor applied to the normalization divisor so silence stays flat instead
/// of blowing up to full scale.
const NORMALIZE_FLOOR: f32 = 0.001;

/// Normalized peaks for one time slice of one source.
#[derive(Debug, Clone, PartialEq)]
pub struct WaveformPeaks {
    /// RMS peaks normalized to [0, 1]
    pub peaks: Vec<f32>,
    /// Number of peaks
    pub length: usize,
}

/// Compute normalized RMS peaks for a sample slice.
///
/// Produces `max(10, floor(duration * 100))` values, each the RMS of its
/// segment, normalized by the largest peak.
#[must_use]
pub fn extract_peaks(samples: &[f32], duration: f64) -> WaveformPeaks {
    let target = ((duration * 100.0).floor() as usize).max(10);
    if samples.is_empty() {
        return WaveformPeaks { peaks: vec![0.0; target], length: target };
    }

    let mut peaks = Vec::with_capacity(target);
    let step = samples.len() as f64 / target as f64;
    for i in 0..target {
        let begin = (i as f64 * step) as usize;
        let end = (((i + 1) as f64 * step) as usize).min(samples.len()).max(begin + 1);
        let segment = &samples[begin..end];
        let sum_squares: f32 = segment.iter().map(|s| s * s).sum();
        peaks.push((sum_squares / segment.len() as f32).sqrt());
    }

    let max = peaks.iter().copied().fold(0.0_f32, f32::max).max(NORMALIZE_FLOOR);
    for peak in &mut peaks {
        *peak /= max;
    }

    WaveformPeaks { length: peaks.len(), peaks }
}

#[derive(Debug)]
enum SliceState {
    Pending,
    Ready(Arc<WaveformPeaks>),
    Failed(MediaError),
}

#[derive(Default)]
struct ProcessorState {
    slices: HashMap<String, SliceState>,
    current_abort: Option<(String, AbortToken)>,
}

/// Extracts and caches waveform peaks per `(source, start, duration)` slice.
///
/// [`WaveformProcessor::request`] starts background extraction and returns
/// immediately; [`WaveformProcessor::peaks`] polls for the result. Issuing a
/// request for a new fingerprint aborts the previous in-flight decode.
pub struct WaveformProcessor {
    provider: Arc<dyn AudioProvider>,
    state: Arc<Mutex<ProcessorState>>,
}

impl WaveformProcessor {
    /// Create a processor over the host's audio decoder.
    #[must_use]
    pub fn new(provider: Arc<dyn AudioProvider>) -> Self {
        Self {
            provider,
            state: Arc::new(Mutex::new(ProcessorState::default())),
        }
    }

    /// Cache fingerprint for a slice.
    #[must_use]
    pub fn fingerprint(src: &str, start: f64, duration: f64) -> String {
        format!("{src}:{start:.3}:{duration:.3}")
    }

    /// Ensure peaks for the slice are being computed.
    ///
    /// Returns immediately. A request for a fingerprint that is already
    /// cached or in flight is a no-op; anything else cancels the previous
    /// in-flight decode first.
    pub fn request(&self, src: &str, start: f64, duration: f64) {
        let key = Self::fingerprint(src, start, duration);
        let abort = {
            let mut state = self.state.lock().expect("waveform state poisoned");
            if state.slices.contains_key(&key) {
                return;
            }
            if let Some((active_key, token)) = &state.current_abort {
                if *active_key != key {
                    token.cancel();
                }
            }
            let token = AbortToken::new();
            state.current_abort = Some((key.clone(), token.clone()));
            state.slices.insert(key.clone(), SliceState::Pending);
            token
        };

        let provider = Arc::clone(&self.provider);
        let state = Arc::clone(&self.state);
        let src = src.to_string();
        std::thread::spawn(move || {
            let result = compute_slice(provider.as_ref(), &src, start, duration, &abort);
            let mut state = state.lock().expect("waveform state poisoned");
            match result {
                Ok(peaks) => {
                    state.slices.insert(key, SliceState::Ready(Arc::new(peaks)));
                }
                Err(MediaError::Cancelled) => {
                    // Leave no residue; a later request may retry the slice.
                    state.slices.remove(&key);
                }
                Err(err) => {
                    log::warn!("waveform extraction failed for {src}: {err}");
                    state.slices.insert(key, SliceState::Failed(err));
                }
            }
        });
    }

    /// The finished peaks for a slice, if extraction completed.
    #[must_use]
    pub fn peaks(&self, src: &str, start: f64, duration: f64) -> Option<Arc<WaveformPeaks>> {
        let key = Self::fingerprint(src, start, duration);
        let state = self.state.lock().expect("waveform state poisoned");
        match state.slices.get(&key) {
            Some(SliceState::Ready(peaks)) => Some(Arc::clone(peaks)),
            _ => None,
        }
    }

    /// Cancel whatever is currently in flight.
    pub fn cancel_inflight(&self) {
        let state = self.state.lock().expect("waveform state poisoned");
        if let Some((_, token)) = &state.current_abort {
            token.cancel();
        }
    }

    /// Extract peaks synchronously, bypassing the worker thread.
    pub fn get_peaks_blocking(
        &self,
        src: &str,
        start: f64,
        duration: f64,
    ) -> Result<Arc<WaveformPeaks>, MediaError> {
        let key = Self::fingerprint(src, start, duration);
        {
            let state = self.state.lock().expect("waveform state poisoned");
            if let Some(SliceState::Ready(peaks)) = state.slices.get(&key) {
                return Ok(Arc::clone(peaks));
            }
        }
        let abort = AbortToken::new();
        let peaks = Arc::new(compute_slice(self.provider.as_ref(), src, start, duration, &abort)?);
        self.state
            .lock()
            .expect("waveform state poisoned")
            .slices
            .insert(key, SliceState::Ready(Arc::clone(&peaks)));
        Ok(peaks)
    }
}

fn compute_slice(
    provider: &dyn AudioProvider,
    src: &str,
    start: f64,
    duration: f64,
    abort: &AbortToken,
) -> Result<WaveformPeaks, MediaError> {
    abort.check()?;
    let audio = provider.decode(src, abort)?;
    abort.check()?;

    let rate = f64::from(audio.sample_rate);
    let begin = ((start * rate) as usize).min(audio.samples.len());
    let end = (((start + duration) * rate) as usize).min(audio.samples.len());
    Ok(extract_peaks(&audio.samples[begin..end], duration))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::DecodedAudio;

    struct SineProvider;

    impl AudioProvider for SineProvider {
        fn decode(&self, _src: &str, abort: &AbortToken) -> Result<DecodedAudio, MediaError> {
            abort.check()?;
            let sample_rate = 1000;
            let samples: Vec<f32> = (0..10_000)
                .map(|i| (i as f32 / sample_rate as f32 * 440.0 * std::f32::consts::TAU).sin())
                .collect();
            Ok(DecodedAudio { samples, sample_rate })
        }
    }

    struct FailingProvider;

    impl AudioProvider for FailingProvider {
        fn decode(&self, src: &str, _abort: &AbortToken) -> Result<DecodedAudio, MediaError> {
            Err(MediaError::SourceUnavailable(src.to_string()))
        }
    }

    #[test]
    fn test_extract_peaks_count_and_range() {
        let samples: Vec<f32> = (0..4410).map(|i| (i as f32 * 0.05).sin()).collect();
        let peaks = extract_peaks(&samples, 2.5);
        assert_eq!(peaks.length, 250);
        assert!(peaks.peaks.iter().all(|p| (0.0..=1.0).contains(p)));
        // A sine slice normalizes so the loudest segment hits 1.0.
        assert!(peaks.peaks.iter().copied().fold(0.0_f32, f32::max) > 0.99);
    }

    #[test]
    fn test_extract_peaks_minimum_count() {
        let samples = vec![0.5_f32; 100];
        let peaks = extract_peaks(&samples, 0.02);
        assert_eq!(peaks.length, 10);
    }

    #[test]
    fn test_silence_stays_flat() {
        let samples = vec![0.0_f32; 1000];
        let peaks = extract_peaks(&samples, 1.0);
        assert!(peaks.peaks.iter().all(|p| *p == 0.0));
    }

    #[test]
    fn test_blocking_extraction_and_cache() {
        let processor = WaveformProcessor::new(Arc::new(SineProvider));
        let first = processor.get_peaks_blocking("clip.wav", 0.0, 2.0).unwrap();
        assert_eq!(first.length, 200);
        let again = processor.get_peaks_blocking("clip.wav", 0.0, 2.0).unwrap();
        assert!(Arc::ptr_eq(&first, &again));
    }

    #[test]
    fn test_failed_decode_reported() {
        let processor = WaveformProcessor::new(Arc::new(FailingProvider));
        let err = processor.get_peaks_blocking("missing.wav", 0.0, 1.0).unwrap_err();
        assert!(matches!(err, MediaError::SourceUnavailable(_)));
    }

    #[test]
    fn test_fingerprint_millisecond_precision() {
        assert_eq!(
            WaveformProcessor::fingerprint("a.wav", 1.0, 2.5),
            "a.wav:1.000:2.500"
        );
    }

    #[test]
    fn test_request_then_poll() {
        let processor = WaveformProcessor::new(Arc::new(SineProvider));
        processor.request("clip.wav", 0.0, 1.0);
        // The worker is fast here, but poll with a bounded wait regardless.
        let mut peaks = None;
        for _ in 0..200 {
            peaks = processor.peaks("clip.wav", 0.0, 1.0);
            if peaks.is_some() {
                break;
            }
            std::thread::sleep(std::time::Duration::from_millis(2));
        }
        assert_eq!(peaks.expect("peaks ready").length, 100);
    }
}
