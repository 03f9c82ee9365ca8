//! Audio frame type and PCM16 conversion helpers.

use bytes::Bytes;
use std::time::Duration;

/// Sample rate used for all room audio, in Hz. Rooms carry PCM16 mono at this
/// rate in both directions, so no resampling layer is needed in the pipeline.
pub const ROOM_SAMPLE_RATE: u32 = 24_000;

/// A chunk of PCM16 little-endian mono audio at a fixed sample rate.
#[derive(Debug, Clone)]
pub struct AudioFrame {
    data: Bytes,
    sample_rate: u32,
}

impl AudioFrame {
    pub fn new(data: impl Into<Bytes>, sample_rate: u32) -> Self {
        Self {
            data: data.into(),
            sample_rate,
        }
    }

    /// Builds a frame from i16 samples.
    pub fn from_samples(samples: &[i16], sample_rate: u32) -> Self {
        let mut data = Vec::with_capacity(samples.len() * 2);
        for sample in samples {
            data.extend_from_slice(&sample.to_le_bytes());
        }
        Self::new(data, sample_rate)
    }

    /// Raw PCM16 little-endian bytes.
    pub fn data(&self) -> &Bytes {
        &self.data
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Number of samples in the frame. A trailing odd byte is ignored.
    pub fn sample_count(&self) -> usize {
        self.data.len() / 2
    }

    /// Wall-clock duration of the frame.
    pub fn duration(&self) -> Duration {
        Duration::from_secs_f64(self.sample_count() as f64 / self.sample_rate as f64)
    }

    /// Decodes the frame into i16 samples.
    pub fn samples(&self) -> Vec<i16> {
        self.data
            .chunks_exact(2)
            .map(|chunk| i16::from_le_bytes([chunk[0], chunk[1]]))
            .collect()
    }

    /// Decodes the frame into f32 samples normalized to [-1.0, 1.0].
    pub fn samples_f32(&self) -> Vec<f32> {
        self.data
            .chunks_exact(2)
            .map(|chunk| {
                let v = i16::from_le_bytes([chunk[0], chunk[1]]);
                (v as f32 / 32768.0).clamp(-1.0, 1.0)
            })
            .collect()
    }

    /// Concatenates frames into one contiguous frame. The sample rate is taken
    /// from the first frame; an empty slice yields an empty frame at the room
    /// rate.
    pub fn concat(frames: &[AudioFrame]) -> AudioFrame {
        let sample_rate = frames
            .first()
            .map(|f| f.sample_rate)
            .unwrap_or(ROOM_SAMPLE_RATE);
        let mut data = Vec::with_capacity(frames.iter().map(|f| f.data.len()).sum());
        for frame in frames {
            data.extend_from_slice(&frame.data);
        }
        AudioFrame::new(data, sample_rate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_counts_samples_not_bytes() {
        // 24_000 samples at 24 kHz is one second.
        let frame = AudioFrame::from_samples(&vec![0i16; 24_000], ROOM_SAMPLE_RATE);
        assert_eq!(frame.duration(), Duration::from_secs(1));
        assert_eq!(frame.sample_count(), 24_000);
    }

    #[test]
    fn samples_round_trip() {
        let samples = [0i16, -1, 1, i16::MIN, i16::MAX];
        let frame = AudioFrame::from_samples(&samples, ROOM_SAMPLE_RATE);
        assert_eq!(frame.samples(), samples);
    }

    #[test]
    fn samples_f32_are_normalized() {
        let frame = AudioFrame::from_samples(&[i16::MIN, 0, i16::MAX], ROOM_SAMPLE_RATE);
        let f32s = frame.samples_f32();
        assert_eq!(f32s[0], -1.0);
        assert_eq!(f32s[1], 0.0);
        assert!(f32s[2] > 0.999 && f32s[2] <= 1.0);
    }

    #[test]
    fn concat_joins_frames_in_order() {
        let a = AudioFrame::from_samples(&[1, 2], ROOM_SAMPLE_RATE);
        let b = AudioFrame::from_samples(&[3], ROOM_SAMPLE_RATE);
        let joined = AudioFrame::concat(&[a, b]);
        assert_eq!(joined.samples(), vec![1, 2, 3]);
        assert_eq!(joined.sample_rate(), ROOM_SAMPLE_RATE);
    }

    #[test]
    fn concat_of_nothing_is_empty() {
        let joined = AudioFrame::concat(&[]);
        assert!(joined.is_empty());
        assert_eq!(joined.sample_rate(), ROOM_SAMPLE_RATE);
    }
}
