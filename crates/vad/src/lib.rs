//! Energy-based voice activity detection.
//!
//! Classifies each incoming frame by its normalized RMS energy, then debounces
//! the raw decision: speech is committed only after `min_speech_duration` of
//! continuous activity, and an utterance ends only after `min_silence_duration`
//! of continuous quiet. Short blips and pauses below those thresholds produce
//! no events.

use rooftops_agents::{AgentError, AudioFrame, Vad, VadEvent};
use std::time::Duration;
use tracing::debug;

/// Tunable parameters for [`EnergyVad`].
#[derive(Debug, Clone)]
pub struct VadOptions {
    /// Continuous activity required before speech is committed.
    pub min_speech_duration: Duration,
    /// Continuous quiet required before an utterance ends.
    pub min_silence_duration: Duration,
    /// Normalized RMS energy, in [0.0, 1.0], above which a frame counts as
    /// active.
    pub activation_threshold: f32,
}

impl Default for VadOptions {
    fn default() -> Self {
        Self {
            min_speech_duration: Duration::from_millis(200),
            min_silence_duration: Duration::from_millis(500),
            activation_threshold: 0.5,
        }
    }
}

/// Detector state: either waiting for speech or inside an utterance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Quiet,
    Speaking,
}

/// An energy-threshold voice activity detector.
#[derive(Debug)]
pub struct EnergyVad {
    options: VadOptions,
    state: State,
    speech_run: Duration,
    silence_run: Duration,
}

impl EnergyVad {
    /// Validates the options and builds a detector.
    pub fn load(options: VadOptions) -> Result<Self, AgentError> {
        if !(0.0..=1.0).contains(&options.activation_threshold) {
            return Err(AgentError::Vad(format!(
                "activation threshold {} is outside [0.0, 1.0]",
                options.activation_threshold
            )));
        }
        if options.min_speech_duration.is_zero() || options.min_silence_duration.is_zero() {
            return Err(AgentError::Vad(
                "speech and silence durations must be non-zero".to_string(),
            ));
        }
        Ok(Self {
            options,
            state: State::Quiet,
            speech_run: Duration::ZERO,
            silence_run: Duration::ZERO,
        })
    }

    /// Normalized RMS energy of a frame, in [0.0, 1.0].
    fn energy(frame: &AudioFrame) -> f32 {
        let samples = frame.samples_f32();
        if samples.is_empty() {
            return 0.0;
        }
        let sum_sq: f32 = samples.iter().map(|s| s * s).sum();
        (sum_sq / samples.len() as f32).sqrt()
    }
}

impl Vad for EnergyVad {
    fn process(&mut self, frame: &AudioFrame) -> Option<VadEvent> {
        let active = Self::energy(frame) >= self.options.activation_threshold;
        match self.state {
            State::Quiet => {
                if active {
                    self.speech_run += frame.duration();
                    if self.speech_run >= self.options.min_speech_duration {
                        self.state = State::Speaking;
                        self.silence_run = Duration::ZERO;
                        debug!(run = ?self.speech_run, "speech committed");
                        return Some(VadEvent::SpeechStart);
                    }
                } else {
                    self.speech_run = Duration::ZERO;
                }
                None
            }
            State::Speaking => {
                if active {
                    self.silence_run = Duration::ZERO;
                } else {
                    self.silence_run += frame.duration();
                    if self.silence_run >= self.options.min_silence_duration {
                        self.state = State::Quiet;
                        self.speech_run = Duration::ZERO;
                        debug!(run = ?self.silence_run, "utterance ended");
                        return Some(VadEvent::SpeechEnd);
                    }
                }
                None
            }
        }
    }

    fn reset(&mut self) {
        self.state = State::Quiet;
        self.speech_run = Duration::ZERO;
        self.silence_run = Duration::ZERO;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rooftops_agents::ROOM_SAMPLE_RATE;

    // 100 ms of audio per frame at the room rate.
    const FRAME_SAMPLES: usize = 2_400;

    fn loud_frame() -> AudioFrame {
        AudioFrame::from_samples(&[i16::MAX / 2; FRAME_SAMPLES], ROOM_SAMPLE_RATE)
    }

    fn quiet_frame() -> AudioFrame {
        AudioFrame::from_samples(&[0i16; FRAME_SAMPLES], ROOM_SAMPLE_RATE)
    }

    fn vad() -> EnergyVad {
        EnergyVad::load(VadOptions {
            min_speech_duration: Duration::from_millis(200),
            min_silence_duration: Duration::from_millis(500),
            activation_threshold: 0.3,
        })
        .unwrap()
    }

    #[test]
    fn silence_produces_no_events() {
        let mut vad = vad();
        for _ in 0..50 {
            assert_eq!(vad.process(&quiet_frame()), None);
        }
    }

    #[test]
    fn speech_starts_only_after_min_duration() {
        let mut vad = vad();
        // First 100 ms frame is below the 200 ms minimum.
        assert_eq!(vad.process(&loud_frame()), None);
        assert_eq!(vad.process(&loud_frame()), Some(VadEvent::SpeechStart));
    }

    #[test]
    fn brief_blip_is_ignored() {
        let mut vad = vad();
        assert_eq!(vad.process(&loud_frame()), None);
        assert_eq!(vad.process(&quiet_frame()), None);
        // The run was reset, so another single loud frame does not commit.
        assert_eq!(vad.process(&loud_frame()), None);
    }

    #[test]
    fn utterance_ends_only_after_min_silence() {
        let mut vad = vad();
        vad.process(&loud_frame());
        assert_eq!(vad.process(&loud_frame()), Some(VadEvent::SpeechStart));

        // 400 ms of quiet is below the 500 ms minimum.
        for _ in 0..4 {
            assert_eq!(vad.process(&quiet_frame()), None);
        }
        assert_eq!(vad.process(&quiet_frame()), Some(VadEvent::SpeechEnd));
    }

    #[test]
    fn pause_mid_utterance_does_not_end_it() {
        let mut vad = vad();
        vad.process(&loud_frame());
        vad.process(&loud_frame());

        for _ in 0..3 {
            assert_eq!(vad.process(&quiet_frame()), None);
        }
        // Speech resumes, clearing the silence run.
        assert_eq!(vad.process(&loud_frame()), None);
        for _ in 0..4 {
            assert_eq!(vad.process(&quiet_frame()), None);
        }
        assert_eq!(vad.process(&quiet_frame()), Some(VadEvent::SpeechEnd));
    }

    #[test]
    fn reset_returns_to_quiet() {
        let mut vad = vad();
        vad.process(&loud_frame());
        vad.process(&loud_frame());
        vad.reset();
        assert_eq!(vad.process(&quiet_frame()), None);
        assert_eq!(vad.process(&loud_frame()), None);
    }

    #[test]
    fn load_rejects_out_of_range_threshold() {
        let err = EnergyVad::load(VadOptions {
            activation_threshold: 1.5,
            ..VadOptions::default()
        })
        .unwrap_err();
        assert!(matches!(err, AgentError::Vad(_)));
    }

    #[test]
    fn load_rejects_zero_durations() {
        let err = EnergyVad::load(VadOptions {
            min_speech_duration: Duration::ZERO,
            ..VadOptions::default()
        })
        .unwrap_err();
        assert!(matches!(err, AgentError::Vad(_)));
    }
}
