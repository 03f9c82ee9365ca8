use crate::audio::AudioFrame;

/// Transition emitted by a voice-activity detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VadEvent {
    /// The detector has committed to speech being present.
    SpeechStart,
    /// The speaker has gone quiet for long enough to end the utterance.
    SpeechEnd,
}

/// A voice-activity detector: segments a stream of audio frames into
/// utterances. Detectors are stateful and owned by a single session pipeline.
#[cfg_attr(test, mockall::automock)]
pub trait Vad: Send {
    /// Feeds one frame to the detector, returning a transition if this frame
    /// crossed a speech/silence boundary.
    fn process(&mut self, frame: &AudioFrame) -> Option<VadEvent>;

    /// Clears accumulated state, returning the detector to silence.
    fn reset(&mut self);
}
