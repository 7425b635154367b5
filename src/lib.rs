/// SOLSEQ - Orbital polyrhythm sequencer library
///
/// This library provides the core components for sonifying planetary
/// orbital periods as a polyrhythmic sequencer:
/// - Rhythm model: per-body ratios, pitches, colors and activation patterns
/// - Transport: beat clock, tempo and audio fan-out
/// - Audio output for triggering tones

pub mod audio;
pub mod rhythm;
pub mod transport;

// Re-export commonly used types
pub use audio::{note_frequency, ToneOutput};
pub use rhythm::{generate_pattern, Body, RatioPolicy, RhythmConfig};
pub use transport::{NoteTrigger, Transport};
