/// Audio output using cpal - fixed-duration sine voices mixed in the callback
use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::{anyhow, Context};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};

const GAIN: f32 = 0.15;

struct Voice {
    phase: f32,
    phase_increment: f32,
    remaining_samples: u32,
    total_samples: u32,
}

/// Tone output the transport fans notes into. Stays inactive until
/// `ensure_active` is called from a user-initiated action; while inactive
/// (or if the backend is unavailable) every trigger is a silent no-op.
pub struct ToneOutput {
    stream: Option<cpal::Stream>,
    voices: Arc<Mutex<Vec<Voice>>>,
    sample_rate: f32,
}

impl ToneOutput {
    pub fn new() -> Self {
        Self {
            stream: None,
            voices: Arc::new(Mutex::new(Vec::new())),
            sample_rate: 0.0,
        }
    }

    pub fn is_active(&self) -> bool {
        self.stream.is_some()
    }

    /// Open the output stream if it is not already open. Idempotent; call
    /// from the play gesture. Backend failures degrade to silent operation.
    pub fn ensure_active(&mut self) {
        if self.stream.is_some() {
            return;
        }

        match setup_output_stream(Arc::clone(&self.voices)) {
            Ok((stream, sample_rate)) => {
                self.stream = Some(stream);
                self.sample_rate = sample_rate;
            }
            Err(e) => {
                log::warn!("audio unavailable, running silent: {:#}", e);
            }
        }
    }

    /// Start a short tone at the given note name. Fire-and-forget: an
    /// inactive output or an unparseable pitch drops the note silently.
    pub fn trigger_note(&mut self, pitch: &str, duration: Duration) {
        if self.stream.is_none() {
            return;
        }
        let Some(frequency) = note_frequency(pitch) else {
            return;
        };

        let total_samples = (duration.as_secs_f32() * self.sample_rate).max(1.0) as u32;
        self.voices.lock().unwrap().push(Voice {
            phase: 0.0,
            phase_increment: frequency / self.sample_rate,
            remaining_samples: total_samples,
            total_samples,
        });
    }
}

impl Default for ToneOutput {
    fn default() -> Self {
        Self::new()
    }
}

fn setup_output_stream(voices: Arc<Mutex<Vec<Voice>>>) -> anyhow::Result<(cpal::Stream, f32)> {
    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or_else(|| anyhow!("no default output device"))?;
    let config = device
        .default_output_config()
        .context("querying default output config")?;

    if config.sample_format() != cpal::SampleFormat::F32 {
        return Err(anyhow!(
            "unsupported sample format {:?}",
            config.sample_format()
        ));
    }

    let sample_rate = config.sample_rate().0 as f32;

    let stream = device
        .build_output_stream(
            &config.into(),
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                let mut voices_lock = voices.lock().unwrap();

                for sample in data.iter_mut() {
                    let mut mixed = 0.0;
                    for voice in voices_lock.iter_mut() {
                        // Linear fade-out over the voice lifetime avoids clicks
                        let envelope =
                            voice.remaining_samples as f32 / voice.total_samples as f32;
                        mixed +=
                            (voice.phase * 2.0 * std::f32::consts::PI).sin() * GAIN * envelope;
                        voice.phase += voice.phase_increment;
                        if voice.phase >= 1.0 {
                            voice.phase -= 1.0;
                        }
                        voice.remaining_samples -= 1;
                    }
                    voices_lock.retain(|v| v.remaining_samples > 0);
                    *sample = mixed;
                }
            },
            |err| log::warn!("audio stream error: {}", err),
            None,
        )
        .context("building output stream")?;

    stream.play().context("starting output stream")?;
    Ok((stream, sample_rate))
}

/// Equal-temperament frequency for a note name like "C4", "F#3" or "Bb2".
pub fn note_frequency(pitch: &str) -> Option<f32> {
    let midi_note = note_number(pitch)?;
    Some(440.0 * 2.0_f32.powf((midi_note as f32 - 69.0) / 12.0))
}

fn note_number(pitch: &str) -> Option<i32> {
    let mut chars = pitch.chars();
    let semitone = match chars.next()?.to_ascii_uppercase() {
        'C' => 0,
        'D' => 2,
        'E' => 4,
        'F' => 5,
        'G' => 7,
        'A' => 9,
        'B' => 11,
        _ => return None,
    };

    let rest = chars.as_str();
    let (accidental, octave_str) = match rest.chars().next() {
        Some('#') => (1, &rest[1..]),
        Some('b') => (-1, &rest[1..]),
        _ => (0, rest),
    };

    let octave: i32 = octave_str.parse().ok()?;
    Some((octave + 1) * 12 + semitone + accidental)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_frequency_concert_pitch() {
        assert_eq!(note_frequency("A4"), Some(440.0));
    }

    #[test]
    fn test_note_frequency_middle_c() {
        let freq = note_frequency("C4").unwrap();
        assert!((freq - 261.63).abs() < 0.01);
    }

    #[test]
    fn test_note_number_accidentals() {
        assert_eq!(note_number("F#3"), Some(54));
        assert_eq!(note_number("Bb2"), Some(46));
        assert_eq!(note_number("F#3"), note_number("Gb3"));
    }

    #[test]
    fn test_note_frequency_rejects_garbage() {
        assert_eq!(note_frequency("H2"), None);
        assert_eq!(note_frequency("C"), None);
        assert_eq!(note_frequency(""), None);
        assert_eq!(note_frequency("4C"), None);
    }

    #[test]
    fn test_trigger_before_activation_is_noop() {
        let mut output = ToneOutput::new();
        assert!(!output.is_active());
        output.trigger_note("C4", Duration::from_millis(100));
        assert!(output.voices.lock().unwrap().is_empty());
    }
}
