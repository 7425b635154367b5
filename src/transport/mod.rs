/// Transport - the shared beat counter and audio fan-out
use std::time::Duration;

pub mod clock;

use crate::rhythm::{Body, RhythmConfig};
use clock::TickClock;

const MIN_BPM: u32 = 40;
const MAX_BPM: u32 = 240;

/// One note due on the current beat. Emitted at most once per body per beat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoteTrigger {
    pub body: Body,
    pub pitch: &'static str,
}

/// Two-state transport: Stopped (initial) and Running. Owns its tick clock,
/// the wrapping beat counter, the tempo, and the mute flag.
///
/// Pausing stops the clock but preserves the beat; the next play resumes
/// from the preserved phase.
pub struct Transport {
    config: RhythmConfig,
    clock: TickClock,
    current_beat: usize,
    tempo_bpm: u32,
    is_playing: bool,
    muted: bool,
}

impl Transport {
    pub fn new(config: RhythmConfig) -> Self {
        Self {
            config,
            clock: TickClock::new(),
            current_beat: 0,
            tempo_bpm: 120,
            is_playing: false,
            muted: false,
        }
    }

    pub fn config(&self) -> &RhythmConfig {
        &self.config
    }

    pub fn current_beat(&self) -> usize {
        self.current_beat
    }

    pub fn tempo_bpm(&self) -> u32 {
        self.tempo_bpm
    }

    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn toggle_mute(&mut self) {
        self.muted = !self.muted;
    }

    /// Interval between ticks at the stored tempo: sixteenth notes, i.e.
    /// 60 / bpm / 4 seconds.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs_f32(60.0 / self.tempo_bpm as f32 / 4.0)
    }

    /// Clamp and store the tempo. While Running the clock restarts at the
    /// new interval; the beat counter is untouched either way.
    pub fn set_tempo(&mut self, bpm: u32) {
        self.tempo_bpm = bpm.clamp(MIN_BPM, MAX_BPM);
        if self.is_playing {
            self.clock.stop();
            self.clock.start(self.tick_interval());
        }
    }

    pub fn play(&mut self) {
        if self.is_playing {
            return;
        }
        self.is_playing = true;
        self.clock.start(self.tick_interval());
        log::debug!(
            "transport running at {} bpm, beat {}",
            self.tempo_bpm,
            self.current_beat
        );
    }

    pub fn pause(&mut self) {
        if !self.is_playing {
            return;
        }
        self.is_playing = false;
        self.clock.stop();
        log::debug!("transport stopped at beat {}", self.current_beat);
    }

    pub fn toggle_play(&mut self) {
        if self.is_playing {
            self.pause();
        } else {
            self.play();
        }
    }

    /// Drain elapsed ticks, advancing the beat once per tick and collecting
    /// the notes due on each beat reached. Muting suppresses the triggers
    /// but never the beat advance.
    pub fn poll(&mut self) -> Vec<NoteTrigger> {
        let mut triggers = Vec::new();
        for _ in 0..self.clock.poll_ticks() {
            self.advance_beat();
            if self.is_playing && !self.muted {
                triggers.extend(self.due_triggers());
            }
        }
        triggers
    }

    fn advance_beat(&mut self) {
        self.current_beat = (self.current_beat + 1) % self.config.cycle_length;
    }

    /// Every body with an assigned pitch whose ratio divides the current
    /// beat. Beat 0 is due for all of them.
    fn due_triggers(&self) -> impl Iterator<Item = NoteTrigger> + '_ {
        Body::ALL.into_iter().filter_map(move |body| {
            let pitch = body.pitch()?;
            if self.current_beat % self.config.ratio(body) as usize == 0 {
                Some(NoteTrigger { body, pitch })
            } else {
                None
            }
        })
    }
}

impl Drop for Transport {
    fn drop(&mut self) {
        self.clock.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stopped_transport() -> Transport {
        Transport::new(RhythmConfig::simplified())
    }

    #[test]
    fn test_initial_state() {
        let transport = stopped_transport();
        assert!(!transport.is_playing());
        assert!(!transport.is_muted());
        assert_eq!(transport.current_beat(), 0);
        assert_eq!(transport.tempo_bpm(), 120);
    }

    #[test]
    fn test_beat_wraps_after_full_cycle() {
        let mut transport = stopped_transport();
        let cycle = transport.config().cycle_length;
        for _ in 0..cycle {
            transport.advance_beat();
        }
        assert_eq!(transport.current_beat(), 0);
    }

    #[test]
    fn test_tempo_clamped_to_range() {
        let mut transport = stopped_transport();
        transport.set_tempo(10);
        assert_eq!(transport.tempo_bpm(), 40);
        transport.set_tempo(999);
        assert_eq!(transport.tempo_bpm(), 240);
    }

    #[test]
    fn test_tick_interval_halves_when_tempo_doubles() {
        let mut transport = stopped_transport();
        transport.set_tempo(120);
        let at_120 = transport.tick_interval();
        transport.set_tempo(240);
        let at_240 = transport.tick_interval();
        assert_eq!(at_120, Duration::from_millis(125));
        assert_eq!(at_240.as_secs_f64(), at_120.as_secs_f64() / 2.0);
    }

    #[test]
    fn test_tempo_change_preserves_beat() {
        let mut transport = stopped_transport();
        for _ in 0..5 {
            transport.advance_beat();
        }
        transport.play();
        transport.set_tempo(200);
        assert_eq!(transport.current_beat(), 5);
        transport.pause();
    }

    #[test]
    fn test_pause_preserves_phase_and_interval() {
        let mut transport = stopped_transport();
        for _ in 0..7 {
            transport.advance_beat();
        }

        transport.play();
        let first_interval = transport.tick_interval();
        transport.pause();
        assert_eq!(transport.current_beat(), 7);

        transport.play();
        assert_eq!(transport.tick_interval(), first_interval);
        assert_eq!(transport.current_beat(), 7);
        transport.pause();
    }

    #[test]
    fn test_beat_zero_triggers_all_pitched_bodies() {
        let transport = stopped_transport();
        let triggers: Vec<NoteTrigger> = transport.due_triggers().collect();
        // Every body except pitchless Pluto fires on beat 0
        assert_eq!(triggers.len(), 8);
        assert!(triggers.iter().all(|t| t.body != Body::Pluto));
    }

    #[test]
    fn test_triggers_follow_ratios() {
        let mut transport = stopped_transport();
        transport.advance_beat();
        transport.advance_beat();
        transport.advance_beat();
        // Beat 3: Mercury (ratio 1) and Venus (ratio 3) are due
        let bodies: Vec<Body> = transport.due_triggers().map(|t| t.body).collect();
        assert_eq!(bodies, vec![Body::Mercury, Body::Venus]);
    }

    #[test]
    fn test_mute_suppresses_triggers_not_beats() {
        let mut transport = stopped_transport();
        transport.toggle_mute();
        transport.is_playing = true;

        // Simulate what poll does for one tick while muted
        transport.advance_beat();
        let triggers = if transport.is_playing && !transport.is_muted() {
            transport.due_triggers().count()
        } else {
            0
        };
        assert_eq!(triggers, 0);
        assert_eq!(transport.current_beat(), 1);
    }

    #[test]
    fn test_poll_without_ticks_is_empty() {
        let mut transport = stopped_transport();
        assert!(transport.poll().is_empty());
        assert_eq!(transport.current_beat(), 0);
    }
}
