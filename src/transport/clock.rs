/// Tick clock - per-instance timer thread feeding the transport
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
pub enum ClockEvent {
    Tick,
}

/// Emits one `ClockEvent::Tick` per interval on a background thread.
///
/// The run flag and channel are owned by this value, so each transport
/// instance carries its own clock and stopping one cannot affect another.
/// Every `start` hands the spawned thread its own flag; a stop followed by
/// an immediate restart (tempo change) cannot revive the old thread.
pub struct TickClock {
    sender: Sender<ClockEvent>,
    receiver: Receiver<ClockEvent>,
    run_flag: Option<Arc<Mutex<bool>>>,
}

impl TickClock {
    pub fn new() -> Self {
        let (sender, receiver) = channel();

        Self {
            sender,
            receiver,
            run_flag: None,
        }
    }

    pub fn start(&mut self, tick_interval: Duration) {
        if self.run_flag.is_some() {
            return;
        }

        let run_flag = Arc::new(Mutex::new(true));
        self.run_flag = Some(Arc::clone(&run_flag));
        let sender = self.sender.clone();

        thread::spawn(move || {
            let mut last_tick_time = Instant::now();

            while *run_flag.lock().unwrap() {
                let now = Instant::now();

                if now.duration_since(last_tick_time) >= tick_interval {
                    let _ = sender.send(ClockEvent::Tick);
                    last_tick_time = now;
                }

                thread::sleep(Duration::from_millis(1));
            }
        });
    }

    pub fn stop(&mut self) {
        if let Some(run_flag) = self.run_flag.take() {
            *run_flag.lock().unwrap() = false;
        }
    }

    pub fn is_running(&self) -> bool {
        self.run_flag.is_some()
    }

    /// Drain pending ticks without blocking. Returns how many elapsed since
    /// the last poll.
    pub fn poll_ticks(&self) -> usize {
        let mut ticks = 0;
        while let Ok(ClockEvent::Tick) = self.receiver.try_recv() {
            ticks += 1;
        }
        ticks
    }
}

impl Default for TickClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for TickClock {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_starts_and_stops() {
        let mut clock = TickClock::new();
        assert!(!clock.is_running());

        clock.start(Duration::from_millis(10));
        assert!(clock.is_running());

        clock.stop();
        assert!(!clock.is_running());
    }

    #[test]
    fn test_clock_emits_ticks() {
        let mut clock = TickClock::new();
        clock.start(Duration::from_millis(5));
        thread::sleep(Duration::from_millis(60));
        clock.stop();

        assert!(clock.poll_ticks() > 0);
    }

    #[test]
    fn test_restart_does_not_revive_old_thread() {
        let mut clock = TickClock::new();
        clock.start(Duration::from_millis(5));
        clock.stop();
        clock.start(Duration::from_millis(5));
        assert!(clock.is_running());
        clock.stop();
    }

    #[test]
    fn test_poll_on_idle_clock_is_empty() {
        let clock = TickClock::new();
        assert_eq!(clock.poll_ticks(), 0);
    }
}
