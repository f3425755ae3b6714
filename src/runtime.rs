//! Terminal input pump and frame pacing for the game loop.
//!
//! Frames are deadline driven: keys queued before a frame's deadline are handed
//! out first, and the frame fires once the deadline passes however much input
//! is still arriving.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyEvent};
use log::{debug, warn};

const MIN_FRAME_INTERVAL: Duration = Duration::from_millis(1);

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GameEvent {
    Key(KeyEvent),
    Resize,
    /// The frame deadline passed; advance the game once and redraw.
    Tick,
}

/// Anything that can hand the loop its pending input.
pub trait EventSource: Send + 'static {
    /// Waits at most `timeout` for the next queued event.
    fn recv_timeout(&self, timeout: Duration) -> Result<GameEvent, RecvTimeoutError>;
}

/// Reads crossterm events on a background thread.
pub struct TerminalEvents {
    rx: Receiver<GameEvent>,
}

impl TerminalEvents {
    pub fn spawn() -> Self {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || loop {
            let forwarded = match event::read() {
                Ok(Event::Key(key)) => GameEvent::Key(key),
                Ok(Event::Resize(..)) => GameEvent::Resize,
                Ok(_) => continue,
                Err(e) => {
                    warn!("terminal input stopped: {e}");
                    break;
                }
            };
            if tx.send(forwarded).is_err() {
                break;
            }
        });
        Self { rx }
    }
}

impl EventSource for TerminalEvents {
    fn recv_timeout(&self, timeout: Duration) -> Result<GameEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Events pushed through a channel by a test or a script.
pub struct ChannelEvents {
    rx: Receiver<GameEvent>,
}

impl ChannelEvents {
    pub fn new(rx: Receiver<GameEvent>) -> Self {
        Self { rx }
    }
}

impl EventSource for ChannelEvents {
    fn recv_timeout(&self, timeout: Duration) -> Result<GameEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Interleaves input with frames on a fixed cadence.
pub struct FrameLoop<E: EventSource> {
    events: E,
    interval: Duration,
    next_frame: Instant,
}

impl<E: EventSource> FrameLoop<E> {
    pub fn new(events: E, interval: Duration) -> Self {
        let interval = interval.max(MIN_FRAME_INTERVAL);
        Self {
            events,
            interval,
            next_frame: Instant::now() + interval,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Next queued event, or `Tick` as soon as the current frame is due.
    pub fn next_event(&mut self) -> GameEvent {
        loop {
            let now = Instant::now();
            let wait = self.next_frame.saturating_duration_since(now);
            if wait.is_zero() {
                self.schedule_after(now);
                return GameEvent::Tick;
            }
            match self.events.recv_timeout(wait) {
                Ok(event) => return event,
                Err(RecvTimeoutError::Timeout) => {}
                // no more input will come, frames keep their cadence
                Err(RecvTimeoutError::Disconnected) => thread::sleep(wait),
            }
        }
    }

    fn schedule_after(&mut self, now: Instant) {
        self.next_frame += self.interval;
        if self.next_frame <= now {
            debug!("frame loop fell behind by {:?}", now - self.next_frame);
            self.next_frame = now + self.interval;
        }
    }
}

/// Measures wall time between frames.
#[derive(Debug)]
pub struct FrameClock {
    last: Instant,
    max_step: Duration,
}

impl FrameClock {
    /// `max_step` caps a single frame so a stalled terminal does not teleport words.
    pub fn new(max_step: Duration) -> Self {
        Self {
            last: Instant::now(),
            max_step,
        }
    }

    /// Seconds since the previous call.
    pub fn tick(&mut self) -> f64 {
        let now = Instant::now();
        let dt = now.duration_since(self.last).min(self.max_step);
        self.last = now;
        dt.as_secs_f64()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use crossterm::event::{KeyCode, KeyModifiers};

    fn key(c: char) -> GameEvent {
        GameEvent::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE))
    }

    #[test]
    fn idle_input_still_ticks() {
        let (_tx, rx) = mpsc::channel();
        let mut frames = FrameLoop::new(ChannelEvents::new(rx), Duration::from_millis(2));
        let started = Instant::now();

        assert_eq!(frames.next_event(), GameEvent::Tick);
        assert_eq!(frames.next_event(), GameEvent::Tick);
        assert!(started.elapsed() >= Duration::from_millis(4));
    }

    #[test]
    fn queued_input_comes_before_the_frame() {
        let (tx, rx) = mpsc::channel();
        tx.send(GameEvent::Resize).unwrap();
        tx.send(key('a')).unwrap();
        let mut frames = FrameLoop::new(ChannelEvents::new(rx), Duration::from_millis(200));

        assert_eq!(frames.next_event(), GameEvent::Resize);
        assert_eq!(frames.next_event(), key('a'));
        assert_eq!(frames.next_event(), GameEvent::Tick);
    }

    #[test]
    fn due_frame_fires_ahead_of_pending_keys() {
        let (tx, rx) = mpsc::channel();
        let mut frames = FrameLoop::new(ChannelEvents::new(rx), Duration::from_millis(5));
        thread::sleep(Duration::from_millis(10));
        tx.send(key('x')).unwrap();

        assert_eq!(frames.next_event(), GameEvent::Tick);
        assert_eq!(frames.next_event(), key('x'));
    }

    #[test]
    fn stalled_loop_does_not_replay_missed_frames() {
        let (tx, rx) = mpsc::channel();
        let mut frames = FrameLoop::new(ChannelEvents::new(rx), Duration::from_millis(5));
        thread::sleep(Duration::from_millis(50));
        tx.send(key('x')).unwrap();
        tx.send(key('y')).unwrap();

        assert_eq!(frames.next_event(), GameEvent::Tick);
        assert_eq!(frames.next_event(), key('x'));
        assert_eq!(frames.next_event(), key('y'));
    }

    #[test]
    fn interval_has_a_floor() {
        let (_tx, rx) = mpsc::channel();
        let frames = FrameLoop::new(ChannelEvents::new(rx), Duration::ZERO);
        assert_eq!(frames.interval(), MIN_FRAME_INTERVAL);
    }

    #[test]
    fn disconnected_source_keeps_ticking() {
        let (tx, rx) = mpsc::channel::<GameEvent>();
        drop(tx);
        let mut frames = FrameLoop::new(ChannelEvents::new(rx), Duration::from_millis(1));
        for _ in 0..3 {
            assert_matches!(frames.next_event(), GameEvent::Tick);
        }
    }

    #[test]
    fn frame_clock_is_capped() {
        let mut clock = FrameClock::new(Duration::from_millis(5));
        thread::sleep(Duration::from_millis(20));
        let dt = clock.tick();
        assert!(dt <= 0.005 + f64::EPSILON);
        assert!(dt > 0.0);

        let second = clock.tick();
        assert!(second <= 0.005 + f64::EPSILON);
    }
}
