use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CtEvent, KeyEvent, KeyEventKind};

/// Unified event type consumed by the game loop. Ticks and input arrive
/// serialized through one consumer, so session state is never mutated
/// concurrently.
#[derive(Clone, Debug)]
pub enum GameEvent {
    Key(KeyEvent),
    Resize,
    Tick,
}

/// Source of terminal input events. The tick schedule is not an event
/// source; the runner owns it.
pub trait GameEventSource: Send + 'static {
    /// Block for up to `timeout` waiting for an input event.
    fn recv_timeout(&self, timeout: Duration) -> Result<GameEvent, RecvTimeoutError>;
}

/// Production event source backed by a crossterm reader thread. Only key
/// presses are forwarded; repeat and release events would double letters
/// in the typed line on terminals that report them.
pub struct CrosstermEventSource {
    rx: Receiver<GameEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            match event::read() {
                Ok(CtEvent::Key(key)) if key.kind == KeyEventKind::Press => {
                    if tx.send(GameEvent::Key(key)).is_err() {
                        break;
                    }
                }
                Ok(CtEvent::Resize(_, _)) => {
                    if tx.send(GameEvent::Resize).is_err() {
                        break;
                    }
                }
                Ok(_) => {}
                Err(_) => break,
            }
        });

        Self { rx }
    }
}

impl Default for CrosstermEventSource {
    fn default() -> Self {
        Self::new()
    }
}

impl GameEventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<GameEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Channel-fed event source for unit and headless tests.
pub struct TestEventSource {
    rx: Receiver<GameEvent>,
}

impl TestEventSource {
    pub fn new(rx: Receiver<GameEvent>) -> Self {
        Self { rx }
    }
}

impl GameEventSource for TestEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<GameEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Advances the game one event at a time, keeping the movement tick on a
/// fixed deadline schedule. Each `step` waits only until the next tick
/// deadline, so a sustained burst of keystrokes cannot delay falling
/// words: input is delivered between ticks, never instead of them.
///
/// The session multiplexes its spawn countdown onto the same tick, so
/// dropping the runner stops both schedules with no dangling timer.
pub struct Runner<E: GameEventSource> {
    event_source: E,
    interval: Duration,
    next_tick: Instant,
}

impl<E: GameEventSource> Runner<E> {
    pub fn new(event_source: E, interval: Duration) -> Self {
        Self {
            event_source,
            interval,
            next_tick: Instant::now() + interval,
        }
    }

    /// Next input event, or `Tick` once the tick deadline passes.
    pub fn step(&mut self) -> GameEvent {
        let now = Instant::now();
        if now >= self.next_tick {
            return self.emit_tick(now);
        }
        match self.event_source.recv_timeout(self.next_tick - now) {
            Ok(ev) => ev,
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => {
                self.emit_tick(Instant::now())
            }
        }
    }

    fn emit_tick(&mut self, now: Instant) -> GameEvent {
        self.next_tick += self.interval;
        // After a stall (suspend, slow redraw) resume the cadence from now
        // instead of bursting catch-up ticks, which would teleport words.
        if self.next_tick < now {
            self.next_tick = now + self.interval;
        }
        GameEvent::Tick
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::thread;

    fn runner(interval_ms: u64) -> (mpsc::Sender<GameEvent>, Runner<TestEventSource>) {
        let (tx, rx) = mpsc::channel();
        let r = Runner::new(TestEventSource::new(rx), Duration::from_millis(interval_ms));
        (tx, r)
    }

    #[test]
    fn idle_source_yields_ticks() {
        let (_tx, mut r) = runner(1);
        for _ in 0..3 {
            assert!(matches!(r.step(), GameEvent::Tick));
        }
    }

    #[test]
    fn queued_events_are_delivered_before_the_deadline() {
        let (tx, mut r) = runner(50);
        tx.send(GameEvent::Resize).unwrap();
        let start = Instant::now();
        assert!(matches!(r.step(), GameEvent::Resize));
        assert!(start.elapsed() < Duration::from_millis(50));
    }

    #[test]
    fn key_bursts_do_not_starve_ticks() {
        let (tx, mut r) = runner(10);

        // Producer hammers the channel faster than the tick interval for
        // roughly ten tick periods
        let producer = thread::spawn(move || {
            for _ in 0..50 {
                let key = KeyEvent::new(
                    crossterm::event::KeyCode::Char('a'),
                    crossterm::event::KeyModifiers::NONE,
                );
                if tx.send(GameEvent::Key(key)).is_err() {
                    break;
                }
                thread::sleep(Duration::from_millis(2));
            }
        });

        let deadline = Instant::now() + Duration::from_millis(100);
        let mut ticks = 0u32;
        while Instant::now() < deadline {
            if let GameEvent::Tick = r.step() {
                ticks += 1;
            }
        }
        producer.join().unwrap();

        // A timeout that reset on every keystroke would never fire here
        assert!(ticks >= 3, "only {ticks} ticks during the key burst");
    }

    #[test]
    fn stall_produces_one_tick_not_a_burst() {
        let (_tx, mut r) = runner(10);
        thread::sleep(Duration::from_millis(60));

        // The overdue tick is delivered immediately
        let start = Instant::now();
        assert!(matches!(r.step(), GameEvent::Tick));
        assert!(start.elapsed() < Duration::from_millis(5));

        // The next one waits a full interval again
        let start = Instant::now();
        assert!(matches!(r.step(), GameEvent::Tick));
        assert!(start.elapsed() >= Duration::from_millis(5));
    }
}
