use std::cell::Cell;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CtEvent, KeyEvent, KeyEventKind};

/// The clock advances once per second
pub const TICK_RATE: Duration = Duration::from_secs(1);

/// Unified event type consumed by the app runner
#[derive(Clone, Debug)]
pub enum GameEvent {
    Key(KeyEvent),
    Resize,
    Tick,
    /// the input source is gone; no further keys can arrive
    Closed,
}

/// Source of terminal events (keyboard, resize, etc.)
pub trait GameEventSource: Send + 'static {
    /// Block for up to `timeout` waiting for an event.
    /// Returns Ok(event) if an event arrives before the timeout, or Err(Timeout) if it expires.
    fn recv_timeout(&self, timeout: Duration) -> Result<GameEvent, RecvTimeoutError>;
}

/// Production event source using crossterm
pub struct CrosstermEventSource {
    rx: Receiver<GameEvent>,
}

impl CrosstermEventSource {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();

        std::thread::spawn(move || loop {
            let evt = match event::read() {
                // key release/repeat events would double every press on some terminals
                Ok(CtEvent::Key(key)) if key.kind == KeyEventKind::Press => GameEvent::Key(key),
                Ok(CtEvent::Resize(_, _)) => GameEvent::Resize,
                Ok(_) => continue,
                Err(_) => break,
            };
            if tx.send(evt).is_err() {
                break;
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

/// Configurable ticker interface
pub trait Ticker: Send + Sync + 'static {
    fn interval(&self) -> Duration;
}

/// Fixed interval ticker
#[derive(Clone, Copy, Debug)]
pub struct FixedTicker {
    interval: Duration,
}

impl FixedTicker {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl Default for FixedTicker {
    fn default() -> Self {
        Self::new(TICK_RATE)
    }
}

impl Ticker for FixedTicker {
    fn interval(&self) -> Duration {
        self.interval
    }
}

/// Test event source for unit tests
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

/// Runner that advances the application one event/tick at a time.
///
/// Ticks keep a fixed cadence: events arriving between two ticks do not
/// push the next tick back.
pub struct Runner<E: GameEventSource, T: Ticker> {
    event_source: E,
    ticker: T,
    next_tick: Cell<Instant>,
}

impl<E: GameEventSource, T: Ticker> Runner<E, T> {
    pub fn new(event_source: E, ticker: T) -> Self {
        let next_tick = Cell::new(Instant::now() + ticker.interval());
        Self {
            event_source,
            ticker,
            next_tick,
        }
    }

    /// Restart the cadence so the next tick lands one full interval from now.
    /// Called when the clock is restarted for a new turn.
    pub fn resync(&self) {
        self.next_tick.set(Instant::now() + self.ticker.interval());
    }

    /// Blocks until the next tick is due and returns the next event, or Tick.
    /// Returns Closed once the event source has hung up.
    pub fn step(&self) -> GameEvent {
        let timeout = self.next_tick.get().saturating_duration_since(Instant::now());
        match self.event_source.recv_timeout(timeout) {
            Ok(ev) => ev,
            Err(RecvTimeoutError::Timeout) => {
                self.advance();
                GameEvent::Tick
            }
            Err(RecvTimeoutError::Disconnected) => GameEvent::Closed,
        }
    }

    fn advance(&self) {
        let now = Instant::now();
        let next = self.next_tick.get() + self.ticker.interval();
        // after a stall, skip missed ticks rather than bursting them
        self.next_tick
            .set(if next <= now { now + self.ticker.interval() } else { next });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};
    use std::sync::mpsc;

    #[test]
    fn step_returns_tick_on_timeout() {
        let (_tx, rx) = mpsc::channel();
        let es = TestEventSource::new(rx);
        let ticker = FixedTicker::new(Duration::from_millis(1));
        let runner = Runner::new(es, ticker);

        // With no events available, step should yield Tick
        let ev = runner.step();
        match ev {
            GameEvent::Tick => {}
            _ => panic!("expected Tick on timeout"),
        }
    }

    #[test]
    fn step_passes_through_events() {
        let (tx, rx) = mpsc::channel();
        tx.send(GameEvent::Resize).unwrap();
        let es = TestEventSource::new(rx);
        let ticker = FixedTicker::new(Duration::from_millis(10));
        let runner = Runner::new(es, ticker);

        match runner.step() {
            GameEvent::Resize => {}
            _ => panic!("expected Resize event"),
        }
    }

    #[test]
    fn events_do_not_delay_the_tick() {
        let (tx, rx) = mpsc::channel();
        let es = TestEventSource::new(rx);
        let ticker = FixedTicker::new(Duration::from_millis(50));
        let runner = Runner::new(es, ticker);
        let started = Instant::now();

        for _ in 0..5 {
            tx.send(GameEvent::Key(KeyEvent::new(KeyCode::Char(' '), KeyModifiers::NONE)))
                .unwrap();
        }
        let mut keys = 0;
        loop {
            match runner.step() {
                GameEvent::Key(_) => keys += 1,
                GameEvent::Tick => break,
                GameEvent::Resize => {}
                GameEvent::Closed => panic!("sender is still alive"),
            }
        }
        assert_eq!(keys, 5);
        assert!(started.elapsed() < Duration::from_millis(500));
    }

    #[test]
    fn hung_up_source_stops_ticking() {
        let (tx, rx) = mpsc::channel::<GameEvent>();
        drop(tx);
        let runner = Runner::new(TestEventSource::new(rx), FixedTicker::default());
        let started = Instant::now();

        let mut ticks = 0u64;
        for _ in 0..1000 {
            match runner.step() {
                GameEvent::Tick => ticks += 1,
                GameEvent::Closed => {}
                other => panic!("unexpected {:?}", other),
            }
        }
        // never more ticks than whole seconds of wall time
        assert!(ticks <= started.elapsed().as_secs());
        assert!(matches!(runner.step(), GameEvent::Closed));
    }

    #[test]
    fn resync_pushes_first_tick_a_full_interval_out() {
        let (_tx, rx) = mpsc::channel();
        let interval = Duration::from_millis(50);
        let runner = Runner::new(TestEventSource::new(rx), FixedTicker::new(interval));

        // land just before the first deadline, as if a key arrived late in the second
        std::thread::sleep(Duration::from_millis(40));
        runner.resync();
        let resynced = Instant::now();

        match runner.step() {
            GameEvent::Tick => {}
            other => panic!("expected Tick, got {:?}", other),
        }
        assert!(resynced.elapsed() >= interval);
    }

    #[test]
    fn default_ticker_is_one_second() {
        assert_eq!(FixedTicker::default().interval(), Duration::from_secs(1));
    }
}
