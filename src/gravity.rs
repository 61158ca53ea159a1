use std::collections::VecDeque;
use std::time::{Duration, Instant};

use crate::game::{Game, GameEvent, TickOutcome};

pub const DEFAULT_GRAVITY_INTERVAL: Duration = Duration::from_millis(500);

// ============================================================================
// Gravity Timer
// ============================================================================

/// Fixed-interval source of gravity ticks. Time is passed in by the caller so
/// the timer can be driven by a real clock or by a test.
#[derive(Clone, Copy, Debug)]
pub struct GravityTimer {
    interval: Duration,
    next_due: Option<Instant>,
}

impl GravityTimer {
    /// A stopped timer.
    pub fn new(interval: Duration) -> Self {
        assert!(!interval.is_zero(), "gravity interval must be non-zero");
        Self {
            interval,
            next_due: None,
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_running(&self) -> bool {
        self.next_due.is_some()
    }

    /// Starts the timer with a full interval before the first tick. Has no
    /// effect on a running timer.
    pub fn start(&mut self, now: Instant) {
        if self.next_due.is_none() {
            self.next_due = Some(now + self.interval);
        }
    }

    pub fn stop(&mut self) {
        self.next_due = None;
    }

    /// Returns true when a tick is due and schedules the next one a full
    /// interval after `now`. Missed ticks are not replayed.
    pub fn poll(&mut self, now: Instant) -> bool {
        match self.next_due {
            Some(due) if now >= due => {
                self.next_due = Some(now + self.interval);
                true
            }
            _ => false,
        }
    }

    /// Time left before the next tick, or `None` while stopped.
    pub fn time_until_due(&self, now: Instant) -> Option<Duration> {
        self.next_due
            .map(|due| due.checked_duration_since(now).unwrap_or(Duration::ZERO))
    }
}

// ============================================================================
// Game Loop
// ============================================================================

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Command {
    MoveLeft,
    MoveRight,
    Rotate,
    HardDrop,
    Tick,
}

/// Serializes player commands and gravity ticks onto the single game state.
///
/// Commands are queued with [`GameLoop::submit`] and applied in order by
/// [`GameLoop::pump`]. Gravity is suspended for the whole of a hard drop and
/// of any lock-and-clear; when it resumes the next tick is a full interval
/// away.
pub struct GameLoop {
    game: Game,
    timer: GravityTimer,
    queue: VecDeque<Command>,
}

impl GameLoop {
    pub fn new(game: Game, interval: Duration) -> Self {
        Self {
            game,
            timer: GravityTimer::new(interval),
            queue: VecDeque::new(),
        }
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn game_mut(&mut self) -> &mut Game {
        &mut self.game
    }

    pub fn timer(&self) -> &GravityTimer {
        &self.timer
    }

    pub fn is_running(&self) -> bool {
        self.timer.is_running()
    }

    /// Starts (or resumes) gravity.
    pub fn start(&mut self, now: Instant) {
        self.timer.start(now);
    }

    /// Pauses gravity. Queued commands still apply on the next pump.
    pub fn stop(&mut self) {
        self.timer.stop();
    }

    pub fn submit(&mut self, command: Command) {
        self.queue.push_back(command);
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    pub fn time_until_tick(&self, now: Instant) -> Option<Duration> {
        self.timer.time_until_due(now)
    }

    /// Applies queued commands, then a gravity tick if one is due. Returns the
    /// number of commands applied, ticks included.
    ///
    /// The timer is polled only once the queue is empty, so a hard drop or lock
    /// earlier in the same pump has already pushed the next tick back.
    pub fn pump(&mut self, now: Instant) -> usize {
        let mut applied = 0;
        while let Some(command) = self.queue.pop_front() {
            self.apply(command, now);
            applied += 1;
        }

        if self.timer.poll(now) {
            self.apply(Command::Tick, now);
            applied += 1;
        }
        applied
    }

    /// Full reset of the game; gravity restarts from `now` if it was running.
    pub fn reset(&mut self, now: Instant) {
        self.queue.clear();
        self.game.reset();
        if self.timer.is_running() {
            self.timer.stop();
            self.timer.start(now);
        }
    }

    pub fn take_events(&mut self) -> Vec<GameEvent> {
        self.game.take_events()
    }

    fn apply(&mut self, command: Command, now: Instant) {
        match command {
            Command::MoveLeft => {
                self.game.move_left();
            }
            Command::MoveRight => {
                self.game.move_right();
            }
            Command::Rotate => {
                self.game.rotate();
            }
            Command::HardDrop => {
                let was_running = self.suspend_gravity();
                self.game.hard_drop();
                self.resume_gravity(was_running, now);
            }
            Command::Tick => {
                let cadence = self.timer;
                let was_running = self.suspend_gravity();
                match self.game.tick() {
                    TickOutcome::Locked(_) => self.resume_gravity(was_running, now),
                    // Plain fall or no piece: keep the cadence set by the poll.
                    TickOutcome::Fell | TickOutcome::Idle => self.timer = cadence,
                }
            }
        }
    }

    fn suspend_gravity(&mut self) -> bool {
        let was_running = self.timer.is_running();
        self.timer.stop();
        was_running
    }

    fn resume_gravity(&mut self, was_running: bool, now: Instant) {
        if was_running {
            self.timer.start(now);
        }
    }
}
