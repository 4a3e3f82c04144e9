//! Cancellable, clock-driven animation tasks.
//!
//! A task is started with a duration and a payload, sampled for its progress
//! while it runs, and reported exactly once through [`Timeline::advance`]
//! when its duration has elapsed. Cancelled tasks never report. Time comes
//! from a [`Clock`], so tests drive every transition with a [`ManualClock`].

use std::cell::Cell;
use std::time::{Duration, Instant};

/// Monotonic time source, measured from an arbitrary origin.
pub trait Clock {
    fn now(&self) -> Duration;
}

/// Wall-clock time since construction.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> Duration {
        self.origin.elapsed()
    }
}

/// Deterministic clock that only moves when told to.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<Duration>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) -> Duration {
        self.now.set(self.now.get() + by);
        self.now.get()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Duration {
        self.now.get()
    }
}

/// Maps linear progress `t` in [0, 1] to eased progress in [0, 1].
pub type EasingFn = fn(f64) -> f64;

pub fn linear(t: f64) -> f64 {
    t.clamp(0.0, 1.0)
}

/// Cubic ease-in-out (slow start and end).
pub fn ease_cubic_in_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(u64);

#[derive(Debug, Clone)]
struct Task<T> {
    id: TaskId,
    payload: T,
    started_at: Duration,
    duration: Duration,
    easing: EasingFn,
}

impl<T> Task<T> {
    fn raw_progress(&self, now: Duration) -> f64 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_sub(self.started_at);
        (elapsed.as_secs_f64() / self.duration.as_secs_f64()).clamp(0.0, 1.0)
    }

    fn is_due(&self, now: Duration) -> bool {
        now.saturating_sub(self.started_at) >= self.duration
    }
}

/// A finished task, handed back once with the payload it was started with.
#[derive(Debug, Clone, PartialEq)]
pub struct Completed<T> {
    pub id: TaskId,
    pub payload: T,
}

/// The set of running tasks.
#[derive(Debug, Clone)]
pub struct Timeline<T> {
    next_id: u64,
    tasks: Vec<Task<T>>,
}

impl<T> Default for Timeline<T> {
    fn default() -> Self {
        Self {
            next_id: 0,
            tasks: Vec::new(),
        }
    }
}

impl<T> Timeline<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn start(&mut self, payload: T, duration: Duration, easing: EasingFn, now: Duration) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.tasks.push(Task {
            id,
            payload,
            started_at: now,
            duration,
            easing,
        });
        id
    }

    /// Drop a running task; it will never complete. Returns false if it was not running.
    pub fn cancel(&mut self, id: TaskId) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|task| task.id != id);
        self.tasks.len() != before
    }

    pub fn is_idle(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Eased progress of a running task, or `None` if it is not running.
    pub fn progress(&self, id: TaskId, now: Duration) -> Option<f64> {
        self.tasks
            .iter()
            .find(|task| task.id == id)
            .map(|task| (task.easing)(task.raw_progress(now)))
    }

    /// Remove and report every task whose duration has elapsed, in start order.
    pub fn advance(&mut self, now: Duration) -> Vec<Completed<T>> {
        let mut done = Vec::new();
        let mut i = 0;
        while i < self.tasks.len() {
            if self.tasks[i].is_due(now) {
                let task = self.tasks.remove(i);
                done.push(Completed {
                    id: task.id,
                    payload: task.payload,
                });
            } else {
                i += 1;
            }
        }
        done
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(v: u64) -> Duration {
        Duration::from_millis(v)
    }

    #[test]
    fn completes_once_after_duration() {
        let clock = ManualClock::new();
        let mut timeline = Timeline::new();
        let id = timeline.start("fade", ms(1000), linear, clock.now());

        clock.advance(ms(400));
        assert!((timeline.progress(id, clock.now()).unwrap() - 0.4).abs() < 1e-9);
        assert!(timeline.advance(clock.now()).is_empty());

        clock.advance(ms(600));
        let done = timeline.advance(clock.now());
        assert_eq!(done, vec![Completed { id, payload: "fade" }]);
        assert!(timeline.advance(clock.now() + ms(10)).is_empty());
        assert!(timeline.is_idle());
    }

    #[test]
    fn cancelled_task_never_completes() {
        let clock = ManualClock::new();
        let mut timeline = Timeline::new();
        let id = timeline.start((), ms(10), linear, clock.now());
        assert!(timeline.cancel(id));
        assert!(!timeline.cancel(id));
        clock.advance(ms(50));
        assert!(timeline.advance(clock.now()).is_empty());
        assert_eq!(timeline.progress(id, clock.now()), None);
    }

    #[test]
    fn zero_duration_completes_on_next_advance() {
        let mut timeline = Timeline::new();
        let id = timeline.start(7, Duration::ZERO, linear, ms(5));
        assert_eq!(timeline.progress(id, ms(5)), Some(1.0));
        assert_eq!(timeline.advance(ms(5)).len(), 1);
    }

    #[test]
    fn cubic_easing_is_symmetric() {
        assert_eq!(ease_cubic_in_out(0.0), 0.0);
        assert_eq!(ease_cubic_in_out(1.0), 1.0);
        assert!((ease_cubic_in_out(0.5) - 0.5).abs() < 1e-12);
        assert!(ease_cubic_in_out(0.25) < 0.25);
    }
}
