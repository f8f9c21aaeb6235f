//! Pausable per-round stopwatch.

use std::time::{Duration, Instant};

#[derive(Clone, Debug, Default)]
pub struct Stopwatch {
  banked: Duration,
  running_since: Option<Instant>,
}

impl Stopwatch {
  pub fn started() -> Self {
    Self { banked: Duration::ZERO, running_since: Some(Instant::now()) }
  }

  pub fn is_running(&self) -> bool { self.running_since.is_some() }

  pub fn start(&mut self) {
    if self.running_since.is_none() {
      self.running_since = Some(Instant::now());
    }
  }

  pub fn pause(&mut self) {
    if let Some(since) = self.running_since.take() {
      self.banked += since.elapsed();
    }
  }

  pub fn elapsed(&self) -> Duration {
    self.banked + self.running_since.map(|s| s.elapsed()).unwrap_or_default()
  }

  /// Reads the total and restarts from zero, keeping the running state.
  pub(crate) fn take(&mut self) -> Duration {
    let total = self.elapsed();
    self.banked = Duration::ZERO;
    if self.running_since.is_some() {
      self.running_since = Some(Instant::now());
    }
    total
  }
}

#[cfg(test)]
mod tests {
  use std::thread::sleep;

  use super::*;

  #[test]
  fn paused_watch_does_not_advance() {
    let mut w = Stopwatch::started();
    w.pause();
    let frozen = w.elapsed();
    sleep(Duration::from_millis(20));
    assert_eq!(w.elapsed(), frozen);
    assert!(!w.is_running());
  }

  #[test]
  fn resume_accumulates() {
    let mut w = Stopwatch::default();
    assert_eq!(w.elapsed(), Duration::ZERO);
    w.start();
    sleep(Duration::from_millis(10));
    w.pause();
    let first = w.elapsed();
    w.start();
    sleep(Duration::from_millis(10));
    assert!(w.elapsed() > first);
  }

  #[test]
  fn take_resets() {
    let mut w = Stopwatch::started();
    sleep(Duration::from_millis(10));
    w.pause();
    assert!(w.take() >= Duration::from_millis(10));
    assert_eq!(w.elapsed(), Duration::ZERO);
  }
}
