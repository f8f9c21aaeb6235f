//! Collaborator seams consumed by the engine: answer history, score, feedback.
//!
//! `InMemoryHistory` is the tracker used by live sessions; it is never persisted.

use std::collections::HashMap;
use std::time::Duration;

use serde::Serialize;

use crate::domain::Feedback;

/// Per-item answer record read by the hint-reveal heuristic.
pub trait HistoryTracker {
  fn ever_correct(&self, id: &str) -> bool;
  fn record_correct(&mut self, id: &str);
  fn record_wrong(&mut self, id: &str);
  /// Appends one correct-answer latency sample.
  fn record_latency(&mut self, elapsed: Duration);
}

pub trait ScoreSink {
  fn get(&self) -> u32;
  fn set(&mut self, value: u32);
}

impl ScoreSink for u32 {
  fn get(&self) -> u32 { *self }
  fn set(&mut self, value: u32) { *self = value; }
}

pub trait FeedbackSink {
  fn emit(&mut self, feedback: &Feedback);
}

impl FeedbackSink for Vec<Feedback> {
  fn emit(&mut self, feedback: &Feedback) { self.push(feedback.clone()); }
}

/// Keeps only the latest feedback, which is all a renderer shows.
impl FeedbackSink for Option<Feedback> {
  fn emit(&mut self, feedback: &Feedback) { *self = Some(feedback.clone()); }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ItemHistory {
  pub ever_correct: bool,
  pub correct: u32,
  pub wrong: u32,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct InMemoryHistory {
  pub items: HashMap<String, ItemHistory>,
  pub total_correct: u32,
  pub total_wrong: u32,
  /// Seconds per correct answer, oldest first.
  pub latencies: Vec<f64>,
}

impl InMemoryHistory {
  pub fn item(&self, id: &str) -> Option<&ItemHistory> {
    self.items.get(id)
  }

  pub fn mean_latency(&self) -> Option<f64> {
    if self.latencies.is_empty() {
      return None;
    }
    Some(self.latencies.iter().sum::<f64>() / self.latencies.len() as f64)
  }
}

impl HistoryTracker for InMemoryHistory {
  fn ever_correct(&self, id: &str) -> bool {
    self.items.get(id).map(|h| h.ever_correct).unwrap_or(false)
  }

  fn record_correct(&mut self, id: &str) {
    let h = self.items.entry(id.to_string()).or_default();
    h.ever_correct = true;
    h.correct += 1;
    self.total_correct += 1;
  }

  fn record_wrong(&mut self, id: &str) {
    self.items.entry(id.to_string()).or_default().wrong += 1;
    self.total_wrong += 1;
  }

  fn record_latency(&mut self, elapsed: Duration) {
    self.latencies.push(elapsed.as_secs_f64());
  }
}
