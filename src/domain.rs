//! Domain models: drill items, the validated pool, and answer feedback.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::DrillError;

/// One quiz subject: the displayed prompt, reading hints, and ranked glosses.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
  /// Unique prompt key, also what gets displayed (e.g. a kanji).
  pub id: String,
  #[serde(default)] pub hints: Vec<String>,
  /// First entry is the canonical correct gloss.
  pub glosses: Vec<String>,
}

impl Item {
  pub fn new<I, S>(id: impl Into<String>, hints: I, glosses: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    Self {
      id: id.into(),
      hints: hints.into_iter().map(Into::into).collect(),
      glosses: glosses.into_iter().map(Into::into).collect(),
    }
  }

  /// Canonical correct gloss. Pool construction guarantees it exists.
  pub fn gloss(&self) -> &str {
    self.glosses.first().map(String::as_str).unwrap_or_default()
  }
}

/// Non-empty, read-only set of items, distinct by id.
#[derive(Clone, Debug)]
pub struct Pool {
  items: Vec<Item>,
}

impl Pool {
  pub fn new(items: Vec<Item>) -> Result<Self, DrillError> {
    if items.is_empty() {
      return Err(DrillError::EmptyPool);
    }
    let mut seen = HashSet::new();
    for it in &items {
      if it.glosses.is_empty() {
        return Err(DrillError::NoGlosses { id: it.id.clone() });
      }
      if !seen.insert(it.id.as_str()) {
        return Err(DrillError::DuplicateItem { id: it.id.clone() });
      }
    }
    Ok(Self { items })
  }

  pub fn items(&self) -> &[Item] { &self.items }

  pub fn len(&self) -> usize { self.items.len() }

  pub fn is_empty(&self) -> bool { self.items.is_empty() }

  pub fn get(&self, id: &str) -> Option<&Item> {
    self.items.iter().find(|it| it.id == id)
  }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackKind {
  Correct,
  Incorrect,
}

/// Emitted once per evaluated answer.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Feedback {
  pub kind: FeedbackKind,
  #[serde(rename = "challengeId")]
  pub challenge_id: String,
  #[serde(rename = "chosenGloss")]
  pub chosen_gloss: String,
}

impl Feedback {
  pub fn is_correct(&self) -> bool { self.kind == FeedbackKind::Correct }
}

impl fmt::Display for Feedback {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let rel = match self.kind {
      FeedbackKind::Correct => "=",
      FeedbackKind::Incorrect => "≠",
    };
    write!(f, "{} {} {}", self.challenge_id, rel, self.chosen_gloss)
  }
}
