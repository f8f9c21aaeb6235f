//! Per-round state: the challenge, its choices, and what was already rejected.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::domain::Item;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RoundStatus {
  Active,
  Resolved,
}

#[derive(Clone, Debug)]
pub struct Round {
  pub challenge: Item,
  pub choices: Vec<String>,
  pub rejected: BTreeSet<String>,
  /// Decided once when the round is created.
  pub show_hints: bool,
  pub status: RoundStatus,
}

impl Round {
  pub fn new(challenge: Item, choices: Vec<String>, show_hints: bool) -> Self {
    Self {
      challenge,
      choices,
      rejected: BTreeSet::new(),
      show_hints,
      status: RoundStatus::Active,
    }
  }

  pub fn challenge_id(&self) -> &str { &self.challenge.id }

  pub fn correct_gloss(&self) -> &str { self.challenge.gloss() }

  pub fn is_choice(&self, gloss: &str) -> bool {
    self.choices.iter().any(|c| c == gloss)
  }

  pub fn is_rejected(&self, gloss: &str) -> bool {
    self.rejected.contains(gloss)
  }

  /// Marks a wrong choice as disabled for the rest of the round.
  /// The correct gloss and non-choices are never recorded.
  pub(crate) fn reject(&mut self, gloss: &str) {
    if gloss != self.correct_gloss() && self.is_choice(gloss) {
      self.rejected.insert(gloss.to_string());
    }
  }

  pub(crate) fn resolve(&mut self) {
    self.status = RoundStatus::Resolved;
  }

  /// Choices still selectable, in display order.
  pub fn remaining(&self) -> impl Iterator<Item = &str> + '_ {
    self.choices.iter().map(String::as_str).filter(move |c| !self.rejected.contains(*c))
  }

  /// Readings joined for display, when this round reveals them.
  pub fn hint_text(&self) -> Option<String> {
    if self.show_hints && !self.challenge.hints.is_empty() {
      Some(self.challenge.hints.join(", "))
    } else {
      None
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn round() -> Round {
    let fire = Item::new("火", vec!["ひ", "ほ"], vec!["fire"]);
    Round::new(fire, vec!["water".into(), "fire".into(), "tree".into()], true)
  }

  #[test]
  fn new_round_is_active_and_clean() {
    let r = round();
    assert_eq!(r.status, RoundStatus::Active);
    assert!(r.rejected.is_empty());
    assert_eq!(r.remaining().count(), 3);
  }

  #[test]
  fn reject_ignores_correct_and_unknown() {
    let mut r = round();
    r.reject("fire");
    r.reject("metal");
    assert!(r.rejected.is_empty());
    r.reject("water");
    assert!(r.is_rejected("water"));
    assert_eq!(r.remaining().collect::<Vec<_>>(), vec!["fire", "tree"]);
  }

  #[test]
  fn hint_text_follows_flag() {
    let mut r = round();
    assert_eq!(r.hint_text().as_deref(), Some("ひ, ほ"));
    r.show_hints = false;
    assert_eq!(r.hint_text(), None);
  }
}
