//! Maps discrete input signals to a choice and forwards it to the engine.

use rand::Rng;

use crate::engine::{RoundEngine, Submission};
use crate::error::DrillError;
use crate::history::{FeedbackSink, HistoryTracker, ScoreSink};

/// Key codes (DOM `KeyboardEvent.code` names) that select a choice by position.
pub fn key_to_index(code: &str) -> Option<usize> {
  match code {
    "Digit1" | "Numpad1" => Some(0),
    "Digit2" | "Numpad2" => Some(1),
    "Digit3" | "Numpad3" => Some(2),
    _ => None,
  }
}

/// Resolves `index` against the current round's choices, refusing disabled ones.
pub fn choice_at<R: Rng>(engine: &RoundEngine<R>, index: usize) -> Result<String, DrillError> {
  let round = engine.round();
  let gloss = round
    .choices
    .get(index)
    .ok_or(DrillError::IndexOutOfRange { index, len: round.choices.len() })?;
  if round.is_rejected(gloss) {
    return Err(DrillError::ChoiceDisabled {
      challenge_id: round.challenge_id().to_string(),
      gloss: gloss.clone(),
    });
  }
  Ok(gloss.clone())
}

/// One input event worth of collaborators, borrowed for the duration of a dispatch.
pub struct InputDispatcher<'a, R, H: ?Sized, S: ?Sized, F: ?Sized> {
  pub engine: &'a mut RoundEngine<R>,
  pub history: &'a mut H,
  pub score: &'a mut S,
  pub feedback: &'a mut F,
}

impl<'a, R, H, S, F> InputDispatcher<'a, R, H, S, F>
where
  R: Rng,
  H: HistoryTracker + ?Sized,
  S: ScoreSink + ?Sized,
  F: FeedbackSink + ?Sized,
{
  pub fn select(&mut self, index: usize) -> Result<Submission, DrillError> {
    let gloss = choice_at(&*self.engine, index)?;
    self.choose(&gloss)
  }

  pub fn key(&mut self, code: &str) -> Result<Submission, DrillError> {
    let index = key_to_index(code).ok_or_else(|| DrillError::UnmappedKey { code: code.to_string() })?;
    self.select(index)
  }

  pub fn choose(&mut self, gloss: &str) -> Result<Submission, DrillError> {
    self.engine.submit_answer(gloss, &mut *self.history, &mut *self.score, &mut *self.feedback)
  }
}
