//! Round engine: builds rounds, evaluates answers, keeps score.
//!
//! `start_round` is a free function of its inputs so round construction can be
//! exercised on its own; `RoundEngine` adds the current round, the RNG and the
//! per-round stopwatch on top of it.

use std::collections::HashSet;
use std::time::Duration;

use rand::Rng;
use tracing::{debug, info, instrument};

use crate::domain::{Feedback, FeedbackKind, Pool};
use crate::error::DrillError;
use crate::history::{FeedbackSink, HistoryTracker, ScoreSink};
use crate::round::Round;
use crate::sampler::{coin_flip, pick_one_excluding, sample_without_replacement, shuffle};
use crate::stopwatch::Stopwatch;

/// Once an item was answered correctly, hints show up this often.
pub const HINT_ODDS: (u32, u32) = (1, 6);
pub const DISTRACTORS: usize = 2;

/// Builds a fresh Active round, never repeating `previous` when the pool allows it.
pub fn start_round<R, H>(
  pool: &Pool,
  previous: Option<&str>,
  history: &H,
  rng: &mut R,
) -> Result<Round, DrillError>
where
  R: Rng + ?Sized,
  H: HistoryTracker + ?Sized,
{
  let challenge = pick_one_excluding(pool.items(), previous, rng)?.clone();

  let show_hints = !history.ever_correct(&challenge.id) || coin_flip(HINT_ODDS.0, HINT_ODDS.1, rng);

  let correct = challenge.gloss().to_string();
  let mut seen: HashSet<&str> = HashSet::from([correct.as_str()]);
  let candidates: Vec<String> = pool
    .items()
    .iter()
    .filter(|it| it.id != challenge.id)
    .map(|it| it.gloss())
    .filter(|g| seen.insert(*g))
    .map(str::to_string)
    .collect();
  let distractors = sample_without_replacement(&candidates, DISTRACTORS, rng);

  let mut choices = Vec::with_capacity(1 + distractors.len());
  choices.push(correct);
  choices.extend(distractors);
  shuffle(&mut choices, rng);

  debug!(target: "round", challenge = %challenge.id, show_hints, choices = choices.len(), "Round created");
  Ok(Round::new(challenge, choices, show_hints))
}

/// Result of one evaluated submission.
#[derive(Clone, Debug)]
pub struct Submission {
  pub feedback: Feedback,
  pub score: u32,
  /// True when the answer was correct and a new round replaced the old one.
  pub resolved: bool,
  /// The round now active: the next one after a correct answer, the same one otherwise.
  pub round: Round,
  /// The round a correct answer just closed, with status `Resolved`.
  pub resolved_round: Option<Round>,
}

pub struct RoundEngine<R> {
  pool: Pool,
  rng: R,
  round: Round,
  stopwatch: Stopwatch,
}

impl<R: Rng> RoundEngine<R> {
  /// Creates the first round and starts its stopwatch.
  pub fn new<H: HistoryTracker + ?Sized>(pool: Pool, history: &H, mut rng: R) -> Result<Self, DrillError> {
    let round = start_round(&pool, None, history, &mut rng)?;
    info!(target: "round", pool = pool.len(), first = %round.challenge_id(), "Engine ready");
    Ok(Self { pool, rng, round, stopwatch: Stopwatch::started() })
  }

  pub fn round(&self) -> &Round { &self.round }

  pub fn pool(&self) -> &Pool { &self.pool }

  /// Pauses the stopwatch while the surface is hidden; resumes when shown.
  pub fn set_hidden(&mut self, hidden: bool) {
    if hidden { self.stopwatch.pause() } else { self.stopwatch.start() }
    debug!(target: "round", hidden, "Visibility changed");
  }

  pub fn is_timing(&self) -> bool { self.stopwatch.is_running() }

  /// Visible time spent on the current round so far.
  pub fn elapsed(&self) -> Duration { self.stopwatch.elapsed() }

  /// Evaluates one chosen gloss against the current round.
  ///
  /// Errors leave the round, history and score untouched.
  #[instrument(level = "debug", skip(self, history, score, sink), fields(challenge = %self.round.challenge_id()))]
  pub fn submit_answer<H, S, F>(
    &mut self,
    chosen: &str,
    history: &mut H,
    score: &mut S,
    sink: &mut F,
  ) -> Result<Submission, DrillError>
  where
    H: HistoryTracker + ?Sized,
    S: ScoreSink + ?Sized,
    F: FeedbackSink + ?Sized,
  {
    let challenge_id = self.round.challenge_id().to_string();
    if !self.round.is_choice(chosen) {
      return Err(DrillError::UnknownChoice { challenge_id, gloss: chosen.to_string() });
    }
    if self.round.is_rejected(chosen) {
      return Err(DrillError::ChoiceDisabled { challenge_id, gloss: chosen.to_string() });
    }

    let correct = chosen == self.round.correct_gloss();
    let mut resolved_round = None;
    let feedback = if correct {
      let elapsed = self.stopwatch.take();
      history.record_latency(elapsed);
      history.record_correct(&challenge_id);
      score.set(score.get().saturating_add(1));
      let next = start_round(&self.pool, Some(&challenge_id), &*history, &mut self.rng)?;
      let mut finished = std::mem::replace(&mut self.round, next);
      finished.resolve();
      resolved_round = Some(finished);
      info!(target: "round", challenge = %challenge_id, elapsed_ms = elapsed.as_millis() as u64, score = score.get(), "Correct answer");
      Feedback { kind: FeedbackKind::Correct, challenge_id, chosen_gloss: chosen.to_string() }
    } else {
      self.round.reject(chosen);
      history.record_wrong(&challenge_id);
      score.set(score.get().saturating_sub(1));
      info!(target: "round", challenge = %challenge_id, gloss = %chosen, score = score.get(), "Wrong answer");
      Feedback { kind: FeedbackKind::Incorrect, challenge_id, chosen_gloss: chosen.to_string() }
    };

    sink.emit(&feedback);
    Ok(Submission {
      feedback,
      score: score.get(),
      resolved: correct,
      round: self.round.clone(),
      resolved_round,
    })
  }
}
