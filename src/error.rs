//! Error kinds surfaced by the drill engine and its service wrappers.
//!
//! Every variant is a local rejection: the session that produced it stays usable.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DrillError {
  /// A pool must hold at least one item before an engine can be built.
  #[error("item pool is empty")]
  EmptyPool,

  #[error("item '{id}' appears more than once in the pool")]
  DuplicateItem { id: String },

  #[error("item '{id}' has no glosses")]
  NoGlosses { id: String },

  /// The submitted gloss was never offered in the current round.
  #[error("'{gloss}' is not a choice for challenge '{challenge_id}'")]
  UnknownChoice { challenge_id: String, gloss: String },

  /// The submitted gloss was already answered wrong this round.
  #[error("'{gloss}' was already rejected for challenge '{challenge_id}'")]
  ChoiceDisabled { challenge_id: String, gloss: String },

  #[error("answer must carry an index, a key or a gloss")]
  MissingAnswer,

  #[error("choice index {index} out of range ({len} choices)")]
  IndexOutOfRange { index: usize, len: usize },

  #[error("key '{code}' is not mapped to a choice")]
  UnmappedKey { code: String },

  #[error("unknown session: {0}")]
  UnknownSession(String),

  #[error("config error: {0}")]
  Config(String),
}
