//! Pick Drill · vocabulary "pick the meaning" round engine
//!
//! The engine core (`sampler`, `round`, `engine`, `history`, `stopwatch`,
//! `input`) has no I/O. `state`, `protocol` and `routes` expose it over the
//! Axum HTTP + WebSocket service built by the binary.

pub mod config;
pub mod domain;
pub mod engine;
pub mod error;
pub mod history;
pub mod input;
pub mod protocol;
pub mod round;
pub mod routes;
pub mod sampler;
pub mod seeds;
pub mod state;
pub mod stopwatch;
pub mod telemetry;

pub use domain::{Feedback, FeedbackKind, Item, Pool};
pub use engine::{start_round, RoundEngine, Submission};
pub use error::DrillError;
pub use history::{FeedbackSink, HistoryTracker, InMemoryHistory, ScoreSink};
pub use round::{Round, RoundStatus};
