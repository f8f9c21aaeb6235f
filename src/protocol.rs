//! Public protocol structs for WebSocket and HTTP endpoints (serde ready).
//! Keep this small and stable to evolve backend and frontend independently.

use serde::{Deserialize, Serialize};

use crate::domain::Feedback;
use crate::engine::Submission;
use crate::history::{InMemoryHistory, ItemHistory};
use crate::round::{Round, RoundStatus};
use crate::state::Answer;

/// Messages the client can send over WebSocket.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientWsMessage {
    Ping,
    /// Drop the current session and start over.
    NewSession,
    Select {
        index: usize,
    },
    Key {
        code: String,
    },
    Choose {
        gloss: String,
    },
    Visibility {
        hidden: bool,
    },
    Stats,
}

/// Messages the server sends back over WebSocket.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerWsMessage {
    Pong,
    Round {
        #[serde(rename = "sessionId")]
        session_id: String,
        score: u32,
        round: RoundOut,
    },
    AnswerResult(AnswerOut),
    Stats(StatsOut),
    Error {
        message: String,
    },
}

/// DTO used by both WS and HTTP for round delivery.
#[derive(Debug, Serialize)]
pub struct RoundOut {
    pub prompt: String,
    /// Readings, present only when this round reveals them.
    pub hints: Option<String>,
    pub choices: Vec<ChoiceOut>,
    pub status: RoundStatus,
}

#[derive(Debug, Serialize)]
pub struct ChoiceOut {
    pub gloss: String,
    pub disabled: bool,
}

/// Convert the internal `Round` to the public DTO. The answer itself is not exposed.
pub fn round_out(r: &Round) -> RoundOut {
    RoundOut {
        prompt: r.challenge.id.clone(),
        hints: r.hint_text(),
        choices: r
            .choices
            .iter()
            .map(|g| ChoiceOut {
                gloss: g.clone(),
                disabled: r.is_rejected(g),
            })
            .collect(),
        status: r.status,
    }
}

#[derive(Debug, Serialize)]
pub struct AnswerOut {
    pub correct: bool,
    pub score: u32,
    /// Rendered feedback line, e.g. "火 = fire".
    pub message: String,
    pub feedback: Feedback,
    pub round: RoundOut,
    /// The round just closed by a correct answer (status `resolved`).
    #[serde(rename = "resolvedRound", skip_serializing_if = "Option::is_none")]
    pub resolved_round: Option<RoundOut>,
}

pub fn answer_out(sub: &Submission) -> AnswerOut {
    AnswerOut {
        correct: sub.resolved,
        score: sub.score,
        message: sub.feedback.to_string(),
        feedback: sub.feedback.clone(),
        round: round_out(&sub.round),
        resolved_round: sub.resolved_round.as_ref().map(round_out),
    }
}

#[derive(Debug, Serialize)]
pub struct StatsOut {
    pub score: u32,
    #[serde(rename = "totalCorrect")]
    pub total_correct: u32,
    #[serde(rename = "totalWrong")]
    pub total_wrong: u32,
    #[serde(rename = "meanLatencySecs")]
    pub mean_latency_secs: Option<f64>,
    pub items: Vec<ItemStatsOut>,
}

#[derive(Debug, Serialize)]
pub struct ItemStatsOut {
    pub id: String,
    #[serde(flatten)]
    pub history: ItemHistory,
}

pub fn stats_out(score: u32, h: &InMemoryHistory) -> StatsOut {
    let mut items: Vec<ItemStatsOut> = h
        .items
        .iter()
        .map(|(id, hist)| ItemStatsOut {
            id: id.clone(),
            history: hist.clone(),
        })
        .collect();
    items.sort_by(|a, b| a.id.cmp(&b.id));
    StatsOut {
        score,
        total_correct: h.total_correct,
        total_wrong: h.total_wrong,
        mean_latency_secs: h.mean_latency(),
        items,
    }
}

//
// HTTP request/response DTOs
//

#[derive(Debug, Serialize)]
pub struct SessionOut {
    #[serde(rename = "sessionId")]
    pub session_id: String,
    pub pool: String,
    pub score: u32,
    pub round: RoundOut,
}

/// Exactly one of the fields should be set; `index` wins when both are.
#[derive(Debug, Deserialize)]
pub struct AnswerIn {
    #[serde(default)]
    pub index: Option<usize>,
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub gloss: Option<String>,
}

impl AnswerIn {
    pub fn into_answer(self) -> Option<Answer> {
        match (self.index, self.key, self.gloss) {
            (Some(i), _, _) => Some(Answer::Index(i)),
            (None, Some(k), _) => Some(Answer::Key(k)),
            (None, None, Some(g)) => Some(Answer::Gloss(g)),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct VisibilityIn {
    pub hidden: bool,
}

#[derive(Serialize)]
pub struct HealthOut {
    pub ok: bool,
}

#[derive(Serialize)]
pub struct ErrorOut {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Item;

    #[test]
    fn client_messages_are_type_tagged() {
        let m: ClientWsMessage = serde_json::from_str(r#"{"type":"select","index":1}"#).unwrap();
        assert!(matches!(m, ClientWsMessage::Select { index: 1 }));
        let m: ClientWsMessage = serde_json::from_str(r#"{"type":"visibility","hidden":true}"#).unwrap();
        assert!(matches!(m, ClientWsMessage::Visibility { hidden: true }));
        let m: ClientWsMessage = serde_json::from_str(r#"{"type":"new_session"}"#).unwrap();
        assert!(matches!(m, ClientWsMessage::NewSession));
    }

    #[test]
    fn round_out_marks_disabled_choices() {
        let mut r = Round::new(
            Item::new("火", vec!["ひ"], vec!["fire"]),
            vec!["fire".into(), "water".into()],
            false,
        );
        r.reject("water");
        let out = round_out(&r);
        assert_eq!(out.hints, None);
        assert!(!out.choices[0].disabled);
        assert!(out.choices[1].disabled);
        let json = serde_json::to_value(&out).unwrap();
        assert_eq!(json["status"], "active");
    }

    #[test]
    fn correct_answer_reports_the_resolved_round() {
        use rand::rngs::StdRng;
        use rand::SeedableRng;

        use crate::domain::Pool;
        use crate::engine::RoundEngine;
        use crate::history::InMemoryHistory;

        let pool = Pool::new(vec![
            Item::new("火", vec!["ひ"], vec!["fire"]),
            Item::new("水", vec!["みず"], vec!["water"]),
        ])
        .unwrap();
        let mut history = InMemoryHistory::default();
        let mut engine = RoundEngine::new(pool, &history, StdRng::seed_from_u64(4)).unwrap();
        let mut score = 0u32;
        let mut last: Option<Feedback> = None;

        let first = engine.round().challenge_id().to_string();
        let wrong = engine.round().remaining().find(|g| *g != engine.round().correct_gloss()).unwrap().to_string();
        let sub = engine.submit_answer(&wrong, &mut history, &mut score, &mut last).unwrap();
        let json = serde_json::to_value(answer_out(&sub)).unwrap();
        assert!(json.get("resolvedRound").is_none());

        let correct = engine.round().correct_gloss().to_string();
        let sub = engine.submit_answer(&correct, &mut history, &mut score, &mut last).unwrap();
        let json = serde_json::to_value(answer_out(&sub)).unwrap();
        assert_eq!(json["correct"], true);
        assert_eq!(json["resolvedRound"]["status"], "resolved");
        assert_eq!(json["resolvedRound"]["prompt"], first.as_str());
        assert_eq!(json["round"]["status"], "active");
        assert_ne!(json["round"]["prompt"], first.as_str());
    }

    #[test]
    fn answer_in_prefers_index() {
        let a = AnswerIn { index: Some(2), key: None, gloss: Some("fire".into()) };
        assert!(matches!(a.into_answer(), Some(Answer::Index(2))));
        let none = AnswerIn { index: None, key: None, gloss: None };
        assert!(none.into_answer().is_none());
    }
}
