//! WebSocket upgrade + message loop. Each connection owns one drill session;
//! every client message is one input event and gets exactly one JSON reply.

use std::sync::Arc;

use axum::{
  extract::{
    ws::{Message, WebSocket},
    State, WebSocketUpgrade,
  },
  response::IntoResponse,
};
use tracing::{debug, error, info, instrument};

use crate::protocol::{answer_out, round_out, stats_out, ClientWsMessage, ServerWsMessage};
use crate::state::{Answer, AppState, Session};

#[instrument(level = "info", skip(state))]
pub async fn ws_upgrade(ws: WebSocketUpgrade, State(state): State<Arc<AppState>>) -> impl IntoResponse {
  info!(target: "pick_drill", "WebSocket upgrade requested");
  ws.on_upgrade(move |socket| handle_ws(socket, state))
}

#[instrument(level = "info", skip(socket, state))]
async fn handle_ws(mut socket: WebSocket, state: Arc<AppState>) {
  let mut session = match state.detached_session() {
    Ok(s) => s,
    Err(e) => {
      error!(target: "pick_drill", error = %e, "Could not start session");
      return;
    }
  };
  info!(target: "pick_drill", session = %session.id, "WebSocket connected");

  // greet with the first round so the client can render immediately
  let mut pending = Some(round_message(&session));

  loop {
    if let Some(reply) = pending.take() {
      let out = serde_json::to_string(&reply).unwrap_or_else(|e| {
        serde_json::json!({ "type": "error", "message": format!("Serialization error: {}", e) }).to_string()
      });
      if let Err(e) = socket.send(Message::Text(out)).await {
        error!(target: "pick_drill", error = %e, "WS send error");
        break;
      }
    }

    let Some(Ok(msg)) = socket.recv().await else { break };
    match msg {
      Message::Text(txt) => {
        pending = Some(match serde_json::from_str::<ClientWsMessage>(&txt) {
          Ok(incoming) => {
            debug!(target: "pick_drill", "WS received: {:?}", &incoming);
            handle_client_ws(incoming, &state, &mut session)
          }
          Err(e) => ServerWsMessage::Error { message: format!("Invalid JSON: {}", e) },
        });
      }
      Message::Ping(payload) => { let _ = socket.send(Message::Pong(payload)).await; }
      Message::Close(_) => break,
      _ => {}
    }
  }
  info!(target: "pick_drill", session = %session.id, score = session.score, "WebSocket disconnected");
}

fn round_message(session: &Session) -> ServerWsMessage {
  ServerWsMessage::Round {
    session_id: session.id.clone(),
    score: session.score,
    round: round_out(session.engine.round()),
  }
}

fn handle_client_ws(msg: ClientWsMessage, state: &AppState, session: &mut Session) -> ServerWsMessage {
  let answer = match msg {
    ClientWsMessage::Ping => return ServerWsMessage::Pong,
    ClientWsMessage::NewSession => {
      return match state.detached_session() {
        Ok(s) => {
          info!(target: "pick_drill", old = %session.id, new = %s.id, "WS session restarted");
          *session = s;
          round_message(session)
        }
        Err(e) => ServerWsMessage::Error { message: e.to_string() },
      };
    }
    ClientWsMessage::Visibility { hidden } => {
      session.engine.set_hidden(hidden);
      return round_message(session);
    }
    ClientWsMessage::Stats => return ServerWsMessage::Stats(stats_out(session.score, &session.history)),
    ClientWsMessage::Select { index } => Answer::Index(index),
    ClientWsMessage::Key { code } => Answer::Key(code),
    ClientWsMessage::Choose { gloss } => Answer::Gloss(gloss),
  };

  match session.answer(&answer) {
    Ok(sub) => {
      info!(target: "round", session = %session.id, correct = sub.resolved, score = sub.score, "WS answer evaluated");
      ServerWsMessage::AnswerResult(answer_out(&sub))
    }
    Err(e) => ServerWsMessage::Error { message: e.to_string() },
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::{Item, Pool};

  fn state() -> AppState {
    let pool = Pool::new(vec![
      Item::new("A", vec![], vec!["fire"]),
      Item::new("B", vec![], vec!["water"]),
      Item::new("C", vec![], vec!["tree"]),
    ])
    .unwrap();
    AppState::with_pool("elements".into(), pool)
  }

  #[test]
  fn unmapped_key_becomes_error_message() {
    let st = state();
    let mut s = st.detached_session().unwrap();
    let reply = handle_client_ws(ClientWsMessage::Key { code: "KeyZ".into() }, &st, &mut s);
    assert!(matches!(reply, ServerWsMessage::Error { .. }));
  }

  #[test]
  fn correct_choice_yields_answer_result() {
    let st = state();
    let mut s = st.detached_session().unwrap();
    let gloss = s.engine.round().correct_gloss().to_string();
    match handle_client_ws(ClientWsMessage::Choose { gloss }, &st, &mut s) {
      ServerWsMessage::AnswerResult(out) => {
        assert!(out.correct);
        assert_eq!(out.score, 1);
      }
      other => panic!("unexpected reply: {other:?}"),
    }
  }

  #[test]
  fn new_session_resets_score() {
    let st = state();
    let mut s = st.detached_session().unwrap();
    s.score = 4;
    let old = s.id.clone();
    handle_client_ws(ClientWsMessage::NewSession, &st, &mut s);
    assert_ne!(s.id, old);
    assert_eq!(s.score, 0);
  }
}
