// Copyright 2025 Fernando Borretti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use axum::Form;
use axum::extract::State;
use axum::response::Redirect;
use chrono::Utc;
use serde::Deserialize;

use crate::deck::ALL_SOURCES;
use crate::deck::load_learn_deck;
use crate::deck::load_queue_deck;
use crate::error::Fallible;
use crate::queue::QueueKind;
use crate::session::HintOutcome;
use crate::session::Session;
use crate::types::answer::AnswerStatus;
use crate::types::card::Card;
use crate::types::mode::Part;
use crate::types::mode::StudyMode;
use crate::web::state::MutableState;
use crate::web::state::ServerState;

#[derive(Debug, Deserialize)]
enum Action {
    Start,
    Review,
    Unsure,
    Submit,
    Hint,
    Flag,
    Retry,
    Continue,
    Mastered,
    Restart,
    Menu,
}

#[derive(Deserialize)]
pub struct FormData {
    action: Action,
    answer: Option<String>,
    unit: Option<String>,
    part: Option<u8>,
    source: Option<String>,
}

pub async fn post_handler(
    State(state): State<ServerState>,
    Form(form): Form<FormData>,
) -> Redirect {
    match action_handler(&state, form) {
        Ok(_) => {}
        Err(err) => {
            log::error!("{err}");
        }
    }
    Redirect::to("/")
}

/// The queue write an advance must perform before the position moves.
enum PendingWrite {
    /// A miss in learn mode goes to the Review queue.
    RecordMiss(Card),
    /// A mastered card leaves its queue.
    RemoveMastered(QueueKind, String),
}

fn action_handler(state: &ServerState, form: FormData) -> Fallible<()> {
    let mut mutable = state.mutable.lock().unwrap();
    match form.action {
        Action::Start => {
            let Some(unit) = form.unit else {
                mutable.notice("Pick a unit first.");
                return Ok(());
            };
            let part = form.part.and_then(Part::from_number).unwrap_or(Part::One);
            match load_learn_deck(&state.workbook, &unit, part) {
                Ok(deck) if deck.is_empty() => {
                    mutable.notice(format!("{unit} ({part}) has no usable rows."));
                }
                Ok(deck) => {
                    let mode = StudyMode::Learn { unit, part };
                    mutable.session = Some(Session::start(mode, deck));
                    mutable.started_at = Some(Utc::now());
                }
                Err(err) => {
                    log::warn!("{err}");
                    mutable.notice(format!("Could not load {unit}: {err}"));
                }
            }
        }
        Action::Review => {
            start_queue_session(state, &mut mutable, QueueKind::Review, form.source);
        }
        Action::Unsure => {
            start_queue_session(state, &mut mutable, QueueKind::Unsure, form.source);
        }
        Action::Submit => {
            if let Some(session) = mutable.session.as_mut() {
                let answer = form.answer.unwrap_or_default();
                if session.submit(&answer).is_none() {
                    log::debug!("Ignoring a submission outside a question.");
                }
            }
        }
        Action::Hint => {
            let save = match mutable.session.as_mut() {
                Some(session) => {
                    let card = session.current_card().cloned();
                    match session.reveal_hint() {
                        HintOutcome::Revealed(_) if session.mode().saves_on_hint() => card,
                        HintOutcome::NotAllowed => {
                            log::debug!("Ignoring a hint outside a question.");
                            None
                        }
                        _ => None,
                    }
                }
                None => None,
            };
            // Using a hint flags the card as uncertain.
            if let Some(card) = save {
                if let Err(err) = state.queues.append_unique(QueueKind::Unsure, &card) {
                    log::warn!("{err}");
                    mutable.notice(format!("Could not save to Unsure: {err}"));
                }
            }
        }
        Action::Flag => {
            let card = mutable
                .session
                .as_ref()
                .and_then(|session| session.current_card().cloned());
            match card {
                Some(card) => match state.queues.append_unique(QueueKind::Unsure, &card) {
                    Ok(()) => mutable.notice("Saved to Unsure."),
                    Err(err) => {
                        log::warn!("{err}");
                        mutable.notice(format!("Could not save to Unsure: {err}"));
                    }
                },
                None => {
                    log::debug!("Ignoring a flag outside a question.");
                }
            }
        }
        Action::Continue | Action::Mastered => {
            let mastered = matches!(form.action, Action::Mastered);
            let pending = match mutable.session.as_ref() {
                Some(session) if session.status() != AnswerStatus::Unanswered => {
                    let card = session.current_card().cloned();
                    match (session.status(), card) {
                        (AnswerStatus::Wrong, Some(card)) if session.mode().records_misses() => {
                            Some(PendingWrite::RecordMiss(card))
                        }
                        (AnswerStatus::Correct, Some(card)) if mastered => session
                            .mode()
                            .mastery_queue()
                            .map(|kind| PendingWrite::RemoveMastered(kind, card.question)),
                        _ => None,
                    }
                }
                Some(_) => {
                    log::debug!("Ignoring an advance before an answer.");
                    None
                }
                None => None,
            };
            let mut notices = Vec::new();
            match pending {
                Some(PendingWrite::RecordMiss(card)) => {
                    if let Err(err) = state.queues.append_unique(QueueKind::Review, &card) {
                        log::warn!("{err}");
                        notices.push(format!("Could not save to Review: {err}"));
                    }
                }
                Some(PendingWrite::RemoveMastered(kind, question)) => {
                    match state.queues.remove(kind, &question) {
                        Ok(_) => {}
                        Err(err) => {
                            log::warn!("{err}");
                            notices.push(format!(
                                "Could not update {}: {err}",
                                kind.sheet_name()
                            ));
                        }
                    }
                }
                None => {}
            }
            if let Some(session) = mutable.session.as_mut() {
                session.advance();
            }
            for notice in notices {
                mutable.notice(notice);
            }
        }
        Action::Retry => {
            if let Some(session) = mutable.session.as_mut() {
                if !session.retry() {
                    log::debug!("Ignoring a retry without a wrong answer.");
                }
            }
        }
        Action::Restart => {
            let restarted = match mutable.session.as_mut() {
                Some(session) => session.restart(),
                None => false,
            };
            if restarted {
                mutable.started_at = Some(Utc::now());
            } else {
                log::debug!("Ignoring a restart outside a completed session.");
            }
        }
        Action::Menu => {
            mutable.session = None;
            mutable.started_at = None;
        }
    }
    Ok(())
}

fn start_queue_session(
    state: &ServerState,
    mutable: &mut MutableState,
    kind: QueueKind,
    source: Option<String>,
) {
    let filter = source.unwrap_or_else(|| ALL_SOURCES.to_string());
    let mode = match kind {
        QueueKind::Review => StudyMode::ReviewWrong,
        QueueKind::Unsure => StudyMode::ReviewUnsure,
    };
    match load_queue_deck(&state.queues, kind, &filter) {
        Ok(deck) if deck.is_empty() => {
            mutable.notice(format!("Nothing to study in {}.", kind.sheet_name()));
        }
        Ok(deck) => {
            mutable.session = Some(Session::start(mode, deck));
            mutable.started_at = Some(Utc::now());
        }
        Err(err) => {
            log::warn!("{err}");
            mutable.notice(format!("Could not load {}: {err}", kind.sheet_name()));
        }
    }
}
