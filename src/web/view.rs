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

use chrono::DateTime;
use chrono::Utc;
use maud::Markup;
use maud::html;
use percent_encoding::NON_ALPHANUMERIC;
use percent_encoding::utf8_percent_encode;

use crate::deck::ALL_SOURCES;
use crate::deck::list_units;
use crate::queue::QueueKind;
use crate::session::Session;
use crate::types::answer::AnswerStatus;
use crate::web::state::ServerState;

fn audio_url(text: &str, lang: &str) -> String {
    format!(
        "/audio?text={}&lang={}",
        utf8_percent_encode(text, NON_ALPHANUMERIC),
        utf8_percent_encode(lang, NON_ALPHANUMERIC)
    )
}

fn audio_player(text: &str, lang: &str) -> Markup {
    html! {
        audio controls preload="none" src=(audio_url(text, lang)) {}
    }
}

fn notice_list(notices: &[String]) -> Markup {
    html! {
        @if !notices.is_empty() {
            div.notices {
                @for notice in notices {
                    div.notice { (notice) }
                }
            }
        }
    }
}

fn source_select(sources: &[String]) -> Markup {
    html! {
        select name="source" {
            option value=(ALL_SOURCES) { (ALL_SOURCES) }
            @for source in sources {
                option value=(source) { (source) }
            }
        }
    }
}

/// The idle page: pick a unit and part, or start a queue session.
pub fn menu(state: &ServerState, notices: &[String]) -> Markup {
    let (units, load_error) = match list_units(&state.workbook) {
        Ok(units) => (units, None),
        Err(err) => {
            log::warn!("{err}");
            (Vec::new(), Some(err.to_string()))
        }
    };
    let review_sources = state.queues.sources(QueueKind::Review).unwrap_or_default();
    let unsure_sources = state.queues.sources(QueueKind::Unsure).unwrap_or_default();
    html! {
        div.root {
            div.menu {
                h1 { "vocadrill" }
                (notice_list(notices))
                @if let Some(error) = load_error {
                    div.notice { (error) }
                }
                @if units.is_empty() {
                    p.empty { "No unit sheets found in the workbook." }
                } @else {
                    form.start-form action="/" method="post" {
                        h2 { "Learn" }
                        select name="unit" {
                            @for unit in &units {
                                option value=(unit) { (unit) }
                            }
                        }
                        div.parts {
                            label {
                                input type="radio" name="part" value="1" checked;
                                " Part 1"
                            }
                            label {
                                input type="radio" name="part" value="2";
                                " Part 2"
                            }
                        }
                        input type="submit" name="action" value="Start";
                    }
                }
                form.start-form action="/" method="post" {
                    h2 { "Review" }
                    (source_select(&review_sources))
                    input type="submit" name="action" value="Review";
                }
                form.start-form action="/" method="post" {
                    h2 { "Unsure" }
                    (source_select(&unsure_sources))
                    input type="submit" name="action" value="Unsure";
                }
            }
        }
    }
}

/// Render each character of the masked answer with a space between.
fn spaced(masked: &str) -> String {
    let spaced: String = masked.chars().flat_map(|c| [c, ' ']).collect();
    spaced.trim_end().to_string()
}

/// The drill page: the current card, rendered for the current answer
/// status.
pub fn drill(session: &Session, lang: &str, notices: &[String]) -> Markup {
    let total = session.len();
    let position = session.position();
    let percent = if total == 0 {
        100
    } else {
        (position * 100) / total
    };
    let progress_style = format!("width: {percent}%;");
    let Some(card) = session.current_card() else {
        return notice_list(notices);
    };
    let controls = match session.status() {
        AnswerStatus::Unanswered => html! {
            form.answer-form action="/" method="post" {
                input #answer type="text" name="answer" autocomplete="off"
                    placeholder="Type your answer";
                div.buttons {
                    input type="submit" name="action" value="Submit";
                    input type="submit" name="action" value="Hint"
                        title="Reveal one letter of the answer";
                    input type="submit" name="action" value="Flag"
                        title="Save this card to the Unsure queue";
                }
            }
        },
        AnswerStatus::Correct => html! {
            div.banner.correct { "Correct!" }
            div.full-answer {
                span.answer-text { (card.answer) }
                (audio_player(&card.answer, lang))
            }
            form action="/" method="post" {
                div.buttons {
                    @if session.mode().mastery_queue().is_some() {
                        input type="submit" name="action" value="Mastered"
                            title="Remove this card from the queue";
                        input type="submit" name="action" value="Continue"
                            title="Keep the card for more review";
                    } @else {
                        input type="submit" name="action" value="Continue";
                    }
                }
            }
        },
        AnswerStatus::Wrong => html! {
            div.banner.wrong {
                "Incorrect. The answer is: "
                span.answer-text { (card.answer) }
            }
            div.full-answer {
                (audio_player(&card.answer, lang))
            }
            form action="/" method="post" {
                div.buttons {
                    input type="submit" name="action" value="Retry";
                    input type="submit" name="action" value="Continue";
                }
            }
        },
    };
    html! {
        div.root {
            div.header {
                div.progress-bar {
                    div.progress-fill style=(progress_style) {}
                }
                div.caption {
                    span { "Card " (position + 1) " / " (total) }
                    span.mode { (session.mode().title()) }
                    span.score { "Score: " (session.score()) }
                }
            }
            (notice_list(notices))
            div.card {
                div.question { (card.question) }
                (audio_player(&card.question, lang))
                @if !session.revealed().is_empty() {
                    @if let Some(masked) = session.masked_answer() {
                        div.hint { (spaced(&masked)) }
                    }
                }
                div.controls { (controls) }
            }
        }
    }
}

/// The completion page: score summary and per-session pace.
pub fn completed(
    session: &Session,
    started_at: Option<DateTime<Utc>>,
    notices: &[String],
) -> Markup {
    let total = session.len();
    let score = session.score();
    let pace = started_at.and_then(|started| {
        if total == 0 {
            return None;
        }
        let elapsed = Utc::now().signed_duration_since(started).num_seconds() as f64;
        Some(elapsed / total as f64)
    });
    html! {
        div.root {
            (notice_list(notices))
            div.finished {
                h1 { "Session Completed" }
                div.summary { "Result: " (score) " / " (total) }
                div.stats {
                    table {
                        tbody {
                            tr {
                                td.key { "Cards" }
                                td.val { (total) }
                            }
                            tr {
                                td.key { "Correct" }
                                td.val { (score) }
                            }
                            @if let Some(pace) = pace {
                                tr {
                                    td.key { "Pace (s/card)" }
                                    td.val { (format!("{pace:.2}")) }
                                }
                            }
                        }
                    }
                }
                form action="/" method="post" {
                    div.buttons {
                        input type="submit" name="action" value="Restart";
                        input type="submit" name="action" value="Menu";
                    }
                }
            }
        }
    }
}
