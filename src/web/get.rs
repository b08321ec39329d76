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

use axum::extract::Query;
use axum::extract::State;
use axum::http::HeaderName;
use axum::http::StatusCode;
use axum::http::header::CACHE_CONTROL;
use axum::http::header::CONTENT_TYPE;
use axum::response::Html;
use serde::Deserialize;

use crate::session::Phase;
use crate::speech;
use crate::web::state::ServerState;
use crate::web::template::page_template;
use crate::web::view;

pub async fn get_handler(State(state): State<ServerState>) -> (StatusCode, Html<String>) {
    let mut mutable = state.mutable.lock().unwrap();
    let notices = std::mem::take(&mut mutable.notices);
    let body = match &mutable.session {
        None => view::menu(&state, &notices),
        Some(session) => match session.phase() {
            Phase::InProgress => view::drill(session, &state.config.language, &notices),
            Phase::Completed => view::completed(session, mutable.started_at, &notices),
        },
    };
    let html = page_template(body);
    (StatusCode::OK, Html(html.into_string()))
}

#[derive(Deserialize)]
pub struct AudioParams {
    text: String,
    lang: Option<String>,
}

/// Proxy the speech collaborator. Failure means "no audio", never an error
/// page.
pub async fn audio_handler(
    State(state): State<ServerState>,
    Query(params): Query<AudioParams>,
) -> (StatusCode, [(HeaderName, &'static str); 1], Vec<u8>) {
    let lang = params.lang.as_deref().unwrap_or(&state.config.language);
    match speech::synthesize(&state.client, &params.text, lang).await {
        Ok(bytes) => (StatusCode::OK, [(CONTENT_TYPE, "audio/mpeg")], bytes),
        Err(err) => {
            log::warn!("{err}");
            (StatusCode::NOT_FOUND, [(CONTENT_TYPE, "audio/mpeg")], Vec::new())
        }
    }
}

pub async fn script() -> (StatusCode, [(HeaderName, &'static str); 1], &'static str) {
    (
        StatusCode::OK,
        [(CONTENT_TYPE, "text/javascript")],
        include_str!("script.js"),
    )
}

pub async fn stylesheet() -> (StatusCode, [(HeaderName, &'static str); 2], &'static [u8]) {
    let bytes = include_bytes!("style.css");
    (
        StatusCode::OK,
        [
            (CONTENT_TYPE, "text/css"),
            (CACHE_CONTROL, "public, max-age=604800, immutable"),
        ],
        bytes,
    )
}

pub async fn not_found_handler() -> (StatusCode, Html<String>) {
    (StatusCode::NOT_FOUND, Html("Not Found".to_string()))
}
