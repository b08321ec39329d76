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

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;

use axum::Router;
use axum::routing::get;
use axum::routing::post;
use tokio::net::TcpListener;
use tokio::net::TcpStream;
use tokio::time::sleep;

use crate::config::load_config;
use crate::error::Fallible;
use crate::error::fail;
use crate::queue::Queues;
use crate::store::Workbook;
use crate::web::get::audio_handler;
use crate::web::get::get_handler;
use crate::web::get::not_found_handler;
use crate::web::get::script;
use crate::web::get::stylesheet;
use crate::web::post::post_handler;
use crate::web::state::MutableState;
use crate::web::state::ServerState;

pub async fn start_server(directory: PathBuf, port_override: Option<u16>) -> Fallible<()> {
    if !directory.exists() {
        return fail("directory does not exist.");
    }
    let directory = directory.canonicalize()?;
    let config = load_config(&directory)?;
    let port = port_override.unwrap_or(config.port);

    let workbook = Workbook::new(directory);
    let queues = Queues::new(workbook.clone());
    let state = ServerState {
        workbook,
        queues,
        config,
        client: reqwest::Client::new(),
        mutable: Arc::new(Mutex::new(MutableState::new())),
    };

    let app = Router::new();
    let app = app.route("/", get(get_handler));
    let app = app.route("/", post(post_handler));
    let app = app.route("/audio", get(audio_handler));
    let app = app.route("/script.js", get(script));
    let app = app.route("/style.css", get(stylesheet));
    let app = app.fallback(not_found_handler);
    let app = app.with_state(state.clone());
    let bind = format!("0.0.0.0:{port}");

    if state.config.open_browser {
        // Start a separate task to open the browser once the server accepts
        // connections.
        let url = format!("http://{bind}/");
        let probe = bind.clone();
        tokio::spawn(async move {
            loop {
                if let Ok(stream) = TcpStream::connect(&probe).await {
                    drop(stream);
                    break;
                }
                sleep(Duration::from_millis(1)).await;
            }
            let _ = open::that(url);
        });
    }

    log::debug!("Starting server on {bind}");
    let listener = TcpListener::bind(&bind).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
