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

use std::sync::Arc;
use std::sync::Mutex;

use chrono::DateTime;
use chrono::Utc;

use crate::config::Config;
use crate::queue::Queues;
use crate::session::Session;
use crate::store::Workbook;

#[derive(Clone)]
pub struct ServerState {
    pub workbook: Workbook,
    pub queues: Queues,
    pub config: Config,
    pub client: reqwest::Client,
    pub mutable: Arc<Mutex<MutableState>>,
}

pub struct MutableState {
    /// The active session. None is the idle state: no deck loaded.
    pub session: Option<Session>,
    pub started_at: Option<DateTime<Utc>>,
    /// Transient user-visible messages, drained into the next rendered page.
    pub notices: Vec<String>,
}

impl MutableState {
    pub fn new() -> Self {
        Self {
            session: None,
            started_at: None,
            notices: Vec::new(),
        }
    }

    pub fn notice(&mut self, message: impl Into<String>) {
        self.notices.push(message.into());
    }
}
